// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The in-memory ledger and its mirror in slot storage.
//!
//! A store is built with [`FinanceStore::new`], restored with
//! [`FinanceStore::load`] and only then writes through to storage on every
//! mutation. Budget totals are derived from the savings records linked to
//! each budget, so every cascade ends with a recompute of the budgets it
//! touched.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::models::{
    default_categories, Budget, Category, DebtStatus, Debtor, Kind, NewBudget, NewCategory,
    NewDebtor, NewSavingsTransaction, NewTransaction, SavingsTransaction, Transaction,
};
use crate::storage::{Slot, SlotStorage};

/// Hands out millisecond-timestamp identifiers that never repeat.
#[derive(Debug, Default)]
struct IdGen {
    last: i64,
}

impl IdGen {
    fn next(&mut self) -> String {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_ms: i64) -> String {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        id.to_string()
    }

    fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<i64>() {
            self.last = self.last.max(n);
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    /// Slots read successfully, with their item counts.
    pub restored: Vec<(Slot, usize)>,
    /// Slots that could not be read or decoded and were reset.
    pub failed: Vec<(Slot, String)>,
    /// True when the category slot was (re)written with the default seed.
    pub seeded_categories: bool,
    /// Budgets whose stored total disagreed with their savings records.
    pub reconciled_budgets: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.reconciled_budgets.is_empty()
    }

    pub fn failed_slot(&self, slot: Slot) -> bool {
        self.failed.iter().any(|(s, _)| *s == slot)
    }
}

pub struct FinanceStore<S: SlotStorage> {
    storage: S,
    ready: bool,
    ids: IdGen,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
    savings: Vec<SavingsTransaction>,
    debtors: Vec<Debtor>,
}

impl<S: SlotStorage> FinanceStore<S> {
    pub fn new(storage: S) -> Self {
        FinanceStore {
            storage,
            ready: false,
            ids: IdGen::default(),
            transactions: Vec::new(),
            categories: default_categories(),
            budgets: Vec::new(),
            savings: Vec::new(),
            debtors: Vec::new(),
        }
    }

    /// Constructs and loads in one step, logging the load outcome.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        let report = store.load();
        if !report.is_clean() {
            warn!(
                failed = report.failed.len(),
                reconciled = report.reconciled_budgets.len(),
                "store opened with recovered state"
            );
        }
        store
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Restores every slot independently; a slot that fails to decode falls
    /// back to its empty (or seeded) state without affecting the others.
    pub fn load(&mut self) -> LoadReport {
        let mut report = LoadReport::default();

        self.transactions = self
            .restore(Slot::Transactions, &mut report)
            .unwrap_or_default();

        self.categories = match self.restore(Slot::Categories, &mut report) {
            Some(categories) => categories,
            None => {
                let seed = default_categories();
                match codec::encode(&seed).and_then(|p| self.storage.write(Slot::Categories, &p)) {
                    Ok(()) => info!(count = seed.len(), "seeded default categories"),
                    Err(e) => error!(error = %e, "could not write default categories"),
                }
                report.seeded_categories = true;
                seed
            }
        };

        self.budgets = self.restore(Slot::Budgets, &mut report).unwrap_or_default();
        self.savings = self
            .restore(Slot::SavingsTransactions, &mut report)
            .unwrap_or_default();
        self.debtors = self.restore(Slot::Debtors, &mut report).unwrap_or_default();

        for id in self
            .transactions
            .iter()
            .map(|t| &t.id)
            .chain(self.categories.iter().map(|c| &c.id))
            .chain(self.budgets.iter().map(|b| &b.id))
            .chain(self.savings.iter().map(|s| &s.id))
            .chain(self.debtors.iter().map(|d| &d.id))
        {
            self.ids.observe(id);
        }

        report.reconciled_budgets = self.reconcile_budgets();
        self.ready = true;

        if !report.reconciled_budgets.is_empty() {
            if let Err(e) = self.persist(Slot::Budgets) {
                error!(error = %e, "could not persist reconciled budgets");
            }
        }
        info!(
            transactions = self.transactions.len(),
            categories = self.categories.len(),
            budgets = self.budgets.len(),
            debtors = self.debtors.len(),
            "store ready"
        );
        report
    }

    fn restore<T: DeserializeOwned>(&self, slot: Slot, report: &mut LoadReport) -> Option<Vec<T>> {
        let read = self
            .storage
            .read(slot)
            .and_then(|payload| payload.map(|p| codec::decode::<T>(&p)).transpose());
        match read {
            Ok(Some(items)) => {
                debug!(slot = %slot, count = items.len(), "restored slot");
                report.restored.push((slot, items.len()));
                Some(items)
            }
            Ok(None) => {
                debug!(slot = %slot, "slot absent");
                None
            }
            Err(e) => {
                error!(slot = %slot, error = %e, "failed to load slot, falling back to defaults");
                report.failed.push((slot, e.to_string()));
                None
            }
        }
    }

    fn reconcile_budgets(&mut self) -> Vec<String> {
        let mut drifted = Vec::new();
        for budget in self.budgets.iter_mut() {
            let total = linked_total(&self.savings, &budget.id);
            let completed = total >= budget.target_amount;
            if total != budget.accumulated || completed != budget.completed {
                warn!(
                    budget = %budget.id,
                    stored = %budget.accumulated,
                    derived = %total,
                    "budget total disagrees with its savings records"
                );
                budget.set_accumulated(total);
                drifted.push(budget.id.clone());
            }
        }
        drifted
    }

    fn persist(&mut self, slot: Slot) -> StoreResult<()> {
        if !self.ready {
            return Ok(());
        }
        let payload = match slot {
            Slot::Transactions => codec::encode(&self.transactions),
            Slot::Categories => codec::encode(&self.categories),
            Slot::Budgets => codec::encode(&self.budgets),
            Slot::SavingsTransactions => codec::encode(&self.savings),
            Slot::Debtors => codec::encode(&self.debtors),
        };
        payload
            .and_then(|p| self.storage.write(slot, &p))
            .map_err(|e| StoreError::Persist {
                slot,
                source: Box::new(e),
            })
    }

    /// Writes every slot, reporting the first failure after trying them all.
    fn persist_all(&mut self, slots: &[Slot]) -> StoreResult<()> {
        let mut first_err = None;
        for slot in slots {
            if let Err(e) = self.persist(*slot) {
                error!(error = %e, "persist failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn recompute_budget(&mut self, budget_id: &str) {
        let total = linked_total(&self.savings, budget_id);
        if let Some(b) = self.budgets.iter_mut().find(|b| b.id == budget_id) {
            b.set_accumulated(total);
        }
    }

    /// Index of the savings record echoing `tx`: the linked one first, then an
    /// unlinked record on the same budget at the same instant, preferring one
    /// with the same amount.
    fn echo_of(&self, tx: &Transaction) -> Option<usize> {
        if let Some(i) = self
            .savings
            .iter()
            .position(|s| s.transaction_id.as_deref() == Some(tx.id.as_str()))
        {
            return Some(i);
        }
        let budget_id = tx.savings_budget()?;
        let unlinked = |s: &SavingsTransaction| {
            s.transaction_id.is_none() && s.budget_id == budget_id && s.date == tx.date
        };
        self.savings
            .iter()
            .position(|s| unlinked(s) && s.amount == tx.amount)
            .or_else(|| self.savings.iter().position(|s| unlinked(s)))
    }

    fn known_budget<'a>(&self, tx: &'a Transaction) -> Option<&'a str> {
        tx.savings_budget().filter(|b| self.budget(b).is_some())
    }

    // ---- transactions ----

    pub fn add_transaction(&mut self, data: NewTransaction) -> StoreResult<String> {
        let id = self.ids.next();
        let tx = Transaction::from_new(id.clone(), data.normalized());
        let mut touched = vec![Slot::Transactions];

        if let Some(budget_id) = self.known_budget(&tx).map(str::to_string) {
            let record = SavingsTransaction {
                id: self.ids.next(),
                budget_id: budget_id.clone(),
                amount: tx.amount,
                date: tx.date,
                description: non_empty(&tx.description),
                transaction_id: Some(id.clone()),
            };
            self.savings.push(record);
            self.recompute_budget(&budget_id);
            debug!(transaction = %id, budget = %budget_id, amount = %tx.amount, "savings deposit");
            touched.extend([Slot::Budgets, Slot::SavingsTransactions]);
        } else if let Some(budget_id) = tx.savings_budget() {
            warn!(
                transaction = %id,
                budget = %budget_id,
                "savings transaction references unknown budget"
            );
        }

        self.transactions.push(tx);
        self.persist_all(&touched)?;
        Ok(id)
    }

    pub fn edit_transaction(&mut self, id: &str, data: NewTransaction) -> StoreResult<bool> {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let old = self.transactions[pos].clone();
        let updated = Transaction::from_new(id.to_string(), data.normalized());

        let echo = self.echo_of(&old);
        let new_budget = self.known_budget(&updated).map(str::to_string);
        let cascades = echo.is_some() || new_budget.is_some() || old.savings_budget().is_some();

        match (echo, new_budget.as_deref()) {
            (Some(i), Some(budget_id)) => {
                let record = &mut self.savings[i];
                record.budget_id = budget_id.to_string();
                record.amount = updated.amount;
                record.date = updated.date;
                record.description = non_empty(&updated.description);
                record.transaction_id = Some(id.to_string());
            }
            (None, Some(budget_id)) => {
                let record = SavingsTransaction {
                    id: self.ids.next(),
                    budget_id: budget_id.to_string(),
                    amount: updated.amount,
                    date: updated.date,
                    description: non_empty(&updated.description),
                    transaction_id: Some(id.to_string()),
                };
                self.savings.push(record);
            }
            (Some(i), None) => {
                let removed = self.savings.remove(i);
                debug!(record = %removed.id, "dropped savings echo of edited transaction");
            }
            (None, None) => {}
        }

        if let Some(b) = old.savings_budget() {
            self.recompute_budget(b);
        }
        if let Some(b) = new_budget.as_deref() {
            self.recompute_budget(b);
        }
        self.transactions[pos] = updated;

        let mut touched = vec![Slot::Transactions];
        if cascades {
            touched.extend([Slot::Budgets, Slot::SavingsTransactions]);
        }
        self.persist_all(&touched)?;
        Ok(true)
    }

    pub fn delete_transaction(&mut self, id: &str) -> StoreResult<bool> {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let tx = self.transactions.remove(pos);

        let before = self.savings.len();
        let linked = self
            .savings
            .iter()
            .any(|s| s.transaction_id.as_deref() == Some(id));
        if linked {
            self.savings
                .retain(|s| s.transaction_id.as_deref() != Some(id));
        } else if let Some(budget_id) = tx.savings_budget() {
            self.savings.retain(|s| {
                !(s.transaction_id.is_none()
                    && s.budget_id == budget_id
                    && s.date == tx.date
                    && s.amount == tx.amount)
            });
        }
        let removed = before - self.savings.len();

        let mut touched = vec![Slot::Transactions];
        if let Some(b) = tx.savings_budget() {
            self.recompute_budget(b);
            touched.extend([Slot::Budgets, Slot::SavingsTransactions]);
            debug!(transaction = %id, budget = %b, records = removed, "reversed savings deposit");
        } else if removed > 0 {
            touched.push(Slot::SavingsTransactions);
        }
        self.persist_all(&touched)?;
        Ok(true)
    }

    /// Only expenses carrying a debtor have a debt status to change.
    pub fn set_debt_status(&mut self, id: &str, status: DebtStatus) -> StoreResult<bool> {
        let Some(tx) = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id && t.kind == Kind::Expense && t.has_debtor())
        else {
            return Ok(false);
        };
        tx.debt_status = Some(status);
        self.persist(Slot::Transactions)?;
        Ok(true)
    }

    // ---- categories ----

    pub fn add_category(&mut self, data: NewCategory) -> StoreResult<String> {
        let id = self.ids.next();
        self.categories.push(Category {
            id: id.clone(),
            name: data.name,
            kind: data.kind,
        });
        self.persist(Slot::Categories)?;
        Ok(id)
    }

    pub fn edit_category(&mut self, id: &str, data: NewCategory) -> StoreResult<bool> {
        let Some(c) = self.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        c.name = data.name;
        c.kind = data.kind;
        self.persist(Slot::Categories)?;
        Ok(true)
    }

    /// Transactions keep pointing at the removed id.
    pub fn delete_category(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return Ok(false);
        }
        self.persist(Slot::Categories)?;
        Ok(true)
    }

    // ---- budgets ----

    pub fn add_budget(&mut self, data: NewBudget) -> StoreResult<String> {
        let id = self.ids.next();
        self.budgets.push(Budget::from_new(id.clone(), data));
        self.persist(Slot::Budgets)?;
        Ok(id)
    }

    pub fn edit_budget(&mut self, id: &str, data: NewBudget) -> StoreResult<bool> {
        let Some(b) = self.budgets.iter_mut().find(|b| b.id == id) else {
            return Ok(false);
        };
        let accumulated = b.accumulated;
        *b = Budget::from_new(id.to_string(), data);
        b.set_accumulated(accumulated);
        self.persist(Slot::Budgets)?;
        Ok(true)
    }

    /// Drops the budget with its deposit records and unlinks transactions
    /// that pointed at it; the transactions themselves stay.
    pub fn delete_budget(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.budgets.len();
        self.budgets.retain(|b| b.id != id);
        let existed = self.budgets.len() != before;

        let records_before = self.savings.len();
        self.savings.retain(|s| s.budget_id != id);
        let records = records_before - self.savings.len();

        let mut unlinked = 0;
        for tx in self
            .transactions
            .iter_mut()
            .filter(|t| t.budget_id.as_deref() == Some(id))
        {
            tx.budget_id = None;
            unlinked += 1;
        }

        if !existed && records == 0 && unlinked == 0 {
            return Ok(false);
        }
        debug!(budget = %id, records, unlinked, "deleted budget");
        self.persist_all(&[
            Slot::Budgets,
            Slot::SavingsTransactions,
            Slot::Transactions,
        ])?;
        Ok(existed)
    }

    /// Records a deposit that has no ledger entry behind it. Returns `None`
    /// when the budget does not exist.
    pub fn add_savings_transaction(
        &mut self,
        data: NewSavingsTransaction,
    ) -> StoreResult<Option<String>> {
        if self.budget(&data.budget_id).is_none() {
            warn!(budget = %data.budget_id, "deposit to unknown budget ignored");
            return Ok(None);
        }
        let id = self.ids.next();
        let budget_id = data.budget_id.clone();
        self.savings.push(SavingsTransaction {
            id: id.clone(),
            budget_id: data.budget_id,
            amount: data.amount,
            date: data.date,
            description: data.description,
            transaction_id: None,
        });
        self.recompute_budget(&budget_id);
        self.persist_all(&[Slot::Budgets, Slot::SavingsTransactions])?;
        Ok(Some(id))
    }

    pub fn savings_for_budget(&self, budget_id: &str) -> Vec<&SavingsTransaction> {
        self.savings
            .iter()
            .filter(|s| s.budget_id == budget_id)
            .collect()
    }

    // ---- debtors ----

    pub fn add_debtor(&mut self, data: NewDebtor) -> StoreResult<String> {
        let id = self.ids.next();
        self.debtors.push(Debtor {
            id: id.clone(),
            name: data.name,
            amount: data.amount,
            date: data.date,
            description: data.description,
            status: data.status,
        });
        self.persist(Slot::Debtors)?;
        Ok(id)
    }

    pub fn edit_debtor(&mut self, id: &str, data: NewDebtor) -> StoreResult<bool> {
        let Some(d) = self.debtors.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        *d = Debtor {
            id: id.to_string(),
            name: data.name,
            amount: data.amount,
            date: data.date,
            description: data.description,
            status: data.status,
        };
        self.persist(Slot::Debtors)?;
        Ok(true)
    }

    pub fn delete_debtor(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.debtors.len();
        self.debtors.retain(|d| d.id != id);
        if self.debtors.len() == before {
            return Ok(false);
        }
        self.persist(Slot::Debtors)?;
        Ok(true)
    }

    pub fn set_debtor_status(&mut self, id: &str, status: DebtStatus) -> StoreResult<bool> {
        let Some(d) = self.debtors.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        d.status = status;
        self.persist(Slot::Debtors)?;
        Ok(true)
    }

    // ---- reset ----

    /// Clears every slot and collection; categories go back to the seed.
    pub fn reset_all(&mut self) -> StoreResult<()> {
        let mut first_err = None;
        for slot in Slot::ALL {
            if let Err(e) = self.storage.remove(slot) {
                error!(slot = %slot, error = %e, "could not clear slot");
                first_err.get_or_insert(e);
            }
        }
        self.transactions.clear();
        self.categories = default_categories();
        self.budgets.clear();
        self.savings.clear();
        self.debtors.clear();
        info!("all data cleared");

        if let Some(e) = first_err {
            return Err(e);
        }
        self.persist(Slot::Categories)
    }

    // ---- read accessors ----

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn savings_transactions(&self) -> &[SavingsTransaction] {
        &self.savings
    }

    pub fn debtors(&self) -> &[Debtor] {
        &self.debtors
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn debtor(&self, id: &str) -> Option<&Debtor> {
        self.debtors.iter().find(|d| d.id == id)
    }
}

fn linked_total(savings: &[SavingsTransaction], budget_id: &str) -> Decimal {
    savings
        .iter()
        .filter(|s| s.budget_id == budget_id)
        .map(|s| s.amount)
        .sum()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_when_clock_stalls() {
        let mut ids = IdGen::default();
        assert_eq!(ids.next_at(1_000), "1000");
        assert_eq!(ids.next_at(1_000), "1001");
        assert_eq!(ids.next_at(999), "1002");
        assert_eq!(ids.next_at(5_000), "5000");
    }

    #[test]
    fn observed_ids_raise_the_floor() {
        let mut ids = IdGen::default();
        ids.observe("food");
        ids.observe("7000");
        assert_eq!(ids.next_at(10), "7001");
    }

    #[test]
    fn largest_possible_id_does_not_overflow() {
        let mut ids = IdGen::default();
        ids.observe(&i64::MAX.to_string());
        assert_eq!(ids.next_at(10), i64::MAX.to_string());
    }
}
