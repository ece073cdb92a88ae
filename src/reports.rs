// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregates over the store's collections. Nothing here is
//! persisted; every call recomputes from the slices it is given.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::{Budget, Category, DebtStatus, Debtor, Kind, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    CurrentMonth,
    PreviousMonth,
    Last3Months,
    Last6Months,
    ThisYear,
    #[default]
    All,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::CurrentMonth => "Current month",
            Period::PreviousMonth => "Previous month",
            Period::Last3Months => "Last 3 months",
            Period::Last6Months => "Last 6 months",
            Period::ThisYear => "This year",
            Period::All => "All time",
        }
    }

    /// Width of the monthly chart that goes with this period.
    pub fn trailing_months(&self) -> usize {
        match self {
            Period::Last3Months => 3,
            Period::ThisYear => 12,
            _ => 6,
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::CurrentMonth => same_month(date, today),
            Period::PreviousMonth => same_month(date, first_of_month(today) - Months::new(1)),
            Period::Last3Months => date >= months_before(today, 3),
            Period::Last6Months => date >= months_before(today, 6),
            Period::ThisYear => date.year() == today.year(),
            Period::All => true,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" | "month" => Ok(Period::CurrentMonth),
            "previous" => Ok(Period::PreviousMonth),
            "last3" => Ok(Period::Last3Months),
            "last6" => Ok(Period::Last6Months),
            "year" => Ok(Period::ThisYear),
            "all" => Ok(Period::All),
            other => Err(format!(
                "Invalid period '{}', expected current|previous|last3|last6|year|all",
                other
            )),
        }
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

fn months_before(d: NaiveDate, n: u32) -> NaiveDate {
    d.checked_sub_months(Months::new(n)).unwrap_or(NaiveDate::MIN)
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    period: Period,
    kind: Option<Kind>,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| period.contains(t.date.date_naive(), today))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
    /// Income minus expenses; savings are not counted.
    pub balance: Decimal,
    pub count: usize,
}

pub fn period_totals<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for t in transactions {
        match t.kind {
            Kind::Income => totals.income += t.amount,
            Kind::Expense => totals.expense += t.amount,
            Kind::Savings => totals.savings += t.amount,
        }
        totals.count += 1;
    }
    totals.balance = totals.income - totals.expense;
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
    pub balance: Decimal,
}

/// The `months` calendar months ending with the month of `today`, oldest
/// first. Months without activity are present with zeros.
pub fn monthly_series(
    transactions: &[Transaction],
    today: NaiveDate,
    months: usize,
) -> Vec<MonthlyRow> {
    let current = first_of_month(today);
    let starts: Vec<NaiveDate> = (0..months)
        .rev()
        .map(|back| {
            u32::try_from(back)
                .ok()
                .and_then(|b| current.checked_sub_months(Months::new(b)))
                .unwrap_or(NaiveDate::MIN)
        })
        .collect();

    let mut rows: Vec<MonthlyRow> = starts
        .iter()
        .map(|d| MonthlyRow {
            month: d.format("%Y-%m").to_string(),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            savings: Decimal::ZERO,
            balance: Decimal::ZERO,
        })
        .collect();

    for t in transactions {
        let d = t.date.date_naive();
        if let Some(i) = starts.iter().position(|s| same_month(*s, d)) {
            let row = &mut rows[i];
            match t.kind {
                Kind::Income => row.income += t.amount,
                Kind::Expense => row.expense += t.amount,
                Kind::Savings => row.savings += t.amount,
            }
        }
    }
    for row in rows.iter_mut() {
        row.balance = row.income - row.expense - row.savings;
    }
    rows
}

/// Display name for a category id, or the id itself when it no longer resolves.
pub fn category_label<'a>(categories: &'a [Category], id: &'a str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or(id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category_id: String,
    pub name: String,
    pub kind: Kind,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

pub fn category_breakdown<'a, I>(transactions: I, categories: &[Category]) -> Vec<CategoryRow>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut acc: HashMap<&str, (Decimal, usize, Kind)> = HashMap::new();
    for t in transactions {
        let entry = acc.entry(t.category.as_str()).or_insert_with(|| {
            order.push(t.category.as_str());
            let kind = categories
                .iter()
                .find(|c| c.id == t.category)
                .map(|c| c.kind)
                .unwrap_or(t.kind);
            (Decimal::ZERO, 0, kind)
        });
        entry.0 += t.amount;
        entry.1 += 1;
    }

    let mut rows: Vec<CategoryRow> = order
        .into_iter()
        .map(|id| {
            let (total, count, kind) = acc[id];
            CategoryRow {
                category_id: id.to_string(),
                name: category_label(categories, id).to_string(),
                kind,
                total,
                count,
                average: (total / Decimal::from(count)).round_dp(2),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub id: String,
    pub name: String,
    pub target: Decimal,
    pub accumulated: Decimal,
    pub remaining: Decimal,
    pub percent: Decimal,
    pub completed: bool,
}

impl From<&Budget> for BudgetProgress {
    fn from(b: &Budget) -> Self {
        BudgetProgress {
            id: b.id.clone(),
            name: b.name.clone(),
            target: b.target_amount,
            accumulated: b.accumulated,
            remaining: (b.target_amount - b.accumulated).max(Decimal::ZERO),
            percent: b.percent().round_dp(2),
            completed: b.completed,
        }
    }
}

/// All budgets, least complete first.
pub fn budget_progress(budgets: &[Budget]) -> Vec<BudgetProgress> {
    let mut rows: Vec<BudgetProgress> = budgets.iter().map(BudgetProgress::from).collect();
    rows.sort_by(|a, b| a.percent.cmp(&b.percent));
    rows
}

pub fn open_goals(budgets: &[Budget], limit: usize) -> Vec<BudgetProgress> {
    budget_progress(budgets)
        .into_iter()
        .filter(|b| !b.completed)
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    /// All-time income minus expenses, savings excluded.
    pub total_balance: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub month_regular_expense: Decimal,
    pub month_debtor_expense: Decimal,
    pub month_savings: Decimal,
    pub month_net: Decimal,
    /// Outstanding debts recorded on expense transactions.
    pub pending_debts: Decimal,
}

pub fn dashboard(transactions: &[Transaction], today: NaiveDate) -> Dashboard {
    let mut d = Dashboard::default();
    for t in transactions {
        match t.kind {
            Kind::Income => d.total_balance += t.amount,
            Kind::Expense => d.total_balance -= t.amount,
            Kind::Savings => {}
        }
        if t.has_debtor() && t.debt_status == Some(DebtStatus::Pending) {
            d.pending_debts += t.debt_value();
        }
        if !same_month(t.date.date_naive(), today) {
            continue;
        }
        match t.kind {
            Kind::Income => d.month_income += t.amount,
            Kind::Expense if t.has_debtor() => d.month_debtor_expense += t.amount,
            Kind::Expense => d.month_regular_expense += t.amount,
            Kind::Savings => d.month_savings += t.amount,
        }
    }
    d.month_expense = d.month_regular_expense + d.month_debtor_expense;
    d.month_net = d.month_income - d.month_expense - d.month_savings;
    d
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtorTotals {
    pub pending: Decimal,
    pub paid: Decimal,
    pub pending_count: usize,
}

pub fn debtor_totals(debtors: &[Debtor]) -> DebtorTotals {
    let mut totals = DebtorTotals::default();
    for d in debtors {
        match d.status {
            DebtStatus::Pending => {
                totals.pending += d.amount;
                totals.pending_count += 1;
            }
            DebtStatus::Paid => totals.paid += d.amount,
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn previous_month_wraps_the_year() {
        let today = day(2025, 1, 15);
        assert!(Period::PreviousMonth.contains(day(2024, 12, 31), today));
        assert!(!Period::PreviousMonth.contains(day(2025, 1, 1), today));
    }

    #[test]
    fn trailing_windows_are_inclusive() {
        let today = day(2025, 5, 31);
        assert!(Period::Last3Months.contains(day(2025, 2, 28), today));
        assert!(!Period::Last3Months.contains(day(2025, 2, 27), today));
        assert!(Period::Last6Months.contains(day(2024, 11, 30), today));
    }

    #[test]
    fn period_names_parse() {
        assert_eq!("last3".parse::<Period>().unwrap(), Period::Last3Months);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
