// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::codec::{tagged_date, tagged_date_option};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
    Savings,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
            Kind::Savings => "savings",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            "savings" => Ok(Kind::Savings),
            other => Err(format!(
                "Invalid kind '{}', expected income|expense|savings",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    #[default]
    Pending,
    Paid,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Pending => "pending",
            DebtStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebtStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(DebtStatus::Pending),
            "paid" => Ok(DebtStatus::Paid),
            other => Err(format!("Invalid status '{}', expected pending|paid", other)),
        }
    }
}

/// A ledger entry. Debt fields only mean something on expenses, the budget
/// reference only on savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(with = "tagged_date")]
    pub date: DateTime<Utc>,
    pub description: String,
    pub category: String,
    pub kind: Kind,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_status: Option<DebtStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
}

impl Transaction {
    pub fn from_new(id: String, t: NewTransaction) -> Self {
        Transaction {
            id,
            date: t.date,
            description: t.description,
            category: t.category,
            kind: t.kind,
            amount: t.amount,
            debtor_name: t.debtor_name,
            debtor_amount: t.debtor_amount,
            debt_status: t.debt_status,
            budget_id: t.budget_id,
        }
    }

    /// Budget this entry contributes to, if it is a savings deposit.
    pub fn savings_budget(&self) -> Option<&str> {
        match self.kind {
            Kind::Savings => self.budget_id.as_deref(),
            _ => None,
        }
    }

    pub fn has_debtor(&self) -> bool {
        self.debtor_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn debt_value(&self) -> Decimal {
        self.debtor_amount.unwrap_or(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(with = "tagged_date")]
    pub date: DateTime<Utc>,
    pub description: String,
    pub category: String,
    pub kind: Kind,
    pub amount: Decimal,
    #[serde(default)]
    pub debtor_name: Option<String>,
    #[serde(default)]
    pub debtor_amount: Option<Decimal>,
    #[serde(default)]
    pub debt_status: Option<DebtStatus>,
    #[serde(default)]
    pub budget_id: Option<String>,
}

impl NewTransaction {
    pub fn new(
        date: DateTime<Utc>,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: Kind,
        amount: Decimal,
    ) -> Self {
        NewTransaction {
            date,
            description: description.into(),
            category: category.into(),
            kind,
            amount,
            debtor_name: None,
            debtor_amount: None,
            debt_status: None,
            budget_id: None,
        }
    }

    pub fn with_budget(mut self, budget_id: impl Into<String>) -> Self {
        self.budget_id = Some(budget_id.into());
        self
    }

    pub fn with_debtor(mut self, name: impl Into<String>) -> Self {
        self.debtor_name = Some(name.into());
        self
    }

    /// Drops fields that do not apply to the kind and fills debt defaults.
    pub fn normalized(mut self) -> Self {
        if self.kind != Kind::Expense {
            self.debtor_name = None;
            self.debtor_amount = None;
            self.debt_status = None;
        } else if self.debtor_name.as_deref().is_some_and(|n| !n.is_empty()) {
            self.debtor_amount.get_or_insert(self.amount);
            self.debt_status.get_or_insert(DebtStatus::Pending);
        } else {
            self.debtor_name = None;
            self.debtor_amount = None;
            self.debt_status = None;
        }
        if self.kind != Kind::Savings {
            self.budget_id = None;
        }
        self
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(t: &Transaction) -> Self {
        NewTransaction {
            date: t.date,
            description: t.description.clone(),
            category: t.category.clone(),
            kind: t.kind,
            amount: t.amount,
            debtor_name: t.debtor_name.clone(),
            debtor_amount: t.debtor_amount,
            debt_status: t.debt_status,
            budget_id: t.budget_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub kind: Kind,
}

/// Savings goal. `accumulated` and `completed` are maintained by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub accumulated: Decimal,
    #[serde(with = "tagged_date")]
    pub start_date: DateTime<Utc>,
    #[serde(
        default,
        with = "tagged_date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Budget {
    pub fn from_new(id: String, b: NewBudget) -> Self {
        Budget {
            id,
            name: b.name,
            description: b.description,
            target_amount: b.target_amount,
            accumulated: Decimal::ZERO,
            start_date: b.start_date,
            end_date: b.end_date,
            completed: false,
            category: b.category,
        }
    }

    pub fn set_accumulated(&mut self, accumulated: Decimal) {
        self.accumulated = accumulated.max(Decimal::ZERO);
        self.completed = self.accumulated >= self.target_amount;
    }

    /// Progress toward the target, 0 when the target is zero.
    pub fn percent(&self) -> Decimal {
        if self.target_amount > Decimal::ZERO {
            self.accumulated / self.target_amount * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount: Decimal,
    #[serde(with = "tagged_date")]
    pub start_date: DateTime<Utc>,
    #[serde(default, with = "tagged_date_option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<&Budget> for NewBudget {
    fn from(b: &Budget) -> Self {
        NewBudget {
            name: b.name.clone(),
            description: b.description.clone(),
            target_amount: b.target_amount,
            start_date: b.start_date,
            end_date: b.end_date,
            category: b.category.clone(),
        }
    }
}

/// One deposit toward a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsTransaction {
    pub id: String,
    pub budget_id: String,
    pub amount: Decimal,
    #[serde(with = "tagged_date")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ledger entry this deposit echoes; absent for direct deposits and
    /// records written before the link existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsTransaction {
    pub budget_id: String,
    pub amount: Decimal,
    #[serde(with = "tagged_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debtor {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    #[serde(with = "tagged_date")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DebtStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDebtor {
    pub name: String,
    pub amount: Decimal,
    #[serde(with = "tagged_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DebtStatus,
}

impl From<&Debtor> for NewDebtor {
    fn from(d: &Debtor) -> Self {
        NewDebtor {
            name: d.name.clone(),
            amount: d.amount,
            date: d.date,
            description: d.description.clone(),
            status: d.status,
        }
    }
}

/// Categories present on first run.
pub fn default_categories() -> Vec<Category> {
    let seed: [(&str, &str, Kind); 13] = [
        ("food", "Food", Kind::Expense),
        ("housing", "Housing", Kind::Expense),
        ("transport", "Transport", Kind::Expense),
        ("health", "Health", Kind::Expense),
        ("education", "Education", Kind::Expense),
        ("leisure", "Leisure", Kind::Expense),
        ("other-expense", "Other", Kind::Expense),
        ("salary", "Salary", Kind::Income),
        ("freelance", "Freelance", Kind::Income),
        ("investments", "Investments", Kind::Income),
        ("sales", "Sales", Kind::Income),
        ("other-income", "Other", Kind::Income),
        ("savings", "Savings", Kind::Savings),
    ];
    seed.into_iter()
        .map(|(id, name, kind)| Category {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        })
        .collect()
}
