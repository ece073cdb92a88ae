// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_enum, required};
use crate::models::{DebtStatus, Kind, NewTransaction, Transaction};
use crate::reports::{Period, category_label, filter_transactions};
use crate::storage::SlotStorage;
use crate::store::FinanceStore;
use crate::utils::{
    fmt_day, fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table, today,
};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<S: SlotStorage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("debt-status", sub)) => debt_status(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds the input from flags, starting from `existing` when editing.
pub fn tx_input(sub: &clap::ArgMatches, existing: Option<&Transaction>) -> Result<NewTransaction> {
    let mut data = match existing {
        Some(t) => NewTransaction::from(t),
        None => NewTransaction::new(
            parse_date(required(sub, "date")?)?,
            "",
            required(sub, "category")?.as_str(),
            parse_enum::<Kind>(required(sub, "kind")?)?,
            parse_amount(required(sub, "amount")?)?,
        ),
    };
    if existing.is_some() {
        if let Some(s) = sub.get_one::<String>("date") {
            data.date = parse_date(s)?;
        }
        if let Some(s) = sub.get_one::<String>("category") {
            data.category = s.clone();
        }
        if let Some(s) = sub.get_one::<String>("kind") {
            data.kind = parse_enum(s)?;
        }
        if let Some(s) = sub.get_one::<String>("amount") {
            data.amount = parse_amount(s)?;
        }
    }
    if let Some(s) = sub.get_one::<String>("description") {
        data.description = s.clone();
    }
    if let Some(s) = sub.get_one::<String>("debtor") {
        data.debtor_name = Some(s.clone());
    }
    if let Some(s) = sub.get_one::<String>("debt-amount") {
        data.debtor_amount = Some(parse_amount(s)?);
    }
    if let Some(s) = sub.get_one::<String>("debt-status") {
        data.debt_status = Some(parse_enum(s)?);
    }
    if let Some(s) = sub.get_one::<String>("budget") {
        data.budget_id = Some(s.clone());
    }
    if flag(sub, "no-debtor") {
        data.debtor_name = None;
        data.debtor_amount = None;
        data.debt_status = None;
    }
    if flag(sub, "no-budget") {
        data.budget_id = None;
    }
    Ok(data)
}

// Only `tx edit` defines the clearing flags.
fn flag(sub: &clap::ArgMatches, name: &str) -> bool {
    matches!(sub.try_get_one::<bool>(name), Ok(Some(true)))
}

fn add<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let data = tx_input(sub, None)?;
    if let Some(b) = data.budget_id.as_deref().filter(|_| data.kind == Kind::Savings) {
        if store.budget(b).is_none() {
            eprintln!("Warning: budget '{}' not found, deposit not counted", b);
        }
    }
    let (kind, amount, date) = (data.kind, data.amount, data.date);
    let id = store.add_transaction(data)?;
    println!(
        "Recorded {} {} on {} (id: {})",
        kind,
        fmt_money(&amount),
        fmt_day(&date),
        id
    );
    Ok(())
}

fn edit<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let Some(existing) = store.transaction(id) else {
        bail!("Transaction '{}' not found", id);
    };
    let data = tx_input(sub, Some(existing))?;
    store.edit_transaction(id, data)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    if !store.delete_transaction(id)? {
        bail!("Transaction '{}' not found", id);
    }
    println!("Removed transaction {}", id);
    Ok(())
}

fn debt_status<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let status: DebtStatus = parse_enum(required(sub, "status")?)?;
    if store.transaction(id).is_none() {
        bail!("Transaction '{}' not found", id);
    }
    if !store.set_debt_status(id, status)? {
        bail!("Transaction '{}' has no debtor", id);
    }
    println!("Debt on {} marked {}", id, status);
    Ok(())
}

fn list<S: SlotStorage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.debtor.clone(),
                    r.budget.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Description", "Category", "Kind", "Amount", "Debtor", "Budget"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub amount: String,
    pub debtor: String,
    pub budget: String,
}

pub fn query_rows<S: SlotStorage>(
    store: &FinanceStore<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let period: Period = match sub.get_one::<String>("period") {
        Some(p) => parse_enum(p)?,
        None => Period::All,
    };
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| parse_enum::<Kind>(k))
        .transpose()?;

    let mut selected = filter_transactions(store.transactions(), period, kind, today());
    selected.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        selected.truncate(*limit);
    }

    let data = selected
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: fmt_day(&t.date),
            description: t.description.clone(),
            category: category_label(store.categories(), &t.category).to_string(),
            kind: t.kind.to_string(),
            amount: fmt_money(&t.amount),
            debtor: match (&t.debtor_name, t.debt_status) {
                (Some(name), Some(status)) => {
                    format!("{} ({} {})", name, fmt_money(&t.debt_value()), status)
                }
                (Some(name), None) => name.clone(),
                _ => String::new(),
            },
            budget: t
                .budget_id
                .as_deref()
                .map(|b| store.budget(b).map(|x| x.name.as_str()).unwrap_or(b))
                .unwrap_or_default()
                .to_string(),
        })
        .collect();
    Ok(data)
}
