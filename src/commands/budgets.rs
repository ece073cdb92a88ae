// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::required;
use crate::models::{Budget, NewBudget, NewSavingsTransaction};
use crate::reports::budget_progress;
use crate::storage::SlotStorage;
use crate::store::FinanceStore;
use crate::utils::{
    fmt_day, fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table,
};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<S: SlotStorage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("deposit", sub)) => deposit(store, sub)?,
        Some(("deposits", sub)) => deposits(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn budget_input(sub: &clap::ArgMatches, existing: Option<&Budget>) -> Result<NewBudget> {
    let mut data = match existing {
        Some(b) => NewBudget::from(b),
        None => NewBudget {
            name: required(sub, "name")?.trim().to_string(),
            description: None,
            target_amount: parse_amount(required(sub, "target")?)?,
            start_date: parse_date(required(sub, "start")?)?,
            end_date: None,
            category: None,
        },
    };
    if existing.is_some() {
        if let Some(s) = sub.get_one::<String>("name") {
            data.name = s.trim().to_string();
        }
        if let Some(s) = sub.get_one::<String>("target") {
            data.target_amount = parse_amount(s)?;
        }
        if let Some(s) = sub.get_one::<String>("start") {
            data.start_date = parse_date(s)?;
        }
    }
    if let Some(s) = sub.get_one::<String>("end") {
        let end = parse_date(s)?;
        if end < data.start_date {
            bail!("End date {} is before start date {}", fmt_day(&end), fmt_day(&data.start_date));
        }
        data.end_date = Some(end);
    }
    if let Some(s) = sub.get_one::<String>("description") {
        data.description = Some(s.clone());
    }
    if let Some(s) = sub.get_one::<String>("category") {
        data.category = Some(s.clone());
    }
    Ok(data)
}

fn add<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let data = budget_input(sub, None)?;
    let (name, target) = (data.name.clone(), data.target_amount);
    let id = store.add_budget(data)?;
    println!(
        "Created goal '{}' targeting {} (id: {})",
        name,
        fmt_money(&target),
        id
    );
    Ok(())
}

fn edit<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let Some(existing) = store.budget(id) else {
        bail!("Budget '{}' not found", id);
    };
    let data = budget_input(sub, Some(existing))?;
    store.edit_budget(id, data)?;
    println!("Updated goal {}", id);
    Ok(())
}

fn remove<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    if !store.delete_budget(id)? {
        bail!("Budget '{}' not found", id);
    }
    println!("Removed goal {} and its deposits", id);
    Ok(())
}

fn list<S: SlotStorage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let progress = budget_progress(store.budgets());
    if !maybe_print_json(json_flag, jsonl_flag, &progress)? {
        let rows = progress
            .iter()
            .map(|p| {
                let end = store
                    .budget(&p.id)
                    .and_then(|b| b.end_date.as_ref())
                    .map(fmt_day)
                    .unwrap_or_default();
                vec![
                    p.id.clone(),
                    p.name.clone(),
                    fmt_money(&p.accumulated),
                    fmt_money(&p.target),
                    format!("{:.1}%", p.percent),
                    end,
                    if p.completed { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Goal", "Saved", "Target", "Progress", "Deadline", "Done"],
                rows,
            )
        );
    }
    Ok(())
}

fn deposit<S: SlotStorage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let budget_id = required(sub, "id")?.clone();
    let data = NewSavingsTransaction {
        budget_id: budget_id.clone(),
        amount: parse_amount(required(sub, "amount")?)?,
        date: parse_date(required(sub, "date")?)?,
        description: sub.get_one::<String>("description").cloned(),
    };
    let amount = data.amount;
    if store.add_savings_transaction(data)?.is_none() {
        bail!("Budget '{}' not found", budget_id);
    }
    println!("Deposited {} toward {}", fmt_money(&amount), budget_id);
    Ok(())
}

#[derive(Serialize)]
pub struct DepositRow {
    pub id: String,
    pub date: String,
    pub amount: String,
    pub description: String,
    pub transaction: String,
}

pub fn deposit_rows<S: SlotStorage>(store: &FinanceStore<S>, budget_id: &str) -> Vec<DepositRow> {
    let mut records = store.savings_for_budget(budget_id);
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
        .into_iter()
        .map(|s| DepositRow {
            id: s.id.clone(),
            date: fmt_day(&s.date),
            amount: fmt_money(&s.amount),
            description: s.description.clone().unwrap_or_default(),
            transaction: s.transaction_id.clone().unwrap_or_default(),
        })
        .collect()
}

fn deposits<S: SlotStorage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = required(sub, "id")?;
    if store.budget(id).is_none() {
        bail!("Budget '{}' not found", id);
    }
    let data = deposit_rows(store, id);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                    r.transaction.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Amount", "Description", "Transaction"], rows)
        );
    }
    Ok(())
}
