// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_enum, required};
use crate::models::{DebtStatus, Debtor, NewDebtor};
use crate::storage::SlotStorage;
use crate::store::FinanceStore;
use crate::utils::{
    fmt_day, fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table,
};
use anyhow::{Result, bail};

pub fn handle<S: SlotStorage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let data = debtor_input(sub, None)?;
            let (name, amount) = (data.name.clone(), data.amount);
            let id = store.add_debtor(data)?;
            println!("{} owes {} (id: {})", name, fmt_money(&amount), id);
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let Some(existing) = store.debtor(id) else {
                bail!("Debtor '{}' not found", id);
            };
            let data = debtor_input(sub, Some(existing))?;
            store.edit_debtor(id, data)?;
            println!("Updated debtor {}", id);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            if !store.delete_debtor(id)? {
                bail!("Debtor '{}' not found", id);
            }
            println!("Removed debtor {}", id);
        }
        Some(("status", sub)) => {
            let id = required(sub, "id")?;
            let status: DebtStatus = parse_enum(required(sub, "status")?)?;
            if !store.set_debtor_status(id, status)? {
                bail!("Debtor '{}' not found", id);
            }
            println!("Debtor {} marked {}", id, status);
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn debtor_input(sub: &clap::ArgMatches, existing: Option<&Debtor>) -> Result<NewDebtor> {
    let mut data = match existing {
        Some(d) => NewDebtor::from(d),
        None => NewDebtor {
            name: required(sub, "name")?.trim().to_string(),
            amount: parse_amount(required(sub, "amount")?)?,
            date: parse_date(required(sub, "date")?)?,
            description: None,
            status: DebtStatus::Pending,
        },
    };
    if existing.is_some() {
        if let Some(s) = sub.get_one::<String>("name") {
            data.name = s.trim().to_string();
        }
        if let Some(s) = sub.get_one::<String>("amount") {
            data.amount = parse_amount(s)?;
        }
        if let Some(s) = sub.get_one::<String>("date") {
            data.date = parse_date(s)?;
        }
    }
    if let Some(s) = sub.get_one::<String>("description") {
        data.description = Some(s.clone());
    }
    if let Some(s) = sub.get_one::<String>("status") {
        data.status = parse_enum(s)?;
    }
    Ok(data)
}

fn list<S: SlotStorage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut debtors: Vec<&Debtor> = store.debtors().iter().collect();
    debtors.sort_by(|a, b| b.date.cmp(&a.date));
    if !maybe_print_json(json_flag, jsonl_flag, &debtors)? {
        let rows = debtors
            .iter()
            .map(|d| {
                vec![
                    d.id.clone(),
                    d.name.clone(),
                    fmt_money(&d.amount),
                    fmt_day(&d.date),
                    d.status.to_string(),
                    d.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Amount", "Date", "Status", "Description"],
                rows,
            )
        );
    }
    Ok(())
}
