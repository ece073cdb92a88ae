// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::parse_enum;
use crate::models::Kind;
use crate::reports::{
    Period, budget_progress, category_breakdown, dashboard, debtor_totals, filter_transactions,
    monthly_series, open_goals, period_totals,
};
use crate::storage::SlotStorage;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

pub fn handle<S: SlotStorage>(store: &FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub, today())?,
        Some(("monthly", sub)) => monthly(store, sub, today())?,
        Some(("categories", sub)) => categories(store, sub, today())?,
        Some(("budgets", sub)) => budgets(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary<S: SlotStorage>(
    store: &FinanceStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let d = dashboard(store.transactions(), today);
    let debts = debtor_totals(store.debtors());
    let goals = open_goals(store.budgets(), 3);

    let out = json!({ "dashboard": d, "debtors": debts, "openGoals": goals });
    if maybe_print_json(json_flag, jsonl_flag, &out)? {
        return Ok(());
    }

    let rows = vec![
        vec!["Balance (all time)".into(), fmt_money(&d.total_balance)],
        vec!["Income this month".into(), fmt_money(&d.month_income)],
        vec!["Expenses this month".into(), fmt_money(&d.month_expense)],
        vec!["  regular".into(), fmt_money(&d.month_regular_expense)],
        vec!["  owed by others".into(), fmt_money(&d.month_debtor_expense)],
        vec!["Saved this month".into(), fmt_money(&d.month_savings)],
        vec!["Left over this month".into(), fmt_money(&d.month_net)],
        vec!["Pending debts (expenses)".into(), fmt_money(&d.pending_debts)],
        vec![
            format!("Pending debtors ({})", debts.pending_count),
            fmt_money(&debts.pending),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Amount"], rows));

    if !goals.is_empty() {
        let rows = goals
            .iter()
            .map(|g| {
                vec![
                    g.name.clone(),
                    format!("{:.1}%", g.percent),
                    fmt_money(&g.remaining),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Open goal", "Progress", "Remaining"], rows));
    }
    Ok(())
}

fn monthly<S: SlotStorage>(
    store: &FinanceStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&6);
    let series = monthly_series(store.transactions(), today, months);
    if !maybe_print_json(json_flag, jsonl_flag, &series)? {
        let rows = series
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    fmt_money(&r.income),
                    fmt_money(&r.expense),
                    fmt_money(&r.savings),
                    fmt_money(&r.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Savings", "Balance"], rows)
        );
    }
    Ok(())
}

fn categories<S: SlotStorage>(
    store: &FinanceStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period: Period = match sub.get_one::<String>("period") {
        Some(p) => parse_enum(p)?,
        None => Period::All,
    };
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| parse_enum::<Kind>(k))
        .transpose()?;

    let selected = filter_transactions(store.transactions(), period, kind, today);
    let breakdown = category_breakdown(selected.iter().copied(), store.categories());
    if maybe_print_json(json_flag, jsonl_flag, &breakdown)? {
        return Ok(());
    }
    if breakdown.is_empty() {
        println!("No transactions for {}", period.label().to_lowercase());
        return Ok(());
    }

    let totals = period_totals(selected.iter().copied());
    let rows = breakdown
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.kind.to_string(),
                fmt_money(&r.total),
                r.count.to_string(),
                fmt_money(&r.average),
            ]
        })
        .collect();
    println!("{}", period.label());
    println!(
        "{}",
        pretty_table(&["Category", "Kind", "Total", "Count", "Average"], rows)
    );
    println!(
        "Income {}  Expense {}  Balance {}  ({} transactions)",
        fmt_money(&totals.income),
        fmt_money(&totals.expense),
        fmt_money(&totals.balance),
        totals.count
    );
    Ok(())
}

fn budgets<S: SlotStorage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let progress = budget_progress(store.budgets());
    if !maybe_print_json(json_flag, jsonl_flag, &progress)? {
        let rows = progress
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    fmt_money(&p.accumulated),
                    fmt_money(&p.target),
                    format!("{:.1}%", p.percent),
                    fmt_money(&p.remaining),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Goal", "Saved", "Target", "Progress", "Remaining"], rows)
        );
    }
    Ok(())
}
