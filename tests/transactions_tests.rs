// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tallybook::models::{DebtStatus, Kind, NewBudget, NewTransaction};
use tallybook::{FinanceStore, MemorySlots, cli, commands::transactions};

fn setup() -> FinanceStore<MemorySlots> {
    let mut store = FinanceStore::open(MemorySlots::new());
    for i in 1..=3 {
        store
            .add_transaction(NewTransaction::new(
                Utc.with_ymd_and_hms(2025, 1, i, 0, 0, 0).unwrap(),
                "P",
                "food",
                Kind::Expense,
                Decimal::from(10),
            ))
            .unwrap();
    }
    store
}

fn run(store: &mut FinanceStore<MemorySlots>, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("tx", tx_m)) => transactions::handle(store, tx_m),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn list_limit_respected() {
    let store = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["tallybook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&store, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].category, "Food");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_kind() {
    let mut store = setup();
    run(
        &mut store,
        &[
            "tallybook", "tx", "add", "--date", "2025-01-05", "--category", "salary", "--kind",
            "income", "--amount", "900",
        ],
    )
    .unwrap();
    let matches =
        cli::build_cli().get_matches_from(["tallybook", "tx", "list", "--kind", "income"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&store, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "900.00");
    assert_eq!(rows[0].kind, "income");
}

#[test]
fn add_with_debtor_defaults_debt_fields() {
    let mut store = FinanceStore::open(MemorySlots::new());
    run(
        &mut store,
        &[
            "tallybook", "tx", "add", "--date", "2025-02-01", "-d", "Dinner", "--category", "food",
            "--kind", "expense", "--amount", "42.50", "--debtor", "Ana",
        ],
    )
    .unwrap();
    let tx = &store.transactions()[0];
    assert_eq!(tx.description, "Dinner");
    assert_eq!(tx.debtor_name.as_deref(), Some("Ana"));
    assert_eq!(tx.debtor_amount, Some(Decimal::new(4250, 2)));
    assert_eq!(tx.debt_status, Some(DebtStatus::Pending));
}

#[test]
fn edit_keeps_fields_not_given() {
    let mut store = setup();
    let id = store.transactions()[0].id.clone();
    run(&mut store, &["tallybook", "tx", "edit", &id, "--amount", "12.75"]).unwrap();
    let tx = store.transaction(&id).unwrap();
    assert_eq!(tx.amount, Decimal::new(1275, 2));
    assert_eq!(tx.description, "P");
    assert_eq!(tx.category, "food");
    assert_eq!(tx.kind, Kind::Expense);
    assert_eq!(tx.date, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn non_positive_amount_rejected() {
    let mut store = setup();
    let err = run(
        &mut store,
        &[
            "tallybook", "tx", "add", "--date", "2025-01-09", "--category", "food", "--kind",
            "expense", "--amount", "0",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("greater than zero"));
    assert_eq!(store.transactions().len(), 3);
}

#[test]
fn bad_date_rejected() {
    let mut store = setup();
    let err = run(
        &mut store,
        &[
            "tallybook", "tx", "add", "--date", "09/01/2025", "--category", "food", "--kind",
            "expense", "--amount", "5",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("YYYY-MM-DD"));
}

#[test]
fn debt_status_marks_paid() {
    let mut store = FinanceStore::open(MemorySlots::new());
    let id = store
        .add_transaction(
            NewTransaction::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
                "Tickets",
                "leisure",
                Kind::Expense,
                Decimal::from(80),
            )
            .with_debtor("Bo"),
        )
        .unwrap();
    run(&mut store, &["tallybook", "tx", "debt-status", &id, "paid"]).unwrap();
    assert_eq!(store.transaction(&id).unwrap().debt_status, Some(DebtStatus::Paid));
}

#[test]
fn unknown_id_is_an_error() {
    let mut store = setup();
    assert!(run(&mut store, &["tallybook", "tx", "rm", "nope"]).is_err());
    assert!(run(&mut store, &["tallybook", "tx", "edit", "nope", "--amount", "1"]).is_err());
    assert_eq!(store.transactions().len(), 3);
}

#[test]
fn rm_removes_transaction() {
    let mut store = setup();
    let id = store.transactions()[1].id.clone();
    run(&mut store, &["tallybook", "tx", "rm", &id]).unwrap();
    assert!(store.transaction(&id).is_none());
    assert_eq!(store.transactions().len(), 2);
}

#[test]
fn debt_status_needs_a_debtor() {
    let mut store = setup();
    let id = store.transactions()[0].id.clone();
    let err = run(&mut store, &["tallybook", "tx", "debt-status", &id, "paid"]).unwrap_err();
    assert!(err.to_string().contains("has no debtor"));
    assert_eq!(store.transaction(&id).unwrap().debt_status, None);
}

#[test]
fn edit_no_debtor_clears_debt_fields() {
    let mut store = FinanceStore::open(MemorySlots::new());
    let id = store
        .add_transaction(
            NewTransaction::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
                "Tickets",
                "leisure",
                Kind::Expense,
                Decimal::from(80),
            )
            .with_debtor("Bo"),
        )
        .unwrap();
    run(&mut store, &["tallybook", "tx", "edit", &id, "--no-debtor"]).unwrap();
    let tx = store.transaction(&id).unwrap();
    assert_eq!(tx.debtor_name, None);
    assert_eq!(tx.debtor_amount, None);
    assert_eq!(tx.debt_status, None);
    assert_eq!(tx.amount, Decimal::from(80));

    let clash = cli::build_cli().try_get_matches_from([
        "tallybook", "tx", "edit", id.as_str(), "--no-debtor", "--debtor", "Cy",
    ]);
    assert!(clash.is_err());
}

#[test]
fn edit_no_budget_detaches_deposit_from_goal() {
    let mut store = FinanceStore::open(MemorySlots::new());
    let goal = store
        .add_budget(NewBudget {
            name: "Bike".into(),
            description: None,
            target_amount: Decimal::from(500),
            start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_date: None,
            category: None,
        })
        .unwrap();
    let id = store
        .add_transaction(
            NewTransaction::new(
                Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap(),
                "Save",
                "savings",
                Kind::Savings,
                Decimal::from(120),
            )
            .with_budget(goal.as_str()),
        )
        .unwrap();
    assert_eq!(store.budget(&goal).unwrap().accumulated, Decimal::from(120));

    run(&mut store, &["tallybook", "tx", "edit", &id, "--no-budget"]).unwrap();
    assert_eq!(store.transaction(&id).unwrap().budget_id, None);
    assert_eq!(store.transaction(&id).unwrap().kind, Kind::Savings);
    assert!(store.savings_for_budget(&goal).is_empty());
    assert_eq!(store.budget(&goal).unwrap().accumulated, Decimal::ZERO);
}
