// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tallybook::models::{
    Budget, DebtStatus, Debtor, Kind, Transaction, default_categories,
};
use tallybook::reports::{
    Period, budget_progress, category_breakdown, category_label, dashboard, debtor_totals,
    filter_transactions, monthly_series, open_goals, period_totals,
};

fn tx(id: &str, date: (i32, u32, u32), category: &str, kind: Kind, amount: i64) -> Transaction {
    Transaction {
        id: id.into(),
        date: Utc.with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0).unwrap(),
        description: String::new(),
        category: category.into(),
        kind,
        amount: Decimal::from(amount),
        debtor_name: None,
        debtor_amount: None,
        debt_status: None,
        budget_id: None,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn ledger() -> Vec<Transaction> {
    vec![
        tx("1", (2024, 12, 20), "salary", Kind::Income, 1000),
        tx("2", (2025, 1, 5), "food", Kind::Expense, 40),
        tx("3", (2025, 2, 1), "salary", Kind::Income, 1000),
        tx("4", (2025, 2, 3), "housing", Kind::Expense, 600),
        tx("5", (2025, 3, 1), "salary", Kind::Income, 1200),
        tx("6", (2025, 3, 2), "food", Kind::Expense, 60),
        tx("7", (2025, 3, 3), "savings", Kind::Savings, 200),
    ]
}

fn goal(id: &str, target: i64, accumulated: i64) -> Budget {
    Budget {
        id: id.into(),
        name: id.to_uppercase(),
        description: None,
        target_amount: Decimal::from(target),
        accumulated: Decimal::from(accumulated),
        start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        end_date: None,
        completed: target > 0 && accumulated >= target,
        category: None,
    }
}

#[test]
fn monthly_series_covers_window_oldest_first() {
    let rows = monthly_series(&ledger(), today(), 3);
    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, ["2025-01", "2025-02", "2025-03"]);

    assert_eq!(rows[0].income, Decimal::ZERO);
    assert_eq!(rows[0].expense, Decimal::from(40));
    assert_eq!(rows[0].balance, Decimal::from(-40));
    assert_eq!(rows[1].balance, Decimal::from(400));
    assert_eq!(rows[2].savings, Decimal::from(200));
    assert_eq!(rows[2].balance, Decimal::from(940));
}

#[test]
fn monthly_series_crosses_year_boundary() {
    let rows = monthly_series(&ledger(), today(), 4);
    assert_eq!(rows[0].month, "2024-12");
    assert_eq!(rows[0].income, Decimal::from(1000));
    assert!(monthly_series(&ledger(), today(), 0).is_empty());
}

#[test]
fn filter_by_period_and_kind() {
    let txs = ledger();
    let current = filter_transactions(&txs, Period::CurrentMonth, None, today());
    assert_eq!(current.len(), 3);

    let previous = filter_transactions(&txs, Period::PreviousMonth, Some(Kind::Expense), today());
    assert_eq!(previous.len(), 1);
    assert_eq!(previous[0].id, "4");

    let year = filter_transactions(&txs, Period::ThisYear, Some(Kind::Income), today());
    assert_eq!(year.len(), 2);

    let all = filter_transactions(&txs, Period::All, None, today());
    assert_eq!(all.len(), txs.len());
}

#[test]
fn totals_exclude_savings_from_balance() {
    let txs = ledger();
    let totals = period_totals(filter_transactions(&txs, Period::CurrentMonth, None, today()));
    assert_eq!(totals.income, Decimal::from(1200));
    assert_eq!(totals.expense, Decimal::from(60));
    assert_eq!(totals.savings, Decimal::from(200));
    assert_eq!(totals.balance, Decimal::from(1140));
    assert_eq!(totals.count, 3);
}

#[test]
fn category_breakdown_sorts_and_keeps_dangling_ids() {
    let mut txs = ledger();
    txs.push(tx("8", (2025, 3, 4), "pets", Kind::Expense, 25));
    let categories = default_categories();
    let expenses = filter_transactions(&txs, Period::All, Some(Kind::Expense), today());
    let rows = category_breakdown(expenses, &categories);

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Housing", "Food", "pets"]);
    let food = &rows[1];
    assert_eq!(food.total, Decimal::from(100));
    assert_eq!(food.count, 2);
    assert_eq!(food.average, Decimal::from(50));
    assert_eq!(rows[2].kind, Kind::Expense);
}

#[test]
fn category_average_rounds_to_cents() {
    let txs = vec![
        tx("1", (2025, 3, 1), "food", Kind::Expense, 10),
        tx("2", (2025, 3, 2), "food", Kind::Expense, 10),
        tx("3", (2025, 3, 3), "food", Kind::Expense, 11),
    ];
    let rows = category_breakdown(&txs, &default_categories());
    assert_eq!(rows[0].average, Decimal::new(1033, 2));
}

#[test]
fn category_label_falls_back_to_id() {
    let categories = default_categories();
    assert_eq!(category_label(&categories, "transport"), "Transport");
    assert_eq!(category_label(&categories, "gone"), "gone");
}

#[test]
fn budget_progress_least_complete_first() {
    let budgets = vec![goal("a", 100, 80), goal("b", 0, 0), goal("c", 200, 50), goal("d", 50, 60)];
    let rows = budget_progress(&budgets);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["b", "c", "a", "d"]);
    assert_eq!(rows[0].percent, Decimal::ZERO);
    assert_eq!(rows[1].percent, Decimal::from(25));
    assert_eq!(rows[3].remaining, Decimal::ZERO);

    let open = open_goals(&budgets, 2);
    assert_eq!(open.len(), 2);
    assert!(open.iter().all(|g| !g.completed));
}

#[test]
fn dashboard_splits_current_month() {
    let mut txs = ledger();
    let mut shared = tx("9", (2025, 3, 5), "leisure", Kind::Expense, 90);
    shared.debtor_name = Some("Ana".into());
    shared.debtor_amount = Some(Decimal::from(45));
    shared.debt_status = Some(DebtStatus::Pending);
    txs.push(shared);
    let mut settled = tx("10", (2025, 1, 7), "food", Kind::Expense, 30);
    settled.debtor_name = Some("Bo".into());
    settled.debt_status = Some(DebtStatus::Paid);
    txs.push(settled);

    let d = dashboard(&txs, today());
    assert_eq!(d.total_balance, Decimal::from(3200 - 700 - 90 - 30));
    assert_eq!(d.month_income, Decimal::from(1200));
    assert_eq!(d.month_regular_expense, Decimal::from(60));
    assert_eq!(d.month_debtor_expense, Decimal::from(90));
    assert_eq!(d.month_expense, Decimal::from(150));
    assert_eq!(d.month_savings, Decimal::from(200));
    assert_eq!(d.month_net, Decimal::from(850));
    assert_eq!(d.pending_debts, Decimal::from(45));
}

#[test]
fn debtor_totals_by_status() {
    let debtor = |id: &str, amount: i64, status: DebtStatus| Debtor {
        id: id.into(),
        name: id.into(),
        amount: Decimal::from(amount),
        date: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        description: None,
        status,
    };
    let totals = debtor_totals(&[
        debtor("a", 20, DebtStatus::Pending),
        debtor("b", 15, DebtStatus::Pending),
        debtor("c", 40, DebtStatus::Paid),
    ]);
    assert_eq!(totals.pending, Decimal::from(35));
    assert_eq!(totals.pending_count, 2);
    assert_eq!(totals.paid, Decimal::from(40));
}
