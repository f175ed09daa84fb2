// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use spendlens::analytics::{self, BudgetState};
use spendlens::models::{Budget, Expense};
use spendlens::store;

fn budget(category: &str, limit: i64) -> Budget {
    Budget {
        id: 1,
        category: category.to_string(),
        monthly_limit: Decimal::from(limit),
    }
}

fn expense_on(id: i64, amount: &str, category: &str, day: &str) -> Expense {
    Expense {
        id,
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
        amount: amount.parse().unwrap(),
        category: category.to_string(),
        description: "test".to_string(),
        merchant: None,
        currency: "INR".to_string(),
        is_regret: false,
    }
}

#[test]
fn warning_boundary_is_inclusive_at_80() {
    let b = budget("Food", 1000);
    let expenses = vec![expense_on(1, "800", "Food", "2025-08-03")];
    let report = analytics::budget_report(&b, &expenses, "2025-08");
    assert_eq!(report.percent_used, Decimal::from(80));
    assert_eq!(report.state, BudgetState::Warning);

    let under = vec![expense_on(1, "799.99", "Food", "2025-08-03")];
    let report = analytics::budget_report(&b, &under, "2025-08");
    assert_eq!(report.state, BudgetState::OnTrack);
}

#[test]
fn exceeded_boundary_is_inclusive_at_100() {
    let b = budget("Food", 1000);
    let exact = vec![expense_on(1, "1000", "Food", "2025-08-03")];
    let report = analytics::budget_report(&b, &exact, "2025-08");
    assert_eq!(report.state, BudgetState::Exceeded);
    assert_eq!(report.remaining, Decimal::ZERO);

    let over = vec![expense_on(1, "1500", "Food", "2025-08-03")];
    let report = analytics::budget_report(&b, &over, "2025-08");
    assert_eq!(report.state, BudgetState::Exceeded);
    assert_eq!(report.remaining, Decimal::from(-500));
}

#[test]
fn spent_only_counts_the_active_month_and_category() {
    let b = budget("Food", 1000);
    let expenses = vec![
        expense_on(1, "100", "Food", "2025-08-03"),
        expense_on(2, "250", "Food", "2025-07-28"),
        expense_on(3, "400", "Transport", "2025-08-03"),
    ];
    let report = analytics::budget_report(&b, &expenses, "2025-08");
    assert_eq!(report.spent, Decimal::from(100));
    assert_eq!(report.state, BudgetState::OnTrack);
}

#[test]
fn spend_is_recomputed_from_the_store_on_every_read() {
    let mut conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&mut conn).unwrap();
    store::upsert_budget(&conn, "Food", Decimal::from(500)).unwrap();

    store::insert_expense(&conn, &expense_on(0, "300", "Food", "2025-08-02")).unwrap();
    let b = store::budget_for_category(&conn, "Food").unwrap().unwrap();
    let expenses = store::list_expenses(&conn).unwrap();
    let report = analytics::budget_report(&b, &expenses, "2025-08");
    assert_eq!(report.spent, Decimal::from(300));
    assert_eq!(report.state, BudgetState::OnTrack);

    store::insert_expense(&conn, &expense_on(0, "250", "Food", "2025-08-15")).unwrap();
    let expenses = store::list_expenses(&conn).unwrap();
    let report = analytics::budget_report(&b, &expenses, "2025-08");
    assert_eq!(report.spent, Decimal::from(550));
    assert_eq!(report.state, BudgetState::Exceeded);
}

#[test]
fn upsert_replaces_the_limit_for_a_category() {
    let mut conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&mut conn).unwrap();
    store::upsert_budget(&conn, "Food", Decimal::from(500)).unwrap();
    store::upsert_budget(&conn, "Food", Decimal::from(750)).unwrap();

    let budgets = store::list_budgets(&conn).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].monthly_limit, Decimal::from(750));
}
