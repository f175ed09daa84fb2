// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use spendlens::models::{CategoryRule, Expense, PersonalityMode};
use spendlens::store::{self, ExpenseFilter};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&mut conn).unwrap();
    conn
}

fn expense(amount: &str, category: &str, description: &str, day: &str) -> Expense {
    Expense {
        id: 0,
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap(),
        amount: amount.parse().unwrap(),
        category: category.to_string(),
        description: description.to_string(),
        merchant: None,
        currency: "INR".to_string(),
        is_regret: false,
    }
}

#[test]
fn expense_round_trip_preserves_fields() {
    let conn = setup();
    let mut e = expense("123.45", "Food", "lunch at cafe", "2025-08-04");
    e.merchant = Some("Cafe Coffee".to_string());
    e.is_regret = true;
    let id = store::insert_expense(&conn, &e).unwrap();

    let listed = store::list_expenses(&conn).unwrap();
    assert_eq!(listed.len(), 1);
    let got = &listed[0];
    assert_eq!(got.id, id);
    assert_eq!(got.amount, Decimal::new(12345, 2));
    assert_eq!(got.category, "Food");
    assert_eq!(got.merchant.as_deref(), Some("Cafe Coffee"));
    assert!(got.is_regret);
    assert_eq!(got.date, e.date);
}

#[test]
fn list_keeps_insertion_order() {
    let conn = setup();
    store::insert_expense(&conn, &expense("10", "Food", "first", "2025-08-04")).unwrap();
    store::insert_expense(&conn, &expense("20", "Food", "second", "2025-08-01")).unwrap();

    let listed = store::list_expenses(&conn).unwrap();
    assert_eq!(listed[0].description, "first");
    assert_eq!(listed[1].description, "second");
}

#[test]
fn search_filters_by_text_amount_and_dates() {
    let conn = setup();
    store::insert_expense(&conn, &expense("100", "Food", "zomato dinner", "2025-08-01")).unwrap();
    store::insert_expense(&conn, &expense("350", "Food", "groceries", "2025-08-03")).unwrap();
    store::insert_expense(&conn, &expense("40", "Transport", "auto ride", "2025-07-20")).unwrap();

    let by_text = store::search_expenses(
        &conn,
        &ExpenseFilter {
            query: Some("zomato".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].description, "zomato dinner");

    let by_amount = store::search_expenses(
        &conn,
        &ExpenseFilter {
            min_amount: Some(Decimal::from(50)),
            max_amount: Some(Decimal::from(200)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_amount.len(), 1);
    assert_eq!(by_amount[0].amount, Decimal::from(100));

    let by_range = store::search_expenses(
        &conn,
        &ExpenseFilter {
            from: Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_range.len(), 2);

    let by_category = store::search_expenses(
        &conn,
        &ExpenseFilter {
            category: Some("Transport".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_category.len(), 1);
}

#[test]
fn newest_rule_wins_and_rewrites_merchant() {
    let conn = setup();
    store::insert_rule(
        &conn,
        &CategoryRule {
            id: 0,
            pattern: "(?i)swiggy|zomato".to_string(),
            category: "Food".to_string(),
            merchant_rewrite: None,
        },
    )
    .unwrap();
    store::insert_rule(
        &conn,
        &CategoryRule {
            id: 0,
            pattern: "(?i)zomato".to_string(),
            category: "Delivery".to_string(),
            merchant_rewrite: Some("Zomato".to_string()),
        },
    )
    .unwrap();

    let matched = store::apply_category_rules(&conn, "Zomato dinner", None)
        .unwrap()
        .unwrap();
    assert_eq!(matched.0, "Delivery");
    assert_eq!(matched.1.as_deref(), Some("Zomato"));

    let fallback = store::apply_category_rules(&conn, "swiggy lunch", None)
        .unwrap()
        .unwrap();
    assert_eq!(fallback.0, "Food");

    assert!(store::apply_category_rules(&conn, "petrol", None)
        .unwrap()
        .is_none());
}

#[test]
fn invalid_rule_patterns_are_skipped() {
    let conn = setup();
    store::insert_rule(
        &conn,
        &CategoryRule {
            id: 0,
            pattern: "([unclosed".to_string(),
            category: "Broken".to_string(),
            merchant_rewrite: None,
        },
    )
    .unwrap();
    store::insert_rule(
        &conn,
        &CategoryRule {
            id: 0,
            pattern: "fuel".to_string(),
            category: "Transport".to_string(),
            merchant_rewrite: None,
        },
    )
    .unwrap();

    let matched = store::apply_category_rules(&conn, "fuel refill", None)
        .unwrap()
        .unwrap();
    assert_eq!(matched.0, "Transport");
}

#[test]
fn preferences_default_then_persist() {
    let conn = setup();
    let prefs = store::preferences(&conn).unwrap();
    assert_eq!(prefs.base_currency, "INR");
    assert_eq!(prefs.language, "en");
    assert_eq!(prefs.personality, PersonalityMode::Balanced);
    assert!(prefs.spending_alerts);

    store::set_setting(&conn, "base_currency", "EUR").unwrap();
    store::set_setting(&conn, "personality_mode", "saver").unwrap();
    store::set_setting(&conn, "spending_alerts", "off").unwrap();

    let prefs = store::preferences(&conn).unwrap();
    assert_eq!(prefs.base_currency, "EUR");
    assert_eq!(prefs.personality, PersonalityMode::Saver);
    assert!(!prefs.spending_alerts);
}

#[test]
fn delete_reports_whether_a_row_existed() {
    let conn = setup();
    let id = store::insert_expense(&conn, &expense("10", "Food", "snack", "2025-08-04")).unwrap();
    assert!(store::delete_expense(&conn, id).unwrap());
    assert!(!store::delete_expense(&conn, id).unwrap());
    assert!(store::list_expenses(&conn).unwrap().is_empty());
}
