// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs;

use spendlens::models::CategoryRule;
use spendlens::{cli, commands, store};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&mut conn).unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(["spendlens", "import", "expenses", path]);
    let (_, sub) = matches.subcommand().unwrap();
    commands::importer::handle(conn, sub)
}

#[test]
fn imports_rows_with_explicit_categories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    fs::write(
        &path,
        "date,amount,category,description,merchant,currency,regret\n\
         2025-08-01,120.50,Food,lunch,Cafe,INR,false\n\
         2025-08-02 21:15,300,Shopping,headphones,,INR,true\n",
    )
    .unwrap();

    let mut conn = setup();
    run_import(&mut conn, path.to_str().unwrap()).unwrap();

    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].amount, Decimal::new(12050, 2));
    assert_eq!(expenses[0].merchant.as_deref(), Some("Cafe"));
    // Date-only rows land at noon
    assert_eq!(expenses[0].date.format("%H:%M").to_string(), "12:00");
    assert_eq!(expenses[1].date.format("%H:%M").to_string(), "21:15");
    assert!(expenses[1].is_regret);
}

#[test]
fn empty_category_falls_back_to_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    fs::write(
        &path,
        "date,amount,category,description,merchant,currency,regret\n\
         2025-08-01,250,,zomato dinner,,INR,false\n",
    )
    .unwrap();

    let mut conn = setup();
    store::insert_rule(
        &conn,
        &CategoryRule {
            id: 0,
            pattern: "(?i)zomato".to_string(),
            category: "Food".to_string(),
            merchant_rewrite: Some("Zomato".to_string()),
        },
    )
    .unwrap();
    run_import(&mut conn, path.to_str().unwrap()).unwrap();

    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Food");
    assert_eq!(expenses[0].merchant.as_deref(), Some("Zomato"));
}

#[test]
fn unresolvable_category_aborts_the_whole_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    fs::write(
        &path,
        "date,amount,category,description,merchant,currency,regret\n\
         2025-08-01,100,Food,lunch,,INR,false\n\
         2025-08-02,50,,mystery,,INR,false\n",
    )
    .unwrap();

    let mut conn = setup();
    assert!(run_import(&mut conn, path.to_str().unwrap()).is_err());
    // Transactional import: nothing is committed
    assert!(store::list_expenses(&conn).unwrap().is_empty());
}

#[test]
fn export_then_import_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    let mut conn = setup();
    let source = spendlens::models::Expense {
        id: 0,
        date: chrono::NaiveDate::from_ymd_opt(2025, 8, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
        amount: "75.25".parse().unwrap(),
        category: "Transport".to_string(),
        description: "metro card".to_string(),
        merchant: None,
        currency: "INR".to_string(),
        is_regret: false,
    };
    store::insert_expense(&conn, &source).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "spendlens",
        "export",
        "expenses",
        "--format",
        "csv",
        "--out",
        out.to_str().unwrap(),
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    commands::exporter::handle(&conn, sub).unwrap();

    let mut fresh = setup();
    run_import(&mut fresh, out.to_str().unwrap()).unwrap();
    let expenses = store::list_expenses(&fresh).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, Decimal::new(7525, 2));
    assert_eq!(expenses[0].category, "Transport");
    assert_eq!(expenses[0].date, source.date);
}
