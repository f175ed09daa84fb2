// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use spendlens::analytics::next_occurrence;
use spendlens::models::{Frequency, RecurringKind, RecurringTemplate};
use spendlens::{cli, commands, store};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn fixed_interval_frequencies() {
    assert_eq!(
        next_occurrence(Frequency::Weekly, day("2025-01-01")),
        day("2025-01-08")
    );
    assert_eq!(
        next_occurrence(Frequency::BiWeekly, day("2025-01-01")),
        day("2025-01-15")
    );
    assert_eq!(
        next_occurrence(Frequency::Monthly, day("2025-01-15")),
        day("2025-02-15")
    );
    assert_eq!(
        next_occurrence(Frequency::Quarterly, day("2025-01-15")),
        day("2025-04-15")
    );
    assert_eq!(
        next_occurrence(Frequency::Yearly, day("2025-01-15")),
        day("2026-01-15")
    );
}

#[test]
fn month_arithmetic_clamps_to_shorter_months() {
    assert_eq!(
        next_occurrence(Frequency::Monthly, day("2025-01-31")),
        day("2025-02-28")
    );
    assert_eq!(
        next_occurrence(Frequency::Monthly, day("2024-01-31")),
        day("2024-02-29")
    );
    assert_eq!(
        next_occurrence(Frequency::Quarterly, day("2025-01-31")),
        day("2025-04-30")
    );
    assert_eq!(
        next_occurrence(Frequency::Yearly, day("2024-02-29")),
        day("2025-02-28")
    );
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&mut conn).unwrap();
    conn
}

fn template(kind: RecurringKind, frequency: Frequency, next: &str) -> RecurringTemplate {
    RecurringTemplate {
        id: 0,
        name: "Rent".to_string(),
        amount: Decimal::from(1500),
        category: "Housing".to_string(),
        kind,
        frequency,
        next_date: day(next),
        last_processed: None,
        active: true,
    }
}

fn run_process(conn: &mut Connection, as_of: &str) {
    let matches = cli::build_cli().get_matches_from([
        "spendlens",
        "recurring",
        "process",
        "--as-of",
        as_of,
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    commands::recurring::handle(conn, sub).unwrap();
}

#[test]
fn process_catches_up_one_record_per_missed_occurrence() {
    let mut conn = setup();
    store::insert_recurring(&conn, &template(RecurringKind::Expense, Frequency::Monthly, "2025-01-10"))
        .unwrap();

    run_process(&mut conn, "2025-03-20");

    let expenses = store::list_expenses(&conn).unwrap();
    assert_eq!(expenses.len(), 3);
    let dates: Vec<String> = expenses.iter().map(|e| e.date.date().to_string()).collect();
    assert_eq!(dates, vec!["2025-01-10", "2025-02-10", "2025-03-10"]);
    assert!(expenses.iter().all(|e| e.description == "Rent (auto-added)"));
    assert!(expenses.iter().all(|e| e.category == "Housing"));

    let templates = store::list_recurring(&conn).unwrap();
    assert_eq!(templates[0].next_date, day("2025-04-10"));
    assert!(templates[0].last_processed.is_some());
}

#[test]
fn process_is_idempotent_once_caught_up() {
    let mut conn = setup();
    store::insert_recurring(&conn, &template(RecurringKind::Income, Frequency::Weekly, "2025-01-06"))
        .unwrap();

    run_process(&mut conn, "2025-01-20");
    assert_eq!(store::list_income(&conn).unwrap().len(), 3);

    run_process(&mut conn, "2025-01-20");
    assert_eq!(store::list_income(&conn).unwrap().len(), 3);
}

#[test]
fn paused_templates_are_skipped() {
    let mut conn = setup();
    let id = store::insert_recurring(
        &conn,
        &template(RecurringKind::Expense, Frequency::Monthly, "2025-01-10"),
    )
    .unwrap();
    store::set_recurring_active(&conn, id, false).unwrap();

    run_process(&mut conn, "2025-03-20");
    assert!(store::list_expenses(&conn).unwrap().is_empty());

    let templates = store::list_recurring(&conn).unwrap();
    assert_eq!(templates[0].next_date, day("2025-01-10"));
}

#[test]
fn income_templates_materialize_income_entries() {
    let mut conn = setup();
    store::insert_recurring(&conn, &template(RecurringKind::Income, Frequency::Monthly, "2025-02-01"))
        .unwrap();

    run_process(&mut conn, "2025-02-01");
    let income = store::list_income(&conn).unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].source, "Rent");
    assert_eq!(income[0].amount, Decimal::from(1500));
    assert!(store::list_expenses(&conn).unwrap().is_empty());
}
