// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::store;
use crate::utils::{maybe_print_json, parse_date, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("behaviour", sub)) => behaviour(conn, sub)?,
        Some(("merchants", sub)) => merchants(conn, sub)?,
        Some(("weekly", sub)) => weekly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn behaviour(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let expenses = store::list_expenses(conn)?;
    let mut report = analytics::behaviour_report(&expenses);
    // Patterns are always shown; the alerts themselves honor the preference.
    if !store::preferences(conn)?.spending_alerts {
        report.alerts.clear();
    }

    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = report
        .weekday_spending
        .iter()
        .map(|w| vec![w.day.to_string(), format!("{:.2}", w.amount)])
        .collect();
    println!("{}", pretty_table(&["Day", "Spent"], rows));
    println!(
        "Late-night orders: {} | Weekend spending: {:.2}",
        report.late_night_orders, report.weekend_spending
    );
    for alert in &report.alerts {
        println!("[{}] {}", alert.kind.as_str(), alert.message);
    }
    Ok(())
}

fn merchants(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let expenses = store::list_expenses(conn)?;
    let insights = analytics::merchant_insights(&expenses);
    if !maybe_print_json(json_flag, jsonl_flag, &insights)? {
        let rows: Vec<Vec<String>> = insights
            .iter()
            .map(|m| {
                vec![
                    m.merchant.clone(),
                    format!("{:.2}", m.total_spent),
                    m.transaction_count.to_string(),
                    format!("{:.2}", m.average_transaction),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Merchant", "Total", "Count", "Average"], rows)
        );
    }
    Ok(())
}

fn weekly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let as_of = match sub.get_one::<String>("as_of") {
        Some(s) => parse_date(s.trim())?,
        None => today(),
    };

    let expenses = store::list_expenses(conn)?;
    let income = store::list_income(conn)?;
    let report = analytics::weekly_report(&expenses, &income, as_of);

    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }

    println!("Week {} — {}", report.week_start, report.week_end);
    println!(
        "{}",
        pretty_table(
            &["Spent", "Income", "Savings", "Transactions", "Next Week Target"],
            vec![vec![
                format!("{:.2}", report.total_spending),
                format!("{:.2}", report.total_income),
                format!("{:.2}", report.savings),
                report.transaction_count.to_string(),
                format!("{:.2}", report.next_week_target),
            ]]
        )
    );
    if let Some(top) = &report.top_category {
        println!("Top category: {} ({:.2})", top.category, top.amount);
    }
    if let Some(big) = &report.biggest_purchase {
        println!(
            "Biggest purchase: {} — {:.2} on {}",
            big.description,
            big.amount,
            big.date.date()
        );
    }
    Ok(())
}
