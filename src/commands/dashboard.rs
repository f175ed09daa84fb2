// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let days = *m.get_one::<u32>("days").unwrap();
    let top_n = *m.get_one::<usize>("top").unwrap();

    let expenses = store::list_expenses(conn)?;
    let income = store::list_income(conn)?;
    let subscriptions = store::list_subscriptions(conn)?;
    let summary = analytics::dashboard_summary(
        &expenses,
        &income,
        &subscriptions,
        today(),
        days,
        top_n,
    );

    if maybe_print_json(json_flag, jsonl_flag, &summary)? {
        return Ok(());
    }
    let ccy = store::base_currency(conn)?;

    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Savings", "Savings Rate", "Subs / Month"],
            vec![vec![
                format!("{} {:.2}", ccy, summary.total_income),
                format!("{} {:.2}", ccy, summary.total_expenses),
                format!("{} {:.2}", ccy, summary.total_savings),
                format!("{:.1}%", summary.savings_rate_pct),
                format!("{} {:.2}", ccy, summary.monthly_subscription_cost),
            ]]
        )
    );

    if !summary.category_breakdown.is_empty() {
        let rows: Vec<Vec<String>> = summary
            .category_breakdown
            .iter()
            .map(|(cat, amt)| vec![cat.clone(), format!("{:.2}", amt)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }

    if !summary.top_expenses.is_empty() {
        let rows: Vec<Vec<String>> = summary
            .top_expenses
            .iter()
            .map(|e| {
                vec![
                    e.date.date().to_string(),
                    e.category.clone(),
                    e.description.clone(),
                    format!("{:.2}", e.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Description", "Amount"], rows)
        );
    }

    if summary.regret_count > 0 {
        println!(
            "Regret purchases: {} totalling {} {:.2}",
            summary.regret_count, ccy, summary.regret_total
        );
    }

    let rows: Vec<Vec<String>> = summary
        .daily_trend
        .iter()
        .map(|p| vec![p.date.to_string(), format!("{:.2}", p.amount)])
        .collect();
    println!("{}", pretty_table(&["Day", "Spent"], rows));
    Ok(())
}
