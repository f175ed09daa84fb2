// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, BudgetReport};
use crate::models::Budget;
use crate::store;
use crate::utils::{current_month, maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub
        .get_one::<String>("category")
        .unwrap()
        .trim()
        .to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let budget = Budget {
        id: 0,
        category,
        monthly_limit: amount,
    };
    budget.validate()?;
    store::upsert_budget(conn, &budget.category, budget.monthly_limit)?;
    println!("Budget set: {} = {} / month", budget.category, amount);
    Ok(())
}

fn month_arg(sub: &clap::ArgMatches) -> Result<String> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m.trim()),
        None => Ok(current_month()),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = month_arg(sub)?;

    let expenses = store::list_expenses(conn)?;
    let reports: Vec<BudgetReport> = store::list_budgets(conn)?
        .iter()
        .map(|b| analytics::budget_report(b, &expenses, &month))
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &reports)? {
        let rows: Vec<Vec<String>> = reports.iter().map(report_row).collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Limit", "Spent", "Remaining", "Used %", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let category = sub.get_one::<String>("category").unwrap().trim();
    let month = month_arg(sub)?;

    let Some(budget) = store::budget_for_category(conn, category)? else {
        println!("No budget set for '{}'", category);
        return Ok(());
    };
    let expenses = store::list_expenses(conn)?;
    let report = analytics::budget_report(&budget, &expenses, &month);

    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        println!(
            "{}",
            pretty_table(
                &["Category", "Limit", "Spent", "Remaining", "Used %", "Status"],
                vec![report_row(&report)]
            )
        );
        match report.state {
            analytics::BudgetState::Exceeded => println!(
                "Budget exceeded! You've spent {:.1}% of your limit.",
                report.percent_used
            ),
            analytics::BudgetState::Warning => println!(
                "Warning! You've used {:.1}% of your budget.",
                report.percent_used
            ),
            analytics::BudgetState::OnTrack => println!(
                "You've used {:.1}% of your budget.",
                report.percent_used
            ),
        }
    }
    Ok(())
}

fn report_row(r: &BudgetReport) -> Vec<String> {
    vec![
        r.category.clone(),
        format!("{:.2}", r.monthly_limit),
        format!("{:.2}", r.spent),
        format!("{:.2}", r.remaining),
        format!("{:.1}", r.percent_used),
        r.state.as_str().to_string(),
    ]
}
