// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::models::{Expense, Frequency, IncomeEntry, RecurringKind, RecurringTemplate};
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::Result;
use chrono::NaiveTime;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("process", sub)) => process(conn, sub)?,
        Some(("pause", sub)) => set_active(conn, sub, false)?,
        Some(("resume", sub)) => set_active(conn, sub, true)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let category = sub
        .get_one::<String>("category")
        .unwrap()
        .trim()
        .to_string();
    let kind = RecurringKind::parse(sub.get_one::<String>("type").unwrap())?;
    let frequency = Frequency::parse(sub.get_one::<String>("frequency").unwrap())?;
    let next_date = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s.trim())?,
        None => today(),
    };

    let template = RecurringTemplate {
        id: 0,
        name,
        amount,
        category,
        kind,
        frequency,
        next_date,
        last_processed: None,
        active: true,
    };
    template.validate()?;
    let id = store::insert_recurring(conn, &template)?;
    println!(
        "Added {} template #{}: {} {} {}, first due {}",
        template.kind.as_str(),
        id,
        template.name,
        template.amount,
        template.frequency.as_str(),
        template.next_date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let templates = store::list_recurring(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &templates)? {
        let rows: Vec<Vec<String>> = templates
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.name.clone(),
                    t.kind.as_str().to_string(),
                    format!("{:.2}", t.amount),
                    t.category.clone(),
                    t.frequency.as_str().to_string(),
                    t.next_date.to_string(),
                    if t.active { "active".into() } else { "paused".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Type", "Amount", "Category", "Frequency", "Next Due", "Status"],
                rows
            )
        );
    }
    Ok(())
}

/// Materializes every due occurrence up to the as-of date. A template that
/// fell several intervals behind catches up one record per missed
/// occurrence, each dated on its own due date.
fn process(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let as_of = match sub.get_one::<String>("as_of") {
        Some(s) => parse_date(s.trim())?,
        None => today(),
    };
    let currency = store::base_currency(conn)?;
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);

    let mut total = 0usize;
    for template in store::list_recurring(conn)?.iter().filter(|t| t.active) {
        let mut next = template.next_date;
        let mut count = 0usize;
        while next <= as_of {
            match template.kind {
                RecurringKind::Expense => {
                    let expense = Expense {
                        id: 0,
                        date: next.and_time(noon),
                        amount: template.amount,
                        category: template.category.clone(),
                        description: format!("{} (auto-added)", template.name),
                        merchant: None,
                        currency: currency.clone(),
                        is_regret: false,
                    };
                    store::insert_expense(conn, &expense)?;
                }
                RecurringKind::Income => {
                    let entry = IncomeEntry {
                        id: 0,
                        date: next.and_time(noon),
                        amount: template.amount,
                        source: template.name.clone(),
                        currency: currency.clone(),
                    };
                    store::insert_income(conn, &entry)?;
                }
            }
            next = analytics::next_occurrence(template.frequency, next);
            count += 1;
        }
        if count > 0 {
            store::advance_recurring(conn, template.id, next, crate::utils::now())?;
            println!(
                "Processed '{}' x{}, next due {}",
                template.name, count, next
            );
            total += count;
        }
    }
    println!("{} occurrence(s) materialized", total);
    Ok(())
}

fn set_active(conn: &Connection, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::set_recurring_active(conn, id, active)? {
        println!(
            "Template {} {}",
            id,
            if active { "resumed" } else { "paused" }
        );
    } else {
        println!("No template with id {}", id);
    }
    Ok(())
}
