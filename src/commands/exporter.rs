// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::fmt_datetime;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, sub),
        _ => Ok(()),
    }
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let expenses = store::list_expenses(conn)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "amount",
                "category",
                "description",
                "merchant",
                "currency",
                "regret",
            ])?;
            for e in &expenses {
                wtr.write_record([
                    fmt_datetime(&e.date),
                    e.amount.to_string(),
                    e.category.clone(),
                    e.description.clone(),
                    e.merchant.clone().unwrap_or_default(),
                    e.currency.clone(),
                    if e.is_regret { "true".into() } else { "false".into() },
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = expenses
                .iter()
                .map(|e| {
                    json!({
                        "date": fmt_datetime(&e.date),
                        "amount": e.amount,
                        "category": e.category,
                        "description": e.description,
                        "merchant": e.merchant,
                        "currency": e.currency,
                        "regret": e.is_regret,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} expense(s) to {}", expenses.len(), out);
    Ok(())
}
