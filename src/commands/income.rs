// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::IncomeEntry;
use crate::store;
use crate::utils::{fmt_datetime, maybe_print_json, parse_datetime, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let source = sub.get_one::<String>("source").unwrap().trim().to_string();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s.trim())?,
        None => crate::utils::now(),
    };
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.trim().to_uppercase(),
        None => store::base_currency(conn)?,
    };

    let entry = IncomeEntry {
        id: 0,
        date,
        amount,
        source,
        currency,
    };
    entry.validate()?;
    let id = store::insert_income(conn, &entry)?;
    println!(
        "Recorded income #{}: {} {} from {}",
        id, entry.currency, entry.amount, entry.source
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let entries = store::list_income(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &entries)? {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    fmt_datetime(&i.date),
                    i.source.clone(),
                    format!("{:.2}", i.amount),
                    i.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Source", "Amount", "CCY"], rows)
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::delete_income(conn, id)? {
        println!("Deleted income entry {}", id);
    } else {
        println!("No income entry with id {}", id);
    }
    Ok(())
}
