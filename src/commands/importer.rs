// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Expense;
use crate::store;
use crate::utils::{parse_datetime, parse_decimal};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => import_expenses(conn, sub),
        _ => Ok(()),
    }
}

/// Columns: date,amount,category,description,merchant,currency,regret.
/// Category may be empty; categorization rules fill it where they match.
fn import_expenses(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let base_currency = store::base_currency(conn)?;
    let tx = conn.transaction()?;
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let amount_raw = rec.get(1).context("amount missing")?.trim().to_string();
        let category = rec.get(2).unwrap_or("").trim().to_string();
        let description = rec.get(3).context("description missing")?.trim().to_string();
        let mut merchant = rec
            .get(4)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let currency = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| base_currency.clone());
        let regret = rec
            .get(6)
            .map(|s| s.trim().eq_ignore_ascii_case("true") || s.trim() == "1")
            .unwrap_or(false);

        let date = parse_datetime(&date_raw)
            .with_context(|| format!("Invalid expense date '{}'", date_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, description))?;

        let category = if category.is_empty() {
            match store::apply_category_rules(&tx, &description, merchant.as_deref())? {
                Some((rule_cat, rewrite)) => {
                    if let Some(new_merchant) = rewrite {
                        merchant = Some(new_merchant);
                    }
                    rule_cat
                }
                None => {
                    return Err(anyhow!(
                        "No category for '{}' and no rule matched",
                        description
                    ));
                }
            }
        } else {
            category
        };

        let expense = Expense {
            id: 0,
            date,
            amount,
            category,
            description,
            merchant,
            currency,
            is_regret: regret,
        };
        expense
            .validate()
            .with_context(|| format!("Invalid expense row dated {}", date_raw))?;
        store::insert_expense(&tx, &expense)?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} expense(s) from {}", imported, path);
    Ok(())
}
