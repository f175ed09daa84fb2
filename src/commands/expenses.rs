// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::models::Expense;
use crate::store::{self, ExpenseFilter};
use crate::utils::{
    fmt_datetime, maybe_print_json, parse_date, parse_datetime, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("search", sub)) => search(conn, sub)?,
        Some(("duplicates", sub)) => duplicates(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let description = sub
        .get_one::<String>("description")
        .unwrap()
        .trim()
        .to_string();
    let mut merchant = sub
        .get_one::<String>("merchant")
        .map(|s| s.trim().to_string());
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s.trim())?,
        None => crate::utils::now(),
    };
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.trim().to_uppercase(),
        None => store::base_currency(conn)?,
    };

    let mut category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string());
    if category.is_none() {
        if let Some((rule_cat, rewrite)) =
            store::apply_category_rules(conn, &description, merchant.as_deref())?
        {
            category = Some(rule_cat);
            if let Some(new_merchant) = rewrite {
                println!(
                    "Merchant rewritten: {} -> {}",
                    merchant.as_deref().unwrap_or("(none)"),
                    new_merchant
                );
                merchant = Some(new_merchant);
            }
        }
    }
    let category = category
        .ok_or_else(|| anyhow!("No category given and no rule matched '{}'", description))?;

    let expense = Expense {
        id: 0,
        date,
        amount,
        category,
        description,
        merchant,
        currency,
        is_regret: sub.get_flag("regret"),
    };
    expense.validate()?;
    let id = store::insert_expense(conn, &expense)?;
    println!(
        "Recorded expense #{}: {} {} on {} ({})",
        id,
        expense.currency,
        expense.amount,
        expense.date.date(),
        expense.category
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut expenses = store::list_expenses(conn)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month.trim())?;
        expenses.retain(|e| analytics::month_key(e.date.date()) == month);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat = cat.trim();
        expenses.retain(|e| e.category == cat);
    }
    // Newest first for reading; the stored order stays insertion order.
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        expenses.truncate(*limit);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &expenses)? {
        print_expense_table(&expenses);
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::delete_expense(conn, id)? {
        println!("Deleted expense {}", id);
    } else {
        println!("No expense with id {}", id);
    }
    Ok(())
}

fn search(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let filter = ExpenseFilter {
        query: sub.get_one::<String>("query").map(|s| s.trim().to_string()),
        category: sub
            .get_one::<String>("category")
            .map(|s| s.trim().to_string()),
        min_amount: sub
            .get_one::<String>("min")
            .map(|s| parse_decimal(s.trim()))
            .transpose()?,
        max_amount: sub
            .get_one::<String>("max")
            .map(|s| parse_decimal(s.trim()))
            .transpose()?,
        from: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s.trim()))
            .transpose()?,
        to: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s.trim()))
            .transpose()?,
    };
    let found = store::search_expenses(conn, &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &found)? {
        print_expense_table(&found);
        println!("{} match(es)", found.len());
    }
    Ok(())
}

fn duplicates(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let expenses = store::list_expenses(conn)?;
    let groups = analytics::find_duplicates(&expenses);
    if !maybe_print_json(json_flag, jsonl_flag, &groups)? {
        if groups.is_empty() {
            println!("No duplicate entries found");
            return Ok(());
        }
        let mut rows = Vec::new();
        for g in &groups {
            rows.push(vec![
                g.original.id.to_string(),
                g.original.date.date().to_string(),
                g.original.category.clone(),
                g.original.amount.to_string(),
                g.duplicates
                    .iter()
                    .map(|d| d.id.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
        }
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Amount", "Duplicate IDs"], rows)
        );
    }
    Ok(())
}

fn print_expense_table(expenses: &[Expense]) {
    let rows: Vec<Vec<String>> = expenses
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                fmt_datetime(&e.date),
                e.category.clone(),
                e.description.clone(),
                e.merchant.clone().unwrap_or_default(),
                format!("{:.2}", e.amount),
                e.currency.clone(),
                if e.is_regret { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Category", "Description", "Merchant", "Amount", "CCY", "Regret"],
            rows
        )
    );
}
