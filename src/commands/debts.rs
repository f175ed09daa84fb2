// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::models::{Debt, DebtStatus};
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let principal = parse_decimal(sub.get_one::<String>("principal").unwrap().trim())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap().trim())?;
    let months = *sub.get_one::<u32>("months").unwrap();
    let start = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s.trim())?,
        None => today(),
    };

    let debt = Debt {
        id: 0,
        name,
        principal,
        annual_rate_pct: rate,
        tenure_months: months,
        start_date: start,
        amount_paid: Decimal::ZERO,
        status: DebtStatus::Active,
    };
    debt.validate()?;
    let id = store::insert_debt(conn, &debt)?;

    let schedule = analytics::debt_schedule(principal, rate, months);
    println!(
        "Added debt #{}: {} — EMI {:.2}/month, total interest {:.2}, total payable {:.2}",
        id, debt.name, schedule.emi, schedule.total_interest, schedule.total_payable
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let debts = store::list_debts(conn)?;
    if json_flag || jsonl_flag {
        let payload: Vec<serde_json::Value> = debts
            .iter()
            .map(|d| {
                let progress = analytics::debt_progress(d);
                serde_json::json!({
                    "id": d.id,
                    "name": d.name,
                    "principal": d.principal,
                    "annual_rate_pct": d.annual_rate_pct,
                    "tenure_months": d.tenure_months,
                    "status": d.status,
                    "emi": progress.schedule.emi,
                    "total_interest": progress.schedule.total_interest,
                    "total_payable": progress.schedule.total_payable,
                    "amount_paid": d.amount_paid,
                    "remaining": progress.remaining,
                    "percent_paid": progress.percent_paid.round_dp(1),
                })
            })
            .collect();
        maybe_print_json(json_flag, jsonl_flag, &payload)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = debts
        .iter()
        .map(|d| {
            let progress = analytics::debt_progress(d);
            vec![
                d.id.to_string(),
                d.name.clone(),
                format!("{:.2}", d.principal),
                format!("{:.2}%", d.annual_rate_pct),
                d.tenure_months.to_string(),
                format!("{:.2}", progress.schedule.emi),
                format!("{:.2}", progress.remaining),
                format!("{:.1}%", progress.percent_paid),
                d.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Principal", "Rate", "Months", "EMI", "Remaining", "Paid", "Status"],
            rows
        )
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Payment must be greater than zero"));
    }
    let debt = store::debt_by_id(conn, id)?.ok_or_else(|| anyhow!("Debt {} not found", id))?;

    let paid_total = debt.amount_paid + amount;
    store::record_debt_payment(conn, id, paid_total)?;

    let updated = Debt {
        amount_paid: paid_total,
        ..debt
    };
    let progress = analytics::debt_progress(&updated);
    if progress.remaining.is_zero() && updated.status == DebtStatus::Active {
        store::set_debt_status(conn, id, DebtStatus::Paid)?;
        println!("Debt '{}' fully paid off", updated.name);
    } else {
        println!(
            "Paid {:.2} toward '{}'; {:.2} remaining ({:.1}% paid)",
            amount, updated.name, progress.remaining, progress.percent_paid
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::delete_debt(conn, id)? {
        println!("Deleted debt {}", id);
    } else {
        println!("No debt with id {}", id);
    }
    Ok(())
}
