// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::models::Goal;
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("fund", sub)) => fund(conn, sub)?,
        Some(("pace", sub)) => pace(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap().trim())?;
    let target_date = parse_date(sub.get_one::<String>("target_date").unwrap().trim())?;
    let current = match sub.get_one::<String>("current") {
        Some(s) => parse_decimal(s.trim())?,
        None => Decimal::ZERO,
    };

    let goal = Goal {
        id: 0,
        name,
        target_amount: target,
        current_amount: current,
        target_date,
    };
    goal.validate()?;
    let id = store::insert_goal(conn, &goal)?;
    println!(
        "Added goal #{}: {} -> {} by {}",
        id, goal.name, goal.target_amount, goal.target_date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let goals = store::list_goals(conn)?;
    if json_flag || jsonl_flag {
        let payload: Vec<serde_json::Value> = goals
            .iter()
            .map(|g| {
                serde_json::json!({
                    "id": g.id,
                    "name": g.name,
                    "target_amount": g.target_amount,
                    "current_amount": g.current_amount,
                    "target_date": g.target_date,
                    "progress_pct": analytics::goal_progress_percent(g).round_dp(1),
                })
            })
            .collect();
        maybe_print_json(json_flag, jsonl_flag, &payload)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = goals
        .iter()
        .map(|g| {
            vec![
                g.id.to_string(),
                g.name.clone(),
                format!("{:.2}", g.current_amount),
                format!("{:.2}", g.target_amount),
                format!("{:.1}%", analytics::goal_progress_percent(g)),
                g.target_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Saved", "Target", "Progress", "Target Date"],
            rows
        )
    );
    Ok(())
}

fn fund(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let goal = store::goal_by_id(conn, id)?.ok_or_else(|| anyhow!("Goal {} not found", id))?;

    let updated = Goal {
        current_amount: amount,
        ..goal
    };
    updated.validate()?;
    store::set_goal_current(conn, id, amount)?;
    println!(
        "Goal '{}' now at {} / {} ({:.1}%)",
        updated.name,
        updated.current_amount,
        updated.target_amount,
        analytics::goal_progress_percent(&updated)
    );
    Ok(())
}

fn pace(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();
    let as_of = match sub.get_one::<String>("as_of") {
        Some(s) => parse_date(s.trim())?,
        None => today(),
    };

    let goal = store::goal_by_id(conn, id)?.ok_or_else(|| anyhow!("Goal {} not found", id))?;
    let pace = analytics::goal_pace(&goal, as_of);

    if !maybe_print_json(json_flag, jsonl_flag, &pace)? {
        println!(
            "{}",
            pretty_table(
                &["Days Left", "Remaining", "Daily Needed", "Monthly Needed"],
                vec![vec![
                    pace.days_remaining.to_string(),
                    format!("{:.2}", pace.remaining_amount),
                    format!("{:.2}", pace.daily_savings_needed),
                    format!("{:.2}", pace.monthly_savings_needed),
                ]]
            )
        );
        if pace.remaining_amount.is_zero() {
            println!("Goal '{}' is already met", goal.name);
        }
    }
    Ok(())
}
