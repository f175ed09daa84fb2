// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::models::{BillingCycle, Subscription};
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("cancel", sub)) => cancel(conn, sub)?,
        Some(("total", sub)) => total(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let cycle = BillingCycle::parse(sub.get_one::<String>("cycle").unwrap())?;
    let category = sub
        .get_one::<String>("category")
        .unwrap()
        .trim()
        .to_string();
    let next_billing = match sub.get_one::<String>("next_billing") {
        Some(s) => parse_date(s.trim())?,
        None => crate::utils::today(),
    };
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.trim().to_uppercase(),
        None => store::base_currency(conn)?,
    };

    let subscription = Subscription {
        id: 0,
        name,
        amount,
        billing_cycle: cycle,
        category,
        next_billing_date: next_billing,
        currency,
        active: true,
    };
    subscription.validate()?;
    let id = store::insert_subscription(conn, &subscription)?;
    println!(
        "Added subscription #{}: {} at {} {} ({})",
        id,
        subscription.name,
        subscription.currency,
        subscription.amount,
        subscription.billing_cycle.as_str()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let include_cancelled = sub.get_flag("all");

    let mut subs = store::list_subscriptions(conn)?;
    if !include_cancelled {
        subs.retain(|s| s.active);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &subs)? {
        let rows: Vec<Vec<String>> = subs
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.name.clone(),
                    format!("{:.2}", s.amount),
                    s.billing_cycle.as_str().to_string(),
                    s.category.clone(),
                    s.next_billing_date.to_string(),
                    if s.active { "active".into() } else { "cancelled".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Amount", "Cycle", "Category", "Next Billing", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn cancel(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if store::cancel_subscription(conn, id)? {
        println!("Cancelled subscription {}", id);
    } else {
        println!("No subscription with id {}", id);
    }
    Ok(())
}

fn total(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let subs = store::list_subscriptions(conn)?;
    let monthly = analytics::monthly_subscription_cost(&subs);
    let yearly = analytics::yearly_subscription_cost(&subs);
    let ccy = store::base_currency(conn)?;

    let payload = json!({
        "monthly_total": monthly.round_dp(2),
        "yearly_total": yearly.round_dp(2),
    });
    if !maybe_print_json(json_flag, jsonl_flag, &payload)? {
        println!(
            "{}",
            pretty_table(
                &["Monthly", "Yearly"],
                vec![vec![
                    format!("{} {:.2}", ccy, monthly),
                    format!("{} {:.2}", ccy, yearly),
                ]]
            )
        );
    }
    Ok(())
}
