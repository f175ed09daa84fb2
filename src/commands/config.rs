// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{parse_language, PersonalityMode};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut changed = false;
    if let Some(ccy) = sub.get_one::<String>("currency") {
        let ccy = ccy.trim().to_uppercase();
        if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow!("Invalid currency code '{}'", ccy));
        }
        store::set_setting(conn, "base_currency", &ccy)?;
        println!("Base currency set to {}", ccy);
        changed = true;
    }
    if let Some(lang) = sub.get_one::<String>("language") {
        let lang = parse_language(lang)?;
        store::set_setting(conn, "language", &lang)?;
        println!("Language set to {}", lang);
        changed = true;
    }
    if let Some(mode) = sub.get_one::<String>("personality") {
        let mode = PersonalityMode::parse(mode)?;
        store::set_setting(conn, "personality_mode", mode.as_str())?;
        println!("Personality mode set to {}", mode.as_str());
        changed = true;
    }
    if let Some(alerts) = sub.get_one::<String>("alerts") {
        let value = match alerts.trim().to_lowercase().as_str() {
            "on" => "on",
            "off" => "off",
            other => return Err(anyhow!("Invalid alerts value '{}' (use on|off)", other)),
        };
        store::set_setting(conn, "spending_alerts", value)?;
        println!("Spending alerts {}", value);
        changed = true;
    }
    if !changed {
        println!("Nothing to set; see 'config set --help'");
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let prefs = store::preferences(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &prefs)? {
        println!(
            "{}",
            pretty_table(
                &["Currency", "Language", "Personality", "Alerts"],
                vec![vec![
                    prefs.base_currency.clone(),
                    prefs.language.clone(),
                    prefs.personality.as_str().to_string(),
                    if prefs.spending_alerts { "on".into() } else { "off".into() },
                ]]
            )
        );
    }
    Ok(())
}
