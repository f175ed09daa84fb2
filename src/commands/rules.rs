// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CategoryRule;
use crate::store;
use crate::utils::pretty_table;
use anyhow::{anyhow, Result};
use regex::Regex;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern_raw = sub.get_one::<String>("pattern").unwrap();
            let pattern = pattern_raw.trim();
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;

            let category = sub
                .get_one::<String>("category")
                .unwrap()
                .trim()
                .to_string();
            let merchant_rewrite = sub
                .get_one::<String>("merchant_rewrite")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            let rule = CategoryRule {
                id: 0,
                pattern: pattern.to_string(),
                category,
                merchant_rewrite,
            };
            let id = store::insert_rule(conn, &rule)?;
            println!(
                "Added rule #{}: /{}/ -> {} (rewrite {:?})",
                id, rule.pattern, rule.category, rule.merchant_rewrite
            );
        }
        Some(("list", _)) => {
            let rules = store::list_rules(conn)?;
            let rows: Vec<Vec<String>> = rules
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.pattern.clone(),
                        r.category.clone(),
                        r.merchant_rewrite.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "Pattern", "Category", "Merchant Rewrite"], rows)
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if store::delete_rule(conn, id)? {
                println!("Removed rule {}", id);
            } else {
                println!("No rule with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}
