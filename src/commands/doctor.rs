// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::store;
use crate::utils::{pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();
    let today = today();

    // 1) Active subscriptions whose next billing date is already past
    for s in store::list_subscriptions(conn)?.iter().filter(|s| s.active) {
        if s.next_billing_date < today {
            rows.push(vec![
                "stale_billing_date".into(),
                format!("{} (next billing {})", s.name, s.next_billing_date),
            ]);
        }
    }

    // 2) Goals past their target date but not met
    for g in store::list_goals(conn)? {
        if g.target_date < today && g.current_amount < g.target_amount {
            rows.push(vec![
                "goal_overdue".into(),
                format!("{} ({:.1}% reached)", g.name, analytics::goal_progress_percent(&g)),
            ]);
        }
    }

    // 3) Debts paid beyond their total payable
    for d in store::list_debts(conn)? {
        let schedule = analytics::debt_schedule(d.principal, d.annual_rate_pct, d.tenure_months);
        if d.amount_paid > schedule.total_payable {
            rows.push(vec![
                "debt_overpaid".into(),
                format!(
                    "{} (paid {} of {})",
                    d.name, d.amount_paid, schedule.total_payable
                ),
            ]);
        }
    }

    // 4) Active recurring templates that have fallen behind
    for t in store::list_recurring(conn)?.iter().filter(|t| t.active) {
        if t.next_date < today {
            rows.push(vec![
                "recurring_behind".into(),
                format!("{} (due {}; run 'recurring process')", t.name, t.next_date),
            ]);
        }
    }

    // 5) Budgets for categories no expense has ever used
    let used: HashSet<String> = store::list_expenses(conn)?
        .into_iter()
        .map(|e| e.category)
        .collect();
    for b in store::list_budgets(conn)? {
        if !used.contains(&b.category) {
            rows.push(vec!["budget_unused_category".into(), b.category]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
