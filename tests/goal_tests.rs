// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spendlens::analytics;
use spendlens::models::Goal;

fn goal(target: i64, current: i64, target_date: &str) -> Goal {
    Goal {
        id: 1,
        name: "Emergency fund".to_string(),
        target_amount: Decimal::from(target),
        current_amount: Decimal::from(current),
        target_date: NaiveDate::parse_from_str(target_date, "%Y-%m-%d").unwrap(),
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn pace_for_goal_100_days_out() {
    // 2025-01-01 + 100 days = 2025-04-11
    let g = goal(50_000, 15_000, "2025-04-11");
    let pace = analytics::goal_pace(&g, day("2025-01-01"));
    assert_eq!(pace.days_remaining, 100);
    assert_eq!(pace.remaining_amount, Decimal::from(35_000));
    assert_eq!(pace.daily_savings_needed, Decimal::from(350));
    assert_eq!(pace.monthly_savings_needed, Decimal::from(10_500));
}

#[test]
fn met_goal_needs_nothing_per_day() {
    let g = goal(50_000, 60_000, "2025-04-11");
    let pace = analytics::goal_pace(&g, day("2025-01-01"));
    assert_eq!(pace.remaining_amount, Decimal::ZERO);
    assert_eq!(pace.daily_savings_needed, Decimal::ZERO);
    assert_eq!(pace.monthly_savings_needed, Decimal::ZERO);
}

#[test]
fn passed_target_date_reports_zero_days_not_negative() {
    let g = goal(50_000, 10_000, "2025-01-01");
    let pace = analytics::goal_pace(&g, day("2025-03-01"));
    assert_eq!(pace.days_remaining, 0);
    // Remainder is concentrated into a single day instead of dividing by zero
    assert_eq!(pace.daily_savings_needed, Decimal::from(40_000));
}

#[test]
fn progress_percent_caps_at_100() {
    assert_eq!(
        analytics::goal_progress_percent(&goal(50_000, 60_000, "2025-04-11")),
        Decimal::from(100)
    );
    assert_eq!(
        analytics::goal_progress_percent(&goal(50_000, 25_000, "2025-04-11")),
        Decimal::from(50)
    );
    assert_eq!(
        analytics::goal_progress_percent(&goal(50_000, 0, "2025-04-11")),
        Decimal::ZERO
    );
}
