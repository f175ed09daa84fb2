// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use spendlens::analytics;
use spendlens::models::{BillingCycle, Expense, IncomeEntry, Subscription};

fn ts(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn expense(id: i64, amount: i64, category: &str, date: NaiveDateTime) -> Expense {
    Expense {
        id,
        date,
        amount: Decimal::from(amount),
        category: category.to_string(),
        description: format!("{} purchase", category),
        merchant: None,
        currency: "INR".to_string(),
        is_regret: false,
    }
}

fn income(id: i64, amount: i64, date: NaiveDateTime) -> IncomeEntry {
    IncomeEntry {
        id,
        date,
        amount: Decimal::from(amount),
        source: "Salary".to_string(),
        currency: "INR".to_string(),
    }
}

fn subscription(id: i64, amount: i64, cycle: BillingCycle, active: bool) -> Subscription {
    Subscription {
        id,
        name: format!("sub-{}", id),
        amount: Decimal::from(amount),
        billing_cycle: cycle,
        category: "Entertainment".to_string(),
        next_billing_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        currency: "INR".to_string(),
        active,
    }
}

#[test]
fn category_breakdown_sums_per_category() {
    let expenses = vec![
        expense(1, 500, "Food", ts(2025, 8, 1, 13)),
        expense(2, 200, "Transport", ts(2025, 8, 2, 9)),
        expense(3, 300, "Food", ts(2025, 8, 3, 20)),
    ];
    let breakdown = analytics::category_breakdown(&expenses);
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown["Food"], Decimal::from(800));
    assert_eq!(breakdown["Transport"], Decimal::from(200));
}

#[test]
fn top_expenses_sorted_desc_with_stable_ties() {
    let expenses = vec![
        expense(1, 500, "Food", ts(2025, 8, 1, 13)),
        expense(2, 200, "Transport", ts(2025, 8, 2, 9)),
        expense(3, 300, "Food", ts(2025, 8, 3, 20)),
    ];
    let top = analytics::top_expenses(&expenses, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, 1);
    assert_eq!(top[1].id, 3);

    // Equal amounts keep insertion order
    let tied = vec![
        expense(1, 100, "Food", ts(2025, 8, 1, 13)),
        expense(2, 100, "Transport", ts(2025, 8, 2, 9)),
        expense(3, 50, "Food", ts(2025, 8, 3, 20)),
    ];
    let top = analytics::top_expenses(&tied, 2);
    assert_eq!(top[0].id, 1);
    assert_eq!(top[1].id, 2);
}

#[test]
fn breakdown_sums_to_expense_total_without_subscriptions() {
    let expenses = vec![
        expense(1, 500, "Food", ts(2025, 8, 1, 13)),
        expense(2, 200, "Transport", ts(2025, 8, 2, 9)),
        expense(3, 300, "Food", ts(2025, 8, 3, 20)),
    ];
    let subs = vec![subscription(1, 1200, BillingCycle::Yearly, true)];
    let summary = analytics::dashboard_summary(
        &expenses,
        &[],
        &subs,
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
        7,
        3,
    );
    let breakdown_total: Decimal = summary.category_breakdown.values().copied().sum();
    assert_eq!(
        breakdown_total,
        summary.total_expenses - summary.monthly_subscription_cost
    );
    assert_eq!(summary.monthly_subscription_cost, Decimal::from(100));
}

#[test]
fn zero_income_savings_rate_is_zero() {
    let expenses = vec![expense(1, 500, "Food", ts(2025, 8, 1, 13))];
    let summary = analytics::dashboard_summary(
        &expenses,
        &[],
        &[],
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
        7,
        3,
    );
    assert_eq!(summary.savings_rate_pct, Decimal::ZERO);
    assert_eq!(summary.total_savings, Decimal::from(-500));
}

#[test]
fn savings_rate_from_income_ledger() {
    let expenses = vec![expense(1, 400, "Food", ts(2025, 8, 1, 13))];
    let entries = vec![income(1, 1000, ts(2025, 8, 1, 9))];
    let summary = analytics::dashboard_summary(
        &expenses,
        &entries,
        &[],
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
        7,
        3,
    );
    assert_eq!(summary.total_income, Decimal::from(1000));
    assert_eq!(summary.total_savings, Decimal::from(600));
    assert_eq!(summary.savings_rate_pct, Decimal::from(60));
}

#[test]
fn daily_trend_zero_fills_missing_days() {
    let expenses = vec![
        expense(1, 120, "Food", ts(2025, 8, 1, 13)),
        expense(2, 80, "Food", ts(2025, 8, 3, 20)),
        expense(3, 40, "Transport", ts(2025, 8, 3, 8)),
    ];
    let today = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
    let trend = analytics::daily_trend(&expenses, today, 7);
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2025, 7, 30).unwrap());
    assert_eq!(trend[6].date, today);
    assert!(trend.iter().all(|p| p.date <= today));

    let aug1 = trend.iter().find(|p| p.date.to_string() == "2025-08-01").unwrap();
    assert_eq!(aug1.amount, Decimal::from(120));
    let aug3 = trend.iter().find(|p| p.date.to_string() == "2025-08-03").unwrap();
    assert_eq!(aug3.amount, Decimal::from(120));
    let aug2 = trend.iter().find(|p| p.date.to_string() == "2025-08-02").unwrap();
    assert_eq!(aug2.amount, Decimal::ZERO);
}

#[test]
fn subscription_cost_normalizes_cycles_and_skips_cancelled() {
    let subs = vec![
        subscription(1, 1200, BillingCycle::Yearly, true),
        subscription(2, 50, BillingCycle::Monthly, true),
        subscription(3, 12, BillingCycle::Weekly, true),
        subscription(4, 999, BillingCycle::Monthly, false),
    ];
    let monthly = analytics::monthly_subscription_cost(&subs);
    // 100 + 50 + 12*52/12
    assert_eq!(monthly, Decimal::from(150) + Decimal::from(52));
    assert_eq!(
        analytics::yearly_subscription_cost(&subs),
        monthly * Decimal::from(12)
    );
}

#[test]
fn regret_purchases_are_tallied() {
    let mut regret = expense(1, 250, "Shopping", ts(2025, 8, 2, 23));
    regret.is_regret = true;
    let expenses = vec![regret, expense(2, 100, "Food", ts(2025, 8, 3, 12))];
    let summary = analytics::dashboard_summary(
        &expenses,
        &[],
        &[],
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
        7,
        3,
    );
    assert_eq!(summary.regret_count, 1);
    assert_eq!(summary.regret_total, Decimal::from(250));
}

#[test]
fn duplicates_grouped_by_amount_category_and_day() {
    let expenses = vec![
        expense(1, 300, "Food", ts(2025, 8, 1, 13)),
        expense(2, 300, "Food", ts(2025, 8, 1, 19)),
        expense(3, 300, "Transport", ts(2025, 8, 1, 9)),
        expense(4, 300, "Food", ts(2025, 8, 2, 13)),
    ];
    let groups = analytics::find_duplicates(&expenses);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].original.id, 1);
    assert_eq!(groups[0].duplicates.len(), 1);
    assert_eq!(groups[0].duplicates[0].id, 2);
}

#[test]
fn merchant_insights_buckets_and_sorts() {
    let mut zomato = expense(1, 400, "Food", ts(2025, 8, 1, 21));
    zomato.merchant = Some("Zomato".to_string());
    let mut swiggy = expense(2, 150, "Food", ts(2025, 8, 2, 20));
    swiggy.description = "swiggy dinner".to_string();
    let other = expense(3, 90, "Transport", ts(2025, 8, 3, 9));

    let insights = analytics::merchant_insights(&[zomato, swiggy, other]);
    assert_eq!(insights[0].merchant, "Zomato");
    assert_eq!(insights[0].total_spent, Decimal::from(400));
    assert_eq!(insights[0].transaction_count, 1);
    let swiggy_row = insights.iter().find(|m| m.merchant == "Swiggy").unwrap();
    assert_eq!(swiggy_row.average_transaction, Decimal::from(150));
    assert!(insights.iter().any(|m| m.merchant == "Others"));
}

#[test]
fn weekly_report_trailing_window() {
    let today = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
    let expenses = vec![
        expense(1, 500, "Food", ts(2025, 8, 9, 13)),
        expense(2, 200, "Transport", ts(2025, 8, 8, 9)),
        expense(3, 999, "Food", ts(2025, 7, 1, 12)), // outside the window
    ];
    let entries = vec![income(1, 2000, ts(2025, 8, 7, 9))];
    let report = analytics::weekly_report(&expenses, &entries, today);
    assert_eq!(report.total_spending, Decimal::from(700));
    assert_eq!(report.total_income, Decimal::from(2000));
    assert_eq!(report.savings, Decimal::from(1300));
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.next_week_target, Decimal::from(560));
    let top = report.top_category.unwrap();
    assert_eq!(top.category, "Food");
    assert_eq!(top.amount, Decimal::from(500));
    assert_eq!(report.biggest_purchase.unwrap().id, 1);
}
