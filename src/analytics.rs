// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derivation of dashboard metrics from raw records: totals, category
//! breakdowns, trends, budget status, debt amortization, goal pacing and
//! spending-behaviour patterns. Everything here is pure; callers load the
//! records through the store and hand in already-resolved collections.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, Months, NaiveDate, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    BillingCycle, Budget, Debt, Expense, Frequency, Goal, IncomeEntry, Subscription,
};

/// Late-night purchases beyond this count trigger an alert.
pub const LATE_NIGHT_ALERT_THRESHOLD: usize = 3;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::from(100)
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_savings: Decimal,
    pub savings_rate_pct: Decimal,
    pub monthly_subscription_cost: Decimal,
    pub category_breakdown: BTreeMap<String, Decimal>,
    pub top_expenses: Vec<Expense>,
    pub daily_trend: Vec<TrendPoint>,
    pub regret_total: Decimal,
    pub regret_count: usize,
}

/// Full dashboard view model. Total expenses include the monthly-equivalent
/// subscription cost; the subscription component is reported separately so
/// the category breakdown still sums to the raw expense total.
pub fn dashboard_summary(
    expenses: &[Expense],
    income: &[IncomeEntry],
    subscriptions: &[Subscription],
    today: NaiveDate,
    trend_days: u32,
    top_n: usize,
) -> DashboardSummary {
    let spent: Decimal = expenses.iter().map(|e| e.amount).sum();
    let monthly_subs = monthly_subscription_cost(subscriptions);
    let total_expenses = spent + monthly_subs;
    let total_income: Decimal = income.iter().map(|i| i.amount).sum();
    let total_savings = total_income - total_expenses;

    let regrets: Vec<&Expense> = expenses.iter().filter(|e| e.is_regret).collect();

    DashboardSummary {
        total_income,
        total_expenses,
        total_savings,
        savings_rate_pct: percent(total_savings, total_income),
        monthly_subscription_cost: monthly_subs,
        category_breakdown: category_breakdown(expenses),
        top_expenses: top_expenses(expenses, top_n),
        daily_trend: daily_trend(expenses, today, trend_days),
        regret_total: regrets.iter().map(|e| e.amount).sum(),
        regret_count: regrets.len(),
    }
}

pub fn category_breakdown(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut breakdown = BTreeMap::new();
    for e in expenses {
        *breakdown.entry(e.category.clone()).or_insert(Decimal::ZERO) += e.amount;
    }
    breakdown
}

/// The `n` highest-amount expenses, descending. The sort is stable, so
/// equal amounts keep their original insertion order.
pub fn top_expenses(expenses: &[Expense], n: usize) -> Vec<Expense> {
    let mut ranked: Vec<&Expense> = expenses.iter().collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.into_iter().take(n).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Spend per calendar day over the trailing window ending at `today`.
/// Days without expenses report zero rather than being omitted.
pub fn daily_trend(expenses: &[Expense], today: NaiveDate, days: u32) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for e in expenses {
        *by_day.entry(e.date.date()).or_insert(Decimal::ZERO) += e.amount;
    }

    let days = days.max(1);
    let mut points = Vec::with_capacity(days as usize);
    let mut day = today - Duration::days(i64::from(days) - 1);
    while day <= today {
        points.push(TrendPoint {
            date: day,
            amount: by_day.get(&day).copied().unwrap_or(Decimal::ZERO),
        });
        day = day + Duration::days(1);
    }
    points
}

/// Active subscriptions normalized to a monthly figure: daily x 365/12,
/// weekly x 52/12, yearly / 12.
pub fn monthly_subscription_cost(subscriptions: &[Subscription]) -> Decimal {
    subscriptions
        .iter()
        .filter(|s| s.active)
        .map(|s| match s.billing_cycle {
            BillingCycle::Daily => s.amount * Decimal::from(365) / Decimal::from(12),
            BillingCycle::Weekly => s.amount * Decimal::from(52) / Decimal::from(12),
            BillingCycle::Monthly => s.amount,
            BillingCycle::Yearly => s.amount / Decimal::from(12),
        })
        .sum()
}

pub fn yearly_subscription_cost(subscriptions: &[Subscription]) -> Decimal {
    monthly_subscription_cost(subscriptions) * Decimal::from(12)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetState {
    OnTrack,
    Warning,
    Exceeded,
}

impl BudgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetReport {
    pub category: String,
    pub monthly_limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub state: BudgetState,
}

/// Budget standing for one category in the given `YYYY-MM` month. Spend is
/// recomputed from the expense records on every call; nothing is cached.
/// Exceeded at >= 100% and warning at >= 80%, both boundaries inclusive.
pub fn budget_report(budget: &Budget, expenses: &[Expense], month: &str) -> BudgetReport {
    let spent: Decimal = expenses
        .iter()
        .filter(|e| e.category == budget.category && month_key(e.date.date()) == month)
        .map(|e| e.amount)
        .sum();
    let percent_used = percent(spent, budget.monthly_limit);
    let state = if percent_used >= Decimal::from(100) {
        BudgetState::Exceeded
    } else if percent_used >= Decimal::from(80) {
        BudgetState::Warning
    } else {
        BudgetState::OnTrack
    };
    BudgetReport {
        category: budget.category.clone(),
        monthly_limit: budget.monthly_limit,
        spent,
        remaining: budget.monthly_limit - spent,
        percent_used,
        state,
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct DebtSchedule {
    pub emi: Decimal,
    pub total_interest: Decimal,
    pub total_payable: Decimal,
}

/// Reducing-balance amortization: emi = P*r*(1+r)^n / ((1+r)^n - 1) with
/// the monthly rate r. A zero rate degrades to straight division and a
/// zero tenure yields an all-zero schedule instead of dividing by zero.
pub fn debt_schedule(
    principal: Decimal,
    annual_rate_pct: Decimal,
    tenure_months: u32,
) -> DebtSchedule {
    if tenure_months == 0 || principal <= Decimal::ZERO {
        return DebtSchedule {
            emi: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_payable: Decimal::ZERO,
        };
    }
    let months = Decimal::from(tenure_months);
    let monthly_rate = annual_rate_pct / Decimal::from(1200);
    let emi = if monthly_rate.is_zero() {
        principal / months
    } else {
        let growth = compound(Decimal::ONE + monthly_rate, tenure_months);
        principal * monthly_rate * growth / (growth - Decimal::ONE)
    };
    let emi = emi.round_dp(2);
    let total_payable = (emi * months).round_dp(2);
    let total_interest = (total_payable - principal).round_dp(2).max(Decimal::ZERO);
    DebtSchedule {
        emi,
        total_interest,
        total_payable,
    }
}

// (1+r)^n by repeated multiplication; tenures are small.
fn compound(factor: Decimal, n: u32) -> Decimal {
    let mut acc = Decimal::ONE;
    for _ in 0..n {
        acc *= factor;
    }
    acc
}

#[derive(Debug, Serialize)]
pub struct DebtProgress {
    pub schedule: DebtSchedule,
    pub remaining: Decimal,
    pub percent_paid: Decimal,
}

pub fn debt_progress(debt: &Debt) -> DebtProgress {
    let schedule = debt_schedule(debt.principal, debt.annual_rate_pct, debt.tenure_months);
    let remaining = (schedule.total_payable - debt.amount_paid).max(Decimal::ZERO);
    let percent_paid = percent(debt.amount_paid, schedule.total_payable).min(Decimal::from(100));
    DebtProgress {
        schedule,
        remaining,
        percent_paid,
    }
}

/// Progress toward a goal, capped at 100 for display even when the saved
/// amount has overshot the target.
pub fn goal_progress_percent(goal: &Goal) -> Decimal {
    percent(goal.current_amount, goal.target_amount).min(Decimal::from(100))
}

#[derive(Debug, Serialize)]
pub struct GoalPace {
    pub days_remaining: i64,
    pub remaining_amount: Decimal,
    pub daily_savings_needed: Decimal,
    pub monthly_savings_needed: Decimal,
}

/// What it takes to still hit the goal by its target date. A met goal
/// needs nothing per day; a passed date concentrates the remainder into a
/// single day rather than going negative.
pub fn goal_pace(goal: &Goal, today: NaiveDate) -> GoalPace {
    let days_remaining = (goal.target_date - today).num_days().max(0);
    let remaining_amount = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    let daily_savings_needed = if remaining_amount.is_zero() {
        Decimal::ZERO
    } else {
        remaining_amount / Decimal::from(days_remaining.max(1))
    };
    GoalPace {
        days_remaining,
        remaining_amount,
        daily_savings_needed,
        monthly_savings_needed: daily_savings_needed * Decimal::from(30),
    }
}

/// Next due date one frequency interval after `from`. Month-based
/// intervals keep the day-of-month, clamped to shorter months.
pub fn next_occurrence(frequency: Frequency, from: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Weekly => from + Duration::days(7),
        Frequency::BiWeekly => from + Duration::days(14),
        Frequency::Monthly => add_months(from, 1),
        Frequency::Quarterly => add_months(from, 3),
        Frequency::Yearly => add_months(from, 12),
    }
}

fn add_months(from: NaiveDate, months: u32) -> NaiveDate {
    from.checked_add_months(Months::new(months)).unwrap_or(from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighSpendingDay,
    LateNightOrdering,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighSpendingDay => "high_spending_day",
            Self::LateNightOrdering => "late_night_ordering",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BehaviourAlert {
    pub kind: AlertKind,
    pub day: Option<&'static str>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WeekdaySpend {
    pub day: &'static str,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BehaviourReport {
    pub weekday_spending: Vec<WeekdaySpend>,
    pub late_night_orders: usize,
    pub weekend_spending: Decimal,
    pub alerts: Vec<BehaviourAlert>,
}

/// Spending-behaviour patterns. Late night spans midnight: 22:00 up to but
/// excluding 04:00. A weekday alerts when its spending exceeds 75% of the
/// heaviest weekday's.
pub fn behaviour_report(expenses: &[Expense]) -> BehaviourReport {
    let mut weekday_totals = [Decimal::ZERO; 7];
    let mut late_night_orders = 0usize;
    let mut weekend_spending = Decimal::ZERO;

    for e in expenses {
        let idx = e.date.weekday().num_days_from_monday() as usize;
        weekday_totals[idx] += e.amount;
        let hour = e.date.hour();
        if hour >= 22 || hour < 4 {
            late_night_orders += 1;
        }
        if idx >= 5 {
            weekend_spending += e.amount;
        }
    }

    let max_spend = weekday_totals.iter().copied().max().unwrap_or(Decimal::ZERO);
    let threshold = max_spend * Decimal::new(75, 2);

    let mut alerts = Vec::new();
    if !max_spend.is_zero() {
        for (idx, amount) in weekday_totals.iter().enumerate() {
            if *amount > threshold {
                alerts.push(BehaviourAlert {
                    kind: AlertKind::HighSpendingDay,
                    day: Some(WEEKDAY_NAMES[idx]),
                    message: format!(
                        "You tend to overspend on {}s. Be mindful today!",
                        WEEKDAY_NAMES[idx]
                    ),
                });
            }
        }
    }
    if late_night_orders > LATE_NIGHT_ALERT_THRESHOLD {
        alerts.push(BehaviourAlert {
            kind: AlertKind::LateNightOrdering,
            day: None,
            message: format!(
                "You've made {} late-night purchases. Consider setting a reminder!",
                late_night_orders
            ),
        });
    }

    BehaviourReport {
        weekday_spending: weekday_totals
            .into_iter()
            .enumerate()
            .map(|(idx, amount)| WeekdaySpend {
                day: WEEKDAY_NAMES[idx],
                amount,
            })
            .collect(),
        late_night_orders,
        weekend_spending,
        alerts,
    }
}

const MERCHANT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Zomato", &["zomato"]),
    ("Swiggy", &["swiggy"]),
    ("Amazon", &["amazon", "amzn"]),
    ("Flipkart", &["flipkart"]),
    ("Uber", &["uber"]),
    ("Ola", &["ola"]),
    ("Netflix", &["netflix"]),
    ("Prime Video", &["prime", "amazon video"]),
    ("Spotify", &["spotify"]),
    ("Starbucks", &["starbucks"]),
    ("McDonald's", &["mcdonalds", "mcd", "mcdonald"]),
    ("BigBasket", &["bigbasket"]),
    ("Blinkit", &["blinkit", "grofers"]),
];

#[derive(Debug, Serialize)]
pub struct MerchantSummary {
    pub merchant: String,
    pub total_spent: Decimal,
    pub transaction_count: usize,
    pub average_transaction: Decimal,
}

/// Groups expenses by well-known merchants matched from the merchant and
/// description text; everything unmatched lands under "Others". Sorted by
/// total spent, descending.
pub fn merchant_insights(expenses: &[Expense]) -> Vec<MerchantSummary> {
    let mut buckets: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for e in expenses {
        let text = format!(
            "{} {}",
            e.merchant.as_deref().unwrap_or(""),
            e.description
        )
        .to_lowercase();
        let label = MERCHANT_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(name, _)| *name)
            .unwrap_or("Others");
        let entry = buckets.entry(label).or_insert((Decimal::ZERO, 0));
        entry.0 += e.amount;
        entry.1 += 1;
    }

    let mut out: Vec<MerchantSummary> = buckets
        .into_iter()
        .map(|(merchant, (total, count))| MerchantSummary {
            merchant: merchant.to_string(),
            total_spent: total,
            transaction_count: count,
            average_transaction: if count == 0 {
                Decimal::ZERO
            } else {
                (total / Decimal::from(count as u64)).round_dp(2)
            },
        })
        .collect();
    out.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    out
}

#[derive(Debug, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_spending: Decimal,
    pub total_income: Decimal,
    pub savings: Decimal,
    pub top_category: Option<CategorySpend>,
    pub biggest_purchase: Option<Expense>,
    pub transaction_count: usize,
    pub next_week_target: Decimal,
    pub category_breakdown: BTreeMap<String, Decimal>,
}

/// Rollup of the trailing seven days. The next-week target nudges spending
/// down to 80% of the week just ended.
pub fn weekly_report(
    expenses: &[Expense],
    income: &[IncomeEntry],
    today: NaiveDate,
) -> WeeklyReport {
    let week_start = today - Duration::days(7);
    let week: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.date.date() >= week_start && e.date.date() <= today)
        .collect();
    let week_income: Decimal = income
        .iter()
        .filter(|i| i.date.date() >= week_start && i.date.date() <= today)
        .map(|i| i.amount)
        .sum();

    let total_spending: Decimal = week.iter().map(|e| e.amount).sum();

    let mut breakdown = BTreeMap::new();
    for e in &week {
        *breakdown.entry(e.category.clone()).or_insert(Decimal::ZERO) += e.amount;
    }
    let top_category = breakdown
        .iter()
        .fold(None::<(&String, Decimal)>, |best, (cat, amt)| match best {
            Some((_, best_amt)) if *amt <= best_amt => best,
            _ => Some((cat, *amt)),
        })
        .map(|(category, amount)| CategorySpend {
            category: category.clone(),
            amount,
        });

    let biggest_purchase = week
        .iter()
        .fold(None::<&&Expense>, |best, e| match best {
            Some(b) if e.amount <= b.amount => best,
            _ => Some(e),
        })
        .map(|e| (*e).clone());

    WeeklyReport {
        week_start,
        week_end: today,
        total_spending,
        total_income: week_income,
        savings: week_income - total_spending,
        top_category,
        biggest_purchase,
        transaction_count: week.len(),
        next_week_target: total_spending * Decimal::new(8, 1),
        category_breakdown: breakdown,
    }
}

#[derive(Debug, Serialize)]
pub struct DuplicateGroup {
    pub original: Expense,
    pub duplicates: Vec<Expense>,
}

/// Likely double entries: same amount, category and calendar day. Each
/// expense belongs to at most one group.
pub fn find_duplicates(expenses: &[Expense]) -> Vec<DuplicateGroup> {
    let mut checked: HashSet<i64> = HashSet::new();
    let mut groups = Vec::new();

    for (i, first) in expenses.iter().enumerate() {
        if checked.contains(&first.id) {
            continue;
        }
        let duplicates: Vec<Expense> = expenses
            .iter()
            .enumerate()
            .filter(|(j, other)| {
                *j != i
                    && !checked.contains(&other.id)
                    && other.amount == first.amount
                    && other.category == first.category
                    && other.date.date() == first.date.date()
            })
            .map(|(_, e)| e.clone())
            .collect();
        if !duplicates.is_empty() {
            checked.insert(first.id);
            for d in &duplicates {
                checked.insert(d.id);
            }
            groups.push(DuplicateGroup {
                original: first.clone(),
                duplicates,
            });
        }
    }
    groups
}
