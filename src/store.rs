// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The record store: typed CRUD over SQLite, one section per entity.
//! Commands go through here and hand the loaded collections to
//! `analytics`; nothing outside this module touches SQL.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{
    BillingCycle, Budget, CategoryRule, Debt, DebtStatus, Expense, Frequency, Goal, IncomeEntry,
    PersonalityMode, Preferences, RecurringKind, RecurringTemplate, Subscription,
};
use crate::utils::{fmt_datetime, parse_datetime};

fn parse_amount(s: &str, table: &str, id: i64) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in {} row {}", s, table, id))
}

fn parse_day(s: &str, table: &str, id: i64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' in {} row {}", s, table, id))
}

fn parse_stamp(s: &str, table: &str, id: i64) -> Result<NaiveDateTime> {
    parse_datetime(s).with_context(|| format!("Invalid timestamp '{}' in {} row {}", s, table, id))
}

// ---- expenses ----

pub fn insert_expense(conn: &Connection, e: &Expense) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(date, amount, category, description, merchant, currency, is_regret)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            fmt_datetime(&e.date),
            e.amount.to_string(),
            e.category,
            e.description,
            e.merchant,
            e.currency,
            e.is_regret as i64
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All expenses in insertion order, which downstream ranking relies on for
/// stable tie-breaking.
pub fn list_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, category, description, merchant, currency, is_regret
         FROM expenses ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, i64>(7)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, date, amount, category, description, merchant, currency, is_regret) = row?;
        out.push(Expense {
            id,
            date: parse_stamp(&date, "expenses", id)?,
            amount: parse_amount(&amount, "expenses", id)?,
            category,
            description,
            merchant,
            currency,
            is_regret: is_regret != 0,
        });
    }
    Ok(out)
}

pub fn delete_expense(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    Ok(n > 0)
}

#[derive(Debug, Default)]
pub struct ExpenseFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Text/category/date filtering happens in SQL; amount bounds are applied
/// after the rows are parsed since amounts are stored as text.
pub fn search_expenses(conn: &Connection, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
    let mut sql = String::from(
        "SELECT id, date, amount, category, description, merchant, currency, is_regret
         FROM expenses WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(q) = &filter.query {
        sql.push_str(" AND (description LIKE '%'||?||'%' OR merchant LIKE '%'||?||'%')");
        params_vec.push(q.clone());
        params_vec.push(q.clone());
    }
    if let Some(cat) = &filter.category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.clone());
    }
    if let Some(from) = filter.from {
        sql.push_str(" AND substr(date,1,10)>=?");
        params_vec.push(from.format("%Y-%m-%d").to_string());
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND substr(date,1,10)<=?");
        params_vec.push(to.format("%Y-%m-%d").to_string());
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let binds: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(binds))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let category: String = r.get(3)?;
        let description: String = r.get(4)?;
        let merchant: Option<String> = r.get(5)?;
        let currency: String = r.get(6)?;
        let is_regret: i64 = r.get(7)?;
        let amount = parse_amount(&amount, "expenses", id)?;
        if let Some(min) = filter.min_amount {
            if amount < min {
                continue;
            }
        }
        if let Some(max) = filter.max_amount {
            if amount > max {
                continue;
            }
        }
        out.push(Expense {
            id,
            date: parse_stamp(&date, "expenses", id)?,
            amount,
            category,
            description,
            merchant,
            currency,
            is_regret: is_regret != 0,
        });
    }
    Ok(out)
}

// ---- income ----

pub fn insert_income(conn: &Connection, entry: &IncomeEntry) -> Result<i64> {
    conn.execute(
        "INSERT INTO income(date, amount, source, currency) VALUES (?1,?2,?3,?4)",
        params![
            fmt_datetime(&entry.date),
            entry.amount.to_string(),
            entry.source,
            entry.currency
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_income(conn: &Connection) -> Result<Vec<IncomeEntry>> {
    let mut stmt =
        conn.prepare("SELECT id, date, amount, source, currency FROM income ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, date, amount, source, currency) = row?;
        out.push(IncomeEntry {
            id,
            date: parse_stamp(&date, "income", id)?,
            amount: parse_amount(&amount, "income", id)?,
            source,
            currency,
        });
    }
    Ok(out)
}

pub fn delete_income(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM income WHERE id=?1", params![id])?;
    Ok(n > 0)
}

// ---- subscriptions ----

pub fn insert_subscription(conn: &Connection, s: &Subscription) -> Result<i64> {
    conn.execute(
        "INSERT INTO subscriptions(name, amount, billing_cycle, category, next_billing_date, currency, active)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            s.name,
            s.amount.to_string(),
            s.billing_cycle.as_str(),
            s.category,
            s.next_billing_date.format("%Y-%m-%d").to_string(),
            s.currency,
            s.active as i64
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_subscriptions(conn: &Connection) -> Result<Vec<Subscription>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, billing_cycle, category, next_billing_date, currency, active
         FROM subscriptions ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, i64>(7)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, amount, cycle, category, next_billing, currency, active) = row?;
        out.push(Subscription {
            id,
            name,
            amount: parse_amount(&amount, "subscriptions", id)?,
            billing_cycle: BillingCycle::parse(&cycle)
                .with_context(|| format!("Corrupt billing cycle in subscriptions row {}", id))?,
            category,
            next_billing_date: parse_day(&next_billing, "subscriptions", id)?,
            currency,
            active: active != 0,
        });
    }
    Ok(out)
}

pub fn cancel_subscription(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("UPDATE subscriptions SET active=0 WHERE id=?1", params![id])?;
    Ok(n > 0)
}

// ---- budgets ----

pub fn upsert_budget(conn: &Connection, category: &str, monthly_limit: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets(category, monthly_limit) VALUES (?1,?2)
         ON CONFLICT(category) DO UPDATE SET monthly_limit=excluded.monthly_limit",
        params![category, monthly_limit.to_string()],
    )?;
    Ok(())
}

pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt =
        conn.prepare("SELECT id, category, monthly_limit FROM budgets ORDER BY category")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, category, limit) = row?;
        out.push(Budget {
            id,
            category,
            monthly_limit: parse_amount(&limit, "budgets", id)?,
        });
    }
    Ok(out)
}

pub fn budget_for_category(conn: &Connection, category: &str) -> Result<Option<Budget>> {
    let found: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, monthly_limit FROM budgets WHERE category=?1",
            params![category],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    match found {
        Some((id, limit)) => Ok(Some(Budget {
            id,
            category: category.to_string(),
            monthly_limit: parse_amount(&limit, "budgets", id)?,
        })),
        None => Ok(None),
    }
}

// ---- goals ----

pub fn insert_goal(conn: &Connection, g: &Goal) -> Result<i64> {
    conn.execute(
        "INSERT INTO goals(name, target_amount, current_amount, target_date) VALUES (?1,?2,?3,?4)",
        params![
            g.name,
            g.target_amount.to_string(),
            g.current_amount.to_string(),
            g.target_date.format("%Y-%m-%d").to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_goals(conn: &Connection) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, target_amount, current_amount, target_date FROM goals ORDER BY target_date",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, target, current, date) = row?;
        out.push(Goal {
            id,
            name,
            target_amount: parse_amount(&target, "goals", id)?,
            current_amount: parse_amount(&current, "goals", id)?,
            target_date: parse_day(&date, "goals", id)?,
        });
    }
    Ok(out)
}

pub fn goal_by_id(conn: &Connection, id: i64) -> Result<Option<Goal>> {
    let found: Option<(String, String, String, String)> = conn
        .query_row(
            "SELECT name, target_amount, current_amount, target_date FROM goals WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;
    match found {
        Some((name, target, current, date)) => Ok(Some(Goal {
            id,
            name,
            target_amount: parse_amount(&target, "goals", id)?,
            current_amount: parse_amount(&current, "goals", id)?,
            target_date: parse_day(&date, "goals", id)?,
        })),
        None => Ok(None),
    }
}

pub fn set_goal_current(conn: &Connection, id: i64, current: Decimal) -> Result<bool> {
    let n = conn.execute(
        "UPDATE goals SET current_amount=?1 WHERE id=?2",
        params![current.to_string(), id],
    )?;
    Ok(n > 0)
}

// ---- debts ----

pub fn insert_debt(conn: &Connection, d: &Debt) -> Result<i64> {
    conn.execute(
        "INSERT INTO debts(name, principal, annual_rate, tenure_months, start_date, amount_paid, status)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            d.name,
            d.principal.to_string(),
            d.annual_rate_pct.to_string(),
            d.tenure_months,
            d.start_date.format("%Y-%m-%d").to_string(),
            d.amount_paid.to_string(),
            d.status.as_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_debts(conn: &Connection) -> Result<Vec<Debt>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, principal, annual_rate, tenure_months, start_date, amount_paid, status
         FROM debts ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, principal, rate, tenure, start, paid, status) = row?;
        out.push(Debt {
            id,
            name,
            principal: parse_amount(&principal, "debts", id)?,
            annual_rate_pct: parse_amount(&rate, "debts", id)?,
            tenure_months: u32::try_from(tenure)
                .with_context(|| format!("Corrupt tenure {} in debts row {}", tenure, id))?,
            start_date: parse_day(&start, "debts", id)?,
            amount_paid: parse_amount(&paid, "debts", id)?,
            status: match status.as_str() {
                "paid" => DebtStatus::Paid,
                _ => DebtStatus::Active,
            },
        });
    }
    Ok(out)
}

pub fn debt_by_id(conn: &Connection, id: i64) -> Result<Option<Debt>> {
    Ok(list_debts(conn)?.into_iter().find(|d| d.id == id))
}

pub fn record_debt_payment(conn: &Connection, id: i64, paid_total: Decimal) -> Result<bool> {
    let n = conn.execute(
        "UPDATE debts SET amount_paid=?1 WHERE id=?2",
        params![paid_total.to_string(), id],
    )?;
    Ok(n > 0)
}

pub fn set_debt_status(conn: &Connection, id: i64, status: DebtStatus) -> Result<bool> {
    let n = conn.execute(
        "UPDATE debts SET status=?1 WHERE id=?2",
        params![status.as_str(), id],
    )?;
    Ok(n > 0)
}

pub fn delete_debt(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM debts WHERE id=?1", params![id])?;
    Ok(n > 0)
}

// ---- recurring templates ----

pub fn insert_recurring(conn: &Connection, t: &RecurringTemplate) -> Result<i64> {
    conn.execute(
        "INSERT INTO recurring(name, amount, category, kind, frequency, next_date, last_processed, active)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            t.name,
            t.amount.to_string(),
            t.category,
            t.kind.as_str(),
            t.frequency.as_str(),
            t.next_date.format("%Y-%m-%d").to_string(),
            t.last_processed.as_ref().map(fmt_datetime),
            t.active as i64
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_recurring(conn: &Connection) -> Result<Vec<RecurringTemplate>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, category, kind, frequency, next_date, last_processed, active
         FROM recurring ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, i64>(8)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, amount, category, kind, frequency, next_date, last_processed, active) =
            row?;
        out.push(RecurringTemplate {
            id,
            name,
            amount: parse_amount(&amount, "recurring", id)?,
            category,
            kind: RecurringKind::parse(&kind)
                .with_context(|| format!("Corrupt kind in recurring row {}", id))?,
            frequency: Frequency::parse(&frequency)
                .with_context(|| format!("Corrupt frequency in recurring row {}", id))?,
            next_date: parse_day(&next_date, "recurring", id)?,
            last_processed: match last_processed {
                Some(s) => Some(parse_stamp(&s, "recurring", id)?),
                None => None,
            },
            active: active != 0,
        });
    }
    Ok(out)
}

pub fn advance_recurring(
    conn: &Connection,
    id: i64,
    next_date: NaiveDate,
    processed_at: NaiveDateTime,
) -> Result<()> {
    conn.execute(
        "UPDATE recurring SET next_date=?1, last_processed=?2 WHERE id=?3",
        params![
            next_date.format("%Y-%m-%d").to_string(),
            fmt_datetime(&processed_at),
            id
        ],
    )?;
    Ok(())
}

pub fn set_recurring_active(conn: &Connection, id: i64, active: bool) -> Result<bool> {
    let n = conn.execute(
        "UPDATE recurring SET active=?1 WHERE id=?2",
        params![active as i64, id],
    )?;
    Ok(n > 0)
}

// ---- categorization rules ----

pub fn insert_rule(conn: &Connection, rule: &CategoryRule) -> Result<i64> {
    conn.execute(
        "INSERT INTO rules(pattern, category, merchant_rewrite) VALUES (?1,?2,?3)",
        params![rule.pattern, rule.category, rule.merchant_rewrite],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_rules(conn: &Connection) -> Result<Vec<CategoryRule>> {
    let mut stmt = conn
        .prepare("SELECT id, pattern, category, merchant_rewrite FROM rules ORDER BY id DESC")?;
    let rows = stmt.query_map([], |r| {
        Ok(CategoryRule {
            id: r.get(0)?,
            pattern: r.get(1)?,
            category: r.get(2)?,
            merchant_rewrite: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn delete_rule(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
    Ok(n > 0)
}

/// Newest rule wins. Matches against description plus merchant text and
/// returns the category to assign and an optional merchant rewrite.
pub fn apply_category_rules(
    conn: &Connection,
    description: &str,
    merchant: Option<&str>,
) -> Result<Option<(String, Option<String>)>> {
    let hay = if let Some(m) = merchant {
        format!("{} {}", description, m)
    } else {
        description.to_string()
    };
    for rule in list_rules(conn)? {
        if let Ok(re) = Regex::new(&rule.pattern) {
            if re.is_match(&hay) {
                return Ok(Some((rule.category, rule.merchant_rewrite)));
            }
        }
    }
    Ok(None)
}

// ---- preferences ----

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn preferences(conn: &Connection) -> Result<Preferences> {
    let defaults = Preferences::default();
    let personality = match get_setting(conn, "personality_mode")? {
        Some(s) => PersonalityMode::parse(&s)
            .with_context(|| format!("Corrupt personality mode '{}'", s))?,
        None => defaults.personality,
    };
    Ok(Preferences {
        base_currency: get_setting(conn, "base_currency")?.unwrap_or(defaults.base_currency),
        language: get_setting(conn, "language")?.unwrap_or(defaults.language),
        personality,
        spending_alerts: match get_setting(conn, "spending_alerts")? {
            Some(s) => s != "off",
            None => defaults.spending_alerts,
        },
    })
}

pub fn base_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "base_currency")?.unwrap_or_else(|| "INR".to_string()))
}
