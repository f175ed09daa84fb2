// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boundary validation failures. Raised when user input reaches a command
/// handler; records that made it into the store are assumed well-formed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("monthly limit must be greater than zero")]
    NonPositiveLimit,
    #[error("target amount must be greater than zero")]
    NonPositiveTarget,
    #[error("saved amount must not be negative")]
    NegativeCurrent,
    #[error("principal must be greater than zero")]
    NonPositivePrincipal,
    #[error("interest rate must not be negative")]
    NegativeRate,
    #[error("tenure must be at least one month")]
    ZeroTenure,
    #[error("paid amount must not be negative")]
    NegativePaid,
    #[error("unknown billing cycle '{0}' (use daily|weekly|monthly|yearly)")]
    UnknownBillingCycle(String),
    #[error("unknown frequency '{0}' (use weekly|bi-weekly|monthly|quarterly|yearly)")]
    UnknownFrequency(String),
    #[error("unknown transaction type '{0}' (use expense|income)")]
    UnknownKind(String),
    #[error("unknown personality mode '{0}'")]
    UnknownPersonality(String),
    #[error("unknown language '{0}' (use en|hi|te|ta|kn)")]
    UnknownLanguage(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub merchant: Option<String>,
    pub currency: String,
    pub is_regret: bool,
}

impl Expense {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyField("description"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: i64,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub source: String,
    pub currency: String,
}

impl IncomeEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::EmptyField("source"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(ValidationError::UnknownBillingCycle(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub next_billing_date: NaiveDate,
    pub currency: String,
    pub active: bool,
}

impl Subscription {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        Ok(())
    }
}

/// A per-category monthly spending limit. Current spend is always derived
/// from the month's expenses, never stored alongside the limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub monthly_limit: Decimal,
}

impl Budget {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        if self.monthly_limit <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveLimit);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: NaiveDate,
}

impl Goal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveTarget);
        }
        if self.current_amount < Decimal::ZERO {
            return Err(ValidationError::NegativeCurrent);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Active,
    Paid,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub principal: Decimal,
    /// Annual interest rate in percent, e.g. 10.5 for 10.5% p.a.
    pub annual_rate_pct: Decimal,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    pub amount_paid: Decimal,
    pub status: DebtStatus,
}

impl Debt {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.principal <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrincipal);
        }
        if self.annual_rate_pct < Decimal::ZERO {
            return Err(ValidationError::NegativeRate);
        }
        if self.tenure_months == 0 {
            return Err(ValidationError::ZeroTenure);
        }
        if self.amount_paid < Decimal::ZERO {
            return Err(ValidationError::NegativePaid);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "bi-weekly" | "biweekly" => Ok(Self::BiWeekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(ValidationError::UnknownFrequency(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringKind {
    Expense,
    Income,
}

impl RecurringKind {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: RecurringKind,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    pub last_processed: Option<NaiveDateTime>,
    pub active: bool,
}

impl RecurringTemplate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: i64,
    pub pattern: String,
    pub category: String,
    pub merchant_rewrite: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityMode {
    Balanced,
    Saver,
    Spender,
    Minimalist,
    Adventurous,
    Foodie,
}

impl PersonalityMode {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "saver" => Ok(Self::Saver),
            "spender" => Ok(Self::Spender),
            "minimalist" => Ok(Self::Minimalist),
            "adventurous" => Ok(Self::Adventurous),
            "foodie" => Ok(Self::Foodie),
            other => Err(ValidationError::UnknownPersonality(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Saver => "saver",
            Self::Spender => "spender",
            Self::Minimalist => "minimalist",
            Self::Adventurous => "adventurous",
            Self::Foodie => "foodie",
        }
    }
}

pub const LANGUAGES: &[&str] = &["en", "hi", "te", "ta", "kn"];

pub fn parse_language(s: &str) -> Result<String, ValidationError> {
    let lang = s.trim().to_lowercase();
    if LANGUAGES.contains(&lang.as_str()) {
        Ok(lang)
    } else {
        Err(ValidationError::UnknownLanguage(s.to_string()))
    }
}

/// The closed set of user preferences. Anything outside these keys is
/// rejected at the CLI boundary rather than stored as an open map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub base_currency: String,
    pub language: String,
    pub personality: PersonalityMode,
    pub spending_alerts: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            base_currency: "INR".to_string(),
            language: "en".to_string(),
            personality: PersonalityMode::Balanced,
            spending_alerts: true,
        }
    }
}
