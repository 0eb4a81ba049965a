//! Domain models for FinancePlay
//!
//! Every record belongs to exactly one user. Amounts are decimal values in the
//! base currency; record dates are calendar dates, audit timestamps are UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Category names that route a transaction out of spending
pub const INCOME_CATEGORY: &str = "income";
pub const SAVINGS_CATEGORY: &str = "savings";

/// Symbol prefixed to every amount shown to users
pub const CURRENCY_SYMBOL: &str = "R";

/// Format an amount as whole currency units, e.g. `R120`
pub fn format_money(amount: f64) -> String {
    format!("{}{:.0}", CURRENCY_SYMBOL, finite_or_zero(amount))
}

/// Replace NaN and infinities with 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Whatever a client sent in an amount field
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize an amount leniently: missing, non-numeric and non-finite
/// values all read as 0. Numeric strings ("12.50") are accepted.
pub fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        RawAmount::Other(_) => 0.0,
    };
    Ok(finite_or_zero(value))
}

/// Same as [`lenient_amount`] for optional fields; null stays `None`
pub fn lenient_optional_amount<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<RawAmount>::deserialize(deserializer)? {
        None => None,
        Some(RawAmount::Number(n)) => Some(n),
        Some(RawAmount::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(RawAmount::Other(_)) => None,
    };
    Ok(value.map(finite_or_zero))
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// How a transaction moves money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Savings,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Savings => "savings",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "spend" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "savings" | "saving" => Ok(Self::Savings),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single money movement recorded by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    /// Free-form and case-sensitive
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Transaction {
    /// Kind after applying the category overrides: the `income` and `savings`
    /// categories always win, otherwise the explicit kind, otherwise expense.
    pub fn resolved_kind(&self) -> TransactionKind {
        resolve_kind(&self.category, self.kind)
    }
}

/// Kind resolution shared by stored and incoming transactions
pub fn resolve_kind(category: &str, kind: Option<TransactionKind>) -> TransactionKind {
    match category {
        INCOME_CATEGORY => TransactionKind::Income,
        SAVINGS_CATEGORY => TransactionKind::Savings,
        _ => kind.unwrap_or(TransactionKind::Expense),
    }
}

/// A transaction to insert
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub description: String,
    /// Defaults to today when absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// An income record kept in its own ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub source: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub source: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A transfer into savings kept in its own ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsTransfer {
    pub id: i64,
    pub user_id: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsTransfer {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Goal priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort weight: higher ranks first
    pub fn weight(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Parse a priority, reading anything unrecognized as medium
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPriority {
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match RawPriority::deserialize(deserializer)? {
            RawPriority::Text(s) => Self::parse_lenient(&s),
            RawPriority::Other(_) => Self::Medium,
        })
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub target_amount: f64,
    /// Not capped at the target
    #[serde(default, deserialize_with = "lenient_amount")]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub target_amount: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
}

/// A recurring bursary or allowance payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bursary {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub monthly_amount: f64,
    pub next_payment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBursary {
    pub provider: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub monthly_amount: f64,
    pub next_payment_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A spending envelope with an optional monthly limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_optional_amount")]
    pub limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Envelope upsert keyed by name
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategoryInput {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_optional_amount")]
    pub limit: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Free-text journal entry used as coaching context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiaryEntry {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Coaching voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Friendly,
    Strict,
    Humorous,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Strict => "strict",
            Self::Humorous => "humorous",
        }
    }

    /// Tone description inserted into coach prompts
    pub fn tone(&self) -> &'static str {
        match self {
            Self::Friendly => "encouraging, supportive, positive energy",
            Self::Strict => "disciplined, direct, focused on accountability",
            Self::Humorous => "light-hearted, witty, but financially intelligent",
        }
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "friendly" => Ok(Self::Friendly),
            "strict" => Ok(Self::Strict),
            "humorous" | "funny" => Ok(Self::Humorous),
            _ => Err(format!("Unknown persona: {}", s)),
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted gamification counters; level, streak and badges are derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    pub xp: i64,
    pub persona: Persona,
    pub daily_challenge: String,
}

pub const DEFAULT_DAILY_CHALLENGE: &str = "Add your first transaction";

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            xp: 0,
            persona: Persona::Friendly,
            daily_challenge: DEFAULT_DAILY_CHALLENGE.to_string(),
        }
    }
}

/// Speaker of a coaching conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One prior turn of a coaching conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Everything stored for one user, as loaded from persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecords {
    pub user: Option<User>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub savings: Vec<SavingsTransfer>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub bursaries: Vec<Bursary>,
    #[serde(default)]
    pub budget_categories: Vec<BudgetCategory>,
    #[serde(default)]
    pub diary: Vec<DiaryEntry>,
    #[serde(default)]
    pub gamification: GamificationState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_resolution() {
        assert_eq!(resolve_kind("income", None), TransactionKind::Income);
        assert_eq!(
            resolve_kind("savings", Some(TransactionKind::Expense)),
            TransactionKind::Savings
        );
        assert_eq!(
            resolve_kind("food", Some(TransactionKind::Income)),
            TransactionKind::Income
        );
        assert_eq!(resolve_kind("food", None), TransactionKind::Expense);
        // Case-sensitive: "Income" is an ordinary category
        assert_eq!(resolve_kind("Income", None), TransactionKind::Expense);
    }

    #[test]
    fn test_lenient_amounts() {
        let json = r#"{"name":"Laptop","targetAmount":"1500","currentAmount":"abc"}"#;
        let goal: NewGoal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.target_amount, 1500.0);
        assert_eq!(goal.current_amount, 0.0);
        assert_eq!(goal.priority, Priority::Medium);

        let json = r#"{"category":"food","amount":null}"#;
        let tx: NewTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, 0.0);

        let json = r#"{"category":"food"}"#;
        let tx: NewTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, 0.0);

        let json = r#"{"category":"food","amount":{"nested":true}}"#;
        let tx: NewTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, 0.0);
    }

    #[test]
    fn test_lenient_priority() {
        for (raw, expected) in [
            (r#""high""#, Priority::High),
            (r#""LOW""#, Priority::Low),
            (r#""urgent""#, Priority::Medium),
            ("7", Priority::Medium),
            ("null", Priority::Medium),
        ] {
            let p: Priority = serde_json::from_str(raw).unwrap();
            assert_eq!(p, expected, "input {}", raw);
        }
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(-4.5), -4.5);
    }

    #[test]
    fn test_persona_roundtrip() {
        assert_eq!("Strict".parse::<Persona>().unwrap(), Persona::Strict);
        assert!("grumpy".parse::<Persona>().is_err());
        assert_eq!(
            serde_json::to_string(&Persona::Humorous).unwrap(),
            r#""humorous""#
        );
    }
}
