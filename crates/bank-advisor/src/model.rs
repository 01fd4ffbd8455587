//! Domain Models
//!
//! Account records as loaded from storage.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Risk tolerance tag steering portfolio allocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    High,
    Medium,
    Low,
}

impl RiskTolerance {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(AdvisorError::UnknownRiskTolerance(s.to_string())),
        }
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer's profile and settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    /// Storage identifier
    pub id: i64,

    /// Unique login handle
    pub username: String,

    /// Login credential (never serialized out)
    #[serde(skip_serializing, default)]
    pub password: String,

    /// Contact address
    pub email: Option<String>,

    /// Monthly income
    pub income: Decimal,

    /// Monthly expenses
    pub expenses: Decimal,

    /// Savings target
    pub savings_goal: Decimal,

    pub risk_tolerance: RiskTolerance,

    /// Free-text investment goals
    pub investment_goals: String,

    pub credit_score: i64,
}

/// A single ledger entry; positive amounts are income, negative are spending
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(
        account_id: i64,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: 0,
            account_id,
            date,
            description: description.into(),
            amount,
        }
    }
}

/// Savings account position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsPosition {
    pub balance: Decimal,
}

/// Loan account position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPosition {
    pub balance: Decimal,

    /// Annual interest rate, in percent
    pub interest_rate: Decimal,
}

/// Everything the dashboard needs about one account, loaded together
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: Account,

    /// Most recent first
    pub transactions: Vec<Transaction>,

    pub savings: SavingsPosition,

    pub loan: LoanPosition,
}

impl AccountSnapshot {
    /// Sum of all transaction amounts, income and spending alike
    pub fn transaction_total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Re-sort transactions most recent first, newest id first within a day
    pub fn sort_transactions(&mut self) {
        self.transactions
            .sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot() -> AccountSnapshot {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        AccountSnapshot {
            account: Account {
                id: 1,
                username: "priya".into(),
                password: "password123".into(),
                email: None,
                income: dec!(6000),
                expenses: dec!(2000),
                savings_goal: dec!(10000),
                risk_tolerance: RiskTolerance::Medium,
                investment_goals: "Retirement planning".into(),
                credit_score: 720,
            },
            transactions: vec![
                Transaction::new(1, day(1), "Grocery Store", dec!(-150)),
                Transaction::new(1, day(4), "Salary", dec!(6000)),
                Transaction::new(1, day(2), "Restaurant", dec!(-50)),
            ],
            savings: SavingsPosition { balance: dec!(8000) },
            loan: LoanPosition {
                balance: dec!(2500),
                interest_rate: dec!(5.5),
            },
        }
    }

    #[test]
    fn test_risk_tolerance_parse() {
        assert_eq!("high".parse::<RiskTolerance>().unwrap(), RiskTolerance::High);
        assert_eq!(" Medium ".parse::<RiskTolerance>().unwrap(), RiskTolerance::Medium);
        assert!(matches!(
            "reckless".parse::<RiskTolerance>(),
            Err(AdvisorError::UnknownRiskTolerance(tag)) if tag == "reckless"
        ));
    }

    #[test]
    fn test_transaction_total_counts_income_and_spending() {
        assert_eq!(snapshot().transaction_total(), dec!(5800));
    }

    #[test]
    fn test_sort_most_recent_first() {
        let mut snap = snapshot();
        snap.sort_transactions();
        let descriptions: Vec<_> = snap.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["Salary", "Restaurant", "Grocery Store"]);
    }

    #[test]
    fn test_password_not_serialized() {
        let json = serde_json::to_value(snapshot().account).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["risk_tolerance"], "medium");
    }
}
