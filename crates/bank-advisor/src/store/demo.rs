//! Demo Data
//!
//! Two sample customers used to seed a fresh database and in tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{
    Account, AccountSnapshot, LoanPosition, RiskTolerance, SavingsPosition, Transaction,
};

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap_or_default()
}

fn ledger(account_id: i64, entries: &[(u32, &str, Decimal)]) -> Vec<Transaction> {
    entries
        .iter()
        .map(|&(day, description, amount)| Transaction::new(account_id, march(day), description, amount))
        .collect()
}

/// Sample customers, ids 1 and 2, transactions oldest first
pub fn demo_snapshots() -> Vec<AccountSnapshot> {
    vec![
        AccountSnapshot {
            account: Account {
                id: 1,
                username: "priya".into(),
                password: "password123".into(),
                email: Some("john@example.com".into()),
                income: dec!(6000),
                expenses: dec!(2000),
                savings_goal: dec!(10000),
                risk_tolerance: RiskTolerance::Medium,
                investment_goals: "Retirement planning".into(),
                credit_score: 720,
            },
            transactions: ledger(
                1,
                &[
                    (1, "Grocery Store", dec!(-150)),
                    (2, "Restaurant", dec!(-50)),
                    (3, "Amazon Shopping", dec!(-200)),
                    (4, "Salary", dec!(6000)),
                    (5, "Subscription Service", dec!(-20)),
                ],
            ),
            savings: SavingsPosition { balance: dec!(8000) },
            loan: LoanPosition {
                balance: dec!(2500),
                interest_rate: dec!(5.5),
            },
        },
        AccountSnapshot {
            account: Account {
                id: 2,
                username: "priya1".into(),
                password: "password456".into(),
                email: Some("jane@example.com".into()),
                income: dec!(4500),
                expenses: dec!(1500),
                savings_goal: dec!(5000),
                risk_tolerance: RiskTolerance::High,
                investment_goals: "Real estate investment".into(),
                credit_score: 690,
            },
            transactions: ledger(
                2,
                &[
                    (1, "Movie Tickets", dec!(-30)),
                    (2, "Dining Out", dec!(-60)),
                    (3, "Salary", dec!(4500)),
                    (4, "Internet Bill", dec!(-40)),
                    (5, "Shopping Mall", dec!(-120)),
                ],
            ),
            savings: SavingsPosition { balance: dec!(3000) },
            loan: LoanPosition {
                balance: dec!(1500),
                interest_rate: dec!(7.0),
            },
        },
    ]
}
