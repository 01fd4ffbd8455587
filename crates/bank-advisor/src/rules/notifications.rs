//! Notification Rules
//!
//! Three independent threshold checks over savings, spending and loan data.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::{LoanPosition, SavingsPosition, Transaction};

/// Thresholds the notification checks compare against
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationThresholds {
    /// Savings balance that counts as reaching the goal
    pub savings_goal: Decimal,

    /// Total transaction amount above which an overspend alert fires
    pub spend_limit: Decimal,

    /// Loan balance at or below which repayment is suggested
    pub repayment_threshold: Decimal,
}

impl Default for NotificationThresholds {
    fn default() -> Self {
        Self {
            savings_goal: dec!(10000),
            spend_limit: dec!(5000),
            repayment_threshold: dec!(500),
        }
    }
}

pub fn check_savings_goal(savings_balance: Decimal, savings_goal: Decimal) -> Option<String> {
    (savings_balance >= savings_goal).then(|| {
        format!("Congratulations! You have reached your savings goal of ${savings_goal}.")
    })
}

/// Sums every amount, income included, before comparing against the limit
pub fn check_transaction_limit(
    transactions: &[Transaction],
    transaction_limit: Decimal,
) -> Option<String> {
    let total: Decimal = transactions.iter().map(|t| t.amount).sum();
    (total > transaction_limit).then(|| {
        format!("Alert: You have exceeded your transaction limit of ${transaction_limit}.")
    })
}

pub fn check_loan_repayment(loan_balance: Decimal, repayment_threshold: Decimal) -> Option<String> {
    (loan_balance <= repayment_threshold).then(|| {
        format!(
            "Your loan balance has fallen below ${repayment_threshold}. You can now consider repayment."
        )
    })
}

/// Run all checks in fixed order: savings goal, spend limit, loan repayment
pub fn generate_notifications(
    savings: &SavingsPosition,
    transactions: &[Transaction],
    loan: &LoanPosition,
    thresholds: &NotificationThresholds,
) -> Vec<String> {
    [
        check_savings_goal(savings.balance, thresholds.savings_goal),
        check_transaction_limit(transactions, thresholds.spend_limit),
        check_loan_repayment(loan.balance, thresholds.repayment_threshold),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(amount: Decimal) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        Transaction::new(1, date, "Entry", amount)
    }

    fn loan(balance: Decimal) -> LoanPosition {
        LoanPosition {
            balance,
            interest_rate: dec!(5.5),
        }
    }

    #[test]
    fn test_savings_goal_boundary() {
        let goal = dec!(10000);
        assert!(check_savings_goal(dec!(10000), goal).is_some());
        assert!(check_savings_goal(dec!(25000.50), goal).is_some());
        assert!(check_savings_goal(dec!(9999.99), goal).is_none());
        assert_eq!(
            check_savings_goal(dec!(10000), goal).unwrap(),
            "Congratulations! You have reached your savings goal of $10000."
        );
    }

    #[test]
    fn test_transaction_limit_sums_signed_amounts() {
        // Salary alone would exceed the limit; the spending offsets it
        let entries = [tx(dec!(6000)), tx(dec!(-150)), tx(dec!(-200))];
        assert!(check_transaction_limit(&entries, dec!(5000)).is_some());

        let entries = [tx(dec!(6000)), tx(dec!(-1500))];
        assert!(check_transaction_limit(&entries, dec!(5000)).is_none());

        // Exactly at the limit is not over it
        assert!(check_transaction_limit(&[tx(dec!(5000))], dec!(5000)).is_none());
        assert!(check_transaction_limit(&[], dec!(5000)).is_none());
    }

    #[test]
    fn test_loan_repayment_threshold() {
        assert!(check_loan_repayment(dec!(450), dec!(500)).is_some());
        assert!(check_loan_repayment(dec!(500), dec!(500)).is_some());
        assert!(check_loan_repayment(dec!(550), dec!(500)).is_none());
    }

    #[test]
    fn test_notifications_in_check_order() {
        let savings = SavingsPosition { balance: dec!(12000) };
        let entries = [tx(dec!(7000))];
        let notes = generate_notifications(
            &savings,
            &entries,
            &loan(dec!(450)),
            &NotificationThresholds::default(),
        );

        assert_eq!(notes.len(), 3);
        assert!(notes[0].starts_with("Congratulations!"));
        assert!(notes[1].starts_with("Alert:"));
        assert_eq!(
            notes[2],
            "Your loan balance has fallen below $500. You can now consider repayment."
        );
    }

    #[test]
    fn test_no_notifications() {
        let savings = SavingsPosition { balance: dec!(8000) };
        let entries = [tx(dec!(-1500)), tx(dec!(6000))];
        let notes = generate_notifications(
            &savings,
            &entries,
            &loan(dec!(2500)),
            &NotificationThresholds::default(),
        );
        assert!(notes.is_empty());
    }

    #[test]
    fn test_spend_exactly_at_limit_is_quiet() {
        let savings = SavingsPosition { balance: dec!(8000) };
        let at_limit = [tx(dec!(-1000)), tx(dec!(6000))];
        let notes = generate_notifications(
            &savings,
            &at_limit,
            &loan(dec!(2500)),
            &NotificationThresholds::default(),
        );
        assert!(notes.is_empty());

        let over_limit = [tx(dec!(-999.99)), tx(dec!(6000))];
        let notes = generate_notifications(
            &savings,
            &over_limit,
            &loan(dec!(2500)),
            &NotificationThresholds::default(),
        );
        assert_eq!(notes, ["Alert: You have exceeded your transaction limit of $5000."]);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = NotificationThresholds {
            savings_goal: dec!(5000),
            ..Default::default()
        };
        let notes = generate_notifications(
            &SavingsPosition { balance: dec!(8000) },
            &[],
            &loan(dec!(2500)),
            &thresholds,
        );
        assert_eq!(
            notes,
            ["Congratulations! You have reached your savings goal of $5000."]
        );
    }
}
