//! Product Recommendation Rules
//!
//! Threshold checks over income, savings, credit score and transaction
//! history, each contributing at most one offer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::Transaction;

pub const PREMIUM_CARD: &str = "We recommend a premium credit card with cashback benefits.";
pub const STANDARD_CARD: &str = "We recommend a standard credit card with rewards points.";
pub const PERSONAL_LOAN: &str =
    "Consider a personal loan with a low interest rate for further investments.";
pub const SMALL_LOAN: &str = "A small loan could help you fund some of your immediate goals.";
pub const MORTGAGE: &str = "You are eligible for a mortgage loan with a low down payment.";
pub const STORE_CARD: &str =
    "Consider applying for a store-specific credit card for additional discounts.";

/// Raw description that marks a store-card candidate
const STORE_CARD_LABEL: &str = "shopping";

fn card_offer(credit_score: i64) -> Option<&'static str> {
    if credit_score > 700 {
        Some(PREMIUM_CARD)
    } else if credit_score > 650 {
        Some(STANDARD_CARD)
    } else {
        None
    }
}

/// Offers in check order: credit card, personal loan, small loan, mortgage,
/// store card
pub fn recommend_products(
    income: Decimal,
    savings_balance: Decimal,
    credit_score: i64,
    transactions: &[Transaction],
) -> Vec<String> {
    let personal_loan = income > dec!(5000) && savings_balance > dec!(10000);
    let small_loan = income > dec!(3000) && savings_balance > dec!(5000);
    let mortgage = savings_balance > dec!(50000) && income > dec!(7000);
    let store_card = transactions
        .iter()
        .any(|t| t.description == STORE_CARD_LABEL);

    card_offer(credit_score)
        .into_iter()
        .chain(personal_loan.then_some(PERSONAL_LOAN))
        .chain(small_loan.then_some(SMALL_LOAN))
        .chain(mortgage.then_some(MORTGAGE))
        .chain(store_card.then_some(STORE_CARD))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(description: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        Transaction::new(1, date, description, dec!(-120))
    }

    #[test]
    fn test_card_tiers_are_exclusive() {
        assert_eq!(recommend_products(dec!(0), dec!(0), 720, &[]), [PREMIUM_CARD]);
        assert_eq!(recommend_products(dec!(0), dec!(0), 700, &[]), [STANDARD_CARD]);
        assert_eq!(recommend_products(dec!(0), dec!(0), 690, &[]), [STANDARD_CARD]);
        assert!(recommend_products(dec!(0), dec!(0), 650, &[]).is_empty());
    }

    #[test]
    fn test_mid_income_modest_savings() {
        let offers = recommend_products(dec!(6000), dec!(8000), 720, &[]);
        assert_eq!(offers, [PREMIUM_CARD, SMALL_LOAN]);
        assert!(!offers.iter().any(|o| o == MORTGAGE));
        assert!(!offers.iter().any(|o| o == PERSONAL_LOAN));
    }

    #[test]
    fn test_loan_checks_fire_independently() {
        let offers = recommend_products(dec!(8000), dec!(60000), 600, &[]);
        assert_eq!(offers, [PERSONAL_LOAN, SMALL_LOAN, MORTGAGE]);
    }

    #[test]
    fn test_mortgage_needs_income_and_savings() {
        let offers = recommend_products(dec!(7000), dec!(60000), 600, &[]);
        assert!(!offers.iter().any(|o| o == MORTGAGE));
        let offers = recommend_products(dec!(9000), dec!(50000), 600, &[]);
        assert!(!offers.iter().any(|o| o == MORTGAGE));
    }

    #[test]
    fn test_store_card_matches_raw_label_only() {
        let offers = recommend_products(dec!(0), dec!(0), 600, &[tx("Grocery Store"), tx("shopping")]);
        assert_eq!(offers, [STORE_CARD]);

        let offers = recommend_products(dec!(0), dec!(0), 600, &[tx("Shopping Mall")]);
        assert!(offers.is_empty());
    }

    #[test]
    fn test_offers_follow_check_order() {
        let offers = recommend_products(dec!(9000), dec!(75000), 710, &[tx("shopping")]);
        assert_eq!(
            offers,
            [PREMIUM_CARD, PERSONAL_LOAN, SMALL_LOAN, MORTGAGE, STORE_CARD]
        );
    }

    #[test]
    fn test_deterministic() {
        let history = [tx("shopping"), tx("Salary")];
        assert_eq!(
            recommend_products(dec!(4500), dec!(6000), 690, &history),
            recommend_products(dec!(4500), dec!(6000), 690, &history)
        );
    }
}
