//! Insight Rules
//!
//! Pure functions over loaded account records. Nothing here touches storage
//! or the network; the only nondeterminism is the injected `MarketSource`.

mod allocation;
mod categorize;
mod notifications;
mod products;

pub use allocation::{
    allocate, investment_strategy, Allocation, AssetClass, FixedMarket, InvestmentStrategy,
    MarketSource, UniformMarket, LARGE_BALANCE, MAX_FLUCTUATION,
};
pub use categorize::{categorize_transactions, CategorizedTransactions, Category};
pub use notifications::{
    check_loan_repayment, check_savings_goal, check_transaction_limit, generate_notifications,
    NotificationThresholds,
};
pub use products::{
    recommend_products, MORTGAGE, PERSONAL_LOAN, PREMIUM_CARD, SMALL_LOAN, STANDARD_CARD,
    STORE_CARD,
};
