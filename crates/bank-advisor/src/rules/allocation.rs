//! Market-Adjusted Allocation
//!
//! Splits funds across stocks, bonds and real estate by risk tolerance,
//! nudged by a market fluctuation drawn from an injected `MarketSource`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::RiskTolerance;

/// Largest market move, either direction
pub const MAX_FLUCTUATION: Decimal = dec!(0.05);

/// Savings balance above which diversification advice is added
pub const LARGE_BALANCE: Decimal = dec!(100000);

const LARGE_BALANCE_ADVICE: &str =
    "You have a large savings balance, consider including real estate and alternative investments.";

/// Source of the market fluctuation applied to each allocation
pub trait MarketSource: Send + Sync {
    /// A value in `[-MAX_FLUCTUATION, MAX_FLUCTUATION]`
    fn fluctuation(&self) -> Decimal;
}

/// Draws uniformly from the full fluctuation range on every call
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformMarket;

impl MarketSource for UniformMarket {
    fn fluctuation(&self) -> Decimal {
        // Micro-unit resolution over [-0.05, 0.05]
        let micros = rand::thread_rng().gen_range(-50_000_i64..=50_000);
        Decimal::new(micros, 6)
    }
}

/// Always returns the same fluctuation
#[derive(Clone, Copy, Debug)]
pub struct FixedMarket(Decimal);

impl FixedMarket {
    /// Values outside the allowed range are clamped
    pub fn new(fluctuation: Decimal) -> Self {
        Self(fluctuation.clamp(-MAX_FLUCTUATION, MAX_FLUCTUATION))
    }

    pub const fn calm() -> Self {
        Self(Decimal::ZERO)
    }
}

impl MarketSource for FixedMarket {
    fn fluctuation(&self) -> Decimal {
        self.0
    }
}

/// Asset classes the allocation splits funds across
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stocks,
    Bonds,
    RealEstate,
}

impl AssetClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Bonds => "bonds",
            Self::RealEstate => "real_estate",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of funds per asset class; fractions sum to one
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    weights: BTreeMap<AssetClass, Decimal>,
}

impl Allocation {
    pub fn get(&self, class: AssetClass) -> Option<Decimal> {
        self.weights.get(&class).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, Decimal)> + '_ {
        self.weights.iter().map(|(class, weight)| (*class, *weight))
    }

    pub fn total(&self) -> Decimal {
        self.weights.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Tier formulas before normalization: (stocks, bonds, real estate)
fn raw_weights(tolerance: RiskTolerance, f: Decimal) -> (Decimal, Decimal, Decimal) {
    match tolerance {
        RiskTolerance::High => (dec!(0.7) + f, dec!(0.2) - f / dec!(2), dec!(0.1)),
        RiskTolerance::Medium => (dec!(0.4) + f / dec!(2), dec!(0.4) - f / dec!(4), dec!(0.2)),
        RiskTolerance::Low => (dec!(0.3), dec!(0.6) + f / dec!(3), dec!(0.1)),
    }
}

/// Allocate by risk tier for a given market fluctuation.
///
/// The tier formulas do not sum to one once the market moves (high sums to
/// `1 + f/2`), so the raw weights are normalized. Stocks and real estate are
/// rounded to six places and bonds take the remainder, keeping the total
/// exactly one.
pub fn allocate(tolerance: RiskTolerance, fluctuation: Decimal) -> Allocation {
    let f = fluctuation.clamp(-MAX_FLUCTUATION, MAX_FLUCTUATION);
    let (stocks, bonds, real_estate) = raw_weights(tolerance, f);
    let total = stocks + bonds + real_estate;

    let stocks = (stocks / total).round_dp(6);
    let real_estate = (real_estate / total).round_dp(6);
    let bonds = Decimal::ONE - stocks - real_estate;

    let weights = BTreeMap::from([
        (AssetClass::Stocks, stocks),
        (AssetClass::Bonds, bonds),
        (AssetClass::RealEstate, real_estate),
    ]);

    Allocation { weights }
}

/// Allocation plus the human-readable strategy shown on the dashboard
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvestmentStrategy {
    /// Market fluctuation the allocation was computed with
    pub fluctuation: Decimal,

    pub allocation: Allocation,

    pub summary: String,
}

/// Draw a fluctuation, allocate, and describe the result
pub fn investment_strategy(
    tolerance: RiskTolerance,
    savings_balance: Decimal,
    market: &dyn MarketSource,
) -> InvestmentStrategy {
    let fluctuation = market.fluctuation();
    let allocation = allocate(tolerance, fluctuation);

    let mut summary = String::from("Dynamic asset allocation based on market conditions:\n");
    for (class, fraction) in allocation.iter() {
        let _ = writeln!(summary, "{class}: {:.2}%", fraction * dec!(100));
    }

    if savings_balance > LARGE_BALANCE {
        summary.push_str(LARGE_BALANCE_ADVICE);
    }

    tracing::debug!(%tolerance, %fluctuation, "Computed market-adjusted allocation");

    InvestmentStrategy {
        fluctuation,
        allocation,
        summary,
    }
}
