//! Dashboard Insights
//!
//! Runs every rule over one account snapshot and collects the results.

use std::sync::Arc;

use serde::Serialize;

use crate::model::AccountSnapshot;
use crate::narrative::{Narrative, NarrativeGenerator};
use crate::rules::{
    categorize_transactions, generate_notifications, investment_strategy, recommend_products,
    CategorizedTransactions, InvestmentStrategy, MarketSource, NotificationThresholds,
};

/// Everything the dashboard shows for one account, recomputed per request
#[derive(Clone, Debug, Serialize)]
pub struct DashboardInsights {
    pub snapshot: AccountSnapshot,
    pub notifications: Vec<String>,
    pub strategy: InvestmentStrategy,
    pub categories: CategorizedTransactions,
    pub products: Vec<String>,
    pub narrative: Narrative,
}

/// Holds the injected collaborators the rules need
#[derive(Clone)]
pub struct InsightEngine {
    market: Arc<dyn MarketSource>,
    thresholds: NotificationThresholds,
    narrator: NarrativeGenerator,
}

impl InsightEngine {
    pub fn new(
        market: Arc<dyn MarketSource>,
        thresholds: NotificationThresholds,
        narrator: NarrativeGenerator,
    ) -> Self {
        Self {
            market,
            thresholds,
            narrator,
        }
    }

    pub const fn thresholds(&self) -> &NotificationThresholds {
        &self.thresholds
    }

    /// Derive all insights; only the narrative step awaits
    pub async fn build(&self, snapshot: AccountSnapshot) -> DashboardInsights {
        let account = &snapshot.account;

        let categories = categorize_transactions(&snapshot.transactions);
        let strategy = investment_strategy(
            account.risk_tolerance,
            snapshot.savings.balance,
            self.market.as_ref(),
        );
        let products = recommend_products(
            account.income,
            snapshot.savings.balance,
            account.credit_score,
            &snapshot.transactions,
        );
        let notifications = generate_notifications(
            &snapshot.savings,
            &snapshot.transactions,
            &snapshot.loan,
            &self.thresholds,
        );
        let narrative = self.narrator.generate(&snapshot).await;

        tracing::info!(
            username = %account.username,
            notifications = notifications.len(),
            products = products.len(),
            narrative_generated = narrative.generated,
            "Built dashboard insights"
        );

        DashboardInsights {
            snapshot,
            notifications,
            strategy,
            categories,
            products,
            narrative,
        }
    }
}
