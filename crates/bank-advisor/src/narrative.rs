//! Narrative Generation
//!
//! Turns an account profile into a free-text recommendation through an
//! injected `LlmProvider`. Provider failures and timeouts never fail the
//! dashboard; they degrade to a fixed fallback.

use std::sync::Arc;
use std::time::Duration;

use insight_core::{CoreError, GenerationOptions, LlmProvider, Message};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::AccountSnapshot;

pub const FALLBACK_NARRATIVE: &str =
    "Personalized recommendations are unavailable right now. Please check back later.";

/// Narrative generation settings
#[derive(Clone, Debug)]
pub struct NarrativeConfig {
    /// Sampling options handed to the provider
    pub generation: GenerationOptions,

    /// Upper bound on one provider call
    pub timeout: Duration,

    /// Text shown when generation fails
    pub fallback: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            generation: GenerationOptions {
                temperature: 1.2,
                max_tokens: 500,
                top_p: 0.95,
                top_k: Some(50),
                ..Default::default()
            },
            timeout: Duration::from_secs(30),
            fallback: FALLBACK_NARRATIVE.into(),
        }
    }
}

/// A generated (or fallback) recommendation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,

    /// False when `text` is the fallback
    pub generated: bool,
}

/// Fixed prompt template filled from the account profile
pub fn render_prompt(snapshot: &AccountSnapshot) -> String {
    let account = &snapshot.account;
    format!(
        "User Profile:\n\
         Income: {}\n\
         Expenses: {}\n\
         Savings Balance: {}\n\
         Loan Balance: {}\n\
         Risk Tolerance: {}\n\
         Investment Goals: {}\n",
        account.income,
        account.expenses,
        snapshot.savings.balance,
        snapshot.loan.balance,
        account.risk_tolerance,
        account.investment_goals,
    )
}

/// Recommendation writer backed by an injected provider
#[derive(Clone)]
pub struct NarrativeGenerator {
    provider: Arc<dyn LlmProvider>,
    config: NarrativeConfig,
}

impl NarrativeGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: NarrativeConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, NarrativeConfig::default())
    }

    pub const fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Call the provider once, surfacing every failure
    pub async fn try_generate(&self, snapshot: &AccountSnapshot) -> Result<String> {
        let messages = [Message::user(render_prompt(snapshot))];
        let timeout_secs = self.config.timeout.as_secs();

        let completion = tokio::time::timeout(
            self.config.timeout,
            self.provider.complete(&messages, &self.config.generation),
        )
        .await
        .map_err(|_| CoreError::Timeout(timeout_secs))??;

        let text = completion.content.trim();
        if text.is_empty() {
            return Err(CoreError::EmptyCompletion.into());
        }
        Ok(text.to_string())
    }

    /// Generate a recommendation, falling back on any provider failure
    pub async fn generate(&self, snapshot: &AccountSnapshot) -> Narrative {
        match self.try_generate(snapshot).await {
            Ok(text) => Narrative {
                text,
                generated: true,
            },
            Err(e) => {
                tracing::warn!(
                    username = %snapshot.account.username,
                    model = %self.config.generation.model,
                    "Narrative generation degraded: {}",
                    e
                );
                Narrative {
                    text: self.config.fallback.clone(),
                    generated: false,
                }
            }
        }
    }
}
