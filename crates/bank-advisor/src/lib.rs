//! # bank-advisor
//!
//! Account records, insight rules and narrative generation behind the
//! personal banking dashboard.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────────┐     ┌──────────────┐
//! │ RecordStore  │────▶│  Rules                   │────▶│  Dashboard   │
//! │ (SQLite /    │     │  • notifications         │     │  Insights    │
//! │  memory)     │     │  • market allocation     │     │              │
//! └──────────────┘     │  • categorization        │     └──────────────┘
//!                      │  • product offers        │            ▲
//!                      └──────────────────────────┘            │
//!                      ┌──────────────────────────┐            │
//!                      │  NarrativeGenerator      │────────────┘
//!                      │  (LlmProvider, timeout)  │
//!                      └──────────────────────────┘
//! ```
//!
//! Rules are pure and synchronous. The market fluctuation and the text model
//! are injected, so every derived output can be reproduced in tests.

pub mod error;
pub mod insights;
pub mod model;
pub mod narrative;
pub mod rules;
pub mod store;

pub use error::{AdvisorError, Result};
pub use insights::{DashboardInsights, InsightEngine};
pub use model::{
    Account, AccountSnapshot, LoanPosition, RiskTolerance, SavingsPosition, Transaction,
};
pub use narrative::{Narrative, NarrativeConfig, NarrativeGenerator};
pub use store::{MemoryStore, RecordStore, SqliteStore};
