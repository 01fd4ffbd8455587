//! Application State

use std::sync::Arc;

use bank_advisor::{InsightEngine, RecordStore};
use insight_core::LlmProvider;

use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Account records (SQLite in production)
    pub store: Arc<dyn RecordStore>,

    /// Rules and narrative pipeline
    pub engine: Arc<InsightEngine>,

    /// Signed-cookie login sessions
    pub sessions: Arc<SessionStore>,

    /// Text model behind the narrative, kept for health reporting
    pub provider: Arc<dyn LlmProvider>,
}
