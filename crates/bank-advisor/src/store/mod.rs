//! Record Access
//!
//! Abstractions and implementations for loading account records.

mod demo;
mod memory;
mod sqlite;

pub use demo::demo_snapshots;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::AccountSnapshot;

/// Record store trait (Strategy pattern)
///
/// Implement this for each storage backend: SQLite, in-memory, etc.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether the username/password pair matches a stored account
    async fn authenticate(&self, username: &str, password: &str) -> Result<bool>;

    /// Load the account with its transactions, savings and loan.
    ///
    /// `Ok(None)` when no account has this username. An account missing its
    /// savings or loan row is an error, never a partial snapshot.
    async fn load_snapshot(&self, username: &str) -> Result<Option<AccountSnapshot>>;

    /// Check if the store is reachable
    async fn health_check(&self) -> bool;

    /// Store name
    fn name(&self) -> &str;
}
