//! In-Memory Record Store
//!
//! For testing and demo purposes.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{demo_snapshots, RecordStore};
use crate::error::{AdvisorError, Result};
use crate::model::AccountSnapshot;

/// Record store holding snapshots keyed by username
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, AccountSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the demo customers
    pub fn demo() -> Self {
        let store = Self::new();
        for snapshot in demo_snapshots() {
            // A fresh lock cannot be poisoned
            let _ = store.insert(snapshot);
        }
        store
    }

    /// Add or replace an account. Transaction ids are assigned in insertion
    /// order and the history is re-sorted most recent first.
    pub fn insert(&self, mut snapshot: AccountSnapshot) -> Result<()> {
        let account_id = snapshot.account.id;
        for (offset, entry) in snapshot.transactions.iter_mut().enumerate() {
            entry.id = offset as i64 + 1;
            entry.account_id = account_id;
        }
        snapshot.sort_transactions();

        self.accounts
            .write()
            .map_err(|_| AdvisorError::Storage("memory store lock poisoned".into()))?
            .insert(snapshot.account.username.clone(), snapshot);
        Ok(())
    }

    fn get(&self, username: &str) -> Result<Option<AccountSnapshot>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| AdvisorError::Storage("memory store lock poisoned".into()))?;
        Ok(accounts.get(username).cloned())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        Ok(self
            .get(username)?
            .is_some_and(|s| s.account.password == password))
    }

    async fn load_snapshot(&self, username: &str) -> Result<Option<AccountSnapshot>> {
        self.get(username)
    }

    async fn health_check(&self) -> bool {
        true // Memory store always healthy
    }

    fn name(&self) -> &str {
        "Memory"
    }
}
