use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use strata_common::Result;
use strata_store::{Scope, SettingsStore};

use crate::ident::MigrationId;

/// Durable record of applied migrations plus the batch counter.
///
/// State lives in the settings store under two keys derived from the
/// configured namespace; the scope is resolved once at construction and used
/// for every call. The ledger is mutated only through these operations —
/// the runner never touches the underlying keys. Read-then-write sequences
/// here are not atomic against concurrent runners; callers in multi-process
/// environments must serialize externally.
pub struct LedgerStore {
    settings: Arc<dyn SettingsStore>,
    scope: Scope,
    ledger_key: String,
    batch_key: String,
}

impl LedgerStore {
    pub fn new(settings: Arc<dyn SettingsStore>, scope: Scope, namespace: &str) -> Self {
        Self {
            settings,
            scope,
            ledger_key: format!("{namespace}_migrations"),
            batch_key: format!("{namespace}_migrations_batch"),
        }
    }

    /// Identifiers that have been applied, in apply order. An unset or
    /// malformed value reads as an empty ledger.
    pub fn ran(&self) -> Result<Vec<MigrationId>> {
        match self.settings.get(self.scope, &self.ledger_key)? {
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(|item| item.as_str().map(MigrationId::new))
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// Record that `id` was applied. Set semantics over the whole ledger:
    /// an identifier already present keeps its original position.
    pub fn log(&self, id: &MigrationId) -> Result<()> {
        let mut ran = self.ran()?;
        ran.push(id.clone());

        let mut seen = HashSet::new();
        ran.retain(|entry| seen.insert(entry.clone()));

        self.persist(&ran)
    }

    /// Delete every occurrence of `id` from the ledger.
    pub fn remove(&self, id: &MigrationId) -> Result<()> {
        let mut ran = self.ran()?;
        ran.retain(|entry| entry != id);
        self.persist(&ran)
    }

    pub fn last_batch(&self) -> Result<u64> {
        Ok(self
            .settings
            .get(self.scope, &self.batch_key)?
            .and_then(|value| value.as_u64())
            .unwrap_or(0))
    }

    /// Advance the batch counter and return the new value.
    pub fn increment_batch(&self) -> Result<u64> {
        let batch = self.last_batch()? + 1;
        self.settings
            .set(self.scope, &self.batch_key, Value::from(batch))?;
        debug!("migration batch advanced to {batch}");
        Ok(batch)
    }

    /// Wipe the ledger and the batch counter.
    pub fn clear(&self) -> Result<()> {
        self.settings.delete(self.scope, &self.ledger_key)?;
        self.settings.delete(self.scope, &self.batch_key)
    }

    fn persist(&self, ran: &[MigrationId]) -> Result<()> {
        let value = Value::Array(
            ran.iter()
                .map(|id| Value::String(id.as_str().to_owned()))
                .collect(),
        );
        self.settings.set(self.scope, &self.ledger_key, value)
    }
}
