use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use strata_common::{Error, Result};

use crate::settings::{Scope, SettingsStore};

/// In-memory settings store for tests and ephemeral embeddings.
#[derive(Default)]
pub struct MemorySettings {
    entries: Mutex<HashMap<(Scope, String), Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Settings("memory settings lock poisoned".into()))?;
        Ok(entries.get(&(scope, key.to_owned())).cloned())
    }

    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Settings("memory settings lock poisoned".into()))?;
        entries.insert((scope, key.to_owned()), value);
        Ok(())
    }

    fn delete(&self, scope: Scope, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Settings("memory settings lock poisoned".into()))?;
        entries.remove(&(scope, key.to_owned()));
        Ok(())
    }
}
