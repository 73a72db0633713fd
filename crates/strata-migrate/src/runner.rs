use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use strata_common::{Error, Result};

use crate::discovery::MigrationSource;
use crate::ident::MigrationId;
use crate::ledger::LedgerStore;
use crate::migration::Migration;
use crate::registry::MigrationRegistry;
use crate::schema::{Schema, SchemaApplier};

/// Where a cataloged migration stands relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Ran,
    Pending,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Ran => f.write_str("Ran"),
            MigrationState::Pending => f.write_str("Pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub id: MigrationId,
    pub state: MigrationState,
}

/// Runs, rolls back, and reports on migrations.
///
/// The source is re-scanned on every operation, the ledger is only written
/// after a unit's lifecycle call returns `Ok`, and errors from units or
/// resolution propagate unchanged — a failed unit is never marked as run,
/// and a failed revert is never removed from the ledger.
pub struct Migrator {
    source: MigrationSource,
    registry: MigrationRegistry,
    ledger: LedgerStore,
    applier: Arc<dyn SchemaApplier>,
}

impl Migrator {
    pub fn new(
        source: MigrationSource,
        registry: MigrationRegistry,
        ledger: LedgerStore,
        applier: Arc<dyn SchemaApplier>,
    ) -> Self {
        Self {
            source,
            registry,
            ledger,
            applier,
        }
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Cataloged identifiers not yet in the ledger, ascending.
    pub fn pending(&self) -> Result<Vec<MigrationId>> {
        let catalog = self.source.catalog()?;
        let ran: HashSet<MigrationId> = self.ledger.ran()?.into_iter().collect();

        Ok(catalog
            .into_keys()
            .filter(|id| !ran.contains(id))
            .collect())
    }

    /// Apply all pending migrations in one batch. Returns the identifiers
    /// applied; an empty pending set returns immediately without touching
    /// the batch counter.
    ///
    /// The first failing unit's error propagates; units applied before it
    /// stay logged, so progress survives in the ledger and a later `run`
    /// picks up where this one stopped.
    pub fn run(&self) -> Result<Vec<MigrationId>> {
        let pending = self.pending()?;
        if pending.is_empty() {
            debug!("no pending migrations");
            return Ok(Vec::new());
        }

        let batch = self.ledger.increment_batch()?;
        let mut ran = Vec::with_capacity(pending.len());

        for id in pending {
            self.apply(&id)?;
            info!("applied migration {id} (batch {batch})");
            ran.push(id);
        }

        Ok(ran)
    }

    /// Revert the last `steps` applied migrations, most recent first.
    /// Recency comes from ledger order, not the batch counter, so a large
    /// `steps` can reach past the latest batch.
    pub fn rollback(&self, steps: usize) -> Result<Vec<MigrationId>> {
        let applied = self.ledger.ran()?;
        if applied.is_empty() {
            return Ok(Vec::new());
        }

        let mut rolled_back = Vec::new();
        for id in applied.into_iter().rev().take(steps) {
            self.revert(&id)?;
            info!("rolled back migration {id}");
            rolled_back.push(id);
        }

        Ok(rolled_back)
    }

    /// Full catalog in ascending order, each identifier tagged with whether
    /// it has run.
    pub fn status(&self) -> Result<Vec<MigrationStatus>> {
        let catalog = self.source.catalog()?;
        let ran: HashSet<MigrationId> = self.ledger.ran()?.into_iter().collect();

        Ok(catalog
            .into_keys()
            .map(|id| {
                let state = if ran.contains(&id) {
                    MigrationState::Ran
                } else {
                    MigrationState::Pending
                };
                MigrationStatus { id, state }
            })
            .collect())
    }

    fn apply(&self, id: &MigrationId) -> Result<()> {
        let migration = self.resolve(id)?;
        migration.apply(&Schema::new(self.applier.as_ref()))?;
        self.ledger.log(id)
    }

    fn revert(&self, id: &MigrationId) -> Result<()> {
        let migration = self.resolve(id)?;
        migration.revert(&Schema::new(self.applier.as_ref()))?;
        self.ledger.remove(id)
    }

    /// Look `id` up in the current catalog and instantiate its registered
    /// implementation. A ledger entry whose source file was deleted fails
    /// here with `NotFound`; a discovered file whose derived name was never
    /// registered fails with `ImplementationNotFound`.
    fn resolve(&self, id: &MigrationId) -> Result<Box<dyn Migration>> {
        let catalog = self.source.catalog()?;
        if !catalog.contains_key(id) {
            return Err(Error::NotFound(id.to_string()));
        }

        let name = id.implementation_name();
        self.registry
            .instantiate(&name)
            .ok_or(Error::ImplementationNotFound(name))
    }
}
