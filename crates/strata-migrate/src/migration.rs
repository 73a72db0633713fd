use strata_common::Result;

use crate::schema::Schema;

/// One versioned upgrade step.
///
/// Instances are created fresh from the registry for each apply or revert
/// call; the runner constructs the `Schema` handle and passes it in, so a
/// unit never runs without one. `apply` should be safe to re-run on top of a
/// partially-applied schema — the applier reconciles rather than blindly
/// re-creates, and the runner does not retry on its own.
pub trait Migration {
    /// Apply the upgrade step.
    fn apply(&self, schema: &Schema<'_>) -> Result<()>;

    /// Reverse the upgrade step. The default does nothing: rolling back a
    /// unit without an override still removes its ledger entry, it just
    /// performs no schema change.
    fn revert(&self, _schema: &Schema<'_>) -> Result<()> {
        Ok(())
    }
}
