pub mod discovery;
pub mod ident;
pub mod ledger;
pub mod migration;
pub mod registry;
pub mod runner;
pub mod schema;

pub use discovery::MigrationSource;
pub use ident::MigrationId;
pub use ledger::LedgerStore;
pub use migration::Migration;
pub use registry::MigrationRegistry;
pub use runner::{MigrationState, MigrationStatus, Migrator};
pub use schema::{ReconcileReport, Schema, SchemaApplier};
