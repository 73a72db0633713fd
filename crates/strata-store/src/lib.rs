pub mod memory;
pub mod settings;
pub mod sqlite;

pub use memory::MemorySettings;
pub use settings::{Scope, SettingsStore};
pub use sqlite::SqliteSettings;
