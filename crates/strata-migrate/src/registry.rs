use std::collections::HashMap;

use crate::migration::Migration;

type MigrationFactory = Box<dyn Fn() -> Box<dyn Migration> + Send + Sync>;

/// Explicit mapping from implementation name to a no-argument factory.
///
/// The runner derives an implementation name from each discovered identifier
/// (`2024_01_01_000000_create_users_table` -> `CreateUsersTable`) and looks
/// it up here; unregistered names fail resolution. Populated by the
/// embedding application, one `register` call per migration.
#[derive(Default)]
pub struct MigrationRegistry {
    factories: HashMap<String, MigrationFactory>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Migration> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Create a fresh instance of the named implementation.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Migration>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use strata_common::Result;

    struct CreateUsersTable;

    impl Migration for CreateUsersTable {
        fn apply(&self, _schema: &Schema<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn register_and_instantiate() {
        let mut registry = MigrationRegistry::new();
        registry.register("CreateUsersTable", || Box::new(CreateUsersTable));

        assert!(registry.contains("CreateUsersTable"));
        assert!(registry.instantiate("CreateUsersTable").is_some());
    }

    #[test]
    fn unregistered_name_yields_none() {
        let registry = MigrationRegistry::new();
        assert!(!registry.contains("DropUsersTable"));
        assert!(registry.instantiate("DropUsersTable").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = MigrationRegistry::new();
        registry.register("B", || Box::new(CreateUsersTable));
        registry.register("A", || Box::new(CreateUsersTable));

        assert_eq!(registry.names(), vec!["A", "B"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
