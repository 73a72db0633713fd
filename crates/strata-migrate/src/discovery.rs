use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use strata_common::Result;

use crate::ident::MigrationId;

const DEFAULT_EXTENSION: &str = "rs";

/// Directory of migration source units, one file per migration, named by
/// identifier: `<dir>/2024_01_01_000000_create_users_table.rs`.
pub struct MigrationSource {
    dir: PathBuf,
    extension: String,
}

impl MigrationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// Override the migration file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Scan the source directory and return identifier -> file path, in
    /// ascending identifier order. A missing directory yields an empty
    /// catalog. Every call re-scans; nothing is cached.
    pub fn catalog(&self) -> Result<BTreeMap<MigrationId, PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(BTreeMap::new());
        }

        let mut catalog = BTreeMap::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            catalog.insert(MigrationId::new(stem), path);
        }

        debug!(
            "discovered {} migrations in {}",
            catalog.len(),
            self.dir.display()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "strata-discovery-test-{label}-{}-{nanos}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn catalog_orders_by_identifier_regardless_of_creation_order() {
        let dir = temp_dir("ordering");
        fs::write(dir.join("2024_01_02_000000_add_flags_column.rs"), "").unwrap();
        fs::write(dir.join("2024_01_01_000000_create_users_table.rs"), "").unwrap();

        let catalog = MigrationSource::new(&dir).catalog().unwrap();
        let ids: Vec<&str> = catalog.keys().map(MigrationId::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "2024_01_01_000000_create_users_table",
                "2024_01_02_000000_add_flags_column",
            ]
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn files_with_other_extensions_are_ignored() {
        let dir = temp_dir("extensions");
        fs::write(dir.join("2024_01_01_000000_create_users_table.rs"), "").unwrap();
        fs::write(dir.join("notes.md"), "").unwrap();
        fs::write(dir.join("no_extension"), "").unwrap();

        let catalog = MigrationSource::new(&dir).catalog().unwrap();
        assert_eq!(catalog.len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_yields_empty_catalog() {
        let dir = std::env::temp_dir().join("strata-discovery-test-does-not-exist");
        let catalog = MigrationSource::new(&dir).catalog().unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn custom_extension_is_honored() {
        let dir = temp_dir("custom-ext");
        fs::write(dir.join("2024_01_01_000000_create_users_table.sql"), "").unwrap();
        fs::write(dir.join("2024_01_02_000000_add_flags_column.rs"), "").unwrap();

        let catalog = MigrationSource::new(&dir)
            .with_extension("sql")
            .catalog()
            .unwrap();
        let ids: Vec<&str> = catalog.keys().map(MigrationId::as_str).collect();
        assert_eq!(ids, vec!["2024_01_01_000000_create_users_table"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn subdirectories_are_skipped() {
        let dir = temp_dir("subdirs");
        fs::create_dir_all(dir.join("archive.rs")).unwrap();
        fs::write(dir.join("2024_01_01_000000_create_users_table.rs"), "").unwrap();

        let catalog = MigrationSource::new(&dir).catalog().unwrap();
        assert_eq!(catalog.len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
