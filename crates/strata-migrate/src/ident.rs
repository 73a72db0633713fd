use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fixed-width sortable prefix: `2024_01_01_000000_`.
static TIMESTAMP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}_\d{2}_\d{2}_\d{6}_").expect("valid prefix pattern"));

/// Identifier of one migration unit, conventionally
/// `<sortable-timestamp>_<slug>`, e.g. `2024_01_01_000000_create_users_table`.
///
/// Identifiers order lexicographically; the fixed-width timestamp prefix makes
/// text order equal intended apply order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationId(String);

impl MigrationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an identifier for `slug` stamped with the current UTC time.
    pub fn generate(slug: &str) -> Self {
        Self::at(Utc::now(), slug)
    }

    /// Build an identifier for `slug` stamped with an explicit timestamp.
    pub fn at(timestamp: DateTime<Utc>, slug: &str) -> Self {
        Self(format!(
            "{}_{}",
            timestamp.format("%Y_%m_%d_%H%M%S"),
            normalize_slug(slug)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the implementation name registered for this identifier:
    /// strip the timestamp prefix and upper-camel the remaining words,
    /// `create_users_table` -> `CreateUsersTable`. An identifier without the
    /// prefix derives from all of its words.
    pub fn implementation_name(&self) -> String {
        let stem = TIMESTAMP_PREFIX.replace(&self.0, "");
        stem.split('_')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect()
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MigrationId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for MigrationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn normalize_slug(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut last_was_sep = true;
    for c in slug.chars() {
        if c.is_ascii_alphanumeric() {
            out.extend(c.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}
