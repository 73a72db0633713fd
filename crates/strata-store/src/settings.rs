use std::fmt;

use serde_json::Value;
use strata_common::Result;

/// Which partition of the store a key lives in.
///
/// `Instance` settings belong to a single installation; `Network` settings
/// are shared across every installation backed by the same store. Callers
/// resolve the scope once, up front, and pass it explicitly on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Instance,
    Network,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Instance => "instance",
            Scope::Network => "network",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic scoped key/value storage.
///
/// Values are JSON so callers can persist lists and counters without the
/// store knowing their shape. `get` returns `None` for unset keys; `delete`
/// of an unset key is a no-op. Read-then-write sequences built on top of
/// this trait are not atomic against concurrent writers.
pub trait SettingsStore: Send + Sync {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>>;

    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()>;

    fn delete(&self, scope: Scope, key: &str) -> Result<()>;
}
