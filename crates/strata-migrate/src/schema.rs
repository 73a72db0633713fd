use strata_common::Result;

/// What the applier did to bring a table in line with its definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub table: String,
    pub actions: Vec<String>,
}

/// Capability that reconciles declarative table definitions against live
/// storage. Implementations are expected to be idempotent: reconciling an
/// already-current table is a no-op, not an error.
pub trait SchemaApplier: Send + Sync {
    /// Create or update `table` to match `create_sql`.
    fn reconcile(&self, table: &str, create_sql: &str) -> Result<ReconcileReport>;

    /// Drop `table` if it exists. Returns whether a table was dropped.
    fn drop_if_exists(&self, table: &str) -> Result<bool>;

    /// Default character set / collation clause appended to generated
    /// definitions.
    fn charset_collation(&self) -> String;
}

/// Handle given to a migration for the duration of one apply or revert call.
///
/// Wraps the injected applier with convenience helpers for the common DDL
/// shapes; hand-written definitions can go through `reconcile` directly.
pub struct Schema<'a> {
    applier: &'a dyn SchemaApplier,
}

impl<'a> Schema<'a> {
    pub fn new(applier: &'a dyn SchemaApplier) -> Self {
        Self { applier }
    }

    /// Create or update a table from ordered `(name, definition)` column
    /// pairs and key clauses. Columns are emitted verbatim in the order
    /// given; the applier's charset/collation clause is appended.
    pub fn create_table(
        &self,
        table: &str,
        columns: &[(&str, &str)],
        keys: &[&str],
    ) -> Result<ReconcileReport> {
        let column_lines: Vec<String> = columns
            .iter()
            .map(|(name, definition)| format!("`{name}` {definition}"))
            .collect();

        let mut sql = format!("CREATE TABLE `{table}` (\n");
        sql.push_str(&column_lines.join(",\n"));
        if !keys.is_empty() {
            sql.push_str(",\n");
            sql.push_str(&keys.join(",\n"));
        }
        sql.push_str(&format!("\n) {};", self.applier.charset_collation()));

        self.applier.reconcile(table, &sql)
    }

    pub fn drop_table(&self, table: &str) -> Result<bool> {
        self.applier.drop_if_exists(table)
    }

    pub fn reconcile(&self, table: &str, create_sql: &str) -> Result<ReconcileReport> {
        self.applier.reconcile(table, create_sql)
    }

    pub fn charset_collation(&self) -> String {
        self.applier.charset_collation()
    }
}
