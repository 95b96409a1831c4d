//! The main database struct and operations.
//!
//! Start here with [`StrataDB`] - it's your handle to everything.

use std::sync::Arc;

use strata_common::{ColumnId, DataType, Result, Value};
use strata_core::operators::{CompareOp, GetTable, Operator, TableScan};
use strata_core::storage::{StorageManager, Table};

use crate::config::Config;

/// Your handle to a Strata database.
///
/// A database is a [`Config`] plus a [`StorageManager`] holding the
/// registered tables. Tables are built mutably, registered (which freezes
/// them behind an `Arc`), and queried through [`scan`](Self::scan):
///
/// ```
/// use strata_common::{ColumnId, DataType, Value};
/// use strata_core::CompareOp;
/// use strata_engine::StrataDB;
///
/// let db = StrataDB::new_in_memory();
///
/// let mut points = db.new_table(&[("x", DataType::Int32)])?;
/// points.append(vec![Value::Int32(4)])?;
/// points.append(vec![Value::Int32(2)])?;
/// db.register_table("points", points)?;
///
/// let result = db.scan("points", ColumnId::new(0), CompareOp::Gt, Value::Int32(3))?;
/// assert_eq!(result.row_count(), 1);
/// # Ok::<(), strata_common::Error>(())
/// ```
pub struct StrataDB {
    /// Engine configuration.
    config: Config,
    /// The registry of named tables.
    storage: Arc<StorageManager>,
}

impl Default for StrataDB {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl StrataDB {
    /// Creates a database with default configuration and a fresh registry.
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a database with custom configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            storage: Arc::new(StorageManager::new()),
        }
    }

    /// Creates a database sharing an existing registry, e.g. one already
    /// populated by another component.
    #[must_use]
    pub fn with_storage(config: Config, storage: Arc<StorageManager>) -> Self {
        Self { config, storage }
    }

    /// The configuration this database applies to new tables and scans.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying registry handle.
    #[must_use]
    pub fn storage(&self) -> &Arc<StorageManager> {
        &self.storage
    }

    /// Builds an unregistered table with the configured chunk size and the
    /// given columns. Append rows, then hand it to
    /// [`register_table`](Self::register_table).
    ///
    /// # Errors
    ///
    /// Propagates column-definition failures.
    pub fn new_table(&self, columns: &[(&str, DataType)]) -> Result<Table> {
        let mut table = Table::new(self.config.max_chunk_size);
        for &(name, data_type) in columns {
            table.add_column(name, data_type)?;
        }
        Ok(table)
    }

    /// Registers a table under `name`, freezing it.
    ///
    /// # Errors
    ///
    /// Fails with [`DuplicateTable`](strata_common::Error::DuplicateTable)
    /// when the name is taken.
    pub fn register_table(&self, name: &str, table: Table) -> Result<()> {
        self.storage.add_table(name, Arc::new(table))
    }

    /// Looks up a registered table.
    ///
    /// # Errors
    ///
    /// Fails with [`TableNotFound`](strata_common::Error::TableNotFound)
    /// when no such table exists.
    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.storage.table(name)
    }

    /// Removes a registered table.
    ///
    /// # Errors
    ///
    /// Fails with [`TableNotFound`](strata_common::Error::TableNotFound)
    /// when no such table exists.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.storage.drop_table(name)
    }

    /// Whether a table is registered under `name`.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.storage.has_table(name)
    }

    /// All registered table names, sorted.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.storage.table_names()
    }

    /// Runs `table[column_id] op literal` over a registered table and
    /// returns the matching rows as a table of references.
    ///
    /// This wires a [`GetTable`] into a [`TableScan`] with the configured
    /// advisory output size.
    ///
    /// # Errors
    ///
    /// Propagates lookup and scan failures.
    pub fn scan(
        &self,
        table_name: &str,
        column_id: ColumnId,
        op: CompareOp,
        literal: Value,
    ) -> Result<Arc<Table>> {
        tracing::debug!(table = %table_name, column = column_id.0, op = %op, "scan");
        let source = GetTable::new(Arc::clone(&self.storage), table_name);
        let mut scan = TableScan::new(Box::new(source), column_id, op, literal)
            .with_target_pos_list_size(self.config.target_pos_list_size);
        scan.execute()
    }

    /// Drops every registered table.
    pub fn reset(&self) {
        self.storage.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_register_scan() {
        let db = StrataDB::new_in_memory();
        let mut table = db.new_table(&[("x", DataType::Int32)]).unwrap();
        for v in [1, 5, 3] {
            table.append(vec![Value::Int32(v)]).unwrap();
        }
        db.register_table("numbers", table).unwrap();

        let result = db
            .scan("numbers", ColumnId::new(0), CompareOp::Ge, Value::Int32(3))
            .unwrap();
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn test_config_controls_chunk_size() {
        let db = StrataDB::with_config(Config::new().with_max_chunk_size(2));
        let mut table = db.new_table(&[("x", DataType::Int32)]).unwrap();
        for v in 0..5 {
            table.append(vec![Value::Int32(v)]).unwrap();
        }
        assert_eq!(table.chunk_count(), 3);
    }

    #[test]
    fn test_registry_lifecycle() {
        let db = StrataDB::new_in_memory();
        let table = db.new_table(&[("x", DataType::Int64)]).unwrap();
        db.register_table("t", table).unwrap();

        assert!(db.has_table("t"));
        assert_eq!(db.table_names(), ["t"]);
        db.drop_table("t").unwrap();
        assert!(!db.has_table("t"));

        let table = db.new_table(&[("x", DataType::Int64)]).unwrap();
        db.register_table("t", table).unwrap();
        db.reset();
        assert!(db.table_names().is_empty());
    }

    #[test]
    fn test_shared_storage() {
        let storage = Arc::new(StorageManager::new());
        let db = StrataDB::with_storage(Config::default(), Arc::clone(&storage));
        let table = db.new_table(&[("x", DataType::Int32)]).unwrap();
        db.register_table("shared", table).unwrap();
        assert!(storage.has_table("shared"));
    }
}
