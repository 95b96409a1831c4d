//! The process-wide name → table registry.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use strata_common::collections::{strata_map, StrataMap};
use strata_common::{Error, Result};

use super::table::Table;

/// Holds every registered table by name.
///
/// Registration, lookup and removal are internally synchronized, so a
/// manager can be shared freely across threads. Operators take a manager
/// *handle* rather than reaching for the global, which lets tests run
/// against a fresh instance; [`global()`](Self::global) provides the
/// conventional process-wide one, initialized on first use.
#[derive(Debug, Default)]
pub struct StorageManager {
    tables: RwLock<StrataMap<String, Arc<Table>>>,
}

impl StorageManager {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(strata_map()),
        }
    }

    /// The process-wide registry, created on first use and alive until
    /// process exit.
    #[must_use]
    pub fn global() -> &'static StorageManager {
        static GLOBAL: OnceLock<StorageManager> = OnceLock::new();
        GLOBAL.get_or_init(StorageManager::new)
    }

    /// Registers a table under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DuplicateTable`] when the name is taken.
    pub fn add_table(&self, name: impl Into<String>, table: Arc<Table>) -> Result<()> {
        let name = name.into();
        let mut tables = self.tables.write();
        if tables.contains_key(&name) {
            return Err(Error::DuplicateTable(name));
        }
        tracing::debug!(table = %name, rows = table.row_count(), "registered table");
        tables.insert(name, table);
        Ok(())
    }

    /// Removes the table registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TableNotFound`] when no such table exists.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let removed = self.tables.write().remove(name);
        if removed.is_none() {
            return Err(Error::TableNotFound(name.to_string()));
        }
        tracing::debug!(table = %name, "dropped table");
        Ok(())
    }

    /// Looks up the table registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TableNotFound`] when no such table exists.
    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Whether a table is registered under `name`.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// All registered names, sorted for deterministic output.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Drops every registered table.
    pub fn reset(&self) {
        self.tables.write().clear();
        tracing::debug!("reset storage manager");
    }
}

impl fmt::Display for StorageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        let count = tables.len();
        writeln!(
            f,
            "storage manager with {count} {}",
            if count == 1 { "table" } else { "tables" }
        )?;

        let mut names: Vec<&String> = tables.keys().collect();
        names.sort_unstable();
        for name in names {
            let table = &tables[name];
            writeln!(
                f,
                "  {name}: {} columns, {} rows",
                table.column_count(),
                table.row_count()
            )?;
        }
        Ok(())
    }
}
