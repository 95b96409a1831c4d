//! Operator that resolves a registered table by name.

use std::sync::Arc;

use strata_common::Result;

use super::Operator;
use crate::storage::{StorageManager, Table};

/// Looks a table up in a storage manager.
///
/// The manager is injected as a handle rather than taken from the global,
/// so pipelines built in tests can run against their own registry. Wire up
/// [`StorageManager::global()`] for the conventional process-wide one.
pub struct GetTable {
    storage: Arc<StorageManager>,
    table_name: String,
}

impl GetTable {
    /// Creates an operator resolving `table_name` against `storage`.
    #[must_use]
    pub fn new(storage: Arc<StorageManager>, table_name: impl Into<String>) -> Self {
        Self {
            storage,
            table_name: table_name.into(),
        }
    }

    /// The name this operator resolves.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl Operator for GetTable {
    fn execute(&mut self) -> Result<Arc<Table>> {
        self.storage.table(&self.table_name)
    }

    fn name(&self) -> &'static str {
        "GetTable"
    }
}
