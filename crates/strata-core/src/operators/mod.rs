//! Operators that consume and produce tables.
//!
//! Execution is table-at-a-time: an operator's [`execute`](Operator::execute)
//! runs to completion and hands back a whole result table, which the next
//! operator in a pipeline consumes. There is no partial state surfaced
//! between operators; a failed execution leaves nothing behind.
//!
//! - [`GetTable`] - Resolve a registered table by name
//! - [`TableWrapper`] - Feed an existing table into a pipeline (mostly tests)
//! - [`TableScan`] - Evaluate one predicate, emit reference segments

mod get_table;
mod table_scan;

pub use get_table::GetTable;
pub use table_scan::{CompareOp, TableScan};

use std::sync::Arc;

use strata_common::Result;

use crate::storage::Table;

/// The core trait for table-at-a-time operators.
///
/// Call [`execute()`](Self::execute) to run the operator; results are
/// immutable shared tables, so chaining operators is cheap.
pub trait Operator: Send {
    /// Runs the operator to completion and returns its result table.
    ///
    /// # Errors
    ///
    /// Operator-specific; all failures are surfaced to the caller and
    /// nothing is retried.
    fn execute(&mut self) -> Result<Arc<Table>>;

    /// Returns a name for debugging/explain output.
    fn name(&self) -> &'static str;
}

/// Wraps an already-materialized table as an operator.
///
/// Useful as the source of a pipeline when the table is not registered with
/// a storage manager, which is the common case in tests.
pub struct TableWrapper {
    table: Arc<Table>,
}

impl TableWrapper {
    /// Creates a wrapper around `table`.
    #[must_use]
    pub fn new(table: Arc<Table>) -> Self {
        Self { table }
    }
}

impl Operator for TableWrapper {
    fn execute(&mut self) -> Result<Arc<Table>> {
        Ok(Arc::clone(&self.table))
    }

    fn name(&self) -> &'static str {
        "TableWrapper"
    }
}
