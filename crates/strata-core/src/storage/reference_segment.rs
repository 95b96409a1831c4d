//! A logical column that redirects rows into another table.

use std::sync::Arc;

use strata_common::{ChunkOffset, ColumnId, Error, PosList, Result, RowId, Value};

use super::segment::Segment;
use super::table::Table;

/// A column slice whose rows are addresses of rows in another table.
///
/// Reference segments are what scans emit: the scan result is a table of
/// references into the scanned data rather than a copy of it. They are never
/// chained - the referenced table's column must be value- or
/// dictionary-backed, which the scan guarantees by always resolving through
/// to the ultimate source. The pos list is shared (`Arc`), so several
/// segments of one result chunk can point at the same list.
#[derive(Debug, Clone)]
pub struct ReferenceSegment {
    referenced_table: Arc<Table>,
    referenced_column_id: ColumnId,
    pos_list: Arc<PosList>,
}

impl ReferenceSegment {
    /// Creates a reference segment over `pos_list` rows of the given column.
    #[must_use]
    pub fn new(
        referenced_table: Arc<Table>,
        referenced_column_id: ColumnId,
        pos_list: Arc<PosList>,
    ) -> Self {
        Self {
            referenced_table,
            referenced_column_id,
            pos_list,
        }
    }

    /// Resolves the row at `offset` and returns the referenced value.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfBounds`] past the end of the pos list and
    /// with [`Error::Internal`] when the referenced position is stale or the
    /// no-chain invariant is broken.
    pub fn value_at(&self, offset: ChunkOffset) -> Result<Value> {
        let row_id: RowId = *self
            .pos_list
            .get(offset as usize)
            .ok_or(Error::OutOfBounds {
                index: offset as usize,
                size: self.pos_list.len(),
            })?;
        let chunk = self
            .referenced_table
            .chunk(row_id.chunk_id)
            .ok_or_else(|| {
                Error::Internal(format!(
                    "reference segment points at missing chunk {}",
                    row_id.chunk_id
                ))
            })?;
        let segment = chunk.segment(self.referenced_column_id).ok_or_else(|| {
            Error::Internal(format!(
                "reference segment points at missing column {}",
                self.referenced_column_id
            ))
        })?;
        match segment {
            Segment::Reference(_) => Err(Error::Internal(
                "reference segment points at another reference segment".to_string(),
            )),
            Segment::Value(_) | Segment::Dictionary(_) => segment.value_at(row_id.chunk_offset),
        }
    }

    /// Number of rows; the pos list is authoritative.
    #[must_use]
    pub fn size(&self) -> usize {
        self.pos_list.len()
    }

    /// The table this segment redirects into.
    #[must_use]
    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.referenced_table
    }

    /// The referenced column.
    #[must_use]
    pub const fn referenced_column_id(&self) -> ColumnId {
        self.referenced_column_id
    }

    /// The shared list of referenced row addresses.
    #[must_use]
    pub fn pos_list(&self) -> &Arc<PosList> {
        &self.pos_list
    }

    /// Advisory memory footprint of the pos list.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<RowId>() * self.pos_list.len()
    }
}
