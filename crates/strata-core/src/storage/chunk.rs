//! A horizontal slice of a table.

use strata_common::{ColumnId, Error, Result, Value};

use super::segment::Segment;

/// An ordered tuple of segments, one per column, all of the same length.
///
/// The column layout is fixed by the owning table; a chunk itself only
/// enforces that appends supply one value per segment.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    segments: Vec<Segment>,
}

impl Chunk {
    /// Creates a chunk with no segments.
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Adds a segment as the next column.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Appends one row, value by value in column order.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Internal`] when the value count does not match
    /// the column count (callers control arity, so a mismatch is a
    /// programming error) and propagates per-segment type mismatches.
    pub fn append(&mut self, values: &[Value]) -> Result<()> {
        if values.len() != self.segments.len() {
            return Err(Error::Internal(format!(
                "appended {} values to a chunk with {} columns",
                values.len(),
                self.segments.len()
            )));
        }
        for (segment, value) in self.segments.iter_mut().zip(values) {
            segment.append(value)?;
        }
        Ok(())
    }

    /// The segment backing a column, or `None` past the end.
    #[must_use]
    pub fn segment(&self, column_id: ColumnId) -> Option<&Segment> {
        self.segments.get(column_id.as_usize())
    }

    /// All segments in column order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of rows (the length of the first segment; all segments agree).
    #[must_use]
    pub fn size(&self) -> usize {
        self.segments.first().map_or(0, Segment::size)
    }

    /// Whether the chunk holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Advisory memory footprint of all segments.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        self.segments
            .iter()
            .map(Segment::estimate_memory_usage)
            .sum()
    }
}
