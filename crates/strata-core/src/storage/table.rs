//! Schema plus an ordered sequence of chunks.

use rayon::prelude::*;

use strata_common::{ChunkId, ColumnId, DataType, Error, Result, Value};

use super::chunk::Chunk;
use super::segment::{AnyValueSegment, Segment};

/// Default maximum number of rows per chunk.
pub const DEFAULT_MAX_CHUNK_SIZE: u32 = 1 << 16;

/// A named-elsewhere, in-memory columnar table.
///
/// A table owns its chunks and their materialized segments. All but
/// possibly the last chunk are full (`max_chunk_size` rows); a fresh, empty
/// chunk exists from construction on, so there is always an append target.
///
/// Mutation discipline: every mutator takes `&mut self`, so the exclusive
/// borrow serializes mutators against each other and against readers at
/// compile time. Tables handed to the storage manager are wrapped in `Arc`
/// and thereby frozen.
#[derive(Debug)]
pub struct Table {
    column_names: Vec<String>,
    column_types: Vec<DataType>,
    chunks: Vec<Chunk>,
    max_chunk_size: u32,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}

impl Table {
    /// Creates an empty table whose chunks roll over at `max_chunk_size`
    /// rows. A first, empty chunk is created immediately.
    #[must_use]
    pub fn new(max_chunk_size: u32) -> Self {
        debug_assert!(max_chunk_size > 0, "chunk size must be positive");
        Self {
            column_names: Vec::new(),
            column_types: Vec::new(),
            chunks: vec![Chunk::new()],
            max_chunk_size,
        }
    }

    /// Registers a column in the schema without touching the chunks.
    ///
    /// Scan output assembly uses this: result chunks are built separately
    /// and adopted via [`emplace_chunk`](Self::emplace_chunk).
    pub fn add_column_definition(&mut self, name: impl Into<String>, data_type: DataType) {
        self.column_names.push(name.into());
        self.column_types.push(data_type);
    }

    /// Adds a column to the schema and an empty value segment to every
    /// chunk.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Internal`] once the table contains rows; the
    /// column set is fixed by the first append.
    pub fn add_column(&mut self, name: impl Into<String>, data_type: DataType) -> Result<()> {
        if self.row_count() > 0 {
            return Err(Error::Internal(
                "columns can only be added while the table is empty".to_string(),
            ));
        }
        self.add_column_definition(name, data_type);
        for chunk in &mut self.chunks {
            chunk.add_segment(Segment::Value(AnyValueSegment::new(data_type)));
        }
        Ok(())
    }

    /// Appends one row, rolling over to a fresh chunk when the append
    /// target is full.
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from the target chunk.
    pub fn append(&mut self, values: Vec<Value>) -> Result<()> {
        if self.append_target().size() >= self.max_chunk_size as usize {
            self.create_new_chunk();
        }
        let target = self
            .chunks
            .last_mut()
            .expect("a table always has at least one chunk");
        target.append(&values)
    }

    /// Starts a fresh chunk with one empty value segment per column.
    pub fn create_new_chunk(&mut self) {
        let mut chunk = Chunk::new();
        for &data_type in &self.column_types {
            chunk.add_segment(Segment::Value(AnyValueSegment::new(data_type)));
        }
        self.chunks.push(chunk);
    }

    /// Adopts a pre-built chunk, replacing the initial chunk if it is still
    /// empty.
    pub fn emplace_chunk(&mut self, chunk: Chunk) {
        if self.chunks[0].size() == 0 {
            self.chunks[0] = chunk;
        } else {
            self.chunks.push(chunk);
        }
    }

    /// Replaces every value segment of a chunk with its dictionary-encoded
    /// twin. The per-column builds run in parallel; the chunk is swapped in
    /// once all of them finish.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfBounds`] on a bad chunk id, with
    /// [`Error::Internal`] when the chunk holds non-value segments, and
    /// propagates [`Error::DictionaryTooLarge`] from the builds.
    pub fn compress_chunk(&mut self, chunk_id: ChunkId) -> Result<()> {
        let chunk = self.chunks.get(chunk_id.as_usize()).ok_or(Error::OutOfBounds {
            index: chunk_id.as_usize(),
            size: self.chunks.len(),
        })?;

        let compressed_segments: Vec<Segment> = chunk
            .segments()
            .par_iter()
            .map(|segment| match segment {
                Segment::Value(value_segment) => {
                    value_segment.compress().map(Segment::Dictionary)
                }
                Segment::Dictionary(_) | Segment::Reference(_) => Err(Error::Internal(
                    "only value segments can be dictionary-compressed".to_string(),
                )),
            })
            .collect::<Result<_>>()?;

        let mut compressed_chunk = Chunk::new();
        for segment in compressed_segments {
            compressed_chunk.add_segment(segment);
        }
        tracing::debug!(chunk = chunk_id.0, "compressed chunk");
        self.chunks[chunk_id.as_usize()] = compressed_chunk;
        Ok(())
    }

    /// Number of columns in the schema.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Total number of rows across all chunks.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.chunks.iter().map(Chunk::size).sum()
    }

    /// Number of chunks (at least one).
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The chunk at `chunk_id`, or `None` past the end.
    #[must_use]
    pub fn chunk(&self, chunk_id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(chunk_id.as_usize())
    }

    /// All column names, in schema order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The name of a column.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ColumnOutOfRange`] on a bad id.
    pub fn column_name(&self, column_id: ColumnId) -> Result<&str> {
        self.column_names
            .get(column_id.as_usize())
            .map(String::as_str)
            .ok_or(self.column_out_of_range(column_id))
    }

    /// The element type of a column.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ColumnOutOfRange`] on a bad id.
    pub fn column_type(&self, column_id: ColumnId) -> Result<DataType> {
        self.column_types
            .get(column_id.as_usize())
            .copied()
            .ok_or(self.column_out_of_range(column_id))
    }

    /// Resolves a column name to its id.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::ColumnNotFound`] for names outside the schema.
    pub fn column_id_by_name(&self, name: &str) -> Result<ColumnId> {
        self.column_names
            .iter()
            .position(|candidate| candidate == name)
            .map(|index| ColumnId::new(index as u16))
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// The chunk roll-over threshold.
    #[must_use]
    pub const fn max_chunk_size(&self) -> u32 {
        self.max_chunk_size
    }

    /// Advisory memory footprint of all chunks.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        self.chunks.iter().map(Chunk::estimate_memory_usage).sum()
    }

    fn append_target(&self) -> &Chunk {
        self.chunks
            .last()
            .expect("a table always has at least one chunk")
    }

    fn column_out_of_range(&self, column_id: ColumnId) -> Error {
        Error::ColumnOutOfRange {
            column_id,
            column_count: self.column_count() as u16,
        }
    }
}
