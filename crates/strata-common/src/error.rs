//! The workspace-wide error type.

use thiserror::Error;

use crate::types::{ChunkId, ColumnId, DataType, ValueId};

/// Result alias used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong in the storage and operator layers.
///
/// Failures are surfaced to the caller verbatim; nothing is retried
/// internally. Misuse errors carry the offending identifier so callers can
/// report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A dynamic value did not have the type the column requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The column's declared type.
        expected: DataType,
        /// The type actually supplied.
        found: DataType,
    },

    /// A column id past the end of the schema.
    #[error("column {column_id} out of range (table has {column_count} columns)")]
    ColumnOutOfRange {
        /// The offending column id.
        column_id: ColumnId,
        /// Number of columns in the table.
        column_count: u16,
    },

    /// A column name that is not part of the schema.
    #[error("no column named {0:?}")]
    ColumnNotFound(String),

    /// A table name that is already registered.
    #[error("a table named {0:?} is already registered")]
    DuplicateTable(String),

    /// A table name that is not registered.
    #[error("no table named {0:?}")]
    TableNotFound(String),

    /// Append on a segment kind that does not support mutation.
    #[error("append called on an immutable segment")]
    ImmutableSegment,

    /// A dictionary code past the end of the dictionary.
    #[error("value id {0} does not name a dictionary entry")]
    InvalidValueId(ValueId),

    /// More distinct values than the widest attribute vector can encode.
    #[error("dictionary with {0} entries exceeds the widest attribute vector")]
    DictionaryTooLarge(usize),

    /// A code that does not fit the attribute vector's fixed width.
    #[error("value id {value_id} does not fit an attribute vector of width {width}")]
    ValueIdTooWide {
        /// The offending code.
        value_id: ValueId,
        /// The vector's width in bytes.
        width: u8,
    },

    /// A chunk mixing reference and materialized segments.
    #[error("chunk {0} mixes reference and materialized segments")]
    MixedIndirection(ChunkId),

    /// An index past the end of a container.
    #[error("index {index} out of bounds (size {size})")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// The container size.
        size: usize,
    },

    /// A type name that is not part of the universe.
    #[error("unknown data type {0:?}")]
    UnknownDataType(String),

    /// A broken internal invariant; indicates a programming error.
    #[error("internal error: {0}")]
    Internal(String),
}
