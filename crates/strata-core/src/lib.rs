//! # strata-core
//!
//! The storage model and scan operators of the Strata engine.
//!
//! Data lives in [`Table`](storage::Table)s, which are ordered sequences of
//! [`Chunk`](storage::Chunk)s; each chunk holds one
//! [`Segment`](storage::Segment) per column. A segment is either a mutable
//! value segment, an immutable dictionary-compressed segment, or a reference
//! segment redirecting into another table. Operators consume and produce
//! whole tables; the interesting one is
//! [`TableScan`](operators::TableScan), which evaluates a single predicate
//! and emits reference segments into the scanned data.
//!
//! ## Modules
//!
//! - [`storage`] - Attribute vectors, segments, chunks, tables, the storage manager
//! - [`operators`] - The `Operator` trait, `GetTable` and `TableScan`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod operators;
pub mod storage;

pub use operators::{CompareOp, GetTable, Operator, TableScan, TableWrapper};
pub use storage::{
    AttributeVector, Chunk, DictionarySegment, ReferenceSegment, Segment, StorageManager, Table,
    ValueSegment,
};
