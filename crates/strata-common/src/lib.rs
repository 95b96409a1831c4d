//! # strata-common
//!
//! Shared foundation for the Strata engine: identifier newtypes, the dynamic
//! [`Value`](types::Value) type and its [`DataType`](types::DataType)
//! universe, the workspace-wide [`Error`](error::Error) type, and collection
//! aliases. This crate has no dependency on the storage or operator layers.
//!
//! ## Modules
//!
//! - [`types`] - Identifiers, row addressing, values and column element types
//! - [`error`] - The `Error` enum and `Result` alias used across the workspace
//! - [`collections`] - Hash map/set aliases with a consistent fast hasher

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ChunkId, ChunkOffset, ColumnId, ColumnType, DataType, PosList, RowId, Value, ValueId,
    INVALID_VALUE_ID,
};
