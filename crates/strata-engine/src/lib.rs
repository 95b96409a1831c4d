//! # strata-engine
//!
//! The embedder-facing surface of the Strata engine.
//!
//! Start with [`StrataDB`]: it owns a storage-manager handle and the
//! [`Config`] defaults applied to the tables and scans it creates.
//!
//! ```
//! use strata_common::{ColumnId, DataType, Value};
//! use strata_core::CompareOp;
//! use strata_engine::StrataDB;
//!
//! let db = StrataDB::new_in_memory();
//!
//! let mut points = db.new_table(&[("x", DataType::Int32)])?;
//! points.append(vec![Value::Int32(4)])?;
//! db.register_table("points", points)?;
//!
//! let result = db.scan("points", ColumnId::new(0), CompareOp::Gt, Value::Int32(3))?;
//! assert_eq!(result.row_count(), 1);
//! # Ok::<(), strata_common::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod database;

pub use config::Config;
pub use database::StrataDB;
