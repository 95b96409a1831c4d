//! Type-erased segment dispatch.
//!
//! Columns are stored as monomorphic generic segments; this module wraps
//! them in closed sum types so chunks can hold a uniform `Vec<Segment>` and
//! operators can resolve the concrete element type with a single match.

use arcstr::ArcStr;

use strata_common::{ChunkOffset, ColumnType, DataType, Error, Result, Value};

use super::dictionary_segment::DictionarySegment;
use super::reference_segment::ReferenceSegment;
use super::value_segment::ValueSegment;

/// A value segment of any element type.
#[derive(Debug, Clone)]
pub enum AnyValueSegment {
    /// int32 rows
    Int32(ValueSegment<i32>),
    /// int64 rows
    Int64(ValueSegment<i64>),
    /// float32 rows
    Float32(ValueSegment<f32>),
    /// float64 rows
    Float64(ValueSegment<f64>),
    /// string rows
    String(ValueSegment<ArcStr>),
}

/// A dictionary segment of any element type.
#[derive(Debug, Clone)]
pub enum AnyDictionarySegment {
    /// int32 rows
    Int32(DictionarySegment<i32>),
    /// int64 rows
    Int64(DictionarySegment<i64>),
    /// float32 rows
    Float32(DictionarySegment<f32>),
    /// float64 rows
    Float64(DictionarySegment<f64>),
    /// string rows
    String(DictionarySegment<ArcStr>),
}

/// Dispatches on every [`AnyValueSegment`] variant with one body.
macro_rules! with_value_segment {
    ($any:expr, $segment:ident => $body:expr) => {
        match $any {
            AnyValueSegment::Int32($segment) => $body,
            AnyValueSegment::Int64($segment) => $body,
            AnyValueSegment::Float32($segment) => $body,
            AnyValueSegment::Float64($segment) => $body,
            AnyValueSegment::String($segment) => $body,
        }
    };
}

/// Dispatches on every [`AnyDictionarySegment`] variant with one body.
macro_rules! with_dictionary_segment {
    ($any:expr, $segment:ident => $body:expr) => {
        match $any {
            AnyDictionarySegment::Int32($segment) => $body,
            AnyDictionarySegment::Int64($segment) => $body,
            AnyDictionarySegment::Float32($segment) => $body,
            AnyDictionarySegment::Float64($segment) => $body,
            AnyDictionarySegment::String($segment) => $body,
        }
    };
}

impl AnyValueSegment {
    /// Creates an empty value segment of the given element type.
    #[must_use]
    pub fn new(data_type: DataType) -> Self {
        match data_type {
            DataType::Int32 => AnyValueSegment::Int32(ValueSegment::new()),
            DataType::Int64 => AnyValueSegment::Int64(ValueSegment::new()),
            DataType::Float32 => AnyValueSegment::Float32(ValueSegment::new()),
            DataType::Float64 => AnyValueSegment::Float64(ValueSegment::new()),
            DataType::String => AnyValueSegment::String(ValueSegment::new()),
        }
    }

    /// The element type tag.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            AnyValueSegment::Int32(_) => DataType::Int32,
            AnyValueSegment::Int64(_) => DataType::Int64,
            AnyValueSegment::Float32(_) => DataType::Float32,
            AnyValueSegment::Float64(_) => DataType::Float64,
            AnyValueSegment::String(_) => DataType::String,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        with_value_segment!(self, segment => segment.size())
    }

    /// Appends a dynamically-typed value.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TypeMismatch`] on a variant mismatch.
    pub fn append(&mut self, value: &Value) -> Result<()> {
        with_value_segment!(self, segment => segment.append(value))
    }

    /// Returns the row at `offset` as a dynamic [`Value`].
    #[must_use]
    pub fn value_at(&self, offset: ChunkOffset) -> Value {
        with_value_segment!(self, segment => segment.value_at(offset))
    }

    /// Builds the dictionary-compressed twin of this segment.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DictionaryTooLarge`] when the distinct-value
    /// count exceeds the widest attribute vector.
    pub fn compress(&self) -> Result<AnyDictionarySegment> {
        Ok(match self {
            AnyValueSegment::Int32(segment) => {
                AnyDictionarySegment::Int32(DictionarySegment::from_value_segment(segment)?)
            }
            AnyValueSegment::Int64(segment) => {
                AnyDictionarySegment::Int64(DictionarySegment::from_value_segment(segment)?)
            }
            AnyValueSegment::Float32(segment) => {
                AnyDictionarySegment::Float32(DictionarySegment::from_value_segment(segment)?)
            }
            AnyValueSegment::Float64(segment) => {
                AnyDictionarySegment::Float64(DictionarySegment::from_value_segment(segment)?)
            }
            AnyValueSegment::String(segment) => {
                AnyDictionarySegment::String(DictionarySegment::from_value_segment(segment)?)
            }
        })
    }

    /// Advisory memory footprint.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        with_value_segment!(self, segment => segment.estimate_memory_usage())
    }
}

impl AnyDictionarySegment {
    /// The element type tag.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            AnyDictionarySegment::Int32(_) => DataType::Int32,
            AnyDictionarySegment::Int64(_) => DataType::Int64,
            AnyDictionarySegment::Float32(_) => DataType::Float32,
            AnyDictionarySegment::Float64(_) => DataType::Float64,
            AnyDictionarySegment::String(_) => DataType::String,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        with_dictionary_segment!(self, segment => segment.size())
    }

    /// Number of distinct values.
    #[must_use]
    pub fn unique_values_count(&self) -> usize {
        with_dictionary_segment!(self, segment => segment.unique_values_count())
    }

    /// Returns the row at `offset` as a dynamic [`Value`].
    #[must_use]
    pub fn value_at(&self, offset: ChunkOffset) -> Value {
        with_dictionary_segment!(self, segment => segment.value_at(offset))
    }

    /// Advisory memory footprint.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        with_dictionary_segment!(self, segment => segment.estimate_memory_usage())
    }
}

/// A column slice of one of the three storage kinds.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Dense mutable storage.
    Value(AnyValueSegment),
    /// Immutable dictionary-compressed storage.
    Dictionary(AnyDictionarySegment),
    /// Redirection into another table.
    Reference(ReferenceSegment),
}

impl Segment {
    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Segment::Value(segment) => segment.size(),
            Segment::Dictionary(segment) => segment.size(),
            Segment::Reference(segment) => segment.size(),
        }
    }

    /// Returns the row at `offset` as a dynamic [`Value`].
    ///
    /// # Errors
    ///
    /// Reference segments can fail while resolving; the materialized kinds
    /// cannot.
    pub fn value_at(&self, offset: ChunkOffset) -> Result<Value> {
        match self {
            Segment::Value(segment) => Ok(segment.value_at(offset)),
            Segment::Dictionary(segment) => Ok(segment.value_at(offset)),
            Segment::Reference(segment) => segment.value_at(offset),
        }
    }

    /// Appends a dynamically-typed value.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TypeMismatch`] on a variant mismatch and with
    /// [`Error::ImmutableSegment`] on the immutable kinds.
    pub fn append(&mut self, value: &Value) -> Result<()> {
        match self {
            Segment::Value(segment) => segment.append(value),
            Segment::Dictionary(_) | Segment::Reference(_) => Err(Error::ImmutableSegment),
        }
    }

    /// The element type tag, resolved through the referenced table for
    /// reference segments. `None` only if a reference points at a column
    /// that no longer exists.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Segment::Value(segment) => Some(segment.data_type()),
            Segment::Dictionary(segment) => Some(segment.data_type()),
            Segment::Reference(segment) => segment
                .referenced_table()
                .column_type(segment.referenced_column_id())
                .ok(),
        }
    }

    /// Whether this is a reference segment.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Segment::Reference(_))
    }

    /// Advisory memory footprint.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        match self {
            Segment::Value(segment) => segment.estimate_memory_usage(),
            Segment::Dictionary(segment) => segment.estimate_memory_usage(),
            Segment::Reference(segment) => segment.estimate_memory_usage(),
        }
    }
}

/// Recovers the monomorphic segment for a concrete element type.
///
/// This is the closed-world counterpart of a runtime down-cast: each element
/// type knows which variant of the type-erased enums wraps it. Operators
/// resolve `DataType` to a concrete `T` once, then use these accessors
/// inside their typed loops.
pub trait SegmentAccess: ColumnType {
    /// The value segment, when the variant matches `Self`.
    fn as_value_segment(segment: &AnyValueSegment) -> Option<&ValueSegment<Self>>;

    /// The dictionary segment, when the variant matches `Self`.
    fn as_dictionary_segment(segment: &AnyDictionarySegment) -> Option<&DictionarySegment<Self>>;
}

macro_rules! impl_segment_access {
    ($element:ty, $variant:ident) => {
        impl SegmentAccess for $element {
            fn as_value_segment(segment: &AnyValueSegment) -> Option<&ValueSegment<Self>> {
                match segment {
                    AnyValueSegment::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn as_dictionary_segment(
                segment: &AnyDictionarySegment,
            ) -> Option<&DictionarySegment<Self>> {
                match segment {
                    AnyDictionarySegment::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_segment_access!(i32, Int32);
impl_segment_access!(i64, Int64);
impl_segment_access!(f32, Float32);
impl_segment_access!(f64, Float64);
impl_segment_access!(ArcStr, String);
