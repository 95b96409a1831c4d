//! Dense, mutable column storage.

use strata_common::{ChunkOffset, ColumnType, DataType, Result, Value};

/// A dense column slice storing raw typed values, append-only.
///
/// This is the only mutable segment kind: rows enter tables through value
/// segments and may later be frozen into dictionary segments.
#[derive(Debug, Clone, Default)]
pub struct ValueSegment<T: ColumnType> {
    values: Vec<T>,
}

impl<T: ColumnType> ValueSegment<T> {
    /// Creates an empty segment.
    #[must_use]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates an empty segment with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// The segment's element type tag.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    /// Appends a dynamically-typed value.
    ///
    /// # Errors
    ///
    /// Fails with [`TypeMismatch`](strata_common::Error::TypeMismatch) when
    /// the variant does not match the element type; no coercion is applied.
    pub fn append(&mut self, value: &Value) -> Result<()> {
        self.values.push(T::from_value(value)?);
        Ok(())
    }

    /// Appends an already-typed value.
    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    /// Returns the value at a row offset.
    ///
    /// # Panics
    ///
    /// Panics when `offset` is past the end of the segment.
    #[must_use]
    pub fn get(&self, offset: ChunkOffset) -> &T {
        &self.values[offset as usize]
    }

    /// Returns the value at a row offset, boxed into a dynamic [`Value`].
    ///
    /// Row-at-a-time access through the dynamic type is a convenience for
    /// output and tests; operators should iterate [`values`](Self::values)
    /// instead, which keeps the loop monomorphic.
    #[must_use]
    pub fn value_at(&self, offset: ChunkOffset) -> Value {
        self.values[offset as usize].to_value()
    }

    /// The raw values, in row order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Whether the segment holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Advisory memory footprint of the stored values.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<T>() * self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::Error;

    #[test]
    fn test_append_and_get() {
        let mut segment = ValueSegment::<i32>::new();
        segment.append(&Value::Int32(3)).unwrap();
        segment.append(&Value::Int32(5)).unwrap();
        segment.push(7);

        assert_eq!(segment.size(), 3);
        assert_eq!(*segment.get(0), 3);
        assert_eq!(*segment.get(2), 7);
        assert_eq!(segment.value_at(1), Value::Int32(5));
    }

    #[test]
    fn test_append_rejects_wrong_type() {
        let mut segment = ValueSegment::<i32>::new();
        let err = segment.append(&Value::Int64(3)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(segment.is_empty());
    }

    #[test]
    fn test_string_segment() {
        let mut segment = ValueSegment::<arcstr::ArcStr>::new();
        segment.append(&Value::from("Bill")).unwrap();
        segment.append(&Value::from("Steve")).unwrap();

        assert_eq!(segment.get(0).as_str(), "Bill");
        assert_eq!(segment.value_at(1), Value::from("Steve"));
    }

    #[test]
    fn test_memory_estimate() {
        let mut segment = ValueSegment::<i64>::with_capacity(4);
        for i in 0..4 {
            segment.push(i);
        }
        assert_eq!(segment.estimate_memory_usage(), 32);
    }
}
