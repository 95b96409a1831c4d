//! Immutable, order-preserving dictionary encoding.

use std::cmp::Ordering;

use strata_common::{ChunkOffset, ColumnType, DataType, Error, Result, Value, ValueId};

use super::attribute_vector::AttributeVector;
use super::value_segment::ValueSegment;

/// An immutable column slice storing each row as an index into a sorted
/// vector of the column's distinct values.
///
/// Because the dictionary is sorted, order statistics over the column reduce
/// to binary searches over the dictionary, which is what lets a scan decide
/// "nothing here" or "everything here" without touching the attribute
/// vector.
#[derive(Debug, Clone)]
pub struct DictionarySegment<T: ColumnType> {
    dictionary: Vec<T>,
    attributes: AttributeVector,
}

impl<T: ColumnType> DictionarySegment<T> {
    /// Compresses a value segment.
    ///
    /// The dictionary is the sorted set of distinct values; each row is
    /// encoded as the index of its exact match, stored in an attribute
    /// vector of the smallest width that can address the dictionary.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DictionaryTooLarge`] when the distinct-value
    /// count exceeds the widest attribute vector.
    pub fn from_value_segment(segment: &ValueSegment<T>) -> Result<Self> {
        let mut dictionary: Vec<T> = segment.values().to_vec();
        dictionary.sort_unstable_by(ColumnType::compare);
        dictionary.dedup_by(|a, b| a.equals(b));

        let mut attributes = AttributeVector::for_unique_values(dictionary.len(), segment.size())?;
        for (row, value) in segment.values().iter().enumerate() {
            // The value was inserted into the dictionary, so its lower bound
            // is an exact match.
            let code = lower_bound_index(&dictionary, value);
            attributes.set(row, ValueId::new(code as u32))?;
        }

        Ok(Self {
            dictionary,
            attributes,
        })
    }

    /// The segment's element type tag.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    /// Returns the decoded value at a row offset.
    ///
    /// # Panics
    ///
    /// Panics when `offset` is past the end of the segment.
    #[must_use]
    pub fn get(&self, offset: ChunkOffset) -> &T {
        &self.dictionary[self.attributes.get(offset as usize).as_usize()]
    }

    /// Returns the decoded value at a row offset as a dynamic [`Value`].
    #[must_use]
    pub fn value_at(&self, offset: ChunkOffset) -> Value {
        self.get(offset).to_value()
    }

    /// Returns the dictionary entry a code names.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValueId`] when the code is past the end of
    /// the dictionary (including the sentinel).
    pub fn value_by_value_id(&self, value_id: ValueId) -> Result<&T> {
        self.dictionary
            .get(value_id.as_usize())
            .ok_or(Error::InvalidValueId(value_id))
    }

    /// First code whose dictionary entry is `>=` the probe, or
    /// [`ValueId::INVALID`] when every entry is smaller.
    #[must_use]
    pub fn lower_bound(&self, value: &T) -> ValueId {
        let index = lower_bound_index(&self.dictionary, value);
        if index == self.dictionary.len() {
            ValueId::INVALID
        } else {
            ValueId::new(index as u32)
        }
    }

    /// First code whose dictionary entry is `>` the probe, or
    /// [`ValueId::INVALID`] when every entry is smaller or equal.
    #[must_use]
    pub fn upper_bound(&self, value: &T) -> ValueId {
        let index = self
            .dictionary
            .partition_point(|entry| entry.compare(value) != Ordering::Greater);
        if index == self.dictionary.len() {
            ValueId::INVALID
        } else {
            ValueId::new(index as u32)
        }
    }

    /// Dictionary segments are immutable; appending always fails.
    ///
    /// # Errors
    ///
    /// Always [`Error::ImmutableSegment`].
    pub fn append(&mut self, _value: &Value) -> Result<()> {
        Err(Error::ImmutableSegment)
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.attributes.size()
    }

    /// Number of distinct values.
    #[must_use]
    pub fn unique_values_count(&self) -> usize {
        self.dictionary.len()
    }

    /// The sorted distinct values.
    #[must_use]
    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    /// The packed per-row codes.
    #[must_use]
    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attributes
    }

    /// Advisory memory footprint: dictionary entries plus packed codes.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<T>() * self.dictionary.len() + self.attributes.heap_size_bytes()
    }
}

/// Index of the first entry `>=` the probe in a slice sorted by the column
/// type's total order.
fn lower_bound_index<T: ColumnType>(sorted: &[T], value: &T) -> usize {
    sorted.partition_point(|entry| entry.compare(value) == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstr::ArcStr;

    fn int_segment(values: &[i32]) -> ValueSegment<i32> {
        let mut segment = ValueSegment::new();
        for &v in values {
            segment.push(v);
        }
        segment
    }

    #[test]
    fn test_compress_string_segment() {
        let mut source = ValueSegment::<ArcStr>::new();
        for name in ["Bill", "Steve", "Alexander", "Steve", "Hasso", "Bill"] {
            source.push(name.into());
        }
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();

        assert_eq!(compressed.size(), 6);
        assert_eq!(compressed.unique_values_count(), 4);

        let dict: Vec<&str> = compressed.dictionary().iter().map(ArcStr::as_str).collect();
        assert_eq!(dict, ["Alexander", "Bill", "Hasso", "Steve"]);
    }

    #[test]
    fn test_compression_preserves_rows() {
        let source = int_segment(&[3, 5, 3, 7, 5]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        for offset in 0..source.size() {
            assert_eq!(
                compressed.get(offset as ChunkOffset),
                source.get(offset as ChunkOffset)
            );
        }
    }

    #[test]
    fn test_lower_upper_bound() {
        let source = int_segment(&[0, 2, 4, 6, 8, 10]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();

        assert_eq!(compressed.lower_bound(&4), ValueId::new(2));
        assert_eq!(compressed.upper_bound(&4), ValueId::new(3));

        assert_eq!(compressed.lower_bound(&5), ValueId::new(3));
        assert_eq!(compressed.upper_bound(&5), ValueId::new(3));

        assert_eq!(compressed.lower_bound(&15), ValueId::INVALID);
        assert_eq!(compressed.upper_bound(&15), ValueId::INVALID);
    }

    #[test]
    fn test_attribute_vector_is_wide_enough() {
        let mut source = int_segment(&[0]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        assert_eq!(compressed.attribute_vector().width(), 1);

        for i in source.size() as i32..256 {
            source.push(i);
        }
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        assert_eq!(compressed.attribute_vector().width(), 2);

        for i in source.size() as i32..65536 {
            source.push(i);
        }
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        assert_eq!(compressed.attribute_vector().width(), 4);
    }

    #[test]
    fn test_value_by_value_id() {
        let source = int_segment(&[2, 1, 2]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();

        assert_eq!(*compressed.value_by_value_id(ValueId::new(0)).unwrap(), 1);
        assert_eq!(*compressed.value_by_value_id(ValueId::new(1)).unwrap(), 2);
        assert_eq!(
            compressed.value_by_value_id(ValueId::new(2)).unwrap_err(),
            Error::InvalidValueId(ValueId::new(2))
        );
        assert!(compressed.value_by_value_id(ValueId::INVALID).is_err());
    }

    #[test]
    fn test_append_fails() {
        let source = int_segment(&[1]);
        let mut compressed = DictionarySegment::from_value_segment(&source).unwrap();
        assert_eq!(
            compressed.append(&Value::Int32(2)).unwrap_err(),
            Error::ImmutableSegment
        );
    }

    #[test]
    fn test_dictionary_is_strictly_ascending() {
        let source = int_segment(&[9, 1, 5, 1, 9, 3]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        let dict = compressed.dictionary();
        assert!(dict.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_float_dictionary_handles_nan() {
        let mut source = ValueSegment::<f64>::new();
        for v in [2.0, f64::NAN, 1.0, f64::NAN] {
            source.push(v);
        }
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();

        // NaN dedups to one entry and sorts last.
        assert_eq!(compressed.unique_values_count(), 3);
        assert!(compressed.dictionary()[2].is_nan());
        assert!(compressed.get(1).is_nan());
        assert_eq!(*compressed.get(2), 1.0);
    }

    #[test]
    fn test_subscript_value() {
        let source = int_segment(&[3, 5, 3]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        assert_eq!(compressed.value_at(2), Value::Int32(3));
    }

    #[test]
    fn test_memory_estimate() {
        let source = int_segment(&[1, 2, 2, 3]);
        let compressed = DictionarySegment::from_value_segment(&source).unwrap();
        // 3 dictionary entries of 4 bytes + 4 one-byte codes.
        assert_eq!(compressed.estimate_memory_usage(), 16);
    }
}
