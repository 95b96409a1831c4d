//! Identifier types for columns, chunks and dictionary codes.

use std::fmt;

/// Index of a column within a table schema.
///
/// Tables are expected to stay well below 2^16 columns.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ColumnId(pub u16);

impl ColumnId {
    /// Creates a new column id from a raw index.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw index, widened for container indexing.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ColumnId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Index of a chunk within a table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ChunkId(pub u32);

impl ChunkId {
    /// Creates a new chunk id from a raw index.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw index, widened for container indexing.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({})", self.0)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChunkId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Row index within a single chunk.
pub type ChunkOffset = u32;

/// Position of a dictionary entry; doubles as the code stored in an
/// attribute vector.
///
/// The all-ones value is reserved as [`ValueId::INVALID`]: it marks "no such
/// dictionary entry" in bound searches and is never a legal code, because
/// attribute-vector widths are chosen so that every legal code fits strictly
/// below the backing type's maximum.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ValueId(pub u32);

impl ValueId {
    /// The invalid/sentinel value id.
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates a new value id from a raw code.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw code, widened for container indexing.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Checks whether this id names an actual dictionary entry.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ValueId({})", self.0)
        } else {
            write!(f, "ValueId(INVALID)")
        }
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ValueId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// The sentinel returned by dictionary bound searches that find nothing.
pub const INVALID_VALUE_ID: ValueId = ValueId::INVALID;

/// Logical address of a row: which chunk, and which offset inside it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    /// The chunk the row lives in.
    pub chunk_id: ChunkId,
    /// The row's offset within that chunk.
    pub chunk_offset: ChunkOffset,
}

impl RowId {
    /// Creates a row id from its two components.
    #[inline]
    #[must_use]
    pub const fn new(chunk_id: ChunkId, chunk_offset: ChunkOffset) -> Self {
        Self {
            chunk_id,
            chunk_offset,
        }
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({}, {})", self.chunk_id, self.chunk_offset)
    }
}

/// An ordered sequence of row addresses, the currency of reference segments.
pub type PosList = Vec<RowId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_id_invalid() {
        assert!(!ValueId::INVALID.is_valid());
        assert!(ValueId::new(0).is_valid());
        assert_eq!(INVALID_VALUE_ID, ValueId(u32::MAX));
    }

    #[test]
    fn test_id_debug_formatting() {
        assert_eq!(format!("{:?}", ColumnId::new(3)), "ColumnId(3)");
        assert_eq!(format!("{:?}", ChunkId::new(7)), "ChunkId(7)");
        assert_eq!(format!("{:?}", ValueId::INVALID), "ValueId(INVALID)");
        assert_eq!(format!("{:?}", RowId::new(ChunkId(1), 4)), "RowId(1, 4)");
    }

    #[test]
    fn test_row_id_equality() {
        let a = RowId::new(ChunkId(0), 2);
        let b = RowId::new(ChunkId(0), 2);
        let c = RowId::new(ChunkId(1), 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
