//! Fixed-width packed storage for dictionary codes.

use strata_common::{ChunkOffset, Error, Result, ValueId};

/// A packed array of dictionary codes, one per chunk offset.
///
/// The backing width is picked by the dictionary builder, not the caller:
/// the smallest of 1, 2 or 4 bytes whose range holds every code of the
/// dictionary plus the reserved sentinel. [`ValueId::INVALID`] is stored as
/// the width's all-ones pattern and decodes back to the canonical sentinel,
/// so it can never collide with a legal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeVector {
    /// 1-byte codes, for dictionaries with at most 255 entries.
    U8(Vec<u8>),
    /// 2-byte codes, for dictionaries with at most 65535 entries.
    U16(Vec<u16>),
    /// 4-byte codes.
    U32(Vec<u32>),
}

impl AttributeVector {
    /// Creates a zero-initialized vector of `len` codes, sized for a
    /// dictionary with `unique_values` entries.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DictionaryTooLarge`] when even 4-byte codes
    /// cannot address the dictionary.
    pub fn for_unique_values(unique_values: usize, len: usize) -> Result<Self> {
        if unique_values <= usize::from(u8::MAX) {
            Ok(AttributeVector::U8(vec![0; len]))
        } else if unique_values <= usize::from(u16::MAX) {
            Ok(AttributeVector::U16(vec![0; len]))
        } else if unique_values <= u32::MAX as usize {
            Ok(AttributeVector::U32(vec![0; len]))
        } else {
            Err(Error::DictionaryTooLarge(unique_values))
        }
    }

    /// Returns the code at position `i`.
    ///
    /// The width's all-ones pattern decodes to [`ValueId::INVALID`].
    ///
    /// # Panics
    ///
    /// Panics when `i >= size()`.
    #[must_use]
    pub fn get(&self, i: usize) -> ValueId {
        debug_assert!(i < self.size(), "attribute vector index out of bounds");
        match self {
            AttributeVector::U8(codes) => {
                let raw = codes[i];
                if raw == u8::MAX {
                    ValueId::INVALID
                } else {
                    ValueId::new(u32::from(raw))
                }
            }
            AttributeVector::U16(codes) => {
                let raw = codes[i];
                if raw == u16::MAX {
                    ValueId::INVALID
                } else {
                    ValueId::new(u32::from(raw))
                }
            }
            AttributeVector::U32(codes) => ValueId::new(codes[i]),
        }
    }

    /// Writes the code `value_id` at position `i`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfBounds`] on a bad index and with
    /// [`Error::ValueIdTooWide`] when a valid code does not fit the backing
    /// width. [`ValueId::INVALID`] always fits: it is stored as the width's
    /// all-ones pattern.
    pub fn set(&mut self, i: usize, value_id: ValueId) -> Result<()> {
        let size = self.size();
        if i >= size {
            return Err(Error::OutOfBounds { index: i, size });
        }
        let raw = value_id.0;
        match self {
            AttributeVector::U8(codes) => {
                if value_id.is_valid() && raw > u32::from(u8::MAX) {
                    return Err(Error::ValueIdTooWide { value_id, width: 1 });
                }
                codes[i] = if value_id.is_valid() { raw as u8 } else { u8::MAX };
            }
            AttributeVector::U16(codes) => {
                if value_id.is_valid() && raw > u32::from(u16::MAX) {
                    return Err(Error::ValueIdTooWide { value_id, width: 2 });
                }
                codes[i] = if value_id.is_valid() {
                    raw as u16
                } else {
                    u16::MAX
                };
            }
            AttributeVector::U32(codes) => codes[i] = raw,
        }
        Ok(())
    }

    /// Returns the number of codes.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            AttributeVector::U8(codes) => codes.len(),
            AttributeVector::U16(codes) => codes.len(),
            AttributeVector::U32(codes) => codes.len(),
        }
    }

    /// Returns the backing width in bytes (1, 2 or 4).
    #[must_use]
    pub const fn width(&self) -> u8 {
        match self {
            AttributeVector::U8(_) => 1,
            AttributeVector::U16(_) => 2,
            AttributeVector::U32(_) => 4,
        }
    }

    /// Bytes occupied by the packed codes.
    #[must_use]
    pub fn heap_size_bytes(&self) -> usize {
        self.size() * usize::from(self.width())
    }

    /// Returns the code at a chunk-local row offset.
    #[inline]
    #[must_use]
    pub fn get_at_offset(&self, offset: ChunkOffset) -> ValueId {
        self.get(offset as usize)
    }
}
