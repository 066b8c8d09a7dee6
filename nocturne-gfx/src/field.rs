//! Bounds-checked little-endian field access
//!
//! Font and image headers are read at fixed offsets out of data that comes
//! from assets, so every read is checked against the slice length and
//! offset arithmetic never wraps.

/// Field read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// The field lies (partly) past the end of the data
    OutOfBounds {
        /// Requested offset
        offset: usize,
        /// Requested length
        len: usize,
    },
}

/// Typed reader over a borrowed byte slice
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    data: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Wrap a byte slice
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Length of the underlying data
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying data is empty
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], FieldError> {
        let end = offset
            .checked_add(len)
            .ok_or(FieldError::OutOfBounds { offset, len })?;
        self.data
            .get(offset..end)
            .ok_or(FieldError::OutOfBounds { offset, len })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], FieldError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(offset, N)?);
        Ok(out)
    }

    /// Read a byte
    pub fn u8_at(&self, offset: usize) -> Result<u8, FieldError> {
        self.data
            .get(offset)
            .copied()
            .ok_or(FieldError::OutOfBounds { offset, len: 1 })
    }

    /// Read a little-endian u16
    pub fn u16_le_at(&self, offset: usize) -> Result<u16, FieldError> {
        self.array(offset).map(u16::from_le_bytes)
    }

    /// Read a little-endian u32
    pub fn u32_le_at(&self, offset: usize) -> Result<u32, FieldError> {
        self.array(offset).map(u32::from_le_bytes)
    }

    /// Read a little-endian i32
    pub fn i32_le_at(&self, offset: usize) -> Result<i32, FieldError> {
        self.array(offset).map(i32::from_le_bytes)
    }
}
