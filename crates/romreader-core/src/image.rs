//! Memory image of a ROM address space

use alloc::vec::Vec;
use core::ops::Deref;

/// Value of unprogrammed ROM cells, used to pad gaps in an image
pub const FILL_BYTE: u8 = 0xFF;

/// The chip's address space as observed so far
///
/// Offsets are zero-based. The image only ever grows: writing past the
/// current end extends it, and bytes in between are set to [`FILL_BYTE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    data: Vec<u8>,
}

impl MemoryImage {
    /// Create an empty image
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an image holding exactly `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Number of bytes in the image
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Image contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Store `bytes` at `offset`, growing the image first if needed
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, FILL_BYTE);
        }
        self.data[offset..end].copy_from_slice(bytes);
    }

    /// Offset of the first byte that differs from [`FILL_BYTE`]
    pub fn first_programmed(&self) -> Option<usize> {
        self.data.iter().position(|&b| b != FILL_BYTE)
    }

    /// Whether every byte is still unprogrammed
    pub fn is_blank(&self) -> bool {
        self.first_programmed().is_none()
    }
}

impl Deref for MemoryImage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for MemoryImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemoryImage {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_write_at_fills_gap() {
        let mut image = MemoryImage::new();
        image.write_at(4, &[0x12, 0x34]);
        assert_eq!(image.as_bytes(), &[0xFF, 0xFF, 0xFF, 0xFF, 0x12, 0x34]);
    }

    #[test]
    fn test_write_at_never_shrinks() {
        let mut image = MemoryImage::from(vec![0u8; 8]);
        image.write_at(2, &[0xAA]);
        assert_eq!(image.len(), 8);
        assert_eq!(image[2], 0xAA);
    }

    #[test]
    fn test_blank_check() {
        let mut image = MemoryImage::from(vec![FILL_BYTE; 32]);
        assert!(image.is_blank());
        image.write_at(17, &[0x00]);
        assert_eq!(image.first_programmed(), Some(17));
        assert!(!image.is_blank());
    }
}
