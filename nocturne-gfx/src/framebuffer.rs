//! Packed 1bpp framebuffer
//!
//! Pixels are stored the way the controller's RAM is organized: one byte per
//! column per 8-row page, bit `y & 7` of byte `x + width * (y >> 3)` holds
//! pixel `(x, y)`. Sending the buffer in horizontal addressing mode is then a
//! single contiguous write.

use heapless::Vec;

use crate::config::{DisplayConfig, MAX_BUFFER_SIZE, PAGE_HEIGHT};

/// Framebuffer allocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameBufferError {
    /// Zero width/height, or height not a multiple of 8
    InvalidDimensions,
    /// Buffer does not fit the available storage
    AllocationFailed,
}

/// Display framebuffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    buffer: Vec<u8, MAX_BUFFER_SIZE>,
}

impl FrameBuffer {
    /// Allocate a zeroed framebuffer for the given panel
    pub fn new(config: &DisplayConfig) -> Result<Self, FrameBufferError> {
        config.validate()?;

        let mut buffer = Vec::new();
        buffer
            .resize(config.buffer_len(), 0)
            .map_err(|_| FrameBufferError::AllocationFailed)?;

        Ok(Self {
            width: config.width,
            height: config.height,
            buffer,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u16 {
        self.height / PAGE_HEIGHT
    }

    /// Raw buffer in controller order
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Columns of a single page, or `None` past the last page
    pub fn page(&self, page: u16) -> Option<&[u8]> {
        if page >= self.pages() {
            return None;
        }
        let start = page as usize * self.width as usize;
        self.buffer.get(start..start + self.width as usize)
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Byte index and bit mask for a pixel, `None` when off-panel
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width as u32 || y >= self.height as u32 {
            return None;
        }
        let index = x as usize + self.width as usize * (y >> 3) as usize;
        Some((index, 1 << (y & 7)))
    }

    /// Turn a pixel on. Off-panel coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.buffer[index] |= mask;
        }
    }

    /// Turn a pixel off. Off-panel coordinates are ignored.
    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.buffer[index] &= !mask;
        }
    }

    /// Read a pixel back; off-panel pixels read as off
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        self.locate(x, y)
            .map(|(index, mask)| self.buffer[index] & mask != 0)
            .unwrap_or(false)
    }

    /// Number of pixels currently on
    pub fn lit_count(&self) -> u32 {
        self.buffer.iter().map(|b| b.count_ones()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fb(width: u16, height: u16) -> FrameBuffer {
        FrameBuffer::new(&DisplayConfig::new(width, height)).unwrap()
    }

    #[test]
    fn test_new_is_zeroed() {
        let fb = fb(128, 64);
        assert_eq!(fb.as_bytes().len(), 1024);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(fb.pages(), 8);
    }

    #[test]
    fn test_new_rejects_bad_geometry() {
        assert_eq!(
            FrameBuffer::new(&DisplayConfig::new(128, 63)),
            Err(FrameBufferError::InvalidDimensions)
        );
        assert_eq!(
            FrameBuffer::new(&DisplayConfig::new(132, 64)),
            Err(FrameBufferError::AllocationFailed)
        );
    }

    #[test]
    fn test_pixel_byte_mapping() {
        let mut fb = fb(128, 64);
        fb.set_pixel(3, 10);
        // page 1, column 3, bit 2
        assert_eq!(fb.as_bytes()[128 + 3], 0b0000_0100);

        fb.set_pixel(127, 63);
        assert_eq!(fb.as_bytes()[1023], 0b1000_0000);
        assert_eq!(fb.page(7).unwrap()[127], 0b1000_0000);
    }

    #[test]
    fn test_clear_pixel_keeps_neighbours() {
        let mut fb = fb(64, 16);
        fb.set_pixel(5, 0);
        fb.set_pixel(5, 1);
        fb.clear_pixel(5, 0);
        assert!(!fb.pixel(5, 0));
        assert!(fb.pixel(5, 1));
    }

    #[test]
    fn test_clear() {
        let mut fb = fb(64, 32);
        fb.set_pixel(1, 1);
        fb.set_pixel(63, 31);
        fb.clear();
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_pages_match_config() {
        for height in [8, 16, 32, 48, 64] {
            let config = DisplayConfig::new(128, height);
            let fb = FrameBuffer::new(&config).unwrap();
            assert_eq!(fb.pages(), config.pages());
            assert_eq!(fb.as_bytes().len(), 128 * fb.pages() as usize);
        }
    }

    #[test]
    fn test_page_out_of_range() {
        let fb = fb(64, 32);
        assert_eq!(fb.page(3).map(|p| p.len()), Some(64));
        assert!(fb.page(4).is_none());
    }

    proptest! {
        #[test]
        fn prop_set_then_clear_in_bounds(x in 0u32..128, y in 0u32..64) {
            let mut fb = fb(128, 64);
            fb.set_pixel(x, y);
            let byte = fb.as_bytes()[x as usize + 128 * (y as usize >> 3)];
            prop_assert!(byte & (1 << (y & 7)) != 0);
            prop_assert_eq!(fb.lit_count(), 1);

            fb.clear_pixel(x, y);
            prop_assert!(!fb.pixel(x, y));
            prop_assert_eq!(fb.lit_count(), 0);
        }

        #[test]
        fn prop_out_of_bounds_is_noop(x in 0u32..1000, y in 0u32..1000) {
            prop_assume!(x >= 128 || y >= 64);
            let mut fb = fb(128, 64);
            fb.set_pixel(0, 0);
            let before = fb.clone();

            fb.set_pixel(x, y);
            prop_assert_eq!(&fb, &before);
            fb.clear_pixel(x, y);
            prop_assert_eq!(&fb, &before);
            prop_assert!(!fb.pixel(x, y));
        }
    }
}
