//! Monochrome BMP decoding
//!
//! Only 1 bit-per-pixel, uncompressed images are accepted. Header fields
//! used (all little-endian):
//!
//! ```text
//! offset  size  field
//!   10     4    offset of pixel data
//!   14     4    info header size
//!   18     4    width
//!   22     4    height (signed: > 0 bottom-up, < 0 top-down)
//!   28     2    bits per pixel
//!   30     4    compression
//! ```
//!
//! The two-entry color table follows the info header. Pixel rows are padded
//! to a multiple of 4 bytes, most significant bit = leftmost pixel.
//!
//! The whole pixel region is bounds-checked during parsing, so drawing only
//! starts once the image is known to be complete.

use crate::field::{FieldError, FieldReader};
use crate::framebuffer::FrameBuffer;

/// Smallest possible BMP (file header + BITMAPINFOHEADER)
pub const MIN_BMP_SIZE: usize = 54;

/// BMP file header size; the info header starts right after it
const FILE_HEADER_SIZE: usize = 14;

/// Header field offsets
mod offset {
    pub const DATA_OFFSET: usize = 10;
    pub const HEADER_SIZE: usize = 14;
    pub const WIDTH: usize = 18;
    pub const HEIGHT: usize = 22;
    pub const BIT_COUNT: usize = 28;
    pub const COMPRESSION: usize = 30;
}

/// Bytes per color table entry (blue, green, red, reserved)
const PALETTE_ENTRY_SIZE: usize = 4;

/// Image parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError {
    /// Data shorter than the minimum header
    TooShort,
    /// A header field could not be read
    Truncated,
    /// Bits per pixel other than 1
    UnsupportedBitDepth(u16),
    /// Any compression method
    Compressed(u32),
    /// Row stride or pixel region size overflows
    TooLarge,
    /// Pixel data extends past the end of the data
    PixelDataOutOfBounds,
}

impl From<FieldError> for ImageError {
    fn from(_: FieldError) -> Self {
        ImageError::Truncated
    }
}

/// A validated 1bpp image borrowed from its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonoBitmap<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    bottom_up: bool,
    stride: usize,
    foreground: u8,
}

impl<'a> MonoBitmap<'a> {
    /// Parse and validate a BMP container
    pub fn parse(data: &'a [u8]) -> Result<Self, ImageError> {
        if data.len() < MIN_BMP_SIZE {
            return Err(ImageError::TooShort);
        }

        let reader = FieldReader::new(data);
        let data_offset = reader.u32_le_at(offset::DATA_OFFSET)? as usize;
        let header_size = reader.u32_le_at(offset::HEADER_SIZE)? as usize;
        let width = reader.u32_le_at(offset::WIDTH)?;
        let raw_height = reader.i32_le_at(offset::HEIGHT)?;
        let bit_count = reader.u16_le_at(offset::BIT_COUNT)?;
        let compression = reader.u32_le_at(offset::COMPRESSION)?;

        if bit_count != 1 {
            return Err(ImageError::UnsupportedBitDepth(bit_count));
        }
        if compression != 0 {
            return Err(ImageError::Compressed(compression));
        }

        let foreground = foreground_index(&reader, header_size);
        let stride = row_stride(width).ok_or(ImageError::TooLarge)?;
        let height = raw_height.unsigned_abs();
        let len = stride
            .checked_mul(height as usize)
            .ok_or(ImageError::TooLarge)?;
        let pixels = reader
            .slice(data_offset, len)
            .map_err(|_| ImageError::PixelDataOutOfBounds)?;

        Ok(Self {
            pixels,
            width,
            height,
            bottom_up: raw_height > 0,
            stride,
            foreground,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether rows are stored bottom row first
    pub const fn is_bottom_up(&self) -> bool {
        self.bottom_up
    }

    /// Bytes per stored row, including padding
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel value that is drawn
    pub const fn foreground(&self) -> u8 {
        self.foreground
    }

    /// Whether the pixel at `(x, y)` (top-left origin) is foreground
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let stored_row = if self.bottom_up {
            self.height - 1 - y
        } else {
            y
        };
        self.sample(stored_row, x) == self.foreground
    }

    fn sample(&self, stored_row: u32, x: u32) -> u8 {
        let index = stored_row as usize * self.stride + (x >> 3) as usize;
        (self.pixels[index] >> (7 - (x & 7))) & 1
    }

    /// Set every foreground pixel, offset by `(x_offset, y_offset)`
    pub fn draw(&self, fb: &mut FrameBuffer, x_offset: u32, y_offset: u32) {
        if self.width == 0 {
            return;
        }

        for stored_row in 0..self.height {
            let device_row = if self.bottom_up {
                self.height - 1 - stored_row
            } else {
                stored_row
            };
            let py = y_offset.saturating_add(device_row);
            for x in 0..self.width {
                if self.sample(stored_row, x) == self.foreground {
                    fb.set_pixel(x_offset.saturating_add(x), py);
                }
            }
        }
    }
}

/// Palette index whose color is pure black, or 0
///
/// A color table that does not fit in the data counts as absent.
fn foreground_index(reader: &FieldReader<'_>, header_size: usize) -> u8 {
    let Some(table) = FILE_HEADER_SIZE.checked_add(header_size) else {
        return 0;
    };

    for index in 0..2u8 {
        let entry = reader.slice(table.saturating_add(index as usize * PALETTE_ENTRY_SIZE), 3);
        if matches!(entry, Ok([0, 0, 0])) {
            return index;
        }
    }
    0
}

/// Bytes per row, rounded up to a 4-byte boundary
fn row_stride(width: u32) -> Option<usize> {
    let bytes = (width as usize).checked_add(7)? / 8;
    Some(bytes.checked_add(3)? & !3)
}

impl FrameBuffer {
    /// Decode a monochrome BMP and draw it at `(x_offset, y_offset)`
    ///
    /// Unsupported or malformed images draw nothing.
    pub fn decode_and_blit(&mut self, data: &[u8], x_offset: u32, y_offset: u32) {
        match MonoBitmap::parse(data) {
            Ok(bitmap) => bitmap.draw(self, x_offset, y_offset),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Bitmap rejected: {:?}", _err);
            }
        }
    }

    /// Decode a monochrome BMP and draw it at the origin
    pub fn draw_image(&mut self, data: &[u8]) {
        self.decode_and_blit(data, 0, 0);
    }
}
