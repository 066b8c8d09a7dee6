//! Bitmap font rendering
//!
//! Font blob layout:
//!
//! ```text
//! ┌────────┬───────┬─────────┬───────┬──────┬──────────────────────┐
//! │ HEIGHT │ WIDTH │ SPACING │ FIRST │ LAST │ GLYPH DATA           │
//! │ 1B     │ 1B    │ 1B      │ 1B    │ 1B   │ glyphs × W × rows B  │
//! └────────┴───────┴─────────┴───────┴──────┴──────────────────────┘
//! ```
//!
//! Each glyph is stored column by column. A column takes
//! `rows = ceil(height / 8)` bytes, and bit 0 of each byte is the topmost
//! pixel of that 8-row group. Set bits are drawn as `scale × scale` blocks,
//! which gives integer upscaling without any interpolation.

use crate::field::FieldReader;
use crate::framebuffer::FrameBuffer;

/// Size of the font header in bytes
pub const FONT_HEADER_SIZE: usize = 5;

/// Font parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// Blob shorter than the header
    TooShort,
    /// Glyph height is zero
    ZeroHeight,
    /// Glyph width is zero
    ZeroWidth,
    /// First character code is above the last one
    InvalidRange,
    /// Glyph table shorter than the header declares
    Truncated,
}

/// A parsed font borrowed from its blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font<'a> {
    data: &'a [u8],
    height: u8,
    width: u8,
    spacing: u8,
    first: u8,
    last: u8,
}

impl<'a> Font<'a> {
    /// Parse and validate a font blob
    pub fn parse(data: &'a [u8]) -> Result<Self, FontError> {
        let reader = FieldReader::new(data);
        let header = reader
            .slice(0, FONT_HEADER_SIZE)
            .map_err(|_| FontError::TooShort)?;

        let font = Self {
            data,
            height: header[0],
            width: header[1],
            spacing: header[2],
            first: header[3],
            last: header[4],
        };

        if font.height == 0 {
            return Err(FontError::ZeroHeight);
        }
        if font.width == 0 {
            return Err(FontError::ZeroWidth);
        }
        if font.first > font.last {
            return Err(FontError::InvalidRange);
        }

        let glyph_count = (font.last - font.first) as usize + 1;
        reader
            .slice(FONT_HEADER_SIZE, glyph_count * font.glyph_size())
            .map_err(|_| FontError::Truncated)?;

        Ok(font)
    }

    /// The built-in 5x8 ASCII font
    pub fn builtin() -> Font<'static> {
        Font {
            data: &FONT_5X8,
            height: 8,
            width: 5,
            spacing: 1,
            first: 32,
            last: 126,
        }
    }

    /// Glyph height in pixels
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Glyph width in pixels
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Gap between glyphs in pixels
    pub const fn spacing(&self) -> u8 {
        self.spacing
    }

    /// Supported character code range (inclusive)
    pub const fn range(&self) -> (u8, u8) {
        (self.first, self.last)
    }

    /// Bytes per column (8-row groups)
    pub const fn rows(&self) -> usize {
        (self.height as usize + 7) / 8
    }

    const fn glyph_size(&self) -> usize {
        self.width as usize * self.rows()
    }

    /// Whether the font has a glyph for `c`
    pub fn contains(&self, c: char) -> bool {
        self.code(c).is_some()
    }

    fn code(&self, c: char) -> Option<u8> {
        let code = u8::try_from(u32::from(c)).ok()?;
        (self.first..=self.last).contains(&code).then_some(code)
    }

    /// Horizontal cursor advance per character
    pub const fn advance(&self, scale: u32) -> u32 {
        (self.width as u32 + self.spacing as u32).saturating_mul(scale)
    }

    /// Width of a string as `draw_string` would lay it out
    pub fn text_width(&self, s: &str, scale: u32) -> u32 {
        let count = s.chars().take_while(|&c| c != '\0').count() as u32;
        count.saturating_mul(self.advance(scale))
    }

    /// Packed byte for glyph column `column`, row group `group`
    fn column_byte(&self, code: u8, column: usize, group: usize) -> Option<u8> {
        let index = (code - self.first) as usize;
        let offset =
            FONT_HEADER_SIZE + index * self.glyph_size() + column * self.rows() + group;
        self.data.get(offset).copied()
    }
}

impl FrameBuffer {
    /// Draw a single character with its top-left corner at `(x, y)`
    ///
    /// Characters outside the font's range draw nothing.
    pub fn draw_char(&mut self, x: u32, y: u32, scale: u32, font: &Font<'_>, c: char) {
        let Some(code) = font.code(c) else {
            return;
        };

        for w in 0..font.width as usize {
            let px = x.saturating_add((w as u32).saturating_mul(scale));
            for lp in 0..font.rows() {
                let Some(mut line) = font.column_byte(code, w, lp) else {
                    return;
                };
                for bit in 0..8u32 {
                    if line & 1 != 0 {
                        let row = (lp as u32) * 8 + bit;
                        let py = y.saturating_add(row.saturating_mul(scale));
                        self.fill_rect(px, py, scale, scale);
                    }
                    line >>= 1;
                }
            }
        }
    }

    /// Draw a string left to right starting at `(x, y)`
    ///
    /// Stops at the first NUL. There is no wrapping; text past the right
    /// edge is clipped.
    pub fn draw_string(&mut self, x: u32, y: u32, scale: u32, font: &Font<'_>, s: &str) {
        let advance = font.advance(scale);
        let mut cursor = x;
        for c in s.chars().take_while(|&c| c != '\0') {
            self.draw_char(cursor, y, scale, font, c);
            cursor = cursor.saturating_add(advance);
        }
    }

    /// Draw a character with the built-in font
    pub fn draw_char_default(&mut self, x: u32, y: u32, scale: u32, c: char) {
        self.draw_char(x, y, scale, &Font::builtin(), c);
    }

    /// Draw a string with the built-in font
    pub fn draw_string_default(&mut self, x: u32, y: u32, scale: u32, s: &str) {
        self.draw_string(x, y, scale, &Font::builtin(), s);
    }
}

/// Built-in 5x8 font covering printable ASCII (32..=126)
#[rustfmt::skip]
pub static FONT_5X8: [u8; FONT_HEADER_SIZE + 95 * 5] = [
    8, 5, 1, 32, 126,
    0x00, 0x00, 0x00, 0x00, 0x00, // ' '
    0x00, 0x00, 0x5F, 0x00, 0x00, // '!'
    0x00, 0x07, 0x00, 0x07, 0x00, // '"'
    0x14, 0x7F, 0x14, 0x7F, 0x14, // '#'
    0x24, 0x2A, 0x7F, 0x2A, 0x12, // '$'
    0x23, 0x13, 0x08, 0x64, 0x62, // '%'
    0x36, 0x49, 0x56, 0x20, 0x50, // '&'
    0x00, 0x08, 0x07, 0x03, 0x00, // '\''
    0x00, 0x1C, 0x22, 0x41, 0x00, // '('
    0x00, 0x41, 0x22, 0x1C, 0x00, // ')'
    0x2A, 0x1C, 0x7F, 0x1C, 0x2A, // '*'
    0x08, 0x08, 0x3E, 0x08, 0x08, // '+'
    0x00, 0x80, 0x70, 0x30, 0x00, // ','
    0x08, 0x08, 0x08, 0x08, 0x08, // '-'
    0x00, 0x00, 0x60, 0x60, 0x00, // '.'
    0x20, 0x10, 0x08, 0x04, 0x02, // '/'
    0x3E, 0x51, 0x49, 0x45, 0x3E, // '0'
    0x00, 0x42, 0x7F, 0x40, 0x00, // '1'
    0x72, 0x49, 0x49, 0x49, 0x46, // '2'
    0x21, 0x41, 0x49, 0x4D, 0x33, // '3'
    0x18, 0x14, 0x12, 0x7F, 0x10, // '4'
    0x27, 0x45, 0x45, 0x45, 0x39, // '5'
    0x3C, 0x4A, 0x49, 0x49, 0x31, // '6'
    0x41, 0x21, 0x11, 0x09, 0x07, // '7'
    0x36, 0x49, 0x49, 0x49, 0x36, // '8'
    0x46, 0x49, 0x49, 0x29, 0x1E, // '9'
    0x00, 0x00, 0x14, 0x00, 0x00, // ':'
    0x00, 0x40, 0x34, 0x00, 0x00, // ';'
    0x00, 0x08, 0x14, 0x22, 0x41, // '<'
    0x14, 0x14, 0x14, 0x14, 0x14, // '='
    0x00, 0x41, 0x22, 0x14, 0x08, // '>'
    0x02, 0x01, 0x59, 0x09, 0x06, // '?'
    0x3E, 0x41, 0x5D, 0x59, 0x4E, // '@'
    0x7C, 0x12, 0x11, 0x12, 0x7C, // 'A'
    0x7F, 0x49, 0x49, 0x49, 0x36, // 'B'
    0x3E, 0x41, 0x41, 0x41, 0x22, // 'C'
    0x7F, 0x41, 0x41, 0x41, 0x3E, // 'D'
    0x7F, 0x49, 0x49, 0x49, 0x41, // 'E'
    0x7F, 0x09, 0x09, 0x09, 0x01, // 'F'
    0x3E, 0x41, 0x41, 0x51, 0x73, // 'G'
    0x7F, 0x08, 0x08, 0x08, 0x7F, // 'H'
    0x00, 0x41, 0x7F, 0x41, 0x00, // 'I'
    0x20, 0x40, 0x41, 0x3F, 0x01, // 'J'
    0x7F, 0x08, 0x14, 0x22, 0x41, // 'K'
    0x7F, 0x40, 0x40, 0x40, 0x40, // 'L'
    0x7F, 0x02, 0x1C, 0x02, 0x7F, // 'M'
    0x7F, 0x04, 0x08, 0x10, 0x7F, // 'N'
    0x3E, 0x41, 0x41, 0x41, 0x3E, // 'O'
    0x7F, 0x09, 0x09, 0x09, 0x06, // 'P'
    0x3E, 0x41, 0x51, 0x21, 0x5E, // 'Q'
    0x7F, 0x09, 0x19, 0x29, 0x46, // 'R'
    0x26, 0x49, 0x49, 0x49, 0x32, // 'S'
    0x03, 0x01, 0x7F, 0x01, 0x03, // 'T'
    0x3F, 0x40, 0x40, 0x40, 0x3F, // 'U'
    0x1F, 0x20, 0x40, 0x20, 0x1F, // 'V'
    0x3F, 0x40, 0x38, 0x40, 0x3F, // 'W'
    0x63, 0x14, 0x08, 0x14, 0x63, // 'X'
    0x03, 0x04, 0x78, 0x04, 0x03, // 'Y'
    0x61, 0x59, 0x49, 0x4D, 0x43, // 'Z'
    0x00, 0x7F, 0x41, 0x41, 0x41, // '['
    0x02, 0x04, 0x08, 0x10, 0x20, // '\\'
    0x00, 0x41, 0x41, 0x41, 0x7F, // ']'
    0x04, 0x02, 0x01, 0x02, 0x04, // '^'
    0x40, 0x40, 0x40, 0x40, 0x40, // '_'
    0x00, 0x03, 0x07, 0x08, 0x00, // '`'
    0x20, 0x54, 0x54, 0x78, 0x40, // 'a'
    0x7F, 0x28, 0x44, 0x44, 0x38, // 'b'
    0x38, 0x44, 0x44, 0x44, 0x28, // 'c'
    0x38, 0x44, 0x44, 0x28, 0x7F, // 'd'
    0x38, 0x54, 0x54, 0x54, 0x18, // 'e'
    0x00, 0x08, 0x7E, 0x09, 0x02, // 'f'
    0x18, 0xA4, 0xA4, 0x9C, 0x78, // 'g'
    0x7F, 0x08, 0x04, 0x04, 0x78, // 'h'
    0x00, 0x44, 0x7D, 0x40, 0x00, // 'i'
    0x20, 0x40, 0x40, 0x3D, 0x00, // 'j'
    0x7F, 0x10, 0x28, 0x44, 0x00, // 'k'
    0x00, 0x41, 0x7F, 0x40, 0x00, // 'l'
    0x7C, 0x04, 0x78, 0x04, 0x78, // 'm'
    0x7C, 0x08, 0x04, 0x04, 0x78, // 'n'
    0x38, 0x44, 0x44, 0x44, 0x38, // 'o'
    0xFC, 0x18, 0x24, 0x24, 0x18, // 'p'
    0x18, 0x24, 0x24, 0x18, 0xFC, // 'q'
    0x7C, 0x08, 0x04, 0x04, 0x08, // 'r'
    0x48, 0x54, 0x54, 0x54, 0x24, // 's'
    0x04, 0x04, 0x3F, 0x44, 0x24, // 't'
    0x3C, 0x40, 0x40, 0x20, 0x7C, // 'u'
    0x1C, 0x20, 0x40, 0x20, 0x1C, // 'v'
    0x3C, 0x40, 0x30, 0x40, 0x3C, // 'w'
    0x44, 0x28, 0x10, 0x28, 0x44, // 'x'
    0x4C, 0x90, 0x90, 0x90, 0x7C, // 'y'
    0x44, 0x64, 0x54, 0x4C, 0x44, // 'z'
    0x00, 0x08, 0x36, 0x41, 0x00, // '{'
    0x00, 0x00, 0x77, 0x00, 0x00, // '|'
    0x00, 0x41, 0x36, 0x08, 0x00, // '}'
    0x02, 0x01, 0x02, 0x04, 0x02, // '~'
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;

    fn fb() -> FrameBuffer {
        FrameBuffer::new(&DisplayConfig::new(128, 64)).unwrap()
    }

    /// 1x1 glyph font covering only 'A', pixel on
    const DOT_FONT: [u8; 6] = [1, 1, 0, b'A', b'A', 0x01];

    #[test]
    fn test_parse_builtin() {
        let font = Font::parse(&FONT_5X8).unwrap();
        assert_eq!(font, Font::builtin());
        assert_eq!(font.rows(), 1);
        assert_eq!(font.range(), (32, 126));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Font::parse(&[8, 5, 1]), Err(FontError::TooShort));
        assert_eq!(Font::parse(&[0, 5, 1, 32, 32]), Err(FontError::ZeroHeight));
        assert_eq!(Font::parse(&[8, 0, 1, 32, 32]), Err(FontError::ZeroWidth));
        assert_eq!(Font::parse(&[8, 5, 1, 40, 32]), Err(FontError::InvalidRange));
        assert_eq!(
            Font::parse(&[8, 5, 1, 32, 33, 0, 0, 0, 0, 0]),
            Err(FontError::Truncated)
        );
    }

    #[test]
    fn test_single_pixel_glyph() {
        let font = Font::parse(&DOT_FONT).unwrap();
        let mut fb = fb();
        fb.draw_char(10, 20, 1, &font, 'A');
        assert_eq!(fb.lit_count(), 1);
        assert!(fb.pixel(10, 20));
    }

    #[test]
    fn test_single_pixel_glyph_scaled() {
        let font = Font::parse(&DOT_FONT).unwrap();
        let mut fb = fb();
        fb.draw_char(10, 20, 3, &font, 'A');
        assert_eq!(fb.lit_count(), 9);
        for dx in 0..3 {
            for dy in 0..3 {
                assert!(fb.pixel(10 + dx, 20 + dy));
            }
        }
    }

    #[test]
    fn test_out_of_range_char_is_noop() {
        let font = Font::parse(&DOT_FONT).unwrap();
        let mut fb = fb();
        fb.draw_char(0, 0, 1, &font, 'B');
        fb.draw_char(0, 0, 1, &font, '@');
        fb.draw_char(0, 0, 1, &font, 'é');
        fb.draw_char_default(0, 0, 1, '\u{7f}');
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_tall_glyph_uses_two_row_groups() {
        // 2 wide, 10 tall: column 0 = top pixel, column 1 = pixel at row 9
        let blob = [10, 2, 0, b'x', b'x', 0x01, 0x00, 0x00, 0x02];
        let font = Font::parse(&blob).unwrap();
        assert_eq!(font.rows(), 2);

        let mut fb = fb();
        fb.draw_char(0, 0, 1, &font, 'x');
        assert_eq!(fb.lit_count(), 2);
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(1, 9));
    }

    #[test]
    fn test_builtin_glyph_shape() {
        let mut fb = fb();
        fb.draw_char_default(0, 0, 1, '!');
        // column 2 = 0x5F: rows 0-4 and 6
        assert_eq!(fb.lit_count(), 6);
        assert!(fb.pixel(2, 0) && fb.pixel(2, 4) && fb.pixel(2, 6));
        assert!(!fb.pixel(2, 5));
    }

    #[test]
    fn test_string_advance_and_nul() {
        let font = Font::parse(&DOT_FONT).unwrap();
        assert_eq!(font.advance(2), 2);

        let mut fb = fb();
        fb.draw_string(0, 0, 2, &font, "AAA\0A");
        // three 2x2 blocks, one per 2-pixel cell
        assert_eq!(fb.lit_count(), 12);
        assert!(fb.pixel(0, 0) && fb.pixel(2, 0) && fb.pixel(5, 1));
        assert!(!fb.pixel(6, 0));
    }

    #[test]
    fn test_unsupported_char_still_advances() {
        let font = Font::parse(&[1, 1, 1, b'A', b'A', 0x01]).unwrap();
        let mut fb = fb();
        fb.draw_string(0, 0, 1, &font, "A?A");
        assert!(fb.pixel(0, 0));
        assert!(!fb.pixel(2, 0));
        assert!(fb.pixel(4, 0));
    }

    #[test]
    fn test_text_width() {
        let font = Font::builtin();
        assert_eq!(font.text_width("12:34", 1), 30);
        assert_eq!(font.text_width("12:34", 3), 90);
        assert_eq!(font.text_width("ab\0cd", 1), 12);
    }

    #[test]
    fn test_huge_scale_is_clipped() {
        let mut fb = fb();
        fb.draw_char_default(0, 0, u32::MAX, '!');
        // first lit block of '!' starts at column 2 * scale, off the panel
        assert_eq!(fb.lit_count(), 0);

        let font = Font::parse(&DOT_FONT).unwrap();
        fb.draw_char(0, 0, u32::MAX, &font, 'A');
        assert_eq!(fb.lit_count(), 128 * 64);
    }

    #[test]
    fn test_string_clipped_at_right_edge() {
        let mut fb = fb();
        fb.draw_string_default(120, 0, 1, "HH");
        // only the first 'H' (partially) and nothing wraps
        assert!(fb.pixel(120, 0));
        assert!(!fb.pixel(0, 0));
    }
}
