//! Monochrome rendering core for page-organized OLED controllers
//!
//! This crate owns everything that happens before bytes reach the wire:
//!
//! - `DisplayConfig` with the panel geometry and supply mode
//! - `FrameBuffer`, a packed 1bpp buffer in controller page order
//! - Line and rectangle rasterization
//! - Bitmap font rendering with integer scaling
//! - Decoding of 1bpp uncompressed BMP images
//!
//! # Memory layout
//!
//! ```text
//!            x=0   x=1   x=2        x=W-1
//! page 0   ┌─────┬─────┬─────┬ ─ ─ ┬─────┐  bit 0 = row 0
//!          │ b0  │ b1  │ b2  │     │     │  ...
//!          │     │     │     │     │     │  bit 7 = row 7
//! page 1   ├─────┼─────┼─────┼ ─ ─ ┼─────┤  bit 0 = row 8
//!          ⋮                               ⋮
//! ```
//!
//! Drawing never fails: coordinates outside the panel are clipped and
//! malformed fonts or images draw nothing. Typed parse errors are still
//! available through `Font::parse` and `MonoBitmap::parse`.

#![no_std]
#![deny(unsafe_code)]

// proptest needs std for its runner and assertion messages
#[cfg(test)]
#[macro_use]
extern crate std;

pub mod bitmap;
pub mod config;
pub mod field;
pub mod font;
pub mod framebuffer;
pub mod raster;

// Re-export key types
pub use bitmap::{ImageError, MonoBitmap};
pub use config::{DisplayConfig, VccSource, MAX_BUFFER_SIZE, MAX_HEIGHT, MAX_WIDTH};
pub use field::{FieldError, FieldReader};
pub use font::{Font, FontError, FONT_5X8};
pub use framebuffer::{FrameBuffer, FrameBufferError};
