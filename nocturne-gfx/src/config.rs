//! Display configuration
//!
//! Panel geometry and power supply mode. The framebuffer is sized from this
//! and the controller init sequence reads it for the values that depend on
//! the panel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::framebuffer::FrameBufferError;

/// Pixel rows per controller page
pub const PAGE_HEIGHT: u16 = 8;

/// Controller RAM columns
pub const MAX_WIDTH: u16 = 128;

/// Controller RAM rows
pub const MAX_HEIGHT: u16 = 64;

/// Framebuffer storage, sized to mirror the controller RAM
pub const MAX_BUFFER_SIZE: usize =
    MAX_WIDTH as usize * (MAX_HEIGHT / PAGE_HEIGHT) as usize;

/// Common 128x64 panel width
pub const DEFAULT_WIDTH: u16 = 128;

/// Common 128x64 panel height
pub const DEFAULT_HEIGHT: u16 = 64;

/// Where the panel's drive voltage comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VccSource {
    /// Internal charge pump generates VCC
    #[default]
    Internal,
    /// VCC supplied externally, charge pump disabled
    External,
}

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels (multiple of 8)
    pub height: u16,
    /// Supply mode
    pub vcc: VccSource,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl DisplayConfig {
    /// Create a config with the internal charge pump
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            vcc: VccSource::Internal,
        }
    }

    /// Set the supply mode
    pub const fn with_vcc(mut self, vcc: VccSource) -> Self {
        self.vcc = vcc;
        self
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u16 {
        self.height / PAGE_HEIGHT
    }

    /// Framebuffer length in bytes (one byte per column per page)
    pub const fn buffer_len(&self) -> usize {
        self.width as usize * self.pages() as usize
    }

    /// Whether the panel is more than twice as wide as it is tall
    ///
    /// Such panels use sequential COM pin wiring instead of alternative.
    pub const fn is_wide(&self) -> bool {
        self.width as u32 > 2 * self.height as u32
    }

    /// Check the geometry against the controller limits
    pub fn validate(&self) -> Result<(), FrameBufferError> {
        if self.width == 0 || self.height == 0 || self.height % PAGE_HEIGHT != 0 {
            return Err(FrameBufferError::InvalidDimensions);
        }
        if self.width > MAX_WIDTH
            || self.height > MAX_HEIGHT
            || self.buffer_len() > MAX_BUFFER_SIZE
        {
            return Err(FrameBufferError::AllocationFailed);
        }
        Ok(())
    }
}
