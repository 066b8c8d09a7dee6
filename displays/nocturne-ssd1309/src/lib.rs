//! SSD1309 OLED driver for the Nocturne renderer
//!
//! Three layers, each usable on its own:
//!
//! - [`command`]: the controller command set as a typed enum with byte
//!   encoding and the power-up sequence
//! - [`interface`]: the command/data transport trait and a 4-wire SPI
//!   implementation over `embedded-hal`
//! - [`device`]: the [`Ssd1309`] engine that owns a transport and a
//!   [`FrameBuffer`](nocturne_gfx::FrameBuffer)
//!
//! ```ignore
//! let interface = SpiInterface::new(spi, dc, cs, rst, delay)?;
//! let mut display = Ssd1309::new(interface, DisplayConfig::new(128, 64));
//! display.init()?;
//!
//! if let Some(fb) = display.framebuffer_mut() {
//!     fb.draw_string_default(0, 0, 2, "07:30");
//! }
//! display.show()?;
//! ```
//!
//! The same command set drives SSD1306 panels.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod device;
pub mod interface;

pub use command::{AddressingMode, Command};
pub use device::{Error, Ssd1309, State};
pub use interface::{DisplayInterface, InterfaceError, SpiInterface};
