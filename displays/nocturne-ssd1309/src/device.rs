//! SSD1309 device engine
//!
//! Owns the transport and the framebuffer. The engine starts
//! uninitialized; `init` resets the panel, allocates a zeroed buffer and
//! sends the power-up sequence. After that the application draws into
//! `framebuffer_mut()` and pushes the result with `show`.

use nocturne_gfx::{DisplayConfig, FrameBuffer, FrameBufferError};

use crate::command::{full_window, init_sequence, Command};
use crate::interface::DisplayInterface;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No framebuffer, panel state unknown
    Uninitialized,
    /// Panel configured and framebuffer allocated
    Ready,
}

/// Device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Transport failure
    Interface(E),
    /// Framebuffer could not be allocated for the configured geometry
    FrameBuffer(FrameBufferError),
    /// Operation requires a successful `init` first
    NotInitialized,
}

/// SSD1309 OLED driver
pub struct Ssd1309<DI> {
    interface: DI,
    config: DisplayConfig,
    framebuffer: Option<FrameBuffer>,
    state: State,
}

impl<DI> Ssd1309<DI>
where
    DI: DisplayInterface,
{
    /// Create an uninitialized driver
    pub fn new(interface: DI, config: DisplayConfig) -> Self {
        Self {
            interface,
            config,
            framebuffer: None,
            state: State::Uninitialized,
        }
    }

    /// Reset and configure the panel
    ///
    /// Calling this again repeats the whole sequence and replaces the
    /// framebuffer with a fresh zeroed one. On failure the engine is left
    /// uninitialized.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        self.release();

        self.interface.reset().map_err(Error::Interface)?;

        let framebuffer = FrameBuffer::new(&self.config).map_err(Error::FrameBuffer)?;

        for command in init_sequence(&self.config) {
            self.send(command)?;
        }

        self.framebuffer = Some(framebuffer);
        self.state = State::Ready;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SSD1309 ready: {}x{} ({=usize} bytes)",
            self.config.width,
            self.config.height,
            self.config.buffer_len()
        );

        Ok(())
    }

    /// Drop the framebuffer and return to the uninitialized state
    ///
    /// The panel itself is left as is; call `power_off` first to blank it.
    pub fn release(&mut self) {
        if self.state == State::Ready {
            #[cfg(feature = "defmt")]
            defmt::debug!("SSD1309 released");
        }
        self.framebuffer = None;
        self.state = State::Uninitialized;
    }

    /// Consume the driver and give back the transport
    pub fn release_interface(self) -> DI {
        self.interface
    }

    /// Turn the panel on
    pub fn power_on(&mut self) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        self.send(Command::DisplayOn(true))
    }

    /// Put the panel to sleep (RAM is kept)
    pub fn power_off(&mut self) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        self.send(Command::DisplayOn(false))
    }

    /// Set contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        self.send(Command::Contrast(contrast))
    }

    /// Set inverted polarity
    pub fn set_invert(&mut self, invert: bool) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        self.send(Command::Invert(invert))
    }

    /// Push the framebuffer to the panel
    ///
    /// Sets the column and page window to the full panel, then writes the
    /// whole buffer in one data transfer.
    pub fn show(&mut self) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;

        for command in full_window(self.config.width, self.config.pages()) {
            self.send(command)?;
        }

        let framebuffer = self.framebuffer.as_ref().ok_or(Error::NotInitialized)?;
        self.interface
            .write_data(framebuffer.as_bytes())
            .map_err(Error::Interface)
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Check if `init` has completed
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// Panel configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Framebuffer, once initialized
    pub fn framebuffer(&self) -> Option<&FrameBuffer> {
        self.framebuffer.as_ref()
    }

    /// Mutable framebuffer for drawing, once initialized
    pub fn framebuffer_mut(&mut self) -> Option<&mut FrameBuffer> {
        self.framebuffer.as_mut()
    }

    fn ensure_ready(&self) -> Result<(), Error<DI::Error>> {
        match self.state {
            State::Ready => Ok(()),
            State::Uninitialized => Err(Error::NotInitialized),
        }
    }

    /// Send a command, one byte per command write
    fn send(&mut self, command: Command) -> Result<(), Error<DI::Error>> {
        for &byte in command.encode().iter() {
            self.interface
                .write_command(byte)
                .map_err(Error::Interface)?;
        }
        Ok(())
    }
}
