//! Display transport
//!
//! The controller only needs two primitives plus a reset pulse:
//! a command byte (D/C low) and a burst of data bytes (D/C high).
//! [`SpiInterface`] provides them over a 4-wire SPI bus with software
//! chip select.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

/// Reset line held high before the pulse (ms)
pub const RESET_SETUP_MS: u32 = 1;

/// Reset line held low (ms)
pub const RESET_PULSE_MS: u32 = 10;

/// Time after releasing reset before the first command (ms)
pub const RESET_RECOVERY_MS: u32 = 10;

/// Command/data transport to the controller
///
/// Calls block until the bytes are on the wire.
pub trait DisplayInterface {
    /// Error type for transport operations
    type Error;

    /// Pulse the hardware reset line
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Send one command byte
    fn write_command(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Send a burst of display data
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// SPI interface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError {
    /// SPI transfer failed
    Spi(spi::ErrorKind),
    /// A control pin could not be driven
    Pin(digital::ErrorKind),
}

fn spi_error<E: spi::Error>(e: E) -> InterfaceError {
    InterfaceError::Spi(e.kind())
}

fn pin_error<E: digital::Error>(e: E) -> InterfaceError {
    InterfaceError::Pin(e.kind())
}

/// 4-wire SPI transport
///
/// - `dc`: data/command select, low = command
/// - `cs`: chip select, active low
/// - `rst`: reset, active low
pub struct SpiInterface<SPI, DC, CS, RST, D> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    delay: D,
}

impl<SPI, DC, CS, RST, D> SpiInterface<SPI, DC, CS, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a new SPI interface
    ///
    /// The pins are driven to their idle levels: CS deselected, D/C in
    /// command mode, reset released.
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, delay: D) -> Result<Self, InterfaceError> {
        let mut interface = Self {
            spi,
            dc,
            cs,
            rst,
            delay,
        };
        interface.cs.set_high().map_err(pin_error)?;
        interface.dc.set_low().map_err(pin_error)?;
        interface.rst.set_high().map_err(pin_error)?;
        Ok(interface)
    }

    /// Give back the bus, pins and delay
    pub fn release(self) -> (SPI, DC, CS, RST, D) {
        (self.spi, self.dc, self.cs, self.rst, self.delay)
    }

    /// Select the chip, write, and deselect again even if the write failed
    fn transfer(&mut self, bytes: &[u8]) -> Result<(), InterfaceError> {
        self.cs.set_low().map_err(pin_error)?;
        let result = self
            .spi
            .write(bytes)
            .and_then(|_| self.spi.flush())
            .map_err(spi_error);
        self.cs.set_high().map_err(pin_error)?;
        result
    }
}

impl<SPI, DC, CS, RST, D> DisplayInterface for SpiInterface<SPI, DC, CS, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Error = InterfaceError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.rst.set_high().map_err(pin_error)?;
        self.delay.delay_ms(RESET_SETUP_MS);
        self.rst.set_low().map_err(pin_error)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(pin_error)?;
        self.delay.delay_ms(RESET_RECOVERY_MS);
        Ok(())
    }

    fn write_command(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(pin_error)?;
        self.transfer(&[byte])
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(pin_error)?;
        self.transfer(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Signal {
        Dc(bool),
        Cs(bool),
        Rst(bool),
        Write(usize),
        Flush,
        DelayMs(u32),
    }

    type Log = RefCell<Vec<Signal, 64>>;

    struct MockSpi<'a> {
        log: &'a Log,
        fail: bool,
    }

    #[derive(Debug)]
    struct BusFault;

    impl spi::Error for BusFault {
        fn kind(&self) -> spi::ErrorKind {
            spi::ErrorKind::Overrun
        }
    }

    impl spi::ErrorType for MockSpi<'_> {
        type Error = BusFault;
    }

    impl SpiBus for MockSpi<'_> {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(BusFault);
            }
            self.log.borrow_mut().push(Signal::Write(words.len())).unwrap();
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Signal::Flush).unwrap();
            Ok(())
        }
    }

    struct MockPin<'a> {
        log: &'a Log,
        signal: fn(bool) -> Signal,
    }

    impl digital::ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.signal)(false)).unwrap();
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.signal)(true)).unwrap();
            Ok(())
        }
    }

    struct MockDelay<'a> {
        log: &'a Log,
    }

    impl DelayNs for MockDelay<'_> {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Signal::DelayMs(ms)).unwrap();
        }
    }

    type MockInterface<'a> =
        SpiInterface<MockSpi<'a>, MockPin<'a>, MockPin<'a>, MockPin<'a>, MockDelay<'a>>;

    fn build(log: &Log, fail: bool) -> MockInterface<'_> {
        let spi = MockSpi { log, fail };
        let dc = MockPin {
            log,
            signal: Signal::Dc,
        };
        let cs = MockPin {
            log,
            signal: Signal::Cs,
        };
        let rst = MockPin {
            log,
            signal: Signal::Rst,
        };
        SpiInterface::new(spi, dc, cs, rst, MockDelay { log }).unwrap()
    }

    fn interface(log: &Log, fail: bool) -> MockInterface<'_> {
        let interface = build(log, fail);
        log.borrow_mut().clear();
        interface
    }

    #[test]
    fn test_new_drives_idle_levels() {
        let log = Log::default();
        let _interface = build(&log, false);

        assert_eq!(
            &log.borrow()[..],
            &[Signal::Cs(true), Signal::Dc(false), Signal::Rst(true)]
        );
    }

    #[test]
    fn test_command_gating() {
        let log = Log::default();
        let mut interface = interface(&log, false);
        interface.write_command(0xAF).unwrap();

        assert_eq!(
            &log.borrow()[..],
            &[
                Signal::Dc(false),
                Signal::Cs(false),
                Signal::Write(1),
                Signal::Flush,
                Signal::Cs(true),
            ]
        );
    }

    #[test]
    fn test_data_gating() {
        let log = Log::default();
        let mut interface = interface(&log, false);
        interface.write_data(&[0u8; 1024]).unwrap();

        assert_eq!(
            &log.borrow()[..],
            &[
                Signal::Dc(true),
                Signal::Cs(false),
                Signal::Write(1024),
                Signal::Flush,
                Signal::Cs(true),
            ]
        );
    }

    #[test]
    fn test_reset_pulse() {
        let log = Log::default();
        let mut interface = interface(&log, false);
        interface.reset().unwrap();

        assert_eq!(
            &log.borrow()[..],
            &[
                Signal::Rst(true),
                Signal::DelayMs(1),
                Signal::Rst(false),
                Signal::DelayMs(10),
                Signal::Rst(true),
                Signal::DelayMs(10),
            ]
        );
    }

    #[test]
    fn test_failed_write_still_deselects() {
        let log = Log::default();
        let mut interface = interface(&log, true);
        let result = interface.write_command(0xAE);

        assert_eq!(result, Err(InterfaceError::Spi(spi::ErrorKind::Overrun)));
        assert_eq!(log.borrow().last(), Some(&Signal::Cs(true)));
    }
}
