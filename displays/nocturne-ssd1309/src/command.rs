//! SSD1309 command set
//!
//! Commands are modeled as a closed enum and turned into bytes by
//! [`Command::encode`], so sequences can be built and checked without a
//! transport. Every byte of an encoded command is sent with D/C low.

use heapless::Vec;
use nocturne_gfx::{DisplayConfig, VccSource};

/// SSD1309 opcodes
mod opcode {
    pub const SET_MEM_ADDR: u8 = 0x20;
    pub const SET_COL_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_DISP_START_LINE: u8 = 0x40;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_SEG_REMAP: u8 = 0xA0;
    pub const SET_ENTIRE_ON: u8 = 0xA4;
    pub const SET_NORM_INV: u8 = 0xA6;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISP: u8 = 0xAE;
    pub const SET_COM_OUT_DIR: u8 = 0xC0;
    pub const SET_DISP_OFFSET: u8 = 0xD3;
    pub const SET_DISP_CLK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_COM_PIN_CFG: u8 = 0xDA;
    pub const SET_VCOM_DESEL: u8 = 0xDB;
}

/// Longest encoded command (opcode + two arguments)
pub const MAX_COMMAND_LEN: usize = 3;

/// Number of commands in the power-up sequence
pub const INIT_SEQUENCE_LEN: usize = 16;

/// Column offset used by 64-column panels wired to the middle of the RAM
pub const NARROW_PANEL_COLUMN_OFFSET: u8 = 32;

/// Encoded command bytes
pub type CommandBytes = Vec<u8, MAX_COMMAND_LEN>;

/// GDDRAM addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// Column pointer wraps to the next page at the end of a row
    Horizontal = 0x00,
    /// Page pointer wraps to the next column
    Vertical = 0x01,
    /// Column pointer wraps within the current page
    Page = 0x02,
}

/// A single controller command with its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Panel on (`true`) or sleep (`false`)
    DisplayOn(bool),
    /// Oscillator frequency and clock divide ratio
    ClockDivide(u8),
    /// Active rows minus one
    MultiplexRatio(u8),
    /// Vertical shift of the COM mapping
    DisplayOffset(u8),
    /// RAM row shown on the first line (0-63)
    StartLine(u8),
    /// Enable the internal charge pump
    ChargePump(bool),
    /// Map column 127 to SEG0
    SegmentRemap(bool),
    /// Scan from COM[N-1] down to COM0
    ComScanReversed(bool),
    /// COM pin hardware configuration
    ComPinConfig(u8),
    /// Contrast (0-255)
    Contrast(u8),
    /// Pre-charge period
    Precharge(u8),
    /// VCOMH deselect level
    VcomDeselect(u8),
    /// Light every pixel regardless of RAM (`false` = follow RAM)
    EntireDisplayOn(bool),
    /// Inverted polarity
    Invert(bool),
    /// Memory addressing mode
    AddressingMode(AddressingMode),
    /// Column window for horizontal/vertical addressing
    ColumnAddress { start: u8, end: u8 },
    /// Page window for horizontal/vertical addressing
    PageAddress { start: u8, end: u8 },
}

impl Command {
    /// Encode this command into its wire bytes
    pub fn encode(&self) -> CommandBytes {
        let (bytes, len): ([u8; MAX_COMMAND_LEN], usize) = match *self {
            Command::DisplayOn(on) => ([opcode::SET_DISP | on as u8, 0, 0], 1),
            Command::ClockDivide(v) => ([opcode::SET_DISP_CLK_DIV, v, 0], 2),
            Command::MultiplexRatio(v) => ([opcode::SET_MUX_RATIO, v, 0], 2),
            Command::DisplayOffset(v) => ([opcode::SET_DISP_OFFSET, v, 0], 2),
            Command::StartLine(line) => ([opcode::SET_DISP_START_LINE | (line & 0x3F), 0, 0], 1),
            Command::ChargePump(enable) => {
                let v = if enable { 0x14 } else { 0x10 };
                ([opcode::SET_CHARGE_PUMP, v, 0], 2)
            }
            Command::SegmentRemap(remap) => ([opcode::SET_SEG_REMAP | remap as u8, 0, 0], 1),
            Command::ComScanReversed(rev) => {
                ([opcode::SET_COM_OUT_DIR | (rev as u8) << 3, 0, 0], 1)
            }
            Command::ComPinConfig(v) => ([opcode::SET_COM_PIN_CFG, v, 0], 2),
            Command::Contrast(v) => ([opcode::SET_CONTRAST, v, 0], 2),
            Command::Precharge(v) => ([opcode::SET_PRECHARGE, v, 0], 2),
            Command::VcomDeselect(v) => ([opcode::SET_VCOM_DESEL, v, 0], 2),
            Command::EntireDisplayOn(on) => ([opcode::SET_ENTIRE_ON | on as u8, 0, 0], 1),
            Command::Invert(inv) => ([opcode::SET_NORM_INV | inv as u8, 0, 0], 1),
            Command::AddressingMode(mode) => ([opcode::SET_MEM_ADDR, mode as u8, 0], 2),
            Command::ColumnAddress { start, end } => ([opcode::SET_COL_ADDR, start, end], 3),
            Command::PageAddress { start, end } => ([opcode::SET_PAGE_ADDR, start, end], 3),
        };

        // len never exceeds MAX_COMMAND_LEN
        Vec::from_slice(&bytes[..len]).unwrap_or_default()
    }
}

/// Power-up command sequence for a panel
pub fn init_sequence(config: &DisplayConfig) -> [Command; INIT_SEQUENCE_LEN] {
    let internal_vcc = config.vcc == VccSource::Internal;

    [
        Command::DisplayOn(false),
        // timing and driving scheme
        Command::ClockDivide(0x80),
        Command::MultiplexRatio(config.height.saturating_sub(1) as u8),
        Command::DisplayOffset(0x00),
        // resolution and layout
        Command::StartLine(0),
        Command::ChargePump(internal_vcc),
        Command::SegmentRemap(true),
        Command::ComScanReversed(true),
        Command::ComPinConfig(if config.is_wide() { 0x02 } else { 0x12 }),
        // display
        Command::Contrast(0xFF),
        Command::Precharge(if internal_vcc { 0xF1 } else { 0x22 }),
        Command::VcomDeselect(0x30),
        Command::EntireDisplayOn(false),
        Command::Invert(false),
        Command::DisplayOn(true),
        // address setting
        Command::AddressingMode(AddressingMode::Horizontal),
    ]
}

/// Column and page window covering the whole framebuffer
///
/// 64-column panels sit in the middle of the 128-column RAM, so their
/// column window starts at 32.
pub fn full_window(width: u16, pages: u16) -> [Command; 2] {
    let offset = if width == 64 {
        NARROW_PANEL_COLUMN_OFFSET
    } else {
        0
    };
    let last_column = width.saturating_sub(1) as u8;

    [
        Command::ColumnAddress {
            start: offset,
            end: last_column.saturating_add(offset),
        },
        Command::PageAddress {
            start: 0,
            end: pages.saturating_sub(1) as u8,
        },
    ]
}
