//! Sensor control register 1 (0x800D)
//!
//! Bit layout, LSB first:
//!
//! ```text
//! 15..13  12     11..10  9..7     6..4     3       2     1    0
//! ------  -----  ------  -------  -------  ------  ----  ---  -------
//! unused  chess  resol.  refresh  subpage  repeat  hold  rsv  subpage
//!                                 select                      mode
//! ```
//!
//! Reserved and unused bits are carried through unchanged so a word read
//! from the sensor can be written back as-is.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const SUBPAGE_MODE_BIT: u16 = 0;
const DATA_HOLD_BIT: u16 = 2;
const SUBPAGE_REPEAT_BIT: u16 = 3;
const SUBPAGE_SELECT_SHIFT: u16 = 4;
const SUBPAGE_SELECT_WIDTH: u16 = 3;
const REFRESH_RATE_SHIFT: u16 = 7;
const REFRESH_RATE_WIDTH: u16 = 3;
const RESOLUTION_SHIFT: u16 = 10;
const RESOLUTION_WIDTH: u16 = 2;
const CHESSBOARD_BIT: u16 = 12;

/// Errors from control word field updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlWordError {
    /// Value does not fit in the field's bit width
    FieldOverflow,
}

/// Frame refresh rate (field code 0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RefreshRate {
    Hz0_5,
    Hz1,
    Hz2,
    Hz4,
    Hz8,
    Hz16,
    Hz32,
    Hz64,
}

impl RefreshRate {
    /// Parse from the 3-bit field code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RefreshRate::Hz0_5),
            1 => Some(RefreshRate::Hz1),
            2 => Some(RefreshRate::Hz2),
            3 => Some(RefreshRate::Hz4),
            4 => Some(RefreshRate::Hz8),
            5 => Some(RefreshRate::Hz16),
            6 => Some(RefreshRate::Hz32),
            7 => Some(RefreshRate::Hz64),
            _ => None,
        }
    }

    /// The 3-bit field code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Time between subpage updates in milliseconds
    pub fn subpage_period_ms(self) -> u32 {
        // 0.5 Hz -> 2000 ms, each step halves the period
        2000 >> self.code()
    }
}

/// ADC resolution (field code 0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Resolution {
    Bits16,
    Bits17,
    Bits18,
    Bits19,
}

impl Resolution {
    /// Parse from the 2-bit field code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Resolution::Bits16),
            1 => Some(Resolution::Bits17),
            2 => Some(Resolution::Bits18),
            3 => Some(Resolution::Bits19),
            _ => None,
        }
    }

    /// The 2-bit field code
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Packed sensor configuration word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlWord(u16);

impl Default for ControlWord {
    /// Boot configuration: subpage mode, 16 Hz, 18-bit, interleaved pattern
    fn default() -> Self {
        let mut word = Self::from_bits(0);
        word.set_subpage_mode(true);
        word.set_data_hold(false);
        word.set_subpage_repeat(false);
        word.set_refresh_rate(RefreshRate::Hz16);
        word.set_resolution(Resolution::Bits18);
        word.set_chessboard_pattern(false);
        word
    }
}

impl ControlWord {
    /// Wrap a raw register value
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn subpage_mode(self) -> bool {
        self.bit(SUBPAGE_MODE_BIT)
    }

    pub fn set_subpage_mode(&mut self, enabled: bool) {
        self.set_bit(SUBPAGE_MODE_BIT, enabled);
    }

    pub fn data_hold(self) -> bool {
        self.bit(DATA_HOLD_BIT)
    }

    pub fn set_data_hold(&mut self, enabled: bool) {
        self.set_bit(DATA_HOLD_BIT, enabled);
    }

    pub fn subpage_repeat(self) -> bool {
        self.bit(SUBPAGE_REPEAT_BIT)
    }

    pub fn set_subpage_repeat(&mut self, enabled: bool) {
        self.set_bit(SUBPAGE_REPEAT_BIT, enabled);
    }

    /// Subpage selected when subpage repeat is enabled
    pub fn subpage_select(self) -> u8 {
        self.field(SUBPAGE_SELECT_SHIFT, SUBPAGE_SELECT_WIDTH)
    }

    pub fn set_subpage_select(&mut self, subpage: u8) -> Result<(), ControlWordError> {
        self.set_field(SUBPAGE_SELECT_SHIFT, SUBPAGE_SELECT_WIDTH, subpage)
    }

    pub fn refresh_rate(self) -> RefreshRate {
        // A 3-bit field always maps to a rate
        RefreshRate::from_code(self.field(REFRESH_RATE_SHIFT, REFRESH_RATE_WIDTH))
            .unwrap_or(RefreshRate::Hz0_5)
    }

    pub fn set_refresh_rate(&mut self, rate: RefreshRate) {
        let _ = self.set_field(REFRESH_RATE_SHIFT, REFRESH_RATE_WIDTH, rate.code());
    }

    /// Set the refresh rate from a raw field code
    pub fn set_refresh_rate_code(&mut self, code: u8) -> Result<(), ControlWordError> {
        self.set_field(REFRESH_RATE_SHIFT, REFRESH_RATE_WIDTH, code)
    }

    pub fn resolution(self) -> Resolution {
        Resolution::from_code(self.field(RESOLUTION_SHIFT, RESOLUTION_WIDTH))
            .unwrap_or(Resolution::Bits16)
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        let _ = self.set_field(RESOLUTION_SHIFT, RESOLUTION_WIDTH, resolution.code());
    }

    /// Set the resolution from a raw field code
    pub fn set_resolution_code(&mut self, code: u8) -> Result<(), ControlWordError> {
        self.set_field(RESOLUTION_SHIFT, RESOLUTION_WIDTH, code)
    }

    /// Chess (true) or interleaved (false) reading pattern
    pub fn chessboard_pattern(self) -> bool {
        self.bit(CHESSBOARD_BIT)
    }

    pub fn set_chessboard_pattern(&mut self, enabled: bool) {
        self.set_bit(CHESSBOARD_BIT, enabled);
    }

    fn bit(self, bit: u16) -> bool {
        self.0 & (1 << bit) != 0
    }

    fn set_bit(&mut self, bit: u16, value: bool) {
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    fn field(self, shift: u16, width: u16) -> u8 {
        ((self.0 >> shift) & ((1 << width) - 1)) as u8
    }

    fn set_field(&mut self, shift: u16, width: u16, value: u8) -> Result<(), ControlWordError> {
        let mask: u16 = (1 << width) - 1;
        if value as u16 > mask {
            return Err(ControlWordError::FieldOverflow);
        }
        self.0 = (self.0 & !(mask << shift)) | ((value as u16) << shift);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_word() {
        let word = ControlWord::default();
        // subpage mode | 16 Hz (5 << 7) | 18-bit (2 << 10)
        assert_eq!(word.bits(), 0x0001 | (5 << 7) | (2 << 10));
        assert!(word.subpage_mode());
        assert!(!word.data_hold());
        assert!(!word.subpage_repeat());
        assert_eq!(word.subpage_select(), 0);
        assert_eq!(word.refresh_rate(), RefreshRate::Hz16);
        assert_eq!(word.resolution(), Resolution::Bits18);
        assert!(!word.chessboard_pattern());
    }

    #[test]
    fn test_field_overflow_rejected() {
        let mut word = ControlWord::default();
        assert_eq!(
            word.set_subpage_select(8),
            Err(ControlWordError::FieldOverflow)
        );
        assert_eq!(
            word.set_refresh_rate_code(8),
            Err(ControlWordError::FieldOverflow)
        );
        assert_eq!(
            word.set_resolution_code(4),
            Err(ControlWordError::FieldOverflow)
        );
        // Rejected writes leave the word untouched
        assert_eq!(word, ControlWord::default());
    }

    #[test]
    fn test_fields_do_not_overlap() {
        let mut word = ControlWord::from_bits(0);
        word.set_subpage_select(7).unwrap();
        assert_eq!(word.bits(), 0x0070);
        word.set_refresh_rate(RefreshRate::Hz64);
        assert_eq!(word.bits(), 0x0070 | 0x0380);
        word.set_resolution(Resolution::Bits19);
        assert_eq!(word.bits(), 0x0070 | 0x0380 | 0x0C00);
        word.set_chessboard_pattern(true);
        word.set_data_hold(true);
        word.set_subpage_repeat(true);
        assert_eq!(word.bits(), 0x1FFC);
        assert!(!word.subpage_mode());
    }

    #[test]
    fn test_reserved_bits_preserved() {
        let mut word = ControlWord::from_bits(0xE002);
        word.set_refresh_rate(RefreshRate::Hz2);
        word.set_subpage_mode(true);
        assert_eq!(word.bits() & 0xE002, 0xE002);
    }

    #[test]
    fn test_refresh_rate_codes() {
        for code in 0..8 {
            assert_eq!(RefreshRate::from_code(code).unwrap().code(), code);
        }
        assert_eq!(RefreshRate::from_code(8), None);
        assert_eq!(RefreshRate::Hz0_5.subpage_period_ms(), 2000);
        assert_eq!(RefreshRate::Hz16.subpage_period_ms(), 62);
    }
}
