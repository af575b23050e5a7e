//! Frame buffer
//!
//! Holds the most recent sensor frame: the raw words read over I2C and the
//! per-pixel temperatures derived from them. Both are overwritten in full
//! every cycle; there is no history.

use mlxview_protocol::{FRAME_HEIGHT, FRAME_PIXELS, FRAME_WIDTH};

/// Pixel RAM words per raw frame
pub const RAM_WORDS: usize = 832;

/// Raw frame length: RAM words, control register, subpage number
pub const RAW_WORDS: usize = RAM_WORDS + 2;

/// Index of the control register copy in a raw frame
pub const RAW_CONTROL_INDEX: usize = RAM_WORDS;

/// Index of the subpage number in a raw frame
pub const RAW_SUBPAGE_INDEX: usize = RAM_WORDS + 1;

/// Sensor-native frame words
pub type RawFrame = [u16; RAW_WORDS];

/// Row-major temperatures (°C), or the threshold mask after analysis
pub type Temperatures = [f32; FRAME_PIXELS];

/// Latest frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Per-pixel values, row-major
    pub temperatures: Temperatures,
    /// Raw words as read from the sensor
    pub raw: RawFrame,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create a zeroed frame
    pub const fn new() -> Self {
        Self {
            temperatures: [0.0; FRAME_PIXELS],
            raw: [0; RAW_WORDS],
        }
    }

    /// Value at (row, col)
    ///
    /// Returns `None` outside the 32×24 grid.
    pub fn pixel(&self, row: usize, col: usize) -> Option<f32> {
        if row >= FRAME_HEIGHT || col >= FRAME_WIDTH {
            return None;
        }
        Some(self.temperatures[row * FRAME_WIDTH + col])
    }
}
