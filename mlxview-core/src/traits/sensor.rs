//! Thermal sensor trait

use crate::config::ControlWord;
use crate::frame::{RawFrame, Temperatures};

/// Errors that can occur while talking to the thermal sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration, ...)
    Bus,
    /// A register did not read back the value just written
    WriteVerify,
    /// New data kept arriving while the frame was being read
    FrameData,
    /// No new data became ready in time
    Timeout,
}

/// Trait for frame-based thermal sensors
///
/// Acquisition is split in two so the caller can time the bus transfer
/// and the radiometric conversion separately. Both calls may block.
pub trait ThermalSensor {
    /// Write the sensor control register
    fn write_control(&mut self, word: ControlWord) -> Result<(), SensorError>;

    /// Read the sensor control register
    fn read_control(&mut self) -> Result<ControlWord, SensorError>;

    /// Fetch one raw frame (sensor-native words)
    fn fetch_raw(&mut self, raw: &mut RawFrame) -> Result<(), SensorError>;

    /// Convert a raw frame into per-pixel temperatures (°C)
    fn convert(&mut self, raw: &RawFrame, temperatures: &mut Temperatures);
}
