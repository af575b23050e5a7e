//! Message types for the viewer protocol
//!
//! Command identifiers are scoped by direction:
//! - Device → Host: frame, debug text, timings, analysis
//! - Host → Device: tuning
//!
//! All multi-byte payload fields are little-endian.

use embedded_io::Write;
use serde::{Deserialize, Serialize};

use crate::debug::{truncate_str, MAX_DEBUG_LEN};
use crate::packet::{write_header, Packet};
use crate::tuning::{TuningError, TuningParameters};

// Command IDs: Device → Host
pub const CMD_FRAME: u8 = 0x00;
pub const CMD_DEBUG: u8 = 0x01;
/// Reserved for a control-word echo; never sent
pub const CMD_CONFIG_ECHO: u8 = 0x02;
pub const CMD_TIMINGS: u8 = 0x03;
pub const CMD_ANALYSIS: u8 = 0x04;

// Command IDs: Host → Device
pub const CMD_SET_TUNING: u8 = 0x01;

/// Sensor dimensions
pub const FRAME_WIDTH: usize = 32;
pub const FRAME_HEIGHT: usize = 24;
pub const FRAME_PIXELS: usize = FRAME_WIDTH * FRAME_HEIGHT;

/// Per-cycle durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingMetrics {
    /// Raw frame fetch from the sensor
    pub frame_fetch_ms: i32,
    /// Frame packet transmission
    pub frame_tx_ms: i32,
    /// Radiometric conversion
    pub calc_ms: i32,
}

impl TimingMetrics {
    pub const WIRE_SIZE: usize = 12;

    pub fn to_le_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        let mut buf = [0u8; Self::WIRE_SIZE];
        buf[0..4].copy_from_slice(&self.frame_fetch_ms.to_le_bytes());
        buf[4..8].copy_from_slice(&self.frame_tx_ms.to_le_bytes());
        buf[8..12].copy_from_slice(&self.calc_ms.to_le_bytes());
        buf
    }
}

/// Scaled first-moment position of the thresholded frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalysisResult {
    /// Column moment
    pub cx: f32,
    /// Row moment
    pub cy: f32,
}

impl AnalysisResult {
    pub const WIRE_SIZE: usize = 8;

    pub fn to_le_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        let mut buf = [0u8; Self::WIRE_SIZE];
        buf[0..4].copy_from_slice(&self.cx.to_le_bytes());
        buf[4..8].copy_from_slice(&self.cy.to_le_bytes());
        buf
    }
}

/// Messages from the device to the host
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceMessage<'a> {
    /// Full frame, row-major (after thresholding)
    Frame(&'a [f32; FRAME_PIXELS]),
    /// Printable status text, cut to 255 bytes
    Debug(&'a str),
    /// Durations of the current cycle
    Timings(TimingMetrics),
    /// Centroid of the current cycle
    Analysis(AnalysisResult),
}

impl DeviceMessage<'_> {
    /// Command identifier for this message
    pub fn cmd(&self) -> u8 {
        match self {
            DeviceMessage::Frame(_) => CMD_FRAME,
            DeviceMessage::Debug(_) => CMD_DEBUG,
            DeviceMessage::Timings(_) => CMD_TIMINGS,
            DeviceMessage::Analysis(_) => CMD_ANALYSIS,
        }
    }

    /// Payload length in bytes
    pub fn payload_len(&self) -> u16 {
        match self {
            DeviceMessage::Frame(pixels) => (pixels.len() * 4) as u16,
            DeviceMessage::Debug(text) => truncate_str(text, MAX_DEBUG_LEN).len() as u16,
            DeviceMessage::Timings(_) => TimingMetrics::WIRE_SIZE as u16,
            DeviceMessage::Analysis(_) => AnalysisResult::WIRE_SIZE as u16,
        }
    }

    /// Stream this message as one packet
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), W::Error> {
        write_header(w, self.cmd(), self.payload_len())?;
        match self {
            DeviceMessage::Frame(pixels) => {
                for px in pixels.iter() {
                    w.write_all(&px.to_le_bytes())?;
                }
                Ok(())
            }
            DeviceMessage::Debug(text) => {
                w.write_all(truncate_str(text, MAX_DEBUG_LEN).as_bytes())
            }
            DeviceMessage::Timings(timings) => w.write_all(&timings.to_le_bytes()),
            DeviceMessage::Analysis(analysis) => w.write_all(&analysis.to_le_bytes()),
        }
    }
}

/// Commands parsed from host-originated packets
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Replace the active temperature band
    SetTuning(TuningParameters),
    /// Identifier this device does not handle
    Unknown(u8),
}

impl HostCommand {
    /// Parse a command from a packet
    ///
    /// Unknown identifiers are not an error; only a known command with a
    /// bad payload is.
    pub fn from_packet(packet: &Packet) -> Result<Self, TuningError> {
        match packet.cmd {
            CMD_SET_TUNING => Ok(HostCommand::SetTuning(TuningParameters::from_payload(
                &packet.payload,
            )?)),
            other => Ok(HostCommand::Unknown(other)),
        }
    }
}
