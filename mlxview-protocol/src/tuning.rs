//! Host-adjustable temperature band
//!
//! On the wire the tuning payload is three little-endian `f32` values in
//! the order `tmin`, `tamb_min`, `tmax` (12 bytes). The payload is decoded
//! field by field and validated before anything is committed.

use serde::{Deserialize, Serialize};

use crate::messages::CMD_SET_TUNING;
use crate::packet::{Packet, PacketError};

/// Errors rejecting a tuning payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningError {
    /// Payload shorter than [`TuningParameters::WIRE_SIZE`]
    Truncated,
    /// A field is NaN or infinite
    NotFinite,
    /// `tmin` is above `tmax`
    InvertedBand,
}

/// Temperature band used by the threshold mask (°C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningParameters {
    /// Lower bound of the active band (inclusive)
    pub tmin: f32,
    /// Ambient floor; carried for the host, not used by the mask
    pub tamb_min: f32,
    /// Upper bound of the active band (inclusive)
    pub tmax: f32,
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self {
            tmin: 26.0,
            tamb_min: 100.0,
            tmax: 36.0,
        }
    }
}

impl TuningParameters {
    /// Encoded size on the wire
    pub const WIRE_SIZE: usize = 12;

    /// Decode and validate a tuning payload
    ///
    /// Bytes beyond [`Self::WIRE_SIZE`] are ignored.
    pub fn from_payload(payload: &[u8]) -> Result<Self, TuningError> {
        let wire = payload
            .get(..Self::WIRE_SIZE)
            .ok_or(TuningError::Truncated)?;
        let tuning: Self = postcard::from_bytes(wire).map_err(|_| TuningError::Truncated)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the band is usable
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.tmin.is_finite() && self.tamb_min.is_finite() && self.tmax.is_finite()) {
            return Err(TuningError::NotFinite);
        }
        if self.tmin > self.tmax {
            return Err(TuningError::InvertedBand);
        }
        Ok(())
    }

    /// True if `value` lies inside the band, bounds included
    ///
    /// NaN is never inside.
    pub fn contains(&self, value: f32) -> bool {
        self.tmin <= value && value <= self.tmax
    }

    /// Build the host → device packet carrying these parameters
    pub fn to_packet(&self) -> Result<Packet, PacketError> {
        let mut buf = [0u8; Self::WIRE_SIZE];
        let used = postcard::to_slice(self, &mut buf).map_err(|_| PacketError::BufferTooSmall)?;
        Packet::new(CMD_SET_TUNING, used)
    }
}
