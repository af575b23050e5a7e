//! Configuration types
//!
//! Compile-time defaults for the sensor control word and the control loop.
//! Nothing here is persisted; everything is re-applied at boot.

pub mod control_word;

pub use control_word::{ControlWord, ControlWordError, RefreshRate, Resolution};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default heartbeat period on the auxiliary channel
pub const HEARTBEAT_PERIOD_MS: u32 = 1000;

/// Control loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopConfig {
    /// Minimum time between heartbeat lines (ms)
    pub heartbeat_period_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            heartbeat_period_ms: HEARTBEAT_PERIOD_MS,
        }
    }
}
