//! Long-lived viewer state
//!
//! Everything that survives from one loop iteration to the next lives
//! here and is owned by the control loop.

use mlxview_protocol::{AnalysisResult, PacketParser, TimingMetrics, TuningParameters};

use crate::config::ControlWord;

/// Process-lifetime state of the viewer
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Active temperature band
    pub tuning: TuningParameters,
    /// Sensor configuration, as last read back from the sensor
    pub control: ControlWord,
    /// Centroid of the most recent analysed frame
    pub analysis: AnalysisResult,
    /// Durations measured in the most recent cycle
    pub timing: TimingMetrics,
    /// Inbound packet state, kept across partial reads
    pub(crate) parser: PacketParser,
}

impl Session {
    /// Session with boot defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// True if an inbound packet is partially received
    pub fn rx_in_progress(&self) -> bool {
        !self.parser.is_idle()
    }
}
