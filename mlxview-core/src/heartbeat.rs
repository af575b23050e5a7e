//! Auxiliary-channel heartbeat
//!
//! A plain-text line pushed at a fixed period so a terminal on the
//! secondary serial port can see the device is alive. The two values are
//! placeholders.

use core::fmt::Write as _;

use embedded_io::Write;
use heapless::String;

/// Placeholder values carried by each heartbeat line
const HEARTBEAT_VALUES: (f32, f32) = (1.0, -1.0);

/// Periodic heartbeat emitter
#[derive(Debug, Clone)]
pub struct Heartbeat {
    period_ms: u32,
    last_push_ms: u32,
}

impl Heartbeat {
    /// Create a heartbeat with the given period
    ///
    /// The first line goes out once the clock reaches `period_ms`.
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_push_ms: 0,
        }
    }

    /// True if a line is due at `now_ms`
    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_push_ms) >= self.period_ms
    }

    /// Push a line if one is due
    ///
    /// Returns whether a line was written.
    pub fn poll<W: Write>(&mut self, now_ms: u32, out: &mut W) -> Result<bool, W::Error> {
        if !self.is_due(now_ms) {
            return Ok(false);
        }

        let mut line: String<32> = String::new();
        // 20 bytes always fit
        let _ = writeln!(line, "{:.6}, {:.6}", HEARTBEAT_VALUES.0, HEARTBEAT_VALUES.1);
        out.write_all(line.as_bytes())?;

        self.last_push_ms = now_ms;
        Ok(true)
    }
}
