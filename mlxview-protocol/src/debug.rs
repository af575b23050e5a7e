//! Bounded human-readable debug text
//!
//! Debug packets carry printable text only; the host shows them in a log
//! view and never parses them. Text longer than [`MAX_DEBUG_LEN`] bytes is
//! cut at the last whole character that fits.

use core::fmt;

use embedded_io::Write;
use heapless::String;

use crate::messages::DeviceMessage;

/// Maximum debug payload length in bytes
pub const MAX_DEBUG_LEN: usize = 255;

/// Fixed-capacity debug message that truncates instead of failing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugText {
    text: String<MAX_DEBUG_LEN>,
    truncated: bool,
}

impl DebugText {
    /// Create an empty message
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            truncated: false,
        }
    }

    /// Render format arguments into a new message
    ///
    /// Usually called through `format_args!`:
    /// `DebugText::format(format_args!("Tuning TMIN {}", tmin))`.
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut msg = Self::new();
        // write_str below never fails
        let _ = fmt::write(&mut msg, args);
        msg
    }

    /// The message text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

impl fmt::Write for DebugText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        for ch in s.chars() {
            if self.text.push(ch).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}

impl From<&str> for DebugText {
    fn from(s: &str) -> Self {
        let mut msg = Self::new();
        let _ = fmt::Write::write_str(&mut msg, s);
        msg
    }
}

/// Format and send a debug packet
pub fn write_debug<W: Write>(w: &mut W, args: fmt::Arguments<'_>) -> Result<(), W::Error> {
    let msg = DebugText::format(args);
    DeviceMessage::Debug(msg.as_str()).write_to(w)
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a character
pub fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
