//! Millisecond time source

/// Monotonic millisecond clock
///
/// The counter is allowed to wrap; consumers only ever compare
/// differences computed with wrapping arithmetic.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (usually boot)
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `since`
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}
