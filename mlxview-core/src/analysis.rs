//! Frame analysis pipeline
//!
//! Two stages run once per frame:
//!
//! 1. Threshold: every pixel becomes `1.0` inside the tuning band and
//!    `0.0` outside it. The frame buffer is overwritten in place.
//! 2. Centroid: first moments of the mask divided by the total pixel
//!    count (768), not by the mask weight. The host depends on this
//!    normalization, so a single lit pixel at (r, c) reports
//!    `(c / 768, r / 768)` and an empty mask reports `(0, 0)`.
//!
//! Blob detection would slot in between the two stages; it is not
//! implemented.

use mlxview_protocol::{AnalysisResult, TuningParameters, FRAME_PIXELS, FRAME_WIDTH};

use crate::frame::{Frame, Temperatures};

/// Replace each pixel with 1.0 inside the band and 0.0 outside
pub fn apply_threshold(pixels: &mut Temperatures, tuning: &TuningParameters) {
    for px in pixels.iter_mut() {
        *px = if tuning.contains(*px) { 1.0 } else { 0.0 };
    }
}

/// Pixel-count-normalized first moments of a mask
pub fn centroid(mask: &Temperatures) -> AnalysisResult {
    let mut cx = 0.0f32;
    let mut cy = 0.0f32;

    for (row, line) in mask.chunks_exact(FRAME_WIDTH).enumerate() {
        for (col, &px) in line.iter().enumerate() {
            cx += px * col as f32;
            cy += px * row as f32;
        }
    }

    AnalysisResult {
        cx: cx / FRAME_PIXELS as f32,
        cy: cy / FRAME_PIXELS as f32,
    }
}

/// Run the full pipeline on a frame
///
/// The frame's temperatures are left holding the mask.
pub fn analyze(frame: &mut Frame, tuning: &TuningParameters) -> AnalysisResult {
    apply_threshold(&mut frame.temperatures, tuning);
    centroid(&frame.temperatures)
}
