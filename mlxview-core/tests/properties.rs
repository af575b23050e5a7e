use mlxview_core::analysis::{apply_threshold, centroid};
use mlxview_protocol::{TuningParameters, FRAME_HEIGHT, FRAME_PIXELS, FRAME_WIDTH};
use proptest::prelude::*;

fn pixels() -> impl Strategy<Value = [f32; FRAME_PIXELS]> {
    prop::collection::vec(-40.0f32..300.0, FRAME_PIXELS).prop_map(|v| {
        let mut out = [0.0f32; FRAME_PIXELS];
        out.copy_from_slice(&v);
        out
    })
}

fn band() -> impl Strategy<Value = TuningParameters> {
    (-40.0f32..300.0, 0.0f32..100.0, -40.0f32..300.0).prop_map(|(a, tamb_min, b)| {
        TuningParameters {
            tmin: a.min(b),
            tamb_min,
            tmax: a.max(b),
        }
    })
}

proptest! {
    #[test]
    fn threshold_output_is_binary(mut px in pixels(), tuning in band()) {
        apply_threshold(&mut px, &tuning);
        prop_assert!(px.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn threshold_matches_band(px in pixels(), tuning in band()) {
        let mut mask = px;
        apply_threshold(&mut mask, &tuning);
        for (v, m) in px.iter().zip(mask.iter()) {
            let inside = tuning.tmin <= *v && *v <= tuning.tmax;
            prop_assert_eq!(*m == 1.0, inside);
        }
    }

    #[test]
    fn threshold_is_idempotent_when_band_keeps_ones(mut px in pixels(), tmax in 1.0f32..300.0) {
        // Band containing 1.0 but not 0.0
        let tuning = TuningParameters { tmin: 0.5, tamb_min: 0.0, tmax };
        apply_threshold(&mut px, &tuning);
        let once = px;
        apply_threshold(&mut px, &tuning);
        prop_assert_eq!(px, once);
    }

    #[test]
    fn single_pixel_centroid_scales_by_pixel_count(row in 0..FRAME_HEIGHT, col in 0..FRAME_WIDTH) {
        let mut mask = [0.0f32; FRAME_PIXELS];
        mask[row * FRAME_WIDTH + col] = 1.0;
        let result = centroid(&mask);
        prop_assert_eq!(result.cx, col as f32 / FRAME_PIXELS as f32);
        prop_assert_eq!(result.cy, row as f32 / FRAME_PIXELS as f32);
    }

    #[test]
    fn centroid_stays_in_unit_box(mut px in pixels(), tuning in band()) {
        apply_threshold(&mut px, &tuning);
        let result = centroid(&px);
        // Sum of col over all pixels / 768 is the upper bound
        prop_assert!(result.cx >= 0.0 && result.cx <= (FRAME_WIDTH - 1) as f32 / 2.0 + 1e-3);
        prop_assert!(result.cy >= 0.0 && result.cy <= (FRAME_HEIGHT - 1) as f32 / 2.0 + 1e-3);
    }
}

#[test]
fn empty_mask_centroid_is_origin() {
    let result = centroid(&[0.0; FRAME_PIXELS]);
    assert_eq!((result.cx, result.cy), (0.0, 0.0));
}
