//! Internal render resolution math.

use crate::types::{QualityPreset, Resolution};

/// Bounds of the reported upscale ratio.
pub const MIN_UPSCALE_RATIO: f32 = 0.1;
pub const MAX_UPSCALE_RATIO: f32 = 1.0;

impl QualityPreset {
    /// Fraction of the output resolution rendered internally, per axis.
    pub fn scale(&self) -> f32 {
        match self {
            QualityPreset::Quality => 1.0 / 1.5,
            QualityPreset::Balanced => 1.0 / 1.7,
            QualityPreset::Performance => 1.0 / 2.0,
            QualityPreset::UltraPerformance => 1.0 / 3.0,
        }
    }
}

/// Round down to an even value, never below 2.
pub fn align_even(value: u32) -> u32 {
    (value - value % 2).max(2)
}

/// Clamp into `[floor, ceiling]`. The ceiling wins when the bounds cross.
///
/// An odd floor is raised to the next even value so the result stays even
/// whenever the ceiling is even.
fn clamp_axis(value: u32, floor: u32, ceiling: u32) -> u32 {
    let floor = floor.saturating_add(floor % 2);
    value.max(floor).min(ceiling)
}

fn scale_axis(output: u32, scale: f32) -> u32 {
    align_even((output as f32 * scale).round() as u32)
}

/// Internal resolution for `preset`, kept within `[render, output]` on each axis.
pub fn internal_resolution(
    output: Resolution,
    render: Resolution,
    preset: QualityPreset,
) -> Resolution {
    let scale = preset.scale();
    Resolution {
        width: clamp_axis(scale_axis(output.width, scale), render.width, output.width),
        height: clamp_axis(scale_axis(output.height, scale), render.height, output.height),
    }
}

/// Internal width over output width, clamped to [0.1, 1.0].
pub fn upscale_ratio(internal: Resolution, output: Resolution) -> f32 {
    let ratio = internal.width as f32 / output.width.max(1) as f32;
    ratio.clamp(MIN_UPSCALE_RATIO, MAX_UPSCALE_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OUTPUT: Resolution = Resolution::new(1920, 1080);

    #[test]
    fn test_align_even() {
        assert_eq!(align_even(961), 960);
        assert_eq!(align_even(540), 540);
        assert_eq!(align_even(1), 2);
        assert_eq!(align_even(0), 2);
    }

    #[test]
    fn test_performance_halves_output() {
        let render = Resolution::new(640, 360);
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::Performance),
            Resolution::new(960, 540)
        );
    }

    #[test]
    fn test_quality_and_ultra_performance() {
        let render = Resolution::new(320, 180);
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::Quality),
            Resolution::new(1280, 720)
        );
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::UltraPerformance),
            Resolution::new(640, 360)
        );
    }

    #[test]
    fn test_render_floor_wins_over_preset() {
        let render = Resolution::new(1280, 720);
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::UltraPerformance),
            Resolution::new(1280, 720)
        );
    }

    #[test]
    fn test_odd_render_floor_rounds_up_to_even() {
        let render = Resolution::new(1279, 719);
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::UltraPerformance),
            Resolution::new(1280, 720)
        );
        // Floor rounded up past the output: the output wins.
        let render = Resolution::new(1919, 1079);
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::Quality),
            OUTPUT
        );
    }

    #[test]
    fn test_crossed_bounds_do_not_panic() {
        let render = Resolution::new(4000, 3000);
        assert_eq!(
            internal_resolution(OUTPUT, render, QualityPreset::Balanced),
            OUTPUT
        );
    }

    #[test]
    fn test_upscale_ratio_bounds() {
        assert_eq!(upscale_ratio(Resolution::new(960, 540), OUTPUT), 0.5);
        assert_eq!(upscale_ratio(OUTPUT, OUTPUT), 1.0);
        assert_eq!(upscale_ratio(Resolution::new(2, 2), OUTPUT), MIN_UPSCALE_RATIO);
        assert_eq!(upscale_ratio(Resolution::new(4, 4), Resolution::new(0, 0)), 1.0);
    }

    fn preset_strategy() -> impl Strategy<Value = QualityPreset> {
        prop_oneof![
            Just(QualityPreset::Quality),
            Just(QualityPreset::Balanced),
            Just(QualityPreset::Performance),
            Just(QualityPreset::UltraPerformance),
        ]
    }

    proptest! {
        #[test]
        fn prop_internal_resolution_within_bounds_and_even(
            out_w in 2u32..4000,
            out_h in 2u32..3000,
            render_w in 1u32..8000,
            render_h in 1u32..6000,
            preset in preset_strategy(),
        ) {
            let output = Resolution::new(out_w * 2, out_h * 2);
            let render = Resolution::new(render_w.min(output.width), render_h.min(output.height));

            let internal = internal_resolution(output, render, preset);

            prop_assert!(render.width <= internal.width && internal.width <= output.width);
            prop_assert!(render.height <= internal.height && internal.height <= output.height);
            prop_assert_eq!(internal.width % 2, 0);
            prop_assert_eq!(internal.height % 2, 0);

            let ratio = upscale_ratio(internal, output);
            prop_assert!((MIN_UPSCALE_RATIO..=MAX_UPSCALE_RATIO).contains(&ratio));
        }
    }
}
