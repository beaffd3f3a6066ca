//! CPU load → backlight color mapping.

use super::color::HsvColor;

/// Hue used when none is configured (orange).
pub const DEFAULT_HUE: u8 = 20;

/// Saturation for a busy/total ratio: `round(sqrt(ratio) * 255)`.
///
/// The square root lifts low loads so a lightly busy machine is visibly
/// different from an idle one. Out-of-range ratios are clamped to `[0, 1]`.
pub fn saturation_for_ratio(ratio: f64) -> u8 {
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    (ratio.sqrt() * 255.0).round() as u8
}

/// Color for a load ratio at the given hue, at full brightness.
pub fn load_to_hsv(hue: u8, ratio: f64) -> HsvColor {
    HsvColor::new(hue, saturation_for_ratio(ratio), 255)
}
