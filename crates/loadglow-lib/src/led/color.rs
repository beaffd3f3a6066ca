//! Color types and HSV → RGB conversion for the keyboard backlight.
//!
//! All channels are 8-bit. The conversion is the integer hextant
//! decomposition commonly used on LED controllers: hue is split into six
//! sectors of 43 units and the `×/255` scalings are approximated by `>> 8`.

use std::fmt;

/// Color in hue/saturation/value form, each channel `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HsvColor {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl HsvColor {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Color in red/green/blue form, as written to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_color(*self))
    }
}

/// Hue units per sector.
const SECTOR: u16 = 43;

/// Convert an HSV color to RGB.
///
/// Total over all inputs. Zero saturation yields gray `(v, v, v)`.
pub fn hsv_to_rgb(hsv: HsvColor) -> RgbColor {
    let v = hsv.v;
    if hsv.s == 0 {
        return RgbColor::new(v, v, v);
    }

    let (h, s, v16) = (u16::from(hsv.h), u16::from(hsv.s), u16::from(v));
    let region = h / SECTOR;
    // At most 42 * 6 = 252.
    let remainder = (h - region * SECTOR) * 6;

    let p = ((v16 * (255 - s)) >> 8) as u8;
    let q = ((v16 * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v16 * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;

    match region {
        0 => RgbColor::new(v, t, p),
        1 => RgbColor::new(q, v, p),
        2 => RgbColor::new(p, v, t),
        3 => RgbColor::new(p, q, v),
        4 => RgbColor::new(t, p, v),
        // Region 5, and any residual bucket past it.
        _ => RgbColor::new(v, p, q),
    }
}

/// Format a color as `#RRGGBB`.
pub fn format_color(color: RgbColor) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hsv_to_rgb ──

    #[test]
    fn zero_saturation_is_gray() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            for h in [0u8, 20, 100, 200, 255] {
                assert_eq!(hsv_to_rgb(HsvColor::new(h, 0, v)), RgbColor::new(v, v, v));
            }
        }
    }

    #[test]
    fn default_hue_full_saturation_is_orange() {
        assert_eq!(
            hsv_to_rgb(HsvColor::new(20, 255, 255)),
            RgbColor::new(255, 120, 0)
        );
    }

    #[test]
    fn idle_is_white() {
        assert_eq!(
            hsv_to_rgb(HsvColor::new(20, 0, 255)),
            RgbColor::new(255, 255, 255)
        );
    }

    #[test]
    fn pure_red_at_hue_zero() {
        assert_eq!(
            hsv_to_rgb(HsvColor::new(0, 255, 255)),
            RgbColor::new(255, 0, 0)
        );
    }

    #[test]
    fn sector_boundary_43_enters_region_one() {
        // remainder 0: q is (almost) v, t is 0
        assert_eq!(
            hsv_to_rgb(HsvColor::new(43, 255, 255)),
            RgbColor::new(254, 255, 0)
        );
    }

    #[test]
    fn top_of_hue_range_uses_last_arm() {
        // 255 / 43 = 5, remainder (255 - 215) * 6 = 240
        assert_eq!(
            hsv_to_rgb(HsvColor::new(255, 255, 255)),
            RgbColor::new(255, 0, 15)
        );
    }

    #[test]
    fn value_is_always_the_brightest_channel() {
        for h in 0..=255u8 {
            for s in (1..=255u8).step_by(17) {
                for v in (0..=255u8).step_by(15) {
                    let rgb = hsv_to_rgb(HsvColor::new(h, s, v));
                    let max = rgb.r.max(rgb.g).max(rgb.b);
                    assert_eq!(max, v, "h={h} s={s} v={v} -> {rgb:?}");
                }
            }
        }
    }

    #[test]
    fn conversion_is_deterministic() {
        for h in (0..=255u8).step_by(5) {
            for s in (0..=255u8).step_by(5) {
                let c = HsvColor::new(h, s, 200);
                assert_eq!(hsv_to_rgb(c), hsv_to_rgb(c));
            }
        }
    }

    #[test]
    fn zero_value_is_black() {
        for h in (0..=255u8).step_by(3) {
            assert_eq!(hsv_to_rgb(HsvColor::new(h, 255, 0)), RgbColor::new(0, 0, 0));
        }
    }

    // ── format_color ──

    #[test]
    fn format_orange() {
        assert_eq!(format_color(RgbColor::new(255, 120, 0)), "#FF7800");
    }

    #[test]
    fn format_black() {
        assert_eq!(format_color(RgbColor::new(0, 0, 0)), "#000000");
    }

    #[test]
    fn display_matches_format_color() {
        let c = RgbColor::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_string(), "#123456");
    }
}
