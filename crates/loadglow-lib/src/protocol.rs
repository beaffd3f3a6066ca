//! Protocol constants for the MSI (SteelSeries Engine) keyboard backlight.
//!
//! The lighting controller is a separate USB HID device. Every command is an
//! 8-byte feature report with report id 1, sent through a class-specific
//! `SET_REPORT` control transfer on interface 0.
//!
//! ```text
//! color: [1, 2, 64, zone, r, g, b, 236]
//! mode:  [1, 2, 65, mode, 0, 0, 0, 236]
//! ```

use crate::device::Zone;
use crate::led::RgbColor;

// ── USB identity ──

/// Vendor ID of the backlight controller.
pub const MSI_LED_VID: u16 = 0x1770;

/// Product ID of the backlight controller.
pub const MSI_LED_PID: u16 = 0xFF00;

/// Interface carrying the HID feature reports.
pub const LED_INTERFACE: u8 = 0;

// ── HID control transfer ──

/// HID class request `SET_REPORT`.
pub const HID_SET_REPORT: u8 = 0x09;

/// Report type "feature" in the high byte of `wValue`.
pub const HID_REPORT_TYPE_FEATURE: u16 = 0x03;

/// Report id used by every command.
pub const REPORT_ID: u8 = 1;

/// `wValue` for a feature report with [`REPORT_ID`].
pub const SET_REPORT_VALUE: u16 = (HID_REPORT_TYPE_FEATURE << 8) | REPORT_ID as u16;

/// Control transfer timeout.
pub const USB_TIMEOUT_MS: u64 = 1000;

// ── Report layout ──

pub const REPORT_SIZE: usize = 8;

const REPORT_PREFIX: u8 = 2;
const REPORT_SUFFIX: u8 = 236;

const CMD_SET_COLOR: u8 = 64;
const CMD_SET_MODE: u8 = 65;

/// Lighting mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Static colors per zone. The monitor always uses this.
    Normal = 1,
    Gaming = 2,
    Breathe = 3,
    Demo = 4,
    Wave = 5,
}

/// Build the report that sets one zone to `color`.
pub fn color_report(zone: Zone, color: RgbColor) -> [u8; REPORT_SIZE] {
    [
        REPORT_ID,
        REPORT_PREFIX,
        CMD_SET_COLOR,
        zone.number(),
        color.r,
        color.g,
        color.b,
        REPORT_SUFFIX,
    ]
}

/// Build the report that switches the lighting mode.
pub fn mode_report(mode: Mode) -> [u8; REPORT_SIZE] {
    [
        REPORT_ID,
        REPORT_PREFIX,
        CMD_SET_MODE,
        mode as u8,
        0,
        0,
        0,
        REPORT_SUFFIX,
    ]
}
