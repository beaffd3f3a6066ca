//! Device operations — writing one color to an ordered list of zones.

use crate::device::{DeviceError, KeyboardDevice, Result, Zone};

use super::color::{HsvColor, RgbColor, hsv_to_rgb};

/// Write `color` to each zone in order.
///
/// Stops at the first failed write; zones after it are not touched for this
/// call. The error names the failing zone.
pub fn dispatch_color(device: &impl KeyboardDevice, color: RgbColor, zones: &[Zone]) -> Result<()> {
    zones.iter().try_for_each(|&zone| {
        device
            .set_color(color, zone)
            .map_err(|e| DeviceError::ZoneWrite {
                zone,
                reason: e.to_string(),
            })
    })
}

/// Convert `hsv` and dispatch it. Returns the RGB color written.
pub fn dispatch_hsv(
    device: &impl KeyboardDevice,
    hsv: HsvColor,
    zones: &[Zone],
) -> Result<RgbColor> {
    let rgb = hsv_to_rgb(hsv);
    dispatch_color(device, rgb, zones)?;
    Ok(rgb)
}
