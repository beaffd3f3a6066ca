//! Dry-run color sweep for checking the backlight by eye.
//!
//! Alternates between no saturation (white) and full saturation at the
//! configured hue, holding each color for half a second.

use std::time::Duration;

use crate::device::{KeyboardDevice, Result, Zone};
use crate::led::{self, HsvColor, RgbColor};
use crate::protocol::Mode;
use crate::timing::Sleeper;

/// Number of sweep steps.
pub const SWEEP_STEPS: usize = 8;

/// How long each step is held.
pub const SWEEP_STEP_DELAY: Duration = Duration::from_millis(500);

/// HSV color for every step: saturation 0, 255, 0, 255, ... at full value.
pub fn sweep_colors(hue: u8) -> [HsvColor; SWEEP_STEPS] {
    std::array::from_fn(|step| {
        let s = if step % 2 == 0 { 0 } else { 255 };
        HsvColor::new(hue, s, 255)
    })
}

/// One completed sweep step, reported to the caller for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStep {
    /// 0-based step index.
    pub index: usize,
    pub hsv: HsvColor,
    pub rgb: RgbColor,
}

/// Run the sweep on `device`.
///
/// Each step is written to every zone in `zones`, reported through
/// `on_step`, then held for [`SWEEP_STEP_DELAY`]. The first failed write
/// aborts the sweep.
pub fn run_sweep(
    device: &impl KeyboardDevice,
    hue: u8,
    zones: &[Zone],
    sleeper: &mut impl Sleeper,
    mut on_step: impl FnMut(SweepStep),
) -> Result<()> {
    device.set_mode(Mode::Normal)?;
    for (index, hsv) in sweep_colors(hue).into_iter().enumerate() {
        let rgb = led::dispatch_hsv(device, hsv, zones)?;
        on_step(SweepStep { index, hsv, rgb });
        sleeper.sleep(SWEEP_STEP_DELAY);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceError;
    use crate::device::mock::{MockDevice, MockJournal};
    use crate::timing::mock::ManualSleeper;

    #[test]
    fn colors_alternate_starting_unsaturated() {
        let colors = sweep_colors(20);
        let sats: Vec<u8> = colors.iter().map(|c| c.s).collect();
        assert_eq!(sats, vec![0, 255, 0, 255, 0, 255, 0, 255]);
        assert!(colors.iter().all(|c| c.h == 20 && c.v == 255));
    }

    #[test]
    fn sweep_writes_all_zones_each_step() {
        let dev = MockDevice::new();
        let mut sleeper = ManualSleeper::new();
        let mut steps = Vec::new();
        run_sweep(&dev, 20, &Zone::ALL, &mut sleeper, |s| steps.push(s)).unwrap();

        assert_eq!(steps.len(), SWEEP_STEPS);
        assert_eq!(dev.journal.writes.borrow().len(), SWEEP_STEPS * 3);
        assert_eq!(*dev.journal.modes.borrow(), vec![Mode::Normal]);

        let white = RgbColor::new(255, 255, 255);
        let orange = RgbColor::new(255, 120, 0);
        for (i, chunk) in dev.journal.writes.borrow().chunks(3).enumerate() {
            let expected = if i % 2 == 0 { white } else { orange };
            let zones: Vec<Zone> = chunk.iter().map(|(z, _)| *z).collect();
            assert_eq!(zones, Zone::ALL.to_vec());
            assert!(chunk.iter().all(|(_, c)| *c == expected), "step {i}");
            assert_eq!(steps[i].rgb, expected);
        }
    }

    #[test]
    fn each_step_is_held_half_a_second() {
        let dev = MockDevice::new();
        let mut sleeper = ManualSleeper::new();
        run_sweep(&dev, 20, &Zone::ALL, &mut sleeper, |_| {}).unwrap();
        assert_eq!(sleeper.slept, vec![Duration::from_millis(500); SWEEP_STEPS]);
    }

    #[test]
    fn failed_write_aborts_sweep() {
        let journal = MockJournal::new();
        let dev = MockDevice::failing_on(journal.clone(), Zone::RIGHT);
        let mut sleeper = ManualSleeper::new();
        let mut steps = 0;
        let err = run_sweep(&dev, 20, &Zone::ALL, &mut sleeper, |_| steps += 1).unwrap_err();

        assert!(matches!(err, DeviceError::ZoneWrite { zone: Zone::RIGHT, .. }));
        assert_eq!(steps, 0);
        assert!(sleeper.slept.is_empty());
        assert_eq!(journal.zones(), vec![Zone::LEFT, Zone::MIDDLE]);
    }

    #[test]
    fn mode_failure_aborts_before_writing() {
        let dev = MockDevice::new();
        dev.fail_set_mode.set(true);
        let mut sleeper = ManualSleeper::new();
        assert!(run_sweep(&dev, 20, &Zone::ALL, &mut sleeper, |_| {}).is_err());
        assert!(dev.journal.writes.borrow().is_empty());
    }
}
