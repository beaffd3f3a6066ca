//! `--dry-run` — step through test colors so the backlight can be checked by eye.

use loadglow_lib::sweep::{self, SWEEP_STEPS};

use super::{Config, KeyboardDevice, Result, ThreadSleeper, Zone, device, led};

pub(super) fn cmd_dry_run(config: &Config) -> Result<i32> {
    let device = device::open_device()?;
    println!("[device] {}", device.info());
    println!("[sweep]  hue {}, {SWEEP_STEPS} steps", config.hue);

    sweep::run_sweep(
        &device,
        config.hue,
        &Zone::ALL,
        &mut ThreadSleeper,
        |step| {
            println!(
                "  {}/{SWEEP_STEPS}  saturation {:3} -> {}",
                step.index + 1,
                step.hsv.s,
                led::format_color(step.rgb)
            )
        },
    )?;

    println!("Done.");
    Ok(0)
}
