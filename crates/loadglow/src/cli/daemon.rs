//! Foreground monitor: samples CPU load and colors the keyboard until signaled.

use loadglow_lib::monitor::{MonitorLoop, MonitorOutcome};
use loadglow_lib::shutdown::ShutdownToken;
use loadglow_lib::stat::ProcStat;

use super::{Config, Result, ThreadSleeper, device};

pub(super) fn cmd_daemon(config: &Config) -> Result<i32> {
    let shutdown = ShutdownToken::new();
    let handler_token = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.request_stop()) {
        log::warn!("could not install signal handler: {e}");
    }

    log::info!(
        "loadglow {} started (hue {}, tick {} ms, counters from {})",
        env!("CARGO_PKG_VERSION"),
        config.hue,
        config.tick_interval_ms,
        config.stat_path
    );

    let mut monitor = MonitorLoop::new(
        config.monitor_settings(),
        ProcStat::new(&config.stat_path),
        device::open_device,
        ThreadSleeper,
        shutdown,
    );
    let outcome = monitor.run();

    let stats = monitor.stats();
    log::info!(
        "exiting after {} ticks ({} skipped, {} reconnects)",
        stats.ticks,
        stats.skipped,
        stats.reconnects
    );

    let outcome = outcome?;
    if let MonitorOutcome::RetriesExhausted { attempts } = outcome {
        log::error!("keyboard device lost, gave up after {attempts} reopen attempts");
    }
    Ok(outcome.exit_code())
}
