//! Monitor state machine — CPU load sampling, color dispatch, reconnection.
//!
//! [`LoadIndicator`] turns consecutive counter samples into per-tick actions.
//! [`MonitorLoop`] drives it: it owns the device handle, paces ticks, and runs
//! a reconnect episode whenever a zone write fails. I/O sources (counters,
//! device opener, sleeper, shutdown flag) are injected so the binary is a
//! thin adapter and tests can script every failure.

use std::time::Duration;

use crate::device::{self, DeviceError, KeyboardDevice, Zone};
use crate::error::Result;
use crate::led::{self, RgbColor};
use crate::protocol::Mode;
use crate::reconnect::{self, ReconnectOutcome, ReconnectPolicy};
use crate::shutdown::ShutdownToken;
use crate::stat::{self, CpuSample, StatSource};
use crate::timing::Sleeper;

/// Why a tick produced no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A counter decreased since the previous sample.
    CounterRegression,
    /// No CPU time was accounted since the previous sample.
    EmptyWindow,
}

/// Action to take after a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Write this color to every zone.
    Dispatch(RgbColor),
    /// Leave the keyboard as it is.
    Skip(SkipReason),
}

/// Load-to-color state: the previous sample and the configured hue.
pub struct LoadIndicator {
    hue: u8,
    prev: CpuSample,
}

impl LoadIndicator {
    /// Create an indicator measuring from `baseline`.
    pub fn new(hue: u8, baseline: CpuSample) -> Self {
        Self {
            hue,
            prev: baseline,
        }
    }

    /// Feed the next sample. It becomes the baseline for the following call,
    /// whatever the outcome.
    pub fn update(&mut self, curr: CpuSample) -> TickAction {
        let delta = stat::delta(&curr, &self.prev);
        self.prev = curr;

        let delta = match delta {
            Ok(d) => d,
            Err(regression) => {
                log::debug!("skipping tick: {regression}");
                return TickAction::Skip(SkipReason::CounterRegression);
            }
        };
        let Some(ratio) = delta.ratio() else {
            log::debug!("skipping tick: no CPU time accounted");
            return TickAction::Skip(SkipReason::EmptyWindow);
        };

        let hsv = led::load_to_hsv(self.hue, ratio);
        let rgb = led::hsv_to_rgb(hsv);
        log::debug!("cpu {:5.1}% -> saturation {:3} {rgb}", ratio * 100.0, hsv.s);
        TickAction::Dispatch(rgb)
    }
}

/// Tunables for [`MonitorLoop`].
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub hue: u8,
    /// Sleep after each tick body.
    pub tick: Duration,
    /// Zones written each tick, in order.
    pub zones: Vec<Zone>,
    pub reconnect: ReconnectPolicy,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            hue: led::DEFAULT_HUE,
            tick: Duration::from_secs(1),
            zones: Zone::ALL.to_vec(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Lifecycle state of a [`MonitorLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Initializing,
    Running,
    Retrying,
    Terminated,
}

/// How a monitor run ended (fatal errors are returned as `Err` instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Shutdown was requested.
    Stopped,
    /// A reconnect episode used up its attempts.
    RetriesExhausted { attempts: u32 },
}

impl MonitorOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MonitorOutcome::Stopped)
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Counters describing a run so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Ticks that took a sample (excludes the baseline).
    pub ticks: u64,
    /// Ticks that produced no color.
    pub skipped: u64,
    /// Successful reconnect episodes.
    pub reconnects: u64,
}

/// The monitoring-and-actuation loop.
pub struct MonitorLoop<D, S, F, Z> {
    settings: MonitorSettings,
    source: S,
    open: F,
    sleeper: Z,
    shutdown: ShutdownToken,
    device: Option<D>,
    state: MonitorState,
    stats: MonitorStats,
    last_color: Option<RgbColor>,
}

impl<D, S, F, Z> MonitorLoop<D, S, F, Z>
where
    D: KeyboardDevice,
    S: StatSource,
    F: FnMut() -> device::Result<D>,
    Z: Sleeper,
{
    pub fn new(
        settings: MonitorSettings,
        source: S,
        open: F,
        sleeper: Z,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            settings,
            source,
            open,
            sleeper,
            shutdown,
            device: None,
            state: MonitorState::Initializing,
            stats: MonitorStats::default(),
            last_color: None,
        }
    }

    /// Run until shutdown is requested, a reconnect episode is exhausted,
    /// or a fatal error occurs. The device is closed on every exit path.
    pub fn run(&mut self) -> Result<MonitorOutcome> {
        let result = self.run_until_done();
        self.device = None;
        self.state = MonitorState::Terminated;
        result
    }

    fn run_until_done(&mut self) -> Result<MonitorOutcome> {
        self.state = MonitorState::Initializing;
        let device = (self.open)()?;
        log::info!("opened keyboard device: {}", device.info());
        apply_mode(&device);
        self.device = Some(device);

        let baseline = self.source.read_sample()?;
        let mut indicator = LoadIndicator::new(self.settings.hue, baseline);
        self.sleeper.sleep(self.settings.tick);
        self.state = MonitorState::Running;

        loop {
            if self.shutdown.is_stopping() {
                log::info!("shutdown requested");
                return Ok(MonitorOutcome::Stopped);
            }

            let sample = self.source.read_sample()?;
            self.stats.ticks += 1;

            match indicator.update(sample) {
                TickAction::Dispatch(color) => {
                    if let Err(e) = self.dispatch(color) {
                        log::error!("set_color failed: {e}");
                        if let Some(outcome) = self.recover() {
                            return Ok(outcome);
                        }
                    }
                }
                TickAction::Skip(_) => self.stats.skipped += 1,
            }

            self.sleeper.sleep(self.settings.tick);
        }
    }

    fn dispatch(&mut self, color: RgbColor) -> device::Result<()> {
        let device = self.device.as_ref().ok_or(DeviceError::NotFound)?;
        led::dispatch_color(device, color, &self.settings.zones)?;
        self.last_color = Some(color);
        Ok(())
    }

    /// Close the stale handle and run one reconnect episode.
    ///
    /// Returns `Some(outcome)` if the loop must terminate.
    fn recover(&mut self) -> Option<MonitorOutcome> {
        self.state = MonitorState::Retrying;
        self.device = None;

        match reconnect::reconnect(&self.settings.reconnect, &mut self.open, &mut self.sleeper) {
            ReconnectOutcome::Reconnected { device, .. } => {
                apply_mode(&device);
                self.device = Some(device);
                self.stats.reconnects += 1;
                self.state = MonitorState::Running;
                None
            }
            ReconnectOutcome::Exhausted { attempts } => {
                Some(MonitorOutcome::RetriesExhausted { attempts })
            }
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Last color written to all zones successfully.
    pub fn last_color(&self) -> Option<RgbColor> {
        self.last_color
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }
}

/// Switch a fresh handle to static colors. Failure is only logged: a dead
/// handle shows up on the next color write.
fn apply_mode(device: &impl KeyboardDevice) {
    if let Err(e) = device.set_mode(Mode::Normal) {
        log::warn!("could not set lighting mode: {e}");
    }
}
