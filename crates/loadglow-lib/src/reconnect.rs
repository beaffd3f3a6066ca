//! Bounded reconnection after device communication failures.
//!
//! When a color write fails the handle is assumed dead. A reconnect episode
//! then tries to reopen the device a fixed number of times with a fixed delay
//! between attempts. Each episode starts with a full budget; nothing carries
//! over from earlier episodes.

use std::time::Duration;

use crate::device;
use crate::timing::Sleeper;

/// Configuration for one reconnect episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Maximum number of `open()` calls per episode.
    pub max_attempts: u32,
    /// Wait between consecutive attempts.
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(1),
        }
    }
}

/// Attempt counter for a single episode.
#[derive(Debug)]
pub struct ReconnectEpisode {
    max_attempts: u32,
    attempts: u32,
}

impl ReconnectEpisode {
    pub fn new(policy: &ReconnectPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            attempts: 0,
        }
    }

    /// Count one attempt and return its 1-based number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Attempts made so far in this episode.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Attempts left before the episode is exhausted.
    pub fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

/// Result of a reconnect episode.
#[derive(Debug)]
pub enum ReconnectOutcome<D> {
    Reconnected { device: D, attempts: u32 },
    Exhausted { attempts: u32 },
}

/// Run one reconnect episode.
///
/// The first attempt is immediate; later attempts wait `policy.delay`.
/// Every failed attempt is logged with the number of attempts left.
pub fn reconnect<D>(
    policy: &ReconnectPolicy,
    open: &mut impl FnMut() -> device::Result<D>,
    sleeper: &mut impl Sleeper,
) -> ReconnectOutcome<D> {
    let mut episode = ReconnectEpisode::new(policy);
    while !episode.is_exhausted() {
        if episode.attempts() > 0 {
            sleeper.sleep(policy.delay);
        }
        let attempt = episode.begin_attempt();
        match open() {
            Ok(device) => {
                log::info!("reconnected to keyboard device (attempt {attempt})");
                return ReconnectOutcome::Reconnected {
                    device,
                    attempts: attempt,
                };
            }
            Err(e) => {
                log::warn!(
                    "retry({}) opening keyboard device failed: {e}",
                    episode.remaining()
                );
            }
        }
    }
    log::error!(
        "too many retries ({}) opening keyboard device, giving up",
        episode.attempts()
    );
    ReconnectOutcome::Exhausted {
        attempts: episode.attempts(),
    }
}
