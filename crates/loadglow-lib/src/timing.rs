//! Blocking waits, abstracted so loops can be driven without real time.

use std::time::Duration;

/// A blocking wait between loop iterations.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Recording sleeper for tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use crate::shutdown::ShutdownToken;

    /// Records requested waits without sleeping. Optionally requests shutdown
    /// once a given number of waits has happened.
    #[derive(Debug, Default)]
    pub struct ManualSleeper {
        pub slept: Vec<Duration>,
        stop_after: Option<(usize, ShutdownToken)>,
    }

    impl ManualSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        /// Request stop on `token` after the `n`th wait.
        pub fn stop_after(n: usize, token: ShutdownToken) -> Self {
            Self {
                slept: Vec::new(),
                stop_after: Some((n, token)),
            }
        }

        /// Sum of all recorded waits.
        pub fn total(&self) -> Duration {
            self.slept.iter().sum()
        }
    }

    impl Sleeper for ManualSleeper {
        fn sleep(&mut self, duration: Duration) {
            self.slept.push(duration);
            if let Some((n, token)) = &self.stop_after
                && self.slept.len() >= *n
            {
                token.request_stop();
            }
        }
    }
}
