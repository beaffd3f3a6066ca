//! Cooperative shutdown flag shared with the signal handler.
//!
//! The handler may only call [`ShutdownToken::request_stop`]; the monitor
//! loop polls [`ShutdownToken::is_stopping`] once per tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to one process-wide run/stop flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    stopping: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag to stopping. Safe to call from a signal-handling thread.
    pub fn request_stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        assert!(!ShutdownToken::new().is_stopping());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = ShutdownToken::new();
        let handler = token.clone();
        handler.request_stop();
        assert!(token.is_stopping());
    }

    #[test]
    fn request_stop_is_idempotent() {
        let token = ShutdownToken::new();
        token.request_stop();
        token.request_stop();
        assert!(token.is_stopping());
    }

    #[test]
    fn visible_across_threads() {
        let token = ShutdownToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.request_stop())
            .join()
            .unwrap();
        assert!(token.is_stopping());
    }
}
