//! CLI modes — foreground monitor and dry-run sweep.

mod daemon;
mod dry_run;

use std::path::{Path, PathBuf};

pub(super) use loadglow_lib::config::Config;
pub(super) use loadglow_lib::device::{self, KeyboardDevice, Zone};
pub(super) use loadglow_lib::error::Result;
pub(super) use loadglow_lib::led;
pub(super) use loadglow_lib::timing::ThreadSleeper;

/// Parsed command-line choices.
pub struct Options {
    /// Overrides the configured hue.
    pub hue: Option<u8>,
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
}

/// Run the selected mode, returning the process exit code.
pub fn run(opts: Options) -> Result<i32> {
    let config = load_config(opts.config_path.as_deref(), opts.hue)?;
    if opts.dry_run {
        dry_run::cmd_dry_run(&config)
    } else {
        daemon::cmd_daemon(&config)
    }
}

/// Load config from `path` (or the default location), apply CLI overrides,
/// and validate the result.
fn load_config(path: Option<&Path>, hue: Option<u8>) -> Result<Config> {
    let (mut config, warnings) = match path {
        Some(p) => Config::load_from(p),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("[config] {w}");
    }
    if let Some(hue) = hue {
        config.hue = hue;
    }
    config.validated()?;
    Ok(config)
}
