//! loadglow — shows CPU load on MSI keyboard backlights.
//!
//! Runs in the foreground until SIGINT/SIGTERM. Logs go to stderr, where a
//! service manager can pick them up.

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "loadglow",
    version,
    about = "CPU load indicator for MSI per-zone keyboard backlights"
)]
struct Args {
    /// Hue shown at full load (0-255, out-of-range values are clamped)
    #[arg(
        short = 'c',
        long = "color",
        value_name = "HUE",
        value_parser = parse_hue,
        allow_negative_numbers = true
    )]
    color: Option<u8>,

    /// Step through test colors instead of monitoring
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Use this config file instead of the default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log every tick's load and color
    #[arg(short, long)]
    verbose: bool,
}

/// Parse a hue argument, clamping integers into 0-255.
fn parse_hue(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let value: i64 = match s.parse() {
        Ok(v) => v,
        // Too many digits for i64: still a number, clamp by sign
        Err(_) if is_integer(s) => {
            if s.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }
        Err(_) => return Err(format!("`{s}` is not a number")),
    };
    Ok(value.clamp(0, u8::MAX as i64) as u8)
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and are not failures
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let opts = cli::Options {
        hue: args.color,
        dry_run: args.dry_run,
        config_path: args.config,
    };

    match cli::run(opts) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
