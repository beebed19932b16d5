//! mouse-probe entry point.
//!
//! Loads the config file, applies command-line overrides, finds the first
//! mouse under the input directory, and prints its events until Ctrl-C or
//! until the device stops delivering.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file + CLI overrides
//!  └─ locate_and_open()        -- scan candidates, keep the first mouse
//!  └─ spawn_blocking(run)      -- owns the handle, prints events
//!  └─ ctrl_c task              -- clears the shared `running` flag
//! ```
//!
//! Event lines go to stdout; diagnostics and logs go to stderr.
//!
//! # Exit codes
//!
//! `1` when no mouse could be opened (or the config is unusable), `0`
//! otherwise, including when the stream fails after a successful open.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mouse_probe::infrastructure::storage::config::{load_config, load_config_file, ProbeConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Find the first mouse and print its events with a virtual cursor.
///
/// Every option overrides the matching config file value.
#[derive(Debug, Parser)]
#[command(name = "mouse-probe", version)]
struct Cli {
    /// Config file to read instead of `~/.config/mouse-probe/config.toml`.
    #[arg(long, env = "MOUSE_PROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the `event<N>` nodes.
    #[arg(long, env = "MOUSE_PROBE_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Upper bound on candidates probed.
    #[arg(long, env = "MOUSE_PROBE_MAX_CANDIDATES")]
    max_candidates: Option<usize>,

    /// Take exclusive delivery of the mouse's events while monitoring.
    #[arg(long)]
    grab: bool,

    /// Print `SYN_REPORT` markers between reports.
    #[arg(long)]
    show_sync: bool,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, env = "MOUSE_PROBE_LOG")]
    log_level: Option<String>,
}

impl Cli {
    /// Reads the config file and folds the command-line overrides into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged values fail validation.
    fn into_config(self) -> anyhow::Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => load_config().context("loading default config")?,
        };

        if let Some(dir) = self.input_dir {
            config.scan.input_dir = dir;
        }
        if let Some(max) = self.max_candidates {
            config.scan.max_candidates = max;
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        config.scan.grab |= self.grab;
        config.display.show_sync |= self.show_sync;

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = Cli::parse().into_config()?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    run(config).await
}

#[cfg(target_os = "linux")]
async fn run(config: ProbeConfig) -> anyhow::Result<ExitCode> {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use tracing::{info, warn};

    use mouse_probe::application::locate_device::{locate_and_open, LocateError};
    use mouse_probe::application::monitor::{MonitorOptions, MonitorSession, SessionEnd};
    use mouse_probe::application::report::render_summary;
    use mouse_probe::infrastructure::evdev::linux::EvdevProbe;

    let probe = EvdevProbe::from_config(&config.scan);
    let located = match locate_and_open(&probe) {
        Ok(located) => located,
        Err(e) => {
            eprintln!("error: {e}");
            match &e {
                LocateError::AccessDenied { .. } => {
                    eprintln!("hint: run with sudo, or add your user to the 'input' group");
                }
                LocateError::NoCandidates { dir } => {
                    eprintln!("hint: is {} the evdev directory on this host?", dir.display());
                }
                LocateError::NoMatch { .. } => {
                    eprintln!("hint: no device reports relative motion plus a left or right button");
                }
                LocateError::Enumerate { .. } => {}
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("Mouse found: {}", located.path);
    println!("Device name: {}", located.name);

    let mut session = MonitorSession::new(located);
    if config.scan.grab {
        if let Err(e) = session.grab() {
            warn!("could not grab {}: {e}; continuing without exclusive access", session.path());
        }
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    println!("Reading events... (Ctrl-C to stop)");

    let options = MonitorOptions {
        show_sync: config.display.show_sync,
        poll_interval: config.display.poll_interval(),
    };

    // The read loop blocks on poll(2); the session is dropped inside the
    // closure, which closes the device.
    let (summary, end) = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let end = session.run(&running, &options, &mut out);
        (session.summary(), end)
    })
    .await
    .context("monitor task panicked")?;

    match end {
        SessionEnd::Shutdown => info!("stopped by signal"),
        SessionEnd::StreamEnded => info!("device stream ended"),
        SessionEnd::StreamFailed(e) => eprintln!("error reading events: {e}"),
        SessionEnd::OutputFailed(e) => warn!("console output failed: {e}"),
    }
    eprintln!("{}", render_summary(&summary));

    Ok(ExitCode::SUCCESS)
}

#[cfg(not(target_os = "linux"))]
async fn run(_config: ProbeConfig) -> anyhow::Result<ExitCode> {
    eprintln!("error: mouse-probe reads Linux evdev devices and is not supported on this platform");
    Ok(ExitCode::FAILURE)
}
