//! Stderr logger for the chessbot binaries.
//!
//! Each line carries the time since start-up and the pipeline stage that
//! emitted it, e.g. `[  0.412s  INFO  board] mapped 32 pieces`. The stage
//! is the workspace crate the record comes from (`board`, `engine`,
//! `robot`, ...). Records from other crates are capped at `warn` so the
//! pipeline stays readable at `-vv`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const WORKSPACE_PREFIX: &str = "chessbot";

/// Filter used by [`init_tracing`] when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
pub const DEFAULT_TRACING_FILTER: &str =
    "warn,chessbot=info,chessbot_board=info,chessbot_engine=info,chessbot_robot=info";

/// Map CLI `-v` / `--quiet` flags to a level. Warnings show by default.
pub fn verbosity_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Short stage name for a record target.
///
/// `chessbot_engine::process` → `engine`, `chessbot::pipeline` →
/// `pipeline`, anything outside the workspace keeps its crate name.
fn stage(target: &str) -> &str {
    let mut parts = target.split("::");
    let krate = parts.next().unwrap_or_default();
    match krate.strip_prefix(WORKSPACE_PREFIX) {
        Some("") => parts.next().unwrap_or(krate),
        Some(rest) => rest.trim_start_matches(['_', '-']),
        None => krate,
    }
}

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

impl StageLogger {
    fn allows(&self, level: Level, target: &str) -> bool {
        let cap = if target.starts_with(WORKSPACE_PREFIX) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        level <= cap
    }
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.allows(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {:>8}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            stage(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StageLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr, filtered by `RUST_LOG` or
/// [`DEFAULT_TRACING_FILTER`]. Closed spans are reported with their
/// duration, which gives per-stage timings for a turn.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACING_FILTER));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
