//! Process logging for skilltrack.
//!
//! One logger per process. Records go to stderr, or to size-rotated files
//! with `info`+ mirrored to stderr when a log directory is configured.
//! A repeated `init_logging` call must ask for the active configuration;
//! anything else is rejected rather than silently ignored.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "skilltrack";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sink {
    Stderr,
    Files(PathBuf),
}

impl Display for Sink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Files(dir) => write!(f, "{}", dir.display()),
        }
    }
}

struct ActiveLogger {
    level: LevelFilter,
    sink: Sink,
    _handle: LoggerHandle,
}

/// Starts process logging at `level`, writing to `log_dir` when given.
///
/// # Errors
/// - `level` is not one of trace, debug, info, warn, error.
/// - `log_dir` is blank or cannot be created.
/// - Logging is already running with a different level or sink.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), String> {
    let level = parse_level(level)?;
    let sink = parse_sink(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(level, sink.clone()))?;
    if active.sink != sink {
        return Err(format!(
            "logging already writes to `{}`; refusing to switch to `{sink}`",
            active.sink
        ));
    }
    if active.level != level {
        return Err(format!(
            "logging already runs at `{}`; refusing to switch to `{level}`",
            active.level
        ));
    }
    Ok(())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LevelFilter, sink: Sink) -> Result<ActiveLogger, String> {
    let logger = Logger::with(LogSpecification::builder().default(level).build())
        .format(flexi_logger::detailed_format);

    let logger = match &sink {
        Sink::Stderr => logger.log_to_stderr(),
        Sink::Files(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .duplicate_to_stderr(Duplicate::Info)
        }
    };

    let handle = logger
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;
    install_panic_hook();

    info!(
        "event=logging_init module=core status=ok version={} level={level} sink={sink}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(ActiveLogger {
        level,
        sink,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error",
            level.trim()
        )),
        Ok(parsed) => Ok(parsed),
    }
}

fn parse_sink(log_dir: Option<&str>) -> Result<Sink, String> {
    match log_dir.map(str::trim) {
        None => Ok(Sink::Stderr),
        Some("") => Err("log directory cannot be blank".to_string()),
        Some(dir) => Ok(Sink::Files(PathBuf::from(dir))),
    }
}

// Runs once: only reachable from the one successful `start_logger`.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!(
            "event=panic module=core status=error location={location} message={}",
            panic_message(info.payload())
        );
        previous(info);
    }));
}

/// Single-line, length-capped panic message; payloads may echo request data.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    let raw = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    let single_line = raw.replace(['\n', '\r'], " ");
    let cut = single_line
        .char_indices()
        .nth(PANIC_MESSAGE_LIMIT)
        .map(|(index, _)| index);
    match cut {
        Some(cut) => format!("{}...", &single_line[..cut]),
        None => single_line,
    }
}
