//! Logging for the Frunk shell.
//!
//! The log file gets everything at the build's level. The terminal only gets
//! warnings and errors, colored, on stderr so they stay out of rendered screens.

use crate::error::FrunkError;

use common::ErrorLocation;

use std::fmt;
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::{Dispatch, FormatCallback};
use humantime::format_rfc3339;
use log::{LevelFilter, Record, info, warn};

static INIT_ONCE: Once = Once::new();
static INIT_ATTEMPTED: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "frunk.log";

#[cfg(debug_assertions)]
const FILE_LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(debug_assertions))]
const FILE_LEVEL: LevelFilter = LevelFilter::Info;

const TERMINAL_LEVEL: LevelFilter = LevelFilter::Warn;

/// Install the global logger writing to `log_dir/frunk.log` and stderr.
///
/// Only the first call does anything; later calls warn and return `Ok`.
///
/// # Errors
///
/// Fails when the log file cannot be opened or another logger is installed.
pub fn initialize(log_dir: &Path) -> Result<(), FrunkError> {
    if INIT_ATTEMPTED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized");
        return Ok(());
    }

    let mut result = Ok(());
    INIT_ONCE.call_once(|| {
        result = install(log_dir);
        if result.is_ok() {
            info!("Logger initialized: file {FILE_LEVEL:?}, terminal {TERMINAL_LEVEL:?}");
        }
    });
    result
}

fn install(log_dir: &Path) -> Result<(), FrunkError> {
    let log_file = fern::log_file(log_dir.join(LOG_FILE_NAME))
        .map_err(|e| logger_error(format!("Failed to create log file: {e}")))?;

    let colors = ColoredLevelConfig::new()
        .trace(Magenta)
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red);

    let terminal = Dispatch::new()
        .level(TERMINAL_LEVEL)
        .format(move |out, message, record| {
            write_line(out, message, record, colors.color(record.level()))
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| write_line(out, message, record, record.level()))
        .chain(log_file);

    Dispatch::new()
        .level(FILE_LEVEL)
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(|e| logger_error(format!("Failed to initialize logger: {e}")))
}

/// `[timestamp - LEVEL] message [file:line]`
fn write_line(
    out: FormatCallback<'_>,
    message: &fmt::Arguments<'_>,
    record: &Record<'_>,
    level: impl fmt::Display,
) {
    out.finish(format_args!(
        "[{} - {level}] {message} [{}:{}]",
        format_rfc3339(SystemTime::now()),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
    ))
}

#[track_caller]
fn logger_error(message: String) -> FrunkError {
    FrunkError::Frunk {
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}
