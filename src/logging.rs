//! Process logging bootstrap.
//!
//! Logs rotate by size under `<data_dir>/logs`; warnings and errors are
//! duplicated to stderr. When the log directory cannot be used the logger
//! writes to stderr only. Initialization happens once per process and never
//! panics.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "mapnotes";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const FALLBACK_LEVEL: &str = "info";

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

/// Where log records end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    File,
    Stderr,
}

struct LoggingState {
    output: LogOutput,
    _logger: LoggerHandle,
}

/// Starts the process logger.
///
/// The first call decides the output; later calls return it unchanged. An
/// unusable `log_dir` degrades to stderr, and an unknown `level` to `info`.
/// `Err` only when no logger at all could be installed.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LogOutput, String> {
    if let Some(state) = LOGGING_STATE.get() {
        return Ok(state.output);
    }

    let (level, level_error) = match normalize_level(level) {
        Ok(level) => (level, None),
        Err(err) => (FALLBACK_LEVEL, Some(err)),
    };

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let state = match start_file_logger(level, log_dir) {
            Ok(logger) => LoggingState {
                output: LogOutput::File,
                _logger: logger,
            },
            Err(file_error) => {
                let logger = start_stderr_logger(level).map_err(|err| {
                    format!("{file_error}; stderr fallback failed: {err}")
                })?;
                warn!(
                    "event=logging_init module=core status=degraded output=stderr error={}",
                    file_error
                );
                LoggingState {
                    output: LogOutput::Stderr,
                    _logger: logger,
                }
            }
        };

        info!(
            "event=app_start module=core status=ok platform={} version={} level={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            level
        );
        Ok(state)
    })?;

    if let Some(err) = level_error {
        warn!(
            "event=logging_init module=core status=error error={} fallback={}",
            err, FALLBACK_LEVEL
        );
    }
    Ok(state.output)
}

fn start_file_logger(level: &str, log_dir: &Path) -> Result<LoggerHandle, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start file logger: {err}"))
}

fn start_stderr_logger(level: &str) -> Result<LoggerHandle, String> {
    Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start stderr logger: {err}"))
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}
