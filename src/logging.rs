//! File logging setup.
//!
//! Logs go to `<data-dir>/logs/` only; the terminal belongs to the TUI.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

pub const LOG_DIR: &str = "logs";
const LOG_FILE_BASENAME: &str = "cardlist";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start the file logger under `data_dir`.
///
/// The returned handle must be kept alive for buffered lines to be flushed.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when the log directory cannot be created or the
///   backend fails to start (for example when a logger is already set).
pub fn init_logging(level: &str, data_dir: &Path) -> Result<LoggerHandle, String> {
    let level = normalize_level(level)?;
    let log_dir = data_dir.join(LOG_DIR);
    std::fs::create_dir_all(&log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=app_start status=ok platform={} version={} level={level} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(handle)
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected off|trace|debug|info|warn|error"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_level;

    #[test]
    fn accepts_known_levels() {
        assert_eq!(normalize_level("INFO"), Ok("info"));
        assert_eq!(normalize_level(" warning "), Ok("warn"));
        assert_eq!(normalize_level("off"), Ok("off"));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = normalize_level("loud").unwrap_err();
        assert!(err.contains("loud"));
    }
}
