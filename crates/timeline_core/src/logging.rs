//! Rolling file logs for the timeline core.
//!
//! # Responsibility
//! - Start one `flexi_logger` file backend per process.
//! - Resolve the level and directory from host arguments or from
//!   `TIMELINE_LOG_LEVEL` / `TIMELINE_LOG_DIR`.
//!
//! # Invariants
//! - The first successful configuration wins; repeating it is a no-op and
//!   any other level or directory is refused.
//! - Starting the logger never panics.
//! - Core log lines carry ids, counts and indices only, never user text.

use flexi_logger::{
    Cleanup, Criterion, DeferredNow, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, LevelFilter, Record};
use once_cell::sync::OnceCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "timeline";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

pub const LOG_DIR_ENV: &str = "TIMELINE_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TIMELINE_LOG_LEVEL";

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Validated logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub log_dir: PathBuf,
}

impl LogConfig {
    /// # Errors
    /// - Unknown level, or `off`.
    /// - Empty or relative directory.
    pub fn new(level: &str, log_dir: &str) -> Result<Self, String> {
        let level = parse_level(level)?;

        let log_dir = log_dir.trim();
        if log_dir.is_empty() {
            return Err("log_dir cannot be empty".to_string());
        }
        if !Path::new(log_dir).is_absolute() {
            return Err(format!("log_dir must be an absolute path, got `{log_dir}`"));
        }

        Ok(Self {
            level,
            log_dir: PathBuf::from(log_dir),
        })
    }

    /// Reads `TIMELINE_LOG_DIR` / `TIMELINE_LOG_LEVEL`.
    ///
    /// `Ok(None)` when no directory is configured. A missing level falls
    /// back to [`default_log_level`].
    pub fn from_env() -> Result<Option<Self>, String> {
        let dir = std::env::var(LOG_DIR_ENV).unwrap_or_default();
        if dir.trim().is_empty() {
            return Ok(None);
        }
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_log_level().as_str().to_string());
        Self::new(&level, &dir).map(Some)
    }
}

/// Starts file logging at `level` under `log_dir`.
///
/// # Errors
/// - Invalid level or directory (see [`LogConfig::new`]).
/// - Directory cannot be created or the backend fails to start.
/// - Logging is already running with a different configuration.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    init_logging_with(&LogConfig::new(level, log_dir)?)
}

/// Same as [`init_logging`] for an already validated configuration.
pub fn init_logging_with(config: &LogConfig) -> Result<(), String> {
    let active = ACTIVE.get_or_try_init(|| start(config))?;
    if active.config == *config {
        return Ok(());
    }
    Err(format!(
        "logging already running ({} at `{}`); refusing to switch to {} at `{}`",
        active.config.level,
        active.config.log_dir.display(),
        config.level,
        config.log_dir.display()
    ))
}

/// Active configuration, or `None` before the first successful init.
pub fn logging_status() -> Option<LogConfig> {
    ACTIVE.get().map(|active| active.config.clone())
}

/// `Debug` in debug builds, `Info` otherwise.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn start(config: &LogConfig) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.log_dir.display()
        )
    })?;

    let handle = Logger::with(LogSpecification::builder().default(config.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(line_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    PANIC_HOOK.get_or_init(install_panic_hook);

    info!(
        "event=core_init module=core status=ok version={} os={} debug_build={} level={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        cfg!(debug_assertions),
        config.level
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}

/// `2024-01-01 09:30:00.000 INFO timeline_core::state: event=...`
fn line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} {:<5} {}: {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unknown>"),
        record.args()
    )
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let raw = raw.trim();
    let parsed = if raw.eq_ignore_ascii_case("warning") {
        Ok(LevelFilter::Warn)
    } else {
        LevelFilter::from_str(raw)
    };
    match parsed {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{raw}`; expected trace|debug|info|warn|error"
        )),
        Ok(level) => Ok(level),
    }
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            single_line(payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(panic_info);
    }));
}

/// Flattens control characters and caps the length of free text.
fn single_line(value: &str, limit: usize) -> String {
    let mut out = value
        .chars()
        .take(limit)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>();
    if value.chars().nth(limit).is_some() {
        out.push_str("...");
    }
    out
}
