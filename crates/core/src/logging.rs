//! Structured logging with JSON output and per-run correlation.
//!
//! Built on the `tracing` ecosystem: `tracing_subscriber` for composable
//! layers, `tracing_appender` for non-blocking file I/O, JSON formatting for
//! machine-readable logs, and `EnvFilter` for level control.
//!
//! Each run of the host application gets a UUID v7 run id that names the log
//! file (`wayfinder-<run_id>.json`) and appears in every entry, so one
//! session's records can be correlated after the fact. Old run logs are
//! pruned at initialization down to the configured retention limit; because
//! UUID v7 is timestamp-ordered, lexicographic filename order is
//! chronological order.
//!
//! The configured level can always be overridden with `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=wayfinder_core::view=trace,info ./app
//! ```

use crate::settings::LoggingSettings;
use anyhow::{Context, Error};
use std::fs;
use std::fs::DirEntry;
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const GIT_VERSION: &str = env!("GIT_VERSION");
const LOG_FILE_PREFIX: &str = "wayfinder-";
const LOG_FILE_SUFFIX: &str = "json";

static LOG_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Returns the unique run id for this process.
///
/// Generated on first access (UUID v7) and constant afterwards. Names the
/// log file and tags every entry written during the run.
pub fn get_run_id() -> &'static str {
    RUN_ID.get_or_init(|| Uuid::now_v7().to_string()).as_str()
}

/// Initializes the logging system.
///
/// Creates the log directory, prunes old run logs down to
/// `settings.max_files`, and installs a JSON-formatting subscriber writing
/// through a non-blocking rolling appender. A no-op when
/// `settings.enabled` is false.
///
/// Call once at application startup; logging stays active until
/// [`shutdown_logging`] flushes it.
///
/// # Errors
///
/// Fails when the log directory cannot be created, cleanup cannot delete an
/// old file, the appender cannot be built, the configured level does not
/// parse, or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Error> {
    if !settings.enabled {
        return Ok(());
    }

    let current_working_dir =
        std::env::current_dir().context("can't get current working directory")?;
    let log_dir = current_working_dir.join(&settings.directory);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("can't create log directory {}", log_dir.display()))?;

    cleanup_run_logs(&log_dir, settings.max_files)?;

    let appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::NEVER)
        .filename_prefix(format!("{}{}", LOG_FILE_PREFIX, get_run_id()))
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(&log_dir)
        .context("can't initialize rolling log file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(Mutex::new(Some(guard)));

    let filter = build_filter(settings)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_current_span(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("can't initialize tracing subscriber")?;

    eprintln!(
        "Wayfinder run started with ID: {} (version {})",
        get_run_id(),
        GIT_VERSION
    );

    Ok(())
}

/// Flushes buffered log data and shuts the logging system down.
///
/// Dropping the appender guard flushes its buffer; the drop happens on a
/// helper thread with a five second deadline so a wedged writer cannot hang
/// application exit. Call once at shutdown.
pub fn shutdown_logging() {
    if let Some(mutex) = LOG_GUARD.get() {
        if let Ok(mut guard_opt) = mutex.lock() {
            if let Some(guard) = guard_opt.take() {
                let (tx, rx) = mpsc::channel();

                thread::spawn(move || {
                    drop(guard);
                    let _ = tx.send(());
                });

                let _ = rx.recv_timeout(Duration::from_secs(5));
                eprintln!("Logging shutdown complete.");
            }
        }
    }
}

/// Prunes old run logs, keeping at most `max_files` (0 keeps everything).
///
/// Files are sorted by name; run ids are UUID v7, so name order is creation
/// order and the oldest files are removed first.
fn cleanup_run_logs(log_dir: &std::path::Path, max_files: usize) -> Result<(), Error> {
    if max_files == 0 {
        return Ok(());
    }

    let mut entries = collect_run_log_entries(log_dir)?;
    if entries.len() <= max_files {
        return Ok(());
    }

    entries.sort_by_key(|entry| entry.file_name());
    let remove_count = entries.len().saturating_sub(max_files);
    for entry in entries.into_iter().take(remove_count) {
        fs::remove_file(entry.path())
            .with_context(|| format!("can't remove old log file {}", entry.path().display()))?;
    }

    Ok(())
}

/// Collects the run log files (`wayfinder-*.json`) in `log_dir`.
fn collect_run_log_entries(log_dir: &std::path::Path) -> Result<Vec<DirEntry>, Error> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(log_dir)
        .with_context(|| format!("can't read log directory {}", log_dir.display()))?
    {
        let entry = entry.context("can't read log directory entry")?;
        if is_run_log_entry(&entry) {
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn is_run_log_entry(entry: &DirEntry) -> bool {
    let file_name = entry.file_name();
    let file_name = file_name.to_string_lossy();
    file_name.starts_with(LOG_FILE_PREFIX) && file_name.ends_with(LOG_FILE_SUFFIX)
}

/// Builds the level filter: `RUST_LOG` wins over the configured level, and
/// an empty configured level means "info".
fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, Error> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = settings.level.trim();
    let level = if level.is_empty() { "info" } else { level };

    EnvFilter::builder()
        .parse(level)
        .context("invalid logging level")
}
