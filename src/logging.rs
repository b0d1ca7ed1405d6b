//! Logging setup on tracing + tracing-subscriber
//!
//! Two sinks: a console layer whose level follows the config plus the
//! -v/-q flags, and an optional daily-rotated file layer. Either sink
//! can emit JSON. RUST_LOG still wins for per-module directives.

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

/// Keeps the non-blocking file writer alive; dropping it flushes
/// whatever is still buffered. Hold it for the whole process.
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Install the full subscriber stack.
///
/// The returned [`LogGuards`] must outlive every log call; bind it in
/// `main` and let it drop on exit.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = effective_level(settings, verbose, quiet);

    let mut file_guard = None;
    let file_layer = match settings.file {
        Some(ref path) => {
            let (layer, guard) = file_layer(path, settings.max_files, settings.json_format)?;
            file_guard = Some(guard);
            Some(layer)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer(settings.json_format))
        .with(file_layer)
        .init();

    tracing::info!(
        level = %level,
        file = ?settings.file,
        json = settings.json_format,
        "Logging initialized"
    );

    Ok(LogGuards {
        _file_guard: file_guard,
    })
}

/// Minimal console-only setup for one-shot commands. Idempotent in
/// spirit but not in fact: a second call reports the collision.
pub fn init_simple(level: Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// CLI flags beat the config file: -q pins errors-only, each -v steps
/// the level up, and with neither the config level applies.
fn effective_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => parse_level(&settings.level),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// RUST_LOG, when set, replaces the computed default entirely; the
/// crate's own directive is re-added so taskmill events always pass
/// at the chosen level.
fn env_filter(level: Level) -> EnvFilter {
    let own = format!("taskmill={}", level)
        .parse()
        .unwrap_or_else(|_| Level::INFO.into());

    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()))
        .add_directive(own)
}

fn console_layer<S>(json: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    if json {
        Box::new(
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_span_events(FmtSpan::CLOSE),
        )
    } else {
        Box::new(fmt::layer().with_target(true).with_ansi(true).compact())
    }
}

/// Daily-rotated file sink. Creates the log directory if needed and
/// wraps the appender in a non-blocking writer so the executor loop
/// never stalls on disk.
fn file_layer<S>(
    log_file: &str,
    max_files: u32,
    json: bool,
) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let path = Path::new(log_file);
    let directory = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    if directory != Path::new(".") {
        fs::create_dir_all(directory).map_err(|e| {
            Error::Config(format!(
                "Failed to create log directory '{}': {}",
                directory.display(),
                e
            ))
        })?;
    }

    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("taskmill.log");

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files as usize)
        .build(directory)
        .map_err(|e| Error::Config(format!("Failed to create log file appender: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer: Box<dyn Layer<S> + Send + Sync> = if json {
        Box::new(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false),
        )
    } else {
        Box::new(
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
    };

    Ok((layer, guard))
}
