//! Logging for the `icd` binary.
//!
//! Library crates only emit `tracing` events; the subscriber installed here
//! decides where they go (stderr or `--log-file`) and how they look.
//!
//! Levels as used across the workspace:
//!
//! - `warn`: soft diagnostics such as undefined codes (default)
//! - `info`: reference data load summaries
//! - `debug`: per-call detail

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level. Everything else stays
/// at `warn`.
const WORKSPACE_CRATES: [&str; 7] = [
    "icd",
    "icd_cli",
    "icd_core",
    "icd_model",
    "icd_normalization",
    "icd_standards",
    "icd_validate",
];

/// Subscriber settings derived from the global CLI flags.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for workspace crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may override `level_filter`.
    pub use_env_filter: bool,
    /// Prefix each event with its RFC 3339 time (`--log-timestamps`).
    pub timestamps: bool,
    pub ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            timestamps: false,
            ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Install the global subscriber. Call once, before any command runs.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            subscriber(config, SharedWriter::new(file)).init();
        }
        None => subscriber(config, io::stderr).init(),
    }
    Ok(())
}

fn subscriber<W>(config: &LogConfig, writer: W) -> impl Subscriber + Send + Sync + use<W>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(env_filter(config));
    let layer = fmt_layer(config, writer);
    registry.with(layer)
}

/// One formatting layer per (format, timestamps) pair; the timer is part
/// of the layer type, so each arm is boxed.
fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_target(false);
    match (config.format, config.timestamps) {
        (LogFormat::Json, true) => layer.json().boxed(),
        (LogFormat::Json, false) => layer.json().without_time().boxed(),
        (LogFormat::Compact, true) => layer.compact().with_ansi(config.ansi).boxed(),
        (LogFormat::Compact, false) => layer
            .compact()
            .with_ansi(config.ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(config.ansi).boxed(),
        (LogFormat::Pretty, false) => layer.with_ansi(config.ansi).without_time().boxed(),
    }
}

/// A `Write` shared between the events of every thread.
struct SharedWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write> SharedWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    fn with_lock<T>(&self, op: impl FnOnce(&mut W) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        op(&mut guard)
    }
}

impl<W: Write> Write for SharedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_lock(|inner| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_lock(|inner| inner.flush())
    }
}

impl<'a, W: Write + 'a> MakeWriter<'a> for SharedWriter<W> {
    type Writer = SharedWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Directive string for the workspace crates at `level`.
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = String::from("warn");
    for krate in WORKSPACE_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// `RUST_LOG` wins when allowed and parseable.
fn env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(config: &LogConfig) -> String {
        let buffer = SharedWriter::new(Vec::new());
        let subscriber = subscriber(config, buffer.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(codes = 2, "undefined codes dropped");
            tracing::debug!("hidden at warn");
        });
        let bytes = buffer.with_lock(|inner| Ok(inner.clone())).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    fn plain_config(format: LogFormat, timestamps: bool) -> LogConfig {
        LogConfig {
            use_env_filter: false,
            timestamps,
            ansi: false,
            format,
            ..LogConfig::default()
        }
    }

    #[test]
    fn directives_cover_every_workspace_crate() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("icd_core=debug"));
        assert!(directives.contains("icd_standards=debug"));
    }

    #[test]
    fn compact_lines_start_with_the_level_unless_timestamped() {
        let output = capture(&plain_config(LogFormat::Compact, false));
        assert!(output.trim_start().starts_with("WARN"), "{output}");
        assert!(output.contains("undefined codes dropped"));
        assert!(!output.contains("hidden at warn"));

        let stamped = capture(&plain_config(LogFormat::Compact, true));
        assert!(stamped.starts_with("20"), "{stamped}");
        assert!(stamped.contains("undefined codes dropped"));
    }

    #[test]
    fn json_carries_a_timestamp_field_only_when_asked() {
        let output = capture(&plain_config(LogFormat::Json, false));
        let event: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert!(event.get("timestamp").is_none());
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["codes"], 2);

        let stamped = capture(&plain_config(LogFormat::Json, true));
        let event: serde_json::Value = serde_json::from_str(stamped.trim()).unwrap();
        assert!(event["timestamp"].is_string());
    }
}
