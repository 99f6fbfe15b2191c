//! # Observability
//!
//! Logging bootstrap shared by every VetClinic console binary.
//!
//! Crates only ever call the standard `tracing` macros. A binary calls
//! [`init_with_config`] once at startup and decides where the lines go:
//!
//! - with a `log_path`, every event is appended as one JSON object per line
//!   (`~/.vetclinic/logs/console.jsonl` by default), optionally mirrored to
//!   stderr in compact form;
//! - without one, events go to stderr only.
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "vetclinic".into(),
//!         default_level: "debug".into(),
//!         log_path: Some("/tmp/vetclinic/console.jsonl".into()),
//!         also_stderr: true,
//!     });
//!
//!     tracing::info!("console started");
//! }
//! ```

mod file_sink;
mod json_layer;

use std::path::PathBuf;

pub use file_sink::FileLogWriter;
pub use json_layer::{JsonLayer, LogEntry, REDACTED};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "vetclinic", "console-tests").
    /// Included in every JSONL line.
    pub service_name: String,

    /// Default filter (e.g., "debug", "info", "clinic_auth=trace").
    /// `RUST_LOG` wins when set.
    pub default_level: String,

    /// JSONL destination. `None` disables the file sink.
    pub log_path: Option<PathBuf>,

    /// Mirror events to stderr in compact form.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize logging with a custom configuration.
///
/// Falls back to stderr-only output when the JSONL file cannot be opened.
pub fn init_with_config(config: LogConfig) {
    if let Some(path) = config.log_path.clone() {
        match FileLogWriter::new(&path) {
            Ok(writer) => {
                file_sink::init_file_subscriber(&config, &path, writer);
                return;
            }
            Err(e) => {
                eprintln!("failed to open log file {}: {}", path.display(), e);
            }
        }
    }

    use tracing_subscriber::util::SubscriberInitExt;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.default_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .try_init();
}

pub(crate) fn build_filter(default_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
}
