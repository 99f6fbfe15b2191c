//! Logging initialization for console binaries.

use crate::Paths;

/// Initialize logging for the `vetclinic` binary.
///
/// JSONL lines go to `<base>/logs/console.jsonl`. Set
/// `VETCLINIC_LOG_STDERR=1` to mirror them on stderr; stdout is reserved for
/// command output.
pub fn init_logging(level: &str, paths: &Paths) {
    observability::init_with_config(observability::LogConfig {
        service_name: "vetclinic".into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr: std::env::var("VETCLINIC_LOG_STDERR")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false),
    });
}
