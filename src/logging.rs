//! Log output for the binary.
//!
//! The terminal belongs to the UI, so events go to a plain-text file. The
//! filter comes from `RUST_LOG` when set, otherwise from the configuration.

use crate::config::LoggingConfig;
use crate::error::{DeskError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` first, then `fallback`, then `info`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `cfg.file` (appending).
///
/// Fails when the file cannot be opened. Installing twice is a no-op.
pub fn init(cfg: &LoggingConfig) -> Result<()> {
    if let Some(parent) = cfg.file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DeskError::Logging {
            path: cfg.file.clone(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.file)
        .map_err(|source| DeskError::Logging {
            path: cfg.file.clone(),
            source,
        })?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&cfg.filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            // a directory cannot be opened for appending
            file: dir.path().to_path_buf(),
            filter: "complaint_desk=debug".into(),
        };
        let err = init(&cfg).unwrap_err();
        assert!(matches!(err, DeskError::Logging { .. }));
    }

    #[test]
    fn bad_directives_fall_back() {
        // `[` is not a valid directive; building the filter must not panic
        let _ = env_filter("[");
    }
}
