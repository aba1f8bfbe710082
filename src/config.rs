//! Runtime configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line flags. Every section and key of the file is optional:
//!
//! ```toml
//! [storage]
//! backend = "file"        # or "memory"
//! data_dir = "desk-data"
//!
//! [listing]
//! page_size = 5
//! recent_activity = 3
//! description_preview = 50
//!
//! [uploads]
//! max_bytes = 2097152
//!
//! [ui]
//! notice_seconds = 4
//! alt_screen = true
//!
//! [logging]
//! file = "complaint-desk.log"
//! filter = "complaint_desk=info"
//! ```

use crate::error::{DeskError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which backend implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON files in `data_dir`.
    #[default]
    File,
    /// Process memory; everything is lost on exit.
    Memory,
}

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where records live.
    pub storage: StorageConfig,
    /// Listing sizes.
    pub listing: ListingConfig,
    /// Attachment limits.
    pub uploads: UploadConfig,
    /// Terminal behaviour.
    pub ui: UiConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// `[storage]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend implementation.
    pub backend: BackendKind,
    /// Directory of the file backend.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            data_dir: PathBuf::from("desk-data"),
        }
    }
}

/// `[listing]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// Entries in the home screen's recent activity.
    pub recent_activity: usize,
    /// Graphemes of description shown in tables.
    pub description_preview: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            recent_activity: 3,
            description_preview: 50,
        }
    }
}

/// `[uploads]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted attachment in bytes.
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// `[ui]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds a notification stays visible.
    pub notice_seconds: u64,
    /// Draw on the alternate screen.
    pub alt_screen: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_seconds: 4,
            alt_screen: true,
        }
    }
}

impl UiConfig {
    /// Notification lifetime.
    pub fn notice_lifetime(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; stdout belongs to the terminal UI.
    pub file: PathBuf,
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("complaint-desk.log"),
            filter: "complaint_desk=info".to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--backend`
    pub backend: Option<BackendKind>,
    /// `--data-dir`
    pub data_dir: Option<PathBuf>,
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--log-file`
    pub log_file: Option<PathBuf>,
    /// `--no-alt-screen`
    pub no_alt_screen: bool,
}

impl Config {
    /// Reads and validates a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(|source| DeskError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&s, path)
    }

    /// Parses TOML text; `origin` names the source in errors.
    pub fn parse(s: &str, origin: &Path) -> Result<Self> {
        let cfg: Config = toml::from_str(s).map_err(|source| DeskError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The file at `path` when given, otherwise the defaults; then the
    /// command-line overrides.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::default(),
        };
        cfg.apply(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies command-line values.
    pub fn apply(&mut self, o: Overrides) {
        if let Some(b) = o.backend {
            self.storage.backend = b;
        }
        if let Some(d) = o.data_dir {
            self.storage.data_dir = d;
        }
        if let Some(n) = o.page_size {
            self.listing.page_size = n;
        }
        if let Some(f) = o.log_file {
            self.logging.file = f;
        }
        if o.no_alt_screen {
            self.ui.alt_screen = false;
        }
    }

    /// Rejects values the application cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive: [(&'static str, u64); 4] = [
            ("listing.page_size", self.listing.page_size as u64),
            ("listing.recent_activity", self.listing.recent_activity as u64),
            ("uploads.max_bytes", self.uploads.max_bytes),
            ("ui.notice_seconds", self.ui.notice_seconds),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(DeskError::ConfigValue {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.listing.page_size, 5);
        assert_eq!(cfg.listing.recent_activity, 3);
        assert_eq!(cfg.listing.description_preview, 50);
        assert_eq!(cfg.uploads.max_bytes, 2 * 1024 * 1024);
        assert_eq!(cfg.ui.notice_lifetime(), Duration::from_secs(4));
        assert_eq!(cfg.logging.filter, "complaint_desk=info");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::parse(
            "[storage]\nbackend = \"memory\"\n\n[listing]\npage_size = 10\n",
            Path::new("desk.toml"),
        )
        .unwrap();
        assert_eq!(cfg.storage.backend, BackendKind::Memory);
        assert_eq!(cfg.listing.page_size, 10);
        assert_eq!(cfg.listing.recent_activity, 3);
        assert!(cfg.ui.alt_screen);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = Config::parse("[listing]\npage_size = 0\n", Path::new("desk.toml")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config value for listing.page_size: must be greater than zero"
        );
    }

    #[test]
    fn bad_toml_names_the_file() {
        let err = Config::parse("[listing\n", Path::new("desk.toml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse config desk.toml"));
    }

    #[test]
    fn overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "[ui]\nalt_screen = true\n[listing]\npage_size = 8\n").unwrap();
        let cfg = Config::resolve(
            Some(&path),
            Overrides {
                page_size: Some(3),
                no_alt_screen: true,
                data_dir: Some(PathBuf::from("/tmp/desk")),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(cfg.listing.page_size, 3);
        assert!(!cfg.ui.alt_screen);
        assert_eq!(cfg.storage.data_dir, PathBuf::from("/tmp/desk"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::resolve(Some(Path::new("/no/such/desk.toml")), Overrides::default())
            .unwrap_err();
        assert!(matches!(err, DeskError::ConfigRead { .. }));
    }
}
