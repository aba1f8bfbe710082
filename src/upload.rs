//! Image attachments for complaints.
//!
//! An attachment is checked twice: when the user picks the file (so the form
//! can show its name and size, or reject it at once) and again right before
//! the upload. Both checks happen before any backend call.

use crate::domain::UserId;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Path on disk.
    pub path: PathBuf,
    /// File name without directories.
    pub file_name: String,
    /// Size in bytes at inspection time.
    pub size: u64,
}

impl Attachment {
    /// Preview line: file name and human-readable size.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.file_name, human_size(self.size))
    }
}

/// Checks that `path` names a readable file of at most `limit` bytes.
pub async fn inspect(path: &str, limit: u64) -> Result<Attachment, ValidationError> {
    let trimmed = path.trim();
    let unreadable = |reason: String| ValidationError::UnreadableUpload {
        path: trimmed.to_string(),
        reason,
    };

    let meta = tokio::fs::metadata(trimmed)
        .await
        .map_err(|e| unreadable(e.to_string()))?;
    if !meta.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }
    check_size(meta.len(), limit)?;

    let path = PathBuf::from(trimmed);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(Attachment {
        path,
        file_name,
        size: meta.len(),
    })
}

/// Reads an attachment, re-checking its size against `limit`.
pub async fn read(attachment: &Attachment, limit: u64) -> Result<Vec<u8>, ValidationError> {
    let current = inspect(&attachment.path.to_string_lossy(), limit).await?;
    let bytes = tokio::fs::read(&current.path)
        .await
        .map_err(|e| ValidationError::UnreadableUpload {
            path: current.path.display().to_string(),
            reason: e.to_string(),
        })?;
    check_size(bytes.len() as u64, limit)?;
    Ok(bytes)
}

/// Rejects sizes over `limit`.
pub fn check_size(size: u64, limit: u64) -> Result<(), ValidationError> {
    if size > limit {
        tracing::warn!(size, limit, "attachment rejected");
        return Err(ValidationError::UploadTooLarge { size, limit });
    }
    Ok(())
}

/// Storage path of an upload: `complaints/<uid>/<millis>_<file name>`.
pub fn blob_path(owner: &UserId, at: DateTime<Utc>, file_name: &str) -> String {
    format!(
        "complaints/{}/{}_{}",
        owner,
        at.timestamp_millis(),
        safe_file_name(file_name)
    )
}

/// Replaces anything outside `[A-Za-z0-9._-]` with `_` and strips leading
/// dots, so the name can never climb out of its directory.
pub fn safe_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Formats a byte count as `B`, `KB` or `MB`.
pub fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Upload limit as shown to users: whole megabytes as `2MB`, anything else
/// through [`human_size`].
pub fn limit_label(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        human_size(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LIMIT: u64 = 2 * 1024 * 1024;

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leak.png");
        std::fs::write(&path, vec![0u8; 3 * 1024 * 1024]).unwrap();

        let err = inspect(path.to_str().unwrap(), LIMIT).await.unwrap_err();
        assert_eq!(err.to_string(), "Image size should be less than 2MB");
    }

    #[tokio::test]
    async fn small_file_is_accepted_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tap.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let att = inspect(&format!(" {} ", path.display()), LIMIT).await.unwrap();
        assert_eq!(att.file_name, "tap.jpg");
        assert_eq!(att.summary(), "tap.jpg (4 B)");
        assert_eq!(read(&att, LIMIT).await.unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn file_grown_after_inspection_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grow.png");
        std::fs::write(&path, b"x").unwrap();
        let att = inspect(path.to_str().unwrap(), 10).await.unwrap();

        std::fs::write(&path, vec![0u8; 11]).unwrap();
        assert!(matches!(
            read(&att, 10).await,
            Err(ValidationError::UploadTooLarge { size: 11, limit: 10 })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let err = inspect("/definitely/not/here.png", LIMIT).await.unwrap_err();
        assert!(matches!(err, ValidationError::UnreadableUpload { .. }));
    }

    #[test]
    fn blob_paths_are_scoped_and_safe() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let path = blob_path(&UserId("u1".into()), at, "../my photo.png");
        assert_eq!(path, "complaints/u1/1700000000123_my_photo.png");
        assert_eq!(safe_file_name(".."), "image");
        assert_eq!(safe_file_name(".hidden"), "hidden");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(limit_label(2 * 1024 * 1024), "2MB");
        assert_eq!(limit_label(512 * 1024), "512.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
