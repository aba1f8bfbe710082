//! Error taxonomy.
//!
//! Three families reach the user: authentication failures are shown
//! verbatim, backend failures are logged and shown as a generic "failed to
//! …" notice, validation failures are raised before any backend call.
//! [`DeskError`] wraps all of them plus the start-up failures of the binary.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the identity provider. The `Display` text is what
/// the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email does not look like an address.
    #[error("The email address is badly formatted.")]
    InvalidEmail,
    /// Password shorter than the provider accepts.
    #[error("Password should be at least 6 characters")]
    WeakPassword,
    /// Sign-up with an email that already has an account.
    #[error("The email address is already in use by another account.")]
    EmailInUse,
    /// Sign-in with an unknown email.
    #[error("There is no user record corresponding to this identifier. The user may have been deleted.")]
    UserNotFound,
    /// Sign-in with the wrong password.
    #[error("The password is invalid or the user does not have a password.")]
    WrongPassword,
    /// The account store could not be read or written.
    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the document store or blob storage.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The addressed document does not exist.
    #[error("no document {id} in {collection}")]
    NotFound {
        /// Collection name.
        collection: &'static str,
        /// Requested id.
        id: String,
    },
    /// The caller may not perform the write.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Reading or writing the store failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// A stored document could not be (de)serialized.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Problems caught locally before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required form field is empty.
    #[error("Please fill all required fields")]
    MissingField(&'static str),
    /// The attachment exceeds the configured limit.
    #[error("Image size should be less than {}", crate::upload::limit_label(*limit))]
    UploadTooLarge {
        /// Size of the file in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
    /// The attachment could not be read.
    #[error("Could not read image {path}: {reason}")]
    UnreadableUpload {
        /// Path typed by the user.
        path: String,
        /// OS error text.
        reason: String,
    },
    /// Edit or delete of a complaint that is no longer pending.
    #[error("Only pending complaints can be changed")]
    NotEditable,
    /// Edit of a complaint filed by someone else.
    #[error("You can only change your own complaints")]
    NotOwner,
    /// A status change attempted without the admin role.
    #[error("Only administrators can update complaints")]
    NotPermitted,
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum DeskError {
    /// See [`AuthError`].
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// See [`BackendError`].
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`crate::config::Config`].
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
    /// A config value is out of range.
    #[error("invalid config value for {key}: {reason}")]
    ConfigValue {
        /// Dotted key, e.g. `listing.page_size`.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Setting up the log file failed.
    #[error("failed to open log file {path}: {source}")]
    Logging {
        /// Log path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The terminal runtime failed.
    #[error("terminal program failed: {0}")]
    Terminal(String),
}

/// Result alias using [`DeskError`].
pub type Result<T, E = DeskError> = std::result::Result<T, E>;

/// Result alias for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_limit_message_is_in_megabytes() {
        let err = ValidationError::UploadTooLarge {
            size: 3 * 1024 * 1024,
            limit: 2 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "Image size should be less than 2MB");
    }

    #[test]
    fn fractional_upload_limit_is_not_rounded_to_zero() {
        let err = ValidationError::UploadTooLarge {
            size: 600 * 1024,
            limit: 512 * 1024,
        };
        assert_eq!(err.to_string(), "Image size should be less than 512.0 KB");
    }

    #[test]
    fn auth_messages_pass_through_desk_error() {
        let err: DeskError = AuthError::EmailInUse.into();
        assert_eq!(
            err.to_string(),
            "The email address is already in use by another account."
        );
    }
}
