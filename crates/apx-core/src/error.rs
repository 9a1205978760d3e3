//! Error types shared by the generate, validate, and deploy stages.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while building, validating, or deploying a bundle.
///
/// Nothing is recovered locally: every failure propagates up to the
/// frontend dispatcher, which reports it and exits non-zero.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file does not exist
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration key absent when first accessed
    #[error("missing configuration key: {key}")]
    MissingKey { key: String },

    /// Template file does not exist
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// A policy listed in the active category has no template file
    #[error("template for policy '{policy}' not found: {}", path.display())]
    PolicyTemplateMissing { policy: String, path: PathBuf },

    /// Strict rendering hit a placeholder with no substitution
    #[error("unresolved placeholder: ${name}")]
    UnresolvedPlaceholder { name: String },

    /// Strict rendering hit a dangling `$` or unterminated `${`
    #[error("malformed placeholder at byte {offset}")]
    MalformedPlaceholder { offset: usize },

    /// Any failure while writing the bundle archive
    #[error("archive error for {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// Bundle archive absent at its workspace-resolved path
    #[error("bundle archive not found: {}", path.display())]
    ArchiveNotFound { path: PathBuf },

    /// Validation endpoint returned a non-success status
    #[error("validation failed with HTTP {status}: {body}")]
    ValidationFailed { status: u16, body: String },

    /// Build tool exited non-zero
    #[error("deployment failed ({status}): {stderr}")]
    DeploymentFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Wrap any failure encountered while producing an archive.
    pub(crate) fn archive(path: &Path, err: impl std::fmt::Display) -> Self {
        Error::Archive {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for bundle operations.
pub type Result<T> = std::result::Result<T, Error>;
