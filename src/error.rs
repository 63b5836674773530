use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the whole publishing pipeline.
/// Every module returns `PublishResult<T>`.
#[derive(Debug, Error)]
pub enum PublishError {
    // ── Configuration ───────────────────────────────────
    #[error("configuration error: {0}")]
    Configuration(String),

    // ── Dependencies ────────────────────────────────────
    #[error("cannot resolve dependency on project {project}: {source}")]
    DependencyResolution {
        project: String,
        source: Box<PublishError>,
    },

    // ── API ─────────────────────────────────────────────
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Modrinth rejected the version: {0}")]
    Validation(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("unexpected API response: {0}")]
    Api(String),

    // ── IO / JSON ───────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Policy ──────────────────────────────────────────
    /// Wrapper applied when a run fails and `fail_silently` is off.
    /// The display includes the cause so build logs show the real reason.
    #[error("failed to publish version to Modrinth: {0}")]
    Fatal(#[source] Box<PublishError>),
}

/// Convenience alias used throughout the crate.
pub type PublishResult<T> = Result<T, PublishError>;
