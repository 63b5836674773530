pub mod http;
pub mod models;

use async_trait::async_trait;

use crate::error::PublishResult;
use crate::request::VersionRequest;

pub use http::HttpApi;
pub use models::{ApiError, FileHashes, Project, ProjectVersion, VersionFile};

/// Production Modrinth API.
pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";
/// Staging environment, useful with `debug_mode` off but test data on.
pub const STAGING_API_URL: &str = "https://staging-api.modrinth.com/v2";

/// Everything the publish pipeline needs from the remote service. One
/// implementation talks HTTP; tests implement it in memory.
#[async_trait]
pub trait ModrinthApi: Send + Sync {
    /// Canonical project id for a slug or id.
    async fn resolve_project_id(&self, slug_or_id: &str) -> PublishResult<String>;

    /// Same lookup, used while mapping declared dependencies.
    async fn resolve_project_id_for_dependency(&self, slug_or_id: &str)
        -> PublishResult<String>;

    /// Upload the new version and its files.
    async fn create_version(&self, request: &VersionRequest) -> PublishResult<ProjectVersion>;
}
