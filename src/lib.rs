// ─── modship ───
// Publishes a build artifact as a new version of a Modrinth project.
//
// Architecture:
//   config.rs     — draft configuration + frozen snapshot
//   env.rs        — build-environment capability boundary
//   metadata.rs   — loader detection + game-version fallbacks
//   dependency.rs — proto-dependency mapping
//   files.rs      — upload file resolution
//   request.rs    — immutable version request + pure builder
//   api/          — Modrinth API trait, wire models, HTTP client
//   publish.rs    — orchestration, debug short-circuit, error policy

pub mod api;
pub mod config;
pub mod dependency;
pub mod env;
pub mod error;
pub mod files;
pub mod metadata;
pub mod publish;
pub mod request;

pub use api::{HttpApi, ModrinthApi, DEFAULT_API_URL, STAGING_API_URL};
pub use config::{NamedDependencies, PublishConfig, ResolvedConfig};
pub use dependency::{DependencySpec, DependencyType, VersionDependency};
pub use env::{BuildEnv, StaticEnv, Toolchain};
pub use error::{PublishError, PublishResult};
pub use files::{ArtifactSource, FileRef};
pub use publish::{Outcome, Phase, PublishedVersion, Publisher};
pub use request::{VersionRequest, VersionType};
