use indexmap::IndexSet;
use serde::Deserialize;

use crate::api::DEFAULT_API_URL;
use crate::dependency::{DependencySpec, DependencyType};
use crate::error::{PublishError, PublishResult};
use crate::files::FileRef;

/// Dependencies declared by slug or id, grouped per relationship — the
/// convenience form next to the raw `extra_dependencies` list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedDependencies {
    pub required: Vec<String>,
    pub optional: Vec<String>,
    pub incompatible: Vec<String>,
    pub embedded: Vec<String>,
}

impl NamedDependencies {
    /// Expand into proto-dependencies, in required/optional/incompatible/
    /// embedded order.
    pub fn to_specs(&self) -> Vec<DependencySpec> {
        let groups = [
            (&self.required, DependencyType::Required),
            (&self.optional, DependencyType::Optional),
            (&self.incompatible, DependencyType::Incompatible),
            (&self.embedded, DependencyType::Embedded),
        ];

        groups
            .into_iter()
            .flat_map(|(projects, ty)| {
                projects
                    .iter()
                    .map(move |project| DependencySpec::project(project, ty))
            })
            .collect()
    }
}

/// Publish configuration as supplied by the host, before resolution.
///
/// `loaders`, `game_versions`, `version_number` and `version_name` may be
/// left empty and are filled in from the build environment during the
/// resolution phase; everything else is read-only from the start.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Project slug or id on Modrinth.
    pub project_id: String,
    pub version_name: Option<String>,
    pub version_number: Option<String>,
    pub changelog: String,
    /// `release`, `beta` or `alpha`, matched case-insensitively.
    pub version_type: String,
    pub game_versions: IndexSet<String>,
    pub loaders: IndexSet<String>,
    pub dependencies: NamedDependencies,
    pub extra_dependencies: Vec<DependencySpec>,
    pub upload_file: Option<FileRef>,
    pub additional_files: Vec<FileRef>,
    pub detect_loaders: bool,
    pub debug_mode: bool,
    pub fail_silently: bool,
    pub api_url: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            version_name: None,
            version_number: None,
            changelog: "No changelog was specified.".to_string(),
            version_type: "release".to_string(),
            game_versions: IndexSet::new(),
            loaders: IndexSet::new(),
            dependencies: NamedDependencies::default(),
            extra_dependencies: Vec::new(),
            upload_file: None,
            additional_files: Vec::new(),
            detect_loaders: true,
            debug_mode: false,
            fail_silently: false,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl PublishConfig {
    /// All declared proto-dependencies, named tables first, raw list after,
    /// declaration order preserved.
    pub fn all_dependencies(&self) -> Vec<DependencySpec> {
        let mut specs = self.dependencies.to_specs();
        specs.extend(self.extra_dependencies.iter().cloned());
        specs
    }

    /// Convert the resolved draft into the immutable snapshot consumed by
    /// the request builder. Nothing mutates configuration past this point.
    pub fn freeze(self) -> PublishResult<ResolvedConfig> {
        if self.project_id.trim().is_empty() {
            return Err(PublishError::Configuration(
                "no project id specified".into(),
            ));
        }

        let dependencies = self.all_dependencies();

        let version_number = self.version_number.ok_or_else(|| {
            PublishError::Configuration("no version number specified".into())
        })?;

        let version_name = self
            .version_name
            .unwrap_or_else(|| version_number.clone());

        Ok(ResolvedConfig {
            project_id: self.project_id,
            version_name,
            version_number,
            changelog: self.changelog,
            version_type: self.version_type,
            game_versions: self.game_versions.into_iter().collect(),
            loaders: self.loaders.into_iter().collect(),
            dependencies,
            upload_file: self.upload_file,
            additional_files: self.additional_files,
            debug_mode: self.debug_mode,
            fail_silently: self.fail_silently,
            api_url: self.api_url,
        })
    }
}

/// Frozen view of the configuration after the resolution phase.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub project_id: String,
    pub version_name: String,
    pub version_number: String,
    pub changelog: String,
    pub version_type: String,
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    pub dependencies: Vec<DependencySpec>,
    pub upload_file: Option<FileRef>,
    pub additional_files: Vec<FileRef>,
    pub debug_mode: bool,
    pub fail_silently: bool,
    pub api_url: String,
}
