use std::path::PathBuf;

use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::dependency::VersionDependency;
use crate::error::{PublishError, PublishResult};

/// Release channel of an uploaded version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    Release,
    Beta,
    Alpha,
}

impl VersionType {
    /// Case-insensitive parse of the configured channel string.
    pub fn parse(value: &str) -> PublishResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "release" => Ok(VersionType::Release),
            "beta" => Ok(VersionType::Beta),
            "alpha" => Ok(VersionType::Alpha),
            _ => Err(PublishError::Configuration(format!(
                "invalid version type: {value}"
            ))),
        }
    }
}

/// The complete `create version` request: the JSON `data` part plus the
/// files that become the multipart file parts. Built once per invocation
/// and never mutated; `with_project_id` derives the single wire copy with
/// the canonical project id substituted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionRequest {
    pub project_id: String,
    pub version_number: String,
    pub name: String,
    pub changelog: String,
    pub version_type: VersionType,
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    pub dependencies: Vec<VersionDependency>,
    pub file_parts: Vec<String>,
    pub primary_file: String,
    /// Local paths backing `file_parts`, same order. Not part of the JSON.
    #[serde(skip)]
    pub files: Vec<PathBuf>,
}

impl VersionRequest {
    /// Derive the request actually sent over the wire, with the canonical
    /// project id in place of the configured slug.
    pub fn with_project_id(&self, project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..self.clone()
        }
    }
}

/// Collapse Windows line endings; the service expects `\n` only.
/// Idempotent — normalizing twice changes nothing.
fn normalize_changelog(changelog: &str) -> String {
    changelog.replace("\r\n", "\n")
}

/// Assemble the upload request from the frozen configuration and the
/// resolved dependency and file lists. Pure: no network, no filesystem,
/// structurally equal output for equal input.
pub fn build_request(
    config: &ResolvedConfig,
    dependencies: Vec<VersionDependency>,
    files: Vec<PathBuf>,
) -> PublishResult<VersionRequest> {
    let version_type = VersionType::parse(&config.version_type)?;

    let file_parts: Vec<String> = (0..files.len()).map(|i| format!("file_{i}")).collect();
    let primary_file = "file_0".to_string();

    Ok(VersionRequest {
        project_id: config.project_id.clone(),
        version_number: config.version_number.clone(),
        name: config.version_name.clone(),
        changelog: normalize_changelog(&config.changelog),
        version_type,
        game_versions: config.game_versions.clone(),
        loaders: config.loaders.clone(),
        dependencies,
        file_parts,
        primary_file,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublishConfig;

    fn draft() -> PublishConfig {
        let mut config = PublishConfig {
            project_id: "my-mod".into(),
            version_number: Some("1.0.0".into()),
            ..PublishConfig::default()
        };
        config.loaders.insert("fabric".to_string());
        config.game_versions.insert("1.20.1".to_string());
        config
    }

    fn resolved_config() -> ResolvedConfig {
        draft().freeze().unwrap()
    }

    #[test]
    fn changelog_crlf_collapses_to_lf() {
        let config = PublishConfig {
            changelog: "Added things\r\nFixed things\r\n".to_string(),
            ..draft()
        }
        .freeze()
        .unwrap();

        let request = build_request(&config, vec![], vec![PathBuf::from("mod.jar")]).unwrap();

        assert_eq!(request.changelog, "Added things\nFixed things\n");
        assert!(!request.changelog.contains("\r\n"));
    }

    #[test]
    fn changelog_normalization_is_idempotent() {
        let once = normalize_changelog("a\r\nb");
        let twice = normalize_changelog(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn version_type_matches_case_insensitively() {
        assert_eq!(VersionType::parse("BETA").unwrap(), VersionType::Beta);
        assert_eq!(VersionType::parse("Release").unwrap(), VersionType::Release);
        assert_eq!(VersionType::parse("alpha").unwrap(), VersionType::Alpha);
    }

    #[test]
    fn unknown_version_type_is_a_configuration_error() {
        let config = PublishConfig {
            version_type: "nightly".to_string(),
            ..draft()
        }
        .freeze()
        .unwrap();

        let err = build_request(&config, vec![], vec![PathBuf::from("mod.jar")]).unwrap_err();

        match err {
            PublishError::Configuration(msg) => {
                assert!(msg.contains("invalid version type"), "{msg}");
                assert!(msg.contains("nightly"), "{msg}");
            }
            other => panic!("expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn building_twice_yields_structurally_equal_requests() {
        let config = resolved_config();
        let files = vec![PathBuf::from("mod.jar"), PathBuf::from("sources.jar")];

        let a = build_request(&config, vec![], files.clone()).unwrap();
        let b = build_request(&config, vec![], files).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn file_parts_name_every_file_with_the_first_primary() {
        let config = resolved_config();
        let files = vec![PathBuf::from("mod.jar"), PathBuf::from("sources.jar")];

        let request = build_request(&config, vec![], files).unwrap();

        assert_eq!(request.file_parts, ["file_0", "file_1"]);
        assert_eq!(request.primary_file, "file_0");
    }

    #[test]
    fn with_project_id_only_touches_the_project_id() {
        let config = resolved_config();
        let request = build_request(&config, vec![], vec![PathBuf::from("mod.jar")]).unwrap();

        let wire = request.with_project_id("AANobbMI");

        assert_eq!(wire.project_id, "AANobbMI");
        assert_eq!(wire.version_number, request.version_number);
        assert_eq!(wire.files, request.files);
    }

    #[test]
    fn serialized_data_part_omits_local_paths() {
        let config = resolved_config();
        let request = build_request(&config, vec![], vec![PathBuf::from("mod.jar")]).unwrap();

        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("files").is_none());
        assert_eq!(json["primary_file"], "file_0");
        assert_eq!(json["version_type"], "release");
    }
}
