use serde::{Deserialize, Serialize};

use crate::api::ModrinthApi;
use crate::error::{PublishError, PublishResult};

/// Relationship between the uploaded version and another project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Incompatible,
    Embedded,
}

/// User-declared, unresolved reference to another project's version or file.
///
/// At least one of `project`, `version`, `file_name` must be present; a
/// `project` reference may be a slug or an id and is canonicalized against
/// the API at mapping time.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencySpec {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
}

impl DependencySpec {
    /// A dependency on a whole project, by slug or id.
    pub fn project(slug_or_id: impl Into<String>, dependency_type: DependencyType) -> Self {
        Self {
            project: Some(slug_or_id.into()),
            version: None,
            file_name: None,
            dependency_type,
        }
    }

    /// A dependency on a specific version, by version id or number.
    pub fn version(version: impl Into<String>, dependency_type: DependencyType) -> Self {
        Self {
            project: None,
            version: Some(version.into()),
            file_name: None,
            dependency_type,
        }
    }

    /// A dependency on a raw file name.
    pub fn file(file_name: impl Into<String>, dependency_type: DependencyType) -> Self {
        Self {
            project: None,
            version: None,
            file_name: Some(file_name.into()),
            dependency_type,
        }
    }
}

/// Resolved dependency record in the shape the `create version` call accepts.
/// At least one identifying field is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDependency {
    pub project_id: Option<String>,
    pub version_id: Option<String>,
    pub file_name: Option<String>,
    pub dependency_type: DependencyType,
}

/// Convert declared dependencies into service-recognized records, preserving
/// order. Project references are canonicalized through the API; version and
/// file references pass through untouched. Any lookup failure aborts the run.
pub async fn map_dependencies(
    specs: &[DependencySpec],
    api: &dyn ModrinthApi,
) -> PublishResult<Vec<VersionDependency>> {
    let mut resolved = Vec::with_capacity(specs.len());

    for spec in specs {
        if spec.project.is_none() && spec.version.is_none() && spec.file_name.is_none() {
            return Err(PublishError::Configuration(
                "dependency must name a project, version, or file".into(),
            ));
        }

        let project_id = match &spec.project {
            Some(reference) => {
                let id = api
                    .resolve_project_id_for_dependency(reference)
                    .await
                    .map_err(|e| PublishError::DependencyResolution {
                        project: reference.clone(),
                        source: Box::new(e),
                    })?;
                Some(id)
            }
            None => None,
        };

        resolved.push(VersionDependency {
            project_id,
            version_id: spec.version.clone(),
            file_name: spec.file_name.clone(),
            dependency_type: spec.dependency_type,
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProjectVersion;
    use crate::request::VersionRequest;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeApi {
        projects: HashMap<&'static str, &'static str>,
    }

    #[async_trait]
    impl ModrinthApi for FakeApi {
        async fn resolve_project_id(&self, slug_or_id: &str) -> PublishResult<String> {
            self.resolve_project_id_for_dependency(slug_or_id).await
        }

        async fn resolve_project_id_for_dependency(
            &self,
            slug_or_id: &str,
        ) -> PublishResult<String> {
            self.projects
                .get(slug_or_id)
                .map(|id| (*id).to_string())
                .ok_or_else(|| PublishError::ProjectNotFound(slug_or_id.to_string()))
        }

        async fn create_version(
            &self,
            _request: &VersionRequest,
        ) -> PublishResult<ProjectVersion> {
            unreachable!("dependency mapping never creates versions")
        }
    }

    fn api_with_sodium() -> FakeApi {
        FakeApi {
            projects: HashMap::from([("sodium", "AANobbMI")]),
        }
    }

    #[tokio::test]
    async fn slug_and_file_dependencies_resolve_in_order() {
        let specs = vec![
            DependencySpec::project("sodium", DependencyType::Required),
            DependencySpec::file("lib.jar", DependencyType::Embedded),
        ];

        let resolved = map_dependencies(&specs, &api_with_sodium()).await.unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].project_id.as_deref(), Some("AANobbMI"));
        assert_eq!(resolved[0].version_id, None);
        assert_eq!(resolved[0].file_name, None);
        assert_eq!(resolved[1].project_id, None);
        assert_eq!(resolved[1].version_id, None);
        assert_eq!(resolved[1].file_name.as_deref(), Some("lib.jar"));
        assert_eq!(resolved[1].dependency_type, DependencyType::Embedded);
    }

    #[tokio::test]
    async fn version_reference_passes_through_unresolved() {
        let specs = vec![DependencySpec::version("IQ3UGSc2", DependencyType::Optional)];

        let resolved = map_dependencies(&specs, &api_with_sodium()).await.unwrap();

        assert_eq!(resolved[0].version_id.as_deref(), Some("IQ3UGSc2"));
        assert_eq!(resolved[0].project_id, None);
    }

    #[tokio::test]
    async fn unknown_project_aborts_the_mapping() {
        let specs = vec![DependencySpec::project("no-such-mod", DependencyType::Required)];

        let err = map_dependencies(&specs, &api_with_sodium())
            .await
            .unwrap_err();

        match err {
            PublishError::DependencyResolution { project, .. } => {
                assert_eq!(project, "no-such-mod");
            }
            other => panic!("expected DependencyResolution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_dependency_is_a_configuration_error() {
        let specs = vec![DependencySpec {
            project: None,
            version: None,
            file_name: None,
            dependency_type: DependencyType::Required,
        }];

        let err = map_dependencies(&specs, &api_with_sodium())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Configuration(_)));
    }

    #[test]
    fn dependency_type_serializes_lowercase() {
        let json = serde_json::to_string(&DependencyType::Incompatible).unwrap();
        assert_eq!(json, "\"incompatible\"");
    }
}
