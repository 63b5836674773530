// ─── Modrinth v2 wire models ───
// The subset of the API schema this crate reads back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project fields returned by `GET /project/{id|slug}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A published version, as returned by `POST /version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub version_number: String,
    #[serde(default)]
    pub changelog: Option<String>,
    pub version_type: String,
    pub date_published: DateTime<Utc>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
}

/// One uploaded file of a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub hashes: FileHashes,
}

/// Server-computed digests; never calculated locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileHashes {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha512: Option<String>,
}

/// Error body the API attaches to 4xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_project_version() {
        let json = r#"{
            "id": "IQ3UGSc2",
            "project_id": "AANobbMI",
            "name": "Sodium 0.5.8",
            "version_number": "mc1.20.4-0.5.8",
            "version_type": "release",
            "date_published": "2024-02-08T17:31:49.520801Z",
            "files": [{
                "url": "https://cdn.modrinth.com/data/AANobbMI/versions/IQ3UGSc2/sodium.jar",
                "filename": "sodium.jar",
                "primary": true,
                "size": 1219119,
                "hashes": { "sha1": "abc", "sha512": "def" }
            }]
        }"#;

        let version: ProjectVersion = serde_json::from_str(json).unwrap();

        assert_eq!(version.id, "IQ3UGSc2");
        assert_eq!(version.project_id, "AANobbMI");
        assert_eq!(version.files.len(), 1);
        assert!(version.files[0].primary);
        assert_eq!(version.files[0].hashes.sha1.as_deref(), Some("abc"));
    }

    #[test]
    fn deserialize_api_error_body() {
        let json = r#"{"error":"invalid_input","description":"Version number already exists"}"#;
        let err: ApiError = serde_json::from_str(json).unwrap();
        assert_eq!(err.error, "invalid_input");
        assert!(err.description.contains("already exists"));
    }
}
