use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use super::models::{ApiError, Project, ProjectVersion};
use super::ModrinthApi;
use crate::error::{PublishError, PublishResult};
use crate::request::VersionRequest;

const APP_USER_AGENT: &str = concat!("modship/", env!("CARGO_PKG_VERSION"));

/// Modrinth API over HTTP. Holds one shared client with the token installed
/// as a default header; the token itself is never inspected or refreshed.
#[derive(Debug)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, token: &str) -> PublishResult<Self> {
        let mut default_headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(token)
            .map_err(|_| PublishError::Auth("token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(default_headers)
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_project(&self, slug_or_id: &str) -> PublishResult<Project> {
        let url = format!("{}/project/{}", self.base_url, slug_or_id);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(PublishError::ProjectNotFound(slug_or_id.to_string()));
        }

        let resp = check_status(resp).await?;
        Ok(resp.json::<Project>().await?)
    }
}

/// Map a non-success response onto the error taxonomy, pulling the detail
/// out of the API's error body when one is attached.
async fn check_status(resp: Response) -> PublishResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let detail = match resp.json::<ApiError>().await {
        Ok(body) => format!("{}: {}", body.error, body.description),
        Err(_) => status.to_string(),
    };

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PublishError::Auth(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PublishError::Validation(detail)
        }
        _ => PublishError::Api(format!("{status}: {detail}")),
    })
}

#[async_trait]
impl ModrinthApi for HttpApi {
    async fn resolve_project_id(&self, slug_or_id: &str) -> PublishResult<String> {
        let project = self.fetch_project(slug_or_id).await?;

        // An id-less project payload would violate the API contract.
        if project.id.is_empty() {
            return Err(PublishError::Api(format!(
                "project lookup for {slug_or_id} returned an empty id"
            )));
        }

        debug!("Resolved project {} to id {}", slug_or_id, project.id);
        Ok(project.id)
    }

    async fn resolve_project_id_for_dependency(
        &self,
        slug_or_id: &str,
    ) -> PublishResult<String> {
        self.resolve_project_id(slug_or_id).await
    }

    async fn create_version(&self, request: &VersionRequest) -> PublishResult<ProjectVersion> {
        let url = format!("{}/version", self.base_url);

        let mut form = Form::new().text("data", serde_json::to_string(request)?);
        for (part_name, path) in request.file_parts.iter().zip(&request.files) {
            let bytes = tokio::fs::read(path).await.map_err(|e| PublishError::Io {
                path: path.clone(),
                source: e,
            })?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| part_name.clone());
            form = form.part(part_name.clone(), Part::bytes(bytes).file_name(filename));
        }

        debug!("POST {} with {} file part(s)", url, request.files.len());
        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<ProjectVersion>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_API_URL;

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let api = HttpApi::new("https://api.modrinth.com/v2/", "token").unwrap();
        assert_eq!(api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn control_characters_in_the_token_are_rejected() {
        let err = HttpApi::new(DEFAULT_API_URL, "bad\ntoken").unwrap_err();
        assert!(matches!(err, PublishError::Auth(_)));
    }
}
