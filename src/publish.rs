use serde::Serialize;
use tracing::{debug, error, info};

use crate::api::ModrinthApi;
use crate::config::PublishConfig;
use crate::dependency::map_dependencies;
use crate::env::BuildEnv;
use crate::error::{PublishError, PublishResult};
use crate::files::resolve_files;
use crate::metadata::resolve_metadata;
use crate::request::build_request;

/// Where a publish run currently is. Phases are entered in order and never
/// re-entered; `DebugExit`, `Success` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    ResolvingMetadata,
    BuildingRequest,
    Uploading,
    DebugExit,
    Success,
    Failed,
}

/// Terminal output of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedVersion {
    pub version_id: String,
    pub version_number: String,
    pub project_id: String,
    /// Human-readable version page, derived from the API base URL.
    pub url: String,
}

/// What a run produced: a published version, or nothing because debug mode
/// stopped short of the network.
#[derive(Debug)]
pub enum Outcome {
    Published(PublishedVersion),
    DryRun,
}

/// Top-level control for one upload: resolves metadata, maps dependencies,
/// verifies files, builds the request, and either dumps it (debug mode) or
/// performs the two network calls. One instance runs at most once.
pub struct Publisher<'a> {
    config: Option<PublishConfig>,
    env: &'a dyn BuildEnv,
    api: &'a dyn ModrinthApi,
    phase: Phase,
    published: Option<PublishedVersion>,
}

impl<'a> Publisher<'a> {
    pub fn new(config: PublishConfig, env: &'a dyn BuildEnv, api: &'a dyn ModrinthApi) -> Self {
        Self {
            config: Some(config),
            env,
            api,
            phase: Phase::Start,
            published: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The version published by this instance, if the run succeeded.
    pub fn published(&self) -> Option<&PublishedVersion> {
        self.published.as_ref()
    }

    /// Policy entry point. With `fail_silently` set, any failure is logged
    /// and swallowed; otherwise it is wrapped as fatal and returned.
    pub async fn apply(&mut self) -> PublishResult<Option<PublishedVersion>> {
        let fail_silently = self
            .config
            .as_ref()
            .is_some_and(|config| config.fail_silently);

        match self.publish().await {
            Ok(Outcome::Published(version)) => Ok(Some(version)),
            Ok(Outcome::DryRun) => Ok(None),
            Err(e) if fail_silently => {
                info!("Failed to publish to Modrinth. Check logs for more info.");
                error!("Modrinth upload failed silently: {e}");
                Ok(None)
            }
            Err(e) => Err(PublishError::Fatal(Box::new(e))),
        }
    }

    /// Run the full sequence, returning the raw result. The caller decides
    /// what a failure means; `apply` is the flag-aware wrapper.
    pub async fn publish(&mut self) -> PublishResult<Outcome> {
        match self.run().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.enter(Phase::Failed);
                Err(e)
            }
        }
    }

    async fn run(&mut self) -> PublishResult<Outcome> {
        let mut config = self.config.take().ok_or_else(|| {
            PublishError::Configuration("publish task already ran".into())
        })?;

        self.enter(Phase::ResolvingMetadata);
        resolve_metadata(&mut config, self.env)?;
        let resolved = config.freeze()?;
        let dependencies = map_dependencies(&resolved.dependencies, self.api).await?;
        let files = resolve_files(resolved.upload_file.as_ref(), &resolved.additional_files)?;

        self.enter(Phase::BuildingRequest);
        let request = build_request(&resolved, dependencies, files)?;

        if resolved.debug_mode {
            self.enter(Phase::DebugExit);
            info!(
                "Full data to be sent for upload:\n{}",
                serde_json::to_string_pretty(&request)?
            );
            info!("Debug mode is enabled. Not going to upload this version.");
            return Ok(Outcome::DryRun);
        }

        self.enter(Phase::Uploading);
        let project_id = self.api.resolve_project_id(&resolved.project_id).await?;
        if project_id.is_empty() {
            return Err(PublishError::Api(
                "project id lookup returned an empty id".into(),
            ));
        }
        debug!("Uploading version to project {}", project_id);

        let version = self
            .api
            .create_version(&request.with_project_id(project_id.as_str()))
            .await?;

        self.enter(Phase::Success);
        let url = version_page_url(&resolved.api_url, &project_id, &version.id);
        info!(
            "Successfully published version {} to {} ({}) as version id {}. {}",
            version.version_number, resolved.project_id, project_id, version.id, url
        );

        let published = PublishedVersion {
            version_id: version.id,
            version_number: version.version_number,
            project_id,
            url,
        };
        self.published = Some(published.clone());
        Ok(Outcome::Published(published))
    }

    fn enter(&mut self, phase: Phase) {
        debug!("publish phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

/// Version page for humans, derived from the API base URL: the first
/// `-api`/`api` marker and the `/v2` segment are stripped and the leftover
/// `//.` collapsed, so `https://api.modrinth.com/v2` links under
/// `https://modrinth.com` and `https://staging-api.modrinth.com/v2` under
/// `https://staging.modrinth.com`.
pub fn version_page_url(api_url: &str, project_id: &str, version_id: &str) -> String {
    let mut base = api_url.trim_end_matches('/').to_string();

    if let Some(i) = base.find("-api") {
        base.replace_range(i..i + 4, "");
    } else if let Some(i) = base.find("api") {
        base.replace_range(i..i + 3, "");
    }

    if let Some(i) = base.find("/v2") {
        base.replace_range(i..i + 3, "");
    }

    base = base.replacen("//.", "//", 1);

    format!(
        "{}/project/{}/version/{}",
        base.trim_end_matches('/'),
        project_id,
        version_id
    )
}
