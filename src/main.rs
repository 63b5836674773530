use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use modship::{HttpApi, PublishConfig, Publisher, StaticEnv};

/// Publish a build artifact as a new version of a Modrinth project.
#[derive(Debug, Parser)]
#[command(name = "modship", version)]
struct Cli {
    /// Path to the publish configuration file.
    #[arg(short, long, default_value = "modship.toml")]
    config: PathBuf,

    /// Build and print the upload request without uploading.
    #[arg(long)]
    debug: bool,
}

/// On-disk configuration: the publish fields at the top level, plus an
/// optional `[environment]` table describing the surrounding build.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    publish: PublishConfig,
    #[serde(default)]
    environment: StaticEnv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("failed to read {}", cli.config.display()))?;
    let file: ConfigFile = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {}", cli.config.display()))?;

    let mut config = file.publish;
    if cli.debug {
        config.debug_mode = true;
    }

    // Project and dependency lookups work unauthenticated; the token is
    // only mandatory once a version is actually created.
    let token = std::env::var("MODRINTH_TOKEN").unwrap_or_default();
    if token.is_empty() && !config.debug_mode {
        anyhow::bail!("MODRINTH_TOKEN is not set");
    }

    let api = HttpApi::new(config.api_url.clone(), &token)?;
    let env = file.environment;

    Publisher::new(config, &env, &api).apply().await?;
    Ok(())
}
