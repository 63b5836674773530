use tracing::debug;

use crate::config::PublishConfig;
use crate::env::{BuildEnv, Toolchain, TOOLCHAINS};
use crate::error::{PublishError, PublishResult};

/// Fill in everything the host left unspecified — version number and name,
/// loaders, game versions — from the surrounding build environment, then
/// verify the result is uploadable. Runs exactly once per invocation,
/// before the configuration is frozen.
pub fn resolve_metadata(
    config: &mut PublishConfig,
    env: &dyn BuildEnv,
) -> PublishResult<()> {
    resolve_version_number(config, env)?;
    detect_loaders(config, env)?;
    resolve_game_versions(config, env)?;
    Ok(())
}

fn resolve_version_number(config: &mut PublishConfig, env: &dyn BuildEnv) -> PublishResult<()> {
    if config.version_number.is_none() {
        config.version_number = env.project_version();
    }

    let Some(version_number) = &config.version_number else {
        return Err(PublishError::Configuration(
            "no version number specified".into(),
        ));
    };

    if config.version_name.is_none() {
        config.version_name = Some(version_number.clone());
    }

    Ok(())
}

/// Infer loaders from active toolchains. Only runs when no loaders were
/// configured and detection is enabled; an explicitly set list always passes
/// through untouched.
fn detect_loaders(config: &mut PublishConfig, env: &dyn BuildEnv) -> PublishResult<()> {
    if config.loaders.is_empty() && config.detect_loaders {
        for toolchain in TOOLCHAINS {
            if env.has_toolchain(toolchain) {
                debug!(
                    "Adding loader {} because toolchain {} is active",
                    toolchain.loader(),
                    toolchain
                );
                config.loaders.insert(toolchain.loader().to_string());
            }
        }
    }

    if config.loaders.is_empty() {
        return Err(PublishError::Configuration("no loaders specified".into()));
    }

    Ok(())
}

/// Infer game versions from loader-family fallbacks. Only runs when no game
/// versions were configured; loaders must already be final.
fn resolve_game_versions(config: &mut PublishConfig, env: &dyn BuildEnv) -> PublishResult<()> {
    if config.game_versions.is_empty() {
        if let Some(version) = forge_fallback(config, env)? {
            debug!("Adding fallback game version {} from the Forge toolchain", version);
            config.game_versions.insert(version);
        }

        if let Some(version) = loom_fallback(config, env)? {
            debug!("Adding fallback game version {} from the Loom toolchain", version);
            config.game_versions.insert(version);
        }
    }

    if config.game_versions.is_empty() {
        return Err(PublishError::Configuration(
            "no game versions specified".into(),
        ));
    }

    Ok(())
}

/// The Forge toolchain records the game version it builds against.
/// A toolchain that is active but has nothing recorded is an environment
/// inconsistency, not a skippable miss: uploading without a game version is
/// never valid.
fn forge_fallback(
    config: &PublishConfig,
    env: &dyn BuildEnv,
) -> PublishResult<Option<String>> {
    if !config.loaders.contains("forge") || !env.has_toolchain(Toolchain::Forge) {
        return Ok(None);
    }

    env.forge_game_version().map(Some).ok_or_else(|| {
        PublishError::Configuration(
            "the forge toolchain is active but records no game version".into(),
        )
    })
}

/// Loom-style toolchains (fabric, quilt) pin the game version on the build's
/// `minecraft` dependency declaration.
fn loom_fallback(
    config: &PublishConfig,
    env: &dyn BuildEnv,
) -> PublishResult<Option<String>> {
    let loom_active = (config.loaders.contains("fabric")
        && env.has_toolchain(Toolchain::FabricLoom))
        || (config.loaders.contains("quilt") && env.has_toolchain(Toolchain::QuiltLoom));

    if !loom_active {
        return Ok(None);
    }

    env.pinned_minecraft_version().map(Some).ok_or_else(|| {
        PublishError::Configuration(
            "the loom toolchain is active but pins no minecraft version".into(),
        )
    })
}
