use serde::Deserialize;

/// Build-tool integrations that identify which loader a project targets —
/// strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Toolchain {
    Forge,
    FabricLoom,
    QuiltLoom,
    Sponge,
    Paperweight,
}

/// Fixed detection order. Detection itself is order-independent; a stable
/// order keeps the inferred loader list deterministic.
pub const TOOLCHAINS: [Toolchain; 5] = [
    Toolchain::Forge,
    Toolchain::FabricLoom,
    Toolchain::QuiltLoom,
    Toolchain::Sponge,
    Toolchain::Paperweight,
];

impl Toolchain {
    /// The Modrinth loader name published for projects built with this toolchain.
    pub fn loader(&self) -> &'static str {
        match self {
            Toolchain::Forge => "forge",
            Toolchain::FabricLoom => "fabric",
            Toolchain::QuiltLoom => "quilt",
            Toolchain::Sponge => "sponge",
            Toolchain::Paperweight => "paper",
        }
    }
}

impl std::fmt::Display for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Toolchain::Forge => write!(f, "forge"),
            Toolchain::FabricLoom => write!(f, "fabric-loom"),
            Toolchain::QuiltLoom => write!(f, "quilt-loom"),
            Toolchain::Sponge => write!(f, "sponge"),
            Toolchain::Paperweight => write!(f, "paperweight"),
        }
    }
}

/// Read access to the build environment surrounding an upload.
///
/// One implementation per build-tool ecosystem. The trait only exposes the
/// facts the resolution phase consumes: which toolchains are active, and the
/// fallback values each loader family records.
pub trait BuildEnv: Send + Sync {
    /// Whether the given toolchain is active in this build.
    fn has_toolchain(&self, toolchain: Toolchain) -> bool;

    /// Game version recorded by the Forge toolchain, if any.
    fn forge_game_version(&self) -> Option<String>;

    /// Version pinned on the build's `minecraft` dependency declaration
    /// (Loom-style toolchains keep it on the first declared dependency).
    fn pinned_minecraft_version(&self) -> Option<String>;

    /// The version the build declares for the project itself, used when no
    /// version number is configured.
    fn project_version(&self) -> Option<String>;
}

/// Value-backed environment for hosts that already know their build facts
/// (the CLI config file) and for tests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaticEnv {
    pub toolchains: Vec<Toolchain>,
    pub forge_game_version: Option<String>,
    pub pinned_minecraft_version: Option<String>,
    pub project_version: Option<String>,
}

impl BuildEnv for StaticEnv {
    fn has_toolchain(&self, toolchain: Toolchain) -> bool {
        self.toolchains.contains(&toolchain)
    }

    fn forge_game_version(&self) -> Option<String> {
        self.forge_game_version.clone()
    }

    fn pinned_minecraft_version(&self) -> Option<String> {
        self.pinned_minecraft_version.clone()
    }

    fn project_version(&self) -> Option<String> {
        self.project_version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_toolchain_maps_to_a_loader_name() {
        let loaders: Vec<&str> = TOOLCHAINS.iter().map(Toolchain::loader).collect();
        assert_eq!(loaders, ["forge", "fabric", "quilt", "sponge", "paper"]);
    }

    #[test]
    fn static_env_reports_configured_toolchains() {
        let env = StaticEnv {
            toolchains: vec![Toolchain::FabricLoom],
            ..StaticEnv::default()
        };
        assert!(env.has_toolchain(Toolchain::FabricLoom));
        assert!(!env.has_toolchain(Toolchain::Forge));
    }

    #[test]
    fn toolchain_deserializes_from_kebab_case() {
        let t: Toolchain = serde_json::from_str("\"fabric-loom\"").unwrap();
        assert_eq!(t, Toolchain::FabricLoom);
    }
}
