use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{PublishError, PublishResult};

/// A build output whose location is only known once the producing step has
/// run. `describe` is used in error messages, `resolve` yields the path if
/// the artifact exists by now.
pub trait ArtifactSource: Send + Sync {
    fn describe(&self) -> String;
    fn resolve(&self) -> Option<PathBuf>;
}

/// Reference to a file to upload: either a direct path or a deferred
/// artifact description supplied by the host integration.
pub enum FileRef {
    Path(PathBuf),
    Lazy(Box<dyn ArtifactSource>),
}

impl FileRef {
    fn resolve(&self) -> Option<PathBuf> {
        match self {
            FileRef::Path(path) => Some(path.clone()),
            FileRef::Lazy(source) => source.resolve(),
        }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRef::Path(path) => write!(f, "{}", path.display()),
            FileRef::Lazy(source) => write!(f, "{}", source.describe()),
        }
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileRef({self})")
    }
}

impl From<PathBuf> for FileRef {
    fn from(path: PathBuf) -> Self {
        FileRef::Path(path)
    }
}

impl From<&str> for FileRef {
    fn from(path: &str) -> Self {
        FileRef::Path(PathBuf::from(path))
    }
}

// Config files reference uploads as plain path strings; the lazy form only
// exists for programmatic hosts.
impl<'de> Deserialize<'de> for FileRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(FileRef::Path(PathBuf::deserialize(deserializer)?))
    }
}

/// Resolve every file reference to an existing path, primary first, then the
/// additional files in declaration order. Any miss aborts before a single
/// byte goes over the network; partial file lists are never uploaded.
pub fn resolve_files(
    primary: Option<&FileRef>,
    additional: &[FileRef],
) -> PublishResult<Vec<PathBuf>> {
    let primary_path = primary
        .and_then(FileRef::resolve)
        .filter(|path| path.exists())
        .ok_or_else(|| {
            let shown = primary.map(ToString::to_string).unwrap_or_default();
            PublishError::Configuration(format!("upload file is missing or null: {shown}"))
        })?;

    debug!("Primary upload file: {}", primary_path.display());
    let mut files = vec![primary_path];

    for reference in additional {
        let path = reference
            .resolve()
            .filter(|path| path.exists())
            .ok_or_else(|| {
                PublishError::Configuration(format!("upload file missing: {reference}"))
            })?;
        debug!("Additional upload file: {}", path.display());
        files.push(path);
    }

    Ok(files)
}
