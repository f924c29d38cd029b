use std::path::{Component, Path, PathBuf};

use crate::error::{ClowderError, Result};
use crate::transport::UploadPayload;

/// How a local file reaches the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// The service can read the path itself; only the path is sent.
    PathReference(PathBuf),
    /// The file's bytes are sent in the request.
    Stream(PathBuf),
}

/// Pick the upload source for `path` given the server-local allow-list.
/// Prefixes match whole path components, after `.` and `..` are resolved on
/// both sides.
pub fn select_upload_source(path: &Path, local_paths: &[PathBuf]) -> UploadSource {
    let path = lexical_normalize(path);
    if local_paths
        .iter()
        .any(|prefix| path.starts_with(lexical_normalize(prefix)))
    {
        UploadSource::PathReference(path)
    } else {
        UploadSource::Stream(path)
    }
}

/// Resolve `.` and `..` without touching the filesystem. `..` at the root
/// stays at the root.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last().copied() {
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | None => components.push(component),
                Some(_) => {
                    components.pop();
                }
            },
            _ => components.push(component),
        }
    }
    components.iter().collect()
}

/// Base name used to detect duplicates and to name streamed uploads.
pub fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClowderError::LocalPath {
            path: path.to_path_buf(),
        })
}

/// Absolute, lexically normalized form of `path`. Symlinks are not resolved.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(lexical_normalize(path));
    }
    std::env::current_dir()
        .map(|cwd| lexical_normalize(&cwd.join(path)))
        .map_err(|source| ClowderError::Io {
            path: path.to_path_buf(),
            source,
        })
}

impl UploadSource {
    /// Read whatever the request needs.
    pub async fn into_payload(self) -> Result<UploadPayload> {
        match self {
            UploadSource::PathReference(path) => Ok(UploadPayload::PathReference {
                path: path.to_string_lossy().into_owned(),
            }),
            UploadSource::Stream(path) => {
                let file_name = file_name(&path)?;
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|source| ClowderError::Io { path, source })?;
                Ok(UploadPayload::Bytes { file_name, data })
            }
        }
    }
}
