//! Turns a repository pointer into exactly one authenticated
//! [`RepositoryHandle`].

use std::path::{Path, PathBuf};

use crate::config::GithubConfig;
use crate::error::{GithubOpsError, RemoteError, Result};
use crate::git;
use crate::repository::{RepositoryHandle, RepositoryId};

/// What the configured repository string points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryPointer {
    /// An existing local path, expected to be a git working copy.
    Local(PathBuf),
    /// `owner/repo` or a repository URL, looked up on GitHub directly.
    Remote(String),
}

impl RepositoryPointer {
    /// Anything that exists on disk is local; everything else is remote.
    pub fn classify(pointer: &str) -> Self {
        let path = Path::new(pointer);
        if path.exists() {
            RepositoryPointer::Local(path.to_path_buf())
        } else {
            RepositoryPointer::Remote(pointer.to_string())
        }
    }
}

/// Identifier of the single GitHub remote of a local working copy.
pub fn identifier_from_working_copy(path: &Path) -> Result<String> {
    let mut remotes = git::local_remotes(path)?;
    match remotes.len() {
        0 => Err(GithubOpsError::Configuration(format!(
            "No remote configured for the git working copy at {}. \
             Supply an explicit repository identifier (owner/repo) instead",
            path.display()
        ))),
        1 => {
            let remote = remotes.remove(0);
            tracing::debug!(remote = %remote.name, url = %remote.url, "Using the only configured remote");
            Ok(remote.url)
        }
        n => Err(GithubOpsError::Configuration(format!(
            "Ambiguous remote: {} remotes configured for {} ({}). \
             Supply an explicit repository identifier (owner/repo) instead",
            n,
            path.display(),
            remotes
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Resolve the configured repository pointer with the configured credential.
///
/// Fails with a configuration error when no token is available or when a
/// local working copy has zero or several remotes, and with a resolution
/// error when GitHub does not return the repository. Nothing is retried.
pub async fn resolve_repository(config: &GithubConfig) -> Result<RepositoryHandle> {
    let credential = config.credential()?;

    let identifier = match RepositoryPointer::classify(&config.repository) {
        RepositoryPointer::Local(path) => identifier_from_working_copy(&path)?,
        RepositoryPointer::Remote(identifier) => identifier,
    };

    let id = RepositoryId::parse(&identifier).map_err(|message| GithubOpsError::Resolution {
        identifier: identifier.clone(),
        failure: RemoteError::new(None, message),
    })?;

    let client = config.client(&credential)?;
    let handle = RepositoryHandle::fetch(client, &id)
        .await
        .map_err(|failure| {
            tracing::warn!(repo = %id, status = ?failure.status, "Repository lookup failed");
            GithubOpsError::Resolution {
                identifier: id.to_string(),
                failure,
            }
        })?;

    tracing::info!(
        repo = handle.full_name(),
        default_branch = handle.default_branch().unwrap_or("unknown"),
        private = handle
            .metadata()
            .get("private")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
        "Resolved repository"
    );
    Ok(handle)
}
