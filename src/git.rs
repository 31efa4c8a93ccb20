//! Reads remote configuration from a local git working copy.

use std::path::Path;

use crate::error::{GithubOpsError, Result};

/// A configured remote of a local working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub url: String,
}

/// List the remotes configured on the working copy at `path`. Every
/// configured remote is either returned or reported as an error.
pub fn local_remotes(path: &Path) -> Result<Vec<RemoteEntry>> {
    let repo = git2::Repository::open(path).map_err(|e| {
        GithubOpsError::Configuration(format!(
            "{} is not a git working copy: {}",
            path.display(),
            e.message()
        ))
    })?;

    let names = repo.remotes().map_err(|e| {
        GithubOpsError::Configuration(format!("Failed to read git remotes: {}", e.message()))
    })?;

    let mut remotes = Vec::with_capacity(names.len());
    for name in names.iter().flatten() {
        let remote = repo.find_remote(name).map_err(|e| {
            GithubOpsError::Configuration(format!(
                "Failed to read git remote '{}': {}",
                name,
                e.message()
            ))
        })?;
        let url = remote.url().ok_or_else(|| {
            GithubOpsError::Configuration(format!(
                "Git remote '{}' has a URL that is not valid UTF-8",
                name
            ))
        })?;
        remotes.push(RemoteEntry {
            name: name.to_string(),
            url: url.to_string(),
        });
    }
    Ok(remotes)
}
