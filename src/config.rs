//! Process-wide configuration: which repository to target, how to
//! authenticate, and where the GitHub API lives.

use std::fmt;

use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;

use crate::error::{GithubOpsError, Result};

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// An opaque GitHub token. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Resolve the token: an explicit value wins, then the named environment
    /// variable. Empty values count as absent.
    pub fn resolve(explicit: Option<&str>, env_name: &str) -> Result<Self> {
        if let Some(token) = explicit.filter(|t| !t.is_empty()) {
            return Ok(Self(token.to_string()));
        }
        match std::env::var(env_name) {
            Ok(token) if !token.is_empty() => {
                tracing::info!(env = env_name, "Read GitHub token from environment variable");
                Ok(Self(token))
            }
            _ => Err(GithubOpsError::Configuration(format!(
                "GitHub token is required. Pass --token or set the {} environment variable",
                env_name
            ))),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Immutable settings every operation is constructed from.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Local working-copy path, `owner/repo`, or repository URL.
    pub repository: String,
    pub token: Option<String>,
    pub token_env: String,
    /// Override for the GitHub API base (GitHub Enterprise, test servers).
    pub api_url: Option<String>,
    /// Cap applied to listing operations that do not pass `max_results`.
    pub max_results: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repository: ".".to_string(),
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            api_url: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl GithubConfig {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_token_env(mut self, env_name: impl Into<String>) -> Self {
        self.token_env = env_name.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn credential(&self) -> Result<Credential> {
        Credential::resolve(self.token.as_deref(), &self.token_env)
    }

    /// Build an authenticated client. Transport retries are disabled so that
    /// a create request is sent at most once.
    pub fn client(&self, credential: &Credential) -> Result<Octocrab> {
        let mut builder = octocrab::OctocrabBuilder::new()
            .personal_token(credential.expose().to_string())
            .add_retry_config(RetryConfig::None);
        if let Some(ref api_url) = self.api_url {
            builder = builder.base_uri(api_url.as_str()).map_err(|e| {
                GithubOpsError::Configuration(format!("Invalid GitHub API URL '{}': {}", api_url, e))
            })?;
        }
        builder.build().map_err(|e| {
            GithubOpsError::Configuration(format!("Failed to create GitHub client: {}", e))
        })
    }
}
