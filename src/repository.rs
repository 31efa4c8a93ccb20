//! The authenticated handle to one GitHub repository and the small set of
//! transport calls operations are allowed to make through it.

use std::fmt;
use std::sync::Arc;

use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::RemoteError;

/// `owner/name` of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl RepositoryId {
    /// Parse `owner/repo`, an SSH remote (`git@github.com:owner/repo.git`) or
    /// an HTTPS URL (`https://github.com/owner/repo`).
    ///
    /// For `http(s)` URLs owner and name are the first two path segments, so
    /// a pasted `.../owner/repo/pull/1` still names the repository. Otherwise
    /// the repository path is whatever follows the last colon, and of that
    /// path the last two non-empty segments are owner and name.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        let segments: Vec<String> = match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url
                .path_segments()
                .map(|segments| {
                    segments
                        .filter(|s| !s.is_empty())
                        .take(2)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            _ => {
                let path = trimmed.rsplit(':').next().unwrap_or(trimmed);
                let all: Vec<&str> = path
                    .split('/')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                all[all.len().saturating_sub(2)..]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }
        };
        if segments.len() < 2 {
            return Err(format!(
                "'{}' is not a repository identifier (expected owner/repo or a repository URL)",
                input
            ));
        }
        let owner = segments[0].as_str();
        let name = segments[1].as_str();
        let name = name.strip_suffix(".git").unwrap_or(name);
        sanitize_github_name(owner, "owner")?;
        sanitize_github_name(name, "repository name")?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validate that a GitHub owner/repo name doesn't contain characters that
/// could be used for URL injection in raw API routes.
fn sanitize_github_name(name: &str, field: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    for ch in ['/', '?', '#', '%', '\0', ' ', '\n', '\t'] {
        if name.contains(ch) {
            return Err(format!("{} contains invalid character '{}'", field, ch.escape_default()));
        }
    }
    Ok(())
}

/// A successful GitHub answer: its body and the `next` pagination link.
struct Reply {
    status: u16,
    next: Option<String>,
    body: String,
}

impl Reply {
    fn json<T: DeserializeOwned>(&self) -> Result<T, RemoteError> {
        serde_json::from_str(&self.body).map_err(|e| {
            RemoteError::new(Some(self.status), format!("Unexpected response body: {}", e))
        })
    }
}

/// Send one request and read the whole answer. Any non-2xx status becomes a
/// [`RemoteError`] carrying that status, whatever the body looks like.
async fn send<B>(client: &Octocrab, uri: &str, body: Option<&B>) -> Result<Reply, RemoteError>
where
    B: Serialize + ?Sized,
{
    let response = match body {
        Some(body) => client._post(uri, Some(body)).await?,
        None => client._get(uri).await?,
    };
    let status = response.status();
    let next = response
        .headers()
        .get("link")
        .and_then(|value| value.to_str().ok())
        .and_then(next_link);
    let body = client.body_to_string(response).await?;

    if !status.is_success() {
        return Err(RemoteError::from_response(
            status.as_u16(),
            status.canonical_reason(),
            &body,
        ));
    }
    Ok(Reply {
        status: status.as_u16(),
        next,
        body,
    })
}

/// Target of the `rel="next"` entry of a `Link` header.
fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        params
            .split(';')
            .any(|param| param.trim() == "rel=\"next\"")
            .then(|| {
                target
                    .trim()
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string()
            })
    })
}

/// Append `query` to `route` as a form-encoded query string. Null fields
/// are left out.
fn with_query<P>(route: String, query: Option<&P>) -> Result<String, RemoteError>
where
    P: Serialize + ?Sized,
{
    let fields = match query.map(serde_json::to_value).transpose() {
        Ok(Some(Value::Object(fields))) => fields,
        Ok(None) | Ok(Some(Value::Null)) => return Ok(route),
        Ok(Some(other)) => {
            return Err(RemoteError::new(
                None,
                format!("Query parameters must be an object, got {}", other),
            ))
        }
        Err(e) => {
            return Err(RemoteError::new(
                None,
                format!("Failed to encode query parameters: {}", e),
            ))
        }
    };

    let mut encoded = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &fields {
        match value {
            Value::Null => {}
            Value::String(text) => {
                encoded.append_pair(key, text);
            }
            other => {
                encoded.append_pair(key, &other.to_string());
            }
        }
    }
    let encoded = encoded.finish();
    if encoded.is_empty() {
        Ok(route)
    } else {
        Ok(format!("{}?{}", route, encoded))
    }
}

/// A resolved repository. Cheap to clone; read-only after construction.
#[derive(Clone)]
pub struct RepositoryHandle {
    client: Arc<Octocrab>,
    id: RepositoryId,
    repo_id: u64,
    full_name: String,
    metadata: Arc<Value>,
}

impl RepositoryHandle {
    /// Look the repository up (`GET /repos/{owner}/{repo}`) and bind the
    /// client to it. Owner and name are taken from GitHub's answer so that
    /// renamed or transferred repositories resolve to their current location.
    pub async fn fetch(client: Octocrab, id: &RepositoryId) -> Result<Self, RemoteError> {
        let route = format!("/repos/{}/{}", id.owner, id.name);
        let metadata: Value = send(&client, &route, None::<&()>).await?.json()?;

        let canonical = RepositoryId {
            owner: metadata
                .pointer("/owner/login")
                .and_then(Value::as_str)
                .unwrap_or(&id.owner)
                .to_string(),
            name: metadata
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(&id.name)
                .to_string(),
        };
        let full_name = metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| canonical.to_string());
        let repo_id = metadata.get("id").and_then(Value::as_u64).unwrap_or_default();

        Ok(Self {
            client: Arc::new(client),
            id: canonical,
            repo_id,
            full_name,
            metadata: Arc::new(metadata),
        })
    }

    pub fn id(&self) -> &RepositoryId {
        &self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The repository object as GitHub returned it during resolution.
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.metadata.get("default_branch").and_then(Value::as_str)
    }

    fn route(&self, tail: &str) -> String {
        format!("/repos/{}/{}/{}", self.id.owner, self.id.name, tail)
    }

    /// Fetch a listing and materialize it, following pagination links only
    /// until `limit` items are collected. Order is the transport's.
    pub async fn list<P>(
        &self,
        tail: &str,
        query: Option<&P>,
        limit: usize,
    ) -> Result<Vec<Value>, RemoteError>
    where
        P: Serialize + ?Sized,
    {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut uri = with_query(self.route(tail), query)?;
        let mut items = Vec::new();
        loop {
            let reply = send(&self.client, &uri, None::<&()>).await?;
            let mut page: Vec<Value> = reply.json()?;
            items.append(&mut page);
            if items.len() >= limit {
                break;
            }
            match reply.next {
                Some(next) => uri = next,
                None => break,
            }
        }
        items.truncate(limit);
        Ok(items)
    }

    /// Fetch a single entity, e.g. `issues/42`.
    pub async fn get(&self, tail: &str) -> Result<Value, RemoteError> {
        send(&self.client, &self.route(tail), None::<&()>)
            .await?
            .json()
    }

    /// Send exactly one `POST` and return the created object unmodified.
    pub async fn create<B>(&self, tail: &str, body: &B) -> Result<Value, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        send(&self.client, &self.route(tail), Some(body))
            .await?
            .json()
    }
}

impl PartialEq for RepositoryHandle {
    fn eq(&self, other: &Self) -> bool {
        self.repo_id == other.repo_id && self.full_name == other.full_name
    }
}

impl fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("full_name", &self.full_name)
            .field("repo_id", &self.repo_id)
            .finish_non_exhaustive()
    }
}
