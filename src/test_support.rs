//! Helpers shared by the unit tests: a GitHub API double built on
//! `wiremock` and configs pointing at it.

use std::io::Write;
use std::path::Path;

use octocrab::Octocrab;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{Credential, GithubConfig};
use crate::operation::{JsonObject, Operation, OperationBase};
use crate::resolver::resolve_repository;

pub const TEST_TOKEN: &str = "fake-token";

pub fn config_for(server: &MockServer, repository: &str) -> GithubConfig {
    GithubConfig::new(repository)
        .with_token(TEST_TOKEN)
        .with_api_url(server.uri())
}

pub fn client_for(server: &MockServer) -> Octocrab {
    let credential = Credential::resolve(Some(TEST_TOKEN), "GITHUB_TOKEN").unwrap();
    config_for(server, "octocat/Hello-World")
        .client(&credential)
        .unwrap()
}

/// The subset of GitHub's repository object the resolver reads.
pub fn repo_json(id: u64, owner: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "private": false,
        "owner": { "login": owner, "id": 1, "type": "User" },
        "html_url": format!("https://github.com/{}/{}", owner, name),
        "default_branch": "main",
    })
}

pub async fn mount_repo(server: &MockServer, owner: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}", owner, name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json(1296269, owner, name)))
        .mount(server)
        .await;
}

/// Mount `octocat/Hello-World` and connect operation `O` to it.
pub async fn connect<O: Operation>(server: &MockServer) -> O {
    connect_with_cap(server, crate::config::DEFAULT_MAX_RESULTS).await
}

pub async fn connect_with_cap<O: Operation>(server: &MockServer, max_results: usize) -> O {
    mount_repo(server, "octocat", "Hello-World").await;
    let config = config_for(server, "octocat/Hello-World").with_max_results(max_results);
    let repo = resolve_repository(&config).await.unwrap();
    O::new(OperationBase::new(repo, config.max_results))
}

/// Tool arguments from a `json!` object literal.
pub fn args(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

pub fn issue_json(number: u64, title: &str) -> Value {
    json!({
        "id": 1000 + number,
        "number": number,
        "title": title,
        "state": "open",
        "body": format!("Body of {}", title),
        "user": { "login": "octocat" },
        "labels": [],
        "created_at": "2025-05-20T00:00:00Z",
    })
}

pub fn pull_json(number: u64, title: &str, head: &str, base: &str) -> Value {
    json!({
        "id": 2000 + number,
        "number": number,
        "title": title,
        "state": "open",
        "body": format!("Body of {}", title),
        "user": { "login": "octocat" },
        "head": { "ref": head },
        "base": { "ref": base },
        "draft": false,
    })
}

pub fn comment_json(id: u64, login: &str, body: &str) -> Value {
    json!({
        "id": id,
        "body": body,
        "user": { "login": login },
        "created_at": "2024-05-20T10:00:00Z",
    })
}

pub fn github_error(message: &str) -> Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}

/// Query keys of the requests the server received on `route`.
pub async fn query_keys(server: &MockServer, route: &str) -> Vec<Vec<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .map(|r| {
            let mut keys: Vec<String> = r.url.query_pairs().map(|(k, _)| k.into_owned()).collect();
            keys.sort();
            keys
        })
        .collect()
}

/// Add a remote whose URL bytes are not UTF-8 straight to `.git/config`.
pub fn append_remote_with_invalid_url(workdir: &Path, name: &str) {
    let mut config = std::fs::OpenOptions::new()
        .append(true)
        .open(workdir.join(".git").join("config"))
        .unwrap();
    config
        .write_all(format!("[remote \"{}\"]\n\turl = git@github.com:octo", name).as_bytes())
        .unwrap();
    config.write_all(b"\xffcat/Hello-World.git\n").unwrap();
}
