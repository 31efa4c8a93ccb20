//! Repository-level listings: issues, commits, tags and pull requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::operation::{comma_separated, Operation, OperationBase, OperationOutput};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Open,
    Closed,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueSort {
    #[default]
    Created,
    Updated,
    Comments,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PullSort {
    #[default]
    Created,
    Updated,
    Popularity,
    LongRunning,
}

// -- list_issues --

/// Serialized as the query string of `GET /repos/{owner}/{repo}/issues`;
/// unset filters are left out entirely.
#[derive(Debug, Default, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ListIssuesParams {
    #[schemars(description = "Maximum number of issues to return")]
    #[serde(default, skip_serializing)]
    pub max_results: Option<usize>,

    #[schemars(description = "Filter by state: open, closed, or all (default: open)")]
    #[serde(default)]
    pub state: State,

    #[schemars(description = "Sort by: created, updated, or comments (default: created)")]
    #[serde(default)]
    pub sort: IssueSort,

    #[schemars(description = "Sort direction: asc or desc (default: desc)")]
    #[serde(default)]
    pub direction: Direction,

    #[schemars(description = "Only issues carrying all of these label names")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "comma_separated"
    )]
    pub labels: Option<Vec<String>>,

    #[schemars(description = "Only issues updated at or after this time (ISO 8601)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    #[schemars(description = "Login of the assignee, 'none' or '*'")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[schemars(description = "Login of the issue author")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[schemars(description = "Login of a user mentioned in the issue")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<String>,

    #[schemars(description = "Milestone number, 'none' or '*'")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

pub struct ListIssues {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ListIssues {
    type Params = ListIssuesParams;
    const NAME: &'static str = "list_issues";
    const DESCRIPTION: &'static str =
        "List issues in the repository, newest first, filtered by state, labels, people, milestone or date";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: ListIssuesParams) -> Result<OperationOutput, RemoteError> {
        let limit = self.base.cap(params.max_results);
        let issues = self.base.repo().list("issues", Some(&params), limit).await?;
        Ok(OperationOutput::Items(issues))
    }
}

// -- list_commits --

#[derive(Debug, Default, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ListCommitsParams {
    #[schemars(description = "Maximum number of commits to return")]
    #[serde(default, skip_serializing)]
    pub max_results: Option<usize>,

    #[schemars(description = "Branch, tag or SHA to start listing from (default: the default branch)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    #[schemars(description = "Only commits touching this file path")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[schemars(description = "GitHub login or email address of the commit author")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[schemars(description = "Only commits after this time (ISO 8601)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    #[schemars(description = "Only commits before this time (ISO 8601)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

pub struct ListCommits {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ListCommits {
    type Params = ListCommitsParams;
    const NAME: &'static str = "list_commits";
    const DESCRIPTION: &'static str =
        "List commits in the repository, optionally from a branch or SHA, for a path, by an author or within a time range";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: ListCommitsParams) -> Result<OperationOutput, RemoteError> {
        let limit = self.base.cap(params.max_results);
        let commits = self.base.repo().list("commits", Some(&params), limit).await?;
        Ok(OperationOutput::Items(commits))
    }
}

// -- list_tags --

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListTagsParams {
    #[schemars(description = "Maximum number of tags to return")]
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub struct ListTags {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ListTags {
    type Params = ListTagsParams;
    const NAME: &'static str = "list_tags";
    const DESCRIPTION: &'static str = "List tags in the repository";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: ListTagsParams) -> Result<OperationOutput, RemoteError> {
        let limit = self.base.cap(params.max_results);
        let tags = self.base.repo().list("tags", None::<&()>, limit).await?;
        Ok(OperationOutput::Items(tags))
    }
}

// -- list_pull_requests --

#[derive(Debug, Default, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ListPullRequestsParams {
    #[schemars(description = "Maximum number of pull requests to return")]
    #[serde(default, skip_serializing)]
    pub max_results: Option<usize>,

    #[schemars(description = "Filter by state: open, closed, or all (default: open)")]
    #[serde(default)]
    pub state: State,

    #[schemars(
        description = "Sort by: created, updated, popularity, or long-running (default: created)"
    )]
    #[serde(default)]
    pub sort: PullSort,

    #[schemars(description = "Sort direction: asc or desc (default: desc)")]
    #[serde(default)]
    pub direction: Direction,

    #[schemars(description = "Only pull requests targeting this base branch")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[schemars(description = "Only pull requests from this head, as user:ref-name")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

pub struct ListPullRequests {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ListPullRequests {
    type Params = ListPullRequestsParams;
    const NAME: &'static str = "list_pull_requests";
    const DESCRIPTION: &'static str =
        "List pull requests in the repository, newest first, filtered by state, base or head branch";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: ListPullRequestsParams) -> Result<OperationOutput, RemoteError> {
        let limit = self.base.cap(params.max_results);
        let pulls = self.base.repo().list("pulls", Some(&params), limit).await?;
        Ok(OperationOutput::Items(pulls))
    }
}
