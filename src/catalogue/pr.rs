//! Pull request operations.
//!
//! Review comments (on the diff) live under `pulls/{n}/comments`, while the
//! conversation thread of a pull request is its issue's comment list, so
//! writing a comment posts to `issues/{n}/comments`.

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::operation::{Operation, OperationBase, OperationOutput};

// -- create_pull_request --

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct CreatePullRequestParams {
    #[schemars(description = "Pull request title")]
    pub title: String,

    #[schemars(description = "Branch containing the changes (or user:branch for forks)")]
    pub head: String,

    #[schemars(description = "Branch the changes should be merged into")]
    pub base: String,

    #[schemars(description = "Pull request description (markdown)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[schemars(description = "Open as a draft pull request (default: false)")]
    #[serde(default)]
    pub draft: bool,
}

pub struct CreatePullRequest {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for CreatePullRequest {
    type Params = CreatePullRequestParams;
    const NAME: &'static str = "create_pull_request";
    const DESCRIPTION: &'static str =
        "Open a pull request from head into base and return it. Every call opens a new pull request";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: CreatePullRequestParams) -> Result<OperationOutput, RemoteError> {
        let pull = self.base.repo().create("pulls", &params).await?;
        tracing::info!(
            repo = self.base.repo().full_name(),
            number = ?pull.get("number"),
            head = %params.head,
            base = %params.base,
            "Created pull request"
        );
        Ok(OperationOutput::Item(pull))
    }
}

/// Parameters of the reads scoped to one pull request.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PullRequestReadParams {
    #[schemars(description = "Pull request number")]
    pub pr_number: u64,

    #[schemars(description = "Maximum number of results to return")]
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Fetch pull request `number`, then the listing under it.
async fn list_under_pull(
    base: &OperationBase,
    number: u64,
    collection: &str,
    max_results: Option<usize>,
) -> Result<Vec<serde_json::Value>, RemoteError> {
    let pull = format!("pulls/{}", number);
    base.repo().get(&pull).await?;
    base.repo()
        .list(&format!("{}/{}", pull, collection), None::<&()>, base.cap(max_results))
        .await
}

// -- read_pull_request_comments --

pub struct ReadPullRequestComments {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ReadPullRequestComments {
    type Params = PullRequestReadParams;
    const NAME: &'static str = "read_pull_request_comments";
    const DESCRIPTION: &'static str = "Read the review comments on a pull request's diff";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: PullRequestReadParams) -> Result<OperationOutput, RemoteError> {
        let comments =
            list_under_pull(&self.base, params.pr_number, "comments", params.max_results).await?;
        Ok(OperationOutput::Items(comments))
    }
}

// -- write_pull_request_comment --

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct WritePullRequestCommentParams {
    #[schemars(description = "Pull request number")]
    #[serde(skip_serializing)]
    pub pr_number: u64,

    #[schemars(description = "Comment body (markdown)")]
    pub body: String,
}

pub struct WritePullRequestComment {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for WritePullRequestComment {
    type Params = WritePullRequestCommentParams;
    const NAME: &'static str = "write_pull_request_comment";
    const DESCRIPTION: &'static str =
        "Add a comment to a pull request's conversation and return the created comment";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(
        &self,
        params: WritePullRequestCommentParams,
    ) -> Result<OperationOutput, RemoteError> {
        let repo = self.base.repo();
        repo.get(&format!("pulls/{}", params.pr_number)).await?;

        let comment = repo
            .create(&format!("issues/{}/comments", params.pr_number), &params)
            .await?;
        Ok(OperationOutput::Item(comment))
    }
}

// -- list_pull_request_reviews --

pub struct ListPullRequestReviews {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ListPullRequestReviews {
    type Params = PullRequestReadParams;
    const NAME: &'static str = "list_pull_request_reviews";
    const DESCRIPTION: &'static str =
        "List the reviews submitted on a pull request, in chronological order";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: PullRequestReadParams) -> Result<OperationOutput, RemoteError> {
        let reviews =
            list_under_pull(&self.base, params.pr_number, "reviews", params.max_results).await?;
        Ok(OperationOutput::Items(reviews))
    }
}
