//! Every GitHub operation this server exposes, and the factory that
//! connects them all to the configured repository.

pub mod issue;
pub mod pr;
pub mod repo;

use crate::config::GithubConfig;
use crate::error::Result;
use crate::operation::{DynOperation, Operation, ToolDescriptor};

pub use issue::{CreateIssue, ReadIssueComments, WriteIssueComment};
pub use pr::{
    CreatePullRequest, ListPullRequestReviews, ReadPullRequestComments, WritePullRequestComment,
};
pub use repo::{ListCommits, ListIssues, ListPullRequests, ListTags};

async fn boxed<O: Operation>(config: &GithubConfig) -> Result<Box<dyn DynOperation>> {
    Ok(Box::new(O::connect(config).await?))
}

/// Connect every catalogue entry. Each entry resolves its own repository
/// handle; the first failure aborts.
pub async fn connect_all(config: &GithubConfig) -> Result<Vec<Box<dyn DynOperation>>> {
    let operations = vec![
        boxed::<ListIssues>(config).await?,
        boxed::<ListCommits>(config).await?,
        boxed::<ListTags>(config).await?,
        boxed::<ListPullRequests>(config).await?,
        boxed::<CreateIssue>(config).await?,
        boxed::<ReadIssueComments>(config).await?,
        boxed::<WriteIssueComment>(config).await?,
        boxed::<CreatePullRequest>(config).await?,
        boxed::<ReadPullRequestComments>(config).await?,
        boxed::<WritePullRequestComment>(config).await?,
        boxed::<ListPullRequestReviews>(config).await?,
    ];
    tracing::info!(count = operations.len(), "Connected operations");
    Ok(operations)
}

/// Descriptors of every catalogue entry, without touching the network.
pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ListIssues::describe(),
        ListCommits::describe(),
        ListTags::describe(),
        ListPullRequests::describe(),
        CreateIssue::describe(),
        ReadIssueComments::describe(),
        WriteIssueComment::describe(),
        CreatePullRequest::describe(),
        ReadPullRequestComments::describe(),
        WritePullRequestComment::describe(),
        ListPullRequestReviews::describe(),
    ]
}
