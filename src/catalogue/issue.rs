//! Issue operations: creation and the conversation thread of one issue.

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::operation::{Operation, OperationBase, OperationOutput};

// -- create_issue --

/// Sent as the JSON body of `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Default, Deserialize, Serialize, schemars::JsonSchema)]
pub struct CreateIssueParams {
    #[schemars(description = "Issue title")]
    pub title: String,

    #[schemars(description = "Issue body (markdown)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[schemars(description = "Logins of the users to assign")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,

    #[schemars(description = "Label names to apply")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

pub struct CreateIssue {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for CreateIssue {
    type Params = CreateIssueParams;
    const NAME: &'static str = "create_issue";
    const DESCRIPTION: &'static str =
        "Open a new issue in the repository and return it. Every call creates a new issue";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: CreateIssueParams) -> Result<OperationOutput, RemoteError> {
        let issue = self.base.repo().create("issues", &params).await?;
        tracing::info!(
            repo = self.base.repo().full_name(),
            number = ?issue.get("number"),
            "Created issue"
        );
        Ok(OperationOutput::Item(issue))
    }
}

// -- read_issue_comments --

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadIssueCommentsParams {
    #[schemars(description = "Issue number")]
    pub issue_number: u64,

    #[schemars(description = "Maximum number of comments to return")]
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub struct ReadIssueComments {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for ReadIssueComments {
    type Params = ReadIssueCommentsParams;
    const NAME: &'static str = "read_issue_comments";
    const DESCRIPTION: &'static str = "Read the comments on an issue, oldest first";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: ReadIssueCommentsParams) -> Result<OperationOutput, RemoteError> {
        let repo = self.base.repo();
        let issue = format!("issues/{}", params.issue_number);
        repo.get(&issue).await?;

        let limit = self.base.cap(params.max_results);
        let comments = repo
            .list(&format!("{}/comments", issue), None::<&()>, limit)
            .await?;
        Ok(OperationOutput::Items(comments))
    }
}

// -- write_issue_comment --

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct WriteIssueCommentParams {
    #[schemars(description = "Issue number")]
    #[serde(skip_serializing)]
    pub issue_number: u64,

    #[schemars(description = "Comment body (markdown)")]
    pub body: String,
}

pub struct WriteIssueComment {
    base: OperationBase,
}

#[async_trait::async_trait]
impl Operation for WriteIssueComment {
    type Params = WriteIssueCommentParams;
    const NAME: &'static str = "write_issue_comment";
    const DESCRIPTION: &'static str = "Add a comment to an issue and return the created comment";

    fn new(base: OperationBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &OperationBase {
        &self.base
    }

    async fn call(&self, params: WriteIssueCommentParams) -> Result<OperationOutput, RemoteError> {
        let repo = self.base.repo();
        let issue = format!("issues/{}", params.issue_number);
        repo.get(&issue).await?;

        let comment = repo
            .create(&format!("{}/comments", issue), &params)
            .await?;
        Ok(OperationOutput::Item(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GithubOpsError;
    use crate::operation::DynOperation;
    use crate::test_support::{args, comment_json, connect, github_error, issue_json};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ISSUES: &str = "/repos/octocat/Hello-World/issues";

    async fn mount_issue(server: &MockServer, number: u64) {
        Mock::given(method("GET"))
            .and(path(format!("{}/{}", ISSUES, number)))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(number, "Existing")))
            .mount(server)
            .await;
    }

    #[test]
    fn test_create_issue_body_omits_unset_fields() {
        let params: CreateIssueParams = serde_json::from_value(json!({
            "title": "Found a bug",
            "labels": ["bug"]
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"title": "Found a bug", "labels": ["bug"]})
        );
    }

    #[test]
    fn test_comment_body_excludes_issue_number() {
        let params = WriteIssueCommentParams {
            issue_number: 42,
            body: "Thanks!".to_string(),
        };
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"body": "Thanks!"}));
    }

    #[tokio::test]
    async fn test_create_issue_round_trip() {
        let server = MockServer::start().await;
        let mut created = issue_json(7, "Found a bug");
        created["body"] = json!("It crashes on start");
        Mock::given(method("POST"))
            .and(path(ISSUES))
            .and(body_json(json!({
                "title": "Found a bug",
                "body": "It crashes on start"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(created))
            .expect(1)
            .mount(&server)
            .await;

        let op: CreateIssue = connect(&server).await;
        let output = op
            .invoke(args(json!({"title": "Found a bug", "body": "It crashes on start"})))
            .await
            .unwrap();
        let issue = output.item().unwrap();
        assert_eq!(issue["title"], "Found a bug");
        assert_eq!(issue["body"], "It crashes on start");
        assert_eq!(issue["number"], 7);
    }

    #[tokio::test]
    async fn test_create_issue_is_not_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ISSUES))
            .respond_with(ResponseTemplate::new(201).set_body_json(issue_json(1, "Same")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ISSUES))
            .respond_with(ResponseTemplate::new(201).set_body_json(issue_json(2, "Same")))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let op: CreateIssue = connect(&server).await;
        let first = op.invoke(args(json!({"title": "Same"}))).await.unwrap();
        let second = op.invoke(args(json!({"title": "Same"}))).await.unwrap();

        assert_ne!(first.item().unwrap()["number"], second.item().unwrap()["number"]);
        let posts = server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == "POST")
            .count();
        assert_eq!(posts, 2);
    }

    #[tokio::test]
    async fn test_create_issue_requires_title() {
        let server = MockServer::start().await;
        let op: CreateIssue = connect(&server).await;
        let err = op.invoke(args(json!({"body": "no title"}))).await.unwrap_err();
        assert!(matches!(err, GithubOpsError::InvalidParams { .. }));
    }

    #[tokio::test]
    async fn test_create_issue_validation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ISSUES))
            .respond_with(ResponseTemplate::new(422).set_body_json(github_error("Validation Failed")))
            .expect(1)
            .mount(&server)
            .await;

        let op: CreateIssue = connect(&server).await;
        let err = op
            .invoke(args(json!({"title": "x", "assignees": ["ghost"]})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("Validation Failed"));
    }

    #[tokio::test]
    async fn test_read_issue_comments() {
        let server = MockServer::start().await;
        mount_issue(&server, 42).await;
        Mock::given(method("GET"))
            .and(path(format!("{}/42/comments", ISSUES)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                comment_json(1, "octocat", "First"),
                comment_json(2, "hubot", "Second"),
                comment_json(3, "octocat", "Third"),
            ])))
            .mount(&server)
            .await;

        let op: ReadIssueComments = connect(&server).await;
        let output = op
            .invoke(args(json!({"issue_number": 42, "max_results": 2})))
            .await
            .unwrap();
        let comments = output.items().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["body"], "First");
        assert_eq!(comments[1]["user"]["login"], "hubot");
    }

    #[tokio::test]
    async fn test_read_comments_of_missing_issue_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/99", ISSUES)))
            .respond_with(ResponseTemplate::new(404).set_body_json(github_error("Not Found")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/99/comments", ISSUES)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let op: ReadIssueComments = connect(&server).await;
        let err = op.invoke(args(json!({"issue_number": 99}))).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("read_issue_comments"));
    }

    #[tokio::test]
    async fn test_write_issue_comment() {
        let server = MockServer::start().await;
        mount_issue(&server, 42).await;
        Mock::given(method("POST"))
            .and(path(format!("{}/42/comments", ISSUES)))
            .and(body_json(json!({"body": "Looks good"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(comment_json(555, "octocat", "Looks good")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let op: WriteIssueComment = connect(&server).await;
        let output = op
            .invoke(args(json!({"issue_number": 42, "body": "Looks good"})))
            .await
            .unwrap();
        assert_eq!(output.item().unwrap()["id"], 555);
        assert_eq!(output.item().unwrap()["body"], "Looks good");
    }

    #[tokio::test]
    async fn test_write_comment_on_missing_issue_never_posts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/99", ISSUES)))
            .respond_with(ResponseTemplate::new(404).set_body_json(github_error("Not Found")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/99/comments", ISSUES)))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let op: WriteIssueComment = connect(&server).await;
        let err = op
            .invoke(args(json!({"issue_number": 99, "body": "hello?"})))
            .await
            .unwrap_err();
        assert!(matches!(err, GithubOpsError::RemoteOperation { .. }));
        assert_eq!(err.status(), Some(404));
    }
}
