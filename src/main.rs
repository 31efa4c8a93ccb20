use anyhow::Result;
use clap::Parser;
use github_ops_mcp::config::{GithubConfig, DEFAULT_MAX_RESULTS, DEFAULT_TOKEN_ENV};
use github_ops_mcp::registry::ToolRegistry;
use github_ops_mcp::{catalogue, server};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

/// MCP server exposing GitHub issue, pull request, commit and tag operations
/// on one repository
#[derive(Parser)]
#[command(name = "github-ops-mcp", version, about)]
struct Cli {
    /// Repository to operate on: a local git working copy with exactly one
    /// remote, `owner/repo`, or a repository URL
    #[arg(long, default_value = ".")]
    repo: String,

    /// GitHub personal access token.
    /// Takes precedence over --token-env.
    #[arg(long)]
    token: Option<String>,

    /// Read GitHub token from this environment variable
    #[arg(long = "token-env", default_value = DEFAULT_TOKEN_ENV)]
    token_env: String,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long = "api-url")]
    api_url: Option<String>,

    /// Default cap on items returned by listing tools
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Print the tool catalogue as JSON and exit, without contacting GitHub
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if cli.list_tools {
        let tools: Vec<_> = catalogue::descriptors()
            .iter()
            .map(|d| d.to_tool())
            .collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let mut config = GithubConfig::new(cli.repo)
        .with_token_env(cli.token_env)
        .with_max_results(cli.max_results);
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }

    tracing::info!(
        repo = %config.repository,
        api_url = config.api_url.as_deref().unwrap_or("https://api.github.com"),
        max_results = config.max_results,
        "Starting github-ops-mcp server"
    );

    let operations = catalogue::connect_all(&config).await?;
    let registry = ToolRegistry::register(operations)?;

    let service = server::GithubOpsServer::new(registry);
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
