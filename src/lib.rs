//! MCP server that exposes a fixed catalogue of GitHub operations on one
//! repository: listing issues, pull requests, commits and tags, creating
//! issues and pull requests, and reading or writing their comments and
//! reviews.
//!
//! The repository is resolved once at startup from a local git working
//! copy, an `owner/repo` identifier or a repository URL.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod git;
pub mod operation;
pub mod registry;
pub mod repository;
pub mod resolver;
pub mod server;

#[cfg(test)]
mod test_support;
