//! GitHub repository metadata.
//!
//! Looks up each repository named in the commit table and records its
//! description, timestamps, language, stars, fork parent, and topics.

pub mod client;
pub mod repo_info;

pub use client::{GitHubClient, RepoMetadataSource};
pub use repo_info::{fetch_all, RepoInfo, RepoInfoColumns};
