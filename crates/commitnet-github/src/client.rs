use std::future::Future;

use chrono::{DateTime, Utc};
use commitnet_core::CommitnetError;
use serde::Deserialize;

/// The subset of the GitHub repository resource that commitnet records.
///
/// # Examples
///
/// ```
/// use commitnet_github::client::RepoPayload;
///
/// let json = r#"{"full_name": "octocat/hello-world", "fork": false, "stargazers_count": 7}"#;
/// let payload: RepoPayload = serde_json::from_str(json).unwrap();
/// assert_eq!(payload.stargazers_count, Some(7));
/// assert!(payload.topics.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepoPayload {
    /// `owner/repo` as reported by GitHub.
    pub full_name: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last metadata update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Last push to any branch.
    pub pushed_at: Option<DateTime<Utc>>,
    /// Primary language.
    pub language: Option<String>,
    /// Star count.
    pub stargazers_count: Option<u64>,
    /// Project homepage URL.
    pub homepage: Option<String>,
    /// Whether this repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// Upstream repository, present for forks.
    pub parent: Option<Box<RepoPayload>>,
    /// Repository topics.
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Anything that can look up repository metadata by full name.
///
/// [`GitHubClient`] is the production implementation; tests substitute an
/// in-memory source.
pub trait RepoMetadataSource {
    /// Fetch metadata for `full_name` (`owner/repo`).
    fn fetch_repo(
        &self,
        full_name: &str,
    ) -> impl Future<Output = Result<RepoPayload, CommitnetError>> + Send;
}

/// GitHub REST client for repository metadata.
///
/// Constructed explicitly and passed to whatever needs it.
///
/// # Examples
///
/// ```
/// use commitnet_github::client::parse_repo_full_name;
///
/// let (owner, repo) = parse_repo_full_name("rust-lang/rust").unwrap();
/// assert_eq!(owner, "rust-lang");
/// assert_eq!(repo, "rust");
/// ```
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

impl GitHubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN` /
    /// `GH_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CommitnetError::Config`] if no token is available or
    /// `api_base` is not a valid URI, or [`CommitnetError::GitHub`] if the
    /// client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use commitnet_github::client::GitHubClient;
    ///
    /// let client = GitHubClient::new(Some("ghp_xxxx"), None).unwrap();
    /// ```
    pub fn new(token: Option<&str>, api_base: Option<&str>) -> Result<Self, CommitnetError> {
        let token = resolve_token(token)?;

        let mut builder = octocrab::Octocrab::builder().personal_token(token);
        if let Some(base) = api_base {
            builder = builder
                .base_uri(base)
                .map_err(|e| CommitnetError::Config(format!("invalid GitHub API base '{base}': {e}")))?;
        }

        let octocrab = builder
            .build()
            .map_err(|e| CommitnetError::GitHub(format!("failed to create GitHub client: {e}")))?;

        Ok(Self { octocrab })
    }
}

impl RepoMetadataSource for GitHubClient {
    async fn fetch_repo(&self, full_name: &str) -> Result<RepoPayload, CommitnetError> {
        let (owner, repo) = parse_repo_full_name(full_name)?;
        let route = format!("/repos/{owner}/{repo}");

        self.octocrab
            .get(route, None::<&()>)
            .await
            .map_err(|e| CommitnetError::GitHub(format!("failed to fetch {full_name}: {e}")))
    }
}

/// Pick the token: explicit argument, then `GITHUB_TOKEN`, then `GH_TOKEN`.
///
/// # Errors
///
/// Returns [`CommitnetError::Config`] if none is set.
pub fn resolve_token(explicit: Option<&str>) -> Result<String, CommitnetError> {
    if let Some(t) = explicit.filter(|t| !t.is_empty()) {
        return Ok(t.to_string());
    }
    std::env::var("GITHUB_TOKEN")
        .or_else(|_| std::env::var("GH_TOKEN"))
        .map_err(|_| {
            CommitnetError::Config(
                "GITHUB_TOKEN not set. Pass --github-token, set [github].token, or set GITHUB_TOKEN"
                    .into(),
            )
        })
}

/// Split a repository full name (`owner/repo`) into its components.
///
/// # Errors
///
/// Returns [`CommitnetError::Config`] if the format is invalid.
pub fn parse_repo_full_name(full_name: &str) -> Result<(String, String), CommitnetError> {
    let Some((owner, repo)) = full_name.split_once('/') else {
        return Err(CommitnetError::Config(format!(
            "invalid repository name '{full_name}', expected owner/repo"
        )));
    };
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(CommitnetError::Config(format!(
            "invalid repository name '{full_name}', expected owner/repo"
        )));
    }
    Ok((owner.to_string(), repo.to_string()))
}
