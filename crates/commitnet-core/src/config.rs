use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CommitnetError;

/// Top-level configuration loaded from `.commitnet.toml`.
///
/// Supports layered resolution: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use commitnet_core::CommitnetConfig;
///
/// let config = CommitnetConfig::default();
/// assert!(!config.network.allow_loose_connection);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitnetConfig {
    /// Network construction settings.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Default input and output locations.
    #[serde(default)]
    pub data: DataConfig,
    /// GitHub API settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

impl CommitnetConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CommitnetError::Io`] if the file cannot be read, or
    /// [`CommitnetError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use commitnet_core::CommitnetConfig;
    /// use std::path::Path;
    ///
    /// let config = CommitnetConfig::from_file(Path::new(".commitnet.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CommitnetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CommitnetError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitnet_core::CommitnetConfig;
    ///
    /// let toml = r#"
    /// [network]
    /// allow_loose_connection = true
    /// "#;
    /// let config = CommitnetConfig::from_toml(toml).unwrap();
    /// assert!(config.network.allow_loose_connection);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CommitnetError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Network construction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Group repositories by name only, ignoring the owner (default: false).
    #[serde(default)]
    pub allow_loose_connection: bool,
}

/// Default data file locations.
///
/// # Examples
///
/// ```
/// use commitnet_core::DataConfig;
/// use std::path::PathBuf;
///
/// let config = DataConfig::default();
/// assert_eq!(config.commits, PathBuf::from("data/commits.csv"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Per-(committer, repository) commit counts.
    #[serde(default = "default_commits")]
    pub commits: PathBuf,
    /// Per-committer total commit counts.
    #[serde(default = "default_committer_totals")]
    pub committer_totals: PathBuf,
    /// Where `commitnet network` writes its edge list.
    #[serde(default = "default_network_output")]
    pub network_output: PathBuf,
    /// Where `commitnet repos` writes repository metadata.
    #[serde(default = "default_repos_output")]
    pub repos_output: PathBuf,
}

fn default_commits() -> PathBuf {
    PathBuf::from("data/commits.csv")
}

fn default_committer_totals() -> PathBuf {
    PathBuf::from("data/commits_by_committer.csv")
}

fn default_network_output() -> PathBuf {
    PathBuf::from("data/network.csv")
}

fn default_repos_output() -> PathBuf {
    PathBuf::from("data/repos_info.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            commits: default_commits(),
            committer_totals: default_committer_totals(),
            network_output: default_network_output(),
            repos_output: default_repos_output(),
        }
    }
}

/// GitHub API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token. Falls back to `GITHUB_TOKEN` / `GH_TOKEN`.
    pub token: Option<String>,
    /// Custom API base URL (GitHub Enterprise).
    pub api_base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CommitnetConfig::default();
        assert!(!config.network.allow_loose_connection);
        assert_eq!(
            config.data.committer_totals,
            PathBuf::from("data/commits_by_committer.csv")
        );
        assert_eq!(config.data.network_output, PathBuf::from("data/network.csv"));
        assert_eq!(config.data.repos_output, PathBuf::from("data/repos_info.csv"));
        assert!(config.github.token.is_none());
        assert!(config.github.api_base.is_none());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[network]
allow_loose_connection = true

[data]
commits = "in/commits.csv"
committer_totals = "in/totals.csv"

[github]
token = "ghp_test"
api_base = "https://github.example.com/api/v3"
"#;
        let config = CommitnetConfig::from_toml(toml).unwrap();
        assert!(config.network.allow_loose_connection);
        assert_eq!(config.data.commits, PathBuf::from("in/commits.csv"));
        assert_eq!(config.data.committer_totals, PathBuf::from("in/totals.csv"));
        // Unset keys in a present table still default
        assert_eq!(config.data.network_output, PathBuf::from("data/network.csv"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(
            config.github.api_base.as_deref(),
            Some("https://github.example.com/api/v3")
        );
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CommitnetConfig::from_toml("").unwrap();
        assert!(!config.network.allow_loose_connection);
        assert_eq!(config.data.commits, PathBuf::from("data/commits.csv"));
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = CommitnetConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }
}
