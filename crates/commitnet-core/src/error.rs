use std::path::PathBuf;

/// Errors that can occur across the commitnet workspace.
///
/// Library crates return this type directly; the binary reports it
/// through `miette` at the boundary.
///
/// # Examples
///
/// ```
/// use commitnet_core::CommitnetError;
///
/// let err = CommitnetError::MalformedRepoName("no-slash".into());
/// assert!(err.to_string().contains("no-slash"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CommitnetError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A commit record references a committer with no entry in the totals table.
    #[error("committer not found in totals table: name={name:?}, institution={institution:?}, email={email:?}")]
    #[diagnostic(
        code(commitnet::missing_committer),
        help("every (name, institution, email) in the commits table needs exactly one row in the committer totals table")
    )]
    MissingCommitter {
        /// Committer display name.
        name: String,
        /// Committer institution.
        institution: String,
        /// Committer email.
        email: String,
    },

    /// A repository full name does not have the `owner/repo` shape.
    #[error("malformed repository name {0:?}, expected owner/repo")]
    #[diagnostic(code(commitnet::malformed_repo_name))]
    MalformedRepoName(String),

    /// Tabular input or output failure (CSV parsing, writing).
    #[error("data error: {0}")]
    Data(String),

    /// GitHub API failure.
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CommitnetError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = CommitnetError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn missing_committer_names_the_identity() {
        let err = CommitnetError::MissingCommitter {
            name: "Ada".into(),
            institution: "Analytical".into(),
            email: "ada@example.com".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Ada"));
        assert!(msg.contains("Analytical"));
        assert!(msg.contains("ada@example.com"));
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = CommitnetError::FileNotFound(PathBuf::from("/tmp/commits.csv"));
        assert!(err.to_string().contains("/tmp/commits.csv"));
    }
}
