use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The (name, institution, email) triple that uniquely identifies a committer.
///
/// Two records with the same name but a different email are different
/// committers.
///
/// # Examples
///
/// ```
/// use commitnet_core::CommitterIdentity;
///
/// let a = CommitterIdentity::new("Ada", "Analytical", "ada@example.com");
/// let b = CommitterIdentity::new("Ada", "Analytical", "ada@other.org");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitterIdentity {
    /// Display name.
    pub name: String,
    /// Institution (may be empty).
    pub institution: String,
    /// Email address (may be empty).
    pub email: String,
}

impl CommitterIdentity {
    /// Build an identity from its three fields.
    pub fn new(
        name: impl Into<String>,
        institution: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            institution: institution.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for CommitterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) <{}>", self.name, self.institution, self.email)
    }
}

/// One committer's commit count within one repository.
///
/// Field names match the `commits.csv` header.
///
/// # Examples
///
/// ```
/// use commitnet_core::CommitRecord;
///
/// let record = CommitRecord {
///     name: "Ada".into(),
///     institution: "Analytical".into(),
///     email: "ada@example.com".into(),
///     repo_name: "babbage/engine".into(),
///     num_commits: 42,
/// };
/// assert_eq!(record.identity().name, "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Committer display name.
    pub name: String,
    /// Committer institution.
    #[serde(default)]
    pub institution: String,
    /// Committer email.
    #[serde(default)]
    pub email: String,
    /// Repository full name, `owner/repo`.
    pub repo_name: String,
    /// Commits by this committer in this repository.
    pub num_commits: u64,
}

impl CommitRecord {
    /// The committer identity this row belongs to.
    pub fn identity(&self) -> CommitterIdentity {
        CommitterIdentity::new(&self.name, &self.institution, &self.email)
    }
}

/// One committer's commit count across all repositories.
///
/// Accepts `committer_commit` as an alias for the `total_commits` column.
///
/// # Examples
///
/// ```
/// use commitnet_core::CommitterTotal;
///
/// let total = CommitterTotal {
///     name: "Ada".into(),
///     institution: "Analytical".into(),
///     email: "ada@example.com".into(),
///     total_commits: 120,
/// };
/// assert_eq!(total.identity().email, "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitterTotal {
    /// Committer display name.
    pub name: String,
    /// Committer institution.
    #[serde(default)]
    pub institution: String,
    /// Committer email.
    #[serde(default)]
    pub email: String,
    /// Commits by this committer across every repository.
    #[serde(alias = "committer_commit")]
    pub total_commits: u64,
}

impl CommitterTotal {
    /// The committer identity this row belongs to.
    pub fn identity(&self) -> CommitterIdentity {
        CommitterIdentity::new(&self.name, &self.institution, &self.email)
    }
}

/// Output format for CLI results.
///
/// # Examples
///
/// ```
/// use commitnet_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_display_round_trips() {
        for fmt in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
            assert_eq!(fmt.to_string().parse::<OutputFormat>().unwrap(), fmt);
        }
    }

    #[test]
    fn record_and_total_share_identity() {
        let record = CommitRecord {
            name: "Ada".into(),
            institution: "Analytical".into(),
            email: "ada@example.com".into(),
            repo_name: "babbage/engine".into(),
            num_commits: 3,
        };
        let total = CommitterTotal {
            name: "Ada".into(),
            institution: "Analytical".into(),
            email: "ada@example.com".into(),
            total_commits: 9,
        };
        assert_eq!(record.identity(), total.identity());
    }

    #[test]
    fn identity_display_includes_all_fields() {
        let id = CommitterIdentity::new("Ada", "Analytical", "ada@example.com");
        assert_eq!(id.to_string(), "Ada (Analytical) <ada@example.com>");
    }
}
