//! Repository grouping.
//!
//! Partitions commit records by repository key and enriches each
//! committer with their per-repository and total commit counts.

use std::collections::{HashMap, HashSet};

use commitnet_core::{CommitRecord, CommitnetError};
use serde::{Deserialize, Serialize};

use crate::totals::CommitterTotalIndex;

/// How repository full names map to grouping keys.
///
/// # Examples
///
/// ```
/// use commitnet_network::grouping::GroupingMode;
///
/// assert_eq!(GroupingMode::from_loose_flag(false), GroupingMode::Strict);
/// assert_eq!(GroupingMode::from_loose_flag(true), GroupingMode::Loose);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupingMode {
    /// Key on the full `owner/repo` name.
    #[default]
    Strict,
    /// Key on the `repo` segment only, merging same-named repositories
    /// under different owners.
    Loose,
}

impl GroupingMode {
    /// Map the `allow_loose_connection` flag to a mode.
    pub fn from_loose_flag(allow_loose_connection: bool) -> Self {
        if allow_loose_connection {
            Self::Loose
        } else {
            Self::Strict
        }
    }
}

/// A committer as seen from one repository group.
///
/// Equality covers all four fields, so two different people with the same
/// name, institution, and counts are indistinguishable here.
///
/// # Examples
///
/// ```
/// use commitnet_network::grouping::EnrichedCommitter;
///
/// let c = EnrichedCommitter {
///     name: "Ada".into(),
///     institution: "Analytical".into(),
///     num_commits: 15,
///     total_commits: 50,
/// };
/// assert!(c.num_commits > 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnrichedCommitter {
    /// Committer display name.
    pub name: String,
    /// Committer institution.
    pub institution: String,
    /// Commits in the repository this record came from.
    pub num_commits: u64,
    /// Commits across every repository.
    pub total_commits: u64,
}

impl EnrichedCommitter {
    /// Enrich `record` with its committer's total from `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CommitnetError::MissingCommitter`] if the committer has no total.
    pub fn from_record(
        record: &CommitRecord,
        index: &CommitterTotalIndex,
    ) -> Result<Self, CommitnetError> {
        let total_commits = index.resolve(record)?;
        Ok(Self {
            name: record.name.clone(),
            institution: record.institution.clone(),
            num_commits: record.num_commits,
            total_commits,
        })
    }
}

/// Repository key to the set of committers contributing to it.
pub type RepositoryGroups = HashMap<String, HashSet<EnrichedCommitter>>;

/// Derive the grouping key for a repository full name.
///
/// Strict mode returns the name unchanged. Loose mode returns the segment
/// after the first `/`.
///
/// # Errors
///
/// In loose mode, returns [`CommitnetError::MalformedRepoName`] if the name
/// has no `/` or the repository segment is empty.
///
/// # Examples
///
/// ```
/// use commitnet_network::grouping::{repository_key, GroupingMode};
///
/// assert_eq!(repository_key("rust-lang/rust", GroupingMode::Strict).unwrap(), "rust-lang/rust");
/// assert_eq!(repository_key("rust-lang/rust", GroupingMode::Loose).unwrap(), "rust");
/// assert!(repository_key("rust", GroupingMode::Loose).is_err());
/// ```
pub fn repository_key(full_name: &str, mode: GroupingMode) -> Result<&str, CommitnetError> {
    match mode {
        GroupingMode::Strict => Ok(full_name),
        GroupingMode::Loose => full_name
            .split('/')
            .nth(1)
            .filter(|repo| !repo.is_empty())
            .ok_or_else(|| CommitnetError::MalformedRepoName(full_name.to_string())),
    }
}

/// Group commit records by repository key.
///
/// The same enriched committer contributed by several rows to one group is
/// stored once.
///
/// # Errors
///
/// Propagates [`CommitnetError::MissingCommitter`] and
/// [`CommitnetError::MalformedRepoName`].
pub fn group_by_repository(
    commits: &[CommitRecord],
    index: &CommitterTotalIndex,
    mode: GroupingMode,
) -> Result<RepositoryGroups, CommitnetError> {
    let mut groups = RepositoryGroups::new();

    for record in commits {
        let committer = EnrichedCommitter::from_record(record, index)?;
        let key = repository_key(&record.repo_name, mode)?;
        groups.entry(key.to_string()).or_default().insert(committer);
    }

    Ok(groups)
}
