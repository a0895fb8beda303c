//! Collaboration edge emission.
//!
//! Connects every pair of sufficiently active committers that share a
//! repository group.

use std::collections::HashSet;

use commitnet_core::{CommitRecord, CommitnetError};
use serde::{Deserialize, Serialize};

use crate::grouping::{repository_key, EnrichedCommitter, GroupingMode, RepositoryGroups};
use crate::totals::CommitterTotalIndex;

/// Commits a committer must exceed within one repository group to take
/// part in any edge.
pub const ACTIVITY_THRESHOLD: u64 = 10;

/// Whether `num_commits` clears [`ACTIVITY_THRESHOLD`] (strictly greater).
///
/// # Examples
///
/// ```
/// use commitnet_network::edges::is_active;
///
/// assert!(!is_active(10));
/// assert!(is_active(11));
/// ```
pub fn is_active(num_commits: u64) -> bool {
    num_commits > ACTIVITY_THRESHOLD
}

/// Two committers who both contributed to the same repository group.
///
/// The relation is symmetric but the record is directed: for every
/// qualifying pair both `(a, b)` and `(b, a)` are emitted.
///
/// # Examples
///
/// ```
/// use commitnet_network::edges::CollaborationEdge;
/// use commitnet_network::grouping::EnrichedCommitter;
///
/// let x = EnrichedCommitter { name: "X".into(), institution: "I1".into(), num_commits: 15, total_commits: 50 };
/// let y = EnrichedCommitter { name: "Y".into(), institution: "I2".into(), num_commits: 20, total_commits: 80 };
/// let edge = CollaborationEdge { source: x.clone(), target: y.clone() };
/// assert_eq!(edge.reversed(), CollaborationEdge { source: y, target: x });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollaborationEdge {
    /// Committer the edge starts from.
    pub source: EnrichedCommitter,
    /// Committer the edge points to.
    pub target: EnrichedCommitter,
}

impl CollaborationEdge {
    /// The same edge pointing the other way.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }

    /// Flatten into the 8-column tabular form.
    pub fn to_row(&self) -> EdgeRow {
        EdgeRow {
            name_a: self.source.name.clone(),
            institution_a: self.source.institution.clone(),
            num_commits_a: self.source.num_commits,
            total_commits_a: self.source.total_commits,
            name_b: self.target.name.clone(),
            institution_b: self.target.institution.clone(),
            num_commits_b: self.target.num_commits,
            total_commits_b: self.target.total_commits,
        }
    }
}

/// 8-column tabular form of a [`CollaborationEdge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    /// Source committer name.
    pub name_a: String,
    /// Source committer institution.
    pub institution_a: String,
    /// Source commits in the shared repository.
    pub num_commits_a: u64,
    /// Source commits across every repository.
    pub total_commits_a: u64,
    /// Target committer name.
    pub name_b: String,
    /// Target committer institution.
    pub institution_b: String,
    /// Target commits in the shared repository.
    pub num_commits_b: u64,
    /// Target commits across every repository.
    pub total_commits_b: u64,
}

impl From<EdgeRow> for CollaborationEdge {
    fn from(row: EdgeRow) -> Self {
        Self {
            source: EnrichedCommitter {
                name: row.name_a,
                institution: row.institution_a,
                num_commits: row.num_commits_a,
                total_commits: row.total_commits_a,
            },
            target: EnrichedCommitter {
                name: row.name_b,
                institution: row.institution_b,
                num_commits: row.num_commits_b,
                total_commits: row.total_commits_b,
            },
        }
    }
}

/// Emit collaboration edges for every commit record against its group.
///
/// Skips self edges (all four enriched fields equal) and pairs where either
/// side is at or below [`ACTIVITY_THRESHOLD`]. The result is deduplicated by
/// exact, direction-sensitive equality and sorted.
///
/// # Errors
///
/// Propagates [`CommitnetError::MissingCommitter`] and
/// [`CommitnetError::MalformedRepoName`].
pub fn emit_edges(
    commits: &[CommitRecord],
    index: &CommitterTotalIndex,
    groups: &RepositoryGroups,
    mode: GroupingMode,
) -> Result<Vec<CollaborationEdge>, CommitnetError> {
    let mut edges: HashSet<CollaborationEdge> = HashSet::new();

    for record in commits {
        let committer = EnrichedCommitter::from_record(record, index)?;
        if !is_active(committer.num_commits) {
            continue;
        }

        let key = repository_key(&record.repo_name, mode)?;
        let Some(members) = groups.get(key) else {
            continue;
        };

        for other in members {
            if *other == committer || !is_active(other.num_commits) {
                continue;
            }
            edges.insert(CollaborationEdge {
                source: committer.clone(),
                target: other.clone(),
            });
        }
    }

    let mut edges: Vec<CollaborationEdge> = edges.into_iter().collect();
    edges.sort();
    Ok(edges)
}
