//! Committer network construction.
//!
//! Two committers are connected when both made more than
//! [`edges::ACTIVITY_THRESHOLD`] commits to the same repository group.
//! The build runs three passes over in-memory tables: index committer
//! totals, group committers by repository, emit pairwise edges.

pub mod edges;
pub mod grouping;
pub mod records;
pub mod totals;

use commitnet_core::{CommitRecord, CommitnetError, CommitterTotal};
use tracing::{debug, info};

use crate::edges::{emit_edges, CollaborationEdge};
use crate::grouping::{group_by_repository, GroupingMode};
use crate::totals::CommitterTotalIndex;

/// Options for network construction.
///
/// # Examples
///
/// ```
/// use commitnet_network::NetworkOptions;
///
/// let opts = NetworkOptions::default();
/// assert!(!opts.allow_loose_connection);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkOptions {
    /// Group by repository name only, ignoring the owner (default: false).
    pub allow_loose_connection: bool,
}

/// Build the committer collaboration network.
///
/// Returns deduplicated, directed edges: every qualifying pair appears once
/// in each direction and no committer is connected to itself.
///
/// # Errors
///
/// Returns [`CommitnetError::MissingCommitter`] if a commit record has no
/// matching row in `totals`, and [`CommitnetError::MalformedRepoName`] if
/// loose grouping meets a name without an `owner/repo` shape. No partial
/// result is returned.
///
/// # Examples
///
/// ```
/// use commitnet_core::{CommitRecord, CommitterTotal};
/// use commitnet_network::{build_network, NetworkOptions};
///
/// let commit = |name: &str, num_commits| CommitRecord {
///     name: name.into(),
///     institution: "Org".into(),
///     email: format!("{name}@example.com"),
///     repo_name: "acme/widget".into(),
///     num_commits,
/// };
/// let total = |name: &str, total_commits| CommitterTotal {
///     name: name.into(),
///     institution: "Org".into(),
///     email: format!("{name}@example.com"),
///     total_commits,
/// };
///
/// let commits = vec![commit("alice", 15), commit("bob", 20)];
/// let totals = vec![total("alice", 50), total("bob", 80)];
/// let edges = build_network(&commits, &totals, &NetworkOptions::default()).unwrap();
/// assert_eq!(edges.len(), 2);
/// ```
pub fn build_network(
    commits: &[CommitRecord],
    totals: &[CommitterTotal],
    options: &NetworkOptions,
) -> Result<Vec<CollaborationEdge>, CommitnetError> {
    let mode = GroupingMode::from_loose_flag(options.allow_loose_connection);

    let index = CommitterTotalIndex::from_rows(totals);
    let groups = group_by_repository(commits, &index, mode)?;
    debug!(
        committers = index.len(),
        groups = groups.len(),
        ?mode,
        "grouped commit records by repository"
    );

    let edges = emit_edges(commits, &index, &groups, mode)?;
    info!("discovered {} connections", edges.len());

    Ok(edges)
}
