//! Committer total-commit index.
//!
//! Maps a committer identity to the number of commits that committer made
//! across every repository.

use std::collections::HashMap;

use commitnet_core::{CommitRecord, CommitnetError, CommitterIdentity, CommitterTotal};

/// Lookup from committer identity to total commit count.
///
/// # Examples
///
/// ```
/// use commitnet_core::{CommitterIdentity, CommitterTotal};
/// use commitnet_network::totals::CommitterTotalIndex;
///
/// let rows = vec![CommitterTotal {
///     name: "Ada".into(),
///     institution: "Analytical".into(),
///     email: "ada@example.com".into(),
///     total_commits: 120,
/// }];
/// let index = CommitterTotalIndex::from_rows(&rows);
/// let ada = CommitterIdentity::new("Ada", "Analytical", "ada@example.com");
/// assert_eq!(index.get(&ada), Some(120));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommitterTotalIndex {
    totals: HashMap<CommitterIdentity, u64>,
}

impl CommitterTotalIndex {
    /// Build the index from the committer totals table.
    ///
    /// When an identity appears more than once, the later row wins.
    pub fn from_rows(rows: &[CommitterTotal]) -> Self {
        let mut totals = HashMap::with_capacity(rows.len());
        for row in rows {
            totals.insert(row.identity(), row.total_commits);
        }
        Self { totals }
    }

    /// Total commits for `identity`, if present.
    pub fn get(&self, identity: &CommitterIdentity) -> Option<u64> {
        self.totals.get(identity).copied()
    }

    /// Total commits for the committer of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`CommitnetError::MissingCommitter`] if the record's identity
    /// has no entry. Upstream tables are inconsistent in that case and the
    /// whole build must abort.
    pub fn resolve(&self, record: &CommitRecord) -> Result<u64, CommitnetError> {
        let identity = record.identity();
        self.get(&identity)
            .ok_or_else(|| CommitnetError::MissingCommitter {
                name: identity.name,
                institution: identity.institution,
                email: identity.email,
            })
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether the index has no identities.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(name: &str, email: &str, total_commits: u64) -> CommitterTotal {
        CommitterTotal {
            name: name.into(),
            institution: "Org".into(),
            email: email.into(),
            total_commits,
        }
    }

    fn record(name: &str, email: &str) -> CommitRecord {
        CommitRecord {
            name: name.into(),
            institution: "Org".into(),
            email: email.into(),
            repo_name: "o/r".into(),
            num_commits: 1,
        }
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let index = CommitterTotalIndex::from_rows(&[
            total("alice", "a@e.com", 10),
            total("alice", "a@e.com", 25),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve(&record("alice", "a@e.com")).unwrap(), 25);
    }

    #[test]
    fn identity_uses_all_three_fields() {
        let index = CommitterTotalIndex::from_rows(&[
            total("alice", "a@e.com", 10),
            total("alice", "alice@other.org", 40),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve(&record("alice", "a@e.com")).unwrap(), 10);
        assert_eq!(
            index.resolve(&record("alice", "alice@other.org")).unwrap(),
            40
        );
    }

    #[test]
    fn missing_identity_is_an_error() {
        let index = CommitterTotalIndex::from_rows(&[total("alice", "a@e.com", 10)]);
        let err = index.resolve(&record("bob", "b@e.com")).unwrap_err();
        match err {
            CommitnetError::MissingCommitter { name, email, .. } => {
                assert_eq!(name, "bob");
                assert_eq!(email, "b@e.com");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_table_gives_empty_index() {
        let index = CommitterTotalIndex::from_rows(&[]);
        assert!(index.is_empty());
    }
}
