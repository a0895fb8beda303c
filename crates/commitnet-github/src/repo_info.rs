//! Per-repository metadata records.
//!
//! Every repository produces one [`RepoInfo`], successful or not. The
//! columnar [`RepoInfoColumns`] view is built only when serializing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use commitnet_core::CommitnetError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{RepoMetadataSource, RepoPayload};

/// Metadata for one repository.
///
/// # Examples
///
/// ```
/// use commitnet_github::repo_info::RepoInfo;
///
/// let info = RepoInfo::failed("octocat/gone");
/// assert!(!info.query_success);
/// assert_eq!(info.repo_name, "octocat/gone");
/// assert!(info.repo_stars.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    /// Whether the lookup succeeded.
    pub query_success: bool,
    /// Requested full name (`owner/repo`).
    pub repo_name: String,
    /// Repository description.
    pub repo_description: Option<String>,
    /// Creation time, RFC 3339.
    pub repo_created_at: Option<String>,
    /// Last metadata update, RFC 3339.
    pub repo_updated_at: Option<String>,
    /// Last push, RFC 3339.
    pub repo_last_pushed_at: Option<String>,
    /// Primary language.
    pub language: Option<String>,
    /// Star count.
    pub repo_stars: Option<u64>,
    /// Project homepage URL.
    pub homepage: Option<String>,
    /// Whether the repository is a fork.
    pub fork: Option<bool>,
    /// Upstream full name, forks only.
    pub parent_repo_name: Option<String>,
    /// Upstream star count, forks only.
    pub parent_repo_stars: Option<u64>,
    /// Repository topics.
    pub topics: Option<Vec<String>>,
}

impl RepoInfo {
    /// Record for a successful lookup of `repo_name`.
    pub fn from_payload(repo_name: &str, payload: RepoPayload) -> Self {
        let (parent_repo_name, parent_repo_stars) = match (payload.fork, payload.parent) {
            (true, Some(parent)) => (parent.full_name, parent.stargazers_count),
            _ => (None, None),
        };

        Self {
            query_success: true,
            repo_name: repo_name.to_string(),
            repo_description: payload.description,
            repo_created_at: payload.created_at.map(format_timestamp),
            repo_updated_at: payload.updated_at.map(format_timestamp),
            repo_last_pushed_at: payload.pushed_at.map(format_timestamp),
            language: payload.language,
            repo_stars: payload.stargazers_count,
            homepage: payload.homepage,
            fork: Some(payload.fork),
            parent_repo_name,
            parent_repo_stars,
            topics: Some(payload.topics),
        }
    }

    /// Record for a failed lookup: only the name is filled in.
    pub fn failed(repo_name: &str) -> Self {
        Self {
            query_success: false,
            repo_name: repo_name.to_string(),
            ..Self::default()
        }
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

/// Fetch metadata for each name in order, one request at a time.
///
/// A failed lookup is logged and recorded as [`RepoInfo::failed`]; it never
/// aborts the run. `on_progress` is called after each repository.
pub async fn fetch_all<S, F>(source: &S, names: &[String], mut on_progress: F) -> Vec<RepoInfo>
where
    S: RepoMetadataSource,
    F: FnMut(&RepoInfo),
{
    let mut records = Vec::with_capacity(names.len());

    for name in names {
        let info = match source.fetch_repo(name).await {
            Ok(payload) => {
                debug!(repo = %name, "fetched repository metadata");
                RepoInfo::from_payload(name, payload)
            }
            Err(e) => {
                warn!(repo = %name, error = %e, "repository lookup failed");
                RepoInfo::failed(name)
            }
        };
        on_progress(&info);
        records.push(info);
    }

    records
}

/// Column-per-field view of a batch of [`RepoInfo`] records.
///
/// Every column has one entry per record.
///
/// # Examples
///
/// ```
/// use commitnet_github::repo_info::{RepoInfo, RepoInfoColumns};
///
/// let records = vec![RepoInfo::failed("a/b"), RepoInfo::failed("c/d")];
/// let columns = RepoInfoColumns::from_records(&records);
/// assert_eq!(columns.repo_name, vec!["a/b", "c/d"]);
/// assert_eq!(columns.query_success, vec![false, false]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoInfoColumns {
    pub query_success: Vec<bool>,
    pub repo_name: Vec<String>,
    pub repo_description: Vec<Option<String>>,
    pub repo_created_at: Vec<Option<String>>,
    pub repo_updated_at: Vec<Option<String>>,
    pub repo_last_pushed_at: Vec<Option<String>>,
    pub language: Vec<Option<String>>,
    pub repo_stars: Vec<Option<u64>>,
    pub homepage: Vec<Option<String>>,
    pub fork: Vec<Option<bool>>,
    pub parent_repo_name: Vec<Option<String>>,
    pub parent_repo_stars: Vec<Option<u64>>,
    pub topics: Vec<Option<Vec<String>>>,
}

impl RepoInfoColumns {
    /// Transpose records into columns.
    pub fn from_records(records: &[RepoInfo]) -> Self {
        let mut columns = Self::default();
        for r in records {
            columns.query_success.push(r.query_success);
            columns.repo_name.push(r.repo_name.clone());
            columns.repo_description.push(r.repo_description.clone());
            columns.repo_created_at.push(r.repo_created_at.clone());
            columns.repo_updated_at.push(r.repo_updated_at.clone());
            columns.repo_last_pushed_at.push(r.repo_last_pushed_at.clone());
            columns.language.push(r.language.clone());
            columns.repo_stars.push(r.repo_stars);
            columns.homepage.push(r.homepage.clone());
            columns.fork.push(r.fork);
            columns.parent_repo_name.push(r.parent_repo_name.clone());
            columns.parent_repo_stars.push(r.parent_repo_stars);
            columns.topics.push(r.topics.clone());
        }
        columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.repo_name.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.repo_name.is_empty()
    }
}

/// Flat CSV row; topics are joined with `;`.
#[derive(Debug, Serialize)]
struct RepoInfoRow<'a> {
    query_success: bool,
    repo_name: &'a str,
    repo_description: Option<&'a str>,
    repo_created_at: Option<&'a str>,
    repo_updated_at: Option<&'a str>,
    repo_last_pushed_at: Option<&'a str>,
    language: Option<&'a str>,
    repo_stars: Option<u64>,
    homepage: Option<&'a str>,
    fork: Option<bool>,
    parent_repo_name: Option<&'a str>,
    parent_repo_stars: Option<u64>,
    topics: Option<String>,
}

impl<'a> From<&'a RepoInfo> for RepoInfoRow<'a> {
    fn from(r: &'a RepoInfo) -> Self {
        Self {
            query_success: r.query_success,
            repo_name: &r.repo_name,
            repo_description: r.repo_description.as_deref(),
            repo_created_at: r.repo_created_at.as_deref(),
            repo_updated_at: r.repo_updated_at.as_deref(),
            repo_last_pushed_at: r.repo_last_pushed_at.as_deref(),
            language: r.language.as_deref(),
            repo_stars: r.repo_stars,
            homepage: r.homepage.as_deref(),
            fork: r.fork,
            parent_repo_name: r.parent_repo_name.as_deref(),
            parent_repo_stars: r.parent_repo_stars,
            topics: r.topics.as_ref().map(|t| t.join(";")),
        }
    }
}

/// Write records to a CSV file, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`CommitnetError::Io`] or [`CommitnetError::Data`] on write failure.
pub fn write_repo_info(path: &Path, records: &[RepoInfo]) -> Result<(), CommitnetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_repo_info_to(file, records)
}

/// Write records as CSV to any sink.
///
/// # Errors
///
/// Returns [`CommitnetError::Data`] on write failure.
pub fn write_repo_info_to<W: Write>(writer: W, records: &[RepoInfo]) -> Result<(), CommitnetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer
            .serialize(RepoInfoRow::from(record))
            .map_err(|e| CommitnetError::Data(format!("failed to write repository info: {e}")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::TimeZone;

    struct FakeSource {
        repos: HashMap<String, RepoPayload>,
    }

    impl RepoMetadataSource for FakeSource {
        async fn fetch_repo(&self, full_name: &str) -> Result<RepoPayload, CommitnetError> {
            self.repos
                .get(full_name)
                .cloned()
                .ok_or_else(|| CommitnetError::GitHub(format!("404 Not Found: {full_name}")))
        }
    }

    fn payload(name: &str, stars: u64) -> RepoPayload {
        RepoPayload {
            full_name: Some(name.into()),
            description: Some(format!("{name} description")),
            created_at: Some(Utc.with_ymd_and_hms(2019, 3, 4, 5, 6, 7).unwrap()),
            language: Some("Rust".into()),
            stargazers_count: Some(stars),
            topics: vec!["graphs".into()],
            ..RepoPayload::default()
        }
    }

    #[test]
    fn non_fork_has_no_parent_fields() {
        let mut p = payload("a/b", 3);
        // A parent on a non-fork payload is ignored.
        p.parent = Some(Box::new(payload("up/b", 100)));
        let info = RepoInfo::from_payload("a/b", p);
        assert!(info.query_success);
        assert_eq!(info.fork, Some(false));
        assert!(info.parent_repo_name.is_none());
        assert!(info.parent_repo_stars.is_none());
        assert_eq!(info.repo_stars, Some(3));
    }

    #[test]
    fn fork_takes_parent_name_and_stars() {
        let mut p = payload("me/b", 1);
        p.fork = true;
        p.parent = Some(Box::new(payload("up/b", 100)));
        let info = RepoInfo::from_payload("me/b", p);
        assert_eq!(info.fork, Some(true));
        assert_eq!(info.parent_repo_name.as_deref(), Some("up/b"));
        assert_eq!(info.parent_repo_stars, Some(100));
    }

    #[test]
    fn timestamps_use_offset_format() {
        let info = RepoInfo::from_payload("a/b", payload("a/b", 3));
        assert_eq!(
            info.repo_created_at.as_deref(),
            Some("2019-03-04 05:06:07+00:00")
        );
        assert!(info.repo_updated_at.is_none());
    }

    #[tokio::test]
    async fn fetch_all_keeps_order_and_records_failures() {
        let source = FakeSource {
            repos: [("a/one".to_string(), payload("a/one", 10))]
                .into_iter()
                .collect(),
        };
        let names = vec!["a/one".to_string(), "b/missing".to_string()];

        let mut seen = Vec::new();
        let records = fetch_all(&source, &names, |info| seen.push(info.repo_name.clone())).await;

        assert_eq!(seen, names);
        assert_eq!(records.len(), 2);
        assert!(records[0].query_success);
        assert_eq!(records[0].repo_stars, Some(10));
        assert_eq!(records[1], RepoInfo::failed("b/missing"));
    }

    #[test]
    fn columns_have_equal_lengths() {
        let records = vec![
            RepoInfo::from_payload("a/b", payload("a/b", 3)),
            RepoInfo::failed("c/d"),
        ];
        let columns = RepoInfoColumns::from_records(&records);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.repo_stars, vec![Some(3), None]);
        assert_eq!(columns.topics[0].as_deref(), Some(&["graphs".to_string()][..]));

        let json = serde_json::to_value(&columns).unwrap();
        for (key, column) in json.as_object().unwrap() {
            assert_eq!(column.as_array().unwrap().len(), 2, "column {key}");
        }
    }

    #[test]
    fn csv_output_flattens_topics() {
        let mut p = payload("a/b", 3);
        p.topics = vec!["x".into(), "y".into()];
        let records = vec![RepoInfo::from_payload("a/b", p), RepoInfo::failed("c/d")];

        let mut out = Vec::new();
        write_repo_info_to(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("query_success,repo_name,"));
        assert!(lines[1].ends_with(",x;y"));
        assert!(lines[2].starts_with("false,c/d,"));
    }
}
