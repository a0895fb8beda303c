//! CSV loading and writing.
//!
//! Reads the `commits` and `committer_totals` tables and writes the
//! resulting edge list, one 8-column row per edge.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use commitnet_core::{CommitRecord, CommitnetError, CommitterTotal};
use serde::de::DeserializeOwned;

use crate::edges::CollaborationEdge;

/// Header row written before the edges.
pub const EDGE_HEADER: [&str; 8] = [
    "name_a",
    "institution_a",
    "num_commits_a",
    "total_commits_a",
    "name_b",
    "institution_b",
    "num_commits_b",
    "total_commits_b",
];

/// Read the per-(committer, repository) table from a CSV file.
///
/// # Errors
///
/// Returns [`CommitnetError::FileNotFound`] if `path` does not exist and
/// [`CommitnetError::Data`] if a row cannot be parsed.
pub fn read_commits(path: &Path) -> Result<Vec<CommitRecord>, CommitnetError> {
    read_table(path)
}

/// Read the per-committer totals table from a CSV file.
///
/// # Errors
///
/// Returns [`CommitnetError::FileNotFound`] if `path` does not exist and
/// [`CommitnetError::Data`] if a row cannot be parsed.
pub fn read_committer_totals(path: &Path) -> Result<Vec<CommitterTotal>, CommitnetError> {
    read_table(path)
}

/// Read commit records from any CSV source.
///
/// # Errors
///
/// Returns [`CommitnetError::Data`] if a row cannot be parsed.
///
/// # Examples
///
/// ```
/// use commitnet_network::records::commits_from_reader;
///
/// let csv = "name,institution,email,repo_name,num_commits\n\
///            Ada,Analytical,ada@example.com,babbage/engine,42\n";
/// let commits = commits_from_reader(csv.as_bytes(), "inline").unwrap();
/// assert_eq!(commits[0].repo_name, "babbage/engine");
/// assert_eq!(commits[0].num_commits, 42);
/// ```
pub fn commits_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<CommitRecord>, CommitnetError> {
    deserialize_rows(reader, source)
}

/// Read committer totals from any CSV source.
///
/// # Errors
///
/// Returns [`CommitnetError::Data`] if a row cannot be parsed.
///
/// # Examples
///
/// ```
/// use commitnet_network::records::committer_totals_from_reader;
///
/// let csv = "name,institution,email,committer_commit\n\
///            Ada,Analytical,ada@example.com,120\n";
/// let totals = committer_totals_from_reader(csv.as_bytes(), "inline").unwrap();
/// assert_eq!(totals[0].total_commits, 120);
/// ```
pub fn committer_totals_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<CommitterTotal>, CommitnetError> {
    deserialize_rows(reader, source)
}

/// Write edges to a CSV file, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`CommitnetError::Io`] or [`CommitnetError::Data`] on write failure.
pub fn write_edges(path: &Path, edges: &[CollaborationEdge]) -> Result<(), CommitnetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_edges_to(file, edges)
}

/// Write edges as CSV to any sink. The header row is always written.
///
/// # Errors
///
/// Returns [`CommitnetError::Data`] on write failure.
pub fn write_edges_to<W: Write>(
    writer: W,
    edges: &[CollaborationEdge],
) -> Result<(), CommitnetError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(EDGE_HEADER)
        .map_err(|e| CommitnetError::Data(format!("failed to write edge header: {e}")))?;
    for edge in edges {
        csv_writer
            .serialize(edge.to_row())
            .map_err(|e| CommitnetError::Data(format!("failed to write edge: {e}")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Sorted, distinct repository full names in `commits`.
///
/// # Examples
///
/// ```
/// use commitnet_core::CommitRecord;
/// use commitnet_network::records::distinct_repo_names;
///
/// let row = |repo: &str| CommitRecord {
///     name: "Ada".into(),
///     institution: String::new(),
///     email: String::new(),
///     repo_name: repo.into(),
///     num_commits: 1,
/// };
/// let names = distinct_repo_names(&[row("b/two"), row("a/one"), row("b/two")]);
/// assert_eq!(names, vec!["a/one", "b/two"]);
/// ```
pub fn distinct_repo_names(commits: &[CommitRecord]) -> Vec<String> {
    commits
        .iter()
        .map(|c| c.repo_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CommitnetError> {
    if !path.exists() {
        return Err(CommitnetError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    deserialize_rows(file, &path.display().to_string())
}

fn deserialize_rows<T: DeserializeOwned, R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<T>, CommitnetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: T = result.map_err(|e| CommitnetError::Data(format!("{source}: {e}")))?;
        rows.push(row);
    }
    Ok(rows)
}
