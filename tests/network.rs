use std::path::Path;
use std::process::{Command, Output};

const COMMITS: &str = "\
name,institution,email,repo_name,num_commits
X,I1,x@example.com,a/foo,15
Y,I2,y@example.com,a/foo,20
Z,I3,z@example.com,b/bar,5
W,I4,w@example.com,b/bar,30
V,I5,v@example.com,c/foo,25
";

const TOTALS: &str = "\
name,institution,email,total_commits
X,I1,x@example.com,50
Y,I2,y@example.com,80
Z,I3,z@example.com,5
W,I4,w@example.com,30
V,I5,v@example.com,25
";

fn write_inputs(dir: &Path) {
    std::fs::create_dir_all(dir.join("data")).unwrap();
    std::fs::write(dir.join("data/commits.csv"), COMMITS).unwrap();
    std::fs::write(dir.join("data/commits_by_committer.csv"), TOTALS).unwrap();
}

fn commitnet(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_commitnet"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn network_writes_csv_with_default_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = commitnet(dir.path(), &["network", "--output", "data/network.csv"]);
    assert!(
        output.status.success(),
        "commitnet network failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let csv = std::fs::read_to_string(dir.path().join("data/network.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3, "header plus two edges: {csv}");
    assert!(lines.contains(&"X,I1,15,50,Y,I2,20,80"));
    assert!(lines.contains(&"Y,I2,20,80,X,I1,15,50"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("discovered 2 connections"), "{stderr}");
}

#[test]
fn network_loose_flag_merges_owners() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = commitnet(dir.path(), &["network", "--loose", "--format", "json"]);
    assert!(output.status.success());

    let edges: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // X, Y, V all share "foo": 3 * 2 directed edges
    assert_eq!(edges.as_array().unwrap().len(), 6);
}

#[test]
fn network_fails_on_missing_committer() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(
        dir.path().join("data/commits_by_committer.csv"),
        "name,institution,email,total_commits\nX,I1,x@example.com,50\n",
    )
    .unwrap();

    let output = commitnet(dir.path(), &["network"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("y@example.com"), "{stderr}");
}

#[test]
fn network_reads_loose_mode_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(
        dir.path().join(".commitnet.toml"),
        "[network]\nallow_loose_connection = true\n",
    )
    .unwrap();

    let output = commitnet(dir.path(), &["network", "--format", "json"]);
    assert!(output.status.success());
    let edges: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(edges.as_array().unwrap().len(), 6);
}

#[test]
fn network_strict_flag_overrides_loose_config() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(
        dir.path().join(".commitnet.toml"),
        "[network]\nallow_loose_connection = true\n",
    )
    .unwrap();

    let output = commitnet(dir.path(), &["network", "--strict", "--format", "json"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let edges: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // Only X <-> Y share a/foo
    assert_eq!(edges.as_array().unwrap().len(), 2);
    assert!(edges[0]["source"]["num_commits"].is_u64());
}

#[test]
fn network_rejects_loose_with_strict() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = commitnet(dir.path(), &["network", "--loose", "--strict"]);
    assert!(!output.status.success());
}
