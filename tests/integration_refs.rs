// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the reference sanitizer on real directory trees.

use forgesync::git::refs::sanitize_injected_refs;
use std::path::Path;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

const SHA_A: &str = "4ec271cc4be73a9d7b6d3f3d55ec518957b1b1a0";
const SHA_B: &str = "58be7214d4875756a9a4b3151263bf7e86028e8a";

fn write_packed_refs(repo: &Path, contents: &str) {
    std::fs::write(repo.join("packed-refs"), contents).expect("failed to write packed-refs");
}

fn write_loose_pull_ref(repo: &Path, number: u32, sha: &str) {
    let dir = repo.join("refs").join("pull").join(number.to_string());
    std::fs::create_dir_all(&dir).expect("failed to create pull ref dir");
    std::fs::write(dir.join("head"), format!("{sha}\n")).expect("failed to write loose ref");
}

#[test]
fn test_loose_and_packed_pull_refs_removed() {
    let temp = temp_dir();
    let repo = temp.path();

    std::fs::create_dir_all(repo.join("refs").join("heads")).unwrap();
    write_loose_pull_ref(repo, 42, SHA_A);
    write_packed_refs(
        repo,
        &format!("{SHA_A} refs/heads/main\n{SHA_B} refs/pull/42/head\n{SHA_B} refs/tags/v1\n"),
    );

    let removed = sanitize_injected_refs(repo).expect("sanitize should succeed");
    assert_eq!(removed, 1);

    assert!(!repo.join("refs").join("pull").exists());
    assert!(repo.join("refs").join("heads").exists());

    let packed = std::fs::read_to_string(repo.join("packed-refs")).unwrap();
    assert_eq!(packed, format!("{SHA_A} refs/heads/main\n{SHA_B} refs/tags/v1\n"));
}

#[test]
fn test_surviving_line_order_is_preserved() {
    let temp = temp_dir();
    let repo = temp.path();

    write_packed_refs(
        repo,
        &format!(
            "# pack-refs with: peeled fully-peeled sorted\n\
             {SHA_A} refs/heads/dev\n\
             {SHA_A} refs/pull/1/merge\n\
             {SHA_B} refs/heads/main\n\
             {SHA_B} refs/pull/2/head\n\
             {SHA_A} refs/tags/v2\n"
        ),
    );

    sanitize_injected_refs(repo).expect("sanitize should succeed");

    let packed = std::fs::read_to_string(repo.join("packed-refs")).unwrap();
    let lines: Vec<String> = packed.lines().map(str::to_string).collect();
    let expected = vec![
        "# pack-refs with: peeled fully-peeled sorted".to_string(),
        format!("{SHA_A} refs/heads/dev"),
        format!("{SHA_B} refs/heads/main"),
        format!("{SHA_A} refs/tags/v2"),
    ];
    assert_eq!(lines, expected);
}

#[test]
fn test_sanitize_without_packed_refs_or_pull_dir() {
    let temp = temp_dir();
    let repo = temp.path();
    std::fs::create_dir_all(repo.join("refs").join("heads")).unwrap();

    let removed = sanitize_injected_refs(repo).expect("sanitize should succeed");
    assert_eq!(removed, 0);
}

#[test]
fn test_clean_packed_refs_left_untouched() {
    let temp = temp_dir();
    let repo = temp.path();

    let contents = format!("{SHA_A} refs/heads/main\n{SHA_B} refs/tags/v1\n");
    write_packed_refs(repo, &contents);

    let removed = sanitize_injected_refs(repo).expect("sanitize should succeed");
    assert_eq!(removed, 0);
    assert_eq!(
        std::fs::read_to_string(repo.join("packed-refs")).unwrap(),
        contents
    );
}

#[test]
fn test_sanitize_runs_repeatedly() {
    // The host re-injects pull refs on every fetch; sanitizing an
    // already-clean mirror must be a no-op, not an error.
    let temp = temp_dir();
    let repo = temp.path();

    write_loose_pull_ref(repo, 7, SHA_A);
    write_packed_refs(repo, &format!("{SHA_A} refs/pull/7/head\n"));

    assert_eq!(sanitize_injected_refs(repo).unwrap(), 1);
    assert_eq!(sanitize_injected_refs(repo).unwrap(), 0);
    assert_eq!(
        std::fs::read_to_string(repo.join("packed-refs")).unwrap(),
        ""
    );
}
