// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests for the sync engine: wiremock-backed hosting APIs
//! driving real local repositories through the full pipeline.

use forgesync::forge::dest::DestClient;
use forgesync::forge::source::SourceClient;
use forgesync::git::cache::MirrorCache;
use forgesync::sync::{SyncContext, sync_account};
use serde_json::json;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_work_repo(path: &Path) -> String {
    std::fs::create_dir_all(path).expect("failed to create repo dir");
    git(&["init", "--quiet"], path);
    git(&["config", "user.email", "test@example.com"], path);
    git(&["config", "user.name", "Test"], path);
    git(
        &["commit", "--allow-empty", "-m", "Initial commit", "--quiet"],
        path,
    );
    git(&["branch", "--show-current"], path)
}

fn init_bare_repo(path: &Path) {
    std::fs::create_dir_all(path).expect("failed to create bare dir");
    git(&["init", "--bare", "--quiet"], path);
}

async fn mock_destination_repo(server: &MockServer, name: &str, clone_url: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/repos/mirror-org/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "clone_url": clone_url
        })))
        .mount(server)
        .await;
}

fn context(server: &MockServer, cache_root: &Path) -> SyncContext {
    SyncContext::builder()
        .source(SourceClient::new("src-tok").with_base_url(server.uri()))
        .dest(DestClient::new(&server.uri(), "dst-tok").unwrap())
        .source_account("some-org".to_string())
        .dest_account("mirror-org".to_string())
        .cache(MirrorCache::new(cache_root))
        .repo_timeout(Duration::from_secs(60))
        .poll_interval(Duration::from_secs(1))
        .build()
}

#[tokio::test]
async fn test_one_cycle_mirrors_branches_and_tags() {
    let temp = temp_dir();
    let source_path = temp.path().join("good");
    let dest_path = temp.path().join("good.git");
    let branch = init_work_repo(&source_path);
    git(&["tag", "v1"], &source_path);
    git(&["tag", "v2"], &source_path);

    // Destination already exists, seeded with a tag the source lost.
    init_bare_repo(&dest_path);
    let seed_path = temp.path().join("seed");
    init_work_repo(&seed_path);
    git(&["tag", "v1"], &seed_path);
    git(&["tag", "v3"], &seed_path);
    git(
        &["push", "--mirror", "--quiet", dest_path.to_str().unwrap()],
        &seed_path,
    );

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/some-org/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "good",
            "clone_url": source_path.display().to_string(),
            "default_branch": branch
        }])))
        .mount(&server)
        .await;
    mock_destination_repo(&server, "good", &dest_path.display().to_string()).await;
    // Existing repositories must not be re-created.
    Mock::given(method("POST"))
        .and(path("/api/v3/orgs/mirror-org/repos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server, &temp.path().join("cache"));
    sync_account(&ctx).await.unwrap();

    let tags: Vec<String> = git(&["tag"], &dest_path).lines().map(str::to_string).collect();
    assert_eq!(tags, ["v1", "v2"]);
    let refs = git(&["for-each-ref", "--format=%(refname)"], &dest_path);
    assert!(refs.contains(&format!("refs/heads/{branch}")));
}

#[tokio::test]
async fn test_failing_repository_does_not_stop_the_batch() {
    let temp = temp_dir();

    // First listed repository points at a clone URL that cannot exist.
    let broken_source = temp.path().join("nowhere").join("broken");
    let good_source = temp.path().join("good");
    let good_dest = temp.path().join("good.git");
    let branch = init_work_repo(&good_source);
    init_bare_repo(&good_dest);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/some-org/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "broken",
                "clone_url": broken_source.display().to_string(),
                "default_branch": branch
            },
            {
                "name": "good",
                "clone_url": good_source.display().to_string(),
                "default_branch": branch
            }
        ])))
        .mount(&server)
        .await;
    mock_destination_repo(&server, "broken", "https://git.internal.test/mirror-org/broken.git")
        .await;
    mock_destination_repo(&server, "good", &good_dest.display().to_string()).await;

    let ctx = context(&server, &temp.path().join("cache"));

    // The batch itself reports success; the broken repository is logged
    // and skipped, the good one still syncs.
    sync_account(&ctx).await.unwrap();

    let refs = git(&["for-each-ref", "--format=%(refname)"], &good_dest);
    assert!(refs.contains(&format!("refs/heads/{branch}")));
    assert!(!temp.path().join("cache").join("broken").exists());
}

#[tokio::test]
async fn test_listing_failure_is_a_batch_error() {
    let temp = temp_dir();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/some-org/repos"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let ctx = context(&server, &temp.path().join("cache"));
    assert!(sync_account(&ctx).await.is_err());
}

#[tokio::test]
async fn test_second_cycle_reuses_the_cache() {
    let temp = temp_dir();
    let source_path = temp.path().join("good");
    let dest_path = temp.path().join("good.git");
    let branch = init_work_repo(&source_path);
    init_bare_repo(&dest_path);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/some-org/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "good",
            "clone_url": source_path.display().to_string(),
            "default_branch": branch
        }])))
        .mount(&server)
        .await;
    mock_destination_repo(&server, "good", &dest_path.display().to_string()).await;

    let ctx = context(&server, &temp.path().join("cache"));
    sync_account(&ctx).await.unwrap();

    let mirror_dir = temp.path().join("cache").join("good");
    let marker = mirror_dir.join("reuse-marker");
    std::fs::write(&marker, "still here").unwrap();

    // New commit on the source; the second cycle must fetch it through the
    // existing mirror, not re-clone.
    git(
        &["commit", "--allow-empty", "-m", "Second commit", "--quiet"],
        &source_path,
    );
    sync_account(&ctx).await.unwrap();

    assert!(marker.is_file(), "existing mirror must not be re-cloned");
    assert_eq!(
        git(&["rev-parse", "HEAD"], &source_path),
        git(
            &["rev-parse", &format!("refs/heads/{branch}")],
            &dest_path
        )
    );
}
