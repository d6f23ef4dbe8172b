//! End-to-end publishing against a local bare remote.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use kata_core::ChallengeRecord;
use kata_publish::{GitPublisher, PublishError, PublishOutcome, Publisher};
use pretty_assertions::assert_eq;

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("git {} failed: {e}", args.join(" ")));
    assert!(
        output.status.success(),
        "git {} failed:\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A work tree on `main` with one commit, tracking a bare `origin`.
fn work_tree_with_remote() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let remote = dir.path().join("remote.git");
    let work = dir.path().join("work");
    fs::create_dir_all(&remote).unwrap();
    fs::create_dir_all(&work).unwrap();

    run_git(&remote, &["init", "--bare", "--initial-branch=main"]);
    run_git(&work, &["init", "--initial-branch=main"]);
    for (key, val) in [
        ("user.email", "test@kata-sync.dev"),
        ("user.name", "Kata Sync Test"),
        ("commit.gpgsign", "false"),
    ] {
        run_git(&work, &["config", key, val]);
    }
    fs::write(work.join("README.md"), "# katas\n").unwrap();
    run_git(&work, &["add", "."]);
    run_git(&work, &["commit", "-m", "initial commit"]);
    run_git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
    run_git(&work, &["push", "origin", "main"]);

    (dir, work, remote)
}

fn record(id: &str, name: &str) -> ChallengeRecord {
    ChallengeRecord::new(
        id,
        name,
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        vec!["ruby".into()],
    )
}

#[tokio::test]
async fn commits_and_pushes_changed_store() {
    let (_dir, work, remote) = work_tree_with_remote();
    let store = work.join("completed_kata.json");
    fs::write(&store, "[]\n").unwrap();

    let publisher = GitPublisher::new(&work, &store).with_timeout(Duration::from_secs(60));
    let outcome = publisher.publish(&record("kata-1", "Multiply")).await.unwrap();

    assert_eq!(outcome, PublishOutcome::Committed);
    let subject = run_git(&remote, &["log", "-1", "--format=%s", "main"]);
    assert_eq!(subject.trim(), "Multiply - 2024-01-02T03:04:05.000Z");
}

#[tokio::test]
async fn unchanged_store_is_not_committed() {
    let (_dir, work, remote) = work_tree_with_remote();
    let store = work.join("completed_kata.json");
    fs::write(&store, "[]\n").unwrap();
    let publisher = GitPublisher::new(&work, &store);

    let first = publisher.publish(&record("kata-1", "First")).await.unwrap();
    let second = publisher.publish(&record("kata-2", "Second")).await.unwrap();

    assert_eq!(first, PublishOutcome::Committed);
    assert_eq!(second, PublishOutcome::NothingToCommit);
    let count = run_git(&remote, &["rev-list", "--count", "main"]);
    assert_eq!(count.trim(), "2");
}

#[tokio::test]
async fn subdirectory_of_work_tree_is_rejected() {
    let (_dir, work, remote) = work_tree_with_remote();
    let nested = work.join("data");
    fs::create_dir_all(&nested).unwrap();
    let store = nested.join("completed_kata.json");
    fs::write(&store, "[]\n").unwrap();

    let err = GitPublisher::new(&nested, &store)
        .publish(&record("kata-1", "Nested"))
        .await
        .unwrap_err();

    assert!(err.is_not_a_repository());
    let count = run_git(&remote, &["rev-list", "--count", "main"]);
    assert_eq!(count.trim(), "1");
}

#[tokio::test]
async fn plain_directory_inside_unrelated_repository_is_rejected() {
    let (_dir, work, _remote) = work_tree_with_remote();
    let katas = work.join("vendor").join("katas");
    fs::create_dir_all(&katas).unwrap();
    let store = katas.join("completed_kata.json");
    fs::write(&store, "[]\n").unwrap();

    let err = GitPublisher::new(&katas, &store)
        .publish(&record("kata-1", "Stray"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::NotAVersionControlDirectory(ref path) if *path == katas
    ));
    let status = run_git(&work, &["status", "--porcelain"]);
    assert!(status.contains("vendor/"), "store left untracked: {status}");
}

#[tokio::test]
async fn store_in_subdirectory_of_root_is_committed() {
    let (_dir, work, remote) = work_tree_with_remote();
    fs::create_dir_all(work.join("data")).unwrap();
    let store = work.join("data").join("completed_kata.json");
    fs::write(&store, "[]\n").unwrap();

    let outcome = GitPublisher::new(&work, &store)
        .publish(&record("kata-1", "Nested"))
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Committed);
    let files = run_git(&remote, &["show", "--name-only", "--format=", "main"]);
    assert_eq!(files.trim(), "data/completed_kata.json");
}

#[tokio::test]
async fn missing_remote_is_a_git_error() {
    let (_dir, work, _remote) = work_tree_with_remote();
    let store = work.join("completed_kata.json");
    fs::write(&store, "[]\n").unwrap();

    let err = GitPublisher::new(&work, &store)
        .with_remote("upstream")
        .publish(&record("kata-1", "Lost"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::Git { ref command, .. } if command == "git pull upstream main"
    ));
}
