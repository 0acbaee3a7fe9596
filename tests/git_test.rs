//! Integration tests for git plumbing against a throwaway repository

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use devmate::core::GitRepo;

fn git(workdir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo() -> (TempDir, GitRepo) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    git(&root, &["init", "-q", "-b", "main"]);
    git(&root, &["config", "user.name", "Test User"]);
    git(&root, &["config", "user.email", "test@example.com"]);
    let repo = GitRepo::new(root);
    (temp_dir, repo)
}

#[test]
fn test_status_splits_staged_and_unstaged() {
    let (_temp_dir, repo) = init_repo();
    fs::write(repo.workdir().join("staged.rs"), "fn a() {}").unwrap();
    fs::write(repo.workdir().join("untracked.rs"), "fn b() {}").unwrap();
    git(repo.workdir(), &["add", "staged.rs"]);

    let entries = repo.status().unwrap();
    assert_eq!(entries.len(), 2);

    let staged: Vec<_> = entries.iter().filter(|e| e.is_staged()).collect();
    let unstaged: Vec<_> = entries.iter().filter(|e| e.has_worktree_changes()).collect();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].path, Path::new("staged.rs"));
    assert_eq!(staged[0].index_status, 'A');
    assert_eq!(unstaged.len(), 1);
    assert_eq!(unstaged[0].path, Path::new("untracked.rs"));
    assert_eq!(unstaged[0].worktree_status, '?');
}

#[test]
fn test_stage_and_unstage_round_trip() {
    let (_temp_dir, repo) = init_repo();
    fs::write(repo.workdir().join("file.rs"), "fn f() {}").unwrap();

    repo.stage(Path::new("file.rs")).unwrap();
    assert_eq!(repo.staged_file_names().unwrap(), vec!["file.rs"]);

    repo.unstage(Path::new("file.rs")).unwrap();
    assert!(repo.staged_file_names().unwrap().is_empty());
}

#[test]
fn test_diff_cached_contains_staged_change() {
    let (_temp_dir, repo) = init_repo();
    fs::write(repo.workdir().join("lib.rs"), "pub fn answer() -> u32 { 42 }\n").unwrap();
    repo.stage(Path::new("lib.rs")).unwrap();

    let diff = repo.diff_cached().unwrap();
    assert!(diff.contains("lib.rs"));
    assert!(diff.contains("pub fn answer()"));
}

#[test]
fn test_commit_and_branch() {
    let (_temp_dir, repo) = init_repo();
    fs::write(repo.workdir().join("lib.rs"), "pub fn f() {}\n").unwrap();
    repo.stage(Path::new("lib.rs")).unwrap();

    repo.commit("feat: add f").unwrap();

    assert_eq!(repo.current_branch().as_deref(), Some("main"));
    let entries = repo.status().unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_status_decodes_non_ascii_path() {
    let (_temp_dir, repo) = init_repo();
    fs::write(repo.workdir().join("文件.txt"), "content").unwrap();

    let entries = repo.status().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, Path::new("文件.txt"));
}
