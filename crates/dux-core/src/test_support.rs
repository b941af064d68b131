//! Fixture helpers shared by unit tests: scratch repositories built with the git CLI.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run git in `dir`, panicking with stderr on failure.
pub fn git_cmd(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// `git init` with a `main` branch and a committer identity.
pub fn init_git_repo(dir: &Path) {
    git_cmd(dir, &["init"]);
    git_cmd(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git_cmd(dir, &["config", "user.email", "test@test.com"]);
    git_cmd(dir, &["config", "user.name", "Test"]);
    git_cmd(dir, &["config", "commit.gpgsign", "false"]);
}

/// Write a file and commit it.
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    fs::write(dir.join(name), content).expect("Failed to write fixture file");
    git_cmd(dir, &["add", "."]);
    git_cmd(dir, &["commit", "-m", message]);
}

/// A repo with one commit on `main`, pushed to a bare `origin` that lives
/// next to it inside `parent`. Returns the working repo path.
pub fn init_repo_with_origin(parent: &Path) -> std::path::PathBuf {
    let origin = parent.join("origin.git");
    let work = parent.join("work");
    fs::create_dir_all(&origin).unwrap();
    fs::create_dir_all(&work).unwrap();

    git_cmd(&origin, &["init", "--bare"]);
    git_cmd(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    init_git_repo(&work);
    commit_file(&work, "README.md", "hello", "initial");
    git_cmd(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
    git_cmd(&work, &["push", "-u", "origin", "main"]);
    git_cmd(&work, &["fetch", "origin"]);

    work.canonicalize().unwrap()
}
