//! Throwaway git remotes for integration tests.
//!
//! `dgo-cli/tests/common/mod.rs` and `dgo-vcs/tests/common/mod.rs` are copies
//! of each other; change both together.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

pub fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=dgo-tests",
            "-c",
            "user.email=dgo-tests@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A bare `origin` on branch `main` plus a working copy that pushes to it.
pub struct Remote {
    _root: TempDir,
    pub bare: PathBuf,
    pub work: PathBuf,
}

impl Remote {
    pub fn new() -> Self {
        let root = TempDir::new().expect("remote root");
        let bare = root.path().join("origin.git");
        let work = root.path().join("work");
        fs::create_dir_all(&bare).expect("mkdir bare");
        fs::create_dir_all(&work).expect("mkdir work");

        git(&bare, &["init", "--quiet", "--bare"]);
        git(&bare, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&work, &["init", "--quiet"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&work, &["remote", "add", "origin", &bare.display().to_string()]);

        Self {
            _root: root,
            bare,
            work,
        }
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.bare.display())
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.work.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir parent");
        }
        fs::write(path, content).expect("write file");
    }

    pub fn remove_dir(&self, rel: &str) {
        fs::remove_dir_all(self.work.join(rel)).expect("remove dir");
    }

    /// Commit everything and push `main`; returns the new commit id.
    pub fn commit_and_push(&self, message: &str) -> String {
        git(&self.work, &["add", "--all"]);
        git(&self.work, &["commit", "--quiet", "-m", message]);
        git(&self.work, &["push", "--quiet", "origin", "main"]);
        git(&self.work, &["rev-parse", "HEAD"])
    }
}
