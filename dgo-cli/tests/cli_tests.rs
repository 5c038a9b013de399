mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

use common::{git_available, Remote};

const MARKER: &str = ".dgo";

macro_rules! require_git {
    () => {
        if !git_available() {
            eprintln!("skipping: git executable not found on PATH");
            return;
        }
    };
}

struct Dirs {
    root: TempDir,
}

impl Dirs {
    fn new() -> Self {
        let dirs = Self {
            root: TempDir::new().expect("tempdir"),
        };
        fs::create_dir_all(dirs.stacks()).expect("mkdir stacks");
        dirs
    }

    fn stacks(&self) -> PathBuf {
        self.root.path().join("stacks")
    }

    fn repo(&self) -> PathBuf {
        self.root.path().join("repo")
    }

    fn env_file(&self) -> PathBuf {
        self.root.path().join("env/.env")
    }
}

/// The binary with a clean environment and every path inside `dirs`.
fn dgo_cmd(dirs: &Dirs, repo_url: Option<&str>) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dockge-gitops"));
    for var in [
        "REPO_URL",
        "PAT",
        "POLLING_RATE",
        "DOCKGE_STACKS_DIR",
        "REPO_DIR",
        "ENV_FILE",
        "LOG_FORMAT",
        "VCS_BACKEND",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("DOCKGE_STACKS_DIR", dirs.stacks())
        .env("REPO_DIR", dirs.repo())
        .env("ENV_FILE", dirs.env_file())
        .env("RUST_LOG", "info");
    if let Some(url) = repo_url {
        cmd.env("REPO_URL", url);
    }
    cmd
}

fn seeded_remote(stacks: &[&str]) -> Remote {
    let remote = Remote::new();
    for stack in stacks {
        remote.write(&format!("{stack}/compose.yaml"), "services: {}\n");
    }
    remote.commit_and_push("stacks");
    remote
}

fn is_managed(dir: &Path) -> bool {
    dir.join(MARKER).is_file()
}

#[test]
fn missing_repo_url_fails_before_touching_anything() {
    let dirs = Dirs::new();

    dgo_cmd(&dirs, None)
        .arg("once")
        .assert()
        .failure()
        .stderr(contains("REPO_URL"));

    assert!(!dirs.repo().exists());
}

#[test]
fn bad_polling_rate_is_rejected() {
    let dirs = Dirs::new();

    dgo_cmd(&dirs, Some("https://example.com/stacks.git"))
        .args(["once", "--polling-rate", "5d"])
        .assert()
        .failure()
        .stderr(contains("invalid unit: d"));
}

#[test]
fn unknown_log_format_is_a_usage_error() {
    let dirs = Dirs::new();

    dgo_cmd(&dirs, Some("https://example.com/stacks.git"))
        .args(["once", "--log-format", "yaml"])
        .assert()
        .failure()
        .stderr(contains("unknown log format 'yaml'"));
}

#[test]
fn clean_wipes_mirror_contents() {
    let dirs = Dirs::new();
    fs::create_dir_all(dirs.repo().join(".git")).unwrap();
    fs::write(dirs.repo().join("README.md"), "x").unwrap();

    dgo_cmd(&dirs, None)
        .arg("clean")
        .assert()
        .success()
        .stdout(contains("removed 2 entries"));

    assert!(dirs.repo().is_dir());
    assert_eq!(fs::read_dir(dirs.repo()).unwrap().count(), 0);
}

#[test]
fn status_json_without_mirror() {
    let dirs = Dirs::new();
    fs::create_dir_all(dirs.stacks().join("manual")).unwrap();

    let output = dgo_cmd(&dirs, Some("https://ghp_secret@example.com/stacks.git"))
        .args(["status", "--json"])
        .output()
        .expect("run status");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("status json");
    assert!(json["mirror"]["head"].is_null());
    assert_eq!(json["mirror"]["remote_url"], "https://***@example.com/stacks.git");
    assert_eq!(json["stacks"][0]["name"], "manual");
    assert_eq!(json["stacks"][0]["managed"], false);
}

#[test]
fn once_clones_and_projects_stacks() {
    require_git!();
    let remote = seeded_remote(&["a", "b"]);
    let dirs = Dirs::new();

    dgo_cmd(&dirs, Some(&remote.url()))
        .arg("once")
        .assert()
        .success()
        .stdout(contains("repo cloned"));

    assert!(dirs.repo().join(".git").is_dir());
    assert!(is_managed(&dirs.stacks().join("a")));
    assert!(is_managed(&dirs.stacks().join("b")));
    assert!(dirs.stacks().join("a/compose.yaml").is_file());

    dgo_cmd(&dirs, Some(&remote.url()))
        .arg("once")
        .assert()
        .success()
        .stdout(contains("repo is up to date"));
}

#[test]
fn once_pulls_and_prunes_removed_stacks() {
    require_git!();
    let remote = seeded_remote(&["a", "b"]);
    let dirs = Dirs::new();
    dgo_cmd(&dirs, Some(&remote.url())).arg("once").assert().success();

    remote.remove_dir("b");
    remote.write("a/compose.yaml", "services:\n  web: {}\n");
    remote.commit_and_push("drop b");

    dgo_cmd(&dirs, Some(&remote.url()))
        .arg("once")
        .assert()
        .success()
        .stdout(contains("repo pulled"));

    assert!(!dirs.stacks().join("b").exists());
    assert_eq!(
        fs::read_to_string(dirs.stacks().join("a/compose.yaml")).unwrap(),
        "services:\n  web: {}\n"
    );
}

#[test]
fn conflict_exits_non_zero_and_keeps_mirror() {
    require_git!();
    let remote = seeded_remote(&["c"]);
    let dirs = Dirs::new();
    let manual = dirs.stacks().join("c");
    fs::create_dir_all(&manual).unwrap();
    fs::write(manual.join("compose.yaml"), "hand-made\n").unwrap();

    dgo_cmd(&dirs, Some(&remote.url()))
        .arg("once")
        .assert()
        .failure()
        .stderr(contains("conflicting stack"));

    assert!(dirs.repo().join(".git").is_dir());
    assert_eq!(fs::read_to_string(manual.join("compose.yaml")).unwrap(), "hand-made\n");
    assert!(!is_managed(&manual));
}

#[test]
fn unreachable_remote_wipes_mirror() {
    require_git!();
    let remote = seeded_remote(&["a"]);
    let dirs = Dirs::new();
    dgo_cmd(&dirs, Some(&remote.url())).arg("once").assert().success();

    fs::remove_dir_all(&remote.bare).unwrap();

    dgo_cmd(&dirs, Some(&remote.url()))
        .arg("once")
        .assert()
        .failure();

    assert!(dirs.repo().is_dir());
    assert_eq!(fs::read_dir(dirs.repo()).unwrap().count(), 0);
    assert!(is_managed(&dirs.stacks().join("a")));
}

#[test]
fn env_file_is_copied_into_stacks() {
    require_git!();
    let remote = seeded_remote(&["a"]);
    let dirs = Dirs::new();
    fs::create_dir_all(dirs.env_file().parent().unwrap()).unwrap();
    fs::write(dirs.env_file(), "TZ=UTC\n").unwrap();

    dgo_cmd(&dirs, Some(&remote.url()))
        .arg("once")
        .assert()
        .success()
        .stdout(contains(".env copied"));

    assert_eq!(
        fs::read_to_string(dirs.stacks().join("a/.env")).unwrap(),
        "TZ=UTC\n"
    );
}
