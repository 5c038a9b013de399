//! [`VcsBackend`] implemented on the embedded libgit2 library.

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Cred, FetchOptions, RemoteCallbacks, Repository};

use dgo_core::{CommitId, MirrorHead};

use crate::backend::VcsBackend;
use crate::credential::scrub;
use crate::error::{op_err, state_err, VcsError};

const ORIGIN: &str = "origin";

/// Embedded git backend; needs no `git` executable on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct Libgit2;

impl Libgit2 {
    pub fn new() -> Self {
        Self
    }
}

/// Fetch options answering credential requests from the URL's user info.
fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut attempts = 0u8;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, allowed| {
        attempts += 1;
        // libgit2 re-asks after a rejected credential; answer once only.
        if attempts > 1 {
            return Err(git2::Error::from_str("authentication failed"));
        }
        match username_from_url {
            Some(user) if allowed.is_user_pass_plaintext() => Cred::userpass_plaintext(user, ""),
            Some(user) if allowed.is_ssh_key() => Cred::ssh_key_from_agent(user),
            _ => Cred::default(),
        }
    });
    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

fn open(mirror: &Path, step: &'static str) -> Result<Repository, VcsError> {
    Repository::open(mirror).map_err(|err| state_err(mirror, step, err.message()))
}

fn fetch_branch(repo: &Repository, mirror: &Path, branch: &str) -> Result<(), String> {
    let mut remote = repo.find_remote(ORIGIN).map_err(|err| err.message().to_string())?;
    let url = remote.url().unwrap_or_default().to_string();
    let refspec = format!("+refs/heads/{branch}:refs/remotes/{ORIGIN}/{branch}");
    remote
        .fetch(&[refspec.as_str()], Some(&mut fetch_options()), None)
        .map_err(|err| scrub(err.message(), &url))?;
    tracing::debug!(path = %mirror.display(), branch, "libgit2 fetch finished");
    Ok(())
}

impl VcsBackend for Libgit2 {
    fn ensure_mirror(&self, url: &str, mirror: &Path) -> Result<(), VcsError> {
        RepoBuilder::new()
            .fetch_options(fetch_options())
            .clone(url, mirror)
            .map_err(|err| op_err(mirror, "cloning", scrub(err.message(), url)))?;
        Ok(())
    }

    fn current_commit(&self, mirror: &Path) -> Result<MirrorHead, VcsError> {
        let repo = open(mirror, "local head")?;
        let head = repo
            .head()
            .map_err(|err| state_err(mirror, "local head", err.message()))?;
        if !head.is_branch() {
            return Err(state_err(mirror, "local head", "HEAD is not on a branch"));
        }
        let branch = head
            .shorthand()
            .ok_or_else(|| state_err(mirror, "local head", "branch name is not UTF-8"))?
            .to_string();
        let commit = head
            .peel_to_commit()
            .map_err(|err| state_err(mirror, "local head", err.message()))?;

        Ok(MirrorHead {
            branch,
            commit: CommitId::from(commit.id().to_string()),
        })
    }

    fn remote_commit(&self, mirror: &Path, branch: &str) -> Result<CommitId, VcsError> {
        let repo = open(mirror, "fetch")?;
        fetch_branch(&repo, mirror, branch).map_err(|msg| state_err(mirror, "fetch", msg))?;

        let tracking = format!("refs/remotes/{ORIGIN}/{branch}");
        let oid = repo
            .refname_to_id(&tracking)
            .map_err(|err| state_err(mirror, "remote ref", err.message()))?;
        Ok(CommitId::from(oid.to_string()))
    }

    fn fast_forward(&self, mirror: &Path, branch: &str) -> Result<(), VcsError> {
        let repo = Repository::open(mirror).map_err(|err| op_err(mirror, "pulling", err.message()))?;
        fetch_branch(&repo, mirror, branch).map_err(|msg| op_err(mirror, "pulling", msg))?;

        let pulling = |err: git2::Error| op_err(mirror, "pulling", err.message());
        let target = repo
            .refname_to_id(&format!("refs/remotes/{ORIGIN}/{branch}"))
            .map_err(pulling)?;
        let annotated = repo.find_annotated_commit(target).map_err(pulling)?;
        let (analysis, _) = repo.merge_analysis(&[&annotated]).map_err(pulling)?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(op_err(
                mirror,
                "pulling",
                format!("{branch} has diverged from {ORIGIN}/{branch}; not possible to fast-forward"),
            ));
        }

        let local = format!("refs/heads/{branch}");
        let mut reference = repo.find_reference(&local).map_err(pulling)?;
        reference
            .set_target(target, "dockge-gitops: fast-forward")
            .map_err(pulling)?;
        repo.set_head(&local).map_err(pulling)?;
        repo.checkout_head(Some(CheckoutBuilder::default().force()))
            .map_err(pulling)?;
        Ok(())
    }
}
