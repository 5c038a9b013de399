//! [`VcsBackend`] implemented by shelling out to the `git` executable.

use std::path::Path;

use dgo_core::{CommitId, MirrorHead};

use crate::backend::VcsBackend;
use crate::credential::{redact_url, scrub, scrub_userinfo};
use crate::error::{op_err, state_err, VcsError};
use crate::executor::{CommandExecutor, CommandOutput, CommandRequest, ProcessExecutor};

const GIT: &str = "git";
const ORIGIN: &str = "origin";

/// Subprocess-driven git backend.
pub struct GitCli<E = ProcessExecutor> {
    executor: E,
}

impl GitCli<ProcessExecutor> {
    pub fn new() -> Self {
        Self {
            executor: ProcessExecutor,
        }
    }
}

impl Default for GitCli<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> GitCli<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    fn request<I, S>(&self, args: I, cwd: Option<&Path>) -> CommandRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Authentication failures must surface as errors, not block on a prompt.
        let request = CommandRequest::new(GIT, args).env("GIT_TERMINAL_PROMPT", "0");
        match cwd {
            Some(dir) => request.in_dir(dir),
            None => request,
        }
    }

    fn run(&self, request: &CommandRequest) -> Result<CommandOutput, String> {
        tracing::debug!(args = ?request.args, cwd = ?request.cwd, "running git");
        self.executor
            .execute(request)
            .map_err(|err| format!("failed to run {}: {err}", request.program))
    }
}

impl<E: CommandExecutor> VcsBackend for GitCli<E> {
    fn ensure_mirror(&self, url: &str, mirror: &Path) -> Result<(), VcsError> {
        let target = mirror.display().to_string();
        let request = self.request(["clone", "--quiet", "--", url, target.as_str()], None);
        let output = self
            .run(&request)
            .map_err(|msg| op_err(mirror, "cloning", msg))?;
        if !output.success() {
            return Err(op_err(
                mirror,
                "cloning",
                scrub(&output.diagnostic(), url),
            ));
        }
        tracing::debug!(url = %redact_url(url), "git clone finished");
        Ok(())
    }

    fn current_commit(&self, mirror: &Path) -> Result<MirrorHead, VcsError> {
        let branch = self
            .run(&self.request(["symbolic-ref", "--quiet", "--short", "HEAD"], Some(mirror)))
            .map_err(|msg| state_err(mirror, "local head", msg))?;
        if !branch.success() || branch.stdout.trim().is_empty() {
            return Err(state_err(
                mirror,
                "local head",
                format!("HEAD is not on a branch: {}", branch.diagnostic()),
            ));
        }

        let commit = self
            .run(&self.request(["rev-parse", "--verify", "--quiet", "HEAD^{commit}"], Some(mirror)))
            .map_err(|msg| state_err(mirror, "local head", msg))?;
        if !commit.success() || commit.stdout.trim().is_empty() {
            return Err(state_err(
                mirror,
                "local head",
                format!("HEAD does not resolve to a commit: {}", commit.diagnostic()),
            ));
        }

        Ok(MirrorHead {
            branch: branch.stdout.trim().to_string(),
            commit: CommitId::from(commit.stdout),
        })
    }

    fn remote_commit(&self, mirror: &Path, branch: &str) -> Result<CommitId, VcsError> {
        let fetch = self
            .run(&self.request(["fetch", "--quiet", ORIGIN], Some(mirror)))
            .map_err(|msg| state_err(mirror, "fetch", msg))?;
        if !fetch.success() {
            return Err(state_err(mirror, "fetch", scrub_userinfo(&fetch.diagnostic())));
        }

        let tracking = format!("refs/remotes/{ORIGIN}/{branch}^{{commit}}");
        let resolved = self
            .run(&self.request(
                ["rev-parse", "--verify", "--quiet", tracking.as_str()],
                Some(mirror),
            ))
            .map_err(|msg| state_err(mirror, "remote ref", msg))?;
        if !resolved.success() || resolved.stdout.trim().is_empty() {
            return Err(state_err(
                mirror,
                "remote ref",
                format!("refs/remotes/{ORIGIN}/{branch} does not resolve to a commit"),
            ));
        }

        Ok(CommitId::from(resolved.stdout))
    }

    fn fast_forward(&self, mirror: &Path, branch: &str) -> Result<(), VcsError> {
        let output = self
            .run(&self.request(
                ["pull", "--ff-only", "--quiet", ORIGIN, branch],
                Some(mirror),
            ))
            .map_err(|msg| op_err(mirror, "pulling", msg))?;
        if !output.success() {
            return Err(op_err(mirror, "pulling", scrub_userinfo(&output.diagnostic())));
        }
        Ok(())
    }
}
