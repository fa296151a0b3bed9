use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::user_error::UserError;

pub const ORIGIN: &str = "origin";
pub const UPSTREAM: &str = "upstream";

/// Working-copy operations the puller needs from a version-control tool.
pub trait Vcs {
    /// Clones `url` into `dest`, naming the remote `origin_name`.
    fn clone_repo(&self, url: &str, dest: &Path, origin_name: &str) -> anyhow::Result<()>;

    /// Pulls the current branch, from `remote` when given.
    fn pull(&self, repo: &Path, remote: Option<&str>) -> anyhow::Result<()>;

    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> anyhow::Result<()>;

    fn rename_remote(&self, repo: &Path, from: &str, to: &str) -> anyhow::Result<()>;

    fn remote_exists(&self, repo: &Path, name: &str) -> bool;
}

/// Runs the `git` executable. With `quiet` set, git's output is captured and
/// only surfaced (stderr) when a command fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli {
    quiet: bool,
}

impl GitCli {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn run(&self, cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<()> {
        let shown_cwd = cwd.unwrap_or_else(|| Path::new("."));
        let owned_args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        tracing::debug!(cwd = %shown_cwd.display(), args = ?owned_args, "running git");

        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        if self.quiet {
            let out = cmd
                .stdin(Stdio::null())
                .output()
                .map_err(|err| spawn_error(err, shown_cwd, &owned_args))?;
            if !out.status.success() {
                return Err(UserError::git_failed(
                    shown_cwd,
                    &owned_args,
                    out.status.code(),
                    Some(&String::from_utf8_lossy(&out.stderr)),
                ));
            }
        } else {
            let status = cmd
                .status()
                .map_err(|err| spawn_error(err, shown_cwd, &owned_args))?;
            if !status.success() {
                return Err(UserError::git_failed(
                    shown_cwd,
                    &owned_args,
                    status.code(),
                    None,
                ));
            }
        }
        Ok(())
    }
}

impl Vcs for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path, origin_name: &str) -> anyhow::Result<()> {
        let dest = dest.to_string_lossy();
        if origin_name == ORIGIN {
            self.run(None, &["clone", url, &*dest])
        } else {
            self.run(None, &["clone", "-o", origin_name, url, &*dest])
        }
    }

    fn pull(&self, repo: &Path, remote: Option<&str>) -> anyhow::Result<()> {
        match remote {
            Some(remote) => self.run(Some(repo), &["pull", remote]),
            None => self.run(Some(repo), &["pull"]),
        }
    }

    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> anyhow::Result<()> {
        self.run(Some(repo), &["remote", "add", name, url])
    }

    fn rename_remote(&self, repo: &Path, from: &str, to: &str) -> anyhow::Result<()> {
        self.run(Some(repo), &["remote", "rename", from, to])
    }

    fn remote_exists(&self, repo: &Path, name: &str) -> bool {
        git_output(repo, &["remote", "get-url", name])
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

fn git_output(cwd: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new("git")
        .current_dir(cwd)
        .args(args)
        .stdin(Stdio::null())
        .output()
}

fn spawn_error(err: std::io::Error, cwd: &Path, args: &[String]) -> anyhow::Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        return UserError::git_not_found(cwd, args);
    }
    anyhow::Error::new(err).context(format!("spawn git {}", args.join(" ")))
}

/// A directory is treated as an existing working copy when it has a `.git`
/// directory.
pub fn is_working_copy(path: &Path) -> bool {
    path.join(".git").is_dir()
}
