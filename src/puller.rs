//! Plans and runs the clone/pull of every repository in a security-insights
//! document, strictly in document order.
//!
//! Planning resolves every URL and directory name up front, so a bad entry
//! aborts the run before git touches the disk. Execution stops at the first
//! git failure.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use crate::dir_name::{UsedNames, repo_dir_name};
use crate::git::{ORIGIN, UPSTREAM, Vcs, is_working_copy};
use crate::manifest::SecurityInsights;
use crate::remote_url::{Protocol, derive_fork_url, normalize};
use crate::user_error::UserError;

#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    pub protocol: Protocol,
    /// Fork owner. When set, the project is the `upstream` remote and the
    /// fork is `origin`.
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoAction {
    Clone,
    Pull,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoPlan {
    pub name: Option<String>,
    pub url: String,
    pub effective_url: String,
    pub dir_name: String,
    pub path: PathBuf,
    pub action: RepoAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_url: Option<String>,
}

impl RepoPlan {
    pub fn summary(&self) -> String {
        match (self.action, self.fork_url.is_some()) {
            (RepoAction::Pull, _) => format!("Pulling {}", self.path.display()),
            (RepoAction::Clone, true) => format!(
                "Cloning {} -> {} (upstream)",
                self.effective_url,
                self.path.display()
            ),
            (RepoAction::Clone, false) => {
                format!("Cloning {} -> {}", self.effective_url, self.path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PullReport {
    pub output_dir: PathBuf,
    pub output_dir_posix: String,
    pub dry_run: bool,
    pub repositories: Vec<RepoPlan>,
}

pub fn plan(
    insights: &SecurityInsights,
    output_dir: &Path,
    options: &PullOptions,
    used: &mut UsedNames,
) -> anyhow::Result<Vec<RepoPlan>> {
    let mut plans = Vec::with_capacity(insights.repositories().len());
    for repo in insights.repositories() {
        let url = repo.url.trim();
        let effective_url =
            normalize(url, options.protocol).map_err(|err| UserError::remote_url(&err, url))?;
        let fork_url = match options.username.as_deref() {
            Some(username) => Some(
                derive_fork_url(&effective_url, username)
                    .map_err(|err| UserError::remote_url(&err, url))?,
            ),
            None => None,
        };

        let dir_name = repo_dir_name(repo.display_name(), url, used);
        used.insert(dir_name.clone());
        let path = output_dir.join(&dir_name);
        let action = if is_working_copy(&path) {
            RepoAction::Pull
        } else {
            RepoAction::Clone
        };

        tracing::debug!(
            url,
            effective_url = %effective_url,
            dir = %dir_name,
            ?action,
            "planned repository"
        );
        plans.push(RepoPlan {
            name: repo.display_name().map(str::to_string),
            url: url.to_string(),
            effective_url,
            dir_name,
            path,
            action,
            fork_url,
        });
    }
    Ok(plans)
}

/// Runs `plans` in order; `progress` is called before each repository.
pub fn execute<V>(
    plans: &[RepoPlan],
    vcs: &V,
    mut progress: impl FnMut(&RepoPlan),
) -> anyhow::Result<()>
where
    V: Vcs + ?Sized,
{
    for plan in plans {
        progress(plan);
        tracing::info!(dir = %plan.dir_name, action = ?plan.action, "processing repository");
        clone_or_pull(plan, vcs).with_context(|| format!("git failed for {}", plan.dir_name))?;
    }
    Ok(())
}

fn clone_or_pull<V>(plan: &RepoPlan, vcs: &V) -> anyhow::Result<()>
where
    V: Vcs + ?Sized,
{
    match (plan.action, plan.fork_url.as_deref()) {
        (RepoAction::Pull, None) => vcs.pull(&plan.path, None),
        (RepoAction::Pull, Some(fork_url)) => {
            ensure_fork_remotes(&plan.path, fork_url, vcs)?;
            vcs.pull(&plan.path, Some(UPSTREAM))
        }
        (RepoAction::Clone, None) => vcs.clone_repo(&plan.effective_url, &plan.path, ORIGIN),
        (RepoAction::Clone, Some(fork_url)) => {
            vcs.clone_repo(&plan.effective_url, &plan.path, UPSTREAM)?;
            vcs.add_remote(&plan.path, ORIGIN, fork_url)
        }
    }
}

/// Brings an existing working copy to the fork layout: `upstream` is the
/// project, `origin` is the fork. A copy cloned without a username has the
/// project as `origin`, which gets renamed.
fn ensure_fork_remotes<V>(path: &Path, fork_url: &str, vcs: &V) -> anyhow::Result<()>
where
    V: Vcs + ?Sized,
{
    let has_upstream = vcs.remote_exists(path, UPSTREAM);
    let has_origin = vcs.remote_exists(path, ORIGIN);

    match (has_upstream, has_origin) {
        (true, false) => vcs.add_remote(path, ORIGIN, fork_url),
        (false, true) => {
            vcs.rename_remote(path, ORIGIN, UPSTREAM)?;
            vcs.add_remote(path, ORIGIN, fork_url)
        }
        (true, true) => Ok(()),
        (false, false) => {
            tracing::warn!(
                path = %path.display(),
                "working copy has neither an upstream nor an origin remote"
            );
            Ok(())
        }
    }
}

/// Plans every repository, then (unless `dry_run`) creates the output
/// directory and runs git for each.
pub fn pull_all<V>(
    insights: &SecurityInsights,
    output_dir: &Path,
    options: &PullOptions,
    dry_run: bool,
    vcs: &V,
    progress: impl FnMut(&RepoPlan),
) -> anyhow::Result<PullReport>
where
    V: Vcs + ?Sized,
{
    let mut used = UsedNames::new();
    let plans = plan(insights, output_dir, options, &mut used)?;

    if !dry_run {
        std::fs::create_dir_all(output_dir)
            .map_err(|err| UserError::output_dir(output_dir, &err))?;
        execute(&plans, vcs, progress)?;
    }

    Ok(PullReport {
        output_dir: output_dir.to_path_buf(),
        output_dir_posix: crate::paths::path_to_posix_string(output_dir),
        dry_run,
        repositories: plans,
    })
}
