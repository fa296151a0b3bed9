#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Manifest URLs under this prefix resolve to bare repos in `TestEnv::remotes`.
pub const REMOTE_BASE: &str = "https://example.test/";

pub struct TestEnv {
    _tmp: tempfile::TempDir,
    home: PathBuf,
    workspace: PathBuf,
    remotes: PathBuf,
    gitconfig: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");

        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).expect("create home");

        let workspace = tmp.path().join("workspace");
        std::fs::create_dir_all(&workspace).expect("create workspace");

        let remotes = tmp.path().join("remotes");
        std::fs::create_dir_all(&remotes).expect("create remotes");

        let gitconfig = tmp.path().join("gitconfig");
        std::fs::write(
            &gitconfig,
            format!(
                "[user]\n\temail = test@example.com\n\tname = Test User\n\
                 [init]\n\tdefaultBranch = main\n\
                 [pull]\n\tff = only\n\
                 [protocol \"file\"]\n\tallow = always\n\
                 [url \"file://{}/\"]\n\tinsteadOf = {REMOTE_BASE}\n",
                remotes.display()
            ),
        )
        .expect("write gitconfig");

        Self {
            _tmp: tmp,
            home,
            workspace,
            remotes,
            gitconfig,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Creates a bare repo reachable as `https://example.test/<owner>/<repo>`
    /// with one commit containing `README.md`.
    pub fn create_remote(&self, owner: &str, repo: &str) -> String {
        let bare = self.remotes.join(owner).join(repo);
        std::fs::create_dir_all(&bare).expect("create bare dir");
        self.git_ok(&bare, &["init", "--bare", "--initial-branch=main"]);

        let seed = self.remotes.join(format!(".seed-{owner}-{repo}"));
        std::fs::create_dir_all(&seed).expect("create seed dir");
        self.git_ok(&seed, &["init", "--initial-branch=main"]);
        std::fs::write(seed.join("README.md"), format!("{owner}/{repo}\n")).expect("write readme");
        self.git_ok(&seed, &["add", "."]);
        self.git_ok(&seed, &["commit", "-m", "initial"]);
        self.git_ok(
            &seed,
            &["push", bare.to_string_lossy().as_ref(), "main"],
        );

        format!("{REMOTE_BASE}{owner}/{repo}")
    }

    pub fn write_manifest(&self, project_name: &str, repos: &[(Option<&str>, &str)]) -> PathBuf {
        let mut yaml = format!(
            "header:\n  schema-version: 2.0.0\nproject:\n  name: {project_name}\n  repositories:\n"
        );
        if repos.is_empty() {
            yaml.push_str("    []\n");
        }
        for (name, url) in repos {
            match name {
                Some(name) => yaml.push_str(&format!("    - name: {name}\n      url: {url}\n")),
                None => yaml.push_str(&format!("    - url: {url}\n")),
            }
        }
        let path = self.workspace.join("security-insights.yml");
        std::fs::write(&path, yaml).expect("write manifest");
        path
    }

    pub fn puller(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_project-puller"));
        cmd.current_dir(&self.workspace)
            .env("HOME", &self.home)
            .env("USERPROFILE", &self.home)
            .env("GIT_CONFIG_GLOBAL", &self.gitconfig)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env_remove("PROJECT_PULLER_OUTPUT")
            .env_remove("PROJECT_PULLER_USERNAME")
            .env_remove("PROJECT_PULLER_LOG");
        cmd
    }

    pub fn git(&self, dir: &Path, args: &[&str]) -> Output {
        Command::new("git")
            .current_dir(dir)
            .args(args)
            .env("HOME", &self.home)
            .env("GIT_CONFIG_GLOBAL", &self.gitconfig)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("run git")
    }

    pub fn git_ok(&self, dir: &Path, args: &[&str]) {
        let out = self.git(dir, args);
        assert!(
            out.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr)
        );
    }

    pub fn git_stdout(&self, dir: &Path, args: &[&str]) -> String {
        let out = self.git(dir, args);
        assert!(
            out.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    }

    pub fn remote_url(&self, repo: &Path, name: &str) -> String {
        self.git_stdout(repo, &["config", "--get", &format!("remote.{name}.url")])
    }
}

pub fn parse_stdout_json(out: &Output) -> serde_json::Value {
    serde_json::from_slice(&out.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}\nstderr: {}",
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        )
    })
}

pub fn run_json_fail(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.arg("--json").output().expect("run project-puller");
    assert!(
        !out.status.success(),
        "expected failure, stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(out.status.code(), Some(1));
    parse_stdout_json(&out)
}
