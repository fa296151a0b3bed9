use std::path::Path;

use crate::manifest::ManifestError;
use crate::remote_url::RemoteUrlError;

#[derive(Debug)]
pub struct UserError {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserError {}

impl UserError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn source_required() -> anyhow::Error {
        anyhow::Error::new(
            Self::new(
                "E_SOURCE_REQUIRED",
                "provide a file path, URL, or use --github owner/repo",
            )
            .with_details(serde_json::json!({
                "hint": "Pass a security-insights file or URL as the first argument, or --github owner/repo[/path].",
            })),
        )
    }

    pub fn github_spec_invalid(spec: &str) -> anyhow::Error {
        anyhow::Error::new(
            Self::new(
                "E_GITHUB_SPEC_INVALID",
                "--github must be owner/repo or owner/repo/path",
            )
            .with_details(serde_json::json!({ "github": spec })),
        )
    }

    pub fn manifest(err: ManifestError, source: &str) -> anyhow::Error {
        anyhow::Error::new(
            Self::new(err.code(), err.to_string())
                .with_details(serde_json::json!({ "source": source })),
        )
    }

    pub fn manifest_empty(source: &str) -> anyhow::Error {
        anyhow::Error::new(
            Self::new(
                "E_MANIFEST_EMPTY",
                "security insights file has no project or repositories listed",
            )
            .with_details(serde_json::json!({ "source": source })),
        )
    }

    pub fn remote_url(err: &RemoteUrlError, repo_url: &str) -> anyhow::Error {
        anyhow::Error::new(
            Self::new(err.code(), format!("repo {repo_url}: {err}"))
                .with_details(serde_json::json!({ "url": repo_url })),
        )
    }

    pub fn output_dir(dir: &Path, err: &std::io::Error) -> anyhow::Error {
        anyhow::Error::new(
            Self::new(
                "E_OUTPUT_DIR",
                format!("failed to create target directory {}: {err}", dir.display()),
            )
            .with_details(serde_json::json!({
                "dir": dir.display().to_string(),
                "dir_posix": crate::paths::path_to_posix_string(dir),
            })),
        )
    }

    pub fn git_not_found(cwd: &Path, args: &[String]) -> anyhow::Error {
        anyhow::Error::new(
            Self::new("E_GIT_NOT_FOUND", "git executable not found")
                .with_details(serde_json::json!({
                    "cwd": cwd.display().to_string(),
                    "cwd_posix": crate::paths::path_to_posix_string(cwd),
                    "args": args,
                    "hint": "Install git and ensure it is on PATH.",
                })),
        )
    }

    pub fn git_failed(
        cwd: &Path,
        args: &[String],
        status: Option<i32>,
        stderr: Option<&str>,
    ) -> anyhow::Error {
        let mut message = format!("git {} failed", args.join(" "));
        if let Some(stderr) = stderr.map(str::trim).filter(|s| !s.is_empty()) {
            message.push_str(": ");
            message.push_str(stderr);
        }
        anyhow::Error::new(Self::new("E_GIT_FAILED", message).with_details(serde_json::json!({
            "cwd": cwd.display().to_string(),
            "cwd_posix": crate::paths::path_to_posix_string(cwd),
            "args": args,
            "exit_code": status,
        })))
    }
}

pub(crate) fn find_user_error(err: &anyhow::Error) -> Option<&UserError> {
    err.chain().find_map(|e| e.downcast_ref::<UserError>())
}

pub(crate) fn anyhow_error_parts_for_envelope(
    err: &anyhow::Error,
) -> (
    &'_ str,
    std::borrow::Cow<'_, str>,
    Option<serde_json::Value>,
) {
    let user_err = find_user_error(err);
    match user_err {
        Some(user_err) => (
            user_err.code.as_str(),
            std::borrow::Cow::Borrowed(user_err.message.as_str()),
            user_err.details.clone(),
        ),
        None => (
            "E_UNEXPECTED",
            std::borrow::Cow::Owned(format!("{err:#}")),
            None,
        ),
    }
}
