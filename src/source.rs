use std::path::PathBuf;
use std::time::Duration;

use crate::manifest::{DEFAULT_MANIFEST_FILENAME, ManifestError, SecurityInsights};
use crate::user_error::UserError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(PathBuf),
    Url(String),
    GitHub {
        owner: String,
        repo: String,
        path: String,
    },
}

impl ManifestSource {
    /// `--github` wins over the positional argument, which wins over `--source`.
    pub fn resolve(
        positional: Option<&str>,
        source: Option<&str>,
        github: Option<&str>,
    ) -> anyhow::Result<Self> {
        if let Some(spec) = github.filter(|s| !s.trim().is_empty()) {
            return parse_github_spec(spec);
        }

        let spec = positional
            .or(source)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(UserError::source_required)?;
        parse_source_spec(spec)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::GitHub { owner, repo, path } => format!("github:{owner}/{repo}/{path}"),
        }
    }

    /// Where a GitHub source is fetched from; `None` for other sources.
    pub fn github_raw_url(&self) -> Option<String> {
        match self {
            Self::GitHub { owner, repo, path } => Some(format!(
                "{GITHUB_RAW_BASE}/{owner}/{repo}/HEAD/{}",
                path.trim_start_matches('/')
            )),
            _ => None,
        }
    }

    pub fn load(&self) -> Result<SecurityInsights, ManifestError> {
        tracing::debug!(source = %self.describe(), "loading security insights");
        let insights = match self {
            Self::File(path) => SecurityInsights::load_file(path)?,
            Self::Url(url) => SecurityInsights::from_yaml(&fetch_url(url)?)?,
            Self::GitHub { .. } => {
                let url = self.github_raw_url().unwrap_or_default();
                SecurityInsights::from_yaml(&fetch_url(&url)?)?
            }
        };
        tracing::debug!(
            schema_version = insights.schema_version().unwrap_or("unknown"),
            repositories = insights.repositories().len(),
            "loaded security insights"
        );
        Ok(insights)
    }
}

pub fn parse_source_spec(spec: &str) -> anyhow::Result<ManifestSource> {
    if is_url(spec) {
        return Ok(ManifestSource::Url(spec.to_string()));
    }
    Ok(ManifestSource::File(crate::paths::expand_tilde(spec)?))
}

/// Parses `owner/repo[/path]`.
pub fn parse_github_spec(spec: &str) -> anyhow::Result<ManifestSource> {
    let mut parts = spec.trim().splitn(3, '/');
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default();
    let path = parts
        .next()
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_MANIFEST_FILENAME);

    if owner.is_empty() || repo.is_empty() {
        return Err(UserError::github_spec_invalid(spec));
    }

    Ok(ManifestSource::GitHub {
        owner: owner.to_string(),
        repo: repo.to_string(),
        path: path.to_string(),
    })
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn fetch_url(url: &str) -> Result<String, ManifestError> {
    let fetch_err = |source| ManifestError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("project-puller/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fetch_err)?;
    let resp = client.get(url).send().map_err(fetch_err)?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(ManifestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    resp.text().map_err(fetch_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_error::find_user_error;

    #[test]
    fn github_flag_wins_over_other_specs() {
        let src = ManifestSource::resolve(Some("local.yml"), Some("other.yml"), Some("acme/widget"))
            .expect("resolve");
        assert_eq!(
            src,
            ManifestSource::GitHub {
                owner: "acme".to_string(),
                repo: "widget".to_string(),
                path: DEFAULT_MANIFEST_FILENAME.to_string(),
            }
        );
    }

    #[test]
    fn positional_wins_over_source_flag() {
        let src = ManifestSource::resolve(Some("a.yml"), Some("b.yml"), None).expect("resolve");
        assert_eq!(src, ManifestSource::File(PathBuf::from("a.yml")));

        let src = ManifestSource::resolve(None, Some("https://example.org/si.yml"), None)
            .expect("resolve");
        assert_eq!(src, ManifestSource::Url("https://example.org/si.yml".to_string()));
    }

    #[test]
    fn missing_source_is_a_user_error() {
        let err = ManifestSource::resolve(None, Some("  "), None).unwrap_err();
        assert_eq!(find_user_error(&err).unwrap().code, "E_SOURCE_REQUIRED");
    }

    #[test]
    fn github_spec_keeps_nested_path() {
        let src = parse_github_spec("acme/widget/docs/security-insights.yml").expect("parse");
        assert_eq!(
            src.github_raw_url().as_deref(),
            Some("https://raw.githubusercontent.com/acme/widget/HEAD/docs/security-insights.yml")
        );
        assert_eq!(src.describe(), "github:acme/widget/docs/security-insights.yml");
    }

    #[test]
    fn github_spec_requires_owner_and_repo() {
        for spec in ["acme", "acme/", "/widget"] {
            let err = parse_github_spec(spec).unwrap_err();
            assert_eq!(
                find_user_error(&err).unwrap().code,
                "E_GITHUB_SPEC_INVALID",
                "{spec}"
            );
        }
    }

    #[test]
    fn load_reads_local_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("security-insights.yml");
        std::fs::write(
            &path,
            "project:\n  name: p\n  repositories:\n    - url: https://github.com/acme/widget\n",
        )
        .expect("write manifest");

        let insights = ManifestSource::File(path).load().expect("load");
        assert_eq!(insights.repositories().len(), 1);
    }
}
