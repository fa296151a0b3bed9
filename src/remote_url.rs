//! Conversions between the HTTPS and SSH spellings of a git remote, and fork
//! URL derivation.
//!
//! `to_ssh`/`to_https` normalize the `.git` suffix for the target form, while
//! `derive_fork_url` keeps whatever suffix state the upstream URL had (except
//! for GitHub SSH shorthand, which always ends in `.git`).

use percent_encoding::percent_decode_str;
use url::Url;

const GITHUB_HOST: &str = "github.com";
const GITHUB_SSH_PREFIX: &str = "git@github.com:";
const GIT_USER_PREFIX: &str = "git@";
const GIT_SUFFIX: &str = ".git";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Https,
    Ssh,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteUrlError {
    #[error("remote URL has no owner/repo path: {url}")]
    Malformed { url: String },

    #[error("unsupported remote URL form: {url}")]
    UnsupportedForm { url: String },

    #[error("fork username is empty")]
    EmptyUsername,
}

impl RemoteUrlError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "E_URL_MALFORMED",
            Self::UnsupportedForm { .. } => "E_URL_UNSUPPORTED",
            Self::EmptyUsername => "E_USERNAME_EMPTY",
        }
    }

    fn malformed(url: &str) -> Self {
        Self::Malformed {
            url: url.to_string(),
        }
    }

    fn unsupported(url: &str) -> Self {
        Self::UnsupportedForm {
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// `http://...` or `https://...`
    Http,
    /// `git@host:path`
    GitShorthand,
    /// `ssh://[user@]host[:port]/path`
    SshScheme,
    /// `host:path`, colon before the first slash
    Scp,
}

fn classify(url: &str) -> Option<Form> {
    if url.starts_with("https://") || url.starts_with("http://") {
        return Some(Form::Http);
    }
    if url.starts_with(GIT_USER_PREFIX) {
        return Some(Form::GitShorthand);
    }
    if url.starts_with("ssh://") {
        return Some(Form::SshScheme);
    }
    let idx = url.find(':')?;
    if idx == 0 || url[..idx].contains('/') || url.starts_with("http") {
        return None;
    }
    // Any other `scheme://` URL.
    if url[idx + 1..].starts_with("//") {
        return None;
    }
    Some(Form::Scp)
}

fn is_github_http(url: &str) -> bool {
    url.starts_with("https://github.com/") || url.starts_with("http://github.com/")
}

fn strip_git_suffix(s: &str) -> &str {
    s.strip_suffix(GIT_SUFFIX).unwrap_or(s)
}

fn parse_url(url: &str) -> Result<Url, RemoteUrlError> {
    Url::parse(url).map_err(|_| RemoteUrlError::malformed(url))
}

/// Host of an HTTP(S) URL. An explicit port is dropped; scp-style remotes
/// cannot carry one.
fn host_of(parsed: &Url, url: &str) -> Result<String, RemoteUrlError> {
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RemoteUrlError::malformed(url))
}

/// Splits `host:path` at the first colon. The host must be non-empty and
/// free of slashes.
fn split_scp(url: &str) -> Option<(&str, &str)> {
    let (host, path) = url.split_once(':')?;
    if host.is_empty() || host.contains('/') {
        return None;
    }
    Some((host, path))
}

/// Returns the URL unchanged if it is already an SSH remote, otherwise
/// rewrites an HTTP(S) URL to `git@<host>:<owner>/<repo>.git`.
pub fn to_ssh(url: &str) -> Result<String, RemoteUrlError> {
    let url = url.trim();
    match classify(url) {
        Some(Form::GitShorthand | Form::SshScheme | Form::Scp) => Ok(url.to_string()),
        Some(Form::Http) => {
            let parsed = parse_url(url)?;
            let decoded = percent_decode_str(parsed.path()).decode_utf8_lossy();
            let path = strip_git_suffix(decoded.trim_matches('/'));
            if path.is_empty() || !path.contains('/') {
                return Err(RemoteUrlError::malformed(url));
            }
            let host = if is_github_http(url) {
                GITHUB_HOST.to_string()
            } else {
                host_of(&parsed, url)?
            };
            Ok(format!("{GIT_USER_PREFIX}{host}:{path}{GIT_SUFFIX}"))
        }
        None => Err(RemoteUrlError::unsupported(url)),
    }
}

/// Returns the URL unchanged if it is already HTTP(S), otherwise rewrites an
/// SSH remote to `https://<host>/<path>` without a `.git` suffix.
pub fn to_https(url: &str) -> Result<String, RemoteUrlError> {
    let url = url.trim();
    match classify(url) {
        Some(Form::Http) => Ok(url.to_string()),
        Some(Form::GitShorthand) => {
            if let Some(path) = url.strip_prefix(GITHUB_SSH_PREFIX) {
                let path = strip_git_suffix(path);
                if path.is_empty() || !path.contains('/') {
                    return Err(RemoteUrlError::malformed(url));
                }
                return Ok(format!("https://{GITHUB_HOST}/{path}"));
            }
            let rest = &url[GIT_USER_PREFIX.len()..];
            match rest.split_once(':') {
                Some((host, path)) if !host.is_empty() => {
                    Ok(format!("https://{host}/{}", strip_git_suffix(path)))
                }
                _ => Err(RemoteUrlError::malformed(url)),
            }
        }
        Some(Form::Scp) => {
            let (host, path) = split_scp(url).ok_or_else(|| RemoteUrlError::unsupported(url))?;
            Ok(format!("https://{host}/{}", strip_git_suffix(path)))
        }
        Some(Form::SshScheme) => {
            let parsed = parse_url(url)?;
            let host = parsed
                .host_str()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| RemoteUrlError::malformed(url))?;
            let path = strip_git_suffix(parsed.path().trim_matches('/'));
            if path.is_empty() {
                return Err(RemoteUrlError::malformed(url));
            }
            Ok(format!("https://{host}/{path}"))
        }
        None => Err(RemoteUrlError::unsupported(url)),
    }
}

pub fn normalize(url: &str, protocol: Protocol) -> Result<String, RemoteUrlError> {
    match protocol {
        Protocol::Ssh => to_ssh(url),
        Protocol::Https => to_https(url),
    }
}

/// Derives the URL of `username`'s fork from an upstream URL by replacing the
/// owner segment. Host and form (SSH vs HTTPS) are kept.
pub fn derive_fork_url(upstream: &str, username: &str) -> Result<String, RemoteUrlError> {
    let upstream = upstream.trim();
    let username = username.trim();
    if username.is_empty() {
        return Err(RemoteUrlError::EmptyUsername);
    }

    match classify(upstream) {
        Some(Form::Http) if is_github_http(upstream) => {
            let mut parsed = parse_url(upstream)?;
            let path = parsed.path();
            let path = strip_git_suffix(path.strip_prefix('/').unwrap_or(path));
            let repo = match path.split_once('/') {
                Some((_, repo)) if !repo.is_empty() => repo.to_string(),
                _ => return Err(RemoteUrlError::malformed(upstream)),
            };
            let mut fork_path = format!("/{username}/{repo}");
            if upstream.ends_with(GIT_SUFFIX) {
                fork_path.push_str(GIT_SUFFIX);
            }
            parsed.set_path(&fork_path);
            Ok(parsed.to_string())
        }
        Some(Form::GitShorthand) if upstream.starts_with(GITHUB_SSH_PREFIX) => {
            let rest = &upstream[GITHUB_SSH_PREFIX.len()..];
            let repo = match rest.split_once('/') {
                Some((_, repo)) => strip_git_suffix(repo),
                None => return Err(RemoteUrlError::malformed(upstream)),
            };
            Ok(format!("{GITHUB_SSH_PREFIX}{username}/{repo}{GIT_SUFFIX}"))
        }
        Some(Form::Http | Form::SshScheme) => {
            let mut parsed = parse_url(upstream)?;
            let rest = match parsed.path().trim_matches('/').split_once('/') {
                Some((_, rest)) if !rest.is_empty() => rest.to_string(),
                _ => return Err(RemoteUrlError::malformed(upstream)),
            };
            parsed.set_path(&format!("/{username}/{rest}"));
            Ok(parsed.to_string())
        }
        Some(Form::GitShorthand | Form::Scp) => {
            let (host, rest) =
                split_scp(upstream).ok_or_else(|| RemoteUrlError::unsupported(upstream))?;
            match rest.split_once('/') {
                Some((_, repo)) => Ok(format!("{host}:{username}/{repo}")),
                None => Err(RemoteUrlError::malformed(upstream)),
            }
        }
        None => Err(RemoteUrlError::unsupported(upstream)),
    }
}
