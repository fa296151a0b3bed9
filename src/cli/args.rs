use clap::{ArgAction, Parser};

use crate::remote_url::Protocol;

#[derive(Parser, Debug)]
#[command(name = "project-puller", version)]
#[command(about = "Clone or pull repositories listed in a security-insights file")]
#[command(
    long_about = "Loads a security-insights YAML (from a local file or URL), extracts project.repositories, and runs git clone or git pull for each."
)]
pub struct Cli {
    /// Path to security-insights file or HTTP(S) URL
    #[arg(value_name = "FILE_OR_URL")]
    pub(crate) file_or_url: Option<String>,

    /// Path to security-insights file or HTTP(S) URL
    #[arg(short, long)]
    pub(crate) source: Option<String>,

    /// Load from GitHub as owner/repo[/path] (e.g. org/repo or org/repo/dir/security-insights.yml)
    #[arg(short, long, value_name = "OWNER/REPO[/PATH]")]
    pub(crate) github: Option<String>,

    /// Target directory for cloned repositories (default: the project name)
    #[arg(long, env = "PROJECT_PULLER_OUTPUT")]
    pub(crate) output: Option<String>,

    /// Fork username; clone with remote upstream and add your fork as origin
    #[arg(short, long, env = "PROJECT_PULLER_USERNAME")]
    pub(crate) username: Option<String>,

    /// Use SSH URLs for clone and remotes (default: HTTPS)
    #[arg(long)]
    pub(crate) ssh: bool,

    /// Suppress git output
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Show what would be cloned or pulled without running git
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Machine-readable JSON output (implies --quiet)
    #[arg(long)]
    pub(crate) json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

impl Cli {
    pub(crate) fn protocol(&self) -> Protocol {
        if self.ssh {
            Protocol::Ssh
        } else {
            Protocol::Https
        }
    }

    pub(crate) fn fork_username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }

    pub(crate) fn git_quiet(&self) -> bool {
        self.quiet || self.json
    }
}
