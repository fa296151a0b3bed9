use clap::Parser;

use super::args::Cli;
use super::human::{print_dry_run, print_error_human};
use super::json::{COMMAND, print_anyhow_error};

use crate::git::GitCli;
use crate::output::{JsonEnvelope, print_json};
use crate::puller::{PullOptions, pull_all};
use crate::source::ManifestSource;
use crate::user_error::UserError;

pub fn run() -> std::process::ExitCode {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);
    match run_with(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "run failed");
            if cli.json {
                print_anyhow_error(&err);
            } else {
                print_error_human(&err);
            }

            std::process::ExitCode::from(1)
        }
    }
}

fn run_with(cli: &Cli) -> anyhow::Result<()> {
    let source = ManifestSource::resolve(
        cli.file_or_url.as_deref(),
        cli.source.as_deref(),
        cli.github.as_deref(),
    )?;
    let described = source.describe();
    let insights = source
        .load()
        .map_err(|err| UserError::manifest(err, &described))?;
    if insights.repositories().is_empty() {
        return Err(UserError::manifest_empty(&described));
    }

    let explicit_output = cli
        .output
        .as_deref()
        .filter(|o| !o.is_empty())
        .map(crate::paths::expand_tilde)
        .transpose()?;
    let output_dir =
        crate::paths::resolve_output_dir(explicit_output.as_deref(), insights.project_name());

    let options = PullOptions {
        protocol: cli.protocol(),
        username: cli.fork_username().map(str::to_string),
    };
    tracing::info!(
        source = %described,
        output_dir = %output_dir.display(),
        protocol = ?options.protocol,
        fork = options.username.is_some(),
        "pulling repositories"
    );

    let git = GitCli::new(cli.git_quiet());
    let report = pull_all(
        &insights,
        &output_dir,
        &options,
        cli.dry_run,
        &git,
        |plan| {
            if !cli.json {
                eprintln!("{}", plan.summary());
            }
        },
    )?;

    if cli.json {
        print_json(&JsonEnvelope::ok(COMMAND, &report))?;
    } else if report.dry_run {
        print_dry_run(&report);
    }

    Ok(())
}
