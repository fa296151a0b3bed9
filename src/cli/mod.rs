mod args;
mod dispatch;
mod human;
mod json;

pub fn clap_command() -> clap::Command {
    use clap::CommandFactory as _;
    args::Cli::command()
}

pub use dispatch::run;
