use crate::puller::PullReport;
use crate::user_error::find_user_error;

pub(crate) fn print_error_human(err: &anyhow::Error) {
    let Some(user_err) = find_user_error(err) else {
        eprintln!("error: {err:#}");
        return;
    };

    eprintln!("error[{}]: {err:#}", user_err.code);
    if let Some(hint) = user_err
        .details
        .as_ref()
        .and_then(|d| d.get("hint"))
        .and_then(|v| v.as_str())
    {
        eprintln!("hint: {hint}");
    }
}

pub(crate) fn print_dry_run(report: &PullReport) {
    for plan in &report.repositories {
        println!("[dry-run] {}", plan.summary());
        if let Some(fork_url) = plan.fork_url.as_deref() {
            println!("[dry-run]   origin -> {fork_url}");
        }
    }
}
