use crate::output::{JsonEnvelope, print_json};

pub(crate) const COMMAND: &str = "pull";

pub(crate) fn print_anyhow_error(err: &anyhow::Error) {
    let _ = print_json(&JsonEnvelope::err(COMMAND, err));
}
