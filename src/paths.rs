use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub fn expand_tilde(s: &str) -> anyhow::Result<PathBuf> {
    if s == "~" {
        return dirs::home_dir().context("resolve home dir");
    }
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().context("resolve home dir")?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(s))
}

/// Renders a path with `/` separators for JSON output.
pub fn path_to_posix_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Output directory for a run: explicit `--output`, else the project name,
/// else the current directory.
pub fn resolve_output_dir(explicit: Option<&Path>, project_name: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit.filter(|d| !d.as_os_str().is_empty()) {
        return dir.to_path_buf();
    }
    match project_name {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from("."),
    }
}
