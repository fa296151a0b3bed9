use std::collections::BTreeSet;

/// Directory names already handed out during one pull run.
#[derive(Debug, Clone, Default)]
pub struct UsedNames {
    names: BTreeSet<String>,
}

impl UsedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }
}

/// Picks the local directory for a manifest entry. Does not record the result;
/// callers insert it into `used` before deriving the next name.
pub fn repo_dir_name(display_name: Option<&str>, url: &str, used: &UsedNames) -> String {
    if let Some(name) = display_name.map(sanitize_dir_name)
        && !name.is_empty()
        && !used.contains(&name)
    {
        return name;
    }

    let base = last_path_component(url);
    let mut candidate = base.to_string();
    let mut n = 0usize;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{base}-{n}");
    }
    candidate
}

/// Removes path separators and NUL. `.` and `..` sanitize to an empty name.
pub fn sanitize_dir_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned == "." || cleaned == ".." {
        return String::new();
    }
    cleaned.to_string()
}

/// `https://github.com/acme/widget.git` -> `widget`.
pub fn last_path_component(url: &str) -> &str {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    match url.rsplit_once('/') {
        Some((_, last)) => last,
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(entries: &[(Option<&str>, &str)]) -> Vec<String> {
        let mut used = UsedNames::new();
        entries
            .iter()
            .map(|(name, url)| {
                let dir = repo_dir_name(*name, url, &used);
                used.insert(dir.clone());
                dir
            })
            .collect()
    }

    #[test]
    fn same_base_name_gets_numeric_suffixes() {
        let dirs = assign(&[
            (None, "https://github.com/acme/widget"),
            (None, "https://gitlab.com/other/widget.git"),
            (None, "git@example.com:third/widget"),
        ]);
        assert_eq!(dirs, vec!["widget", "widget-1", "widget-2"]);
    }

    #[test]
    fn display_name_wins_when_unused() {
        let dirs = assign(&[
            (Some("Widget Core"), "https://github.com/acme/widget"),
            (Some("  "), "https://github.com/acme/gadget.git"),
        ]);
        assert_eq!(dirs, vec!["Widget Core", "gadget"]);
    }

    #[test]
    fn taken_display_name_falls_back_to_url() {
        let dirs = assign(&[
            (Some("docs"), "https://github.com/acme/website"),
            (Some("docs"), "https://github.com/acme/handbook"),
            (Some("docs"), "https://github.com/acme/docs"),
        ]);
        assert_eq!(dirs, vec!["docs", "handbook", "docs-1"]);
    }

    #[test]
    fn display_names_cannot_escape_the_output_dir() {
        assert_eq!(sanitize_dir_name("../evil/name"), "..evilname");
        assert_eq!(sanitize_dir_name("a\\b\0c"), "abc");
        assert_eq!(sanitize_dir_name(".."), "");
        assert_eq!(sanitize_dir_name("/./"), "");

        let dirs = assign(&[(Some(".."), "https://github.com/acme/widget")]);
        assert_eq!(dirs, vec!["widget"]);
    }

    #[test]
    fn used_names_only_records_on_insert() {
        let mut used = UsedNames::new();
        let dir = repo_dir_name(None, "https://github.com/acme/widget", &used);
        assert!(!used.contains(&dir));
        assert!(used.insert(dir.clone()));
        assert!(!used.insert(dir.clone()));
        assert!(used.contains(&dir));
    }

    #[test]
    fn last_path_component_handles_all_forms() {
        assert_eq!(last_path_component("https://github.com/acme/widget.git"), "widget");
        assert_eq!(last_path_component("https://github.com/acme/widget/"), "widget");
        assert_eq!(last_path_component("git@github.com:acme/widget.git"), "widget");
        assert_eq!(last_path_component("widget.git"), "widget");
    }

    #[test]
    fn assignment_is_distinct_and_deterministic() {
        let entries = [
            (None, "https://github.com/a/x"),
            (Some("x"), "https://github.com/b/y"),
            (None, "https://github.com/c/x.git"),
            (None, "https://github.com/d/x-1"),
            (Some("y"), "https://github.com/e/x"),
        ];
        let first = assign(&entries);
        let second = assign(&entries);
        assert_eq!(first, second);

        let distinct: BTreeSet<_> = first.iter().collect();
        assert_eq!(distinct.len(), entries.len());
        assert_eq!(first, vec!["x", "y", "x-1", "x-1-1", "x-2"]);
    }
}
