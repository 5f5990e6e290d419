use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Matches `github.com/owner/repo` with an optional scheme and `www.` prefix, plus whatever path follows.
static GITHUB_LINK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)((?:/[^\s)\]>'\x22]*)?)").ok()
});

/// Sub-paths that point at something inside a repository rather than the repository itself.
const REJECTED_SUBPATHS: &[&str] = &["blob", "issues", "tree", "pull"];

/// Find GitHub repository links in README text, in order of first appearance, without duplicates.
///
/// Links into files, issues, trees or pull requests are ignored.
#[must_use]
pub fn find_repository_links(text: &str) -> Vec<String> {
    let Some(pattern) = GITHUB_LINK.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let owner = caps.get(1)?.as_str();
            let repo = caps.get(2)?.as_str().trim_end_matches('.').trim_end_matches(".git");
            let rest = caps.get(3).map_or("", |m| m.as_str());

            let first_subpath = rest.trim_start_matches('/').split(['/', '?', '#']).next().unwrap_or_default();
            if REJECTED_SUBPATHS.iter().any(|p| first_subpath.eq_ignore_ascii_case(p)) || repo.is_empty() {
                return None;
            }

            Some(format!("https://github.com/{owner}/{repo}"))
        })
        .filter(|url| seen.insert(url.to_ascii_lowercase()))
        .collect()
}

/// The first repository link in README text, if any.
#[must_use]
pub fn first_repository_link(text: &str) -> Option<String> {
    find_repository_links(text).into_iter().next()
}
