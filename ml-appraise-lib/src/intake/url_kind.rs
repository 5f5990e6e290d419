use super::Category;

/// Name reported when nothing usable can be derived from a URL.
pub const UNKNOWN_NAME: &str = "unknown";

const HUB_DOMAIN: &str = "huggingface.co";
const HUB_DATASET_PREFIX: &str = "huggingface.co/datasets";
const SOURCE_CONTROL_DOMAIN: &str = "github.com";

/// Suffixes removed from the last path segment of unrecognized URLs, longest first.
const ARCHIVE_EXTENSIONS: &[&str] = &[".tar.gz", ".tar.bz2", ".tar.xz", ".tgz", ".tar", ".zip", ".gz", ".git"];

/// Classify a single URL-like token.
///
/// Returns `None` for anything that is neither on the model hub nor on the source-control host.
#[must_use]
pub fn classify_url(url: &str) -> Option<Category> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.contains(HUB_DATASET_PREFIX) {
        Some(Category::Dataset)
    } else if lower.contains(HUB_DOMAIN) {
        Some(Category::Model)
    } else if lower.contains(SOURCE_CONTROL_DOMAIN) {
        Some(Category::Code)
    } else {
        None
    }
}

/// Derive the display name of the artifact a URL refers to.
///
/// Hub and source-control URLs use their repository name. Anything else uses the last path
/// segment with archive extensions removed.
#[must_use]
pub fn extract_name(url: &str) -> String {
    let segments = segments(url);

    let name = match classify_url(url) {
        Some(Category::Model | Category::Dataset) => repo_segments(&segments).map(|(owner, name)| name.unwrap_or(owner)),
        Some(Category::Code) => segments.get(2).or_else(|| segments.get(1)).copied(),
        None => segments.last().copied().map(strip_archive_extension),
    };

    match name.map(|n| n.trim_end_matches(".git")) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}

/// Extract the hub repository id (`owner/name`, or just `name` for legacy ids) from a hub URL.
#[must_use]
pub fn hub_repo_id(url: &str) -> Option<String> {
    if !matches!(classify_url(url), Some(Category::Model | Category::Dataset)) {
        return None;
    }

    let segments = segments(url);
    match repo_segments(&segments)? {
        (owner, Some(name)) => Some(format!("{owner}/{name}")),
        (name, None) => Some(name.to_string()),
    }
}

/// Splits a URL into host and path segments, tolerating a missing scheme, query strings and fragments.
fn segments(url: &str) -> Vec<&str> {
    let url = url.trim();
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let without_query = without_scheme.split(['?', '#']).next().unwrap_or_default();
    without_query.split('/').filter(|s| !s.is_empty()).collect()
}

/// Returns the owner and name segments of a hub URL, skipping the host and the `datasets` prefix.
fn repo_segments<'a>(segments: &[&'a str]) -> Option<(&'a str, Option<&'a str>)> {
    let mut rest = segments.iter().skip(1).copied();
    let mut first = rest.next()?;
    if first.eq_ignore_ascii_case("datasets") {
        first = rest.next()?;
    }
    Some((first, rest.next()))
}

fn strip_archive_extension(segment: &str) -> &str {
    let lower = segment.to_ascii_lowercase();
    ARCHIVE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .and_then(|ext| segment.get(..segment.len() - ext.len()))
        .unwrap_or(segment)
}
