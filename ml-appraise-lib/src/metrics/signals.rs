//! Small text helpers shared by the metric variants.

/// Whether lower-cased `text` contains any of the lower-case `needles`.
pub fn mentions_any(text: &str, needles: &[&str]) -> bool {
    let text = text.to_lowercase();
    needles.iter().any(|needle| text.contains(needle))
}

/// Whether any file name, lower-cased, contains any of the lower-case `needles`.
pub fn any_file_mentions(files: &[String], needles: &[&str]) -> bool {
    files.iter().any(|file| mentions_any(file, needles))
}

/// Whether any tag, lower-cased, contains any of the lower-case `needles`.
pub fn any_tag_mentions(tags: &[String], needles: &[&str]) -> bool {
    any_file_mentions(tags, needles)
}

pub fn clamp_unit(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}
