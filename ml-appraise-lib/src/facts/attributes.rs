//! Folding heterogeneous hub documents into one canonical attribute set.
//!
//! The same logical field may live at the top level of a document, inside its `cardData`, inside a
//! `metadata` wrapper, or inside `metadata.cardData`. Locations are probed in that order and the
//! first non-empty value wins.

use super::ProviderResult;
use crate::intake::Category;
use crate::metrics::recognized_licenses;
use serde_json::{Map, Value};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Canonical view of an artifact's metadata, as consumed by the metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub description: String,

    /// Lower-cased license identifier, or empty when none could be determined.
    pub license: String,

    pub tags: Vec<String>,
    pub downloads: u64,
    pub likes: u64,

    /// File names in the hub repository.
    pub siblings: Vec<String>,

    pub size_mb: f64,
    pub citation: String,
    pub pipeline_tag: Option<String>,
    pub card_data: Map<String, Value>,
    pub model_index: Vec<Value>,
    pub widget_data: Vec<Value>,
    pub transformers_info: Map<String, Value>,

    /// Why the metadata document is missing, when it is.
    pub metadata_error: Option<String>,
}

/// Extra license evidence from the artifact's code repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenseHints<'a> {
    /// License identifier detected by the source-control host.
    pub repository_license: Option<&'a str>,

    /// README text to scan for license names.
    pub readme: Option<&'a str>,
}

/// Normalize a metadata document for an entry of the given category.
///
/// A missing document yields empty attributes carrying the error marker. Repository hints are
/// only consulted for code entries.
#[must_use]
pub fn normalize(category: Category, document: &ProviderResult<Value>, hints: LicenseHints<'_>) -> Attributes {
    let mut attributes = match document {
        ProviderResult::Found(doc) => from_document(doc),
        ProviderResult::Unavailable(_) => Attributes::default(),
        other => Attributes {
            metadata_error: other.error_marker(),
            ..Attributes::default()
        },
    };

    if attributes.license.is_empty() {
        attributes.license = license_from_tags(&attributes.tags).unwrap_or_default();
    }

    if attributes.license.is_empty() && category == Category::Code {
        attributes.license = hints
            .repository_license
            .map(str::to_string)
            .or_else(|| hints.readme.and_then(scan_readme_for_license))
            .unwrap_or_default();
    }

    attributes.license = attributes.license.trim().to_lowercase();
    attributes
}

fn from_document(doc: &Value) -> Attributes {
    let siblings = probe(doc, &["siblings"]).and_then(Value::as_array);

    Attributes {
        description: probe_text(doc, &["description", "model_description"]),
        license: probe(doc, &["license"]).and_then(first_text).unwrap_or_default(),
        tags: probe(doc, &["tags"]).map(text_list).unwrap_or_default(),
        downloads: probe(doc, &["downloads"]).map_or(0, count),
        likes: probe(doc, &["likes"]).map_or(0, count),
        siblings: siblings
            .map(|items| items.iter().filter_map(sibling_name).map(str::to_string).collect())
            .unwrap_or_default(),
        size_mb: probe(doc, &["usedStorage"])
            .and_then(Value::as_f64)
            .or_else(|| siblings.map(|items| items.iter().filter_map(|s| s.get("size")).filter_map(Value::as_f64).sum::<f64>()))
            .map_or(0.0, |bytes| (bytes / BYTES_PER_MB).max(0.0)),
        citation: probe_text(doc, &["citation"]),
        pipeline_tag: probe(doc, &["pipeline_tag"]).and_then(Value::as_str).map(str::to_string),
        card_data: object_at(doc, "cardData")
            .or_else(|| doc.get("metadata").and_then(|m| object_at(m, "cardData")))
            .cloned()
            .unwrap_or_default(),
        model_index: probe(doc, &["model-index", "model_index"])
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        widget_data: probe(doc, &["widgetData"]).and_then(Value::as_array).cloned().unwrap_or_default(),
        transformers_info: probe(doc, &["transformersInfo"])
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        metadata_error: None,
    }
}

/// First non-empty value for any of `keys`, searching each document location in precedence order.
#[must_use]
pub fn probe<'a>(doc: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let metadata = doc.get("metadata");
    let locations = [
        Some(doc),
        doc.get("cardData"),
        metadata,
        metadata.and_then(|m| m.get("cardData")),
    ];

    locations
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|location| keys.iter().filter_map(move |key| location.get(*key)))
        .find(|value| is_present(value))
}

fn probe_text(doc: &Value, keys: &[&str]) -> String {
    probe(doc, keys).and_then(first_text).unwrap_or_default()
}

fn object_at<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object).filter(|m| !m.is_empty())
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A string, or the first non-empty string of an array.
fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().filter_map(Value::as_str).map(str::trim).find(|s| !s.is_empty()).map(str::to_string),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

fn text_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is finite and clamped to be non-negative")]
fn count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v.max(0.0) as u64))
        .unwrap_or(0)
}

fn sibling_name(sibling: &Value) -> Option<&str> {
    sibling.as_str().or_else(|| sibling.get("rfilename").and_then(Value::as_str))
}

fn license_from_tags(tags: &[String]) -> Option<String> {
    tags.iter()
        .find_map(|tag| tag.strip_prefix("license:"))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

/// Best-effort search of README text for a recognized license name, such as `Apache 2.0`.
#[must_use]
pub fn scan_readme_for_license(readme: &str) -> Option<String> {
    let text = readme.to_lowercase();
    recognized_licenses()
        .find(|id| contains_term(&text, id) || contains_term(&text, &id.replace('-', " ")))
        .map(str::to_string)
}

/// Whether `term` occurs in `haystack` with no alphanumeric character directly on either side.
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, matched)| {
        let before = haystack.get(..start).and_then(|s| s.chars().next_back());
        let after = haystack.get(start + matched.len()..).and_then(|s| s.chars().next());
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn found(doc: Value) -> ProviderResult<Value> {
        ProviderResult::Found(doc)
    }

    #[test]
    fn test_direct_fields() {
        let doc = json!({
            "description": "A small speech model",
            "license": "MIT",
            "tags": ["audio", "whisper"],
            "downloads": 1500,
            "likes": 12,
            "siblings": [{"rfilename": "README.md"}, {"rfilename": "model.safetensors"}],
            "usedStorage": 157_286_400
        });

        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.description, "A small speech model");
        assert_eq!(attrs.license, "mit");
        assert_eq!(attrs.tags, vec!["audio", "whisper"]);
        assert_eq!(attrs.downloads, 1500);
        assert_eq!(attrs.likes, 12);
        assert_eq!(attrs.siblings, vec!["README.md", "model.safetensors"]);
        assert!((attrs.size_mb - 150.0).abs() < 1e-9);
        assert_eq!(attrs.metadata_error, None);
    }

    #[test]
    fn test_card_data_beats_metadata() {
        let doc = json!({
            "cardData": {"license": "apache-2.0", "model_description": "from card"},
            "metadata": {"license": "gpl-3.0", "description": "from metadata", "likes": 4}
        });

        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.license, "apache-2.0");
        assert_eq!(attrs.description, "from card");
        assert_eq!(attrs.likes, 4);
        assert_eq!(attrs.card_data.get("license"), Some(&json!("apache-2.0")));
    }

    #[test]
    fn test_metadata_wrapper() {
        let doc = json!({"metadata": {"description": "wrapped", "cardData": {"tags": ["nlp"]}}});
        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.description, "wrapped");
        assert_eq!(attrs.tags, vec!["nlp"]);
        assert_eq!(attrs.card_data.get("tags"), Some(&json!(["nlp"])));
    }

    #[test]
    fn test_empty_direct_value_falls_through() {
        let doc = json!({"description": "  ", "cardData": {"description": "card text"}});
        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.description, "card text");
    }

    #[test]
    fn test_license_from_tag() {
        let doc = json!({"tags": ["pytorch", "license:BSD-3-Clause"]});
        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.license, "bsd-3-clause");
    }

    #[test]
    fn test_license_array_takes_first() {
        let doc = json!({"cardData": {"license": ["", "cc-by-4.0", "mit"]}});
        let attrs = normalize(Category::Dataset, &found(doc), LicenseHints::default());
        assert_eq!(attrs.license, "cc-by-4.0");
    }

    #[test]
    fn test_repository_hints_only_apply_to_code() {
        let hints = LicenseHints {
            repository_license: Some("MIT"),
            readme: None,
        };
        let missing = ProviderResult::unavailable("no hub document");

        assert_eq!(normalize(Category::Code, &missing, hints).license, "mit");
        assert_eq!(normalize(Category::Model, &found(json!({})), hints).license, "");
    }

    #[test]
    fn test_readme_scan_for_code() {
        let hints = LicenseHints {
            repository_license: None,
            readme: Some("## License\nReleased under the Apache 2.0 license."),
        };
        let attrs = normalize(Category::Code, &ProviderResult::unavailable("none"), hints);
        assert_eq!(attrs.license, "apache-2.0");
    }

    #[test]
    fn test_readme_scan_needs_whole_words() {
        assert_eq!(scan_readme_for_license("please submit a commit"), None);
        assert_eq!(scan_readme_for_license("Licensed under MIT."), Some("mit".to_string()));
        assert_eq!(scan_readme_for_license("LGPL-2.1 only"), Some("lgpl-2.1".to_string()));
    }

    #[test]
    fn test_size_from_siblings() {
        let doc = json!({"siblings": [
            {"rfilename": "a.bin", "size": 1_048_576},
            {"rfilename": "b.bin", "size": 2_097_152},
            {"rfilename": "c.txt"}
        ]});
        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert!((attrs.size_mb - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_tolerate_floats_and_negatives() {
        let doc = json!({"downloads": 12.7, "likes": -3});
        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.downloads, 12);
        assert_eq!(attrs.likes, 0);
    }

    #[test]
    fn test_missing_document_carries_marker() {
        let doc = ProviderResult::not_found("HTTP 404: 'o/m' is not on the hub");
        let attrs = normalize(Category::Model, &doc, LicenseHints::default());
        assert_eq!(attrs.metadata_error.as_deref(), Some("HTTP 404: 'o/m' is not on the hub"));
        assert_eq!(attrs.description, "");
        assert_eq!(attrs.downloads, 0);
        assert!(attrs.size_mb.abs() < f64::EPSILON);
    }

    #[test]
    fn test_pass_through_structures() {
        let doc = json!({
            "cardData": {"model-index": [{"name": "m", "results": []}]},
            "widgetData": [{"text": "hello"}],
            "transformersInfo": {"auto_model": "AutoModel"},
            "pipeline_tag": "automatic-speech-recognition"
        });
        let attrs = normalize(Category::Model, &found(doc), LicenseHints::default());
        assert_eq!(attrs.model_index.len(), 1);
        assert_eq!(attrs.widget_data.len(), 1);
        assert_eq!(attrs.transformers_info.get("auto_model"), Some(&json!("AutoModel")));
        assert_eq!(attrs.pipeline_tag.as_deref(), Some("automatic-speech-recognition"));
    }
}
