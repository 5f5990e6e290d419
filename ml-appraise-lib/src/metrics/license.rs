use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::ArtifactFacts;

const PERMISSIVE: &[&str] = &["mit", "apache-2.0", "bsd-2-clause", "bsd-3-clause", "isc"];
const COPYLEFT: &[&str] = &["gpl-2.0", "gpl-3.0", "lgpl-2.1", "lgpl-3.0", "mpl-2.0", "epl-2.0"];

const PERMISSIVE_SCORE: f64 = 1.0;
const COPYLEFT_SCORE: f64 = 0.7;
const CUSTOM_SCORE: f64 = 0.5;
const OTHER_SCORE: f64 = 0.2;

/// Every license identifier the tier tables know, permissive ones first.
pub fn recognized_licenses() -> impl Iterator<Item = &'static str> {
    PERMISSIVE.iter().chain(COPYLEFT).copied()
}

/// Rates how freely an artifact may be reused, from its license identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct License;

impl Metric for License {
    type Data = String;

    fn name(&self) -> &'static str {
        "license"
    }

    fn description(&self) -> &'static str {
        "Permissiveness of the artifact's license"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Legal
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(-1.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<String> {
        Ok(facts.attributes.license.clone())
    }

    fn score(&self, data: &String) -> MetricValue {
        MetricValue::Score(tier_score(data))
    }
}

fn tier_score(license: &str) -> f64 {
    let license = license.trim().to_lowercase();
    if license.is_empty() {
        return 0.0;
    }

    let base = strip_version_qualifier(&license);
    if PERMISSIVE.contains(&base) {
        PERMISSIVE_SCORE
    } else if COPYLEFT.contains(&base) {
        COPYLEFT_SCORE
    } else if license.contains("custom") {
        CUSTOM_SCORE
    } else {
        OTHER_SCORE
    }
}

/// `gpl-3.0-only`, `gpl-3.0-or-later` and `gpl-3.0+` all name the `gpl-3.0` family.
fn strip_version_qualifier(license: &str) -> &str {
    ["-only", "-or-later", "+"]
        .iter()
        .find_map(|suffix| license.strip_suffix(suffix))
        .unwrap_or(license)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(license: &str) -> f64 {
        License.score(&license.to_string()).as_score().unwrap()
    }

    #[test]
    fn test_permissive() {
        assert!((score("mit") - 1.0).abs() < f64::EPSILON);
        assert!((score("Apache-2.0") - 1.0).abs() < f64::EPSILON);
        assert!((score("bsd-3-clause") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_copyleft() {
        assert!((score("gpl-3.0") - 0.7).abs() < f64::EPSILON);
        assert!((score("LGPL-2.1") - 0.7).abs() < f64::EPSILON);
        assert!((score("gpl-3.0-or-later") - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_and_unknown() {
        assert!((score("custom-research-license") - 0.5).abs() < f64::EPSILON);
        assert!((score("openrail") - 0.2).abs() < f64::EPSILON);
        assert!((score("unknown") - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_license() {
        assert!(score("").abs() < f64::EPSILON);
        assert!(score("   ").abs() < f64::EPSILON);
    }

    #[test]
    fn test_recognized_licenses_order() {
        assert_eq!(recognized_licenses().next(), Some("mit"));
        assert_eq!(recognized_licenses().count(), PERMISSIVE.len() + COPYLEFT.len());
    }
}
