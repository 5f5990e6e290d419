use super::signals::any_tag_mentions;
use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::{ArtifactFacts, ProviderResult};

/// Security signals from the repository tree and the hub tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecuritySignals {
    pub security_policy: bool,
    pub pinned_requirements: bool,
    pub github_config: bool,
    pub security_tags: bool,
}

/// Rates visible attention to security.
#[derive(Debug, Clone, Copy, Default)]
pub struct Security;

impl Metric for Security {
    type Data = SecuritySignals;

    fn name(&self) -> &'static str {
        "security"
    }

    fn description(&self) -> &'static str {
        "Security policy, pinned dependencies and security tagging"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Engineering
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(0.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<SecuritySignals> {
        let mut signals = SecuritySignals {
            security_tags: any_tag_mentions(&facts.attributes.tags, &["security"]),
            ..SecuritySignals::default()
        };

        if let ProviderResult::Found(paths) = &facts.repo_files {
            for path in paths {
                let path = path.to_lowercase();
                let top = path.split('/').next().unwrap_or_default();
                signals.security_policy |= top == "security.md";
                signals.pinned_requirements |= matches!(top, "requirements.txt" | "environment.yml");
                signals.github_config |= top == ".github";
            }
        }

        Ok(signals)
    }

    fn score(&self, data: &SecuritySignals) -> MetricValue {
        let mut score = 0.0;
        if data.security_policy {
            score += 0.5;
        }
        if data.pinned_requirements {
            score += 0.25;
        }
        if data.github_config {
            score += 0.25;
        }
        if data.security_tags {
            score += 0.5;
        }

        MetricValue::Score(f64::min(score, 1.0))
    }
}
