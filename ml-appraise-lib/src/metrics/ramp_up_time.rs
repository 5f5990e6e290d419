use super::signals::{any_file_mentions, any_tag_mentions, clamp_unit, mentions_any};
use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::{ArtifactFacts, Attributes};
use crate::intake::Category;

const KNOWN_ARCHITECTURES: &[&str] = &["bert", "distilbert", "gpt", "whisper", "roberta", "t5"];
const DOC_FILES: &[&str] = &["readme.md", "readme.txt", "readme.rst", "docs/", "documentation"];
const QUICK_START_PHRASES: &[&str] = &[
    "quick start",
    "getting started",
    "quickstart",
    "installation",
    "usage",
    "example",
    "tutorial",
    "how to use",
];
const QUICK_START_FILES: &[&str] = &["quickstart", "getting_started", "tutorial", "example", "demo", "usage", "install"];
const INSTALL_PHRASES: &[&str] = &[
    "pip install",
    "conda install",
    "npm install",
    "yarn add",
    "installation",
    "install",
    "setup",
    "requirements",
];
const INSTALL_FILES: &[&str] = &[
    "requirements.txt",
    "package.json",
    "setup.py",
    "pyproject.toml",
    "environment.yml",
    "dockerfile",
    "makefile",
];
const EXAMPLE_FILES: &[&str] = &[".py", ".ipynb", "example", "demo", "sample"];
const FRAMEWORK_TAGS: &[&str] = &[
    "transformers",
    "diffusers",
    "sentence-transformers",
    "sklearn",
    "numpy",
    "pytorch",
    "tensorflow",
];
const STANDALONE_PHRASES: &[&str] = &["no dependencies", "standalone", "zero dependencies", "minimal setup", "plug and play"];
const LARGE_TAGS: &[&str] = &["large", "xl", "big", "giant"];
const MEDIUM_TAGS: &[&str] = &["medium", "base", "standard"];
const SMALL_TAGS: &[&str] = &["small", "mini", "tiny", "micro", "nano"];

/// Rough size class of a model, as hinted by its tags and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Small,
    Medium,
    Large,
}

/// Signals that a newcomer could get started with the artifact quickly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampUpSignals {
    pub category: Category,
    pub clear_documentation: bool,
    pub description_len: usize,
    pub quick_start: bool,
    pub install_instructions: bool,
    pub runnable_examples: bool,
    pub minimal_dependencies: bool,
    pub complexity: Complexity,
}

/// Rates how quickly a newcomer could start using an artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct RampUpTime;

impl Metric for RampUpTime {
    type Data = Option<RampUpSignals>;

    fn name(&self) -> &'static str {
        "ramp_up_time"
    }

    fn description(&self) -> &'static str {
        "Ease of getting started, from documentation and examples"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Usability
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(0.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<RampUpSignals>> {
        if facts.metadata_error().is_some() {
            return Ok(None);
        }

        let attrs = &facts.attributes;
        let description = attrs.description.to_lowercase();
        Ok(Some(RampUpSignals {
            category: facts.category(),
            clear_documentation: has_clear_documentation(attrs),
            description_len: attrs.description.chars().count(),
            quick_start: mentions_any(&description, QUICK_START_PHRASES) || any_file_mentions(&attrs.siblings, QUICK_START_FILES),
            install_instructions: mentions_any(&description, INSTALL_PHRASES)
                || attrs.tags.iter().any(|t| t == "transformers")
                || any_file_mentions(&attrs.siblings, INSTALL_FILES),
            runnable_examples: has_runnable_examples(attrs),
            minimal_dependencies: any_tag_mentions(&attrs.tags, FRAMEWORK_TAGS) || mentions_any(&description, STANDALONE_PHRASES),
            complexity: complexity(attrs, &description),
        }))
    }

    fn score(&self, data: &Option<RampUpSignals>) -> MetricValue {
        let Some(signals) = data else {
            return self.sentinel();
        };

        let mut score = 0.0;
        if signals.clear_documentation {
            score += match signals.description_len {
                len if len > 300 => 0.30,
                len if len > 150 => 0.25,
                len if len > 100 => 0.15,
                _ => 0.10,
            };
        }

        if signals.quick_start {
            score += 0.25;
        }
        if signals.install_instructions {
            score += 0.20;
        }
        if signals.runnable_examples {
            score += 0.15;
        }
        if signals.minimal_dependencies {
            score += 0.10;
        }

        score += match signals.complexity {
            Complexity::Small => 0.05,
            Complexity::Medium => 0.0,
            Complexity::Large => -0.05,
        };

        score += match signals.category {
            Category::Dataset => 0.05,
            Category::Code if !signals.runnable_examples => -0.05,
            _ => 0.0,
        };

        MetricValue::Score(clamp_unit(score))
    }
}

/// A long enough description, where well-known architectures need less text, or a documentation file.
fn has_clear_documentation(attrs: &Attributes) -> bool {
    let min_len = if any_tag_mentions(&attrs.tags, KNOWN_ARCHITECTURES) { 50 } else { 100 };
    attrs.description.trim().chars().count() >= min_len || any_file_mentions(&attrs.siblings, DOC_FILES)
}

fn has_runnable_examples(attrs: &Attributes) -> bool {
    !attrs.widget_data.is_empty()
        || attrs
            .transformers_info
            .get("auto_model")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|m| !m.is_empty())
        || any_file_mentions(&attrs.siblings, EXAMPLE_FILES)
}

fn complexity(attrs: &Attributes, description: &str) -> Complexity {
    for (class, hints) in [
        (Complexity::Large, LARGE_TAGS),
        (Complexity::Medium, MEDIUM_TAGS),
        (Complexity::Small, SMALL_TAGS),
    ] {
        if any_tag_mentions(&attrs.tags, hints) {
            return class;
        }
    }

    if mentions_any(description, &["billion", "parameters", "large-scale"]) {
        Complexity::Large
    } else if mentions_any(description, &["lightweight", "efficient", "fast"]) {
        Complexity::Small
    } else {
        Complexity::Medium
    }
}
