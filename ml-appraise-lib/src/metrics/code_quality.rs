use super::signals::clamp_unit;
use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::{ArtifactFacts, ProviderResult};

const CI_FILES: &[&str] = &[
    ".github/workflows",
    ".travis.yml",
    ".circleci/config.yml",
    "azure-pipelines.yml",
    ".gitlab-ci.yml",
];
const LINT_FILES: &[&str] = &[
    ".flake8",
    "pyproject.toml",
    "setup.cfg",
    ".pylintrc",
    "ruff.toml",
    ".pre-commit-config.yaml",
    "tox.ini",
];
const SOURCE_EXTENSIONS: &[&str] = &[".py", ".ipynb", ".cpp", ".cc", ".c", ".cu", ".rs", ".js", ".ts", ".java", ".go"];
const PACKAGING_FILES: &[&str] = &["setup.py", "pyproject.toml", "package.json"];

/// Number of source files at which the code-volume signal saturates.
const SATURATION_SOURCE_FILES: usize = 20;

/// An inventory of engineering practices visible in a repository tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoInventory {
    pub has_tests: bool,
    pub has_ci: bool,
    pub has_lint_config: bool,
    pub source_files: usize,
    pub has_readme: bool,
    pub has_packaging: bool,
}

impl RepoInventory {
    /// Take stock of a list of repository paths.
    #[must_use]
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut inventory = Self::default();

        for path in paths {
            let path = path.as_ref().to_lowercase();
            let top_level = !path.contains('/');

            inventory.has_tests |= path.starts_with("tests/")
                || path.starts_with("test/")
                || path.contains("/tests/")
                || path.starts_with("test_")
                || path.contains("/test_");
            inventory.has_ci |= CI_FILES.iter().any(|ci| path.starts_with(ci));
            inventory.has_lint_config |=
                top_level && (LINT_FILES.contains(&path.as_str()) || path.starts_with(".eslintrc"));
            inventory.has_readme |= top_level && path.starts_with("readme");
            inventory.has_packaging |= top_level && PACKAGING_FILES.contains(&path.as_str());

            if SOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
                inventory.source_files += 1;
            }
        }

        inventory
    }
}

/// Rates engineering hygiene from the files in the associated code repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeQuality;

impl Metric for CodeQuality {
    /// `None` when the repository tree is not known.
    type Data = Option<RepoInventory>;

    fn name(&self) -> &'static str {
        "code_quality"
    }

    fn description(&self) -> &'static str {
        "Tests, CI, linting and packaging in the code repository"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Engineering
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(-1.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<RepoInventory>> {
        Ok(match &facts.repo_files {
            ProviderResult::Found(paths) => Some(RepoInventory::from_paths(paths)),
            _ => None,
        })
    }

    fn score(&self, data: &Option<RepoInventory>) -> MetricValue {
        let Some(inventory) = data else {
            return self.sentinel();
        };

        #[expect(clippy::cast_precision_loss, reason = "the count is capped at a small number")]
        let volume = inventory.source_files.min(SATURATION_SOURCE_FILES) as f64 / SATURATION_SOURCE_FILES as f64;

        let presentation = match (inventory.has_readme, inventory.has_packaging) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.5,
            (false, false) => 0.0,
        };

        let score: f64 = [
            (0.30, flag(inventory.has_tests)),
            (0.25, flag(inventory.has_ci)),
            (0.15, flag(inventory.has_lint_config)),
            (0.15, volume),
            (0.15, presentation),
        ]
        .iter()
        .map(|(weight, signal)| weight * signal)
        .sum();

        MetricValue::Score(clamp_unit(score))
    }
}

const fn flag(present: bool) -> f64 {
    if present { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{Category, Entry};
    use serde_json::json;

    fn facts_with_files(files: &[&str]) -> ArtifactFacts {
        let mut facts = ArtifactFacts::from_document(Entry::new(Category::Code, "https://github.com/o/r"), json!({}));
        facts.repo_files = ProviderResult::Found(files.iter().map(ToString::to_string).collect());
        facts
    }

    fn evaluate(facts: &ArtifactFacts) -> f64 {
        let data = CodeQuality.extract(facts).unwrap();
        CodeQuality.score(&data).as_score().unwrap()
    }

    #[test]
    fn test_inventory() {
        let inventory = RepoInventory::from_paths(&[
            "README.md",
            "pyproject.toml",
            ".github/workflows/ci.yml",
            "src/pkg/model.py",
            "src/pkg/tests/test_model.py",
            "docs/.eslintrc.json",
        ]);

        assert!(inventory.has_tests);
        assert!(inventory.has_ci);
        assert!(inventory.has_lint_config);
        assert!(inventory.has_readme);
        assert!(inventory.has_packaging);
        assert_eq!(inventory.source_files, 2);
    }

    #[test]
    fn test_nested_config_does_not_count() {
        let inventory = RepoInventory::from_paths(&["docs/README.md", "tools/setup.cfg", "vendor/setup.py"]);
        assert!(!inventory.has_readme);
        assert!(!inventory.has_lint_config);
        assert!(!inventory.has_packaging);
        assert!(!inventory.has_tests);
    }

    #[test]
    fn test_well_run_repository() {
        let mut files = vec!["README.md", "setup.py", ".flake8", ".travis.yml", "tests/test_a.py"];
        let sources: Vec<String> = (0..25).map(|i| format!("pkg/mod{i}.py")).collect();
        files.extend(sources.iter().map(String::as_str));

        assert!((evaluate(&facts_with_files(&files)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_repository() {
        // a readme and 5 sources: 0.15 * 0.5 + 0.15 * 0.25
        let facts = facts_with_files(&["Readme.rst", "a.rs", "b.rs", "c.rs", "d.rs", "e.go"]);
        assert!((evaluate(&facts) - 0.1125).abs() < 1e-9);
    }

    #[test]
    fn test_empty_tree_scores_zero() {
        assert!(evaluate(&facts_with_files(&[])).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tree_is_sentinel() {
        let facts = ArtifactFacts::from_document(Entry::new(Category::Model, "https://huggingface.co/o/m"), json!({}));
        assert_eq!(CodeQuality.extract(&facts).unwrap(), None);
        assert_eq!(CodeQuality.score(&None), MetricValue::Score(-1.0));
    }
}
