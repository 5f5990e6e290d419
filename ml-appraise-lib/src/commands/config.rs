use crate::Result;
use crate::scoring::Weights;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "appraise.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of entries whose facts are collected concurrently
    #[serde(default = "default_entry_concurrency")]
    pub entry_concurrency: usize,

    /// Number of metric evaluations running concurrently
    #[serde(default = "default_metric_concurrency")]
    pub metric_concurrency: usize,

    /// Time limit for a single metric evaluation
    #[serde(default = "default_metric_timeout", with = "humantime_serde")]
    pub metric_timeout: Duration,

    /// Extra attempts for a metric that fails or times out
    #[serde(default)]
    pub metric_retries: u32,

    /// Base URL of the model hub
    #[serde(default = "default_hub_url")]
    pub hub_url: String,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Weight of each metric in the net score
    #[serde(default)]
    pub weights: Weights,
}

const fn default_entry_concurrency() -> usize {
    4
}

const fn default_metric_concurrency() -> usize {
    8
}

const fn default_metric_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_hub_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `appraise.toml` in `base_dir` is used when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading ml-appraise configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading ml-appraise configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a concurrency limit is zero, a URL does not parse, or the weights are invalid
    pub fn validate(&self) -> Result<()> {
        if self.entry_concurrency == 0 {
            bail!("entry_concurrency must be at least 1");
        }

        if self.metric_concurrency == 0 {
            bail!("metric_concurrency must be at least 1");
        }

        if self.metric_timeout.is_zero() {
            bail!("metric_timeout must be greater than zero");
        }

        for (key, value) in [("hub_url", &self.hub_url), ("github_api_url", &self.github_api_url)] {
            let _ = Url::parse(value).into_app_err_with(|| format!("{key} '{value}' is not a valid URL"))?;
        }

        self.weights.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
