use crate::Result;
use crate::facts::hosting;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use log::LevelFilter;
use ohno::{IntoAppError, bail};
use std::fs::{File, OpenOptions};

const LOG_TARGET: &str = "environment";

/// Process environment every scoring run depends on
#[derive(Args, Debug, Default)]
pub struct EnvironmentArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Existing file that diagnostic logs are appended to
    #[arg(long, value_name = "PATH", env = "LOG_FILE")]
    pub log_file: Option<Utf8PathBuf>,

    /// Log verbosity: 0 is silent, 1 is informational, 2 is debug
    #[arg(long, value_name = "LEVEL", env = "LOG_LEVEL", default_value = "1")]
    pub log_level: String,
}

impl EnvironmentArgs {
    /// Check the environment and start logging, returning a GitHub provider that accepted the token.
    ///
    /// Nothing is read from the input until this succeeds.
    pub async fn establish(&self, github_api_url: &str) -> Result<hosting::Provider> {
        let token = self.github_token()?;
        let hosting = hosting::Provider::new(token, github_api_url)?;
        hosting.validate_token().await?;

        let log_file = self.open_log_file()?;
        init_logging(log_file, parse_log_level(&self.log_level));

        log::info!(target: LOG_TARGET, "Environment validated, logging at level {}", self.log_level.trim());
        Ok(hosting)
    }

    /// The configured token, which must not be blank.
    pub fn github_token(&self) -> Result<&str> {
        match self.github_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => bail!("GITHUB_TOKEN is missing"),
        }
    }

    /// Open the configured log file for appending. The file must already exist.
    pub fn open_log_file(&self) -> Result<File> {
        let Some(path) = self.log_file.as_deref().filter(|p| !p.as_str().trim().is_empty()) else {
            bail!("LOG_FILE is not set");
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        if !parent.is_dir() {
            bail!("LOG_FILE '{path}' is in directory '{parent}', which does not exist");
        }

        OpenOptions::new()
            .append(true)
            .open(path)
            .into_app_err_with(|| format!("LOG_FILE '{path}' cannot be opened for appending"))
    }
}

/// Map a `LOG_LEVEL` value to a level filter. Unknown values mean informational.
#[must_use]
pub fn parse_log_level(value: &str) -> LevelFilter {
    match value.trim() {
        "0" => LevelFilter::Off,
        "2" => LevelFilter::Debug,
        _ => LevelFilter::Info,
    }
}

fn init_logging(file: File, level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }

    // A logger may already be installed when several runs share a process
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_module_path(false)
        .format_target(level >= LevelFilter::Debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(token: Option<&str>, log_file: Option<Utf8PathBuf>) -> EnvironmentArgs {
        EnvironmentArgs {
            github_token: token.map(ToString::to_string),
            log_file,
            log_level: "1".to_string(),
        }
    }

    fn existing_log_file() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("run.log")).unwrap();
        std::fs::write(&path, "").unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("0"), LevelFilter::Off);
        assert_eq!(parse_log_level("1"), LevelFilter::Info);
        assert_eq!(parse_log_level(" 2 "), LevelFilter::Debug);
        assert_eq!(parse_log_level("verbose"), LevelFilter::Info);
        assert_eq!(parse_log_level(""), LevelFilter::Info);
    }

    #[test]
    fn test_blank_token_is_missing() {
        for token in [None, Some(""), Some("   ")] {
            let err = args(token, None).github_token().unwrap_err();
            assert!(err.to_string().contains("GITHUB_TOKEN is missing"));
        }
        assert_eq!(args(Some(" abc "), None).github_token().unwrap(), "abc");
    }

    #[test]
    fn test_log_file_must_be_set() {
        let err = args(Some("t"), None).open_log_file().unwrap_err();
        assert!(err.to_string().contains("LOG_FILE is not set"));
    }

    #[test]
    fn test_log_file_parent_must_exist() {
        let err = args(Some("t"), Some("/definitely/not/here/run.log".into())).open_log_file().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/run.log"));
    }

    #[test]
    fn test_log_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.log")).unwrap();
        let err = args(Some("t"), Some(path.clone())).open_log_file().unwrap_err();
        assert!(err.to_string().contains(path.as_str()));
    }

    #[test]
    fn test_existing_log_file_opens() {
        let (_dir, path) = existing_log_file();
        let _ = args(Some("t"), Some(path)).open_log_file().unwrap();
    }

    #[tokio::test]
    async fn test_establish_accepts_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .and(header("authorization", "token good"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, log) = existing_log_file();
        let _ = args(Some("good"), Some(log)).establish(&server.uri()).await.unwrap();
    }

    #[tokio::test]
    async fn test_establish_rejects_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (_dir, log) = existing_log_file();
        let err = args(Some("bad"), Some(log)).establish(&server.uri()).await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN is invalid (HTTP 401)"));
    }

    #[tokio::test]
    async fn test_establish_checks_token_before_log_file() {
        let err = args(None, None).establish("http://127.0.0.1:9").await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN is missing"));
    }
}
