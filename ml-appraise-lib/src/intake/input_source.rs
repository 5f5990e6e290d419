use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, bail};
use std::fs;

/// Where the artifact references come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Literal text, typically a single URL given on the command line
    Literal(String),

    /// A text file where each line holds comma-separated URLs
    TextFile(Utf8PathBuf),

    /// A JSON file holding an array of URL strings, treated as one line
    JsonFile(Utf8PathBuf),
}

impl InputSource {
    /// Decide how to interpret a command-line argument.
    ///
    /// URLs are literal. Existing files are read as JSON when their extension is `.json` and as
    /// text otherwise. Anything else is treated as literal text.
    #[must_use]
    pub fn detect(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            return Self::Literal(arg.to_string());
        }

        let path = Utf8Path::new(arg);
        if path.is_file() {
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                Self::JsonFile(path.to_path_buf())
            } else {
                Self::TextFile(path.to_path_buf())
            }
        } else {
            Self::Literal(arg.to_string())
        }
    }

    /// Read the source into lines of cleaned tokens. Lines without tokens are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, or if a JSON file is malformed or is not an array.
    pub fn read_lines(&self) -> Result<Vec<Vec<String>>> {
        match self {
            Self::Literal(text) => Ok(split_lines(text)),
            Self::TextFile(path) => {
                let text = fs::read_to_string(path).into_app_err_with(|| format!("reading input file '{path}'"))?;
                Ok(split_lines(&text))
            }
            Self::JsonFile(path) => {
                let text = fs::read_to_string(path).into_app_err_with(|| format!("reading input file '{path}'"))?;
                let value: serde_json::Value =
                    serde_json::from_str(&text).into_app_err_with(|| format!("parsing JSON input file '{path}'"))?;

                let Some(items) = value.as_array() else {
                    bail!("JSON input file '{path}' must contain a list of URLs");
                };

                let tokens: Vec<String> = items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .flat_map(tokenize)
                    .collect();

                Ok(if tokens.is_empty() { Vec::new() } else { vec![tokens] })
            }
        }
    }
}

/// Split one line on commas, trimming whitespace, quotes and brackets, and dropping empty tokens.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(',')
        .map(|part| part.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '[' | ']')))
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn split_lines(text: &str) -> Vec<Vec<String>> {
    text.lines().map(tokenize).filter(|tokens| !tokens.is_empty()).collect()
}
