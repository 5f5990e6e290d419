use super::{Category, Entry, InputSource, classify_url};
use crate::Result;

const LOG_TARGET: &str = "    intake";

/// A dataset URL recorded by a [`ClassificationSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSighting {
    /// The dataset URL as it appeared in the input
    pub url: String,

    /// The 1-based line on which the dataset was first seen
    pub line: usize,
}

/// Classification state for one pass over one input source.
///
/// Lines must be fed in input order. The session records every dataset URL it sees, ordered by
/// recency, and models on lines without their own dataset inherit the most recent one.
#[derive(Debug, Default)]
pub struct ClassificationSession {
    datasets: Vec<DatasetSighting>,
    line: usize,
}

impl ClassificationSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and classify a whole input source.
    ///
    /// Every call is an independent run: datasets seen in earlier sources are forgotten.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is malformed JSON.
    pub fn classify(&mut self, source: &InputSource) -> Result<Vec<Entry>> {
        self.reset();
        let lines = source.read_lines()?;
        let entries: Vec<_> = lines.iter().flat_map(|tokens| self.classify_line(tokens)).collect();

        log::info!(
            target: LOG_TARGET,
            "Classified {} line(s) into {} model entr{}, {} known dataset(s)",
            lines.len(),
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" },
            self.datasets().count()
        );

        Ok(entries)
    }

    /// Classify one line of already-cleaned tokens, returning one entry per model URL on it.
    pub fn classify_line(&mut self, tokens: &[impl AsRef<str>]) -> Vec<Entry> {
        self.line += 1;

        let mut dataset_url: Option<&str> = None;
        let mut code_url: Option<&str> = None;
        let mut model_urls = Vec::new();

        for token in tokens {
            let token = token.as_ref();
            match classify_url(token) {
                Some(Category::Dataset) => {
                    self.register_dataset(token);
                    dataset_url = Some(token);
                }
                Some(Category::Code) => code_url = Some(token),
                Some(Category::Model) => model_urls.push(token),
                None => log::debug!(target: LOG_TARGET, "Ignoring unrecognized reference '{token}' on line {}", self.line),
            }
        }

        let dataset_url = dataset_url.or_else(|| self.latest_dataset());
        if let Some(url) = dataset_url
            && !model_urls.is_empty()
        {
            log::debug!(target: LOG_TARGET, "Line {} models are linked to dataset '{url}'", self.line);
        }

        model_urls
            .into_iter()
            .map(|url| {
                Entry::new(Category::Model, url)
                    .with_dataset_url(dataset_url)
                    .with_code_url(code_url)
            })
            .collect()
    }

    /// The dataset URL most recently seen by this session.
    #[must_use]
    pub fn latest_dataset(&self) -> Option<&str> {
        self.datasets.last().map(|d| d.url.as_str())
    }

    /// Every dataset seen so far, least recent first.
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetSighting> {
        self.datasets.iter()
    }

    /// Forget all datasets and restart line numbering.
    fn reset(&mut self) {
        self.datasets.clear();
        self.line = 0;
    }

    fn register_dataset(&mut self, url: &str) {
        let line = match self.datasets.iter().position(|d| d.url == url) {
            Some(index) => self.datasets.remove(index).line,
            None => self.line,
        };

        self.datasets.push(DatasetSighting { url: url.to_string(), line });
    }
}
