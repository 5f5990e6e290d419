use crate::Result;
use crate::facts::ProviderResult;
use crate::facts::resilient_http::resilient_get;
use crate::intake::{Category, Entry, hub_repo_id};
use ohno::IntoAppError;
use reqwest::StatusCode;
use serde_json::Value;

const LOG_TARGET: &str = "        hub";
const USER_AGENT: &str = "ml-appraise";
const README_FILES: &[&str] = &["README.md", "README.rst"];

/// Error marker reported for entries whose URL does not name a hub repository.
pub const INVALID_URL_MARKER: &str = "Invalid or missing URL";

/// Fetches metadata documents and README files from the model hub.
#[derive(Debug, Clone)]
pub struct Provider {
    http: reqwest::Client,
    base_url: String,
}

impl Provider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .into_app_err("creating the model hub HTTP client")?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the hub's metadata document for a model or dataset entry.
    ///
    /// Code entries have no hub document and yield `Unavailable`.
    pub async fn fetch_document(&self, entry: &Entry) -> ProviderResult<Value> {
        let kind = match entry.category() {
            Category::Model => "models",
            Category::Dataset => "datasets",
            Category::Code => return ProviderResult::unavailable("code repositories have no hub document"),
        };

        let Some(id) = hub_repo_id(entry.url()) else {
            return ProviderResult::error(ohno::app_err!("{INVALID_URL_MARKER}"));
        };

        let url = format!("{}/api/{kind}/{id}", self.base_url);
        log::debug!(target: LOG_TARGET, "Fetching hub document for '{id}'");

        let resp = match resilient_get(&self.http, &url).await {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not fetch hub document for '{id}': {e:#}");
                return ProviderResult::error(e);
            }
        };

        match resp.status() {
            status if status.is_success() => {
                match resp.json::<Value>().await.into_app_err_with(|| format!("decoding hub document for '{id}'")) {
                    Ok(doc) => ProviderResult::Found(doc),
                    Err(e) => ProviderResult::error(e),
                }
            }
            StatusCode::NOT_FOUND => ProviderResult::not_found(format!("HTTP 404: '{id}' is not on the hub")),
            status => {
                log::warn!(target: LOG_TARGET, "Hub returned HTTP {} for '{id}'", status.as_u16());
                ProviderResult::error(ohno::app_err!("HTTP {} fetching hub document for '{id}'", status.as_u16()))
            }
        }
    }

    /// Fetch the README of a hub repository, trying each known README file name in turn.
    pub async fn fetch_readme(&self, entry: &Entry) -> Option<String> {
        let id = hub_repo_id(entry.url())?;
        let prefix = if entry.category() == Category::Dataset { "datasets/" } else { "" };

        for file in README_FILES {
            let url = format!("{}/{prefix}{id}/raw/main/{file}", self.base_url);
            match resilient_get(&self.http, &url).await {
                Ok(resp) if resp.status().is_success() => match resp.text().await {
                    Ok(text) => return Some(text),
                    Err(e) => log::debug!(target: LOG_TARGET, "Could not read {file} of '{id}': {e:#}"),
                },
                Ok(resp) => log::debug!(target: LOG_TARGET, "No {file} for '{id}' (HTTP {})", resp.status().as_u16()),
                Err(e) => log::debug!(target: LOG_TARGET, "Could not fetch {file} of '{id}': {e:#}"),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_model_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models/openai/whisper-tiny"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "openai/whisper-tiny", "likes": 3})))
            .mount(&server)
            .await;

        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Model, "https://huggingface.co/openai/whisper-tiny");
        let doc = provider.fetch_document(&entry).await;
        assert_eq!(doc.as_ref().unwrap()["likes"], 3);
    }

    #[tokio::test]
    async fn test_fetch_dataset_document_uses_dataset_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/datasets/mozilla/common_voice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "mozilla/common_voice"})))
            .mount(&server)
            .await;

        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Dataset, "https://huggingface.co/datasets/mozilla/common_voice");
        assert!(provider.fetch_document(&entry).await.is_found());
    }

    #[tokio::test]
    async fn test_missing_model_reports_404() {
        let server = MockServer::start().await;
        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Model, "https://huggingface.co/owner/nonexistent-model");

        let doc = provider.fetch_document(&entry).await;
        assert!(matches!(doc, ProviderResult::NotFound(_)));
        assert!(doc.error_marker().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models/o/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Model, "https://huggingface.co/o/broken");
        let doc = provider.fetch_document(&entry).await;
        assert!(matches!(doc, ProviderResult::Error(_)));
        assert!(doc.error_marker().unwrap().contains("decoding hub document for 'o/broken'"));
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Model, "https://huggingface.co/");
        let doc = provider.fetch_document(&entry).await;
        assert!(doc.error_marker().unwrap().contains(INVALID_URL_MARKER));
    }

    #[tokio::test]
    async fn test_code_entry_is_unavailable() {
        let provider = Provider::new("http://127.0.0.1:1").unwrap();
        let entry = Entry::new(Category::Code, "https://github.com/o/r");
        assert!(matches!(provider.fetch_document(&entry).await, ProviderResult::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_readme_falls_back_to_rst() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/o/m/raw/main/README.rst"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Model\n=====\n"))
            .mount(&server)
            .await;

        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Model, "https://huggingface.co/o/m");
        assert_eq!(provider.fetch_readme(&entry).await.as_deref(), Some("Model\n=====\n"));
    }

    #[tokio::test]
    async fn test_fetch_readme_missing() {
        let server = MockServer::start().await;
        let provider = Provider::new(server.uri()).unwrap();
        let entry = Entry::new(Category::Model, "https://huggingface.co/o/m");
        assert_eq!(provider.fetch_readme(&entry).await, None);
    }
}
