//! Library sources and the fetcher collaborator.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

/// Where a custom library document comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LibrarySource {
    /// Remote JSON document fetched over HTTP.
    Url(String),
    /// JSON text pasted directly into the configuration.
    Inline(String),
}

/// Abstract document fetcher.
///
/// The aggregator only ever asks for the text of a URL; tests substitute
/// a mock, the application uses [`HttpFetcher`].
pub trait SourceFetcher: Send + Sync {
    fn fetch(
        &self,
        url: String,
    ) -> Pin<Box<dyn Future<Output = Result<String, LibraryError>> + Send + '_>>;
}

/// [`SourceFetcher`] over a shared `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(
        &self,
        url: String,
    ) -> Pin<Box<dyn Future<Output = Result<String, LibraryError>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| LibraryError::Http(format!("failed to fetch {url}: {e}")))?;

            if !response.status().is_success() {
                return Err(LibraryError::Http(format!(
                    "{url} returned status {}",
                    response.status()
                )));
            }

            response
                .text()
                .await
                .map_err(|e| LibraryError::Http(format!("failed to read body of {url}: {e}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_json_roundtrip() {
        let sources = vec![
            LibrarySource::Url("https://example.com/lib.json".into()),
            LibrarySource::Inline(r#"{"name":"x","games":[]}"#.into()),
        ];
        let json = serde_json::to_string(&sources).unwrap();
        assert!(json.contains(r#""type":"url""#));
        assert!(json.contains(r#""type":"inline""#));

        let parsed: Vec<LibrarySource> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sources);
    }
}
