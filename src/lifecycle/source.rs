//! # JSON Sources
//!
//! The remote APIs are opaque: a source takes a URL and yields a JSON value
//! or a [`FetchError`]. Production code uses [`HttpJsonSource`]; tests inject
//! scripted sources.

use crate::error::FetchError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// Boxed future returned by [`JsonSource::get_json`]
pub type JsonFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, FetchError>> + Send + 'a>>;

/// Something that can GET a URL and hand back its JSON body
pub trait JsonSource: Send + Sync + 'static {
    fn get_json(&self, url: Url) -> JsonFuture<'_>;
}

/// [`JsonSource`] backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpJsonSource {
    client: reqwest::Client,
}

impl HttpJsonSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: Url) -> Result<Value, FetchError> {
        tracing::debug!("GET {}", url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Server answered {}", status);
            return Err(FetchError::Network(format!(
                "server responded with {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()));
        }

        // Read the body first so transport errors stay network failures
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl JsonSource for HttpJsonSource {
    fn get_json(&self, url: Url) -> JsonFuture<'_> {
        Box::pin(self.fetch(url))
    }
}
