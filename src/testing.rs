//! Testing infrastructure for request controllers
//!
//! Provides a [`JsonSource`] that replays scripted responses with fixed
//! latencies, so lifecycle ordering can be checked on tokio's paused clock
//! without touching the network.

use crate::error::FetchError;
use crate::lifecycle::source::{JsonFuture, JsonSource};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// One scripted answer: how long to wait and what to return
#[derive(Debug, Clone)]
pub struct Scripted {
    pub delay: Duration,
    pub result: Result<Value, FetchError>,
    /// Only answer requests for this URL path
    pub path: Option<String>,
    /// Only answer requests carrying this query pair
    pub query: Option<(String, String)>,
}

impl Scripted {
    pub fn ok(body: Value) -> Self {
        Self::ok_after(body, Duration::ZERO)
    }

    pub fn ok_after(body: Value, delay: Duration) -> Self {
        Self {
            delay,
            result: Ok(body),
            path: None,
            query: None,
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self::err_after(error, Duration::ZERO)
    }

    pub fn err_after(error: FetchError, delay: Duration) -> Self {
        Self {
            delay,
            result: Err(error),
            path: None,
            query: None,
        }
    }

    /// Restrict this answer to requests whose URL path is `path`
    pub fn on_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Restrict this answer to requests carrying `key=value` in the query
    pub fn on_query(mut self, key: &str, value: &str) -> Self {
        self.query = Some((key.to_string(), value.to_string()));
        self
    }

    fn matches(&self, url: &Url) -> bool {
        let path_matches = self.path.as_deref().map_or(true, |path| path == url.path());
        let query_matches = self.query.as_ref().map_or(true, |(key, value)| {
            url.query_pairs().any(|(k, v)| k == key.as_str() && v == value.as_str())
        });
        path_matches && query_matches
    }
}

/// Answers requests in call order from a script, skipping entries bound to
/// a different path or query.
///
/// Running out of script is reported as a network failure so a test that
/// triggers more often than expected fails visibly instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    requested: Mutex<Vec<Url>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far, in call order
    pub fn requested_urls(&self) -> Vec<Url> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }

    fn next(&self, url: &Url) -> Scripted {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.clone());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| {
                let index = script.iter().position(|entry| entry.matches(url))?;
                script.remove(index)
            })
            .unwrap_or_else(|| {
                Scripted::err(FetchError::Network(format!("no scripted response for {url}")))
            })
    }
}

impl JsonSource for ScriptedSource {
    fn get_json(&self, url: Url) -> JsonFuture<'_> {
        let scripted = self.next(&url);
        Box::pin(async move {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.result
        })
    }
}
