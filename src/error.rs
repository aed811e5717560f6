//! # Fetch Errors
//!
//! Failure taxonomy for a single request lifecycle. Errors are stored in
//! controller state and rendered, so they carry messages instead of source
//! error objects and are cheap to clone.

use std::error::Error as StdError;
use thiserror::Error;

/// Why a request did not produce a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not complete or the server answered with a non-2xx status
    #[error("network failure: {0}")]
    Network(String),

    /// The response body was not JSON of the expected shape
    #[error("decode failure: {0}")]
    Decode(String),

    /// The response decoded to an empty result list
    #[error("no results found")]
    EmptyResult,
}

/// Discriminant of [`FetchError`] for callers that only branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkFailure,
    DecodeFailure,
    EmptyResult,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) => FailureKind::NetworkFailure,
            FetchError::Decode(_) => FailureKind::DecodeFailure,
            FetchError::EmptyResult => FailureKind::EmptyResult,
        }
    }

    /// Human readable message without the kind prefix
    pub fn message(&self) -> String {
        match self {
            FetchError::Network(message) | FetchError::Decode(message) => message.clone(),
            FetchError::EmptyResult => "no results found".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        // The URL may carry an API key. The interesting part of connect errors
        // sits in the source chain.
        let error = error.without_url();
        let mut message = error.to_string();
        let mut source = StdError::source(&error);
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        FetchError::Network(message)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_should_report_its_kind() {
        assert_eq!(
            FetchError::Network("refused".to_string()).kind(),
            FailureKind::NetworkFailure
        );
        assert_eq!(
            FetchError::Decode("eof".to_string()).kind(),
            FailureKind::DecodeFailure
        );
        assert_eq!(FetchError::EmptyResult.kind(), FailureKind::EmptyResult);
    }

    #[test]
    fn fetch_error_should_format_with_kind_prefix() {
        let error = FetchError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "network failure: connection refused");
        assert_eq!(error.message(), "connection refused");
    }

    #[test]
    fn serde_error_should_convert_to_decode_failure() {
        let error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch_error = FetchError::from(error);
        assert_eq!(fetch_error.kind(), FailureKind::DecodeFailure);
    }
}
