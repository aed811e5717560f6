//! # Direct Geocoding
//!
//! Resolves a free-text city name to coordinates through the OpenWeather
//! direct geocoding API. Only the first match is kept.
//!
//! [`GeocodingForm`] owns the query input the way a single-field search form
//! does: submitting hands the current text to the controller and clears the
//! field straight away, whatever the request later does.

use crate::error::FetchError;
use crate::lifecycle::{
    ControllerSnapshot, Endpoint, JsonSource, RequestController, RequestState,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_GEOCODING_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_GEOCODING_LIMIT: u32 = 5;

/// A resolved place
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityRecord {
    pub name: String,
    /// Omitted by the API for places without a state or region
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct GeocodingEndpoint {
    base_url: Url,
    limit: u32,
    api_key: Option<String>,
}

impl GeocodingEndpoint {
    pub fn new(base_url: Url, limit: u32, api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!(
                "No OpenWeather API key configured, requests go out with an empty appid"
            );
        }
        Self {
            base_url,
            limit,
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Endpoint for GeocodingEndpoint {
    type Input = String;
    type Payload = CityRecord;

    fn name(&self) -> &'static str {
        "geocoding"
    }

    /// The city is sent exactly as typed; empty and blank queries included
    fn request_url(&self, city: &String) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("limit", &self.limit.to_string())
            .append_pair("appid", self.api_key.as_deref().unwrap_or(""));
        url
    }

    fn decode(&self, body: Value) -> Result<CityRecord, FetchError> {
        // Elements past the first are never looked at
        let records: Vec<Value> = serde_json::from_value(body)?;
        let first = records.into_iter().next().ok_or(FetchError::EmptyResult)?;
        Ok(serde_json::from_value(first)?)
    }
}

/// Single-field search form driving a geocoding controller
pub struct GeocodingForm {
    query: String,
    controller: RequestController<GeocodingEndpoint>,
}

impl GeocodingForm {
    pub fn new(endpoint: GeocodingEndpoint, source: Arc<dyn JsonSource>) -> Self {
        Self {
            query: String::new(),
            controller: RequestController::new(endpoint, source),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query<S: Into<String>>(&mut self, query: S) {
        self.query = query.into();
    }

    /// Submit the current query. The input is cleared before the request is
    /// issued. Returns the request generation.
    pub fn submit(&mut self) -> u64 {
        let city = std::mem::take(&mut self.query);
        tracing::debug!("Submitting geocoding query {:?}", city);
        self.controller.trigger(city)
    }

    pub fn has_api_key(&self) -> bool {
        self.controller.endpoint().has_api_key()
    }

    pub fn state(&self) -> &RequestState<CityRecord> {
        self.controller.state()
    }

    pub fn snapshot(&self) -> ControllerSnapshot<'_, CityRecord> {
        self.controller.snapshot()
    }

    pub fn controller_mut(&mut self) -> &mut RequestController<GeocodingEndpoint> {
        &mut self.controller
    }
}
