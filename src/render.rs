//! # Rendering
//!
//! Text projection of controller snapshots. Renderers only look at the
//! snapshot: pending shows the loading indicator, idle shows the action
//! label, settled shows the payload or the failure.

use crate::endpoints::CityRecord;
use crate::error::FetchError;
use crate::lifecycle::{ControllerSnapshot, RequestStatus};
use url::Url;

pub const LOADING_INDICATOR: &str = "Loading...";
pub const FETCH_LABEL: &str = "[Fetch Data]";
pub const SEARCH_LABEL: &str = "[Search]";

/// Query parameters whose values never reach the screen
const REDACTED_PARAMS: &[&str] = &["appid"];

/// Fixed-size avatar image tag for one thumbnail
pub fn avatar_tag(url: &str) -> String {
    format!(r#"<img src="{url}" alt="thumbnail" class="w-16 h-16 rounded-full">"#)
}

pub fn render_photos(snapshot: &ControllerSnapshot<'_, Vec<String>>) -> String {
    render_with(snapshot, FETCH_LABEL, |thumbnails| {
        thumbnails.iter().map(String::as_str).map(avatar_tag).collect()
    })
}

pub fn render_city(snapshot: &ControllerSnapshot<'_, CityRecord>) -> String {
    render_with(snapshot, SEARCH_LABEL, |city| {
        let place = [Some(city.name.as_str()), city.state.as_deref(), Some(city.country.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{place}\nLatitude: {}\nLongitude: {}",
            city.latitude, city.longitude
        )
    })
}

pub fn render_error(error: &FetchError) -> String {
    match error {
        FetchError::EmptyResult => "No matching place found".to_string(),
        other => format!("Error: {other}"),
    }
}

/// Request line shown in verbose mode, e.g. `GET https://... (120ms)`
pub fn request_summary<P>(snapshot: &ControllerSnapshot<'_, P>) -> Option<String> {
    let url = redact_url(snapshot.url?);
    let duration = snapshot
        .duration_ms
        .map(|ms| format!(" ({ms}ms)"))
        .unwrap_or_default();
    Some(format!("GET {url}{duration}"))
}

/// Replace the values of credential parameters with `***`
pub fn redact_url(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if REDACTED_PARAMS.contains(&key.as_ref()) && !value.is_empty() {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted
}

fn render_with<P>(
    snapshot: &ControllerSnapshot<'_, P>,
    idle_label: &str,
    render_payload: impl FnOnce(&P) -> String,
) -> String {
    match (snapshot.status, snapshot.payload, snapshot.error) {
        (RequestStatus::Pending, _, _) => LOADING_INDICATOR.to_string(),
        (RequestStatus::Idle, _, _) => idle_label.to_string(),
        (RequestStatus::Settled, Some(payload), _) => render_payload(payload),
        (RequestStatus::Settled, None, Some(error)) => render_error(error),
        (RequestStatus::Settled, None, None) => String::new(),
    }
}
