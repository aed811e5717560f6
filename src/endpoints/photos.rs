//! # Photo Thumbnails
//!
//! Bulk fetch of a placeholder photo list. The payload is the ordered list of
//! thumbnail URLs.

use crate::error::FetchError;
use crate::lifecycle::{Endpoint, RequestController};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_PHOTOS_URL: &str = "https://jsonplaceholder.typicode.com/photos";
pub const DEFAULT_PHOTOS_LIMIT: u32 = 10;

/// Controller type for the bulk variant; triggered with `()`
pub type PhotosController = RequestController<PhotosEndpoint>;

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(rename = "thumbnailUrl")]
    thumbnail_url: String,
}

#[derive(Debug, Clone)]
pub struct PhotosEndpoint {
    base_url: Url,
    limit: u32,
}

impl PhotosEndpoint {
    pub fn new(base_url: Url, limit: u32) -> Self {
        Self { base_url, limit }
    }
}

impl Endpoint for PhotosEndpoint {
    type Input = ();
    type Payload = Vec<String>;

    fn name(&self) -> &'static str {
        "photos"
    }

    fn request_url(&self, _input: &()) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("_limit", &self.limit.to_string());
        url
    }

    fn decode(&self, body: Value) -> Result<Vec<String>, FetchError> {
        let photos: Vec<Photo> = serde_json::from_value(body)?;
        Ok(photos.into_iter().map(|p| p.thumbnail_url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    fn endpoint() -> PhotosEndpoint {
        PhotosEndpoint::new(Url::parse(DEFAULT_PHOTOS_URL).unwrap(), 10)
    }

    #[test]
    fn request_url_should_carry_limit() {
        assert_eq!(
            endpoint().request_url(&()).as_str(),
            "https://jsonplaceholder.typicode.com/photos?_limit=10"
        );
    }

    #[test]
    fn decode_should_keep_thumbnails_in_source_order() {
        let body = json!([
            {"id": 1, "title": "a", "thumbnailUrl": "https://via.placeholder.com/150/1"},
            {"id": 2, "title": "b", "thumbnailUrl": "https://via.placeholder.com/150/2"},
            {"id": 3, "title": "c", "thumbnailUrl": "https://via.placeholder.com/150/3"}
        ]);

        let thumbnails = endpoint().decode(body).unwrap();

        assert_eq!(
            thumbnails,
            vec![
                "https://via.placeholder.com/150/1",
                "https://via.placeholder.com/150/2",
                "https://via.placeholder.com/150/3",
            ]
        );
    }

    #[test]
    fn decode_should_accept_empty_list() {
        assert_eq!(endpoint().decode(json!([])).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn decode_should_reject_elements_without_thumbnail() {
        let error = endpoint()
            .decode(json!([{"thumbnailUrl": "x"}, {"id": 2}]))
            .unwrap_err();
        assert_eq!(error.kind(), FailureKind::DecodeFailure);
    }

    #[test]
    fn decode_should_reject_non_array_body() {
        let error = endpoint().decode(json!({"error": "nope"})).unwrap_err();
        assert_eq!(error.kind(), FailureKind::DecodeFailure);
    }
}
