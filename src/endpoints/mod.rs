//! # Endpoints
//!
//! Concrete [`Endpoint`](crate::lifecycle::Endpoint) implementations for
//! the remote APIs the application demonstrates.

pub mod geocoding;
pub mod photos;

pub use geocoding::{CityRecord, GeocodingEndpoint, GeocodingForm};
pub use photos::{PhotosController, PhotosEndpoint};
