//! # Request Lifecycle
//!
//! The generic trigger → request → state update cycle shared by every
//! endpoint the application talks to.

pub mod controller;
pub mod source;
pub mod state;

pub use controller::{ControllerSnapshot, Endpoint, RequestController};
pub use source::{HttpJsonSource, JsonFuture, JsonSource};
pub use state::{RequestState, RequestStatus, ResponseTiming};
