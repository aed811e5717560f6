//! # Fetchline - Request Lifecycle Demo
//!
//! A terminal demo of the trigger → request → state update cycle against two
//! public JSON APIs: a placeholder photo list and OpenWeather direct
//! geocoding.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  trigger   ┌─────────────────────┐   GET    ┌────────────┐
//! │ AppController│───────────▶│  RequestController  │─────────▶│ JsonSource │
//! │              │            │  (per endpoint)     │◀─────────│            │
//! │ - CLI / REPL │◀───────────│ - RequestState      │   JSON   └────────────┘
//! │ - render     │  snapshot  │ - generation        │
//! └──────────────┘            └─────────────────────┘
//! ```
//!
//! Each endpoint decides how its URL is built and how a JSON body becomes a
//! payload; the controller owns the state machine and makes sure only the
//! latest request can settle it.

pub mod app;
pub mod cmd_args;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod lifecycle;
pub mod render;
pub mod testing;

// Re-export main types for easy access
pub use app::AppController;
pub use error::{FailureKind, FetchError};
pub use lifecycle::{RequestController, RequestState, RequestStatus};
