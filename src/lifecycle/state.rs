//! # Request State
//!
//! State owned by one controller: the lifecycle value itself and the timing
//! of the latest request.

use crate::error::FetchError;
use std::time::Duration;
use tokio::time::Instant;

/// Lifecycle of the latest request issued by a controller
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<P> {
    /// Nothing has been requested yet
    Idle,
    /// A request is in flight
    Pending,
    /// The latest request produced a payload
    Succeeded(P),
    /// The latest request failed
    Failed(FetchError),
}

/// Three-valued projection consumed by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Pending,
    Settled,
}

// Manual impl so payloads need not implement Default
impl<P> Default for RequestState<P> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<P> RequestState<P> {
    pub fn status(&self) -> RequestStatus {
        match self {
            RequestState::Idle => RequestStatus::Idle,
            RequestState::Pending => RequestStatus::Pending,
            RequestState::Succeeded(_) | RequestState::Failed(_) => RequestStatus::Settled,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    /// Either succeeded or failed
    pub fn is_settled(&self) -> bool {
        self.status() == RequestStatus::Settled
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            RequestState::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            RequestState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Timing of the latest request
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    pub start_time: Option<Instant>,
    pub duration: Option<Duration>,
}

impl ResponseTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the request, discarding the previous measurement
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.duration = None;
    }

    /// Mark the end of the request and calculate duration
    pub fn finish(&mut self) {
        if let Some(start) = self.start_time {
            self.duration = Some(start.elapsed());
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration.map(|d| d.as_millis() as u64)
    }
}
