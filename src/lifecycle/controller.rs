//! # Request Lifecycle Controller
//!
//! Drives one outbound request per trigger and exposes the resulting
//! [`RequestState`] to the rendering layer.
//!
//! ```text
//! trigger() ──▶ Pending ──▶ spawned task ──▶ (generation, result) ──▶ channel
//!                                                                       │
//! Succeeded / Failed ◀── apply() ◀── poll() / changed() / settled() ◀───┘
//! ```
//!
//! Every trigger bumps a generation counter and aborts the task of the
//! previous request. A completion is applied only when its generation is the
//! current one, so a slow earlier request can never overwrite the result of
//! a later one.

use crate::error::FetchError;
use crate::lifecycle::source::JsonSource;
use crate::lifecycle::state::{RequestState, RequestStatus, ResponseTiming};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Describes one remote endpoint: how to build its URL and how to turn its
/// JSON body into a render-ready payload
pub trait Endpoint: Send + Sync + 'static {
    /// What the user supplies per trigger
    type Input;
    /// Render-ready data extracted from a response
    type Payload: Debug + Send + 'static;

    /// Short name used in log lines
    fn name(&self) -> &'static str;

    fn request_url(&self, input: &Self::Input) -> Url;

    fn decode(&self, body: Value) -> Result<Self::Payload, FetchError>;
}

/// Result of one spawned request, tagged with the generation that issued it
#[derive(Debug)]
struct Completion<P> {
    generation: u64,
    result: Result<P, FetchError>,
}

/// Read-only view handed to renderers
#[derive(Debug)]
pub struct ControllerSnapshot<'a, P> {
    pub status: RequestStatus,
    pub payload: Option<&'a P>,
    pub error: Option<&'a FetchError>,
    pub url: Option<&'a Url>,
    pub duration_ms: Option<u64>,
}

pub struct RequestController<E: Endpoint> {
    endpoint: Arc<E>,
    source: Arc<dyn JsonSource>,
    state: RequestState<E::Payload>,
    timing: ResponseTiming,
    last_url: Option<Url>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    completion_sender: mpsc::UnboundedSender<Completion<E::Payload>>,
    completion_receiver: mpsc::UnboundedReceiver<Completion<E::Payload>>,
}

impl<E: Endpoint> RequestController<E> {
    pub fn new(endpoint: E, source: Arc<dyn JsonSource>) -> Self {
        let (completion_sender, completion_receiver) = mpsc::unbounded_channel();
        Self {
            endpoint: Arc::new(endpoint),
            source,
            state: RequestState::Idle,
            timing: ResponseTiming::new(),
            last_url: None,
            generation: 0,
            in_flight: None,
            completion_sender,
            completion_receiver,
        }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn state(&self) -> &RequestState<E::Payload> {
        &self.state
    }

    pub fn status(&self) -> RequestStatus {
        self.state.status()
    }

    /// Generation of the most recent trigger, 0 before the first one
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// URL of the most recent request
    pub fn last_url(&self) -> Option<&Url> {
        self.last_url.as_ref()
    }

    pub fn snapshot(&self) -> ControllerSnapshot<'_, E::Payload> {
        ControllerSnapshot {
            status: self.state.status(),
            payload: self.state.payload(),
            error: self.state.error(),
            url: self.last_url.as_ref(),
            duration_ms: self.timing.duration_ms(),
        }
    }

    /// Start a new request, superseding any request still in flight.
    ///
    /// The state is `Pending` as soon as this returns. Must be called from
    /// within a tokio runtime.
    pub fn trigger(&mut self, input: E::Input) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                tracing::debug!(
                    "{}: superseding request #{}",
                    self.endpoint.name(),
                    self.generation
                );
                previous.abort();
            }
        }

        self.generation += 1;
        let generation = self.generation;
        let url = self.endpoint.request_url(&input);

        self.state = RequestState::Pending;
        self.timing.start();
        self.last_url = Some(url.clone());
        tracing::debug!("{}: request #{} pending", self.endpoint.name(), generation);

        let endpoint = Arc::clone(&self.endpoint);
        let source = Arc::clone(&self.source);
        let sender = self.completion_sender.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = match source.get_json(url).await {
                Ok(body) => endpoint.decode(body),
                Err(e) => Err(e),
            };
            // The receiver lives as long as the controller; a send error only
            // means the controller was dropped
            let _ = sender.send(Completion { generation, result });
        }));

        generation
    }

    /// Apply every completion that is already available. Returns true when
    /// the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completion_receiver.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Wait until a completion changes the state.
    ///
    /// Cancel-safe. Never resolves while nothing is in flight, which makes it
    /// suitable as a `tokio::select!` branch.
    pub async fn changed(&mut self) {
        loop {
            // The controller holds a sender, so the channel never closes
            let Some(completion) = self.completion_receiver.recv().await else {
                return;
            };
            if self.apply(completion) {
                return;
            }
        }
    }

    /// Wait until the latest request has settled. Returns immediately when
    /// nothing is pending.
    pub async fn settled(&mut self) -> &RequestState<E::Payload> {
        self.poll();
        while self.state.is_pending() {
            self.changed().await;
        }
        &self.state
    }

    fn apply(&mut self, completion: Completion<E::Payload>) -> bool {
        if completion.generation != self.generation {
            tracing::debug!(
                "{}: dropping stale completion #{} (current #{})",
                self.endpoint.name(),
                completion.generation,
                self.generation
            );
            return false;
        }

        self.timing.finish();
        self.in_flight = None;
        self.state = match completion.result {
            Ok(payload) => {
                tracing::debug!(
                    "{}: request #{} succeeded in {:?}ms",
                    self.endpoint.name(),
                    completion.generation,
                    self.timing.duration_ms()
                );
                RequestState::Succeeded(payload)
            }
            Err(e) => {
                tracing::error!(
                    "{}: request #{} failed: {}",
                    self.endpoint.name(),
                    completion.generation,
                    e
                );
                RequestState::Failed(e)
            }
        };
        true
    }
}

impl<E: Endpoint> Drop for RequestController<E> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
