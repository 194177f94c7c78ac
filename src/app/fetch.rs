//! Fetch task dispatch.
//!
//! A fetch touches [`UsersState`] at exactly three points: `fetch_started` when
//! the request is issued, then either `fetch_succeeded` or `fetch_failed` when
//! its result is drained back on the UI thread. The spawned task itself only
//! sends a [`FetchEvent`] over a channel.
//!
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{ApiClient, User};
use crate::app::state::UsersState;
use crate::error::FetchError;

/// Outcome of one spawned fetch, tagged with the id assigned at start.
#[derive(Debug)]
pub enum FetchEvent {
    Succeeded { request_id: u64, users: Vec<User> },
    Failed { request_id: u64, error: FetchError },
}

impl FetchEvent {
    pub fn request_id(&self) -> u64 {
        match self {
            FetchEvent::Succeeded { request_id, .. } | FetchEvent::Failed { request_id, .. } => {
                *request_id
            }
        }
    }

    /// Apply the matching resolution transition.
    pub fn apply_to(self, state: &mut UsersState) {
        match self {
            FetchEvent::Succeeded { request_id, users } => {
                tracing::info!(request_id, count = users.len(), "users fetched");
                state.fetch_succeeded(users);
            }
            FetchEvent::Failed { request_id, error } => {
                tracing::warn!(request_id, code = ?error.code, error = %error, "users fetch failed");
                state.fetch_failed(Some(error.message));
            }
        }
    }
}

pub struct FetchDispatcher {
    runtime: Handle,
    client: ApiClient,
    tx: UnboundedSender<FetchEvent>,
    rx: UnboundedReceiver<FetchEvent>,
    next_request_id: u64,
    in_flight: usize,
}

impl FetchDispatcher {
    pub fn new(runtime: Handle, client: ApiClient) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            client,
            tx,
            rx,
            next_request_id: 1,
            in_flight: 0,
        }
    }

    /// Fetches spawned but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply fetch-start and spawn the request. Overlapping calls are not
    /// deduplicated; their results are applied in the order they resolve.
    pub fn start(&mut self, state: &mut UsersState) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight += 1;
        state.fetch_started();
        tracing::debug!(request_id, url = %self.client.users_url(), "users fetch started");

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let event = match client.fetch_all_users().await {
                Ok(users) => FetchEvent::Succeeded { request_id, users },
                Err(error) => FetchEvent::Failed { request_id, error },
            };
            // receiver gone means the app is shutting down
            let _ = tx.send(event);
        });
        request_id
    }

    /// Apply every resolved fetch without blocking. Returns how many were applied.
    pub fn drain(&mut self, state: &mut UsersState) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.resolve(event, state);
            applied += 1;
        }
        applied
    }

    /// Wait for the next resolved fetch and apply it. Returns the request id.
    pub async fn next_resolved(&mut self, state: &mut UsersState) -> Option<u64> {
        let event = self.rx.recv().await?;
        let id = event.request_id();
        self.resolve(event, state);
        Some(id)
    }

    fn resolve(&mut self, event: FetchEvent, state: &mut UsersState) {
        self.in_flight = self.in_flight.saturating_sub(1);
        event.apply_to(state);
    }
}
