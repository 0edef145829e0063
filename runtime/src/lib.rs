//! # Reflux Runtime
//!
//! Runtime glue around the `reflux-core` reducers.
//!
//! This crate provides the [`Store`] that serializes reducer invocations
//! into a single logical thread of dispatch, the explicit [`config::Config`]
//! value for cross-cutting request behaviors, and the [`fetch`] watcher that
//! drives PENDING → SUCCESS/FAIL cycles over HTTP.
//!
//! ## Example
//!
//! ```
//! use reflux_core::{Action, AsyncReducer};
//! use reflux_runtime::Store;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = Store::new(AsyncReducer::new("LOAD"));
//!
//! store.dispatch(Action::new("LOAD_PENDING")).await;
//! store
//!     .dispatch(Action::with_payload("LOAD_SUCCESS", json!({"id": 1})))
//!     .await;
//!
//! let state = store.state().await;
//! assert_eq!(state.data, json!({"id": 1}));
//! # });
//! ```

use std::sync::Arc;
use std::time::Duration;

use reflux_core::{Action, Reducer};
use tokio::sync::{RwLock, broadcast};

/// Explicit request configuration threaded into the fetch watcher
pub mod config;

/// The saga-watcher analog: HTTP calls bracketed by lifecycle actions
pub mod fetch;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for a matching action
        ///
        /// Returned by `dispatch_and_wait_for` when the timeout expires
        /// before a matching action is observed.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because every
        /// store handle was dropped.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }

    /// Errors produced by a [`crate::config::Fetch`] implementation
    #[derive(Error, Debug)]
    pub enum FetchError {
        /// The underlying HTTP client failed (connect, TLS, decode, ...)
        #[error("request failed: {0}")]
        Transport(#[from] reqwest::Error),

        /// The request could not be built
        #[error("invalid request: {0}")]
        InvalidRequest(String),

        /// Failure from a custom fetch implementation
        #[error("{0}")]
        Other(String),
    }
}

pub use error::{FetchError, StoreError};

/// The Store - serializes dispatch against a single reducer's slice.
///
/// The store holds the current state as an `Arc` behind a `tokio` `RwLock`.
/// [`Store::dispatch`] acquires the write lock, runs the reducer, swaps the
/// state and broadcasts the action to subscribers, so ordering between
/// successive actions is exactly dispatch order. The reducers impose no
/// further ordering, and there is no cancellation at this layer: a PENDING
/// transition is simply overwritten by whichever terminal action arrives
/// next.
///
/// Cloning a store produces another handle to the same state.
pub struct Store<R: Reducer> {
    state: Arc<RwLock<Arc<R::State>>>,
    reducer: Arc<R>,
    action_broadcast: broadcast::Sender<Action>,
}

impl<R: Reducer> Store<R> {
    /// Create a store starting from the reducer's initial state.
    ///
    /// The action broadcast channel buffers 16 actions; use
    /// [`Store::with_broadcast_capacity`] for busier observers.
    #[must_use]
    pub fn new(reducer: R) -> Self {
        Self::with_broadcast_capacity(reducer, 16)
    }

    /// Create a store with an explicit starting state
    #[must_use]
    pub fn with_state(reducer: R, state: R::State) -> Self {
        let (action_broadcast, _) = broadcast::channel(16);
        Self {
            state: Arc::new(RwLock::new(Arc::new(state))),
            reducer: Arc::new(reducer),
            action_broadcast,
        }
    }

    /// Create a store with a custom action broadcast capacity
    #[must_use]
    pub fn with_broadcast_capacity(reducer: R, capacity: usize) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);
        let initial = reducer.initial();
        Self {
            state: Arc::new(RwLock::new(initial)),
            reducer: Arc::new(reducer),
            action_broadcast,
        }
    }

    /// Dispatch an action through the reducer.
    ///
    /// Returns whether the state changed. Unrecognized actions leave the
    /// state pointer-equal and return `false`, which observers can use to
    /// skip downstream work.
    #[tracing::instrument(skip(self, action), name = "store_dispatch", fields(kind = %action.kind))]
    pub async fn dispatch(&self, action: Action) -> bool {
        let changed = {
            let mut guard = self.state.write().await;
            let previous = Arc::clone(&guard);
            let next = self.reducer.reduce(Some(Arc::clone(&previous)), &action);
            let changed = !Arc::ptr_eq(&previous, &next);
            *guard = next;
            changed
        };

        tracing::debug!(changed, "action reduced");
        // Nobody listening is fine; the broadcast is best-effort
        let _ = self.action_broadcast.send(action);
        changed
    }

    /// Dispatch an action and wait for a matching follow-up action.
    ///
    /// Designed for request-response flows: subscribe to the action
    /// broadcast *before* dispatching (avoiding a race with fast effects),
    /// dispatch, then return the first observed action the predicate
    /// accepts — which may be the dispatched action itself.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`] if no matching action arrives in time
    /// - [`StoreError::ChannelClosed`] if the broadcast channel closes
    pub async fn dispatch_and_wait_for<F>(
        &self,
        action: Action,
        predicate: F,
        timeout: Duration,
    ) -> Result<Action, StoreError>
    where
        F: Fn(&Action) -> bool,
    {
        let mut receiver = self.action_broadcast.subscribe();
        self.dispatch(action).await;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, receiver.recv()).await {
                Err(_elapsed) => return Err(StoreError::Timeout),
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(StoreError::ChannelClosed);
                }
                // Lagging only skips actions we would have rejected or
                // retried anyway; keep waiting for a match
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => {}
                Ok(Ok(observed)) => {
                    if predicate(&observed) {
                        return Ok(observed);
                    }
                }
            }
        }
    }

    /// The current state
    pub async fn state(&self) -> Arc<R::State> {
        Arc::clone(&*self.state.read().await)
    }

    /// Subscribe to the actions flowing through this store
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.action_broadcast.subscribe()
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}
