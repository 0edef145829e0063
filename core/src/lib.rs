//! # Reflux Core
//!
//! Helper constructors for Redux-style asynchronous lifecycle reducers.
//!
//! Given an action-type prefix, this crate builds reducers that track a
//! pending/success/fail/reset lifecycle for a slice of application state,
//! optionally keyed by a sub-entity identifier, and optionally supporting
//! paginated list semantics (append, prepend, replace, remove, update).
//!
//! ## Core Concepts
//!
//! - **Action**: `{ type, payload?, key? }` — matched by exact string
//!   equality against derived type constants
//! - **Reducer**: pure function `(Option<state>, &Action) → state`, where a
//!   missing state yields the reducer's initial value
//! - **Copy-on-write**: states are handed around as [`std::sync::Arc`]; an
//!   action a reducer does not recognize returns the *same* `Arc`, so
//!   consumers can skip work via `Arc::ptr_eq`
//!
//! ## Example
//!
//! ```
//! use reflux_core::{Action, AsyncReducer, Reducer};
//! use serde_json::json;
//!
//! let users = AsyncReducer::new("FETCH_USERS");
//!
//! let state = users.reduce(None, &Action::new("FETCH_USERS_PENDING"));
//! assert!(state.pending);
//!
//! let state = users.reduce(
//!     Some(state),
//!     &Action::with_payload("FETCH_USERS_SUCCESS", json!([{"id": 1}])),
//! );
//! assert_eq!(state.data, json!([{"id": 1}]));
//! assert!(!state.pending);
//! ```

/// Action values and the lifecycle action-type derivers
pub mod action;

/// Simple async lifecycle reducer with keyed sub-entities
pub mod async_reducer;

/// Batch and group factories over mappings of names to reducer configs
pub mod group;

/// Paging async lifecycle reducer over an incrementally loaded list
pub mod paging_reducer;

/// State shapes tracked by the lifecycle reducers
pub mod state;

/// Reducer module - the core trait for lifecycle state machines
///
/// Reducers here follow the standard store contract: they receive the
/// current state (or `None` on first dispatch) and an action, and return the
/// next state. They are pure and synchronous; ordering between successive
/// actions against the same slice is exactly dispatch order.
pub mod reducer {
    use std::sync::Arc;

    use crate::action::Action;

    /// The Reducer trait - a deterministic lifecycle state machine
    ///
    /// # Contract
    ///
    /// - `reduce(None, _)` starts from [`Reducer::initial`]
    /// - An action whose type matches none of the reducer's derived types
    ///   returns the input `Arc` unchanged (pointer-equal), so callers
    ///   relying on reference equality can skip downstream work
    /// - Matching actions build a new state value; the input is never
    ///   mutated in place
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use reflux_core::{Action, AsyncReducer, Reducer};
    ///
    /// let reducer = AsyncReducer::new("LOAD");
    /// let state = reducer.reduce(None, &Action::new("UNRELATED"));
    /// let next = reducer.reduce(Some(Arc::clone(&state)), &Action::new("UNRELATED"));
    /// assert!(Arc::ptr_eq(&state, &next));
    /// ```
    pub trait Reducer {
        /// The state shape this reducer owns
        type State;

        /// The state used when `reduce` is called with no current state
        fn initial(&self) -> Arc<Self::State>;

        /// Compute the next state for an action
        fn reduce(&self, state: Option<Arc<Self::State>>, action: &Action) -> Arc<Self::State>;
    }
}

pub use action::{Action, AsyncActionKinds, PagingActionKinds, RESET_ALL_ENTITIES};
pub use async_reducer::AsyncReducer;
pub use group::{
    FieldReducer, FieldSpec, SliceSpec, ValueReducer, create_async_paging_reducer_group,
    create_async_reducer_group, create_reducer_batch, create_reducer_group,
};
pub use paging_reducer::PagingReducer;
pub use reducer::Reducer;
pub use state::{AsyncPagingState, AsyncState};
