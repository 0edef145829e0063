//! Ergonomic testing utilities for lifecycle reducers
//!
//! This crate provides a fluent API for testing reducers with readable
//! Given-When-Then syntax, plus assertion helpers for the state shapes the
//! reducers track.

use std::sync::Arc;

use reflux_core::{Action, Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use reflux_core::{Action, AsyncReducer};
/// use reflux_testing::ReducerTest;
/// use serde_json::json;
///
/// ReducerTest::new(AsyncReducer::new("LOAD"))
///     .when_action(Action::new("LOAD_PENDING"))
///     .when_action(Action::with_payload("LOAD_SUCCESS", json!(1)))
///     .then_state(|state| {
///         assert_eq!(state.data, json!(1));
///         assert!(!state.pending);
///     })
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    initial_state: Option<Arc<R::State>>,
    actions: Vec<Action>,
    state_assertions: Vec<StateAssertion<R::State>>,
}

impl<R: Reducer> ReducerTest<R> {
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
        }
    }

    /// Set the starting state (Given). Without it the reducer's own initial
    /// state is used, matching a store's first dispatch.
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(Arc::new(state));
        self
    }

    /// Queue an action to dispatch (When). May be called repeatedly; actions
    /// reduce in order.
    #[must_use]
    pub fn when_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the final state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Run the queued actions and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if any assertion fails.
    pub fn run(self) {
        let mut state = self.initial_state;
        for action in &self.actions {
            state = Some(self.reducer.reduce(state, action));
        }
        let state = state.unwrap_or_else(|| self.reducer.initial());

        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

/// Helper assertions for reducer contracts and state shapes
pub mod assertions {
    use std::sync::Arc;

    use reflux_core::{Action, AsyncState, Reducer};
    use serde_json::Value;

    /// Assert that an action leaves the state pointer-equal.
    ///
    /// This is the contract consumers rely on to skip re-renders.
    ///
    /// # Panics
    ///
    /// Panics if the reducer returned a different state allocation.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_unchanged<R: Reducer>(reducer: &R, state: &Arc<R::State>, action: &Action) {
        let next = reducer.reduce(Some(Arc::clone(state)), action);
        assert!(
            Arc::ptr_eq(state, &next),
            "Expected `{}` to leave the state pointer-equal, but it produced a new state",
            action.kind
        );
    }

    /// Assert that an async slot holds `data` with no pending flag or error
    ///
    /// # Panics
    ///
    /// Panics if the slot is pending, errored, or holds different data.
    pub fn assert_settled(state: &AsyncState, data: &Value) {
        assert_eq!(&state.data, data, "unexpected data in settled slot");
        assert_eq!(state.error, Value::Null, "settled slot still has an error");
        assert!(!state.pending, "settled slot still pending");
    }

    /// Fetch a keyed sub-entity, failing the test when it is absent
    ///
    /// # Panics
    ///
    /// Panics if no entity exists under `key`.
    #[allow(clippy::panic)] // Test assertion
    #[must_use]
    pub fn entity<'a>(state: &'a AsyncState, key: &str) -> &'a AsyncState {
        state
            .entity(key)
            .unwrap_or_else(|| panic!("no keyed entity under {key:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflux_core::{AsyncReducer, AsyncState, PagingReducer};
    use serde_json::{Value, json};

    #[test]
    fn runs_actions_in_order() {
        ReducerTest::new(AsyncReducer::new("LOAD"))
            .when_action(Action::new("LOAD_PENDING"))
            .when_action(Action::with_payload("LOAD_SUCCESS", json!([1, 2])))
            .then_state(|state| {
                assertions::assert_settled(state, &json!([1, 2]));
            })
            .run();
    }

    #[test]
    fn given_state_seeds_the_run() {
        ReducerTest::new(AsyncReducer::new("LOAD"))
            .given_state(AsyncState {
                data: json!("kept"),
                ..AsyncState::default()
            })
            .when_action(Action::with_payload("LOAD_FAIL", json!("boom")))
            .then_state(|state| {
                assert_eq!(state.data, json!("kept"));
                assert_eq!(state.error, json!("boom"));
            })
            .run();
    }

    #[test]
    fn no_actions_yields_the_initial_state() {
        ReducerTest::new(PagingReducer::new("FEED"))
            .then_state(|state| {
                assert!(state.data.is_empty());
                assert!(state.has_more);
            })
            .run();
    }

    #[test]
    fn assert_unchanged_accepts_unrelated_actions() {
        let reducer = AsyncReducer::new("LOAD");
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING"));
        assertions::assert_unchanged(&reducer, &state, &Action::new("UNRELATED"));
    }

    #[test]
    fn entity_helper_finds_keyed_slots() {
        let reducer = AsyncReducer::new("LOAD");
        let state = reducer.reduce(
            None,
            &Action::with_payload("LOAD_SUCCESS", json!(5)).with_key("a"),
        );
        let entity = assertions::entity(&state, "a");
        assert_eq!(entity.data, json!(5));
        assert_eq!(entity.error, Value::Null);
    }
}
