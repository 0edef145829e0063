//! The simple async lifecycle reducer.
//!
//! Tracks a single `{ data, pending, error }` slot, optionally fanned out
//! into independent keyed sub-entities via the action's `key` field.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde_json::Value;

use crate::action::{Action, AsyncActionKinds, RESET_ALL_ENTITIES};
use crate::reducer::Reducer;
use crate::state::AsyncState;

/// Reducer for a single async slot with a pending/success/fail/reset
/// lifecycle.
///
/// # Transition table (top level)
///
/// | action type | effect |
/// |---|---|
/// | `<prefix>_PENDING` | `pending = true` |
/// | `<prefix>_SUCCESS` | `data = payload; error = null; pending = false` |
/// | `<prefix>_FAIL` | `error = payload; pending = false` (data untouched) |
/// | `<prefix>_RESET` | `data = null; error = null; pending = false` |
/// | anything else | same state, pointer-equal |
///
/// With a non-empty `action.key`, the same transitions apply to
/// `data_entity[key]`, lazily creating the mapping and the per-key record.
/// `RESET` with key `"*"` drops the whole mapping; any other key removes
/// only that entry.
///
/// # Example
///
/// ```
/// use reflux_core::{Action, AsyncReducer, Reducer};
/// use serde_json::json;
///
/// let profile = AsyncReducer::new("PROFILE");
/// let state = profile.reduce(None, &Action::new("PROFILE_PENDING").with_key("42"));
/// assert!(state.entity("42").is_some_and(|e| e.pending));
/// ```
#[derive(Clone, Debug)]
pub struct AsyncReducer {
    kinds: AsyncActionKinds,
    initial: Arc<AsyncState>,
}

impl AsyncReducer {
    /// Create a reducer for `prefix` starting from the default empty slot
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self::with_initial(prefix, AsyncState::default())
    }

    /// Create a reducer for `prefix` with a custom initial state
    #[must_use]
    pub fn with_initial(prefix: &str, initial: AsyncState) -> Self {
        Self {
            kinds: AsyncActionKinds::new(prefix),
            initial: Arc::new(initial),
        }
    }

    /// The derived action types this reducer matches
    #[must_use]
    pub const fn kinds(&self) -> &AsyncActionKinds {
        &self.kinds
    }

    fn reduce_top(&self, current: &AsyncState, action: &Action) -> Arc<AsyncState> {
        let mut next = current.clone();
        let kind = action.kind.as_str();

        if kind == self.kinds.pending {
            next.pending = true;
        } else if kind == self.kinds.success {
            next.data = payload_or_null(action);
            next.error = Value::Null;
            next.pending = false;
        } else if kind == self.kinds.fail {
            next.error = payload_or_null(action);
            next.pending = false;
        } else {
            // RESET clears the slot but leaves keyed entities in place;
            // entity removal goes through the keyed RESET path.
            next.data = Value::Null;
            next.error = Value::Null;
            next.pending = false;
        }

        Arc::new(next)
    }

    fn reduce_keyed(&self, current: &AsyncState, key: &str, action: &Action) -> Arc<AsyncState> {
        let mut next = current.clone();
        let kind = action.kind.as_str();

        if kind == self.kinds.reset {
            if key == RESET_ALL_ENTITIES {
                next.data_entity = None;
            } else if let Some(entities) = next.data_entity.as_mut() {
                entities.remove(key);
            }
            return Arc::new(next);
        }

        let entities = next.data_entity.get_or_insert_with(HashMap::new);

        if kind == self.kinds.pending {
            entities.entry(key.to_string()).or_default().pending = true;
        } else if kind == self.kinds.success {
            let entity = entities.entry(key.to_string()).or_default();
            entity.data = payload_or_null(action);
            entity.error = Value::Null;
            entity.pending = false;
        } else {
            match entities.entry(key.to_string()) {
                Entry::Occupied(mut occupied) => {
                    let entity = occupied.get_mut();
                    entity.error = payload_or_null(action);
                    entity.pending = false;
                }
                // Known inconsistency inherited from the reference behavior:
                // a FAIL that creates the entry leaves it pending.
                Entry::Vacant(vacant) => {
                    vacant.insert(AsyncState {
                        error: payload_or_null(action),
                        pending: true,
                        ..AsyncState::default()
                    });
                }
            }
        }

        Arc::new(next)
    }
}

impl Reducer for AsyncReducer {
    type State = AsyncState;

    fn initial(&self) -> Arc<AsyncState> {
        Arc::clone(&self.initial)
    }

    fn reduce(&self, state: Option<Arc<AsyncState>>, action: &Action) -> Arc<AsyncState> {
        let current = state.unwrap_or_else(|| Arc::clone(&self.initial));

        let kind = action.kind.as_str();
        let matched = kind == self.kinds.pending
            || kind == self.kinds.success
            || kind == self.kinds.fail
            || kind == self.kinds.reset;
        if !matched {
            return current;
        }

        match action.entity_key() {
            Some(key) => self.reduce_keyed(&current, key, action),
            None => self.reduce_top(&current, action),
        }
    }
}

fn payload_or_null(action: &Action) -> Value {
    action.payload.clone().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)] // Test code can use expect

    use super::*;
    use serde_json::json;

    fn reducer() -> AsyncReducer {
        AsyncReducer::new("LOAD")
    }

    #[test]
    fn unmatched_action_returns_same_reference() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("SOMETHING_ELSE"));
        let next = reducer.reduce(Some(Arc::clone(&state)), &Action::new("SOMETHING_ELSE"));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn pending_then_success_sets_data_and_clears_error() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING"));
        assert!(state.pending);

        let state = reducer.reduce(
            Some(state),
            &Action::with_payload("LOAD_SUCCESS", json!({"name": "ada"})),
        );
        assert_eq!(state.data, json!({"name": "ada"}));
        assert_eq!(state.error, Value::Null);
        assert!(!state.pending);
    }

    #[test]
    fn fail_keeps_last_good_data() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::with_payload("LOAD_SUCCESS", json!(1)));
        let state = reducer.reduce(
            Some(state),
            &Action::with_payload("LOAD_FAIL", json!("boom")),
        );
        assert_eq!(state.data, json!(1));
        assert_eq!(state.error, json!("boom"));
        assert!(!state.pending);
    }

    #[test]
    fn reset_clears_the_slot() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::with_payload("LOAD_SUCCESS", json!(1)));
        let state = reducer.reduce(Some(state), &Action::new("LOAD_RESET"));
        assert_eq!(state.data, Value::Null);
        assert_eq!(state.error, Value::Null);
        assert!(!state.pending);
    }

    #[test]
    fn keyed_lifecycle_is_independent_per_key() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING").with_key("a"));
        let state = reducer.reduce(
            Some(state),
            &Action::with_payload("LOAD_SUCCESS", json!(10)).with_key("b"),
        );

        assert!(state.entity("a").is_some_and(|e| e.pending));
        let b = state.entity("b").expect("entity b");
        assert_eq!(b.data, json!(10));
        assert!(!b.pending);
        // Top-level slot untouched by keyed actions
        assert_eq!(state.data, Value::Null);
        assert!(!state.pending);
    }

    #[test]
    fn keyed_reset_removes_only_that_entry() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING").with_key("a"));
        let state = reducer.reduce(Some(state), &Action::new("LOAD_PENDING").with_key("b"));
        let state = reducer.reduce(Some(state), &Action::new("LOAD_RESET").with_key("a"));

        assert!(state.entity("a").is_none());
        assert!(state.entity("b").is_some());
    }

    #[test]
    fn wildcard_reset_drops_all_entities() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING").with_key("a"));
        let state = reducer.reduce(Some(state), &Action::new("LOAD_RESET").with_key("*"));
        assert!(state.data_entity.is_none());
    }

    #[test]
    fn keyed_fail_on_fresh_entry_stays_pending() {
        // Inherited quirk: the lazily created record starts pending even
        // though the transition is a failure.
        let reducer = reducer();
        let state = reducer.reduce(
            None,
            &Action::with_payload("LOAD_FAIL", json!("nope")).with_key("new"),
        );
        let entity = state.entity("new").expect("entity");
        assert!(entity.pending);
        assert_eq!(entity.error, json!("nope"));
    }

    #[test]
    fn keyed_fail_on_existing_entry_clears_pending() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING").with_key("k"));
        let state = reducer.reduce(
            Some(state),
            &Action::with_payload("LOAD_FAIL", json!("nope")).with_key("k"),
        );
        let entity = state.entity("k").expect("entity");
        assert!(!entity.pending);
        assert_eq!(entity.error, json!("nope"));
    }

    #[test]
    fn unkeyed_reset_preserves_entities() {
        let reducer = reducer();
        let state = reducer.reduce(None, &Action::new("LOAD_PENDING").with_key("a"));
        let state = reducer.reduce(Some(state), &Action::new("LOAD_RESET"));
        assert!(state.entity("a").is_some());
    }

    #[test]
    fn custom_initial_state_seeds_first_reduce() {
        let reducer = AsyncReducer::with_initial(
            "LOAD",
            AsyncState {
                data: json!("cached"),
                ..AsyncState::default()
            },
        );
        let state = reducer.reduce(None, &Action::new("UNRELATED"));
        assert_eq!(state.data, json!("cached"));
    }
}
