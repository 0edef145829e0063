//! Batch and group factories.
//!
//! These combinators apply the lifecycle reducers (or a simpler
//! single-action-type reducer) across a mapping of logical names to
//! configuration entries, producing a mapping of name → reducer with no
//! transition logic of their own.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::action::Action;
use crate::async_reducer::AsyncReducer;
use crate::paging_reducer::PagingReducer;
use crate::reducer::Reducer;
use crate::state::{AsyncPagingState, AsyncState};

/// Configuration entry for one slice in a batch or group: either a bare
/// action-type (or prefix) string, or a string paired with a custom initial
/// state.
#[derive(Clone, Debug)]
pub enum SliceSpec<S> {
    /// Bare action-type or prefix; the slice starts from `S::default()`
    Kind(String),
    /// Action-type or prefix plus a custom initial state
    WithInitial(String, S),
}

impl<S> From<&str> for SliceSpec<S> {
    fn from(kind: &str) -> Self {
        Self::Kind(kind.to_string())
    }
}

impl<S> From<String> for SliceSpec<S> {
    fn from(kind: String) -> Self {
        Self::Kind(kind)
    }
}

impl<S> From<(&str, S)> for SliceSpec<S> {
    fn from((kind, initial): (&str, S)) -> Self {
        Self::WithInitial(kind.to_string(), initial)
    }
}

impl<S> SliceSpec<S> {
    fn into_parts(self) -> (String, Option<S>) {
        match self {
            Self::Kind(kind) => (kind, None),
            Self::WithInitial(kind, initial) => (kind, Some(initial)),
        }
    }
}

/// Single-action-type reducer over an opaque JSON value.
///
/// Its one action type sets the state to the payload; everything else
/// returns the same state pointer-equal. This is the building block
/// [`create_reducer_batch`] stamps out per name.
#[derive(Clone, Debug)]
pub struct ValueReducer {
    kind: String,
    initial: Arc<Value>,
}

impl ValueReducer {
    /// Create a reducer that stores the payload of `kind` actions
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self::with_initial(kind, Value::Null)
    }

    /// Create a reducer with a custom initial value
    #[must_use]
    pub fn with_initial(kind: impl Into<String>, initial: Value) -> Self {
        Self {
            kind: kind.into(),
            initial: Arc::new(initial),
        }
    }
}

impl Reducer for ValueReducer {
    type State = Value;

    fn initial(&self) -> Arc<Value> {
        Arc::clone(&self.initial)
    }

    fn reduce(&self, state: Option<Arc<Value>>, action: &Action) -> Arc<Value> {
        let current = state.unwrap_or_else(|| Arc::clone(&self.initial));
        if action.kind == self.kind {
            Arc::new(action.payload.clone().unwrap_or(Value::Null))
        } else {
            current
        }
    }
}

/// Custom transition callback for one field of a reducer group.
///
/// Receives the current field value and the triggering action, and returns
/// the next value.
pub type FieldCallback = Box<dyn Fn(&Arc<Value>, &Action) -> Arc<Value> + Send + Sync>;

/// Configuration for one field tracked by [`create_reducer_group`].
pub struct FieldSpec {
    kind: String,
    initial: Value,
    on_update: Option<FieldCallback>,
    on_reset: Option<FieldCallback>,
}

impl FieldSpec {
    /// Track a field updated by `kind` actions, starting from `initial`
    #[must_use]
    pub fn new(kind: impl Into<String>, initial: Value) -> Self {
        Self {
            kind: kind.into(),
            initial,
            on_update: None,
            on_reset: None,
        }
    }

    /// Custom merge logic when the field's action type fires.
    ///
    /// Without a callback the field is set to the action payload.
    #[must_use]
    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Value>, &Action) -> Arc<Value> + Send + Sync + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Custom logic when the group's shared reset type fires.
    ///
    /// Without a callback the field is restored to its initial value.
    #[must_use]
    pub fn on_reset<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<Value>, &Action) -> Arc<Value> + Send + Sync + 'static,
    {
        self.on_reset = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("kind", &self.kind)
            .field("initial", &self.initial)
            .field("on_update", &self.on_update.is_some())
            .field("on_reset", &self.on_reset.is_some())
            .finish()
    }
}

/// Reducer for one field of a group, produced by [`create_reducer_group`].
pub struct FieldReducer {
    kind: String,
    reset_kind: Option<String>,
    initial: Arc<Value>,
    on_update: Option<FieldCallback>,
    on_reset: Option<FieldCallback>,
}

impl Reducer for FieldReducer {
    type State = Value;

    fn initial(&self) -> Arc<Value> {
        Arc::clone(&self.initial)
    }

    fn reduce(&self, state: Option<Arc<Value>>, action: &Action) -> Arc<Value> {
        let current = state.unwrap_or_else(|| Arc::clone(&self.initial));

        if action.kind == self.kind {
            return match &self.on_update {
                Some(callback) => callback(&current, action),
                None => Arc::new(action.payload.clone().unwrap_or(Value::Null)),
            };
        }
        if self.reset_kind.as_deref() == Some(action.kind.as_str()) {
            return match &self.on_reset {
                Some(callback) => callback(&current, action),
                None => Arc::clone(&self.initial),
            };
        }
        current
    }
}

impl std::fmt::Debug for FieldReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldReducer")
            .field("kind", &self.kind)
            .field("reset_kind", &self.reset_kind)
            .field("initial", &self.initial)
            .finish()
    }
}

/// Build a mapping of name → [`ValueReducer`] from name → action-type
/// entries.
///
/// # Example
///
/// ```
/// use reflux_core::{Action, Reducer, create_reducer_batch};
/// use serde_json::json;
///
/// let batch = create_reducer_batch([
///     ("locale", "SET_LOCALE".into()),
///     ("theme", ("SET_THEME", json!("light")).into()),
/// ]);
///
/// let theme = &batch["theme"];
/// let state = theme.reduce(None, &Action::new("UNRELATED"));
/// assert_eq!(*state, json!("light"));
/// ```
#[must_use]
pub fn create_reducer_batch<N, I>(entries: I) -> HashMap<String, ValueReducer>
where
    N: Into<String>,
    I: IntoIterator<Item = (N, SliceSpec<Value>)>,
{
    entries
        .into_iter()
        .map(|(name, spec)| {
            let (kind, initial) = spec.into_parts();
            let reducer = ValueReducer::with_initial(kind, initial.unwrap_or(Value::Null));
            (name.into(), reducer)
        })
        .collect()
}

/// Build a mapping of name → [`FieldReducer`] with a shared reset type.
///
/// Each field reacts to its own action type (payload assignment, or its
/// update callback) and to `reset_kind` (restore initial, or its reset
/// callback).
#[must_use]
pub fn create_reducer_group<N, I>(
    reset_kind: Option<&str>,
    fields: I,
) -> HashMap<String, FieldReducer>
where
    N: Into<String>,
    I: IntoIterator<Item = (N, FieldSpec)>,
{
    fields
        .into_iter()
        .map(|(name, spec)| {
            let reducer = FieldReducer {
                kind: spec.kind,
                reset_kind: reset_kind.map(ToString::to_string),
                initial: Arc::new(spec.initial),
                on_update: spec.on_update,
                on_reset: spec.on_reset,
            };
            (name.into(), reducer)
        })
        .collect()
}

/// Build a mapping of name → [`AsyncReducer`] from name → prefix entries.
#[must_use]
pub fn create_async_reducer_group<N, I>(entries: I) -> HashMap<String, AsyncReducer>
where
    N: Into<String>,
    I: IntoIterator<Item = (N, SliceSpec<AsyncState>)>,
{
    entries
        .into_iter()
        .map(|(name, spec)| {
            let (prefix, initial) = spec.into_parts();
            let reducer = AsyncReducer::with_initial(&prefix, initial.unwrap_or_default());
            (name.into(), reducer)
        })
        .collect()
}

/// Build a mapping of name → [`PagingReducer`] from name → prefix entries.
#[must_use]
pub fn create_async_paging_reducer_group<N, I>(entries: I) -> HashMap<String, PagingReducer>
where
    N: Into<String>,
    I: IntoIterator<Item = (N, SliceSpec<AsyncPagingState>)>,
{
    entries
        .into_iter()
        .map(|(name, spec)| {
            let (prefix, initial) = spec.into_parts();
            let reducer = PagingReducer::with_initial(&prefix, initial.unwrap_or_default());
            (name.into(), reducer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)] // Test code can use expect

    use super::*;
    use serde_json::json;

    #[test]
    fn value_reducer_stores_payload_on_match() {
        let reducer = ValueReducer::new("SET_LOCALE");
        let state = reducer.reduce(None, &Action::with_payload("SET_LOCALE", json!("fr")));
        assert_eq!(*state, json!("fr"));

        let next = reducer.reduce(Some(Arc::clone(&state)), &Action::new("OTHER"));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn batch_builds_one_reducer_per_name() {
        let batch = create_reducer_batch([
            ("locale", "SET_LOCALE".into()),
            ("theme", ("SET_THEME", json!("dark")).into()),
        ]);
        assert_eq!(batch.len(), 2);

        let theme = batch.get("theme").expect("theme reducer");
        assert_eq!(*theme.initial(), json!("dark"));
    }

    #[test]
    fn group_shared_reset_restores_each_initial() {
        let group = create_reducer_group(
            Some("SESSION_RESET"),
            [
                ("token", FieldSpec::new("SET_TOKEN", Value::Null)),
                ("retries", FieldSpec::new("SET_RETRIES", json!(0))),
            ],
        );

        let token = group.get("token").expect("token reducer");
        let state = token.reduce(None, &Action::with_payload("SET_TOKEN", json!("abc")));
        assert_eq!(*state, json!("abc"));

        let state = token.reduce(Some(state), &Action::new("SESSION_RESET"));
        assert_eq!(*state, Value::Null);
    }

    #[test]
    fn group_update_callback_overrides_assignment() {
        let group = create_reducer_group(
            None,
            [(
                "count",
                FieldSpec::new("BUMP", json!(0)).on_update(|current, _action| {
                    let bumped = current.as_i64().unwrap_or(0) + 1;
                    Arc::new(json!(bumped))
                }),
            )],
        );

        let count = group.get("count").expect("count reducer");
        let state = count.reduce(None, &Action::new("BUMP"));
        let state = count.reduce(Some(state), &Action::new("BUMP"));
        assert_eq!(*state, json!(2));
    }

    #[test]
    fn group_reset_callback_overrides_restore() {
        let group = create_reducer_group(
            Some("RESET"),
            [(
                "audit",
                FieldSpec::new("SET_AUDIT", json!([]))
                    .on_reset(|_current, _action| Arc::new(json!(["reset"]))),
            )],
        );

        let audit = group.get("audit").expect("audit reducer");
        let state = audit.reduce(None, &Action::new("RESET"));
        assert_eq!(*state, json!(["reset"]));
    }

    #[test]
    fn async_group_derives_lifecycle_per_prefix() {
        let group = create_async_reducer_group([
            ("users", "FETCH_USERS".into()),
            (
                "profile",
                (
                    "FETCH_PROFILE",
                    AsyncState {
                        data: json!({}),
                        ..AsyncState::default()
                    },
                )
                    .into(),
            ),
        ]);

        let users = group.get("users").expect("users reducer");
        let state = users.reduce(None, &Action::new("FETCH_USERS_PENDING"));
        assert!(state.pending);

        let profile = group.get("profile").expect("profile reducer");
        assert_eq!(profile.initial().data, json!({}));
    }

    #[test]
    fn paging_group_derives_lifecycle_per_prefix() {
        let group = create_async_paging_reducer_group([("feed", "FEED".into())]);
        let feed = group.get("feed").expect("feed reducer");
        let state = feed.reduce(
            None,
            &Action::with_payload("FEED_SUCCESS", json!({"data": [{"id": 1}]})),
        );
        assert_eq!(state.offset, 1);
    }
}
