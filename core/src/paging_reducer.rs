//! The paging async lifecycle reducer.
//!
//! Tracks an incrementally loaded ordered list plus a load cursor (`offset`)
//! and a continuation flag (`has_more`), with the list mutation operations
//! layered on top of the pending/success/fail/reset lifecycle.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::{Action, PagingActionKinds};
use crate::reducer::Reducer;
use crate::state::AsyncPagingState;

/// Payload field that resets the list before a page load
const FIELD_CLEAR: &str = "clear";
/// Payload field carrying the page items
const FIELD_DATA: &str = "data";
/// Payload field selecting replace-from-start semantics
const FIELD_FIRST_OFFSET: &str = "firstOffset";
/// Payload/item field used as the identity key
const FIELD_ID: &str = "id";
/// Payload field that overwrites the cursor instead of merging into extras
const FIELD_OFFSET: &str = "offset";

/// Reducer for a paginated list slice.
///
/// # Transitions
///
/// - `PENDING`: optional `clear` resets the list and cursor; remaining
///   payload fields merge onto the state; always sets `pending` and
///   `has_more`
/// - `SUCCESS`: appends the payload's `data` items (or replaces the list
///   when `firstOffset` is set), advances `offset` by the new item count and
///   flips `has_more` off on an empty page
/// - `ADD_LAST` / `ADD_FIRST`: append/prepend a single item, `offset += 1`
/// - `UPDATE` / `REPLACE` / `REMOVE`: first-match-wins mutation by `id`
/// - `FAIL`: records the error, leaves data and cursor untouched
/// - `RESET`: restores the full initial state, discarding merged extras
/// - anything else: same state, pointer-equal
///
/// No-op mutations (id not found, missing payload) also return the input
/// pointer-equal, so reference-equality consumers skip work for them too.
///
/// # Example
///
/// ```
/// use reflux_core::{Action, PagingReducer, Reducer};
/// use serde_json::json;
///
/// let feed = PagingReducer::new("FEED");
/// let state = feed.reduce(
///     None,
///     &Action::with_payload("FEED_SUCCESS", json!({"data": [{"id": 1}, {"id": 2}]})),
/// );
/// assert_eq!(state.offset, 2);
/// assert!(state.has_more);
/// ```
#[derive(Clone, Debug)]
pub struct PagingReducer {
    kinds: PagingActionKinds,
    initial: Arc<AsyncPagingState>,
}

impl PagingReducer {
    /// Create a reducer for `prefix` starting from the default empty list
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self::with_initial(prefix, AsyncPagingState::default())
    }

    /// Create a reducer for `prefix` with a custom initial state.
    ///
    /// `RESET` restores this exact state.
    #[must_use]
    pub fn with_initial(prefix: &str, initial: AsyncPagingState) -> Self {
        Self {
            kinds: PagingActionKinds::new(prefix),
            initial: Arc::new(initial),
        }
    }

    /// The derived action types this reducer matches
    #[must_use]
    pub const fn kinds(&self) -> &PagingActionKinds {
        &self.kinds
    }

    fn on_pending(current: &AsyncPagingState, action: &Action) -> Arc<AsyncPagingState> {
        let fields = payload_fields(action);
        let mut next = current.clone();

        if fields.get(FIELD_CLEAR).and_then(Value::as_bool) == Some(true) {
            next.data.clear();
            next.offset = 0;
        }
        for (name, value) in &fields {
            if name == FIELD_CLEAR {
                continue;
            }
            merge_field(&mut next, name, value);
        }

        next.pending = true;
        next.has_more = true;
        Arc::new(next)
    }

    fn on_success(current: &AsyncPagingState, action: &Action) -> Arc<AsyncPagingState> {
        let fields = payload_fields(action);
        // Non-array data is treated as an empty page
        let items: Vec<Value> = match fields.get(FIELD_DATA) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        let count = i64::try_from(items.len()).unwrap_or(i64::MAX);
        let first_offset =
            fields.get(FIELD_FIRST_OFFSET).and_then(Value::as_bool) == Some(true);

        let mut next = current.clone();
        if first_offset {
            next.data = items;
            next.offset = count;
        } else {
            next.data.extend(items);
            next.offset += count;
        }
        next.has_more = count > 0;
        next.error = Value::Null;
        for (name, value) in &fields {
            if name == FIELD_DATA || name == FIELD_FIRST_OFFSET {
                continue;
            }
            merge_field(&mut next, name, value);
        }
        next.pending = false;
        Arc::new(next)
    }

    fn on_add(
        current: &Arc<AsyncPagingState>,
        action: &Action,
        front: bool,
    ) -> Arc<AsyncPagingState> {
        let Some(item) = &action.payload else {
            return Arc::clone(current);
        };
        let mut next = (**current).clone();
        if front {
            next.data.insert(0, item.clone());
        } else {
            next.data.push(item.clone());
        }
        next.offset += 1;
        Arc::new(next)
    }

    fn on_update(current: &Arc<AsyncPagingState>, action: &Action) -> Arc<AsyncPagingState> {
        let Some(item) = &action.payload else {
            return Arc::clone(current);
        };
        let Some(id) = item.get(FIELD_ID) else {
            return Arc::clone(current);
        };
        let Some(index) = position_by_id(&current.data, id) else {
            return Arc::clone(current);
        };
        let mut next = (**current).clone();
        next.data[index] = item.clone();
        Arc::new(next)
    }

    fn on_replace(current: &Arc<AsyncPagingState>, action: &Action) -> Arc<AsyncPagingState> {
        let Some(payload) = &action.payload else {
            return Arc::clone(current);
        };
        let (Some(id), Some(replacement)) = (payload.get(FIELD_ID), payload.get(FIELD_DATA))
        else {
            return Arc::clone(current);
        };
        // A list here is a caller error; guard rather than splice
        if replacement.is_array() {
            return Arc::clone(current);
        }
        let Some(index) = position_by_id(&current.data, id) else {
            return Arc::clone(current);
        };
        let mut next = (**current).clone();
        next.data[index] = replacement.clone();
        Arc::new(next)
    }

    fn on_remove(current: &Arc<AsyncPagingState>, action: &Action) -> Arc<AsyncPagingState> {
        let Some(id) = &action.payload else {
            return Arc::clone(current);
        };
        let Some(index) = position_by_id(&current.data, id) else {
            return Arc::clone(current);
        };
        let mut next = (**current).clone();
        next.data.remove(index);
        next.offset -= 1;
        Arc::new(next)
    }

    fn on_fail(current: &AsyncPagingState, action: &Action) -> Arc<AsyncPagingState> {
        let mut next = current.clone();
        next.error = action.payload.clone().unwrap_or(Value::Null);
        next.pending = false;
        Arc::new(next)
    }
}

impl Reducer for PagingReducer {
    type State = AsyncPagingState;

    fn initial(&self) -> Arc<AsyncPagingState> {
        Arc::clone(&self.initial)
    }

    fn reduce(
        &self,
        state: Option<Arc<AsyncPagingState>>,
        action: &Action,
    ) -> Arc<AsyncPagingState> {
        let current = state.unwrap_or_else(|| Arc::clone(&self.initial));
        let kind = action.kind.as_str();

        if kind == self.kinds.pending {
            Self::on_pending(&current, action)
        } else if kind == self.kinds.success {
            Self::on_success(&current, action)
        } else if kind == self.kinds.add_last {
            Self::on_add(&current, action, false)
        } else if kind == self.kinds.add_first {
            Self::on_add(&current, action, true)
        } else if kind == self.kinds.update {
            Self::on_update(&current, action)
        } else if kind == self.kinds.replace {
            Self::on_replace(&current, action)
        } else if kind == self.kinds.remove {
            Self::on_remove(&current, action)
        } else if kind == self.kinds.fail {
            Self::on_fail(&current, action)
        } else if kind == self.kinds.reset {
            Arc::clone(&self.initial)
        } else {
            current
        }
    }
}

/// The payload interpreted as a record; absent or non-object payloads yield
/// an empty record.
fn payload_fields(action: &Action) -> Map<String, Value> {
    match &action.payload {
        Some(Value::Object(fields)) => fields.clone(),
        _ => Map::new(),
    }
}

/// Merge one payload field onto the state: `offset` overwrites the cursor,
/// everything else lands in the extension mapping. The canonical transition
/// fields (`data`, `pending`, `error`, `hasMore`) are never overwritten by a
/// merge; the transition result wins.
fn merge_field(state: &mut AsyncPagingState, name: &str, value: &Value) {
    match value.as_i64() {
        Some(offset) if name == FIELD_OFFSET => state.offset = offset,
        _ => {
            state.extra.insert(name.to_string(), value.clone());
        }
    }
}

fn position_by_id(items: &[Value], id: &Value) -> Option<usize> {
    items.iter().position(|item| item.get(FIELD_ID) == Some(id))
}
