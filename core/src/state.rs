//! State shapes tracked by the lifecycle reducers.
//!
//! Both shapes serialize with the camelCase wire names the surrounding store
//! ecosystem expects (`dataEntity`, `hasMore`), and both treat absent
//! `data`/`error` as JSON `null` rather than an `Option` so that serialized
//! slices look exactly like the slices a plain-object store would hold.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state for a single async slot.
///
/// At most one of `data`/`error` is meaningfully set after a terminal
/// transition: success clears the error, while fail leaves the last good
/// `data` in place so consumers can keep rendering stale content alongside
/// the error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncState {
    /// Last successful payload, `null` before the first success
    #[serde(default)]
    pub data: Value,

    /// Whether a request is in flight
    #[serde(default)]
    pub pending: bool,

    /// Last failure payload, `null` when the slot is healthy
    #[serde(default)]
    pub error: Value,

    /// Sparse mapping of caller-supplied keys to independent sub-states.
    ///
    /// Each entry mirrors the parent shape one level deep; entries never
    /// nest their own `data_entity`. Created lazily on the first keyed
    /// action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_entity: Option<HashMap<String, AsyncState>>,
}

impl AsyncState {
    /// Look up a keyed sub-entity, if any
    #[must_use]
    pub fn entity(&self, key: &str) -> Option<&AsyncState> {
        self.data_entity.as_ref()?.get(key)
    }
}

fn default_true() -> bool {
    true
}

/// Lifecycle state for an incrementally loaded ordered list.
///
/// `offset` tracks the cumulative count of loaded items unless a payload
/// explicitly overwrites it; `has_more` stays true until a success yields
/// zero new items. Arbitrary extra payload fields merged onto the state live
/// in [`AsyncPagingState::extra`] and are flattened on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncPagingState {
    /// The loaded items, in order. Items are opaque records whose `id`
    /// field is the identity key for update/replace/remove.
    #[serde(default)]
    pub data: Vec<Value>,

    /// Cumulative load cursor
    #[serde(default)]
    pub offset: i64,

    /// Whether a page request is in flight
    #[serde(default)]
    pub pending: bool,

    /// Last failure payload, `null` when the slice is healthy
    #[serde(default)]
    pub error: Value,

    /// Continuation flag, cleared by an empty success page
    #[serde(default = "default_true")]
    pub has_more: bool,

    /// Extension fields merged in from payloads
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AsyncPagingState {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            offset: 0,
            pending: false,
            error: Value::Null,
            has_more: true,
            extra: Map::new(),
        }
    }
}

impl AsyncPagingState {
    /// Read an extension field previously merged from a payload
    #[must_use]
    pub fn extra_field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)] // Test code can use expect

    use super::*;
    use serde_json::json;

    #[test]
    fn async_state_defaults_to_empty_slot() {
        let state = AsyncState::default();
        assert_eq!(state.data, Value::Null);
        assert_eq!(state.error, Value::Null);
        assert!(!state.pending);
        assert!(state.data_entity.is_none());
    }

    #[test]
    fn paging_state_defaults_to_loadable() {
        let state = AsyncPagingState::default();
        assert!(state.has_more);
        assert_eq!(state.offset, 0);
        assert!(state.data.is_empty());
    }

    #[test]
    fn paging_state_flattens_extras_on_the_wire() {
        let mut state = AsyncPagingState::default();
        state.extra.insert("total".into(), json!(40));

        let wire = serde_json::to_value(&state).expect("serializes");
        assert_eq!(wire["total"], json!(40));
        assert_eq!(wire["hasMore"], json!(true));

        let parsed: AsyncPagingState = serde_json::from_value(wire).expect("parses");
        assert_eq!(parsed, state);
    }

    #[test]
    fn async_state_uses_data_entity_wire_name() {
        let mut entities = HashMap::new();
        entities.insert(
            "7".to_string(),
            AsyncState {
                pending: true,
                ..AsyncState::default()
            },
        );
        let state = AsyncState {
            data_entity: Some(entities),
            ..AsyncState::default()
        };

        let wire = serde_json::to_value(&state).expect("serializes");
        assert_eq!(wire["dataEntity"]["7"]["pending"], json!(true));
    }
}
