//! Action values and lifecycle action-type derivation.
//!
//! Action types are plain strings derived from a caller-supplied prefix by
//! suffixing: `FETCH_USERS` yields `FETCH_USERS_PENDING`,
//! `FETCH_USERS_SUCCESS` and so on. Reducers match on exact string equality,
//! which keeps actions interoperable with dispatchers that know nothing
//! about this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reset key that removes every keyed sub-entity at once.
///
/// A `RESET` action carrying this key drops the whole `data_entity` mapping
/// instead of a single entry.
pub const RESET_ALL_ENTITIES: &str = "*";

const SUFFIX_PENDING: &str = "_PENDING";
const SUFFIX_SUCCESS: &str = "_SUCCESS";
const SUFFIX_FAIL: &str = "_FAIL";
const SUFFIX_RESET: &str = "_RESET";
const SUFFIX_UPDATE: &str = "_UPDATE";
const SUFFIX_ADD_LAST: &str = "_ADD_LAST";
const SUFFIX_ADD_FIRST: &str = "_ADD_FIRST";
const SUFFIX_REPLACE: &str = "_REPLACE";
const SUFFIX_REMOVE: &str = "_REMOVE";

/// A dispatched action.
///
/// The wire shape is `{ "type": ..., "payload": ..., "key": ... }`, matching
/// the store convention the reducers are consumed from. `payload` is opaque
/// JSON; reducers only inspect the handful of fields their transition table
/// names and never validate the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action type, matched by exact string equality
    #[serde(rename = "type")]
    pub kind: String,

    /// Opaque payload interpreted per transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Optional sub-entity key redirecting the simple reducer to
    /// `data_entity[key]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Action {
    /// Create an action with no payload
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            key: None,
        }
    }

    /// Create an action carrying a payload
    #[must_use]
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
            key: None,
        }
    }

    /// Attach a sub-entity key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The sub-entity key, if present and non-empty.
    ///
    /// An empty key is treated the same as no key at all: the action targets
    /// the top-level slot.
    #[must_use]
    pub fn entity_key(&self) -> Option<&str> {
        match self.key.as_deref() {
            Some("") | None => None,
            key => key,
        }
    }
}

/// The four lifecycle action types derived from a prefix.
///
/// Derivation is pure and total: any prefix produces a valid set of types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncActionKinds {
    /// `<prefix>_PENDING`
    pub pending: String,
    /// `<prefix>_SUCCESS`
    pub success: String,
    /// `<prefix>_FAIL`
    pub fail: String,
    /// `<prefix>_RESET`
    pub reset: String,
}

impl AsyncActionKinds {
    /// Derive the lifecycle types for `prefix`
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            pending: format!("{prefix}{SUFFIX_PENDING}"),
            success: format!("{prefix}{SUFFIX_SUCCESS}"),
            fail: format!("{prefix}{SUFFIX_FAIL}"),
            reset: format!("{prefix}{SUFFIX_RESET}"),
        }
    }
}

/// The nine action types of the paging lifecycle.
///
/// Extends the simple lifecycle with the list mutation operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagingActionKinds {
    /// `<prefix>_PENDING`
    pub pending: String,
    /// `<prefix>_SUCCESS`
    pub success: String,
    /// `<prefix>_FAIL`
    pub fail: String,
    /// `<prefix>_RESET`
    pub reset: String,
    /// `<prefix>_UPDATE`
    pub update: String,
    /// `<prefix>_ADD_LAST`
    pub add_last: String,
    /// `<prefix>_ADD_FIRST`
    pub add_first: String,
    /// `<prefix>_REPLACE`
    pub replace: String,
    /// `<prefix>_REMOVE`
    pub remove: String,
}

impl PagingActionKinds {
    /// Derive the paging lifecycle types for `prefix`
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            pending: format!("{prefix}{SUFFIX_PENDING}"),
            success: format!("{prefix}{SUFFIX_SUCCESS}"),
            fail: format!("{prefix}{SUFFIX_FAIL}"),
            reset: format!("{prefix}{SUFFIX_RESET}"),
            update: format!("{prefix}{SUFFIX_UPDATE}"),
            add_last: format!("{prefix}{SUFFIX_ADD_LAST}"),
            add_first: format!("{prefix}{SUFFIX_ADD_FIRST}"),
            replace: format!("{prefix}{SUFFIX_REPLACE}"),
            remove: format!("{prefix}{SUFFIX_REMOVE}"),
        }
    }
}
