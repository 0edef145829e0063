//! The fetch watcher.
//!
//! Thin glue that brackets an HTTP call with lifecycle actions: dispatch
//! `<prefix>_PENDING`, perform the request through the [`Config`], then
//! dispatch `<prefix>_SUCCESS` with the transformed body or `<prefix>_FAIL`
//! with an error payload. Failures become actions, never panics; retry and
//! cancellation are caller concerns.

use reflux_core::{Action, AsyncActionKinds, Reducer};
use serde_json::{Value, json};

use crate::Store;
use crate::config::{Config, HttpMethod, HttpRequest, HttpResponse};

/// One lifecycle-bracketed HTTP request
#[derive(Clone, Debug)]
pub struct FetchRequest {
    /// Action-type prefix the lifecycle actions are derived from
    pub prefix: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request path, resolved to a URL through the [`Config`]
    pub path: String,
    /// Optional JSON request body
    pub body: Option<Value>,
    /// Optional sub-entity key carried on every dispatched action
    pub key: Option<String>,
    /// Optional payload for the PENDING action (e.g. `{"clear": true}` for
    /// paging slices)
    pub pending_payload: Option<Value>,
}

impl FetchRequest {
    /// A request with no body, key or pending payload
    #[must_use]
    pub fn new(prefix: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            method,
            path: path.into(),
            body: None,
            key: None,
            pending_payload: None,
        }
    }

    /// Attach a JSON request body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Carry a sub-entity key on the dispatched actions
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach a payload to the PENDING action
    #[must_use]
    pub fn with_pending_payload(mut self, payload: Value) -> Self {
        self.pending_payload = Some(payload);
        self
    }
}

/// Whether a status code counts as a successful response
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    status >= 200 && status < 300
}

/// The FAIL payload for a non-success response: the body when the server
/// sent one, otherwise a minimal `{"status": ...}` record
#[must_use]
pub fn error_payload(response: &HttpResponse) -> Value {
    if response.body.is_null() {
        json!({ "status": response.status })
    } else {
        response.body.clone()
    }
}

/// Run one fetch cycle against a store.
///
/// Dispatches PENDING immediately, then exactly one of SUCCESS or FAIL once
/// the request settles. The request `key` is carried through to all
/// dispatched actions, so keyed slices track each entity's cycle
/// independently.
#[tracing::instrument(
    skip(store, config, request),
    name = "run_fetch",
    fields(prefix = %request.prefix, path = %request.path)
)]
pub async fn run_fetch<R: Reducer>(store: &Store<R>, config: &Config, request: FetchRequest) {
    let kinds = AsyncActionKinds::new(&request.prefix);
    let key = request.key.clone();

    let pending = match request.pending_payload.clone() {
        Some(payload) => Action::with_payload(kinds.pending.as_str(), payload),
        None => Action::new(kinds.pending.as_str()),
    };
    store.dispatch(apply_key(pending, key.as_deref())).await;

    let url = config.resolve_url(&request.path);
    let mut http = HttpRequest {
        method: request.method,
        url,
        headers: Vec::new(),
        body: request.body.clone(),
    };
    http.headers = config.headers_for(&http);

    let terminal = match config.fetch().fetch(http).await {
        Ok(response) if is_success_status(response.status) => {
            let body = config.transform_response(response.body);
            Action::with_payload(kinds.success.as_str(), body)
        }
        Ok(response) => {
            tracing::warn!(status = response.status, "fetch returned error status");
            Action::with_payload(kinds.fail.as_str(), error_payload(&response))
        }
        Err(error) => {
            tracing::warn!(%error, "fetch transport failure");
            Action::with_payload(kinds.fail.as_str(), json!({ "message": error.to_string() }))
        }
    };
    store.dispatch(apply_key(terminal, key.as_deref())).await;
}

fn apply_key(action: Action, key: Option<&str>) -> Action {
    match key {
        Some(key) => action.with_key(key),
        None => action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_statuses_are_the_2xx_range() {
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(!is_success_status(199));
        assert!(!is_success_status(301));
        assert!(!is_success_status(500));
    }

    #[test]
    fn error_payload_prefers_the_body() {
        let with_body = HttpResponse {
            status: 422,
            body: json!({"message": "invalid"}),
        };
        assert_eq!(error_payload(&with_body), json!({"message": "invalid"}));

        let empty = HttpResponse {
            status: 503,
            body: Value::Null,
        };
        assert_eq!(error_payload(&empty), json!({"status": 503}));
    }
}
