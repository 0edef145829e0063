//! Explicit request configuration.
//!
//! The original pattern here is a host-wide mutable singleton; this module
//! replaces it with a plain value the caller constructs once and threads
//! into whichever component needs it. Every override has a documented
//! default, so `Config::default()` is a working zero-configuration setup.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FetchError;

/// Boxed future type returned by [`Fetch`] implementations
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// HTTP method of a [`HttpRequest`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// The method name on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request handed to a [`Fetch`] implementation.
///
/// The URL is already resolved and headers already injected by the time a
/// fetcher sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Fully resolved URL
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// Optional JSON body
    pub body: Option<Value>,
}

/// A response produced by a [`Fetch`] implementation
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body; non-JSON bodies arrive as a JSON string, empty bodies
    /// as `null`
    pub body: Value,
}

/// Pluggable HTTP transport.
///
/// Implementations return boxed futures so they stay object-safe; the store
/// glue only ever holds an `Arc<dyn Fetch>`.
pub trait Fetch: Send + Sync {
    /// Perform the request
    fn fetch(&self, request: HttpRequest) -> BoxFuture<Result<HttpResponse, FetchError>>;
}

/// Default transport backed by [`reqwest`]
#[derive(Clone, Debug, Default)]
pub struct ReqwestFetch {
    client: reqwest::Client,
}

impl ReqwestFetch {
    /// Wrap an existing client (connection pools, proxies, timeouts)
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for ReqwestFetch {
    fn fetch(&self, request: HttpRequest) -> BoxFuture<Result<HttpResponse, FetchError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Patch => reqwest::Method::PATCH,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            let body = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };

            Ok(HttpResponse { status, body })
        })
    }
}

type UrlResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;
type HeaderProvider = Arc<dyn Fn(&HttpRequest) -> Vec<(String, String)> + Send + Sync>;
type ResponseTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Cross-cutting request behaviors, injected by the caller.
///
/// | override | default |
/// |---|---|
/// | base URL | empty string (paths used as-is) |
/// | URL resolution | `base_url + path` |
/// | header injection | none |
/// | response transform | identity |
/// | fetch | [`ReqwestFetch`] |
#[derive(Clone)]
pub struct Config {
    base_url: String,
    resolve_url: Option<UrlResolver>,
    headers: Option<HeaderProvider>,
    transform_response: Option<ResponseTransform>,
    fetch: Arc<dyn Fetch>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            resolve_url: None,
            headers: None,
            transform_response: None,
            fetch: Arc::new(ReqwestFetch::default()),
        }
    }
}

impl Config {
    /// A configuration with all defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix prepended to request paths by the default URL resolution
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace URL resolution entirely; receives the request path
    #[must_use]
    pub fn with_url_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.resolve_url = Some(Arc::new(resolver));
        self
    }

    /// Inject headers into every request
    #[must_use]
    pub fn with_header_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&HttpRequest) -> Vec<(String, String)> + Send + Sync + 'static,
    {
        self.headers = Some(Arc::new(provider));
        self
    }

    /// Transform every successful response body before it becomes a
    /// SUCCESS payload
    #[must_use]
    pub fn with_response_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform_response = Some(Arc::new(transform));
        self
    }

    /// Replace the HTTP transport
    #[must_use]
    pub fn with_fetch(mut self, fetch: impl Fetch + 'static) -> Self {
        self.fetch = Arc::new(fetch);
        self
    }

    /// Resolve a request path to a full URL
    #[must_use]
    pub fn resolve_url(&self, path: &str) -> String {
        match &self.resolve_url {
            Some(resolver) => resolver(path),
            None => format!("{}{path}", self.base_url),
        }
    }

    /// Headers to inject for a request
    #[must_use]
    pub fn headers_for(&self, request: &HttpRequest) -> Vec<(String, String)> {
        match &self.headers {
            Some(provider) => provider(request),
            None => Vec::new(),
        }
    }

    /// Apply the response transform
    #[must_use]
    pub fn transform_response(&self, body: Value) -> Value {
        match &self.transform_response {
            Some(transform) => transform(body),
            None => body,
        }
    }

    /// The configured transport
    #[must_use]
    pub fn fetch(&self) -> Arc<dyn Fetch> {
        Arc::clone(&self.fetch)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("resolve_url", &self.resolve_url.is_some())
            .field("headers", &self.headers.is_some())
            .field("transform_response", &self.transform_response.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_resolution_prepends_base_url() {
        let config = Config::new().with_base_url("https://api.example.com");
        assert_eq!(
            config.resolve_url("/users"),
            "https://api.example.com/users"
        );
    }

    #[test]
    fn resolver_override_wins_over_base_url() {
        let config = Config::new()
            .with_base_url("https://ignored.example.com")
            .with_url_resolver(|path| format!("https://cdn.example.com{path}?v=2"));
        assert_eq!(
            config.resolve_url("/users"),
            "https://cdn.example.com/users?v=2"
        );
    }

    #[test]
    fn default_transform_is_identity() {
        let config = Config::new();
        assert_eq!(config.transform_response(json!({"a": 1})), json!({"a": 1}));

        let config = config.with_response_transform(|body| body["data"].clone());
        assert_eq!(config.transform_response(json!({"data": 7})), json!(7));
    }

    #[test]
    fn default_headers_are_empty() {
        let config = Config::new();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.example.com/users".into(),
            headers: Vec::new(),
            body: None,
        };
        assert!(config.headers_for(&request).is_empty());
    }
}
