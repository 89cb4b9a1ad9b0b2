//! Driving (input) ports - called by the hosting process.
//!
//! The host owns the HTTP server, the router, and the storage lifecycle.
//! It talks to quire through [`Module`] and receives HTTP-shaped
//! [`Response`] values from the handlers mounted on its [`Router`].

use std::{borrow::Cow, collections::BTreeMap, sync::Arc};

use serde::Serialize;

use crate::{
    application::Cancellation,
    error::{Context, QuireError, QuireResult},
};

/// Cache lifetime for listings, search, and the home page.
pub const MAX_AGE_SHORT: u32 = 300;

/// Cache lifetime for single articles, assets, and the feed.
pub const MAX_AGE_LONG: u32 = 3600;

/// A GET request as seen by a handler.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub path: String,
    /// Values captured from `{name}` segments of the route pattern.
    pub params: BTreeMap<String, String>,
    /// Decoded query string.
    pub query: BTreeMap<String, String>,
    pub cancel: Cancellation,
}

impl Request {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_cancel(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

/// Status, headers, and body for the host to write out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub cache_control: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn bytes(content_type: impl Into<String>, body: Vec<u8>, max_age: u32) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            cache_control: Some(format!("public, max-age={max_age}")),
            body,
        }
    }

    pub fn json<T: Serialize>(value: &T, max_age: u32) -> QuireResult<Self> {
        let body = serde_json::to_vec(value).context("encoding JSON response")?;
        Ok(Self::bytes("application/json", body, max_age))
    }

    pub fn html(body: String, max_age: u32) -> Self {
        Self::bytes("text/html; charset=utf-8", body.into_bytes(), max_age)
    }

    pub fn xml(body: String, max_age: u32) -> Self {
        Self::bytes("application/xml", body.into_bytes(), max_age)
    }

    /// Plain-text diagnostic for a failed request. Never cached.
    pub fn from_error(err: &QuireError) -> Self {
        Self {
            status: err.http_status(),
            content_type: "text/plain; charset=utf-8".into(),
            cache_control: None,
            body: format!("{err}\n").into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// A mounted endpoint.
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// Route registration surface provided by the host.
///
/// Patterns are literal paths with `{name}` segments and an optional
/// trailing `*` that matches the remainder.
pub trait Router {
    fn get(&mut self, pattern: &str, handler: Handler);
}

/// Lifecycle contract between the host and a content module.
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    /// Register read endpoints.
    fn mount(&self, router: &mut dyn Router) -> QuireResult<()>;

    /// Prepare storage and build the index.
    fn start(&self, cancel: &Cancellation) -> QuireResult<()>;

    /// Release module resources. Storage belongs to the host.
    fn stop(&self) -> QuireResult<()>;
}
