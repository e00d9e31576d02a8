//! Mutations applied to the response draft of an interaction.

use crate::Body;
use http::{HeaderMap, Response, StatusCode};
use std::fmt;

/// Sets a value on the response returned for an intercepted request.
///
/// Setters are applied in the order they were registered, so a later setter
/// wins over an earlier one that touches the same field. Each setter is
/// applied at most once.
pub trait Setter: Send {
    /// Apply this setter to the response draft.
    fn apply(&mut self, response: &mut Response<Body>);
}

impl<S: Setter + ?Sized> Setter for Box<S> {
    fn apply(&mut self, response: &mut Response<Body>) {
        (**self).apply(response)
    }
}

/// Sets the response status code.
#[derive(Debug)]
pub struct SetStatus(pub StatusCode);

impl Setter for SetStatus {
    fn apply(&mut self, response: &mut Response<Body>) {
        *response.status_mut() = self.0;
    }
}

/// Sets the response body.
#[derive(Debug)]
pub struct SetBody(Option<Body>);

impl SetBody {
    /// Create a setter that moves the given body into the response.
    pub fn new(body: impl Into<Body>) -> Self {
        Self(Some(body.into()))
    }
}

impl Setter for SetBody {
    fn apply(&mut self, response: &mut Response<Body>) {
        if let Some(body) = self.0.take() {
            *response.body_mut() = body;
        }
    }
}

/// Replaces the response headers with the given map.
#[derive(Debug)]
pub struct SetHeaders(pub HeaderMap);

impl Setter for SetHeaders {
    fn apply(&mut self, response: &mut Response<Body>) {
        *response.headers_mut() = self.0.clone();
    }
}

/// A setter defined by an arbitrary closure.
pub struct SetFn<F>(pub F);

impl<F> Setter for SetFn<F>
where
    F: FnMut(&mut Response<Body>) + Send,
{
    fn apply(&mut self, response: &mut Response<Body>) {
        (self.0)(response)
    }
}

impl<F> fmt::Debug for SetFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SetFn").finish()
    }
}

/// Sets a JSON response body along with a matching `Content-Type`.
#[cfg(feature = "json")]
#[derive(Debug)]
pub struct SetJson(Vec<u8>);

#[cfg(feature = "json")]
impl SetJson {
    /// Serialize the value up front, failing if it cannot be represented as JSON.
    pub fn new<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_vec(value).map(Self)
    }
}

#[cfg(feature = "json")]
impl Setter for SetJson {
    fn apply(&mut self, response: &mut Response<Body>) {
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        *response.body_mut() = std::mem::take(&mut self.0).into();
    }
}
