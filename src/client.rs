//! A minimal synchronous HTTP client over a pluggable transport.

use crate::{error::Error, mock::Mock, transport::Transport, Body};
use http::{Request, Response};
use std::{convert::TryFrom, fmt, sync::Arc};

/// Create a client backed by a new, empty [`Mock`], returning both.
///
/// The client is handed to the code under test, while the mock is used to
/// register interactions and check expectations afterwards.
///
/// # Examples
///
/// ```
/// use mocktransport::http::Method;
///
/// let (client, mock) = mocktransport::new();
///
/// mock.expect_method(Method::GET);
///
/// client.get("http://localhost/").unwrap();
///
/// assert!(mock.expectations_met().is_ok());
/// ```
pub fn new() -> (Client, Mock) {
    let mock = Mock::new();

    (Client::new(mock.clone()), mock)
}

/// An HTTP client that sends every request through a [`Transport`].
///
/// Cloning a client is cheap and clones share the same transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a new client using the given transport.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Send a GET request to the given URI.
    pub fn get<U>(&self, uri: U) -> Result<Response<Body>, Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send_builder(Request::get(uri), Body::empty())
    }

    /// Send a HEAD request to the given URI.
    pub fn head<U>(&self, uri: U) -> Result<Response<Body>, Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send_builder(Request::head(uri), Body::empty())
    }

    /// Send a POST request to the given URI with a given request body.
    pub fn post<U>(&self, uri: U, body: impl Into<Body>) -> Result<Response<Body>, Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send_builder(Request::post(uri), body.into())
    }

    /// Send a PUT request to the given URI with a given request body.
    pub fn put<U>(&self, uri: U, body: impl Into<Body>) -> Result<Response<Body>, Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send_builder(Request::put(uri), body.into())
    }

    /// Send a DELETE request to the given URI.
    pub fn delete<U>(&self, uri: U) -> Result<Response<Body>, Error>
    where
        http::Uri: TryFrom<U>,
        <http::Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.send_builder(Request::delete(uri), Body::empty())
    }

    /// Send an HTTP request and return the HTTP response.
    pub fn send<B: Into<Body>>(&self, request: Request<B>) -> Result<Response<Body>, Error> {
        let request: Request<Body> = request.map(Into::into);

        tracing::trace!(method = %request.method(), uri = %request.uri(), "sending request");

        self.transport.round_trip(request)
    }

    fn send_builder(
        &self,
        builder: http::request::Builder,
        body: Body,
    ) -> Result<Response<Body>, Error> {
        self.send(builder.body(body)?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish()
    }
}
