//! The transport seam that a mock substitutes for.

use crate::{error::Error, Body};
use http::{Request, Response};
use std::sync::Arc;

/// Something that can turn a request into a response.
///
/// This is the only operation a client needs from its transport, and the only
/// operation a [`Mock`](crate::Mock) provides to the code under test.
///
/// Since clients may be used to send requests concurrently, all transports
/// must be synchronized and must be able to account for multiple requests
/// being made in parallel.
pub trait Transport: Send + Sync {
    /// Perform one request/response exchange.
    fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, Error> {
        (**self).round_trip(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, Error> {
        (**self).round_trip(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, Error> {
        (**self).round_trip(request)
    }
}
