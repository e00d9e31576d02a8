//! A scripted transport that checks outgoing requests and returns canned
//! responses.
//!
//! A [`Mock`] holds an ordered stack of *interactions*. Each interaction
//! bundles the expectations for one request, the setters that build its
//! response, and optionally a simulated error to return instead. Calls made
//! through the mock consume the interactions strictly in the order they were
//! added, no matter which thread issues them.
//!
//! Registration methods add to an in-progress interaction, and [`Mock::add`]
//! pushes it onto the stack. If the in-progress interaction has anything
//! registered when the first call arrives it is added implicitly, so a test
//! with a single interaction doesn't need to call `add` at all.
//!
//! Expectation failures never fail the call. They are recorded and reported
//! by [`Mock::expectations_met`] once the code under test has finished.

use crate::{
    config::ResponseDefaults,
    error::{BoxError, Error},
    expectation::{ExpectFn, Expectation, ExpectedBody, ExpectedHeader, ExpectedMethod},
    setter::{SetBody, SetFn, SetHeaders, SetStatus, Setter},
    transport::Transport,
    Body,
};
use http::{
    header::{HeaderName, HeaderValue},
    HeaderMap,
    Method,
    Request,
    Response,
    StatusCode,
    Version,
};
use std::{
    borrow::Cow,
    convert::TryFrom,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A mock HTTP transport.
///
/// Cloning a mock is cheap and the clones share the same interactions, so
/// one clone can be handed to the code under test while the test keeps
/// another to make assertions with.
#[derive(Clone)]
pub struct Mock(Arc<Inner>);

struct Inner {
    defaults: ResponseDefaults,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    /// Interaction currently being registered.
    pending: Interaction,

    /// Committed interactions, in the order they will be consumed.
    stack: Vec<Interaction>,

    /// Position of the interaction that services the next call.
    cursor: usize,
}

impl State {
    fn commit(&mut self) {
        let interaction = std::mem::take(&mut self.pending);

        tracing::debug!(
            interaction = self.stack.len() + 1,
            expectations = interaction.expectations.len(),
            setters = interaction.setters.len(),
            error = interaction.error.is_some(),
            "interaction added",
        );

        self.stack.push(interaction);
    }
}

/// One expected request and the response to give it.
#[derive(Default)]
struct Interaction {
    expectations: Vec<Box<dyn Expectation>>,
    setters: Vec<Box<dyn Setter>>,
    error: Option<Error>,
}

impl Interaction {
    fn is_empty(&self) -> bool {
        self.expectations.is_empty() && self.setters.is_empty() && self.error.is_none()
    }

    /// Build the response for a request, recording the outcome of every
    /// expectation along the way.
    fn respond(
        &mut self,
        defaults: &ResponseDefaults,
        request: Request<Body>,
    ) -> Result<Response<Body>, Error> {
        if let Some(error) = self.error.take() {
            tracing::debug!("returning simulated error: {}", error);
            return Err(error);
        }

        let mut response = defaults.draft();

        for setter in &mut self.setters {
            setter.apply(&mut response);
        }

        let (parts, mut body) = request.into_parts();
        let request = Request::from_parts(parts, body.read_to_vec());

        for expectation in &mut self.expectations {
            expectation.check(&request);

            tracing::trace!(
                met = expectation.is_met(),
                "checked expectation: {}",
                expectation.message(),
            );
        }

        Ok(response)
    }
}

impl Mock {
    /// Create a new mock with no interactions that responds with the default
    /// `200 OK` response.
    pub fn new() -> Self {
        Self::with_defaults(ResponseDefaults::default())
    }

    /// Create a builder for a mock with customized response defaults.
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    fn with_defaults(defaults: ResponseDefaults) -> Self {
        Self(Arc::new(Inner {
            defaults,
            state: Mutex::new(State::default()),
        }))
    }

    /// Get the baseline response interactions start from.
    pub fn defaults(&self) -> &ResponseDefaults {
        &self.0.defaults
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Setters and expectations run under the lock and may panic.
        self.0.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Expect the request to use the given method.
    pub fn expect_method(&self, method: Method) -> &Self {
        self.expectation(ExpectedMethod::new(method))
    }

    /// Expect the request body to equal the given bytes.
    pub fn expect_body(&self, body: impl Into<Vec<u8>>) -> &Self {
        self.expectation(ExpectedBody::new(body))
    }

    /// Expect the request to carry every header value in the given map.
    pub fn expect_header(&self, headers: HeaderMap) -> &Self {
        self.expectation(ExpectedHeader::new(headers))
    }

    /// Expect the request to satisfy an arbitrary predicate.
    pub fn expect_fn<F>(&self, description: impl Into<Cow<'static, str>>, predicate: F) -> &Self
    where
        F: Fn(&Request<Vec<u8>>) -> bool + Send + 'static,
    {
        self.expectation(ExpectFn::new(description, predicate))
    }

    /// Expect the request body to be JSON equal to the given value.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be represented as JSON.
    #[cfg(feature = "json")]
    pub fn expect_json<T>(&self, value: &T) -> &Self
    where
        T: serde::Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => self.expectation(crate::expectation::ExpectedJson::new(value)),
            Err(e) => panic!("expected JSON body cannot be serialized: {}", e),
        }
    }

    /// Add a custom expectation to the current interaction.
    pub fn expectation<E>(&self, expectation: E) -> &Self
    where
        E: Expectation + 'static,
    {
        self.state().pending.expectations.push(Box::new(expectation));
        self
    }

    /// Respond with the given status code.
    pub fn return_status(&self, status: StatusCode) -> &Self {
        self.setter(SetStatus(status))
    }

    /// Respond with the given body.
    pub fn return_body(&self, body: impl Into<Body>) -> &Self {
        self.setter(SetBody::new(body))
    }

    /// Respond with the given headers, replacing any set before.
    pub fn return_headers(&self, headers: HeaderMap) -> &Self {
        self.setter(SetHeaders(headers))
    }

    /// Modify the response with an arbitrary closure.
    pub fn return_with<F>(&self, f: F) -> &Self
    where
        F: FnMut(&mut Response<Body>) + Send + 'static,
    {
        self.setter(SetFn(f))
    }

    /// Respond with a JSON body and a `Content-Type: application/json` header.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be serialized as JSON.
    #[cfg(feature = "json")]
    pub fn return_json<T>(&self, value: &T) -> &Self
    where
        T: serde::Serialize + ?Sized,
    {
        match crate::setter::SetJson::new(value) {
            Ok(setter) => self.setter(setter),
            Err(e) => panic!("response body cannot be serialized as JSON: {}", e),
        }
    }

    /// Add a custom setter to the current interaction.
    pub fn setter<S>(&self, setter: S) -> &Self
    where
        S: Setter + 'static,
    {
        self.state().pending.setters.push(Box::new(setter));
        self
    }

    /// Return the given error instead of a response. Replaces any error set
    /// earlier on the current interaction.
    pub fn return_error<E>(&self, error: E) -> &Self
    where
        E: Into<BoxError>,
    {
        self.state().pending.error = Some(Error::simulated(error));
        self
    }

    /// Add the current expectations, setters, and error to the stack as one
    /// interaction, and start a new empty one.
    ///
    /// Adding with nothing registered produces an interaction that accepts
    /// any request and returns the default response.
    pub fn add(&self) -> &Self {
        self.state().commit();
        self
    }

    /// Check every expectation of every interaction, in order.
    ///
    /// Returns an error describing the first expectation that was not met,
    /// including expectations belonging to interactions no request ever
    /// reached.
    pub fn expectations_met(&self) -> Result<(), Error> {
        let state = self.state();

        for (i, interaction) in state.stack.iter().enumerate() {
            if let Some(expectation) = interaction.expectations.iter().find(|e| !e.is_met()) {
                let error = Error::ExpectationNotMet {
                    interaction: i + 1,
                    message: expectation.message(),
                };

                tracing::warn!("{}", error);

                return Err(error);
            }
        }

        Ok(())
    }

    /// Get the number of requests intercepted so far.
    pub fn requests_received(&self) -> usize {
        self.state().cursor
    }

    /// Get the number of interactions added so far.
    pub fn interactions(&self) -> usize {
        self.state().stack.len()
    }
}

impl Default for Mock {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for Mock {
    /// Consume the next interaction for this request.
    ///
    /// # Panics
    ///
    /// Panics if every added interaction has already been consumed.
    fn round_trip(&self, request: Request<Body>) -> Result<Response<Body>, Error> {
        let mut state = self.state();

        if !state.pending.is_empty() {
            state.commit();
        }

        let position = state.cursor;
        let configured = state.stack.len();

        if position >= configured {
            drop(state);
            panic!(
                "request #{} ({} {}) made but only {} interaction(s) were added",
                position + 1,
                request.method(),
                request.uri(),
                configured,
            );
        }

        state.cursor += 1;

        tracing::debug!(
            interaction = position + 1,
            method = %request.method(),
            uri = %request.uri(),
            "intercepted request",
        );

        state.stack[position].respond(&self.0.defaults, request)
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();

        f.debug_struct("Mock")
            .field("defaults", &self.0.defaults)
            .field("interactions", &state.stack.len())
            .field("requests_received", &state.cursor)
            .finish()
    }
}

/// A builder for mocks with customized response defaults.
#[derive(Debug, Default)]
pub struct MockBuilder {
    defaults: ResponseDefaults,
    error: Option<Error>,
}

impl MockBuilder {
    /// Set the status code responses start with.
    pub fn default_status(mut self, status: StatusCode) -> Self {
        self.defaults.status = status;
        self
    }

    /// Set the protocol version responses report.
    pub fn default_version(mut self, version: Version) -> Self {
        self.defaults.version = version;
        self
    }

    /// Add a header that every response starts with.
    ///
    /// Setters that replace the response headers also replace these.
    pub fn default_header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        match HeaderName::try_from(key) {
            Ok(key) => match HeaderValue::try_from(value) {
                Ok(value) => {
                    self.defaults.headers.append(key, value);
                }
                Err(e) => {
                    self.error = Some(e.into().into());
                }
            },
            Err(e) => {
                self.error = Some(e.into().into());
            }
        }
        self
    }

    /// Build a mock with the configured defaults.
    ///
    /// Returns an error if any default header was invalid.
    pub fn build(self) -> Result<Mock, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }

        Ok(Mock::with_defaults(self.defaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    static_assertions::assert_impl_all!(Mock: Send, Sync, Clone);

    fn get() -> Request<Body> {
        Request::get("http://localhost/").body(Body::empty()).unwrap()
    }

    #[test]
    fn pending_interaction_is_added_on_first_call() {
        let mock = Mock::new();
        mock.return_status(StatusCode::CREATED);

        assert_eq!(mock.interactions(), 0);

        let response = mock.round_trip(get()).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(mock.interactions(), 1);
        assert_eq!(mock.requests_received(), 1);
    }

    #[test]
    fn empty_add_returns_default_response() {
        let mock = Mock::new();
        mock.add();

        let response = mock.round_trip(get()).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.version(), Version::HTTP_11);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
        assert!(mock.expectations_met().is_ok());
    }

    #[test]
    #[should_panic(expected = "request #1 (GET http://localhost/) made but only 0 interaction(s)")]
    fn call_without_interactions_panics() {
        let mock = Mock::new();

        let _ = mock.round_trip(get());
    }

    #[test]
    fn mock_is_usable_after_overrun() {
        let mock = Mock::new();
        mock.add();
        mock.round_trip(get()).unwrap();

        let overrun =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.round_trip(get())));

        assert!(overrun.is_err());
        assert_eq!(mock.requests_received(), 1);
        assert!(mock.expectations_met().is_ok());
    }

    #[test]
    fn error_replaces_earlier_error() {
        let mock = Mock::new();
        mock.return_error("first").return_error("second");

        let error = mock.round_trip(get()).unwrap_err();

        assert_eq!(error.to_string(), "simulated transport error: second");
    }

    #[test]
    fn error_skips_setters_and_expectations() {
        let mock = Mock::new();
        mock.expect_method(Method::GET)
            .return_status(StatusCode::OK)
            .return_error("connection reset");

        assert!(mock.round_trip(get()).unwrap_err().is_simulated());

        let error = mock.expectations_met().unwrap_err();
        assert_eq!(error.interaction(), Some(1));
    }

    #[test]
    fn setters_run_in_order() {
        let mock = Mock::new();
        mock.return_status(StatusCode::OK)
            .return_status(StatusCode::NOT_FOUND)
            .return_body("first")
            .return_body("second");

        let mut response = mock.round_trip(get()).unwrap();
        let mut body = String::new();
        response.body_mut().read_to_string(&mut body).unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body, "second");
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"))
        }
    }

    #[test]
    fn unreadable_request_body_still_gets_response() {
        let mock = Mock::new();
        mock.return_status(StatusCode::CREATED);

        let request = Request::post("http://localhost/")
            .body(Body::from_reader(Broken))
            .unwrap();

        assert_eq!(mock.round_trip(request).unwrap().status(), StatusCode::CREATED);
        assert_eq!(mock.requests_received(), 1);
    }

    #[test]
    fn unreadable_request_body_is_checked_as_read_so_far() {
        let mock = Mock::new();
        mock.expect_method(Method::POST).expect_body("hello");

        let request = Request::post("http://localhost/")
            .body(Body::from_reader((&b"hel"[..]).chain(Broken)))
            .unwrap();

        mock.round_trip(request).unwrap();

        assert_eq!(
            mock.expectations_met().unwrap_err().to_string(),
            "error request [1] message: bodies don't match expected [hello] got [hel]"
        );
    }

    #[test]
    fn oversized_declared_length_is_not_trusted() {
        let mock = Mock::new();
        mock.expect_body("");

        let request = Request::post("http://localhost/")
            .body(Body::from_reader_sized(std::io::empty(), u64::MAX))
            .unwrap();

        mock.round_trip(request).unwrap();

        assert!(mock.expectations_met().is_ok());
    }

    #[test]
    fn unconsumed_interaction_is_not_met() {
        let mock = Mock::new();
        mock.expect_method(Method::GET).add().expect_method(Method::POST).add();

        mock.round_trip(get()).unwrap();

        let error = mock.expectations_met().unwrap_err();
        assert_eq!(error.interaction(), Some(2));
        assert_eq!(
            error.to_string(),
            "error request [2] message: expected method POST but no request was received"
        );
    }

    #[test]
    fn builder_defaults() {
        let mock = Mock::builder()
            .default_status(StatusCode::NO_CONTENT)
            .default_version(Version::HTTP_2)
            .default_header("server", "mock")
            .build()
            .unwrap();
        mock.add();

        let response = mock.round_trip(get()).unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.version(), Version::HTTP_2);
        assert_eq!(response.headers()["server"], "mock");
    }

    #[test]
    fn builder_rejects_invalid_header() {
        let result = Mock::builder().default_header("bad header", "value").build();

        assert!(matches!(result, Err(Error::InvalidHttpFormat(_))));
    }
}
