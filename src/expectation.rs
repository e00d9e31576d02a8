//! Checks run against intercepted requests.
//!
//! An expectation is handed the real request when its interaction is
//! consumed. It never fails the call itself; instead it records whether it
//! was met along with a diagnostic message, which
//! [`Mock::expectations_met`](crate::Mock::expectations_met) reports later.

use http::{HeaderMap, Method, Request};
use std::{borrow::Cow, fmt};

/// A check for the request that will be made.
///
/// The request body has already been read into memory when `check` is called,
/// so expectations may inspect it freely.
pub trait Expectation: Send {
    /// Validate the incoming request, recording the outcome.
    fn check(&mut self, request: &Request<Vec<u8>>);

    /// Whether the check has run and passed.
    fn is_met(&self) -> bool;

    /// The diagnostic reported if the expectation was not met.
    fn message(&self) -> String;
}

impl<E: Expectation + ?Sized> Expectation for Box<E> {
    fn check(&mut self, request: &Request<Vec<u8>>) {
        (**self).check(request)
    }

    fn is_met(&self) -> bool {
        (**self).is_met()
    }

    fn message(&self) -> String {
        (**self).message()
    }
}

/// Result of running a built-in check.
#[derive(Debug)]
enum Outcome {
    Unchecked,
    Met(String),
    Failed(String),
}

impl Outcome {
    fn record(&mut self, met: bool, message: String) {
        *self = if met {
            Outcome::Met(message)
        } else {
            Outcome::Failed(message)
        };
    }

    fn is_met(&self) -> bool {
        matches!(self, Outcome::Met(_))
    }

    fn message(&self, expected: impl fmt::Display) -> String {
        match self {
            Outcome::Unchecked => format!("expected {} but no request was received", expected),
            Outcome::Met(msg) | Outcome::Failed(msg) => msg.clone(),
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Unchecked
    }
}

/// Verifies that the request method matches the expected method.
#[derive(Debug)]
pub struct ExpectedMethod {
    method: Method,
    outcome: Outcome,
}

impl ExpectedMethod {
    /// Expect requests to use the given method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            outcome: Outcome::default(),
        }
    }
}

impl Expectation for ExpectedMethod {
    fn check(&mut self, request: &Request<Vec<u8>>) {
        self.outcome.record(
            request.method() == self.method,
            format!("expected method {} got {}", self.method, request.method()),
        );
    }

    fn is_met(&self) -> bool {
        self.outcome.is_met()
    }

    fn message(&self) -> String {
        self.outcome.message(format_args!("method {}", self.method))
    }
}

/// Verifies that the request body matches the expected bytes exactly.
#[derive(Debug)]
pub struct ExpectedBody {
    body: Vec<u8>,
    outcome: Outcome,
}

impl ExpectedBody {
    /// Expect request bodies to equal the given bytes.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            outcome: Outcome::default(),
        }
    }
}

impl Expectation for ExpectedBody {
    fn check(&mut self, request: &Request<Vec<u8>>) {
        self.outcome.record(
            request.body() == &self.body,
            format!(
                "bodies don't match expected [{}] got [{}]",
                String::from_utf8_lossy(&self.body),
                String::from_utf8_lossy(request.body()),
            ),
        );
    }

    fn is_met(&self) -> bool {
        self.outcome.is_met()
    }

    fn message(&self) -> String {
        self.outcome
            .message(format_args!("body [{}]", String::from_utf8_lossy(&self.body)))
    }
}

/// Verifies that every expected header value is present on the request.
///
/// Header names are matched case-insensitively. A request may carry
/// additional headers or additional values for an expected header.
#[derive(Debug)]
pub struct ExpectedHeader {
    headers: HeaderMap,
    outcome: Outcome,
}

impl ExpectedHeader {
    /// Expect requests to carry every value in the given header map.
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            outcome: Outcome::default(),
        }
    }
}

impl Expectation for ExpectedHeader {
    fn check(&mut self, request: &Request<Vec<u8>>) {
        let missing = self.headers.iter().find(|(name, value)| {
            !request
                .headers()
                .get_all(*name)
                .iter()
                .any(|actual| actual == *value)
        });

        match missing {
            Some((name, value)) => {
                let actual = request.headers().get_all(name).iter().collect::<Vec<_>>();
                let message = format!("expected header {}: {:?} got {:?}", name, value, actual);

                self.outcome.record(false, message);
            }
            None => self
                .outcome
                .record(true, format!("expected headers {:?} present", self.headers)),
        }
    }

    fn is_met(&self) -> bool {
        self.outcome.is_met()
    }

    fn message(&self) -> String {
        self.outcome.message(format_args!("headers {:?}", self.headers))
    }
}

/// An expectation defined by an arbitrary predicate over the request.
pub struct ExpectFn<F> {
    description: Cow<'static, str>,
    predicate: F,
    outcome: Outcome,
}

impl<F> ExpectFn<F>
where
    F: Fn(&Request<Vec<u8>>) -> bool + Send,
{
    /// Create a custom expectation. The description is used in the
    /// diagnostic when the predicate returns `false`.
    pub fn new(description: impl Into<Cow<'static, str>>, predicate: F) -> Self {
        Self {
            description: description.into(),
            predicate,
            outcome: Outcome::default(),
        }
    }
}

impl<F> Expectation for ExpectFn<F>
where
    F: Fn(&Request<Vec<u8>>) -> bool + Send,
{
    fn check(&mut self, request: &Request<Vec<u8>>) {
        let met = (self.predicate)(request);

        self.outcome.record(
            met,
            format!(
                "expected {} for {} {}",
                self.description,
                request.method(),
                request.uri()
            ),
        );
    }

    fn is_met(&self) -> bool {
        self.outcome.is_met()
    }

    fn message(&self) -> String {
        self.outcome.message(&self.description)
    }
}

impl<F> fmt::Debug for ExpectFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectFn")
            .field("description", &self.description)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Verifies that the request body is JSON equal to the expected value.
///
/// Formatting and key order are ignored.
#[cfg(feature = "json")]
#[derive(Debug)]
pub struct ExpectedJson {
    value: serde_json::Value,
    outcome: Outcome,
}

#[cfg(feature = "json")]
impl ExpectedJson {
    /// Expect request bodies to parse as JSON equal to the given value.
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            outcome: Outcome::default(),
        }
    }
}

#[cfg(feature = "json")]
impl Expectation for ExpectedJson {
    fn check(&mut self, request: &Request<Vec<u8>>) {
        match serde_json::from_slice::<serde_json::Value>(request.body()) {
            Ok(actual) => self.outcome.record(
                actual == self.value,
                format!("expected JSON body {} got {}", self.value, actual),
            ),
            Err(e) => self.outcome.record(
                false,
                format!("expected JSON body {} but body is not JSON: {}", self.value, e),
            ),
        }
    }

    fn is_met(&self) -> bool {
        self.outcome.is_met()
    }

    fn message(&self) -> String {
        self.outcome.message(format_args!("JSON body {}", self.value))
    }
}
