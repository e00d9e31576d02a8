//! Scripted HTTP transport mocking for tests.
//!
//! This crate provides a [`Mock`] that stands in for a real HTTP transport.
//! Before exercising the code under test, a test registers what each outgoing
//! request is expected to look like and how the mock should respond to it.
//! Afterwards the test asks the mock whether every expectation was met.
//!
//! Nothing here touches the network. A mock implements [`Transport`], the
//! single seam a [`Client`] sends its requests through, and builds response
//! values directly.
//!
//! # Examples
//!
//! ```
//! use mocktransport::{http::{Method, StatusCode}, prelude::*};
//!
//! let (client, mock) = mocktransport::new();
//!
//! mock.expect_method(Method::GET)
//!     .return_body(r#"{"test":"key"}"#)
//!     .add()
//!     .expect_method(Method::POST)
//!     .expect_body("hello")
//!     .return_status(StatusCode::CREATED)
//!     .add();
//!
//! let mut response = client.get("http://localhost/")?;
//! assert_eq!(response.text()?, r#"{"test":"key"}"#);
//!
//! let response = client.post("http://localhost/", "hello")?;
//! assert_eq!(response.status(), StatusCode::CREATED);
//!
//! mock.expectations_met()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Interactions
//!
//! Each call to [`Mock::add`] closes the current *interaction*: the
//! expectations, setters, and optional simulated error registered since the
//! previous `add`. Requests consume interactions one at a time, in the order
//! they were added. Making more requests than there are interactions is a
//! mistake in the test and causes a panic.
//!
//! # Feature flags
//!
//! ## `json`
//!
//! Enables [`Mock::expect_json`], [`Mock::return_json`] and
//! [`ReadResponseExt::json`] via [serde] and [serde_json].
//!
//! # Logging
//!
//! Interactions and intercepted requests are reported through [tracing]
//! events. Since the `log` feature of tracing is enabled, a `log` logger such
//! as [env_logger] also receives them.
//!
//! [env_logger]: https://docs.rs/env_logger
//! [serde]: https://docs.rs/serde
//! [serde_json]: https://docs.rs/serde_json
//! [tracing]: https://docs.rs/tracing

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, unreachable_pub)]

pub use http;

mod body;
mod client;
mod config;
mod error;
mod mock;
mod response;
mod transport;

pub mod expectation;
pub mod setter;

pub use crate::{
    body::Body,
    client::{new, Client},
    config::ResponseDefaults,
    error::{BoxError, Error},
    mock::{Mock, MockBuilder},
    response::ReadResponseExt,
    transport::Transport,
};

/// A "prelude" for importing commonly used types and traits.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        expectation::Expectation,
        setter::Setter,
        Body,
        Client,
        Mock,
        ReadResponseExt,
        Transport,
    };

    #[doc(no_inline)]
    pub use http::{Request, Response};
}
