//! Types for error handling.

use std::{error::Error as StdError, fmt};

/// A boxed error returned in place of a response when a failure is simulated.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// All possible types of errors that can be returned by a mock transport.
#[derive(Debug)]
pub enum Error {
    /// A transport failure registered with
    /// [`Mock::return_error`](crate::Mock::return_error), returned instead of
    /// a response.
    Simulated(BoxError),
    /// Validation error when constructing a request or configuring a mock.
    InvalidHttpFormat(http::Error),
    /// An expectation registered on an interaction was not met.
    ExpectationNotMet {
        /// The 1-based position of the interaction the expectation belongs to.
        interaction: usize,
        /// The diagnostic produced by the expectation.
        message: String,
    },
}

impl Error {
    /// Create a simulated transport error from any error or message.
    pub fn simulated<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Simulated(error.into())
    }

    /// Returns true if this error was registered as a simulated failure.
    pub fn is_simulated(&self) -> bool {
        matches!(self, Error::Simulated(_))
    }

    /// Returns the position of the interaction an unmet expectation belongs
    /// to, if this is an expectation failure.
    pub fn interaction(&self) -> Option<usize> {
        match self {
            Error::ExpectationNotMet { interaction, .. } => Some(*interaction),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Simulated(e) => write!(f, "simulated transport error: {}", e),
            Error::InvalidHttpFormat(e) => write!(f, "invalid HTTP format: {}", e),
            Error::ExpectationNotMet { interaction, message } => {
                write!(f, "error request [{}] message: {}", interaction, message)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Simulated(e) => Some(&**e),
            Error::InvalidHttpFormat(e) => Some(e),
            Error::ExpectationNotMet { .. } => None,
        }
    }
}

#[doc(hidden)]
impl From<http::Error> for Error {
    fn from(error: http::Error) -> Error {
        Error::InvalidHttpFormat(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    static_assertions::assert_impl_all!(Error: Send, Sync);

    #[test]
    fn simulated_error_keeps_source() {
        let error = Error::simulated(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));

        assert!(error.is_simulated());
        assert_eq!(error.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn simulated_error_from_message() {
        let error = Error::simulated("boom");

        assert_eq!(error.to_string(), "simulated transport error: boom");
    }

    #[test]
    fn unmet_expectation_names_interaction() {
        let error = Error::ExpectationNotMet {
            interaction: 2,
            message: "expected method POST got HEAD".into(),
        };

        assert_eq!(error.interaction(), Some(2));
        assert_eq!(
            error.to_string(),
            "error request [2] message: expected method POST got HEAD"
        );
    }
}
