//! Configuration of the baseline response a mock starts from.

use crate::Body;
use http::{HeaderMap, Response, StatusCode, Version};

/// The response every interaction starts from before its setters are
/// applied.
///
/// The defaults are a `200 OK` over HTTP/1.1 with no headers and an empty
/// body.
#[derive(Clone, Debug)]
pub struct ResponseDefaults {
    pub(crate) status: StatusCode,
    pub(crate) version: Version,
    pub(crate) headers: HeaderMap,
}

impl ResponseDefaults {
    /// Build a fresh response draft from these defaults.
    pub(crate) fn draft(&self) -> Response<Body> {
        let mut response = Response::new(Body::empty());

        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers.clone();

        response
    }

    /// The status code responses start with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The protocol version responses report.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The headers responses start with.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl Default for ResponseDefaults {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft() {
        let response = ResponseDefaults::default().draft();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.version(), Version::HTTP_11);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }
}
