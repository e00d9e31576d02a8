//! Provides the body type shared by mocked requests and responses.

use std::{
    borrow::Cow,
    fmt,
    io::{self, Cursor, Read},
};

/// Contains the body of a mocked HTTP request or response.
///
/// A body is either absent, a region of memory, or an arbitrary reader. Bodies
/// can be created from many types using the [`Into`] trait.
pub struct Body(Repr);

enum Repr {
    Empty,
    Buffer(Cursor<Cow<'static, [u8]>>),
    Reader(Box<dyn Read + Send + Sync>, Option<u64>),
}

impl Body {
    /// Create a new empty body.
    ///
    /// An empty body represents the *absence* of a body, which is semantically
    /// different than the presence of a body of zero length.
    pub const fn empty() -> Self {
        Self(Repr::Empty)
    }

    /// Create a new body from a static byte buffer without copying it.
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self(Repr::Buffer(Cursor::new(Cow::Borrowed(bytes))))
    }

    /// Create a streaming body that reads from the given reader.
    ///
    /// The body will have an unknown length.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + Sync + 'static,
    {
        Self(Repr::Reader(Box::new(reader), None))
    }

    /// Create a streaming body with a known length.
    pub fn from_reader_sized<R>(reader: R, length: u64) -> Self
    where
        R: Read + Send + Sync + 'static,
    {
        Self(Repr::Reader(Box::new(reader), Some(length)))
    }

    /// Report if this body is empty.
    ///
    /// This only returns `true` for the absence of a body, not for a body of
    /// zero length.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Repr::Empty)
    }

    /// Get the size of the body, if known.
    pub fn len(&self) -> Option<u64> {
        match &self.0 {
            Repr::Empty => Some(0),
            Repr::Buffer(bytes) => Some(bytes.get_ref().len() as u64),
            Repr::Reader(_, len) => *len,
        }
    }

    /// If this body is repeatable, reset the body stream back to the start of
    /// the content. Returns `false` if the body cannot be reset.
    pub fn reset(&mut self) -> bool {
        match &mut self.0 {
            Repr::Empty => true,
            Repr::Buffer(cursor) => {
                cursor.set_position(0);
                true
            }
            Repr::Reader(_, _) => false,
        }
    }

    /// Read the remainder of the body into memory.
    ///
    /// A read error ends the body early. Whatever was read before the error is
    /// kept.
    pub(crate) fn read_to_vec(&mut self) -> Vec<u8> {
        let mut buf = Vec::new();

        if let Err(e) = self.read_to_end(&mut buf) {
            tracing::debug!("body ended early after {} bytes: {}", buf.len(), e);
        }

        buf
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.0 {
            Repr::Empty => Ok(0),
            Repr::Buffer(cursor) => cursor.read(buf),
            Repr::Reader(reader, _) => reader.read(buf),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for Body {
    fn from(body: Vec<u8>) -> Self {
        Self(Repr::Buffer(Cursor::new(Cow::Owned(body))))
    }
}

impl From<&'_ [u8]> for Body {
    fn from(body: &[u8]) -> Self {
        body.to_vec().into()
    }
}

impl From<String> for Body {
    fn from(body: String) -> Self {
        body.into_bytes().into()
    }
}

impl From<&'_ str> for Body {
    fn from(body: &str) -> Self {
        body.as_bytes().into()
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        match body {
            Some(body) => body.into(),
            None => Self::empty(),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            Some(len) => write!(f, "Body({})", len),
            None => write!(f, "Body(?)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Body: Send, Sync);

    #[test]
    fn empty_body() {
        let body = Body::empty();

        assert!(body.is_empty());
        assert_eq!(body.len(), Some(0));
    }

    #[test]
    fn zero_length_body() {
        let body = Body::from(vec![]);

        assert!(!body.is_empty());
        assert_eq!(body.len(), Some(0));
    }

    #[test]
    fn reader_with_unknown_length() {
        let body = Body::from_reader(io::empty());

        assert!(!body.is_empty());
        assert_eq!(body.len(), None);
    }

    #[test]
    fn reader_with_known_length() {
        let body = Body::from_reader_sized(io::empty(), 42);

        assert_eq!(body.len(), Some(42));
    }

    #[test]
    fn buffer_can_be_reset() {
        let mut body = Body::from("hello world");

        assert_eq!(body.read_to_vec(), b"hello world");
        assert!(body.reset());
        assert_eq!(body.read_to_vec(), b"hello world");
    }

    #[test]
    fn declared_length_is_not_trusted() {
        let mut body = Body::from_reader_sized(&b"short"[..], u64::MAX);

        assert_eq!(body.read_to_vec(), b"short");
    }

    #[test]
    fn read_error_keeps_bytes_read_so_far() {
        let mut body = Body::from_reader((&b"partial"[..]).chain(Failing));

        assert_eq!(body.read_to_vec(), b"partial");
    }

    #[test]
    fn read_error_on_first_read_gives_empty_vec() {
        let mut body = Body::from_reader(Failing);

        assert!(body.read_to_vec().is_empty());
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken pipe"))
        }
    }

    #[test]
    fn reader_cannot_be_reset() {
        let mut body = Body::from_reader(io::empty());

        assert!(!body.reset());
    }
}
