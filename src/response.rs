use http::Response;
use std::io::{self, Read, Write};

/// Provides extension methods for consuming mocked response bodies.
pub trait ReadResponseExt<R: Read> {
    /// Copy the response body into a writer.
    ///
    /// Returns the number of bytes that were written.
    fn copy_to<W: Write>(&mut self, writer: W) -> io::Result<u64>;

    /// Read the entire response body into memory.
    fn bytes(&mut self) -> io::Result<Vec<u8>>;

    /// Read the response body as a UTF-8 string.
    fn text(&mut self) -> io::Result<String>;

    /// Deserialize the response body as JSON into a given type.
    ///
    /// # Availability
    ///
    /// This method is only available when the [`json`](index.html#json) feature
    /// is enabled.
    #[cfg(feature = "json")]
    fn json<T>(&mut self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned;
}

impl<R: Read> ReadResponseExt<R> for Response<R> {
    fn copy_to<W: Write>(&mut self, mut writer: W) -> io::Result<u64> {
        io::copy(self.body_mut(), &mut writer)
    }

    fn bytes(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();

        self.copy_to(&mut buf)?;

        Ok(buf)
    }

    fn text(&mut self) -> io::Result<String> {
        let mut text = String::new();

        self.body_mut().read_to_string(&mut text)?;

        Ok(text)
    }

    #[cfg(feature = "json")]
    fn json<D>(&mut self) -> Result<D, serde_json::Error>
    where
        D: serde::de::DeserializeOwned,
    {
        serde_json::from_reader(self.body_mut())
    }
}
