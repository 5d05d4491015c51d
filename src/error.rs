//! Purpose: Shared error type for fetch and decode operations.
//! Exports: `Error`, `ErrorKind`, `Result`.
//! Role: One tagged error so callers branch on `kind()` instead of message text.
//! Invariants: Status errors keep the buffered response body for inspection.
//! Invariants: Excerpts are stored as raw bytes and rendered lossily.

use bstr::ByteSlice;
use bytes::Bytes;
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Request could not be sent or no response was received.
    Transport,
    /// Response arrived with a status outside the accepted set.
    Status,
    /// Draining the response body failed.
    Read,
    /// Malformed JSON.
    Syntax,
    /// JSON value does not fit the target type.
    Type,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    url: Option<String>,
    status: Option<u16>,
    body: Option<Bytes>,
    offset: Option<usize>,
    excerpt: Option<Vec<u8>>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            url: None,
            status: None,
            body: None,
            offset: None,
            excerpt: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Body of an unsuccessful response, when one was read.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn into_body(self) -> Option<Bytes> {
        self.body
    }

    /// Byte offset reported by the decoder, counted as bytes consumed.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn excerpt(&self) -> Option<&[u8]> {
        self.excerpt.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<Vec<u8>>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(url) = &self.url {
            write!(f, " (url: {url})")?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (offset: {offset})")?;
        }
        if let Some(excerpt) = &self.excerpt {
            write!(f, " (excerpt: {:?})", excerpt.as_bstr())?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_attached_context() {
        let err = Error::new(ErrorKind::Status)
            .with_message("request unsuccessful: 404 Not Found")
            .with_url("http://127.0.0.1:1/missing")
            .with_status(404);
        assert_eq!(
            err.to_string(),
            "Status: request unsuccessful: 404 Not Found (url: http://127.0.0.1:1/missing) (status: 404)"
        );
    }

    #[test]
    fn display_renders_invalid_utf8_excerpt_lossily() {
        let err = Error::new(ErrorKind::Syntax)
            .with_offset(2)
            .with_excerpt(vec![b'{', 0xff, b'}']);
        let rendered = err.to_string();
        assert!(rendered.starts_with("Syntax (offset: 2) (excerpt: "));
        assert!(rendered.contains('{'));
    }

    #[test]
    fn body_survives_into_body() {
        let err = Error::new(ErrorKind::Status).with_body(&b"Some text"[..]);
        assert_eq!(err.body(), Some(&b"Some text"[..]));
        assert_eq!(err.into_body().as_deref(), Some(&b"Some text"[..]));
    }
}
