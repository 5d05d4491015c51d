//! Purpose: Response payload types returned by the fetcher.
//! Exports: `Body`, `BodyReader`, `Headers`.
//! Role: Own the response body either fully buffered or as a scoped stream.
//! Invariants: A `BodyReader` releases its connection exactly once (close or drop).
//! Invariants: Header lookup is case-insensitive; values keep arrival order.

use crate::error::{Error, ErrorKind, Result};
use crate::json;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufReader, Read};
use std::str::Utf8Error;

/// Fully buffered response body. The connection is already released.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Body {
    bytes: Bytes,
}

impl Body {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Body as UTF-8 text. Decoding is separate from reading, so the
    /// failure is the raw `Utf8Error` rather than a crate `Error`.
    pub fn text(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    /// Decodes the body as JSON; failures carry an input excerpt.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        json::from_slice(&self.bytes)
    }
}

impl AsRef<[u8]> for Body {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Streaming response body.
pub struct BodyReader {
    reader: Option<BufReader<Box<dyn Read + Send + Sync>>>,
}

impl BodyReader {
    pub(crate) fn new(reader: Box<dyn Read + Send + Sync>) -> Self {
        Self {
            reader: Some(BufReader::new(reader)),
        }
    }

    /// Drains the rest of the stream into a buffered `Body` and releases it.
    pub fn into_body(mut self) -> Result<Body> {
        let mut out = Vec::new();
        self.read_to_end(&mut out).map_err(|err| {
            Error::new(ErrorKind::Read)
                .with_message("error reading body")
                .with_source(err)
        })?;
        self.close();
        Ok(Body::new(out))
    }

    /// Decodes the stream as JSON and releases it. Errors carry no excerpt.
    pub fn json<T: DeserializeOwned>(mut self) -> Result<T> {
        let Some(reader) = self.reader.take() else {
            return Err(Error::new(ErrorKind::Read).with_message("body already closed"));
        };
        json::from_reader(reader)
    }

    /// Releases the underlying connection. Later calls and reads are no-ops.
    pub fn close(&mut self) {
        self.reader = None;
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl fmt::Debug for BodyReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyReader")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Response headers keyed by lowercased name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Headers {
    entries: BTreeMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// All values for `name`, matched case-insensitively.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Body, BodyReader, Headers};
    use std::io::{Cursor, Read};

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.append("content-type", "text");
        assert_eq!(headers.get("Content-Type"), Some("text"));
        assert_eq!(
            headers.get_all("CONTENT-TYPE"),
            Some(&["text".to_string()][..])
        );
        assert!(headers.contains("Content-type"));
    }

    #[test]
    fn repeated_headers_keep_order() {
        let mut headers = Headers::new();
        headers.append("Vary", "Accept");
        headers.append("vary", "Origin");
        assert_eq!(
            headers.get_all("vary"),
            Some(&["Accept".to_string(), "Origin".to_string()][..])
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        let body = Body::new(vec![0xff, 0xfe]);
        let err = body.text().unwrap_err();
        assert_eq!(err.valid_up_to(), 0);
        assert_eq!(Body::new(&b"Some text"[..]).text().unwrap(), "Some text");
    }

    #[test]
    fn closed_reader_reads_as_eof() {
        let mut reader = BodyReader::new(Box::new(Cursor::new(b"abc".to_vec())));
        reader.close();
        reader.close();
        assert!(reader.is_closed());
        let mut out = Vec::new();
        assert_eq!(reader.read_to_end(&mut out).unwrap(), 0);
    }

    #[test]
    fn reader_drains_into_body() {
        let reader = BodyReader::new(Box::new(Cursor::new(b"Some text".to_vec())));
        let body = reader.into_body().unwrap();
        assert_eq!(body.as_bytes(), b"Some text");
    }

    #[test]
    fn reader_json_decodes_stream() {
        let reader = BodyReader::new(Box::new(Cursor::new(br#"{"n": 3}"#.to_vec())));
        let value: serde_json::Value = reader.json().unwrap();
        assert_eq!(value["n"], 3);
    }
}
