//! Purpose: Decode a single JSON document into a caller-chosen type.
//! Exports: `from_slice`, `decode_into`, `from_reader`, `classify`.
//! Role: Wraps serde_json and maps its failures onto crate `ErrorKind`s.
//! Invariants: `decode_into` only writes the target after a complete decode.
//! Invariants: Syntax/type errors from byte input carry offset + excerpt when positioned.
//! Notes: Stream input has no retained bytes, so its errors stay unannotated.

use super::excerpt::{byte_offset, syntax_window, type_window};
use crate::error::{Error, ErrorKind, Result};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::io::Read;

/// Maps a serde_json failure onto the crate taxonomy by its reported category.
pub fn classify(err: &serde_json::Error) -> ErrorKind {
    match err.classify() {
        Category::Syntax | Category::Eof => ErrorKind::Syntax,
        Category::Data => ErrorKind::Type,
        Category::Io => ErrorKind::Read,
    }
}

pub fn from_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    serde_json::from_slice(data).map_err(|err| annotate(data, err))
}

/// Decodes `data` into `target`. On failure `target` is left untouched.
pub fn decode_into<T: DeserializeOwned>(data: &[u8], target: &mut T) -> Result<()> {
    *target = from_slice(data)?;
    Ok(())
}

pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    serde_json::from_reader(reader).map_err(|err| {
        let kind = classify(&err);
        tracing::trace!(?kind, "json stream decode failed");
        Error::new(kind)
            .with_message(err.to_string())
            .with_source(err)
    })
}

fn annotate(data: &[u8], err: serde_json::Error) -> Error {
    let kind = classify(&err);
    let mut annotated = Error::new(kind).with_message(err.to_string());
    if let Some(offset) = byte_offset(data, err.line(), err.column()) {
        let window = match kind {
            ErrorKind::Syntax => Some(syntax_window(data, offset)),
            ErrorKind::Type => Some(type_window(data, offset)),
            ErrorKind::Transport | ErrorKind::Status | ErrorKind::Read => None,
        };
        if let Some(window) = window {
            annotated = annotated.with_offset(offset).with_excerpt(window);
        }
    }
    tracing::trace!(?kind, offset = ?annotated.offset(), "json decode failed");
    annotated.with_source(err)
}
