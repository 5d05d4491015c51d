//! Purpose: JSON decode boundary for response bodies.
//! Exports: `from_slice`, `decode_into`, `from_reader`, `classify`.
//! Role: Single seam for serde_json usage so error mapping stays in one place.
//! Invariants: Errors are classified by decoder category, never by message text.
//! Invariants: Only byte-slice decoding attaches an excerpt; stream decoding cannot.

mod decode;
mod excerpt;

pub use decode::{classify, decode_into, from_reader, from_slice};
pub use excerpt::EXCERPT_LEN;
