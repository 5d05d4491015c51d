//! Purpose: Blocking HTTP GET/HEAD helpers with JSON decoding of response bodies.
//! Exports: `Fetcher` + free `get`/`get_stream`/`head`, body types, `json` decoders, `Error`.
//! Role: Small stateless library; each call is one independent blocking operation.
//! Invariants: No process-wide state, no internal threads, no logging subscriber installed.
//! Invariants: Decode errors from byte input carry a bounded excerpt of the failing region.
pub mod body;
pub mod error;
pub mod fetch;
pub mod json;

pub use body::{Body, BodyReader, Headers};
pub use error::{Error, ErrorKind, Result};
pub use fetch::{DEFAULT_ACCEPTED_STATUSES, Fetcher, FetcherBuilder, get, get_stream, head};
