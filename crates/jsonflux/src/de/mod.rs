//! Deserialization entry points.
//!
//! Span sources (`&str`, `&[u8]`, `&[char]`) are parsed in a single attempt
//! with finality implied; stream sources go through the incremental driver.
//! Every entry point has a `*_with` variant taking a [`JsonOptions`] and an
//! optional [`MemberGraph`] that prunes which object members are read.
//!
//! Zero-length input yields the target's
//! [`default_value`](crate::FromJson::default_value) — the empty string for
//! string targets, the zero value otherwise — without engaging the parser.

#[cfg(feature = "async")]
mod async_driver;
mod driver;

use std::io::Read;

use crate::convert::FromJson;
use crate::error::JsonError;
use crate::graph::MemberGraph;
use crate::options::JsonOptions;

pub(crate) use driver::DEFAULT_READ_CAPACITY;
pub(crate) use driver::{read_span, read_stream};

/// Deserializes a value from JSON text.
///
/// ```
/// use jsonflux::{Value, from_str};
///
/// let doc: Value = from_str(r#"{"id": 7, "name": "flux"}"#).unwrap();
/// assert_eq!(doc.get("name").and_then(Value::as_str), Some("flux"));
/// let n: i32 = from_str("42").unwrap();
/// assert_eq!(n, 42);
/// ```
///
/// # Errors
///
/// [`JsonError::Truncated`] for structurally incomplete input, syntax
/// errors, and strict-mode type mismatches.
pub fn from_str<T: FromJson>(json: &str) -> Result<T, JsonError> {
    read_span(json.as_bytes(), &JsonOptions::default(), None)
}

/// [`from_str`] with explicit options and an optional shape graph.
///
/// # Errors
///
/// As [`from_str`].
pub fn from_str_with<T: FromJson>(
    json: &str,
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
) -> Result<T, JsonError> {
    read_span(json.as_bytes(), options, graph)
}

/// Deserializes a value from a UTF-8 byte span.
///
/// # Errors
///
/// As [`from_str`].
pub fn from_slice<T: FromJson>(json: &[u8]) -> Result<T, JsonError> {
    read_span(json, &JsonOptions::default(), None)
}

/// [`from_slice`] with explicit options and an optional shape graph.
///
/// # Errors
///
/// As [`from_str`].
pub fn from_slice_with<T: FromJson>(
    json: &[u8],
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
) -> Result<T, JsonError> {
    read_span(json, options, graph)
}

/// Deserializes a value from a character span.
///
/// The character path produces bit-identical results to the byte path for
/// the same textual input.
///
/// # Errors
///
/// As [`from_str`].
pub fn from_chars<T: FromJson>(json: &[char]) -> Result<T, JsonError> {
    read_span(json, &JsonOptions::default(), None)
}

/// [`from_chars`] with explicit options and an optional shape graph.
///
/// # Errors
///
/// As [`from_str`].
pub fn from_chars_with<T: FromJson>(
    json: &[char],
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
) -> Result<T, JsonError> {
    read_span(json, options, graph)
}

/// Deserializes a value from a blocking byte stream.
///
/// The driver fills a pooled buffer, retries the parse as more input
/// arrives, and grows the buffer only when the parser's own estimate
/// demands it; values larger than any initial capacity deserialize
/// identically.
///
/// # Errors
///
/// As [`from_str`], plus [`JsonError::Io`] when the source fails.
pub fn from_reader<T: FromJson, R: Read>(source: R) -> Result<T, JsonError> {
    read_stream(source, &JsonOptions::default(), None, DEFAULT_READ_CAPACITY)
}

/// [`from_reader`] with explicit options and an optional shape graph.
///
/// # Errors
///
/// As [`from_reader`].
pub fn from_reader_with<T: FromJson, R: Read>(
    source: R,
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
) -> Result<T, JsonError> {
    read_stream(source, options, graph, DEFAULT_READ_CAPACITY)
}

/// Deserializes a value from an asynchronous byte stream.
///
/// Identical protocol to [`from_reader`]; only the "request more input"
/// step suspends. Dropping the returned future at that await point cancels
/// the read without corrupting anything: the rented buffer is scrubbed and
/// returned as the future drops.
///
/// # Errors
///
/// As [`from_reader`].
#[cfg(feature = "async")]
pub async fn from_reader_async<T, R>(source: R) -> Result<T, JsonError>
where
    T: FromJson,
    R: tokio::io::AsyncRead + Unpin,
{
    async_driver::read_stream_async(source, &JsonOptions::default(), None, DEFAULT_READ_CAPACITY)
        .await
}

/// [`from_reader_async`] with explicit options and an optional shape graph.
///
/// # Errors
///
/// As [`from_reader`].
#[cfg(feature = "async")]
pub async fn from_reader_async_with<T, R>(
    source: R,
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
) -> Result<T, JsonError>
where
    T: FromJson,
    R: tokio::io::AsyncRead + Unpin,
{
    async_driver::read_stream_async(source, options, graph, DEFAULT_READ_CAPACITY).await
}

/// Stream deserialization with an explicit initial buffer capacity, used by
/// tests to prove growth-and-relocate correctness.
pub(crate) fn from_reader_with_capacity<T: FromJson, R: Read>(
    source: R,
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
    initial_capacity: usize,
) -> Result<T, JsonError> {
    read_stream(source, options, graph, initial_capacity)
}
