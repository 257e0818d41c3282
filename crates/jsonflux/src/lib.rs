//! A resumable, incremental JSON codec for typed values.
//!
//! The engine deserializes against statically known type models (or into an
//! untyped [`Value`]) directly over byte or character spans, without
//! materializing the whole payload: when a source is a stream, the driver
//! feeds the parser as much contiguous data as is available, and the
//! explicit-stack parse state suspends mid-value and resumes once more
//! input arrives.
//!
//! ```
//! use jsonflux::{Value, from_str};
//!
//! let doc: Value = from_str(r#"{"key": [null, true, 3.14]}"#).unwrap();
//! assert_eq!(doc.get("key").and_then(|k| k.at(2)).and_then(Value::as_f64), Some(3.14));
//! ```
//!
//! Streaming sources go through [`from_reader`] (or [`from_reader_async`]
//! with the `async` feature); input arriving in arbitrarily small chunks
//! produces identical results to parsing the document whole.

mod convert;
mod cursor;
mod datetime;
mod de;
mod error;
mod escape;
mod graph;
mod literal;
mod number;
mod options;
mod pool;
mod state;
mod string;
mod unit;
mod value;

#[cfg(test)]
mod tests;

pub use convert::{FromJson, JsonObjectShape, MemberOutcome, read_enum, read_object};
pub use cursor::SpanCursor;
pub use datetime::{
    DateTime, TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_MINUTE, TICKS_PER_SECOND, is_leap_year,
};
pub use de::{
    from_chars, from_chars_with, from_reader, from_reader_with, from_slice, from_slice_with,
    from_str, from_str_with,
};
#[cfg(feature = "async")]
pub use de::{from_reader_async, from_reader_async_with};
pub use error::JsonError;
pub use escape::{EscapeFraming, escape_bytes, escape_string};
pub use graph::MemberGraph;
pub use options::JsonOptions;
pub use state::ReadState;
pub use unit::{CodeUnit, Scratch};
pub use value::{Array, Map, Value};
