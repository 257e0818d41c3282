use thiserror::Error;

/// Errors surfaced by the deserialization entry points.
///
/// Codec-level failures (escape decoding, number and date-time parsing) are
/// reported as local verdicts inside the engine and never raised directly;
/// only the driver and the syntax layer convert an unrecoverable condition
/// into a `JsonError`.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The input ended before a structurally complete value was formed and no
    /// further input can arrive.
    #[error("unexpected end of JSON input")]
    Truncated,

    /// A character that cannot begin or continue the expected token.
    #[error("invalid character '{character}' at offset {offset}")]
    InvalidCharacter {
        /// The offending scalar, decoded from the input span.
        character: char,
        /// Offset in code units from the start of the overall input.
        offset: usize,
    },

    /// Structurally invalid JSON with a fixed description.
    #[error("syntax error: {0}")]
    Syntax(&'static str),

    /// A string payload on the byte path did not decode as UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// The value cannot be converted to the requested target type. Raised
    /// only when [`JsonOptions::error_on_type_mismatch`] is set; otherwise
    /// the target's default value is substituted.
    ///
    /// [`JsonOptions::error_on_type_mismatch`]: crate::JsonOptions::error_on_type_mismatch
    #[error("value cannot be converted to the requested type")]
    TypeMismatch,

    /// The underlying source failed while the driver was requesting input.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}
