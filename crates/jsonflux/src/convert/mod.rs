//! Converter dispatch.
//!
//! Types that can be produced from JSON implement [`FromJson`]; known types
//! resolve statically through their generic implementations, while the
//! untyped entry points go through the same trait on
//! [`Value`](crate::Value). Converters follow one shared contract:
//!
//! - `Ok(Some(value))` — success; the cursor advanced over exactly what was
//!   validly consumed.
//! - `Ok(None)` — the span ran out mid-value; the state's needed counter
//!   holds a precise minimum of additional units, and every suspended level
//!   parked its frame for resumption.
//! - `Err(_)` — unrecoverable for this call.

mod collections;
mod enums;
mod object;
mod scalars;
mod value;

pub use enums::read_enum;
pub use object::{JsonObjectShape, MemberOutcome, read_object};

use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::state::ReadState;
use crate::unit::CodeUnit;
use crate::value::Value;

/// A type deserializable from JSON through the resumable engine.
///
/// Implementations are provided for scalars, strings,
/// [`DateTime`](crate::DateTime), `Option`, `Vec`, string-keyed maps and the
/// untyped [`Value`]. Hand-written object shapes implement this by
/// delegating to [`read_object`], enums by delegating to [`read_enum`].
pub trait FromJson: Sized + 'static {
    /// The value used for zero-length input, and for a JSON `null` read
    /// into a non-optional target: the empty string for strings, the zero
    /// value otherwise.
    fn default_value() -> Self;

    /// Attempts to produce a value from the span.
    ///
    /// See the [module documentation](self) for the verdict contract.
    ///
    /// # Errors
    ///
    /// Syntax errors, strict-mode type mismatches, and invalid UTF-8 string
    /// payloads.
    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError>;
}

/// Builds the invalid-character diagnostic for the cursor's position.
pub(crate) fn invalid_character<U: CodeUnit>(
    cursor: &SpanCursor<'_, U>,
    state: &ReadState<U>,
) -> JsonError {
    JsonError::InvalidCharacter {
        character: cursor.scalar_here(),
        offset: state.base_offset + cursor.position(),
    }
}

/// Skips whitespace and peeks the unit that starts the next token.
///
/// `None` means the span ran out; the needed counter is already set and the
/// caller should park and suspend.
pub(crate) fn seek_token<U: CodeUnit>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
) -> Option<U> {
    cursor.skip_whitespace();
    match cursor.peek() {
        Some(unit) => Some(unit),
        None => {
            state.need(1);
            None
        }
    }
}

/// Consumes and discards one complete value, resumably.
///
/// Used for mismatched values in lenient mode and for pruned or unknown
/// object members.
pub(crate) fn drain_value<U: CodeUnit>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
) -> Result<Option<()>, JsonError> {
    Ok(Value::try_read(cursor, state)?.map(|_| ()))
}

/// The outcome for a mismatched value whose input is already consumed:
/// strict mode raises, lenient mode substitutes the default.
pub(crate) fn mismatch_consumed<T: FromJson, U: CodeUnit>(
    state: &ReadState<U>,
) -> Result<Option<T>, JsonError> {
    if state.error_on_type_mismatch {
        Err(JsonError::TypeMismatch)
    } else {
        Ok(Some(T::default_value()))
    }
}
