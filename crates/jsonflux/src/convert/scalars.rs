//! Scalar converters: booleans, integers, floats, strings, date-times and
//! optional values.
//!
//! Scalars share one dispatch shape: a bare literal is consumed through the
//! resumable token machinery, a quoted literal goes through a
//! string-to-type frame and converts after the text completes, `null`
//! yields the target's default, and a structurally different value is
//! drained or raised per the mismatch policy.

use crate::convert::{
    FromJson, drain_value, invalid_character, mismatch_consumed, seek_token,
};
use crate::cursor::SpanCursor;
use crate::datetime::DateTime;
use crate::error::JsonError;
use crate::literal::{LiteralKind, LiteralMatcher, LiteralStep};
use crate::number::{NumberAcc, NumberOutcome, NumberStage, read_number};
use crate::state::{Frame, ReadState};
use crate::string::{StringProgress, StringStep, read_string_body};
use crate::unit::CodeUnit;

/// Runs a freestanding numeric parse over the text of a quoted literal.
fn parse_quoted_number(text: &str, acc: &mut NumberAcc) -> bool {
    acc.reset();
    let mut stage = NumberStage::default();
    let mut cursor = SpanCursor::new(text.as_bytes());
    matches!(
        read_number(&mut cursor, acc, true, &mut stage),
        NumberOutcome::Finished
    ) && cursor.at_end()
}

/// Shared reader for numeric targets.
fn read_number_scalar<T, U>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
    extract: impl Fn(&NumberAcc) -> Option<T>,
) -> Result<Option<T>, JsonError>
where
    T: FromJson,
    U: CodeUnit,
{
    let mut frame = state.begin(Frame::Value { draining: false });
    loop {
        frame = match frame {
            Frame::Value { draining: false } => {
                let Some(unit) = seek_token(cursor, state) else {
                    state.park(Frame::Value { draining: false });
                    return Ok(None);
                };
                match unit.as_ascii() {
                    Some(b'-' | b'0'..=b'9') => {
                        state.begin_number();
                        Frame::LiteralNumber {
                            stage: NumberStage::default(),
                        }
                    }
                    Some(b'"') => {
                        cursor.bump();
                        Frame::StringToType {
                            progress: StringProgress::opened(),
                        }
                    }
                    Some(b'n') => {
                        cursor.bump();
                        Frame::Literal {
                            matcher: null_matcher(),
                        }
                    }
                    Some(b't' | b'f' | b'{' | b'[') => {
                        if state.error_on_type_mismatch {
                            return Err(JsonError::TypeMismatch);
                        }
                        Frame::Value { draining: true }
                    }
                    _ => return Err(invalid_character(cursor, state)),
                }
            }
            Frame::Value { draining: true } => match drain_value(cursor, state)? {
                Some(()) => {
                    state.complete();
                    return Ok(Some(T::default_value()));
                }
                None => {
                    state.park(Frame::Value { draining: true });
                    return Ok(None);
                }
            },
            Frame::LiteralNumber { mut stage } => {
                let is_final = state.is_final_block;
                match read_number(cursor, &mut state.number, is_final, &mut stage) {
                    NumberOutcome::Finished => {
                        let value = extract(&state.number);
                        state.complete();
                        return match value {
                            Some(value) => Ok(Some(value)),
                            None => mismatch_consumed(state),
                        };
                    }
                    NumberOutcome::Malformed => {
                        state.complete();
                        return mismatch_consumed(state);
                    }
                    NumberOutcome::Need(units) => {
                        state.need(units);
                        state.park(Frame::LiteralNumber { stage });
                        return Ok(None);
                    }
                }
            }
            Frame::StringToType { mut progress } => {
                let base = state.base_offset;
                match read_string_body(cursor, &mut progress, base)? {
                    StringStep::Done(text) => {
                        state.complete();
                        let value = if parse_quoted_number(&text, &mut state.number) {
                            extract(&state.number)
                        } else {
                            None
                        };
                        return match value {
                            Some(value) => Ok(Some(value)),
                            None => mismatch_consumed(state),
                        };
                    }
                    StringStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::StringToType { progress });
                        return Ok(None);
                    }
                }
            }
            Frame::Literal { mut matcher } => match matcher.read(cursor) {
                LiteralStep::Done(_) => {
                    state.complete();
                    return Ok(Some(T::default_value()));
                }
                LiteralStep::Need(units) => {
                    state.need(units);
                    state.park(Frame::Literal { matcher });
                    return Ok(None);
                }
                LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
            },
            _ => return Err(JsonError::Syntax("corrupt scalar parse state")),
        };
    }
}

fn null_matcher() -> LiteralMatcher {
    LiteralMatcher::null()
}

macro_rules! signed_from_json {
    ($($ty:ty),* $(,)?) => {$(
        impl FromJson for $ty {
            fn default_value() -> Self {
                0
            }

            fn try_read<U: CodeUnit>(
                cursor: &mut SpanCursor<'_, U>,
                state: &mut ReadState<U>,
            ) -> Result<Option<Self>, JsonError> {
                read_number_scalar(cursor, state, |acc| {
                    acc.as_i64().and_then(|v| Self::try_from(v).ok())
                })
            }
        }
    )*};
}

macro_rules! unsigned_from_json {
    ($($ty:ty),* $(,)?) => {$(
        impl FromJson for $ty {
            fn default_value() -> Self {
                0
            }

            fn try_read<U: CodeUnit>(
                cursor: &mut SpanCursor<'_, U>,
                state: &mut ReadState<U>,
            ) -> Result<Option<Self>, JsonError> {
                read_number_scalar(cursor, state, |acc| {
                    acc.as_u64().and_then(|v| Self::try_from(v).ok())
                })
            }
        }
    )*};
}

signed_from_json!(i8, i16, i32, i64, isize);
unsigned_from_json!(u8, u16, u32, u64, usize);

impl FromJson for f64 {
    fn default_value() -> Self {
        0.0
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        read_number_scalar(cursor, state, |acc| Some(acc.as_f64()))
    }
}

impl FromJson for f32 {
    fn default_value() -> Self {
        0.0
    }

    #[allow(clippy::cast_possible_truncation)]
    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        read_number_scalar(cursor, state, |acc| Some(acc.as_f64() as f32))
    }
}

impl FromJson for bool {
    fn default_value() -> Self {
        false
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        let mut frame = state.begin(Frame::Value { draining: false });
        loop {
            frame = match frame {
                Frame::Value { draining: false } => {
                    let Some(unit) = seek_token(cursor, state) else {
                        state.park(Frame::Value { draining: false });
                        return Ok(None);
                    };
                    match unit.as_ascii() {
                        Some(first @ (b't' | b'f' | b'n')) => {
                            let Some(matcher) = LiteralMatcher::begin(first) else {
                                return Err(invalid_character(cursor, state));
                            };
                            cursor.bump();
                            Frame::Literal { matcher }
                        }
                        Some(b'"') => {
                            cursor.bump();
                            Frame::StringToType {
                                progress: StringProgress::opened(),
                            }
                        }
                        Some(b'-' | b'0'..=b'9' | b'{' | b'[') => {
                            if state.error_on_type_mismatch {
                                return Err(JsonError::TypeMismatch);
                            }
                            Frame::Value { draining: true }
                        }
                        _ => return Err(invalid_character(cursor, state)),
                    }
                }
                Frame::Value { draining: true } => match drain_value(cursor, state)? {
                    Some(()) => {
                        state.complete();
                        return Ok(Some(false));
                    }
                    None => {
                        state.park(Frame::Value { draining: true });
                        return Ok(None);
                    }
                },
                Frame::Literal { mut matcher } => match matcher.read(cursor) {
                    LiteralStep::Done(kind) => {
                        state.complete();
                        return Ok(Some(matches!(kind, LiteralKind::True)));
                    }
                    LiteralStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::Literal { matcher });
                        return Ok(None);
                    }
                    LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
                },
                Frame::StringToType { mut progress } => {
                    let base = state.base_offset;
                    match read_string_body(cursor, &mut progress, base)? {
                        StringStep::Done(text) => {
                            state.complete();
                            return match text.as_str() {
                                "true" => Ok(Some(true)),
                                "false" => Ok(Some(false)),
                                _ => mismatch_consumed(state),
                            };
                        }
                        StringStep::Need(units) => {
                            state.need(units);
                            state.park(Frame::StringToType { progress });
                            return Ok(None);
                        }
                    }
                }
                _ => return Err(JsonError::Syntax("corrupt scalar parse state")),
            };
        }
    }
}

impl FromJson for String {
    fn default_value() -> Self {
        String::new()
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        let mut frame = state.begin(Frame::Value { draining: false });
        loop {
            frame = match frame {
                Frame::Value { draining: false } => {
                    let Some(unit) = seek_token(cursor, state) else {
                        state.park(Frame::Value { draining: false });
                        return Ok(None);
                    };
                    match unit.as_ascii() {
                        Some(b'"') => {
                            cursor.bump();
                            Frame::String {
                                progress: StringProgress::opened(),
                            }
                        }
                        Some(b'n') => {
                            cursor.bump();
                            Frame::Literal {
                                matcher: null_matcher(),
                            }
                        }
                        Some(b'-' | b'0'..=b'9' | b't' | b'f' | b'{' | b'[') => {
                            if state.error_on_type_mismatch {
                                return Err(JsonError::TypeMismatch);
                            }
                            Frame::Value { draining: true }
                        }
                        _ => return Err(invalid_character(cursor, state)),
                    }
                }
                Frame::Value { draining: true } => match drain_value(cursor, state)? {
                    Some(()) => {
                        state.complete();
                        return Ok(Some(String::new()));
                    }
                    None => {
                        state.park(Frame::Value { draining: true });
                        return Ok(None);
                    }
                },
                Frame::String { mut progress } => {
                    let base = state.base_offset;
                    match read_string_body(cursor, &mut progress, base)? {
                        StringStep::Done(text) => {
                            state.complete();
                            return Ok(Some(text));
                        }
                        StringStep::Need(units) => {
                            state.need(units);
                            state.park(Frame::String { progress });
                            return Ok(None);
                        }
                    }
                }
                Frame::Literal { mut matcher } => match matcher.read(cursor) {
                    LiteralStep::Done(_) => {
                        state.complete();
                        return Ok(Some(String::new()));
                    }
                    LiteralStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::Literal { matcher });
                        return Ok(None);
                    }
                    LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
                },
                _ => return Err(JsonError::Syntax("corrupt scalar parse state")),
            };
        }
    }
}

impl FromJson for DateTime {
    fn default_value() -> Self {
        DateTime::from_ticks(0, 0)
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        let mut frame = state.begin(Frame::Value { draining: false });
        loop {
            frame = match frame {
                Frame::Value { draining: false } => {
                    let Some(unit) = seek_token(cursor, state) else {
                        state.park(Frame::Value { draining: false });
                        return Ok(None);
                    };
                    match unit.as_ascii() {
                        Some(b'"') => {
                            cursor.bump();
                            Frame::StringToType {
                                progress: StringProgress::opened(),
                            }
                        }
                        Some(b'n') => {
                            cursor.bump();
                            Frame::Literal {
                                matcher: null_matcher(),
                            }
                        }
                        Some(b'-' | b'0'..=b'9' | b't' | b'f' | b'{' | b'[') => {
                            if state.error_on_type_mismatch {
                                return Err(JsonError::TypeMismatch);
                            }
                            Frame::Value { draining: true }
                        }
                        _ => return Err(invalid_character(cursor, state)),
                    }
                }
                Frame::Value { draining: true } => match drain_value(cursor, state)? {
                    Some(()) => {
                        state.complete();
                        return Ok(Some(Self::default_value()));
                    }
                    None => {
                        state.park(Frame::Value { draining: true });
                        return Ok(None);
                    }
                },
                Frame::StringToType { mut progress } => {
                    let base = state.base_offset;
                    match read_string_body(cursor, &mut progress, base)? {
                        StringStep::Done(text) => {
                            state.complete();
                            return match DateTime::parse_str(&text) {
                                Some(parsed) => Ok(Some(parsed)),
                                None => mismatch_consumed(state),
                            };
                        }
                        StringStep::Need(units) => {
                            state.need(units);
                            state.park(Frame::StringToType { progress });
                            return Ok(None);
                        }
                    }
                }
                Frame::Literal { mut matcher } => match matcher.read(cursor) {
                    LiteralStep::Done(_) => {
                        state.complete();
                        return Ok(Some(Self::default_value()));
                    }
                    LiteralStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::Literal { matcher });
                        return Ok(None);
                    }
                    LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
                },
                _ => return Err(JsonError::Syntax("corrupt scalar parse state")),
            };
        }
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn default_value() -> Self {
        None
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        let mut frame = state.begin(Frame::Value { draining: false });
        loop {
            frame = match frame {
                Frame::Value { draining: false } => {
                    if state.resuming_child() {
                        // A suspended inner read is parked below; hand the
                        // span straight back to it rather than re-dispatch
                        // on what may be the middle of its token.
                        match T::try_read(cursor, state)? {
                            Some(inner) => {
                                state.complete();
                                return Ok(Some(Some(inner)));
                            }
                            None => {
                                state.park(Frame::Value { draining: false });
                                return Ok(None);
                            }
                        }
                    }
                    let Some(unit) = seek_token(cursor, state) else {
                        state.park(Frame::Value { draining: false });
                        return Ok(None);
                    };
                    if unit.is(b'n') {
                        cursor.bump();
                        Frame::Literal {
                            matcher: null_matcher(),
                        }
                    } else {
                        match T::try_read(cursor, state)? {
                            Some(inner) => {
                                state.complete();
                                return Ok(Some(Some(inner)));
                            }
                            None => {
                                state.park(Frame::Value { draining: false });
                                return Ok(None);
                            }
                        }
                    }
                }
                Frame::Literal { mut matcher } => match matcher.read(cursor) {
                    LiteralStep::Done(_) => {
                        state.complete();
                        return Ok(Some(None));
                    }
                    LiteralStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::Literal { matcher });
                        return Ok(None);
                    }
                    LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
                },
                _ => return Err(JsonError::Syntax("corrupt scalar parse state")),
            };
        }
    }
}
