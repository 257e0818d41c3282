//! Enum reading.
//!
//! Enums arrive either as a quoted name or as an integer discriminant; the
//! reader accepts both regardless of which form the write side emits under
//! [`JsonOptions::enum_as_number`](crate::JsonOptions::enum_as_number).

use crate::convert::{drain_value, invalid_character, seek_token};
use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::literal::{LiteralMatcher, LiteralStep};
use crate::number::{NumberOutcome, NumberStage, read_number};
use crate::state::{Frame, ReadState};
use crate::string::{StringProgress, StringStep, read_string_body};
use crate::unit::CodeUnit;

/// Reads one enum value.
///
/// `fallback` supplies the value for `null` and for lenient-mode
/// mismatches; `from_name` resolves a quoted variant name; `from_number`
/// resolves an integer discriminant. A name or discriminant neither closure
/// recognizes is a type mismatch.
///
/// # Errors
///
/// Syntax errors and strict-mode type mismatches.
pub fn read_enum<T, U>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
    fallback: impl Fn() -> T,
    from_name: impl Fn(&str) -> Option<T>,
    from_number: impl Fn(i64) -> Option<T>,
) -> Result<Option<T>, JsonError>
where
    T: 'static,
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
                    Some(b'"') => {
                        cursor.bump();
                        Frame::StringToType {
                            progress: StringProgress::opened(),
                        }
                    }
                    Some(b'-' | b'0'..=b'9') => {
                        state.begin_number();
                        Frame::LiteralNumber {
                            stage: NumberStage::default(),
                        }
                    }
                    Some(b'n') => {
                        cursor.bump();
                        Frame::Literal {
                            matcher: LiteralMatcher::null(),
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
                    return Ok(Some(fallback()));
                }
                None => {
                    state.park(Frame::Value { draining: true });
                    return Ok(None);
                }
            },
            Frame::Literal { mut matcher } => match matcher.read(cursor) {
                LiteralStep::Done(_) => {
                    state.complete();
                    return Ok(Some(fallback()));
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
                    StringStep::Done(name) => {
                        state.complete();
                        return match from_name(&name) {
                            Some(value) => Ok(Some(value)),
                            None if state.error_on_type_mismatch => {
                                Err(JsonError::TypeMismatch)
                            }
                            None => Ok(Some(fallback())),
                        };
                    }
                    StringStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::StringToType { progress });
                        return Ok(None);
                    }
                }
            }
            Frame::LiteralNumber { mut stage } => {
                let is_final = state.is_final_block;
                match read_number(cursor, &mut state.number, is_final, &mut stage) {
                    NumberOutcome::Finished => {
                        let resolved = state.number.as_i64().and_then(&from_number);
                        state.complete();
                        return match resolved {
                            Some(value) => Ok(Some(value)),
                            None if state.error_on_type_mismatch => {
                                Err(JsonError::TypeMismatch)
                            }
                            None => Ok(Some(fallback())),
                        };
                    }
                    NumberOutcome::Malformed => {
                        state.complete();
                        return if state.error_on_type_mismatch {
                            Err(JsonError::TypeMismatch)
                        } else {
                            Ok(Some(fallback()))
                        };
                    }
                    NumberOutcome::Need(units) => {
                        state.need(units);
                        state.park(Frame::LiteralNumber { stage });
                        return Ok(None);
                    }
                }
            }
            _ => return Err(JsonError::Syntax("corrupt enum parse state")),
        };
    }
}
