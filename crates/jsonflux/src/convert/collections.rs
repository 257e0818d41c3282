//! Composite converters: arrays and string-keyed dictionaries.
//!
//! Partially built collections ride in their frame's boxed work slot, so a
//! container split across buffer fills keeps the elements it already
//! produced and resumes with the suspended child converter.

use std::collections::{BTreeMap, HashMap};

use crate::convert::{FromJson, drain_value, invalid_character, seek_token};
use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::literal::{LiteralMatcher, LiteralStep};
use crate::state::{ElementStep, Frame, MemberStep, ReadState};
use crate::string::read_key;
use crate::unit::CodeUnit;

impl<T: FromJson> FromJson for Vec<T> {
    fn default_value() -> Self {
        Vec::new()
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
                        Some(b'[') => {
                            cursor.bump();
                            Frame::Array {
                                step: ElementStep::First,
                                work: Some(Box::new(Vec::<T>::new())),
                            }
                        }
                        Some(b'n') => {
                            cursor.bump();
                            Frame::Literal {
                                matcher: LiteralMatcher::null(),
                            }
                        }
                        Some(b'{' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f') => {
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
                Frame::Array { mut step, mut work } => loop {
                    match step {
                        ElementStep::First => {
                            let Some(unit) = seek_token(cursor, state) else {
                                state.park(Frame::Array { step, work });
                                return Ok(None);
                            };
                            if unit.is(b']') {
                                cursor.bump();
                                let items = take_work::<Vec<T>>(&mut work, "corrupt array state")?;
                                state.complete();
                                return Ok(Some(items));
                            }
                            step = ElementStep::Value;
                        }
                        ElementStep::Value => match T::try_read(cursor, state)? {
                            Some(element) => {
                                work.as_mut()
                                    .and_then(|w| w.downcast_mut::<Vec<T>>())
                                    .ok_or(JsonError::Syntax("corrupt array state"))?
                                    .push(element);
                                step = ElementStep::Separator;
                            }
                            None => {
                                state.park(Frame::Array { step, work });
                                return Ok(None);
                            }
                        },
                        ElementStep::Drain => {
                            return Err(JsonError::Syntax("corrupt array state"));
                        }
                        ElementStep::Separator => {
                            let Some(unit) = seek_token(cursor, state) else {
                                state.park(Frame::Array { step, work });
                                return Ok(None);
                            };
                            if unit.is(b',') {
                                cursor.bump();
                                step = ElementStep::Value;
                            } else if unit.is(b']') {
                                cursor.bump();
                                let items = take_work::<Vec<T>>(&mut work, "corrupt array state")?;
                                state.complete();
                                return Ok(Some(items));
                            } else {
                                return Err(invalid_character(cursor, state));
                            }
                        }
                    }
                },
                _ => return Err(JsonError::Syntax("corrupt array parse state")),
            };
        }
    }
}

/// Map insertion seam shared by the dictionary converter.
trait JsonMap: Default + 'static {
    type Member: FromJson;

    fn insert_member(&mut self, key: String, value: Self::Member);
}

impl<V: FromJson> JsonMap for BTreeMap<String, V> {
    type Member = V;

    fn insert_member(&mut self, key: String, value: V) {
        // Duplicate member names keep the last occurrence.
        self.insert(key, value);
    }
}

impl<V: FromJson> JsonMap for HashMap<String, V> {
    type Member = V;

    fn insert_member(&mut self, key: String, value: V) {
        self.insert(key, value);
    }
}

fn read_map<M, U>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
) -> Result<Option<M>, JsonError>
where
    M: JsonMap + FromJson,
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
                    Some(b'{') => {
                        cursor.bump();
                        Frame::Dictionary {
                            step: MemberStep::First,
                            key: None,
                            work: Some(Box::new(M::default())),
                        }
                    }
                    Some(b'n') => {
                        cursor.bump();
                        Frame::Literal {
                            matcher: LiteralMatcher::null(),
                        }
                    }
                    Some(b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f') => {
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
                    return Ok(Some(M::default()));
                }
                None => {
                    state.park(Frame::Value { draining: true });
                    return Ok(None);
                }
            },
            Frame::Literal { mut matcher } => match matcher.read(cursor) {
                LiteralStep::Done(_) => {
                    state.complete();
                    return Ok(Some(M::default()));
                }
                LiteralStep::Need(units) => {
                    state.need(units);
                    state.park(Frame::Literal { matcher });
                    return Ok(None);
                }
                LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
            },
            Frame::Dictionary {
                mut step,
                mut key,
                mut work,
            } => loop {
                match step {
                    MemberStep::First => {
                        let Some(unit) = seek_token(cursor, state) else {
                            state.park(Frame::Dictionary { step, key, work });
                            return Ok(None);
                        };
                        if unit.is(b'}') {
                            cursor.bump();
                            let map = take_work::<M>(&mut work, "corrupt dictionary state")?;
                            state.complete();
                            return Ok(Some(map));
                        }
                        step = MemberStep::Key;
                    }
                    MemberStep::Key => match read_key(cursor, state)? {
                        Some(name) => {
                            key = Some(name);
                            step = MemberStep::Colon;
                        }
                        None => {
                            state.park(Frame::Dictionary { step, key, work });
                            return Ok(None);
                        }
                    },
                    MemberStep::Colon => {
                        let Some(unit) = seek_token(cursor, state) else {
                            state.park(Frame::Dictionary { step, key, work });
                            return Ok(None);
                        };
                        if !unit.is(b':') {
                            return Err(invalid_character(cursor, state));
                        }
                        cursor.bump();
                        step = MemberStep::Value;
                    }
                    MemberStep::Value => match <M::Member>::try_read(cursor, state)? {
                        Some(member) => {
                            let name = key
                                .take()
                                .ok_or(JsonError::Syntax("corrupt dictionary state"))?;
                            work.as_mut()
                                .and_then(|w| w.downcast_mut::<M>())
                                .ok_or(JsonError::Syntax("corrupt dictionary state"))?
                                .insert_member(name, member);
                            step = MemberStep::Separator;
                        }
                        None => {
                            state.park(Frame::Dictionary { step, key, work });
                            return Ok(None);
                        }
                    },
                    MemberStep::Drain => {
                        return Err(JsonError::Syntax("corrupt dictionary state"));
                    }
                    MemberStep::Separator => {
                        let Some(unit) = seek_token(cursor, state) else {
                            state.park(Frame::Dictionary { step, key, work });
                            return Ok(None);
                        };
                        if unit.is(b',') {
                            cursor.bump();
                            step = MemberStep::Key;
                        } else if unit.is(b'}') {
                            cursor.bump();
                            let map = take_work::<M>(&mut work, "corrupt dictionary state")?;
                            state.complete();
                            return Ok(Some(map));
                        } else {
                            return Err(invalid_character(cursor, state));
                        }
                    }
                }
            },
            _ => return Err(JsonError::Syntax("corrupt dictionary parse state")),
        };
    }
}

impl<V: FromJson> FromJson for BTreeMap<String, V> {
    fn default_value() -> Self {
        BTreeMap::new()
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        read_map(cursor, state)
    }
}

impl<V: FromJson> FromJson for HashMap<String, V> {
    fn default_value() -> Self {
        HashMap::new()
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        read_map(cursor, state)
    }
}

pub(crate) fn take_work<W: 'static>(
    work: &mut Option<Box<dyn core::any::Any>>,
    context: &'static str,
) -> Result<W, JsonError> {
    work.take()
        .and_then(|w| w.downcast::<W>().ok())
        .map(|boxed| *boxed)
        .ok_or(JsonError::Syntax(context))
}
