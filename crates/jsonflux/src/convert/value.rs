//! The untyped document converter.
//!
//! Parses arbitrary JSON into a [`Value`] with no target type model, under
//! the same incremental contract as every typed converter: container frames
//! carry their partially built collections, so a document split at any
//! point resumes without losing progress.

use crate::convert::collections::take_work;
use crate::convert::{FromJson, invalid_character, seek_token};
use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::literal::{LiteralKind, LiteralMatcher, LiteralStep};
use crate::number::{NumberOutcome, NumberStage, read_number};
use crate::state::{ElementStep, Frame, MemberStep, ReadState};
use crate::string::{StringProgress, StringStep, read_key, read_string_body};
use crate::unit::CodeUnit;
use crate::value::{Map, Value};

impl FromJson for Value {
    fn default_value() -> Self {
        Value::Null
    }

    fn try_read<U: CodeUnit>(
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<Self>, JsonError> {
        let mut frame = state.begin(Frame::Value { draining: false });
        loop {
            frame = match frame {
                Frame::Value { .. } => {
                    let Some(unit) = seek_token(cursor, state) else {
                        state.park(Frame::Value { draining: false });
                        return Ok(None);
                    };
                    match unit.as_ascii() {
                        Some(b'{') => {
                            cursor.bump();
                            Frame::Object {
                                step: MemberStep::First,
                                property: None,
                                work: Some(Box::new(Map::new())),
                            }
                        }
                        Some(b'[') => {
                            cursor.bump();
                            Frame::Array {
                                step: ElementStep::First,
                                work: Some(Box::new(Vec::<Value>::new())),
                            }
                        }
                        Some(b'"') => {
                            cursor.bump();
                            Frame::String {
                                progress: StringProgress::opened(),
                            }
                        }
                        Some(b'-' | b'0'..=b'9') => {
                            state.begin_number();
                            Frame::LiteralNumber {
                                stage: NumberStage::default(),
                            }
                        }
                        Some(first @ (b'n' | b't' | b'f')) => {
                            let Some(matcher) = LiteralMatcher::begin(first) else {
                                return Err(invalid_character(cursor, state));
                            };
                            cursor.bump();
                            Frame::Literal { matcher }
                        }
                        _ => return Err(invalid_character(cursor, state)),
                    }
                }

                Frame::String { mut progress } => {
                    let base = state.base_offset;
                    match read_string_body(cursor, &mut progress, base)? {
                        StringStep::Done(text) => {
                            state.complete();
                            return Ok(Some(Value::String(text)));
                        }
                        StringStep::Need(units) => {
                            state.need(units);
                            state.park(Frame::String { progress });
                            return Ok(None);
                        }
                    }
                }

                Frame::LiteralNumber { mut stage } => {
                    let is_final = state.is_final_block;
                    match read_number(cursor, &mut state.number, is_final, &mut stage) {
                        NumberOutcome::Finished => {
                            let number = state.number.as_f64();
                            state.complete();
                            return Ok(Some(Value::Number(number)));
                        }
                        NumberOutcome::Malformed => {
                            return Err(JsonError::Syntax("malformed number literal"));
                        }
                        NumberOutcome::Need(units) => {
                            state.need(units);
                            state.park(Frame::LiteralNumber { stage });
                            return Ok(None);
                        }
                    }
                }

                Frame::Literal { mut matcher } => match matcher.read(cursor) {
                    LiteralStep::Done(kind) => {
                        state.complete();
                        return Ok(Some(match kind {
                            LiteralKind::Null => Value::Null,
                            LiteralKind::True => Value::Boolean(true),
                            LiteralKind::False => Value::Boolean(false),
                        }));
                    }
                    LiteralStep::Need(units) => {
                        state.need(units);
                        state.park(Frame::Literal { matcher });
                        return Ok(None);
                    }
                    LiteralStep::Mismatch => return Err(invalid_character(cursor, state)),
                },

                Frame::Object {
                    mut step,
                    mut property,
                    mut work,
                } => loop {
                    match step {
                        MemberStep::First => {
                            let Some(unit) = seek_token(cursor, state) else {
                                state.park(Frame::Object {
                                    step,
                                    property,
                                    work,
                                });
                                return Ok(None);
                            };
                            if unit.is(b'}') {
                                cursor.bump();
                                let map = take_map(&mut work)?;
                                state.complete();
                                return Ok(Some(Value::Object(map)));
                            }
                            step = MemberStep::Key;
                        }
                        MemberStep::Key => match read_key(cursor, state)? {
                            Some(name) => {
                                property = Some(name);
                                step = MemberStep::Colon;
                            }
                            None => {
                                state.park(Frame::Object {
                                    step,
                                    property,
                                    work,
                                });
                                return Ok(None);
                            }
                        },
                        MemberStep::Colon => {
                            let Some(unit) = seek_token(cursor, state) else {
                                state.park(Frame::Object {
                                    step,
                                    property,
                                    work,
                                });
                                return Ok(None);
                            };
                            if !unit.is(b':') {
                                return Err(invalid_character(cursor, state));
                            }
                            cursor.bump();
                            step = MemberStep::Value;
                        }
                        MemberStep::Value => match Value::try_read(cursor, state)? {
                            Some(member) => {
                                let map = work
                                    .as_mut()
                                    .and_then(|w| w.downcast_mut::<Map>())
                                    .ok_or(JsonError::Syntax("corrupt object state"))?;
                                let name = property
                                    .take()
                                    .ok_or(JsonError::Syntax("corrupt object state"))?;
                                map.insert(name, member);
                                step = MemberStep::Separator;
                            }
                            None => {
                                state.park(Frame::Object {
                                    step,
                                    property,
                                    work,
                                });
                                return Ok(None);
                            }
                        },
                        MemberStep::Drain => {
                            return Err(JsonError::Syntax("corrupt object state"));
                        }
                        MemberStep::Separator => {
                            let Some(unit) = seek_token(cursor, state) else {
                                state.park(Frame::Object {
                                    step,
                                    property,
                                    work,
                                });
                                return Ok(None);
                            };
                            if unit.is(b',') {
                                cursor.bump();
                                step = MemberStep::Key;
                            } else if unit.is(b'}') {
                                cursor.bump();
                                let map = take_map(&mut work)?;
                                state.complete();
                                return Ok(Some(Value::Object(map)));
                            } else {
                                return Err(invalid_character(cursor, state));
                            }
                        }
                    }
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
                                let items = take_items(&mut work)?;
                                state.complete();
                                return Ok(Some(Value::Array(items)));
                            }
                            step = ElementStep::Value;
                        }
                        ElementStep::Value => match Value::try_read(cursor, state)? {
                            Some(element) => {
                                let items = work
                                    .as_mut()
                                    .and_then(|w| w.downcast_mut::<Vec<Value>>())
                                    .ok_or(JsonError::Syntax("corrupt array state"))?;
                                items.push(element);
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
                                let items = take_items(&mut work)?;
                                state.complete();
                                return Ok(Some(Value::Array(items)));
                            } else {
                                return Err(invalid_character(cursor, state));
                            }
                        }
                    }
                },

                Frame::StringToType { .. }
                | Frame::Dictionary { .. }
                | Frame::ArrayNameless { .. } => {
                    return Err(JsonError::Syntax("corrupt parse state"));
                }
            };
        }
    }
}

fn take_map(work: &mut Option<Box<dyn core::any::Any>>) -> Result<Map, JsonError> {
    take_work::<Map>(work, "corrupt object state")
}

fn take_items(work: &mut Option<Box<dyn core::any::Any>>) -> Result<Vec<Value>, JsonError> {
    take_work::<Vec<Value>>(work, "corrupt array state")
}
