//! Hand-written object shapes.
//!
//! The original system resolves object members reflectively; here a shape
//! is a static description: a builder plus member dispatch by name (or by
//! position under the nameless representation). Types implement
//! [`JsonObjectShape`] and route their [`FromJson`](super::FromJson)
//! implementation through [`read_object`].

use crate::convert::collections::take_work;
use crate::convert::{drain_value, invalid_character, seek_token};
use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::graph::MemberGraph;
use crate::literal::{LiteralMatcher, LiteralStep};
use crate::state::{ElementStep, Frame, MemberStep, ReadState};
use crate::string::read_key;
use crate::unit::CodeUnit;

/// What a shape did with one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOutcome {
    /// The member's value was consumed into the builder.
    Read,
    /// The shape does not know this member; the caller drains its value.
    Unknown,
}

/// A deserializable object shape with statically dispatched members.
pub trait JsonObjectShape: Sized + 'static {
    /// Accumulates members until the object closes.
    type Builder: Default + 'static;

    /// Reads the value of the member called `name` into the builder.
    ///
    /// `graph` is the pruning graph for this member's nested shape, if any.
    /// Return `Ok(None)` untouched when the member's converter suspends;
    /// the same member is re-dispatched on resumption.
    ///
    /// # Errors
    ///
    /// Propagated from the member's converter.
    fn read_member<U: CodeUnit>(
        builder: &mut Self::Builder,
        name: &str,
        graph: Option<&MemberGraph>,
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<MemberOutcome>, JsonError>;

    /// Reads the member at `index` under the nameless (positional array)
    /// representation.
    ///
    /// # Errors
    ///
    /// Propagated from the member's converter.
    fn read_member_at<U: CodeUnit>(
        builder: &mut Self::Builder,
        index: usize,
        cursor: &mut SpanCursor<'_, U>,
        state: &mut ReadState<U>,
    ) -> Result<Option<MemberOutcome>, JsonError>;

    /// Produces the finished value once the object closes.
    fn finish(builder: Self::Builder) -> Self;
}

/// Reads one object of shape `T`, honoring the nameless mode and the shape
/// graph.
///
/// Pass the parent-provided subgraph for nested objects, or `None` at the
/// root to inherit the graph given to the entry point. JSON `null` and, in
/// lenient mode, structurally mismatched values produce the shape built
/// from an untouched builder.
///
/// # Errors
///
/// Syntax errors and strict-mode type mismatches.
pub fn read_object<T, U>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
    graph: Option<&MemberGraph>,
) -> Result<Option<T>, JsonError>
where
    T: JsonObjectShape,
    U: CodeUnit,
{
    let mut frame = state.begin(Frame::Value { draining: false });
    let effective = graph.cloned().or_else(|| state.inherited_root_graph());
    let graph = effective.as_ref();
    loop {
        frame = match frame {
            Frame::Value { draining: false } => {
                let Some(unit) = seek_token(cursor, state) else {
                    state.park(Frame::Value { draining: false });
                    return Ok(None);
                };
                let nameless = state.nameless;
                match unit.as_ascii() {
                    Some(b'{') if !nameless => {
                        cursor.bump();
                        Frame::Object {
                            step: MemberStep::First,
                            property: None,
                            work: Some(Box::new(<T::Builder>::default())),
                        }
                    }
                    Some(b'[') if nameless => {
                        cursor.bump();
                        Frame::ArrayNameless {
                            step: ElementStep::First,
                            index: 0,
                            work: Some(Box::new(<T::Builder>::default())),
                        }
                    }
                    Some(b'n') => {
                        cursor.bump();
                        Frame::Literal {
                            matcher: LiteralMatcher::null(),
                        }
                    }
                    Some(b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f') => {
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
                    return Ok(Some(T::finish(<T::Builder>::default())));
                }
                None => {
                    state.park(Frame::Value { draining: true });
                    return Ok(None);
                }
            },
            Frame::Literal { mut matcher } => match matcher.read(cursor) {
                LiteralStep::Done(_) => {
                    state.complete();
                    return Ok(Some(T::finish(<T::Builder>::default())));
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
                            let builder =
                                take_work::<T::Builder>(&mut work, "corrupt object state")?;
                            state.complete();
                            return Ok(Some(T::finish(builder)));
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
                    MemberStep::Value => {
                        let name = property
                            .as_deref()
                            .ok_or(JsonError::Syntax("corrupt object state"))?;
                        if graph.is_some_and(|g| !g.includes(name)) {
                            step = MemberStep::Drain;
                            continue;
                        }
                        let builder = work
                            .as_mut()
                            .and_then(|w| w.downcast_mut::<T::Builder>())
                            .ok_or(JsonError::Syntax("corrupt object state"))?;
                        let member_graph = graph.and_then(|g| g.child(name));
                        match T::read_member(builder, name, member_graph, cursor, state)? {
                            Some(MemberOutcome::Read) => {
                                property = None;
                                step = MemberStep::Separator;
                            }
                            Some(MemberOutcome::Unknown) => {
                                step = MemberStep::Drain;
                            }
                            None => {
                                state.park(Frame::Object {
                                    step,
                                    property,
                                    work,
                                });
                                return Ok(None);
                            }
                        }
                    }
                    MemberStep::Drain => match drain_value(cursor, state)? {
                        Some(()) => {
                            property = None;
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
                            let builder =
                                take_work::<T::Builder>(&mut work, "corrupt object state")?;
                            state.complete();
                            return Ok(Some(T::finish(builder)));
                        } else {
                            return Err(invalid_character(cursor, state));
                        }
                    }
                }
            },
            Frame::ArrayNameless {
                mut step,
                mut index,
                mut work,
            } => loop {
                match step {
                    ElementStep::First => {
                        let Some(unit) = seek_token(cursor, state) else {
                            state.park(Frame::ArrayNameless { step, index, work });
                            return Ok(None);
                        };
                        if unit.is(b']') {
                            cursor.bump();
                            let builder =
                                take_work::<T::Builder>(&mut work, "corrupt object state")?;
                            state.complete();
                            return Ok(Some(T::finish(builder)));
                        }
                        step = ElementStep::Value;
                    }
                    ElementStep::Value => {
                        let builder = work
                            .as_mut()
                            .and_then(|w| w.downcast_mut::<T::Builder>())
                            .ok_or(JsonError::Syntax("corrupt object state"))?;
                        match T::read_member_at(builder, index, cursor, state)? {
                            Some(MemberOutcome::Read) => {
                                index += 1;
                                step = ElementStep::Separator;
                            }
                            Some(MemberOutcome::Unknown) => {
                                step = ElementStep::Drain;
                            }
                            None => {
                                state.park(Frame::ArrayNameless { step, index, work });
                                return Ok(None);
                            }
                        }
                    }
                    ElementStep::Drain => match drain_value(cursor, state)? {
                        Some(()) => {
                            index += 1;
                            step = ElementStep::Separator;
                        }
                        None => {
                            state.park(Frame::ArrayNameless { step, index, work });
                            return Ok(None);
                        }
                    },
                    ElementStep::Separator => {
                        let Some(unit) = seek_token(cursor, state) else {
                            state.park(Frame::ArrayNameless { step, index, work });
                            return Ok(None);
                        };
                        if unit.is(b',') {
                            cursor.bump();
                            step = ElementStep::Value;
                        } else if unit.is(b']') {
                            cursor.bump();
                            let builder =
                                take_work::<T::Builder>(&mut work, "corrupt object state")?;
                            state.complete();
                            return Ok(Some(T::finish(builder)));
                        } else {
                            return Err(invalid_character(cursor, state));
                        }
                    }
                }
            },
            _ => return Err(JsonError::Syntax("corrupt object parse state")),
        };
    }
}
