//! Resumable string-literal reading.

use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::escape::{EscapeProgress, Unescape};
use crate::state::{Frame, ReadState};
use crate::unit::{CodeUnit, Scratch};

/// Partial progress through one string literal, parked in a frame when the
/// span runs out.
#[derive(Debug)]
pub(crate) struct StringProgress<U: CodeUnit> {
    /// Whether the opening quote has been consumed.
    opened: bool,
    scratch: U::Scratch,
    escape: EscapeProgress,
}

impl<U: CodeUnit> Default for StringProgress<U> {
    fn default() -> Self {
        Self {
            opened: false,
            scratch: U::Scratch::default(),
            escape: EscapeProgress::Idle,
        }
    }
}

impl<U: CodeUnit> StringProgress<U> {
    /// Progress for a literal whose opening quote the caller already
    /// consumed during dispatch.
    pub(crate) fn opened() -> Self {
        Self {
            opened: true,
            ..Self::default()
        }
    }
}

/// Verdict for one consumption pass over a string literal.
#[derive(Debug)]
pub(crate) enum StringStep {
    /// The closing quote arrived; this is the decoded content.
    Done(String),
    /// The span ended mid-literal; at least this many more units required.
    Need(usize),
}

/// Consumes as much of a string literal as the span holds.
///
/// Unescaped runs are copied in bulk; escapes flow through the
/// [`EscapeProgress`] machine one unit at a time so that a sequence split
/// across buffer fills decodes identically. `base_offset` positions
/// diagnostics within the overall input.
pub(crate) fn read_string_body<U: CodeUnit>(
    cursor: &mut SpanCursor<'_, U>,
    progress: &mut StringProgress<U>,
    base_offset: usize,
) -> Result<StringStep, JsonError> {
    if !progress.opened {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => return Ok(StringStep::Need(2)),
            Some(unit) if unit.is(b'"') => {
                cursor.bump();
                progress.opened = true;
            }
            Some(_) => {
                return Err(JsonError::InvalidCharacter {
                    character: cursor.scalar_here(),
                    offset: base_offset + cursor.position(),
                });
            }
        }
    }

    loop {
        if progress.escape.is_active() {
            let Some(unit) = cursor.peek() else {
                return Ok(StringStep::Need(progress.escape.pending_units() + 1));
            };
            match progress.escape.feed(unit.as_ascii()) {
                Unescape::Char(ch) => {
                    cursor.bump();
                    progress.scratch.push_char(ch);
                }
                Unescape::Pending => cursor.bump(),
                Unescape::Invalid => {
                    return Err(JsonError::InvalidCharacter {
                        character: cursor.scalar_here(),
                        offset: base_offset + cursor.position(),
                    });
                }
            }
            continue;
        }

        let run = cursor.run_while(|unit| match unit.as_ascii() {
            Some(b'"' | b'\\') => false,
            Some(control) if control < 0x20 => false,
            _ => true,
        });
        if !run.is_empty() {
            U::extend_scratch(&mut progress.scratch, run);
            cursor.advance(run.len());
        }

        match cursor.peek() {
            None => return Ok(StringStep::Need(1)),
            Some(unit) if unit.is(b'"') => {
                cursor.bump();
                return progress.scratch.finish().map(StringStep::Done);
            }
            Some(unit) if unit.is(b'\\') => {
                cursor.bump();
                progress.escape.begin();
            }
            Some(_) => {
                // A raw control character inside a string literal.
                return Err(JsonError::InvalidCharacter {
                    character: cursor.scalar_here(),
                    offset: base_offset + cursor.position(),
                });
            }
        }
    }
}

/// Reads a property name as a child frame, so a name split across fills
/// resumes like any other string.
pub(crate) fn read_key<U: CodeUnit>(
    cursor: &mut SpanCursor<'_, U>,
    state: &mut ReadState<U>,
) -> Result<Option<String>, JsonError> {
    let mut frame = state.begin(Frame::String {
        progress: StringProgress::default(),
    });
    let Frame::String { progress } = &mut frame else {
        return Err(JsonError::Syntax("corrupt property-name state"));
    };
    let base = state.base_offset;
    match read_string_body(cursor, progress, base)? {
        StringStep::Done(name) => {
            state.complete();
            Ok(Some(name))
        }
        StringStep::Need(units) => {
            state.need(units);
            state.park(frame);
            Ok(None)
        }
    }
}
