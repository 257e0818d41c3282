//! The incremental read driver.
//!
//! One fill/parse round trip: attempt a parse over the filled region, and on
//! an insufficiency verdict relocate the unconsumed suffix to the front of
//! the buffer, grow if the parser's estimate demands it, read more, and
//! retry. The loop is bounded by source exhaustion and buffer growth, both
//! monotonic.

use std::io::Read;

use crate::convert::FromJson;
use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::graph::MemberGraph;
use crate::options::JsonOptions;
use crate::pool::{self, PooledBuffer};
use crate::state::ReadState;
use crate::unit::CodeUnit;

/// Initial capacity for stream reads.
pub(crate) const DEFAULT_READ_CAPACITY: usize = pool::MIN_CAPACITY;

/// Parses a fully materialized span: exactly one attempt, and insufficiency
/// is terminal because no more data can ever arrive.
pub(crate) fn read_span<T, U>(
    span: &[U],
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
) -> Result<T, JsonError>
where
    T: FromJson,
    U: CodeUnit,
{
    if span.is_empty() {
        return Ok(T::default_value());
    }
    let mut state = ReadState::new(options, graph.cloned());
    state.is_final_block = true;
    let mut cursor = SpanCursor::new(span);
    match T::try_read(&mut cursor, &mut state)? {
        Some(value) => Ok(value),
        None => {
            debug_assert!(
                state.needed > 0,
                "converter requested a retry without an input estimate"
            );
            Err(JsonError::Truncated)
        }
    }
}

/// Parses from a pull stream through repeated fill/parse cycles.
pub(crate) fn read_stream<T, R>(
    mut source: R,
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
    initial_capacity: usize,
) -> Result<T, JsonError>
where
    T: FromJson,
    R: Read,
{
    let mut buffer = PooledBuffer::rent(initial_capacity);
    let mut length = 0usize;
    let mut is_final = false;

    // Initial fill: until the buffer is full or the source is exhausted.
    while length < buffer.len() {
        let read = source.read(&mut buffer[length..])?;
        if read == 0 {
            is_final = true;
            break;
        }
        length += read;
    }
    if length == 0 {
        // The empty-input contract: the parser is never engaged.
        return Ok(T::default_value());
    }

    let mut state = ReadState::new(options, graph.cloned());
    loop {
        state.is_final_block = is_final;
        let mut cursor = SpanCursor::new(&buffer[..length]);
        let verdict = T::try_read(&mut cursor, &mut state)?;
        let consumed = cursor.position();
        debug_assert!(state.unwound());

        if let Some(value) = verdict {
            // Anything after the value other than whitespace is unread
            // data, inconsistent with a completed stream read: first the
            // buffered remainder, then (when the end marker has not been
            // seen) the source itself, probed through to the end.
            if buffer[consumed..length]
                .iter()
                .any(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            {
                return Err(JsonError::Truncated);
            }
            if !is_final {
                loop {
                    let mut probe = [0u8; 1];
                    if source.read(&mut probe)? == 0 {
                        break;
                    }
                    if !matches!(probe[0], b' ' | b'\t' | b'\n' | b'\r') {
                        return Err(JsonError::Truncated);
                    }
                }
            }
            return Ok(value);
        }

        debug_assert!(
            state.needed > 0,
            "converter requested a retry without an input estimate"
        );
        if state.needed == 0 {
            state.needed = 1;
        }
        if is_final {
            return Err(JsonError::Truncated);
        }

        // Relocate the unconsumed suffix to the front, grow when the
        // estimate exceeds the remaining capacity, and refill.
        buffer.copy_within(consumed..length, 0);
        length -= consumed;
        state.add_consumed(consumed);
        let required = length + state.needed;
        if required > buffer.len() {
            buffer.grow(required);
        }
        while length < buffer.len() {
            let read = source.read(&mut buffer[length..])?;
            if read == 0 {
                is_final = true;
                break;
            }
            length += read;
        }
        // Exhaustion flips the block to final; the retry below runs under
        // final semantics so trailing literals that terminate only at
        // end-of-input can complete, and anything actually incomplete
        // fails as a truncation on that attempt.
        state.needed = 0;
    }
}
