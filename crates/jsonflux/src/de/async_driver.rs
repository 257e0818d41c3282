//! The suspending variant of the incremental read driver.
//!
//! Ordering and retry logic are identical to the synchronous driver; only
//! the "request more input" step differs, suspending cooperatively on an
//! [`AsyncRead`] source instead of blocking. Cancellation happens by
//! dropping the future at that await point; the frame model is
//! checkpoint-safe at every suspension boundary, and the rented buffer is
//! scrubbed and returned when the future drops.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::convert::FromJson;
use crate::cursor::SpanCursor;
use crate::error::JsonError;
use crate::graph::MemberGraph;
use crate::options::JsonOptions;
use crate::pool::PooledBuffer;
use crate::state::ReadState;

pub(crate) async fn read_stream_async<T, R>(
    mut source: R,
    options: &JsonOptions,
    graph: Option<&MemberGraph>,
    initial_capacity: usize,
) -> Result<T, JsonError>
where
    T: FromJson,
    R: AsyncRead + Unpin,
{
    let mut buffer = PooledBuffer::rent(initial_capacity);
    let mut length = 0usize;
    let mut is_final = false;

    while length < buffer.len() {
        let read = source.read(&mut buffer[length..]).await?;
        if read == 0 {
            is_final = true;
            break;
        }
        length += read;
    }
    if length == 0 {
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
            if buffer[consumed..length]
                .iter()
                .any(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            {
                return Err(JsonError::Truncated);
            }
            if !is_final {
                loop {
                    let mut probe = [0u8; 1];
                    if source.read(&mut probe).await? == 0 {
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

        buffer.copy_within(consumed..length, 0);
        length -= consumed;
        state.add_consumed(consumed);
        let required = length + state.needed;
        if required > buffer.len() {
            buffer.grow(required);
        }
        while length < buffer.len() {
            let read = source.read(&mut buffer[length..]).await?;
            if read == 0 {
                is_final = true;
                break;
            }
            length += read;
        }
        state.needed = 0;
    }
}
