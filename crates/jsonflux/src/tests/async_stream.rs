use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::{JsonError, Value, from_reader_async, from_str};

/// An async reader that yields at most `chunk` bytes per poll.
struct ChunkedAsyncReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkedAsyncReader {
    fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            chunk: chunk.max(1),
        }
    }
}

impl AsyncRead for ChunkedAsyncReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        let n = buf
            .remaining()
            .min(this.chunk)
            .min(this.data.len() - this.pos);
        buf.put_slice(&this.data[this.pos..this.pos + n]);
        this.pos += n;
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn async_stream_matches_whole_parse() {
    let doc = r#"{"a": [1, 2.5, "x\ny"], "b": {"c": true, "d": null}}"#;
    let whole: Value = from_str(doc).unwrap();
    for chunk in [1, 3, 64] {
        let streamed: Value = from_reader_async(ChunkedAsyncReader::new(doc.as_bytes(), chunk))
            .await
            .unwrap();
        assert_eq!(streamed, whole, "chunk size {chunk}");
    }
}

#[tokio::test]
async fn async_stream_detects_truncation() {
    let err = from_reader_async::<Value, _>(ChunkedAsyncReader::new(b"[1, {".as_slice(), 2))
        .await
        .unwrap_err();
    assert!(matches!(err, JsonError::Truncated));
}

#[tokio::test]
async fn async_empty_input_yields_default() {
    let parsed: String = from_reader_async(ChunkedAsyncReader::new(Vec::new(), 8))
        .await
        .unwrap();
    assert_eq!(parsed, "");
}

#[tokio::test]
async fn async_typed_reads_work() {
    let streamed: Vec<i64> = from_reader_async(ChunkedAsyncReader::new(
        b"[1, 2, 3, 4]".as_slice(),
        1,
    ))
    .await
    .unwrap();
    assert_eq!(streamed, vec![1, 2, 3, 4]);
}
