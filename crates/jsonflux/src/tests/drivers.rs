use rstest::rstest;

use crate::de::from_reader_with_capacity;
use crate::tests::support::ChunkedReader;
use crate::{JsonError, JsonOptions, Value, from_reader, from_str};

#[test]
fn empty_input_yields_contextual_defaults() {
    assert_eq!(from_str::<String>("").unwrap(), "");
    assert_eq!(from_str::<i64>("").unwrap(), 0);
    assert_eq!(from_str::<f64>("").unwrap(), 0.0);
    assert!(!from_str::<bool>("").unwrap());
    assert_eq!(from_str::<Option<i32>>("").unwrap(), None);
    assert_eq!(from_str::<Vec<i32>>("").unwrap(), Vec::<i32>::new());
    assert_eq!(from_str::<Value>("").unwrap(), Value::Null);
    assert_eq!(crate::from_chars::<String>(&[]).unwrap(), "");
    assert_eq!(crate::from_slice::<i32>(b"").unwrap(), 0);

    // A zero-byte stream behaves like a zero-length span.
    assert_eq!(
        from_reader::<String, _>(ChunkedReader::new(Vec::new(), 3)).unwrap(),
        ""
    );
    assert_eq!(
        from_reader::<Value, _>(ChunkedReader::new(Vec::new(), 3)).unwrap(),
        Value::Null
    );
}

#[rstest]
#[case::tiny_chunks(1, 1024)]
#[case::small_chunks(7, 1024)]
#[case::larger_buffer(3, 4096)]
#[case::big_chunks(4096, 1024)]
fn growth_and_relocation_preserve_bytes(#[case] chunk: usize, #[case] capacity: usize) {
    // A string literal far larger than the initial buffer forces repeated
    // relocation and growth; every byte must survive exactly once.
    let payload: String = ('a'..='z').cycle().take(100_000).collect();
    let doc = format!(r#"{{"data": "{payload}", "tail": [1, 2, 3]}}"#);

    let whole: Value = from_str(&doc).unwrap();
    let streamed: Value = from_reader_with_capacity(
        ChunkedReader::new(doc.clone().into_bytes(), chunk),
        &JsonOptions::default(),
        None,
        capacity,
    )
    .unwrap();
    assert_eq!(whole, streamed);
    assert_eq!(
        streamed.get("data").and_then(Value::as_str).map(str::len),
        Some(payload.len())
    );
}

#[test]
fn escaped_payload_survives_growth() {
    let unit = "line\\nbreak \\\"q\\\" and \\u00e9 ";
    let mut literal = String::from("\"");
    for _ in 0..2_000 {
        literal.push_str(unit);
    }
    literal.push('"');

    let whole: String = from_str(&literal).unwrap();
    let streamed: String = from_reader(ChunkedReader::new(literal.into_bytes(), 1)).unwrap();
    assert_eq!(whole, streamed);
    assert!(whole.contains("line\nbreak \"q\" and é "));
}

#[test]
fn streamed_truncation_is_detected() {
    for text in ["{\"a\": [1, 2", "\"abc", "[true, fal"] {
        let err = from_reader::<Value, _>(ChunkedReader::new(text.as_bytes().to_vec(), 2))
            .unwrap_err();
        assert!(
            matches!(err, JsonError::Truncated),
            "expected truncation for {text:?}, got {err:?}"
        );
    }
}

#[test]
fn document_flush_with_buffer_boundary_succeeds() {
    // The value ends exactly at the initial buffer capacity; the driver
    // must confirm the end of the stream rather than fail.
    let capacity = 64;
    let doc = format!("[{}22]", "1,".repeat(30));
    assert_eq!(doc.len(), capacity);
    let parsed: Value = from_reader_with_capacity(
        ChunkedReader::new(doc.clone().into_bytes(), capacity),
        &JsonOptions::default(),
        None,
        capacity,
    )
    .unwrap();
    assert_eq!(parsed, from_str::<Value>(&doc).unwrap());
}

#[test]
fn trailing_content_after_the_value() {
    // Trailing whitespace is drained through to the end marker.
    let doc = format!("[1]{}", " \n".repeat(1_000));
    let parsed: Value =
        from_reader(ChunkedReader::new(doc.into_bytes(), 512)).unwrap();
    assert_eq!(parsed, Value::Array(vec![Value::Number(1.0)]));

    // A second document is unread data and rejected.
    let doc = "[1][2]".to_string() + &" ".repeat(2_000);
    let err = from_reader::<Value, _>(ChunkedReader::new(doc.into_bytes(), 2048)).unwrap_err();
    assert!(matches!(err, JsonError::Truncated));
}

#[test]
fn root_number_terminates_at_stream_end() {
    // A bare numeric root only terminates at end-of-input; exhaustion must
    // flip the block to final and the retry completes it.
    let streamed: i64 = from_reader(ChunkedReader::new(b"123456".to_vec(), 2)).unwrap();
    assert_eq!(streamed, 123_456);
    let streamed: Value = from_reader(ChunkedReader::new(b"-2.5e2".to_vec(), 1)).unwrap();
    assert_eq!(streamed, Value::Number(-250.0));
}

#[test]
fn read_errors_propagate() {
    struct FailingReader;

    impl std::io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("backing store went away"))
        }
    }

    let err = from_reader::<Value, _>(FailingReader).unwrap_err();
    assert!(matches!(err, JsonError::Io(_)));
}

#[test]
fn options_flow_into_stream_reads() {
    let options = JsonOptions {
        error_on_type_mismatch: true,
        ..JsonOptions::default()
    };
    let err = crate::from_reader_with::<i64, _>(
        ChunkedReader::new(b"\"nope\"".to_vec(), 2),
        &options,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, JsonError::TypeMismatch));
}
