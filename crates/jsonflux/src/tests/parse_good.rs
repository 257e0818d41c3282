use std::collections::BTreeMap;

use crate::value::Map;
use crate::{Value, from_chars, from_slice, from_str};

fn chars_of(text: &str) -> Vec<char> {
    text.chars().collect()
}

#[test]
fn scalars_parse() {
    assert_eq!(from_str::<Value>("null").unwrap(), Value::Null);
    assert_eq!(from_str::<Value>("true").unwrap(), Value::Boolean(true));
    assert_eq!(from_str::<Value>("false").unwrap(), Value::Boolean(false));
    assert_eq!(from_str::<Value>("42").unwrap(), Value::Number(42.0));
    assert_eq!(from_str::<Value>("-12.5e2").unwrap(), Value::Number(-1250.0));
    assert_eq!(
        from_str::<Value>(r#""hello""#).unwrap(),
        Value::String("hello".into())
    );
}

#[test]
fn containers_parse() {
    let doc: Value = from_str(r#"{"a": [1, 2, {"b": null}], "c": "x"}"#).unwrap();
    assert_eq!(doc.get("c").and_then(Value::as_str), Some("x"));
    assert_eq!(
        doc.get("a").and_then(|a| a.at(2)).and_then(|o| o.get("b")),
        Some(&Value::Null)
    );

    assert_eq!(from_str::<Value>("[]").unwrap(), Value::Array(vec![]));
    assert_eq!(from_str::<Value>("{}").unwrap(), Value::Object(Map::new()));
    assert_eq!(
        from_str::<Value>(" [ ] ").unwrap(),
        Value::Array(vec![])
    );
}

#[test]
fn string_escapes_decode() {
    let doc: Value = from_str(r#""a\"b\\c\/d\b\f\n\r\t""#).unwrap();
    assert_eq!(
        doc.as_str(),
        Some("a\"b\\c/d\u{0008}\u{000C}\n\r\t")
    );

    let doc: Value = from_str(r#""Aéé""#).unwrap();
    assert_eq!(doc.as_str(), Some("Aéé"));

    // Surrogate pair escapes combine into one scalar.
    let doc: Value = from_str(r#""😀""#).unwrap();
    assert_eq!(doc.as_str(), Some("\u{1F600}"));

    // Raw multi-byte text passes through untouched.
    let doc: Value = from_str(r#""héllo wörld 😀""#).unwrap();
    assert_eq!(doc.as_str(), Some("héllo wörld 😀"));
}

#[test]
fn typed_scalars_parse() {
    assert_eq!(from_str::<i32>("42").unwrap(), 42);
    assert_eq!(from_str::<i64>("-7").unwrap(), -7);
    assert_eq!(from_str::<u64>("18446744073709551615").unwrap(), u64::MAX);
    assert_eq!(from_str::<u8>("255").unwrap(), 255);
    assert!((from_str::<f64>("2.5e-1").unwrap() - 0.25).abs() < f64::EPSILON);
    assert!(from_str::<bool>("true").unwrap());
    assert_eq!(from_str::<String>(r#""text""#).unwrap(), "text");
    assert_eq!(from_str::<Option<i32>>("null").unwrap(), None);
    assert_eq!(from_str::<Option<i32>>("3").unwrap(), Some(3));
}

#[test]
fn quoted_scalars_convert() {
    assert_eq!(from_str::<i64>(r#""42""#).unwrap(), 42);
    assert_eq!(from_str::<u32>(r#""7""#).unwrap(), 7);
    assert!((from_str::<f64>(r#""1.5""#).unwrap() - 1.5).abs() < f64::EPSILON);
    assert!(from_str::<bool>(r#""true""#).unwrap());
    assert!(!from_str::<bool>(r#""false""#).unwrap());
}

#[test]
fn null_yields_zero_values() {
    assert_eq!(from_str::<i64>("null").unwrap(), 0);
    assert_eq!(from_str::<String>("null").unwrap(), "");
    assert!(!from_str::<bool>("null").unwrap());
    assert_eq!(from_str::<Vec<i32>>("null").unwrap(), Vec::<i32>::new());
}

#[test]
fn typed_collections_parse() {
    assert_eq!(from_str::<Vec<i32>>("[1, 2, 3]").unwrap(), vec![1, 2, 3]);
    assert_eq!(
        from_str::<Vec<Vec<bool>>>("[[true], [], [false, true]]").unwrap(),
        vec![vec![true], vec![], vec![false, true]]
    );
    assert_eq!(
        from_str::<Vec<Option<String>>>(r#"["a", null, "b"]"#).unwrap(),
        vec![Some("a".to_string()), None, Some("b".to_string())]
    );

    let map: BTreeMap<String, i64> = from_str(r#"{"one": 1, "two": 2}"#).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["one"], 1);
    assert_eq!(map["two"], 2);

    let nested: BTreeMap<String, Vec<i32>> = from_str(r#"{"xs": [1], "ys": []}"#).unwrap();
    assert_eq!(nested["xs"], vec![1]);
    assert!(nested["ys"].is_empty());
}

#[test]
fn duplicate_members_keep_the_last() {
    let doc: Value = from_str(r#"{"a": 1, "a": 2}"#).unwrap();
    assert_eq!(doc.get("a"), Some(&Value::Number(2.0)));
    let map: BTreeMap<String, i32> = from_str(r#"{"a": 1, "a": 2}"#).unwrap();
    assert_eq!(map["a"], 2);
}

#[test]
fn byte_and_char_entry_points_agree() {
    let docs = [
        r#"{"a": [1, -2.5, "x\ny"], "b": {"c": true}}"#,
        r#""héllo""#,
        "[null, 1e3, \"é😀\"]",
    ];
    for text in docs {
        let from_text: Value = from_str(text).unwrap();
        let from_bytes: Value = from_slice(text.as_bytes()).unwrap();
        let from_units: Value = from_chars(&chars_of(text)).unwrap();
        assert_eq!(from_text, from_bytes, "bytes disagree for {text}");
        assert_eq!(from_text, from_units, "chars disagree for {text}");
    }
}

#[test]
fn trailing_whitespace_is_ignored() {
    assert_eq!(from_str::<Value>(" 1 \n\t").unwrap(), Value::Number(1.0));
    assert_eq!(from_str::<Vec<i32>>("[1] ").unwrap(), vec![1]);
}

#[test]
fn deeply_nested_documents() {
    let mut text = String::new();
    for _ in 0..64 {
        text.push('[');
    }
    text.push('1');
    for _ in 0..64 {
        text.push(']');
    }
    let mut doc: &Value = &from_str(&text).unwrap();
    for _ in 0..64 {
        doc = doc.at(0).unwrap();
    }
    assert_eq!(doc, &Value::Number(1.0));
}
