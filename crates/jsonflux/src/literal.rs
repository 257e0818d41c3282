//! Keyword literal matching (`null`, `true`, `false`).

use crate::cursor::SpanCursor;
use crate::unit::CodeUnit;

/// Which keyword literal completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    Null,
    True,
    False,
}

/// Verdict for one matching step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralStep {
    /// The literal completed.
    Done(LiteralKind),
    /// The span ended mid-literal; this many units are still required.
    Need(usize),
    /// The next unit does not continue the literal.
    Mismatch,
}

/// Progress through one keyword literal.
///
/// Holds the suffix still expected after the first character, so a literal
/// split across buffer fills resumes exactly where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatcher {
    kind: LiteralKind,
    remaining: &'static [u8],
}

impl LiteralMatcher {
    /// A matcher for `null` whose first character is already consumed.
    pub(crate) fn null() -> Self {
        Self {
            kind: LiteralKind::Null,
            remaining: b"ull",
        }
    }

    /// Starts matching after the first character (`n`, `t`, or `f`), which
    /// the caller has already consumed.
    pub(crate) fn begin(first: u8) -> Option<Self> {
        match first {
            b'n' => Some(Self::null()),
            b't' => Some(Self {
                kind: LiteralKind::True,
                remaining: b"rue",
            }),
            b'f' => Some(Self {
                kind: LiteralKind::False,
                remaining: b"alse",
            }),
            _ => None,
        }
    }

    /// Consumes as much of the literal as the span holds.
    pub(crate) fn read<U: CodeUnit>(&mut self, cursor: &mut SpanCursor<'_, U>) -> LiteralStep {
        while let Some(&expected) = self.remaining.first() {
            let Some(unit) = cursor.peek() else {
                return LiteralStep::Need(self.remaining.len());
            };
            if !unit.is(expected) {
                return LiteralStep::Mismatch;
            }
            cursor.bump();
            self.remaining = &self.remaining[1..];
        }
        LiteralStep::Done(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_literals() {
        for (text, kind) in [
            ("ull", LiteralKind::Null),
            ("rue", LiteralKind::True),
            ("alse", LiteralKind::False),
        ] {
            let first = match kind {
                LiteralKind::Null => b'n',
                LiteralKind::True => b't',
                LiteralKind::False => b'f',
            };
            let mut matcher = LiteralMatcher::begin(first).unwrap();
            let mut cursor = SpanCursor::new(text.as_bytes());
            assert_eq!(matcher.read(&mut cursor), LiteralStep::Done(kind));
            assert!(cursor.at_end());
        }
    }

    #[test]
    fn resumes_across_span_boundaries() {
        let mut matcher = LiteralMatcher::begin(b'f').unwrap();
        let mut cursor = SpanCursor::new(b"al".as_slice());
        assert_eq!(matcher.read(&mut cursor), LiteralStep::Need(2));
        let mut cursor = SpanCursor::new(b"se".as_slice());
        assert_eq!(matcher.read(&mut cursor), LiteralStep::Done(LiteralKind::False));
    }

    #[test]
    fn rejects_on_first_bad_unit() {
        let mut matcher = LiteralMatcher::begin(b'n').unwrap();
        let mut cursor = SpanCursor::new(b"uxl".as_slice());
        assert_eq!(matcher.read(&mut cursor), LiteralStep::Mismatch);
        // The mismatching unit is left unconsumed.
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn unknown_first_character() {
        assert!(LiteralMatcher::begin(b'x').is_none());
    }
}
