//! Resumable numeric-literal consumption.
//!
//! While a literal is being consumed it is accumulated into four parallel
//! representations (signed, unsigned, floating, exact mantissa/scale) so
//! that whichever target type the converter ultimately needs can be produced
//! without re-scanning text that may already have left the buffer. A literal
//! split across buffer fills resumes from the stored accumulators.

use crate::cursor::SpanCursor;
use crate::unit::CodeUnit;

/// Parallel accumulators for one in-flight numeric literal.
///
/// Exactly one literal is in flight at a time (the innermost), so a single
/// set lives on the read state and is reset when a literal begins.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NumberAcc {
    /// Integer-part digits accumulated as a wrapping signed value.
    i64_acc: i64,
    /// Integer-part digits accumulated as a wrapping unsigned value.
    u64_acc: u64,
    /// Every mantissa digit accumulated as floating point.
    f64_acc: f64,
    /// Every mantissa digit accumulated exactly, until `i128` overflows.
    mantissa: i128,
    /// Count of fraction digits.
    scale: u32,
    /// Explicit exponent magnitude.
    exponent: i32,
    negative: bool,
    exp_negative: bool,
    /// The exact mantissa overflowed; only `f64_acc` remains authoritative.
    lossy: bool,
}

impl NumberAcc {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    fn absorb_int(&mut self, digit: u8) {
        let d = i64::from(digit);
        self.i64_acc = self.i64_acc.wrapping_mul(10).wrapping_add(d);
        self.u64_acc = self.u64_acc.wrapping_mul(10).wrapping_add(u64::from(digit));
        self.absorb_mantissa(digit);
    }

    fn absorb_frac(&mut self, digit: u8) {
        self.scale = self.scale.saturating_add(1);
        self.absorb_mantissa(digit);
    }

    fn absorb_mantissa(&mut self, digit: u8) {
        self.f64_acc = self.f64_acc * 10.0 + f64::from(digit);
        if !self.lossy {
            match self
                .mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit)))
            {
                Some(m) => self.mantissa = m,
                None => self.lossy = true,
            }
        }
    }

    fn absorb_exp(&mut self, digit: u8) {
        self.exponent = self
            .exponent
            .saturating_mul(10)
            .saturating_add(i32::from(digit));
    }

    fn effective_exponent(&self) -> i32 {
        let exp = if self.exp_negative {
            -self.exponent
        } else {
            self.exponent
        };
        exp.saturating_sub(i32::try_from(self.scale).unwrap_or(i32::MAX))
    }

    /// The literal as floating point.
    pub(crate) fn as_f64(&self) -> f64 {
        let magnitude = if self.lossy {
            self.f64_acc
        } else {
            // The exact mantissa keeps short literals free of drift that the
            // running float accumulator can pick up.
            #[allow(clippy::cast_precision_loss)]
            {
                self.mantissa as f64
            }
        };
        let value = magnitude * 10f64.powi(self.effective_exponent());
        if self.negative { -value } else { value }
    }

    /// The literal as an exact integer, scaling the mantissa through the
    /// effective exponent. `None` when a fractional part survives or the
    /// result is not representable.
    fn as_integral(&self) -> Option<i128> {
        if self.lossy {
            return None;
        }
        let mut m = self.mantissa;
        if m == 0 {
            return Some(0);
        }
        let exp = i64::from(self.effective_exponent());
        if exp < 0 {
            for _ in 0..-exp {
                if m % 10 != 0 {
                    return None;
                }
                m /= 10;
            }
        } else {
            for _ in 0..exp {
                m = m.checked_mul(10)?;
            }
        }
        Some(if self.negative { -m } else { m })
    }

    /// The literal as a signed 64-bit integer, if exactly representable.
    pub(crate) fn as_i64(&self) -> Option<i64> {
        if self.lossy || self.effective_exponent() != 0 {
            return i64::try_from(self.as_integral()?).ok();
        }
        let limit = if self.negative {
            1i128 << 63
        } else {
            (1i128 << 63) - 1
        };
        if self.mantissa > limit {
            return None;
        }
        Some(if self.negative {
            self.i64_acc.wrapping_neg()
        } else {
            self.i64_acc
        })
    }

    /// The literal as an unsigned 64-bit integer, if exactly representable.
    pub(crate) fn as_u64(&self) -> Option<u64> {
        if self.negative {
            return (self.mantissa == 0 && !self.lossy).then_some(0);
        }
        if self.lossy || self.effective_exponent() != 0 {
            return u64::try_from(self.as_integral()?).ok();
        }
        if self.mantissa > i128::from(u64::MAX) {
            return None;
        }
        Some(self.u64_acc)
    }
}

/// Position within a numeric literal, parked in the frame on suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum NumberStage {
    /// Nothing consumed yet.
    #[default]
    Start,
    /// Sign consumed; at least one integer digit required.
    IntFirst,
    /// Inside the integer digit run.
    Int,
    /// Decimal point consumed; at least one fraction digit required.
    FracFirst,
    /// Inside the fraction digit run.
    Frac,
    /// Exponent marker consumed; sign or digit expected.
    ExpStart,
    /// Exponent sign consumed; at least one digit required.
    ExpFirst,
    /// Inside the exponent digit run.
    Exp,
    /// The literal went bad; consuming through to the next delimiter.
    Invalid,
}

/// Verdict for one consumption pass over a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberOutcome {
    /// The literal terminated at a delimiter (or final end of input).
    Finished,
    /// The literal terminated but its digit/separator sequence was invalid.
    Malformed,
    /// The span ended mid-literal; at least this many more units required.
    Need(usize),
}

fn is_delimiter<U: CodeUnit>(unit: U) -> bool {
    unit.is_json_whitespace() || matches!(unit.as_ascii(), Some(b',' | b']' | b'}' | b':'))
}

/// Consumes as much of a numeric literal as the span holds.
///
/// The cursor is advanced over every unit that was absorbed; progress
/// survives in `acc` and `stage` so a later call continues rather than
/// restarting. On [`NumberOutcome::Malformed`] the cursor rests at the next
/// delimiter so the caller can apply its mismatch policy.
pub(crate) fn read_number<U: CodeUnit>(
    cursor: &mut SpanCursor<'_, U>,
    acc: &mut NumberAcc,
    is_final: bool,
    stage: &mut NumberStage,
) -> NumberOutcome {
    loop {
        let unit = cursor.peek();
        let ascii = unit.and_then(CodeUnit::as_ascii);
        match *stage {
            NumberStage::Start => match ascii {
                Some(b'-') => {
                    acc.negative = true;
                    cursor.bump();
                    *stage = NumberStage::IntFirst;
                }
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_int(d - b'0');
                    cursor.bump();
                    *stage = NumberStage::Int;
                }
                _ => match unit {
                    Some(_) => *stage = NumberStage::Invalid,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::IntFirst => match ascii {
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_int(d - b'0');
                    cursor.bump();
                    *stage = NumberStage::Int;
                }
                _ => match unit {
                    Some(_) => *stage = NumberStage::Invalid,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::Int => match ascii {
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_int(d - b'0');
                    cursor.bump();
                }
                Some(b'.') => {
                    cursor.bump();
                    *stage = NumberStage::FracFirst;
                }
                Some(b'e' | b'E') => {
                    cursor.bump();
                    *stage = NumberStage::ExpStart;
                }
                _ => match unit {
                    Some(u) if is_delimiter(u) => return NumberOutcome::Finished,
                    Some(_) => *stage = NumberStage::Invalid,
                    None if is_final => return NumberOutcome::Finished,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::FracFirst => match ascii {
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_frac(d - b'0');
                    cursor.bump();
                    *stage = NumberStage::Frac;
                }
                _ => match unit {
                    Some(_) => *stage = NumberStage::Invalid,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::Frac => match ascii {
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_frac(d - b'0');
                    cursor.bump();
                }
                Some(b'e' | b'E') => {
                    cursor.bump();
                    *stage = NumberStage::ExpStart;
                }
                _ => match unit {
                    Some(u) if is_delimiter(u) => return NumberOutcome::Finished,
                    Some(_) => *stage = NumberStage::Invalid,
                    None if is_final => return NumberOutcome::Finished,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::ExpStart => match ascii {
                Some(b'+') => {
                    cursor.bump();
                    *stage = NumberStage::ExpFirst;
                }
                Some(b'-') => {
                    acc.exp_negative = true;
                    cursor.bump();
                    *stage = NumberStage::ExpFirst;
                }
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_exp(d - b'0');
                    cursor.bump();
                    *stage = NumberStage::Exp;
                }
                _ => match unit {
                    Some(_) => *stage = NumberStage::Invalid,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::ExpFirst => match ascii {
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_exp(d - b'0');
                    cursor.bump();
                    *stage = NumberStage::Exp;
                }
                _ => match unit {
                    Some(_) => *stage = NumberStage::Invalid,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::Exp => match ascii {
                Some(d @ b'0'..=b'9') => {
                    acc.absorb_exp(d - b'0');
                    cursor.bump();
                }
                _ => match unit {
                    Some(u) if is_delimiter(u) => return NumberOutcome::Finished,
                    Some(_) => *stage = NumberStage::Invalid,
                    None if is_final => return NumberOutcome::Finished,
                    None => return NumberOutcome::Need(1),
                },
            },
            NumberStage::Invalid => match unit {
                Some(u) if is_delimiter(u) => return NumberOutcome::Malformed,
                Some(_) => cursor.bump(),
                None if is_final => return NumberOutcome::Malformed,
                None => return NumberOutcome::Need(1),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (NumberAcc, NumberOutcome) {
        let mut acc = NumberAcc::default();
        let mut stage = NumberStage::default();
        let mut cursor = SpanCursor::new(text.as_bytes());
        let outcome = read_number(&mut cursor, &mut acc, true, &mut stage);
        (acc, outcome)
    }

    #[test]
    fn integers_fill_every_accumulator() {
        let (acc, outcome) = parse("1234");
        assert_eq!(outcome, NumberOutcome::Finished);
        assert_eq!(acc.as_i64(), Some(1234));
        assert_eq!(acc.as_u64(), Some(1234));
        assert!((acc.as_f64() - 1234.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_and_fractional_literals() {
        let (acc, outcome) = parse("-12.5");
        assert_eq!(outcome, NumberOutcome::Finished);
        assert!((acc.as_f64() + 12.5).abs() < f64::EPSILON);
        assert_eq!(acc.as_i64(), None);
        assert_eq!(acc.as_u64(), None);

        // A fraction that cancels exactly still converts.
        let (acc, _) = parse("42.0");
        assert_eq!(acc.as_i64(), Some(42));
    }

    #[test]
    fn exponents_scale_integrals() {
        let (acc, _) = parse("12e2");
        assert_eq!(acc.as_i64(), Some(1200));
        let (acc, _) = parse("1.5e1");
        assert_eq!(acc.as_i64(), Some(15));
        let (acc, _) = parse("1e-2");
        assert_eq!(acc.as_i64(), None);
        assert!((acc.as_f64() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn extreme_magnitudes() {
        let (acc, _) = parse("9223372036854775807");
        assert_eq!(acc.as_i64(), Some(i64::MAX));
        let (acc, _) = parse("-9223372036854775808");
        assert_eq!(acc.as_i64(), Some(i64::MIN));
        let (acc, _) = parse("18446744073709551615");
        assert_eq!(acc.as_u64(), Some(u64::MAX));
        assert_eq!(acc.as_i64(), None);
        let (acc, _) = parse("-1");
        assert_eq!(acc.as_u64(), None);
    }

    #[test]
    fn lossy_mantissa_falls_back_to_float() {
        let long = "9".repeat(60);
        let (acc, outcome) = parse(&long);
        assert_eq!(outcome, NumberOutcome::Finished);
        assert_eq!(acc.as_i64(), None);
        assert!(acc.as_f64() > 1e59);
    }

    #[test]
    fn suspension_resumes_mid_literal() {
        let mut acc = NumberAcc::default();
        let mut stage = NumberStage::default();
        let mut cursor = SpanCursor::new(b"12.".as_slice());
        assert_eq!(
            read_number(&mut cursor, &mut acc, false, &mut stage),
            NumberOutcome::Need(1)
        );
        assert!(cursor.at_end());
        let mut cursor = SpanCursor::new(b"75,".as_slice());
        assert_eq!(
            read_number(&mut cursor, &mut acc, false, &mut stage),
            NumberOutcome::Finished
        );
        assert!((acc.as_f64() - 12.75).abs() < f64::EPSILON);
        assert_eq!(cursor.peek(), Some(b','));
    }

    #[test]
    fn malformed_sequences_consume_to_delimiter() {
        for bad in ["12x4,", "-,", "1.e,", "1e+,", "12..5,"] {
            let mut acc = NumberAcc::default();
            let mut stage = NumberStage::default();
            let mut cursor = SpanCursor::new(bad.as_bytes());
            assert_eq!(
                read_number(&mut cursor, &mut acc, true, &mut stage),
                NumberOutcome::Malformed,
                "expected malformed for {bad}"
            );
            assert_eq!(cursor.peek(), Some(b','), "cursor should rest at delimiter for {bad}");
        }
    }

    #[test]
    fn dangling_tokens_report_insufficiency() {
        // A literal cut off where a digit is still required is structural
        // incompleteness, not a malformed literal; the driver turns the
        // outstanding need into a truncation error on a final block.
        for bad in ["-", "3.", "2e", "2e+"] {
            let (_, outcome) = parse(bad);
            assert_eq!(outcome, NumberOutcome::Need(1), "for {bad}");
        }
    }
}
