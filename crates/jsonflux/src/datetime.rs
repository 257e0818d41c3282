//! ISO-8601 date-time parsing straight off input spans.
//!
//! Literal layout: `YYYY-MM-DD[THH:MM:SS[.fraction]][Z|±HH:MM]`. Parsing is
//! fixed-position digit extraction with explicit separator checks; nothing
//! is allocated and no general-purpose calendar machinery is involved.
//! Malformed input is a `None` verdict, never an error.

use core::fmt;

use crate::unit::CodeUnit;

/// Ticks are 100 ns, the resolution of a seven-digit fraction.
pub const TICKS_PER_SECOND: i64 = 10_000_000;
/// Ticks in one minute.
pub const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
/// Ticks in one hour.
pub const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;
/// Ticks in one day.
pub const TICKS_PER_DAY: i64 = TICKS_PER_HOUR * 24;

/// Cumulative days before each month, common years.
const DAYS_TO_MONTH_365: [i64; 13] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];
/// Cumulative days before each month, leap years.
const DAYS_TO_MONTH_366: [i64; 13] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// An absolute wall-clock reading with an explicit zone offset.
///
/// `ticks` counts 100 ns intervals from 0001-01-01T00:00:00 in the reading's
/// own zone; the offset is carried separately, so `+05:30` keeps the same
/// clock face as its UTC equivalent. Two readings compare equal only when
/// both the clock reading and the offset agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    ticks: i64,
    offset_minutes: i32,
}

impl DateTime {
    /// Builds a value from a raw tick count and zone offset.
    #[must_use]
    pub const fn from_ticks(ticks: i64, offset_minutes: i32) -> Self {
        Self {
            ticks,
            offset_minutes,
        }
    }

    /// The wall-clock tick count in the reading's own zone.
    #[must_use]
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// The zone offset in minutes east of UTC.
    #[must_use]
    pub const fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// The tick count normalized to UTC.
    #[must_use]
    pub const fn utc_ticks(&self) -> i64 {
        self.ticks - self.offset_minutes as i64 * TICKS_PER_MINUTE
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i64 {
        self.date_parts().0
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub fn month(&self) -> u8 {
        self.date_parts().1
    }

    /// Calendar day of month, 1-31.
    #[must_use]
    pub fn day(&self) -> u8 {
        self.date_parts().2
    }

    /// Hour of day, 0-23.
    #[must_use]
    pub fn hour(&self) -> u8 {
        u8::try_from(self.ticks / TICKS_PER_HOUR % 24).unwrap_or(0)
    }

    /// Minute, 0-59.
    #[must_use]
    pub fn minute(&self) -> u8 {
        u8::try_from(self.ticks / TICKS_PER_MINUTE % 60).unwrap_or(0)
    }

    /// Second, 0-59.
    #[must_use]
    pub fn second(&self) -> u8 {
        u8::try_from(self.ticks / TICKS_PER_SECOND % 60).unwrap_or(0)
    }

    /// Sub-second ticks, 0..10^7.
    #[must_use]
    pub fn fraction_ticks(&self) -> i64 {
        self.ticks % TICKS_PER_SECOND
    }

    /// Inverts the day count back into calendar year, month and day.
    fn date_parts(&self) -> (i64, u8, u8) {
        let mut n = self.ticks / TICKS_PER_DAY;
        let y400 = n / 146_097;
        n -= y400 * 146_097;
        let mut y100 = n / 36_524;
        if y100 == 4 {
            y100 = 3;
        }
        n -= y100 * 36_524;
        let y4 = n / 1_461;
        n -= y4 * 1_461;
        let mut y1 = n / 365;
        if y1 == 4 {
            y1 = 3;
        }
        n -= y1 * 365;
        let year = y400 * 400 + y100 * 100 + y4 * 4 + y1 + 1;
        let table = if is_leap_year(year) {
            &DAYS_TO_MONTH_366
        } else {
            &DAYS_TO_MONTH_365
        };
        let mut month = 1usize;
        while table[month] <= n {
            month += 1;
        }
        let day = n - table[month - 1] + 1;
        (
            year,
            u8::try_from(month).unwrap_or(0),
            u8::try_from(day).unwrap_or(0),
        )
    }

    /// Parses an ISO-8601 literal from a UTF-8 byte span.
    #[must_use]
    pub fn parse_bytes(span: &[u8]) -> Option<Self> {
        parse_units(span)
    }

    /// Parses an ISO-8601 literal from a character span.
    ///
    /// Produces bit-identical results to [`DateTime::parse_bytes`] for the
    /// same textual input.
    #[must_use]
    pub fn parse_chars(span: &[char]) -> Option<Self> {
        parse_units(span)
    }

    /// Parses an ISO-8601 literal from text.
    #[must_use]
    pub fn parse_str(text: &str) -> Option<Self> {
        parse_units(text.as_bytes())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.date_parts();
        write!(
            f,
            "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )?;
        let fraction = self.fraction_ticks();
        if fraction != 0 {
            let digits = format!("{fraction:07}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        if self.offset_minutes == 0 {
            write!(f, "Z")
        } else {
            let sign = if self.offset_minutes < 0 { '-' } else { '+' };
            let magnitude = self.offset_minutes.abs();
            write!(f, "{sign}{:02}:{:02}", magnitude / 60, magnitude % 60)
        }
    }
}

/// Proleptic Gregorian leap-year test.
#[must_use]
pub fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days from 0001-01-01 to the given date.
fn day_count(year: i64, month: i64, day: i64, table: &[i64; 13]) -> i64 {
    let y = year - 1;
    365 * y + y / 4 - y / 100 + y / 400 + table[usize::try_from(month - 1).unwrap_or(0)] + day - 1
}

fn digit<U: CodeUnit>(span: &[U], index: usize) -> Option<i64> {
    match span.get(index)?.as_ascii() {
        Some(b @ b'0'..=b'9') => Some(i64::from(b - b'0')),
        _ => None,
    }
}

fn sep<U: CodeUnit>(span: &[U], index: usize, which: u8) -> bool {
    span.get(index).is_some_and(|unit| unit.is(which))
}

fn parse_units<U: CodeUnit>(span: &[U]) -> Option<DateTime> {
    if span.len() < 10 {
        return None;
    }
    let year = digit(span, 0)? * 1000 + digit(span, 1)? * 100 + digit(span, 2)? * 10
        + digit(span, 3)?;
    if !sep(span, 4, b'-') {
        return None;
    }
    let month = digit(span, 5)? * 10 + digit(span, 6)?;
    if !sep(span, 7, b'-') {
        return None;
    }
    let day = digit(span, 8)? * 10 + digit(span, 9)?;
    if year == 0 || !(1..=12).contains(&month) {
        return None;
    }
    let table = if is_leap_year(year) {
        &DAYS_TO_MONTH_366
    } else {
        &DAYS_TO_MONTH_365
    };
    let month_index = usize::try_from(month).ok()?;
    let days_in_month = table[month_index] - table[month_index - 1];
    if !(1..=days_in_month).contains(&day) {
        return None;
    }

    let mut ticks = day_count(year, month, day, table) * TICKS_PER_DAY;
    let mut index = 10;

    if span.len() > 10 {
        if !sep(span, 10, b'T') || span.len() < 19 {
            return None;
        }
        let hour = digit(span, 11)? * 10 + digit(span, 12)?;
        if !sep(span, 13, b':') {
            return None;
        }
        let minute = digit(span, 14)? * 10 + digit(span, 15)?;
        if !sep(span, 16, b':') {
            return None;
        }
        let second = digit(span, 17)? * 10 + digit(span, 18)?;
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        ticks += hour * TICKS_PER_HOUR + minute * TICKS_PER_MINUTE + second * TICKS_PER_SECOND;
        index = 19;

        if sep(span, index, b'.') {
            index += 1;
            let mut fraction = 0i64;
            let mut count = 0u32;
            while let Some(d) = digit(span, index) {
                // Digits beyond tick resolution are consumed and dropped.
                if count < 7 {
                    fraction = fraction * 10 + d;
                    count += 1;
                }
                index += 1;
            }
            if count == 0 {
                return None;
            }
            while count < 7 {
                fraction *= 10;
                count += 1;
            }
            ticks += fraction;
        }
    }

    let offset_minutes = if index == span.len() {
        0
    } else if sep(span, index, b'Z') {
        if index + 1 != span.len() {
            return None;
        }
        0
    } else {
        let sign: i64 = if sep(span, index, b'+') {
            1
        } else if sep(span, index, b'-') {
            -1
        } else {
            return None;
        };
        if span.len() != index + 6 {
            return None;
        }
        let offset_hour = digit(span, index + 1)? * 10 + digit(span, index + 2)?;
        if !sep(span, index + 3, b':') {
            return None;
        }
        let offset_minute = digit(span, index + 4)? * 10 + digit(span, index + 5)?;
        if offset_hour > 23 || offset_minute > 59 {
            return None;
        }
        i32::try_from(sign * (offset_hour * 60 + offset_minute)).ok()?
    };

    Some(DateTime {
        ticks,
        offset_minutes,
    })
}
