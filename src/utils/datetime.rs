//! PDF and XMP date utilities
//!
//! PDF metadata encodes dates as `D:YYYYMMDDHHmmSSOHH'mm'`, XMP packets use an
//! ISO 8601 subset. Both are turned into `chrono` values here.

use crate::core::error::{XmpError, XmpResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Marker at the start of every PDF date stamp
const PDF_DATE_MARKER: &str = "D:";

/// Width of the `YYYYMMDDHHmmSS` segment after the marker
const STAMP_DIGITS: usize = 14;

/// Parse a fixed-width PDF date stamp such as `D:19861200000000`.
///
/// The 14 digits after the `D:` marker are read as `YYYYMMDDHHmmSS`; anything
/// after them (a timezone suffix) is ignored. A day of `00` is read as the
/// first of the month.
///
/// # Errors
///
/// [`XmpError::FormatError`] if the marker is missing, the segment is short or
/// not numeric, or the fields do not form a real date and time.
///
/// # Example
///
/// ```rust
/// use xmpdict::parse_date;
///
/// let dt = parse_date("D:20240115103000+01'00'")?;
/// assert_eq!(dt.to_string(), "2024-01-15 10:30:00");
/// # Ok::<(), xmpdict::XmpError>(())
/// ```
pub fn parse_date(stamp: &str) -> XmpResult<NaiveDateTime> {
    let digits = stamp.strip_prefix(PDF_DATE_MARKER).ok_or_else(|| {
        XmpError::FormatError(format!("Date stamp '{}' does not start with 'D:'", stamp))
    })?;

    let mut cursor = Cursor::new(digits.as_bytes());
    let fields = (
        cursor.digits(4),
        cursor.digits(2),
        cursor.digits(2),
        cursor.digits(2),
        cursor.digits(2),
        cursor.digits(2),
    );
    let (Some(year), Some(month), Some(day), Some(hour), Some(minute), Some(second)) = fields
    else {
        return Err(XmpError::FormatError(format!(
            "Date stamp '{}' needs {} digits after 'D:'",
            stamp, STAMP_DIGITS
        )));
    };

    build_datetime(year as i32, month, day, hour, minute, second)
}

/// Full PDF date with an optional UTC offset
///
/// Accepts the whole grammar `D:YYYY[MM[DD[HH[mm[SS]]]]][Z|(+|-)HH['mm[']]]`.
/// The `D:` marker is optional; omitted month and day default to 1, omitted
/// time fields to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfDate {
    /// Wall-clock date and time as written
    pub datetime: NaiveDateTime,
    /// Offset from UTC, if the stamp carries one (`Z` is a zero offset)
    pub offset: Option<FixedOffset>,
}

impl PdfDate {
    /// Parse a PDF date string
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmpdict::PdfDate;
    ///
    /// let date = PdfDate::parse("D:20240615153000-05'00'")?;
    /// assert_eq!(date.to_datetime().to_rfc3339(), "2024-06-15T15:30:00-05:00");
    /// # Ok::<(), xmpdict::XmpError>(())
    /// ```
    pub fn parse(stamp: &str) -> XmpResult<Self> {
        let body = stamp.trim();
        let body = body.strip_prefix(PDF_DATE_MARKER).unwrap_or(body);
        let mut cursor = Cursor::new(body.as_bytes());
        let invalid = || XmpError::FormatError(format!("Invalid PDF date '{}'", stamp));

        let year = cursor.digits(4).ok_or_else(invalid)?;
        let mut fields = [1u32, 1, 0, 0, 0];
        for field in fields.iter_mut() {
            if !cursor.peek_digit() {
                break;
            }
            *field = cursor.digits(2).ok_or_else(invalid)?;
        }
        let [month, day, hour, minute, second] = fields;
        let datetime = build_datetime(year as i32, month, day, hour, minute, second)?;

        let offset = Self::parse_offset(&mut cursor).ok_or_else(invalid)?;
        if !cursor.is_empty() {
            return Err(invalid());
        }

        Ok(Self { datetime, offset })
    }

    /// Parse the `Z` / `+HH'mm'` suffix; `Some(None)` when there is none.
    fn parse_offset(cursor: &mut Cursor<'_>) -> Option<Option<FixedOffset>> {
        let sign = match cursor.bump() {
            None => return Some(None),
            Some(b'Z') | Some(b'z') => {
                // Some writers emit Z00'00'
                if cursor.peek_digit() {
                    cursor.digits(2)?;
                    cursor.eat(b'\'');
                    cursor.digits(2)?;
                    cursor.eat(b'\'');
                }
                return FixedOffset::east_opt(0).map(Some);
            }
            Some(b'+') => 1,
            Some(b'-') => -1,
            Some(_) => return None,
        };

        let hours = cursor.digits(2)?;
        cursor.eat(b'\'');
        let minutes = if cursor.peek_digit() {
            let minutes = cursor.digits(2)?;
            cursor.eat(b'\'');
            minutes
        } else {
            0
        };
        if hours > 23 || minutes > 59 {
            return None;
        }
        let seconds = (hours * 3600 + minutes * 60) as i32;
        FixedOffset::east_opt(sign * seconds).map(Some)
    }

    /// Convert to an offset-aware timestamp, treating a missing offset as UTC
    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        let offset = self.offset.unwrap_or_else(|| Utc.fix());
        offset
            .from_local_datetime(&self.datetime)
            .single()
            .unwrap_or_else(|| offset.from_utc_datetime(&self.datetime))
    }
}

impl FromStr for PdfDate {
    type Err = XmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PdfDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D:{}", self.datetime.format("%Y%m%d%H%M%S"))?;
        match self.offset.map(|o| o.local_minus_utc()) {
            None => Ok(()),
            Some(0) => write!(f, "Z"),
            Some(secs) => {
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                write!(f, "{}{:02}'{:02}'", sign, secs / 3600, (secs % 3600) / 60)
            }
        }
    }
}

/// Parse a date-valued metadata property.
///
/// PDF stamps (`D:...`) go through [`PdfDate`]. Anything else is read as an
/// XMP date: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, optionally followed by
/// `Thh:mm[:ss[.s+]]` and a `Z` or `+hh:mm` zone. The zone is dropped and the
/// wall-clock time is returned as written.
pub fn parse_xmp_date(value: &str) -> XmpResult<NaiveDateTime> {
    let value = value.trim();
    if value.starts_with(PDF_DATE_MARKER) {
        return PdfDate::parse(value).map(|d| d.datetime);
    }
    let invalid = || XmpError::FormatError(format!("Invalid XMP date '{}'", value));

    let (date_part, time_part) = match value.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    };

    let mut parts = date_part.split('-');
    let year: i32 = parts
        .next()
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse().ok())
        .ok_or_else(invalid)?;
    let mut month_day = [1u32, 1];
    for field in month_day.iter_mut() {
        if let Some(part) = parts.next() {
            *field = part
                .parse()
                .ok()
                .filter(|_| part.len() == 2)
                .ok_or_else(invalid)?;
        }
    }
    if parts.next().is_some() {
        return Err(invalid());
    }
    let date = NaiveDate::from_ymd_opt(year, month_day[0], month_day[1]).ok_or_else(invalid)?;

    let time = match time_part {
        None => NaiveTime::MIN,
        Some(time) => {
            let time = strip_zone(time);
            ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())
                .ok_or_else(invalid)?
        }
    };

    Ok(NaiveDateTime::new(date, time))
}

/// Remove a trailing `Z` or `+hh:mm` / `-hh:mm` from an ISO time
fn strip_zone(time: &str) -> &str {
    if let Some(stripped) = time.strip_suffix(['Z', 'z']) {
        return stripped;
    }
    match time.rfind(['+', '-']) {
        Some(pos) => &time[..pos],
        None => time,
    }
}

/// Validate calendar fields and assemble a timestamp.
///
/// A day of 0 stands for the first of the month.
fn build_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> XmpResult<NaiveDateTime> {
    let day = if day == 0 { 1 } else { day };
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        XmpError::FormatError(format!(
            "Invalid calendar date {:04}-{:02}-{:02}",
            year, month, day
        ))
    })?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        XmpError::FormatError(format!(
            "Invalid time of day {:02}:{:02}:{:02}",
            hour, minute, second
        ))
    })?;
    Ok(NaiveDateTime::new(date, time))
}

/// Byte cursor over an ASCII date string
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Read exactly `n` ASCII digits as a number
    fn digits(&mut self, n: usize) -> Option<u32> {
        let field = self.bytes.get(self.pos..self.pos + n)?;
        if !field.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.pos += n;
        Some(
            field
                .iter()
                .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')),
        )
    }

    fn peek_digit(&self) -> bool {
        self.bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit())
    }

    fn bump(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// Consume `expected` if it is next
    fn eat(&mut self, expected: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_date_fixed_width() {
        assert_eq!(
            parse_date("D:20231224183059").unwrap(),
            naive(2023, 12, 24, 18, 30, 59)
        );
    }

    #[test]
    fn test_parse_date_day_zero_is_first_of_month() {
        assert_eq!(
            parse_date("D:19861200000000").unwrap(),
            naive(1986, 12, 1, 0, 0, 0)
        );
    }

    #[test]
    fn test_parse_date_ignores_zone_suffix() {
        assert_eq!(
            parse_date("D:20240101120000+00'00'").unwrap(),
            naive(2024, 1, 1, 12, 0, 0)
        );
    }

    #[test]
    fn test_parse_date_rejects_bad_fields() {
        for stamp in [
            "D:20231301000000", // month 13
            "D:20230001000000", // month 0
            "D:20230132000000", // day 32
            "D:20230230000000", // Feb 30
            "D:20230101250000", // hour 25
            "D:20230101006000", // minute 60
            "D:2023010100000",  // short
            "D:2023O101000000", // letter O
            "20230101000000",   // no marker
            "",
        ] {
            assert!(
                matches!(parse_date(stamp), Err(XmpError::FormatError(_))),
                "{} should be rejected",
                stamp
            );
        }
    }

    #[test]
    fn test_pdf_date_partial_fields() {
        let date = PdfDate::parse("D:2024").unwrap();
        assert_eq!(date.datetime, naive(2024, 1, 1, 0, 0, 0));
        assert_eq!(date.offset, None);

        let date = PdfDate::parse("202406151530").unwrap();
        assert_eq!(date.datetime, naive(2024, 6, 15, 15, 30, 0));
    }

    #[test]
    fn test_pdf_date_offsets() {
        let date = PdfDate::parse("D:20240615153000-05'00'").unwrap();
        assert_eq!(date.offset, FixedOffset::west_opt(5 * 3600));

        let date = PdfDate::parse("D:20240615153000+0530").unwrap();
        assert_eq!(date.offset, FixedOffset::east_opt(5 * 3600 + 30 * 60));

        let date = PdfDate::parse("D:20240615153000Z").unwrap();
        assert_eq!(date.offset, FixedOffset::east_opt(0));

        let date = PdfDate::parse("D:20240615153000Z00'00'").unwrap();
        assert_eq!(date.offset, FixedOffset::east_opt(0));

        let date = PdfDate::parse("D:20240615153000+02").unwrap();
        assert_eq!(date.offset, FixedOffset::east_opt(2 * 3600));
    }

    #[test]
    fn test_pdf_date_rejects_garbage() {
        assert!(PdfDate::parse("D:20").is_err());
        assert!(PdfDate::parse("D:2024061").is_err());
        assert!(PdfDate::parse("D:20240615153000+25'00'").is_err());
        assert!(PdfDate::parse("D:20240615153000 junk").is_err());
    }

    #[test]
    fn test_pdf_date_to_datetime() {
        let date: PdfDate = "D:20240101120000+01'00'".parse().unwrap();
        assert_eq!(date.to_datetime().to_rfc3339(), "2024-01-01T12:00:00+01:00");

        let date: PdfDate = "D:20240101120000".parse().unwrap();
        assert_eq!(date.to_datetime().to_rfc3339(), "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_pdf_date_display() {
        let date = PdfDate::parse("D:20240615153000-05'30'").unwrap();
        assert_eq!(date.to_string(), "D:20240615153000-05'30'");

        let date = PdfDate::parse("D:2024").unwrap();
        assert_eq!(date.to_string(), "D:20240101000000");
    }

    #[test]
    fn test_parse_xmp_date_iso() {
        let cases = [
            ("2023", naive(2023, 1, 1, 0, 0, 0)),
            ("2023-12", naive(2023, 12, 1, 0, 0, 0)),
            ("2023-12-25", naive(2023, 12, 25, 0, 0, 0)),
            ("2023-12-25T10:30", naive(2023, 12, 25, 10, 30, 0)),
            ("2023-12-25T10:30:00Z", naive(2023, 12, 25, 10, 30, 0)),
            ("2006-04-25T15:32:01+02:00", naive(2006, 4, 25, 15, 32, 1)),
            ("2006-04-27T15:38:36.655-07:00", naive(2006, 4, 27, 15, 38, 36)),
            ("D:19861200000000", naive(1986, 12, 1, 0, 0, 0)),
        ];
        for (input, expected) in cases {
            let parsed = parse_xmp_date(input).unwrap();
            assert_eq!(
                parsed.date(),
                expected.date(),
                "date mismatch for {}",
                input
            );
            assert_eq!(
                parsed.format("%H:%M:%S").to_string(),
                expected.format("%H:%M:%S").to_string(),
                "time mismatch for {}",
                input
            );
        }
    }

    #[test]
    fn test_parse_xmp_date_rejects_garbage() {
        for input in ["", "yesterday", "2023-13-01", "2023-1-01", "2023-12-25T25:00"] {
            assert!(
                matches!(parse_xmp_date(input), Err(XmpError::FormatError(_))),
                "{} should be rejected",
                input
            );
        }
    }
}
