//! Parse civil date time strings like `YYYY-MM-DD HH:mm:ss.sss`.
//!
//! The entry point is [`parse`], which reads a date time string into a [`Civil`]: the wall-clock
//! date and time, plus the UTC offset when the string carries one. A string without an offset does
//! not denote an instant on its own; it must be placed in a timezone first.
//!
//! # Examples
//! ```
//! # use civil::parse::parse;
//! let local = parse(b"2024-07-15 15:00").unwrap();
//! assert_eq!(local.datetime.to_string(), "2024-07-15 15:00:00");
//! assert_eq!(local.pinned(), None);
//!
//! let utc = parse(b"2025-02-18T12:30:45Z").unwrap();
//! assert_eq!(utc.pinned().map(|t| t.timestamp()), Some(1739881845));
//! ```

use core::str::FromStr;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// Error type for parsing civil date time strings.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ParseError {
	/// Expected a year, but it was missing or malformed.
	#[error("Year missing or malformed")]
	MissingYear,
	/// Expected a month, but it was missing or malformed.
	#[error("Month missing or malformed")]
	MissingMonth,
	/// The supplied month was outside of [1, 12].
	#[error("Month out of range")]
	MonthOutOfRange,
	/// Expected a day, but it was missing or malformed.
	#[error("Day missing or malformed")]
	MissingDay,
	/// The supplied day does not exist in the given month and year.
	#[error("Day out of range")]
	DayOutOfRange,
	/// Expected hours, but it was missing or malformed.
	#[error("Hours missing or malformed")]
	MissingHours,
	/// The supplied hour was outside of [0, 23].
	#[error("Hours out of range")]
	HoursOutOfRange,
	/// Hour was supplied but minutes were missing.
	#[error("Minutes missing or malformed")]
	MissingMinutes,
	/// The supplied minutes were outside of [0, 59].
	#[error("Minutes out of range")]
	MinutesOutOfRange,
	/// Expected seconds, but it was missing or malformed.
	#[error("Seconds missing or malformed")]
	MissingSeconds,
	/// The supplied seconds were outside of [0, 59].
	#[error("Seconds out of range")]
	SecondsOutOfRange,
	/// Expected milliseconds, but it was missing or malformed.
	#[error("Milliseconds missing or malformed")]
	MissingMilliseconds,
	/// Found unexpected bytes after a valid date time string.
	#[error("Unexpected input in date time string")]
	UnexpectedInput,
	/// The date time is well formed but cannot be represented as an instant.
	#[error("Date time out of range")]
	OutOfRange
}

/// A parsed civil date time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Civil {
	/// The wall-clock date and time as written.
	pub datetime: NaiveDateTime,
	/// The UTC offset written after the time, if any. `Z` parses as a zero offset.
	pub offset: Option<FixedOffset>
}

impl Civil {
	/// The instant this civil time denotes, if the string pinned it with an explicit offset.
	pub fn pinned(&self) -> Option<DateTime<Utc>> {
		self.offset
			.and_then(|o| o.from_local_datetime(&self.datetime).single())
			.map(|t| t.with_timezone(&Utc))
	}
}

impl FromStr for Civil {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s.as_bytes())
	}
}

/// Parse a fixed-length, unsigned decimal number from the front of `bytes`.
///
/// Returns the remaining bytes and the value, or `e` if fewer than `N` digits are present.
fn number<const N: usize>(bytes: &[u8], e: ParseError) -> Result<(&[u8], u32), ParseError> {
	// Four digits always fit
	const { assert!(N < 5); }

	let Some(digits) = bytes.get(..N) else {
		return Err(e);
	};

	let mut r: u32 = 0;
	for &b in digits {
		match b {
			b'0'..=b'9' => r = r * 10 + (b - b'0') as u32,
			_ => return Err(e)
		}
	}

	Ok((&bytes[N..], r))
}

/// Consume one separator byte, which must be one of `separators`.
///
/// Returns `Ok(None)` at the end of input.
fn separator<'a>(bytes: &'a [u8], separators: &[u8]) -> Result<Option<&'a [u8]>, ParseError> {
	match bytes.split_first() {
		None => Ok(None),
		Some((b, rest)) if separators.contains(b) => Ok(Some(rest)),
		Some(_) => Err(ParseError::UnexpectedInput)
	}
}

/// Fields collected while parsing, defaulting to the start of the year.
struct Fields {
	year: u32,
	month: u32,
	day: u32,
	hour: u32,
	minute: u32,
	second: u32,
	milli: u32
}

impl Fields {
	fn new(year: u32) -> Fields {
		Fields { year, month: 1, day: 1, hour: 0, minute: 0, second: 0, milli: 0 }
	}

	fn finish(self, offset: Option<FixedOffset>) -> Result<Civil, ParseError> {
		let date = NaiveDate::from_ymd_opt(self.year as i32, self.month, self.day)
			.ok_or(ParseError::DayOutOfRange)?;
		let time = NaiveTime::from_hms_milli_opt(self.hour, self.minute, self.second, self.milli)
			.ok_or(ParseError::OutOfRange)?;
		Ok(Civil { datetime: date.and_time(time), offset })
	}
}

/// Parse the optional trailing UTC offset: `Z`, `+HH:mm` or `-HH:mm`, optionally after one space.
fn offset(bytes: &[u8]) -> Result<Option<FixedOffset>, ParseError> {
	if bytes.is_empty() {
		return Ok(None);
	}

	let bytes = match bytes.split_first() {
		Some((b' ', rest)) => rest,
		_ => bytes
	};
	let (sign, rest) = match bytes.split_first() {
		Some((b'Z', rest)) => {
			return if rest.is_empty() {
				Ok(FixedOffset::east_opt(0))
			} else {
				Err(ParseError::UnexpectedInput)
			}
		},
		Some((b'+', rest)) => (1, rest),
		Some((b'-', rest)) => (-1, rest),
		_ => return Err(ParseError::UnexpectedInput)
	};

	let (rest, hours) = number::<2>(rest, ParseError::MissingHours)?;
	if hours > 23 {
		return Err(ParseError::HoursOutOfRange);
	}
	let rest = match rest.split_first() {
		Some((b':', rest)) => rest,
		_ => return Err(ParseError::MissingMinutes)
	};
	let (rest, minutes) = number::<2>(rest, ParseError::MissingMinutes)?;
	if minutes > 59 {
		return Err(ParseError::MinutesOutOfRange);
	}
	if !rest.is_empty() {
		return Err(ParseError::UnexpectedInput);
	}

	FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
		.map(Some)
		.ok_or(ParseError::HoursOutOfRange)
}

/// Parse a civil date time string.
///
/// The accepted forms follow the Javascript date time string format described [here], with a few
/// relaxations:
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
/// - `YYYY-MM-DDTHH:mm`, `YYYY-MM-DDTHH:mm:ss` and `YYYY-MM-DDTHH:mm:ss.sss`, where the `T` may be
///   a space
/// - any of the forms with a time followed by `Z`, `+HH:mm` or `-HH:mm`, optionally preceded by a
///   space
///
/// Omitted fields default to the start of the enclosing period. Extended years and `24:00:00` are
/// not supported.
///
/// [here]: https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Date#date_time_string_format
///
/// # Errors
///
/// Returns [`ParseError`] if the input is malformed, names a day that does not exist, or has
/// trailing bytes after a valid date time.
///
/// # Examples
/// ```
/// # use civil::parse::{parse, ParseError};
/// assert_eq!(parse(b"2025-02").unwrap().datetime.to_string(), "2025-02-01 00:00:00");
/// assert_eq!(parse(b"2025-02-29"), Err(ParseError::DayOutOfRange));
/// ```
pub fn parse(bytes: &[u8]) -> Result<Civil, ParseError> {
	let (rest, year) = number::<4>(bytes, ParseError::MissingYear)?;
	let mut fields = Fields::new(year);

	let Some(rest) = separator(rest, b"-")? else {
		return fields.finish(None);
	};
	let (rest, month) = number::<2>(rest, ParseError::MissingMonth)?;
	if !(1..=12).contains(&month) {
		return Err(ParseError::MonthOutOfRange);
	}
	fields.month = month;

	let Some(rest) = separator(rest, b"-")? else {
		return fields.finish(None);
	};
	let (rest, day) = number::<2>(rest, ParseError::MissingDay)?;
	fields.day = day;

	let Some(rest) = separator(rest, b"T ")? else {
		return fields.finish(None);
	};
	let (rest, hour) = number::<2>(rest, ParseError::MissingHours)?;
	if hour > 23 {
		return Err(ParseError::HoursOutOfRange);
	}
	fields.hour = hour;

	// Minutes are required once hours are given
	let rest = match rest.split_first() {
		Some((b':', rest)) => rest,
		Some(_) => return Err(ParseError::UnexpectedInput),
		None => return Err(ParseError::MissingMinutes)
	};
	let (mut rest, minute) = number::<2>(rest, ParseError::MissingMinutes)?;
	if minute > 59 {
		return Err(ParseError::MinutesOutOfRange);
	}
	fields.minute = minute;

	if let Some((b':', after)) = rest.split_first() {
		let (after, second) = number::<2>(after, ParseError::MissingSeconds)?;
		if second > 59 {
			return Err(ParseError::SecondsOutOfRange);
		}
		fields.second = second;
		rest = after;

		if let Some((b'.', after)) = rest.split_first() {
			let (after, milli) = number::<3>(after, ParseError::MissingMilliseconds)?;
			fields.milli = milli;
			rest = after;
		}
	}

	let offset = offset(rest)?;
	fields.finish(offset)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn naive(s: &str) -> Result<String, ParseError> {
		parse(s.as_bytes()).map(|c| c.datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
	}

	fn epoch(s: &str) -> Option<i64> {
		parse(s.as_bytes()).ok().and_then(|c| c.pinned()).map(|t| t.timestamp())
	}

	#[test]
	fn parse_fields_test() {
		// Year only
		assert_eq!(naive("2025"), Ok(String::from("2025-01-01 00:00:00.000")));
		assert_eq!(naive("2025 "), Err(ParseError::UnexpectedInput));

		// Year-Month
		assert_eq!(naive("2025-"), Err(ParseError::MissingMonth));
		assert_eq!(naive("2025-2"), Err(ParseError::MissingMonth));
		assert_eq!(naive("2025-02"), Ok(String::from("2025-02-01 00:00:00.000")));
		assert_eq!(naive("2025-25"), Err(ParseError::MonthOutOfRange));
		assert_eq!(naive("2025-00"), Err(ParseError::MonthOutOfRange));

		// Year-Month-Day
		assert_eq!(naive("2025-02-"), Err(ParseError::MissingDay));
		assert_eq!(naive("2025-02-1"), Err(ParseError::MissingDay));
		assert_eq!(naive("2025-02-18"), Ok(String::from("2025-02-18 00:00:00.000")));
		assert_eq!(naive("2025-02-29"), Err(ParseError::DayOutOfRange));
		assert_eq!(naive("2024-02-29"), Ok(String::from("2024-02-29 00:00:00.000")));
		assert_eq!(naive("2025-04-31"), Err(ParseError::DayOutOfRange));
		assert_eq!(naive("2025-04-00"), Err(ParseError::DayOutOfRange));

		// Date + time
		assert_eq!(naive("2025-02-18T"), Err(ParseError::MissingHours));
		assert_eq!(naive("2025-02-18T12"), Err(ParseError::MissingMinutes));
		assert_eq!(naive("2025-02-18T12:"), Err(ParseError::MissingMinutes));
		assert_eq!(naive("2025-02-18T12:30"), Ok(String::from("2025-02-18 12:30:00.000")));
		assert_eq!(naive("2025-02-18 12:30"), Ok(String::from("2025-02-18 12:30:00.000")));
		assert_eq!(naive("2025-02-18T24:00"), Err(ParseError::HoursOutOfRange));
		assert_eq!(naive("2025-02-18T12:60"), Err(ParseError::MinutesOutOfRange));
		assert_eq!(naive("2025-02-18T12:30:"), Err(ParseError::MissingSeconds));
		assert_eq!(naive("2025-02-18 12:30:45"), Ok(String::from("2025-02-18 12:30:45.000")));
		assert_eq!(naive("2025-02-18T12:30:60"), Err(ParseError::SecondsOutOfRange));
		assert_eq!(naive("2025-02-18T12:30:45."), Err(ParseError::MissingMilliseconds));
		assert_eq!(naive("2025-02-18T12:30:45.123"), Ok(String::from("2025-02-18 12:30:45.123")));

		// Invalid formats
		assert_eq!(naive(""), Err(ParseError::MissingYear));
		assert_eq!(naive("202X-01-01"), Err(ParseError::MissingYear));
		assert_eq!(naive("2025/01/01"), Err(ParseError::UnexpectedInput));
	}

	#[test]
	fn parse_offset_test() {
		assert_eq!(parse(b"2025-02-18 12:30:45").unwrap().offset, None);
		assert_eq!(epoch("2025-02-18 12:30:45"), None);

		assert_eq!(epoch("2025-02-18T12:30:45Z"), Some(1739881845));
		assert_eq!(epoch("2025-02-18T12:30:45+01:00"), Some(1739878245));
		assert_eq!(epoch("2025-02-18T12:30:45-01:00"), Some(1739885445));
		assert_eq!(epoch("2025-02-18 12:30:45 Z"), Some(1739881845));
		assert_eq!(epoch("2025-02-18 12:30:45 +01:00"), Some(1739878245));
		assert_eq!(epoch("2025-02-18 12:30:45 -01:00"), Some(1739885445));
		assert_eq!(epoch("2025-02-18T12:30+05:30"), Some(1739862000));

		assert_eq!(naive("2025-02-18T12:30:45+24:00"), Err(ParseError::HoursOutOfRange));
		assert_eq!(naive("2025-02-18T12:30:45+01:60"), Err(ParseError::MinutesOutOfRange));
		assert_eq!(naive("2025-02-18T12:30:45+"), Err(ParseError::MissingHours));
		assert_eq!(naive("2025-02-18T12:30:45+01"), Err(ParseError::MissingMinutes));
		assert_eq!(naive("2025-02-18T12:30:45Zinvalid"), Err(ParseError::UnexpectedInput));
		assert_eq!(naive("2025-02-18T12:30:45 "), Err(ParseError::UnexpectedInput));
	}

	#[test]
	fn from_str_test() {
		let civil: Civil = "2024-07-15 15:00:00".parse().unwrap();
		assert_eq!(civil.datetime.to_string(), "2024-07-15 15:00:00");
		assert_eq!("July 15".parse::<Civil>(), Err(ParseError::MissingYear));
	}

	#[test]
	fn error_message_test() {
		let e: Box<dyn std::error::Error> = Box::new(ParseError::DayOutOfRange);
		assert_eq!(e.to_string(), "Day out of range");
		assert_eq!(ParseError::MissingYear.to_string(), "Year missing or malformed");
		assert_eq!(ParseError::UnexpectedInput.to_string(), "Unexpected input in date time string");
	}
}
