//! The time zone database contract, and its implementation on the IANA database.
//!
//! The rest of this crate never computes offsets itself. It asks a [`Provider`] three things:
//! whether a zone id exists, what the offset (and DST flag, and abbreviation) is at an instant, and
//! which instant a wall-clock time denotes in a zone. [`Tzdb`] answers them from the database
//! compiled into `chrono-tz`.

use chrono::{Datelike, DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono::Utc;
use chrono::offset::LocalResult;
use chrono_tz::{OffsetName, Tz};
use tracing::trace;
use crate::error::Error;

/// Timezone information at an instant.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneOffset {
	/// The UTC offset in seconds, added to UTC to get local time
	pub seconds: i32,
	/// Whether daylight saving time is in effect: the offset is ahead of the smaller of the
	/// zone's January 1 and July 1 offsets that year
	pub is_dst: bool,
	/// The abbreviation in effect, e.g. `EDT`, or a numeric form like `+07` where the database has
	/// none
	pub abbreviation: String
}

impl ZoneOffset {
	/// The UTC offset in whole minutes.
	pub fn minutes(&self) -> i32 {
		self.seconds / 60
	}

	/// The offset as a [`FixedOffset`].
	pub fn fixed(&self) -> Option<FixedOffset> {
		FixedOffset::east_opt(self.seconds)
	}
}

/// A time zone database.
pub trait Provider {
	/// Whether `zone` is a zone id known to this database. Case sensitive.
	fn is_valid_zone(&self, zone: &str) -> bool;

	/// The offset in effect in `zone` at `instant`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if `zone` is not known.
	fn offset_at(&self, zone: &str, instant: DateTime<Utc>) -> Result<ZoneOffset, Error>;

	/// The instant at which the wall clock in `zone` reads `civil`.
	///
	/// Wall-clock times skipped by a forward transition are shifted forward by the length of the
	/// gap. Wall-clock times repeated by a backward transition resolve to the earlier instant.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if `zone` is not known, or [`Error::InvalidDateTime`] if the
	/// result is not representable.
	fn from_civil(&self, zone: &str, civil: NaiveDateTime) -> Result<DateTime<Utc>, Error>;

	/// Parse a civil date time string and place it in `zone`.
	///
	/// Strings with an explicit offset (`Z`, `+HH:mm`) denote that instant regardless of `zone`,
	/// though `zone` must still be valid.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidDateTime`] if `input` is not a valid date time string, or
	/// [`Error::InvalidZone`] if `zone` is not known.
	fn parse_civil(&self, zone: &str, input: &str) -> Result<DateTime<Utc>, Error> {
		let parsed = civil::parse(input.trim().as_bytes())
			.map_err(|source| Error::InvalidDateTime { input: input.to_string(), source })?;
		match parsed.pinned() {
			Some(instant) => {
				if !self.is_valid_zone(zone) {
					return Err(Error::InvalidZone(zone.to_string()));
				}
				Ok(instant)
			},
			None => self.from_civil(zone, parsed.datetime)
		}
	}

	/// The wall-clock date and time in `zone` at `instant`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if `zone` is not known.
	fn local_at(&self, zone: &str, instant: DateTime<Utc>) -> Result<NaiveDateTime, Error> {
		let offset = self.offset_at(zone, instant)?;
		let fixed = offset.fixed().ok_or_else(|| Error::InvalidZone(zone.to_string()))?;
		Ok(instant.with_timezone(&fixed).naive_local())
	}
}

impl<P: Provider + ?Sized> Provider for &P {
	fn is_valid_zone(&self, zone: &str) -> bool {
		(**self).is_valid_zone(zone)
	}

	fn offset_at(&self, zone: &str, instant: DateTime<Utc>) -> Result<ZoneOffset, Error> {
		(**self).offset_at(zone, instant)
	}

	fn from_civil(&self, zone: &str, civil: NaiveDateTime) -> Result<DateTime<Utc>, Error> {
		(**self).from_civil(zone, civil)
	}
}

/// The IANA time zone database, as compiled into `chrono-tz`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tzdb;

impl Tzdb {
	fn zone(&self, zone: &str) -> Result<Tz, Error> {
		zone.parse::<Tz>().map_err(|_| Error::InvalidZone(zone.to_string()))
	}
}

/// The standard offset of `tz` in `year`, in seconds: the smaller of its offsets on January 1
/// and July 1.
///
/// Not the database's DST component: Europe/Dublin records winter time as a negative DST offset.
fn standard_seconds(tz: Tz, year: i32) -> Option<i32> {
	[1, 7].into_iter()
		.filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
		.map(|date| tz.offset_from_utc_date(&date).fix().local_minus_utc())
		.min()
}

/// Render an offset in seconds as `+HH:MM`.
pub(crate) fn format_offset(seconds: i32) -> String {
	let sign = if seconds < 0 { '-' } else { '+' };
	let minutes = seconds.unsigned_abs() / 60;
	format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

impl Provider for Tzdb {
	fn is_valid_zone(&self, zone: &str) -> bool {
		zone.parse::<Tz>().is_ok()
	}

	fn offset_at(&self, zone: &str, instant: DateTime<Utc>) -> Result<ZoneOffset, Error> {
		let tz = self.zone(zone)?;
		let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
		let seconds = offset.fix().local_minus_utc();
		Ok(ZoneOffset {
			seconds,
			is_dst: standard_seconds(tz, instant.year()).is_some_and(|s| seconds > s),
			abbreviation: offset.abbreviation()
				.map(String::from)
				.unwrap_or_else(|| format_offset(seconds))
		})
	}

	fn from_civil(&self, zone: &str, civil: NaiveDateTime) -> Result<DateTime<Utc>, Error> {
		let tz = self.zone(zone)?;
		match tz.from_local_datetime(&civil) {
			LocalResult::Single(t) => Ok(t.with_timezone(&Utc)),
			LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
			LocalResult::None => {
				// Skipped by a forward transition, read it with the offset from before the gap
				let before = civil.checked_sub_signed(TimeDelta::days(1))
					.map(|t| tz.offset_from_utc_datetime(&t).fix().local_minus_utc())
					.ok_or_else(|| Error::out_of_range(civil))?;
				trace!(zone, %civil, before, "civil time falls in a gap");
				civil.checked_sub_signed(TimeDelta::seconds(before as i64))
					.map(|t| t.and_utc())
					.ok_or_else(|| Error::out_of_range(civil))
			}
		}
	}
}
