//! Business hours: whether a zone is open now, and when it next opens.
//!
//! A [`BusinessWindow`] is a daily range of whole hours, `[start, end)`, on a set of work days. All
//! of it is read in the zone's local time: a window of 9 to 17 in `America/New_York` means 9:00 to
//! 17:00 on New York's wall clock, whatever its offset that day.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use civil::Clock;
use serde::Serialize;
use serde::ser::Serializer;
use tracing::trace;
use crate::error::Error;
use crate::provider::Provider;
use crate::snapshot::{SnapshotBuilder, TemporalSnapshot};

/// Weekdays indexed from Sunday, matching the bit order of [`WorkDays`].
const SUNDAY_FIRST: [Weekday; 7] = [
	Weekday::Sun,
	Weekday::Mon,
	Weekday::Tue,
	Weekday::Wed,
	Weekday::Thu,
	Weekday::Fri,
	Weekday::Sat
];

/// The English name of a weekday.
pub fn day_name(day: Weekday) -> &'static str {
	match day {
		Weekday::Sun => "Sunday",
		Weekday::Mon => "Monday",
		Weekday::Tue => "Tuesday",
		Weekday::Wed => "Wednesday",
		Weekday::Thu => "Thursday",
		Weekday::Fri => "Friday",
		Weekday::Sat => "Saturday"
	}
}

/// A set of weekdays. Bit `i` is set when the day with index `i` is included, where 0 is Sunday and
/// 6 is Saturday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkDays(u8);

impl WorkDays {
	/// No days.
	pub const NONE: WorkDays = WorkDays(0);
	/// Monday through Friday.
	pub const WEEKDAYS: WorkDays = WorkDays(0b0011_1110);

	/// Build a set from day indices, 0 (Sunday) through 6 (Saturday).
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidBusinessWindow`] if an index is greater than 6.
	pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Result<WorkDays, Error> {
		let mut days = WorkDays::NONE;
		for i in indices {
			let day = SUNDAY_FIRST.get(i as usize)
				.ok_or(Error::InvalidBusinessWindow("work day index must be in [0, 6]"))?;
			days.insert(*day);
		}
		Ok(days)
	}

	pub fn insert(&mut self, day: Weekday) {
		self.0 |= 1 << day.num_days_from_sunday();
	}

	pub fn contains(self, day: Weekday) -> bool {
		self.0 & (1 << day.num_days_from_sunday()) != 0
	}

	pub fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// The included days, Sunday first.
	pub fn iter(self) -> impl Iterator<Item = Weekday> {
		SUNDAY_FIRST.into_iter().filter(move |&d| self.contains(d))
	}
}

impl Default for WorkDays {
	fn default() -> Self {
		WorkDays::WEEKDAYS
	}
}

impl FromIterator<Weekday> for WorkDays {
	fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
		let mut days = WorkDays::NONE;
		iter.into_iter().for_each(|d| days.insert(d));
		days
	}
}

/// Serialized as a list of day names.
impl Serialize for WorkDays {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.iter().map(day_name))
	}
}

/// Validated business hours configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessWindow {
	start_hour: u32,
	end_hour: u32,
	work_days: WorkDays
}

impl BusinessWindow {
	/// Open from `start_hour:00` until `end_hour:00` local time on each of `work_days`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidBusinessWindow`] unless `start_hour` is in [0, 23], `end_hour` is in
	/// [1, 24], `start_hour < end_hour`, and `work_days` is not empty.
	///
	/// # Examples
	///
	/// ```
	/// # use zones::{BusinessWindow, WorkDays};
	/// assert!(BusinessWindow::new(8, 20, WorkDays::WEEKDAYS).is_ok());
	/// assert!(BusinessWindow::new(17, 9, WorkDays::WEEKDAYS).is_err());
	/// assert!(BusinessWindow::new(9, 17, WorkDays::NONE).is_err());
	/// ```
	pub fn new(start_hour: u32, end_hour: u32, work_days: WorkDays) -> Result<BusinessWindow, Error> {
		if start_hour > 23 {
			return Err(Error::InvalidBusinessWindow("start hour must be in [0, 23]"));
		}
		if end_hour == 0 || end_hour > 24 {
			return Err(Error::InvalidBusinessWindow("end hour must be in [1, 24]"));
		}
		if start_hour >= end_hour {
			return Err(Error::InvalidBusinessWindow("start hour must be before end hour"));
		}
		if work_days.is_empty() {
			return Err(Error::InvalidBusinessWindow("at least one work day is required"));
		}
		Ok(BusinessWindow { start_hour, end_hour, work_days })
	}

	pub fn start_hour(&self) -> u32 {
		self.start_hour
	}

	pub fn end_hour(&self) -> u32 {
		self.end_hour
	}

	pub fn work_days(&self) -> WorkDays {
		self.work_days
	}

	/// Whether the window is open at local time `local`.
	pub fn is_open(&self, local: NaiveDateTime) -> bool {
		self.work_days.contains(local.weekday())
			&& (self.start_hour..self.end_hour).contains(&local.hour())
	}

	fn opening(&self) -> Result<NaiveTime, Error> {
		NaiveTime::from_hms_opt(self.start_hour, 0, 0)
			.ok_or(Error::InvalidBusinessWindow("start hour must be in [0, 23]"))
	}
}

/// Nine to five, Monday through Friday.
impl Default for BusinessWindow {
	fn default() -> Self {
		BusinessWindow { start_hour: 9, end_hour: 17, work_days: WorkDays::WEEKDAYS }
	}
}

/// Time remaining until an instant, in whole minutes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
	pub days: i64,
	pub hours: i64,
	pub minutes: i64,
	pub total_minutes: i64
}

impl Countdown {
	/// The whole minutes from `from` to `to`, rounded down, split into 24 hour days, hours and
	/// minutes. Zero if `to` is not after `from`.
	pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Countdown {
		let total = (to - from).num_minutes().max(0);
		Countdown {
			days: total / 1440,
			hours: total % 1440 / 60,
			minutes: total % 60,
			total_minutes: total
		}
	}
}

/// Business hours state of a zone at the current instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStatus {
	pub timezone: String,
	pub current_time: TemporalSnapshot,
	pub is_work_day: bool,
	pub is_business_hours: bool,
	pub business_hours: BusinessWindow,
	pub next_business_hour: TemporalSnapshot,
	pub time_until: Countdown
}

/// The next time a zone is open for business.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextBusiness {
	pub timezone: String,
	pub current_time: TemporalSnapshot,
	pub next_business_hour: TemporalSnapshot,
	pub time_until: Countdown
}

/// Evaluates [`BusinessWindow`]s in a zone.
pub struct BusinessCalculator<'a, P: ?Sized, C: ?Sized> {
	provider: &'a P,
	clock: &'a C
}

impl<'a, P: Provider + ?Sized, C: Clock + ?Sized> BusinessCalculator<'a, P, C> {
	pub fn new(provider: &'a P, clock: &'a C) -> BusinessCalculator<'a, P, C> {
		BusinessCalculator { provider, clock }
	}

	/// Whether `zone` is in business hours now, and when it next is.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn status(&self, zone: &str, window: &BusinessWindow) -> Result<BusinessStatus, Error> {
		let now = self.clock.now();
		let local = self.provider.local_at(zone, now)?;
		let next = self.next_from(zone, window, now)?;
		Ok(BusinessStatus {
			timezone: next.timezone,
			current_time: next.current_time,
			is_work_day: window.work_days.contains(local.weekday()),
			is_business_hours: window.is_open(local),
			business_hours: *window,
			next_business_hour: next.next_business_hour,
			time_until: next.time_until
		})
	}

	/// The next business instant in `zone`, with the countdown to it.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn next(&self, zone: &str, window: &BusinessWindow) -> Result<NextBusiness, Error> {
		self.next_from(zone, window, self.clock.now())
	}

	fn next_from(
		&self,
		zone: &str,
		window: &BusinessWindow,
		now: DateTime<Utc>
	) -> Result<NextBusiness, Error> {
		let snapshots = SnapshotBuilder::new(self.provider, self.clock);
		let next = self.next_after(zone, window, now)?;
		Ok(NextBusiness {
			timezone: zone.to_string(),
			current_time: snapshots.at(zone, now)?,
			next_business_hour: snapshots.at(zone, next)?,
			time_until: Countdown::between(now, next)
		})
	}

	/// The next business instant in `zone` from the clock's current instant.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn next_instant(&self, zone: &str, window: &BusinessWindow) -> Result<DateTime<Utc>, Error> {
		self.next_after(zone, window, self.clock.now())
	}

	/// The first instant at or after `now` that falls within business hours in `zone`.
	///
	/// If the window is open at `now`, that is `now`. If today is a work day that has not opened
	/// yet, it is today's opening. Otherwise it is the opening of the next work day.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn next_after(
		&self,
		zone: &str,
		window: &BusinessWindow,
		now: DateTime<Utc>
	) -> Result<DateTime<Utc>, Error> {
		let local = self.provider.local_at(zone, now)?;
		if window.is_open(local) {
			return Ok(now);
		}

		let opening = window.opening()?;
		let mut date = local.date();
		if window.work_days.contains(date.weekday()) && local.hour() < window.start_hour {
			return self.provider.from_civil(zone, date.and_time(opening));
		}

		for _ in 0..7 {
			date = date.succ_opt().ok_or_else(|| Error::out_of_range(date))?;
			if window.work_days.contains(date.weekday()) {
				trace!(zone, %date, "next work day");
				return self.provider.from_civil(zone, date.and_time(opening));
			}
		}

		Err(Error::InvalidBusinessWindow("at least one work day is required"))
	}
}
