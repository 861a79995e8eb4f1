//! Find daylight saving time transitions within a year.
//!
//! The provider only answers "is DST in effect at this instant", so transitions are found by
//! sampling:
//!
//! 1. Compare the DST flag at local midnight on the first of each month with the first of the next
//!    month. A difference marks the month as containing a transition.
//! 2. Within a marked month, compare local midnights of consecutive days to find the day of each
//!    flip.
//! 3. Bisect that day down to the second.
//!
//! A month whose first days on both sides agree is not scanned, so a zone that enters and leaves
//! DST within the same month is reported as having no transitions in that month.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use civil::Clock;
use serde::Serialize;
use tracing::{debug, trace};
use crate::error::Error;
use crate::provider::Provider;
use crate::snapshot::{SnapshotBuilder, TemporalSnapshot};

/// Whether a transition enters or leaves daylight saving time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Enter,
	Exit
}

/// A DST transition.
///
/// For [`Direction::Enter`] the snapshot is the first second of DST; for [`Direction::Exit`] it is
/// the last second of DST.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
	pub direction: Direction,
	#[serde(flatten)]
	pub at: TemporalSnapshot
}

/// DST transitions of one zone in one local calendar year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DstWindow {
	pub timezone: String,
	pub year: i32,
	#[serde(rename = "hasDST")]
	pub has_dst: bool,
	/// The first transition into DST within the year
	#[serde(rename = "dstStart")]
	pub start: Option<Transition>,
	/// The first transition out of DST within the year
	#[serde(rename = "dstEnd")]
	pub end: Option<Transition>,
	/// Whether DST is in effect now, regardless of `year`
	#[serde(rename = "currentlyDST")]
	pub currently_dst: bool,
	/// Every transition found, in order
	pub transitions: Vec<Transition>
}

/// Scans years for DST transitions.
pub struct DstFinder<'a, P: ?Sized, C: ?Sized> {
	provider: &'a P,
	clock: &'a C
}

impl<'a, P: Provider + ?Sized, C: Clock + ?Sized> DstFinder<'a, P, C> {
	pub fn new(provider: &'a P, clock: &'a C) -> DstFinder<'a, P, C> {
		DstFinder { provider, clock }
	}

	/// Find the DST transitions of `zone` in `year`, or in the current local year if `year` is
	/// `None`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`, or
	/// [`Error::InvalidDateTime`] if the year is outside the representable range.
	pub fn window(&self, zone: &str, year: Option<i32>) -> Result<DstWindow, Error> {
		let now = self.clock.now();
		let year = match year {
			Some(year) => year,
			None => self.provider.local_at(zone, now)?.year()
		};

		let snapshots = SnapshotBuilder::new(self.provider, self.clock);
		let mut transitions = Vec::new();
		for month in 1..=12 {
			let first = first_of_month(year, month)?;
			let next = first_of_month(year + (month / 12) as i32, month % 12 + 1)?;
			let before = self.is_dst(zone, self.midnight(zone, first)?)?;
			if before == self.is_dst(zone, self.midnight(zone, next)?)? {
				continue;
			}

			trace!(zone, year, month, "month contains a transition");
			for (direction, instant) in self.scan_month(zone, first)? {
				let at = snapshots.at(zone, instant)?;
				if self.provider.local_at(zone, instant)?.year() != year {
					debug!(zone, year, local = %at.local_time, "discarding transition outside year");
					continue;
				}
				transitions.push(Transition { direction, at });
			}
		}

		let first = |d: Direction| transitions.iter().find(|t| t.direction == d).cloned();
		let start = first(Direction::Enter);
		let end = first(Direction::Exit);
		Ok(DstWindow {
			timezone: zone.to_string(),
			year,
			has_dst: start.is_some() || end.is_some(),
			start,
			end,
			currently_dst: self.is_dst(zone, now)?,
			transitions
		})
	}

	fn is_dst(&self, zone: &str, instant: DateTime<Utc>) -> Result<bool, Error> {
		Ok(self.provider.offset_at(zone, instant)?.is_dst)
	}

	/// The instant of local midnight starting `date`.
	fn midnight(&self, zone: &str, date: NaiveDate) -> Result<DateTime<Utc>, Error> {
		self.provider.from_civil(zone, date.and_time(Default::default()))
	}

	/// Find every flip of the DST flag between local midnight on the first day of `month` and the
	/// following local midnight of each day in that month.
	fn scan_month(
		&self,
		zone: &str,
		month: NaiveDate
	) -> Result<Vec<(Direction, DateTime<Utc>)>, Error> {
		let mut found = Vec::new();
		let mut date = month;
		let mut lo = self.midnight(zone, date)?;
		let mut lo_dst = self.is_dst(zone, lo)?;

		while date.month() == month.month() {
			let next = date.succ_opt().ok_or_else(|| Error::out_of_range(date))?;
			let hi = self.midnight(zone, next)?;
			let hi_dst = self.is_dst(zone, hi)?;
			if lo_dst != hi_dst {
				let flip = self.bisect(zone, lo, hi, lo_dst)?;
				let transition = if hi_dst {
					(Direction::Enter, flip)
				} else {
					(Direction::Exit, flip - TimeDelta::seconds(1))
				};
				trace!(zone, %date, flip = %flip, "found transition");
				found.push(transition);
			}
			date = next;
			lo = hi;
			lo_dst = hi_dst;
		}

		Ok(found)
	}

	/// Find the first second in `(lo, hi]` at which the DST flag differs from `lo_dst`.
	///
	/// `lo` must have the flag `lo_dst` and `hi` must not.
	fn bisect(
		&self,
		zone: &str,
		lo: DateTime<Utc>,
		hi: DateTime<Utc>,
		lo_dst: bool
	) -> Result<DateTime<Utc>, Error> {
		let mut lo = lo.timestamp();
		let mut hi = hi.timestamp();
		while hi - lo > 1 {
			let mid = lo + (hi - lo) / 2;
			let instant = DateTime::from_timestamp(mid, 0).ok_or_else(|| Error::out_of_range(mid))?;
			if self.is_dst(zone, instant)? == lo_dst {
				lo = mid;
			} else {
				hi = mid;
			}
		}
		DateTime::from_timestamp(hi, 0).ok_or_else(|| Error::out_of_range(hi))
	}
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, Error> {
	NaiveDate::from_ymd_opt(year, month, 1)
		.ok_or_else(|| Error::out_of_range(format!("{:04}-{:02}-01", year, month)))
}
