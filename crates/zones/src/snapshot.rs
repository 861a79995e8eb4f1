//! Point-in-time views of a zone, and conversion of one instant between two zones.

use core::fmt;
use core::str::FromStr;
use chrono::{DateTime, Utc};
use civil::{Clock, ParseError};
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::provider::Provider;

/// One absolute instant as seen from one zone.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalSnapshot {
	/// Canonical zone id
	pub timezone: String,
	/// Local date and time with offset, `YYYY-MM-DDTHH:MM:SS±HH:MM`
	pub local_time: String,
	/// UTC date and time, `YYYY-MM-DDTHH:MM:SSZ`
	pub utc_time: String,
	/// Milliseconds since the Unix epoch
	pub timestamp: i64,
	#[serde(rename = "isDST")]
	pub is_dst: bool,
	/// Signed UTC offset in minutes
	pub offset_minutes: i32,
	pub abbreviation: String,
	#[serde(skip)]
	pub instant: DateTime<Utc>
}

/// A time to convert: either a civil date time string or milliseconds since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeInput {
	Epoch(i64),
	Civil(String)
}

impl FromStr for TimeInput {
	type Err = Error;

	/// `@` followed by an integer is an epoch value in milliseconds, anything else is a civil
	/// string. Civil strings are not validated until they are placed in a zone.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.strip_prefix('@') {
			Some(millis) => millis.parse::<i64>()
				.map(TimeInput::Epoch)
				.map_err(|_| Error::InvalidDateTime {
					input: s.to_string(),
					source: ParseError::UnexpectedInput
				}),
			None => Ok(TimeInput::Civil(s.to_string()))
		}
	}
}

impl fmt::Display for TimeInput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TimeInput::Epoch(millis) => write!(f, "@{}", millis),
			TimeInput::Civil(s) => f.write_str(s)
		}
	}
}

/// The same instant in a source and a target zone.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
	pub source: TemporalSnapshot,
	pub target: TemporalSnapshot,
	/// Target epoch minus source epoch in milliseconds. Both sides share one instant, so this is
	/// always zero; see [`ConversionResult::offset_delta_minutes`] for the difference between the
	/// zones.
	pub time_difference: i64
}

impl ConversionResult {
	/// How far the target zone's clock is ahead of the source zone's at this instant.
	pub fn offset_delta_minutes(&self) -> i32 {
		self.target.offset_minutes - self.source.offset_minutes
	}
}

/// Builds [`TemporalSnapshot`]s from a provider and a clock.
///
/// All zone ids given to a builder must be canonical; resolving aliases is the caller's job.
pub struct SnapshotBuilder<'a, P: ?Sized, C: ?Sized> {
	provider: &'a P,
	clock: &'a C
}

impl<P: ?Sized, C: ?Sized> Clone for SnapshotBuilder<'_, P, C> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<P: ?Sized, C: ?Sized> Copy for SnapshotBuilder<'_, P, C> {}

impl<'a, P: Provider + ?Sized, C: Clock + ?Sized> SnapshotBuilder<'a, P, C> {
	pub fn new(provider: &'a P, clock: &'a C) -> SnapshotBuilder<'a, P, C> {
		SnapshotBuilder { provider, clock }
	}

	/// Snapshot of `instant` in `zone`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn at(&self, zone: &str, instant: DateTime<Utc>) -> Result<TemporalSnapshot, Error> {
		let offset = self.provider.offset_at(zone, instant)?;
		let fixed = offset.fixed().ok_or_else(|| Error::InvalidZone(zone.to_string()))?;
		Ok(TemporalSnapshot {
			timezone: zone.to_string(),
			local_time: instant.with_timezone(&fixed).format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
			utc_time: instant.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
			timestamp: instant.timestamp_millis(),
			is_dst: offset.is_dst,
			offset_minutes: offset.minutes(),
			abbreviation: offset.abbreviation,
			instant
		})
	}

	/// Snapshot of the clock's current instant in `zone`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn current(&self, zone: &str) -> Result<TemporalSnapshot, Error> {
		self.at(zone, self.clock.now())
	}

	/// The instant `input` denotes when read in `zone`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidDateTime`] for unparseable civil strings and epoch values outside
	/// the representable range, or [`Error::InvalidZone`] if the provider does not know `zone`.
	pub fn instant(&self, input: &TimeInput, zone: &str) -> Result<DateTime<Utc>, Error> {
		match input {
			TimeInput::Epoch(millis) => DateTime::from_timestamp_millis(*millis)
				.ok_or_else(|| Error::out_of_range(millis)),
			TimeInput::Civil(s) => self.provider.parse_civil(zone, s)
		}
	}

	/// Read `input` in zone `from` and render the resulting instant in both `from` and `to`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidDateTime`] if `input` cannot be read, or [`Error::InvalidZone`] if
	/// either zone is unknown to the provider.
	pub fn convert(&self, input: &TimeInput, from: &str, to: &str) -> Result<ConversionResult, Error> {
		let instant = self.instant(input, from)?;
		let source = self.at(from, instant)?;
		let target = self.at(to, instant)?;
		Ok(ConversionResult {
			time_difference: target.timestamp - source.timestamp,
			source,
			target
		})
	}
}
