//! The [`Zones`] facade: identifier resolution plus every query, behind one value.

use civil::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::alias::{AliasResolver, RegionZone};
use crate::business::{BusinessCalculator, BusinessStatus, BusinessWindow, NextBusiness};
use crate::dst::{DstFinder, DstWindow};
use crate::error::Error;
use crate::provider::{Provider, Tzdb};
use crate::region::{Region, RegionDirectory};
use crate::snapshot::{ConversionResult, SnapshotBuilder, TemporalSnapshot, TimeInput};

/// A place within a region, with the current time there.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceZone {
	pub place: String,
	pub region: Region,
	pub timezone: &'static str,
	pub current_time: TemporalSnapshot
}

/// One entry of a comparison: the zone's snapshot, or why it could not be produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Compared {
	Snapshot(TemporalSnapshot),
	Failed {
		timezone: String,
		error: String
	}
}

/// One conversion of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
	pub date_time: TimeInput,
	pub from_timezone: String,
	pub to_timezone: String
}

/// The outcome of one [`ConversionRequest`], tagged with its position in the batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchItem {
	pub index: usize,
	#[serde(flatten)]
	pub outcome: BatchOutcome
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
	Converted {
		result: ConversionResult
	},
	Failed {
		error: String,
		input: ConversionRequest
	}
}

/// Timezone queries over a region directory, a zone database and a clock.
///
/// Every operation that takes a zone accepts either a canonical zone id or an alias, and resolves
/// it before doing anything else.
///
/// # Examples
///
/// ```
/// # use zones::{Zones, FixedClock};
/// # use chrono::DateTime;
/// let zones = Zones::with_clock(FixedClock(DateTime::from_timestamp(1723433665, 0).unwrap()));
/// let now = zones.current_snapshot("pst").unwrap();
/// assert_eq!(now.timezone, "America/Los_Angeles");
/// assert_eq!(now.local_time, "2024-08-11T20:34:25-07:00");
/// ```
#[derive(Debug)]
pub struct Zones<P = Tzdb, C = SystemClock> {
	directory: RegionDirectory,
	provider: P,
	clock: C
}

impl Zones {
	/// The built-in regions, the IANA database and the system clock.
	pub fn new() -> Zones {
		Zones::with_clock(SystemClock)
	}
}

impl Default for Zones {
	fn default() -> Self {
		Zones::new()
	}
}

impl<C: Clock> Zones<Tzdb, C> {
	/// The built-in regions and the IANA database, with a custom clock.
	pub fn with_clock(clock: C) -> Zones<Tzdb, C> {
		Zones::with_parts(RegionDirectory::new(), Tzdb, clock)
	}
}

impl<P: Provider, C: Clock> Zones<P, C> {
	pub fn with_parts(directory: RegionDirectory, provider: P, clock: C) -> Zones<P, C> {
		Zones { directory, provider, clock }
	}

	pub fn resolver(&self) -> AliasResolver<'_, P> {
		AliasResolver::new(&self.directory, &self.provider)
	}

	pub fn snapshots(&self) -> SnapshotBuilder<'_, P, C> {
		SnapshotBuilder::new(&self.provider, &self.clock)
	}

	pub fn dst_finder(&self) -> DstFinder<'_, P, C> {
		DstFinder::new(&self.provider, &self.clock)
	}

	pub fn business(&self) -> BusinessCalculator<'_, P, C> {
		BusinessCalculator::new(&self.provider, &self.clock)
	}

	/// See [`AliasResolver::resolve`].
	pub fn resolve(&self, identifier: &str) -> Result<String, Error> {
		self.resolver().resolve(identifier)
	}

	/// See [`AliasResolver::list_region`].
	pub fn list_region(&self, region: &str) -> Result<Vec<RegionZone>, Error> {
		self.resolver().list_region(region, &self.snapshots())
	}

	/// See [`AliasResolver::resolve_place`].
	pub fn resolve_place(&self, place: &str, region: &str) -> Result<&'static str, Error> {
		self.resolver().resolve_place(place, region)
	}

	/// Resolve a place and report the current time there.
	pub fn place(&self, place: &str, region: &str) -> Result<PlaceZone, Error> {
		let timezone = self.resolve_place(place, region)?;
		Ok(PlaceZone {
			place: place.to_string(),
			region: region.parse()?,
			timezone,
			current_time: self.snapshots().current(timezone)?
		})
	}

	/// The current time in `zone`.
	pub fn current_snapshot(&self, zone: &str) -> Result<TemporalSnapshot, Error> {
		self.snapshots().current(&self.resolve(zone)?)
	}

	/// Convert a time from one zone to another. See [`SnapshotBuilder::convert`].
	pub fn convert(&self, input: &TimeInput, from: &str, to: &str) -> Result<ConversionResult, Error> {
		let from = self.resolve(from)?;
		let to = self.resolve(to)?;
		self.snapshots().convert(input, &from, &to)
	}

	/// See [`DstFinder::window`].
	pub fn dst_info(&self, zone: &str, year: Option<i32>) -> Result<DstWindow, Error> {
		self.dst_finder().window(&self.resolve(zone)?, year)
	}

	/// See [`BusinessCalculator::status`].
	pub fn business_status(
		&self,
		zone: &str,
		window: &BusinessWindow
	) -> Result<BusinessStatus, Error> {
		self.business().status(&self.resolve(zone)?, window)
	}

	/// See [`BusinessCalculator::next`].
	pub fn next_business_instant(
		&self,
		zone: &str,
		window: &BusinessWindow
	) -> Result<NextBusiness, Error> {
		self.business().next(&self.resolve(zone)?, window)
	}

	/// The current time in each of `zones`. A zone that fails does not fail the others.
	pub fn compare<S: AsRef<str>>(&self, zones: &[S]) -> Vec<Compared> {
		zones.iter()
			.map(|zone| {
				let zone = zone.as_ref().trim();
				match self.current_snapshot(zone) {
					Ok(snapshot) => Compared::Snapshot(snapshot),
					Err(e) => {
						debug!(zone, error = %e, "comparison entry failed");
						Compared::Failed { timezone: zone.to_string(), error: e.to_string() }
					}
				}
			})
			.collect()
	}

	/// Run each conversion independently. A conversion that fails does not fail the others.
	pub fn batch_convert(&self, requests: &[ConversionRequest]) -> Vec<BatchItem> {
		requests.iter()
			.enumerate()
			.map(|(index, request)| {
				let result = self.convert(
					&request.date_time,
					&request.from_timezone,
					&request.to_timezone
				);
				let outcome = match result {
					Ok(result) => BatchOutcome::Converted { result },
					Err(e) => BatchOutcome::Failed { error: e.to_string(), input: request.clone() }
				};
				BatchItem { index, outcome }
			})
			.collect()
	}
}
