//! Resolve user-supplied identifiers to canonical zone ids.
//!
//! An identifier is resolved in two steps. If the provider recognises it as a zone id, it is used
//! unchanged; zone ids are case sensitive, so `america/new_york` does not pass this step. Otherwise
//! it is upper-cased and looked up in the combined alias table of every region. Place names are a
//! separate, region-scoped lookup that never falls back to aliases.

use civil::Clock;
use serde::Serialize;
use tracing::debug;
use crate::error::Error;
use crate::provider::Provider;
use crate::region::{Region, RegionDirectory};
use crate::snapshot::{SnapshotBuilder, TemporalSnapshot};

/// One alias of a region, with the current time in its zone.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionZone {
	pub abbreviation: &'static str,
	pub timezone: &'static str,
	pub current_time: TemporalSnapshot
}

/// Resolves identifiers against a [`RegionDirectory`] and a [`Provider`].
pub struct AliasResolver<'a, P: ?Sized> {
	directory: &'a RegionDirectory,
	provider: &'a P
}

impl<'a, P: Provider + ?Sized> AliasResolver<'a, P> {
	pub fn new(directory: &'a RegionDirectory, provider: &'a P) -> AliasResolver<'a, P> {
		AliasResolver { directory, provider }
	}

	/// Resolve a zone id or alias to a canonical zone id.
	///
	/// # Errors
	///
	/// Returns [`Error::UnknownZone`] if `identifier` is neither a zone id nor an alias.
	///
	/// # Examples
	///
	/// ```
	/// # use zones::{AliasResolver, RegionDirectory, Tzdb};
	/// let directory = RegionDirectory::new();
	/// let resolver = AliasResolver::new(&directory, &Tzdb);
	/// assert_eq!(resolver.resolve("pst").unwrap(), "America/Los_Angeles");
	/// assert_eq!(resolver.resolve("Europe/Paris").unwrap(), "Europe/Paris");
	/// ```
	pub fn resolve(&self, identifier: &str) -> Result<String, Error> {
		if self.provider.is_valid_zone(identifier) {
			return Ok(identifier.to_string());
		}

		match self.directory.alias(&identifier.to_ascii_uppercase()) {
			Some(alias) => {
				debug!(identifier, zone = alias.zone, region = alias.region.code(), "resolved alias");
				Ok(alias.zone.to_string())
			},
			None => Err(Error::UnknownZone(identifier.to_string()))
		}
	}

	/// Look up a place (state, territory, province or city) within a region.
	///
	/// The region code is case insensitive, the place name is not.
	///
	/// # Errors
	///
	/// Returns [`Error::UnsupportedRegion`] for an unknown region code, or [`Error::PlaceNotFound`]
	/// if the region has no such place.
	pub fn resolve_place(&self, place: &str, region: &str) -> Result<&'static str, Error> {
		let region: Region = region.parse()?;
		self.directory.place(region, place)
			.ok_or_else(|| Error::PlaceNotFound { place: place.to_string(), region })
	}

	/// Every alias of a region, in table order, with the current time in each zone.
	///
	/// # Errors
	///
	/// Returns [`Error::UnsupportedRegion`] for an unknown region code, or [`Error::InvalidZone`] if
	/// the provider rejects a zone in the region's table.
	pub fn list_region<C: Clock + ?Sized>(
		&self,
		region: &str,
		snapshots: &SnapshotBuilder<'_, P, C>
	) -> Result<Vec<RegionZone>, Error> {
		let region: Region = region.parse()?;
		region.aliases()
			.iter()
			.map(|&(abbreviation, timezone)| {
				snapshots.current(timezone)
					.map(|current_time| RegionZone { abbreviation, timezone, current_time })
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::DateTime;
	use civil::FixedClock;
	use crate::provider::Tzdb;

	#[test]
	fn resolve_test() {
		let directory = RegionDirectory::new();
		let resolver = AliasResolver::new(&directory, &Tzdb);

		// Canonical ids pass through
		for zone in ["America/New_York", "Australia/Sydney", "Asia/Ho_Chi_Minh", "UTC"] {
			assert_eq!(resolver.resolve(zone), Ok(zone.to_string()));
		}

		// Aliases in any case
		assert_eq!(resolver.resolve("PST"), Ok(String::from("America/Los_Angeles")));
		assert_eq!(resolver.resolve("pst"), resolver.resolve("PST"));
		assert_eq!(resolver.resolve("aest"), Ok(String::from("Australia/Sydney")));
		assert_eq!(resolver.resolve("Ict"), Ok(String::from("Asia/Ho_Chi_Minh")));
		assert_eq!(resolver.resolve("est_ca"), Ok(String::from("America/Toronto")));

		// EST is also a zone id in its own right, which takes precedence
		assert_eq!(resolver.resolve("EST"), Ok(String::from("EST")));
		assert_eq!(resolver.resolve("est"), Ok(String::from("America/New_York")));

		assert_eq!(
			resolver.resolve("Invalid/Timezone"),
			Err(Error::UnknownZone(String::from("Invalid/Timezone")))
		);
		assert_eq!(resolver.resolve("XYZ"), Err(Error::UnknownZone(String::from("XYZ"))));
		assert_eq!(resolver.resolve(""), Err(Error::UnknownZone(String::new())));
	}

	#[test]
	fn resolve_place_test() {
		let directory = RegionDirectory::new();
		let resolver = AliasResolver::new(&directory, &Tzdb);

		assert_eq!(resolver.resolve_place("California", "US"), Ok("America/Los_Angeles"));
		assert_eq!(resolver.resolve_place("California", "us"), Ok("America/Los_Angeles"));
		assert_eq!(resolver.resolve_place("Ontario", "CA"), Ok("America/Toronto"));
		assert_eq!(resolver.resolve_place("Hanoi", "VN"), Ok("Asia/Ho_Chi_Minh"));
		assert_eq!(resolver.resolve_place("Queensland", "AU"), Ok("Australia/Brisbane"));

		assert_eq!(
			resolver.resolve_place("Invalid State", "US"),
			Err(Error::PlaceNotFound { place: String::from("Invalid State"), region: Region::US })
		);
		assert_eq!(
			resolver.resolve_place("california", "US"),
			Err(Error::PlaceNotFound { place: String::from("california"), region: Region::US })
		);
		assert_eq!(
			resolver.resolve_place("California", "XX"),
			Err(Error::UnsupportedRegion(String::from("XX")))
		);
	}

	#[test]
	fn list_region_test() {
		let directory = RegionDirectory::new();
		let resolver = AliasResolver::new(&directory, &Tzdb);
		let clock = FixedClock(DateTime::from_timestamp(1723433665, 0).unwrap());
		let snapshots = SnapshotBuilder::new(&Tzdb, &clock);

		let us = resolver.list_region("us", &snapshots).unwrap();
		assert_eq!(us.len(), Region::US.aliases().len());
		assert_eq!(us[0].abbreviation, "EST");
		assert_eq!(us[0].timezone, "America/New_York");
		assert_eq!(us[0].current_time.local_time, "2024-08-11T23:34:25-04:00");
		assert!(us.iter().all(|z| z.current_time.timestamp == 1723433665000));

		let vn = resolver.list_region("VN", &snapshots).unwrap();
		assert_eq!(vn.len(), 1);
		assert_eq!(vn[0].current_time.offset_minutes, 420);

		assert_eq!(
			resolver.list_region("XX", &snapshots),
			Err(Error::UnsupportedRegion(String::from("XX")))
		);
	}
}
