//! Supported regions and their lookup tables.
//!
//! Each [`Region`] carries two static tables: aliases (short abbreviations such as `PST`) and
//! places (states, provinces, territories or cities), both mapping to canonical zone ids. The
//! [`RegionDirectory`] combines them into maps once, at construction, and is never mutated after.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use tracing::debug;
use crate::error::Error;

/// A region with its own alias and place tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
	/// United States.
	US,
	/// Australia.
	AU,
	/// Canada.
	CA,
	/// Vietnam.
	VN
}

const US_ALIASES: &[(&str, &str)] = &[
	("EST", "America/New_York"),
	("CST", "America/Chicago"),
	("MST", "America/Denver"),
	("PST", "America/Los_Angeles"),
	("AKST", "America/Anchorage"),
	("HST", "Pacific/Honolulu"),
	("EDT", "America/New_York"),
	("CDT", "America/Chicago"),
	("MDT", "America/Denver"),
	("PDT", "America/Los_Angeles"),
	("AKDT", "America/Anchorage"),
];

const AU_ALIASES: &[(&str, &str)] = &[
	("AEST", "Australia/Sydney"),
	("AEDT", "Australia/Sydney"),
	("ACST", "Australia/Adelaide"),
	("ACDT", "Australia/Adelaide"),
	("AWST", "Australia/Perth"),
	("AWDT", "Australia/Perth"),
	// Queensland and the Northern Territory do not observe DST
	("AEST_QLD", "Australia/Brisbane"),
	("ACST_NT", "Australia/Darwin"),
	("LHST", "Australia/Lord_Howe"),
	("LHDT", "Australia/Lord_Howe"),
];

const CA_ALIASES: &[(&str, &str)] = &[
	("NST", "America/St_Johns"),
	("NDT", "America/St_Johns"),
	("AST", "America/Halifax"),
	("ADT", "America/Halifax"),
	("EST_CA", "America/Toronto"),
	("EDT_CA", "America/Toronto"),
	("CST_CA", "America/Winnipeg"),
	("CDT_CA", "America/Winnipeg"),
	// Saskatchewan stays on CST all year
	("CST_SK", "America/Regina"),
	("MST_CA", "America/Edmonton"),
	("MDT_CA", "America/Edmonton"),
	("PST_CA", "America/Vancouver"),
	("PDT_CA", "America/Vancouver"),
];

const VN_ALIASES: &[(&str, &str)] = &[
	("ICT", "Asia/Ho_Chi_Minh"),
];

const US_PLACES: &[(&str, &str)] = &[
	("Alabama", "America/Chicago"),
	("Alaska", "America/Anchorage"),
	("Arizona", "America/Phoenix"),
	("Arkansas", "America/Chicago"),
	("California", "America/Los_Angeles"),
	("Colorado", "America/Denver"),
	("Connecticut", "America/New_York"),
	("Delaware", "America/New_York"),
	("Florida", "America/New_York"),
	("Georgia", "America/New_York"),
	("Hawaii", "Pacific/Honolulu"),
	("Idaho", "America/Denver"),
	("Illinois", "America/Chicago"),
	("Indiana", "America/New_York"),
	("Iowa", "America/Chicago"),
	("Kansas", "America/Chicago"),
	("Kentucky", "America/New_York"),
	("Louisiana", "America/Chicago"),
	("Maine", "America/New_York"),
	("Maryland", "America/New_York"),
	("Massachusetts", "America/New_York"),
	("Michigan", "America/New_York"),
	("Minnesota", "America/Chicago"),
	("Mississippi", "America/Chicago"),
	("Missouri", "America/Chicago"),
	("Montana", "America/Denver"),
	("Nebraska", "America/Chicago"),
	("Nevada", "America/Los_Angeles"),
	("New Hampshire", "America/New_York"),
	("New Jersey", "America/New_York"),
	("New Mexico", "America/Denver"),
	("New York", "America/New_York"),
	("North Carolina", "America/New_York"),
	("North Dakota", "America/Chicago"),
	("Ohio", "America/New_York"),
	("Oklahoma", "America/Chicago"),
	("Oregon", "America/Los_Angeles"),
	("Pennsylvania", "America/New_York"),
	("Rhode Island", "America/New_York"),
	("South Carolina", "America/New_York"),
	("South Dakota", "America/Chicago"),
	("Tennessee", "America/Chicago"),
	("Texas", "America/Chicago"),
	("Utah", "America/Denver"),
	("Vermont", "America/New_York"),
	("Virginia", "America/New_York"),
	("Washington", "America/Los_Angeles"),
	("West Virginia", "America/New_York"),
	("Wisconsin", "America/Chicago"),
	("Wyoming", "America/Denver"),
];

const AU_PLACES: &[(&str, &str)] = &[
	("New South Wales", "Australia/Sydney"),
	("Victoria", "Australia/Melbourne"),
	("Queensland", "Australia/Brisbane"),
	("Western Australia", "Australia/Perth"),
	("South Australia", "Australia/Adelaide"),
	("Tasmania", "Australia/Hobart"),
	("Northern Territory", "Australia/Darwin"),
	("Australian Capital Territory", "Australia/Sydney"),
];

const CA_PLACES: &[(&str, &str)] = &[
	("Ontario", "America/Toronto"),
	("Quebec", "America/Toronto"),
	("British Columbia", "America/Vancouver"),
	("Alberta", "America/Edmonton"),
	("Manitoba", "America/Winnipeg"),
	("Saskatchewan", "America/Regina"),
	("Nova Scotia", "America/Halifax"),
	("New Brunswick", "America/Moncton"),
	("Newfoundland and Labrador", "America/St_Johns"),
	("Prince Edward Island", "America/Halifax"),
	("Yukon", "America/Whitehorse"),
	("Northwest Territories", "America/Edmonton"),
	("Nunavut", "America/Iqaluit"),
];

const VN_PLACES: &[(&str, &str)] = &[
	("Hanoi", "Asia/Ho_Chi_Minh"),
	("Ho Chi Minh City", "Asia/Ho_Chi_Minh"),
	("Da Nang", "Asia/Ho_Chi_Minh"),
	("Hai Phong", "Asia/Ho_Chi_Minh"),
	("Can Tho", "Asia/Ho_Chi_Minh"),
	("Hue", "Asia/Ho_Chi_Minh"),
	("Nha Trang", "Asia/Ho_Chi_Minh"),
	("Da Lat", "Asia/Ho_Chi_Minh"),
];

impl Region {
	/// Every supported region, in lookup priority order.
	pub const ALL: [Region; 4] = [Region::US, Region::AU, Region::CA, Region::VN];

	/// The two-letter region code.
	pub fn code(self) -> &'static str {
		match self {
			Region::US => "US",
			Region::AU => "AU",
			Region::CA => "CA",
			Region::VN => "VN"
		}
	}

	/// The alias table as `(alias, zone id)` pairs, in display order.
	pub fn aliases(self) -> &'static [(&'static str, &'static str)] {
		match self {
			Region::US => US_ALIASES,
			Region::AU => AU_ALIASES,
			Region::CA => CA_ALIASES,
			Region::VN => VN_ALIASES
		}
	}

	/// The place table as `(place, zone id)` pairs.
	pub fn places(self) -> &'static [(&'static str, &'static str)] {
		match self {
			Region::US => US_PLACES,
			Region::AU => AU_PLACES,
			Region::CA => CA_PLACES,
			Region::VN => VN_PLACES
		}
	}
}

impl FromStr for Region {
	type Err = Error;

	/// Parse a region code, ignoring case.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"US" => Ok(Region::US),
			"AU" => Ok(Region::AU),
			"CA" => Ok(Region::CA),
			"VN" => Ok(Region::VN),
			_ => Err(Error::UnsupportedRegion(s.to_string()))
		}
	}
}

impl fmt::Display for Region {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// One alias table entry, tagged with the region that registered it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ZoneAlias {
	pub alias: &'static str,
	pub zone: &'static str,
	pub region: Region
}

/// Lookup maps for every supported region.
#[derive(Debug)]
pub struct RegionDirectory {
	/// Aliases across all regions, keyed by upper-case alias.
	aliases: HashMap<&'static str, ZoneAlias>,
	/// Place tables, per region.
	places: HashMap<Region, HashMap<&'static str, &'static str>>
}

impl RegionDirectory {
	/// Build the directory from the tables of [`Region::ALL`].
	pub fn new() -> RegionDirectory {
		let aliases = Region::ALL.iter().flat_map(|&region| {
			region.aliases().iter().map(move |&(alias, zone)| ZoneAlias { alias, zone, region })
		});
		let places = Region::ALL.iter().map(|&region| {
			(region, region.places().iter().copied().collect::<HashMap<_, _>>())
		});
		RegionDirectory::from_parts(aliases, places.collect())
	}

	/// Build a directory from explicit entries.
	///
	/// When the same alias appears more than once, the first entry wins.
	fn from_parts(
		entries: impl IntoIterator<Item = ZoneAlias>,
		places: HashMap<Region, HashMap<&'static str, &'static str>>
	) -> RegionDirectory {
		let mut aliases = HashMap::new();
		for entry in entries {
			let kept = aliases.entry(entry.alias).or_insert(entry);
			if kept.zone != entry.zone {
				debug!(
					alias = entry.alias,
					kept = kept.zone,
					shadowed = entry.zone,
					region = entry.region.code(),
					"alias registered by an earlier region"
				);
			}
		}
		RegionDirectory { aliases, places }
	}

	/// Look up an alias. `alias` must already be upper case.
	pub fn alias(&self, alias: &str) -> Option<&ZoneAlias> {
		self.aliases.get(alias)
	}

	/// Look up a place within a region. Place names are case sensitive.
	pub fn place(&self, region: Region, place: &str) -> Option<&'static str> {
		self.places.get(&region).and_then(|p| p.get(place)).copied()
	}
}

impl Default for RegionDirectory {
	fn default() -> Self {
		RegionDirectory::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn region_from_str_test() {
		assert_eq!("US".parse::<Region>(), Ok(Region::US));
		assert_eq!("us".parse::<Region>(), Ok(Region::US));
		assert_eq!("Au".parse::<Region>(), Ok(Region::AU));
		assert_eq!("ca".parse::<Region>(), Ok(Region::CA));
		assert_eq!("VN".parse::<Region>(), Ok(Region::VN));
		assert_eq!("XX".parse::<Region>(), Err(Error::UnsupportedRegion(String::from("XX"))));
		assert_eq!(
			"INVALID".parse::<Region>(),
			Err(Error::UnsupportedRegion(String::from("INVALID")))
		);
		assert_eq!("".parse::<Region>(), Err(Error::UnsupportedRegion(String::new())));
	}

	#[test]
	fn tables_test() {
		for region in Region::ALL {
			assert!(!region.aliases().is_empty(), "{} has no aliases", region);
			assert!(!region.places().is_empty(), "{} has no places", region);
			assert_eq!(region.code().parse::<Region>(), Ok(region));

			// Aliases are unique within a region and stored upper case
			for (i, (alias, _)) in region.aliases().iter().enumerate() {
				assert_eq!(alias.to_ascii_uppercase(), *alias);
				assert!(region.aliases()[i + 1..].iter().all(|(a, _)| a != alias), "{}", alias);
			}
		}
		assert_eq!(US_PLACES.len(), 50);
		assert_eq!(Region::US.aliases()[0], ("EST", "America/New_York"));
	}

	#[test]
	fn directory_test() {
		let directory = RegionDirectory::new();
		assert_eq!(directory.alias("PST").map(|a| a.zone), Some("America/Los_Angeles"));
		assert_eq!(directory.alias("AEST").map(|a| a.region), Some(Region::AU));
		assert_eq!(directory.alias("EST_CA").map(|a| a.zone), Some("America/Toronto"));
		assert_eq!(directory.alias("ICT").map(|a| a.zone), Some("Asia/Ho_Chi_Minh"));
		assert_eq!(directory.alias("pst"), None);
		assert_eq!(directory.alias("XYZ"), None);

		assert_eq!(directory.place(Region::US, "California"), Some("America/Los_Angeles"));
		assert_eq!(directory.place(Region::CA, "Ontario"), Some("America/Toronto"));
		assert_eq!(directory.place(Region::VN, "Hanoi"), Some("Asia/Ho_Chi_Minh"));
		assert_eq!(directory.place(Region::AU, "New South Wales"), Some("Australia/Sydney"));
		assert_eq!(directory.place(Region::US, "california"), None);
		assert_eq!(directory.place(Region::US, "Ontario"), None);
	}

	#[test]
	fn collision_test() {
		let entries = [
			ZoneAlias { alias: "EST", zone: "America/New_York", region: Region::US },
			ZoneAlias { alias: "EST", zone: "America/Toronto", region: Region::CA },
			ZoneAlias { alias: "AST", zone: "America/Halifax", region: Region::CA },
		];
		let directory = RegionDirectory::from_parts(entries, HashMap::new());
		assert_eq!(directory.alias("EST"), Some(&entries[0]));
		assert_eq!(directory.alias("AST"), Some(&entries[2]));
		assert_eq!(directory.place(Region::US, "California"), None);
	}
}
