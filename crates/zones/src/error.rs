//! Error types used across modules.
//!
//! Every fallible operation in this crate returns [`Error`], with one variant per kind of failure.
//! Errors are values: nothing in this crate logs or retries them.

use civil::ParseError;
use thiserror::Error;
use crate::region::Region;

/// The error type for zone queries.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
	/// The identifier is neither a zone id known to the provider nor a registered alias. The
	/// identifier is provided in the payload.
	#[error("Unknown timezone: {0}")]
	UnknownZone(String),
	/// The region code is not one of [`Region::ALL`]. The supplied code is provided in the payload.
	#[error("Unsupported region: {0}. Use US, AU, CA, or VN.")]
	UnsupportedRegion(String),
	/// The region is valid but has no such place.
	#[error("State/Territory/Province/City not found: {place}")]
	PlaceNotFound {
		place: String,
		region: Region
	},
	/// A civil date time could not be parsed, or does not map to a representable instant.
	#[error("Invalid date time {input:?}: {source}")]
	InvalidDateTime {
		input: String,
		#[source]
		source: ParseError
	},
	/// The provider rejected a zone id that reached it.
	#[error("Invalid timezone: {0}")]
	InvalidZone(String),
	/// A business window was rejected. The reason is provided in the payload.
	#[error("Invalid business window: {0}")]
	InvalidBusinessWindow(&'static str)
}

impl Error {
	/// An [`Error::InvalidDateTime`] for an input that parsed but fell outside the representable
	/// range.
	pub(crate) fn out_of_range(input: impl ToString) -> Error {
		Error::InvalidDateTime { input: input.to_string(), source: ParseError::OutOfRange }
	}
}
