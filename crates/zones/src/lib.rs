//! Timezone queries: aliases, conversions, DST transitions and business hours.
//!
//! Everything here sits on two seams. A [`Provider`] is the time zone database; it answers what
//! the offset is at an instant and which instant a wall-clock time denotes, and [`Tzdb`] answers
//! from the IANA database compiled into `chrono-tz`. A [`Clock`] supplies "now".
//!
//! On top of those:
//! - [`alias`] turns `PST`, `aest` or `America/New_York` into a canonical zone id, and looks up
//!   places by region ([`region`] holds the tables);
//! - [`snapshot`] renders an instant in a zone and converts between zones;
//! - [`dst`] finds the DST transitions of a year;
//! - [`business`] decides whether a zone is in business hours, and when it next will be.
//!
//! [`Zones`] bundles all of them behind a single value that resolves identifiers first.
//!
//! # Examples
//!
//! ```
//! # use zones::{BusinessWindow, FixedClock, Zones};
//! # use chrono::DateTime;
//! // Monday, Aug 12, 2024 10:00 in New York
//! let zones = Zones::with_clock(FixedClock(DateTime::from_timestamp(1723471200, 0).unwrap()));
//!
//! let status = zones.business_status("est", &BusinessWindow::default()).unwrap();
//! assert!(status.is_business_hours);
//!
//! let dst = zones.dst_info("America/New_York", Some(2024)).unwrap();
//! assert_eq!(dst.start.unwrap().at.local_time, "2024-03-10T03:00:00-04:00");
//! ```

pub mod alias;
pub mod business;
pub mod dst;
pub mod error;
pub mod provider;
pub mod region;
pub mod service;
pub mod snapshot;

pub use alias::{AliasResolver, RegionZone};
pub use business::{BusinessCalculator, BusinessStatus, BusinessWindow, Countdown, NextBusiness, WorkDays};
pub use dst::{Direction, DstFinder, DstWindow, Transition};
pub use error::Error;
pub use provider::{Provider, Tzdb, ZoneOffset};
pub use region::{Region, RegionDirectory, ZoneAlias};
pub use service::{BatchItem, BatchOutcome, Compared, ConversionRequest, PlaceZone, Zones};
pub use snapshot::{ConversionResult, SnapshotBuilder, TemporalSnapshot, TimeInput};
pub use civil::{Clock, FixedClock, SystemClock};
