//! Sources of the current instant.
//!
//! Everything that needs "now" takes a [`Clock`] rather than reading the system time directly, so
//! that a fixed instant can stand in for it: tests pin [`FixedClock`] to a known moment, and the
//! command line uses it for `--time`.
//!
//! # Examples
//!
//! ```
//! # use civil::clock::{Clock, FixedClock};
//! # use chrono::DateTime;
//! let instant = DateTime::from_timestamp(1718617807, 0).unwrap();
//! let clock = FixedClock(instant);
//! assert_eq!(clock.now(), instant);
//! ```

use chrono::{DateTime, Utc};

/// A source of the current instant.
pub trait Clock {
	/// The current instant.
	fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
	fn now(&self) -> DateTime<Utc> {
		(**self).now()
	}
}

impl<C: Clock + ?Sized> Clock for Box<C> {
	fn now(&self) -> DateTime<Utc> {
		(**self).now()
	}
}

/// A clock stopped at a single instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		self.0
	}
}

/// The system's realtime clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_clock_test() {
		let instant = DateTime::from_timestamp(1723433665, 0).unwrap();
		let clock = FixedClock(instant);
		assert_eq!(clock.now(), instant);
		assert_eq!((&clock).now(), instant);

		let boxed: Box<dyn Clock> = Box::new(clock);
		assert_eq!(boxed.now(), instant);
	}

	#[test]
	fn system_clock_test() {
		let a = SystemClock.now();
		// Jun 17, 2024
		assert!(a.timestamp() > 1718617807);

		let b = SystemClock.now();
		assert!(b >= a);
	}
}
