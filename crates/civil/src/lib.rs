//! Civil time utilities shared by the zone service and its command line front end.
//!
//! This crate is divided into two halves: [`parse`] reads civil date time strings (the wall-clock
//! notation people type, optionally pinned to a UTC offset) into [`chrono`] types, and [`clock`]
//! supplies "now" through the [`Clock`] trait so that callers can substitute a fixed instant.
//!
//! [`SystemClock`] reads the realtime clock through [`chrono::Utc::now`].
//!
//! # Examples
//!
//! ```
//! # use civil::parse::parse;
//! let civil = parse(b"2024-01-15 10:00:00").unwrap();
//! assert_eq!(civil.datetime.to_string(), "2024-01-15 10:00:00");
//! assert!(civil.offset.is_none());
//!
//! let pinned = parse(b"2025-02-18T12:30:45+01:00").unwrap();
//! assert_eq!(pinned.pinned().map(|t| t.timestamp()), Some(1739878245));
//! ```

pub mod clock;
pub mod parse;

pub use clock::*;
pub use parse::*;
