//! A small [`tracing`] subscriber that writes events to stderr.
//!
//! Logging is configured through `RUST_LOG`, a comma separated list of filters. Each filter is a
//! level (`debug`), a target prefix (`zones::dst`), or both (`zones::dst=trace`). An event is
//! written if any filter matches it: its target starts with the filter's target, and its level is
//! at least as severe as the filter's level. An empty `RUST_LOG` enables everything; an unset one
//! disables logging.

use std::env;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_core::span::{Attributes, Id, Record};

/// Collects an event's fields into a single line.
struct LineVisitor<'a> {
	line: &'a mut String
}

impl Visit for LineVisitor<'_> {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		// Writing to a String cannot fail
		let _ = if field.name() == "message" {
			write!(self.line, "{:?}", value)
		} else {
			write!(self.line, " {}={:?}", field.name(), value)
		};
	}
}

/// One `RUST_LOG` entry.
#[derive(Debug, PartialEq)]
struct Filter {
	target: Option<String>,
	level: Option<Level>
}

impl Filter {
	fn matches(&self, metadata: &Metadata<'_>) -> bool {
		self.level.is_none_or(|level| *metadata.level() <= level)
			&& self.target.as_deref().is_none_or(|t| metadata.target().starts_with(t))
	}
}

fn level(s: &str) -> Option<Level> {
	match s.to_ascii_lowercase().as_str() {
		"error" => Some(Level::ERROR),
		"warn" | "warning" => Some(Level::WARN),
		"info" => Some(Level::INFO),
		"debug" => Some(Level::DEBUG),
		"trace" => Some(Level::TRACE),
		_ => None
	}
}

/// Parse a `RUST_LOG` value into filters. Empty entries are skipped.
fn parse_filters(value: &str) -> Vec<Filter> {
	value.split(',')
		.map(str::trim)
		.filter(|f| !f.is_empty())
		.map(|f| match f.split_once('=') {
			Some((target, l)) => Filter { target: Some(target.to_string()), level: level(l) },
			None => match level(f) {
				Some(l) => Filter { target: None, level: Some(l) },
				None => Filter { target: Some(f.to_string()), level: None }
			}
		})
		.collect()
}

/// Writes every enabled event to stderr as `LEVEL target: message field=value...`.
pub struct Tracer {
	/// `None` when logging is off
	filters: Option<Vec<Filter>>
}

static NEXT_SPAN: AtomicU64 = AtomicU64::new(1);

impl Tracer {
	fn from_env_value(value: Option<&str>) -> Tracer {
		Tracer { filters: value.map(parse_filters) }
	}

	/// Install the tracer as the global default, configured from `RUST_LOG`.
	///
	/// # Errors
	///
	/// Returns an error if a global subscriber is already installed.
	pub fn register() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
		let value = env::var("RUST_LOG").ok();
		tracing::subscriber::set_global_default(Tracer::from_env_value(value.as_deref()))
	}
}

impl Subscriber for Tracer {
	fn enabled(&self, metadata: &Metadata<'_>) -> bool {
		match &self.filters {
			None => false,
			Some(filters) => filters.is_empty() || filters.iter().any(|f| f.matches(metadata))
		}
	}

	fn new_span(&self, _span: &Attributes<'_>) -> Id {
		Id::from_u64(NEXT_SPAN.fetch_add(1, Ordering::Relaxed))
	}

	fn record(&self, _span: &Id, _values: &Record<'_>) {}

	fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

	fn event(&self, event: &Event<'_>) {
		let metadata = event.metadata();
		let mut line = String::new();
		event.record(&mut LineVisitor { line: &mut line });
		eprintln!("{} {}: {}", metadata.level(), metadata.target(), line);
	}

	fn enter(&self, _span: &Id) {}

	fn exit(&self, _span: &Id) {}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing::callsite::{Callsite, DefaultCallsite};
	use tracing::metadata::Kind;
	use tracing_core::field::FieldSet;

	static CALLSITE: DefaultCallsite = DefaultCallsite::new(&DST_TRACE);
	static DST_TRACE: Metadata<'static> = Metadata::new(
		"event",
		"zones::dst",
		Level::TRACE,
		None,
		None,
		None,
		FieldSet::new(&["message"], tracing_core::identify_callsite!(&CALLSITE)),
		Kind::EVENT
	);

	#[test]
	fn parse_filters_test() {
		assert_eq!(parse_filters(" , "), Vec::<Filter>::new());
		assert_eq!(parse_filters("debug"), [Filter { target: None, level: Some(Level::DEBUG) }]);
		assert_eq!(parse_filters("zones, tzquery=TRACE"), [
			Filter { target: Some(String::from("zones")), level: None },
			Filter { target: Some(String::from("tzquery")), level: Some(Level::TRACE) }
		]);
		assert_eq!(parse_filters("zones=loud"), [
			Filter { target: Some(String::from("zones")), level: None }
		]);
	}

	#[test]
	fn enabled_test() {
		assert!(!Tracer::from_env_value(None).enabled(&DST_TRACE));
		assert!(Tracer::from_env_value(Some("")).enabled(&DST_TRACE));
		assert!(Tracer::from_env_value(Some("trace")).enabled(&DST_TRACE));
		assert!(!Tracer::from_env_value(Some("debug")).enabled(&DST_TRACE));
		assert!(Tracer::from_env_value(Some("zones")).enabled(&DST_TRACE));
		assert!(Tracer::from_env_value(Some("zones::dst=trace")).enabled(&DST_TRACE));
		assert!(!Tracer::from_env_value(Some("zones::alias")).enabled(&DST_TRACE));
		assert!(Tracer::from_env_value(Some("tzquery,zones=trace")).enabled(&DST_TRACE));
		assert_eq!(CALLSITE.metadata().target(), "zones::dst");
	}
}
