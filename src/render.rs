//! Plain text and JSON rendering of query results.

use std::fmt::{self, Display};
use serde::Serialize;
use zones::business::day_name;
use zones::{
	BatchItem,
	BatchOutcome,
	BusinessStatus,
	Compared,
	ConversionResult,
	Countdown,
	DstWindow,
	NextBusiness,
	PlaceZone,
	RegionZone,
	TemporalSnapshot,
	Transition
};

/// The result of one command.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
	Snapshot(TemporalSnapshot),
	Conversion(ConversionResult),
	Region(Vec<RegionZone>),
	Place(PlaceZone),
	Dst(DstWindow),
	Business(BusinessStatus),
	NextBusiness(NextBusiness),
	Compare(Vec<Compared>),
	Batch(Vec<BatchItem>)
}

impl Output {
	/// Pretty-printed JSON.
	pub fn json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

/// An offset in minutes as `+HH:MM`.
struct Offset(i32);

impl Display for Offset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let sign = if self.0 < 0 { '-' } else { '+' };
		let minutes = self.0.unsigned_abs();
		write!(f, "{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
	}
}

/// One line per snapshot: `zone  local time  abbreviation (UTC offset[, DST])`.
struct Line<'a>(&'a TemporalSnapshot);

impl Display for Line<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = self.0;
		let offset = Offset(s.offset_minutes);
		write!(f, "{}  {}  {} (UTC{}", s.timezone, s.local_time, s.abbreviation, offset)?;
		if s.is_dst {
			write!(f, ", DST")?;
		}
		write!(f, ")")
	}
}

struct Until<'a>(&'a Countdown);

impl Display for Until<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let c = self.0;
		write!(f, "{}d {}h {}m ({} minutes)", c.days, c.hours, c.minutes, c.total_minutes)
	}
}

fn yes(b: bool) -> &'static str {
	if b { "yes" } else { "no" }
}

fn next_opening(
	f: &mut fmt::Formatter<'_>,
	next: &TemporalSnapshot,
	until: &Countdown
) -> fmt::Result {
	writeln!(f, "Next opening: {} in {}", next.local_time, Until(until))
}

fn transition(f: &mut fmt::Formatter<'_>, label: &str, t: &Option<Transition>) -> fmt::Result {
	match t {
		Some(t) => writeln!(f, "{}{} ({})", label, t.at.local_time, t.at.abbreviation),
		None => writeln!(f, "{}none", label)
	}
}

impl Display for Output {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Output::Snapshot(s) => writeln!(f, "{}", Line(s)),
			Output::Conversion(c) => {
				writeln!(f, "From: {}", Line(&c.source))?;
				writeln!(f, "To:   {}", Line(&c.target))?;
				writeln!(f, "Offset difference: {}", Offset(c.offset_delta_minutes()))
			},
			Output::Region(zones) => {
				for z in zones {
					writeln!(f, "{:<10} {}", z.abbreviation, Line(&z.current_time))?;
				}
				Ok(())
			},
			Output::Place(p) => writeln!(f, "{}, {}: {}", p.place, p.region, Line(&p.current_time)),
			Output::Dst(w) => {
				writeln!(f, "{} in {}", w.timezone, w.year)?;
				if w.has_dst {
					transition(f, "DST starts: ", &w.start)?;
					transition(f, "DST ends:   ", &w.end)?;
				} else {
					writeln!(f, "No DST transitions")?;
				}
				writeln!(f, "Currently DST: {}", yes(w.currently_dst))
			},
			Output::Business(b) => {
				let days: Vec<_> = b.business_hours.work_days().iter().map(day_name).collect();
				writeln!(f, "{}", Line(&b.current_time))?;
				writeln!(
					f,
					"Business hours: {}:00-{}:00, {}",
					b.business_hours.start_hour(),
					b.business_hours.end_hour(),
					days.join(", ")
				)?;
				writeln!(f, "Work day: {}", yes(b.is_work_day))?;
				writeln!(f, "Open: {}", yes(b.is_business_hours))?;
				next_opening(f, &b.next_business_hour, &b.time_until)
			},
			Output::NextBusiness(n) => {
				writeln!(f, "{}", Line(&n.current_time))?;
				next_opening(f, &n.next_business_hour, &n.time_until)
			},
			Output::Compare(entries) => {
				for e in entries {
					match e {
						Compared::Snapshot(s) => writeln!(f, "{}", Line(s))?,
						Compared::Failed { timezone, error } => {
							writeln!(f, "{}  error: {}", timezone, error)?
						}
					}
				}
				Ok(())
			},
			Output::Batch(items) => {
				for item in items {
					match &item.outcome {
						BatchOutcome::Converted { result } => writeln!(
							f,
							"[{}] {} {} -> {} {}",
							item.index,
							result.source.local_time,
							result.source.timezone,
							result.target.local_time,
							result.target.timezone
						)?,
						BatchOutcome::Failed { error, .. } => {
							writeln!(f, "[{}] error: {}", item.index, error)?
						}
					}
				}
				Ok(())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::DateTime;
	use zones::{BusinessWindow, FixedClock, TimeInput, Tzdb, Zones};

	fn zones() -> Zones<Tzdb, FixedClock> {
		// Monday, Aug 12, 2024 10:00 in New York
		Zones::with_clock(FixedClock(DateTime::from_timestamp(1723471200, 0).unwrap()))
	}

	#[test]
	fn offset_test() {
		assert_eq!(Offset(0).to_string(), "+00:00");
		assert_eq!(Offset(-240).to_string(), "-04:00");
		assert_eq!(Offset(570).to_string(), "+09:30");
		assert_eq!(Offset(-210).to_string(), "-03:30");
	}

	#[test]
	fn plain_test() {
		let zones = zones();
		let snapshot = Output::Snapshot(zones.current_snapshot("EDT").unwrap());
		assert_eq!(
			snapshot.to_string(),
			"America/New_York  2024-08-12T10:00:00-04:00  EDT (UTC-04:00, DST)\n"
		);

		let input = TimeInput::Civil(String::from("2024-01-15 10:00:00"));
		let conversion = Output::Conversion(zones.convert(&input, "EST", "ICT").unwrap());
		assert_eq!(
			conversion.to_string().lines().last(),
			Some("Offset difference: +12:00")
		);

		let dst = Output::Dst(zones.dst_info("ICT", Some(2024)).unwrap());
		assert_eq!(
			dst.to_string(),
			"Asia/Ho_Chi_Minh in 2024\nNo DST transitions\nCurrently DST: no\n"
		);

		let business = Output::Business(zones.business_status("EDT", &BusinessWindow::default()).unwrap());
		let text = business.to_string();
		assert!(text.contains("Business hours: 9:00-17:00, Monday, Tuesday, Wednesday, Thursday, Friday\n"));
		assert!(text.contains("Open: yes\n"));
		assert!(text.contains("in 0d 0h 0m (0 minutes)"));

		let compare = Output::Compare(zones.compare(&["Mars/Base"]));
		assert_eq!(compare.to_string(), "Mars/Base  error: Unknown timezone: Mars/Base\n");
	}

	#[test]
	fn json_test() {
		let zones = zones();
		let output = Output::Snapshot(zones.current_snapshot("ICT").unwrap());
		let json: serde_json::Value = serde_json::from_str(&output.json().unwrap()).unwrap();
		assert_eq!(json["timezone"], "Asia/Ho_Chi_Minh");
		assert_eq!(json["localTime"], "2024-08-12T21:00:00+07:00");
		assert_eq!(json["isDST"], false);

		let output = Output::Region(zones.list_region("VN").unwrap());
		let json: serde_json::Value = serde_json::from_str(&output.json().unwrap()).unwrap();
		assert_eq!(json[0]["abbreviation"], "ICT");
		assert_eq!(json[0]["currentTime"]["offsetMinutes"], 420);
	}
}
