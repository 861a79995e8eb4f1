//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use std::ffi::OsString;
use std::str::FromStr;
use chrono::{DateTime, Utc, Weekday};
use civil::ParseError;
use thiserror::Error;
use zones::{BusinessWindow, TimeInput, WorkDays};

/// The query to run.
#[derive(Debug, PartialEq)]
pub enum Command {
	/// `current <ZONE>`
	Current { zone: String },
	/// `convert <TIME> <FROM> <TO>`
	Convert { time: TimeInput, from: String, to: String },
	/// `region <REGION>`
	Region { region: String },
	/// `place <REGION> <PLACE>`
	Place { region: String, place: String },
	/// `dst <ZONE> [YEAR]`
	Dst { zone: String, year: Option<i32> },
	/// `business <ZONE>`
	Business { zone: String },
	/// `next-business <ZONE>`
	NextBusiness { zone: String },
	/// `compare <ZONE,ZONE,...>`
	Compare { zones: Vec<String> },
	/// `batch`, reading conversions from stdin
	Batch
}

/// Command names, as typed.
const COMMANDS: [&str; 9] = [
	"current",
	"convert",
	"region",
	"place",
	"dst",
	"business",
	"next-business",
	"compare",
	"batch"
];

/// The error type for parsing command line arguments.
#[derive(Debug, Error, PartialEq)]
pub enum ArgumentsError {
	/// The option was unrecognized. The option is returned as the payload of this variant.
	#[error("Unrecognized option: {0}")]
	UnrecognizedOption(String),
	/// Error converting an argument to UTF-8. The argument index and original [`OsString`] that
	/// could not be converted are returned as the payload of this variant.
	#[error("Invalid UTF-8 in argument {0}: {1:?}")]
	InvalidUTF8(usize, OsString),
	/// No command was given.
	#[error("Missing command")]
	MissingCommand,
	/// The command was not one of the known commands. The supplied command is returned as the
	/// payload of this variant.
	#[error("Unknown command: {0}")]
	UnknownCommand(String),
	/// A command was missing one of its operands. The command and operand name are returned as
	/// the payload of this variant.
	#[error("Missing {1} for command {0}")]
	MissingOperand(&'static str, &'static str),
	/// A command was given more operands than it takes.
	#[error("Unexpected argument: {0}")]
	UnexpectedArgument(String),
	/// The parameter for an option was not supplied. The option is returned as the payload for this
	/// variant.
	#[error("Missing parameter for option {0}")]
	MissingParameter(String),
	#[error("Invalid hour: {0}")]
	InvalidHour(String),
	#[error("Invalid day: {0}")]
	InvalidDay(String),
	#[error("Invalid year: {0}")]
	InvalidYear(String),
	/// An error occured while parsing the provided date time string. The underlying parse error is
	/// returned as the payload for this variant.
	#[error("Datetime parsing error: {0}")]
	DateTimeParseError(ParseError),
	/// The business window or a time operand was rejected.
	#[error(transparent)]
	Zones(#[from] zones::Error),
	/// Help option (-h) was included, so print help details and exit.
	#[error("Help requested")]
	Help
}

/// Convert an argument to [`&str`].
///
/// The function takes the argument index `i`, optional argument name `a`, and the argument `s`.
///
/// # Errors
///
/// Returns [`ArgumentsError::InvalidUTF8`] if the argument could not be converted to UTF-8 or
/// [`ArgumentsError::MissingParameter`] if the argument is `None`.
fn arg_to_str<'a, 'b>(i: usize, a: Option<&'a str>, s: Option<&'b OsString>)
	-> Result<&'b str, ArgumentsError>
{
	match s {
		Some(v) => v.to_str().ok_or_else(|| ArgumentsError::InvalidUTF8(i, v.clone())),
		None => Err(ArgumentsError::MissingParameter(a.map(String::from).unwrap_or_default()))
	}
}

/// Parse an hour for `-s` / `-e`. Range checks are left to [`BusinessWindow::new`].
fn parse_hour(s: &str) -> Result<u32, ArgumentsError> {
	s.parse().map_err(|_| ArgumentsError::InvalidHour(s.to_string()))
}

/// Parse a comma separated list of days, each a Sunday-based index (`0`-`6`) or a name (`mon`,
/// `Monday`).
fn parse_days(s: &str) -> Result<WorkDays, ArgumentsError> {
	let mut indices = Vec::new();
	for day in s.split(',').map(str::trim).filter(|d| !d.is_empty()) {
		let index = match day.parse::<u8>() {
			Ok(i) => i,
			Err(_) => Weekday::from_str(day)
				.map_err(|_| ArgumentsError::InvalidDay(day.to_string()))?
				.num_days_from_sunday() as u8
		};
		indices.push(index);
	}
	Ok(WorkDays::from_indices(indices)?)
}

/// Parse the parameter to `-t` / `--time`.
///
/// `@` followed by an integer is milliseconds since the Unix epoch. Otherwise the parameter is a
/// civil date time string, read as UTC unless it carries its own offset.
fn parse_time(s: &str) -> Result<DateTime<Utc>, ArgumentsError> {
	match s.parse::<TimeInput>()? {
		TimeInput::Epoch(millis) => DateTime::from_timestamp_millis(millis)
			.ok_or(ArgumentsError::DateTimeParseError(ParseError::OutOfRange)),
		TimeInput::Civil(c) => {
			let civil = civil::parse(c.as_bytes()).map_err(ArgumentsError::DateTimeParseError)?;
			Ok(civil.pinned().unwrap_or_else(|| civil.datetime.and_utc()))
		}
	}
}

/// Positional operands following the command name.
struct Operands {
	command: &'static str,
	rest: std::vec::IntoIter<String>
}

impl Operands {
	fn required(&mut self, name: &'static str) -> Result<String, ArgumentsError> {
		self.rest.next().ok_or(ArgumentsError::MissingOperand(self.command, name))
	}

	fn finish<T>(mut self, command: T) -> Result<T, ArgumentsError> {
		match self.rest.next() {
			Some(extra) => Err(ArgumentsError::UnexpectedArgument(extra)),
			None => Ok(command)
		}
	}
}

impl Command {
	/// Build a command from its name and operands.
	///
	/// The command name is case insensitive.
	fn parse(operands: Vec<String>) -> Result<Command, ArgumentsError> {
		let mut rest = operands.into_iter();
		let name = rest.next().ok_or(ArgumentsError::MissingCommand)?;
		let command = COMMANDS.iter()
			.find(|c| c.eq_ignore_ascii_case(&name))
			.copied()
			.ok_or(ArgumentsError::UnknownCommand(name))?;
		let mut o = Operands { command, rest };

		match command {
			"current" => {
				let zone = o.required("zone")?;
				o.finish(Command::Current { zone })
			},
			"convert" => {
				let time = o.required("time")?.parse::<TimeInput>()?;
				let from = o.required("source zone")?;
				let to = o.required("target zone")?;
				o.finish(Command::Convert { time, from, to })
			},
			"region" => {
				let region = o.required("region")?;
				o.finish(Command::Region { region })
			},
			"place" => {
				let region = o.required("region")?;
				let place = o.required("place")?;
				o.finish(Command::Place { region, place })
			},
			"dst" => {
				let zone = o.required("zone")?;
				let year = match o.rest.next() {
					Some(y) => Some(y.parse::<i32>().map_err(|_| ArgumentsError::InvalidYear(y))?),
					None => None
				};
				o.finish(Command::Dst { zone, year })
			},
			"business" => {
				let zone = o.required("zone")?;
				o.finish(Command::Business { zone })
			},
			"next-business" => {
				let zone = o.required("zone")?;
				o.finish(Command::NextBusiness { zone })
			},
			"compare" => {
				let zones: Vec<String> = o.rest
					.flat_map(|a| a.split(',').map(|z| z.trim().to_string()).collect::<Vec<_>>())
					.filter(|z| !z.is_empty())
					.collect();
				if zones.is_empty() {
					return Err(ArgumentsError::MissingOperand(command, "zones"));
				}
				Ok(Command::Compare { zones })
			},
			_ => o.finish(Command::Batch)
		}
	}
}

/// Parsed command line arguments.
#[derive(Debug, PartialEq)]
pub struct Arguments {
	/// The query to run.
	pub command: Command,
	/// The instant to treat as now (if provided).
	pub time: Option<DateTime<Utc>>,
	/// Business hours for `business` and `next-business`.
	pub window: BusinessWindow,
	/// Whether to print JSON instead of plain text.
	pub json: bool
}

impl Arguments {
	/// Parse command line arguments.
	///
	/// The input can be any type that implements [`Iterator`] that yields [`OsString`], though
	/// typically this would be [`std::env::args_os`]. This function assumes that the application
	/// name is **not** supplied as the first item yielded by `args`.
	///
	/// Options may appear anywhere; every other argument is, in order, the command name and its
	/// operands.
	///
	/// # Errors
	///
	/// This function can return any of the variants in [`ArgumentsError`]. See that documentation
	/// for more details.
	pub fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Arguments, ArgumentsError> {
		let mut operands: Vec<String> = Vec::new();
		let mut time: Option<DateTime<Utc>> = None;
		let mut start: Option<u32> = None;
		let mut end: Option<u32> = None;
		let mut days: Option<WorkDays> = None;
		let mut json = false;
		let mut i = 0;
		while let Some(arg) = args.next() {
			match arg_to_str(i, None, Some(&arg))? {
				t @ ("-t" | "--time") => {
					time = Some(parse_time(arg_to_str(i + 1, Some(t), args.next().as_ref())?)?);
					// Increment because we called args.next()
					i += 1;
				},
				s @ ("-s" | "--start") => {
					start = Some(parse_hour(arg_to_str(i + 1, Some(s), args.next().as_ref())?)?);
					i += 1;
				},
				e @ ("-e" | "--end") => {
					end = Some(parse_hour(arg_to_str(i + 1, Some(e), args.next().as_ref())?)?);
					i += 1;
				},
				d @ ("-d" | "--days") => {
					days = Some(parse_days(arg_to_str(i + 1, Some(d), args.next().as_ref())?)?);
					i += 1;
				},
				"-j" | "--json" => json = true,
				"-h" | "--help" => return Err(ArgumentsError::Help),
				v => {
					if v.starts_with('-') {
						return Err(ArgumentsError::UnrecognizedOption(v.to_string()));
					}
					operands.push(v.to_string());
				}
			}
			i += 1;
		}

		let window = BusinessWindow::new(
			start.unwrap_or(9),
			end.unwrap_or(17),
			days.unwrap_or_default()
		)?;

		Ok(Arguments {
			command: Command::parse(operands)?,
			time,
			window,
			json
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Result<Arguments, ArgumentsError> {
		Arguments::parse(args.iter().map(OsString::from))
	}

	fn command(args: &[&str]) -> Result<Command, ArgumentsError> {
		parse(args).map(|a| a.command)
	}

	#[test]
	fn arg_to_str_test() {
		let valid = OsString::from("test");
		assert_eq!(arg_to_str(1, Some("arg"), Some(&valid)), Ok("test"));
		assert_eq!(
			arg_to_str(1, Some("arg"), None),
			Err(ArgumentsError::MissingParameter(String::from("arg")))
		);

		let invalid = unsafe { OsString::from_encoded_bytes_unchecked(vec![b't', 0xff, b's', b't']) };
		assert_eq!(
			arg_to_str(1, Some("arg"), Some(&invalid)),
			Err(ArgumentsError::InvalidUTF8(1, invalid.clone()))
		);
	}

	#[test]
	fn command_test() {
		assert_eq!(command(&["current", "PST"]), Ok(Command::Current { zone: String::from("PST") }));
		assert_eq!(command(&["CURRENT", "PST"]), Ok(Command::Current { zone: String::from("PST") }));
		assert_eq!(
			command(&["convert", "2024-01-15 10:00:00", "EST", "ICT"]),
			Ok(Command::Convert {
				time: TimeInput::Civil(String::from("2024-01-15 10:00:00")),
				from: String::from("EST"),
				to: String::from("ICT")
			})
		);
		assert_eq!(
			command(&["convert", "@1705330800000", "UTC", "ICT"]),
			Ok(Command::Convert {
				time: TimeInput::Epoch(1705330800000),
				from: String::from("UTC"),
				to: String::from("ICT")
			})
		);
		assert_eq!(command(&["region", "au"]), Ok(Command::Region { region: String::from("au") }));
		assert_eq!(
			command(&["place", "US", "New York"]),
			Ok(Command::Place { region: String::from("US"), place: String::from("New York") })
		);
		assert_eq!(
			command(&["dst", "America/New_York"]),
			Ok(Command::Dst { zone: String::from("America/New_York"), year: None })
		);
		assert_eq!(
			command(&["dst", "America/New_York", "2024"]),
			Ok(Command::Dst { zone: String::from("America/New_York"), year: Some(2024) })
		);
		assert_eq!(command(&["business", "AEST"]), Ok(Command::Business { zone: String::from("AEST") }));
		assert_eq!(
			command(&["next-business", "AEST"]),
			Ok(Command::NextBusiness { zone: String::from("AEST") })
		);
		assert_eq!(
			command(&["compare", "EST,PST", " ICT ,", "UTC"]),
			Ok(Command::Compare {
				zones: vec![
					String::from("EST"),
					String::from("PST"),
					String::from("ICT"),
					String::from("UTC")
				]
			})
		);
		assert_eq!(command(&["batch"]), Ok(Command::Batch));
	}

	#[test]
	fn command_error_test() {
		assert_eq!(command(&[]), Err(ArgumentsError::MissingCommand));
		assert_eq!(command(&["now"]), Err(ArgumentsError::UnknownCommand(String::from("now"))));
		assert_eq!(command(&["current"]), Err(ArgumentsError::MissingOperand("current", "zone")));
		assert_eq!(
			command(&["convert", "2024-01-15", "EST"]),
			Err(ArgumentsError::MissingOperand("convert", "target zone"))
		);
		assert_eq!(
			command(&["current", "EST", "PST"]),
			Err(ArgumentsError::UnexpectedArgument(String::from("PST")))
		);
		assert_eq!(
			command(&["dst", "EST", "next"]),
			Err(ArgumentsError::InvalidYear(String::from("next")))
		);
		assert_eq!(command(&["compare", ","]), Err(ArgumentsError::MissingOperand("compare", "zones")));
		assert!(matches!(
			command(&["convert", "@soon", "EST", "PST"]),
			Err(ArgumentsError::Zones(zones::Error::InvalidDateTime { .. }))
		));
	}

	#[test]
	fn options_test() {
		let args = parse(&["-j", "business", "-s", "8", "--end", "20", "-d", "1,3,fri", "EST"]).unwrap();
		assert!(args.json);
		assert_eq!(args.command, Command::Business { zone: String::from("EST") });
		assert_eq!(args.window.start_hour(), 8);
		assert_eq!(args.window.end_hour(), 20);
		assert_eq!(args.window.work_days(), WorkDays::from_indices([1, 3, 5]).unwrap());

		let args = parse(&["current", "EST"]).unwrap();
		assert!(!args.json);
		assert_eq!(args.time, None);
		assert_eq!(args.window, BusinessWindow::default());

		assert_eq!(parse(&["-h"]), Err(ArgumentsError::Help));
		assert_eq!(parse(&["current", "EST", "-h"]), Err(ArgumentsError::Help));
		assert_eq!(parse(&["-x", "current"]), Err(ArgumentsError::UnrecognizedOption(String::from("-x"))));
		assert_eq!(parse(&["current", "EST", "-s"]), Err(ArgumentsError::MissingParameter(String::from("-s"))));
		assert_eq!(parse(&["-s", "nine", "current"]), Err(ArgumentsError::InvalidHour(String::from("nine"))));
		assert_eq!(parse(&["-d", "funday", "current"]), Err(ArgumentsError::InvalidDay(String::from("funday"))));
		assert_eq!(
			parse(&["-s", "18", "current", "EST"]),
			Err(ArgumentsError::Zones(zones::Error::InvalidBusinessWindow(
				"start hour must be before end hour"
			)))
		);
		assert_eq!(
			parse(&["-d", "9", "current", "EST"]),
			Err(ArgumentsError::Zones(zones::Error::InvalidBusinessWindow(
				"work day index must be in [0, 6]"
			)))
		);
	}

	#[test]
	fn time_test() {
		let at = |s: &str| parse(&["-t", s, "current", "EST"]).map(|a| a.time.map(|t| t.timestamp()));
		assert_eq!(at("2025-02-18T12:30:45Z"), Ok(Some(1739881845)));
		assert_eq!(at("2025-02-18 12:30:45"), Ok(Some(1739881845)));
		assert_eq!(at("2025-02-18 12:30:45 +01:00"), Ok(Some(1739878245)));
		assert_eq!(at("@1739881845000"), Ok(Some(1739881845)));
		assert_eq!(at("2025-02-30"), Err(ArgumentsError::DateTimeParseError(ParseError::DayOutOfRange)));
		assert_eq!(
			parse(&["current", "EST", "--time"]),
			Err(ArgumentsError::MissingParameter(String::from("--time")))
		);
	}
}
