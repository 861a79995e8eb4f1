//! Query timezones from the command line.
//!
//! This application answers everyday timezone questions: what time it is somewhere, what a time in
//! one zone is in another, when daylight saving time starts and ends, and whether (or when next) a
//! zone is in business hours. Zones can be named by their IANA id (`America/New_York`), by a
//! regional alias (`EST`, `aest`, `ict`), or by a place within a region (`place AU Perth`).
//!
//! # Command Line Arguments
//!
//! General form: `tzquery [options...] command [operands...]`
//!
//! | Command                      | Description                                            |
//! | ---------------------------- | ------------------------------------------------------ |
//! | `current <ZONE>`             | The current time in a zone                             |
//! | `convert <TIME> <FROM> <TO>` | Convert a time from one zone to another                |
//! | `region <REGION>`            | Every alias of a region (US, AU, CA, VN) with its time |
//! | `place <REGION> <PLACE>`     | The zone of a place within a region                    |
//! | `dst <ZONE> [YEAR]`          | DST transitions of a year, default the current year    |
//! | `business <ZONE>`            | Whether a zone is in business hours                    |
//! | `next-business <ZONE>`       | When business hours next begin in a zone               |
//! | `compare <ZONE,ZONE,...>`    | The current time in several zones                      |
//! | `batch`                      | Convert a JSON list of conversions read from stdin     |
//!
//! Options may appear anywhere on the command line:
//!
//! | Short form | Long form  | Argument           | Default      | Description                     |
//! | ---------- | ---------- | ------------------ | ------------ | ------------------------------- |
//! | `-t`       | `--time`   | [Date time string] | Current time | The instant to treat as now     |
//! | `-s`       | `--start`  | Hour 0-23          | 9            | Start of business hours         |
//! | `-e`       | `--end`    | Hour 1-24          | 17           | End of business hours           |
//! | `-d`       | `--days`   | Comma separated    | `1,2,3,4,5`  | Work days, `0` or `sun` is Sunday |
//! | `-j`       | `--json`   |                    |              | Print JSON instead of text      |
//!
//! A `TIME` operand is either a date time string, read as wall-clock time in the source zone, or
//! `@` followed by milliseconds since the Unix epoch. A `--time` value without an offset is UTC.
//!
//! `batch` reads either a JSON array of conversions or an object with a `conversions` array, where
//! each conversion is `{"dateTime": ..., "fromTimezone": ..., "toTimezone": ...}`.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`, e.g. `RUST_LOG=zones=debug`.
//!
//! [date time string]: civil::parse
//!
//! # Examples
//!
//! ```sh
//! tzquery current pst
//! tzquery convert "2024-01-15 10:00" EST ICT
//! tzquery dst Australia/Sydney 2024
//! tzquery -s 8 -e 18 -d mon,tue,wed,thu business aest
//! echo '[{"dateTime":"2024-01-15 10:00","fromTimezone":"EST","toTimezone":"PST"}]' | tzquery -j batch
//! ```

use std::error::Error;
use std::io::{self, Read};
use std::process::ExitCode;
use serde::Deserialize;
use tracing::debug;
use zones::{Clock, ConversionRequest, FixedClock, SystemClock, Tzdb, Zones};

use args::{Arguments, ArgumentsError, Command};
use render::Output;
use tracer::Tracer;

mod args;
mod render;
mod tracer;

/// The conversions `batch` accepts on stdin.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchInput {
	Wrapped { conversions: Vec<ConversionRequest> },
	List(Vec<ConversionRequest>)
}

impl BatchInput {
	fn into_requests(self) -> Vec<ConversionRequest> {
		match self {
			BatchInput::Wrapped { conversions } => conversions,
			BatchInput::List(l) => l
		}
	}
}

/// Parse the conversions of a `batch` command.
fn parse_batch(input: &str) -> serde_json::Result<Vec<ConversionRequest>> {
	serde_json::from_str::<BatchInput>(input).map(BatchInput::into_requests)
}

/// Run the command in `args`.
///
/// # Errors
///
/// Any [`zones::Error`] from the query, or for `batch`, an I/O or JSON error reading stdin.
fn run<C: Clock>(zones: &Zones<Tzdb, C>, args: &Arguments) -> Result<Output, Box<dyn Error>> {
	debug!(command = ?args.command, "running");
	let output = match &args.command {
		Command::Current { zone } => Output::Snapshot(zones.current_snapshot(zone)?),
		Command::Convert { time, from, to } => Output::Conversion(zones.convert(time, from, to)?),
		Command::Region { region } => Output::Region(zones.list_region(region)?),
		Command::Place { region, place } => Output::Place(zones.place(place, region)?),
		Command::Dst { zone, year } => Output::Dst(zones.dst_info(zone, *year)?),
		Command::Business { zone } => {
			Output::Business(zones.business_status(zone, &args.window)?)
		},
		Command::NextBusiness { zone } => {
			Output::NextBusiness(zones.next_business_instant(zone, &args.window)?)
		},
		Command::Compare { zones: list } => Output::Compare(zones.compare(list.as_slice())),
		Command::Batch => {
			let mut input = String::new();
			io::stdin().read_to_string(&mut input)?;
			let requests = parse_batch(&input)?;
			debug!(count = requests.len(), "batch read");
			Output::Batch(zones.batch_convert(&requests))
		}
	};
	Ok(output)
}

/// Main program entry point.
///
/// Parses input arguments, runs the query and prints the result. See [`crate`] documentation for
/// details.
fn main() -> ExitCode {
	if let Err(e) = Tracer::register() {
		eprintln!("Warning: logging disabled: {}", e);
	}

	let args = match Arguments::parse(std::env::args_os().skip(1)) {
		Ok(a) => a,
		Err(e) => {
			return if let ArgumentsError::Help = e {
				println!("\
Query timezones: current times, conversions, DST transitions and business hours.

Usage: tzquery [OPTIONS] <COMMAND> [OPERANDS...]

Commands:
  current <ZONE>              the current time in a zone
  convert <TIME> <FROM> <TO>  convert a time between zones
  region <REGION>             the aliases of a region (US, AU, CA, VN)
  place <REGION> <PLACE>      the zone of a place in a region
  dst <ZONE> [YEAR]           DST transitions, default the current year
  business <ZONE>             whether a zone is in business hours
  next-business <ZONE>        when business hours next begin
  compare <ZONE,ZONE,...>     the current time in several zones
  batch                       convert a JSON list of conversions from stdin

Options:
  -t, --time <DATETIME>  the instant to treat as now, defaults to now
  -s, --start <HOUR>     start of business hours, default 9
  -e, --end <HOUR>       end of business hours, default 17
  -d, --days <DAYS>      work days, default mon,tue,wed,thu,fri
  -j, --json             print JSON
  -h, --help             print this help

Examples:
  tzquery current pst
  tzquery convert \"2024-01-15 10:00\" EST ICT
  tzquery convert @1705330800000 America/New_York Asia/Tokyo
  tzquery -j dst Australia/Sydney 2024
  tzquery -t \"2024-08-12 14:00:00Z\" next-business aest\n");
				ExitCode::SUCCESS
			} else {
				eprintln!("{}", e);
				ExitCode::FAILURE
			}
		}
	};

	let clock: Box<dyn Clock> = match args.time {
		Some(t) => Box::new(FixedClock(t)),
		None => Box::new(SystemClock)
	};
	let zones = Zones::with_clock(clock);

	let printed = run(&zones, &args).and_then(|output| {
		if args.json {
			println!("{}", output.json()?);
		} else {
			print!("{}", output);
		}
		Ok(())
	});

	printed
		.map(|_| ExitCode::SUCCESS)
		.inspect_err(|e| eprintln!("{}", e))
		.unwrap_or(ExitCode::FAILURE)
}
