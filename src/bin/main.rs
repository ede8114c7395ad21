// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{ArgAction, Parser};
use csv::{ReaderBuilder, Trim, Writer};
use elevator_demo_rs::{CallDirection, CarId, Dispatcher, DispatcherConfig, SystemStatus};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Elevator Simulator - Replay command scripts against a dispatcher
///
/// Reads commands from a CSV file (or runs the built-in demo) and writes car
/// status to stdout as CSV.
#[derive(Parser, Debug)]
#[command(name = "elevator-demo-rs")]
#[command(about = "A tick-driven elevator dispatch simulator", long_about = None)]
struct Args {
    /// Path to CSV file with commands
    ///
    /// Expected format: command,car,floor,direction,count
    /// Example: cargo run -- script.csv > status.csv
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// TOML file with fleet and building settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of cars (overrides the config file)
    #[arg(long)]
    cars: Option<u16>,

    /// Number of floors (overrides the config file)
    #[arg(long)]
    floors: Option<u16>,

    /// Write status rows after every tick instead of only at the end
    #[arg(long)]
    every_tick: bool,

    /// After the script, keep stepping until idle, at most this many ticks
    #[arg(long, value_name = "TICKS", default_value_t = 0)]
    settle: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let mut dispatcher = match Dispatcher::with_config(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            eprintln!("Error creating dispatcher: {}", e);
            process::exit(1);
        }
    };

    let script = match &args.input {
        Some(path) => match File::open(path) {
            Ok(f) => Some(BufReader::new(f)),
            Err(e) => {
                eprintln!("Error opening file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => None,
    };

    let mut output = StatusWriter::new(std::io::stdout(), args.every_tick);
    if let Err(e) = simulate(&mut dispatcher, script, args.settle, &mut output) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Runs the script (or the demo when there is none), settles, and writes the
/// final snapshot.
fn simulate<R: Read, W: Write>(
    dispatcher: &mut Dispatcher,
    script: Option<R>,
    settle_ticks: u64,
    output: &mut StatusWriter<W>,
) -> Result<(), csv::Error> {
    match script {
        Some(reader) => {
            let skipped = run_script(dispatcher, reader, output)?;
            if !skipped.is_empty() {
                info!(rows = skipped.len(), "script rows skipped");
            }
        }
        None => run_demo(dispatcher, output)?,
    }
    settle(dispatcher, settle_ticks, output)?;
    output.finish(dispatcher)
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("elevator_demo_rs={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<DispatcherConfig, elevator_demo_rs::ConfigError> {
    let mut config = match &args.config {
        Some(path) => DispatcherConfig::load(path)?,
        None => DispatcherConfig::default(),
    };
    if let Some(cars) = args.cars {
        config.cars = cars;
    }
    if let Some(floors) = args.floors {
        config.floors = floors;
    }
    config.validate()?;
    Ok(config)
}

/// One step of a command script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pickup { floor: u16, direction: CallDirection },
    Select { car: CarId, floor: u16 },
    Step { count: u32 },
}

/// Raw CSV record matching the script format.
///
/// Fields: `command, car, floor, direction, count`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    command: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    car: Option<u16>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    floor: Option<u16>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    count: Option<u32>,
}

impl CsvRecord {
    /// Converts the record to a [`Command`].
    ///
    /// Returns `None` for unknown commands or missing required fields.
    fn into_command(self) -> Option<Command> {
        match self.command.to_lowercase().as_str() {
            "pickup" => {
                let direction = match self.direction?.to_lowercase().as_str() {
                    "up" => CallDirection::Up,
                    "down" => CallDirection::Down,
                    _ => return None,
                };
                Some(Command::Pickup {
                    floor: self.floor?,
                    direction,
                })
            }
            "select" => Some(Command::Select {
                car: CarId(self.car?),
                floor: self.floor?,
            }),
            "step" => Some(Command::Step {
                count: self.count.unwrap_or(1),
            }),
            _ => None,
        }
    }
}

/// Replays a command script.
///
/// Malformed rows and rejected commands are logged and skipped. Returns the
/// script lines of rows that could not be read as a command.
///
/// # CSV Format
///
/// Expected columns: `command, car, floor, direction, count`
/// - `command`: `pickup`, `select`, or `step`
/// - `car`: Car id (select only)
/// - `floor`: Floor number (pickup and select)
/// - `direction`: `up` or `down` (pickup only)
/// - `count`: Number of ticks (step only, default 1)
///
/// # Example
///
/// ```csv
/// command,car,floor,direction,count
/// pickup,,5,down,
/// select,0,8,,
/// step,,,,10
/// ```
///
/// # Errors
///
/// Returns a CSV error if the header row cannot be read or the status output
/// cannot be written.
fn run_script<R: Read, W: Write>(
    dispatcher: &mut Dispatcher,
    reader: R,
    output: &mut StatusWriter<W>,
) -> Result<Vec<u64>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut skipped = Vec::new();
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                warn!(line, error = %e, "skipping unreadable row");
                skipped.push(line);
                continue;
            }
        };
        // 1-based line in the script file, header included.
        let line = row.position().map_or(0, |p| p.line());
        let record: CsvRecord = match row.deserialize(Some(&headers)) {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed row");
                skipped.push(line);
                continue;
            }
        };
        let Some(command) = record.into_command() else {
            warn!(line, "skipping invalid command");
            skipped.push(line);
            continue;
        };
        apply(dispatcher, command, output)?;
    }

    Ok(skipped)
}

/// Built-in scenario run when no script is given.
fn run_demo<W: Write>(
    dispatcher: &mut Dispatcher,
    output: &mut StatusWriter<W>,
) -> Result<(), csv::Error> {
    let script = [
        Command::Pickup {
            floor: 0,
            direction: CallDirection::Up,
        },
        Command::Pickup {
            floor: 5,
            direction: CallDirection::Down,
        },
        Command::Select {
            car: CarId(0),
            floor: 8,
        },
        Command::Step { count: 15 },
    ];
    for command in script {
        apply(dispatcher, command, output)?;
    }
    Ok(())
}

fn apply<W: Write>(
    dispatcher: &mut Dispatcher,
    command: Command,
    output: &mut StatusWriter<W>,
) -> Result<(), csv::Error> {
    match command {
        Command::Pickup { floor, direction } => {
            if let Err(e) = dispatcher.request_pickup(floor, direction) {
                warn!(floor, %direction, error = %e, "pickup rejected");
            }
        }
        Command::Select { car, floor } => {
            if let Err(e) = dispatcher.select_destination(car, floor) {
                warn!(%car, floor, error = %e, "destination rejected");
            }
        }
        Command::Step { count } => {
            for _ in 0..count {
                dispatcher.step();
                output.tick(dispatcher)?;
            }
        }
    }
    Ok(())
}

fn settle<W: Write>(
    dispatcher: &mut Dispatcher,
    max_ticks: u64,
    output: &mut StatusWriter<W>,
) -> Result<(), csv::Error> {
    let mut ran = 0;
    while ran < max_ticks && !dispatcher.is_idle() {
        dispatcher.step();
        output.tick(dispatcher)?;
        ran += 1;
    }
    if ran > 0 {
        info!(ticks = ran, idle = dispatcher.is_idle(), "settled");
    }
    Ok(())
}

/// One CSV output row per car.
#[derive(Debug, Serialize)]
struct StatusRow {
    tick: u64,
    car: CarId,
    floor: u16,
    direction: String,
    door: String,
    /// Pending stops, space separated.
    pending: String,
    queued: usize,
}

fn status_rows(status: &SystemStatus) -> impl Iterator<Item = StatusRow> + '_ {
    status.cars.iter().map(|car| StatusRow {
        tick: status.tick,
        car: car.id,
        floor: car.current_floor,
        direction: car.direction.to_string(),
        door: car.door.to_string(),
        pending: car
            .pending
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        queued: status.queued,
    })
}

/// Writes status snapshots as CSV, either after every tick or once at the end.
struct StatusWriter<W: Write> {
    writer: Writer<W>,
    every_tick: bool,
    last_written: Option<u64>,
}

impl<W: Write> StatusWriter<W> {
    fn new(writer: W, every_tick: bool) -> Self {
        Self {
            writer: Writer::from_writer(writer),
            every_tick,
            last_written: None,
        }
    }

    fn tick(&mut self, dispatcher: &Dispatcher) -> Result<(), csv::Error> {
        if self.every_tick {
            self.write(&dispatcher.status())?;
        }
        Ok(())
    }

    /// Writes the final snapshot unless it was already written, then flushes.
    fn finish(&mut self, dispatcher: &Dispatcher) -> Result<(), csv::Error> {
        if self.last_written != Some(dispatcher.tick()) {
            self.write(&dispatcher.status())?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write(&mut self, status: &SystemStatus) -> Result<(), csv::Error> {
        for row in status_rows(status) {
            self.writer.serialize(row)?;
        }
        self.last_written = Some(status.tick);
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(inner) => inner,
            Err(e) => panic!("flush failed: {}", e.error()),
        }
    }
}
