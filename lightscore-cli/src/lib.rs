//! Command-line interface for the light score engine.
//!
//! `lightscore ingest` turns GeoJSON footprints into a catalog artefact,
//! `lightscore score` scores a window against that artefact, and
//! `lightscore sun` prints the solar position. Every option can also come
//! from a configuration file or a `LIGHTSCORE_CMDS_<COMMAND>_<OPTION>`
//! environment variable.
#![forbid(unsafe_code)]

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod fs;
mod ingest;
mod score;
mod sun;

pub use error::CliError;

use ingest::{IngestArgs, run_ingest};
use score::{ScoreArgs, run_score};
use sun::{SunArgs, run_sun};

/// Catalog artefact read by `score` and written by `ingest` by default.
pub const DEFAULT_CATALOG: &str = "buildings.lsbc";

const ARG_LAT: &str = "lat";
const ARG_LNG: &str = "lng";
const ARG_INGEST_GEOJSON: &str = "geojson";
const ARG_SCORE_CATALOG: &str = "catalog";
const ARG_SCORE_FLOOR: &str = "floor";
const ARG_SCORE_DIRECTION: &str = "direction";
const ARG_SCORE_MODEL: &str = "model";
const ARG_SCORE_STREET_NUMBER: &str = "street-number";
const ARG_SCORE_STREET_NAME: &str = "street-name";
const ARG_SCORE_CITY: &str = "city";
const ARG_SCORE_POSTAL_CODE: &str = "postal-code";
const ARG_SCORE_COUNTRY: &str = "country";
const ARG_SCORE_GEOCODER_KEY: &str = "geocoder-key";

const ENV_INGEST_GEOJSON: &str = "LIGHTSCORE_CMDS_INGEST_GEOJSON";
const ENV_SCORE_LAT: &str = "LIGHTSCORE_CMDS_SCORE_LAT";
const ENV_SCORE_LNG: &str = "LIGHTSCORE_CMDS_SCORE_LNG";
const ENV_SCORE_FLOOR: &str = "LIGHTSCORE_CMDS_SCORE_FLOOR";
const ENV_SCORE_DIRECTION: &str = "LIGHTSCORE_CMDS_SCORE_DIRECTION";
const ENV_SCORE_STREET_NUMBER: &str = "LIGHTSCORE_CMDS_SCORE_STREET_NUMBER";
const ENV_SCORE_STREET_NAME: &str = "LIGHTSCORE_CMDS_SCORE_STREET_NAME";
const ENV_SCORE_CITY: &str = "LIGHTSCORE_CMDS_SCORE_CITY";
const ENV_SCORE_POSTAL_CODE: &str = "LIGHTSCORE_CMDS_SCORE_POSTAL_CODE";
const ENV_SCORE_COUNTRY: &str = "LIGHTSCORE_CMDS_SCORE_COUNTRY";
const ENV_SCORE_GEOCODER_KEY: &str = "LIGHTSCORE_CMDS_SCORE_GEOCODER_KEY";
const ENV_SUN_LAT: &str = "LIGHTSCORE_CMDS_SUN_LAT";
const ENV_SUN_LNG: &str = "LIGHTSCORE_CMDS_SUN_LNG";

/// Run the CLI with the current process arguments and environment, writing
/// results to standard output.
///
/// # Errors
/// Returns the first [`CliError`] raised while parsing, configuring or
/// executing the command.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Ingest(args) => run_ingest(args, writer),
        Command::Score(args) => run_score(args, writer),
        Command::Sun(args) => run_sun(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "lightscore",
    about = "Estimate the natural light reaching a window",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a catalog artefact from GeoJSON footprints.
    Ingest(IngestArgs),
    /// Score a window by coordinates or postal address.
    Score(ScoreArgs),
    /// Print the solar position for a place and time.
    Sun(SunArgs),
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| CliError::InvalidArgument {
            field: "at",
            value: value.to_owned(),
            reason: err.to_string(),
        })
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
