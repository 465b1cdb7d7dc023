//! Sun command: print the solar position for a place and time.

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::Parser;
use geo::Coord;
use lightscore_core::{Coordinates, SolarPositionProvider, SunPosition};
use lightscore_data::AlgorithmicSunProvider;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_LAT, ARG_LNG, CliError, ENV_SUN_LAT, ENV_SUN_LNG, parse_instant, write_json};

/// CLI arguments for the `sun` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Print the sun's elevation and azimuth")]
#[ortho_config(prefix = "LIGHTSCORE")]
pub(crate) struct SunArgs {
    /// Latitude in decimal degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude in decimal degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// RFC 3339 timestamp; defaults to now.
    #[arg(long, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) at: Option<String>,
}

impl SunArgs {
    pub(crate) fn into_config(self) -> Result<SunConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SunConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SunConfig {
    pub(crate) location: Coord<f64>,
    pub(crate) at: Option<DateTime<Utc>>,
}

impl TryFrom<SunArgs> for SunConfig {
    type Error = CliError;

    fn try_from(args: SunArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_SUN_LAT,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_SUN_LNG,
        })?;
        Ok(Self {
            location: Coord { x: lng, y: lat },
            at: args.at.as_deref().map(parse_instant).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SunReport {
    pub(crate) coordinates: Coordinates,
    pub(crate) at: DateTime<Utc>,
    pub(crate) sun_position: SunPosition,
}

pub(crate) fn execute_sun(config: SunConfig) -> Result<SunReport, CliError> {
    let at = config.at.unwrap_or_else(Utc::now);
    let sun_position = AlgorithmicSunProvider.position(config.location, Some(at))?;
    Ok(SunReport {
        coordinates: config.location.into(),
        at,
        sun_position,
    })
}

pub(crate) fn run_sun(args: SunArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_sun(args.into_config()?)?;
    write_json(writer, &report)
}
