//! Score command implementation for the light score CLI.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::Parser;
use geo::Coord;
use lightscore_core::{
    Address, Direction, Geocoder, LightScoreError, LightScoreReport, LightScorer,
    ObservationPoint, ProximityIndex, ScoringConfig, ScoringModel, SharedIndex, load_catalog,
};
use lightscore_data::{AlgorithmicSunProvider, LocationIqConfig, LocationIqGeocoder};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::require_existing;
use crate::{
    ARG_LAT, ARG_LNG, ARG_SCORE_CATALOG, ARG_SCORE_CITY, ARG_SCORE_COUNTRY, ARG_SCORE_DIRECTION,
    ARG_SCORE_FLOOR, ARG_SCORE_GEOCODER_KEY, ARG_SCORE_MODEL, ARG_SCORE_POSTAL_CODE,
    ARG_SCORE_STREET_NAME, ARG_SCORE_STREET_NUMBER, CliError, DEFAULT_CATALOG, ENV_SCORE_CITY,
    ENV_SCORE_COUNTRY, ENV_SCORE_DIRECTION, ENV_SCORE_FLOOR, ENV_SCORE_GEOCODER_KEY, ENV_SCORE_LAT,
    ENV_SCORE_LNG, ENV_SCORE_POSTAL_CODE, ENV_SCORE_STREET_NAME, ENV_SCORE_STREET_NUMBER,
    parse_instant, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score the natural light reaching a window. The window is \
                 located either by explicit coordinates or by a postal \
                 address resolved through LocationIQ, which requires an API \
                 key.",
    about = "Score the natural light reaching a window"
)]
#[ortho_config(prefix = "LIGHTSCORE")]
pub(crate) struct ScoreArgs {
    /// Catalog artefact produced by `lightscore ingest` (defaults to
    /// `buildings.lsbc`).
    #[arg(long = ARG_SCORE_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Latitude of the window in decimal degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the window in decimal degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// House or building number.
    #[arg(long = ARG_SCORE_STREET_NUMBER, value_name = "number")]
    #[serde(default)]
    pub(crate) street_number: Option<String>,
    /// Street name.
    #[arg(long = ARG_SCORE_STREET_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) street_name: Option<String>,
    /// City or town.
    #[arg(long = ARG_SCORE_CITY, value_name = "city")]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// Postal or ZIP code.
    #[arg(long = ARG_SCORE_POSTAL_CODE, value_name = "code")]
    #[serde(default)]
    pub(crate) postal_code: Option<String>,
    /// Country name.
    #[arg(long = ARG_SCORE_COUNTRY, value_name = "country")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Floor the window is on, counting from 1.
    #[arg(long = ARG_SCORE_FLOOR, value_name = "floor")]
    #[serde(default)]
    pub(crate) floor: Option<u32>,
    /// Facing direction: N, NE, E, SE, S, SW, W or NW.
    #[arg(long = ARG_SCORE_DIRECTION, value_name = "octant")]
    #[serde(default)]
    pub(crate) direction: Option<String>,
    /// RFC 3339 timestamp for the sun position; defaults to now.
    #[arg(long, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) at: Option<String>,
    /// Building search radius in metres.
    #[arg(long, value_name = "meters")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Radius retried when nothing is found; 0 disables the retry.
    #[arg(long, value_name = "meters")]
    #[serde(default)]
    pub(crate) fallback_radius: Option<f64>,
    /// Scoring model: `static` or `solar-elevation`.
    #[arg(long = ARG_SCORE_MODEL, value_name = "model")]
    #[serde(default)]
    pub(crate) model: Option<String>,
    /// LocationIQ-compatible service root.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// LocationIQ API key, required when scoring an address.
    #[arg(long = ARG_SCORE_GEOCODER_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) geocoder_key: Option<String>,
    /// Geocoder timeout in seconds.
    #[arg(long, value_name = "seconds")]
    #[serde(default)]
    pub(crate) geocoder_timeout: Option<u64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }

    fn address(&self) -> Result<Option<Address>, CliError> {
        let fields = [
            &self.street_number,
            &self.street_name,
            &self.city,
            &self.postal_code,
            &self.country,
        ];
        if fields.iter().all(|field| field.is_none()) {
            return Ok(None);
        }
        let required = |value: &Option<String>, field: &'static str, env: &'static str| {
            value
                .clone()
                .ok_or(CliError::MissingArgument { field, env })
        };
        Ok(Some(Address {
            street_number: required(
                &self.street_number,
                ARG_SCORE_STREET_NUMBER,
                ENV_SCORE_STREET_NUMBER,
            )?,
            street_name: required(&self.street_name, ARG_SCORE_STREET_NAME, ENV_SCORE_STREET_NAME)?,
            city: required(&self.city, ARG_SCORE_CITY, ENV_SCORE_CITY)?,
            postal_code: required(&self.postal_code, ARG_SCORE_POSTAL_CODE, ENV_SCORE_POSTAL_CODE)?,
            country: required(&self.country, ARG_SCORE_COUNTRY, ENV_SCORE_COUNTRY)?,
        }))
    }

    fn geocoder(&self) -> Result<LocationIqConfig, CliError> {
        let key = self
            .geocoder_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_SCORE_GEOCODER_KEY,
                env: ENV_SCORE_GEOCODER_KEY,
            })?;
        let mut config = LocationIqConfig::new(key);
        if let Some(base_url) = &self.geocoder_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(seconds) = self.geocoder_timeout {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        Ok(config)
    }

    fn target(&self) -> Result<Target, CliError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Target::Coordinates(Coord { x: lng, y: lat })),
            (Some(_), None) => Err(CliError::MissingArgument {
                field: ARG_LNG,
                env: ENV_SCORE_LNG,
            }),
            (None, Some(_)) => Err(CliError::MissingArgument {
                field: ARG_LAT,
                env: ENV_SCORE_LAT,
            }),
            (None, None) => match self.address()? {
                Some(address) => Ok(Target::Address {
                    address,
                    geocoder: self.geocoder()?,
                }),
                None => Err(CliError::MissingArgument {
                    field: ARG_LAT,
                    env: ENV_SCORE_LAT,
                }),
            },
        }
    }

    fn scoring(&self) -> Result<ScoringConfig, CliError> {
        let defaults = ScoringConfig::default();
        let search_radius_meters = match self.radius {
            Some(radius) if !(radius.is_finite() && radius > 0.0) => {
                return Err(invalid("radius", radius.to_string(), "must be a positive number"));
            }
            Some(radius) => radius,
            None => defaults.search_radius_meters,
        };
        let fallback_radius_meters = match self.fallback_radius {
            Some(radius) if !(radius.is_finite() && radius >= 0.0) => {
                return Err(invalid(
                    "fallback-radius",
                    radius.to_string(),
                    "must be zero or a positive number",
                ));
            }
            Some(radius) if radius <= 0.0 => None,
            Some(radius) => Some(radius),
            None => defaults.fallback_radius_meters,
        };
        let model = self
            .model
            .as_deref()
            .map(parse_model)
            .transpose()?
            .unwrap_or(defaults.model);
        Ok(ScoringConfig {
            search_radius_meters,
            fallback_radius_meters,
            model,
        })
    }
}

fn invalid(field: &'static str, value: String, reason: &str) -> CliError {
    CliError::InvalidArgument {
        field,
        value,
        reason: reason.to_owned(),
    }
}

fn parse_model(value: &str) -> Result<ScoringModel, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "static" => Ok(ScoringModel::Static),
        "solar-elevation" => Ok(ScoringModel::SolarElevation),
        _ => Err(invalid(
            ARG_SCORE_MODEL,
            value.to_owned(),
            "expected `static` or `solar-elevation`",
        )),
    }
}

/// Where the window is.
#[derive(Debug, Clone)]
pub(crate) enum Target {
    /// Explicit WGS84 coordinates, `x = longitude`.
    Coordinates(Coord<f64>),
    /// A postal address to geocode.
    Address {
        address: Address,
        geocoder: LocationIqConfig,
    },
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct ScoreConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) target: Target,
    pub(crate) floor: u32,
    pub(crate) direction: Direction,
    pub(crate) at: Option<DateTime<Utc>>,
    pub(crate) scoring: ScoringConfig,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let floor = args.floor.ok_or(CliError::MissingArgument {
            field: ARG_SCORE_FLOOR,
            env: ENV_SCORE_FLOOR,
        })?;
        let direction: Direction = args
            .direction
            .as_deref()
            .ok_or(CliError::MissingArgument {
                field: ARG_SCORE_DIRECTION,
                env: ENV_SCORE_DIRECTION,
            })?
            .parse()?;
        let target = args.target()?;
        let scoring = args.scoring()?;
        let at = args.at.as_deref().map(parse_instant).transpose()?;
        let catalog = args
            .catalog
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CATALOG));
        Ok(Self {
            catalog,
            target,
            floor,
            direction,
            at,
            scoring,
        })
    }
}

/// Builds the geocoder for address requests.
pub(crate) trait GeocoderFactory {
    fn build(&self, config: &LocationIqConfig) -> Result<Box<dyn Geocoder>, CliError>;
}

pub(crate) struct LocationIqFactory;

impl GeocoderFactory for LocationIqFactory {
    fn build(&self, config: &LocationIqConfig) -> Result<Box<dyn Geocoder>, CliError> {
        LocationIqGeocoder::with_config(config.clone())
            .map(|geocoder| Box::new(geocoder) as Box<dyn Geocoder>)
            .map_err(|source| CliError::BuildGeocoder {
                base_url: config.base_url.clone(),
                source,
            })
    }
}

fn load_index(path: &Utf8Path) -> Result<Arc<ProximityIndex>, CliError> {
    let path = path.to_path_buf();
    let shared = SharedIndex::new(move || {
        load_catalog(path.as_std_path()).map_err(LightScoreError::from)
    });
    Ok(shared.get()?)
}

pub(crate) fn run_score(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    run_score_with(args, &LocationIqFactory, writer)
}

pub(crate) fn run_score_with(
    args: ScoreArgs,
    geocoders: &dyn GeocoderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_score(&config, geocoders)?;
    write_json(writer, &report)
}

pub(crate) fn execute_score(
    config: &ScoreConfig,
    geocoders: &dyn GeocoderFactory,
) -> Result<LightScoreReport, CliError> {
    require_existing(&config.catalog, ARG_SCORE_CATALOG)?;
    let index = load_index(&config.catalog)?;
    let scorer = LightScorer::with_config(index, AlgorithmicSunProvider, config.scoring);
    let report = match &config.target {
        Target::Coordinates(location) => {
            let point = ObservationPoint::new(*location, config.floor, config.direction)
                .map_err(LightScoreError::from)?;
            scorer.score(&point, config.at)?
        }
        Target::Address { address, geocoder } => {
            let geocoder = geocoders.build(geocoder)?;
            scorer.score_address(
                geocoder.as_ref(),
                address,
                config.floor,
                config.direction.as_str(),
                config.at,
            )?
        }
    };
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
