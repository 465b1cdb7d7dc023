//! Ingest command implementation for the light score CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use lightscore_data::{IngestSummary, ingest_to_artefact};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{ensure_parent_dir, require_existing};
use crate::{ARG_INGEST_GEOJSON, CliError, DEFAULT_CATALOG, ENV_INGEST_GEOJSON, write_json};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Convert a GeoJSON FeatureCollection of building footprints \
                 into a binary catalog artefact. Features without usable \
                 coordinates are skipped with a warning.",
    about = "Build a catalog artefact from GeoJSON footprints"
)]
#[ortho_config(prefix = "LIGHTSCORE")]
pub(crate) struct IngestArgs {
    /// Path to the GeoJSON FeatureCollection.
    #[arg(long = ARG_INGEST_GEOJSON, value_name = "path")]
    #[serde(default)]
    pub(crate) geojson: Option<Utf8PathBuf>,
    /// Where to write the catalog artefact (defaults to `buildings.lsbc`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) geojson: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let geojson = args.geojson.ok_or(CliError::MissingArgument {
            field: ARG_INGEST_GEOJSON,
            env: ENV_INGEST_GEOJSON,
        })?;
        let output = args
            .output
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CATALOG));
        Ok(Self { geojson, output })
    }
}

/// Summary printed after a successful ingest.
#[derive(Debug, Serialize)]
pub(crate) struct IngestReport {
    pub(crate) output: Utf8PathBuf,
    pub(crate) features: u64,
    pub(crate) imported: u64,
    pub(crate) skipped: u64,
}

impl IngestReport {
    fn new(output: Utf8PathBuf, summary: &IngestSummary) -> Self {
        Self {
            output,
            features: summary.features,
            imported: summary.imported,
            skipped: summary.skipped,
        }
    }
}

pub(crate) fn run_ingest(args: IngestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_ingest(&config)?;
    write_json(writer, &report)
}

pub(crate) fn execute_ingest(config: &IngestConfig) -> Result<IngestReport, CliError> {
    require_existing(&config.geojson, ARG_INGEST_GEOJSON)?;
    ensure_parent_dir(&config.output)?;
    let summary = ingest_to_artefact(config.geojson.as_std_path(), config.output.as_std_path())
        .map_err(|source| CliError::Ingest {
            path: config.geojson.clone(),
            source,
        })?;
    info!(
        "wrote {} buildings to {} ({} features skipped)",
        summary.imported, config.output, summary.skipped
    );
    Ok(IngestReport::new(config.output.clone(), &summary))
}
