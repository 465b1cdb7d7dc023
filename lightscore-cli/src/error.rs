//! Error types emitted by the light score CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use lightscore_core::{DirectionParseError, LightScoreError, SolarPositionError};
use lightscore_data::{GeocoderBuildError, IngestError};
use thiserror::Error;

/// Errors emitted by the light score CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option was supplied but could not be interpreted.
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// The facing direction is not a compass octant.
    #[error(transparent)]
    InvalidDirection(#[from] DirectionParseError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The directory for an output artefact could not be created.
    #[error("failed to prepare output directory for {path:?}: {source}")]
    PrepareOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// GeoJSON ingestion failed.
    #[error("failed to ingest {path:?}: {source}")]
    Ingest {
        path: Utf8PathBuf,
        #[source]
        source: IngestError,
    },
    /// Constructing the geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: GeocoderBuildError,
    },
    /// The scoring request failed.
    #[error("scoring failed: {0}")]
    Score(#[from] LightScoreError),
    /// The solar position could not be computed.
    #[error(transparent)]
    SolarPosition(#[from] SolarPositionError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
