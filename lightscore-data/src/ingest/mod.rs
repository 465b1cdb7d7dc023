//! GeoJSON building footprint ingestion.
//!
//! Footprint exports arrive as a GeoJSON `FeatureCollection` whose features
//! carry the building centroid and height columns in their `properties`.
//! Features that cannot be turned into a [`BuildingRecord`] are skipped with a
//! warning; a file that is not a feature collection at all is an error.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use geo::{Coord, Rect};
use lightscore_core::{ArtefactError, BuildingCatalog, BuildingRecord, write_catalog};
use log::{info, warn};
use serde_json::Value;
use thiserror::Error;

mod properties;

use properties::building_from_feature;

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngestSummary {
    /// Number of features in the collection.
    pub features: u64,
    /// Number of features converted into catalog records.
    pub imported: u64,
    /// Number of features skipped as malformed.
    pub skipped: u64,
    /// Bounding box covering every imported building, if any were imported.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl IngestSummary {
    fn record_import(&mut self, location: Coord<f64>) {
        self.imported += 1;
        let point = Rect::new(location, location);
        self.bounds = Some(match self.bounds {
            Some(existing) => Rect::new(
                Coord {
                    x: existing.min().x.min(point.min().x),
                    y: existing.min().y.min(point.min().y),
                },
                Coord {
                    x: existing.max().x.max(point.max().x),
                    y: existing.max().y.max(point.max().y),
                },
            ),
            None => point,
        });
    }
}

/// Errors returned when ingesting a GeoJSON file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open GeoJSON file at {path:?}")]
    Open {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse GeoJSON")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("expected a GeoJSON FeatureCollection, found {found}")]
    NotFeatureCollection { found: String },
    #[error("failed to write building artefact")]
    Write {
        #[source]
        source: ArtefactError,
    },
}

fn describe(value: &Value) -> String {
    match value.get("type").and_then(Value::as_str) {
        Some(kind) => format!("type {kind:?}"),
        None => match value {
            Value::Array(_) => "a bare array".to_owned(),
            Value::Object(_) => "an object without a type".to_owned(),
            _ => "a scalar value".to_owned(),
        },
    }
}

/// Parse a GeoJSON `FeatureCollection` from `reader`.
///
/// # Errors
/// Returns [`IngestError::Parse`] for invalid JSON and
/// [`IngestError::NotFeatureCollection`] when the document is valid JSON of
/// another shape. Individual malformed features are skipped, not reported.
pub fn read_buildings<R: Read>(reader: R) -> Result<(BuildingCatalog, IngestSummary), IngestError> {
    let document: Value =
        serde_json::from_reader(reader).map_err(|source| IngestError::Parse { source })?;
    let features = match (
        document.get("type").and_then(Value::as_str),
        document.get("features").and_then(Value::as_array),
    ) {
        (Some("FeatureCollection"), Some(features)) => features,
        _ => {
            return Err(IngestError::NotFeatureCollection {
                found: describe(&document),
            });
        }
    };

    let mut summary = IngestSummary::default();
    let mut records: Vec<BuildingRecord> = Vec::with_capacity(features.len());
    for (position, feature) in features.iter().enumerate() {
        summary.features += 1;
        match building_from_feature(feature) {
            Ok(record) => {
                summary.record_import(record.location);
                records.push(record);
            }
            Err(err) => {
                summary.skipped += 1;
                warn!("skipping feature {position}: {err}");
            }
        }
    }
    Ok((records.into_iter().collect(), summary))
}

/// Read a GeoJSON footprint file into a catalog.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use lightscore_data::ingest::ingest_geojson;
///
/// # fn main() -> Result<(), lightscore_data::ingest::IngestError> {
/// let (catalog, summary) = ingest_geojson(Path::new("buildings.geojson"))?;
/// assert_eq!(catalog.len() as u64, summary.imported);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns [`IngestError::Open`] when the file cannot be opened, otherwise
/// the errors of [`read_buildings`].
pub fn ingest_geojson(path: &Path) -> Result<(BuildingCatalog, IngestSummary), IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        source,
        path: path.to_path_buf(),
    })?;
    let (catalog, summary) = read_buildings(BufReader::new(file))?;
    info!(
        "read {} of {} features from {} ({} skipped)",
        summary.imported,
        summary.features,
        path.display(),
        summary.skipped
    );
    Ok((catalog, summary))
}

/// Ingest `input` and persist the result as a binary catalog artefact at
/// `output`.
///
/// An input with no usable features still produces an (empty) artefact;
/// loading it for scoring reports the data as unavailable.
///
/// # Errors
/// Returns any [`ingest_geojson`] error, or [`IngestError::Write`] when the
/// artefact cannot be written.
pub fn ingest_to_artefact(input: &Path, output: &Path) -> Result<IngestSummary, IngestError> {
    let (catalog, summary) = ingest_geojson(input)?;
    write_catalog(output, &catalog).map_err(|source| IngestError::Write { source })?;
    Ok(summary)
}
