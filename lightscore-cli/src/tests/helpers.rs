//! Test helpers for building catalogs, GeoJSON inputs and stub geocoders.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use lightscore_core::test_support::{StaticGeocoder, building_at};
use lightscore_core::{BuildingCatalog, BuildingRecord, GeocodeError, Geocoder, write_catalog};
use lightscore_data::LocationIqConfig;
use lightscore_data::test_support::{building_feature, feature_collection};
use std::fs;
use tempfile::TempDir;

use crate::CliError;
use crate::score::GeocoderFactory;

/// Window used throughout the CLI tests: Queen St W, Toronto.
pub(super) const WINDOW: Coord<f64> = Coord {
    x: -79.38,
    y: 43.65,
};

/// Local solar noon at the window on the 2024 summer solstice.
pub(super) const SOLSTICE_NOON: &str = "2024-06-20T17:19:00Z";

/// Scratch directory with UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `records` as a catalog artefact named `name`.
    pub(super) fn catalog(&self, name: &str, records: Vec<BuildingRecord>) -> Utf8PathBuf {
        let path = self.path(name);
        write_catalog(path.as_std_path(), &BuildingCatalog::new(records)).expect("write catalog");
        path
    }

    /// A catalog holding one 30 m building about 33 m south of [`WINDOW`].
    pub(super) fn southern_neighbour(&self) -> Utf8PathBuf {
        self.catalog(
            "buildings.lsbc",
            vec![building_at(WINDOW.y - 0.0003, WINDOW.x, 30.0)],
        )
    }

    /// A GeoJSON file with two usable features and one without coordinates.
    pub(super) fn footprints(&self) -> Utf8PathBuf {
        let path = self.path("footprints.geojson");
        let body = feature_collection([
            building_feature(WINDOW.y - 0.0003, WINDOW.x, 30.0),
            building_feature(WINDOW.y + 0.0004, WINDOW.x + 0.0002, 55.0),
            serde_json::json!({ "type": "Feature", "properties": { "MAX_HEIGHT": 12.0 } }),
        ]);
        write_utf8(&path, body.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write file");
}

/// Builds geocoders that answer from memory.
pub(super) enum StubGeocoders {
    At(Coord<f64>),
    NotFound,
}

impl GeocoderFactory for StubGeocoders {
    fn build(&self, _config: &LocationIqConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = match self {
            Self::At(location) => StaticGeocoder::at(*location),
            Self::NotFound => StaticGeocoder::failing(GeocodeError::NotFound {
                address: "1 Nowhere Rd, Toronto, M5H 2N2, Canada".into(),
            }),
        };
        Ok(Box::new(geocoder))
    }
}

/// Score arguments for a first-floor south-facing window at [`WINDOW`].
pub(super) fn coordinate_args(catalog: &Utf8Path) -> crate::score::ScoreArgs {
    crate::score::ScoreArgs {
        catalog: Some(catalog.to_path_buf()),
        lat: Some(WINDOW.y),
        lng: Some(WINDOW.x),
        floor: Some(1),
        direction: Some("S".into()),
        at: Some(SOLSTICE_NOON.into()),
        ..crate::score::ScoreArgs::default()
    }
}

/// Score arguments naming a full postal address instead of coordinates.
pub(super) fn address_args(catalog: &Utf8Path) -> crate::score::ScoreArgs {
    crate::score::ScoreArgs {
        catalog: Some(catalog.to_path_buf()),
        street_number: Some("100".into()),
        street_name: Some("Queen St W".into()),
        city: Some("Toronto".into()),
        postal_code: Some("M5H 2N2".into()),
        country: Some("Canada".into()),
        floor: Some(1),
        direction: Some("S".into()),
        at: Some(SOLSTICE_NOON.into()),
        geocoder_key: Some("test-key".into()),
        ..crate::score::ScoreArgs::default()
    }
}
