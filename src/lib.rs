//! Facade crate for the light score engine.
//!
//! This crate re-exports the core domain types and, behind the `data`
//! feature, the GeoJSON ingester, the LocationIQ geocoder and the
//! algorithmic sun position provider.

#![forbid(unsafe_code)]

pub use lightscore_core::{
    Address, BlockageResult, BuildingCatalog, BuildingRecord, Coordinates, Direction,
    GeocodeError, Geocoder, LightScoreError, LightScoreReport, LightScorer, NearbyBuilding,
    ObservationPoint, ProximityIndex, ScoreDetails, ScoringConfig, ScoringModel, SharedIndex,
    SolarPositionProvider, SunPosition,
};

#[cfg(feature = "serde")]
pub use lightscore_core::{ArtefactError, load_catalog, write_catalog};

#[cfg(feature = "data")]
pub use lightscore_data::{
    AlgorithmicSunProvider, IngestError, IngestSummary, LocationIqConfig, LocationIqGeocoder,
    ingest_geojson,
};
