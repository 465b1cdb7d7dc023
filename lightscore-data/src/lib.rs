//! Data access and external adapters for the light score engine.
//!
//! Responsibilities:
//! - Ingest GeoJSON building footprints into catalog artefacts.
//! - Resolve postal addresses through the LocationIQ search API.
//! - Compute solar positions locally.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `lightscore-core`).
//! - Keep blocking I/O off async executors; the geocoder owns its runtime.
//!
//! Invariants:
//! - Adapters are `Send + Sync` and hold no global mutable state.
//! - Secrets never appear in `Debug` output or error messages.

pub mod geocoding;
pub mod ingest;
pub mod solar;
#[doc(hidden)]
pub mod test_support;

pub use geocoding::{GeocoderBuildError, LocationIqConfig, LocationIqGeocoder};
pub use ingest::{
    IngestError, IngestSummary, ingest_geojson, ingest_to_artefact, read_buildings,
};
pub use solar::AlgorithmicSunProvider;
