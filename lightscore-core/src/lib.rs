//! Core domain types and scoring algorithms for the light score engine.
//!
//! The crate estimates how much natural light reaches a window by combining
//! the sun's position with the bulk of the buildings around it. Everything
//! here is pure computation over read-only data:
//!
//! - [`BuildingCatalog`] and [`ProximityIndex`] answer "which buildings are
//!   within R metres of this point".
//! - [`Direction`] narrows the result to one compass octant.
//! - [`obstruction_factor`] and [`compute_blockage`] turn the remaining
//!   buildings into an ambient and a sun-specific penalty.
//! - [`ScoreCompositor`] folds those penalties into the final score.
//!
//! Geocoding and solar ephemerides are collaborators reached through the
//! [`Geocoder`] and [`SolarPositionProvider`] traits. Adapters live in
//! `lightscore-data`.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod blockage;
pub mod building;
pub mod catalog;
pub mod direction;
mod error;
pub mod geocode;
mod math;
pub mod obstruction;
mod observation;
pub mod pipeline;
pub mod score;
pub mod solar;
#[doc(hidden)]
pub mod test_support;

pub use blockage::{BlockageResult, BlockingBuilding, bearing_degrees, compute_blockage};
pub use building::{BuildingRecord, BuildingRecordError, HeightAttributes, NearbyBuilding};
pub use catalog::{BuildingCatalog, CatalogError, ProximityIndex, SharedIndex};
pub use direction::{Direction, DirectionParseError};
pub use error::LightScoreError;
pub use geocode::{Address, GeocodeError, Geocoder};
pub use obstruction::obstruction_factor;
pub use observation::{FLOOR_HEIGHT_METERS, ObservationError, ObservationPoint, observer_height};
pub use pipeline::{Coordinates, LightScoreReport, LightScorer, ScoreDetails, ScoringConfig};
pub use score::{ScoreBreakdown, ScoreCompositor, ScoringModel, floor_bonus};
pub use solar::{SolarPositionError, SolarPositionProvider, SunPosition};

#[cfg(feature = "serde")]
pub use catalog::{ArtefactError, load_catalog, write_catalog};

/// Approximate length of one degree of latitude, in metres.
///
/// The same constant converts longitude degrees, so distances are planar
/// approximations that stretch east-west away from the equator.
pub const METERS_PER_DEGREE: f64 = 111_000.0;
