//! Deterministic collaborators for unit, behaviour and downstream tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use geo::Coord;

use crate::{
    Address, BuildingRecord, GeocodeError, Geocoder, HeightAttributes, SolarPositionError,
    SolarPositionProvider, SunPosition,
};

/// A validated record at (`latitude`, `longitude`) with a single height.
///
/// # Panics
/// Panics when the coordinate or height is invalid.
#[must_use]
pub fn building_at(latitude: f64, longitude: f64, height: f64) -> BuildingRecord {
    BuildingRecord::new(
        Coord {
            x: longitude,
            y: latitude,
        },
        HeightAttributes::uniform(height),
        0.0,
    )
    .expect("fixture building is valid")
}

/// Solar provider that always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSunProvider {
    position: SunPosition,
}

impl FixedSunProvider {
    /// Report `elevation` and `azimuth` for every request.
    #[must_use]
    pub const fn new(elevation: f64, azimuth: f64) -> Self {
        Self {
            position: SunPosition {
                elevation,
                azimuth,
            },
        }
    }
}

impl SolarPositionProvider for FixedSunProvider {
    fn position(
        &self,
        _location: Coord<f64>,
        _instant: Option<DateTime<Utc>>,
    ) -> Result<SunPosition, SolarPositionError> {
        Ok(self.position)
    }
}

/// Solar provider that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSunProvider;

impl SolarPositionProvider for FailingSunProvider {
    fn position(
        &self,
        _location: Coord<f64>,
        _instant: Option<DateTime<Utc>>,
    ) -> Result<SunPosition, SolarPositionError> {
        Err(SolarPositionError::Unavailable {
            reason: "ephemeris offline".into(),
        })
    }
}

/// Geocoder returning a fixed answer and counting calls.
#[derive(Debug)]
pub struct StaticGeocoder {
    outcome: Result<Coord<f64>, GeocodeError>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    /// Resolve every address to `location`.
    #[must_use]
    pub const fn at(location: Coord<f64>) -> Self {
        Self {
            outcome: Ok(location),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every lookup with `error`.
    #[must_use]
    pub const fn failing(error: GeocodeError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for StaticGeocoder {
    fn locate(&self, _address: &Address) -> Result<Coord<f64>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
