use geo::Coord;
use thiserror::Error;

use crate::Direction;

/// Storey height used to turn a floor number into an eye height.
pub const FLOOR_HEIGHT_METERS: f64 = 3.0;

/// Eye height of an observer on `floor`, in metres.
#[must_use]
pub fn observer_height(floor: u32) -> f64 {
    f64::from(floor) * FLOOR_HEIGHT_METERS
}

/// Errors returned by [`ObservationPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ObservationError {
    /// Floors are numbered from one.
    #[error("floor must be at least 1")]
    FloorBelowOne,
    /// Latitude or longitude was NaN, infinite or outside WGS84 bounds.
    #[error("observation coordinate ({latitude}, {longitude}) is invalid")]
    InvalidCoordinate {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },
}

/// A window to score: where it is, how high, and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationPoint {
    location: Coord<f64>,
    floor: u32,
    direction: Direction,
}

impl ObservationPoint {
    /// Validate and construct an observation point.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use lightscore_core::{Direction, ObservationPoint};
    ///
    /// # fn main() -> Result<(), lightscore_core::ObservationError> {
    /// let point = ObservationPoint::new(Coord { x: -79.38, y: 43.64 }, 5, Direction::S)?;
    /// assert_eq!(point.floor(), 5);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        location: Coord<f64>,
        floor: u32,
        direction: Direction,
    ) -> Result<Self, ObservationError> {
        let Coord {
            x: longitude,
            y: latitude,
        } = location;
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(ObservationError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        if floor == 0 {
            return Err(ObservationError::FloorBelowOne);
        }
        Ok(Self {
            location,
            floor,
            direction,
        })
    }

    /// Window position, `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Floor number, starting at one.
    #[must_use]
    pub const fn floor(&self) -> u32 {
        self.floor
    }

    /// Facing direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Eye height in metres.
    #[must_use]
    pub fn height(&self) -> f64 {
        observer_height(self.floor)
    }
}
