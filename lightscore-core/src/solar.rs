//! Solar position as consumed by the blockage model.
//!
//! The engine never computes ephemerides itself. A [`SolarPositionProvider`]
//! returns the sun's elevation and azimuth for a place and instant, and the
//! result is treated as opaque. Positions are time-dependent, so callers must
//! not cache them across requests.

use chrono::{DateTime, Utc};
use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The sun's apparent position from a point on the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SunPosition {
    /// Angle above the horizon in degrees, `[-90, 90]`.
    pub elevation: f64,
    /// Compass bearing in degrees clockwise from north, `[0, 360)`.
    pub azimuth: f64,
}

/// Errors from [`SolarPositionProvider::position`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolarPositionError {
    /// No position could be resolved for the location and time.
    #[error("solar position unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
}

/// Resolve the sun's position for a location and instant.
///
/// `instant` defaults to the current time when `None`. Implementations may
/// block on I/O; the engine imposes no retries or timeouts of its own.
///
/// # Examples
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use geo::Coord;
/// use lightscore_core::{SolarPositionError, SolarPositionProvider, SunPosition};
///
/// struct Zenith;
///
/// impl SolarPositionProvider for Zenith {
///     fn position(
///         &self,
///         _location: Coord<f64>,
///         _instant: Option<DateTime<Utc>>,
///     ) -> Result<SunPosition, SolarPositionError> {
///         Ok(SunPosition { elevation: 90.0, azimuth: 0.0 })
///     }
/// }
///
/// let sun = Zenith.position(Coord { x: 0.0, y: 0.0 }, None)?;
/// assert_eq!(sun.elevation, 90.0);
/// # Ok::<(), SolarPositionError>(())
/// ```
pub trait SolarPositionProvider: Send + Sync {
    /// Return the sun's position at `location`, `x = longitude`, `y = latitude`.
    fn position(
        &self,
        location: Coord<f64>,
        instant: Option<DateTime<Utc>>,
    ) -> Result<SunPosition, SolarPositionError>;
}

impl<P: SolarPositionProvider + ?Sized> SolarPositionProvider for &P {
    fn position(
        &self,
        location: Coord<f64>,
        instant: Option<DateTime<Utc>>,
    ) -> Result<SunPosition, SolarPositionError> {
        (**self).position(location, instant)
    }
}
