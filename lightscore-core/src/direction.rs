//! Compass octants used for facing direction and directional filtering.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::NearbyBuilding;

/// One of the eight compass octants.
///
/// An octant is defined by the sign pattern of the latitude and longitude
/// deltas from an origin. Cardinal octants only constrain one axis. A delta of
/// exactly zero never satisfies a constraint, so buildings on the origin's
/// meridian or parallel are excluded from the adjoining octants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// North.
    N,
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South.
    S,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

/// Error returned when a string is not one of the eight octants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid direction {value:?}; expected one of N, NE, E, SE, S, SW, W, NW")]
pub struct DirectionParseError {
    /// The rejected input.
    pub value: String,
}

impl Direction {
    /// All octants, clockwise from north.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Short compass label, e.g. `"SE"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }

    /// Score multiplier for a window facing this way.
    ///
    /// South-facing windows receive the most sun in the northern hemisphere.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::S => 1.0,
            Self::SE | Self::SW => 0.9,
            Self::E | Self::W => 0.8,
            Self::NE | Self::NW => 0.7,
            Self::N => 0.6,
        }
    }

    /// Whether a point offset by (`lat_diff`, `lng_diff`) lies in this octant.
    ///
    /// # Examples
    /// ```
    /// use lightscore_core::Direction;
    ///
    /// assert!(Direction::NE.contains(0.001, 0.002));
    /// assert!(!Direction::NE.contains(0.0, 0.002));
    /// assert!(Direction::E.contains(0.0, 0.002));
    /// ```
    #[must_use]
    pub fn contains(self, lat_diff: f64, lng_diff: f64) -> bool {
        let north = lat_diff > 0.0;
        let south = lat_diff < 0.0;
        let east = lng_diff > 0.0;
        let west = lng_diff < 0.0;
        match self {
            Self::N => north,
            Self::S => south,
            Self::E => east,
            Self::W => west,
            Self::NE => north && east,
            Self::SE => south && east,
            Self::SW => south && west,
            Self::NW => north && west,
        }
    }

    /// Keep the buildings lying in this octant relative to the origin.
    ///
    /// Input order is preserved.
    #[must_use]
    pub fn filter(
        self,
        buildings: Vec<NearbyBuilding>,
        origin_lat: f64,
        origin_lng: f64,
    ) -> Vec<NearbyBuilding> {
        buildings
            .into_iter()
            .filter(|b| self.contains(b.latitude - origin_lat, b.longitude - origin_lng))
            .collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DirectionParseError {
                value: s.to_owned(),
            })
    }
}
