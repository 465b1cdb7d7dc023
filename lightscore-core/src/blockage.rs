//! Direct occlusion of the sun by individual buildings.
//!
//! A building blocks the sun when it sits inside a 15° azimuth cone around the
//! sun's bearing and its angular height exceeds the sun's elevation. Its
//! impact tapers linearly to zero at the edge of the cone:
//!
//! `impact = (θ_building - elevation) · (15 - Δazimuth) / 15`
//!
//! Impacts accumulate into a blockage percentage capped at 100.

use geo::Coord;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::{angular_height, normalise_degrees};
use crate::observation::observer_height;
use crate::{NearbyBuilding, SunPosition};

/// Half-width of the azimuth cone in which a building can occlude the sun.
pub const AZIMUTH_TOLERANCE_DEGREES: f64 = 15.0;

/// Upper bound of the accumulated blockage.
const MAX_BLOCKAGE_PERCENTAGE: f64 = 100.0;

/// One building's contribution to sun blockage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockingBuilding {
    /// Distance from the observer in metres.
    pub distance: f64,
    /// Building height in metres.
    pub height: f64,
    /// Angular height above the observer's eye line, in degrees.
    pub angle: f64,
    /// Shortest angular distance between the building's bearing and the sun's
    /// azimuth, in degrees.
    pub azimuth_diff: f64,
    /// Blockage points contributed by this building.
    pub impact: f64,
}

/// Outcome of the blockage analysis for one sun position.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockageResult {
    /// Whether at least one building occludes the sun.
    pub is_blocked: bool,
    /// Accumulated impact in `[0, 100]`.
    pub blockage_percentage: f64,
    /// Contributing buildings in input order.
    pub blocking_buildings: Vec<BlockingBuilding>,
}

/// Initial bearing from `from` to `to` in degrees, normalised to `[0, 360)`.
///
/// Uses the forward-azimuth formula on the sphere:
/// `atan2(sin Δλ · cos φ2, cos φ1 · sin φ2 − sin φ1 · cos φ2 · cos Δλ)`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use lightscore_core::bearing_degrees;
///
/// let due_east = bearing_degrees(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 });
/// assert!((due_east - 90.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn bearing_degrees(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lng = (to.x - from.x).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();
    normalise_degrees(y.atan2(x).to_degrees())
}

/// Shortest unsigned angle between two bearings, in `[0, 180]`.
fn azimuth_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Determine which buildings occlude the sun from the observer's window.
///
/// Buildings no taller than the observer's eye height are ignored. The
/// building's bearing is measured from the building towards the observer.
#[must_use]
pub fn compute_blockage(
    sun: SunPosition,
    buildings: &[NearbyBuilding],
    observer: Coord<f64>,
    floor: u32,
) -> BlockageResult {
    let mut result = BlockageResult::default();
    let eye_height = observer_height(floor);

    for building in buildings {
        let rise = building.height - eye_height;
        if rise <= 0.0 {
            continue;
        }
        let angle = angular_height(rise, building.distance);
        let bearing = bearing_degrees(building.location(), observer);
        let azimuth_diff = azimuth_difference(bearing, sun.azimuth);
        debug!(
            "building at {:.1}m: angle {angle:.2}°, bearing {bearing:.2}°, Δazimuth {azimuth_diff:.2}°",
            building.distance
        );

        if azimuth_diff >= AZIMUTH_TOLERANCE_DEGREES || angle <= sun.elevation {
            continue;
        }

        let impact = (angle - sun.elevation) * (AZIMUTH_TOLERANCE_DEGREES - azimuth_diff)
            / AZIMUTH_TOLERANCE_DEGREES;
        result.is_blocked = true;
        result.blockage_percentage =
            (result.blockage_percentage + impact).min(MAX_BLOCKAGE_PERCENTAGE);
        result.blocking_buildings.push(BlockingBuilding {
            distance: building.distance,
            height: building.height,
            angle,
            azimuth_diff,
            impact,
        });
    }

    result
}
