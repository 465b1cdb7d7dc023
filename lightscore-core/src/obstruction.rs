//! Ambient obstruction from the surrounding skyline.
//!
//! Each building taller than the observer contributes its angular height,
//! weighted by proximity:
//!
//! - angular height `θ = atan2(height - eye_height, distance)` in degrees
//! - weight `w = 1 / (1 + distance / 100)`
//! - factor `= clamp(1 - Σ(θ·w) / 360, 0, 1)`, rounded to two decimals
//!
//! A weighted sum of a full circle or more counts as total obstruction. The
//! factor is independent of the sun's position.

use log::debug;

use crate::NearbyBuilding;
use crate::math::{angular_height, round_to};
use crate::observation::observer_height;

/// Angular sum treated as complete obstruction.
const FULL_CIRCLE_DEGREES: f64 = 360.0;

/// Distance, in metres, at which a building's weight halves.
const WEIGHT_HALF_DISTANCE: f64 = 100.0;

/// Proximity weight for a building `distance` metres away.
fn proximity_weight(distance: f64) -> f64 {
    1.0 / (1.0 + distance / WEIGHT_HALF_DISTANCE)
}

/// Compute the obstruction factor in `[0, 1]`; `1.0` means unobstructed.
///
/// # Examples
/// ```
/// use lightscore_core::obstruction_factor;
///
/// assert_eq!(obstruction_factor(&[], 3), 1.0);
/// ```
#[must_use]
pub fn obstruction_factor(buildings: &[NearbyBuilding], floor: u32) -> f64 {
    if buildings.is_empty() {
        return 1.0;
    }
    let eye_height = observer_height(floor);
    let total: f64 = buildings
        .iter()
        .filter_map(|building| {
            let rise = building.height - eye_height;
            (rise > 0.0).then(|| {
                let angle = angular_height(rise, building.distance);
                let weight = proximity_weight(building.distance);
                debug!(
                    "building at {:.1}m rises {rise:.1}m: angle {angle:.2}°, weight {weight:.3}",
                    building.distance
                );
                angle * weight
            })
        })
        .sum();
    let factor = (1.0 - total / FULL_CIRCLE_DEGREES).clamp(0.0, 1.0);
    debug!(
        "obstruction over {} buildings at floor {floor}: total {total:.2}°, factor {factor:.2}",
        buildings.len()
    );
    round_to(factor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn building(distance: f64, height: f64) -> NearbyBuilding {
        NearbyBuilding {
            distance,
            height,
            footprint_area: 0.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[fixture]
    fn tower() -> NearbyBuilding {
        building(50.0, 150.0)
    }

    #[rstest]
    fn empty_input_is_unobstructed() {
        assert_eq!(obstruction_factor(&[], 1), 1.0);
    }

    #[rstest]
    fn buildings_below_eye_level_are_ignored() {
        let low = [building(10.0, 2.0), building(5.0, 30.0)];
        assert_eq!(obstruction_factor(&low, 10), 1.0);
    }

    #[rstest]
    fn single_tower_matches_hand_calculation(tower: NearbyBuilding) {
        // atan2(147, 50) ≈ 71.21°, weight 1 / 1.5, sum ≈ 47.47°.
        let expected = round_to(1.0 - (147.0_f64.atan2(50.0).to_degrees() / 1.5) / 360.0, 2);
        assert_eq!(obstruction_factor(&[tower], 1), expected);
        assert_eq!(expected, 0.87);
    }

    #[rstest]
    fn higher_floor_reduces_obstruction(tower: NearbyBuilding) {
        let low = obstruction_factor(std::slice::from_ref(&tower), 1);
        let high = obstruction_factor(&[tower], 30);
        assert!(high > low);
    }

    #[rstest]
    fn overwhelming_skyline_clamps_to_zero() {
        let wall: Vec<_> = (0..20).map(|_| building(1.0, 500.0)).collect();
        assert_eq!(obstruction_factor(&wall, 1), 0.0);
    }

    #[rstest]
    fn zero_distance_counts_as_vertical() {
        let factor = obstruction_factor(&[building(0.0, 40.0)], 1);
        assert_eq!(factor, round_to(1.0 - 90.0 / 360.0, 2));
    }
}
