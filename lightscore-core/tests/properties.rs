//! Property tests for the range and clamping guarantees of the models.

use geo::Coord;
use lightscore_core::{
    BlockageResult, Direction, NearbyBuilding, ScoreCompositor, ScoringModel, SunPosition,
    bearing_degrees, compute_blockage, obstruction_factor,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn nearby_building() -> impl Strategy<Value = NearbyBuilding> {
    (0.0..500.0_f64, 0.0..400.0_f64, -0.005..0.005_f64, -0.005..0.005_f64).prop_map(
        |(distance, height, latitude, longitude)| NearbyBuilding {
            distance,
            height,
            footprint_area: 0.0,
            latitude,
            longitude,
        },
    )
}

fn coordinate() -> impl Strategy<Value = Coord<f64>> {
    (-89.9..89.9_f64, -180.0..180.0_f64).prop_map(|(y, x)| Coord { x, y })
}

proptest! {
    #[test]
    fn obstruction_factor_stays_in_unit_interval(
        buildings in prop::collection::vec(nearby_building(), 0..40),
        floor in 1_u32..60,
    ) {
        let factor = obstruction_factor(&buildings, floor);
        prop_assert!((0.0..=1.0).contains(&factor));
    }

    #[test]
    fn blockage_stays_in_percentage_range(
        buildings in prop::collection::vec(nearby_building(), 0..40),
        elevation in -10.0..90.0_f64,
        azimuth in 0.0..360.0_f64,
        floor in 1_u32..60,
    ) {
        let sun = SunPosition { elevation, azimuth };
        let result = compute_blockage(sun, &buildings, Coord { x: 0.0, y: 0.0 }, floor);
        prop_assert!((0.0..=100.0).contains(&result.blockage_percentage));
        prop_assert_eq!(result.is_blocked, !result.blocking_buildings.is_empty());
    }

    #[test]
    fn composed_score_stays_in_range(
        elevation in -90.0..90.0_f64,
        blockage in 0.0..=100.0_f64,
        obstruction in 0.0..=1.0_f64,
        floor in 1_u32..200,
        direction in direction(),
        solar in any::<bool>(),
    ) {
        let model = if solar { ScoringModel::SolarElevation } else { ScoringModel::Static };
        let blockage = BlockageResult {
            is_blocked: blockage > 0.0,
            blockage_percentage: blockage,
            blocking_buildings: Vec::new(),
        };
        let sun = SunPosition { elevation, azimuth: 180.0 };
        let breakdown = ScoreCompositor::new(model).compose(sun, floor, direction, &blockage, obstruction);
        prop_assert!((0.0..=100.0).contains(&breakdown.final_score));
    }

    #[test]
    fn bearing_is_normalised(from in coordinate(), to in coordinate()) {
        let bearing = bearing_degrees(from, to);
        prop_assert!((0.0..360.0).contains(&bearing), "bearing {bearing} out of range");
    }

    #[test]
    fn axis_aligned_offsets_never_enter_diagonals(offset in prop::num::f64::NORMAL) {
        for direction in [Direction::NE, Direction::SE, Direction::SW, Direction::NW] {
            prop_assert!(!direction.contains(0.0, offset));
            prop_assert!(!direction.contains(offset, 0.0));
        }
    }
}
