//! The scoring request pipeline.
//!
//! [`LightScorer`] runs one request end to end over a shared, read-only
//! [`ProximityIndex`]:
//!
//! 1. query buildings within the search radius, widening once when nothing
//!    is found and a fallback radius is configured;
//! 2. keep the buildings in the requested octant;
//! 3. resolve the sun's position;
//! 4. compute blockage and obstruction;
//! 5. fold everything into a score.
//!
//! Requests share nothing mutable, so one scorer can serve many threads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::Coord;
use log::{info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Address, BlockageResult, Direction, Geocoder, LightScoreError, NearbyBuilding,
    ObservationPoint, ProximityIndex, ScoreCompositor, ScoringModel, SolarPositionProvider,
    SunPosition, compute_blockage, obstruction_factor,
};

/// Default search radius in metres.
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 100.0;

/// Default widened radius tried when the primary search finds nothing.
pub const DEFAULT_FALLBACK_RADIUS_METERS: f64 = 500.0;

/// Tunables for a [`LightScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoringConfig {
    /// Radius of the primary building search.
    pub search_radius_meters: f64,
    /// Radius retried when the primary search is empty; `None` disables the
    /// retry.
    pub fallback_radius_meters: Option<f64>,
    /// Scoring model used by the compositor.
    pub model: ScoringModel,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            fallback_radius_meters: Some(DEFAULT_FALLBACK_RADIUS_METERS),
            model: ScoringModel::default(),
        }
    }
}

/// Latitude and longitude as reported back to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

/// Intermediate values behind a score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreDetails {
    /// Baseline before adjustments, one decimal place.
    pub base_score: f64,
    /// Floor bonus applied.
    pub floor_bonus: f64,
    /// Facing direction.
    pub direction: Direction,
    /// Sun blockage analysis.
    pub sun_blockage: BlockageResult,
    /// Ambient obstruction factor.
    pub obstruction_factor: f64,
}

/// Result of one scoring request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightScoreReport {
    /// Where the score was computed.
    pub coordinates: Coordinates,
    /// Final score in `[0, 100]`.
    pub light_score: f64,
    /// How the score was reached.
    pub details: ScoreDetails,
    /// Sun position used for blockage.
    pub sun_position: SunPosition,
    /// Buildings in the requested octant, nearest first.
    pub building_data: Vec<NearbyBuilding>,
}

/// Scores observation points against a shared building index.
#[derive(Debug)]
pub struct LightScorer<P> {
    index: Arc<ProximityIndex>,
    provider: P,
    config: ScoringConfig,
}

impl<P: SolarPositionProvider> LightScorer<P> {
    /// Create a scorer with the default configuration.
    pub fn new(index: Arc<ProximityIndex>, provider: P) -> Self {
        Self::with_config(index, provider, ScoringConfig::default())
    }

    /// Create a scorer with explicit tunables.
    pub const fn with_config(index: Arc<ProximityIndex>, provider: P, config: ScoringConfig) -> Self {
        Self {
            index,
            provider,
            config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Buildings around `origin`, widening the search once if nothing is found.
    fn nearby(&self, origin: Coord<f64>) -> Vec<NearbyBuilding> {
        let primary = self.config.search_radius_meters;
        let found = self.index.query(origin, primary);
        match self.config.fallback_radius_meters {
            Some(widened) if found.is_empty() && widened > primary => {
                warn!("no buildings within {primary}m; widening search to {widened}m");
                self.index.query(origin, widened)
            }
            _ => found,
        }
    }

    /// Score a validated observation point.
    ///
    /// `instant` is passed to the solar provider; `None` means now.
    ///
    /// # Errors
    /// Returns [`LightScoreError::PositionUnavailable`] when the solar provider
    /// fails. No partial score is produced in that case.
    pub fn score(
        &self,
        point: &ObservationPoint,
        instant: Option<DateTime<Utc>>,
    ) -> Result<LightScoreReport, LightScoreError> {
        let direction = point.direction();
        let candidates = self.nearby(point.location());
        let buildings = direction.filter(candidates, point.latitude(), point.longitude());
        info!(
            "{} buildings facing {direction} from ({}, {})",
            buildings.len(),
            point.latitude(),
            point.longitude()
        );

        let sun = self.provider.position(point.location(), instant)?;
        let blockage = compute_blockage(sun, &buildings, point.location(), point.floor());
        let obstruction = obstruction_factor(&buildings, point.floor());
        let breakdown = ScoreCompositor::new(self.config.model).compose(
            sun,
            point.floor(),
            direction,
            &blockage,
            obstruction,
        );

        Ok(LightScoreReport {
            coordinates: point.location().into(),
            light_score: breakdown.final_score,
            details: ScoreDetails {
                base_score: breakdown.base_score,
                floor_bonus: breakdown.floor_bonus,
                direction,
                sun_blockage: blockage,
                obstruction_factor: breakdown.obstruction_factor,
            },
            sun_position: sun,
            building_data: buildings,
        })
    }

    /// Geocode `address` and score it.
    ///
    /// The direction is validated before the geocoder is called.
    ///
    /// # Errors
    /// [`LightScoreError::InvalidDirection`] for an unknown octant,
    /// [`LightScoreError::LocationUnresolved`] when the address has no match,
    /// [`LightScoreError::Geocoder`] for upstream failures, and anything
    /// [`LightScorer::score`] returns.
    pub fn score_address(
        &self,
        geocoder: &dyn Geocoder,
        address: &Address,
        floor: u32,
        direction: &str,
        instant: Option<DateTime<Utc>>,
    ) -> Result<LightScoreReport, LightScoreError> {
        let direction: Direction = direction.parse()?;
        info!("scoring {address} (floor {floor}, facing {direction})");
        let location = geocoder.locate(address)?;
        let point = ObservationPoint::new(location, floor, direction)?;
        self.score(&point, instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingSunProvider, FixedSunProvider, StaticGeocoder, building_at};
    use crate::{BuildingCatalog, GeocodeError};
    use rstest::{fixture, rstest};

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    fn index(records: Vec<crate::BuildingRecord>) -> Arc<ProximityIndex> {
        Arc::new(ProximityIndex::build(&BuildingCatalog::new(records)))
    }

    #[fixture]
    fn midday() -> FixedSunProvider {
        FixedSunProvider::new(60.0, 180.0)
    }

    fn point(floor: u32, direction: Direction) -> ObservationPoint {
        ObservationPoint::new(ORIGIN, floor, direction).expect("valid point")
    }

    #[rstest]
    fn empty_neighbourhood_scores_from_baseline(midday: FixedSunProvider) {
        let scorer = LightScorer::new(index(Vec::new()), midday);
        let report = scorer.score(&point(1, Direction::S), None).expect("score");

        assert_eq!(report.light_score, 85.0);
        assert_eq!(report.details.obstruction_factor, 1.0);
        assert!(!report.details.sun_blockage.is_blocked);
        assert!(report.building_data.is_empty());
        assert_eq!(report.coordinates, Coordinates { lat: 0.0, lng: 0.0 });
    }

    #[rstest]
    fn only_buildings_in_octant_are_reported(midday: FixedSunProvider) {
        let scorer = LightScorer::new(
            index(vec![
                building_at(-0.0005, 0.0001, 30.0), // south-east of origin, inside S
                building_at(0.0005, 0.0001, 30.0),  // north
            ]),
            midday,
        );
        let report = scorer.score(&point(1, Direction::S), None).expect("score");
        assert_eq!(report.building_data.len(), 1);
        assert!(report.building_data.iter().all(|b| b.latitude < 0.0));
    }

    #[rstest]
    fn widened_search_only_runs_when_primary_is_empty(midday: FixedSunProvider) {
        let far = building_at(-0.003, 0.0, 90.0); // 333 m south
        let scorer = LightScorer::new(index(vec![far.clone()]), midday);
        let report = scorer.score(&point(1, Direction::S), None).expect("score");
        assert_eq!(report.building_data.len(), 1);

        let near = building_at(-0.0005, 0.0, 20.0);
        let scorer = LightScorer::new(index(vec![far, near]), midday);
        let report = scorer.score(&point(1, Direction::S), None).expect("score");
        let distances: Vec<f64> = report.building_data.iter().map(|b| b.distance).collect();
        assert_eq!(distances, vec![55.5]);
    }

    #[rstest]
    fn fallback_can_be_disabled(midday: FixedSunProvider) {
        let config = ScoringConfig {
            fallback_radius_meters: None,
            ..ScoringConfig::default()
        };
        let scorer =
            LightScorer::with_config(index(vec![building_at(-0.003, 0.0, 90.0)]), midday, config);
        let report = scorer.score(&point(1, Direction::S), None).expect("score");
        assert!(report.building_data.is_empty());
    }

    #[rstest]
    fn solar_failure_is_propagated() {
        let scorer = LightScorer::new(index(Vec::new()), FailingSunProvider);
        let err = scorer
            .score(&point(1, Direction::S), None)
            .expect_err("provider fails");
        assert!(matches!(err, LightScoreError::PositionUnavailable(_)));
    }

    #[rstest]
    fn invalid_direction_is_rejected_before_geocoding(midday: FixedSunProvider) {
        let scorer = LightScorer::new(index(Vec::new()), midday);
        let geocoder = StaticGeocoder::failing(GeocodeError::ParseError {
            message: "must not be called".into(),
        });
        let err = scorer
            .score_address(&geocoder, &Address::default(), 1, "north", None)
            .expect_err("invalid direction");
        assert!(matches!(err, LightScoreError::InvalidDirection(_)));
        assert_eq!(geocoder.calls(), 0);
    }

    #[rstest]
    fn unknown_address_is_unresolved(midday: FixedSunProvider) {
        let scorer = LightScorer::new(index(Vec::new()), midday);
        let geocoder = StaticGeocoder::failing(GeocodeError::NotFound {
            address: "1 Main St".into(),
        });
        let err = scorer
            .score_address(&geocoder, &Address::default(), 1, "S", None)
            .expect_err("not found");
        assert!(matches!(err, LightScoreError::LocationUnresolved { .. }));
    }

    #[rstest]
    fn geocoded_address_is_scored(midday: FixedSunProvider) {
        let scorer = LightScorer::new(index(Vec::new()), midday);
        let geocoder = StaticGeocoder::at(Coord { x: -79.38, y: 43.65 });
        let report = scorer
            .score_address(&geocoder, &Address::default(), 4, " sw ", None)
            .expect("score");
        assert_eq!(report.details.direction, Direction::SW);
        assert_eq!(report.details.floor_bonus, 8.0);
        assert_eq!(report.coordinates, Coordinates { lat: 43.65, lng: -79.38 });
        assert_eq!(geocoder.calls(), 1);
    }

    #[rstest]
    fn floor_zero_is_an_invalid_observation(midday: FixedSunProvider) {
        let scorer = LightScorer::new(index(Vec::new()), midday);
        let geocoder = StaticGeocoder::at(ORIGIN);
        let err = scorer
            .score_address(&geocoder, &Address::default(), 0, "S", None)
            .expect_err("floor zero");
        assert!(matches!(err, LightScoreError::InvalidObservation(_)));
    }
}
