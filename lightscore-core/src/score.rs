//! Combine the obstruction and blockage penalties into the final light score.
//!
//! Two scoring models exist. [`ScoringModel::Static`] is canonical: a fixed
//! baseline of 85 is reduced by half the blockage percentage, scaled by the
//! obstruction factor and the direction weight, and topped up with the floor
//! bonus. [`ScoringModel::SolarElevation`] derives the baseline from the sun's
//! height instead and subtracts blockage after weighting. The two are not
//! numerically equivalent.

use log::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::round_to;
use crate::{BlockageResult, Direction, SunPosition};

/// Baseline before any penalty under the static model.
pub const STATIC_BASELINE: f64 = 85.0;

/// Points deducted from the static baseline per blockage percentage point.
const BLOCKAGE_PENALTY: f64 = 0.5;

/// Clear-sky irradiance at zenith, in W/m², used by the solar-elevation model.
const PEAK_IRRADIANCE: f64 = 1_000.0;

/// Floor bonus points per storey and their cap.
const BONUS_PER_FLOOR: u32 = 2;
const MAX_FLOOR_BONUS: u32 = 20;

const MAX_SCORE: f64 = 100.0;

/// Bonus for observing from `floor`: two points per storey, capped at 20.
///
/// The first floor earns nothing.
///
/// # Examples
/// ```
/// use lightscore_core::floor_bonus;
///
/// assert_eq!(floor_bonus(1), 0.0);
/// assert_eq!(floor_bonus(4), 8.0);
/// assert_eq!(floor_bonus(40), 20.0);
/// ```
#[must_use]
pub fn floor_bonus(floor: u32) -> f64 {
    if floor > 1 {
        f64::from(floor.saturating_mul(BONUS_PER_FLOOR).min(MAX_FLOOR_BONUS))
    } else {
        0.0
    }
}

/// Selects how the baseline is derived and blockage is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScoringModel {
    /// Fixed baseline penalised by blockage.
    #[default]
    Static,
    /// Baseline proportional to potential irradiance at the sun's elevation.
    SolarElevation,
}

impl ScoringModel {
    /// Baseline score before obstruction, direction and floor adjustments.
    ///
    /// - `Static`: `85 - 0.5 · blockage`.
    /// - `SolarElevation`: `max(0, 1000 · sin(elevation)) / 10`, so a sun at
    ///   zenith yields 100 and a sun below the horizon yields 0.
    #[must_use]
    pub fn base_score(self, sun: SunPosition, blockage: &BlockageResult) -> f64 {
        match self {
            Self::Static => STATIC_BASELINE - blockage.blockage_percentage * BLOCKAGE_PENALTY,
            Self::SolarElevation => {
                let irradiance = (PEAK_IRRADIANCE * sun.elevation.to_radians().sin()).max(0.0);
                irradiance / (PEAK_IRRADIANCE / MAX_SCORE)
            }
        }
    }
}

/// Every input and intermediate of a scored observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreBreakdown {
    /// Final score in `[0, 100]`, one decimal place.
    pub final_score: f64,
    /// Baseline before adjustments.
    pub base_score: f64,
    /// Floor bonus applied.
    pub floor_bonus: f64,
    /// Ambient obstruction factor in `[0, 1]`.
    pub obstruction_factor: f64,
    /// Sun blockage in `[0, 100]`.
    pub blockage_percentage: f64,
    /// Facing direction.
    pub direction: Direction,
}

/// Folds penalties and bonuses into a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCompositor {
    model: ScoringModel,
}

impl ScoreCompositor {
    /// Create a compositor for `model`.
    #[must_use]
    pub const fn new(model: ScoringModel) -> Self {
        Self { model }
    }

    /// The configured scoring model.
    #[must_use]
    pub const fn model(&self) -> ScoringModel {
        self.model
    }

    /// Static-model combination of an upstream base score with the
    /// obstruction factor, direction weight and floor bonus.
    ///
    /// `min(100, base · obstruction · weight + floor_bonus)`, clamped at zero
    /// and rounded to one decimal place. `blockage` is accepted for contract
    /// symmetry; under this model it only acts through `base_score`.
    ///
    /// # Examples
    /// ```
    /// use lightscore_core::{BlockageResult, Direction, ScoreCompositor};
    ///
    /// let score = ScoreCompositor::combine(85.0, 10, Direction::S, &BlockageResult::default(), 0.5);
    /// assert_eq!(score, 62.5);
    /// ```
    #[must_use]
    pub fn combine(
        base_score: f64,
        floor: u32,
        direction: Direction,
        blockage: &BlockageResult,
        obstruction_factor: f64,
    ) -> f64 {
        let _ = blockage;
        let adjusted = base_score * obstruction_factor;
        let raw = adjusted * direction.weight() + floor_bonus(floor);
        round_to(raw.clamp(0.0, MAX_SCORE), 1)
    }

    /// Solar-elevation combination: blockage is subtracted after the
    /// direction weight is applied.
    #[must_use]
    pub fn combine_solar(
        potential: f64,
        floor: u32,
        direction: Direction,
        blockage: &BlockageResult,
        obstruction_factor: f64,
    ) -> f64 {
        let weighted = potential * obstruction_factor * direction.weight();
        let raw = weighted - blockage.blockage_percentage + floor_bonus(floor);
        round_to(raw.clamp(0.0, MAX_SCORE), 1)
    }

    /// Score an observation under the configured model.
    #[must_use]
    pub fn compose(
        &self,
        sun: SunPosition,
        floor: u32,
        direction: Direction,
        blockage: &BlockageResult,
        obstruction_factor: f64,
    ) -> ScoreBreakdown {
        let obstruction_factor = obstruction_factor.clamp(0.0, 1.0);
        let base_score = self.model.base_score(sun, blockage);
        let final_score = match self.model {
            ScoringModel::Static => {
                Self::combine(base_score, floor, direction, blockage, obstruction_factor)
            }
            ScoringModel::SolarElevation => {
                Self::combine_solar(base_score, floor, direction, blockage, obstruction_factor)
            }
        };
        info!(
            "score {final_score} ({:?}): base {base_score:.1}, floor {floor}, direction {direction}, \
             blockage {:.1}%, obstruction {obstruction_factor:.2}",
            self.model, blockage.blockage_percentage
        );
        ScoreBreakdown {
            final_score,
            base_score: round_to(base_score, 1),
            floor_bonus: floor_bonus(floor),
            obstruction_factor,
            blockage_percentage: blockage.blockage_percentage,
            direction,
        }
    }
}
