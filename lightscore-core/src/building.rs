//! Building records held by the catalog and the derived per-request view.

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::METERS_PER_DEGREE;
use crate::math::round_to;

/// Height attributes as published by building datasets.
///
/// Sources populate different subsets of these fields, so every one is
/// optional. An absent field counts as `0.0`, never as missing data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeightAttributes {
    /// Minimum roof height in metres.
    pub min: Option<f64>,
    /// Maximum roof height in metres.
    pub max: Option<f64>,
    /// Average roof height in metres.
    pub average: Option<f64>,
    /// Height above mean sea level in metres.
    pub sea_level: Option<f64>,
}

impl HeightAttributes {
    /// Attributes carrying a single known height.
    ///
    /// # Examples
    /// ```
    /// use lightscore_core::HeightAttributes;
    ///
    /// assert_eq!(HeightAttributes::uniform(12.0).tallest(), 12.0);
    /// ```
    #[must_use]
    pub const fn uniform(height: f64) -> Self {
        Self {
            min: None,
            max: Some(height),
            average: None,
            sea_level: None,
        }
    }

    fn values(&self) -> [Option<f64>; 4] {
        [self.min, self.max, self.average, self.sea_level]
    }

    /// Largest populated attribute, never below zero.
    #[must_use]
    pub fn tallest(&self) -> f64 {
        self.values()
            .into_iter()
            .flatten()
            .fold(0.0_f64, f64::max)
    }
}

/// Errors returned by [`BuildingRecord::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BuildingRecordError {
    /// Latitude or longitude was NaN or infinite.
    #[error("building coordinate ({latitude}, {longitude}) is not finite")]
    NonFiniteCoordinate {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },
    /// Latitude or longitude fell outside the WGS84 range.
    #[error("building coordinate ({latitude}, {longitude}) is outside WGS84 bounds")]
    CoordinateOutOfRange {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },
    /// A height attribute or the footprint area was NaN or infinite.
    #[error("building {field} is not finite")]
    NonFiniteMeasure {
        /// Name of the offending attribute.
        field: &'static str,
    },
}

/// An immutable building entry owned by the catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildingRecord {
    /// Representative point of the building, `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Height in metres, the tallest of the source attributes.
    pub height: f64,
    /// Footprint area in square metres.
    pub footprint_area: f64,
}

impl BuildingRecord {
    /// Validate and construct a record.
    ///
    /// Negative heights and areas are clamped to zero.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use lightscore_core::{BuildingRecord, HeightAttributes};
    ///
    /// # fn main() -> Result<(), lightscore_core::BuildingRecordError> {
    /// let heights = HeightAttributes {
    ///     min: Some(20.0),
    ///     max: Some(48.5),
    ///     average: None,
    ///     sea_level: Some(31.0),
    /// };
    /// let record = BuildingRecord::new(Coord { x: -79.38, y: 43.65 }, heights, 900.0)?;
    /// assert_eq!(record.height, 48.5);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        location: Coord<f64>,
        heights: HeightAttributes,
        footprint_area: f64,
    ) -> Result<Self, BuildingRecordError> {
        let Coord {
            x: longitude,
            y: latitude,
        } = location;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(BuildingRecordError::NonFiniteCoordinate {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(BuildingRecordError::CoordinateOutOfRange {
                latitude,
                longitude,
            });
        }
        if heights.values().into_iter().flatten().any(|v| !v.is_finite()) {
            return Err(BuildingRecordError::NonFiniteMeasure { field: "height" });
        }
        if !footprint_area.is_finite() {
            return Err(BuildingRecordError::NonFiniteMeasure {
                field: "footprint area",
            });
        }
        Ok(Self {
            location,
            height: heights.tallest(),
            footprint_area: footprint_area.max(0.0),
        })
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
}

/// Planar distance between two coordinates in metres.
///
/// Degrees on both axes are scaled by [`METERS_PER_DEGREE`].
#[must_use]
pub fn planar_distance_meters(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y) * METERS_PER_DEGREE
}

/// A building near an observation point, as seen by one request.
///
/// Distances, heights and areas are rounded to one decimal place to match the
/// published payload. Field names follow that payload when serialised.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearbyBuilding {
    /// Distance from the observation point in metres.
    pub distance: f64,
    /// Building height in metres.
    pub height: f64,
    /// Footprint area in square metres.
    #[cfg_attr(feature = "serde", serde(rename = "area"))]
    pub footprint_area: f64,
    /// Latitude in degrees.
    #[cfg_attr(feature = "serde", serde(rename = "lat"))]
    pub latitude: f64,
    /// Longitude in degrees.
    #[cfg_attr(feature = "serde", serde(rename = "lng"))]
    pub longitude: f64,
}

impl NearbyBuilding {
    /// Derive the per-request view of `record` at `distance` metres.
    #[must_use]
    pub fn from_record(record: &BuildingRecord, distance: f64) -> Self {
        Self {
            distance: round_to(distance.max(0.0), 1),
            height: round_to(record.height, 1),
            footprint_area: round_to(record.footprint_area, 1),
            latitude: record.latitude(),
            longitude: record.longitude(),
        }
    }

    /// Position as a coordinate, `x = longitude`, `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(HeightAttributes::default(), 0.0)]
    #[case(HeightAttributes { min: Some(4.0), max: None, average: Some(9.5), sea_level: None }, 9.5)]
    #[case(HeightAttributes { min: Some(-3.0), max: None, average: None, sea_level: None }, 0.0)]
    #[case(HeightAttributes { min: Some(10.0), max: Some(30.0), average: Some(20.0), sea_level: Some(112.0) }, 112.0)]
    fn tallest_takes_maximum_of_present_fields(
        #[case] heights: HeightAttributes,
        #[case] expected: f64,
    ) {
        assert_eq!(heights.tallest(), expected);
    }

    #[rstest]
    #[case(Coord { x: f64::NAN, y: 0.0 })]
    #[case(Coord { x: 0.0, y: f64::INFINITY })]
    fn rejects_non_finite_coordinates(#[case] location: Coord<f64>) {
        let err = BuildingRecord::new(location, HeightAttributes::default(), 0.0)
            .expect_err("non-finite coordinate");
        assert!(matches!(err, BuildingRecordError::NonFiniteCoordinate { .. }));
    }

    #[rstest]
    #[case(Coord { x: 0.0, y: 90.5 })]
    #[case(Coord { x: -180.5, y: 0.0 })]
    fn rejects_out_of_range_coordinates(#[case] location: Coord<f64>) {
        let err = BuildingRecord::new(location, HeightAttributes::default(), 0.0)
            .expect_err("out of range");
        assert!(matches!(err, BuildingRecordError::CoordinateOutOfRange { .. }));
    }

    #[rstest]
    fn rejects_non_finite_height() {
        let heights = HeightAttributes {
            average: Some(f64::NAN),
            ..HeightAttributes::default()
        };
        let err = BuildingRecord::new(Coord { x: 0.0, y: 0.0 }, heights, 1.0)
            .expect_err("nan height");
        assert_eq!(err, BuildingRecordError::NonFiniteMeasure { field: "height" });
    }

    #[rstest]
    fn clamps_negative_area() {
        let record =
            BuildingRecord::new(Coord { x: 0.0, y: 0.0 }, HeightAttributes::uniform(5.0), -2.0)
                .expect("valid record");
        assert_eq!(record.footprint_area, 0.0);
    }

    #[rstest]
    fn nearby_view_rounds_to_one_decimal() {
        let record = BuildingRecord::new(
            Coord { x: -79.38, y: 43.65 },
            HeightAttributes::uniform(48.26),
            1_234.56,
        )
        .expect("valid record");
        let nearby = NearbyBuilding::from_record(&record, 52.349);
        assert_eq!(nearby.distance, 52.3);
        assert_eq!(nearby.height, 48.3);
        assert_eq!(nearby.footprint_area, 1_234.6);
        assert_eq!(nearby.location(), record.location);
    }

    #[rstest]
    fn planar_distance_scales_degrees() {
        let d = planar_distance_meters(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0003, y: 0.0004 });
        assert!((d - 55.5).abs() < 1e-6);
    }
}
