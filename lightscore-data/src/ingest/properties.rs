//! Attribute table of a building footprint feature.

use geo::Coord;
use lightscore_core::{BuildingRecord, BuildingRecordError, HeightAttributes};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why a feature was skipped.
#[derive(Debug, Error)]
pub(super) enum FeatureError {
    #[error("feature has no properties object")]
    MissingProperties,
    #[error("feature properties are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("feature has no coordinates")]
    MissingCoordinates,
    #[error(transparent)]
    Invalid(#[from] BuildingRecordError),
}

/// Column names follow the municipal footprint export; lower-case aliases are
/// accepted for hand-written files.
#[derive(Debug, Default, Deserialize)]
struct BuildingProperties {
    #[serde(rename = "LATITUDE", alias = "latitude", default)]
    latitude: Option<f64>,
    #[serde(rename = "LONGITUDE", alias = "longitude", default)]
    longitude: Option<f64>,
    #[serde(rename = "MIN_HEIGHT", alias = "min_height", default)]
    min_height: Option<f64>,
    #[serde(rename = "MAX_HEIGHT", alias = "max_height", default)]
    max_height: Option<f64>,
    #[serde(rename = "AVG_HEIGHT", alias = "avg_height", default)]
    avg_height: Option<f64>,
    #[serde(rename = "HEIGHT_MSL", alias = "height_msl", default)]
    height_msl: Option<f64>,
    #[serde(rename = "SHAPE_AREA", alias = "shape_area", default)]
    shape_area: Option<f64>,
}

/// `[lng, lat]` of a `Point` geometry, used when the attribute table carries
/// no coordinates.
fn point_geometry(feature: &Value) -> Option<Coord<f64>> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type")?.as_str()? != "Point" {
        return None;
    }
    let coordinates = geometry.get("coordinates")?.as_array()?;
    Some(Coord {
        x: coordinates.first()?.as_f64()?,
        y: coordinates.get(1)?.as_f64()?,
    })
}

/// Convert one GeoJSON feature into a catalog record.
pub(super) fn building_from_feature(feature: &Value) -> Result<BuildingRecord, FeatureError> {
    let properties = feature
        .get("properties")
        .filter(|p| p.is_object())
        .ok_or(FeatureError::MissingProperties)?;
    let props = BuildingProperties::deserialize(properties)?;

    let location = match (props.latitude, props.longitude) {
        (Some(latitude), Some(longitude)) => Coord {
            x: longitude,
            y: latitude,
        },
        _ => point_geometry(feature).ok_or(FeatureError::MissingCoordinates)?,
    };
    let heights = HeightAttributes {
        min: props.min_height,
        max: props.max_height,
        average: props.avg_height,
        sea_level: props.height_msl,
    };
    Ok(BuildingRecord::new(
        location,
        heights,
        props.shape_area.unwrap_or_default(),
    )?)
}
