//! The building catalog and the spatial structures built over it.
//!
//! [`BuildingCatalog`] owns the records in load order and offers a linear
//! bounding-box query. [`ProximityIndex`] is the R\*-tree used by requests,
//! and [`SharedIndex`] builds it once for concurrent callers.

use geo::{Intersects, Rect};
use thiserror::Error;

use crate::BuildingRecord;

#[cfg(feature = "serde")]
mod artefact;
mod index;
mod shared;

#[cfg(feature = "serde")]
pub use artefact::{ArtefactError, load_catalog, write_catalog};
pub use index::ProximityIndex;
pub use shared::SharedIndex;

/// Errors describing an unusable catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog holds no buildings.
    #[error("building catalog is empty")]
    Empty,
}

/// Read-only collection of every known building.
///
/// Iteration order is the load order and serves as the tie-break when two
/// buildings are equally distant from a query point.
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, Rect};
/// use lightscore_core::{BuildingCatalog, BuildingRecord, HeightAttributes};
///
/// let record = BuildingRecord::new(Coord { x: 0.0, y: 0.0 }, HeightAttributes::uniform(10.0), 50.0)
///     .expect("valid record");
/// let catalog = BuildingCatalog::new(vec![record.clone()]);
/// let bbox = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 });
///
/// let found: Vec<_> = catalog.in_bbox(&bbox).collect();
/// assert_eq!(found, vec![&record]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingCatalog {
    records: Vec<BuildingRecord>,
}

impl BuildingCatalog {
    /// Wrap `records`, preserving their order.
    #[must_use]
    pub const fn new(records: Vec<BuildingRecord>) -> Self {
        Self { records }
    }

    /// Number of buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no buildings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order.
    #[must_use]
    pub fn records(&self) -> &[BuildingRecord] {
        &self.records
    }

    /// Iterate over records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, BuildingRecord> {
        self.records.iter()
    }

    /// Buildings whose location lies inside `bbox`, boundary included.
    ///
    /// The rectangle uses `x = longitude`, `y = latitude` and does not model
    /// regions crossing the antimeridian.
    pub fn in_bbox<'a>(
        &'a self,
        bbox: &Rect<f64>,
    ) -> impl Iterator<Item = &'a BuildingRecord> + 'a {
        let bbox = *bbox;
        self.records
            .iter()
            // `Intersects` treats boundary points as inside the rectangle.
            .filter(move |record| bbox.intersects(&record.location))
    }

    /// Fail with [`CatalogError::Empty`] when there is nothing to score against.
    pub fn require_non_empty(self) -> Result<Self, CatalogError> {
        if self.is_empty() {
            Err(CatalogError::Empty)
        } else {
            Ok(self)
        }
    }
}

impl FromIterator<BuildingRecord> for BuildingCatalog {
    fn from_iter<I: IntoIterator<Item = BuildingRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BuildingCatalog {
    type Item = &'a BuildingRecord;
    type IntoIter = std::slice::Iter<'a, BuildingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::building_at;
    use geo::Coord;
    use rstest::rstest;

    fn unit_bbox() -> Rect<f64> {
        Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 })
    }

    #[rstest]
    fn returns_empty_when_no_buildings() {
        let catalog = BuildingCatalog::default();
        assert_eq!(catalog.in_bbox(&unit_bbox()).count(), 0);
    }

    #[rstest]
    #[case(Coord { x: -1.0, y: 0.0 })] // left edge
    #[case(Coord { x: 1.0, y: 0.0 })] // right edge
    #[case(Coord { x: 0.0, y: -1.0 })] // bottom edge
    #[case(Coord { x: 1.0, y: 1.0 })] // top-right corner
    fn includes_building_on_bbox_boundary(#[case] location: Coord<f64>) {
        let record = building_at(location.y, location.x, 10.0);
        let catalog = BuildingCatalog::new(vec![record.clone()]);
        let found: Vec<_> = catalog.in_bbox(&unit_bbox()).cloned().collect();
        assert_eq!(found, vec![record]);
    }

    #[rstest]
    #[case(Coord { x: -1.000_000_1, y: 0.0 })]
    #[case(Coord { x: 0.0, y: 1.000_000_1 })]
    fn excludes_building_just_outside_bbox(#[case] location: Coord<f64>) {
        let catalog = BuildingCatalog::new(vec![building_at(location.y, location.x, 10.0)]);
        assert_eq!(catalog.in_bbox(&unit_bbox()).count(), 0);
    }

    #[rstest]
    fn preserves_load_order() {
        let catalog: BuildingCatalog = [0.5, -0.5, 0.25]
            .into_iter()
            .map(|lat| building_at(lat, 0.0, 10.0))
            .collect();
        let lats: Vec<f64> = catalog.in_bbox(&unit_bbox()).map(|r| r.latitude()).collect();
        assert_eq!(lats, vec![0.5, -0.5, 0.25]);
    }

    #[rstest]
    fn empty_catalog_is_rejected() {
        let err = BuildingCatalog::default()
            .require_non_empty()
            .expect_err("empty catalog");
        assert_eq!(err, CatalogError::Empty);
    }
}
