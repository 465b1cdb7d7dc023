//! R\*-tree proximity search over the building catalog.

use std::fmt;

use geo::Coord;
use log::debug;
use rstar::{AABB, RTree, RTreeObject};

use crate::building::planar_distance_meters;
use crate::{BuildingCatalog, BuildingRecord, METERS_PER_DEGREE, NearbyBuilding};

/// A record tagged with its position in the catalog.
#[derive(Debug, Clone)]
struct IndexedBuilding {
    position: usize,
    record: BuildingRecord,
}

impl RTreeObject for IndexedBuilding {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.record.location.x, self.record.location.y])
    }
}

/// Answers "which buildings lie within R metres of P".
///
/// A square envelope of `R / 111 000` degrees prefilters candidates from the
/// tree; exact planar distances then decide membership. Results are sorted by
/// distance, with catalog order breaking ties.
pub struct ProximityIndex {
    tree: RTree<IndexedBuilding>,
}

impl fmt::Debug for ProximityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximityIndex")
            .field("entries", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl ProximityIndex {
    /// Bulk-load an index over every record in `catalog`.
    #[must_use]
    pub fn build(catalog: &BuildingCatalog) -> Self {
        let entries = catalog
            .iter()
            .enumerate()
            .map(|(position, record)| IndexedBuilding {
                position,
                record: record.clone(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no buildings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buildings within `radius_meters` of `origin`, nearest first.
    ///
    /// A non-finite or negative radius matches nothing.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use lightscore_core::{BuildingCatalog, BuildingRecord, HeightAttributes, ProximityIndex};
    ///
    /// let near = BuildingRecord::new(Coord { x: 0.0, y: 0.0005 }, HeightAttributes::uniform(30.0), 0.0)
    ///     .expect("valid record");
    /// let far = BuildingRecord::new(Coord { x: 0.0, y: 0.01 }, HeightAttributes::uniform(30.0), 0.0)
    ///     .expect("valid record");
    /// let index = ProximityIndex::build(&BuildingCatalog::new(vec![far, near]));
    ///
    /// let found = index.query(Coord { x: 0.0, y: 0.0 }, 100.0);
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].distance, 55.5);
    /// ```
    #[must_use]
    pub fn query(&self, origin: Coord<f64>, radius_meters: f64) -> Vec<NearbyBuilding> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Vec::new();
        }
        let degree_radius = radius_meters / METERS_PER_DEGREE;
        let envelope = AABB::from_corners(
            [origin.x - degree_radius, origin.y - degree_radius],
            [origin.x + degree_radius, origin.y + degree_radius],
        );

        let mut candidates: Vec<(usize, f64, &BuildingRecord)> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| {
                let distance = planar_distance_meters(origin, entry.record.location);
                (entry.position, distance, &entry.record)
            })
            .collect();
        let prefiltered = candidates.len();
        candidates.retain(|(_, distance, _)| *distance <= radius_meters);

        // Tree order is arbitrary: restore catalog order, then stable-sort by distance.
        candidates.sort_unstable_by_key(|(position, _, _)| *position);
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        debug!(
            "proximity query at ({:.6}, {:.6}) r={radius_meters}m: {prefiltered} in envelope, {} within radius",
            origin.y,
            origin.x,
            candidates.len()
        );

        candidates
            .into_iter()
            .map(|(_, distance, record)| NearbyBuilding::from_record(record, distance))
            .collect()
    }
}

impl From<&BuildingCatalog> for ProximityIndex {
    fn from(catalog: &BuildingCatalog) -> Self {
        Self::build(catalog)
    }
}
