//! Build-once proximity index shared by concurrent requests.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::info;

use crate::{BuildingCatalog, LightScoreError, ProximityIndex};

type CatalogLoader = dyn Fn() -> Result<BuildingCatalog, LightScoreError> + Send + Sync;

/// A [`ProximityIndex`] built on first use and read lock-free afterwards.
///
/// The loader runs under a mutex so concurrent first callers never build the
/// index twice or see it half-built. A failed load leaves the cell empty and
/// the next call tries again. An empty catalog counts as a failed load.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use lightscore_core::{BuildingCatalog, BuildingRecord, HeightAttributes, SharedIndex};
///
/// let shared = SharedIndex::new(|| {
///     let record = BuildingRecord::new(Coord { x: 0.0, y: 0.0 }, HeightAttributes::uniform(9.0), 0.0)
///         .map_err(lightscore_core::LightScoreError::data_unavailable)?;
///     Ok(BuildingCatalog::new(vec![record]))
/// });
/// let index = shared.get().expect("catalog loads");
/// assert_eq!(index.len(), 1);
/// ```
pub struct SharedIndex {
    cell: OnceLock<Arc<ProximityIndex>>,
    init: Mutex<()>,
    loader: Box<CatalogLoader>,
}

impl fmt::Debug for SharedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedIndex")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl SharedIndex {
    /// Wrap `loader`; nothing runs until [`SharedIndex::get`].
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<BuildingCatalog, LightScoreError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
            loader: Box::new(loader),
        }
    }

    /// An index that is already built.
    #[must_use]
    pub fn preloaded(index: Arc<ProximityIndex>) -> Self {
        let shared = Self::new(|| Err(LightScoreError::data_unavailable("index preloaded")));
        let _ = shared.cell.set(index);
        shared
    }

    /// Whether the index has been built.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the index, building it on first call.
    ///
    /// # Errors
    /// Returns [`LightScoreError::DataUnavailable`] when the loader fails or
    /// yields an empty catalog.
    pub fn get(&self) -> Result<Arc<ProximityIndex>, LightScoreError> {
        if let Some(index) = self.cell.get() {
            return Ok(Arc::clone(index));
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = self.cell.get() {
            return Ok(Arc::clone(index));
        }

        let catalog = (self.loader)()?.require_non_empty()?;
        let index = Arc::new(ProximityIndex::build(&catalog));
        info!("proximity index built over {} buildings", index.len());
        Ok(Arc::clone(self.cell.get_or_init(|| index)))
    }
}
