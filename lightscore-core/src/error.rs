//! Request-level error taxonomy.

use thiserror::Error;

use crate::{CatalogError, DirectionParseError, GeocodeError, ObservationError, SolarPositionError};

/// Errors surfaced by a scoring request.
///
/// Per-building problems never appear here: malformed records are skipped at
/// load time and an empty neighbourhood still yields a valid score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LightScoreError {
    /// The building catalog could not be loaded or holds no buildings.
    #[error("building data unavailable: {reason}")]
    DataUnavailable {
        /// Description of the load failure.
        reason: String,
    },
    /// Geocoding produced no coordinates for the address.
    #[error("address not found: {address}")]
    LocationUnresolved {
        /// The address as queried.
        address: String,
    },
    /// The direction is not one of the eight compass octants.
    #[error(transparent)]
    InvalidDirection(#[from] DirectionParseError),
    /// The observation point failed validation.
    #[error(transparent)]
    InvalidObservation(#[from] ObservationError),
    /// The solar-position collaborator failed.
    #[error(transparent)]
    PositionUnavailable(#[from] SolarPositionError),
    /// The geocoding service failed for a reason other than "not found".
    #[error("geocoding failed: {0}")]
    Geocoder(#[source] GeocodeError),
}

impl LightScoreError {
    /// Wrap any load failure as [`LightScoreError::DataUnavailable`].
    pub fn data_unavailable(reason: impl std::fmt::Display) -> Self {
        Self::DataUnavailable {
            reason: reason.to_string(),
        }
    }
}

impl From<GeocodeError> for LightScoreError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound { address } => Self::LocationUnresolved { address },
            other => Self::Geocoder(other),
        }
    }
}

impl From<CatalogError> for LightScoreError {
    fn from(err: CatalogError) -> Self {
        Self::data_unavailable(err)
    }
}

#[cfg(feature = "serde")]
impl From<crate::ArtefactError> for LightScoreError {
    fn from(err: crate::ArtefactError) -> Self {
        Self::data_unavailable(err)
    }
}
