//! Forward geocoding of street addresses.
//!
//! The [`Geocoder`] trait turns an [`Address`] into a coordinate. An address
//! the service cannot place is [`GeocodeError::NotFound`]; every other variant
//! is an upstream failure and must not be mistaken for an empty result.

use std::fmt;

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A postal address as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Address {
    /// House or building number.
    pub street_number: String,
    /// Street name.
    pub street_name: String,
    /// City or town.
    pub city: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
}

impl fmt::Display for Address {
    /// Formats as `"{number} {street}, {city}, {postal code}, {country}"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}, {}, {}",
            self.street_number, self.street_name, self.city, self.postal_code, self.country
        )
    }
}

/// Errors from [`Geocoder::locate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The service answered but had no match for the address.
    #[error("no coordinates found for {address:?}")]
    NotFound {
        /// The formatted address that was searched.
        address: String,
    },
    /// The request exceeded its timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried, with credentials removed.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service returned an unsuccessful HTTP status.
    #[error("geocoding request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Endpoint that was queried, with credentials removed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request could not be sent.
    #[error("geocoding request to {url} failed: {message}")]
    NetworkError {
        /// Endpoint that was queried, with credentials removed.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be interpreted.
    #[error("failed to parse geocoding response: {message}")]
    ParseError {
        /// Error detail.
        message: String,
    },
}

/// Resolve an address to a coordinate, `x = longitude`, `y = latitude`.
///
/// Implementations must be thread-safe so one geocoder can serve concurrent
/// requests. They should not retry; retry policy belongs to the caller.
pub trait Geocoder: Send + Sync {
    /// Locate `address`.
    fn locate(&self, address: &Address) -> Result<Coord<f64>, GeocodeError>;
}
