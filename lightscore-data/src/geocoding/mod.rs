//! HTTP geocoding for street addresses.
//!
//! [`LocationIqGeocoder`] implements [`lightscore_core::Geocoder`] against the
//! LocationIQ search API. The trait is synchronous so the core stays free of
//! an async runtime; the adapter blocks on its HTTP calls internally.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use lightscore_core::{Address, Geocoder};
//! use lightscore_data::geocoding::{LocationIqConfig, LocationIqGeocoder};
//!
//! let config = LocationIqConfig::new("pk.example-key").with_timeout(Duration::from_secs(5));
//! let geocoder = LocationIqGeocoder::with_config(config)?;
//!
//! let address = Address {
//!     street_number: "100".into(),
//!     street_name: "Queen St W".into(),
//!     city: "Toronto".into(),
//!     postal_code: "M5H 2N2".into(),
//!     country: "Canada".into(),
//! };
//! let location = geocoder.locate(&address)?;
//! println!("{}, {}", location.y, location.x);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod locationiq;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GeocoderBuildError, LocationIqConfig, LocationIqGeocoder,
};
