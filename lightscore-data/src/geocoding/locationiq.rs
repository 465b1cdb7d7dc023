//! LocationIQ search API payloads.
//!
//! See: <https://docs.locationiq.com/reference/search>

use geo::Coord;
use lightscore_core::GeocodeError;
use serde::Deserialize;

/// One match from `/v1/search.php`.
///
/// LocationIQ encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(super) struct SearchHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Body returned alongside non-success statuses, e.g.
/// `{"error": "Unable to geocode"}`.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub error: String,
}

fn parse_degrees(value: &str, field: &str) -> Result<f64, GeocodeError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::ParseError {
            message: format!("{field} {value:?} is not a number"),
        })
}

/// Decode a success body and take the first match.
pub(super) fn first_location(body: &str, address: &str) -> Result<Coord<f64>, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|err| GeocodeError::ParseError {
            message: err.to_string(),
        })?;
    let Some(hit) = hits.into_iter().next() else {
        return Err(GeocodeError::NotFound {
            address: address.to_owned(),
        });
    };
    log::debug!(
        "geocoded {address:?} to {}",
        hit.display_name.as_deref().unwrap_or("<unnamed>")
    );
    Ok(Coord {
        x: parse_degrees(&hit.lon, "longitude")?,
        y: parse_degrees(&hit.lat, "latitude")?,
    })
}

/// Best-effort error message from a failure body.
pub(super) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.trim().to_owned())
}
