//! Algorithmic solar ephemeris.
//!
//! [`AlgorithmicSunProvider`] evaluates the NOAA general solar-position
//! equations: Julian centuries since J2000, the sun's apparent longitude,
//! declination, the equation of time, and the local hour angle. Accuracy is
//! within about 0.01° for dates near the present. No atmospheric refraction is
//! applied, so elevations are geometric.

use chrono::{DateTime, Utc};
use geo::Coord;
use lightscore_core::{SolarPositionError, SolarPositionProvider, SunPosition};
use log::debug;

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;
/// Julian date of J2000.0.
const J2000: f64 = 2_451_545.0;
const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const MINUTES_PER_DAY: f64 = 1_440.0;

fn normalise(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Julian centuries since J2000.0 for `instant`.
fn julian_century(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    let julian_date = UNIX_EPOCH_JULIAN_DATE + seconds / SECONDS_PER_DAY;
    (julian_date - J2000) / DAYS_PER_JULIAN_CENTURY
}

/// Orbital quantities shared by the declination and equation of time.
struct Orbit {
    mean_longitude: f64,
    mean_anomaly: f64,
    eccentricity: f64,
    obliquity: f64,
    apparent_longitude: f64,
}

impl Orbit {
    fn at(t: f64) -> Self {
        let mean_longitude = normalise(280.466_46 + t * (36_000.769_83 + t * 0.000_303_2));
        let mean_anomaly = normalise(357.529_11 + t * (35_999.050_29 - t * 0.000_153_7));
        let eccentricity = 0.016_708_634 - t * (0.000_042_037 + t * 0.000_000_126_7);

        let m = mean_anomaly.to_radians();
        let centre = m.sin() * (1.914_602 - t * (0.004_817 + t * 0.000_014))
            + (2.0 * m).sin() * (0.019_993 - t * 0.000_101)
            + (3.0 * m).sin() * 0.000_289;
        let omega = (125.04 - 1_934.136 * t).to_radians();
        let apparent_longitude = mean_longitude + centre - 0.005_69 - 0.004_78 * omega.sin();

        let seconds = 21.448 - t * (46.815 + t * (0.000_59 - t * 0.001_813));
        let mean_obliquity = 23.0 + (26.0 + seconds / 60.0) / 60.0;
        let obliquity = mean_obliquity + 0.002_56 * omega.cos();

        Self {
            mean_longitude,
            mean_anomaly,
            eccentricity,
            obliquity,
            apparent_longitude,
        }
    }

    /// Solar declination in degrees.
    fn declination(&self) -> f64 {
        let e = self.obliquity.to_radians();
        let lambda = self.apparent_longitude.to_radians();
        (e.sin() * lambda.sin()).asin().to_degrees()
    }

    /// Equation of time in minutes.
    fn equation_of_time(&self) -> f64 {
        let y = (self.obliquity.to_radians() / 2.0).tan().powi(2);
        let l0 = self.mean_longitude.to_radians();
        let m = self.mean_anomaly.to_radians();
        let e = self.eccentricity;
        let radians = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
            + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * e * e * (2.0 * m).sin();
        4.0 * radians.to_degrees()
    }
}

/// Compute the sun's elevation and azimuth at `location` for `instant`.
///
/// Azimuth is measured clockwise from true north.
fn solar_position(location: Coord<f64>, instant: DateTime<Utc>) -> SunPosition {
    let t = julian_century(instant);
    let orbit = Orbit::at(t);
    let declination = orbit.declination().to_radians();

    let minutes_utc = f64::from(instant.timestamp().rem_euclid(86_400) as u32) / 60.0
        + f64::from(instant.timestamp_subsec_nanos()) / 6e10;
    let true_solar_time =
        (minutes_utc + orbit.equation_of_time() + 4.0 * location.x).rem_euclid(MINUTES_PER_DAY);
    let hour_angle = (true_solar_time / 4.0 - 180.0).to_radians();

    let latitude = location.y.to_radians();
    let sin_elevation = latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.cos();
    let elevation = sin_elevation.clamp(-1.0, 1.0).asin().to_degrees();

    let azimuth = normalise(
        hour_angle
            .sin()
            .atan2(hour_angle.cos() * latitude.sin() - declination.tan() * latitude.cos())
            .to_degrees()
            + 180.0,
    );

    SunPosition { elevation, azimuth }
}

/// [`SolarPositionProvider`] computing positions locally.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use geo::Coord;
/// use lightscore_core::SolarPositionProvider;
/// use lightscore_data::solar::AlgorithmicSunProvider;
///
/// let noon = Utc.with_ymd_and_hms(2024, 3, 20, 12, 7, 0).single();
/// let sun = AlgorithmicSunProvider.position(Coord { x: 0.0, y: 0.0 }, noon)?;
/// assert!(sun.elevation > 89.0);
/// # Ok::<(), lightscore_core::SolarPositionError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AlgorithmicSunProvider;

impl SolarPositionProvider for AlgorithmicSunProvider {
    fn position(
        &self,
        location: Coord<f64>,
        instant: Option<DateTime<Utc>>,
    ) -> Result<SunPosition, SolarPositionError> {
        let Coord {
            x: longitude,
            y: latitude,
        } = location;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(SolarPositionError::Unavailable {
                reason: format!("non-finite location ({latitude}, {longitude})"),
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SolarPositionError::Unavailable {
                reason: format!("latitude {latitude} is outside [-90, 90]"),
            });
        }
        let instant = instant.unwrap_or_else(Utc::now);
        let position = solar_position(location, instant);
        debug!(
            "sun at ({latitude}, {longitude}) {instant}: elevation {:.2}°, azimuth {:.2}°",
            position.elevation, position.azimuth
        );
        Ok(position)
    }
}
