//! Small numeric helpers shared by the obstruction and blockage models.

/// Round `value` to `decimals` places, half away from zero.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Elevation angle, in degrees, of a point `rise` metres above the observer at
/// a horizontal `distance`.
pub(crate) fn angular_height(rise: f64, distance: f64) -> f64 {
    rise.atan2(distance).to_degrees()
}

/// Wrap an angle in degrees into `[0, 360)`.
pub(crate) fn normalise_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs due to rounding.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.125, 2, 0.13)]
    #[case(62.549, 1, 62.5)]
    #[case(-1.25, 1, -1.3)]
    #[case(3.0, 0, 3.0)]
    fn rounds_half_away_from_zero(#[case] value: f64, #[case] decimals: i32, #[case] expected: f64) {
        assert!((round_to(value, decimals) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(-90.0, 270.0)]
    #[case(360.0, 0.0)]
    #[case(725.0, 5.0)]
    #[case(-1e-15, 0.0)]
    fn wraps_into_half_open_circle(#[case] input: f64, #[case] expected: f64) {
        let wrapped = normalise_degrees(input);
        assert!((0.0..360.0).contains(&wrapped));
        assert!((wrapped - expected).abs() < 1e-9);
    }

    #[rstest]
    fn angular_height_of_equal_rise_and_run_is_45_degrees() {
        assert!((angular_height(10.0, 10.0) - 45.0).abs() < 1e-9);
    }
}
