//! Closed-form shot accuracy estimate combining gravity drop and
//! drag-attenuated wind drift.

/// Gravitational acceleration (m/s²).
pub const G: f64 = 9.81;

/// Air density at sea level (kg/m³).
pub const RHO: f64 = 1.225;

/// Bullet cross-sectional area (m²), fixed at a typical .30 caliber value
/// regardless of the selected bullet's actual caliber.
pub const CROSS_SECTION_M2: f64 = 0.000509;

/// Conversion factor, grains to kilograms.
pub const GRAINS_TO_KG: f64 = 0.0000648;

/// Maps the five shot parameters to an accuracy fraction in `(0, 1]`.
///
/// Pure arithmetic; callers guarantee `muzzle_velocity`,
/// `ballistic_coefficient` and `bullet_weight_grains` are positive (the
/// table loaders reject anything else), so no validation happens here.
/// Equals 1 exactly when the distance is zero and decays toward 0 as
/// distance or wind grow.
pub fn calculate_accuracy(
    wind_speed: f64,
    distance: f64,
    ballistic_coefficient: f64,
    muzzle_velocity: f64,
    bullet_weight_grains: f64,
) -> f64 {
    let mass = bullet_weight_grains * GRAINS_TO_KG;

    let time_of_flight = distance / muzzle_velocity;
    let bullet_drop = 0.5 * G * time_of_flight.powi(2);

    let drag_factor = (0.5 * RHO * CROSS_SECTION_M2) / (ballistic_coefficient * mass);
    let wind_drift = drag_factor * wind_speed.powi(2) * time_of_flight.powi(2);

    (-0.05 * bullet_drop - 0.1 * wind_drift).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wind_reduces_to_drop_term() {
        let accuracy = calculate_accuracy(0.0, 400.0, 0.45, 820.0, 168.0);
        let time_of_flight: f64 = 400.0 / 820.0;
        let expected = (-0.05 * 0.5 * G * time_of_flight.powi(2)).exp();
        assert!((accuracy - expected).abs() < 1e-12);
        assert!(accuracy > 0.0 && accuracy < 1.0);
    }

    #[test]
    fn worked_example() {
        // 150 gr bullet at 800 m/s over 300 m in a 2 m/s wind:
        // time of flight 0.375 s, drop 0.6898 m, drift 0.0451
        let accuracy = calculate_accuracy(2.0, 300.0, 0.4, 800.0, 150.0);
        assert!((accuracy - 0.9617519).abs() < 1e-6);
    }

    #[test]
    fn perfect_only_at_zero_distance() {
        assert_eq!(calculate_accuracy(5.0, 0.0, 0.4, 800.0, 150.0), 1.0);
        assert!(calculate_accuracy(0.0, 1.0, 0.4, 800.0, 150.0) < 1.0);
    }

    #[test]
    fn decreases_with_distance() {
        let near = calculate_accuracy(2.0, 100.0, 0.4, 800.0, 150.0);
        let mid = calculate_accuracy(2.0, 300.0, 0.4, 800.0, 150.0);
        let far = calculate_accuracy(2.0, 900.0, 0.4, 800.0, 150.0);
        assert!(near > mid && mid > far);
    }

    #[test]
    fn decreases_with_wind_magnitude() {
        let calm = calculate_accuracy(0.0, 300.0, 0.4, 800.0, 150.0);
        let breeze = calculate_accuracy(3.0, 300.0, 0.4, 800.0, 150.0);
        let gale = calculate_accuracy(15.0, 300.0, 0.4, 800.0, 150.0);
        assert!(calm > breeze && breeze > gale);
    }

    #[test]
    fn wind_direction_sign_is_irrelevant() {
        let left = calculate_accuracy(-4.0, 300.0, 0.4, 800.0, 150.0);
        let right = calculate_accuracy(4.0, 300.0, 0.4, 800.0, 150.0);
        assert_eq!(left, right);
    }

    #[test]
    fn stays_positive_for_extreme_inputs() {
        let accuracy = calculate_accuracy(10.0, 2000.0, 0.2, 500.0, 100.0);
        assert!(accuracy > 0.0 && accuracy < 1e-3);
    }

    #[test]
    fn grains_conversion() {
        assert!((150.0 * GRAINS_TO_KG - 0.00972).abs() < 1e-12);
    }
}
