//! Euler-integrated trajectory preview under a steady wind. Drives the
//! optional path plot only; the accuracy figure never depends on it.

use crate::accuracy::{CROSS_SECTION_M2, G, RHO};

const DRAG_COEFFICIENT: f64 = 0.5;
const PROJECTILE_MASS_KG: f64 = 0.005;
const TIME_STEP: f64 = 0.01;

/// Integrates a point mass launched at `launch_angle_deg` above horizontal
/// through a wind blowing at `wind_angle_deg`, for `flight_time` seconds.
/// Returns the (downrange, height) path starting at the origin.
///
/// Drag opposes velocity relative to the wind; the squared force term is
/// always retarding regardless of the relative velocity's sign.
pub fn wind_influence(
    v_initial: f64,
    launch_angle_deg: f64,
    wind_speed: f64,
    wind_angle_deg: f64,
    flight_time: f64,
) -> Vec<[f64; 2]> {
    let launch = launch_angle_deg.to_radians();
    let wind = wind_angle_deg.to_radians();

    let mut vx = v_initial * launch.cos();
    let mut vy = v_initial * launch.sin();
    let vw_x = wind_speed * wind.cos();
    let vw_y = wind_speed * wind.sin();

    let mut x = 0.0;
    let mut y = 0.0;
    let mut points = vec![[0.0, 0.0]];

    let steps = (flight_time / TIME_STEP).ceil() as usize;
    for _ in 0..steps {
        let rel_x = vx - vw_x;
        let rel_y = vy - vw_y;
        let f_drag_x = -0.5 * DRAG_COEFFICIENT * RHO * CROSS_SECTION_M2 * rel_x * rel_x;
        let f_drag_y = -0.5 * DRAG_COEFFICIENT * RHO * CROSS_SECTION_M2 * rel_y * rel_y;

        vx += f_drag_x / PROJECTILE_MASS_KG * TIME_STEP;
        vy += (-PROJECTILE_MASS_KG * G + f_drag_y / PROJECTILE_MASS_KG) * TIME_STEP;

        x += vx * TIME_STEP;
        y += vy * TIME_STEP;
        points.push([x, y]);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_step_plus_origin() {
        let points = wind_influence(800.0, 0.0, 0.0, 0.0, 0.375);
        // 38 steps of 0.01 s cover 0.375 s
        assert_eq!(points.len(), 39);
        assert_eq!(points[0], [0.0, 0.0]);
    }

    #[test]
    fn zero_flight_time_yields_origin_only() {
        let points = wind_influence(800.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(points, vec![[0.0, 0.0]]);
    }

    #[test]
    fn flat_shot_advances_and_sinks() {
        let points = wind_influence(800.0, 0.0, 0.0, 0.0, 0.5);
        let last = points.last().unwrap();
        assert!(last[0] > 0.0);
        assert!(last[1] < 0.0);
        for pair in points.windows(2) {
            assert!(pair[1][0] > pair[0][0]);
            assert!(pair[1][1] <= pair[0][1]);
        }
    }

    #[test]
    fn tailwind_carries_farther_than_headwind() {
        let tail = wind_influence(400.0, 0.0, 20.0, 0.0, 0.5);
        let head = wind_influence(400.0, 0.0, 20.0, 180.0, 0.5);
        assert!(tail.last().unwrap()[0] > head.last().unwrap()[0]);
    }
}
