use glam::Vec3;

/// Default turn rate in degrees per millisecond
pub const DEFAULT_TURN_SPEED: f32 = 0.5;

/// Below this difference (degrees) the heading snaps onto the target
pub const SNAP_EPSILON: f32 = 0.01;

/// Wrap a degree angle into (-180, 180].
///
/// The result is congruent to `angle` modulo 360. Non-finite input gives a
/// non-finite result; callers are expected to pass finite angles.
pub fn normalize(angle: f32) -> f32 {
    let wrapped = 180.0 - (180.0 - angle).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative remainders
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180]
pub fn shortest_diff(from: f32, to: f32) -> f32 {
    normalize(to - from)
}

/// Rotate `point` around `center` in the XZ plane. Y is left untouched.
pub fn turn_to_angle(point: Vec3, center: Vec3, degrees: i32) -> Vec3 {
    let radians = ((degrees % 360) as f32).to_radians();
    let (sin, cos) = radians.sin_cos();

    let dx = point.x - center.x;
    let dz = point.z - center.z;

    Vec3::new(
        dx * cos - dz * sin + center.x,
        point.y,
        dx * sin + dz * cos + center.z,
    )
}

/// Rate-limited heading follower.
///
/// Each step turns the current heading toward the target along the shorter
/// arc, by at most `turn_speed * elapsed` degrees, and never overshoots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSmoother {
    /// Degrees per unit of elapsed time
    pub turn_speed: f32,
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_SPEED)
    }
}

impl AngleSmoother {
    pub fn new(turn_speed: f32) -> Self {
        Self { turn_speed }
    }

    /// Advance `current` toward `target` after `elapsed` time units.
    ///
    /// The result is always normalized, so `step(c, c, dt) == c` only holds
    /// for `c` already in (-180, 180]: `step(-180.0, -180.0, dt)` is `180.0`.
    /// A non-finite input yields NaN.
    pub fn step(&self, current: f32, target: f32, elapsed: f32) -> f32 {
        let diff = shortest_diff(current, target);
        if diff.is_nan() {
            return diff;
        }

        if diff.abs() < SNAP_EPSILON {
            return normalize(target);
        }

        let max_step = self.turn_speed * elapsed;
        let turn = if diff.abs() <= max_step {
            diff
        } else {
            max_step.copysign(diff)
        };

        normalize(current + turn)
    }

    /// Same as [`AngleSmoother::step`], writing into the caller's heading
    pub fn step_in_place(&self, current: &mut f32, target: f32, elapsed: f32) {
        *current = self.step(*current, target, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    const SAMPLES: [f32; 16] = [
        0.0, 180.0, -180.0, 360.0, -360.0, 540.0, -540.0, 179.99, -179.99,
        45.5, -725.25, 1080.0, 3599.0, -3601.0, 90.0, 270.0,
    ];

    #[test]
    fn normalize_stays_in_range() {
        for a in SAMPLES {
            let n = normalize(a);
            assert!(n > -180.0 && n <= 180.0, "normalize({a}) = {n} out of range");
        }
    }

    #[test]
    fn normalize_is_congruent_mod_360() {
        for a in SAMPLES {
            let n = normalize(a);
            let turns = (a - n) / 360.0;
            assert!(approx(turns, turns.round()), "normalize({a}) = {n} not congruent");
        }
    }

    #[test]
    fn normalize_maps_minus_180_to_180() {
        assert_eq!(normalize(-180.0), 180.0);
        assert_eq!(normalize(180.0), 180.0);
        assert_eq!(normalize(270.0), -90.0);
        assert_eq!(normalize(-181.0), 179.0);
    }

    #[test]
    fn normalize_tiny_negative() {
        let n = normalize(-1e-6);
        assert!(n > -180.0 && n <= 180.0);
        assert!(approx(n, 0.0));
    }

    #[test]
    fn normalize_non_finite_returns_nan() {
        assert!(normalize(f32::NAN).is_nan());
        assert!(normalize(f32::INFINITY).is_nan());
        assert!(normalize(f32::NEG_INFINITY).is_nan());
    }

    #[test]
    fn step_non_finite_returns_nan() {
        let smoother = AngleSmoother::default();
        assert!(smoother.step(0.0, f32::NAN, 16.0).is_nan());
        assert!(smoother.step(f32::INFINITY, 90.0, 16.0).is_nan());
        assert!(smoother.step(0.0, f32::NEG_INFINITY, 16.0).is_nan());
    }

    #[test]
    fn step_at_non_canonical_target_normalizes() {
        let smoother = AngleSmoother::default();
        assert_eq!(smoother.step(-180.0, -180.0, 16.0), 180.0);
        assert_eq!(smoother.step(270.0, 270.0, 16.0), -90.0);
    }

    #[test]
    fn step_at_target_is_noop() {
        let smoother = AngleSmoother::default();
        for current in [0.0, 90.0, -45.0, 180.0, 179.5] {
            for dt in [0.0, 1.0, 16.0, 1000.0] {
                assert_eq!(smoother.step(current, current, dt), current);
            }
        }
    }

    #[test]
    fn step_takes_shortest_direction() {
        let smoother = AngleSmoother::default();
        let up = smoother.step(0.0, 170.0, 1.0);
        assert!(up > 0.0, "expected positive turn, got {up}");
        let down = smoother.step(0.0, -170.0, 1.0);
        assert!(down < 0.0, "expected negative turn, got {down}");
    }

    #[test]
    fn step_wraps_across_seam() {
        // From 170 to -170 the short way is +20 through 180
        let smoother = AngleSmoother::new(1.0);
        let next = smoother.step(170.0, -170.0, 5.0);
        assert!(approx(next, 175.0), "got {next}");
        let next = smoother.step(next, -170.0, 10.0);
        assert!(approx(next, -175.0), "got {next}");
    }

    #[test]
    fn step_arrives_when_within_reach() {
        let smoother = AngleSmoother::new(0.5);
        assert!(approx(smoother.step(180.0, -1.0, 1000.0), -1.0));
    }

    #[test]
    fn step_is_rate_limited() {
        let smoother = AngleSmoother::new(0.5);
        assert!(approx(smoother.step(0.0, 90.0, 10.0), 5.0));
        assert!(approx(smoother.step(0.0, -90.0, 10.0), -5.0));
    }

    #[test]
    fn step_snaps_inside_epsilon() {
        let smoother = AngleSmoother::new(0.5);
        assert_eq!(smoother.step(10.005, 10.0, 0.0), 10.0);
    }

    #[test]
    fn step_snaps_to_normalized_target() {
        let smoother = AngleSmoother::new(0.5);
        assert_eq!(smoother.step(-135.0, 225.0, 16.0), -135.0);
    }

    #[test]
    fn repeated_steps_converge_monotonically() {
        let smoother = AngleSmoother::new(0.5);
        let target = -100.0;
        let mut current = 120.0;
        let mut last_diff = shortest_diff(current, target).abs();
        let mut reached_at = None;

        for i in 0..200 {
            smoother.step_in_place(&mut current, target, 16.0);
            let d = shortest_diff(current, target).abs();
            if reached_at.is_none() {
                assert!(d < last_diff || d == 0.0, "diff did not shrink at step {i}");
                if current == target {
                    reached_at = Some(i);
                }
            } else {
                assert_eq!(current, target, "left target after arriving");
            }
            last_diff = d;
        }

        // 140 degrees at 8 degrees per step
        assert_eq!(reached_at, Some(17));
    }

    #[test]
    fn turn_to_angle_quarter_turn() {
        let center = Vec3::new(1.0, 0.0, 1.0);
        let p = turn_to_angle(Vec3::new(2.0, 3.0, 1.0), center, 90);
        assert!(approx(p.x, 1.0) && approx(p.z, 2.0));
        assert_eq!(p.y, 3.0);
    }

    #[test]
    fn turn_to_angle_wraps_full_turns() {
        let center = Vec3::ZERO;
        let point = Vec3::new(0.0, 1.0, -2.0);
        let a = turn_to_angle(point, center, 450);
        let b = turn_to_angle(point, center, 90);
        assert!(approx(a.x, b.x) && approx(a.z, b.z));
        let same = turn_to_angle(point, center, 720);
        assert!(approx(same.x, point.x) && approx(same.z, point.z));
    }
}
