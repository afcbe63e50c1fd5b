use std::ops::{Add, Mul, Sub};

use glam::Vec3;

/// Smoothing base shared by movement and camera easing.
pub const SMOOTHING_EPSILON: f32 = 0.1;

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `epsilon` is the fraction of the gap left after one unit of `rate`
/// (`rate = dt * speed`), so two calls with rates `r1` and `r2` land where a
/// single call with `r1 + r2` would. `epsilon` must lie in `(0, 1)`.
pub fn recursive_lerp<T>(current: T, target: T, epsilon: f32, rate: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    target + (current - target) * epsilon.powf(rate)
}

/// Component of `v` along the unit vector `axis`.
pub fn project_on_axis(v: Vec3, axis: Vec3) -> Vec3 {
    axis * v.dot(axis)
}

/// Evaluates a normalized easing curve on `[0, 1]`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub enum EaseCurve {
    Linear,
    /// Smoothstep.
    EaseInOut,
    /// Piecewise-linear keys `(t, value)`, sorted by `t`.
    Keys(Vec<(f32, f32)>),
}

impl Default for EaseCurve {
    fn default() -> Self {
        Self::EaseInOut
    }
}

impl EaseCurve {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
            Self::Keys(keys) => {
                let (first, last) = match (keys.first(), keys.last()) {
                    (Some(first), Some(last)) => (*first, *last),
                    _ => return t,
                };
                if t <= first.0 {
                    return first.1;
                }
                if t >= last.0 {
                    return last.1;
                }
                keys.windows(2)
                    .find(|w| t <= w[1].0)
                    .map(|w| {
                        let span = w[1].0 - w[0].0;
                        if span <= f32::EPSILON {
                            w[1].1
                        } else {
                            w[0].1 + (w[1].1 - w[0].1) * ((t - w[0].0) / span)
                        }
                    })
                    .unwrap_or(last.1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const TOL: f32 = 1e-5;

    #[test]
    fn zero_rate_keeps_current() {
        assert_eq!(recursive_lerp(4.0_f32, -2.0, 0.1, 0.0), 4.0);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(recursive_lerp(v, Vec3::ZERO, 0.3, 0.0), v);
    }

    #[test]
    fn result_stays_between_target_and_current() {
        for &rate in &[0.01_f32, 0.5, 1.0, 3.0, 12.0] {
            let value = recursive_lerp(10.0_f32, 2.0, 0.1, rate);
            assert!(value <= 10.0 && value >= 2.0, "rate {rate} gave {value}");
        }
    }

    #[test]
    fn converges_to_target_for_large_rates() {
        let value = recursive_lerp(Vec2::new(50.0, -50.0), Vec2::ONE, 0.1, 60.0);
        assert!((value - Vec2::ONE).length() < TOL);
    }

    #[test]
    fn composing_rates_matches_single_step() {
        let cases = [
            (5.0_f32, 1.0_f32, 0.1_f32, 0.3_f32, 0.7_f32),
            (-3.0, 8.0, 0.5, 0.016, 0.016),
            (0.0, 1.0, 0.9, 2.0, 0.25),
        ];
        for (current, target, epsilon, r1, r2) in cases {
            let stepped = recursive_lerp(recursive_lerp(current, target, epsilon, r1), target, epsilon, r2);
            let single = recursive_lerp(current, target, epsilon, r1 + r2);
            assert!((stepped - single).abs() < TOL);
        }
    }

    #[test]
    fn frame_rate_does_not_change_the_outcome() {
        let mut fast = Vec3::ZERO;
        for _ in 0..120 {
            fast = recursive_lerp(fast, Vec3::X * 6.0, 0.1, 1.0 / 120.0 * 4.0);
        }
        let mut slow = Vec3::ZERO;
        for _ in 0..30 {
            slow = recursive_lerp(slow, Vec3::X * 6.0, 0.1, 1.0 / 30.0 * 4.0);
        }
        assert!((fast - slow).length() < 1e-3);
    }

    #[test]
    fn keyed_curve_interpolates_and_clamps() {
        let curve = EaseCurve::Keys(vec![(0.0, 0.0), (0.5, 1.0), (1.0, 0.5)]);
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert!((curve.evaluate(0.25) - 0.5).abs() < TOL);
        assert!((curve.evaluate(0.75) - 0.75).abs() < TOL);
        assert_eq!(curve.evaluate(2.0), 0.5);
        assert_eq!(EaseCurve::EaseInOut.evaluate(0.5), 0.5);
    }
}
