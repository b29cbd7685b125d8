//! L4 Atomic Layer: Pure easing functions and the overshoot solver
//!
//! Every curve maps input [0, 1] to an output that starts at 0 and ends at 1.
//! The back-out family overshoots 1 before settling; its overshoot parameter
//! can be calibrated numerically to hit a requested peak.

use serde::{Deserialize, Serialize};

/// Upper bound of the overshoot search range
const OVERSHOOT_SEARCH_MAX: f64 = 12.0;
/// Bisection steps of the overshoot search
const OVERSHOOT_ITERATIONS: usize = 20;
/// Samples taken when measuring a curve's maximum
const PEAK_SAMPLES: usize = 200;

/// Named easing curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    CubicInOut,
    QuinticInOut,
    CubicOut,
    QuinticOut,
    ExpoOut,
    BackOut { overshoot: f64 },
}

impl Ease {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value; 0 at t=0 and 1 at t=1
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Ease::Linear => t,
            Ease::CubicInOut => cubic_in_out(t),
            Ease::QuinticInOut => quintic_in_out(t),
            Ease::CubicOut => cubic_out(t),
            Ease::QuinticOut => quintic_out(t),
            Ease::ExpoOut => expo_out(t),
            Ease::BackOut { overshoot } => back_out(t, overshoot),
        }
    }

    /// Box the curve as a plain closure
    pub fn into_fn(self) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
        Box::new(move |t| self.apply(t))
    }
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Linear
    }
}

/// Cubic ease-in-out
#[inline]
pub fn cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Quintic ease-in-out
#[inline]
pub fn quintic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        16.0 * t.powi(5)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
pub fn cubic_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
pub fn quintic_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
pub fn expo_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Back ease-out: f(t) = 1 + (s+1)(t-1)³ + s(t-1)²
///
/// `s = 0` degenerates to cubic ease-out; larger values overshoot further.
#[inline]
pub fn back_out(t: f64, s: f64) -> f64 {
    let u = t - 1.0;
    1.0 + (s + 1.0) * u * u * u + s * u * u
}

/// Largest value of the curve over [0, 1], sampled at `PEAK_SAMPLES` points
pub fn sampled_peak(ease: impl Fn(f64) -> f64) -> f64 {
    (0..PEAK_SAMPLES)
        .map(|i| ease(i as f64 / (PEAK_SAMPLES - 1) as f64))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Calibrate a back-out curve so its peak lands on `target_peak`
///
/// The peak is read as overshoot relative to the tween span: `min_value`
/// means no overshoot (curve maximum 1.0) and `max_value` means a full-span
/// overshoot (curve maximum 2.0). Out-of-range targets are clamped first.
///
/// There is no closed form worth inverting here, so the overshoot is found
/// by bisection over [0, 12] against the sampled maximum. The result is
/// approximate: its accuracy is bounded by the sample count, not exact.
pub fn solve_overshoot_for_peak(min_value: f64, max_value: f64, target_peak: f64) -> Ease {
    let (lo_value, hi_value) = if min_value <= max_value {
        (min_value, max_value)
    } else {
        (max_value, min_value)
    };
    let span = hi_value - lo_value;
    let normalized = if span <= f64::EPSILON {
        0.0
    } else {
        (target_peak.clamp(lo_value, hi_value) - lo_value) / span
    };
    let wanted = 1.0 + normalized;

    let mut lo = 0.0;
    let mut hi = OVERSHOOT_SEARCH_MAX;
    for _ in 0..OVERSHOOT_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if sampled_peak(|t| back_out(t, mid)) < wanted {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ease::BackOut {
        overshoot: (lo + hi) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::CubicInOut,
        Ease::QuinticInOut,
        Ease::CubicOut,
        Ease::QuinticOut,
        Ease::ExpoOut,
        Ease::BackOut { overshoot: 1.70158 },
    ];

    #[test]
    fn test_easing_boundaries() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 0.001, "{:?} at t=0", ease);
            assert!((ease.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", ease);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for ease in &ALL[..6] {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = ease.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", ease, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_in_out_symmetry() {
        assert!((Ease::CubicInOut.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((Ease::QuinticInOut.apply(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = sampled_peak(|t| back_out(t, 1.70158));
        // The classic constant gives roughly a 10% overshoot
        assert!((peak - 1.1).abs() < 0.01, "peak was {}", peak);
        assert!((sampled_peak(|t| back_out(t, 0.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_solver_hits_target_peak() {
        for peak in [0.55, 0.7, 0.85, 0.95] {
            let ease = solve_overshoot_for_peak(0.5, 1.0, peak);
            let wanted = 1.0 + (peak - 0.5) / 0.5;
            let got = sampled_peak(|t| ease.apply(t));
            assert!(
                ((got - wanted) / wanted).abs() < 0.01,
                "peak {}: wanted {}, got {}",
                peak,
                wanted,
                got
            );
        }
    }

    #[test]
    fn test_solver_clamps_out_of_range_target() {
        let below = solve_overshoot_for_peak(0.0, 1.0, -3.0);
        let at_min = solve_overshoot_for_peak(0.0, 1.0, 0.0);
        assert_eq!(below, at_min);

        let above = solve_overshoot_for_peak(0.0, 1.0, 9.0);
        let got = sampled_peak(|t| above.apply(t));
        assert!((got - 2.0).abs() < 0.02, "got {}", got);
    }

    #[test]
    fn test_into_fn_matches_apply() {
        let ease = Ease::ExpoOut;
        let f = ease.into_fn();
        assert_eq!(f(0.3), ease.apply(0.3));
    }
}
