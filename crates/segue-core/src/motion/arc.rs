//! L3 Molecular Layer: Arc interpolation for the preloader reveal
//!
//! The reveal moves an element along a circular arc: the vertical coordinate
//! of the arc drives the on-screen offset and the depth coordinate drives
//! scale, rotation and z translation, so the element appears to swing up
//! from below the fold toward the viewer.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::easing::Ease;
use super::timing::{lerp, smoothstep};
use crate::{Error, Result};

/// Vertical scale relative to horizontal scale
pub const SCALE_Y_ASYMMETRY: f64 = 1.04;

/// Remap denominators below this are treated as singular
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Parameters of one arc traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcConfig {
    /// Distance below the rest position, in viewport units
    #[serde(default = "default_bottom_units")]
    pub bottom_units: f64,
    /// Extra distance added past the bottom
    #[serde(default = "default_extra_units")]
    pub extra_units: f64,
    /// Lift subtracted from the starting distance
    #[serde(default = "default_lift_units")]
    pub lift_units: f64,
    #[serde(default = "default_start_angle")]
    pub start_angle_deg: f64,
    #[serde(default = "default_end_angle")]
    pub end_angle_deg: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
    /// Z translation (px) applied at minimum depth
    #[serde(default = "default_depth_strength")]
    pub depth_strength: f64,
    #[serde(default = "default_min_rotation")]
    pub min_rotation_deg: f64,
    #[serde(default = "default_max_rotation")]
    pub max_rotation_deg: f64,
    #[serde(default = "default_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_ease_time")]
    pub ease_time: Ease,
    #[serde(default = "default_ease_scale")]
    pub ease_scale: Ease,
    #[serde(default = "default_ease_rotation")]
    pub ease_rotation: Ease,
    /// Fraction of scale removed by the end of the tail
    #[serde(default = "default_tail_drop")]
    pub tail_drop: f64,
    /// Trailing fraction of the duration over which the taper applies
    #[serde(default = "default_tail_window")]
    pub tail_window: f64,
    /// Exponent applied to the smoothstep taper
    #[serde(default = "default_tail_curve")]
    pub tail_curve: f64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            bottom_units: default_bottom_units(),
            extra_units: default_extra_units(),
            lift_units: default_lift_units(),
            start_angle_deg: default_start_angle(),
            end_angle_deg: default_end_angle(),
            radius: default_radius(),
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            depth_strength: default_depth_strength(),
            min_rotation_deg: default_min_rotation(),
            max_rotation_deg: default_max_rotation(),
            duration_ms: default_duration(),
            ease_time: default_ease_time(),
            ease_scale: default_ease_scale(),
            ease_rotation: default_ease_rotation(),
            tail_drop: default_tail_drop(),
            tail_window: default_tail_window(),
            tail_curve: default_tail_curve(),
        }
    }
}

fn default_bottom_units() -> f64 { 100.0 }
fn default_extra_units() -> f64 { 10.0 }
fn default_lift_units() -> f64 { 20.0 }
fn default_start_angle() -> f64 { -75.0 }
fn default_end_angle() -> f64 { 0.0 }
fn default_radius() -> f64 { 1.0 }
fn default_min_scale() -> f64 { 0.6 }
fn default_max_scale() -> f64 { 1.0 }
fn default_depth_strength() -> f64 { 400.0 }
fn default_min_rotation() -> f64 { 35.0 }
fn default_max_rotation() -> f64 { 0.0 }
fn default_duration() -> u64 { 1800 }
fn default_ease_time() -> Ease { Ease::CubicInOut }
fn default_ease_scale() -> Ease { Ease::ExpoOut }
fn default_ease_rotation() -> Ease { Ease::CubicOut }
fn default_tail_drop() -> f64 { 0.04 }
fn default_tail_window() -> f64 { 0.15 }
fn default_tail_curve() -> f64 { 1.5 }

impl ArcConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Starting offset in viewport units
    pub fn start_units(&self) -> f64 {
        self.bottom_units - self.lift_units + self.extra_units
    }
}

/// Resolved transform for one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub y_offset_px: f64,
    pub z_offset_px: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation_x_deg: f64,
}

impl Pose {
    /// Render as a CSS `transform` value
    pub fn to_css(&self) -> String {
        format!(
            "translate3d(0, {:.3}px, {:.3}px) rotateX({:.3}deg) scale({:.4}, {:.4})",
            self.y_offset_px, self.z_offset_px, self.rotation_x_deg, self.scale_x, self.scale_y
        )
    }
}

/// Maps eased progress to a [`Pose`] along a circular arc
#[derive(Debug, Clone)]
pub struct ArcInterpolator {
    config: ArcConfig,
    start_rad: f64,
    end_rad: f64,
    /// Two-point remap `units = a * y + b`; `None` when the boundary samples coincide
    remap: Option<(f64, f64)>,
    z_min: f64,
    z_max: f64,
    unit_px: f64,
}

impl ArcInterpolator {
    /// Build an interpolator for a viewport of the given height (px)
    pub fn new(config: ArcConfig, viewport_height: f64) -> Result<Self> {
        if config.start_angle_deg == config.end_angle_deg {
            return Err(Error::Config(
                "arc start and end angles must differ".to_string(),
            ));
        }

        let start_rad = config.start_angle_deg.to_radians();
        let end_rad = config.end_angle_deg.to_radians();

        let y_start = config.radius * start_rad.cos();
        let y_end = config.radius * end_rad.cos();
        let remap = if (y_start - y_end).abs() < DEGENERATE_EPSILON {
            None
        } else {
            let a = config.start_units() / (y_start - y_end);
            Some((a, -a * y_end))
        };

        let (z_min, z_max) = sine_range(start_rad, end_rad);

        Ok(Self {
            z_min: config.radius * z_min,
            z_max: config.radius * z_max,
            unit_px: viewport_height / 100.0,
            config,
            start_rad,
            end_rad,
            remap,
        })
    }

    pub fn config(&self) -> &ArcConfig {
        &self.config
    }

    /// Pose for eased progress `t`, with the taper driven by `time_fraction`
    pub fn pose(&self, t: f64, time_fraction: f64) -> Pose {
        let t = t.clamp(0.0, 1.0);
        let cfg = &self.config;
        let angle = lerp(self.start_rad, self.end_rad, t);

        let units = match self.remap {
            Some((a, b)) => a * cfg.radius * angle.cos() + b,
            None => cfg.start_units() * (1.0 - t),
        };

        let z = cfg.radius * angle.sin();
        let depth = if (self.z_max - self.z_min).abs() < DEGENERATE_EPSILON {
            1.0
        } else {
            ((z - self.z_min) / (self.z_max - self.z_min)).clamp(0.0, 1.0)
        };

        let scale = lerp(cfg.min_scale, cfg.max_scale, cfg.ease_scale.apply(depth))
            * self.taper(time_fraction);
        let rotation = lerp(
            cfg.min_rotation_deg,
            cfg.max_rotation_deg,
            cfg.ease_rotation.apply(depth),
        );

        Pose {
            y_offset_px: units * self.unit_px,
            z_offset_px: -cfg.depth_strength * (1.0 - depth),
            scale_x: scale,
            scale_y: scale * SCALE_Y_ASYMMETRY,
            rotation_x_deg: rotation,
        }
    }

    /// Pose at a raw time fraction, easing it through `ease_time` first
    pub fn pose_at_time(&self, time_fraction: f64) -> Pose {
        let time_fraction = time_fraction.clamp(0.0, 1.0);
        self.pose(self.config.ease_time.apply(time_fraction), time_fraction)
    }

    /// Multiplicative scale reduction over the last `tail_window` of the run
    pub fn taper(&self, time_fraction: f64) -> f64 {
        let cfg = &self.config;
        if cfg.tail_window <= 0.0 {
            return 1.0;
        }
        let tail_start = 1.0 - cfg.tail_window.min(1.0);
        if time_fraction <= tail_start {
            return 1.0;
        }
        let u = ((time_fraction - tail_start) / cfg.tail_window.min(1.0)).clamp(0.0, 1.0);
        1.0 - cfg.tail_drop * smoothstep(u).powf(cfg.tail_curve)
    }
}

/// Which of `count` equal buckets of [0, 1] contains `fraction`
pub fn active_segment(fraction: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let index = (fraction.clamp(0.0, 1.0) * count as f64).floor() as usize;
    Some(index.min(count - 1))
}

/// Min and max of sin(θ) for θ between the two angles
fn sine_range(a: f64, b: f64) -> (f64, f64) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut min = lo.sin().min(hi.sin());
    let mut max = lo.sin().max(hi.sin());
    if contains_angle(lo, hi, FRAC_PI_2) {
        max = 1.0;
    }
    if contains_angle(lo, hi, -FRAC_PI_2) {
        min = -1.0;
    }
    (min, max)
}

/// Whether some θ + 2πk lies in [lo, hi]
fn contains_angle(lo: f64, hi: f64, theta: f64) -> bool {
    let k = ((lo - theta) / TAU).ceil();
    theta + k * TAU <= hi
}
