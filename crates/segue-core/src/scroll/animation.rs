//! L3 Molecular Layer: Eased scroll glide
//!
//! Time comes from the frame timestamps passed to `update`, not a wall
//! clock, so a glide advances exactly as fast as the owner ticks it.

use crate::config::ScrollConfig;
use crate::motion::timing::lerp;
use crate::motion::Ease;

#[derive(Debug, Clone)]
struct Glide {
    from: f64,
    to: f64,
    /// Stamped by the first frame after the request
    started_ms: Option<f64>,
}

/// Scroll offset with at most one glide in flight
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    glide: Option<Glide>,
    position: f64,
    duration_ms: f64,
    easing: Ease,
    smooth: bool,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

impl ScrollAnimator {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            glide: None,
            position: 0.0,
            duration_ms: config.animation_duration_ms as f64,
            easing: config.easing,
            smooth: config.is_smooth(),
        }
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    /// Where the current glide ends, or the position when idle
    pub fn target(&self) -> f64 {
        self.glide.as_ref().map_or(self.position, |glide| glide.to)
    }

    /// Move to `y` at once, dropping any glide
    pub fn jump(&mut self, y: f64) {
        self.glide = None;
        self.position = y.max(0.0);
    }

    /// Glide from the current position to `y`
    ///
    /// A new request restarts from wherever the previous glide had reached.
    pub fn glide_to(&mut self, y: f64) {
        let to = y.max(0.0);
        if !self.smooth {
            self.jump(to);
            return;
        }
        if to == self.position {
            self.glide = None;
            return;
        }
        self.glide = Some(Glide {
            from: self.position,
            to,
            started_ms: None,
        });
    }

    /// Advance to frame time `time_ms` and return the position
    pub fn update(&mut self, time_ms: f64) -> f64 {
        let Some(glide) = self.glide.as_mut() else {
            return self.position;
        };
        let started = *glide.started_ms.get_or_insert(time_ms);
        let t = ((time_ms - started) / self.duration_ms).clamp(0.0, 1.0);

        if t >= 1.0 {
            self.position = glide.to;
            self.glide = None;
        } else {
            self.position = lerp(glide.from, glide.to, self.easing.apply(t));
        }
        self.position
    }

    /// Stop where the glide currently is
    pub fn cancel(&mut self) {
        self.glide = None;
    }
}
