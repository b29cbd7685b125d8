use parking_lot::Mutex;

use super::animation::ScrollAnimator;
use super::ScrollController;
use crate::config::ScrollConfig;

#[derive(Debug)]
struct SmoothState {
    animator: ScrollAnimator,
    running: bool,
    last_tick_ms: Option<f64>,
}

/// Eased scroller that can be suspended during transitions
#[derive(Debug)]
pub struct SmoothScroll {
    state: Mutex<SmoothState>,
}

impl SmoothScroll {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            state: Mutex::new(SmoothState {
                animator: ScrollAnimator::new(config),
                running: true,
                last_tick_ms: None,
            }),
        }
    }

    /// Request an eased scroll to `y`; dropped while stopped
    pub fn glide_to(&self, y: f64) {
        let mut state = self.state.lock();
        if !state.running {
            tracing::debug!(y, "Scroll request ignored while scrolling is stopped");
            return;
        }
        state.animator.glide_to(y);
    }

    pub fn position(&self) -> f64 {
        self.state.lock().animator.position()
    }

    pub fn is_animating(&self) -> bool {
        self.state.lock().animator.is_animating()
    }

    /// Time of the most recent frame tick
    pub fn last_tick_ms(&self) -> Option<f64> {
        self.state.lock().last_tick_ms
    }
}

impl ScrollController for SmoothScroll {
    fn start(&self) {
        self.state.lock().running = true;
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        state.running = false;
        state.animator.cancel();
    }

    fn tick(&self, time_ms: f64) {
        let mut state = self.state.lock();
        state.last_tick_ms = Some(time_ms);
        if state.running {
            state.animator.update(time_ms);
        }
    }

    fn scroll_to(&self, y: f64) {
        self.state.lock().animator.jump(y);
    }

    fn is_running(&self) -> bool {
        self.state.lock().running
    }
}
