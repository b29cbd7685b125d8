//! Smooth scrolling
//!
//! The transition controller only needs to suspend and resume scrolling
//! around a page swap; [`ScrollController`] is that boundary. [`SmoothScroll`]
//! is the bundled implementation: glides eased by the frame clock the owner
//! feeds through `tick`, dropped while stopped.
//!
//! ## L3 Molecular Layer
//! - `animation` - Eased glide between two offsets on the frame clock
//! - `smooth` - Start/stop wrapper driven by per-frame ticks

// L3 Molecular Layer
pub mod animation;
pub mod smooth;

pub use crate::config::ScrollConfig;
pub use animation::ScrollAnimator;
pub use smooth::SmoothScroll;

/// Suspend/resume interface of the smooth-scroll engine
pub trait ScrollController: Send + Sync {
    /// Resume reacting to input
    fn start(&self);

    /// Ignore input until `start` is called again
    fn stop(&self);

    /// Advance one frame; the owner calls this every display refresh
    fn tick(&self, time_ms: f64);

    /// Jump to a position without animating
    fn scroll_to(&self, y: f64);

    fn is_running(&self) -> bool;
}
