//! Animation primitives shared by the preloader, pages and smooth scrolling
//!
//! # Layers
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves and the overshoot solver
//! - `timing` - Progress, interpolation and smoothstep
//!
//! ## L3 Molecular Layer
//! - `arc` - Arc-to-pose interpolation for the preloader reveal
//! - `frame` - Cooperative per-frame driver

// L4 Atomic Layer
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod arc;
pub mod frame;

pub use arc::{active_segment, ArcConfig, ArcInterpolator, Pose};
pub use easing::{solve_overshoot_for_peak, Ease};
pub use frame::{DriveOutcome, FrameDriver};
