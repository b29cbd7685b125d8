//! First-load preloader
//!
//! Tracks asset loading, animates a percentage readout, then flies the
//! preloader away along an arc before handing control to the page.
//!
//! ## L3 Molecular Layer
//! - `assets` - Asset loading boundary and its HTTP implementation
//! - `progress` - Tweened progress value
//!
//! ## L2 Organism Layer
//! - `engine` - Loading/reveal state machine

// L3 Molecular Layer
pub mod assets;
pub mod progress;

// L2 Organism Layer
pub mod engine;

pub use assets::{AssetLoader, HttpAssetLoader};
pub use engine::{Preloader, PreloaderEvent, PreloaderPhase};
pub use progress::{ProgressCompletion, ProgressIndicator};
