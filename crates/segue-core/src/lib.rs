pub mod config;
pub mod context;
pub mod dom;
pub mod error;
pub mod motion;
pub mod page;
pub mod preloader;
pub mod scroll;
pub mod transition;

#[cfg(test)]
mod testing;

pub use config::{AppConfig, ScrollConfig};
pub use context::{AppContext, MotionPreference};
pub use error::{Error, Result};
pub use preloader::{Preloader, PreloaderEvent, PreloaderPhase};
pub use transition::{NavigationOutcome, NavigationRequest, TransitionController, TransitionEvent};
