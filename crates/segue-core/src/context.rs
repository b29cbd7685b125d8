use std::sync::Arc;

use tokio::sync::watch;

use crate::config::AppConfig;
use crate::dom::Dom;
use crate::motion::FrameDriver;
use crate::preloader::AssetLoader;

/// Reduced-motion preference, readable now and observable for changes
///
/// Stands in for the `prefers-reduced-motion` media query: hosts flip it
/// with [`MotionPreference::set`] and every subscriber sees the change.
#[derive(Debug, Clone)]
pub struct MotionPreference {
    tx: Arc<watch::Sender<bool>>,
}

impl MotionPreference {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, reduced: bool) {
        self.tx.send_if_modified(|current| {
            if *current == reduced {
                false
            } else {
                *current = reduced;
                true
            }
        });
    }

    pub fn is_reduced(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Everything a page or the preloader needs from the host
///
/// Passed explicitly to whatever constructs pages instead of living in a
/// global.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub dom: Arc<dyn Dom>,
    pub assets: Arc<dyn AssetLoader>,
    pub motion: MotionPreference,
}

impl AppContext {
    pub fn new(config: Arc<AppConfig>, dom: Arc<dyn Dom>, assets: Arc<dyn AssetLoader>) -> Self {
        let motion = MotionPreference::new(config.animation.reduced_motion);
        Self {
            config,
            dom,
            assets,
            motion,
        }
    }

    /// Frame driver at the configured frame rate
    pub fn frame_driver(&self) -> FrameDriver {
        FrameDriver::new(self.config.animation.animation_fps)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("reduced_motion", &self.motion.is_reduced())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reduced_motion_notifies_subscribers() {
        let motion = MotionPreference::new(false);
        let mut rx = motion.subscribe();
        assert!(!*rx.borrow());

        motion.set(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(motion.is_reduced());

        // Setting the same value again does not notify
        motion.set(true);
        assert!(!rx.has_changed().unwrap());
    }
}
