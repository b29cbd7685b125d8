//! L3 Molecular Layer: Cooperative per-frame driver
//!
//! Replaces recursive frame-callback scheduling with a loop over interval
//! ticks. Each tick reports the raw time fraction to the caller; the loop
//! exits once the duration has elapsed or the target is gone.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use super::timing::{is_complete, progress};

/// Why a drive loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// The full duration elapsed; the final frame was delivered at t=1
    Finished,
    /// The target reported itself detached before the end
    Detached,
}

/// Ticks at a fixed frame rate
#[derive(Debug, Clone, Copy)]
pub struct FrameDriver {
    frame: Duration,
}

impl FrameDriver {
    /// Create a driver for the given frame rate
    pub fn new(fps: u32) -> Self {
        let frame = if fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / fps as u64).max(Duration::from_millis(1))
        };
        Self { frame }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Run `on_frame` once per tick until `duration` elapses
    ///
    /// `attached` is checked before every frame; when it returns false the
    /// loop resolves early with [`DriveOutcome::Detached`] instead of writing
    /// to a target that no longer exists.
    pub async fn drive<A, F>(&self, duration: Duration, mut attached: A, mut on_frame: F) -> DriveOutcome
    where
        A: FnMut() -> bool,
        F: FnMut(f64),
    {
        let start = Instant::now();
        let mut interval = tokio::time::interval(self.frame);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            if !attached() {
                return DriveOutcome::Detached;
            }

            if is_complete(start, duration) {
                on_frame(1.0);
                return DriveOutcome::Finished;
            }

            on_frame(progress(start, duration));
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(60)
    }
}
