//! L3 Molecular Layer: Animated progress value
//!
//! A single value in [0, 1] tweened toward the latest requested target and
//! rendered into the `--progress` custom property of one element.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ProgressConfig;
use crate::dom::{Dom, ElementId};
use crate::motion::timing::{lerp, secs};
use crate::motion::{DriveOutcome, Ease, FrameDriver};

#[derive(Debug)]
struct ProgressState {
    current: f64,
    target: f64,
    /// Bumped on every request; a tween only writes while it owns the latest
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

struct Shared {
    dom: Arc<dyn Dom>,
    element: Option<ElementId>,
    config: ProgressConfig,
    ease: Ease,
    driver: FrameDriver,
    reduced: watch::Receiver<bool>,
    state: Mutex<ProgressState>,
    /// Highest generation that has settled
    settled: watch::Sender<u64>,
}

/// Smoothly animated progress readout
#[derive(Clone)]
pub struct ProgressIndicator {
    shared: Arc<Shared>,
}

impl ProgressIndicator {
    pub fn new(
        dom: Arc<dyn Dom>,
        element: Option<ElementId>,
        config: ProgressConfig,
        driver: FrameDriver,
        reduced: watch::Receiver<bool>,
    ) -> Self {
        let (settled, _) = watch::channel(0);
        let ease = config.resolved_easing();
        Self {
            shared: Arc::new(Shared {
                dom,
                element,
                ease,
                config,
                driver,
                reduced,
                state: Mutex::new(ProgressState {
                    current: 0.0,
                    target: 0.0,
                    generation: 0,
                    in_flight: None,
                }),
                settled,
            }),
        }
    }

    /// Currently displayed value
    pub fn value(&self) -> f64 {
        self.shared.state.lock().current
    }

    /// Most recently requested target
    pub fn target(&self) -> f64 {
        self.shared.state.lock().target
    }

    pub fn is_animating(&self) -> bool {
        self.shared.state.lock().in_flight.is_some()
    }

    /// Tween length for a change of `delta`
    pub fn tween_duration(&self, delta: f64) -> Duration {
        self.shared.tween_duration(delta)
    }

    /// Animate toward `target`, superseding any tween in flight
    ///
    /// The returned completion resolves once this target, or a later one,
    /// has settled. Dropping it does not stop the tween.
    pub fn set_target(&self, target: f64) -> ProgressCompletion {
        let target = target.clamp(0.0, 1.0);
        let reduced = *self.shared.reduced.borrow();

        let mut state = self.shared.state.lock();
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }
        state.generation += 1;
        let generation = state.generation;
        state.target = target;
        let from = state.current;

        if reduced || from == target {
            state.current = target;
            drop(state);
            self.shared.write(target);
            self.shared.settle(generation);
        } else {
            let duration = self.shared.tween_duration(target - from);
            tracing::debug!(from, target, ?duration, "Progress tween started");
            let shared = Arc::clone(&self.shared);
            state.in_flight = Some(tokio::spawn(async move {
                shared.tween(generation, from, target, duration).await;
            }));
        }

        self.completion(generation)
    }

    /// Write `value` without animating
    pub fn jump_to(&self, value: f64) {
        let value = value.clamp(0.0, 1.0);
        let generation = {
            let mut state = self.shared.state.lock();
            if let Some(handle) = state.in_flight.take() {
                handle.abort();
            }
            state.generation += 1;
            state.current = value;
            state.target = value;
            state.generation
        };
        self.shared.write(value);
        self.shared.settle(generation);
    }

    /// Stop any tween and settle pending completions at the current value
    pub fn cancel(&self) {
        let generation = {
            let mut state = self.shared.state.lock();
            match state.in_flight.take() {
                Some(handle) => handle.abort(),
                None => return,
            }
            state.target = state.current;
            state.generation
        };
        tracing::debug!("Progress tween cancelled");
        self.shared.settle(generation);
    }

    fn completion(&self, generation: u64) -> ProgressCompletion {
        ProgressCompletion {
            shared: Arc::clone(&self.shared),
            settled: self.shared.settled.subscribe(),
            generation,
        }
    }
}

impl Shared {
    fn tween_duration(&self, delta: f64) -> Duration {
        let cfg = &self.config;
        secs((delta.abs() * cfg.max_secs).clamp(cfg.min_secs, cfg.max_secs))
    }

    async fn tween(&self, generation: u64, from: f64, to: f64, duration: Duration) {
        let ease = self.ease;
        let outcome = self
            .driver
            .drive(
                duration,
                || self.state.lock().generation == generation,
                |t| {
                    let value = lerp(from, to, ease.apply(t));
                    if self.advance(generation, value) {
                        self.write(value);
                    }
                },
            )
            .await;

        if outcome == DriveOutcome::Finished {
            {
                let mut state = self.state.lock();
                if state.generation != generation {
                    return;
                }
                state.current = to;
                state.in_flight = None;
            }
            self.settle(generation);
        }
    }

    fn advance(&self, generation: u64, value: f64) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }
        state.current = value;
        true
    }

    fn write(&self, value: f64) {
        let Some(element) = self.element else {
            return;
        };
        let percent = (value.clamp(0.0, 1.0) * 100.0).round() as u32;
        self.dom.set_style(element, "--progress", &percent.to_string());
        self.dom.set_text(element, &format!("{}%", percent));
    }

    fn settle(&self, generation: u64) {
        self.settled.send_if_modified(|settled| {
            if *settled < generation {
                *settled = generation;
                true
            } else {
                false
            }
        });
    }
}

/// Resolves with the displayed value once its request has settled
pub struct ProgressCompletion {
    shared: Arc<Shared>,
    settled: watch::Receiver<u64>,
    generation: u64,
}

impl IntoFuture for ProgressCompletion {
    type Output = f64;
    type IntoFuture = Pin<Box<dyn Future<Output = f64> + Send>>;

    fn into_future(mut self) -> Self::IntoFuture {
        Box::pin(async move {
            let generation = self.generation;
            let _ = self.settled.wait_for(|settled| *settled >= generation).await;
            self.shared.state.lock().current
        })
    }
}
