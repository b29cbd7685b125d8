//! L2 Organism Layer: Preloader state machine
//!
//! Loading -> Revealing -> Completed. Asset loads feed the progress
//! indicator; once everything has arrived the preloader root is flown along
//! the arc and the completion signal fires exactly once.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::assets::AssetLoader;
use super::progress::ProgressIndicator;
use crate::config::PreloaderConfig;
use crate::context::AppContext;
use crate::dom::{Dom, ElementId};
use crate::motion::{active_segment, ArcInterpolator, DriveOutcome, FrameDriver};

/// Externally visible preloader phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloaderPhase {
    Loading,
    Revealing,
    Completed,
}

/// Notifications sent to the host while the preloader runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloaderEvent {
    /// One more tracked asset finished loading
    Progress { loaded: usize, total: usize },
    /// The reveal finished (or was skipped); sent once
    Completed,
}

#[derive(Debug, Default)]
struct LoadState {
    total: usize,
    loaded: usize,
    seen: HashSet<ElementId>,
}

struct Shared {
    dom: Arc<dyn Dom>,
    assets: Arc<dyn AssetLoader>,
    config: PreloaderConfig,
    driver: FrameDriver,
    root: Option<ElementId>,
    images: Vec<ElementId>,
    progress: ProgressIndicator,
    reduced: watch::Receiver<bool>,
    phase: watch::Sender<PreloaderPhase>,
    events: Option<mpsc::UnboundedSender<PreloaderEvent>>,
    load: Mutex<LoadState>,
    started: AtomicBool,
    all_loaded: AtomicBool,
    completed: AtomicBool,
    /// Asset listeners and the reveal sequence
    tasks: Mutex<Vec<JoinHandle<()>>>,
    motion_watcher: Mutex<Option<JoinHandle<()>>>,
}

/// Loading screen driven by asset progress
pub struct Preloader {
    shared: Arc<Shared>,
}

impl Preloader {
    pub fn new(ctx: &AppContext, events: Option<mpsc::UnboundedSender<PreloaderEvent>>) -> Self {
        let config = ctx.config.preloader.clone();
        let dom = Arc::clone(&ctx.dom);

        let root = dom.query(&config.root_selector);
        if root.is_none() {
            tracing::warn!("Preloader root {} not found", config.root_selector);
        }
        let images = dom.query_all(&config.image_selector);
        let driver = ctx.frame_driver();
        let reduced = ctx.motion.subscribe();
        let progress = ProgressIndicator::new(
            Arc::clone(&dom),
            dom.query(&config.progress_selector),
            config.progress.clone(),
            driver,
            reduced.clone(),
        );
        let (phase, _) = watch::channel(PreloaderPhase::Loading);

        Self {
            shared: Arc::new(Shared {
                dom,
                assets: Arc::clone(&ctx.assets),
                config,
                driver,
                root,
                images,
                progress,
                reduced,
                phase,
                events,
                load: Mutex::new(LoadState::default()),
                started: AtomicBool::new(false),
                all_loaded: AtomicBool::new(false),
                completed: AtomicBool::new(false),
                tasks: Mutex::new(Vec::new()),
                motion_watcher: Mutex::new(None),
            }),
        }
    }

    /// Begin tracking assets; only the first call has any effect
    pub fn start(&self) {
        let shared = &self.shared;
        if shared.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Preloader already started");
            return;
        }

        if *shared.reduced.borrow() {
            tracing::info!("Reduced motion active, skipping preloader animation");
            shared.finish_immediately();
            return;
        }

        let watcher = tokio::spawn(watch_motion(Arc::clone(shared)));
        *shared.motion_watcher.lock() = Some(watcher);

        let assets = shared.dom.query_all(&shared.config.asset_selector);
        shared.load.lock().total = assets.len();
        tracing::info!("Preloader tracking {} assets", assets.len());

        if assets.is_empty() {
            shared.mark_all_loaded();
            return;
        }

        for element in assets {
            let deferred = shared.dom.attribute(element, &shared.config.deferred_attribute);
            let src = match deferred.or_else(|| shared.dom.attribute(element, "src")) {
                Some(src) => src,
                None => {
                    tracing::debug!("Asset {} has no source, counting it as loaded", element);
                    shared.on_asset_loaded(element);
                    continue;
                }
            };
            shared.dom.set_attribute(element, "src", &src);

            if shared.assets.is_complete(element, &src) {
                shared.on_asset_loaded(element);
                continue;
            }

            let listener = Arc::clone(shared);
            let handle = tokio::spawn(async move {
                if let Err(e) = listener.assets.wait_loaded(element, &src).await {
                    tracing::warn!("Asset {} ({}) failed to load: {}", element, src, e);
                }
                listener.on_asset_loaded(element);
            });
            shared.tasks.lock().push(handle);
        }
    }

    /// Resolve once the preloader has reached [`PreloaderPhase::Completed`]
    pub async fn wait_completed(&self) {
        let mut phase = self.shared.phase.subscribe();
        let _ = phase
            .wait_for(|phase| *phase == PreloaderPhase::Completed)
            .await;
    }

    pub fn phase(&self) -> PreloaderPhase {
        *self.shared.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreloaderPhase> {
        self.shared.phase.subscribe()
    }

    pub fn is_completed(&self) -> bool {
        self.shared.completed.load(Ordering::SeqCst)
    }

    /// `(loaded, total)` asset counts
    pub fn loaded(&self) -> (usize, usize) {
        let load = self.shared.load.lock();
        (load.loaded, load.total)
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.shared.progress
    }

    /// Stop all preloader work and detach its root
    pub fn destroy(&self) {
        let shared = &self.shared;
        shared.progress.cancel();
        shared.abort_tasks();
        if let Some(watcher) = shared.motion_watcher.lock().take() {
            watcher.abort();
        }

        if let Some(root) = shared.root {
            if shared.dom.is_attached(root) {
                shared.dom.remove(root);
                tracing::info!("Preloader destroyed");
            } else {
                tracing::debug!("Preloader root already detached");
            }
        }
    }
}

impl Drop for Preloader {
    fn drop(&mut self) {
        self.shared.abort_tasks();
        if let Some(watcher) = self.shared.motion_watcher.lock().take() {
            watcher.abort();
        }
    }
}

impl Shared {
    fn on_asset_loaded(self: &Arc<Self>, element: ElementId) {
        let (loaded, total) = {
            let mut load = self.load.lock();
            if !load.seen.insert(element) {
                tracing::debug!("Duplicate load callback for {}", element);
                return;
            }
            load.loaded += 1;
            (load.loaded, load.total)
        };

        self.dom.add_class(element, "loaded");
        tracing::debug!("Asset {} loaded ({}/{})", element, loaded, total);
        self.emit(PreloaderEvent::Progress { loaded, total });

        if self.completed.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.progress.set_target(loaded as f64 / total.max(1) as f64);

        if loaded == total {
            self.mark_all_loaded();
        }
    }

    fn mark_all_loaded(self: &Arc<Self>) {
        if self.all_loaded.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("All preloader assets loaded");

        let shared = Arc::clone(self);
        let handle = tokio::spawn(async move {
            shared.progress.set_target(1.0).await;
            shared.reveal().await;
        });
        self.tasks.lock().push(handle);
    }

    async fn reveal(&self) {
        if self.completed.load(Ordering::SeqCst) {
            return;
        }
        self.phase.send_replace(PreloaderPhase::Revealing);

        let Some(root) = self.root else {
            self.complete();
            return;
        };
        let arc = match ArcInterpolator::new(self.config.arc.clone(), self.dom.viewport_height()) {
            Ok(arc) => arc,
            Err(e) => {
                tracing::warn!("Skipping preloader reveal: {}", e);
                self.complete();
                return;
            }
        };

        tracing::debug!("Preloader reveal started");
        let outcome = self
            .driver
            .drive(
                arc.config().duration(),
                || self.dom.is_attached(root),
                |time| {
                    self.dom.set_style(root, "transform", &arc.pose_at_time(time).to_css());
                    self.show_segment(arc.config().ease_time.apply(time));
                },
            )
            .await;

        if outcome == DriveOutcome::Detached {
            tracing::debug!("Preloader root detached during reveal");
        }
        self.complete();
    }

    /// Skip straight to the end state
    fn finish_immediately(&self) {
        self.abort_tasks();
        self.progress.cancel();
        self.complete();
    }

    fn complete(&self) {
        if self.completed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.apply_end_state();
        self.phase.send_replace(PreloaderPhase::Completed);
        tracing::info!("Preloader completed");
        self.emit(PreloaderEvent::Completed);
    }

    fn apply_end_state(&self) {
        self.progress.jump_to(1.0);
        if let Some(root) = self.root {
            match ArcInterpolator::new(self.config.arc.clone(), self.dom.viewport_height()) {
                Ok(arc) => {
                    self.dom.set_style(root, "transform", &arc.pose_at_time(1.0).to_css());
                }
                Err(e) => tracing::warn!("Preloader end pose unavailable: {}", e),
            }
        }
        self.show_segment(1.0);
    }

    /// Make only the sub-image for `fraction` visible
    fn show_segment(&self, fraction: f64) {
        let active = active_segment(fraction, self.images.len());
        for (index, image) in self.images.iter().enumerate() {
            let visibility = if Some(index) == active { "visible" } else { "hidden" };
            self.dom.set_style(*image, "visibility", visibility);
        }
    }

    fn abort_tasks(&self) {
        for handle in self.tasks.lock().drain(..) {
            handle.abort();
        }
    }

    fn emit(&self, event: PreloaderEvent) {
        if let Some(ref tx) = self.events {
            let _ = tx.send(event);
        }
    }
}

async fn watch_motion(shared: Arc<Shared>) {
    let mut reduced = shared.reduced.clone();
    while reduced.changed().await.is_ok() {
        let is_reduced = *reduced.borrow_and_update();
        if is_reduced && !shared.completed.load(Ordering::SeqCst) {
            tracing::info!("Reduced motion enabled, finishing preloader");
            shared.finish_immediately();
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dom::MemoryDom;
    use crate::motion::ArcConfig;
    use crate::testing::{context, ManualAssets};

    fn markup(assets: usize, images: usize) -> String {
        let mut html = String::from(
            r#"<html><body><div class="preloader"><span class="preloader__progress"></span>"#,
        );
        for i in 0..images {
            html.push_str(&format!(r#"<div class="preloader__image" data-i="{}"></div>"#, i));
        }
        html.push_str("</div><main>");
        for i in 0..assets {
            html.push_str(&format!(r#"<img data-src="/img/{}.jpg">"#, i));
        }
        html.push_str("</main></body></html>");
        html
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<PreloaderEvent>) -> Vec<PreloaderEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_fires_once_for_instant_assets() {
        for count in [0usize, 1, 5, 100] {
            let dom = Arc::new(MemoryDom::parse(&markup(count, 0)));
            let assets = Arc::new(ManualAssets::instant());
            let ctx = context(dom.clone(), assets.clone());
            let (tx, mut rx) = mpsc::unbounded_channel();

            let preloader = Preloader::new(&ctx, Some(tx));
            preloader.start();
            preloader.wait_completed().await;
            tokio::time::sleep(Duration::from_secs(5)).await;

            let events = drain(&mut rx);
            let completed = events.iter().filter(|e| **e == PreloaderEvent::Completed).count();
            let progress = events.len() - completed;
            assert_eq!(completed, 1, "{} assets", count);
            assert_eq!(progress, count);
            assert_eq!(preloader.loaded(), (count, count));
            assert_eq!(assets.waits(), 0);

            let indicator = dom.query(".preloader__progress").unwrap();
            assert_eq!(dom.style(indicator, "--progress").as_deref(), Some("100"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_gated_assets_complete_after_release() {
        let dom = Arc::new(MemoryDom::parse(&markup(3, 0)));
        let assets = Arc::new(ManualAssets::gated());
        let ctx = context(dom.clone(), assets.clone());
        let preloader = Preloader::new(&ctx, None);

        preloader.start();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(preloader.phase(), PreloaderPhase::Loading);
        assert_eq!(preloader.loaded(), (0, 3));

        let images = dom.query_all("img");
        assert_eq!(dom.attribute(images[1], "src").as_deref(), Some("/img/1.jpg"));

        assets.release();
        preloader.wait_completed().await;

        assert_eq!(preloader.loaded(), (3, 3));
        assert!(images.iter().all(|img| dom.has_class(*img, "loaded")));
        assert_eq!(assets.waits(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_ends_on_final_pose_and_segment() {
        let dom = Arc::new(MemoryDom::parse(&markup(1, 3)));
        let ctx = context(dom.clone(), Arc::new(ManualAssets::instant()));
        let mut phases = Vec::new();

        let preloader = Preloader::new(&ctx, None);
        let mut rx = preloader.subscribe();
        preloader.start();
        while rx.changed().await.is_ok() {
            let phase = *rx.borrow_and_update();
            phases.push(phase);
            if phase == PreloaderPhase::Completed {
                break;
            }
        }
        assert_eq!(phases, vec![PreloaderPhase::Revealing, PreloaderPhase::Completed]);

        let root = dom.query(".preloader").unwrap();
        let expected = ArcInterpolator::new(ArcConfig::default(), dom.viewport_height())
            .unwrap()
            .pose_at_time(1.0)
            .to_css();
        assert_eq!(dom.style(root, "transform"), Some(expected));

        let visibility: Vec<_> = dom
            .query_all(".preloader__image")
            .into_iter()
            .map(|img| dom.style(img, "visibility").unwrap_or_default())
            .collect();
        assert_eq!(visibility, vec!["hidden", "hidden", "visible"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reduced_motion_completes_immediately() {
        let dom = Arc::new(MemoryDom::parse(&markup(4, 0)));
        let assets = Arc::new(ManualAssets::gated());
        let ctx = context(dom.clone(), assets.clone());
        ctx.motion.set(true);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let preloader = Preloader::new(&ctx, Some(tx));
        preloader.start();

        assert_eq!(preloader.phase(), PreloaderPhase::Completed);
        assert_eq!(drain(&mut rx), vec![PreloaderEvent::Completed]);
        assert_eq!(assets.waits(), 0);

        let indicator = dom.query(".preloader__progress").unwrap();
        assert_eq!(dom.style(indicator, "--progress").as_deref(), Some("100"));
        let root = dom.query(".preloader").unwrap();
        assert!(dom.style(root, "transform").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_reduced_motion_toggle_completes_once() {
        let dom = Arc::new(MemoryDom::parse(&markup(2, 0)));
        let assets = Arc::new(ManualAssets::gated());
        let ctx = context(dom.clone(), assets.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let preloader = Preloader::new(&ctx, Some(tx));
        preloader.start();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(preloader.phase(), PreloaderPhase::Loading);

        ctx.motion.set(true);
        preloader.wait_completed().await;

        // Listeners were aborted; releasing them changes nothing
        assets.release();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let events = drain(&mut rx);
        let completed = events.iter().filter(|e| **e == PreloaderEvent::Completed).count();
        assert_eq!(completed, 1);
        assert!(preloader.is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_is_idempotent() {
        let dom = Arc::new(MemoryDom::parse(&markup(2, 0)));
        let assets = Arc::new(ManualAssets::gated());
        let ctx = context(dom.clone(), assets);

        let preloader = Preloader::new(&ctx, None);
        preloader.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        preloader.destroy();
        preloader.destroy();

        assert!(dom.query(".preloader").is_none());
        assert!(!preloader.progress().is_animating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_root_still_completes() {
        let dom = Arc::new(MemoryDom::parse(r#"<main><img src="/a.jpg"></main>"#));
        let ctx = context(dom, Arc::new(ManualAssets::instant()));

        let preloader = Preloader::new(&ctx, None);
        preloader.start();
        preloader.wait_completed().await;
        assert!(preloader.is_completed());
        preloader.destroy();
    }
}
