//! Test doubles for the host boundaries

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use url::Url;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::dom::{ElementId, MemoryDom};
use crate::preloader::assets::LoadRegistry;
use crate::preloader::AssetLoader;
use crate::scroll::ScrollController;
use crate::transition::{DocumentFetcher, FetchedDocument};
use crate::Result;

pub(crate) fn context(dom: Arc<MemoryDom>, assets: Arc<ManualAssets>) -> AppContext {
    AppContext::new(Arc::new(AppConfig::default()), dom, assets)
}

/// Asset loader whose loads finish instantly or when released
pub(crate) struct ManualAssets {
    complete: bool,
    release: watch::Sender<bool>,
    waits: AtomicUsize,
}

impl ManualAssets {
    /// Every asset reports itself already complete
    pub(crate) fn instant() -> Self {
        Self::build(true)
    }

    /// Loads block until [`ManualAssets::release`]
    pub(crate) fn gated() -> Self {
        Self::build(false)
    }

    fn build(complete: bool) -> Self {
        let (release, _) = watch::channel(false);
        Self {
            complete,
            release,
            waits: AtomicUsize::new(0),
        }
    }

    pub(crate) fn release(&self) {
        self.release.send_replace(true);
    }

    pub(crate) fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetLoader for ManualAssets {
    fn is_complete(&self, _element: ElementId, _src: &str) -> bool {
        self.complete
    }

    async fn wait_loaded(&self, _element: ElementId, _src: &str) -> Result<()> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        let mut release = self.release.subscribe();
        let _ = release.wait_for(|released| *released).await;
        Ok(())
    }
}

/// Asset loader that coalesces like the HTTP one and counts fetches per path
pub(crate) struct CountingAssets {
    base: Url,
    loads: LoadRegistry,
    fetches: Mutex<HashMap<String, usize>>,
    waits: AtomicUsize,
}

impl CountingAssets {
    pub(crate) fn new() -> Self {
        Self {
            base: Url::parse("http://localhost:3000/").unwrap(),
            loads: LoadRegistry::default(),
            fetches: Mutex::new(HashMap::new()),
            waits: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fetches(&self, path: &str) -> usize {
        self.fetches.lock().get(path).copied().unwrap_or(0)
    }

    pub(crate) fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetLoader for CountingAssets {
    fn is_complete(&self, _element: ElementId, src: &str) -> bool {
        self.base
            .join(src)
            .map(|url| self.loads.is_loaded(&url))
            .unwrap_or(false)
    }

    async fn wait_loaded(&self, _element: ElementId, src: &str) -> Result<()> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        let url = self.base.join(src)?;
        let fetches = &self.fetches;
        let path = url.path().to_string();
        self.loads
            .load(&url, move || async move {
                *fetches.lock().entry(path).or_default() += 1;
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await
    }
}

/// Fetcher serving canned documents by path; unknown paths get a 404
pub(crate) struct StubFetcher {
    routes: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<Url>>,
    latency: Duration,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            latency: Duration::from_millis(50),
        }
    }

    pub(crate) fn route(self, path: &str, status: u16, body: &str) -> Self {
        self.add_route(path, status, body);
        self
    }

    pub(crate) fn add_route(&self, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument> {
        self.requests.lock().push(url.clone());
        tokio::time::sleep(self.latency).await;

        let route = self.routes.lock().get(url.path()).cloned();
        let (status, body) = route.unwrap_or((404, "<html><body>Not found</body></html>".to_string()));
        Ok(FetchedDocument {
            url: url.clone(),
            status,
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScrollCall {
    Start,
    Stop,
    Tick(f64),
    ScrollTo(f64),
}

/// Scroll controller that records every call
#[derive(Default)]
pub(crate) struct RecordingScroll {
    calls: Mutex<Vec<ScrollCall>>,
    running: AtomicBool,
}

impl RecordingScroll {
    pub(crate) fn calls(&self) -> Vec<ScrollCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl ScrollController for RecordingScroll {
    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        self.calls.lock().push(ScrollCall::Start);
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.calls.lock().push(ScrollCall::Stop);
    }

    fn tick(&self, time_ms: f64) {
        self.calls.lock().push(ScrollCall::Tick(time_ms));
    }

    fn scroll_to(&self, y: f64) {
        self.calls.lock().push(ScrollCall::ScrollTo(y));
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
