//! L1 Page Layer: Navigation state machine
//!
//! Sequences hide(old) -> fetch -> history -> swap -> create(new) ->
//! show(new) for each navigation, with smooth scrolling suspended across
//! the swap. At most one transition runs at a time; requests that arrive
//! meanwhile are queued and only the newest one is kept.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

use super::document::{parse_document, ParsedDocument};
use super::fetcher::DocumentFetcher;
use super::history::History;
use super::links::LinkInterceptor;
use crate::context::AppContext;
use crate::dom::ElementId;
use crate::page::{Page, PageRegistry};
use crate::preloader::Preloader;
use crate::scroll::ScrollController;
use crate::{Error, Result};

/// One navigation, tagged with an id for log correlation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub id: Uuid,
    pub target: Url,
    pub push_history: bool,
}

impl NavigationRequest {
    pub fn new(target: Url, push_history: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            push_history,
        }
    }
}

/// How a navigation call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The new content is shown; `template` is the page type it named
    Completed { template: String },
    /// Target is the current document
    Unchanged,
    /// Another transition was running; this one runs after it unless superseded
    Queued,
    /// Fetch or parse failed and the previous page was restored
    Failed { reason: String },
}

/// Lifecycle milestones, in the order they happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    PageHidden { page: String },
    PageDestroyed { page: String },
    HistoryPushed { url: Url },
    ContentSwapped { template: String },
    PageCreated { page: String },
    PageShown { page: String },
    Failed { url: Url, reason: String },
    Queued { url: Url },
}

struct TransitionState {
    current_page: Option<Arc<dyn Page>>,
    /// URL of the content currently in the document
    location: Url,
    pending_navigation: Option<NavigationRequest>,
    busy: bool,
}

/// Owns navigation: link interception, history and content swaps
pub struct TransitionController {
    ctx: AppContext,
    registry: PageRegistry,
    fetcher: Arc<dyn DocumentFetcher>,
    history: Arc<dyn History>,
    scroll: Arc<dyn ScrollController>,
    links: LinkInterceptor,
    state: Mutex<TransitionState>,
    events: Option<mpsc::UnboundedSender<TransitionEvent>>,
}

impl TransitionController {
    pub fn new(
        ctx: AppContext,
        registry: PageRegistry,
        fetcher: Arc<dyn DocumentFetcher>,
        history: Arc<dyn History>,
        scroll: Arc<dyn ScrollController>,
    ) -> Self {
        let location = history.current_url();
        let links = LinkInterceptor::new(&ctx.config.site.link_selector);
        Self {
            ctx,
            registry,
            fetcher,
            history,
            scroll,
            links,
            state: Mutex::new(TransitionState {
                current_page: None,
                location,
                pending_navigation: None,
                busy: false,
            }),
            events: None,
        }
    }

    /// Report lifecycle milestones on `tx`
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<TransitionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    pub fn location(&self) -> Url {
        self.state.lock().location.clone()
    }

    pub fn current_page(&self) -> Option<Arc<dyn Page>> {
        self.state.lock().current_page.clone()
    }

    pub fn links(&self) -> &LinkInterceptor {
        &self.links
    }

    /// First load: run the preloader, then show the page already in the document
    pub async fn boot(&self, preloader: &Preloader) {
        self.scroll.stop();

        let site = &self.ctx.config.site;
        let template = self
            .ctx
            .dom
            .query(&site.content_selector)
            .and_then(|content| self.ctx.dom.attribute(content, &site.template_attribute))
            .unwrap_or_else(|| {
                tracing::warn!("No page type in document, assuming {}", self.registry.fallback());
                self.registry.fallback().to_string()
            });

        let page = self.registry.resolve(&template);
        if let Some(ref page) = page {
            page.create();
            self.emit(TransitionEvent::PageCreated {
                page: page.id().to_string(),
            });
        }
        self.state.lock().current_page = page.clone();
        self.rebind_links();

        preloader.start();
        preloader.wait_completed().await;

        if let Some(ref page) = page {
            page.show().await;
            self.emit(TransitionEvent::PageShown {
                page: page.id().to_string(),
            });
        }
        self.scroll.start();
        preloader.destroy();
        tracing::info!("Boot complete on {}", template);
    }

    /// Navigate to `href`, resolved against the current location
    pub async fn navigate_to(&self, href: &str) -> Result<NavigationOutcome> {
        let target = self.location().join(href)?;
        Ok(self.navigate(NavigationRequest::new(target, true)).await)
    }

    /// Replay a history entry without pushing a new one
    pub async fn pop_state(&self, url: Url) -> NavigationOutcome {
        self.navigate(NavigationRequest::new(url, false)).await
    }

    /// Navigate for a link activation; `None` when the link is not handled in-app
    pub async fn activate_link(&self, element: ElementId) -> Option<NavigationOutcome> {
        let Some(target) = self.links.target(element) else {
            tracing::debug!("Link {} is not bound, leaving it to the browser", element);
            return None;
        };
        Some(self.navigate(NavigationRequest::new(target, true)).await)
    }

    /// Forward a display-refresh tick to the scroll controller
    pub fn tick(&self, time_ms: f64) {
        self.scroll.tick(time_ms);
    }

    pub async fn navigate(&self, request: NavigationRequest) -> NavigationOutcome {
        {
            let mut state = self.state.lock();
            if state.busy {
                let url = request.target.clone();
                if let Some(replaced) = state.pending_navigation.replace(request) {
                    tracing::debug!("Queued navigation to {} superseded", replaced.target);
                }
                drop(state);
                tracing::info!("Transition in progress, queued {}", url);
                self.emit(TransitionEvent::Queued { url });
                return NavigationOutcome::Queued;
            }
            state.busy = true;
        }
        let mut guard = BusyGuard {
            controller: self,
            released: false,
        };

        let outcome = self.run(request).await;

        loop {
            let next = {
                let mut state = self.state.lock();
                match state.pending_navigation.take() {
                    Some(next) => next,
                    None => {
                        state.busy = false;
                        guard.released = true;
                        break;
                    }
                }
            };
            let queued = self.run(next).await;
            tracing::debug!("Queued navigation finished: {:?}", queued);
        }

        outcome
    }

    async fn run(&self, request: NavigationRequest) -> NavigationOutcome {
        let location = self.location();
        if same_document(&request.target, &location) {
            tracing::debug!("Already at {}, ignoring navigation", request.target);
            return NavigationOutcome::Unchanged;
        }
        tracing::info!("Transition {} from {} to {}", request.id, location, request.target);

        self.scroll.scroll_to(0.0);
        self.scroll.stop();

        let previous = self.current_page();
        if let Some(ref page) = previous {
            page.hide().await;
            let id = page.id().to_string();
            self.emit(TransitionEvent::PageHidden { page: id.clone() });
            self.emit(TransitionEvent::PageDestroyed { page: id });
        }

        let document = match self.load(&request.target).await {
            Ok(document) => document,
            Err(e) => return self.roll_back(&request, previous, e).await,
        };
        let Some(container) = self.ctx.dom.query(&self.ctx.config.site.content_selector) else {
            let e = Error::MissingContainer(self.ctx.config.site.content_selector.clone());
            return self.roll_back(&request, previous, e).await;
        };

        if request.push_history {
            self.history.push_state(&request.target);
            self.emit(TransitionEvent::HistoryPushed {
                url: request.target.clone(),
            });
        }

        let dom = &self.ctx.dom;
        dom.set_inner_html(container, &document.content_html);
        dom.set_attribute(container, &self.ctx.config.site.template_attribute, &document.template);
        if let Some(ref title) = document.title {
            dom.set_title(title);
        }
        self.state.lock().location = request.target.clone();
        self.emit(TransitionEvent::ContentSwapped {
            template: document.template.clone(),
        });

        let page = self.registry.resolve(&document.template);
        self.state.lock().current_page = page.clone();
        match page {
            Some(page) => {
                page.create();
                self.emit(TransitionEvent::PageCreated {
                    page: page.id().to_string(),
                });
                page.show().await;
                self.emit(TransitionEvent::PageShown {
                    page: page.id().to_string(),
                });
            }
            None => tracing::warn!("No page registered for {}", document.template),
        }

        self.scroll.start();
        self.rebind_links();
        tracing::info!("Transition {} complete", request.id);

        NavigationOutcome::Completed {
            template: document.template,
        }
    }

    async fn load(&self, url: &Url) -> Result<ParsedDocument> {
        let document = self.fetcher.fetch(url).await?;
        if !document.is_ok() {
            return Err(Error::Status {
                status: document.status,
                url: url.to_string(),
            });
        }
        let site = &self.ctx.config.site;
        parse_document(&document.body, &site.content_selector, &site.template_attribute)
    }

    /// Restore the page that was showing before a failed transition
    async fn roll_back(
        &self,
        request: &NavigationRequest,
        previous: Option<Arc<dyn Page>>,
        error: Error,
    ) -> NavigationOutcome {
        let reason = error.to_string();
        tracing::warn!("Transition {} to {} failed: {}", request.id, request.target, reason);
        self.emit(TransitionEvent::Failed {
            url: request.target.clone(),
            reason: reason.clone(),
        });

        if !request.push_history {
            self.history.restore(&self.location());
        }
        if let Some(page) = previous {
            page.create();
            page.show().await;
        }
        self.scroll.start();
        self.rebind_links();

        NavigationOutcome::Failed { reason }
    }

    fn rebind_links(&self) {
        let location = self.location();
        self.links.rebind(self.ctx.dom.as_ref(), &location);
    }

    fn emit(&self, event: TransitionEvent) {
        if let Some(ref tx) = self.events {
            let _ = tx.send(event);
        }
    }
}

/// Releases the busy flag when a navigation future is dropped mid-transition
struct BusyGuard<'a> {
    controller: &'a TransitionController,
    /// Set once the drain loop has cleared `busy` itself
    released: bool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let dropped = {
            let mut state = self.controller.state.lock();
            state.busy = false;
            state.pending_navigation.take()
        };
        if let Some(request) = dropped {
            tracing::debug!("Dropped queued navigation to {}", request.target);
        }
        tracing::warn!("Transition abandoned before it finished");

        self.controller.scroll.start();
        self.controller.rebind_links();
    }
}

/// Same document, ignoring the fragment
fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dom::{Dom, MemoryDom};
    use crate::page::PageState;
    use crate::config::AppConfig;
    use crate::testing::{context, CountingAssets, ManualAssets, RecordingScroll, ScrollCall, StubFetcher};
    use crate::transition::SessionHistory;

    const HOME: &str = r#"<html><head><title>Home</title></head><body>
        <div class="preloader"><span class="preloader__progress"></span></div>
        <div class="content" data-template="home"><section class="page--home">
            <a class="to-about" href="/about">About</a>
            <a href="https://elsewhere.example/">Elsewhere</a>
            <a href="/brochure.pdf" download>Brochure</a>
            <a href="/blank" target="_blank">Blank</a>
            <a href="/plain" data-no-transition>Plain</a>
        </section></div>
    </body></html>"#;

    const ABOUT: &str = r#"<html><head><title>About</title></head><body>
        <div class="content" data-template="page.about"><section class="page--about">
            <a class="to-home" href="/">Home</a>
        </section></div>
    </body></html>"#;

    struct Harness {
        dom: Arc<MemoryDom>,
        fetcher: Arc<StubFetcher>,
        history: Arc<SessionHistory>,
        scroll: Arc<RecordingScroll>,
        controller: TransitionController,
        events: mpsc::UnboundedReceiver<TransitionEvent>,
    }

    impl Harness {
        async fn booted() -> Self {
            let harness = Self::new();
            let preloader = Preloader::new(&harness.controller.ctx, None);
            harness.controller.boot(&preloader).await;
            harness
        }

        fn new() -> Self {
            let dom = Arc::new(MemoryDom::parse(HOME));
            let ctx = context(dom.clone(), Arc::new(ManualAssets::instant()));
            let fetcher = Arc::new(
                StubFetcher::new()
                    .route("/", 200, HOME)
                    .route("/about", 200, ABOUT)
                    .route("/broken", 200, "<html><body><main>no container</main></body></html>"),
            );
            let base = Url::parse(&ctx.config.site.base_url).unwrap();
            let history = Arc::new(SessionHistory::new(base));
            let scroll = Arc::new(RecordingScroll::default());
            let registry = PageRegistry::with_defaults(&ctx);
            let (tx, events) = mpsc::unbounded_channel();

            let controller = TransitionController::new(
                ctx,
                registry,
                fetcher.clone(),
                history.clone(),
                scroll.clone(),
            )
            .with_event_sender(tx);

            Self {
                dom,
                fetcher,
                history,
                scroll,
                controller,
                events,
            }
        }

        fn drain(&mut self) -> Vec<TransitionEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                events.push(event);
            }
            events
        }

        fn template(&self) -> Option<String> {
            let content = self.dom.query(".content")?;
            self.dom.attribute(content, "data-template")
        }
    }

    fn page(id: &str) -> String {
        id.to_string()
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_shows_current_page_after_preloader() {
        let mut h = Harness::booted().await;

        assert_eq!(
            h.drain(),
            vec![
                TransitionEvent::PageCreated { page: page("home") },
                TransitionEvent::PageShown { page: page("home") },
            ]
        );
        assert!(h.dom.query(".preloader").is_none());
        assert_eq!(h.controller.current_page().unwrap().state(), PageState::Shown);

        let calls = h.scroll.calls();
        assert_eq!(calls.first(), Some(&ScrollCall::Stop));
        assert_eq!(calls.last(), Some(&ScrollCall::Start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_loads_each_asset_once() {
        let dom = Arc::new(MemoryDom::parse(
            r#"<div class="preloader"><span class="preloader__progress"></span></div>
            <div class="content" data-template="home"><section class="page--home">
                <img data-src="/a.jpg"><img data-src="/b.jpg">
            </section></div>"#,
        ));
        let assets = Arc::new(CountingAssets::new());
        let ctx = AppContext::new(Arc::new(AppConfig::default()), dom.clone(), assets.clone());
        let base = Url::parse(&ctx.config.site.base_url).unwrap();
        let controller = TransitionController::new(
            ctx.clone(),
            PageRegistry::with_defaults(&ctx),
            Arc::new(StubFetcher::new()),
            Arc::new(SessionHistory::new(base)),
            Arc::new(RecordingScroll::default()),
        );

        let preloader = Preloader::new(&ctx, None);
        controller.boot(&preloader).await;

        // The page and the preloader both wait on every image
        assert_eq!(assets.waits(), 4);
        assert_eq!(assets.fetches("/a.jpg"), 1);
        assert_eq!(assets.fetches("/b.jpg"), 1);
        for img in dom.query_all("img") {
            assert!(dom.has_class(img, "loaded"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_to_about_event_order() {
        let mut h = Harness::booted().await;
        h.drain();
        h.scroll.clear();

        let outcome = h.controller.navigate_to("/about").await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Completed {
                template: "page.about".to_string()
            }
        );

        let about = Url::parse("http://localhost:3000/about").unwrap();
        assert_eq!(
            h.drain(),
            vec![
                TransitionEvent::PageHidden { page: page("home") },
                TransitionEvent::PageDestroyed { page: page("home") },
                TransitionEvent::HistoryPushed { url: about.clone() },
                TransitionEvent::ContentSwapped {
                    template: "page.about".to_string()
                },
                TransitionEvent::PageCreated { page: page("page.about") },
                TransitionEvent::PageShown { page: page("page.about") },
            ]
        );

        assert_eq!(h.template().as_deref(), Some("page.about"));
        assert_eq!(h.dom.title(), "About");
        assert_eq!(h.controller.location(), about);
        assert_eq!(h.history.len(), 2);
        assert!(!h.controller.is_busy());
        assert_eq!(
            h.scroll.calls(),
            vec![ScrollCall::ScrollTo(0.0), ScrollCall::Stop, ScrollCall::Start]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_rolls_back() {
        let mut h = Harness::booted().await;
        h.drain();

        let outcome = h.controller.navigate_to("/missing").await.unwrap();
        assert!(matches!(outcome, NavigationOutcome::Failed { .. }));
        assert!(!h.controller.is_busy());
        assert_eq!(h.history.len(), 1);
        assert_eq!(h.template().as_deref(), Some("home"));
        assert_eq!(h.controller.location().path(), "/");

        let home = h.controller.current_page().unwrap();
        assert_eq!(home.id(), "home");
        assert_eq!(home.state(), PageState::Shown);
        assert!(h.scroll.is_running());

        let events = h.drain();
        assert!(events
            .iter()
            .any(|e| matches!(e, TransitionEvent::Failed { url, .. } if url.path() == "/missing")));
        assert!(!events
            .iter()
            .any(|e| matches!(e, TransitionEvent::HistoryPushed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_container_rolls_back() {
        let h = Harness::booted().await;

        let outcome = h.controller.navigate_to("/broken").await.unwrap();
        assert!(matches!(outcome, NavigationOutcome::Failed { .. }));
        assert_eq!(h.history.len(), 1);
        assert_eq!(h.template().as_deref(), Some("home"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_location_is_unchanged() {
        let h = Harness::booted().await;

        let outcome = h.controller.navigate_to("/#top").await.unwrap();
        assert_eq!(outcome, NavigationOutcome::Unchanged);
        assert!(h.fetcher.requests().is_empty());
        assert!(!h.controller.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_while_busy_is_queued_latest_wins() {
        let mut h = Harness::booted().await;
        h.drain();
        let base = h.controller.location();
        let about = base.join("/about").unwrap();
        let missing = base.join("/missing").unwrap();

        let controller = &h.controller;
        let (first, second, third) = tokio::join!(
            controller.navigate(NavigationRequest::new(about.clone(), true)),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                controller.navigate(NavigationRequest::new(missing.clone(), true)).await
            },
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                controller.navigate(NavigationRequest::new(base.clone(), true)).await
            },
        );

        assert_eq!(
            first,
            NavigationOutcome::Completed {
                template: "page.about".to_string()
            }
        );
        assert_eq!(second, NavigationOutcome::Queued);
        assert_eq!(third, NavigationOutcome::Queued);

        // The superseded request never ran
        let paths: Vec<String> = h.fetcher.requests().iter().map(|u| u.path().to_string()).collect();
        assert_eq!(paths, vec!["/about", "/"]);
        assert_eq!(h.template().as_deref(), Some("home"));
        assert!(!h.controller.is_busy());

        let queued = h
            .drain()
            .into_iter()
            .filter(|e| matches!(e, TransitionEvent::Queued { .. }))
            .count();
        assert_eq!(queued, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_links_are_rebound_after_swap() {
        let h = Harness::booted().await;

        let to_about = h.dom.query(".to-about").unwrap();
        assert_eq!(h.controller.links().bound().len(), 1);

        let outcome = h.controller.activate_link(to_about).await;
        assert!(matches!(outcome, Some(NavigationOutcome::Completed { .. })));

        // The old link is gone with the old content
        assert!(h.controller.activate_link(to_about).await.is_none());

        let to_home = h.dom.query(".to-home").unwrap();
        let outcome = h.controller.activate_link(to_home).await;
        assert_eq!(
            outcome,
            Some(NavigationOutcome::Completed {
                template: "home".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_state_does_not_push() {
        let mut h = Harness::booted().await;
        h.controller.navigate_to("/about").await.unwrap();
        h.drain();

        let back = h.history.back().unwrap();
        let outcome = h.controller.pop_state(back).await;
        assert_eq!(
            outcome,
            NavigationOutcome::Completed {
                template: "home".to_string()
            }
        );
        assert_eq!(h.history.len(), 2);
        assert!(!h
            .drain()
            .iter()
            .any(|e| matches!(e, TransitionEvent::HistoryPushed { .. })));

        let forward = h.history.forward().unwrap();
        h.controller.pop_state(forward).await;
        assert_eq!(h.template().as_deref(), Some("page.about"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_pop_state_restores_history_cursor() {
        let h = Harness::booted().await;
        h.controller.navigate_to("/about").await.unwrap();
        h.fetcher.add_route("/", 500, "<html><body>Server error</body></html>");

        let back = h.history.back().unwrap();
        let outcome = h.controller.pop_state(back).await;
        assert!(matches!(outcome, NavigationOutcome::Failed { .. }));

        assert_eq!(h.history.current_url(), h.controller.location());
        assert_eq!(h.controller.location().path(), "/about");
        assert_eq!(h.history.len(), 2);
        assert_eq!(h.template().as_deref(), Some("page.about"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_template_uses_fallback() {
        let mut h = Harness::new();
        h.fetcher.add_route(
            "/lab",
            200,
            r#"<div class="content" data-template="page.lab"><section class="page--home"></section></div>"#,
        );
        let preloader = Preloader::new(&h.controller.ctx, None);
        h.controller.boot(&preloader).await;
        h.drain();

        let outcome = h.controller.navigate_to("/lab").await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Completed {
                template: "page.lab".to_string()
            }
        );
        assert_eq!(h.controller.current_page().unwrap().id(), "home");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_navigation_releases_busy() {
        let mut h = Harness::booted().await;
        h.drain();

        // Cut the transition off while the outgoing page is still hiding
        let cut = tokio::time::timeout(Duration::from_millis(100), h.controller.navigate_to("/about")).await;
        assert!(cut.is_err());
        assert!(!h.controller.is_busy());
        assert!(h.scroll.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let outcome = h.controller.navigate_to("/about").await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Completed {
                template: "page.about".to_string()
            }
        );
        assert_eq!(h.template().as_deref(), Some("page.about"));
        assert!(!h.controller.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_navigation_discards_queue() {
        let h = Harness::booted().await;
        let controller = &h.controller;
        let missing = controller.location().join("/missing").unwrap();

        let (cut, queued) = tokio::join!(
            tokio::time::timeout(Duration::from_millis(100), controller.navigate_to("/about")),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                controller.navigate(NavigationRequest::new(missing.clone(), true)).await
            },
        );
        assert!(cut.is_err());
        assert_eq!(queued, NavigationOutcome::Queued);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!h.controller.is_busy());
        assert!(h.fetcher.requests().is_empty());
        assert_eq!(h.template().as_deref(), Some("home"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_forwards_to_scroll() {
        let h = Harness::new();
        h.controller.tick(16.0);
        assert_eq!(h.scroll.calls(), vec![ScrollCall::Tick(16.0)]);
    }
}
