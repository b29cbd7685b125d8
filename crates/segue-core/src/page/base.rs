use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::PageState;
use crate::config::PageConfig;
use crate::context::AppContext;
use crate::dom::{Dom, ElementId};
use crate::preloader::AssetLoader;

/// Name of the implicit child holding lazily loaded images
pub const ASYNC_IMAGES: &str = "async_images";
const ASYNC_IMAGES_SELECTOR: &str = "[data-src]";
const DEFERRED_ATTRIBUTE: &str = "data-src";

/// How a page declares one of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildSelector {
    /// Already-resolved element, stored as is
    Element(ElementId),
    /// Already-resolved list, stored as is
    Elements(Vec<ElementId>),
    /// Selector resolved on every `create()`
    Query(String),
}

impl From<&str> for ChildSelector {
    fn from(selector: &str) -> Self {
        ChildSelector::Query(selector.to_string())
    }
}

impl From<ElementId> for ChildSelector {
    fn from(element: ElementId) -> Self {
        ChildSelector::Element(element)
    }
}

impl From<Vec<ElementId>> for ChildSelector {
    fn from(elements: Vec<ElementId>) -> Self {
        ChildSelector::Elements(elements)
    }
}

/// Outcome of resolving a child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Absent,
    One(ElementId),
    Many(Vec<ElementId>),
}

impl Resolved {
    fn from_matches(mut matches: Vec<ElementId>) -> Self {
        match matches.len() {
            0 => Resolved::Absent,
            1 => Resolved::One(matches.remove(0)),
            _ => Resolved::Many(matches),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    pub fn first(&self) -> Option<ElementId> {
        match self {
            Resolved::Absent => None,
            Resolved::One(element) => Some(*element),
            Resolved::Many(elements) => elements.first().copied(),
        }
    }

    pub fn all(&self) -> Vec<ElementId> {
        match self {
            Resolved::Absent => Vec::new(),
            Resolved::One(element) => vec![*element],
            Resolved::Many(elements) => elements.clone(),
        }
    }
}

/// Background load of one `[data-src]` element
///
/// Copies the deferred source into `src`, waits for it, then marks the
/// element `loaded`.
#[derive(Debug)]
pub struct AsyncLoad {
    element: ElementId,
    handle: JoinHandle<()>,
}

impl AsyncLoad {
    /// Start loading; `None` when the element has no deferred source
    pub fn spawn(dom: Arc<dyn Dom>, assets: Arc<dyn AssetLoader>, element: ElementId) -> Option<Self> {
        let src = dom.attribute(element, DEFERRED_ATTRIBUTE)?;
        let handle = tokio::spawn(async move {
            dom.set_attribute(element, "src", &src);
            if !assets.is_complete(element, &src) {
                if let Err(e) = assets.wait_loaded(element, &src).await {
                    tracing::warn!("Lazy image {} ({}) failed to load: {}", element, src, e);
                    return;
                }
            }
            dom.add_class(element, "loaded");
        });
        Some(Self { element, handle })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

#[derive(Debug)]
struct PageInner {
    state: PageState,
    root: Option<ElementId>,
    elements: HashMap<String, Resolved>,
    loads: Vec<AsyncLoad>,
}

/// Lifecycle machinery shared by every page type
pub struct PageBase {
    id: String,
    root_selector: String,
    children: Vec<(String, ChildSelector)>,
    dom: Arc<dyn Dom>,
    assets: Arc<dyn AssetLoader>,
    config: PageConfig,
    inner: Mutex<PageInner>,
}

impl PageBase {
    pub fn new(ctx: &AppContext, id: &str, root_selector: &str) -> Self {
        Self {
            id: id.to_string(),
            root_selector: root_selector.to_string(),
            children: vec![(ASYNC_IMAGES.to_string(), ASYNC_IMAGES_SELECTOR.into())],
            dom: Arc::clone(&ctx.dom),
            assets: Arc::clone(&ctx.assets),
            config: ctx.config.page.clone(),
            inner: Mutex::new(PageInner {
                state: PageState::Uninitialized,
                root: None,
                elements: HashMap::new(),
                loads: Vec::new(),
            }),
        }
    }

    /// Declare a named child; a later declaration of the same name wins
    pub fn with_child(mut self, name: &str, selector: impl Into<ChildSelector>) -> Self {
        self.children.retain(|(existing, _)| existing != name);
        self.children.push((name.to_string(), selector.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root_selector(&self) -> &str {
        &self.root_selector
    }

    pub fn state(&self) -> PageState {
        self.inner.lock().state
    }

    pub fn root(&self) -> Option<ElementId> {
        self.inner.lock().root
    }

    /// Resolved child by name, available after `create()`
    pub fn element(&self, name: &str) -> Option<Resolved> {
        self.inner.lock().elements.get(name).cloned()
    }

    /// Lazy image loads started by the last `create()`
    pub fn pending_loads(&self) -> usize {
        self.inner.lock().loads.iter().filter(|l| !l.is_finished()).count()
    }

    /// Resolve the root and children against the live document
    ///
    /// Calling this on a hidden or destroyed page starts it over.
    pub fn create(&self) {
        let root = self.dom.query(&self.root_selector);
        if root.is_none() {
            tracing::warn!("Page {}: root {} not found", self.id, self.root_selector);
        }

        let elements: HashMap<String, Resolved> = self
            .children
            .iter()
            .map(|(name, selector)| {
                let resolved = match selector {
                    ChildSelector::Element(element) => Resolved::One(*element),
                    ChildSelector::Elements(elements) => Resolved::Many(elements.clone()),
                    ChildSelector::Query(query) => Resolved::from_matches(self.dom.query_all(query)),
                };
                (name.clone(), resolved)
            })
            .collect();

        let loads: Vec<AsyncLoad> = elements
            .get(ASYNC_IMAGES)
            .map(Resolved::all)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|element| {
                AsyncLoad::spawn(Arc::clone(&self.dom), Arc::clone(&self.assets), element)
            })
            .collect();

        let mut inner = self.inner.lock();
        for load in inner.loads.drain(..) {
            load.abort();
        }
        if inner.state != PageState::Uninitialized {
            tracing::debug!("Page {} restarted from {:?}", self.id, inner.state);
        }
        tracing::debug!("Page {} resolved {} children, {} lazy images", self.id, elements.len(), loads.len());
        inner.root = root;
        inner.elements = elements;
        inner.loads = loads;
        inner.state = PageState::Created;
    }

    /// Fade in; resolves once the enter animation has settled
    pub async fn show(&self) {
        match self.root() {
            Some(root) => {
                self.dom.add_class(root, &self.config.visible_class);
                tokio::time::sleep(self.settle_time()).await;
            }
            None => tracing::debug!("Page {} has no root, showing immediately", self.id),
        }
        self.inner.lock().state = PageState::Shown;
        tracing::info!("Page {} shown", self.id);
    }

    /// Fade out, then destroy
    pub async fn hide(&self) {
        match self.root() {
            Some(root) => {
                self.dom.remove_class(root, &self.config.visible_class);
                tokio::time::sleep(self.settle_time()).await;
            }
            None => tracing::debug!("Page {} has no root, hiding immediately", self.id),
        }
        self.inner.lock().state = PageState::Hidden;
        tracing::info!("Page {} hidden", self.id);
        self.destroy();
    }

    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        for load in inner.loads.drain(..) {
            load.abort();
        }
        if inner.state != PageState::Destroyed {
            inner.state = PageState::Destroyed;
            tracing::debug!("Page {} destroyed", self.id);
        }
    }

    fn settle_time(&self) -> Duration {
        Duration::from_millis(self.config.show_delay_ms + self.config.fade_ms)
    }
}

impl std::fmt::Debug for PageBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageBase")
            .field("id", &self.id)
            .field("root_selector", &self.root_selector)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
