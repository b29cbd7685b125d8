//! Page lifecycle
//!
//! A page owns one screen's subtree and moves through
//! create -> show -> hide -> destroy. Route-specific pages compose
//! [`PageBase`] and implement [`Page`]; the transition controller looks them
//! up by id in a [`PageRegistry`].

mod about;
mod base;
mod home;

pub use about::AboutPage;
pub use base::{AsyncLoad, ChildSelector, PageBase, Resolved, ASYNC_IMAGES};
pub use home::HomePage;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::AppContext;

/// Where a page is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Created,
    Shown,
    Hidden,
    Destroyed,
}

/// A routable screen
///
/// Every operation has a default that delegates to [`Page::base`]; page
/// types override only what they add.
#[async_trait]
pub trait Page: Send + Sync {
    fn base(&self) -> &PageBase;

    fn id(&self) -> &str {
        self.base().id()
    }

    fn state(&self) -> PageState {
        self.base().state()
    }

    fn create(&self) {
        self.base().create();
    }

    async fn show(&self) {
        self.base().show().await;
    }

    async fn hide(&self) {
        self.base().hide().await;
    }

    fn destroy(&self) {
        self.base().destroy();
    }
}

/// Page instances keyed by id, with a fallback for unknown ids
pub struct PageRegistry {
    pages: HashMap<String, Arc<dyn Page>>,
    fallback: String,
}

impl PageRegistry {
    pub fn new(fallback: &str) -> Self {
        Self {
            pages: HashMap::new(),
            fallback: fallback.to_string(),
        }
    }

    /// Registry with the bundled page types
    pub fn with_defaults(ctx: &AppContext) -> Self {
        let mut registry = Self::new(&ctx.config.site.fallback_template);
        registry.register(Arc::new(HomePage::new(ctx)));
        registry.register(Arc::new(AboutPage::new(ctx)));
        registry
    }

    pub fn register(&mut self, page: Arc<dyn Page>) {
        self.pages.insert(page.id().to_string(), page);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Page>> {
        self.pages.get(id).cloned()
    }

    /// Page for `id`, or the fallback page when `id` is unknown
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn Page>> {
        if let Some(page) = self.get(id) {
            return Some(page);
        }
        tracing::warn!("Unknown page type {:?}, using {:?}", id, self.fallback);
        self.get(&self.fallback)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
