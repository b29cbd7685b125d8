use async_trait::async_trait;

use super::{Page, PageBase};
use crate::context::AppContext;

/// About page
#[derive(Debug)]
pub struct AboutPage {
    base: PageBase,
}

impl AboutPage {
    pub const ID: &'static str = "page.about";

    pub fn new(ctx: &AppContext) -> Self {
        Self {
            base: PageBase::new(ctx, Self::ID, ".page--about"),
        }
    }
}

#[async_trait]
impl Page for AboutPage {
    fn base(&self) -> &PageBase {
        &self.base
    }

    fn create(&self) {
        self.base.create();
        tracing::info!("{} page created", self.base.id());
    }
}
