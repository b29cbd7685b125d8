use async_trait::async_trait;

use super::{Page, PageBase};
use crate::context::AppContext;

/// Landing page
#[derive(Debug)]
pub struct HomePage {
    base: PageBase,
}

impl HomePage {
    pub const ID: &'static str = "home";

    pub fn new(ctx: &AppContext) -> Self {
        Self {
            base: PageBase::new(ctx, Self::ID, ".page--home"),
        }
    }
}

#[async_trait]
impl Page for HomePage {
    fn base(&self) -> &PageBase {
        &self.base
    }

    fn create(&self) {
        self.base.create();
        tracing::info!("{} page created", self.base.id());
    }
}
