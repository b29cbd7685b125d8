pub mod curve;
pub mod pose;
pub mod preload;
pub mod visit;

use std::sync::Arc;

use anyhow::{bail, Result};

use segue_core::dom::MemoryDom;
use segue_core::preloader::HttpAssetLoader;
use segue_core::transition::{DocumentFetcher, HttpFetcher};
use segue_core::{AppConfig, AppContext};
use url::Url;

/// A fetched page loaded into an in-memory document
pub struct OpenPage {
    pub url: Url,
    pub dom: Arc<MemoryDom>,
    pub ctx: AppContext,
}

/// Fetch `url` and build a context whose assets resolve against it
pub async fn open_page(config: Arc<AppConfig>, fetcher: &HttpFetcher, url: &str) -> Result<OpenPage> {
    let url = Url::parse(url)?;
    println!("Fetching {}", url);

    let document = fetcher.fetch(&url).await?;
    if !document.is_ok() {
        bail!("{} returned HTTP {}", url, document.status);
    }

    let dom = Arc::new(MemoryDom::parse(&document.body));
    let assets = Arc::new(HttpAssetLoader::new(&config.http, document.url.clone())?);
    let ctx = AppContext::new(config, dom.clone(), assets);

    Ok(OpenPage {
        url: document.url,
        dom,
        ctx,
    })
}
