use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::watch;
use url::Url;

use crate::config::HttpConfig;
use crate::dom::ElementId;
use crate::transition::fetcher::{build_client, ensure_content_size, fetch_with_retry};
use crate::{Error, Result};

/// Loads the source behind an image-like element
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Whether `src` is already available without waiting
    fn is_complete(&self, element: ElementId, src: &str) -> bool;

    /// Resolve once `src` has finished loading
    async fn wait_loaded(&self, element: ElementId, src: &str) -> Result<()>;
}

#[derive(Debug)]
enum Slot {
    /// Carries `Some(succeeded)` once the leading fetch ends
    Loading(watch::Receiver<Option<bool>>),
    Loaded,
}

enum Entry {
    Done,
    Join(watch::Receiver<Option<bool>>),
    Lead(watch::Sender<Option<bool>>),
}

/// Coalesces concurrent loads of the same URL into one fetch
///
/// The first caller for a URL runs the fetch; callers arriving while it is
/// in flight wait for its result. Failed loads are forgotten so a later
/// caller retries.
#[derive(Debug, Default)]
pub(crate) struct LoadRegistry {
    slots: Mutex<HashMap<Url, Slot>>,
}

impl LoadRegistry {
    pub(crate) fn is_loaded(&self, url: &Url) -> bool {
        matches!(self.slots.lock().get(url), Some(Slot::Loaded))
    }

    pub(crate) async fn load<F, Fut>(&self, url: &Url, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        match self.enter(url) {
            Entry::Done => Ok(()),
            Entry::Lead(tx) => self.lead(url, tx, fetch).await,
            Entry::Join(mut rx) => {
                tracing::debug!("Joining in-flight load of {}", url);
                let succeeded = rx
                    .wait_for(Option::is_some)
                    .await
                    .map(|outcome| *outcome == Some(true))
                    .unwrap_or(false);
                if succeeded {
                    Ok(())
                } else {
                    Err(Error::Other(format!("Shared load of {} failed", url)))
                }
            }
        }
    }

    fn enter(&self, url: &Url) -> Entry {
        let mut slots = self.slots.lock();
        let entry = match slots.get(url) {
            Some(Slot::Loaded) => Entry::Done,
            Some(Slot::Loading(rx)) => Entry::Join(rx.clone()),
            None => {
                let (tx, rx) = watch::channel(None);
                slots.insert(url.clone(), Slot::Loading(rx));
                Entry::Lead(tx)
            }
        };
        entry
    }

    async fn lead<F, Fut>(&self, url: &Url, tx: watch::Sender<Option<bool>>, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut lead = Lead {
            registry: self,
            url,
            finished: false,
        };
        let result = fetch().await;

        {
            let mut slots = self.slots.lock();
            if result.is_ok() {
                slots.insert(url.clone(), Slot::Loaded);
            } else {
                slots.remove(url);
            }
        }
        lead.finished = true;
        tx.send_replace(Some(result.is_ok()));
        result
    }
}

/// Clears the slot of a leading fetch whose future was dropped
struct Lead<'a> {
    registry: &'a LoadRegistry,
    url: &'a Url,
    finished: bool,
}

impl Drop for Lead<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.registry.slots.lock().remove(self.url);
        }
    }
}

/// Fetches asset sources over HTTP, remembering what already arrived
pub struct HttpAssetLoader {
    client: Client,
    base: Url,
    max_bytes: usize,
    loads: LoadRegistry,
}

impl HttpAssetLoader {
    /// `base` is the document URL relative sources resolve against
    pub fn new(config: &HttpConfig, base: Url) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base,
            max_bytes: config.max_document_bytes,
            loads: LoadRegistry::default(),
        })
    }

    fn resolve(&self, src: &str) -> Result<Url> {
        Ok(self.base.join(src)?)
    }

    async fn fetch(&self, element: ElementId, url: &Url) -> Result<()> {
        let (status, _, body) = fetch_with_retry(&self.client, url).await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        ensure_content_size(body.len(), self.max_bytes, url)?;

        tracing::debug!("Asset {} loaded for {} ({} bytes)", url, element, body.len());
        Ok(())
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    fn is_complete(&self, _element: ElementId, src: &str) -> bool {
        match self.resolve(src) {
            Ok(url) => self.loads.is_loaded(&url),
            Err(_) => false,
        }
    }

    async fn wait_loaded(&self, element: ElementId, src: &str) -> Result<()> {
        let url = self.resolve(src)?;
        let target = &url;
        self.loads.load(target, move || self.fetch(element, target)).await
    }
}
