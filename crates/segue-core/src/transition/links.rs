use std::collections::HashMap;

use parking_lot::Mutex;
use url::Url;

use crate::dom::{Dom, ElementId};

const OPT_OUT_ATTRIBUTE: &str = "data-no-transition";

/// Tracks which links in the live document are handled in-app
///
/// Only links captured by the latest [`LinkInterceptor::rebind`] are honored;
/// anything bound before a content swap is dropped.
#[derive(Debug)]
pub struct LinkInterceptor {
    selector: String,
    bound: Mutex<HashMap<ElementId, Url>>,
}

impl LinkInterceptor {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            bound: Mutex::new(HashMap::new()),
        }
    }

    /// Capture eligible links, resolving their targets against `location`
    pub fn rebind(&self, dom: &dyn Dom, location: &Url) -> usize {
        let links: HashMap<ElementId, Url> = dom
            .query_all(&self.selector)
            .into_iter()
            .filter_map(|element| eligible_target(dom, element, location).map(|url| (element, url)))
            .collect();

        let count = links.len();
        *self.bound.lock() = links;
        tracing::debug!("Bound {} links", count);
        count
    }

    /// Navigation target of a bound link
    pub fn target(&self, element: ElementId) -> Option<Url> {
        self.bound.lock().get(&element).cloned()
    }

    /// Bound links in document order
    pub fn bound(&self) -> Vec<(ElementId, Url)> {
        let mut links: Vec<(ElementId, Url)> = self
            .bound
            .lock()
            .iter()
            .map(|(element, url)| (*element, url.clone()))
            .collect();
        links.sort_by_key(|(element, _)| *element);
        links
    }
}

fn eligible_target(dom: &dyn Dom, element: ElementId, location: &Url) -> Option<Url> {
    let href = dom.attribute(element, "href")?;
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if dom.attribute(element, "target").is_some()
        || dom.attribute(element, "download").is_some()
        || dom.attribute(element, OPT_OUT_ATTRIBUTE).is_some()
    {
        return None;
    }

    let url = location.join(&href).ok()?;
    if url.origin() != location.origin() {
        return None;
    }
    Some(url)
}
