use parking_lot::Mutex;
use url::Url;

/// Session history as seen by the transition controller
pub trait History: Send + Sync {
    /// Add an entry for `url` and make it current
    fn push_state(&self, url: &Url);

    fn current_url(&self) -> Url;

    /// Move the cursor back onto the entry for `url` closest to it
    ///
    /// Used when a replayed entry fails to load and the document stays put.
    fn restore(&self, url: &Url);
}

#[derive(Debug)]
struct Entries {
    urls: Vec<Url>,
    index: usize,
}

/// In-memory back/forward stack
///
/// `back` and `forward` only move the cursor; feed the returned URL to
/// `TransitionController::pop_state` to play the navigation.
#[derive(Debug)]
pub struct SessionHistory {
    entries: Mutex<Entries>,
}

impl SessionHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: Mutex::new(Entries {
                urls: vec![initial],
                index: 0,
            }),
        }
    }

    pub fn back(&self) -> Option<Url> {
        let mut entries = self.entries.lock();
        if entries.index == 0 {
            return None;
        }
        entries.index -= 1;
        Some(entries.urls[entries.index].clone())
    }

    pub fn forward(&self) -> Option<Url> {
        let mut entries = self.entries.lock();
        if entries.index + 1 >= entries.urls.len() {
            return None;
        }
        entries.index += 1;
        Some(entries.urls[entries.index].clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<Url> {
        self.entries.lock().urls.clone()
    }
}

impl History for SessionHistory {
    fn push_state(&self, url: &Url) {
        let mut entries = self.entries.lock();
        let keep = entries.index + 1;
        entries.urls.truncate(keep);
        entries.urls.push(url.clone());
        entries.index = entries.urls.len() - 1;
    }

    fn current_url(&self) -> Url {
        let entries = self.entries.lock();
        entries.urls[entries.index].clone()
    }

    fn restore(&self, url: &Url) {
        let mut entries = self.entries.lock();
        let cursor = entries.index;
        let closest = entries
            .urls
            .iter()
            .enumerate()
            .filter(|(_, entry)| *entry == url)
            .min_by_key(|(i, _)| i.abs_diff(cursor))
            .map(|(i, _)| i);
        match closest {
            Some(index) => entries.index = index,
            None => tracing::debug!("No history entry for {}", url),
        }
    }
}
