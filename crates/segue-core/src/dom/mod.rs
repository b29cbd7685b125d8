//! DOM boundary
//!
//! The engine never touches a browser directly. Everything it needs from the
//! document (selector lookups, attribute and class changes, the handful of
//! style writes, markup replacement) goes through [`Dom`].

mod memory;

pub use memory::MemoryDom;

use std::fmt;

/// Handle to an element owned by a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Document operations used by the preloader, pages and transitions
///
/// Writes to unknown elements are ignored. An invalid selector
/// matches nothing.
pub trait Dom: Send + Sync {
    /// All attached elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// First attached element matching `selector`
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Whether the element is still reachable from the document root
    fn is_attached(&self, element: ElementId) -> bool;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&self, element: ElementId, name: &str, value: &str);

    fn add_class(&self, element: ElementId, class: &str);

    fn remove_class(&self, element: ElementId, class: &str);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Write an inline style property (`transform`, `visibility`, `--progress`)
    fn set_style(&self, element: ElementId, property: &str, value: &str);

    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Replace the element's children with a single text node
    fn set_text(&self, element: ElementId, text: &str);

    /// Concatenated text content
    fn text(&self, element: ElementId) -> String;

    /// Replace the element's children with parsed markup
    fn set_inner_html(&self, element: ElementId, markup: &str);

    fn inner_html(&self, element: ElementId) -> String;

    /// Detach the element from its parent
    fn remove(&self, element: ElementId);

    /// Height of the layout viewport in pixels
    fn viewport_height(&self) -> f64;

    fn title(&self) -> String {
        self.query("title").map(|t| self.text(t)).unwrap_or_default()
    }

    fn set_title(&self, title: &str) {
        if let Some(element) = self.query("title") {
            self.set_text(element, title);
        }
    }
}
