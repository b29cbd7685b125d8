//! In-memory document used for headless runs and tests
//!
//! Markup is parsed with `scraper` into an arena of nodes. Selector matching
//! re-renders the attached tree with a node marker on every element and lets
//! `scraper` evaluate the selector against it, so any selector the browser
//! would accept here behaves the same way.

use ego_tree::NodeRef;
use parking_lot::Mutex;
use scraper::{Html, Node as HtmlNode, Selector};

use super::{Dom, ElementId};

/// Attribute carrying the arena index during selector matching
const NODE_MARKER: &str = "data-segue-node";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const DEFAULT_VIEWPORT_HEIGHT: f64 = 900.0;

#[derive(Debug)]
enum NodeKind {
    Document,
    Doctype,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        style: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    fn push(&mut self, kind: NodeKind, parent: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    fn import(&mut self, source: NodeRef<'_, HtmlNode>, parent: usize) {
        match source.value() {
            HtmlNode::Element(element) => {
                let attrs = element
                    .attrs()
                    .filter(|(name, _)| *name != NODE_MARKER)
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                let id = self.push(
                    NodeKind::Element {
                        tag: element.name().to_string(),
                        attrs,
                        style: Vec::new(),
                    },
                    parent,
                );
                for child in source.children() {
                    self.import(child, id);
                }
            }
            HtmlNode::Text(text) => {
                self.push(NodeKind::Text((**text).to_string()), parent);
            }
            HtmlNode::Doctype(_) => {
                self.push(NodeKind::Doctype, parent);
            }
            HtmlNode::Document | HtmlNode::Fragment => {
                for child in source.children() {
                    self.import(child, parent);
                }
            }
            _ => {}
        }
    }

    fn element(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.0)
            .filter(|node| matches!(node.kind, NodeKind::Element { .. }))
    }

    fn attrs_mut(&mut self, id: ElementId) -> Option<&mut Vec<(String, String)>> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element { attrs, .. }) => Some(attrs),
            _ => None,
        }
    }

    fn style_mut(&mut self, id: ElementId) -> Option<&mut Vec<(String, String)>> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element { style, .. }) => Some(style),
            _ => None,
        }
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        match self.element(id).map(|node| &node.kind) {
            Some(NodeKind::Element { attrs, .. }) => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    fn is_attached(&self, id: usize) -> bool {
        let mut current = id;
        loop {
            match self.nodes.get(current) {
                Some(node) => match node.parent {
                    Some(parent) => current = parent,
                    None => return current == 0,
                },
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: usize) {
        if let Some(parent) = self.nodes.get(id).and_then(|node| node.parent) {
            self.nodes[parent].children.retain(|child| *child != id);
            self.nodes[id].parent = None;
        }
    }

    fn clear_children(&mut self, id: usize) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.nodes[child].parent = None;
        }
    }

    fn text(&self, id: usize, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                for child in &self.nodes[id].children {
                    self.text(*child, out);
                }
            }
        }
    }

    fn render(&self, id: usize, markers: bool, out: &mut String) {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Document => self.render_children(id, markers, out),
            NodeKind::Doctype => out.push_str("<!DOCTYPE html>"),
            NodeKind::Text(text) => escape_into(text, false, out),
            NodeKind::Element { tag, attrs, style } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs.iter().filter(|(name, _)| name != "style") {
                    push_attr(name, value, out);
                }
                let inline = merged_style(attrs, style);
                if !inline.is_empty() {
                    push_attr("style", &inline, out);
                }
                if markers {
                    push_attr(NODE_MARKER, &id.to_string(), out);
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                self.render_children(id, markers, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn render_children(&self, id: usize, markers: bool, out: &mut String) {
        for child in &self.nodes[id].children {
            self.render(*child, markers, out);
        }
    }
}

fn merged_style(attrs: &[(String, String)], style: &[(String, String)]) -> String {
    let mut inline = attrs
        .iter()
        .find(|(name, _)| name == "style")
        .map(|(_, value)| value.trim().trim_end_matches(';').to_string())
        .unwrap_or_default();
    for (property, value) in style {
        if !inline.is_empty() {
            inline.push_str("; ");
        }
        inline.push_str(property);
        inline.push_str(": ");
        inline.push_str(value);
    }
    inline
}

fn push_attr(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Arena-backed [`Dom`] built from HTML markup
#[derive(Debug)]
pub struct MemoryDom {
    tree: Mutex<Tree>,
    viewport_height: f64,
}

impl MemoryDom {
    /// Parse a full HTML document
    pub fn parse(markup: &str) -> Self {
        let document = Html::parse_document(markup);
        let mut tree = Tree::new();
        tree.import(document.tree.root(), 0);
        Self {
            tree: Mutex::new(tree),
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    /// Serialize the attached document
    pub fn to_html(&self) -> String {
        let tree = self.tree.lock();
        let mut out = String::new();
        tree.render(0, false, &mut out);
        out
    }
}

impl Dom for MemoryDom {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid selector {:?}: {:?}", selector, e);
                return Vec::new();
            }
        };

        let markup = {
            let tree = self.tree.lock();
            let mut out = String::new();
            tree.render(0, true, &mut out);
            out
        };

        Html::parse_document(&markup)
            .select(&parsed)
            .filter_map(|element| element.value().attr(NODE_MARKER))
            .filter_map(|marker| marker.parse().ok())
            .map(ElementId)
            .collect()
    }

    fn is_attached(&self, element: ElementId) -> bool {
        let tree = self.tree.lock();
        tree.element(element).is_some() && tree.is_attached(element.0)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.tree.lock().attribute(element, name)
    }

    fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        let mut tree = self.tree.lock();
        if let Some(attrs) = tree.attrs_mut(element) {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn add_class(&self, element: ElementId, class: &str) {
        let current = self.attribute(element, "class").unwrap_or_default();
        if current.split_whitespace().any(|c| c == class) {
            return;
        }
        let updated = if current.trim().is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current.trim(), class)
        };
        self.set_attribute(element, "class", &updated);
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        if let Some(current) = self.attribute(element, "class") {
            let updated: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
            self.set_attribute(element, "class", &updated.join(" "));
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.attribute(element, "class")
            .map(|current| current.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        let mut tree = self.tree.lock();
        if let Some(style) = tree.style_mut(element) {
            match style.iter_mut().find(|(key, _)| key == property) {
                Some((_, existing)) => *existing = value.to_string(),
                None => style.push((property.to_string(), value.to_string())),
            }
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        let tree = self.tree.lock();
        match tree.element(element).map(|node| &node.kind) {
            Some(NodeKind::Element { style, .. }) => style
                .iter()
                .find(|(key, _)| key == property)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    fn set_text(&self, element: ElementId, text: &str) {
        let mut tree = self.tree.lock();
        if tree.element(element).is_none() {
            return;
        }
        // Rewrite a lone text child in place so per-frame updates don't grow the arena
        let lone = match tree.nodes[element.0].children.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        if let Some(only) = lone {
            if let NodeKind::Text(existing) = &mut tree.nodes[only].kind {
                existing.clear();
                existing.push_str(text);
                return;
            }
        }
        tree.clear_children(element.0);
        tree.push(NodeKind::Text(text.to_string()), element.0);
    }

    fn text(&self, element: ElementId) -> String {
        let tree = self.tree.lock();
        let mut out = String::new();
        if tree.element(element).is_some() {
            tree.text(element.0, &mut out);
        }
        out
    }

    fn set_inner_html(&self, element: ElementId, markup: &str) {
        let fragment = Html::parse_fragment(markup);
        let mut tree = self.tree.lock();
        if tree.element(element).is_none() {
            return;
        }
        tree.clear_children(element.0);
        // parse_fragment wraps the content in a synthetic <html> element
        for child in fragment.root_element().children() {
            tree.import(child, element.0);
        }
    }

    fn inner_html(&self, element: ElementId) -> String {
        let tree = self.tree.lock();
        let mut out = String::new();
        if tree.element(element).is_some() {
            tree.render_children(element.0, false, &mut out);
        }
        out
    }

    fn remove(&self, element: ElementId) {
        let mut tree = self.tree.lock();
        if tree.element(element).is_some() {
            tree.detach(element.0);
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
