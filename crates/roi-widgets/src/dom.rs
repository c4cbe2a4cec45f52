//! In-memory element tree
//!
//! A minimal stand-in for the page markup: elements carry attributes, text,
//! the two style properties the slider writes, an optional numeric value and
//! a bounding box. Cloning an [`Element`] yields another handle to the same
//! node. Text changes are reported to registered [`MutationObserver`]s.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use roi_core::AttributeSource;

/// Attribute tagging the parts of a slider
pub const SLIDER_PART_ATTR: &str = "fs-rangeslider-element";

/// Values of [`SLIDER_PART_ATTR`]
pub mod parts {
    pub const WRAPPER: &str = "wrapper";
    pub const TRACK: &str = "track";
    pub const HANDLE: &str = "handle";
    pub const FILL: &str = "fill";
    pub const DISPLAY: &str = "display-value";
    pub const INPUT: &str = "input";
}

/// Bounding box in client coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Inline style properties written by widgets
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Style {
    /// `left`, in percent
    pub left_percent: Option<f64>,
    /// `width`, in percent
    pub width_percent: Option<f64>,
}

/// Notified after an observed element's text is set
pub trait MutationObserver: Send + Sync {
    fn on_text_changed(&self, element: &Element, text: &str);
}

struct ElementInner {
    tag: String,
    attributes: RwLock<BTreeMap<String, String>>,
    text: RwLock<String>,
    style: RwLock<Style>,
    value: RwLock<Option<f64>>,
    rect: RwLock<Rect>,
    children: RwLock<Vec<Element>>,
    observers: RwLock<Vec<Weak<dyn MutationObserver>>>,
}

/// A shared handle to one node
#[derive(Clone)]
pub struct Element {
    inner: Arc<ElementInner>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                tag: tag.into(),
                attributes: RwLock::new(BTreeMap::new()),
                text: RwLock::new(String::new()),
                style: RwLock::new(Style::default()),
                value: RwLock::new(None),
                rect: RwLock::new(Rect::default()),
                children: RwLock::new(Vec::new()),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Builder: set an attribute
    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: set the text
    pub fn with_text(self, text: impl Into<String>) -> Self {
        *self.inner.text.write() = text.into();
        self
    }

    /// Builder: append a child
    pub fn with_child(self, child: Element) -> Self {
        self.append(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    pub fn append(&self, child: Element) {
        self.inner.children.write().push(child);
    }

    pub fn children(&self) -> Vec<Element> {
        self.inner.children.read().clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.read().get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.read().contains_key(name)
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.attributes.write().insert(name.into(), value.into());
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.write().remove(name)
    }

    pub fn text(&self) -> String {
        self.inner.text.read().clone()
    }

    /// Replace the text and notify observers, even when the text is unchanged.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        *self.inner.text.write() = text.clone();

        let observers: Vec<Arc<dyn MutationObserver>> = {
            let mut observers = self.inner.observers.write();
            observers.retain(|weak| weak.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in observers {
            observer.on_text_changed(self, &text);
        }
    }

    /// Replace the text without notifying observers, as a write made while
    /// no observer is connected.
    pub fn replace_text(&self, text: impl Into<String>) {
        *self.inner.text.write() = text.into();
    }

    /// Watch text changes. The element holds the observer weakly.
    pub fn observe_text(&self, observer: &Arc<dyn MutationObserver>) {
        self.inner.observers.write().push(Arc::downgrade(observer));
    }

    pub fn style(&self) -> Style {
        *self.inner.style.read()
    }

    pub fn set_left_percent(&self, percent: f64) {
        self.inner.style.write().left_percent = Some(percent);
    }

    pub fn set_width_percent(&self, percent: f64) {
        self.inner.style.write().width_percent = Some(percent);
    }

    /// Numeric value of an input element
    pub fn value(&self) -> Option<f64> {
        *self.inner.value.read()
    }

    pub fn set_value(&self, value: f64) {
        *self.inner.value.write() = Some(value);
    }

    pub fn rect(&self) -> Rect {
        *self.inner.rect.read()
    }

    pub fn set_rect(&self, rect: Rect) {
        *self.inner.rect.write() = rect;
    }

    /// First descendant whose `name` attribute equals `value`, depth first
    pub fn query(&self, name: &str, value: &str) -> Option<Element> {
        for child in self.children() {
            if child.attribute(name).as_deref() == Some(value) {
                return Some(child);
            }
            if let Some(found) = child.query(name, value) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant whose `name` attribute equals `value`, in document order
    pub fn query_all(&self, name: &str, value: &str) -> Vec<Element> {
        let mut found = Vec::new();
        self.collect(name, value, &mut found);
        found
    }

    fn collect(&self, name: &str, value: &str, found: &mut Vec<Element>) {
        for child in self.children() {
            if child.attribute(name).as_deref() == Some(value) {
                found.push(child.clone());
            }
            child.collect(name, value, found);
        }
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl AttributeSource for Element {
    fn attribute(&self, name: &str) -> Option<String> {
        Element::attribute(self, name)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.inner.tag)
            .field("attributes", &*self.inner.attributes.read())
            .field("children", &self.inner.children.read().len())
            .finish()
    }
}

/// The page root
#[derive(Debug, Clone)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn append(&self, element: Element) {
        self.body.append(element);
    }

    pub fn query(&self, name: &str, value: &str) -> Option<Element> {
        self.body.query(name, value)
    }

    pub fn query_all(&self, name: &str, value: &str) -> Vec<Element> {
        self.body.query_all(name, value)
    }
}
