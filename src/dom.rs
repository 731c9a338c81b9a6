// Class and style mutation that logs instead of failing, and the teardown handle
// every initializer returns.

use gloo_events::EventListener;
use web_sys::Element;

use crate::page::as_html;
use crate::watch::OneShotWatcher;

pub fn add_class(element: &Element, class: &str) {
    if let Err(err) = element.class_list().add_1(class) {
        tracing::warn!(class, ?err, "classList.add failed");
    }
}

pub fn remove_class(element: &Element, class: &str) {
    if let Err(err) = element.class_list().remove_1(class) {
        tracing::warn!(class, ?err, "classList.remove failed");
    }
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

/// Set or clear `class` to match `on`.
pub fn set_class(element: &Element, class: &str, on: bool) {
    if on {
        add_class(element, class);
    } else {
        remove_class(element, class);
    }
}

/// Set one inline style property. Non-HTML elements are ignored.
pub fn set_style(element: &Element, property: &str, value: &str) {
    let Some(html) = as_html(element) else {
        return;
    };
    if let Err(err) = html.style().set_property(property, value) {
        tracing::warn!(property, value, ?err, "style.setProperty failed");
    }
}

/// Apply a batch of inline style properties in order.
pub fn set_styles(element: &Element, styles: &[(&str, &str)]) {
    for (property, value) in styles {
        set_style(element, property, value);
    }
}

/// Cleanup handle for one installed behavior.
///
/// Owns the behavior's listeners, intersection watchers, and any nodes it
/// injected. Dropping it (or calling [`Disposer::dispose`]) removes them all.
pub struct Disposer {
    label: &'static str,
    listeners: Vec<EventListener>,
    watchers: Vec<OneShotWatcher>,
    nodes: Vec<Element>,
}

impl Disposer {
    pub fn new(label: &'static str) -> Self {
        Disposer {
            label,
            listeners: Vec::new(),
            watchers: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn listen(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn watch(&mut self, watcher: OneShotWatcher) {
        self.watchers.push(watcher);
    }

    /// Remove `node` from the document on teardown.
    pub fn own_node(&mut self, node: Element) {
        self.nodes.push(node);
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of live listeners and watchers held.
    pub fn len(&self) -> usize {
        self.listeners.len() + self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.nodes.is_empty()
    }

    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        for node in self.nodes.drain(..) {
            node.remove();
        }
        if !self.listeners.is_empty() || !self.watchers.is_empty() {
            tracing::debug!(
                behavior = self.label,
                listeners = self.listeners.len(),
                watchers = self.watchers.len(),
                "tearing down"
            );
        }
    }
}
