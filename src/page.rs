// Shared page context: browser globals, configuration, analytics.
// Every lookup is optional; callers branch on presence and never assume the markup.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::analytics::Analytics;
use crate::error::{describe_js, SiteError};
use crate::types::SiteConfig;

/// Everything a behavior needs to install itself.
pub struct Page {
    pub window: Window,
    pub document: Document,
    pub config: Rc<SiteConfig>,
    pub analytics: Rc<Analytics>,
}

impl Page {
    /// Bind to the current window and document.
    pub fn current(config: Rc<SiteConfig>, analytics: Rc<Analytics>) -> Result<Self, SiteError> {
        let window = web_sys::window().ok_or(SiteError::MissingGlobal("window"))?;
        let document = window
            .document()
            .ok_or(SiteError::MissingGlobal("document"))?;
        Ok(Page {
            window,
            document,
            config,
            analytics,
        })
    }

    /// First element matching `selector`, if any.
    pub fn query(&self, selector: &str) -> Option<Element> {
        query_in(&self.document, selector)
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        query_all_in(&self.document, selector)
    }
}

/// Query under any element or document. Invalid selectors count as no match.
pub fn query_in<P: AsRef<web_sys::Node> + JsCast>(parent: &P, selector: &str) -> Option<Element> {
    let result = if let Some(doc) = parent.dyn_ref::<Document>() {
        doc.query_selector(selector)
    } else if let Some(el) = parent.dyn_ref::<Element>() {
        el.query_selector(selector)
    } else {
        return None;
    };
    match result {
        Ok(found) => found,
        Err(err) => {
            log_selector_error(selector, &err);
            None
        }
    }
}

/// Query all under any element or document. Invalid selectors count as no match.
pub fn query_all_in<P: AsRef<web_sys::Node> + JsCast>(parent: &P, selector: &str) -> Vec<Element> {
    let result = if let Some(doc) = parent.dyn_ref::<Document>() {
        doc.query_selector_all(selector)
    } else if let Some(el) = parent.dyn_ref::<Element>() {
        el.query_selector_all(selector)
    } else {
        return Vec::new();
    };
    let list = match result {
        Ok(list) => list,
        Err(err) => {
            log_selector_error(selector, &err);
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// View an element as an `HtmlElement` for style and layout access.
pub fn as_html(element: &Element) -> Option<&HtmlElement> {
    element.dyn_ref::<HtmlElement>()
}

fn log_selector_error(selector: &str, err: &wasm_bindgen::JsValue) {
    let err = SiteError::Selector {
        selector: selector.to_string(),
        message: describe_js(err),
    };
    tracing::warn!("{}", err);
}
