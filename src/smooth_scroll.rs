// Smooth-scroll router for in-page anchors.

use gloo_events::{EventListener, EventListenerOptions};
use web_sys::{ScrollBehavior, ScrollToOptions};

use crate::dom::Disposer;
use crate::page::{as_html, Page};

/// Element id an in-page href points at. `"#"` and non-fragment hrefs have none.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Where to scroll for `href`, given a lookup from element id to its document offset.
/// `None` means no scroll: the href has no fragment or the target does not exist.
pub fn scroll_target(
    href: &str,
    offset_of: impl FnOnce(&str) -> Option<f64>,
    header_offset: f64,
) -> Option<f64> {
    let id = fragment_id(href)?;
    offset_of(id).map(|top| top - header_offset)
}

pub fn install(page: &Page) -> Disposer {
    let mut disposer = Disposer::new("smooth-scroll");
    let header_offset = page.config.scrolling.header_offset;

    for link in page.query_all(&page.config.selectors.anchor) {
        let window = page.window.clone();
        let document = page.document.clone();
        let anchor = link.clone();
        let listener = EventListener::new_with_options(
            &link,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let href = anchor.get_attribute("href").unwrap_or_default();
                let lookup = |id: &str| {
                    document
                        .get_element_by_id(id)
                        .and_then(|el| as_html(&el).map(|html| f64::from(html.offset_top())))
                };
                let Some(top) = scroll_target(&href, lookup, header_offset) else {
                    tracing::debug!(%href, "anchor target missing, not scrolling");
                    return;
                };
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            },
        );
        disposer.listen(listener);
    }

    disposer
}
