// Analytics call sites: page view, download/feature/screenshot clicks, load timing,
// and uncaught script errors.

use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, HtmlImageElement, PerformanceNavigationTiming, Window};

use crate::analytics::{payload, Analytics};
use crate::dom::{self, Disposer};
use crate::page::{query_in, Page};

pub fn install(page: &Page) -> Disposer {
    let mut disposer = Disposer::new("tracking");
    let analytics = &page.analytics;
    if !analytics.is_enabled() {
        return disposer;
    }
    let selectors = &page.config.selectors;

    let url = page.window.location().href().unwrap_or_default();
    analytics.record("page_view", payload::page_view(&page.document.title(), &url));

    for button in page.query_all(&selectors.download_button) {
        let analytics = Rc::clone(analytics);
        let app_store_class = selectors.app_store_class.clone();
        let target = button.clone();
        disposer.listen(EventListener::new(&button, "click", move |_| {
            let text = target.text_content().unwrap_or_default();
            let is_app_store = dom::has_class(&target, &app_store_class);
            analytics.record("download_click", payload::download_click(is_app_store, &text));
        }));
    }

    for card in page.query_all(&selectors.feature_card) {
        let analytics = Rc::clone(analytics);
        let title_selector = selectors.feature_title.clone();
        let target = card.clone();
        disposer.listen(EventListener::new(&card, "click", move |_| {
            let Some(title) = query_in(&target, &title_selector) else {
                tracing::debug!(selector = %title_selector, "feature card without a title");
                return;
            };
            let feature = title.text_content().unwrap_or_default();
            analytics.record("feature_click", payload::feature_click(&feature));
        }));
    }

    for (index, shot) in page.query_all(&selectors.screenshot_image).into_iter().enumerate() {
        let analytics = Rc::clone(analytics);
        let target = shot.clone();
        disposer.listen(EventListener::new(&shot, "click", move |_| {
            let alt = target
                .dyn_ref::<HtmlImageElement>()
                .map(|image| image.alt())
                .or_else(|| target.get_attribute("alt"));
            analytics.record("screenshot_click", payload::screenshot_click(index, alt.as_deref()));
        }));
    }

    // Mounting after `load` has fired still reports the timing once.
    if page.document.ready_state() == "complete" {
        record_page_load(analytics, &page.window);
    } else {
        let on_load = Rc::clone(analytics);
        let window = page.window.clone();
        disposer.listen(EventListener::once(&page.window, "load", move |_| {
            record_page_load(&on_load, &window);
        }));
    }

    let on_error = Rc::clone(analytics);
    disposer.listen(EventListener::new(&page.window, "error", move |event| {
        let Some(event) = event.dyn_ref::<ErrorEvent>() else {
            return;
        };
        on_error.record(
            "javascript_error",
            payload::script_error(&event.message(), &event.filename(), event.lineno(), event.colno()),
        );
    }));

    disposer
}

fn record_page_load(analytics: &Analytics, window: &Window) {
    let (load_time, dom_content_loaded) = load_timing(window);
    analytics.record("page_load", payload::page_load(load_time, dom_content_loaded));
}

/// Milliseconds since navigation start, and the DOM-content-loaded end from navigation
/// timing (0 when the entry is unavailable).
fn load_timing(window: &Window) -> (f64, f64) {
    let Some(performance) = window.performance() else {
        return (0.0, 0.0);
    };
    let dom_content_loaded = performance
        .get_entries_by_type("navigation")
        .get(0)
        .dyn_into::<PerformanceNavigationTiming>()
        .map(|timing| timing.dom_content_loaded_event_end())
        .unwrap_or(0.0);
    (performance.now(), dom_content_loaded)
}
