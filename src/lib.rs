// landing_core: Rust/WASM presentation layer for the landing page.
// Pure decisions (thresholds, geometry, payloads) live in plain functions; the DOM wiring
// around them is thin, optional-element-aware, and torn down through Disposer handles.

mod analytics;
mod dom;
mod effects;
mod error;
mod lazy_images;
mod nav;
mod page;
mod reveal;
mod scroll_dispatch;
mod sections;
mod smooth_scroll;
mod tracking;
mod types;
mod watch;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub use analytics::{
    payload, Analytics, BrowserContext, CallbackSink, EventData, EventRecord, EventSink, LogSink,
    PageContext,
};
pub use dom::Disposer;
pub use effects::RippleGeometry;
pub use error::SiteError;
pub use lazy_images::{load_image, pulse_schedule, PreloadOutcome, PulseStep, FAILED_STYLES};
pub use nav::{command_for_click, command_for_key, hero_opacity, is_scrolled, MenuCommand};
pub use scroll_dispatch::{FrameGate, ScrollDispatcher};
pub use sections::{current_section, link_is_active};
pub use smooth_scroll::{fragment_id, scroll_target};
pub use types::*;
pub use watch::{OneShotWatcher, WatchSet};

use page::Page;

/// Initialize panic hook and console logging, then boot the page.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A host page may have installed a subscriber already.
    let _ = tracing_wasm::try_set_as_global_default();

    #[cfg(feature = "autoboot")]
    boot::schedule();
}

/// Page behaviors exposed to JavaScript.
/// Build with a JSON config, mount once the DOM is ready, unmount to tear everything down.
#[wasm_bindgen]
pub struct LandingPage {
    config: Rc<SiteConfig>,
    analytics: Rc<Analytics>,
    mounted: Option<Mounted>,
}

struct Mounted {
    scroll: ScrollDispatcher,
    behaviors: Vec<Disposer>,
}

impl LandingPage {
    pub fn from_json(config_json: &str) -> Result<LandingPage, SiteError> {
        let config = SiteConfig::from_json(config_json)
            .map_err(|e| SiteError::InvalidConfig(e.to_string()))?;
        Ok(LandingPage::with_config(config))
    }

    pub fn with_config(config: SiteConfig) -> LandingPage {
        let analytics = Analytics::browser(config.analytics.enabled);
        LandingPage {
            config: Rc::new(config),
            analytics: Rc::new(analytics),
            mounted: None,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Install every behavior. Each one is independent: a failure is logged and the rest
    /// still mount. Mounting an already mounted page is a no-op.
    pub fn try_mount(&mut self) -> Result<(), SiteError> {
        if self.mounted.is_some() {
            return Ok(());
        }
        let page = Page::current(Rc::clone(&self.config), Rc::clone(&self.analytics))?;
        let mut scroll = ScrollDispatcher::new(page.window.clone(), self.config.scrolling.scheduling);

        let mut behaviors = vec![
            nav::install(&page, &scroll),
            smooth_scroll::install(&page),
            tracking::install(&page),
        ];
        sections::install(&page, &scroll);
        for (label, result) in [
            ("reveal", reveal::install(&page)),
            ("lazy-images", lazy_images::install(&page)),
            ("effects", effects::install(&page)),
        ] {
            match result {
                Ok(disposer) => behaviors.push(disposer),
                Err(err) => tracing::warn!(behavior = label, "not installed: {}", err),
            }
        }

        scroll.start();
        scroll.sync();

        tracing::info!(
            behaviors = behaviors.len(),
            scroll_subscribers = scroll.subscriber_count(),
            "landing page mounted"
        );
        self.mounted = Some(Mounted { scroll, behaviors });
        Ok(())
    }
}

#[wasm_bindgen]
impl LandingPage {
    /// Create from a JSON config. An empty string or `{}` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<LandingPage, JsValue> {
        LandingPage::from_json(config_json).map_err(JsValue::from)
    }

    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.try_mount().map_err(JsValue::from)
    }

    /// Remove every listener, observer, and injected style.
    pub fn unmount(&mut self) {
        if let Some(Mounted { mut scroll, behaviors }) = self.mounted.take() {
            scroll.stop();
            for behavior in behaviors {
                behavior.dispose();
            }
            tracing::info!("landing page unmounted");
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Record a custom event. `data_json` must be a JSON object (or empty).
    /// Returns the record as JSON.
    pub fn track(&self, name: &str, data_json: &str) -> Result<String, JsValue> {
        let data: EventData = if data_json.trim().is_empty() {
            EventData::new()
        } else {
            serde_json::from_str(data_json).map_err(|e| JsValue::from(SiteError::from(e)))?
        };
        let record = self.analytics.record(name, data);
        serde_json::to_string(&record)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Send analytics records to `reporter(record)` instead of the console.
    #[wasm_bindgen(js_name = setReporter)]
    pub fn set_reporter(&self, reporter: js_sys::Function) {
        self.analytics.set_sink(Box::new(CallbackSink::new(reporter)));
    }
}

impl Drop for LandingPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Take down the automatically booted page, e.g. before mounting one with a custom config.
/// A mount still waiting for the DOM is cancelled as well.
#[wasm_bindgen(js_name = stopAutoboot)]
pub fn stop_autoboot() {
    boot::stop();
}

mod boot {
    #![cfg_attr(not(feature = "autoboot"), allow(dead_code))]

    use gloo_events::EventListener;
    use web_sys::EventTarget;

    use super::*;

    #[derive(Default)]
    struct Autoboot {
        /// Listener waiting for the DOM; dropping it cancels the mount.
        pending: Option<EventListener>,
        page: Option<LandingPage>,
    }

    thread_local! {
        static AUTOBOOT: RefCell<Autoboot> = RefCell::new(Autoboot::default());
    }

    /// Mount a default page once the DOM has been parsed.
    pub(super) fn schedule() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.ready_state() == "loading" {
            defer_until(&document, "DOMContentLoaded");
        } else {
            mount_default();
        }
    }

    pub(super) fn defer_until(target: &EventTarget, event: &'static str) {
        let listener = EventListener::once(target, event, |_| mount_default());
        AUTOBOOT.with(|boot| boot.borrow_mut().pending = Some(listener));
    }

    pub(super) fn stop() {
        // Dropped after the borrow ends; unmounting touches the DOM.
        let _stopped = AUTOBOOT.with(|boot| {
            let mut boot = boot.borrow_mut();
            (boot.pending.take(), boot.page.take())
        });
    }

    #[cfg(test)]
    pub(super) fn is_booted() -> bool {
        AUTOBOOT.with(|boot| boot.borrow().page.is_some())
    }

    fn mount_default() {
        let mut page = LandingPage::with_config(SiteConfig::default());
        if let Err(err) = page.try_mount() {
            tracing::warn!("autoboot failed: {}", err);
            return;
        }
        AUTOBOOT.with(|boot| boot.borrow_mut().page = Some(page));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_creation_works() {
        let config = r#"{"scrolling":{"header_offset":72},"effects":{"ripples":false}}"#;
        let page = LandingPage::from_json(config).unwrap();
        assert_eq!(page.config().scrolling.header_offset, 72.0);
        assert!(!page.config().effects.ripples);
        assert!(!page.is_mounted());
    }

    #[test]
    fn empty_config_is_default() {
        let page = LandingPage::from_json("").unwrap();
        assert_eq!(page.config().navigation.scrolled_threshold, 100.0);
        assert!(page.analytics().is_enabled());
    }

    #[test]
    fn bad_config_is_rejected() {
        let err = LandingPage::from_json("[1, 2").err().unwrap();
        assert!(matches!(err, SiteError::InvalidConfig(_)));
    }
}
