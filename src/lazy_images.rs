// Lazy image loader.
// Near-viewport images are preloaded off-screen; the visible element only changes once the
// decode settles, either with a short scale pulse or a greyed-out failure style.

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlImageElement};

use crate::dom::{self, Disposer};
use crate::error::{describe_js, SiteError};
use crate::page::Page;
use crate::types::{ImageSettings, CLASS_LOADED};
use crate::watch::OneShotWatcher;

pub const LOAD_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// Inline styles marking an image that failed to load.
pub const FAILED_STYLES: [(&str, &str); 2] = [("opacity", "0.5"), ("filter", "grayscale(100%)")];

/// Result of preloading an image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// Decoded; `src` is the resolved URL to copy into the visible image.
    Loaded { src: String },
    Failed,
}

/// One stage of the post-load pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseStep {
    /// Wait before applying, relative to the previous step.
    pub delay_ms: u32,
    pub transform: &'static str,
}

/// Grow slightly, then settle back.
pub fn pulse_schedule(settings: &ImageSettings) -> [PulseStep; 2] {
    [
        PulseStep {
            delay_ms: settings.pulse_grow_ms,
            transform: "scale(1.02)",
        },
        PulseStep {
            delay_ms: settings.pulse_settle_ms,
            transform: "scale(1)",
        },
    ]
}

pub fn install(page: &Page) -> Result<Disposer, SiteError> {
    let mut disposer = Disposer::new("lazy-images");
    let images = page.query_all(&page.config.selectors.image);
    if images.is_empty() {
        return Ok(disposer);
    }

    let settings = page.config.images.clone();
    let watch = settings.watch.clone();
    let watcher = OneShotWatcher::new(images, &watch, move |element: &Element| {
        let Some(image) = element.dyn_ref::<HtmlImageElement>() else {
            return;
        };
        spawn_local(load_image(image.clone(), settings.clone()));
    })?;
    disposer.watch(watcher);
    Ok(disposer)
}

/// Preload `image`'s current source, then swap it in with the pulse or mark it failed.
pub async fn load_image(image: HtmlImageElement, settings: ImageSettings) {
    let outcome = preload(&image.src()).await;
    apply(&image, outcome, &settings).await;
}

async fn preload(src: &str) -> PreloadOutcome {
    let preloader = match HtmlImageElement::new() {
        Ok(preloader) => preloader,
        Err(err) => {
            tracing::warn!(error = %describe_js(&err), "could not create preload image");
            return PreloadOutcome::Failed;
        }
    };
    preloader.set_src(src);
    match JsFuture::from(preloader.decode()).await {
        Ok(_) => PreloadOutcome::Loaded {
            src: preloader.src(),
        },
        Err(err) => {
            tracing::debug!(src, error = %describe_js(&err), "image preload failed");
            PreloadOutcome::Failed
        }
    }
}

async fn apply(image: &HtmlImageElement, outcome: PreloadOutcome, settings: &ImageSettings) {
    let element: &Element = image;
    match outcome {
        PreloadOutcome::Loaded { src } => {
            image.set_src(&src);
            dom::add_class(element, CLASS_LOADED);
            dom::set_style(element, "transition", LOAD_TRANSITION);
            for step in pulse_schedule(settings) {
                TimeoutFuture::new(step.delay_ms).await;
                dom::set_style(element, "transform", step.transform);
            }
        }
        PreloadOutcome::Failed => dom::set_styles(element, &FAILED_STYLES),
    }
}
