// Cosmetic interaction effects: click ripples on buttons, hover lift on feature cards.

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use crate::dom::{self, Disposer};
use crate::error::SiteError;
use crate::page::Page;
use crate::types::{Point, Rect, CLASS_RIPPLE};

pub const HOVER_IN: &str = "translateY(-8px) scale(1.02)";
pub const HOVER_OUT: &str = "translateY(0) scale(1)";

/// Injected once per mount; the ripple span depends on it for shape and animation.
pub const RIPPLE_CSS: &str = r#"
  .btn, .download-btn {
    position: relative;
    overflow: hidden;
  }

  .ripple {
    position: absolute;
    border-radius: 50%;
    background: rgba(255, 255, 255, 0.3);
    transform: scale(0);
    animation: ripple-animation 0.6s linear;
    pointer-events: none;
  }

  @keyframes ripple-animation {
    to {
      transform: scale(4);
      opacity: 0;
    }
  }
"#;

/// Size and placement of a ripple, relative to the clicked element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// A square as large as the element's longer side, centred on the click.
    pub fn compute(bounds: Rect, click: Point) -> Self {
        let size = bounds.width.max(bounds.height);
        RippleGeometry {
            size,
            left: click.x - bounds.left - size / 2.0,
            top: click.y - bounds.top - size / 2.0,
        }
    }

    pub fn styles(&self) -> [(&'static str, String); 4] {
        [
            ("width", px(self.size)),
            ("height", px(self.size)),
            ("left", px(self.left)),
            ("top", px(self.top)),
        ]
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

pub fn install(page: &Page) -> Result<Disposer, SiteError> {
    let mut disposer = Disposer::new("effects");
    let settings = page.config.effects.clone();
    let selectors = &page.config.selectors;

    if settings.card_hover {
        for card in page.query_all(&selectors.feature_card) {
            let target = card.clone();
            disposer.listen(EventListener::new(&card, "mouseenter", move |_| {
                dom::set_style(&target, "transform", HOVER_IN);
            }));
            let target = card.clone();
            disposer.listen(EventListener::new(&card, "mouseleave", move |_| {
                dom::set_style(&target, "transform", HOVER_OUT);
            }));
        }
    }

    if settings.ripples {
        disposer.own_node(inject_stylesheet(page)?);
        for button in page.query_all(&selectors.button) {
            let document = page.document.clone();
            let target = button.clone();
            let lifetime = settings.ripple_ms;
            disposer.listen(EventListener::new(&button, "click", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if let Err(err) = spawn_ripple(&document, &target, event, lifetime) {
                    tracing::warn!("ripple skipped: {}", err);
                }
            }));
        }
    }

    Ok(disposer)
}

fn inject_stylesheet(page: &Page) -> Result<Element, SiteError> {
    let head = page
        .document
        .head()
        .ok_or(SiteError::MissingGlobal("document.head"))?;
    let style = page.document.create_element("style")?;
    style.set_text_content(Some(RIPPLE_CSS));
    head.append_child(&style)?;
    Ok(style)
}

fn spawn_ripple(
    document: &web_sys::Document,
    button: &Element,
    event: &MouseEvent,
    lifetime_ms: u32,
) -> Result<(), SiteError> {
    let bounds = Rect::from_dom(&button.get_bounding_client_rect());
    let click = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
    let geometry = RippleGeometry::compute(bounds, click);

    let ripple = document.create_element("span")?;
    for (property, value) in geometry.styles() {
        dom::set_style(&ripple, property, &value);
    }
    dom::add_class(&ripple, CLASS_RIPPLE);
    button.append_child(&ripple)?;

    Timeout::new(lifetime_ms, move || ripple.remove()).forget();
    Ok(())
}
