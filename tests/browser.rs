// Browser tests: run with `wasm-pack test --headless --firefox` (or chrome).
#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use landing_core::{load_image, ImageSettings, LandingPage};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, KeyboardEvent, KeyboardEventInit, MouseEvent,
    MouseEventInit,
};

wasm_bindgen_test_configure!(run_in_browser);

const QUIET: &str = r#"{"analytics":{"enabled":false}}"#;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn fixture(html: &str) {
    landing_core::stop_autoboot();
    let document = document();
    let host = match document.get_element_by_id("fixture") {
        Some(host) => host,
        None => {
            let host = document.create_element("div").unwrap();
            host.set_id("fixture");
            document.body().unwrap().append_child(&host).unwrap();
            host
        }
    };
    host.set_inner_html(html);
}

fn element(selector: &str) -> Element {
    document().query_selector(selector).unwrap().unwrap()
}

fn click(selector: &str) {
    element(selector).dyn_into::<HtmlElement>().unwrap().click();
}

fn recorder(page: &LandingPage) -> (Rc<RefCell<Vec<JsValue>>>, Closure<dyn Fn(JsValue)>) {
    let seen: Rc<RefCell<Vec<JsValue>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let reporter = Closure::<dyn Fn(JsValue)>::new(move |record: JsValue| {
        sink.borrow_mut().push(record);
    });
    page.set_reporter(reporter.as_ref().unchecked_ref::<js_sys::Function>().clone());
    (seen, reporter)
}

fn names(records: &[JsValue]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| js_sys::Reflect::get(record, &"name".into()).ok()?.as_string())
        .collect()
}

fn is_active(selector: &str) -> bool {
    element(selector).class_list().contains("active")
}

const NAV: &str = r##"
    <nav class="navbar">
      <button class="nav-toggle">menu</button>
      <ul class="nav-menu">
        <li><a class="nav-link" href="#features">Features</a></li>
      </ul>
    </nav>
    <p class="outside">elsewhere</p>
"##;

#[wasm_bindgen_test]
fn toggle_parity() {
    fixture(NAV);
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    for n in 1..=4 {
        click(".nav-toggle");
        assert_eq!(is_active(".nav-menu"), n % 2 == 1, "after {n} toggles");
        assert_eq!(is_active(".nav-toggle"), n % 2 == 1);
    }

    page.unmount();
}

#[wasm_bindgen_test]
fn lone_toggle_flips_its_own_state() {
    fixture(r#"<button class="nav-toggle">menu</button>"#);
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    click(".nav-toggle");
    assert!(is_active(".nav-toggle"));
    click(".nav-toggle");
    assert!(!is_active(".nav-toggle"));

    page.unmount();
}

#[wasm_bindgen_test]
fn outside_click_and_escape_close_menu() {
    fixture(NAV);
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    click(".nav-toggle");
    assert!(is_active(".nav-menu"));
    click(".outside");
    assert!(!is_active(".nav-menu"));

    click(".nav-toggle");
    let init = KeyboardEventInit::new();
    init.set_key("Escape");
    let escape = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    document().dispatch_event(&escape).unwrap();
    assert!(!is_active(".nav-menu"));
    assert!(!is_active(".nav-toggle"));

    page.unmount();
}

#[wasm_bindgen_test]
fn unmount_detaches_listeners() {
    fixture(NAV);
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();
    page.unmount();
    assert!(!page.is_mounted());

    click(".nav-toggle");
    assert!(!is_active(".nav-menu"));
}

#[wasm_bindgen_test]
fn missing_anchor_target_prevents_default_without_scrolling() {
    fixture(r##"<a id="go" href="#missing">go</a>"##);
    let window = web_sys::window().unwrap();
    let before = window.scroll_y().unwrap();
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    let not_prevented = element("#go").dispatch_event(&event).unwrap();

    assert!(!not_prevented);
    assert_eq!(window.scroll_y().unwrap(), before);
    page.unmount();
}

#[wasm_bindgen_test]
fn button_click_spawns_ripple() {
    fixture(r#"<button class="btn" style="width:120px;height:40px">Go</button>"#);
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    click(".btn");
    let ripple = element(".btn .ripple").dyn_into::<HtmlElement>().unwrap();
    assert_eq!(ripple.style().get_property_value("width").unwrap(), "120px");

    page.unmount();
}

#[wasm_bindgen_test]
fn reporter_receives_download_click() {
    fixture(r#"<a class="download-btn app-store"> Download </a>"#);
    let mut page = LandingPage::new("").unwrap();
    let (seen, _reporter) = recorder(&page);
    page.mount().unwrap();

    click(".download-btn");
    let records = seen.borrow();
    let last = records.last().unwrap();
    let name = js_sys::Reflect::get(last, &"name".into()).unwrap();
    assert_eq!(name.as_string().as_deref(), Some("download_click"));
    let data = js_sys::Reflect::get(last, &"data".into()).unwrap();
    let store = js_sys::Reflect::get(&data, &"store".into()).unwrap();
    assert_eq!(store.as_string().as_deref(), Some("app_store"));
    for field in ["timestamp", "url", "userAgent"] {
        assert!(js_sys::Reflect::has(last, &field.into()).unwrap(), "missing {field}");
    }

    drop(records);
    page.unmount();
}

#[wasm_bindgen_test]
async fn mounting_after_load_still_reports_page_load() {
    fixture("<p>loaded</p>");
    while document().ready_state() != "complete" {
        TimeoutFuture::new(10).await;
    }
    let mut page = LandingPage::new("").unwrap();
    let (seen, _reporter) = recorder(&page);
    page.mount().unwrap();

    let records = seen.borrow();
    let loads: Vec<&JsValue> = records
        .iter()
        .filter(|record| {
            js_sys::Reflect::get(record, &"name".into())
                .ok()
                .and_then(|name| name.as_string())
                .as_deref()
                == Some("page_load")
        })
        .collect();
    assert_eq!(loads.len(), 1, "records: {:?}", names(&records));
    let data = js_sys::Reflect::get(loads[0], &"data".into()).unwrap();
    let load_time = js_sys::Reflect::get(&data, &"load_time".into()).unwrap();
    assert!(load_time.as_f64().unwrap() >= 0.0);

    drop(records);
    page.unmount();
}

const BLANK_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

fn quick_pulse() -> ImageSettings {
    ImageSettings {
        pulse_grow_ms: 0,
        pulse_settle_ms: 0,
        ..ImageSettings::default()
    }
}

#[wasm_bindgen_test]
async fn broken_image_is_greyed_out() {
    fixture(r#"<img id="shot" alt="shot">"#);
    let image = element("#shot").dyn_into::<HtmlImageElement>().unwrap();
    image.set_src("data:image/png;base64,bm90IGFuIGltYWdl");

    load_image(image.clone(), quick_pulse()).await;

    let style = image.style();
    assert_eq!(style.get_property_value("opacity").unwrap(), "0.5");
    assert_eq!(style.get_property_value("filter").unwrap(), "grayscale(100%)");
    assert!(!image.class_list().contains("loaded"));
}

#[wasm_bindgen_test]
async fn decoded_image_is_swapped_in_and_pulsed() {
    fixture(r#"<img id="shot" alt="shot">"#);
    let image = element("#shot").dyn_into::<HtmlImageElement>().unwrap();
    image.set_src(BLANK_GIF);

    load_image(image.clone(), quick_pulse()).await;

    assert!(image.class_list().contains("loaded"));
    assert_eq!(image.src(), BLANK_GIF);
    let style = image.style();
    assert_eq!(style.get_property_value("transform").unwrap(), "scale(1)");
    assert_eq!(style.get_property_value("opacity").unwrap(), "");
}

const SECTIONS: &str = r##"
    <style>body { margin: 0; } section { margin: 0; height: 500px; }</style>
    <nav>
      <a class="nav-link" href="#s1">One</a>
      <a class="nav-link" href="#s2">Two</a>
    </nav>
    <section id="s1">first</section>
    <section id="s2">second</section>
    <div style="height: 3000px"></div>
"##;

#[wasm_bindgen_test]
fn highlights_link_of_current_section() {
    fixture(SECTIONS);
    let window = web_sys::window().unwrap();
    let second_top = element("#s2").dyn_into::<HtmlElement>().unwrap().offset_top();
    // scrollY + 100 lands 50px into the second section.
    window.scroll_to_with_x_and_y(0.0, f64::from(second_top) - 50.0);

    // Mounting dispatches once against the current position.
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    assert!(is_active(r##".nav-link[href="#s2"]"##));
    assert!(!is_active(r##".nav-link[href="#s1"]"##));

    page.unmount();
    window.scroll_to_with_x_and_y(0.0, 0.0);
}

#[wasm_bindgen_test]
async fn visible_cards_are_revealed() {
    fixture(r#"<div class="feature-card" style="height: 200px"><h3>Fast</h3></div>"#);
    element(".feature-card").scroll_into_view();
    let mut page = LandingPage::new(QUIET).unwrap();
    page.mount().unwrap();

    TimeoutFuture::new(200).await;
    assert!(element(".feature-card").class_list().contains("fade-in-up"));

    page.unmount();
}

#[wasm_bindgen_test]
fn track_returns_record_json() {
    let page = LandingPage::new(QUIET).unwrap();
    let json = page
        .track("download_click", r#"{"store":"app_store","button_text":"Download"}"#)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["data"]["button_text"], "Download");
    assert_eq!(value["name"], "download_click");
    assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
}
