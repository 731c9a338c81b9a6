// Analytics emitter: build an event record and hand it to the current sink.
// Fire-and-forget; nothing is buffered, retried, or persisted.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Arbitrary key/value payload attached to an event.
pub type EventData = Map<String, Value>;

/// Write-once analytics event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    pub data: EventData,
    /// ISO-8601, taken when the record is built.
    pub timestamp: String,
    pub url: String,
    pub user_agent: String,
}

/// Where records come from: clock, page URL, client identification.
pub trait PageContext {
    fn now_iso(&self) -> String;
    fn url(&self) -> String;
    fn user_agent(&self) -> String;
}

/// Where records go.
pub trait EventSink {
    fn report(&self, record: &EventRecord);
}

/// Reads the live browser environment.
pub struct BrowserContext;

impl PageContext for BrowserContext {
    fn now_iso(&self) -> String {
        String::from(js_sys::Date::new_0().to_iso_string())
    }

    fn url(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn user_agent(&self) -> String {
        web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default()
    }
}

/// Development sink: log the record.
pub struct LogSink;

impl EventSink for LogSink {
    fn report(&self, record: &EventRecord) {
        match serde_json::to_string(record) {
            Ok(json) => tracing::info!(event = %record.name, record = %json, "Event tracked"),
            Err(err) => tracing::warn!(event = %record.name, %err, "Event tracked, unserializable payload"),
        }
    }
}

/// Forwards each record to a JS function as a plain object.
pub struct CallbackSink {
    callback: js_sys::Function,
}

impl CallbackSink {
    pub fn new(callback: js_sys::Function) -> Self {
        CallbackSink { callback }
    }
}

impl EventSink for CallbackSink {
    fn report(&self, record: &EventRecord) {
        let object = serde_json::to_string(record)
            .map_err(|err| wasm_bindgen::JsValue::from_str(&err.to_string()))
            .and_then(|json| js_sys::JSON::parse(&json));
        let result = object.and_then(|object| {
            self.callback
                .call1(&wasm_bindgen::JsValue::NULL, &object)
        });
        if let Err(err) = result {
            tracing::warn!(event = %record.name, error = ?err, "analytics reporter failed");
        }
    }
}

/// Builds records and hands them to a swappable sink.
pub struct Analytics {
    enabled: bool,
    context: Box<dyn PageContext>,
    sink: RefCell<Box<dyn EventSink>>,
}

impl Analytics {
    pub fn new(enabled: bool, context: Box<dyn PageContext>, sink: Box<dyn EventSink>) -> Self {
        Analytics {
            enabled,
            context,
            sink: RefCell::new(sink),
        }
    }

    /// Browser context with the logging sink.
    pub fn browser(enabled: bool) -> Self {
        Analytics::new(enabled, Box::new(BrowserContext), Box::new(LogSink))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_sink(&self, sink: Box<dyn EventSink>) {
        *self.sink.borrow_mut() = sink;
    }

    /// Build a record for `name` with exactly `data` as payload.
    pub fn build(&self, name: &str, data: EventData) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            data,
            timestamp: self.context.now_iso(),
            url: self.context.url(),
            user_agent: self.context.user_agent(),
        }
    }

    /// Build and report. Returns the record so callers can inspect what was sent.
    pub fn record(&self, name: &str, data: EventData) -> EventRecord {
        let record = self.build(name, data);
        if self.enabled {
            self.sink.borrow().report(&record);
        }
        record
    }
}

fn object(value: Value) -> EventData {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Payload builders for the page's call sites.
pub mod payload {
    use super::*;

    pub fn page_view(title: &str, url: &str) -> EventData {
        object(json!({ "page_title": title, "page_url": url }))
    }

    /// Store is `app_store` for the tagged button, `google_play` otherwise.
    pub fn download_click(is_app_store: bool, button_text: &str) -> EventData {
        let store = if is_app_store { "app_store" } else { "google_play" };
        object(json!({ "store": store, "button_text": button_text.trim() }))
    }

    pub fn feature_click(feature: &str) -> EventData {
        object(json!({ "feature": feature }))
    }

    /// `index` is zero-based; the payload reports it one-based.
    pub fn screenshot_click(index: usize, alt: Option<&str>) -> EventData {
        let position = index + 1;
        let alt = match alt {
            Some(alt) if !alt.is_empty() => alt.to_string(),
            _ => format!("Screenshot {}", position),
        };
        object(json!({ "screenshot_index": position, "screenshot_alt": alt }))
    }

    pub fn page_load(load_time_ms: f64, dom_content_loaded_ms: f64) -> EventData {
        let load_time = load_time_ms.round() as i64;
        object(json!({
            "load_time": load_time,
            "dom_content_loaded": dom_content_loaded_ms,
        }))
    }

    pub fn script_error(message: &str, filename: &str, line: u32, column: u32) -> EventData {
        object(json!({
            "message": message,
            "filename": filename,
            "lineno": line,
            "colno": column,
        }))
    }
}
