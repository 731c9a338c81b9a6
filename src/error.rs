// Typed errors with thiserror. Surface meaningful messages to JS.
// Handlers log these and carry on; only mount and the exported API return them.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Page error types.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Browser global unavailable: {0}")]
    MissingGlobal(&'static str),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::Serialization(err.to_string())
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Dom(describe_js(&value))
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
