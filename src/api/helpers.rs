//! Shared helpers for the JavaScript boundary
//!
//! Serialization to JavaScript plus reading the host's constructor
//! options. Failures are logged here so callers can fall back quietly.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::ToolError;
use crate::models::ToolConfig;

// ============================================================================
// Serialization Helpers
// ============================================================================

/// Serialize a value to a plain JavaScript object (`None` becomes `null`)
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| {
            let msg = format!("{}: {}", error_context, e);
            log::error!("{}", msg);
            JsValue::from_str(&msg)
        })
}

// ============================================================================
// Host Options
// ============================================================================

/// Own property `key` of a JS object; `undefined` and `null` read as absent
pub fn property(object: &JsValue, key: &str) -> Option<JsValue> {
    if !object.is_object() {
        return None;
    }
    js_sys::Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Tool config from the `{ api, config }` constructor argument.
/// A missing `config` gives the defaults.
pub fn config_from_options(options: &JsValue) -> Result<ToolConfig, ToolError> {
    let Some(config) = property(options, "config") else {
        return Ok(ToolConfig::default());
    };
    serde_wasm_bindgen::from_value(config).map_err(|e| ToolError::Config(e.to_string()))
}

/// Error value handed back to JavaScript
pub fn to_js_error(err: impl Into<ToolError>) -> JsValue {
    let err = err.into();
    log::error!("{}", err);
    JsValue::from_str(&err.to_string())
}
