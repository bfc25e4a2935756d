//! Conversions between widget errors and JavaScript values

use buy_now_core::WidgetError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Convert a widget error into a JS `Error` whose `name` is the error kind
pub fn to_js_error(err: &WidgetError) -> JsValue {
    let js = js_sys::Error::new(&err.to_string());
    js.set_name(err.kind());
    js.into()
}

/// Best-effort message of a thrown JS value
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| "Unknown JavaScript error".to_string())
}

/// Render error from a thrown JS value
pub fn render_error(value: JsValue) -> WidgetError {
    WidgetError::render(js_message(&value))
}
