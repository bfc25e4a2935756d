//! JavaScript-facing `BuyNowMFE` class and global installation

use std::rc::Rc;

use buy_now_core::{
    Callback, HostSettings, InitOptions, InstanceId, WidgetCallbacks, WidgetConfig, WidgetError,
    WidgetHost,
};
use gloo_timers::callback::Timeout;
use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::WebDom;
use crate::error::{js_message, to_js_error};
use crate::platform::browser_effects;

/// Widget host exposed to the embedding page
#[wasm_bindgen(js_name = BuyNowMFE)]
pub struct BuyNowMfe {
    host: WidgetHost<WebDom>,
}

impl BuyNowMfe {
    /// Host over the live document with browser effects and `settings`
    pub fn with_settings(settings: HostSettings) -> Result<Self, WidgetError> {
        let host = WidgetHost::new(WebDom::new()?, browser_effects()).with_settings(settings);
        Ok(Self { host })
    }

    /// The underlying widget host
    pub fn host(&self) -> &WidgetHost<WebDom> {
        &self.host
    }
}

#[wasm_bindgen(js_class = BuyNowMFE)]
impl BuyNowMfe {
    /// Host using the default purchase endpoint
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BuyNowMfe, JsValue> {
        Self::with_settings(HostSettings::default()).map_err(|e| to_js_error(&e))
    }

    /// Host querying `endpoint` on activation
    #[wasm_bindgen(js_name = withEndpoint)]
    pub fn with_endpoint(endpoint: String) -> Result<BuyNowMfe, JsValue> {
        Self::with_settings(HostSettings::default().with_endpoint(endpoint))
            .map_err(|e| to_js_error(&e))
    }

    /// Mount a widget. `options` carries `containerId`, an optional `config`
    /// record and optional `onInit`, `onBuyNow` and `onError` functions.
    pub fn init(&self, options: JsValue) -> Result<String, JsValue> {
        let options = parse_options(&options).map_err(|e| to_js_error(&e))?;
        self.host
            .init(options)
            .map(|id| id.as_str().to_string())
            .map_err(|e| to_js_error(&e))
    }

    /// Unmount an instance. Unknown ids are ignored.
    pub fn destroy(&self, instance_id: &str) {
        self.host.destroy(&InstanceId::from(instance_id));
    }

    /// Unmount every instance
    #[wasm_bindgen(js_name = destroyAll)]
    pub fn destroy_all(&self) {
        self.host.destroy_all();
    }

    /// Append `css` to an instance's custom style element. Without an id the
    /// first mounted instance is used.
    #[wasm_bindgen(js_name = injectCSS)]
    pub fn inject_css(&self, css: &str, instance_id: Option<String>) -> bool {
        // An empty id means "no id", as with a falsy JS argument.
        let instance_id = instance_id.filter(|id| !id.is_empty()).map(InstanceId::from);
        self.host.inject_css(css, instance_id.as_ref())
    }

    /// Number of mounted instances
    #[wasm_bindgen(getter = instanceCount)]
    pub fn instance_count(&self) -> usize {
        self.host.len()
    }
}

fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    if !target.is_object() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn parse_options(options: &JsValue) -> Result<InitOptions, WidgetError> {
    let container_id = property(options, "containerId").and_then(|id| id.as_string());

    let config = match property(options, "config") {
        Some(raw) => {
            let overrides: serde_json::Value = serde_wasm_bindgen::from_value(raw)
                .map_err(|e| WidgetError::configuration(format!("invalid config: {e}")))?;
            WidgetConfig::from_overrides(overrides)
                .map_err(|e| WidgetError::configuration(format!("invalid config: {e}")))?
        }
        None => WidgetConfig::default(),
    };

    let callbacks = WidgetCallbacks {
        on_init: js_callback(options, "onInit"),
        on_buy_now: js_callback(options, "onBuyNow"),
        on_error: js_callback(options, "onError"),
    };

    Ok(InitOptions {
        container_id,
        config,
        callbacks,
    })
}

/// Wrap a JS function so it receives the payload as a plain JSON object.
/// Exceptions thrown by the page are logged and swallowed.
fn js_callback<T: Serialize + 'static>(options: &JsValue, key: &'static str) -> Option<Callback<T>> {
    let function = property(options, key)?.dyn_into::<Function>().ok()?;
    Some(Rc::new(move |payload: T| {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let value = match payload.serialize(&serializer) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(callback = key, error = %err, "could not serialize callback payload");
                return;
            }
        };
        if let Err(err) = function.call1(&JsValue::NULL, &value) {
            tracing::error!(callback = key, error = %js_message(&err), "host callback threw");
        }
    }))
}

/// Publish `mfe` as `window[name]`. A zero-delay check re-publishes it if a
/// page script replaced the global with something that cannot `init`.
pub fn install_global(name: &str, mfe: BuyNowMfe) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let value = JsValue::from(mfe);
    let key = JsValue::from_str(name);
    Reflect::set(&window, &key, &value)?;

    let name = name.to_string();
    Timeout::new(0, move || {
        let current = Reflect::get(&window, &key).unwrap_or(JsValue::UNDEFINED);
        let has_init = property(&current, "init").is_some_and(|init| init.is_function());
        if !has_init && Reflect::set(&window, &key, &value).is_ok() {
            tracing::info!(global = %name, "BuyNowMFE: Set global instance");
        }
    })
    .forget();
    Ok(())
}
