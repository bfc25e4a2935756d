//! Buy Now MFE - browser build of the Buy Now widget
//!
//! Wires `buy-now-core` to the page: a web-sys `DomEffects` handler, a
//! Leptos view for the button, `fetch`-backed purchase confirmation, and the
//! `BuyNowMFE` class installed on `window` when the module starts.

#![cfg(target_arch = "wasm32")]
// wasm-bindgen exports expand to `#[export_name]` items and unsafe ABI glue.
#![allow(unsafe_code)]

/// `BuyNowMFE` class exposed to the page
pub mod bindings;
/// web-sys document handler
pub mod dom;
/// JS error conversions
pub mod error;
/// Console logging setup
pub mod logging;
/// Browser clock, randomness and endpoint
pub mod platform;
/// Leptos button component
pub mod view;

pub use bindings::{install_global, BuyNowMfe};
pub use dom::WebDom;
pub use error::to_js_error;
pub use logging::init_logging;
pub use platform::{browser_effects, BrowserClock, BrowserRandom, FetchPurchaseEndpoint};
pub use view::BuyNowButton;

use buy_now_core::HostSettings;
use wasm_bindgen::prelude::*;

/// Module entry point: set up logging and publish the global host
#[wasm_bindgen(start)]
pub fn start() {
    init_logging();

    let settings = HostSettings::default();
    let global_name = settings.global_name.clone();
    let installed = BuyNowMfe::with_settings(settings)
        .map_err(|e| to_js_error(&e))
        .and_then(|mfe| install_global(&global_name, mfe));
    if let Err(err) = installed {
        tracing::error!(error = %error::js_message(&err), "could not install Buy Now widget");
    }
}
