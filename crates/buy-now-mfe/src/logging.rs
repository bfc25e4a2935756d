//! Browser logging setup

use std::sync::Once;

static INIT: Once = Once::new();

/// Route panics and `tracing` events to the browser console. Idempotent.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    INIT.call_once(tracing_wasm::set_as_global_default);
}
