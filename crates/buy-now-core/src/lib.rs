//! Buy Now Core - widget host and button logic
//!
//! This crate holds everything about the Buy Now micro-frontend that does not
//! depend on a browser:
//!
//! - `WidgetHost`: registry of mounted instances with `init`, `destroy` and
//!   `inject_css`
//! - `ButtonController`: processing flag, activation flow and host callbacks
//! - `RenderTarget`: direct-container vs shadow-root render target, fixed at
//!   mount time
//! - `WidgetConfig`: typed configuration with compile-time defaults
//! - Effect interfaces (`DomEffects`, `PurchaseEffects`, time, randomness)
//!
//! Browser handlers for the effect traits live in `buy-now-mfe`; deterministic
//! handlers for tests live in `buy-now-testkit`.

#![forbid(unsafe_code)]

/// Button View controller
pub mod button;

/// Widget and host configuration
pub mod config;

/// Platform effect interfaces
pub mod effects;

/// Unified error handling
pub mod errors;

/// Callback payloads
pub mod events;

/// Currency formatting
pub mod format;

/// Widget Host registry
pub mod host;

/// Instance identifiers
pub mod identifiers;

/// Render-target resolution
pub mod target;

pub use button::{
    ActivationOutcome, ButtonAppearance, ButtonController, ButtonLabel, IgnoreReason,
};
pub use config::{ButtonSize, HostSettings, ShadowMode, WidgetConfig};
pub use effects::{
    DomEffects, EndpointResponse, PhysicalTimeEffects, PurchaseEffects, RandomEffects,
};
pub use errors::{WidgetError, WidgetResult};
pub use events::{
    Callback, FailureKind, InitInfo, PurchaseData, PurchaseFailure, WidgetCallbacks,
};
pub use format::format_price;
pub use host::{HostEffects, InitOptions, WidgetHost};
pub use identifiers::InstanceId;
pub use target::{RenderTarget, StyleScope};
