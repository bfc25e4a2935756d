//! Effect interfaces for platform access
//!
//! The widget host and button controller never touch the browser directly.
//! Every side effect goes through one of these traits:
//! - `DomEffects`: container lookup, shadow roots, mounting, style injection
//! - `PurchaseEffects`: the outbound purchase confirmation request
//! - `PhysicalTimeEffects`, `RandomEffects`: timestamps and id entropy
//!
//! Browser handlers live in `buy-now-mfe`; deterministic handlers for tests
//! live in `buy-now-testkit`.

/// Document access
pub mod dom;
/// Purchase confirmation endpoint
pub mod purchase;
/// Clock and entropy
pub mod time;

pub use dom::DomEffects;
pub use purchase::{EndpointResponse, PurchaseEffects};
pub use time::{PhysicalTimeEffects, RandomEffects};
