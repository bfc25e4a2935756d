//! Buy Now Testing Infrastructure
//!
//! Deterministic handlers for the `buy-now-core` effect traits and a host
//! fixture wired to them.
//!
//! ```rust,ignore
//! use buy_now_testkit::*;
//!
//! let t = TestHost::with_containers(&["x"]);
//! let id = t.host.init(InitOptions::new("x"))?;
//! assert_eq!(t.dom().button_text("x").as_deref(), Some("Buy Now"));
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

/// In-memory document
pub mod dom;
/// Scripted endpoint, clock and randomness
pub mod effects;
/// Host fixture and callback recorders
pub mod fixtures;

pub use dom::{MockDom, MockMount, MockNode};
pub use effects::{json_response, FixedRandom, MockClock, MockPurchaseEndpoint, SeededRandom};
pub use fixtures::{Recorder, TestHost, TEST_ENDPOINT};
