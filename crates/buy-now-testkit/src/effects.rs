//! Scripted purchase endpoint, controllable clock and seeded randomness

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use buy_now_core::{
    EndpointResponse, PhysicalTimeEffects, PurchaseEffects, RandomEffects, WidgetError,
    WidgetResult,
};
use futures::channel::oneshot;
use serde_json::Value;

enum Scripted {
    Ready(WidgetResult<EndpointResponse>),
    Deferred(oneshot::Receiver<WidgetResult<EndpointResponse>>),
}

/// Purchase endpoint answering from a queue of scripted replies.
///
/// Requests with nothing scripted fail with a network error.
#[derive(Default)]
pub struct MockPurchaseEndpoint {
    script: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<String>>,
}

impl MockPurchaseEndpoint {
    /// Endpoint with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply with `status`
    pub fn respond_json(&self, status: u16, body: Value) -> &Self {
        self.respond_text(status, &body.to_string())
    }

    /// Queue a raw-body reply with `status`
    pub fn respond_text(&self, status: u16, body: &str) -> &Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(EndpointResponse {
                status,
                status_text: reason_phrase(status).to_string(),
                body: body.to_string(),
            })));
        self
    }

    /// Queue a transport failure
    pub fn fail(&self, message: &str) -> &Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Err(WidgetError::network(message))));
        self
    }

    /// Queue a reply the test settles later through the returned sender
    pub fn defer(&self) -> oneshot::Sender<WidgetResult<EndpointResponse>> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Deferred(rx));
        tx
    }

    /// Number of requests issued so far
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// URLs requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PurchaseEffects for MockPurchaseEndpoint {
    async fn request(&self, url: &str) -> WidgetResult<EndpointResponse> {
        self.requests.borrow_mut().push(url.to_string());
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(WidgetError::network("request cancelled"))),
            None => Err(WidgetError::network("no scripted response")),
        }
    }
}

/// Build a JSON response for settling deferred requests
pub fn json_response(status: u16, body: &Value) -> EndpointResponse {
    EndpointResponse {
        status,
        status_text: reason_phrase(status).to_string(),
        body: body.to_string(),
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct MockClock {
    now_ms: Cell<u64>,
}

impl MockClock {
    /// Clock reading `now_ms`
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(1_699_999_999_999)
    }
}

impl PhysicalTimeEffects for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Deterministic xorshift generator
#[derive(Debug)]
pub struct SeededRandom {
    state: Cell<u64>,
}

impl SeededRandom {
    /// Generator seeded with `seed` (zero is bumped to one)
    pub fn new(seed: u64) -> Self {
        Self {
            state: Cell::new(seed.max(1)),
        }
    }
}

impl RandomEffects for SeededRandom {
    fn random_u64(&self) -> u64 {
        let mut x = self.state.get();
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state.set(x);
        x
    }
}

/// Source returning the same value on every draw
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub u64);

impl RandomEffects for FixedRandom {
    fn random_u64(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        assert_eq!(a.random_u64(), b.random_u64());
        assert_ne!(a.random_u64(), a.random_u64());
    }

    #[test]
    fn scripted_replies_are_served_in_order() {
        let endpoint = MockPurchaseEndpoint::new();
        endpoint.respond_json(200, serde_json::json!({"id": 1})).fail("down");

        let first = futures::executor::block_on(endpoint.request("u"));
        let second = futures::executor::block_on(endpoint.request("u"));
        assert_eq!(first.map(|r| r.status), Ok(200));
        assert!(matches!(second, Err(WidgetError::Network { .. })));
        assert_eq!(endpoint.request_count(), 2);
    }
}
