//! Ready-made host fixture and callback recorders

use std::cell::RefCell;
use std::rc::Rc;

use buy_now_core::{HostEffects, HostSettings, WidgetHost};

use crate::dom::MockDom;
use crate::effects::{MockClock, MockPurchaseEndpoint, SeededRandom};

/// Endpoint URL the fixture host is configured with
pub const TEST_ENDPOINT: &str = "https://purchase.test/confirm";

/// Widget host wired to mock effects
pub struct TestHost {
    /// Host under test
    pub host: WidgetHost<MockDom>,
    /// Scripted purchase endpoint shared with the host
    pub endpoint: Rc<MockPurchaseEndpoint>,
    /// Clock shared with the host
    pub clock: Rc<MockClock>,
}

impl TestHost {
    /// Host over `dom` with a fresh endpoint, clock and seeded randomness
    pub fn with_dom(dom: MockDom) -> Self {
        let endpoint = Rc::new(MockPurchaseEndpoint::new());
        let clock = Rc::new(MockClock::default());
        let effects = HostEffects {
            purchase: endpoint.clone(),
            time: clock.clone(),
            random: Rc::new(SeededRandom::new(7)),
        };
        let host = WidgetHost::new(dom, effects)
            .with_settings(HostSettings::default().with_endpoint(TEST_ENDPOINT));
        Self {
            host,
            endpoint,
            clock,
        }
    }

    /// Host over a document holding one empty container per id
    pub fn with_containers(ids: &[&str]) -> Self {
        let dom = MockDom::new();
        for id in ids {
            dom.add_container(id);
        }
        Self::with_dom(dom)
    }

    /// The host's document
    pub fn dom(&self) -> &MockDom {
        self.host.dom()
    }
}

/// Records every value passed to a callback
pub struct Recorder<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> Recorder<T> {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback appending to this recorder
    pub fn callback(&self) -> impl Fn(T) + 'static {
        let calls = Rc::clone(&self.calls);
        move |value| calls.borrow_mut().push(value)
    }

    /// Number of recorded calls
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Every recorded value, oldest first
    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }

    /// Most recent value
    pub fn last(&self) -> Option<T> {
        self.calls.borrow().last().cloned()
    }
}
