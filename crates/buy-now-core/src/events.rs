//! Records handed to host page callbacks

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::WidgetConfig;

/// Payload of `onInit`, fired once when an instance mounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitInfo {
    /// Always true once mounted
    pub available: bool,
    /// Effective configuration
    pub config: WidgetConfig,
    /// Configured product id
    pub product_id: String,
    /// Mount time, ISO 8601
    pub timestamp: String,
}

/// Payload of `onBuyNow`, fired after a successful confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseData {
    /// Configured product id
    pub product_id: String,
    /// Configured product name
    pub product_name: String,
    /// Configured price
    pub product_price: f64,
    /// Effective currency code
    pub product_currency: String,
    /// Confirmation time, ISO 8601
    pub timestamp: String,
    /// Decoded endpoint response body
    pub api_response: Value,
}

/// Why a purchase attempt did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Endpoint answered with a non-2xx status
    Http,
    /// Endpoint could not be reached
    Network,
    /// Response body was not JSON
    Parse,
}

/// Payload of `onError`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable cause
    pub message: String,
    /// HTTP status, for `http` failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Configured product id
    pub product_id: String,
    /// Failure time, ISO 8601
    pub timestamp: String,
}

/// Host page callback
pub type Callback<T> = Rc<dyn Fn(T)>;

/// Optional callbacks supplied to `init`
#[derive(Clone, Default)]
pub struct WidgetCallbacks {
    /// Fired once after mount
    pub on_init: Option<Callback<InitInfo>>,
    /// Fired after a confirmed purchase
    pub on_buy_now: Option<Callback<PurchaseData>>,
    /// Fired when a purchase attempt fails
    pub on_error: Option<Callback<PurchaseFailure>>,
}

impl WidgetCallbacks {
    /// Set the `onInit` callback
    pub fn on_init(mut self, f: impl Fn(InitInfo) + 'static) -> Self {
        self.on_init = Some(Rc::new(f));
        self
    }

    /// Set the `onBuyNow` callback
    pub fn on_buy_now(mut self, f: impl Fn(PurchaseData) + 'static) -> Self {
        self.on_buy_now = Some(Rc::new(f));
        self
    }

    /// Set the `onError` callback
    pub fn on_error(mut self, f: impl Fn(PurchaseFailure) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for WidgetCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetCallbacks")
            .field("on_init", &self.on_init.is_some())
            .field("on_buy_now", &self.on_buy_now.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
