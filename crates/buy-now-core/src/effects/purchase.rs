//! Purchase endpoint effect interface

use async_trait::async_trait;

use crate::WidgetResult;

/// Raw response from the purchase endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// HTTP status text
    pub status_text: String,
    /// Undecoded response body
    pub body: String,
}

impl EndpointResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound purchase confirmation request.
///
/// Browser futures are not `Send`, so neither is this trait.
#[async_trait(?Send)]
pub trait PurchaseEffects {
    /// Issue one unauthenticated GET to `url`
    ///
    /// Transport failures are `WidgetError::Network`; any HTTP status,
    /// including errors, is a successful request.
    async fn request(&self, url: &str) -> WidgetResult<EndpointResponse>;
}
