//! Browser time, randomness and purchase endpoint handlers

use async_trait::async_trait;
use buy_now_core::{
    EndpointResponse, HostEffects, PhysicalTimeEffects, PurchaseEffects, RandomEffects,
    WidgetError, WidgetResult,
};
use gloo_net::http::Request;
use std::rc::Rc;

/// `Date.now()` clock
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl PhysicalTimeEffects for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// `Math.random()` entropy
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserRandom;

impl RandomEffects for BrowserRandom {
    fn random_u64(&self) -> u64 {
        // 53 bits is all the precision a JS number carries.
        (js_sys::Math::random() * (1u64 << 53) as f64) as u64
    }
}

/// Purchase endpoint reached through `fetch`
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchPurchaseEndpoint;

#[async_trait(?Send)]
impl PurchaseEffects for FetchPurchaseEndpoint {
    async fn request(&self, url: &str) -> WidgetResult<EndpointResponse> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| WidgetError::network(e.to_string()))?;
        let status = response.status();
        let status_text = response.status_text();
        let body = response
            .text()
            .await
            .map_err(|e| WidgetError::network(e.to_string()))?;
        Ok(EndpointResponse {
            status,
            status_text,
            body,
        })
    }
}

/// Effects backed by the browser
pub fn browser_effects() -> HostEffects {
    HostEffects {
        purchase: Rc::new(FetchPurchaseEndpoint),
        time: Rc::new(BrowserClock),
        random: Rc::new(BrowserRandom),
    }
}
