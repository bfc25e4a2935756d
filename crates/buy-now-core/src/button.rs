//! Button View controller
//!
//! Holds the per-instance state of a mounted button (the processing flag and
//! whether the instance is still attached to a host) and implements the
//! activation flow. The view layer renders from `label()`/`appearance()` and
//! mirrors the processing flag through `observe_processing`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::config::WidgetConfig;
use crate::effects::{EndpointResponse, PhysicalTimeEffects, PurchaseEffects};
use crate::events::{FailureKind, InitInfo, PurchaseData, PurchaseFailure, WidgetCallbacks};
use crate::format::format_price;
use crate::WidgetResult;

/// Label shown while a request is in flight
pub const PROCESSING_LABEL: &str = "Processing...";
/// Class of the element wrapping the button
pub const SECTION_CLASS: &str = "buy-now-section";
/// Class of the button element
pub const BUTTON_CLASS: &str = "buy-now-button";
/// Extra button class while processing
pub const LOADING_CLASS: &str = "loading";
/// Class of the price segment
pub const PRICE_CLASS: &str = "button-price";

/// Why an activation was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `enabled` is false
    Disabled,
    /// A request is already in flight
    Busy,
    /// The instance was destroyed
    Detached,
}

/// Result of one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// No request was issued
    Ignored(IgnoreReason),
    /// Endpoint confirmed; `onBuyNow` was invoked if supplied
    Purchased,
    /// Endpoint answered with a non-2xx status
    Rejected {
        /// HTTP status returned
        status: u16,
    },
    /// Transport or decode failure
    Failed,
    /// The instance was destroyed while the request was in flight
    Abandoned,
}

/// Text content of the button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLabel {
    /// Label or processing text
    pub text: String,
    /// Formatted price segment, if shown
    pub price: Option<String>,
}

impl fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.price {
            Some(price) => write!(f, "{} {price}", self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Visual parameters derived from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonAppearance {
    /// CSS background color
    pub background_color: String,
    /// CSS corner radius
    pub border_radius: String,
    /// CSS font size from the size preset
    pub font_size: &'static str,
    /// CSS padding from the size preset
    pub padding: &'static str,
}

impl ButtonAppearance {
    /// Derive the appearance for `config`
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            background_color: config.effective_color().to_string(),
            border_radius: config.effective_border_radius().to_string(),
            font_size: config.size.font_size(),
            padding: config.size.padding(),
        }
    }

    /// Render as an inline `style` attribute value
    pub fn inline_style(&self) -> String {
        format!(
            "background-color: {}; border-radius: {}; font-size: {}; padding: {};",
            self.background_color, self.border_radius, self.font_size, self.padding
        )
    }
}

/// State and behavior of one mounted button
pub struct ButtonController {
    config: Rc<WidgetConfig>,
    callbacks: WidgetCallbacks,
    endpoint: String,
    purchase: Rc<dyn PurchaseEffects>,
    time: Rc<dyn PhysicalTimeEffects>,
    processing: Cell<bool>,
    attached: Cell<bool>,
    init_fired: Cell<bool>,
    observer: RefCell<Option<Rc<dyn Fn(bool)>>>,
}

impl ButtonController {
    /// Controller for one instance, attached and idle
    pub fn new(
        config: Rc<WidgetConfig>,
        callbacks: WidgetCallbacks,
        endpoint: impl Into<String>,
        purchase: Rc<dyn PurchaseEffects>,
        time: Rc<dyn PhysicalTimeEffects>,
    ) -> Self {
        Self {
            config,
            callbacks,
            endpoint: endpoint.into(),
            purchase,
            time,
            processing: Cell::new(false),
            attached: Cell::new(true),
            init_fired: Cell::new(false),
            observer: RefCell::new(None),
        }
    }

    /// Frozen instance configuration
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Whether a request is in flight
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// False once the host destroyed the instance
    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Whether the rendered control should be disabled
    pub fn is_disabled(&self) -> bool {
        !self.config.enabled || self.processing.get()
    }

    /// Register the view's mirror of the processing flag
    pub fn observe_processing(&self, observer: impl Fn(bool) + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    /// Lifecycle hook run once the view is mounted. Fires `onInit` at most
    /// once per controller.
    pub fn notify_mounted(&self) {
        if !self.attached.get() || self.init_fired.replace(true) {
            return;
        }
        if let Some(on_init) = &self.callbacks.on_init {
            on_init(InitInfo {
                available: true,
                config: (*self.config).clone(),
                product_id: self.config.product_id.clone(),
                timestamp: self.time.now_iso(),
            });
        }
    }

    /// Detach from the host. Responses settling afterwards are dropped.
    pub fn detach(&self) {
        self.attached.set(false);
        self.observer.borrow_mut().take();
    }

    /// Label for the current state
    pub fn label(&self) -> ButtonLabel {
        if self.processing.get() {
            ButtonLabel {
                text: PROCESSING_LABEL.to_string(),
                price: None,
            }
        } else {
            self.idle_label()
        }
    }

    /// Label shown while no request is in flight
    pub fn idle_label(&self) -> ButtonLabel {
        let config = &self.config;
        let price = (config.show_price && config.product_price > 0.0)
            .then(|| format_price(config.product_price, config.effective_currency()));
        ButtonLabel {
            text: config.effective_label().to_string(),
            price,
        }
    }

    /// Inline styling derived from the configuration
    pub fn appearance(&self) -> ButtonAppearance {
        ButtonAppearance::from_config(&self.config)
    }

    /// Button class list for the current state
    pub fn class_name(&self) -> String {
        if self.processing.get() {
            format!("{BUTTON_CLASS} {LOADING_CLASS}")
        } else {
            BUTTON_CLASS.to_string()
        }
    }

    /// Handle a user activation.
    ///
    /// At most one request is in flight per controller. The processing flag
    /// is cleared however the request settles.
    pub async fn activate(&self) -> ActivationOutcome {
        if !self.config.enabled {
            return ActivationOutcome::Ignored(IgnoreReason::Disabled);
        }
        if !self.attached.get() {
            return ActivationOutcome::Ignored(IgnoreReason::Detached);
        }
        if self.processing.get() {
            return ActivationOutcome::Ignored(IgnoreReason::Busy);
        }

        self.set_processing(true);
        let result = self.purchase.request(&self.endpoint).await;

        if !self.attached.get() {
            self.processing.set(false);
            tracing::debug!(product_id = %self.config.product_id, "response after destroy dropped");
            return ActivationOutcome::Abandoned;
        }

        let outcome = self.settle(result);
        self.set_processing(false);
        outcome
    }

    fn settle(&self, result: WidgetResult<EndpointResponse>) -> ActivationOutcome {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "purchase endpoint call failed");
                self.report(FailureKind::Network, err.to_string(), None);
                return ActivationOutcome::Failed;
            }
        };

        if !response.is_success() {
            tracing::warn!(
                status = response.status,
                status_text = %response.status_text,
                "purchase endpoint request failed"
            );
            self.report(
                FailureKind::Http,
                format!("{} {}", response.status, response.status_text),
                Some(response.status),
            );
            return ActivationOutcome::Rejected {
                status: response.status,
            };
        }

        let body: Value = match serde_json::from_str(&response.body) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "purchase endpoint returned invalid JSON");
                self.report(FailureKind::Parse, err.to_string(), None);
                return ActivationOutcome::Failed;
            }
        };
        tracing::debug!(response = %body, "purchase confirmed");

        if let Some(on_buy_now) = &self.callbacks.on_buy_now {
            let config = &self.config;
            on_buy_now(PurchaseData {
                product_id: config.product_id.clone(),
                product_name: config.product_name.clone(),
                product_price: config.product_price,
                product_currency: config.effective_currency().to_string(),
                timestamp: self.time.now_iso(),
                api_response: body,
            });
        }
        ActivationOutcome::Purchased
    }

    fn report(&self, kind: FailureKind, message: String, status: Option<u16>) {
        if let Some(on_error) = &self.callbacks.on_error {
            on_error(PurchaseFailure {
                kind,
                message,
                status,
                product_id: self.config.product_id.clone(),
                timestamp: self.time.now_iso(),
            });
        }
    }

    fn set_processing(&self, processing: bool) {
        self.processing.set(processing);
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(processing);
        }
    }
}

impl fmt::Debug for ButtonController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonController")
            .field("product_id", &self.config.product_id)
            .field("endpoint", &self.endpoint)
            .field("processing", &self.processing.get())
            .field("attached", &self.attached.get())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ButtonSize;

    #[test]
    fn appearance_follows_size() {
        let config = WidgetConfig {
            size: ButtonSize::Large,
            color: "#123456".into(),
            ..WidgetConfig::default()
        };
        let appearance = ButtonAppearance::from_config(&config);
        assert_eq!(appearance.font_size, "18px");
        assert_eq!(appearance.padding, "16px 32px");
        assert_eq!(
            appearance.inline_style(),
            "background-color: #123456; border-radius: 12px; font-size: 18px; padding: 16px 32px;"
        );
    }

    #[test]
    fn label_display_joins_price() {
        let label = ButtonLabel {
            text: "Buy Now".into(),
            price: Some("$19.99".into()),
        };
        assert_eq!(label.to_string(), "Buy Now $19.99");
    }
}
