//! Widget and host configuration
//!
//! `WidgetConfig` is the flat record a host page passes to `init`. Every field
//! has a compile-time default; keys the widget does not know are carried in
//! `extra` so they round-trip back to the host untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Default button background color
pub const DEFAULT_COLOR: &str = "#FF3B30";
/// Default idle label
pub const DEFAULT_LABEL: &str = "Buy Now";
/// Default corner radius
pub const DEFAULT_BORDER_RADIUS: &str = "12px";
/// Default ISO 4217 currency code
pub const DEFAULT_CURRENCY: &str = "USD";
/// Default purchase confirmation endpoint
pub const DEFAULT_PURCHASE_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos/1";
/// Name the widget is published under on the global scope
pub const DEFAULT_GLOBAL_NAME: &str = "BuyNowMFE";

/// Button size preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ButtonSize {
    /// 14px text
    Small,
    /// 16px text
    #[default]
    Medium,
    /// 18px text
    Large,
}

impl From<String> for ButtonSize {
    fn from(value: String) -> Self {
        match value.as_str() {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Medium,
        }
    }
}

impl ButtonSize {
    /// CSS font size for this preset
    pub fn font_size(self) -> &'static str {
        match self {
            Self::Small => "14px",
            Self::Medium => "16px",
            Self::Large => "18px",
        }
    }

    /// CSS padding for this preset
    pub fn padding(self) -> &'static str {
        match self {
            Self::Small => "10px 20px",
            Self::Medium => "14px 28px",
            Self::Large => "16px 32px",
        }
    }
}

/// Shadow root encapsulation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ShadowMode {
    /// Root reachable through `element.shadowRoot`
    #[default]
    Open,
    /// Root hidden from page scripts
    Closed,
}

impl From<String> for ShadowMode {
    fn from(value: String) -> Self {
        if value == "closed" {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

/// Per-instance widget configuration.
///
/// Fields missing from the caller's record take their defaults (shallow
/// merge). A field given as `null` overrides its default with the empty
/// value, matching a spread of `{...defaults, ...config}`: blank strings fall
/// back at render time, flags read as false and the price as zero. The record
/// is frozen once the instance is mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Button background color
    #[serde(deserialize_with = "null_as_empty")]
    pub color: String,
    /// Font size and padding preset
    #[serde(deserialize_with = "null_as_empty")]
    pub size: ButtonSize,
    /// Idle label
    #[serde(deserialize_with = "null_as_empty")]
    pub label: String,
    /// When false the button ignores activation
    #[serde(deserialize_with = "null_as_empty")]
    pub enabled: bool,
    /// Button corner radius
    #[serde(deserialize_with = "null_as_empty")]
    pub border_radius: String,
    /// Append the formatted price to the label
    #[serde(deserialize_with = "null_as_empty")]
    pub show_price: bool,
    /// Purchasable item identifier
    #[serde(deserialize_with = "null_as_empty")]
    pub product_id: String,
    /// Purchasable item display name
    #[serde(deserialize_with = "null_as_empty")]
    pub product_name: String,
    /// Item price in `product_currency` units
    #[serde(deserialize_with = "null_as_empty")]
    pub product_price: f64,
    /// ISO 4217 currency code
    #[serde(deserialize_with = "null_as_empty")]
    pub product_currency: String,
    /// Mount inside an isolated shadow root
    #[serde(rename = "useShadowDOM", deserialize_with = "null_as_empty")]
    pub use_shadow_dom: bool,
    /// Shadow root mode, only read when `use_shadow_dom` is set
    #[serde(rename = "shadowDOMMode", deserialize_with = "null_as_empty")]
    pub shadow_dom_mode: ShadowMode,
    /// Unrecognized keys, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            size: ButtonSize::Medium,
            label: DEFAULT_LABEL.to_string(),
            enabled: true,
            border_radius: DEFAULT_BORDER_RADIUS.to_string(),
            show_price: true,
            product_id: String::new(),
            product_name: String::new(),
            product_price: 0.0,
            product_currency: DEFAULT_CURRENCY.to_string(),
            use_shadow_dom: false,
            shadow_dom_mode: ShadowMode::Open,
            extra: Map::new(),
        }
    }
}

impl WidgetConfig {
    /// Merge a loosely-typed override record over the defaults
    pub fn from_overrides(overrides: Value) -> Result<Self, serde_json::Error> {
        match overrides {
            Value::Null => Ok(Self::default()),
            other => serde_json::from_value(other),
        }
    }

    /// Label shown while idle, falling back to the default when blank
    pub fn effective_label(&self) -> &str {
        non_empty_or(&self.label, DEFAULT_LABEL)
    }

    /// Background color, falling back to the default when blank
    pub fn effective_color(&self) -> &str {
        non_empty_or(&self.color, DEFAULT_COLOR)
    }

    /// Corner radius, falling back to the default when blank
    pub fn effective_border_radius(&self) -> &str {
        non_empty_or(&self.border_radius, DEFAULT_BORDER_RADIUS)
    }

    /// Currency code, falling back to the default when blank
    pub fn effective_currency(&self) -> &str {
        non_empty_or(&self.product_currency, DEFAULT_CURRENCY)
    }
}

/// An explicit `null` deserializes to the type's empty value
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Settings shared by every instance of one widget host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    /// Purchase confirmation endpoint queried on activation
    pub endpoint: String,
    /// Global property the host is published under
    pub global_name: String,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PURCHASE_ENDPOINT.to_string(),
            global_name: DEFAULT_GLOBAL_NAME.to_string(),
        }
    }
}

impl HostSettings {
    /// Replace the purchase endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_replace_defaults_key_by_key() {
        let config = WidgetConfig::from_overrides(json!({
            "color": "#000",
            "productPrice": 19.99,
            "useShadowDOM": true,
            "shadowDOMMode": "closed"
        }))
        .unwrap();

        assert_eq!(config.color, "#000");
        assert_eq!(config.product_price, 19.99);
        assert!(config.use_shadow_dom);
        assert_eq!(config.shadow_dom_mode, ShadowMode::Closed);
        assert_eq!(config.label, DEFAULT_LABEL);
        assert_eq!(config.product_currency, "USD");
        assert!(config.enabled);
    }

    #[test]
    fn null_overrides_yield_defaults() {
        assert_eq!(
            WidgetConfig::from_overrides(Value::Null).unwrap(),
            WidgetConfig::default()
        );
    }

    #[test]
    fn null_fields_are_accepted_as_empty() {
        let config = WidgetConfig::from_overrides(json!({
            "label": null,
            "productPrice": null,
            "productName": null,
            "size": null,
            "enabled": null,
            "productCurrency": null,
            "shadowDOMMode": null
        }))
        .unwrap();

        assert_eq!(config.effective_label(), DEFAULT_LABEL);
        assert_eq!(config.product_price, 0.0);
        assert_eq!(config.product_name, "");
        assert_eq!(config.size, ButtonSize::Medium);
        assert!(!config.enabled);
        assert_eq!(config.effective_currency(), DEFAULT_CURRENCY);
        assert_eq!(config.shadow_dom_mode, ShadowMode::Open);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn unknown_size_and_mode_fall_back() {
        let config =
            WidgetConfig::from_overrides(json!({"size": "huge", "shadowDOMMode": "weird"}))
                .unwrap();
        assert_eq!(config.size, ButtonSize::Medium);
        assert_eq!(config.shadow_dom_mode, ShadowMode::Open);
    }

    #[test]
    fn unknown_keys_pass_through() {
        let config = WidgetConfig::from_overrides(json!({"theme": "dark"})).unwrap();
        assert_eq!(config.extra.get("theme"), Some(&json!("dark")));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["theme"], json!("dark"));
        assert_eq!(back["useShadowDOM"], json!(false));
        assert_eq!(back["size"], json!("medium"));
    }

    #[test]
    fn blank_strings_use_defaults_at_render_time() {
        let config = WidgetConfig {
            label: String::new(),
            product_currency: String::new(),
            ..WidgetConfig::default()
        };
        assert_eq!(config.effective_label(), "Buy Now");
        assert_eq!(config.effective_currency(), "USD");
    }

    #[test]
    fn size_presets() {
        assert_eq!(ButtonSize::Large.font_size(), "18px");
        assert_eq!(ButtonSize::Small.padding(), "10px 20px");
    }
}
