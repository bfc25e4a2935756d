//! Widget host mount/unmount lifecycle against the in-memory DOM

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::rc::Rc;

use buy_now_core::{
    DomEffects, HostEffects, InitOptions, InstanceId, ShadowMode, WidgetCallbacks, WidgetConfig,
    WidgetError, WidgetHost,
};
use buy_now_testkit::{FixedRandom, MockClock, MockDom, MockPurchaseEndpoint, Recorder, TestHost};
use serde_json::json;

fn product_config() -> WidgetConfig {
    WidgetConfig::from_overrides(json!({
        "productId": "p1",
        "productPrice": 19.99,
        "productCurrency": "USD",
        "enabled": true
    }))
    .unwrap()
}

#[test]
fn init_returns_distinct_ids_and_destroy_empties_container() {
    let t = TestHost::with_containers(&["x", "y"]);

    let a = t.host.init(InitOptions::new("x")).unwrap();
    let b = t.host.init(InitOptions::new("y")).unwrap();
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("buy-now-1699999999999-"));
    assert_eq!(t.host.len(), 2);
    assert_eq!(t.dom().mounted_count(), 2);

    t.host.destroy(&a);
    let x = t.dom().container("x").unwrap();
    assert_eq!(x.child_count(), 0);
    assert!(!t.host.contains(&a));
    assert!(t.host.contains(&b));
    assert_eq!(t.dom().mounted_count(), 1);
}

#[test]
fn reinit_on_same_container_replaces_previous_instance() {
    let t = TestHost::with_containers(&["x"]);
    let a = t.host.init(InitOptions::new("x")).unwrap();
    let b = t
        .host
        .init(InitOptions::new("x").with_config(product_config()))
        .unwrap();

    assert_ne!(a, b);
    assert!(!t.host.contains(&a));
    assert_eq!(t.host.instance_ids(), vec![b.clone()]);
    assert_eq!(t.host.config(&b).unwrap().product_id, "p1");
    assert_eq!(t.dom().mounted_count(), 1);
    assert_eq!(t.dom().container("x").unwrap().child_count(), 1);

    // Destroying the replaced id must leave the live view alone.
    t.host.destroy(&a);
    assert!(t.host.contains(&b));
    assert_eq!(t.dom().mounted_count(), 1);
    assert_eq!(t.dom().button_text("x").as_deref(), Some("Buy Now $19.99"));
}

#[test]
fn repeated_entropy_still_yields_unique_ids() {
    let dom = MockDom::new();
    for id in ["x", "y", "z"] {
        dom.add_container(id);
    }
    let effects = HostEffects {
        purchase: Rc::new(MockPurchaseEndpoint::new()),
        time: Rc::new(MockClock::default()),
        random: Rc::new(FixedRandom(42)),
    };
    let host = WidgetHost::new(dom, effects);

    let ids: Vec<InstanceId> = ["x", "y", "z"]
        .iter()
        .map(|c| host.init(InitOptions::new(*c)).unwrap())
        .collect();
    assert_eq!(host.len(), 3);
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
}

#[test]
fn null_config_fields_mount_with_fallbacks() {
    let t = TestHost::with_containers(&["x"]);
    let config = WidgetConfig::from_overrides(json!({"label": null, "productPrice": null})).unwrap();
    let id = t.host.init(InitOptions::new("x").with_config(config)).unwrap();

    assert!(t.host.contains(&id));
    assert_eq!(t.dom().button_text("x").as_deref(), Some("Buy Now"));
}

#[test]
fn missing_container_id_is_a_configuration_error() {
    let t = TestHost::with_containers(&[]);
    let err = t.host.init(InitOptions::default()).unwrap_err();
    assert_eq!(err.kind(), "ConfigurationError");
    assert_eq!(err.to_string(), "containerId is required");

    let err = t.host.init(InitOptions::new("")).unwrap_err();
    assert_eq!(err.kind(), "ConfigurationError");
}

#[test]
fn unknown_container_is_a_configuration_error() {
    let t = TestHost::with_containers(&["x"]);
    let err = t.host.init(InitOptions::new("nope")).unwrap_err();
    assert!(matches!(err, WidgetError::Configuration { .. }));
    assert_eq!(err.to_string(), "Container with id \"nope\" not found");
    assert!(t.host.is_empty());
}

#[test]
fn destroy_of_unknown_or_destroyed_id_is_a_noop() {
    let t = TestHost::with_containers(&["x"]);
    t.host.destroy(&InstanceId::from("buy-now-0-unknown"));

    let id = t.host.init(InitOptions::new("x")).unwrap();
    t.host.destroy(&id);
    t.host.destroy(&id);
    assert!(t.host.is_empty());
}

#[test]
fn existing_container_content_is_replaced() {
    let t = TestHost::with_containers(&["x"]);
    let container = t.dom().container("x").unwrap();
    container.set_text("placeholder");

    t.host.init(InitOptions::new("x")).unwrap();
    assert_eq!(container.text_content(), "Buy Now");
}

#[test]
fn mount_failure_paints_inline_error_and_is_not_registered() {
    let t = TestHost::with_containers(&["x"]);
    t.dom().fail_next_mount("view exploded");

    let err = t.host.init(InitOptions::new("x")).unwrap_err();
    assert_eq!(err.kind(), "RenderError");
    assert!(t.host.is_empty());

    let container = t.dom().container("x").unwrap();
    let message = container.children()[0].clone();
    assert_eq!(message.own_text(), "Error: view exploded");
    assert_eq!(
        message.attribute("style").as_deref(),
        Some("color: red; padding: 10px;")
    );
}

#[test]
fn on_init_fires_once_at_mount() {
    let t = TestHost::with_containers(&["x"]);
    let inits = Recorder::new();
    let callbacks = WidgetCallbacks::default().on_init(inits.callback());

    let id = t
        .host
        .init(
            InitOptions::new("x")
                .with_config(product_config())
                .with_callbacks(callbacks),
        )
        .unwrap();

    assert_eq!(inits.count(), 1);
    let info = inits.last().unwrap();
    assert!(info.available);
    assert_eq!(info.product_id, "p1");
    assert_eq!(info.config, product_config());
    assert_eq!(info.timestamp, "2023-11-14T22:13:19.999Z");

    // Re-running the lifecycle hook never re-fires.
    t.host.button(&id).unwrap().notify_mounted();
    assert_eq!(inits.count(), 1);
}

#[test]
fn shadow_dom_renders_inside_wrapper() {
    let t = TestHost::with_containers(&["x"]);
    let config = WidgetConfig {
        use_shadow_dom: true,
        shadow_dom_mode: ShadowMode::Closed,
        ..WidgetConfig::default()
    };
    let id = t
        .host
        .init(InitOptions::new("x").with_config(config))
        .unwrap();

    assert_eq!(t.host.is_isolated(&id), Some(true));
    let container = t.dom().container("x").unwrap();
    assert_eq!(container.child_count(), 0);

    let root = container.shadow_root().unwrap();
    assert_eq!(root.attribute("mode").as_deref(), Some("closed"));
    let wrapper = root.find_by_id(&id.wrapper_id()).unwrap();
    assert_eq!(wrapper.text_content(), "Buy Now");

    t.host.destroy(&id);
    assert_eq!(root.child_count(), 0);
}

#[test]
fn shadow_dom_falls_back_to_direct_without_platform_support() {
    let t = TestHost::with_dom(MockDom::new().without_shadow_support());
    t.dom().add_container("x");
    let config = WidgetConfig {
        use_shadow_dom: true,
        ..WidgetConfig::default()
    };
    let id = t
        .host
        .init(InitOptions::new("x").with_config(config))
        .unwrap();

    assert_eq!(t.host.is_isolated(&id), Some(false));
    assert!(t.dom().container("x").unwrap().shadow_root().is_none());
}

#[test]
fn reinit_reuses_existing_shadow_root() {
    let t = TestHost::with_containers(&["x"]);
    let config = WidgetConfig {
        use_shadow_dom: true,
        ..WidgetConfig::default()
    };
    let a = t
        .host
        .init(InitOptions::new("x").with_config(config.clone()))
        .unwrap();
    t.host.destroy(&a);
    let b = t
        .host
        .init(InitOptions::new("x").with_config(config))
        .unwrap();

    let root = t.dom().container("x").unwrap().shadow_root().unwrap();
    assert_eq!(root.child_count(), 1);
    assert!(root.find_by_id(&b.wrapper_id()).is_some());
}

#[test]
fn destroy_all_and_drop_tear_down_every_instance() {
    let t = TestHost::with_containers(&["x", "y", "z"]);
    for id in ["x", "y", "z"] {
        t.host.init(InitOptions::new(id)).unwrap();
    }
    t.host.destroy_all();
    assert!(t.host.is_empty());
    assert_eq!(t.dom().mounted_count(), 0);

    let t = TestHost::with_containers(&["x"]);
    t.host.init(InitOptions::new("x")).unwrap();
    let container = t.dom().container("x").unwrap();
    drop(t);
    assert_eq!(container.child_count(), 0);
}

#[test]
fn instance_ids_keep_registration_order() {
    let t = TestHost::with_containers(&["x", "y"]);
    let a = t.host.init(InitOptions::new("x")).unwrap();
    let b = t.host.init(InitOptions::new("y")).unwrap();
    assert_eq!(t.host.instance_ids(), vec![a, b]);
}
