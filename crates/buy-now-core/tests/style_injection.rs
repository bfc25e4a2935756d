//! `inject_css` scope resolution and accumulation

#![allow(clippy::unwrap_used, clippy::expect_used)]

use buy_now_core::{DomEffects, InitOptions, InstanceId, WidgetConfig};
use buy_now_testkit::{MockDom, TestHost};

fn isolated() -> WidgetConfig {
    WidgetConfig {
        use_shadow_dom: true,
        ..WidgetConfig::default()
    }
}

#[test]
fn no_instance_means_no_injection() {
    let t = TestHost::with_containers(&["x"]);
    assert!(!t.host.inject_css(".a{}", None));
    assert!(!t
        .host
        .inject_css(".a{}", Some(&InstanceId::from("buy-now-0-missing"))));
    assert!(t.dom().head().unwrap().custom_style().is_none());
}

#[test]
fn direct_instances_inject_into_document_head() {
    let t = TestHost::with_containers(&["x"]);
    let id = t.host.init(InitOptions::new("x")).unwrap();

    assert!(t.host.inject_css(".a { color: red; }", Some(&id)));
    assert!(t.host.inject_css(".b { color: blue; }", None));

    let head = t.dom().head().unwrap();
    assert_eq!(head.child_count(), 1);
    let style = head.custom_style().unwrap();
    assert_eq!(style.attribute("data-mfe-custom").as_deref(), Some("true"));
    assert_eq!(
        style.own_text(),
        "\n.a { color: red; }\n.b { color: blue; }"
    );
}

#[test]
fn isolated_instances_inject_into_their_shadow_root() {
    let t = TestHost::with_containers(&["x"]);
    let id = t
        .host
        .init(InitOptions::new("x").with_config(isolated()))
        .unwrap();

    assert!(t.host.inject_css(".a{}", Some(&id)));
    let root = t.dom().container("x").unwrap().shadow_root().unwrap();
    assert_eq!(root.custom_style().unwrap().own_text(), "\n.a{}");
    assert!(t.dom().head().unwrap().custom_style().is_none());
}

#[test]
fn scopes_do_not_cross_contaminate() {
    let t = TestHost::with_containers(&["plain", "shadow"]);
    let plain = t.host.init(InitOptions::new("plain")).unwrap();
    let shadow = t
        .host
        .init(InitOptions::new("shadow").with_config(isolated()))
        .unwrap();

    assert!(t.host.inject_css(".document{}", Some(&plain)));
    assert!(t.host.inject_css(".isolated{}", Some(&shadow)));

    let head_style = t.dom().head().unwrap().custom_style().unwrap();
    let root = t.dom().container("shadow").unwrap().shadow_root().unwrap();
    let root_style = root.custom_style().unwrap();

    assert!(!head_style.ptr_eq(&root_style));
    assert_eq!(head_style.own_text(), "\n.document{}");
    assert_eq!(root_style.own_text(), "\n.isolated{}");
}

#[test]
fn default_target_is_first_registered_instance() {
    let t = TestHost::with_containers(&["first", "second"]);
    t.host
        .init(InitOptions::new("first").with_config(isolated()))
        .unwrap();
    t.host.init(InitOptions::new("second")).unwrap();

    assert!(t.host.inject_css(".x{}", None));
    let root = t.dom().container("first").unwrap().shadow_root().unwrap();
    assert!(root.custom_style().is_some());
    assert!(t.dom().head().unwrap().custom_style().is_none());
}

#[test]
fn missing_document_head_reports_failure() {
    let t = TestHost::with_dom(MockDom::without_head());
    t.dom().add_container("x");
    let id = t.host.init(InitOptions::new("x")).unwrap();
    assert!(!t.host.inject_css(".a{}", Some(&id)));
}
