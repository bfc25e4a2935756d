//! web-sys implementation of `DomEffects`

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use buy_now_core::effects::dom::{CUSTOM_STYLE_ATTRIBUTE, CUSTOM_STYLE_SELECTOR};
use buy_now_core::{
    ButtonController, DomEffects, ShadowMode, StyleScope, WidgetError, WidgetResult,
};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node, ShadowRoot, ShadowRootInit, ShadowRootMode};

use crate::error::{js_message, render_error};
use crate::view::BuyNowButton;

/// The live document
#[derive(Debug)]
pub struct WebDom {
    document: Document,
    // `Element.shadowRoot` is null for closed roots, so keep our own handles.
    roots: RefCell<Vec<(Element, ShadowRoot)>>,
}

impl WebDom {
    /// Bind to `window.document`
    pub fn new() -> WidgetResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| WidgetError::configuration("no document available"))?;
        Ok(Self {
            document,
            roots: RefCell::new(Vec::new()),
        })
    }

    /// The wrapped document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shadow root on `host`, open or attached by this handler in closed mode
    pub fn shadow_of(&self, host: &Element) -> Option<ShadowRoot> {
        host.shadow_root().or_else(|| {
            self.roots
                .borrow()
                .iter()
                .find(|(element, _)| element == host)
                .map(|(_, root)| root.clone())
        })
    }
}

impl DomEffects for WebDom {
    type Element = Element;
    type ShadowRoot = ShadowRoot;
    // Dropping the leptos unmount handle removes the view and disposes its
    // reactive owner.
    type Mount = Box<dyn Any>;

    fn container(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn clear(&self, element: &Element) {
        element.set_inner_html("");
    }

    fn attach_shadow(
        &self,
        host: &Element,
        mode: ShadowMode,
    ) -> WidgetResult<Option<ShadowRoot>> {
        // A previous instance on this container left its root behind.
        if let Some(root) = self.shadow_of(host) {
            root.set_inner_html("");
            return Ok(Some(root));
        }
        let supported =
            js_sys::Reflect::has(host, &JsValue::from_str("attachShadow")).unwrap_or(false);
        if !supported {
            return Ok(None);
        }

        let mode = match mode {
            ShadowMode::Open => ShadowRootMode::Open,
            ShadowMode::Closed => ShadowRootMode::Closed,
        };
        let root = host
            .attach_shadow(&ShadowRootInit::new(mode))
            .map_err(render_error)?;
        self.roots
            .borrow_mut()
            .push((host.clone(), root.clone()));
        Ok(Some(root))
    }

    fn create_wrapper(&self, root: &ShadowRoot, id: &str) -> WidgetResult<Element> {
        let wrapper = self.document.create_element("div").map_err(render_error)?;
        wrapper.set_id(id);
        root.append_child(&wrapper).map_err(render_error)?;
        Ok(wrapper)
    }

    fn clear_shadow(&self, root: &ShadowRoot) {
        root.set_inner_html("");
    }

    fn mount(&self, target: &Element, button: Rc<ButtonController>) -> WidgetResult<Box<dyn Any>> {
        let parent = target
            .clone()
            .dyn_into::<HtmlElement>()
            .map_err(|_| WidgetError::render("render target is not an HTML element"))?;
        let handle = leptos::mount::mount_to(parent, move || view! { <BuyNowButton button=button /> });
        Ok(Box::new(handle))
    }

    fn unmount(&self, mount: Box<dyn Any>) {
        drop(mount);
    }

    fn show_error(&self, container: &Element, message: &str) {
        let scope: Node = match self.shadow_of(container) {
            Some(root) => root.into(),
            None => container.clone().into(),
        };
        scope.set_text_content(None);

        let Ok(error) = self.document.create_element("div") else {
            scope.set_text_content(Some(message));
            return;
        };
        if let Err(err) = error.set_attribute("style", "color: red; padding: 10px;") {
            tracing::warn!(error = %js_message(&err), "could not style inline error");
        }
        error.set_text_content(Some(message));
        if let Err(err) = scope.append_child(&error) {
            tracing::warn!(error = %js_message(&err), "could not paint inline error");
            scope.set_text_content(Some(message));
        }
    }

    fn append_custom_style(&self, scope: &StyleScope<ShadowRoot>, css: &str) -> WidgetResult<()> {
        let (parent, existing): (Node, Option<Element>) = match scope {
            StyleScope::Document => {
                let head = self
                    .document
                    .head()
                    .ok_or_else(|| WidgetError::render("document has no head"))?;
                let existing = head
                    .query_selector(CUSTOM_STYLE_SELECTOR)
                    .map_err(render_error)?;
                (head.into(), existing)
            }
            StyleScope::Isolated(root) => {
                let existing = root
                    .query_selector(CUSTOM_STYLE_SELECTOR)
                    .map_err(render_error)?;
                (root.clone().into(), existing)
            }
        };

        let style = match existing {
            Some(style) => style,
            None => {
                let style = self.document.create_element("style").map_err(render_error)?;
                style
                    .set_attribute(CUSTOM_STYLE_ATTRIBUTE, "true")
                    .map_err(render_error)?;
                parent.append_child(&style).map_err(render_error)?;
                style
            }
        };

        let text = style.text_content().unwrap_or_default();
        style.set_text_content(Some(&format!("{text}\n{css}")));
        Ok(())
    }
}
