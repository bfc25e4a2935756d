//! In-memory DOM implementing `DomEffects`
//!
//! Models just enough of a document for the widget host: elements with ids,
//! attributes, text and children, shadow roots, a `<head>`, and a fake view
//! layer that renders a button whose text tracks the controller's state.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use buy_now_core::button::{BUTTON_CLASS, SECTION_CLASS};
use buy_now_core::effects::dom::CUSTOM_STYLE_ATTRIBUTE;
use buy_now_core::{
    ButtonController, DomEffects, ShadowMode, StyleScope, WidgetError, WidgetResult,
};

#[derive(Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<MockNode>,
    shadow_root: Option<MockNode>,
    parent: Option<Weak<RefCell<NodeData>>>,
}

/// Shared handle to an in-memory node
#[derive(Clone, Default)]
pub struct MockNode(Rc<RefCell<NodeData>>);

impl MockNode {
    /// Detached element named `tag`
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        })))
    }

    /// Set the element id
    pub fn with_id(self, id: &str) -> Self {
        self.0.borrow_mut().id = Some(id.to_string());
        self
    }

    /// Element name
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Element id, if set
    pub fn id(&self) -> Option<String> {
        self.0.borrow().id.clone()
    }

    /// Attribute value, if set
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    /// Set or replace an attribute
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Own text of this node, without descendants
    pub fn own_text(&self) -> String {
        self.0.borrow().text.clone()
    }

    /// Replace this node's own text
    pub fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    /// Concatenated text of this node and its light-DOM descendants
    pub fn text_content(&self) -> String {
        let node = self.0.borrow();
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&child.text_content());
        }
        text
    }

    /// Light-DOM children, in order
    pub fn children(&self) -> Vec<MockNode> {
        self.0.borrow().children.clone()
    }

    /// Number of light-DOM children
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Append `child` as the last child
    pub fn append_child(&self, child: &MockNode) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Detach this node from its parent, if any
    pub fn remove(&self) {
        let parent = self.0.borrow_mut().parent.take().and_then(|p| p.upgrade());
        if let Some(parent) = parent {
            parent.borrow_mut().children.retain(|c| !c.ptr_eq(self));
        }
    }

    /// Remove every light-DOM child
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in children {
            child.0.borrow_mut().parent = None;
        }
    }

    /// Attached shadow root, open or closed
    pub fn shadow_root(&self) -> Option<MockNode> {
        self.0.borrow().shadow_root.clone()
    }

    /// Whether both handles name the same node
    pub fn ptr_eq(&self, other: &MockNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Depth-first search of light-DOM descendants
    pub fn find(&self, predicate: &dyn Fn(&MockNode) -> bool) -> Option<MockNode> {
        for child in self.children() {
            if predicate(&child) {
                return Some(child);
            }
            if let Some(found) = child.find(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// First descendant with `id`
    pub fn find_by_id(&self, id: &str) -> Option<MockNode> {
        self.find(&|node| node.id().as_deref() == Some(id))
    }

    /// First descendant named `tag`
    pub fn find_by_tag(&self, tag: &str) -> Option<MockNode> {
        self.find(&|node| node.tag() == tag)
    }

    /// The widget's custom style element under this node
    pub fn custom_style(&self) -> Option<MockNode> {
        self.find(&|node| node.tag() == "style" && node.attribute(CUSTOM_STYLE_ATTRIBUTE).is_some())
    }
}

impl std::fmt::Debug for MockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("MockNode")
            .field("tag", &node.tag)
            .field("id", &node.id)
            .field("children", &node.children.len())
            .finish()
    }
}

/// View mounted by `MockDom`
pub struct MockMount {
    section: MockNode,
    button: Rc<ButtonController>,
}

/// In-memory document
pub struct MockDom {
    head: Option<MockNode>,
    body: MockNode,
    shadow_supported: Cell<bool>,
    mount_failure: RefCell<Option<String>>,
    mounted: RefCell<Vec<Rc<ButtonController>>>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Empty document with a `<head>` and shadow-root support
    pub fn new() -> Self {
        Self {
            head: Some(MockNode::new("head")),
            body: MockNode::new("body"),
            shadow_supported: Cell::new(true),
            mount_failure: RefCell::new(None),
            mounted: RefCell::new(Vec::new()),
        }
    }

    /// Document without a `<head>`, so document-level injection fails
    pub fn without_head() -> Self {
        Self {
            head: None,
            ..Self::new()
        }
    }

    /// Platform without shadow-root support
    pub fn without_shadow_support(self) -> Self {
        self.shadow_supported.set(false);
        self
    }

    /// Add an empty container to the body
    pub fn add_container(&self, id: &str) -> MockNode {
        let node = MockNode::new("div").with_id(id);
        self.body.append_child(&node);
        node
    }

    /// Make the next `mount` fail with a render error
    pub fn fail_next_mount(&self, message: &str) {
        *self.mount_failure.borrow_mut() = Some(message.to_string());
    }

    /// The `<head>`, if the document has one
    pub fn head(&self) -> Option<MockNode> {
        self.head.clone()
    }

    /// The `<body>`
    pub fn body(&self) -> MockNode {
        self.body.clone()
    }

    /// Number of currently mounted views
    pub fn mounted_count(&self) -> usize {
        self.mounted.borrow().len()
    }

    /// Text of the button rendered for `container_id`, looking through a
    /// shadow root when present
    pub fn button_text(&self, container_id: &str) -> Option<String> {
        let container = self.body.find_by_id(container_id)?;
        let scope = container.shadow_root().unwrap_or(container);
        scope.find_by_tag("button").map(|b| b.own_text())
    }
}

impl DomEffects for MockDom {
    type Element = MockNode;
    type ShadowRoot = MockNode;
    type Mount = MockMount;

    fn container(&self, id: &str) -> Option<MockNode> {
        self.body.find_by_id(id)
    }

    fn clear(&self, element: &MockNode) {
        element.clear_children();
        element.set_text("");
    }

    fn attach_shadow(&self, host: &MockNode, mode: ShadowMode) -> WidgetResult<Option<MockNode>> {
        if !self.shadow_supported.get() {
            return Ok(None);
        }
        if let Some(root) = host.shadow_root() {
            root.clear_children();
            return Ok(Some(root));
        }
        let root = MockNode::new("#shadow-root");
        let mode = match mode {
            ShadowMode::Open => "open",
            ShadowMode::Closed => "closed",
        };
        root.set_attribute("mode", mode);
        host.0.borrow_mut().shadow_root = Some(root.clone());
        Ok(Some(root))
    }

    fn create_wrapper(&self, root: &MockNode, id: &str) -> WidgetResult<MockNode> {
        let wrapper = MockNode::new("div").with_id(id);
        root.append_child(&wrapper);
        Ok(wrapper)
    }

    fn clear_shadow(&self, root: &MockNode) {
        root.clear_children();
    }

    fn mount(&self, target: &MockNode, button: Rc<ButtonController>) -> WidgetResult<MockMount> {
        if let Some(message) = self.mount_failure.borrow_mut().take() {
            return Err(WidgetError::render(message));
        }

        let section = MockNode::new("div");
        section.set_attribute("class", SECTION_CLASS);
        let element = MockNode::new("button");
        element.set_attribute("class", &button.class_name());
        element.set_text(&button.label().to_string());
        section.append_child(&element);
        target.append_child(&section);

        let weak = Rc::downgrade(&button);
        let rendered = element.clone();
        button.observe_processing(move |_| {
            if let Some(button) = weak.upgrade() {
                rendered.set_text(&button.label().to_string());
                rendered.set_attribute("class", &button.class_name());
            }
        });

        self.mounted.borrow_mut().push(Rc::clone(&button));
        Ok(MockMount { section, button })
    }

    fn unmount(&self, mount: MockMount) {
        mount.section.remove();
        self.mounted
            .borrow_mut()
            .retain(|b| !Rc::ptr_eq(b, &mount.button));
    }

    fn show_error(&self, container: &MockNode, message: &str) {
        let scope = container.shadow_root().unwrap_or_else(|| container.clone());
        scope.clear_children();
        let error = MockNode::new("div");
        error.set_attribute("style", "color: red; padding: 10px;");
        error.set_text(message);
        scope.append_child(&error);
    }

    fn append_custom_style(&self, scope: &StyleScope<MockNode>, css: &str) -> WidgetResult<()> {
        let target = match scope {
            StyleScope::Document => self
                .head
                .clone()
                .ok_or_else(|| WidgetError::render("document has no head"))?,
            StyleScope::Isolated(root) => root.clone(),
        };

        let style = match target.custom_style() {
            Some(style) => style,
            None => {
                let style = MockNode::new("style");
                style.set_attribute(CUSTOM_STYLE_ATTRIBUTE, "true");
                target.append_child(&style);
                style
            }
        };
        let text = format!("{}\n{css}", style.own_text());
        style.set_text(&text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_detaches_from_parent() {
        let parent = MockNode::new("div");
        let child = MockNode::new("span");
        parent.append_child(&child);
        assert_eq!(parent.child_count(), 1);
        child.remove();
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn find_does_not_pierce_shadow_roots() {
        let dom = MockDom::new();
        let host = dom.add_container("host");
        let root = dom
            .attach_shadow(&host, ShadowMode::Open)
            .ok()
            .flatten()
            .unwrap_or_default();
        dom.create_wrapper(&root, "inner").ok();
        assert!(dom.container("inner").is_none());
        assert!(root.find_by_id("inner").is_some());
    }
}
