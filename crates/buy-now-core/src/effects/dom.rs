//! DOM effect interface

use std::rc::Rc;

use crate::button::ButtonController;
use crate::config::ShadowMode;
use crate::target::StyleScope;
use crate::WidgetResult;

/// Attribute marking the widget's accumulated custom style element
pub const CUSTOM_STYLE_ATTRIBUTE: &str = "data-mfe-custom";
/// Selector matching the custom style element
pub const CUSTOM_STYLE_SELECTOR: &str = "style[data-mfe-custom]";

/// Element, shadow-root and mount primitives the widget host relies on.
///
/// Handles are cheap clones of platform nodes. `Mount` owns whatever the view
/// layer needs to tear the button down again.
pub trait DomEffects {
    /// Regular element handle
    type Element: Clone;
    /// Isolated style scope handle
    type ShadowRoot: Clone;
    /// Handle to a mounted view tree
    type Mount;

    /// Find a host-provided container by id
    fn container(&self, id: &str) -> Option<Self::Element>;

    /// Remove all children of an element
    fn clear(&self, element: &Self::Element);

    /// Attach (or reuse an open) shadow root on `host`.
    ///
    /// Returns `Ok(None)` when the platform has no shadow-root support.
    fn attach_shadow(
        &self,
        host: &Self::Element,
        mode: ShadowMode,
    ) -> WidgetResult<Option<Self::ShadowRoot>>;

    /// Create the regular node the view mounts into inside a shadow root
    fn create_wrapper(&self, root: &Self::ShadowRoot, id: &str) -> WidgetResult<Self::Element>;

    /// Remove all children of a shadow root
    fn clear_shadow(&self, root: &Self::ShadowRoot);

    /// Mount the button view into `target`
    fn mount(&self, target: &Self::Element, button: Rc<ButtonController>)
        -> WidgetResult<Self::Mount>;

    /// Unmount a previously mounted view
    fn unmount(&self, mount: Self::Mount);

    /// Paint a visible inline error message into a container
    fn show_error(&self, container: &Self::Element, message: &str);

    /// Append style text to the shared custom style element of `scope`,
    /// creating it when absent
    fn append_custom_style(
        &self,
        scope: &StyleScope<Self::ShadowRoot>,
        css: &str,
    ) -> WidgetResult<()>;
}
