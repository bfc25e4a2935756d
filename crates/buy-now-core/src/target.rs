//! Render-target resolution
//!
//! An instance renders either straight into its container or into a wrapper
//! node inside a shadow root attached to the container. The choice is made
//! once at mount time and fixed for the instance's lifetime.

use crate::config::WidgetConfig;
use crate::effects::DomEffects;
use crate::identifiers::InstanceId;
use crate::WidgetResult;

/// Where a style block for an instance is injected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleScope<R> {
    /// Document-level style area (`<head>`)
    Document,
    /// Inside the instance's shadow root
    Isolated(R),
}

/// Resolved render target of one instance
#[derive(Debug, Clone)]
pub enum RenderTarget<E, R> {
    /// Renders into the host container and inherits host page styling
    Direct {
        /// Host container
        container: E,
    },
    /// Renders into `wrapper`, a regular node inside `root`
    Isolated {
        /// Host container the shadow root is attached to
        container: E,
        /// Shadow root isolating the widget's styles
        root: R,
        /// Mount point inside `root`
        wrapper: E,
    },
}

impl<E, R: Clone> RenderTarget<E, R> {
    /// Resolve the target for `config`, attaching a shadow root when asked
    /// for and supported
    pub fn resolve<D>(
        dom: &D,
        container: E,
        config: &WidgetConfig,
        instance_id: &InstanceId,
    ) -> WidgetResult<Self>
    where
        D: DomEffects<Element = E, ShadowRoot = R>,
    {
        if !config.use_shadow_dom {
            return Ok(Self::Direct { container });
        }

        match dom.attach_shadow(&container, config.shadow_dom_mode)? {
            Some(root) => {
                let wrapper = dom.create_wrapper(&root, &instance_id.wrapper_id())?;
                Ok(Self::Isolated {
                    container,
                    root,
                    wrapper,
                })
            }
            None => {
                tracing::debug!(%instance_id, "shadow DOM unsupported, rendering directly");
                Ok(Self::Direct { container })
            }
        }
    }

    /// Node the view mounts into
    pub fn mount_point(&self) -> &E {
        match self {
            Self::Direct { container } => container,
            Self::Isolated { wrapper, .. } => wrapper,
        }
    }

    /// Host container
    pub fn container(&self) -> &E {
        match self {
            Self::Direct { container } | Self::Isolated { container, .. } => container,
        }
    }

    /// Style scope for injected CSS
    pub fn style_scope(&self) -> StyleScope<R> {
        match self {
            Self::Direct { .. } => StyleScope::Document,
            Self::Isolated { root, .. } => StyleScope::Isolated(root.clone()),
        }
    }

    /// Whether this target renders inside a shadow root
    pub fn is_isolated(&self) -> bool {
        matches!(self, Self::Isolated { .. })
    }
}
