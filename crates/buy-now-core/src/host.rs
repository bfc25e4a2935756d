//! Widget Host
//!
//! Owns the registry of mounted instances and implements the three host page
//! operations: `init`, `destroy` and `inject_css`. The registry is an explicit
//! object, so independent hosts can coexist and are torn down when dropped.
//!
//! Registry borrows never span a call into the view layer or a host page
//! callback, so callbacks may re-enter the host.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::button::ButtonController;
use crate::config::{HostSettings, WidgetConfig};
use crate::effects::{DomEffects, PhysicalTimeEffects, PurchaseEffects, RandomEffects};
use crate::events::WidgetCallbacks;
use crate::identifiers::InstanceId;
use crate::target::RenderTarget;
use crate::{WidgetError, WidgetResult};

/// Non-DOM effects shared by every instance of a host
#[derive(Clone)]
pub struct HostEffects {
    /// Purchase confirmation endpoint client
    pub purchase: Rc<dyn PurchaseEffects>,
    /// Wall clock for ids and callback timestamps
    pub time: Rc<dyn PhysicalTimeEffects>,
    /// Entropy for instance id suffixes
    pub random: Rc<dyn RandomEffects>,
}

/// Arguments of `init`
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Id of the host-provided container. Required.
    pub container_id: Option<String>,
    /// Configuration merged over the defaults
    pub config: WidgetConfig,
    /// Host page callbacks
    pub callbacks: WidgetCallbacks,
}

impl InitOptions {
    /// Options targeting `container_id` with default config and no callbacks
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: Some(container_id.into()),
            ..Self::default()
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the callbacks
    pub fn with_callbacks(mut self, callbacks: WidgetCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}

struct InstanceRecord<D: DomEffects> {
    container_id: String,
    config: Rc<WidgetConfig>,
    target: RenderTarget<D::Element, D::ShadowRoot>,
    mount: D::Mount,
    button: Rc<ButtonController>,
}

/// Mount/unmount lifecycle manager for Buy Now instances
pub struct WidgetHost<D: DomEffects> {
    dom: D,
    effects: HostEffects,
    settings: HostSettings,
    instances: RefCell<IndexMap<InstanceId, InstanceRecord<D>>>,
}

impl<D: DomEffects> WidgetHost<D> {
    /// Empty host using the default settings
    pub fn new(dom: D, effects: HostEffects) -> Self {
        Self {
            dom,
            effects,
            settings: HostSettings::default(),
            instances: RefCell::new(IndexMap::new()),
        }
    }

    /// Replace the host settings
    pub fn with_settings(mut self, settings: HostSettings) -> Self {
        self.settings = settings;
        self
    }

    /// DOM handler the host renders through
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Settings shared by every instance
    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    /// Mount a new instance and return its id.
    ///
    /// An instance already mounted on the same container is destroyed first,
    /// so each container hosts at most one registered instance.
    ///
    /// Fails with `Configuration` when the container id is missing or unknown,
    /// and with `Render` when the view cannot be mounted. A render failure is
    /// also painted into the container.
    pub fn init(&self, options: InitOptions) -> WidgetResult<InstanceId> {
        let container_id = options
            .container_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| WidgetError::configuration("containerId is required"))?;
        let container = self.dom.container(&container_id).ok_or_else(|| {
            WidgetError::configuration(format!("Container with id \"{container_id}\" not found"))
        })?;

        self.replace_instances_on(&container_id);
        self.dom.clear(&container);

        let instance_id = self.fresh_id();
        let config = Rc::new(options.config);
        let button = Rc::new(ButtonController::new(
            Rc::clone(&config),
            options.callbacks,
            self.settings.endpoint.as_str(),
            Rc::clone(&self.effects.purchase),
            Rc::clone(&self.effects.time),
        ));

        let mounted = RenderTarget::resolve(&self.dom, container.clone(), &config, &instance_id)
            .and_then(|target| {
                let mount = self.dom.mount(target.mount_point(), Rc::clone(&button))?;
                Ok((target, mount))
            });

        let (target, mount) = match mounted {
            Ok(mounted) => mounted,
            Err(err) => {
                button.detach();
                let err = match err {
                    WidgetError::Render { .. } => err,
                    other => WidgetError::render(other.to_string()),
                };
                tracing::error!(%container_id, error = %err, "error rendering Buy Now widget");
                self.dom.show_error(&container, &format!("Error: {err}"));
                return Err(err);
            }
        };

        tracing::debug!(
            %instance_id,
            %container_id,
            isolated = target.is_isolated(),
            "mounted Buy Now widget"
        );

        self.instances.borrow_mut().insert(
            instance_id.clone(),
            InstanceRecord {
                container_id,
                config,
                target,
                mount,
                button: Rc::clone(&button),
            },
        );

        button.notify_mounted();
        Ok(instance_id)
    }

    /// Unmount an instance and empty its container. Unknown ids are ignored.
    pub fn destroy(&self, instance_id: &InstanceId) {
        let Some(record) = self.instances.borrow_mut().shift_remove(instance_id) else {
            return;
        };

        record.button.detach();
        self.dom.unmount(record.mount);
        if let Some(container) = self.dom.container(&record.container_id) {
            self.dom.clear(&container);
        }
        if let RenderTarget::Isolated { root, .. } = &record.target {
            self.dom.clear_shadow(root);
        }
        tracing::debug!(%instance_id, "destroyed Buy Now widget");
    }

    /// Destroy every registered instance
    pub fn destroy_all(&self) {
        let ids: Vec<InstanceId> = self.instances.borrow().keys().cloned().collect();
        for id in &ids {
            self.destroy(id);
        }
    }

    /// Append `css` to the custom style element of an instance's scope.
    ///
    /// Without an id the first registered instance is used. Returns false
    /// when no instance or no injection target exists.
    pub fn inject_css(&self, css: &str, instance_id: Option<&InstanceId>) -> bool {
        let scope = {
            let instances = self.instances.borrow();
            let record = match instance_id {
                Some(id) => instances.get(id),
                None => instances.values().next(),
            };
            match record {
                Some(record) => record.target.style_scope(),
                None => {
                    tracing::warn!("No instance found for CSS injection");
                    return false;
                }
            }
        };

        match self.dom.append_custom_style(&scope, css) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "No valid target for CSS injection");
                false
            }
        }
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Whether no instance is registered
    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }

    /// Whether `instance_id` is registered
    pub fn contains(&self, instance_id: &InstanceId) -> bool {
        self.instances.borrow().contains_key(instance_id)
    }

    /// Registered ids, in registration order
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.instances.borrow().keys().cloned().collect()
    }

    /// Effective configuration of an instance
    pub fn config(&self, instance_id: &InstanceId) -> Option<Rc<WidgetConfig>> {
        self.instances
            .borrow()
            .get(instance_id)
            .map(|record| Rc::clone(&record.config))
    }

    /// Button controller of an instance
    pub fn button(&self, instance_id: &InstanceId) -> Option<Rc<ButtonController>> {
        self.instances
            .borrow()
            .get(instance_id)
            .map(|record| Rc::clone(&record.button))
    }

    /// Whether an instance renders inside a shadow root
    pub fn is_isolated(&self, instance_id: &InstanceId) -> Option<bool> {
        self.instances
            .borrow()
            .get(instance_id)
            .map(|record| record.target.is_isolated())
    }

    fn replace_instances_on(&self, container_id: &str) {
        let stale: Vec<InstanceId> = self
            .instances
            .borrow()
            .iter()
            .filter(|(_, record)| record.container_id == container_id)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            tracing::debug!(instance_id = %id, container_id, "replacing instance on re-init");
            self.destroy(id);
        }
    }

    fn fresh_id(&self) -> InstanceId {
        let instances = self.instances.borrow();
        let now = self.effects.time.now_ms();
        let entropy = self.effects.random.random_u64();
        // Offsets 0..=len give distinct suffixes, so this ends within len + 1 tries.
        let mut offset = 0u64;
        loop {
            let id = InstanceId::from_parts(now, entropy.wrapping_add(offset));
            if !instances.contains_key(&id) {
                return id;
            }
            offset += 1;
        }
    }
}

impl<D: DomEffects> Drop for WidgetHost<D> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

impl<D: DomEffects> fmt::Debug for WidgetHost<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHost")
            .field("settings", &self.settings)
            .field("instances", &self.instance_ids())
            .finish_non_exhaustive()
    }
}
