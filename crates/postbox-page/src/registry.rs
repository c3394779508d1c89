//! Component registry: name -> component.

use std::collections::HashMap;
use std::fmt;

use crate::component::Component;
use crate::error::PageError;

/// Names the mediator's effect table resolves.
pub mod names {
    pub const NOTIFICATION_PANEL: &str = "NotificationPanel";
    pub const DASHBOARD: &str = "Dashboard";
    pub const LOGIN: &str = "login";
}

/// Keys are unique; insertion order is irrelevant. Owned by the mediator.
#[derive(Default)]
pub struct Registry {
    components: HashMap<String, Box<dyn Component>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `component` under `name`. Last write wins; the previous binding
    /// is returned.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        component: Box<dyn Component>,
    ) -> Option<Box<dyn Component>> {
        self.components.insert(name.into(), component)
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn Component, PageError> {
        self.components
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| PageError::unknown_component(name))
    }

    pub fn resolve_mut(&mut self, name: &str) -> Result<&mut dyn Component, PageError> {
        match self.components.get_mut(name) {
            Some(component) => Ok(component.as_mut()),
            None => Err(PageError::unknown_component(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn components_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Component>> {
        self.components.values_mut()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.names())
            .finish()
    }
}
