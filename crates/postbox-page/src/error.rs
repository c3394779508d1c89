//! Wiring and document errors.
//!
//! These are defects in how the page is put together (a component missing
//! from the registry, a component asked for an effect it does not support,
//! an element id absent from the document), not runtime conditions.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// No component registered under this name.
    UnknownComponent { name: String },
    /// The component registered under `component` lacks `effect`.
    UnsupportedEffect {
        component: String,
        effect: &'static str,
    },
    /// The document has no element with this id.
    MissingElement { id: String },
}

impl PageError {
    pub fn unknown_component(name: impl Into<String>) -> Self {
        Self::UnknownComponent { name: name.into() }
    }

    pub fn unsupported(component: impl Into<String>, effect: &'static str) -> Self {
        Self::UnsupportedEffect {
            component: component.into(),
            effect,
        }
    }

    pub fn missing_element(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::UnknownComponent { name } => {
                write!(f, "No component registered as '{name}'")
            }
            PageError::UnsupportedEffect { component, effect } => {
                write!(f, "Component '{component}' does not support '{effect}'")
            }
            PageError::MissingElement { id } => write!(f, "No element with id '{id}'"),
        }
    }
}

impl std::error::Error for PageError {}
