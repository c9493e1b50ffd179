use serde::{Deserialize, Serialize};

/// Presentation attributes of a chart's container element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerOptions {
    pub id: Option<String>,
    pub class: Option<String>,
    pub style: Option<String>,
}

/// The host element a chart resource is bound to.
///
/// A chart root creates exactly one container on mount and owns it for its
/// whole lifetime; the engine binds the chart resource to it at creation.
/// On hosts with a real DOM this maps to one element; headless engines only
/// read the attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerElement {
    options: ContainerOptions,
}

impl ContainerElement {
    #[must_use]
    pub fn new(options: ContainerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.options.id.as_deref()
    }

    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.options.class.as_deref()
    }

    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.options.style.as_deref()
    }
}
