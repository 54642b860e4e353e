//! Step nodes.

use bbs_core::StepData;

/// A step attached to a [`StepTree`](crate::StepTree).
///
/// `parent` and `children` are names of other nodes in the same tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StepNode {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) children: Vec<String>,
    pub(crate) data: StepData,
}

impl StepNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the parent step, `None` for a root.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Names of the child steps, in order.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// The stored (not resolved) attribute states.
    pub fn data(&self) -> &StepData {
        &self.data
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A step that is not attached yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStep {
    pub name: String,
    pub data: StepData,
}

impl NewStep {
    /// A brand-new step with every attribute unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: StepData::new(),
        }
    }

    /// A step carrying pre-populated data (duplicated or promoted steps).
    pub fn with_data(name: impl Into<String>, data: StepData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}
