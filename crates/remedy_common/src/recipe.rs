//! Install recipe for a catalogued tool.
//!
//! Recipes come from an external tool catalog; the engine only reads them.
//! A recipe maps install-method names to command steps and may alias its
//! literal method to a broader method family via `install_via` (e.g. a tool
//! installed by a "poetry" method that fails like any other pip install).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Install recipe for one tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    /// Method name -> ordered command steps.
    pub install: BTreeMap<String, Vec<String>>,

    /// Method family this recipe's install method belongs to, when it
    /// differs from the literal method name.
    pub install_via: Option<String>,

    /// Binary the tool puts on PATH, when it differs from the tool id.
    pub cli: Option<String>,
}

impl Recipe {
    /// True when the recipe carries install steps for `method`.
    pub fn supports_method(&self, method: &str) -> bool {
        self.install.contains_key(method)
    }

    /// Number of command steps for `method`, 0 when absent.
    pub fn step_count(&self, method: &str) -> usize {
        self.install.get(method).map(|steps| steps.len()).unwrap_or(0)
    }

    /// The method family `method` resolves to, when aliased away from the
    /// literal name.
    pub fn aliased_family(&self, method: &str) -> Option<&str> {
        match self.install_via.as_deref() {
            Some(family) if family != method => Some(family),
            _ => None,
        }
    }
}
