//! Escalation-chain context.
//!
//! When a chosen fix itself fails, the orchestrator re-enters the engine
//! with a Chain describing the nesting so far. Depth limits are enforced by
//! the orchestrator; the engine only echoes depth and limit for display.

use serde::{Deserialize, Serialize};

/// Depth limit echoed to consumers. Enforcement is the caller's job.
pub const MAX_CHAIN_DEPTH: u32 = 3;

/// One entry in the escalation breadcrumb trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breadcrumb {
    pub label: String,
    pub depth: u32,
    /// "active", "failed", "done" — display only.
    pub status: String,
    pub icon: String,
}

/// Escalation history supplied by the calling orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chain {
    pub chain_id: String,
    /// The install the user originally asked for.
    pub original_goal: String,
    /// Remediation ids currently being attempted, outermost first.
    pub escalation_stack: Vec<String>,
    pub max_depth: u32,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            chain_id: String::new(),
            original_goal: String::new(),
            escalation_stack: Vec::new(),
            max_depth: MAX_CHAIN_DEPTH,
            breadcrumbs: Vec::new(),
        }
    }
}

/// Chain context echoed on every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContext {
    pub chain_id: Option<String>,
    pub original_goal: Option<String>,
    pub depth: u32,
    pub max_depth: u32,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl ChainContext {
    /// Context for a first-level failure with no escalation history.
    pub fn root() -> Self {
        Self {
            chain_id: None,
            original_goal: None,
            depth: 0,
            max_depth: MAX_CHAIN_DEPTH,
            breadcrumbs: Vec::new(),
        }
    }

    /// Surface an existing chain unchanged. Depth is the breadcrumb count.
    pub fn from_chain(chain: &Chain) -> Self {
        Self {
            chain_id: Some(chain.chain_id.clone()),
            original_goal: Some(chain.original_goal.clone()),
            depth: chain.breadcrumbs.len() as u32,
            max_depth: chain.max_depth,
            breadcrumbs: chain.breadcrumbs.clone(),
        }
    }
}
