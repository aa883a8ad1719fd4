//! Failure context input and the assembled remediation response.

use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainContext};
use crate::option::{EvaluatedOption, Layer};
use crate::recipe::Recipe;

/// Echoed stderr is capped at this many characters.
pub const STDERR_CAP: usize = 2000;

/// A failed install step, as reported by the execution layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureContext {
    pub tool_id: String,
    /// Install method that was being attempted (e.g. "pip", "apt").
    pub method: String,
    /// Index of the failed step within the recipe's method steps.
    pub step_idx: usize,
    pub step_label: String,
    pub exit_code: i32,
    /// Raw captured stderr; capped only when echoed back.
    pub stderr: String,
    /// Overrides the catalog recipe when present.
    pub recipe: Option<Recipe>,
    pub chain: Option<Chain>,
}

/// The single failure classification attached to a response, derived from
/// the highest-priority matched handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub failure_id: String,
    pub category: String,
    pub label: String,
    pub description: String,
    pub matched_layer: Layer,
    /// Method under which the handler matched, when layer-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_method: Option<String>,
}

/// One of the constant fallback choices appended to every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackAction {
    pub id: String,
    pub label: String,
    pub icon: String,
}

/// The constant three-item fallback list: retry, skip, cancel.
pub fn fallback_actions() -> Vec<FallbackAction> {
    vec![
        FallbackAction {
            id: "retry".to_string(),
            label: "Retry this step".to_string(),
            icon: "refresh".to_string(),
        },
        FallbackAction {
            id: "skip".to_string(),
            label: "Skip this tool".to_string(),
            icon: "forward".to_string(),
        },
        FallbackAction {
            id: "cancel".to_string(),
            label: "Cancel the install".to_string(),
            icon: "x".to_string(),
        },
    ]
}

/// Full diagnosis for one failed step: classification, ranked options,
/// chain context and fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationResponse {
    /// Always false; this shape only exists for failures.
    pub ok: bool,
    pub tool_id: String,
    pub step_idx: usize,
    pub step_label: String,
    pub exit_code: i32,
    /// Echoed stderr, capped to [`STDERR_CAP`] characters.
    pub stderr: String,
    pub failure: FailureSummary,
    pub options: Vec<EvaluatedOption>,
    pub chain: ChainContext,
    pub fallback_actions: Vec<FallbackAction>,
}

/// Cap a stderr echo at [`STDERR_CAP`] characters without splitting a
/// multi-byte character.
pub fn cap_stderr(stderr: &str) -> String {
    stderr.chars().take(STDERR_CAP).collect()
}
