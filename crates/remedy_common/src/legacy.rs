//! Projection of a [`RemediationResponse`] into the flat shape older
//! consumers expect: a reason string and a plain option list.

use serde::{Deserialize, Serialize};

use crate::option::StrategySpec;
use crate::response::RemediationResponse;

/// Flat remediation shape for pre-cascade consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRemediation {
    pub reason: String,
    pub options: Vec<LegacyOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyOption {
    pub label: String,
    pub description: String,
    pub icon: String,
    pub strategy: String,
    pub option_id: String,
    /// Display hint only; older UIs showed a sudo badge on package installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_sudo: Option<bool>,
}

impl From<&RemediationResponse> for LegacyRemediation {
    fn from(response: &RemediationResponse) -> Self {
        let options = response
            .options
            .iter()
            .map(|evaluated| {
                let opt = &evaluated.option;
                let needs_sudo = match opt.action {
                    StrategySpec::InstallPackages { .. } | StrategySpec::AddRepo { .. } => {
                        Some(true)
                    }
                    _ => None,
                };
                LegacyOption {
                    label: opt.label.clone(),
                    description: opt.description.clone(),
                    icon: opt.icon.clone(),
                    strategy: opt.action.name().to_string(),
                    option_id: opt.id.clone(),
                    needs_sudo,
                }
            })
            .collect();
        Self {
            reason: response.failure.label.clone(),
            options,
        }
    }
}
