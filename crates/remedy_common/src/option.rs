//! Remediation options and their runtime annotations.
//!
//! The strategy payload is a tagged union: each strategy carries exactly the
//! fields it needs, so a catalog entry cannot, say, declare
//! `install_packages` without a package map. The catalog copy of an option
//! is immutable; the cascade hands out per-call copies which the evaluator
//! annotates with availability.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distro-family -> package names, for `install_packages` options.
pub type PackageMap = BTreeMap<String, Vec<String>>;

/// What kind of action an option represents, plus its payload.
///
/// The set is closed on purpose. Should a variant ever be added without its
/// own evaluation rule, the evaluator treats it as ready (fail-open): an
/// actionable option beats over-caution while the set evolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Install a missing dependency, then retry the original method.
    InstallDep { dep: String },

    /// Upgrade an outdated dependency, then retry.
    UpgradeDep { dep: String },

    /// Install a dependency and retry via a different method. The target
    /// method is deliberately not checked against the recipe: the
    /// dependency may bring its own installer.
    InstallDepThenSwitch { dep: String, then_method: String },

    /// Retry the install via a different method from the recipe.
    SwitchMethod { method: String },

    /// Install system packages, keyed by distro family. `dynamic_packages`
    /// defers package selection to execution time (e.g. parsed from the
    /// error text).
    InstallPackages {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        packages: Option<PackageMap>,
        #[serde(default)]
        dynamic_packages: bool,
    },

    /// Retry the same command with modifier flags.
    RetryWithModifier {
        #[serde(default)]
        modifiers: Vec<String>,
    },

    /// Add a package repository, then retry.
    AddRepo { commands: Vec<String> },

    /// Adjust the environment (exports, service starts), then retry.
    EnvFix { commands: Vec<String> },

    /// Hand the user written instructions; nothing is executed.
    Manual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instructions: Option<String>,
    },

    /// Clean up partial state (locks, caches), then retry.
    CleanupRetry { commands: Vec<String> },
}

impl StrategySpec {
    /// Wire name of the strategy tag.
    pub fn name(&self) -> &'static str {
        match self {
            StrategySpec::InstallDep { .. } => "install_dep",
            StrategySpec::UpgradeDep { .. } => "upgrade_dep",
            StrategySpec::InstallDepThenSwitch { .. } => "install_dep_then_switch",
            StrategySpec::SwitchMethod { .. } => "switch_method",
            StrategySpec::InstallPackages { .. } => "install_packages",
            StrategySpec::RetryWithModifier { .. } => "retry_with_modifier",
            StrategySpec::AddRepo { .. } => "add_repo",
            StrategySpec::EnvFix { .. } => "env_fix",
            StrategySpec::Manual { .. } => "manual",
            StrategySpec::CleanupRetry { .. } => "cleanup_retry",
        }
    }
}

/// Risk a remediation carries if executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Risk::Low => "low",
            Risk::Medium => "medium",
            Risk::High => "high",
        }
    }
}

/// Computed runtime feasibility of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Can run right now.
    Ready,
    /// Needs something installed first; `unlock_deps` says what.
    Locked,
    /// Cannot work on this system at all.
    Impossible,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Ready => "ready",
            Availability::Locked => "locked",
            Availability::Impossible => "impossible",
        }
    }

    /// Sort rank: more available sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Availability::Ready => 0,
            Availability::Locked => 1,
            Availability::Impossible => 2,
        }
    }
}

/// Catalog layer an option or handler came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Tool-specific handlers.
    Recipe,
    /// Handlers for an install-method family (pip, npm, cargo, ...).
    MethodFamily,
    /// Cross-cutting handlers (network, disk, permissions, OOM, timeout).
    Infrastructure,
    /// Missing package manager or shell tooling.
    Bootstrap,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Recipe => "recipe",
            Layer::MethodFamily => "method_family",
            Layer::Infrastructure => "infrastructure",
            Layer::Bootstrap => "bootstrap",
        }
    }

    /// Sort rank: higher-priority layers sort first.
    pub fn rank(&self) -> u8 {
        match self {
            Layer::Recipe => 0,
            Layer::MethodFamily => 1,
            Layer::Infrastructure => 2,
            Layer::Bootstrap => 3,
        }
    }
}

/// One candidate fix, as authored in the handler catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationOption {
    /// Unique within its handler; cascade-wide unique after dedup.
    pub id: String,
    pub label: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub recommended: bool,
    #[serde(flatten)]
    pub action: StrategySpec,
    /// Defaults to low when the author left it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<Risk>,
    /// Architectures this option can never work on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arch_exclude: Vec<String>,
}

impl RemediationOption {
    pub fn new(id: &str, label: &str, description: &str, icon: &str, action: StrategySpec) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            recommended: false,
            action,
            risk: None,
            arch_exclude: Vec::new(),
        }
    }

    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }

    pub fn risk(mut self, risk: Risk) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn arch_exclude(mut self, archs: &[&str]) -> Self {
        self.arch_exclude = archs.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// A per-call copy of an option as collected by the cascade, annotated with
/// where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedOption {
    #[serde(flatten)]
    pub option: RemediationOption,
    /// Layer of the handler that contributed this option.
    pub source_layer: Layer,
    /// `failure_id` of the handler that contributed this option.
    pub source_failure_id: String,
}

/// A collected option after availability evaluation. Carries every field
/// the cascade produced plus exactly the evaluation results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedOption {
    #[serde(flatten)]
    pub option: RemediationOption,
    pub source_layer: Layer,
    pub source_failure_id: String,
    pub availability: Availability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_deps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_step_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impossible_reason: Option<String>,
    /// Rough number of steps executing this option would take.
    pub step_count: u32,
}
