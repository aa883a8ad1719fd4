//! Per-option availability evaluation.
//!
//! Given a collected option, the effective recipe and a system-profile
//! snapshot, compute ready / locked / impossible and stamp the result onto
//! the option's per-call copy. Unknown profile facts skip their checks;
//! an architecture exclusion overrides everything else.

use remedy_common::{
    Availability, CollectedOption, EvaluatedOption, Recipe, Risk, StrategySpec, SystemProfile,
};

use crate::locator::BinaryLocator;
use crate::recipes::RecipeStore;
use crate::resolver::{self, DependencyStatus, ResolutionSource, NATIVE_MANAGERS};

#[derive(Debug, Default)]
struct Outcome {
    availability: Option<Availability>,
    lock_reason: Option<String>,
    unlock_deps: Option<Vec<String>>,
    unlock_step_count: Option<u32>,
    impossible_reason: Option<String>,
}

impl Outcome {
    fn ready() -> Self {
        Self {
            availability: Some(Availability::Ready),
            ..Self::default()
        }
    }

    fn locked(reason: String, deps: Vec<String>, steps: u32) -> Self {
        Self {
            availability: Some(Availability::Locked),
            lock_reason: Some(reason),
            unlock_deps: Some(deps),
            unlock_step_count: Some(steps),
            ..Self::default()
        }
    }

    fn impossible(reason: String) -> Self {
        Self {
            availability: Some(Availability::Impossible),
            impossible_reason: Some(reason),
            ..Self::default()
        }
    }
}

/// Evaluate one collected option against the system. Consumes the per-call
/// copy and returns it annotated; the catalog copy is untouched.
pub fn evaluate(
    collected: CollectedOption,
    recipe: Option<&Recipe>,
    profile: &SystemProfile,
    recipes: &dyn RecipeStore,
    locator: &dyn BinaryLocator,
) -> EvaluatedOption {
    let mut option = collected.option;

    // Unset risk defaults to low.
    if option.risk.is_none() {
        option.risk = Some(Risk::Low);
    }

    let outcome = outcome_for(&option.action, &option.arch_exclude, recipe, profile, recipes, locator);

    let step_count = step_estimate(&option.action);

    EvaluatedOption {
        option,
        source_layer: collected.source_layer,
        source_failure_id: collected.source_failure_id,
        availability: outcome.availability.unwrap_or(Availability::Ready),
        lock_reason: outcome.lock_reason,
        unlock_deps: outcome.unlock_deps,
        unlock_step_count: outcome.unlock_step_count,
        impossible_reason: outcome.impossible_reason,
        step_count,
    }
}

fn outcome_for(
    action: &StrategySpec,
    arch_exclude: &[String],
    recipe: Option<&Recipe>,
    profile: &SystemProfile,
    recipes: &dyn RecipeStore,
    locator: &dyn BinaryLocator,
) -> Outcome {
    // Architecture exclusion overrides every other rule.
    if let Some(arch) = profile.arch.as_deref() {
        if arch_exclude.iter().any(|a| a == arch) {
            return Outcome::impossible(format!("Not supported on {} machines", arch));
        }
    }

    match action {
        StrategySpec::InstallDep { dep } | StrategySpec::UpgradeDep { dep } => {
            dependency_outcome(dep, profile, recipes, locator)
        }
        // The switch target is deliberately not checked against the recipe:
        // the dependency may supply its own installer.
        StrategySpec::InstallDepThenSwitch { dep, .. } => {
            dependency_outcome(dep, profile, recipes, locator)
        }
        StrategySpec::SwitchMethod { method } => {
            switch_outcome(method, recipe, profile, locator)
        }
        StrategySpec::InstallPackages {
            packages,
            dynamic_packages,
        } => packages_outcome(packages.as_ref(), *dynamic_packages, profile),
        // No external resource dependency: always ready.
        StrategySpec::RetryWithModifier { .. }
        | StrategySpec::AddRepo { .. }
        | StrategySpec::EnvFix { .. }
        | StrategySpec::Manual { .. }
        | StrategySpec::CleanupRetry { .. } => Outcome::ready(),
    }
}

fn dependency_outcome(
    dep: &str,
    profile: &SystemProfile,
    recipes: &dyn RecipeStore,
    locator: &dyn BinaryLocator,
) -> Outcome {
    match resolver::resolve(dep, profile, recipes, locator) {
        DependencyStatus::Present => Outcome::ready(),
        DependencyStatus::Resolvable(res) => {
            let steps = match res.source {
                // A nested install runs the dep's own recipe.
                ResolutionSource::Recipe => recipes
                    .get(dep)
                    .and_then(|r| r.install.values().next())
                    .map(|steps| steps.len().max(1) as u32)
                    .unwrap_or(1),
                _ => 1,
            };
            Outcome::locked(
                format!("Requires {} to be installed first", dep),
                vec![dep.to_string()],
                steps,
            )
        }
        // Conservative: keep the option, assume a system package.
        DependencyStatus::Unresolvable => Outcome::locked(
            format!("Requires {} (assumed to be a system package)", dep),
            vec![dep.to_string()],
            1,
        ),
    }
}

fn switch_outcome(
    target: &str,
    recipe: Option<&Recipe>,
    profile: &SystemProfile,
    locator: &dyn BinaryLocator,
) -> Outcome {
    if target.is_empty() {
        return Outcome::impossible("Option has no target method".to_string());
    }

    if target == "snap" {
        if profile.capabilities.has_systemd == Some(false) {
            return Outcome::impossible(
                "snap requires systemd, which this system does not run".to_string(),
            );
        }
        if profile.package_manager.snap_available == Some(false) {
            return Outcome::locked(
                "snapd is not installed".to_string(),
                vec!["snapd".to_string()],
                1,
            );
        }
    } else if target == "brew" {
        // brew installs anywhere: absent means locked, never impossible.
        if !profile.has_manager("brew") && !locator.find("brew") {
            return Outcome::locked(
                "Homebrew is not installed".to_string(),
                vec!["brew".to_string()],
                1,
            );
        }
    } else if NATIVE_MANAGERS.contains(&target)
        && profile.managers_known()
        && !profile.has_manager(target)
    {
        return Outcome::impossible(format!("{} is not available on this system", target));
    }

    match recipe {
        Some(r) if !r.supports_method(target) => {
            Outcome::impossible(format!("Recipe has no {} install method", target))
        }
        // No recipe to consult: skip the check.
        _ => Outcome::ready(),
    }
}

fn packages_outcome(
    packages: Option<&remedy_common::PackageMap>,
    dynamic_packages: bool,
    profile: &SystemProfile,
) -> Outcome {
    if profile.container.read_only_rootfs == Some(true) {
        return Outcome::impossible(
            "Root filesystem is read-only; system packages cannot be installed".to_string(),
        );
    }

    // Package selection deferred to execution time.
    if dynamic_packages {
        return Outcome::ready();
    }

    match packages {
        None => Outcome::impossible("Option carries no package mapping".to_string()),
        Some(map) => match profile.distro.family.as_deref() {
            Some(family) if !map.contains_key(family) => {
                Outcome::impossible(format!("No packages defined for the {} family", family))
            }
            _ => Outcome::ready(),
        },
    }
}

/// Rough executable-step estimate per strategy, for display.
fn step_estimate(action: &StrategySpec) -> u32 {
    match action {
        StrategySpec::InstallDep { .. }
        | StrategySpec::UpgradeDep { .. }
        | StrategySpec::InstallDepThenSwitch { .. } => 2,
        StrategySpec::SwitchMethod { .. }
        | StrategySpec::InstallPackages { .. }
        | StrategySpec::RetryWithModifier { .. }
        | StrategySpec::Manual { .. } => 1,
        StrategySpec::AddRepo { commands }
        | StrategySpec::EnvFix { commands }
        | StrategySpec::CleanupRetry { commands } => commands.len() as u32 + 1,
    }
}
