//! Multi-tier dependency resolution.
//!
//! Maps an abstract dependency name ("pipx", "ssl", "brew") to a concrete,
//! system-specific install command. Before any tier runs, a dependency
//! already discoverable on PATH is reported present. The tiers, each
//! short-circuiting on a hit:
//!
//! 1. Recipe — the dependency is itself a catalogued tool (nested install).
//! 2. Known packages — curated installer command or per-manager package.
//! 3. Library mapping — C-library short name to distro dev package.
//! 4. Identity — assume the dependency name is the package name.
//!
//! Unresolvable means exactly one thing: no install-command template exists
//! for the active package manager.

pub mod commands;
pub mod known_packages;
pub mod lib_mapping;

use serde::{Deserialize, Serialize};
use tracing::debug;

use remedy_common::SystemProfile;

use crate::locator::BinaryLocator;
use crate::recipes::RecipeStore;

pub use commands::{install_command, needs_sudo, NATIVE_MANAGERS};

/// How sure the resolver is that its answer installs the right thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Recipe,
    KnownPackage,
    LibMapping,
    Identity,
    SpecialInstaller,
}

/// A concrete way to install one dependency on this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyResolution {
    pub dep: String,
    pub source: ResolutionSource,
    /// Empty for nested recipe installs and standalone installers.
    pub packages: Vec<String>,
    /// None only for nested recipe installs, which run the dep's own
    /// recipe rather than one command.
    pub install_command: Option<String>,
    pub needs_sudo: bool,
    pub confidence: Confidence,
}

/// Outcome of resolving one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Already on PATH; nothing to install.
    Present,
    /// Installable; here is how.
    Resolvable(DependencyResolution),
    /// No install-command template exists for the active manager.
    Unresolvable,
}

/// Resolve `dep` against this system.
pub fn resolve(
    dep: &str,
    profile: &SystemProfile,
    recipes: &dyn RecipeStore,
    locator: &dyn BinaryLocator,
) -> DependencyStatus {
    // PATH pre-check: the dep's own name, or the CLI its recipe declares.
    if locator.find(dep) {
        debug!(dep, "dependency already on PATH");
        return DependencyStatus::Present;
    }
    if let Some(cli) = recipes.get(dep).and_then(|r| r.cli.as_deref()) {
        if locator.find(cli) {
            debug!(dep, cli, "dependency CLI already on PATH");
            return DependencyStatus::Present;
        }
    }

    let manager = profile.package_manager.primary.as_deref();

    // Tier 1: the dependency is a catalogued tool; install it via its own
    // recipe, not as a flat package.
    if recipes.contains(dep) {
        debug!(dep, "resolved via recipe tier");
        return DependencyStatus::Resolvable(DependencyResolution {
            dep: dep.to_string(),
            source: ResolutionSource::Recipe,
            packages: Vec::new(),
            install_command: None,
            needs_sudo: false,
            confidence: Confidence::High,
        });
    }

    // Tier 2: curated table.
    if let Some(known) = known_packages::lookup(dep) {
        if let Some(installer) = known.installer {
            debug!(dep, "resolved via standalone installer");
            return DependencyStatus::Resolvable(DependencyResolution {
                dep: dep.to_string(),
                source: ResolutionSource::SpecialInstaller,
                packages: Vec::new(),
                install_command: Some(installer.to_string()),
                needs_sudo: false,
                confidence: Confidence::High,
            });
        }
        // No entry for the active manager is a fall-through, not a failure.
        if let Some(manager) = manager {
            if let Some(package) = known.package_for(manager) {
                let packages = vec![package.to_string()];
                if let Some(command) = install_command(manager, &packages) {
                    debug!(dep, manager, package, "resolved via known-packages tier");
                    return DependencyStatus::Resolvable(DependencyResolution {
                        dep: dep.to_string(),
                        source: ResolutionSource::KnownPackage,
                        packages,
                        install_command: Some(command),
                        needs_sudo: needs_sudo(manager, profile),
                        confidence: Confidence::High,
                    });
                }
            }
        }
    }

    // Tier 3: C-library short names.
    if let (Some(family), Some(manager)) = (profile.distro.family.as_deref(), manager) {
        if let Some(package) = lib_mapping::lookup(dep, family) {
            let packages = vec![package.to_string()];
            if let Some(command) = install_command(manager, &packages) {
                debug!(dep, family, package, "resolved via lib-mapping tier");
                return DependencyStatus::Resolvable(DependencyResolution {
                    dep: dep.to_string(),
                    source: ResolutionSource::LibMapping,
                    packages,
                    install_command: Some(command),
                    needs_sudo: needs_sudo(manager, profile),
                    confidence: Confidence::High,
                });
            }
        }
    }

    // Tier 4: assume name == package name under the active manager.
    if let Some(manager) = manager {
        let packages = vec![dep.to_string()];
        if let Some(command) = install_command(manager, &packages) {
            debug!(dep, manager, "resolved via identity tier");
            return DependencyStatus::Resolvable(DependencyResolution {
                dep: dep.to_string(),
                source: ResolutionSource::Identity,
                packages,
                install_command: Some(command),
                needs_sudo: needs_sudo(manager, profile),
                confidence: Confidence::Medium,
            });
        }
    }

    debug!(dep, "dependency unresolvable on this system");
    DependencyStatus::Unresolvable
}
