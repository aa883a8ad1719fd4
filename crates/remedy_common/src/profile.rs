//! System profile snapshot consumed by the availability evaluator.
//!
//! Produced by an external detector and handed to the engine read-only.
//! Every field is optional: a missing value means "unknown — skip that
//! check", never an error. Deserializing `{}` yields a fully-unknown
//! profile that disables all system-dependent feasibility rules.

use serde::{Deserialize, Serialize};

/// Snapshot of target-machine facts used to compute option availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemProfile {
    /// Machine architecture as reported by the detector (e.g. "x86_64",
    /// "aarch64", "armv7l").
    pub arch: Option<String>,

    /// Distribution identity.
    pub distro: DistroInfo,

    /// Container runtime facts.
    pub container: ContainerInfo,

    /// Privilege and init-system capabilities.
    pub capabilities: Capabilities,

    /// Package-manager inventory.
    pub package_manager: PackageManagers,
}

/// Distribution identity as detected on the target machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistroInfo {
    /// Package-compatibility family: "debian", "fedora", "arch", "alpine",
    /// "suse". Drives distro-keyed package maps.
    pub family: Option<String>,

    /// Pretty name, display only (e.g. "Debian GNU/Linux 12").
    pub name: Option<String>,

    /// Release version, display only.
    pub version: Option<String>,
}

/// Container runtime facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerInfo {
    /// Whether the target runs inside a container at all.
    pub in_container: Option<bool>,

    /// Whether the root filesystem is mounted read-only. When true, any
    /// option that installs system packages is infeasible.
    pub read_only_rootfs: Option<bool>,
}

/// Privilege and init-system capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Whether systemd is present and running (snapd requires it).
    pub has_systemd: Option<bool>,

    /// Whether the current user is root.
    pub is_root: Option<bool>,

    /// Whether the current user can elevate via sudo.
    pub can_sudo: Option<bool>,
}

/// Package-manager inventory on the target machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagers {
    /// The distro's primary manager (e.g. "apt" on Debian).
    pub primary: Option<String>,

    /// All managers detected on PATH. An empty list means the inventory is
    /// unknown, not that no manager exists.
    pub available: Vec<String>,

    /// Whether snapd is installed and its socket answers.
    pub snap_available: Option<bool>,
}

impl SystemProfile {
    /// A profile with every fact unknown. Evaluation against it skips all
    /// system-dependent checks.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True when the manager inventory is known and includes `manager`.
    pub fn has_manager(&self, manager: &str) -> bool {
        self.package_manager
            .available
            .iter()
            .any(|m| m == manager)
    }

    /// True when the manager inventory was actually detected.
    pub fn managers_known(&self) -> bool {
        !self.package_manager.available.is_empty()
    }

    /// True only when the detector positively reported root.
    pub fn is_root(&self) -> bool {
        self.capabilities.is_root == Some(true)
    }
}
