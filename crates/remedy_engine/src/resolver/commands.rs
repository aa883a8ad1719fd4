//! Per-manager install-command templates and the elevation rule.

use remedy_common::SystemProfile;

/// Distro-native package managers. A switch to one of these is pointless on
/// a system whose detected manager inventory excludes it.
pub const NATIVE_MANAGERS: &[&str] = &["apt", "dnf", "yum", "apk", "pacman", "zypper"];

/// Build the install command for `packages` under `manager`. None when no
/// template exists for that manager — the resolver's definition of a truly
/// unresolvable dependency.
pub fn install_command(manager: &str, packages: &[String]) -> Option<String> {
    if packages.is_empty() {
        return None;
    }
    let list = packages.join(" ");
    let command = match manager {
        "apt" => format!("apt-get install -y {}", list),
        "dnf" => format!("dnf install -y {}", list),
        "yum" => format!("yum install -y {}", list),
        "apk" => format!("apk add {}", list),
        "pacman" => format!("pacman -S --noconfirm --needed {}", list),
        "zypper" => format!("zypper install -y {}", list),
        "brew" => format!("brew install {}", list),
        "snap" => format!("snap install {}", list),
        _ => return None,
    };
    Some(command)
}

/// Whether installing through `manager` needs elevation. brew must never
/// run elevated; root needs none.
pub fn needs_sudo(manager: &str, profile: &SystemProfile) -> bool {
    if manager == "brew" {
        return false;
    }
    !profile.is_root()
}
