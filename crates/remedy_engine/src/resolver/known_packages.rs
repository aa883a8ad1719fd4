//! Curated map from tool/binary names to how they install.
//!
//! An entry either names a standalone installer (rustup-style curl|sh, no
//! package manager involved) or the per-manager package name, which often
//! differs from the binary name (pipx is python-pipx on Arch, pip is
//! py3-pip on Alpine). Absence of the active manager in an entry is a
//! fall-through, not a failure.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// How a curated tool installs.
#[derive(Debug, Clone, Copy)]
pub struct KnownPackage {
    /// Standalone installer command; takes precedence over packages.
    pub installer: Option<&'static str>,
    /// (manager, package name) pairs.
    pub packages: &'static [(&'static str, &'static str)],
}

static KNOWN_PACKAGES: Lazy<HashMap<&'static str, KnownPackage>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Standalone installers: never installed via a system package.
    map.insert(
        "rustup",
        KnownPackage {
            installer: Some(
                "curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y",
            ),
            packages: &[],
        },
    );
    map.insert(
        "nvm",
        KnownPackage {
            installer: Some(
                "curl -o- https://raw.githubusercontent.com/nvm-sh/nvm/v0.40.1/install.sh | bash",
            ),
            packages: &[],
        },
    );
    map.insert(
        "brew",
        KnownPackage {
            installer: Some(
                "/bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"",
            ),
            packages: &[],
        },
    );

    map.insert(
        "pipx",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "pipx"),
                ("dnf", "pipx"),
                ("pacman", "python-pipx"),
                ("apk", "pipx"),
                ("zypper", "python3-pipx"),
                ("brew", "pipx"),
            ],
        },
    );
    map.insert(
        "pip",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "python3-pip"),
                ("dnf", "python3-pip"),
                ("pacman", "python-pip"),
                ("apk", "py3-pip"),
                ("zypper", "python3-pip"),
            ],
        },
    );
    map.insert(
        "node",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "nodejs"),
                ("dnf", "nodejs"),
                ("pacman", "nodejs"),
                ("apk", "nodejs"),
                ("zypper", "nodejs"),
                ("brew", "node"),
                ("snap", "node"),
            ],
        },
    );
    map.insert(
        "pkg-config",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "pkg-config"),
                ("dnf", "pkgconf"),
                ("pacman", "pkgconf"),
                ("apk", "pkgconf"),
                ("zypper", "pkg-config"),
                ("brew", "pkg-config"),
            ],
        },
    );
    map.insert(
        "docker",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "docker.io"),
                ("dnf", "moby-engine"),
                ("pacman", "docker"),
                ("apk", "docker"),
                ("zypper", "docker"),
            ],
        },
    );
    map.insert(
        "go",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "golang"),
                ("dnf", "golang"),
                ("pacman", "go"),
                ("apk", "go"),
                ("zypper", "go"),
                ("brew", "go"),
                ("snap", "go"),
            ],
        },
    );
    map.insert(
        "git",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "git"),
                ("dnf", "git"),
                ("pacman", "git"),
                ("apk", "git"),
                ("zypper", "git"),
                ("brew", "git"),
            ],
        },
    );
    map.insert(
        "cmake",
        KnownPackage {
            installer: None,
            packages: &[
                ("apt", "cmake"),
                ("dnf", "cmake"),
                ("pacman", "cmake"),
                ("apk", "cmake"),
                ("zypper", "cmake"),
                ("brew", "cmake"),
            ],
        },
    );

    map
});

/// Curated entry for `name`, if any.
pub fn lookup(name: &str) -> Option<&'static KnownPackage> {
    KNOWN_PACKAGES.get(name)
}

impl KnownPackage {
    /// Package name under `manager`, if curated.
    pub fn package_for(&self, manager: &str) -> Option<&'static str> {
        self.packages
            .iter()
            .find(|(m, _)| *m == manager)
            .map(|(_, pkg)| *pkg)
    }
}
