//! Method-family layer: failures characteristic of one install method
//! (pip, npm, cargo, apt, brew, snap, curl-pipe scripts), whatever tool is
//! being installed.

use std::collections::HashMap;

use remedy_common::{PackageMap, RemediationOption, Risk, StrategySpec};

use super::FailureHandler;

fn pkgs(entries: &[(&str, &[&str])]) -> PackageMap {
    entries
        .iter()
        .map(|(family, names)| {
            (
                family.to_string(),
                names.iter().map(|n| n.to_string()).collect(),
            )
        })
        .collect()
}

fn build_tools() -> PackageMap {
    pkgs(&[
        ("debian", &["build-essential"]),
        ("fedora", &["gcc", "gcc-c++", "make"]),
        ("arch", &["base-devel"]),
        ("alpine", &["build-base"]),
        ("suse", &["gcc", "gcc-c++", "make"]),
    ])
}

pub(super) fn handlers() -> HashMap<String, Vec<FailureHandler>> {
    let mut families = HashMap::new();
    families.insert("pip".to_string(), pip());
    families.insert("npm".to_string(), npm());
    families.insert("cargo".to_string(), cargo());
    families.insert("apt".to_string(), apt());
    families.insert("brew".to_string(), brew());
    families.insert("snap".to_string(), snap());
    families.insert("script".to_string(), script());
    families
}

fn pip() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "pep668",
            "method",
            "Python environment is externally managed",
            "PEP 668: this distro blocks pip from installing into the system Python.",
            r"externally-managed-environment",
        )
        .options(vec![
            RemediationOption::new(
                "use-pipx",
                "Install with pipx instead",
                "pipx puts CLI tools in isolated virtualenvs; it is the supported way on PEP 668 distros.",
                "box",
                StrategySpec::InstallDepThenSwitch {
                    dep: "pipx".to_string(),
                    then_method: "pipx".to_string(),
                },
            )
            .recommended(),
            RemediationOption::new(
                "use-apt",
                "Install the distro package",
                "The tool may be packaged by the distro already.",
                "package",
                StrategySpec::SwitchMethod {
                    method: "apt".to_string(),
                },
            ),
            RemediationOption::new(
                "break-system-packages",
                "Override the protection",
                "Pass --break-system-packages. Can corrupt the system Python.",
                "alert-triangle",
                StrategySpec::RetryWithModifier {
                    modifiers: vec!["--break-system-packages".to_string()],
                },
            )
            .risk(Risk::High),
        ]),
        FailureHandler::new(
            "pip_build_failure",
            "method",
            "Python package failed to build",
            "A source build needed compilers or Python headers that are missing.",
            r"fatal error: Python\.h|error: command .*(?:gcc|cc|clang).* failed|Failed building wheel for",
        )
        .options(vec![
            RemediationOption::new(
                "pip-install-headers",
                "Install Python build dependencies",
                "Install the Python headers and a compiler toolchain.",
                "package",
                StrategySpec::InstallPackages {
                    packages: Some(pkgs(&[
                        ("debian", &["python3-dev", "build-essential"]),
                        ("fedora", &["python3-devel", "gcc"]),
                        ("arch", &["python", "base-devel"]),
                        ("alpine", &["python3-dev", "build-base"]),
                        ("suse", &["python3-devel", "gcc"]),
                    ])),
                    dynamic_packages: false,
                },
            )
            .recommended(),
            RemediationOption::new(
                "pip-only-binary",
                "Use prebuilt wheels only",
                "Skip the source build entirely; fails if no wheel exists for this platform.",
                "box",
                StrategySpec::RetryWithModifier {
                    modifiers: vec!["--only-binary=:all:".to_string()],
                },
            ),
        ]),
        FailureHandler::new(
            "pip_too_old",
            "method",
            "pip is too old for this package",
            "The package's metadata needs a newer pip than the one installed.",
            r"requires pip >=|requires a (?:newer|more recent) version of pip",
        )
        .options(vec![
            RemediationOption::new(
                "upgrade-pip",
                "Upgrade pip",
                "Upgrade pip itself, then retry the install.",
                "arrow-up",
                StrategySpec::UpgradeDep {
                    dep: "pip".to_string(),
                },
            )
            .recommended(),
            RemediationOption::new(
                "pip-old-use-apt",
                "Install the distro package",
                "Sidestep pip entirely if the distro packages this tool.",
                "package",
                StrategySpec::SwitchMethod {
                    method: "apt".to_string(),
                },
            ),
        ]),
    ]
}

fn npm() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "npm_missing",
            "method",
            "npm is not installed",
            "The install method is npm but node/npm is not on this machine.",
            r"npm: (?:command )?not found",
        )
        .options(vec![
            RemediationOption::new(
                "install-node",
                "Install Node.js",
                "Install node (which brings npm), then retry.",
                "package",
                StrategySpec::InstallDep {
                    dep: "node".to_string(),
                },
            )
            .recommended(),
            RemediationOption::new(
                "use-nvm",
                "Install via nvm",
                "nvm manages per-user Node versions without root.",
                "box",
                StrategySpec::InstallDepThenSwitch {
                    dep: "nvm".to_string(),
                    then_method: "nvm".to_string(),
                },
            ),
        ]),
        FailureHandler::new(
            "npm_eacces",
            "method",
            "npm cannot write to the global prefix",
            "Global npm installs default to a root-owned directory.",
            r"npm err!.*eacces|eacces.*node_modules",
        )
        .options(vec![
            RemediationOption::new(
                "npm-user-prefix",
                "Point npm at a user-writable prefix",
                "Set the prefix to ~/.local and put its bin on PATH. The npm-documented fix.",
                "home",
                StrategySpec::EnvFix {
                    commands: vec![
                        "npm config set prefix ~/.local".to_string(),
                        "export PATH=$HOME/.local/bin:$PATH".to_string(),
                    ],
                },
            )
            .recommended(),
            RemediationOption::new(
                "npm-sudo",
                "Retry with sudo",
                "Works, but root-owned global modules cause the same problem again later.",
                "lock-open",
                StrategySpec::RetryWithModifier {
                    modifiers: vec!["sudo".to_string()],
                },
            )
            .risk(Risk::High),
        ]),
        FailureHandler::new(
            "node_gyp_failure",
            "method",
            "Native Node module failed to build",
            "node-gyp needs python and a C++ toolchain to compile native addons.",
            r"node-gyp|gyp err!",
        )
        .options(vec![
            RemediationOption::new(
                "npm-build-tools",
                "Install the native build toolchain",
                "Install a compiler, make and python3 for node-gyp.",
                "package",
                StrategySpec::InstallPackages {
                    packages: Some(pkgs(&[
                        ("debian", &["build-essential", "python3"]),
                        ("fedora", &["gcc-c++", "make", "python3"]),
                        ("arch", &["base-devel", "python"]),
                        ("alpine", &["build-base", "python3"]),
                        ("suse", &["gcc-c++", "make", "python3"]),
                    ])),
                    dynamic_packages: false,
                },
            )
            .recommended(),
        ]),
    ]
}

fn cargo() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "cargo_linker_missing",
            "method",
            "No C linker for the Rust build",
            "cargo needs cc to link even pure-Rust crates.",
            r"linker `cc` not found|error: linking with `cc` failed",
        )
        .options(vec![
            RemediationOption::new(
                "cargo-build-tools",
                "Install the C toolchain",
                "Install gcc/make so the linker exists.",
                "package",
                StrategySpec::InstallPackages {
                    packages: Some(build_tools()),
                    dynamic_packages: false,
                },
            )
            .recommended(),
        ]),
        FailureHandler::new(
            "cargo_openssl_sys",
            "method",
            "OpenSSL development files missing",
            "The openssl-sys build script could not find OpenSSL headers or pkg-config.",
            r"failed to run custom build command for `openssl-sys`|could not find directory of openssl",
        )
        .options(vec![
            RemediationOption::new(
                "cargo-ssl-dev",
                "Install OpenSSL headers",
                "Install the distro's OpenSSL development package.",
                "package",
                StrategySpec::InstallDep {
                    dep: "ssl".to_string(),
                },
            )
            .recommended(),
            RemediationOption::new(
                "cargo-pkg-config",
                "Install pkg-config",
                "openssl-sys locates OpenSSL through pkg-config.",
                "package",
                StrategySpec::InstallDep {
                    dep: "pkg-config".to_string(),
                },
            ),
        ]),
        FailureHandler::new(
            "cargo_missing_syslib",
            "method",
            "A system library is missing at link time",
            "The linker could not find a system library (`cannot find -lfoo`).",
            r"cannot find -l\w+",
        )
        .options(vec![
            RemediationOption::new(
                "cargo-install-syslib",
                "Install the missing library's dev package",
                "The library name is parsed from the error and mapped to this distro's dev package at execution time.",
                "package",
                StrategySpec::InstallPackages {
                    packages: None,
                    dynamic_packages: true,
                },
            )
            .recommended(),
            RemediationOption::new(
                "cargo-syslib-manual",
                "Identify the library by hand",
                "Find which package ships the library the error names, install it, retry.",
                "wrench",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
    ]
}

fn apt() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "apt_lock_held",
            "method",
            "Package database is locked",
            "Another apt/dpkg process holds the lock, or a previous run was interrupted.",
            r"could not get lock|dpkg was interrupted|lock file .*dpkg",
        )
        .options(vec![
            RemediationOption::new(
                "apt-wait-retry",
                "Wait and retry",
                "Unattended upgrades usually release the lock within minutes.",
                "refresh",
                StrategySpec::RetryWithModifier { modifiers: vec![] },
            )
            .recommended(),
            RemediationOption::new(
                "apt-fix-dpkg",
                "Repair the interrupted dpkg run",
                "Run `dpkg --configure -a`, then retry the install.",
                "wrench",
                StrategySpec::CleanupRetry {
                    commands: vec!["dpkg --configure -a".to_string()],
                },
            )
            .risk(Risk::Medium),
        ]),
        FailureHandler::new(
            "apt_unlocatable",
            "method",
            "apt cannot find the package",
            "The package index is stale, or the package lives in a repo that is not enabled.",
            r"unable to locate package|has no installation candidate",
        )
        .options(vec![
            RemediationOption::new(
                "apt-update-retry",
                "Refresh the package index",
                "Run `apt-get update`, then retry.",
                "refresh",
                StrategySpec::CleanupRetry {
                    commands: vec!["apt-get update".to_string()],
                },
            )
            .recommended(),
            RemediationOption::new(
                "apt-enable-universe",
                "Enable the universe repository",
                "On Ubuntu, many tools live in universe.",
                "plus",
                StrategySpec::AddRepo {
                    commands: vec![
                        "add-apt-repository universe".to_string(),
                        "apt-get update".to_string(),
                    ],
                },
            )
            .risk(Risk::Medium),
            RemediationOption::new(
                "apt-use-brew",
                "Install with Homebrew instead",
                "Homebrew often carries newer tools than the distro.",
                "beer",
                StrategySpec::SwitchMethod {
                    method: "brew".to_string(),
                },
            ),
        ]),
    ]
}

fn brew() -> Vec<FailureHandler> {
    vec![FailureHandler::new(
        "brew_no_formula",
        "method",
        "Homebrew has no formula for this tool",
        "brew does not know the requested formula under this name.",
        r"no available formula|no formulae found",
    )
    .options(vec![
        RemediationOption::new(
            "brew-update-retry",
            "Update brew and retry",
            "The formula may simply be newer than the local tap clone.",
            "refresh",
            StrategySpec::CleanupRetry {
                commands: vec!["brew update".to_string()],
            },
        )
        .recommended(),
        RemediationOption::new(
            "brew-use-script",
            "Use the vendor install script",
            "Fall back to the tool's own installer.",
            "terminal",
            StrategySpec::SwitchMethod {
                method: "script".to_string(),
            },
        ),
    ])]
}

fn snap() -> Vec<FailureHandler> {
    vec![FailureHandler::new(
        "snapd_unavailable",
        "method",
        "snapd is not responding",
        "The snap command exists but cannot talk to snapd.",
        r"cannot communicate with server|snapd\.socket",
    )
    .options(vec![
        RemediationOption::new(
            "snap-start-snapd",
            "Start the snapd service",
            "Enable and start snapd.socket, then retry.",
            "play",
            StrategySpec::EnvFix {
                commands: vec!["systemctl enable --now snapd.socket".to_string()],
            },
        )
        .recommended()
        .risk(Risk::Medium),
        RemediationOption::new(
            "snap-use-apt",
            "Install the distro package instead",
            "Skip snap entirely.",
            "package",
            StrategySpec::SwitchMethod {
                method: "apt".to_string(),
            },
        ),
    ])]
}

fn script() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "script_url_gone",
            "method",
            "Install script URL is gone",
            "The vendor moved or removed the install script (HTTP 404).",
            r"404[: ]+not found|the requested url returned error: 404",
        )
        .options(vec![
            RemediationOption::new(
                "script-check-url",
                "Find the current install URL",
                "Vendors move install scripts; check the project's install docs for the new one.",
                "wrench",
                StrategySpec::Manual { instructions: None },
            )
            .recommended(),
            RemediationOption::new(
                "script-use-apt",
                "Install the distro package instead",
                "The distro package avoids the vendor URL entirely.",
                "package",
                StrategySpec::SwitchMethod {
                    method: "apt".to_string(),
                },
            ),
        ]),
        FailureHandler::new(
            "script_checksum",
            "method",
            "Downloaded script failed verification",
            "The checksum did not match — usually a truncated download.",
            r"checksum mismatch|sha256sum: warning",
        )
        .options(vec![
            RemediationOption::new(
                "script-redownload",
                "Download again and retry",
                "Truncated downloads are transient; a clean retry usually verifies.",
                "refresh",
                StrategySpec::RetryWithModifier { modifiers: vec![] },
            )
            .recommended(),
            RemediationOption::new(
                "script-checksum-manual",
                "Verify against the published checksum",
                "If the mismatch persists, compare with the vendor's published checksum before running anything.",
                "shield",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
    ]
}
