//! Bootstrap layer: the machine is missing the tooling every other
//! remediation assumes (a package manager, core shell tools). Lowest
//! priority — anything more specific should win the summary.

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

pub(super) fn handlers() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "missing_package_manager",
            "bootstrap",
            "Package manager not found",
            "The install command expected a system package manager that is not on this machine.",
            r"(?:apt-get|apt|dnf|yum|pacman|zypper|apk): (?:command )?not found",
        )
        .options(vec![
            RemediationOption::new(
                "bootstrap-brew",
                "Install Homebrew and use it",
                "Homebrew installs to the user's home directory and works on any distro without root.",
                "beer",
                StrategySpec::InstallDepThenSwitch {
                    dep: "brew".to_string(),
                    then_method: "brew".to_string(),
                },
            )
            .recommended(),
            RemediationOption::new(
                "bootstrap-manual",
                "Fix the package manager by hand",
                "The expected manager may be misnamed for this distro (e.g. apt on Fedora). Check which distro this is and use its native manager.",
                "wrench",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
        FailureHandler::new(
            "missing_core_tool",
            "bootstrap",
            "Core download tool not found",
            "A basic tool the installer relies on (curl, wget, tar, unzip or git) is missing.",
            r"(?:curl|wget|tar|unzip|git): (?:command )?not found",
        )
        .options(vec![
            RemediationOption::new(
                "bootstrap-core-tools",
                "Install the core tools",
                "Install curl, wget, tar, unzip and git from the distro repositories.",
                "package",
                StrategySpec::InstallPackages {
                    packages: Some(pkgs(&[
                        ("debian", &["curl", "wget", "tar", "unzip", "git"]),
                        ("fedora", &["curl", "wget", "tar", "unzip", "git"]),
                        ("arch", &["curl", "wget", "tar", "unzip", "git"]),
                        ("alpine", &["curl", "wget", "tar", "unzip", "git"]),
                        ("suse", &["curl", "wget", "tar", "unzip", "git"]),
                    ])),
                    dynamic_packages: false,
                },
            )
            .recommended()
            .risk(Risk::Low),
            RemediationOption::new(
                "bootstrap-core-manual",
                "Install the missing tool by hand",
                "Only one tool may be missing; the error names it.",
                "wrench",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
    ]
}
