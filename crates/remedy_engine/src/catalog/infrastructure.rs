//! Infrastructure layer: cross-cutting failures independent of the tool and
//! install method — network, TLS, disk, permissions, OOM, timeouts.
//!
//! The OOM and timeout handlers have empty patterns and match on exit code
//! alone: the kernel's SIGKILL (137) and timeout(1)'s 124 leave nothing
//! useful on stderr. The timeout handler's `detect_fn` is a reserved hook
//! that has never been wired up; it stays declared and inert.

use remedy_common::{PackageMap, RemediationOption, Risk, StrategySpec};

use super::FailureHandler;

fn ca_certs() -> PackageMap {
    ["debian", "fedora", "arch", "alpine", "suse"]
        .iter()
        .map(|family| (family.to_string(), vec!["ca-certificates".to_string()]))
        .collect()
}

pub(super) fn handlers() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "network_unreachable",
            "network",
            "Network problem during download",
            "The installer could not reach the network: DNS, routing or the remote host failed.",
            r"network is unreachable|temporary failure in name resolution|could not resolve host|connection timed out|connection refused|no route to host",
        )
        .options(vec![
            RemediationOption::new(
                "net-retry",
                "Retry the download",
                "Transient network errors usually clear on a retry.",
                "refresh",
                StrategySpec::RetryWithModifier { modifiers: vec![] },
            )
            .recommended(),
            RemediationOption::new(
                "net-proxy",
                "Propagate proxy settings",
                "Corporate networks often need the proxy exported for child processes too.",
                "globe",
                StrategySpec::EnvFix {
                    commands: vec![
                        "export https_proxy=${https_proxy:-$http_proxy}".to_string(),
                        "export no_proxy=localhost,127.0.0.1".to_string(),
                    ],
                },
            ),
            RemediationOption::new(
                "net-manual",
                "Check connectivity by hand",
                "Verify DNS and the default route before retrying.",
                "wrench",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
        FailureHandler::new(
            "tls_certificates",
            "network",
            "TLS certificate verification failed",
            "The download was blocked because the server certificate could not be verified.",
            r"certificate verify failed|ssl certificate problem|unable to get local issuer certificate|self.signed certificate",
        )
        .options(vec![
            RemediationOption::new(
                "tls-ca-certs",
                "Install CA certificates",
                "An outdated or missing CA bundle is the usual cause on minimal images.",
                "shield",
                StrategySpec::InstallPackages {
                    packages: Some(ca_certs()),
                    dynamic_packages: false,
                },
            )
            .recommended(),
            RemediationOption::new(
                "tls-clock",
                "Check the system clock",
                "A clock far off from real time makes every certificate look invalid.",
                "clock",
                StrategySpec::Manual {
                    instructions: Some(
                        "Run `date`; if the clock is wrong, sync it (e.g. `timedatectl set-ntp true`) and retry.".to_string(),
                    ),
                },
            ),
        ]),
        FailureHandler::new(
            "disk_full",
            "disk",
            "No space left on device",
            "The filesystem filled up mid-install.",
            r"no space left on device|disk quota exceeded",
        )
        .options(vec![
            RemediationOption::new(
                "disk-clean-retry",
                "Clean caches and retry",
                "Vacuum the journal and drop the package-manager cache, then retry the step.",
                "trash",
                StrategySpec::CleanupRetry {
                    commands: vec![
                        "journalctl --vacuum-size=100M".to_string(),
                        "apt-get clean || dnf clean all || pacman -Scc --noconfirm || true"
                            .to_string(),
                    ],
                },
            )
            .recommended()
            .risk(Risk::Medium),
            RemediationOption::new(
                "disk-manual",
                "Free space by hand",
                "Find what is eating the disk (`du -xh / | sort -h | tail`) before retrying.",
                "wrench",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
        FailureHandler::new(
            "permission_denied",
            "permissions",
            "Permission denied",
            "The install step wrote somewhere the current user cannot.",
            r"permission denied|EACCES|operation not permitted",
        )
        .options(vec![
            RemediationOption::new(
                "perm-sudo-retry",
                "Retry with sudo",
                "Re-run the same step with elevation.",
                "lock-open",
                StrategySpec::RetryWithModifier {
                    modifiers: vec!["sudo".to_string()],
                },
            )
            .recommended()
            .risk(Risk::Medium),
            RemediationOption::new(
                "perm-user-scope",
                "Install into the user's home instead",
                "Most installers accept a user-scoped prefix that needs no elevation.",
                "home",
                StrategySpec::Manual {
                    instructions: Some(
                        "Re-run with a user prefix (e.g. `pip install --user`, `npm config set prefix ~/.local`).".to_string(),
                    ),
                },
            ),
        ]),
        // Exit 137 = SIGKILL, almost always the kernel OOM killer.
        FailureHandler::new(
            "oom_killed",
            "resources",
            "Install was killed (out of memory)",
            "The process was SIGKILLed, almost always by the kernel OOM killer during a parallel build.",
            "",
        )
        .exit_code(137)
        .options(vec![
            RemediationOption::new(
                "reduce-parallelism",
                "Retry with a single job",
                "Serial builds need a fraction of the memory.",
                "gauge",
                StrategySpec::RetryWithModifier {
                    modifiers: vec!["--jobs=1".to_string()],
                },
            )
            .recommended(),
            RemediationOption::new(
                "add-swap",
                "Add swap space",
                "A temporary swap file lets the build finish on small machines.",
                "database",
                StrategySpec::Manual {
                    instructions: Some(
                        "fallocate -l 2G /swapfile && chmod 600 /swapfile && mkswap /swapfile && swapon /swapfile".to_string(),
                    ),
                },
            )
            .risk(Risk::Medium),
        ]),
        FailureHandler::new(
            "step_timeout",
            "resources",
            "Install step timed out",
            "The step exceeded the execution layer's time limit.",
            "",
        )
        .exit_code(124)
        .detect_fn("detect_timeout")
        .options(vec![
            RemediationOption::new(
                "timeout-retry",
                "Retry the step",
                "Slow mirrors and cold caches often clear on a second attempt.",
                "refresh",
                StrategySpec::RetryWithModifier { modifiers: vec![] },
            )
            .recommended(),
            RemediationOption::new(
                "timeout-mirror",
                "Switch to a faster mirror",
                "Point the package manager at a closer mirror before retrying.",
                "globe",
                StrategySpec::Manual { instructions: None },
            ),
        ]),
    ]
}
