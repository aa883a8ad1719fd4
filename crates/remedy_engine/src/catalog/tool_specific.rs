//! Tool-specific ("recipe") layer: the highest-priority handlers, keyed by
//! tool id, for failures peculiar to one tool.

use std::collections::HashMap;

use remedy_common::{RemediationOption, Risk, StrategySpec};

use super::FailureHandler;

pub(super) fn handlers() -> HashMap<String, Vec<FailureHandler>> {
    let mut tools = HashMap::new();
    tools.insert("docker".to_string(), docker());
    tools.insert("terraform".to_string(), terraform());
    tools
}

fn docker() -> Vec<FailureHandler> {
    vec![
        FailureHandler::new(
            "docker_daemon_down",
            "tool",
            "Docker daemon is not running",
            "The docker CLI installed fine but cannot reach a running daemon.",
            r"cannot connect to the docker daemon|is the docker daemon running",
        )
        .options(vec![
            RemediationOption::new(
                "docker-start-daemon",
                "Start the Docker service",
                "Enable and start docker.service, then retry.",
                "play",
                StrategySpec::EnvFix {
                    commands: vec!["systemctl enable --now docker".to_string()],
                },
            )
            .recommended()
            .risk(Risk::Medium),
            RemediationOption::new(
                "docker-rootless",
                "Set up rootless Docker",
                "Rootless mode runs the daemon under the current user, no systemwide service needed.",
                "user",
                StrategySpec::Manual {
                    instructions: Some("Run `dockerd-rootless-setuptool.sh install`.".to_string()),
                },
            ),
        ]),
        FailureHandler::new(
            "docker_socket_denied",
            "tool",
            "No permission on the Docker socket",
            "The daemon is up but /var/run/docker.sock is only writable by the docker group.",
            r"permission denied while trying to connect to the docker daemon socket",
        )
        .options(vec![
            RemediationOption::new(
                "docker-add-group",
                "Add the user to the docker group",
                "Grants socket access. Takes effect on next login.",
                "users",
                StrategySpec::EnvFix {
                    commands: vec!["usermod -aG docker $USER".to_string()],
                },
            )
            .recommended()
            .risk(Risk::Medium),
            RemediationOption::new(
                "docker-sudo",
                "Retry with sudo",
                "Works immediately but must be repeated on every call.",
                "lock-open",
                StrategySpec::RetryWithModifier {
                    modifiers: vec!["sudo".to_string()],
                },
            ),
        ]),
    ]
}

fn terraform() -> Vec<FailureHandler> {
    vec![FailureHandler::new(
        "terraform_not_packaged",
        "tool",
        "Terraform is not in the distro repositories",
        "HashiCorp ships terraform from its own repository, not the distro's.",
        r"unable to locate package terraform|no available formula.*terraform",
    )
    .options(vec![
        RemediationOption::new(
            "terraform-hashicorp-repo",
            "Add the HashiCorp repository",
            "Add HashiCorp's signed apt repo, then install from it.",
            "plus",
            StrategySpec::AddRepo {
                commands: vec![
                    "wget -O- https://apt.releases.hashicorp.com/gpg | gpg --dearmor -o /usr/share/keyrings/hashicorp.gpg".to_string(),
                    "echo \"deb [signed-by=/usr/share/keyrings/hashicorp.gpg] https://apt.releases.hashicorp.com $(lsb_release -cs) main\" > /etc/apt/sources.list.d/hashicorp.list".to_string(),
                    "apt-get update".to_string(),
                ],
            },
        )
        .recommended()
        .risk(Risk::Medium),
        RemediationOption::new(
            "terraform-use-brew",
            "Install with Homebrew",
            "Homebrew carries current terraform on 64-bit machines.",
            "beer",
            StrategySpec::SwitchMethod {
                method: "brew".to_string(),
            },
        )
        .arch_exclude(&["i686", "armv7l"]),
        RemediationOption::new(
            "terraform-manual-zip",
            "Download the release zip",
            "Fetch the official zip from releases.hashicorp.com and unpack it onto PATH.",
            "download",
            StrategySpec::Manual { instructions: None },
        ),
    ])]
}
