//! End-to-end scenarios through the full diagnose pipeline:
//! cascade -> evaluation -> assembled response.

use std::collections::{HashMap, HashSet};

use remedy_common::{
    Availability, Breadcrumb, Chain, FailureContext, Layer, Recipe, RemediationOption,
    StrategySpec, SystemProfile, MAX_CHAIN_DEPTH,
};
use remedy_engine::{
    assemble, build_response, catalog, EmptyRecipes, FailureHandler, HandlerCatalog,
    StaticLocator, StaticRecipes,
};

fn debian12_profile() -> SystemProfile {
    let mut profile = SystemProfile::unknown();
    profile.arch = Some("x86_64".to_string());
    profile.distro.family = Some("debian".to_string());
    profile.distro.name = Some("Debian GNU/Linux 12".to_string());
    profile.capabilities.has_systemd = Some(true);
    profile.capabilities.is_root = Some(false);
    profile.package_manager.primary = Some("apt".to_string());
    profile.package_manager.available = vec!["apt".to_string()];
    profile.package_manager.snap_available = Some(false);
    profile
}

fn httpie_recipes() -> StaticRecipes {
    let mut recipes = StaticRecipes::new();
    let mut recipe = Recipe::default();
    recipe
        .install
        .insert("pip".to_string(), vec!["pip install httpie".to_string()]);
    recipe.install.insert(
        "apt".to_string(),
        vec!["apt-get install -y httpie".to_string()],
    );
    recipe.cli = Some("http".to_string());
    recipes.insert("httpie", recipe);
    recipes
}

fn pep668_ctx() -> FailureContext {
    FailureContext {
        tool_id: "httpie".to_string(),
        method: "pip".to_string(),
        step_idx: 0,
        step_label: "pip install httpie".to_string(),
        exit_code: 1,
        stderr: "error: externally-managed-environment\nhint: See PEP 668".to_string(),
        recipe: None,
        chain: None,
    }
}

#[test]
fn pep668_on_debian_locks_pipx_and_readies_apt() {
    let recipes = httpie_recipes();
    let response = build_response(
        &pep668_ctx(),
        Some(&debian12_profile()),
        &recipes,
        &StaticLocator::empty(),
    )
    .expect("pep668 must match");

    assert_eq!(response.failure.failure_id, "pep668");
    assert_eq!(response.failure.matched_layer, Layer::MethodFamily);
    assert_eq!(response.failure.matched_method.as_deref(), Some("pip"));

    let pipx = response
        .options
        .iter()
        .find(|o| o.option.id == "use-pipx")
        .expect("use-pipx present");
    assert!(pipx.option.recommended);
    assert_eq!(pipx.availability, Availability::Locked);
    assert_eq!(pipx.unlock_deps, Some(vec!["pipx".to_string()]));

    let apt = response
        .options
        .iter()
        .find(|o| o.option.id == "use-apt")
        .expect("use-apt present");
    assert_eq!(apt.availability, Availability::Ready);
}

#[test]
fn pep668_pipx_ready_once_on_path() {
    let recipes = httpie_recipes();
    let response = build_response(
        &pep668_ctx(),
        Some(&debian12_profile()),
        &recipes,
        &StaticLocator::with(&["pipx"]),
    )
    .unwrap();
    let pipx = response
        .options
        .iter()
        .find(|o| o.option.id == "use-pipx")
        .unwrap();
    assert_eq!(pipx.availability, Availability::Ready);
    assert!(pipx.lock_reason.is_none());
}

#[test]
fn oom_kill_137_matches_for_any_tool_and_method() {
    for method in ["pip", "cargo", "npm", "script"] {
        let ctx = FailureContext {
            tool_id: "whatever".to_string(),
            method: method.to_string(),
            exit_code: 137,
            stderr: "Killed".to_string(),
            ..FailureContext::default()
        };
        let response =
            build_response(&ctx, None, &EmptyRecipes, &StaticLocator::empty()).unwrap();
        assert_eq!(response.failure.failure_id, "oom_killed");
        let reduce = response
            .options
            .iter()
            .find(|o| o.option.id == "reduce-parallelism")
            .expect("reduce-parallelism present");
        assert_eq!(reduce.availability, Availability::Ready);
        assert!(reduce.option.recommended);
    }
}

#[test]
fn read_only_rootfs_makes_every_package_install_impossible() {
    let mut profile = debian12_profile();
    profile.container.read_only_rootfs = Some(true);
    let ctx = FailureContext {
        tool_id: "whatever".to_string(),
        method: "pip".to_string(),
        exit_code: 1,
        stderr: "fatal error: Python.h: No such file or directory".to_string(),
        ..FailureContext::default()
    };
    let response =
        build_response(&ctx, Some(&profile), &EmptyRecipes, &StaticLocator::empty()).unwrap();
    let mut saw_install_packages = false;
    for option in &response.options {
        if matches!(
            option.option.action,
            StrategySpec::InstallPackages {
                dynamic_packages: false,
                ..
            }
        ) {
            saw_install_packages = true;
            assert_eq!(option.availability, Availability::Impossible, "{}", option.option.id);
            assert!(option.impossible_reason.is_some());
        }
    }
    assert!(saw_install_packages);
}

#[test]
fn switch_to_snap_without_systemd_is_impossible() {
    // The builtin catalog has no switch-to-snap option, so drive a custom
    // one through the same assembler.
    let mut custom = HandlerCatalog {
        bootstrap: Vec::new(),
        infrastructure: Vec::new(),
        method_family: HashMap::new(),
        tool_specific: HashMap::new(),
    };
    custom.method_family.insert(
        "apt".to_string(),
        vec![FailureHandler::new(
            "stale_package",
            "method",
            "Distro package is too old",
            "The packaged version predates the feature the user needs.",
            "version .* is not supported",
        )
        .options(vec![RemediationOption::new(
            "try-snap",
            "Install the snap instead",
            "Snaps track upstream releases.",
            "box",
            StrategySpec::SwitchMethod {
                method: "snap".to_string(),
            },
        )])],
    );

    let mut profile = debian12_profile();
    profile.capabilities.has_systemd = Some(false);
    let ctx = FailureContext {
        tool_id: "sometool".to_string(),
        method: "apt".to_string(),
        exit_code: 1,
        stderr: "error: version 1.2 is not supported".to_string(),
        ..FailureContext::default()
    };
    let response = assemble(
        &custom,
        &ctx,
        Some(&profile),
        &EmptyRecipes,
        &StaticLocator::empty(),
    )
    .unwrap();
    let snap = &response.options[0];
    assert_eq!(snap.availability, Availability::Impossible);
    assert!(snap.impossible_reason.as_ref().unwrap().contains("systemd"));
}

#[test]
fn repeated_calls_are_deep_equal() {
    let recipes = httpie_recipes();
    let profile = debian12_profile();
    let locator = StaticLocator::empty();
    let first = build_response(&pep668_ctx(), Some(&profile), &recipes, &locator).unwrap();
    let second = build_response(&pep668_ctx(), Some(&profile), &recipes, &locator).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn option_ids_unique_in_every_response() {
    let samples = [
        ("docker", "apt", "permission denied while trying to connect to the docker daemon socket", 1),
        ("httpie", "pip", "error: externally-managed-environment", 1),
        ("anytool", "cargo", "error: linking with `cc` failed: permission denied", 1),
        ("terraform", "apt", "E: Unable to locate package terraform", 100),
    ];
    for (tool, method, stderr, code) in samples {
        let ctx = FailureContext {
            tool_id: tool.to_string(),
            method: method.to_string(),
            exit_code: code,
            stderr: stderr.to_string(),
            ..FailureContext::default()
        };
        let response =
            build_response(&ctx, None, &EmptyRecipes, &StaticLocator::empty()).unwrap();
        let mut seen = HashSet::new();
        for option in &response.options {
            assert!(seen.insert(option.option.id.clone()), "dup id {}", option.option.id);
        }
        assert!(!response.options.is_empty());
    }
}

#[test]
fn sort_order_is_total_and_stable() {
    let ctx = FailureContext {
        tool_id: "terraform".to_string(),
        method: "apt".to_string(),
        exit_code: 100,
        stderr: "E: Unable to locate package terraform".to_string(),
        ..FailureContext::default()
    };
    let response = build_response(
        &ctx,
        Some(&debian12_profile()),
        &EmptyRecipes,
        &StaticLocator::empty(),
    )
    .unwrap();
    // Both the tool-specific and the apt-family handlers match here.
    assert_eq!(response.failure.failure_id, "terraform_not_packaged");
    let options = &response.options;
    for pair in options.windows(2) {
        let key = |o: &remedy_common::EvaluatedOption| {
            (
                !o.option.recommended,
                o.source_layer.rank(),
                o.availability.rank(),
            )
        };
        assert!(key(&pair[0]) <= key(&pair[1]));
    }
}

#[test]
fn evaluation_loses_no_collected_fields() {
    let response = build_response(
        &pep668_ctx(),
        Some(&debian12_profile()),
        &httpie_recipes(),
        &StaticLocator::empty(),
    )
    .unwrap();

    let evaluation_fields: HashSet<&str> = [
        "availability",
        "lock_reason",
        "unlock_deps",
        "unlock_step_count",
        "impossible_reason",
        "step_count",
    ]
    .into_iter()
    .collect();

    // Re-run the cascade alone and compare field sets option by option.
    let (_, collected) = remedy_engine::cascade::collect(
        catalog(),
        "httpie",
        "pip",
        &pep668_ctx().stderr,
        1,
        None,
    );
    for collected_option in collected {
        let evaluated = response
            .options
            .iter()
            .find(|o| o.option.id == collected_option.option.id)
            .expect("collected option survives into the response");
        let before = serde_json::to_value(&collected_option).unwrap();
        let after = serde_json::to_value(evaluated).unwrap();
        let before_map = before.as_object().unwrap();
        let after_map = after.as_object().unwrap();
        for (field, value) in before_map {
            // risk is stamped from None to low; everything else is identical.
            if field == "risk" {
                continue;
            }
            assert_eq!(after_map.get(field), Some(value), "field {} changed", field);
        }
        for field in after_map.keys() {
            assert!(
                before_map.contains_key(field.as_str())
                    || evaluation_fields.contains(field.as_str())
                    || field == "risk",
                "unexpected new field {}",
                field
            );
        }
    }
}

#[test]
fn chain_context_is_echoed_not_enforced() {
    let mut ctx = pep668_ctx();
    ctx.chain = Some(Chain {
        chain_id: "chain-42".to_string(),
        original_goal: "install httpie".to_string(),
        escalation_stack: vec!["use-apt".to_string(), "apt-update-retry".to_string()],
        max_depth: MAX_CHAIN_DEPTH,
        breadcrumbs: vec![
            Breadcrumb {
                label: "httpie via pip".to_string(),
                depth: 1,
                status: "failed".to_string(),
                icon: "package".to_string(),
            },
            Breadcrumb {
                label: "switch to apt".to_string(),
                depth: 2,
                status: "failed".to_string(),
                icon: "package".to_string(),
            },
            Breadcrumb {
                label: "refresh index".to_string(),
                depth: 3,
                status: "active".to_string(),
                icon: "refresh".to_string(),
            },
        ],
    });
    // Depth equals the limit; the engine still answers.
    let response = build_response(
        &ctx,
        Some(&debian12_profile()),
        &httpie_recipes(),
        &StaticLocator::empty(),
    )
    .unwrap();
    assert_eq!(response.chain.chain_id.as_deref(), Some("chain-42"));
    assert_eq!(response.chain.depth, 3);
    assert_eq!(response.chain.max_depth, MAX_CHAIN_DEPTH);
    assert_eq!(response.chain.breadcrumbs.len(), 3);
}

#[test]
fn recipe_override_beats_catalog_recipe() {
    // Catalog recipe has an apt method; the override removes it, flipping
    // use-apt from ready to impossible.
    let mut override_recipe = Recipe::default();
    override_recipe
        .install
        .insert("pip".to_string(), vec!["pip install httpie".to_string()]);
    let mut ctx = pep668_ctx();
    ctx.recipe = Some(override_recipe);

    let response = build_response(
        &ctx,
        Some(&debian12_profile()),
        &httpie_recipes(),
        &StaticLocator::empty(),
    )
    .unwrap();
    let apt = response
        .options
        .iter()
        .find(|o| o.option.id == "use-apt")
        .unwrap();
    assert_eq!(apt.availability, Availability::Impossible);
}

#[test]
fn terraform_brew_switch_excluded_on_32bit_arm() {
    let mut profile = debian12_profile();
    profile.arch = Some("armv7l".to_string());
    let ctx = FailureContext {
        tool_id: "terraform".to_string(),
        method: "apt".to_string(),
        exit_code: 100,
        stderr: "E: Unable to locate package terraform".to_string(),
        ..FailureContext::default()
    };
    let response =
        build_response(&ctx, Some(&profile), &EmptyRecipes, &StaticLocator::empty()).unwrap();
    let brew = response
        .options
        .iter()
        .find(|o| o.option.id == "terraform-use-brew")
        .unwrap();
    assert_eq!(brew.availability, Availability::Impossible);
    assert!(brew.impossible_reason.as_ref().unwrap().contains("armv7l"));
}

#[test]
fn missing_profile_skips_all_system_checks() {
    let response = build_response(
        &pep668_ctx(),
        None,
        &httpie_recipes(),
        &StaticLocator::empty(),
    )
    .unwrap();
    // With no profile, switching to apt passes the manager check and the
    // recipe still carries an apt method.
    let apt = response
        .options
        .iter()
        .find(|o| o.option.id == "use-apt")
        .unwrap();
    assert_eq!(apt.availability, Availability::Ready);
}
