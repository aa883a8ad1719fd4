//! Response assembly: cascade -> evaluate -> sort -> package.
//!
//! Returns None when no handler matched anywhere; the caller owns its
//! generic fallback message. Every call works on fresh per-call copies, so
//! concurrent callers share nothing mutable.

use tracing::{debug, info};

use remedy_common::{
    cap_stderr, fallback_actions, ChainContext, EvaluatedOption, FailureContext, FailureSummary,
    Recipe, RemediationResponse, SystemProfile,
};

use crate::cascade;
use crate::catalog::{catalog, HandlerCatalog};
use crate::locator::BinaryLocator;
use crate::recipes::RecipeStore;
use crate::evaluate;

/// Diagnose a failed install step against the compiled-in catalog.
pub fn build_response(
    ctx: &FailureContext,
    profile: Option<&SystemProfile>,
    recipes: &dyn RecipeStore,
    locator: &dyn BinaryLocator,
) -> Option<RemediationResponse> {
    assemble(catalog(), ctx, profile, recipes, locator)
}

/// Same as [`build_response`] but against an explicit catalog.
pub fn assemble(
    handler_catalog: &HandlerCatalog,
    ctx: &FailureContext,
    profile: Option<&SystemProfile>,
    recipes: &dyn RecipeStore,
    locator: &dyn BinaryLocator,
) -> Option<RemediationResponse> {
    // Override recipe beats the catalog recipe.
    let effective_recipe: Option<&Recipe> =
        ctx.recipe.as_ref().or_else(|| recipes.get(&ctx.tool_id));

    let (matched, collected) = cascade::collect(
        handler_catalog,
        &ctx.tool_id,
        &ctx.method,
        &ctx.stderr,
        ctx.exit_code,
        effective_recipe,
    );

    let first = match matched.first() {
        Some(first) => first,
        None => {
            debug!(tool_id = %ctx.tool_id, method = %ctx.method, "no handler matched");
            return None;
        }
    };

    let unknown_profile = SystemProfile::unknown();
    let profile = profile.unwrap_or(&unknown_profile);

    let mut options: Vec<EvaluatedOption> = collected
        .into_iter()
        .map(|c| evaluate::evaluate(c, effective_recipe, profile, recipes, locator))
        .collect();

    // Stable total order: recommended, then layer priority, then
    // availability. Cascade order breaks remaining ties.
    options.sort_by_key(|o| {
        (
            !o.option.recommended,
            o.source_layer.rank(),
            o.availability.rank(),
        )
    });

    let failure = FailureSummary {
        failure_id: first.handler.failure_id.clone(),
        category: first.handler.category.clone(),
        label: first.handler.label.clone(),
        description: first.handler.description.clone(),
        matched_layer: first.layer,
        matched_method: first.method.clone(),
    };

    let chain = match &ctx.chain {
        Some(chain) => ChainContext::from_chain(chain),
        None => ChainContext::root(),
    };

    info!(
        tool_id = %ctx.tool_id,
        failure_id = %failure.failure_id,
        options = options.len(),
        "assembled remediation response"
    );

    Some(RemediationResponse {
        ok: false,
        tool_id: ctx.tool_id.clone(),
        step_idx: ctx.step_idx,
        step_label: ctx.step_label.clone(),
        exit_code: ctx.exit_code,
        stderr: cap_stderr(&ctx.stderr),
        failure,
        options,
        chain,
        fallback_actions: fallback_actions(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::StaticLocator;
    use crate::recipes::EmptyRecipes;
    use remedy_common::{Availability, Layer};

    fn ctx(tool_id: &str, method: &str, stderr: &str, exit_code: i32) -> FailureContext {
        FailureContext {
            tool_id: tool_id.to_string(),
            method: method.to_string(),
            step_idx: 0,
            step_label: format!("{} install", method),
            exit_code,
            stderr: stderr.to_string(),
            recipe: None,
            chain: None,
        }
    }

    #[test]
    fn test_no_match_is_none() {
        let response = build_response(
            &ctx("sometool", "pip", "it all worked", 0),
            None,
            &EmptyRecipes,
            &StaticLocator::empty(),
        );
        assert!(response.is_none());
    }

    #[test]
    fn test_summary_comes_from_highest_priority_handler() {
        let stderr = "permission denied while trying to connect to the docker daemon socket";
        let response = build_response(
            &ctx("docker", "apt", stderr, 1),
            None,
            &EmptyRecipes,
            &StaticLocator::empty(),
        )
        .unwrap();
        // Tool layer wins over the infrastructure permission handler.
        assert_eq!(response.failure.failure_id, "docker_socket_denied");
        assert_eq!(response.failure.matched_layer, Layer::Recipe);
        assert!(!response.ok);
    }

    #[test]
    fn test_sort_recommended_then_layer_then_availability() {
        let stderr = "permission denied while trying to connect to the docker daemon socket";
        let response = build_response(
            &ctx("docker", "apt", stderr, 1),
            None,
            &EmptyRecipes,
            &StaticLocator::empty(),
        )
        .unwrap();
        let options = &response.options;
        assert!(options.len() >= 3);
        // No non-recommended option before a recommended one.
        let first_plain = options.iter().position(|o| !o.option.recommended);
        if let Some(idx) = first_plain {
            assert!(options[idx..].iter().all(|o| !o.option.recommended));
        }
        // Within equal recommendation, layers never go back up.
        for pair in options.windows(2) {
            if pair[0].option.recommended == pair[1].option.recommended {
                assert!(pair[0].source_layer.rank() <= pair[1].source_layer.rank());
                if pair[0].source_layer == pair[1].source_layer {
                    assert!(pair[0].availability.rank() <= pair[1].availability.rank());
                }
            }
        }
    }

    #[test]
    fn test_stderr_capped_in_response() {
        let stderr = format!("Killed{}", "x".repeat(5000));
        let response = build_response(
            &ctx("anytool", "cargo", &stderr, 137),
            None,
            &EmptyRecipes,
            &StaticLocator::empty(),
        )
        .unwrap();
        assert_eq!(response.stderr.chars().count(), remedy_common::STDERR_CAP);
        assert_eq!(response.exit_code, 137);
    }

    #[test]
    fn test_chain_absent_yields_root_context() {
        let response = build_response(
            &ctx("anytool", "pip", "error: externally-managed-environment", 1),
            None,
            &EmptyRecipes,
            &StaticLocator::empty(),
        )
        .unwrap();
        assert_eq!(response.chain, ChainContext::root());
        assert_eq!(response.fallback_actions.len(), 3);
    }

    #[test]
    fn test_locked_options_carry_unlock_fields() {
        let response = build_response(
            &ctx("httpie", "pip", "error: externally-managed-environment", 1),
            None,
            &EmptyRecipes,
            &StaticLocator::empty(),
        )
        .unwrap();
        for option in &response.options {
            match option.availability {
                Availability::Locked => {
                    assert!(option.lock_reason.is_some(), "{}", option.option.id);
                    assert!(
                        option.unlock_deps.as_ref().is_some_and(|d| !d.is_empty()),
                        "{}",
                        option.option.id
                    );
                }
                Availability::Impossible => {
                    assert!(option.impossible_reason.is_some(), "{}", option.option.id)
                }
                Availability::Ready => {}
            }
        }
    }
}
