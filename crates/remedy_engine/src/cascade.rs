//! Cascade collection: scan every catalog layer in priority order and merge
//! the options of every matching handler.
//!
//! The scan never stops at the first match — a pip PEP 668 failure inside a
//! container may also want the infrastructure options. Duplicate option ids
//! are dropped silently; the first (highest-priority) occurrence wins. Each
//! surviving option is annotated with its source layer and originating
//! failure id for traceability.

use std::collections::HashSet;
use tracing::debug;

use remedy_common::{CollectedOption, Layer, Recipe};

use crate::catalog::{FailureHandler, HandlerCatalog};
use crate::matcher;

/// A handler that matched the failure, with where it matched.
#[derive(Debug, Clone)]
pub struct MatchedHandler<'a> {
    pub handler: &'a FailureHandler,
    pub layer: Layer,
    /// Method family under which the handler matched; None for layers that
    /// are not method-keyed.
    pub method: Option<String>,
}

/// Scan all layers for `(tool_id, method, stderr, exit_code)` and return
/// the matched handlers (priority order) plus the deduplicated option list.
/// Both lists are empty when nothing matches — that is not an error.
pub fn collect<'a>(
    catalog: &'a HandlerCatalog,
    tool_id: &str,
    method: &str,
    stderr: &str,
    exit_code: i32,
    recipe: Option<&Recipe>,
) -> (Vec<MatchedHandler<'a>>, Vec<CollectedOption>) {
    let mut matched: Vec<MatchedHandler<'a>> = Vec::new();
    let mut options: Vec<CollectedOption> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    let mut scan = |handlers: &'a [FailureHandler], layer: Layer, method_label: Option<&str>| {
        for handler in handlers {
            if !matcher::matches(handler, stderr, exit_code) {
                continue;
            }
            debug!(
                failure_id = %handler.failure_id,
                layer = layer.as_str(),
                "handler matched"
            );
            for option in &handler.options {
                if !seen_ids.insert(option.id.clone()) {
                    // First occurrence wins; this one is shadowed.
                    debug!(option_id = %option.id, "duplicate option dropped");
                    continue;
                }
                options.push(CollectedOption {
                    option: option.clone(),
                    source_layer: layer,
                    source_failure_id: handler.failure_id.clone(),
                });
            }
            matched.push(MatchedHandler {
                handler,
                layer,
                method: method_label.map(|m| m.to_string()),
            });
        }
    };

    // 1. Tool-specific handlers ("recipe" layer).
    scan(catalog.tool_handlers(tool_id), Layer::Recipe, None);

    // 2. Family the recipe aliases this method to, if different.
    if let Some(family) = recipe.and_then(|r| r.aliased_family(method)) {
        scan(
            catalog.family_handlers(family),
            Layer::MethodFamily,
            Some(family),
        );
    }

    // 3. The literal method's family.
    scan(
        catalog.family_handlers(method),
        Layer::MethodFamily,
        Some(method),
    );

    // 4. Cross-cutting infrastructure.
    scan(&catalog.infrastructure, Layer::Infrastructure, None);

    // 5. Bootstrap.
    scan(&catalog.bootstrap, Layer::Bootstrap, None);

    (matched, options)
}
