//! Static failure-handler catalog.
//!
//! Four priority layers of compiled-in handler records, scanned by the
//! cascade in fixed order: tool-specific ("recipe"), method-family,
//! infrastructure, bootstrap. The catalog is data, not branching code:
//! each layer file builds plain records, loaded once behind a Lazy and
//! never mutated afterwards.
//!
//! Patterns are compiled here, once, with an `(?i)` prefix. A pattern that
//! fails to compile leaves the handler permanently non-matching — one bad
//! entry must never break matching for the rest — and `validate()` flags it
//! so the authoring mistake surfaces in tests.

mod bootstrap;
mod infrastructure;
mod method_family;
mod tool_specific;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::warn;

use remedy_common::RemediationOption;

/// A static record pairing a failure-detection pattern with remediation
/// options. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct FailureHandler {
    pub failure_id: String,
    /// Coarse grouping for display: "method", "network", "disk", ...
    pub category: String,
    pub label: String,
    pub description: String,
    /// Case-insensitive substring regex over stderr. Empty means the
    /// handler matches on exit code alone.
    pub pattern: String,
    /// When set, the observed exit code must equal this or the handler
    /// never matches, regardless of pattern.
    pub exit_code: Option<i32>,
    /// Reserved hook name. Never invoked; kept so catalog entries that
    /// declare it survive round-trips unchanged.
    pub detect_fn: Option<&'static str>,
    pub options: Vec<RemediationOption>,
    #[serde(skip)]
    compiled: Option<Regex>,
}

impl FailureHandler {
    pub fn new(
        failure_id: &str,
        category: &str,
        label: &str,
        description: &str,
        pattern: &str,
    ) -> Self {
        let compiled = if pattern.is_empty() {
            None
        } else {
            match Regex::new(&format!("(?i){}", pattern)) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!(failure_id, %err, "handler pattern failed to compile");
                    None
                }
            }
        };
        Self {
            failure_id: failure_id.to_string(),
            category: category.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            pattern: pattern.to_string(),
            exit_code: None,
            detect_fn: None,
            options: Vec::new(),
            compiled,
        }
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn detect_fn(mut self, name: &'static str) -> Self {
        self.detect_fn = Some(name);
        self
    }

    pub fn options(mut self, options: Vec<RemediationOption>) -> Self {
        self.options = options;
        self
    }

    /// The compiled pattern, if the declared one was non-empty and valid.
    pub fn regex(&self) -> Option<&Regex> {
        self.compiled.as_ref()
    }
}

/// Structural problems found in the catalog. Authoring bugs, not runtime
/// failures a user can trigger.
#[derive(Debug, Error)]
#[error("invalid handler catalog: {}", problems.join("; "))]
pub struct CatalogError {
    pub problems: Vec<String>,
}

/// All four handler layers.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerCatalog {
    pub bootstrap: Vec<FailureHandler>,
    pub infrastructure: Vec<FailureHandler>,
    /// Method-family name -> handlers for that family.
    pub method_family: HashMap<String, Vec<FailureHandler>>,
    /// Tool id -> tool-specific handlers.
    pub tool_specific: HashMap<String, Vec<FailureHandler>>,
}

static CATALOG: Lazy<HandlerCatalog> = Lazy::new(HandlerCatalog::builtin);

/// The compiled-in catalog, loaded once.
pub fn catalog() -> &'static HandlerCatalog {
    &CATALOG
}

impl HandlerCatalog {
    /// Build the compiled-in catalog.
    pub fn builtin() -> Self {
        Self {
            bootstrap: bootstrap::handlers(),
            infrastructure: infrastructure::handlers(),
            method_family: method_family::handlers(),
            tool_specific: tool_specific::handlers(),
        }
    }

    pub fn family_handlers(&self, family: &str) -> &[FailureHandler] {
        self.method_family
            .get(family)
            .map(|handlers| handlers.as_slice())
            .unwrap_or(&[])
    }

    pub fn tool_handlers(&self, tool_id: &str) -> &[FailureHandler] {
        self.tool_specific
            .get(tool_id)
            .map(|handlers| handlers.as_slice())
            .unwrap_or(&[])
    }

    fn all_handlers(&self) -> impl Iterator<Item = &FailureHandler> {
        self.tool_specific
            .values()
            .flatten()
            .chain(self.method_family.values().flatten())
            .chain(self.infrastructure.iter())
            .chain(self.bootstrap.iter())
    }

    /// Structural well-formedness check. Business correctness of the
    /// content is out of scope; this catches authoring slips early.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut problems = Vec::new();

        for handler in self.all_handlers() {
            let id = &handler.failure_id;
            if id.is_empty() {
                problems.push("handler with empty failure_id".to_string());
            }
            if handler.label.is_empty() {
                problems.push(format!("{}: empty label", id));
            }
            if handler.pattern.is_empty() && handler.exit_code.is_none() {
                problems.push(format!("{}: empty pattern and no exit code", id));
            }
            if !handler.pattern.is_empty() && handler.compiled.is_none() {
                problems.push(format!("{}: pattern does not compile", id));
            }
            if handler.options.is_empty() {
                problems.push(format!("{}: no remediation options", id));
            }

            let mut seen = HashSet::new();
            for option in &handler.options {
                if option.id.is_empty() {
                    problems.push(format!("{}: option with empty id", id));
                }
                if option.label.is_empty() {
                    problems.push(format!("{}: option {} has empty label", id, option.id));
                }
                if !seen.insert(option.id.as_str()) {
                    problems.push(format!("{}: duplicate option id {}", id, option.id));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CatalogError { problems })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remedy_common::StrategySpec;

    #[test]
    fn test_builtin_catalog_is_well_formed() {
        catalog().validate().expect("builtin catalog must validate");
    }

    #[test]
    fn test_builtin_catalog_layers_populated() {
        let cat = catalog();
        assert!(!cat.bootstrap.is_empty());
        assert!(!cat.infrastructure.is_empty());
        assert!(cat.method_family.contains_key("pip"));
        assert!(cat.tool_specific.contains_key("docker"));
    }

    #[test]
    fn test_bad_pattern_compiles_to_none() {
        let handler = FailureHandler::new("broken", "test", "Broken", "Bad regex.", "([unclosed");
        assert!(handler.regex().is_none());
        assert_eq!(handler.pattern, "([unclosed");
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let handler = FailureHandler::new("net", "network", "Net", "Net.", "connection refused");
        assert!(handler.regex().unwrap().is_match("CONNECTION REFUSED"));
    }

    #[test]
    fn test_validate_flags_problems() {
        let mut cat = HandlerCatalog {
            bootstrap: Vec::new(),
            infrastructure: vec![
                FailureHandler::new("bad", "test", "Bad", "Bad pattern.", "([oops").options(
                    vec![
                        RemediationOption::new(
                            "dup",
                            "One",
                            "",
                            "wrench",
                            StrategySpec::Manual { instructions: None },
                        ),
                        RemediationOption::new(
                            "dup",
                            "Two",
                            "",
                            "wrench",
                            StrategySpec::Manual { instructions: None },
                        ),
                    ],
                ),
            ],
            method_family: HashMap::new(),
            tool_specific: HashMap::new(),
        };
        let err = cat.validate().unwrap_err();
        assert!(err.problems.iter().any(|p| p.contains("does not compile")));
        assert!(err.problems.iter().any(|p| p.contains("duplicate option id")));

        cat.infrastructure.clear();
        assert!(cat.validate().is_ok());
    }

    #[test]
    fn test_timeout_handler_keeps_inert_detect_fn() {
        let timeout = catalog()
            .infrastructure
            .iter()
            .find(|h| h.failure_id == "step_timeout")
            .expect("timeout handler present");
        assert_eq!(timeout.detect_fn, Some("detect_timeout"));
        assert!(timeout.pattern.is_empty());
        assert_eq!(timeout.exit_code, Some(124));
    }
}
