//! Pattern matching of one handler against one failure.
//!
//! Rules:
//! - A declared exit code must equal the observed one or the handler never
//!   matches, regardless of pattern.
//! - An empty pattern matches only via that exit-code equality (signal-style
//!   failures such as OOM-kill 137 leave nothing on stderr).
//! - Otherwise the case-insensitive regex must find a substring in stderr.
//! - A pattern that failed to compile never matches and never raises.

use crate::catalog::FailureHandler;

/// Does `handler` match this failure?
pub fn matches(handler: &FailureHandler, stderr: &str, exit_code: i32) -> bool {
    if let Some(required) = handler.exit_code {
        if required != exit_code {
            return false;
        }
    }

    if handler.pattern.is_empty() {
        // Only an exit-code-gated handler can match without a pattern.
        return handler.exit_code.is_some();
    }

    match handler.regex() {
        Some(re) => re.is_match(stderr),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(pattern: &str) -> FailureHandler {
        FailureHandler::new("test_handler", "test", "Test", "Test handler.", pattern)
    }

    #[test]
    fn test_substring_match_case_insensitive() {
        let h = handler("externally-managed-environment");
        assert!(matches(
            &h,
            "error: EXTERNALLY-MANAGED-ENVIRONMENT\nhint: ...",
            1
        ));
        assert!(!matches(&h, "no space left on device", 1));
    }

    #[test]
    fn test_exit_code_filter_gates_pattern() {
        let h = handler("killed").exit_code(137);
        assert!(matches(&h, "Killed", 137));
        // Pattern matches but the exit code does not.
        assert!(!matches(&h, "Killed", 1));
    }

    #[test]
    fn test_empty_pattern_matches_on_exit_code_only() {
        let h = handler("").exit_code(137);
        assert!(matches(&h, "", 137));
        assert!(matches(&h, "anything at all", 137));
        assert!(!matches(&h, "anything at all", 0));
    }

    #[test]
    fn test_empty_pattern_without_exit_code_never_matches() {
        let h = handler("");
        assert!(!matches(&h, "some stderr", 1));
        assert!(!matches(&h, "", 0));
    }

    #[test]
    fn test_malformed_pattern_never_matches() {
        let h = handler("([unclosed");
        assert!(!matches(&h, "([unclosed", 1));
        assert!(!matches(&h, "anything", 1));
    }

    #[test]
    fn test_detect_fn_is_inert() {
        // The reserved hook never influences matching.
        let h = handler("").exit_code(124).detect_fn("detect_timeout");
        assert!(matches(&h, "", 124));
        assert!(!matches(&h, "timed out", 0));
    }
}
