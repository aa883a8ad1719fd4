//! Binary discovery seam.
//!
//! The only I/O the engine performs is asking whether a binary exists on
//! PATH. It goes through this trait so evaluation and resolution stay pure
//! in tests: `StaticLocator` answers from a fixed set, `SystemLocator`
//! consults the real PATH.

use std::collections::HashSet;

/// Answers "is this binary on PATH right now?".
pub trait BinaryLocator {
    fn find(&self, name: &str) -> bool;
}

/// Real PATH lookup. Local and non-blocking; a missing binary is a normal
/// "not installed" answer, never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

impl BinaryLocator for SystemLocator {
    fn find(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }
}

/// Fixed-answer locator for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    present: HashSet<String>,
}

impl StaticLocator {
    /// A locator that finds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A locator that finds exactly `binaries`.
    pub fn with(binaries: &[&str]) -> Self {
        Self {
            present: binaries.iter().map(|b| b.to_string()).collect(),
        }
    }

    pub fn add(&mut self, name: &str) {
        self.present.insert(name.to_string());
    }
}

impl BinaryLocator for StaticLocator {
    fn find(&self, name: &str) -> bool {
        self.present.contains(name)
    }
}
