//! How serious a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a diagnostic.
///
/// Volt raises exactly two levels: warnings, which leave the module
/// registry usable, and errors, which abort the current entry point and
/// roll back whatever it registered. Supplementary context travels as
/// notes and help strings on the diagnostic itself, not as separate
/// severities.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// A suspicious construct that does not stop compilation.
    Warning,
    /// A failed check; the entry point returns failure.
    Error,
}

impl Severity {
    /// Returns `true` if this diagnostic aborts its entry point.
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_outrank_warnings() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn only_errors_abort() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
    }

    #[test]
    fn display_matches_render_headers() {
        // Rendered headers read `error[E205]: ...` / `warning[W201]: ...`.
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
    }
}
