//! Source annotations attached to a diagnostic.

use serde::{Deserialize, Serialize};
use volt_source::Span;

/// One annotated source location inside a diagnostic.
///
/// A primary label marks the offending construct itself and is rendered as
/// the caret underline — the sliced net in a width mismatch, the argument
/// list in an arity error. A secondary label points at related context,
/// like the earlier declaration behind a duplicate-name error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Label {
    /// The main location: underlined beneath the quoted source line.
    Primary {
        /// The annotated span.
        span: Span,
        /// Text shown next to the underline.
        message: String,
    },
    /// Supporting context rendered as a note-style reference.
    Secondary {
        /// The annotated span.
        span: Span,
        /// Text describing how this location relates to the error.
        message: String,
    },
}

impl Label {
    /// An annotation on the offending construct itself.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label::Primary {
            span,
            message: message.into(),
        }
    }

    /// An annotation on related context.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label::Secondary {
            span,
            message: message.into(),
        }
    }

    /// The annotated span.
    pub fn span(&self) -> Span {
        match self {
            Label::Primary { span, .. } | Label::Secondary { span, .. } => *span,
        }
    }

    /// The annotation text.
    pub fn message(&self) -> &str {
        match self {
            Label::Primary { message, .. } | Label::Secondary { message, .. } => message,
        }
    }

    /// Returns `true` for the underline-carrying primary annotation.
    pub fn is_primary(&self) -> bool {
        matches!(self, Label::Primary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_marks_the_offending_net() {
        let label = Label::primary(Span::DUMMY, "expected width 8, got 16");
        assert!(label.is_primary());
        assert_eq!(label.message(), "expected width 8, got 16");
        assert!(label.span().is_dummy());
    }

    #[test]
    fn secondary_points_at_context() {
        let label = Label::secondary(Span::DUMMY, "previously declared here");
        assert!(!label.is_primary());
        assert_eq!(label.message(), "previously declared here");
    }

    #[test]
    fn serde_roundtrip() {
        let label = Label::primary(Span::DUMMY, "slice reaches bit 8");
        let json = serde_json::to_string(&label).unwrap();
        let back: Label = serde_json::from_str(&json).unwrap();
        assert!(back.is_primary());
        assert_eq!(back.message(), "slice reaches bit 8");
    }
}
