//! Accumulator for diagnostics raised during a compilation session.

use crate::diagnostic::Diagnostic;
use std::cell::{Cell, RefCell};

/// Collects every diagnostic a compilation session raises.
///
/// Compilation and simulation are single-threaded by design, so the sink
/// uses plain interior mutability rather than locks: one sink is shared by
/// reference between the lexer, parser, and lowering passes of a compiler,
/// all on the caller's thread. The error count is cumulative across entry
/// points — a driver snapshots [`error_count`](Self::error_count) before a
/// call and compares after to tell whether *that* call failed, and the
/// first diagnostic of the failing call names the check that tripped.
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
    errors: Cell<usize>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            errors: Cell::new(0),
        }
    }

    /// Records a diagnostic, counting it if it is an error.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.errors.set(self.errors.get() + 1);
        }
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Returns `true` once any error has been recorded this session.
    pub fn has_errors(&self) -> bool {
        self.errors.get() > 0
    }

    /// The number of errors recorded so far, cumulative across entry
    /// points and unaffected by [`take_all`](Self::take_all).
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    /// Drains the recorded diagnostics, oldest first.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Clones the recorded diagnostics without draining them.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
