//! Diagnostics for the Volt toolchain.
//!
//! Compile failures — unknown nets, width contradictions, undriven output
//! bits, capacity overflows — are reported as structured [`Diagnostic`]s:
//! a severity, an `E`/`W` code, a message, a primary span, and optional
//! [`Label`]s, notes, and help text. One [`DiagnosticSink`] per compiler
//! accumulates them (the first failure is what a host reads back), and
//! [`TerminalRenderer`] formats them with the quoted source line and a
//! caret underline.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::Label;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
