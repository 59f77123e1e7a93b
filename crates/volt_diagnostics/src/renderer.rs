//! Diagnostic rendering for human-readable terminal output.

use crate::diagnostic::Diagnostic;
use volt_source::SourceDb;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E204]: `temp` is not declared in this module
///   --> adder.hdl:10:5
///    |
/// 10 | Nand(temp, b) -> out
///    |      ^^^^
///    |
///    = help: ...
/// ```
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        // Header line: severity[CODE]: message
        out.push_str(&format!(
            "{}[{}]: {}\n",
            diag.severity, diag.code, diag.message
        ));

        // Location line
        if !diag.primary_span.is_dummy() {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!("  --> {resolved}\n"));

            // Quoted source line with underline
            let file = source_db.get_file(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            let line_num = format!("{line}");
            let padding = " ".repeat(line_num.len());
            let line_content = file.line_containing(diag.primary_span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            let span_len = (diag.primary_span.end - diag.primary_span.start).max(1) as usize;
            let carets = "^".repeat(span_len);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));

            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.is_primary())
                .map(|l| format!(" {}", l.message()))
                .unwrap_or_default();

            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));
        }

        // Notes
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        // Help
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
