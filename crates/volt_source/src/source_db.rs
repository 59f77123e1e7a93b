//! Registry of every piece of source text in a compilation session.

use crate::file_id::FileId;
use crate::resolved_span::ResolvedSpan;
use crate::source_file::SourceFile;
use crate::span::Span;
use std::io;
use std::path::{Path, PathBuf};

/// Owns all registered source text and resolves spans to line/column
/// positions for diagnostics.
///
/// Handles are allocated starting at 1; [`FileId::UNKNOWN`] never refers to
/// registered text. Each call to the compiler registers one more entry, so
/// a session that compiles a gate library and then a design built on it
/// holds both and can render diagnostics against either.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Reads a `.hdl` file from disk and registers its contents.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.register(path.to_path_buf(), content))
    }

    /// Registers in-memory source text under a display name.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        self.register(name.into(), content)
    }

    fn register(&mut self, path: PathBuf, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32 + 1);
        self.files.push(SourceFile::new(id, path, content));
        id
    }

    /// The registered text behind a handle.
    ///
    /// # Panics
    ///
    /// Panics on [`FileId::UNKNOWN`] or a handle from another session.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        assert!(!id.is_unknown(), "no source text behind FileId::UNKNOWN");
        &self.files[id.as_raw() as usize - 1]
    }

    /// Resolves a span to 1-indexed line/column positions for display.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (line, column) = file.line_col(span.start);
        // The end position is the last byte covered, not the exclusive end.
        let last = if span.end > span.start {
            span.end - 1
        } else {
            span.start
        };
        let (end_line, end_column) = file.line_col(last);
        ResolvedSpan {
            path: file.path.clone(),
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// The source text a span covers.
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATES: &str = "module Not(in) -> out { Nand(in, in) -> out }\n\
                         module And(a, b) -> out {\n\
                             Nand(a, b) -> t\n\
                             Not(t) -> out\n\
                         }\n";

    #[test]
    fn handles_start_at_one() {
        let mut db = SourceDb::new();
        let first = db.add_source("gates.hdl", GATES.to_string());
        assert_eq!(first.as_raw(), 1);
        assert!(!first.is_unknown());
    }

    #[test]
    fn one_entry_per_compile_call() {
        let mut db = SourceDb::new();
        let gates = db.add_source("gates.hdl", GATES.to_string());
        let design = db.add_source(
            "design.hdl",
            "module Top(a, b) -> out { And(a, b) -> out }".to_string(),
        );
        assert_ne!(gates, design);
        assert!(db.get_file(gates).content.contains("module Not"));
        assert!(db.get_file(design).content.contains("module Top"));
    }

    #[test]
    fn resolve_span_of_a_part_statement() {
        let mut db = SourceDb::new();
        let id = db.add_source("gates.hdl", GATES.to_string());

        // The `Nand(a, b) -> t` statement inside And, on line 3.
        let text = &db.get_file(id).content;
        let start = text.find("Nand(a, b)").unwrap() as u32;
        let stmt = Span::new(id, start, start + "Nand(a, b) -> t".len() as u32);

        let resolved = db.resolve_span(stmt);
        assert_eq!(resolved.path, PathBuf::from("gates.hdl"));
        assert_eq!(resolved.line, 3);
        assert_eq!(resolved.end_line, 3);
        assert!(resolved.end_column > resolved.column);
    }

    #[test]
    fn resolve_empty_span() {
        let mut db = SourceDb::new();
        let id = db.add_source("empty.hdl", String::new());
        let resolved = db.resolve_span(Span::point(id, 0));
        assert_eq!(resolved.line, 1);
        assert_eq!(resolved.column, 1);
    }

    #[test]
    fn snippet_recovers_a_module_name() {
        let mut db = SourceDb::new();
        let id = db.add_source("gates.hdl", GATES.to_string());
        let start = GATES.find("And").unwrap() as u32;
        assert_eq!(db.snippet(Span::new(id, start, start + 3)), "And");
    }

    #[test]
    #[should_panic(expected = "FileId::UNKNOWN")]
    fn unknown_handle_panics() {
        let db = SourceDb::new();
        let _ = db.get_file(FileId::UNKNOWN);
    }

    #[test]
    fn load_file_from_disk() {
        let dir = std::env::temp_dir().join("volt_source_test");
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("top.hdl");
        std::fs::write(&file_path, "module Top(a) -> out { Nand(a, a) -> out }").unwrap();

        let mut db = SourceDb::new();
        let id = db.load_file(&file_path).unwrap();
        assert!(db.get_file(id).content.starts_with("module Top"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
