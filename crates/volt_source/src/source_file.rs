//! One piece of registered HDL source text.

use crate::file_id::FileId;
use std::path::PathBuf;

/// One piece of registered source text: a `.hdl` file from disk or an
/// in-memory string a host passed to the compiler.
///
/// Line starts are indexed up front so that resolving a span to a
/// line/column position — which only happens when a diagnostic is rendered
/// — is a binary search rather than a rescan of the text.
pub struct SourceFile {
    /// The handle the [`SourceDb`](crate::SourceDb) allocated for this text.
    pub id: FileId,
    /// Where the text came from: a filesystem path, or a synthetic name for
    /// in-memory sources.
    pub path: PathBuf,
    /// The text itself.
    pub content: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Registers `content` under the given handle and name, indexing its
    /// line starts.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// The 1-indexed line and column containing `byte_offset`.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = self.line_starts.partition_point(|&s| s <= byte_offset) - 1;
        let line = line_idx as u32 + 1;
        let column = byte_offset - self.line_starts[line_idx] + 1;
        (line, column)
    }

    /// The full text of the line containing `byte_offset`, without its
    /// trailing newline. Diagnostic rendering quotes this under the
    /// `file:line:column` header.
    pub fn line_containing(&self, byte_offset: u32) -> &str {
        let line_idx = self.line_starts.partition_point(|&s| s <= byte_offset) - 1;
        let start = self.line_starts[line_idx] as usize;
        let rest = &self.content[start..];
        match rest.find('\n') {
            Some(len) => &rest[..len],
            None => rest,
        }
    }

    /// The text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}
