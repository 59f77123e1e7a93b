//! Source text management for the Volt toolchain.
//!
//! The compiler may be fed several pieces of HDL text over one session (the
//! CLI compiles whole files; tests and hosts pass strings). The [`SourceDb`]
//! registers each piece and hands out [`FileId`] handles; every token,
//! statement, and symbol entry downstream carries a [`Span`] — a byte range
//! tagged with its handle — and diagnostics resolve those spans to
//! line/column [`ResolvedSpan`]s only when they are rendered.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
