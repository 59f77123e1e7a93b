//! Token types for the Volt HDL lexer.
//!
//! Defines the [`HdlToken`] enum covering the language's keywords,
//! punctuation, and literals, plus the [`Token`] struct pairing a token kind
//! with its source [`Span`].

use serde::{Deserialize, Serialize};
use volt_source::Span;

/// A Volt HDL token kind.
///
/// Keywords are case-sensitive. Literal values and identifier names are not
/// stored in the token; they are retrieved from the source text using the
/// token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum HdlToken {
    // === Keywords ===
    /// `module`
    Module,
    /// `test` (reserved for a future testbench syntax)
    Test,
    /// `clock` (reserved)
    Clock,

    // === Punctuation ===
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `->`
    Arrow,
    /// `..`
    DotDot,
    /// `.` (only meaningful as part of `..`; rejected elsewhere by the parser)
    Dot,

    // === Literals and names ===
    /// An identifier (any non-delimiter run that is not a keyword or number).
    Identifier,
    /// A decimal integer literal.
    IntLiteral,
    /// A byte-width literal introduced by the `0b` prefix (reserved).
    ByteLiteral,
    /// A word-width literal introduced by the `0w` prefix (reserved).
    WordLiteral,

    /// A lexer error token.
    Error,
    /// End of file.
    Eof,
}

/// A token with its source span.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: HdlToken,
    /// The byte range of this token in the source file.
    pub span: Span,
}

/// Looks up a keyword token for the given identifier text.
///
/// Returns `None` if the text is not a keyword (i.e., it is a plain identifier).
pub fn lookup_keyword(text: &str) -> Option<HdlToken> {
    match text {
        "module" => Some(HdlToken::Module),
        "test" => Some(HdlToken::Test),
        "clock" => Some(HdlToken::Clock),
        _ => None,
    }
}
