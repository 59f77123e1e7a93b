//! Lexical analyzer for Volt HDL source text.
//!
//! Converts source text into a sequence of [`Token`]s. Whitespace, `//` line
//! comments, and `/* ... */` block comments are skipped. Identifiers are
//! maximal runs of non-delimiter bytes; a run matching a keyword exactly is
//! lexed as that keyword. Number runs starting with `0b` or `0w` produce the
//! reserved byte/word literals. Errors are reported to the [`DiagnosticSink`]
//! and produce [`HdlToken::Error`] tokens.

use crate::token::{lookup_keyword, HdlToken, Token};
use volt_diagnostics::code::{Category, DiagnosticCode};
use volt_diagnostics::{Diagnostic, DiagnosticSink};
use volt_source::{FileId, Span};

/// Lexes the given HDL source text into a vector of tokens.
///
/// Whitespace and comments are skipped. The returned vector always ends with
/// an [`HdlToken::Eof`] token. Lexer errors are reported via the diagnostic
/// sink and produce [`HdlToken::Error`] tokens in the output.
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: HdlToken::Eof,
                    span: Span::point(self.file, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 100),
            msg,
            span,
        ));
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return;
            }
            // Line comment: //
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            // Block comment: /* ... */ (non-nesting)
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        self.error("unterminated block comment", self.span_from(start));
                        break;
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if b.is_ascii_digit() {
            return self.lex_number(start);
        }

        if is_delimiter_start(b) {
            return self.lex_punctuation(start);
        }

        self.lex_identifier_or_keyword(start)
    }

    /// Lexes an integer literal, or a byte/word literal if the run starts
    /// with the `0b`/`0w` prefix.
    fn lex_number(&mut self, start: usize) -> Token {
        let kind = if self.peek() == b'0' && self.peek_at(1) == b'b' {
            self.pos += 2;
            HdlToken::ByteLiteral
        } else if self.peek() == b'0' && self.peek_at(1) == b'w' {
            self.pos += 2;
            HdlToken::WordLiteral
        } else {
            HdlToken::IntLiteral
        };

        let digits_start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        if kind != HdlToken::IntLiteral && self.pos == digits_start {
            self.error(
                "expected digits after byte/word literal prefix",
                self.span_from(start),
            );
            return Token {
                kind: HdlToken::Error,
                span: self.span_from(start),
            };
        }

        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn lex_punctuation(&mut self, start: usize) -> Token {
        let b = self.source[self.pos];
        self.pos += 1;
        let kind = match b {
            b'{' => HdlToken::LeftBrace,
            b'}' => HdlToken::RightBrace,
            b'(' => HdlToken::LeftParen,
            b')' => HdlToken::RightParen,
            b'[' => HdlToken::LeftBracket,
            b']' => HdlToken::RightBracket,
            b',' => HdlToken::Comma,
            b':' => HdlToken::Colon,
            b'-' => {
                if self.peek() == b'>' {
                    self.pos += 1;
                    HdlToken::Arrow
                } else {
                    self.error("expected '>' after '-'", self.span_from(start));
                    HdlToken::Error
                }
            }
            b'.' => {
                if self.peek() == b'.' {
                    self.pos += 1;
                    HdlToken::DotDot
                } else {
                    HdlToken::Dot
                }
            }
            b'>' => {
                self.error("unexpected '>' without preceding '-'", self.span_from(start));
                HdlToken::Error
            }
            b'/' => {
                // A lone '/' that did not open a comment.
                self.error("unexpected character '/'", self.span_from(start));
                HdlToken::Error
            }
            _ => {
                self.error(
                    &format!("unrecognized character '{}'", b as char),
                    self.span_from(start),
                );
                HdlToken::Error
            }
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && !is_delimiter(self.source[self.pos]) {
            self.pos += 1;
        }

        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        let kind = lookup_keyword(text).unwrap_or(HdlToken::Identifier);

        Token {
            kind,
            span: self.span_from(start),
        }
    }
}

/// Returns `true` for bytes that begin punctuation (including the comment
/// and arrow introducers `/`, `-`, `>`).
fn is_delimiter_start(b: u8) -> bool {
    matches!(
        b,
        b'{' | b'}' | b'(' | b')' | b'[' | b']' | b',' | b':' | b'-' | b'>' | b'.' | b'/'
    )
}

/// Returns `true` for bytes that terminate an identifier run.
fn is_delimiter(b: u8) -> bool {
    is_delimiter_start(b) || b.is_ascii_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_tokens(source: &str) -> Vec<Token> {
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(1);
        let tokens = lex(source, file, &sink);
        assert!(
            !sink.has_errors(),
            "unexpected errors: {:?}",
            sink.diagnostics()
        );
        tokens
    }

    fn lex_tokens_with_errors(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(1);
        let tokens = lex(source, file, &sink);
        (tokens, sink.take_all())
    }

    fn kinds(tokens: &[Token]) -> Vec<HdlToken> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        let tokens = lex_tokens("");
        assert_eq!(kinds(&tokens), vec![HdlToken::Eof]);
    }

    #[test]
    fn whitespace_only() {
        let tokens = lex_tokens("  \t\r\n  ");
        assert_eq!(kinds(&tokens), vec![HdlToken::Eof]);
    }

    #[test]
    fn keywords_exact_match_only() {
        let tokens = lex_tokens("module Module test clock modules");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::Module,
                HdlToken::Identifier,
                HdlToken::Test,
                HdlToken::Clock,
                HdlToken::Identifier,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn identifiers() {
        let tokens = lex_tokens("Nand sum_0 _tmp_");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::Identifier,
                HdlToken::Identifier,
                HdlToken::Identifier,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn integer_literals() {
        let tokens = lex_tokens("0 1 42 160");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::IntLiteral,
                HdlToken::IntLiteral,
                HdlToken::IntLiteral,
                HdlToken::IntLiteral,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn byte_and_word_literals() {
        let tokens = lex_tokens("0b101 0w42");
        assert_eq!(
            kinds(&tokens),
            vec![HdlToken::ByteLiteral, HdlToken::WordLiteral, HdlToken::Eof]
        );
    }

    #[test]
    fn byte_literal_missing_digits() {
        let (tokens, errors) = lex_tokens_with_errors("0b)");
        assert!(tokens.iter().any(|t| t.kind == HdlToken::Error));
        assert!(!errors.is_empty());
    }

    #[test]
    fn punctuation() {
        let tokens = lex_tokens("{ } ( ) [ ] , : -> ..");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::LeftBrace,
                HdlToken::RightBrace,
                HdlToken::LeftParen,
                HdlToken::RightParen,
                HdlToken::LeftBracket,
                HdlToken::RightBracket,
                HdlToken::Comma,
                HdlToken::Colon,
                HdlToken::Arrow,
                HdlToken::DotDot,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn arrow_requires_no_space() {
        let tokens = lex_tokens("a->b");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::Identifier,
                HdlToken::Arrow,
                HdlToken::Identifier,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn slice_tokens() {
        let tokens = lex_tokens("x[2..5]");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::Identifier,
                HdlToken::LeftBracket,
                HdlToken::IntLiteral,
                HdlToken::DotDot,
                HdlToken::IntLiteral,
                HdlToken::RightBracket,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn line_comment() {
        let tokens = lex_tokens("Nand // this is a comment\nDff");
        assert_eq!(
            kinds(&tokens),
            vec![HdlToken::Identifier, HdlToken::Identifier, HdlToken::Eof]
        );
    }

    #[test]
    fn block_comment() {
        let tokens = lex_tokens("Nand /* block\ncomment */ Dff");
        assert_eq!(
            kinds(&tokens),
            vec![HdlToken::Identifier, HdlToken::Identifier, HdlToken::Eof]
        );
    }

    #[test]
    fn unterminated_block_comment_error() {
        let (tokens, errors) = lex_tokens_with_errors("/* unterminated");
        assert_eq!(tokens.last().unwrap().kind, HdlToken::Eof);
        assert!(!errors.is_empty());
    }

    #[test]
    fn bare_minus_error() {
        let (tokens, errors) = lex_tokens_with_errors("a - b");
        assert!(tokens.iter().any(|t| t.kind == HdlToken::Error));
        assert!(!errors.is_empty());
    }

    #[test]
    fn single_dot_is_dot_token() {
        let tokens = lex_tokens(". ..");
        assert_eq!(
            kinds(&tokens),
            vec![HdlToken::Dot, HdlToken::DotDot, HdlToken::Eof]
        );
    }

    #[test]
    fn module_header() {
        let tokens = lex_tokens("module And(a, b) -> out {");
        assert_eq!(
            kinds(&tokens),
            vec![
                HdlToken::Module,
                HdlToken::Identifier,
                HdlToken::LeftParen,
                HdlToken::Identifier,
                HdlToken::Comma,
                HdlToken::Identifier,
                HdlToken::RightParen,
                HdlToken::Arrow,
                HdlToken::Identifier,
                HdlToken::LeftBrace,
                HdlToken::Eof,
            ]
        );
    }

    #[test]
    fn spans_are_correct() {
        let tokens = lex_tokens("module Add8");
        // "module" is bytes 0..6, "Add8" is bytes 7..11
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, 6);
        assert_eq!(tokens[1].span.start, 7);
        assert_eq!(tokens[1].span.end, 11);
    }

    #[test]
    fn eof_always_present() {
        let tokens = lex_tokens("module");
        assert_eq!(tokens.last().unwrap().kind, HdlToken::Eof);
    }
}
