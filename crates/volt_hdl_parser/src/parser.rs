//! Recursive-descent parser for the Volt HDL.
//!
//! The [`HdlParser`] consumes a token stream produced by the lexer and builds
//! a [`SourceFile`] AST. Errors are reported to the diagnostic sink; on a
//! statement-level error the parser recovers by skipping to the end of the
//! enclosing module body.

use crate::ast::*;
use crate::token::{HdlToken, Token};
use volt_common::{Ident, NameTable};
use volt_diagnostics::code::{Category, DiagnosticCode};
use volt_diagnostics::{Diagnostic, DiagnosticSink};
use volt_source::{FileId, Span};

/// A recursive descent parser for Volt HDL source text.
pub struct HdlParser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    #[allow(dead_code)]
    file: FileId,
    interner: &'src NameTable,
    sink: &'src DiagnosticSink,
}

impl<'src> HdlParser<'src> {
    /// Creates a new parser from a token stream produced by the lexer.
    ///
    /// The `tokens` must have been lexed from `source` for the given `file`.
    /// Identifiers are interned via `interner`, and parse errors are emitted
    /// to `sink`.
    pub fn new(
        tokens: Vec<Token>,
        source: &'src str,
        file: FileId,
        interner: &'src NameTable,
        sink: &'src DiagnosticSink,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            file,
            interner,
            sink,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> HdlToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: HdlToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.current() == HdlToken::Eof
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches the given kind. Returns `true` if consumed.
    fn eat(&mut self, kind: HdlToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind. Emits an error if not.
    fn expect(&mut self, kind: HdlToken) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.expected(token_name(kind));
            false
        }
    }

    /// Expects and returns an identifier. Emits an error and returns a dummy if not.
    fn expect_ident(&mut self) -> Ident {
        if self.at(HdlToken::Identifier) {
            let text = self.current_text();
            let ident = self.interner.intern(text);
            self.advance();
            ident
        } else {
            self.expected("identifier");
            self.interner.intern("<missing>")
        }
    }

    /// Expects and returns a non-negative integer literal value.
    fn expect_int(&mut self) -> u32 {
        if self.at(HdlToken::IntLiteral) {
            let value = self.current_text().parse::<u32>().unwrap_or_else(|_| {
                self.error("integer literal out of range");
                0
            });
            self.advance();
            value
        } else {
            self.expected("integer literal");
            0
        }
    }

    fn peek_kind(&self, offset: usize) -> HdlToken {
        let idx = self.pos + offset;
        if idx < self.tokens.len() {
            self.tokens[idx].kind
        } else {
            HdlToken::Eof
        }
    }

    // ========================================================================
    // Error handling and recovery
    // ========================================================================

    fn error(&self, msg: &str) {
        self.error_at(msg, self.current_span());
    }

    fn error_at(&self, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            msg,
            span,
        ));
    }

    fn expected(&self, what: &str) {
        let actual = if self.at_eof() {
            "end of file".to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        self.error(&format!("expected {what}, found {actual}"));
    }

    /// Recovers to the closing brace of the current module body.
    fn recover_to_right_brace(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current() {
                HdlToken::LeftBrace => depth += 1,
                HdlToken::RightBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                HdlToken::Module => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ========================================================================
    // Grammar
    // ========================================================================

    /// Parses a complete HDL source file: `module_decl*`.
    pub fn parse_source_file(&mut self) -> SourceFile {
        let start = self.current_span();
        let mut modules = Vec::new();

        while !self.at_eof() {
            if self.at(HdlToken::Module) {
                modules.push(self.parse_module());
            } else {
                self.error("expected 'module' to begin a new module declaration");
                // Skip forward to the next plausible module start.
                while !self.at_eof() && !self.at(HdlToken::Module) {
                    self.advance();
                }
            }
        }

        let span = if modules.is_empty() {
            start
        } else {
            start.join(self.prev_span())
        };

        SourceFile { modules, span }
    }

    /// Parses one module declaration:
    /// `'module' ident '(' param_list? ')' '->' output_list '{' body '}'`.
    fn parse_module(&mut self) -> ModuleDecl {
        let start = self.current_span();
        self.expect(HdlToken::Module);
        let name = self.expect_ident();

        self.expect(HdlToken::LeftParen);
        let inputs = if self.at(HdlToken::RightParen) {
            Vec::new()
        } else {
            self.parse_port_list()
        };
        self.expect(HdlToken::RightParen);

        self.expect(HdlToken::Arrow);
        let outputs = self.parse_port_list();

        self.expect(HdlToken::LeftBrace);
        let stmts = self.parse_body();
        self.expect(HdlToken::RightBrace);

        let span = start.join(self.prev_span());
        ModuleDecl {
            name,
            inputs,
            outputs,
            stmts,
            span,
        }
    }

    /// Parses a comma-separated list of port declarations.
    fn parse_port_list(&mut self) -> Vec<PortDecl> {
        let mut ports = Vec::new();
        loop {
            ports.push(self.parse_port());
            if !self.eat(HdlToken::Comma) {
                break;
            }
        }
        ports
    }

    /// Parses one port declaration: `ident` or `ident '[' int ']'`.
    ///
    /// A declared bus width of zero is rejected here; widths are positive
    /// everywhere downstream.
    fn parse_port(&mut self) -> PortDecl {
        let start = self.current_span();
        let name = self.expect_ident();
        let width = if self.eat(HdlToken::LeftBracket) {
            let width = self.expect_int();
            if self.at(HdlToken::DotDot) {
                self.error("port declaration must be a single name or name[width]");
                // Skip the rest of the malformed slice.
                self.advance();
                if self.at(HdlToken::IntLiteral) {
                    self.advance();
                }
            }
            if width == 0 {
                self.error_at("bus width must be positive", start.join(self.prev_span()));
            }
            self.expect(HdlToken::RightBracket);
            width.max(1)
        } else {
            1
        };
        let span = start.join(self.prev_span());
        PortDecl { name, width, span }
    }

    /// Parses the module body: a sequence of parts and wires.
    fn parse_body(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            match self.current() {
                HdlToken::Identifier => {
                    // Two-token window: `ident (` or `ident :` begins a part.
                    let next = self.peek_kind(1);
                    if next == HdlToken::LeftParen || next == HdlToken::Colon {
                        stmts.push(Stmt::Part(self.parse_part()));
                    } else {
                        stmts.push(Stmt::Wire(self.parse_wire()));
                    }
                }
                HdlToken::IntLiteral | HdlToken::LeftBrace => {
                    stmts.push(Stmt::Wire(self.parse_wire()));
                }
                HdlToken::RightBrace | HdlToken::Eof => break,
                _ => {
                    self.expected("a part or wire statement");
                    self.recover_to_right_brace();
                    break;
                }
            }
        }
        stmts
    }

    /// Parses a part statement:
    /// `(ident ':')? ident '(' expr_list? ')' '->' expr_list`.
    fn parse_part(&mut self) -> PartStmt {
        let start = self.current_span();

        let label = if self.peek_kind(1) == HdlToken::Colon {
            let label = self.expect_ident();
            self.expect(HdlToken::Colon);
            Some(label)
        } else {
            None
        };

        let module = self.expect_ident();
        self.expect(HdlToken::LeftParen);
        let args = if self.at(HdlToken::RightParen) {
            Vec::new()
        } else {
            self.parse_expr_list()
        };
        self.expect(HdlToken::RightParen);
        self.expect(HdlToken::Arrow);
        let results = self.parse_expr_list();

        let span = start.join(self.prev_span());
        PartStmt {
            label,
            module,
            args,
            results,
            span,
        }
    }

    /// Parses a wire statement: `expr_or_brace '->' expr`.
    fn parse_wire(&mut self) -> WireStmt {
        let start = self.current_span();

        let (inputs, braced) = if self.eat(HdlToken::LeftBrace) {
            let inputs = self.parse_expr_list();
            self.expect(HdlToken::RightBrace);
            (inputs, true)
        } else {
            (self.parse_expr_list(), false)
        };

        if !braced && inputs.len() > 1 {
            self.error_at(
                "multiple wire inputs must be bound using { }",
                start.join(self.prev_span()),
            );
        }

        self.expect(HdlToken::Arrow);

        let output = self.parse_expr();
        if matches!(output, NetExpr::Const { .. } | NetExpr::Concat { .. }) {
            self.error_at("wire output must be an identifier", output.span());
        }

        let span = start.join(self.prev_span());
        WireStmt {
            inputs,
            output,
            span,
        }
    }

    /// Parses a comma-separated list of expressions and concatenations.
    fn parse_expr_list(&mut self) -> Vec<NetExpr> {
        let mut exprs = Vec::new();
        loop {
            if self.at(HdlToken::LeftBrace) {
                let start = self.current_span();
                self.advance();
                let parts = self.parse_expr_list();
                self.expect(HdlToken::RightBrace);
                let span = start.join(self.prev_span());
                exprs.push(NetExpr::Concat { parts, span });
            } else {
                exprs.push(self.parse_expr());
            }
            if !self.eat(HdlToken::Comma) {
                break;
            }
        }
        exprs
    }

    /// Parses a single net expression:
    /// `ident ('[' int ('..' int)? ']')?` or a constant `0`/`1`.
    fn parse_expr(&mut self) -> NetExpr {
        let start = self.current_span();

        if self.at(HdlToken::IntLiteral) {
            let text = self.current_text();
            let value = match text {
                "0" => false,
                "1" => true,
                _ => {
                    self.error("constant inputs must be 0 or 1");
                    false
                }
            };
            self.advance();
            if self.at(HdlToken::LeftBracket) {
                self.error("cannot slice a constant");
                self.skip_slice();
            }
            let span = start.join(self.prev_span());
            return NetExpr::Const { value, span };
        }

        let name = self.expect_ident();
        let slice = if self.eat(HdlToken::LeftBracket) {
            let slice_start = self.expect_int();
            let slice_end = if self.eat(HdlToken::DotDot) {
                let end = self.expect_int();
                if end < slice_start {
                    self.error_at(
                        "slice end index must not be less than the start index",
                        start.join(self.current_span()),
                    );
                    slice_start
                } else {
                    end
                }
            } else {
                slice_start
            };
            self.expect(HdlToken::RightBracket);
            Some(Slice {
                start: slice_start,
                end: slice_end,
            })
        } else {
            None
        };

        let span = start.join(self.prev_span());
        NetExpr::Ref { name, slice, span }
    }

    /// Skips over a malformed slice after an error.
    fn skip_slice(&mut self) {
        self.eat(HdlToken::LeftBracket);
        while !self.at_eof() && !self.eat(HdlToken::RightBracket) {
            self.advance();
        }
    }
}

/// Returns a human-readable name for a token kind, used in error messages.
fn token_name(kind: HdlToken) -> &'static str {
    match kind {
        HdlToken::Module => "'module'",
        HdlToken::Test => "'test'",
        HdlToken::Clock => "'clock'",
        HdlToken::LeftBrace => "'{'",
        HdlToken::RightBrace => "'}'",
        HdlToken::LeftParen => "'('",
        HdlToken::RightParen => "')'",
        HdlToken::LeftBracket => "'['",
        HdlToken::RightBracket => "']'",
        HdlToken::Comma => "','",
        HdlToken::Colon => "':'",
        HdlToken::Arrow => "'->'",
        HdlToken::DotDot => "'..'",
        HdlToken::Dot => "'.'",
        HdlToken::Identifier => "identifier",
        HdlToken::IntLiteral => "integer literal",
        HdlToken::ByteLiteral => "byte literal",
        HdlToken::WordLiteral => "word literal",
        HdlToken::Error => "invalid token",
        HdlToken::Eof => "end of file",
    }
}
