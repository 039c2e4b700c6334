//! Recursive-descent parser.
//!
//! Expressions are parsed by precedence climbing over
//! [`Token::precedence`]; statements and class bodies by plain recursive
//! descent over the indentation tokens produced by the lexer.
//!
//! A syntax error is reported once, the cursor skips to the start of the
//! next line (dropping any block that hangs off the broken line), and the
//! failure travels up as [`Recovered`] until the enclosing block turns it
//! into an `Error` node. One file can therefore report many errors.

mod classes;
mod expressions;
mod statements;

use std::sync::Arc;

use log::debug;

use crate::ast::{ClassStmt, Expr, File, Position, Stmt, Token, TokenKind};
use crate::diagnostics::Diagnostic;

/// An owned token vector with a backtracking cursor.
///
/// The vector always ends with [`TokenKind::Eof`]; reading past the end
/// keeps returning it.
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(mut tokens: Vec<Token>, file: Arc<str>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let pos = tokens
                .last()
                .map(|t| t.pos.clone())
                .unwrap_or_else(|| Position::new(file, 1, 1));
            tokens.push(Token::new(TokenKind::Eof, pos, ""));
        }
        TokenCursor { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// The token after the next one.
    pub fn peek_second(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + 1).min(last)]
    }

    pub fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub fn backup(&mut self, count: usize) {
        self.pos = self.pos.saturating_sub(count);
    }

    /// Consumes `kinds` in order, or nothing at all.
    ///
    /// On failure the cursor is restored and the first mismatching token is
    /// returned.
    pub fn accept(&mut self, kinds: &[TokenKind]) -> Result<Vec<Token>, Token> {
        let start = self.pos;
        let mut accepted = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let token = self.next();
            if token.kind != *kind {
                self.pos = start;
                return Err(token);
            }
            accepted.push(token);
        }
        Ok(accepted)
    }

    pub fn accept_one(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek().kind == kind {
            Some(self.next())
        } else {
            None
        }
    }

    pub fn is_next(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }
}

/// A syntax error that has been reported and recovered from.
#[derive(Debug, Clone)]
pub(crate) struct Recovered {
    pos: Position,
    message: String,
}

impl Recovered {
    fn into_stmt(self) -> Stmt {
        Stmt::error(self.pos, self.message)
    }

    fn into_expr(self) -> Expr {
        Expr::error(self.pos, self.message)
    }

    fn into_class_stmt(self) -> ClassStmt {
        ClassStmt::error(self.pos, self.message)
    }
}

pub(crate) type ParseResult<T> = Result<T, Recovered>;

/// The result of parsing one file.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub file: File,
    pub ok: bool,
    pub errors: Vec<Diagnostic>,
}

pub struct Parser {
    cursor: TokenCursor,
    file: Arc<str>,
    errors: Vec<Diagnostic>,
}

impl Parser {
    /// Creates a parser over the output of the lexer. Comment tokens are
    /// dropped here.
    pub fn new(tokens: Vec<Token>, filename: &str) -> Self {
        let file: Arc<str> = Arc::from(filename);
        let tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        Parser {
            cursor: TokenCursor::new(tokens, Arc::clone(&file)),
            file,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        let start = Position::new(Arc::clone(&self.file), 1, 1);

        // A lexical error is always the last token
        if let Some(error) = self.cursor.tokens.iter().find(|t| t.kind == TokenKind::Error) {
            let diagnostic = Diagnostic::lexical(error.pos.clone(), error.value.clone());
            return ParseOutput {
                file: File {
                    pos: start,
                    name: self.file.to_string(),
                    statements: Vec::new(),
                },
                ok: false,
                errors: vec![diagnostic],
            };
        }

        let statements = self.parse_file();
        debug!(
            "Parsed {} top-level statements from {} with {} errors",
            statements.len(),
            self.file,
            self.errors.len()
        );
        ParseOutput {
            file: File {
                pos: start,
                name: self.file.to_string(),
                statements,
            },
            ok: self.errors.is_empty(),
            errors: self.errors,
        }
    }

    /// Parses a single expression; used by tools and tests.
    pub fn parse_standalone_expr(&mut self) -> Expr {
        self.parse_expr().unwrap_or_else(Recovered::into_expr)
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    fn parse_file(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        loop {
            let token = self.cursor.peek().clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Eol => {
                    self.cursor.next();
                }
                TokenKind::Use => statements.push(self.parse_use().unwrap_or_else(Recovered::into_stmt)),
                TokenKind::Literal => {
                    statements.push(self.parse_class().unwrap_or_else(Recovered::into_stmt))
                }
                TokenKind::JsBlock => {
                    statements.push(self.parse_js_block().unwrap_or_else(Recovered::into_stmt))
                }
                _ => {
                    let message = format!("Invalid token {}", describe(&token));
                    let error: ParseResult<Stmt> = self.fail(token.pos.clone(), message);
                    if token.kind == TokenKind::Dedent {
                        self.cursor.next();
                    }
                    statements.extend(error.err().map(Recovered::into_stmt));
                }
            }
        }
        statements
    }

    // ============================================================================
    // Error reporting and recovery
    // ============================================================================

    /// Records a diagnostic without moving the cursor.
    fn report(&mut self, pos: Position, message: impl Into<String>) -> Recovered {
        let message = message.into();
        self.errors.push(Diagnostic::syntactic(pos.clone(), message.clone()));
        Recovered { pos, message }
    }

    /// Records a diagnostic and skips to the next line.
    fn fail<T>(&mut self, pos: Position, message: impl Into<String>) -> ParseResult<T> {
        let recovered = self.report(pos, message);
        self.to_next_line();
        Err(recovered)
    }

    fn invalid_token<T>(&mut self, context: &str, token: &Token) -> ParseResult<T> {
        let message = format!("Invalid token in {}: {}", context, describe(token));
        self.fail(token.pos.clone(), message)
    }

    /// Skips past the end of the current line and any block indented under
    /// it. Stops in front of a `Dedent` so the enclosing block can close.
    fn to_next_line(&mut self) {
        loop {
            match self.cursor.peek().kind {
                TokenKind::Eof | TokenKind::Dedent => return,
                TokenKind::Indent => {
                    self.skip_block();
                    return;
                }
                TokenKind::Eol => {
                    self.cursor.next();
                    if self.cursor.is_next(TokenKind::Indent) {
                        self.skip_block();
                    }
                    return;
                }
                _ => {
                    self.cursor.next();
                }
            }
        }
    }

    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.cursor.next();
            match token.kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let _ = self.cursor.accept(&[TokenKind::Eol]);
                        return;
                    }
                }
                TokenKind::Eof => {
                    self.cursor.backup(1);
                    return;
                }
                _ => {}
            }
        }
    }

    // ============================================================================
    // Shared pieces
    // ============================================================================

    /// `NAME ('.' NAME)*`
    fn parse_path(&mut self, context: &str) -> ParseResult<Vec<String>> {
        let mut path = Vec::new();
        loop {
            match self.cursor.accept(&[TokenKind::Literal]) {
                Ok(tokens) => path.extend(tokens.into_iter().map(|t| t.value)),
                Err(token) => return self.invalid_token(context, &token),
            }
            if self.cursor.accept_one(TokenKind::Dot).is_none() {
                return Ok(path);
            }
        }
    }

    /// `NAME (',' NAME)*`, possibly empty.
    fn parse_names(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        while self.cursor.is_next(TokenKind::Literal) {
            names.push(self.cursor.next().value);
            if self.cursor.accept_one(TokenKind::Comma).is_none() {
                break;
            }
        }
        names
    }

    /// `'(' names ')'`
    fn parse_params(&mut self, context: &str) -> ParseResult<Vec<String>> {
        if let Err(token) = self.cursor.accept(&[TokenKind::LeftParen]) {
            return self.invalid_token(context, &token);
        }
        let params = self.parse_names();
        if let Err(token) = self.cursor.accept(&[TokenKind::RightParen]) {
            return self.invalid_token(context, &token);
        }
        Ok(params)
    }

    /// Statements up to the end of the current block, then `DEDENT EOL`.
    fn parse_block_rest(&mut self, context: &str) -> Vec<Stmt> {
        let mut body = Vec::new();
        while !self.cursor.peek().kind.is_dedent_stop() {
            body.push(self.parse_stmt());
        }
        if let Err(token) = self.cursor.accept(&[TokenKind::Dedent, TokenKind::Eol]) {
            let error: ParseResult<()> = self.invalid_token(context, &token);
            body.extend(error.err().map(Recovered::into_stmt));
        }
        body
    }

    /// `EOL INDENT stmt* DEDENT EOL`
    fn parse_body(&mut self, context: &str) -> ParseResult<Vec<Stmt>> {
        if let Err(token) = self.cursor.accept(&[TokenKind::Eol, TokenKind::Indent]) {
            return self.invalid_token(context, &token);
        }
        Ok(self.parse_block_rest(context))
    }

    fn expect_eol(&mut self, context: &str) -> ParseResult<()> {
        match self.cursor.accept(&[TokenKind::Eol]) {
            Ok(_) => Ok(()),
            Err(token) => self.invalid_token(context, &token),
        }
    }
}

/// Short human-readable form of a token for error messages.
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eol => "end of line".to_string(),
        TokenKind::Eof => "end of file".to_string(),
        _ if token.value.is_empty() => format!("{:?}", token.kind),
        _ => format!("{:?} '{}'", token.kind, token.value),
    }
}

/// Parses a token stream produced by [`crate::lexer::tokenize`].
pub fn parse(tokens: Vec<Token>, filename: &str) -> ParseOutput {
    Parser::new(tokens, filename).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn cursor(source: &str) -> TokenCursor {
        TokenCursor::new(tokenize(source, "test.mn"), Arc::from("test.mn"))
    }

    #[test]
    fn test_accept_restores_on_mismatch() {
        let mut cursor = cursor("a : 1");
        let result = cursor.accept(&[TokenKind::Literal, TokenKind::Comma]);
        assert!(matches!(result, Err(ref t) if t.kind == TokenKind::Assign));
        assert_eq!(cursor.peek().kind, TokenKind::Literal);
    }

    #[test]
    fn test_reading_past_eof() {
        let mut cursor = cursor("");
        assert_eq!(cursor.next().kind, TokenKind::Eof);
        assert_eq!(cursor.next().kind, TokenKind::Eof);
        cursor.backup(1);
        assert_eq!(cursor.peek().kind, TokenKind::Eof);
    }

    #[test]
    fn test_recovery_skips_hanging_block() {
        let source = "A\n    .x : )\n        junk\n    .y : 1\n";
        let output = parse(tokenize(source, "test.mn"), "test.mn");
        assert_eq!(output.errors.len(), 1);
        let Stmt::Class(class) = &output.file.statements[0] else {
            panic!("expected a class");
        };
        assert_eq!(class.body.len(), 2);
        assert!(matches!(class.body[1], ClassStmt::PropertySet { .. }));
    }

    #[test]
    fn test_lexical_error_fails_file() {
        let output = parse(tokenize("A\n    .x : \"open", "test.mn"), "test.mn");
        assert!(!output.ok);
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].message, "Unclosed \"");
    }
}
