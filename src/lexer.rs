use std::sync::Arc;

use log::debug;

use crate::ast::{Position, Token, TokenKind};

const OPERATOR_CHARS: &str = "()[]{}<>!=+-*/%,.:&|^~";
const HEX_START: &str = "0x";
const COMMENT_START: &str = "<;";
const COMMENT_END: &str = ";>";
const JS_START: &str = "<js";
const JS_END: &str = "js>";

const SPACE_WIDTH: usize = 1;
const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Indent,
    Statement,
    Comment,
    MultilineComment,
    JsBlock,
    Literal,
    Number,
    Operator,
    String,
    Regex,
}

/// Indentation-aware tokenizer.
///
/// Runs as a state machine: every state consumes some input, possibly
/// emits tokens, and names the state to continue in. Lexing stops at the
/// end of input or at the first error, which is appended as a single
/// [`TokenKind::Error`] token.
pub struct Lexer {
    input: Vec<char>,
    file: Arc<str>,
    line_starts: Vec<usize>,
    start: usize,
    pos: usize,
    widths: Vec<usize>,
    indent_levels: Vec<usize>,
    in_stmt: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str, filename: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let mut line_starts = vec![0];
        line_starts.extend(
            input
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == '\n')
                .map(|(i, _)| i + 1),
        );
        Lexer {
            input,
            file: Arc::from(filename),
            line_starts,
            start: 0,
            pos: 0,
            widths: Vec::new(),
            indent_levels: vec![0],
            in_stmt: false,
            tokens: Vec::new(),
        }
    }

    /// Tokenizes the whole input.
    pub fn run(mut self) -> Vec<Token> {
        let mut state = Some(State::Indent);
        while let Some(current) = state {
            state = self.step(current);
        }
        debug!("Lexed {} tokens from {}", self.tokens.len(), self.file);
        self.tokens
    }

    fn step(&mut self, state: State) -> Option<State> {
        match state {
            State::Indent => self.lex_indent(),
            State::Statement => self.lex_statement(),
            State::Comment => self.lex_comment(),
            State::MultilineComment => self.lex_multiline_comment(),
            State::JsBlock => self.lex_js_block(),
            State::Literal => self.lex_literal(),
            State::Number => self.lex_number(),
            State::Operator => self.lex_operator(),
            State::String => self.lex_string(),
            State::Regex => self.lex_regex(),
        }
    }

    // ============================================================================
    // Cursor primitives
    // ============================================================================

    fn position(&self) -> Position {
        let line = self.line_starts.partition_point(|&s| s <= self.start);
        let column = self.start - self.line_starts[line - 1] + 1;
        Position::new(Arc::clone(&self.file), line, column)
    }

    fn current(&self) -> String {
        self.input[self.start..self.pos].iter().collect()
    }

    fn next(&mut self) -> Option<char> {
        match self.input.get(self.pos).copied() {
            Some(c) => {
                self.widths.push(1);
                self.pos += 1;
                Some(c)
            }
            None => {
                self.widths.push(0);
                None
            }
        }
    }

    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            self.next();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn backup(&mut self) {
        self.pos -= self.widths.pop().unwrap_or(0);
    }

    fn discard(&mut self) {
        self.start = self.pos;
    }

    fn starts_with(&self, text: &str) -> bool {
        let mut chars = self.input[self.pos..].iter();
        text.chars().all(|c| chars.next() == Some(&c))
    }

    fn emit(&mut self, kind: TokenKind) {
        let value = self.current();
        self.emit_value(kind, value);
    }

    fn emit_value(&mut self, kind: TokenKind, value: String) {
        let pos = self.position();
        self.tokens.push(Token::new(kind, pos, value));
        self.start = self.pos;
        self.widths.clear();
    }

    fn error(&mut self, message: impl Into<String>) -> Option<State> {
        let pos = self.position();
        self.tokens.push(Token::new(TokenKind::Error, pos, message));
        None
    }

    /// The last significant token, ignoring comments.
    fn previous_kind(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|t| t.kind)
            .find(|k| *k != TokenKind::Comment)
    }

    // ============================================================================
    // States
    // ============================================================================

    /// Emits the tokens for a line indented by `indent`. Returns false after
    /// recording an error.
    fn emit_indent(&mut self, indent: usize) -> bool {
        let mut top = self.indent_levels.last().copied().unwrap_or(0);
        if indent > top {
            self.emit(TokenKind::Indent);
            self.indent_levels.push(indent);
            return true;
        }
        while indent < top {
            self.emit(TokenKind::Dedent);
            self.emit(TokenKind::Eol);
            self.indent_levels.pop();
            top = self.indent_levels.last().copied().unwrap_or(0);
        }
        if top != indent {
            self.error("Mismatched indentation level encountered.");
            return false;
        }
        true
    }

    fn finish(&mut self) -> Option<State> {
        if self.in_stmt {
            self.emit(TokenKind::Eol);
        }
        if self.emit_indent(0) {
            self.emit(TokenKind::Eof);
        }
        None
    }

    fn lex_indent(&mut self) -> Option<State> {
        self.in_stmt = false;
        let mut indent = 0;
        loop {
            if self.starts_with(COMMENT_START) {
                self.discard();
                return Some(State::MultilineComment);
            }
            match self.next() {
                None => {
                    self.discard();
                    return self.finish();
                }
                Some('\r') | Some('\n') => {
                    indent = 0;
                    self.discard();
                }
                Some(' ') => indent += SPACE_WIDTH,
                Some('\t') => indent += TAB_WIDTH,
                Some(';') => {
                    // Full-line comments are dropped like blank lines
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.next();
                    }
                    self.discard();
                }
                Some(_) => {
                    self.backup();
                    self.discard();
                    if !self.emit_indent(indent) {
                        return None;
                    }
                    return Some(State::Statement);
                }
            }
        }
    }

    fn lex_statement(&mut self) -> Option<State> {
        loop {
            if self.starts_with(COMMENT_START) {
                self.discard();
                return Some(State::MultilineComment);
            }
            if self.starts_with(JS_START) {
                self.in_stmt = true;
                self.discard();
                return Some(State::JsBlock);
            }
            match self.peek() {
                None => return self.finish(),
                Some(' ') | Some('\t') | Some('\r') => {
                    self.next();
                    self.discard();
                }
                Some('\n') => {
                    self.next();
                    if self.in_stmt {
                        self.emit(TokenKind::Eol);
                    }
                    self.discard();
                    return Some(State::Indent);
                }
                Some(';') => return Some(State::Comment),
                Some('"') | Some('\'') => {
                    self.in_stmt = true;
                    return Some(State::String);
                }
                Some('/') if !self.previous_kind().is_some_and(|k| k.ends_expression()) => {
                    self.in_stmt = true;
                    return Some(State::Regex);
                }
                Some(c) if is_literal_start(c) => {
                    self.in_stmt = true;
                    return Some(State::Literal);
                }
                Some(c) if c.is_ascii_digit() => {
                    self.in_stmt = true;
                    return Some(State::Number);
                }
                Some(c) if OPERATOR_CHARS.contains(c) => {
                    self.in_stmt = true;
                    self.next();
                    return Some(State::Operator);
                }
                Some(c) => return self.error(format!("Invalid character '{}' encountered.", c)),
            }
        }
    }

    fn lex_comment(&mut self) -> Option<State> {
        self.next();
        self.discard();
        while !matches!(self.peek(), None | Some('\r') | Some('\n')) {
            self.next();
        }
        self.emit(TokenKind::Comment);
        Some(State::Statement)
    }

    fn lex_multiline_comment(&mut self) -> Option<State> {
        self.skip(COMMENT_START.len());
        self.discard();
        let mut depth = 1;
        while self.peek().is_some() {
            if self.starts_with(COMMENT_END) {
                depth -= 1;
                if depth == 0 {
                    self.emit(TokenKind::Comment);
                    self.skip(COMMENT_END.len());
                    self.discard();
                    return Some(State::Statement);
                }
            } else if self.starts_with(COMMENT_START) {
                depth += 1;
            }
            // Markers may overlap, as in `<;>`
            self.next();
        }
        self.error(format!("Unclosed {}", COMMENT_START))
    }

    fn lex_js_block(&mut self) -> Option<State> {
        self.skip(JS_START.len());
        self.discard();
        while self.peek().is_some() {
            if self.starts_with(JS_END) {
                let code = self.current().trim().to_string();
                self.emit_value(TokenKind::JsBlock, code);
                self.skip(JS_END.len());
                self.discard();
                return Some(State::Statement);
            }
            self.next();
        }
        self.error(format!("Unclosed {}", JS_START))
    }

    fn lex_literal(&mut self) -> Option<State> {
        while self.peek().is_some_and(is_literal_char) {
            self.next();
        }
        let word = self.current();
        let kind = TokenKind::lookup(&word)
            .filter(|k| k.is_keyword())
            .unwrap_or(TokenKind::Literal);
        self.emit(kind);
        Some(State::Statement)
    }

    fn lex_number(&mut self) -> Option<State> {
        if self.starts_with(HEX_START) {
            self.skip(HEX_START.len());
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.next();
            }
        } else {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.next();
            }
            if self.peek() == Some('.') {
                self.next();
                let mut fraction = false;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.next();
                    fraction = true;
                }
                // `1.toString()`: the dot belongs to the member access
                if !fraction {
                    self.backup();
                }
            }
        }
        self.emit(TokenKind::Number);
        Some(State::Statement)
    }

    fn lex_operator(&mut self) -> Option<State> {
        while self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
            self.next();
        }
        let run = self.current();
        while self.pos > self.start {
            if let Some(kind) = TokenKind::lookup(&self.current()) {
                self.emit(kind);
                return Some(State::Statement);
            }
            self.backup();
        }
        self.error(format!("Invalid operator '{}'", run))
    }

    fn lex_string(&mut self) -> Option<State> {
        let quote = self.next().unwrap_or('"');
        let mut in_escape = false;
        loop {
            match self.next() {
                None | Some('\r') | Some('\n') => {
                    return self.error(format!("Unclosed {}", quote));
                }
                Some('\\') if !in_escape => in_escape = true,
                Some(c) if !in_escape && c == quote => {
                    self.emit(TokenKind::String);
                    return Some(State::Statement);
                }
                Some(_) => in_escape = false,
            }
        }
    }

    fn lex_regex(&mut self) -> Option<State> {
        self.next();
        let mut in_escape = false;
        let mut in_class = false;
        loop {
            match self.next() {
                None | Some('\r') | Some('\n') => {
                    return self.error("Unclosed regular expression");
                }
                Some(_) if in_escape => in_escape = false,
                Some('\\') => in_escape = true,
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.next();
        }
        self.emit(TokenKind::Regex);
        Some(State::Statement)
    }
}

fn is_literal_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_literal_char(c: char) -> bool {
    is_literal_start(c) || c.is_ascii_digit()
}

/// Tokenizes `source`, attributing positions to `filename`.
pub fn tokenize(source: &str, filename: &str) -> Vec<Token> {
    Lexer::new(source, filename).run()
}

#[cfg(test)]
fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, "test.mn").iter().map(|t| t.kind).collect()
}

#[test]
fn test_keywords() {
    use TokenKind::*;
    assert_eq!(
        kinds("if x and not_kw or ret"),
        vec![If, Literal, And, Literal, Or, Return, Eol, Eof]
    );
}

#[test]
fn test_operator_backoff() {
    use TokenKind::*;
    assert_eq!(kinds("a >>>: 1"), vec![Literal, UShrAssign, Number, Eol, Eof]);
    assert_eq!(
        kinds("f(-1)"),
        vec![Literal, LeftParen, Sub, Number, RightParen, Eol, Eof]
    );
    assert_eq!(kinds("a :: b"), vec![Literal, Unpack, Literal, Eol, Eof]);
}

#[test]
fn test_indent_dedent_pairs() {
    use TokenKind::*;
    assert_eq!(
        kinds("a\n  b\nc"),
        vec![Literal, Eol, Indent, Literal, Eol, Dedent, Eol, Literal, Eol, Eof]
    );
}

#[test]
fn test_number_keeps_trailing_dot_separate() {
    let tokens = tokenize("1.toString()", "test.mn");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "1");
    assert_eq!(tokens[1].kind, TokenKind::Dot);
}

#[test]
fn test_error_stops_lexing() {
    let tokens = tokenize("a # b\nc", "test.mn");
    let last = tokens.last().map(|t| t.kind);
    assert_eq!(last, Some(TokenKind::Error));
    assert_eq!(tokens[tokens.len() - 1].value, "Invalid character '#' encountered.");
}
