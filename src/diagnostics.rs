use std::fmt;

use serde_json::{Value, json};

use crate::ast::Position;

/// The compiler stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Invalid characters and unterminated literals; fatal for the file
    Lexical,
    /// Unexpected tokens; recovered at the next line
    Syntactic,
    /// Name resolution and desugaring failures
    Semantic,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntactic => "syntactic",
            DiagnosticKind::Semantic => "semantic",
        }
    }
}

/// A compile error, reported as `file:line:column - message`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub pos: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, pos: Position, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            pos,
            message: message.into(),
        }
    }

    pub fn lexical(pos: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Lexical, pos, message)
    }

    pub fn syntactic(pos: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Syntactic, pos, message)
    }

    pub fn semantic(pos: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Semantic, pos, message)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "kind": self.kind.as_str(),
            "file": &*self.pos.file,
            "line": self.pos.line,
            "column": self.pos.column,
            "message": self.message,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.pos, self.message)
    }
}
