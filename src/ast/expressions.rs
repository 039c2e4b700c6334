use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::ast::{BinOp, Position, PostOp, Stmt, UnaryOp};

/// Expression node: anything that produces a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A dotted name, resolved through the scope table at build time
    ///
    /// # Examples
    /// ```text
    /// count
    /// this.items
    /// Geometry.Point
    /// ```
    Identifier { pos: Position, path: Vec<String> },

    /// Numeric literal, kept in its source spelling
    Number { pos: Position, value: String },

    /// String literal, quotes included
    String { pos: Position, value: String },

    /// Regular expression literal, slashes and flags included
    Regex { pos: Position, value: String },

    /// `true` or `false`
    Bool { pos: Position, value: bool },

    /// `null` or `undefined`
    LitExpr { pos: Position, value: String },

    /// Binary operation, including member access through `.`
    ///
    /// # Examples
    /// ```text
    /// a + b * c
    /// items.pop().name
    /// ```
    Binary {
        pos: Position,
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Prefix operation
    Unary {
        pos: Position,
        op: UnaryOp,
        expr: Box<Expr>,
    },

    /// Postfix increment or decrement
    PostOp {
        pos: Position,
        op: PostOp,
        expr: Box<Expr>,
    },

    /// Function call
    ///
    /// # Example
    /// ```text
    /// Math.max(a, b)
    /// ```
    Call {
        pos: Position,
        function: Box<Expr>,
        args: Vec<Expr>,
    },

    /// Object construction with braces
    ///
    /// # Example
    /// ```text
    /// Point{1, 2}      ; new Point(1, 2)
    /// ```
    Constructor {
        pos: Position,
        ty: Box<Expr>,
        args: Vec<Expr>,
    },

    /// Index access
    ///
    /// # Example
    /// ```text
    /// rows[i][j]
    /// ```
    Accessor {
        pos: Position,
        object: Box<Expr>,
        index: Box<Expr>,
    },

    /// Array literal
    Array { pos: Position, items: Vec<Expr> },

    /// Object literal made of set lines
    ///
    /// # Examples
    /// ```text
    /// {x: 1, y: 2}
    /// ```
    Object { pos: Position, lines: Vec<SetLine> },

    /// `value if condition else other`
    Conditional {
        pos: Position,
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// Anonymous function literal
    Function(FunctionDef),

    /// Placeholder left where parsing failed
    Error { pos: Position, message: String },
}

/// `names : values` inside an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct SetLine {
    pub pos: Position,
    pub names: Vec<String>,
    pub values: Vec<Expr>,
}

/// A function literal: `fn(a, b)` followed by an indented body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub pos: Position,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

impl Expr {
    pub fn pos(&self) -> &Position {
        match self {
            Expr::Identifier { pos, .. }
            | Expr::Number { pos, .. }
            | Expr::String { pos, .. }
            | Expr::Regex { pos, .. }
            | Expr::Bool { pos, .. }
            | Expr::LitExpr { pos, .. }
            | Expr::Binary { pos, .. }
            | Expr::Unary { pos, .. }
            | Expr::PostOp { pos, .. }
            | Expr::Call { pos, .. }
            | Expr::Constructor { pos, .. }
            | Expr::Accessor { pos, .. }
            | Expr::Array { pos, .. }
            | Expr::Object { pos, .. }
            | Expr::Conditional { pos, .. }
            | Expr::Error { pos, .. } => pos,
            Expr::Function(def) => &def.pos,
        }
    }

    pub fn error(pos: Position, message: impl Into<String>) -> Self {
        Expr::Error {
            pos,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Expr::Error { .. })
    }

    /// Whether the expression may stand alone as a statement.
    pub fn is_valid_stmt(&self) -> bool {
        match self {
            Expr::Call { .. } | Expr::Constructor { .. } | Expr::PostOp { .. } | Expr::Error { .. } => {
                true
            }
            Expr::Unary { op, .. } => op.has_side_effect(),
            Expr::Binary {
                op: BinOp::Member,
                right,
                ..
            } => right.is_valid_stmt(),
            Expr::Identifier { .. }
            | Expr::Number { .. }
            | Expr::String { .. }
            | Expr::Regex { .. }
            | Expr::Bool { .. }
            | Expr::LitExpr { .. }
            | Expr::Binary { .. }
            | Expr::Accessor { .. }
            | Expr::Array { .. }
            | Expr::Object { .. }
            | Expr::Conditional { .. }
            | Expr::Function(_) => false,
        }
    }

    /// The statically known value of a numeric literal, possibly negated.
    pub fn static_number(&self) -> Option<Decimal> {
        match self {
            Expr::Number { value, .. } => parse_number(value),
            Expr::Unary {
                op: UnaryOp::Negate,
                expr,
                ..
            } => expr.static_number().map(|n| -n),
            _ => None,
        }
    }

    /// [`Expr::static_number`] as a float.
    ///
    /// # Examples
    ///
    /// ```
    /// use minet_lang::{lexer::tokenize, parser::Parser};
    ///
    /// let tokens = tokenize("-3.14", "doc.mn");
    /// let expr = Parser::new(tokens, "doc.mn").parse_standalone_expr();
    /// assert!((expr.num_val().unwrap() + 3.14).abs() < 1e-12);
    /// ```
    pub fn num_val(&self) -> Option<f64> {
        self.static_number().and_then(|n| n.to_f64())
    }
}

impl From<FunctionDef> for Expr {
    fn from(def: FunctionDef) -> Self {
        Expr::Function(def)
    }
}

fn parse_number(text: &str) -> Option<Decimal> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok().map(Decimal::from),
        None => Decimal::from_str(text).ok(),
    }
}
