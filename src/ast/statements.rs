use crate::ast::{AssignOp, BinOp, ClassDecl, Expr, Position};

/// Statement node: produces no value.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Assignment of one or more values to one or more targets
    ///
    /// # Examples
    /// ```text
    /// total +: price
    /// a, b : b, a
    /// x, y :: point
    /// ```
    Assign {
        pos: Position,
        op: AssignOp,
        left: Vec<Expr>,
        right: Vec<Expr>,
    },

    /// Variable declarations, one line or an indented group of lines
    ///
    /// # Examples
    /// ```text
    /// var i, j : 0
    /// var a : 1
    ///     b, c : 2, 3
    /// ```
    Var { pos: Position, lines: Vec<VarLine> },

    /// Conditional with one or more sections
    If(If),

    /// Range or array loop
    For(For),

    /// `while condition`
    While {
        pos: Position,
        label: Option<String>,
        condition: Expr,
        body: Vec<Stmt>,
    },

    /// Endless `loop`
    Loop {
        pos: Position,
        label: Option<String>,
        body: Vec<Stmt>,
    },

    /// `try` with optional `catch` and `finally` blocks
    Try {
        pos: Position,
        body: Vec<Stmt>,
        catch: Option<Catch>,
        finally: Option<Vec<Stmt>>,
    },

    Throw { pos: Position, value: Expr },

    Break { pos: Position, label: Option<String> },

    Continue { pos: Position, label: Option<String> },

    /// `ret [value]`
    Return { pos: Position, value: Option<Expr> },

    /// Expression statement; an indented block below it is a chain block
    ///
    /// # Example
    /// ```text
    /// document.body.style
    ///     color : "red"
    ///     width : "10px"
    /// ```
    Expr {
        pos: Position,
        exprs: Vec<Expr>,
        chain: Vec<Stmt>,
    },

    /// Import aliases, only valid at file level
    Use(Use),

    /// Class declaration, only valid at file level
    Class(ClassDecl),

    /// Embedded JavaScript, copied verbatim
    JsBlock { pos: Position, code: String },

    /// Placeholder left where parsing failed
    Error { pos: Position, message: String },
}

impl Stmt {
    pub fn pos(&self) -> &Position {
        match self {
            Stmt::Assign { pos, .. }
            | Stmt::Var { pos, .. }
            | Stmt::While { pos, .. }
            | Stmt::Loop { pos, .. }
            | Stmt::Try { pos, .. }
            | Stmt::Throw { pos, .. }
            | Stmt::Break { pos, .. }
            | Stmt::Continue { pos, .. }
            | Stmt::Return { pos, .. }
            | Stmt::Expr { pos, .. }
            | Stmt::JsBlock { pos, .. }
            | Stmt::Error { pos, .. } => pos,
            Stmt::If(stmt) => &stmt.pos,
            Stmt::For(stmt) => &stmt.pos,
            Stmt::Use(stmt) => &stmt.pos,
            Stmt::Class(stmt) => &stmt.pos,
        }
    }

    pub fn error(pos: Position, message: impl Into<String>) -> Self {
        Stmt::Error {
            pos,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Stmt::Error { .. })
    }
}

/// One `names : values` line of a `var` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VarLine {
    pub pos: Position,
    pub names: Vec<String>,
    pub values: Vec<Expr>,
}

/// An if statement.
///
/// Plain `if`/`else if`/`else` chains and bare `if` blocks of `is` sections
/// leave `subject` empty. If-sugar sets `subject` to the expression that is
/// compared against each section's values.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub pos: Position,
    pub subject: Option<Expr>,
    pub sections: Vec<IfSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfSection {
    pub pos: Position,
    pub condition: Condition,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A full boolean expression
    Expr(Expr),
    /// `= 1, 2` under an if-sugar subject: subject compared to each value
    Compare { op: BinOp, values: Vec<Expr> },
    /// Catch-all section
    Else,
}

/// `for var in from [to to] [by by]`
///
/// Without `to`, `from` is an array and the loop visits its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub pos: Position,
    pub label: Option<String>,
    pub var: String,
    pub from: Expr,
    pub to: Option<Expr>,
    pub by: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub pos: Position,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

/// `use a.b.C` or `use X for a.b.C`
#[derive(Debug, Clone, PartialEq)]
pub struct Use {
    pub pos: Position,
    pub items: Vec<UseItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseItem {
    pub pos: Position,
    pub alias: String,
    pub path: Vec<String>,
}
