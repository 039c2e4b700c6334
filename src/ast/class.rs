use crate::ast::{Expr, FunctionDef, Position, Stmt};

/// A parsed source file: its top-level uses, classes and JS blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub pos: Position,
    pub name: String,
    pub statements: Vec<Stmt>,
}

/// A class declaration.
///
/// Several dotted names may share one body, and the same name may be
/// declared again elsewhere to add members.
///
/// # Example
/// ```text
/// Shapes.Circle, Shapes.Disc
///     .radius : 1
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub pos: Position,
    pub names: Vec<Vec<String>>,
    pub body: Vec<ClassStmt>,
}

/// A member name. A leading `.` in the source marks an instance member.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub pos: Position,
    pub name: String,
    pub is_static: bool,
}

/// Statement valid only inside a class body.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassStmt {
    /// One or more members, optionally with values
    ///
    /// # Examples
    /// ```text
    /// .x, .y : 0
    /// count : 0
    /// Point : fn(x, y)
    ///     this.x, this.y : x, y
    /// ```
    PropertySet {
        pos: Position,
        props: Vec<Property>,
        values: Option<Vec<Expr>>,
    },

    /// A property with `get` and/or `set` blocks
    ///
    /// # Example
    /// ```text
    /// .area
    ///     get
    ///         ret this.w * this.h
    /// ```
    Accessors {
        pos: Position,
        prop: Property,
        getter: Option<FunctionDef>,
        setter: Option<FunctionDef>,
    },

    /// Method shorthand: `.name(a, b)` followed by a body
    Method {
        pos: Position,
        prop: Property,
        function: FunctionDef,
    },

    /// Embedded JavaScript emitted at the end of the class
    JsBlock { pos: Position, code: String },

    /// Placeholder left where parsing failed
    Error { pos: Position, message: String },
}

impl ClassStmt {
    pub fn pos(&self) -> &Position {
        match self {
            ClassStmt::PropertySet { pos, .. }
            | ClassStmt::Accessors { pos, .. }
            | ClassStmt::Method { pos, .. }
            | ClassStmt::JsBlock { pos, .. }
            | ClassStmt::Error { pos, .. } => pos,
        }
    }

    pub fn error(pos: Position, message: impl Into<String>) -> Self {
        ClassStmt::Error {
            pos,
            message: message.into(),
        }
    }

    /// Properties declared by this statement, static or not.
    pub fn props(&self) -> Vec<&Property> {
        match self {
            ClassStmt::PropertySet { props, .. } => props.iter().collect(),
            ClassStmt::Accessors { prop, .. } | ClassStmt::Method { prop, .. } => vec![prop],
            ClassStmt::JsBlock { .. } | ClassStmt::Error { .. } => vec![],
        }
    }
}
