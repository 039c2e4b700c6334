//! # Minet - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) of the
//! Minet language, an indentation-sensitive, class-oriented language that
//! compiles to JavaScript.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Token kinds and source positions shared by lexer and parser
//! - **[operators]** - Binary, unary, postfix and assignment operators
//! - **[expressions]** - Expression nodes (values, calls, literals, functions)
//! - **[statements]** - Statement nodes (assignment, control flow, imports)
//! - **[class]** - Files, class declarations and class-body statements
//! - **[printer]** - Debug dump of a tree
//!
//! Every node owns its [`Position`] and its children; nothing is shared, so
//! cloning a subtree always yields an independent copy.
//!
//! ## Quick Start
//!
//! ```text
//! use Math
//!
//! Shapes.Circle
//!     .radius : 1
//!
//!     Circle : fn(r)
//!         radius : r
//!
//!     .area()
//!         ret Math.PI * radius * radius
//! ```
//!
//! ## Core Concepts
//!
//! ### Blocks
//!
//! Indentation opens and closes blocks. The lexer turns changes of
//! indentation into `Indent`/`Dedent` tokens, and the parser reads every
//! compound construct as `EOL INDENT ... DEDENT EOL`.
//!
//! ### Members
//!
//! Inside a class body a leading `.` marks an instance member; names
//! without it are static. A static function named after the class is its
//! constructor.
//!
//! ### Assignment
//!
//! `:` assigns, `+:`, `-:` and friends assign in place, `::` unpacks an
//! array into several targets:
//!
//! ```text
//! a, b : b, a
//! x, y :: point
//! ```
pub mod class;
pub mod expressions;
pub mod operators;
pub mod printer;
pub mod statements;
pub mod tokens;

pub use class::{ClassDecl, ClassStmt, File, Property};
pub use expressions::{Expr, FunctionDef, SetLine};
pub use operators::{AssignOp, BinOp, PostOp, UnaryOp};
pub use printer::print_file;
pub use statements::{Catch, Condition, For, If, IfSection, Stmt, Use, UseItem, VarLine};
pub use tokens::{Position, Token, TokenKind};
