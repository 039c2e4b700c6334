pub mod ast;
pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod context;
pub mod diagnostics;
pub mod forest;
pub mod lexer;
pub mod parser;
pub mod scope;

pub use ast::{ClassStmt, Expr, File, Position, Stmt, Token, TokenKind};
pub use compiler::{Compilation, CompileOptions, Source, build_js, compile};
pub use context::BuildContext;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use forest::Project;
pub use lexer::{Lexer, tokenize};
pub use parser::{ParseOutput, Parser, parse};
