//! Project-wide class forest.
//!
//! Every class declaration of every file is merged into one tree keyed by
//! dotted name. Declaring the same path twice appends to the same node, so
//! a class can be spread over several files.

use log::{debug, info};

use crate::ast::{ClassStmt, File, Stmt};
use crate::context::{AliasMap, BuildContext};

/// A value tagged with the index of the input file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub file: usize,
    pub item: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub name: String,
    pub statements: Vec<Sourced<ClassStmt>>,
    pub children: Vec<ClassNode>,
}

impl ClassNode {
    pub fn new(name: impl Into<String>) -> Self {
        ClassNode {
            name: name.into(),
            statements: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Number of classes in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ClassNode::count).sum::<usize>()
    }
}

/// Finds the node at `path` under `nodes`, creating missing levels.
fn get_or_insert<'a>(nodes: &'a mut Vec<ClassNode>, path: &[String]) -> Option<&'a mut ClassNode> {
    let (head, rest) = path.split_first()?;
    let index = match nodes.iter().position(|n| &n.name == head) {
        Some(index) => index,
        None => {
            nodes.push(ClassNode::new(head.clone()));
            nodes.len() - 1
        }
    };
    let node = &mut nodes[index];
    if rest.is_empty() {
        Some(node)
    } else {
        get_or_insert(&mut node.children, rest)
    }
}

/// Everything code generation needs from the parsed files.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub file_names: Vec<String>,
    pub classes: Vec<ClassNode>,
    /// Top-level JS blocks, in input order
    pub js_blocks: Vec<String>,
}

impl Project {
    /// Merges the files into one forest. `use` statements fill the per-file
    /// alias tables of `ctx`.
    pub fn assemble(files: &[File], ctx: &mut BuildContext) -> Project {
        let mut project = Project {
            file_names: files.iter().map(|f| f.name.clone()).collect(),
            ..Project::default()
        };
        ctx.aliases = vec![AliasMap::new(); files.len()];

        for (index, file) in files.iter().enumerate() {
            for stmt in &file.statements {
                match stmt {
                    Stmt::Class(decl) => {
                        for name in &decl.names {
                            let Some(node) = get_or_insert(&mut project.classes, name) else {
                                continue;
                            };
                            node.statements.extend(decl.body.iter().cloned().map(|item| Sourced {
                                file: index,
                                item,
                            }));
                        }
                    }
                    Stmt::Use(stmt) => {
                        for item in &stmt.items {
                            let aliases = &mut ctx.aliases[index];
                            if aliases.contains_key(&item.alias) {
                                let message = format!(
                                    "A variable named {} has already been declared at this scope.",
                                    item.alias
                                );
                                ctx.error(&item.pos, message);
                                continue;
                            }
                            debug!("{}: {} -> {}", file.name, item.alias, item.path.join("."));
                            aliases.insert(item.alias.clone(), item.path.clone());
                        }
                    }
                    Stmt::JsBlock { code, .. } => project.js_blocks.push(code.clone()),
                    Stmt::Error { .. } => {}
                    other => ctx.error(other.pos(), "Invalid top-level statement."),
                }
            }
        }

        info!(
            "Assembled {} classes from {} files",
            project.class_count(),
            files.len()
        );
        project
    }

    pub fn class_count(&self) -> usize {
        self.classes.iter().map(ClassNode::count).sum()
    }
}
