// tests/parser_tests.rs

use minet_lang::ast::{
    AssignOp, BinOp, ClassStmt, Condition, Expr, File, Stmt, UnaryOp, print_file,
};
use minet_lang::lexer::tokenize;
use minet_lang::parser::{ParseOutput, Parser, parse};

fn parse_source(source: &str) -> ParseOutput {
    parse(tokenize(source, "test.mn"), "test.mn")
}

fn parse_ok(source: &str) -> File {
    let output = parse_source(source);
    assert!(output.ok, "unexpected errors: {:?}", output.errors);
    output.file
}

fn expr(source: &str) -> Expr {
    let mut parser = Parser::new(tokenize(source, "test.mn"), "test.mn");
    let expr = parser.parse_standalone_expr();
    assert!(parser.errors().is_empty(), "unexpected errors: {:?}", parser.errors());
    expr
}

/// Statements of the body of `name : fn()` in a class `C`.
fn method_body(body: &str) -> Vec<Stmt> {
    let indented: String = body.lines().map(|l| format!("\t\t{}\n", l)).collect();
    let file = parse_ok(&format!("C\n\tm : fn()\n{}", indented));
    let Stmt::Class(class) = &file.statements[0] else {
        panic!("expected a class");
    };
    let ClassStmt::PropertySet {
        values: Some(values),
        ..
    } = &class.body[0]
    else {
        panic!("expected a property set");
    };
    let Expr::Function(def) = &values[0] else {
        panic!("expected a function");
    };
    def.body.clone()
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_negative_number() {
    let e = expr("-3.14");
    assert!(matches!(
        &e,
        Expr::Unary { op: UnaryOp::Negate, expr, .. }
            if matches!(&**expr, Expr::Number { value, .. } if value == "3.14")
    ));
    assert!((e.num_val().unwrap() + 3.14).abs() < 1e-12);
}

#[test]
fn test_precedence() {
    let e = expr("a + b * c");
    let Expr::Binary { op, right, .. } = &e else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, BinOp::Add);
    assert!(matches!(**right, Expr::Binary { op: BinOp::Multiply, .. }));
}

#[test]
fn test_left_associativity() {
    let e = expr("a - b - c");
    let Expr::Binary { left, op, .. } = &e else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, BinOp::Subtract);
    assert!(matches!(**left, Expr::Binary { op: BinOp::Subtract, .. }));
}

#[test]
fn test_logical_words() {
    let e = expr("a = 1 or b and c");
    assert!(matches!(e, Expr::Binary { op: BinOp::Or, .. }));
}

#[test]
fn test_dotted_identifier_is_one_path() {
    let e = expr("this.items.length");
    assert!(matches!(&e, Expr::Identifier { path, .. } if path == &["this", "items", "length"]));
}

#[test]
fn test_postfix_chain() {
    let e = expr("rows[i](x){}");
    let Expr::Constructor { ty, .. } = &e else {
        panic!("expected a constructor");
    };
    let Expr::Call { function, args, .. } = &**ty else {
        panic!("expected a call");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(**function, Expr::Accessor { .. }));
}

#[test]
fn test_member_after_call() {
    let e = expr("items.pop().name");
    assert!(matches!(
        &e,
        Expr::Binary { op: BinOp::Member, left, right, .. }
            if matches!(**left, Expr::Call { .. }) && matches!(**right, Expr::Identifier { .. })
    ));
}

#[test]
fn test_conditional_expression() {
    let e = expr("1 if ready else 2");
    assert!(matches!(e, Expr::Conditional { .. }));
}

#[test]
fn test_object_literal_single_line() {
    let e = expr("{x: 1, \"y\": 2}");
    let Expr::Object { lines, .. } = &e else {
        panic!("expected an object");
    };
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].names, vec!["x"]);
    assert_eq!(lines[1].names, vec!["\"y\""]);
}

#[test]
fn test_not_an_expression() {
    let mut parser = Parser::new(tokenize(")", "test.mn"), "test.mn");
    let e = parser.parse_standalone_expr();
    assert!(e.is_error());
    assert_eq!(parser.errors()[0].message, "Token is not an expression: RightParen ')'");
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_assignment_forms() {
    let body = method_body("a, b : b, a\nx +: 1\np, q :: pair");
    assert!(matches!(&body[0], Stmt::Assign { op: AssignOp::Assign, left, right, .. }
        if left.len() == 2 && right.len() == 2));
    assert!(matches!(
        &body[1],
        Stmt::Assign {
            op: AssignOp::Compound(BinOp::Add),
            ..
        }
    ));
    assert!(matches!(&body[2], Stmt::Assign { op: AssignOp::Unpack, .. }));
}

#[test]
fn test_var_group() {
    let body = method_body("var a : 1\n\tb, c : 2, 3");
    let Stmt::Var { lines, .. } = &body[0] else {
        panic!("expected var");
    };
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].names, vec!["b", "c"]);
}

#[test]
fn test_var_without_value() {
    let output = parse_source("C\n\tm : fn()\n\t\tvar a\n");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].message, "Var statement must be an assignment.");
}

#[test]
fn test_for_forms() {
    let body = method_body("for i in 0 to 10 by 2\n\tx : i\nfor item in list\n\tx : item");
    let Stmt::For(range) = &body[0] else {
        panic!("expected for");
    };
    assert!(range.to.is_some());
    assert_eq!(range.by.as_ref().and_then(Expr::num_val), Some(2.0));

    let Stmt::For(iter) = &body[1] else {
        panic!("expected for");
    };
    assert!(iter.to.is_none());
    assert_eq!(iter.var, "item");
}

#[test]
fn test_labelled_loop() {
    let body = method_body("outer loop\n\tbreak outer");
    let Stmt::Loop { label, body, .. } = &body[0] else {
        panic!("expected loop");
    };
    assert_eq!(label.as_deref(), Some("outer"));
    assert!(matches!(&body[0], Stmt::Break { label: Some(l), .. } if l == "outer"));
}

#[test]
fn test_if_else_chain() {
    let body = method_body("if a\n\tx : 1\nelse if b\n\tx : 2\nelse\n\tx : 3");
    let Stmt::If(stmt) = &body[0] else {
        panic!("expected if");
    };
    assert!(stmt.subject.is_none());
    assert_eq!(stmt.sections.len(), 3);
    assert!(matches!(stmt.sections[2].condition, Condition::Else));
}

#[test]
fn test_if_sugar() {
    let body = method_body("if x\n\t= 1, 2\n\t\ty : 1\n\t> 5\n\t\ty : 2\n\telse\n\t\ty : 3");
    let Stmt::If(stmt) = &body[0] else {
        panic!("expected if");
    };
    assert!(stmt.subject.is_some());
    assert_eq!(stmt.sections.len(), 3);
    assert!(matches!(
        &stmt.sections[0].condition,
        Condition::Compare { op: BinOp::Equal, values } if values.len() == 2
    ));
    assert!(matches!(
        &stmt.sections[1].condition,
        Condition::Compare {
            op: BinOp::GreaterThan,
            ..
        }
    ));
}

#[test]
fn test_bare_if_with_is_sections() {
    let body = method_body("if\n\tis a > 1\n\t\tx : 1\n\tis b\n\t\tx : 2");
    let Stmt::If(stmt) = &body[0] else {
        panic!("expected if");
    };
    assert_eq!(stmt.sections.len(), 2);
    assert!(matches!(stmt.sections[1].condition, Condition::Expr(_)));
}

#[test]
fn test_try_needs_handler() {
    let output = parse_source("C\n\tm : fn()\n\t\ttry\n\t\t\tx()\n");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].message, "A try block needs a catch or finally block.");
}

#[test]
fn test_chain_block() {
    let body = method_body("style\n\tcolor : \"red\"\n\twidth : 10");
    let Stmt::Expr { exprs, chain, .. } = &body[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(exprs.len(), 1);
    assert_eq!(chain.len(), 2);
}

#[test]
fn test_function_argument_spanning_lines() {
    let body = method_body("later(fn()\n\tx : 1\n, 10)");
    let Stmt::Expr { exprs, .. } = &body[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Call { args, .. } = &exprs[0] else {
        panic!("expected a call");
    };
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[0], Expr::Function(def) if def.body.len() == 1));
}

// ============================================================================
// Files and classes
// ============================================================================

#[test]
fn test_use_forms() {
    let file = parse_ok("use Vec for geometry.Vector\nuse a.B, C\n");
    let Stmt::Use(first) = &file.statements[0] else {
        panic!("expected use");
    };
    assert_eq!(first.items[0].alias, "Vec");
    assert_eq!(first.items[0].path, vec!["geometry", "Vector"]);

    let Stmt::Use(second) = &file.statements[1] else {
        panic!("expected use");
    };
    let aliases: Vec<&str> = second.items.iter().map(|i| i.alias.as_str()).collect();
    assert_eq!(aliases, vec!["B", "C"]);
}

#[test]
fn test_class_members() {
    let source = "\
Shapes.Circle, Shapes.Disc
\t.radius, count : 1, 0
\t.area()
\t\tret radius
\t.size
\t\tget
\t\t\tret 1
\t\tset v
\t\t\tx : v
\t<js var raw = 1; js>
";
    let file = parse_ok(source);
    let Stmt::Class(class) = &file.statements[0] else {
        panic!("expected a class");
    };
    assert_eq!(class.names.len(), 2);
    assert_eq!(class.names[1], vec!["Shapes", "Disc"]);
    assert_eq!(class.body.len(), 4);

    let ClassStmt::PropertySet { props, .. } = &class.body[0] else {
        panic!("expected a property set");
    };
    assert!(!props[0].is_static);
    assert!(props[1].is_static);

    assert!(matches!(&class.body[1], ClassStmt::Method { prop, .. } if prop.name == "area"));
    assert!(matches!(
        &class.body[2],
        ClassStmt::Accessors {
            getter: Some(_),
            setter: Some(_),
            ..
        }
    ));
    assert!(matches!(&class.body[3], ClassStmt::JsBlock { code, .. } if code == "var raw = 1;"));
}

#[test]
fn test_duplicate_getter() {
    let output = parse_source("C\n\t.p\n\t\tget\n\t\t\tret 1\n\t\tget\n\t\t\tret 2\n");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].message, "Property p has more than one get block.");
}

#[test]
fn test_two_syntax_errors_are_both_reported() {
    let source = "C\n\t.a : )\n\t.b : 1\n\t.c : ]\n";
    let output = parse_source(source);
    assert!(!output.ok);
    assert_eq!(output.errors.len(), 2);
    assert_eq!(output.errors[0].pos.line, 2);
    assert_eq!(output.errors[1].pos.line, 4);
}

#[test]
fn test_invalid_top_level_token() {
    let output = parse_source("42\nC\n\t.a : 1\n");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].message, "Invalid token Number '42'");
    assert!(matches!(output.file.statements.last(), Some(Stmt::Class(_))));
}

#[test]
fn test_ast_dump() {
    let file = parse_ok("C\n\t.x : 1\n");
    let dump = print_file(&file, 0);
    assert!(dump.starts_with("test.mn\n"));
    assert!(dump.contains("|   class C\n"));
    assert!(dump.contains("num 1"));
}
