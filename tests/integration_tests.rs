// tests/integration_tests.rs

use minet_lang::compiler::{CompileOptions, Source, build_js, compile};
use minet_lang::diagnostics::DiagnosticKind;

fn build_options() -> CompileOptions {
    CompileOptions {
        build: true,
        ..CompileOptions::default()
    }
}

// ============================================================================
// Multi-file builds
// ============================================================================

#[test]
fn test_partial_class_across_files() {
    let sources = [
        Source::new("a.mn", "Shape\n\t.x : 1\n"),
        Source::new("b.mn", "Shape\n\t.y : 2\n\tarea : fn()\n\t\tret 0\n"),
    ];
    let out = build_js(&sources).unwrap();
    assert!(out.contains(" * Input Files: a.mn, b.mn\n"));
    assert!(out.contains("\tfunction Shape() {\n\t\tthis.x = 1;\n\t\tthis.y = 2;\n\t}\n"));
    assert!(out.contains("\tShape.area = function () {\n"));
    assert_eq!(out.matches("var Shape = (function () {").count(), 1);
}

#[test]
fn test_aliases_are_per_file() {
    let sources = [
        Source::new("a.mn", "use Math\nA\n\tf : fn()\n\t\tret Math.PI\n"),
        Source::new("b.mn", "B\n\tg : fn()\n\t\tret Math.PI\n"),
    ];
    let errors = build_js(&sources).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Use of undeclared variable Math");
    assert_eq!(&*errors[0].pos.file, "b.mn");
}

#[test]
fn test_partial_class_members_keep_their_file_aliases() {
    let sources = [
        Source::new("a.mn", "use Math\nTool\n\tpi : fn()\n\t\tret Math.PI\n"),
        Source::new("b.mn", "use M for Math\nTool\n\te : fn()\n\t\tret M.E\n"),
    ];
    let out = build_js(&sources).unwrap();
    assert!(out.contains("return Math.PI;"));
    assert!(out.contains("return Math.E;"));
}

#[test]
fn test_class_in_one_file_used_from_another() {
    let sources = [
        Source::new("model.mn", "Model.User\n\t.name : \"\"\n"),
        Source::new("app.mn", "App\n\tMain : fn()\n\t\tvar u : Model.User{}\n"),
    ];
    let out = build_js(&sources).unwrap();
    assert!(out.contains("\tModel.User = (function () {\n"));
    assert!(out.contains("\t\tvar u = new Model.User();\n"));
    assert!(out.contains("window.onload = function () {\n\tApp.Main();\n};\n"));
}

#[test]
fn test_javascript_blocks_keep_input_order() {
    let sources = [
        Source::new("a.mn", "<js var first; js>\n"),
        Source::new("b.mn", "<js var second; js>\n"),
    ];
    let out = build_js(&sources).unwrap();
    assert!(out.contains("// Javascript Blocks\nvar first;\nvar second;\n\n"));
    assert!(!out.contains("// Classes"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_syntax_errors_in_every_file_are_reported() {
    let sources = [
        Source::new("a.mn", "A\n\t.x : )\n"),
        Source::new("b.mn", "B\n\t.y : ]\n"),
    ];
    let result = compile(&sources, &build_options());
    assert!(!result.is_ok());
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|e| e.kind == DiagnosticKind::Syntactic));
    assert_eq!(&*result.errors[1].pos.file, "b.mn");

    assert!(result.output.starts_with("/* Errors\n"));
    assert!(!result.output.contains("// Classes"));
}

#[test]
fn test_lexical_error_stops_the_build() {
    let sources = [Source::new("a.mn", "A\n\t.x : \"open\n")];
    let result = compile(&sources, &build_options());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, DiagnosticKind::Lexical);
    assert_eq!(result.output, "/* Errors\na.mn:2:7 - Unclosed \"\n*/\n");
}

#[test]
fn test_semantic_errors_are_all_collected() {
    let source = "App\n\tf : fn()\n\t\tret one\n\tg : fn()\n\t\tret two\n";
    let errors = build_js(&[Source::new("a.mn", source)]).unwrap_err();
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Use of undeclared variable one",
            "Use of undeclared variable two"
        ]
    );
    assert!(errors.iter().all(|e| e.kind == DiagnosticKind::Semantic));
}

#[test]
fn test_duplicate_use_alias() {
    let errors = build_js(&[Source::new("a.mn", "use a, a\nA\n\t.x : 1\n")]).unwrap_err();
    assert_eq!(
        errors[0].message,
        "A variable named a has already been declared at this scope."
    );
}

#[test]
fn test_diagnostic_json() {
    let errors = build_js(&[Source::new("a.mn", "A\n\t.x : nope\n")]).unwrap_err();
    let json = errors[0].to_json();
    assert_eq!(json["kind"], "semantic");
    assert_eq!(json["file"], "a.mn");
    assert_eq!(json["line"], 2);
    assert_eq!(json["column"], 7);
    assert_eq!(json["message"], "Use of undeclared variable nope");
}

// ============================================================================
// Dumps and check-only runs
// ============================================================================

#[test]
fn test_check_only_produces_no_code() {
    let sources = [Source::new("a.mn", "A\n\t.x : 1\n")];
    let result = compile(&sources, &CompileOptions::default());
    assert!(result.is_ok());
    assert!(result.output.is_empty());
    assert_eq!(result.files.len(), 1);
}

#[test]
fn test_token_dump() {
    let sources = [Source::new("a.mn", "A\n\t.x : 1\n")];
    let options = CompileOptions {
        print_tokens: true,
        ..CompileOptions::default()
    };
    let result = compile(&sources, &options);
    assert!(result.output.starts_with("/* Tokens a.mn\n1:1 Literal : 'A'\n"));
    assert!(result.output.contains("2:7 Number : '1'\n"));
    assert!(result.output.ends_with("Eof\n*/\n"));
}

#[test]
fn test_ast_dump_before_code() {
    let sources = [Source::new("a.mn", "A\n\t.x : 1\n")];
    let options = CompileOptions {
        build: true,
        print_ast: true,
        ..CompileOptions::default()
    };
    let result = compile(&sources, &options);
    let ast = result.output.find("/* AST\n").unwrap();
    let code = result.output.find("/* Built with").unwrap();
    assert!(ast < code);
    assert!(result.output.contains("class A\n"));
}

#[test]
fn test_ast_dump_skipped_for_broken_file() {
    let sources = [Source::new("a.mn", "A\n\t.x : )\n")];
    let options = CompileOptions {
        print_ast: true,
        ..CompileOptions::default()
    };
    let result = compile(&sources, &options);
    assert!(!result.output.contains("/* AST"));
    assert!(result.output.contains("/* Errors\n"));
}
