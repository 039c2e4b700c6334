// tests/codegen_tests.rs

use minet_lang::compiler::{Source, build_js};
use minet_lang::diagnostics::Diagnostic;

fn js(source: &str) -> String {
    match build_js(&[Source::new("test.mn", source)]) {
        Ok(output) => output,
        Err(errors) => panic!("unexpected errors: {:#?}", errors),
    }
}

fn errors(source: &str) -> Vec<Diagnostic> {
    match build_js(&[Source::new("test.mn", source)]) {
        Ok(output) => panic!("expected errors, got:\n{}", output),
        Err(errors) => errors,
    }
}

fn messages(source: &str) -> Vec<String> {
    errors(source).into_iter().map(|e| e.message).collect()
}

/// Wraps `body` in `App.run : fn()`.
fn in_method(body: &str) -> String {
    let indented: String = body.lines().map(|l| format!("\t\t{}\n", l)).collect();
    format!("use console\nApp\n\trun : fn()\n{}", indented)
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_header_and_class_shape() {
    let out = js("Point\n\t.x, .y : 0\n");
    assert!(out.starts_with("/* Built with Minet Compiler "));
    assert!(out.contains(" * Input Files: test.mn\n */\n\n// Classes\n"));
    assert!(out.contains(
        "var Point = (function () {\n\
         \tfunction Point() {\n\
         \t\tthis.x = 0;\n\
         \t\tthis.y = 0;\n\
         \t}\n\
         \treturn Point;\n\
         })();\n"
    ));
    assert!(!out.contains("window.onload"));
}

#[test]
fn test_constructor_members_and_nesting() {
    let source = "\
use Math

Shapes.Circle
\t.radius : 1

\tCircle : fn(r)
\t\tradius : r

\t.area()
\t\tret Math.PI * radius * radius

\tcount : 0
";
    let out = js(source);
    let expected = "\
var Shapes = (function () {
\tfunction Shapes() {
\t}
\tShapes.Circle = (function () {
\t\tfunction Circle(r) {
\t\t\tthis.radius = 1;
\t\t\tthis.radius = r;
\t\t}
\t\tCircle.prototype.area = function () {
\t\t\treturn (Math.PI * this.radius) * this.radius;
\t\t};
\t\tCircle.count = 0;
\t\treturn Circle;
\t})();
\treturn Shapes;
})();
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_main_entry_point() {
    let out = js("App\n\tMain : fn()\n\t\tret\n");
    assert!(out.contains("\tApp.Main = function () {\n\t\treturn;\n\t};\n"));
    assert!(out.ends_with("window.onload = function () {\n\tApp.Main();\n};\n"));
}

#[test]
fn test_second_main_is_an_error() {
    let source = "A\n\tMain : fn()\n\t\tret\nB\n\tMain : fn()\n\t\tret\n";
    assert_eq!(messages(source), vec!["Main is already defined as A.Main"]);
}

#[test]
fn test_javascript_blocks() {
    let out = js("<js var raw = 1; js>\nApp\n\t<js App.extra = 2; js>\n");
    assert!(out.contains("// Javascript Blocks\nvar raw = 1;\n\n// Classes\n"));
    assert!(out.contains("\tApp.extra = 2;\n\treturn App;\n"));
}

#[test]
fn test_accessors() {
    let source = "Rect\n\t.w, .h : 0\n\t.area\n\t\tget\n\t\t\tret w * h\n";
    let out = js(source);
    let expected = "\
\tObject.defineProperty(Rect.prototype, \"area\", {
\t\tget: function () {
\t\t\treturn this.w * this.h;
\t\t}
\t});
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_static_accessor_has_getter_and_setter() {
    let source = "Conf\n\tlevel : 1\n\tmode\n\t\tget\n\t\t\tret level\n\t\tset v\n\t\t\tlevel : v\n";
    let out = js(source);
    assert!(out.contains("\tObject.defineProperty(Conf, \"mode\", {\n"));
    assert!(out.contains("\t\t\treturn Conf.level;\n\t\t},\n\t\tset: function (v) {\n"));
    assert!(out.contains("\t\t\tConf.level = v;\n"));
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_undeclared_variable() {
    let errors = errors(&in_method("console.log(missing)"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Use of undeclared variable missing");
    assert_eq!(errors[0].pos.line, 4);
}

#[test]
fn test_use_alias_expands_to_full_path() {
    let source = "use Vec for Geometry.Vector\nGeometry.Vector\n\t.x : 0\nApp\n\tmake : fn()\n\t\tret Vec{1, 2}\n";
    let out = js(source);
    assert!(out.contains("\t\treturn new Geometry.Vector(1, 2);\n"));
}

#[test]
fn test_alias_cycle_terminates() {
    let out = js("use A for A.B\nApp\n\tf : fn()\n\t\tret A\n");
    assert!(out.contains("return A.B;"));
}

#[test]
fn test_nested_class_reachable_from_other_class() {
    let source = "Outer.Inner\n\tmake : fn()\n\t\tret 1\nOther\n\tgo : fn()\n\t\tret Outer.Inner.make()\n";
    let out = js(source);
    assert!(out.contains("\tOther.go = function () {\n\t\treturn Outer.Inner.make();\n\t};\n"));
}

#[test]
fn test_members_after_dot_are_verbatim() {
    let out = js(&in_method("var items : []\nconsole.log(items.pop().length)"));
    assert!(out.contains("console.log(items.pop().length);"));
}

#[test]
fn test_static_members_resolve_to_class() {
    let out = js("Counter\n\ttotal : 0\n\tbump : fn()\n\t\ttotal +: 1\n");
    assert!(out.contains("\t\tCounter.total += 1;\n"));
}

#[test]
fn test_this_hoisted_into_outermost_function() {
    let source = "\
use setTimeout
Counter
\t.count : 0
\t.start()
\t\tsetTimeout(fn()
\t\t\tcount++
\t\t, 10)
";
    let out = js(source);
    let expected = "\
\tCounter.prototype.start = function () {
\t\tvar _this = this;
\t\tsetTimeout(function () {
\t\t\t_this.count++;
\t\t}, 10);
\t};
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_no_this_alias_when_unused() {
    let out = js("Counter\n\t.count : 0\n\t.inc()\n\t\tcount++\n");
    assert!(!out.contains("_this"));
    assert!(out.contains("\t\tthis.count++;\n"));
}

#[test]
fn test_duplicate_var_reported_once() {
    let errors = messages(&in_method("var x : 1\nvar x : 2\nconsole.log(x)"));
    assert_eq!(
        errors,
        vec!["A variable named x has already been declared at this scope."]
    );
}

#[test]
fn test_block_exit_allows_redeclaration() {
    let out = js(&in_method("if true\n\tvar x : 1\nelse\n\tvar x : 2"));
    assert!(out.contains("var x = 1;"));
    assert!(out.contains("var x = 2;"));
}

// ============================================================================
// Desugaring
// ============================================================================

#[test]
fn test_swap_uses_two_temporaries() {
    let out = js(&in_method("var a, b : 1, 2\na, b : b, a"));
    let expected = "\
\t\tvar a = 1, b = 2;
\t\tvar _t0 = b;
\t\tvar _t1 = a;
\t\ta = _t0;
\t\tb = _t1;
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_many_targets_one_value() {
    let out = js(&in_method("var a, b : 0\na, b +: 5"));
    assert!(out.contains("\t\tvar _t0 = 0;\n\t\tvar a = _t0, b = _t0;\n"));
    assert!(out.contains("\t\tvar _t0 = 5;\n\t\ta += _t0;\n\t\tb += _t0;\n"));
}

#[test]
fn test_compound_pairs_read_before_write() {
    let out = js(&in_method("var a, b : 1, 2\na, b +: b, a + 1"));
    assert!(out.contains("\t\tvar _t0 = a + b;\n\t\tvar _t1 = b + (a + 1);\n\t\ta = _t0;\n\t\tb = _t1;\n"));
}

#[test]
fn test_unpack() {
    let out = js(&in_method("var x, y : 0\nx, y :: [1, 2]"));
    assert!(out.contains("\t\tvar _t0 = [1, 2];\n\t\tx = _t0[0];\n\t\ty = _t0[1];\n"));
}

#[test]
fn test_mismatched_counts() {
    let errors = messages(&in_method("var a, b, c : 1, 2\n"));
    assert_eq!(
        errors,
        vec!["Mismatched vars and values in var statement, 3 != 2"]
    );

    let errors = messages(&in_method("var a, b : 0\na, b : 1, 2, 3"));
    assert_eq!(errors, vec!["Mismatched expression count, 2 != 3"]);
}

#[test]
fn test_for_descending_range() {
    let out = js(&in_method("for i in 10 to 0\n\tconsole.log(i)"));
    assert!(out.contains("\t\tfor (var i = (10) - 1; i >= 0; i--) {\n\t\t\tconsole.log(i);\n\t\t}\n"));
}

#[test]
fn test_for_ascending_range_with_step() {
    let out = js(&in_method("for i in 0 to 10 by 2\n\tconsole.log(i)"));
    assert!(out.contains("\t\tfor (var i = 0; i < 10; i += 2) {\n"));
}

#[test]
fn test_for_over_array() {
    let out = js(&in_method("var list : [1, 2]\nfor item in list\n\tconsole.log(item)"));
    let expected = "\
\t\tfor (var _i0 = 0, _l0 = list.length; _i0 < _l0; _i0++) {
\t\t\tvar item = list[_i0];
\t\t\tconsole.log(item);
\t\t}
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_nested_array_loops_use_distinct_counters() {
    let out = js(&in_method("var rows : []\nfor row in rows\n\tfor cell in row\n\t\tconsole.log(cell)"));
    assert!(out.contains("var row = rows[_i0];"));
    assert!(out.contains("var cell = row[_i1];"));
}

#[test]
fn test_labelled_loops_and_jumps() {
    let out = js(&in_method("outer loop\n\twhile true\n\t\tbreak outer\n\tcontinue"));
    let expected = "\
\t\touter: while (true) {
\t\t\twhile (true) {
\t\t\t\tbreak outer;
\t\t\t}
\t\t\tcontinue;
\t\t}
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_if_sugar() {
    let body = "var x : 3\nif x\n\t= 1, 2\n\t\tconsole.log(1)\n\t> 5\n\t\tconsole.log(2)\n\telse\n\t\tconsole.log(3)";
    let out = js(&in_method(body));
    let expected = "\
\t\tvar _c0 = x;
\t\tif (_c0 === 1 || _c0 === 2) {
\t\t\tconsole.log(1);
\t\t} else if (_c0 > 5) {
\t\t\tconsole.log(2);
\t\t} else {
\t\t\tconsole.log(3);
\t\t}
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_plain_if_chain() {
    let body = "var a : 1\nif a != 1 and a < 5\n\tconsole.log(1)\nelse if not_a\n\tconsole.log(2)";
    let errors = messages(&in_method(body));
    assert_eq!(errors, vec!["Use of undeclared variable not_a"]);

    let out = js(&in_method("var a : 1\nif a != 1 and a < 5\n\tconsole.log(1)"));
    assert!(out.contains("\t\tif ((a !== 1) && (a < 5)) {\n"));
}

#[test]
fn test_chain_block() {
    let source = "use document\nApp\n\tpaint : fn()\n\t\tdocument.body.style\n\t\t\tcolor : \"red\"\n\t\t\tmargin, padding : 0\n";
    let out = js(source);
    let expected = "\
\t\tdocument.body.style.color = \"red\";
\t\tvar _t0 = 0;
\t\tdocument.body.style.margin = _t0;
\t\tdocument.body.style.padding = _t0;
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_chain_block_calls() {
    let source = "use list\nApp\n\tfill : fn(x)\n\t\tlist\n\t\t\tpush(x)\n\t\t\tsort()\n";
    let out = js(source);
    assert!(out.contains("\t\tlist.push(x);\n\t\tlist.sort();\n"));
}

#[test]
fn test_try_catch_finally() {
    let out = js(&in_method("try\n\tconsole.log(1)\ncatch err\n\tconsole.log(err)\nfinally\n\tconsole.log(2)"));
    let expected = "\
\t\ttry {
\t\t\tconsole.log(1);
\t\t} catch (err) {
\t\t\tconsole.log(err);
\t\t} finally {
\t\t\tconsole.log(2);
\t\t}
";
    assert!(out.contains(expected), "got:\n{}", out);
}

#[test]
fn test_expression_values() {
    let out = js(&in_method(
        "var o : {x: 1, y: \"a\"}\nvar n : -(1 + 2)\nvar c : 1 if o else 2\nvar r : /ab+/g\nvar t : typeof o",
    ));
    assert!(out.contains("var o = {x: 1, y: \"a\"};"));
    assert!(out.contains("var n = -(1 + 2);"));
    assert!(out.contains("var c = (o ? 1 : 2);"));
    assert!(out.contains("var r = /ab+/g;"));
    assert!(out.contains("var t = typeof o;"));
}

#[test]
fn test_invalid_statement() {
    let errors = messages(&in_method("var a : 1\na + 1"));
    assert_eq!(errors, vec!["Expression is not a valid statement"]);
}

#[test]
fn test_constructor_must_be_function() {
    let errors = messages("Thing\n\tThing : 5\n");
    assert_eq!(
        errors,
        vec!["Property Thing matches the class name, so it must be a function."]
    );
}

#[test]
fn test_property_count_mismatch() {
    let errors = messages("Thing\n\t.a, .b, .c : 1, 2\n");
    assert_eq!(errors, vec!["Mismatched property / value counts, 3 != 2"]);
}

// ============================================================================
// Scopes and temporaries
// ============================================================================

#[test]
fn test_for_ascending_range_by_default() {
    let out = js(&in_method("for i in 0 to 10\n\tconsole.log(i)"));
    assert!(out.contains("\t\tfor (var i = 0; i < 10; i++) {\n\t\t\tconsole.log(i);\n\t\t}\n"));
}

#[test]
fn test_for_body_shares_loop_variable_scope() {
    let errors = messages(&in_method("for i in 0 to 3\n\tvar i : 2"));
    assert_eq!(
        errors,
        vec!["A variable named i has already been declared at this scope."]
    );

    let errors = messages(&in_method("var list : []\nfor item in list\n\tvar item : 1"));
    assert_eq!(
        errors,
        vec!["A variable named item has already been declared at this scope."]
    );
}

#[test]
fn test_for_variable_is_gone_after_loop() {
    let out = js(&in_method("for i in 0 to 3\n\tconsole.log(i)\nvar i : 5"));
    assert!(out.contains("\t\tvar i = 5;\n"));
}

#[test]
fn test_temporaries_restart_in_each_function() {
    let source = "\
App
\tf : fn()
\t\tvar a, b : 1, 2
\t\ta, b : b, a
\tg : fn()
\t\tvar c, d : 1, 2
\t\tc, d : d, c
";
    let out = js(source);
    assert!(out.contains("\t\tvar _t0 = b;\n\t\tvar _t1 = a;\n"));
    assert!(out.contains("\t\tvar _t0 = d;\n\t\tvar _t1 = c;\n"));
    assert!(!out.contains("_t2"));
}

#[test]
fn test_chain_block_on_call_receiver() {
    let source = "use get\nApp\n\tf : fn()\n\t\tget()\n\t\t\tcolor : 1\n\t\t\tshow()\n";
    let out = js(source);
    assert!(out.contains("\t\tget().color = 1;\n\t\tget().show();\n"));
}

#[test]
fn test_nested_class_uses_outer_static_member() {
    let source = "\
Outer
\tcount : 0
\tmake : fn()
\t\tret Inner{}
Outer.Inner
\tbump : fn()
\t\tcount +: 1
";
    let out = js(source);
    assert!(out.contains("\tOuter.make = function () {\n\t\treturn new Outer.Inner();\n\t};\n"));
    assert!(out.contains("\t\tInner.bump = function () {\n\t\t\tOuter.count += 1;\n\t\t};\n"));
}

#[test]
fn test_nested_class_sees_outer_instance_scope() {
    // Nested classes are built inside the outer instance scope
    let source = "Outer\n\t.x : 1\nOuter.Inner\n\tf : fn()\n\t\tret x\n";
    let out = js(source);
    assert!(out.contains("\t\tInner.f = function () {\n\t\t\treturn this.x;\n\t\t};\n"));
}

#[test]
fn test_this_in_static_member_is_undeclared() {
    let source = "use setTimeout\nApp\n\tstart : fn()\n\t\tsetTimeout(fn()\n\t\t\tthis.go()\n\t\t, 10)\n";
    assert_eq!(messages(source), vec!["Use of undeclared variable this"]);
}
