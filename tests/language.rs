use stencil::{RenderOptions, render_source};

fn render(src: &str) -> Result<String, stencil::error::Error> {
    render_source(src, &RenderOptions::default()).map(|rendered| rendered.output)
}

fn assert_success(src: &str) {
    let script = format!("{src}\nfn render() {{ return \"\" }}");
    if let Err(e) = render(&script) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    let script = format!("{src}\nfn render() {{ return \"\" }}");
    if render(&script).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_renders(src: &str, expected: &str) {
    match render(src) {
        Ok(output) => assert_eq!(output, expected, "unexpected output for:\n{src}"),
        Err(e) => panic!("Template failed: {e}"),
    }
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_success("x = 1 + 2\nassert(x == 3)");
    assert_success("x = 7 * 9\nassert(x == 63)");
    assert_success("x = 8 - 5\nassert(x == 3)");
    assert_success("x = 10 / 4\nassert(x == 2.5)");
    assert_success("x = 10 / 2\nassert(x == 5)");
    assert_success("assert(-7 % 3 == 2)");
    assert_success("assert(7 % -3 == -2)");
    assert_success("assert(2 + 3 * 4 == 14)");
    assert_success("assert((2 + 3) * 4 == 20)");
}

#[test]
fn compound_assignment() {
    assert_success("x = 1\nx += 2\nx *= 3\nx -= 1\nassert(x == 8)");
    assert_success("s = \"a\"\ns += \"b\"\nassert(s == \"ab\")");
    assert_success("x = 9\nx /= 2\nassert(x == 4.5)");
}

#[test]
fn arithmetic_errors() {
    assert_failure("x = 1 / 0");
    assert_failure("x = 1 % 0");
    assert_failure("x = 9223372036854775807 + 1");
    assert_failure("x = \"a\" - 1");
    assert_failure("x = none + 1");
}

#[test]
fn strings_and_lists() {
    assert_success("assert(\"ab\" * 3 == \"ababab\")");
    assert_success("assert([1, 2] + [3] == [1, 2, 3])");
    assert_success("assert(len(\"héllo\") == 5)");
    assert_success("assert(\"ell\" in \"hello\")");
    assert_success("assert(2 in [1, 2, 3])");
    assert_success("assert(!(4 in [1, 2, 3]))");
    assert_success("xs = [1, 2, 3]\nassert(xs[-1] == 3)\nassert(\"abc\"[1] == \"b\")");
    assert_success("assert(join(\"-\", [\"a\", 1, none]) == \"a-1-none\")");
    assert_success("assert(upper(\"ab\") == \"AB\")\nassert(strip(\"  x \") == \"x\")");
    assert_failure("xs = [1]\ny = xs[1]");
}

#[test]
fn repetition() {
    assert_success("assert([1, 2] * 2 == [1, 2, 1, 2])");
    assert_success("assert(3 * [\"a\"] == [\"a\", \"a\", \"a\"])");
    assert_success("assert([1] * -2 == [])\nassert(\"ab\" * 0 == \"\")");
    assert_success("assert(len([] * 9223372036854775807) == 0)");
}

#[test]
fn oversized_sequences_fail() {
    assert_failure("x = \"ab\" * 9223372036854775807");
    assert_failure("x = [1] * 9223372036854775807");
    assert_failure("x = range(9223372036854775807)");
    assert_failure("x = range(-9223372036854775807, 9223372036854775807)");
}

#[test]
fn lists_have_value_semantics() {
    assert_success("a = [1, 2]\nb = a\nb[0] = 9\nassert(a[0] == 1)\nassert(b == [9, 2])");
}

#[test]
fn string_escapes_and_triple_quotes() {
    assert_success("assert(len(\"a\\nb\") == 3)");
    assert_success("assert(\"it's\" == 'it\\'s')");
    assert_success("s = \"\"\"one\ntwo\"\"\"\nassert(len(s) == 7)");
}

#[test]
fn conditionals_and_logic() {
    assert_success("x = 3\nif x > 2 { y = 1 } else { y = 2 }\nassert(y == 1)");
    assert_success("x = 0\nif x > 2 { y = 1 } else if x == 0 { y = 3 } else { y = 2 }\nassert(y == 3)");
    assert_success("assert((true ? 1 : 2) == 1)");
    assert_success("assert((none or \"d\") == \"d\")");
    assert_success("assert((0 and boom) == 0)");
    assert_success("assert(!\"\")\nassert(![])\nassert([0])");
}

#[test]
fn loops() {
    assert_success("total = 0\nfor i in range(5) { total += i }\nassert(total == 10)");
    assert_success("out = \"\"\nfor c in \"abc\" { out = c + out }\nassert(out == \"cba\")");
    assert_success("i = 0\nwhile true {\n  i += 1\n  if i == 3 { break }\n}\nassert(i == 3)");
    assert_success("n = 0\nfor i in range(1, 6) {\n  if i % 2 == 0 { continue }\n  n += i\n}\nassert(n == 9)");
    assert_failure("for i in 3 { x = i }");
}

#[test]
fn functions_and_lambdas() {
    assert_success("fn add(a, b) { return a + b }\nassert(add(2, 3) == 5)");
    assert_success("double = fn(x) => x * 2\nassert(double(4) == 8)");
    assert_success("fn fact(n) { return n <= 1 ? 1 : n * fact(n - 1) }\nassert(fact(5) == 120)");
    assert_success("fn make(k) { return fn(x) => x + k }\nassert(make(10)(5) == 15)");
    assert_failure("fn f(a) { return a }\nf(1, 2)");
    assert_failure("fn f(a, a) { return a }");
    assert_failure("x = 3\nx()");
}

#[test]
fn runaway_recursion_fails() {
    assert_failure("fn f(n) { return f(n + 1) }\nf(0)");
    assert_success("fn down(n) { return n == 0 ? 0 : down(n - 1) }\nassert(down(50) == 0)");
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let parens = format!("x = {}1{}", "(".repeat(1000), ")".repeat(1000));
    assert_failure(&parens);
    assert_failure(&format!("x = {}1", "-".repeat(1000)));
    assert_success(&format!("x = {}1{}", "(".repeat(20), ")".repeat(20)));
}

#[test]
fn locals_do_not_leak() {
    assert_success("fn f() { tmp = 1\nreturn tmp }\nf()\nassert(!(\"tmp\" in []))");
    assert_failure("fn f() { tmp = 1\nreturn tmp }\nf()\ny = tmp");
}

#[test]
fn misplaced_control_flow_fails() {
    assert_failure("break");
    assert_failure("return 1");
    assert_failure("fn f() { continue }\nf()");
}

#[test]
fn syntax_errors() {
    assert_failure("x = (1 + 2");
    assert_failure("x = \"unterminated");
    assert_failure("x = 1 2");
    assert_failure("}");
    assert_failure("x = @");
}

#[test]
fn conversions() {
    assert_success("assert(int(\"42\") == 42)\nassert(int(3.9) == 3)\nassert(int(true) == 1)");
    assert_success("assert(str(1.0) == \"1.0\")\nassert(str([\"a\", 1]) == \"[\\\"a\\\", 1]\")");
    assert_success("assert(repr(\"a\") == \"\\\"a\\\"\")");
    assert_failure("int(\"4.5x\")");
    assert_failure("assert(false, \"message\")");
}

#[test]
fn implicit_emission_gathers_expression_statements() {
    assert_renders("a = \"A\"\nfn render() { 1; \" Render a={{a}}.\" }", "1 Render a=A.");
    assert_renders("fn render() {\n  1\n  none\n  \"x\"\n}", "1x");
    assert_renders("fn render() {\n  x = 5\n  \"\"\n}", "");
}

#[test]
fn interpolation_nests_and_stringifies() {
    assert_renders("fn f(s) { return \"<\" + s + \">\" }\nx = 1\nfn render() { \"a{{f('{{x}}')}}b\" }",
                   "a<1>b");
    assert_renders("fn render() { \"{{ [1, 'b'] }}|{{none}}|{{true}}|{{2.0}}\" }",
                   "[1, \"b\"]|none|true|2.0");
    assert_renders("fn render() { \"{{ }}x\" }", "x");
}

#[test]
fn comments_inside_literals_are_removed() {
    assert_renders("fn render() { \"\"\"a ## hidden {{oops\nb\"\"\" }", "a \nb");
}

#[test]
fn nested_gathering_calls_compose() {
    assert_renders("fn item(x) { \"<{{x}}>\" }\nfn render() {\n  for i in range(3) { item(i) }\n}",
                   "<0><1><2>");
    assert_renders("fn inner() { \"in\" }\nfn render() {\n  s = inner()\n  \"[\" + s + \"]\"\n}",
                   "[in]");
}

#[test]
fn explicit_return_wins_over_gathered_text() {
    assert_renders("fn render() {\n  \"dropped\"\n  return \"kept\"\n}", "kept");
}

#[test]
fn reserved_functions_do_not_gather() {
    assert_renders("fn __helper__() {\n  \"from helper\"\n  return 1\n}\nfn render() {\n  \"a \"\n  __helper__()\n}",
                   "a from helper1");
}

#[test]
fn decorate_is_exposed_and_idempotent() {
    assert_renders("fn render() {\n  g = decorate(decorate(fn() => \"v\"))\n  g()\n}", "v");
    assert_success("assert(decorate(len) == len)");
}

#[test]
fn interpolation_errors_fail_the_unit() {
    assert_failure("x = \"a{{b\"");
    assert_failure("x = \"a}}b\"");
    assert_failure("x = \"{{{{x}}\"");
    assert_failure("x = \"{{ 1 + }}\"");
}
