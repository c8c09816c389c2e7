// End-to-end tests for a single Run

use playtty::interpreter::Limits;
use playtty::runner::{run_code, RunOutcome, EMPTY_OUTPUT_MESSAGE};

fn run(source: &str) -> String {
    run_code(source, &Limits::default()).output
}

#[test]
fn test_documented_scenarios() {
    assert_eq!(run(r#"console.log("hi")"#), "hi\n");
    assert_eq!(run("42"), "42");
    assert_eq!(run(r#"throw new Error("bad")"#), "Error: bad");
}

#[test]
fn test_reference_solution_reverses() {
    let source = r#"
        function reverse(s) {
            return s.split("").reverse().join("");
        }
        const s = "shreyas";
        console.log(reverse(s));
    "#;
    assert_eq!(run(source), "sayerhs\n");
}

#[test]
fn test_loop_based_solution() {
    let source = r#"
        let s = "shreyas";
        let out = "";
        for (let i = s.length - 1; i >= 0; i--) {
            out += s[i];
        }
        return out;
    "#;
    assert_eq!(run(source), "sayerhs");
}

#[test]
fn test_prints_then_result() {
    let source = r#"
        console.log("one", 2, true);
        console.log([1, 2, 3]);
        "done"
    "#;
    assert_eq!(run(source), "one 2 true\n1,2,3\ndone");
}

#[test]
fn test_null_and_undefined_args_print_empty() {
    assert_eq!(run("console.log(null); console.log(undefined)"), "\n\n");
}

#[test]
fn test_caught_exception_does_not_escape() {
    let source = r#"
        try {
            throw new TypeError("nope");
        } catch (e) {
            console.log(e.name + ": " + e.message);
        } finally {
            console.log("cleanup");
        }
    "#;
    assert_eq!(run(source), "TypeError: nope\ncleanup\n");
}

#[test]
fn test_runtime_type_error_is_inner_guard() {
    let report = run_code("console.log('a');\nlet o = null;\no.x", &Limits::default());
    assert_eq!(report.outcome, RunOutcome::Threw);
    assert_eq!(
        report.output,
        "a\nError: Cannot read properties of null (reading 'x')"
    );
}

#[test]
fn test_undefined_variable_is_reference_error() {
    assert_eq!(run("missing + 1"), "Error: missing is not defined");
}

#[test]
fn test_placeholder_for_empty_output() {
    assert_eq!(run("   "), EMPTY_OUTPUT_MESSAGE);
    assert_eq!(run("return undefined"), EMPTY_OUTPUT_MESSAGE);
    assert_eq!(run("return null"), EMPTY_OUTPUT_MESSAGE);
}

#[test]
fn test_limits_replace_output() {
    let limits = Limits {
        max_string_len: 16,
        ..Limits::default()
    };
    let report = run_code("console.log('x');\nlet s = 'a';\nwhile (true) { s += s; }", &limits);
    assert_eq!(report.outcome, RunOutcome::HostError);
    assert_eq!(report.output, "Error: String length limit exceeded (16 bytes)");
}

#[test]
fn test_limits_cannot_be_caught() {
    let limits = Limits {
        max_steps: 1_000,
        ..Limits::default()
    };
    let source = "try { while (true) {} } catch (e) { console.log('caught') }";
    let report = run_code(source, &limits);
    assert_eq!(report.outcome, RunOutcome::HostError);
    assert_eq!(report.output, "Error: Execution step limit exceeded (1000 steps)");
}

#[test]
fn test_runs_are_independent() {
    assert_eq!(run("var counter = 1; counter"), "1");
    assert_eq!(run("typeof counter"), "undefined");
}

#[test]
fn test_step_count_reported() {
    let report = run_code("let a = 1;\nlet b = 2;", &Limits::default());
    assert!(report.steps >= 2);
    assert_eq!(run_code("let = ;", &Limits::default()).steps, 0);
}

#[test]
fn test_huge_padding_is_a_limit_error() {
    let report = run_code("console.log('x');\n'a'.padStart(Infinity)", &Limits::default());
    assert_eq!(report.outcome, RunOutcome::HostError);
    assert_eq!(report.output, "Error: String length limit exceeded (1048576 bytes)");
}

#[test]
fn test_array_result_survives_cleanup() {
    assert_eq!(run("const a = [1, 2]; a.push(a); a"), "1,2,");
    assert_eq!(run("[3, 1, 2].sort()"), "1,2,3");
}
