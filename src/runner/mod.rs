//! One "Run" of the playground
//!
//! [`run_code`] turns editor text into the string shown in the output panel:
//!
//! 1. Parse the text as the body of an implicit function (top-level `return`
//!    is allowed).
//! 2. Execute it with a fresh [`Interpreter`] writing `console.log` lines into
//!    a [`Transcript`] owned by this run.
//! 3. Append the result value unless it is `undefined` or `null`.
//! 4. An uncaught script exception appends `"Error: <message>"` after whatever
//!    was printed before it (the inner guard).
//! 5. Parse errors and sandbox limit breaches replace the whole output with
//!    `"Error: <description>"` (the outer guard).
//! 6. An empty result becomes [`EMPTY_OUTPUT_MESSAGE`].
//!
//! Evaluation happens on a short-lived worker thread with a large stack, so
//! deeply recursive scripts hit the call-depth limit long before the native
//! stack runs out. The caller blocks until the worker finishes.

use crate::console::Transcript;
use crate::interpreter::{Interpreter, Limits, RuntimeError};
use crate::memory::value::Value;
use crate::parser::parser::parse_source;
use std::thread;

/// Output shown when a run produced nothing
pub const EMPTY_OUTPUT_MESSAGE: &str = "Please enter some code";

/// Native stack reserved for the evaluation thread
const EVALUATION_STACK_SIZE: usize = 256 * 1024 * 1024;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The script ran to completion
    Completed,
    /// The script threw and nothing caught it
    Threw,
    /// The script never ran, or was stopped by the sandbox
    HostError,
}

/// The result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Text for the output panel
    pub output: String,
    pub outcome: RunOutcome,
    /// Interpreter steps consumed (0 when parsing failed)
    pub steps: u64,
}

impl RunReport {
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_error(&self) -> bool {
        self.outcome != RunOutcome::Completed
    }

    fn host_error(message: impl std::fmt::Display, steps: u64) -> Self {
        RunReport {
            output: format!("Error: {}", message),
            outcome: RunOutcome::HostError,
            steps,
        }
    }
}

/// Evaluate `source` in the sandbox and build the output panel text
pub fn run_code(source: &str, limits: &Limits) -> RunReport {
    let limits = *limits;
    log::debug!("run started: {} bytes of source", source.len());

    let joined = thread::scope(|scope| {
        thread::Builder::new()
            .name("script-eval".to_string())
            .stack_size(EVALUATION_STACK_SIZE)
            .spawn_scoped(scope, move || evaluate(source, limits))
            .map(|handle| handle.join())
    });

    let report = match joined {
        Ok(Ok(report)) => report,
        Ok(Err(_)) => {
            log::error!("evaluation thread panicked");
            RunReport::host_error("evaluation aborted unexpectedly", 0)
        }
        Err(err) => {
            log::error!("failed to spawn evaluation thread: {}", err);
            RunReport::host_error(format!("could not start evaluation: {}", err), 0)
        }
    };

    log::debug!(
        "run finished: {:?} after {} steps, {} bytes of output",
        report.outcome,
        report.steps,
        report.output.len()
    );
    report
}

/// How the interpreter finished, with script values already rendered
enum Ending {
    Completed(Option<String>),
    Threw(String),
    Aborted(RuntimeError),
}

fn evaluate(source: &str, limits: Limits) -> RunReport {
    let program = match parse_source(source) {
        Ok(program) => program,
        Err(err) => {
            log::error!("parse error: {}", err);
            return RunReport::host_error(err, 0);
        }
    };

    let mut transcript = Transcript::new();
    // Render the result before the interpreter (and everything it allocated) goes away
    let (ending, steps) = {
        let mut interpreter = Interpreter::new(&mut transcript, limits);
        let ending = match interpreter.run(&program) {
            Ok(value) if value.is_nullish() => Ending::Completed(None),
            Ok(value) => Ending::Completed(Some(value.to_js_string())),
            Err(RuntimeError::Thrown { value, location }) => {
                log::debug!(
                    "uncaught exception at line {}, column {}",
                    location.line,
                    location.column
                );
                Ending::Threw(thrown_message(&value))
            }
            Err(err) => Ending::Aborted(err),
        };
        (ending, interpreter.steps())
    };

    let outcome = match ending {
        Ending::Completed(result) => {
            if let Some(text) = result {
                transcript.push_str(&text);
            }
            RunOutcome::Completed
        }
        Ending::Threw(message) => {
            transcript.push_str(&format!("Error: {}", message));
            RunOutcome::Threw
        }
        Ending::Aborted(err) => {
            log::error!("run aborted: {}", err);
            return RunReport::host_error(err, steps);
        }
    };

    let output = if transcript.is_empty() {
        EMPTY_OUTPUT_MESSAGE.to_string()
    } else {
        transcript.into_string()
    };

    RunReport {
        output,
        outcome,
        steps,
    }
}

/// The text after "Error: " for an uncaught value: the `message` of anything
/// that has one, otherwise the value's string form.
fn thrown_message(value: &Value) -> String {
    if let Value::Object(object) = value {
        if let Some(message) = object.borrow().get("message") {
            return message.to_js_string();
        }
    }
    value.to_js_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> RunReport {
        run_code(source, &Limits::default())
    }

    #[test]
    fn test_console_output_is_captured() {
        let report = run("console.log(\"hi\")");
        assert_eq!(report.output(), "hi\n");
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[test]
    fn test_completion_value_is_appended() {
        assert_eq!(run("42").output(), "42");
        assert_eq!(run("console.log('a');\n'b'").output(), "a\nb");
    }

    #[test]
    fn test_thrown_error_keeps_prior_output() {
        let report = run("console.log('before');\nthrow new Error('bad');\nconsole.log('after');");
        assert_eq!(report.output(), "before\nError: bad");
        assert_eq!(report.outcome, RunOutcome::Threw);
    }

    #[test]
    fn test_thrown_non_error_values() {
        assert_eq!(run("throw 'oops'").output(), "Error: oops");
        assert_eq!(run("throw { message: 'custom' }").output(), "Error: custom");
    }

    #[test]
    fn test_empty_results_use_placeholder() {
        assert_eq!(run("").output(), EMPTY_OUTPUT_MESSAGE);
        assert_eq!(run("// Write your javascript code here").output(), EMPTY_OUTPUT_MESSAGE);
        assert_eq!(run("return null").output(), EMPTY_OUTPUT_MESSAGE);
        assert_eq!(run("return ''").output(), EMPTY_OUTPUT_MESSAGE);
        assert_eq!(run("let x = 1;").output(), EMPTY_OUTPUT_MESSAGE);
    }

    #[test]
    fn test_parse_error_is_host_error() {
        let report = run("let x = ;");
        assert_eq!(report.outcome, RunOutcome::HostError);
        assert_eq!(report.output(), "Error: Unexpected token: ';' (line 1, column 9)");
    }

    #[test]
    fn test_limit_breach_discards_output() {
        let limits = Limits {
            max_steps: 500,
            ..Limits::default()
        };
        let report = run_code("console.log('start');\nwhile (true) {}", &limits);
        assert_eq!(report.outcome, RunOutcome::HostError);
        assert_eq!(report.output(), "Error: Execution step limit exceeded (500 steps)");
    }

    #[test]
    fn test_deep_recursion_hits_call_depth_limit() {
        let report = run("function down(n) { return down(n + 1); }\ndown(0)");
        assert_eq!(report.outcome, RunOutcome::HostError);
        assert_eq!(
            report.output(),
            "Error: Maximum call stack size exceeded (256 nested calls)"
        );
    }
}
