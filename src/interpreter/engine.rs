// Execution engine for the script interpreter

use crate::console::OutputSink;
use crate::interpreter::constants::{
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_OUTPUT_LEN, DEFAULT_MAX_STEPS, DEFAULT_MAX_STRING_LEN,
    MAX_ARRAY_LENGTH,
};
use crate::interpreter::errors::RuntimeError;
use crate::memory::registry::Allocations;
use crate::memory::scope::Scope;
use crate::memory::value::{Function, JsObject, Value};
use crate::parser::ast::*;
use std::rc::Rc;

/// Resource limits applied to a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Statements, loop iterations and calls a run may perform
    pub max_steps: u64,
    /// Deepest allowed nesting of function calls
    pub max_call_depth: usize,
    /// Longest string (in bytes) a script may build
    pub max_string_len: usize,
    /// Total bytes `console.log` may capture
    pub max_output_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }
}

/// How a statement finished
#[derive(Debug, Clone)]
pub(crate) enum ControlFlow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// Tree-walking interpreter for one script run.
///
/// Output goes to the borrowed [`OutputSink`]; the interpreter never touches
/// process-wide state, so two interpreters can run side by side.
///
/// Every scope, array and object the interpreter creates is emptied when it is
/// dropped. Render anything you need from a run's result before that.
pub struct Interpreter<'s> {
    /// Builtins (`console`, `Math`, `JSON`, ...)
    pub(crate) globals: Rc<Scope>,

    /// Where `console.log` lines go
    pub(crate) sink: &'s mut dyn OutputSink,

    pub(crate) limits: Limits,

    /// Steps taken so far
    pub(crate) steps: u64,

    /// Current function nesting
    pub(crate) call_depth: usize,

    /// Bytes written to the sink so far
    pub(crate) output_len: usize,

    /// Value of the last top-level expression statement
    completion: Value,

    /// Everything allocated so far, released on drop
    pub(crate) allocations: Allocations,
}

impl<'s> Interpreter<'s> {
    pub fn new(sink: &'s mut dyn OutputSink, limits: Limits) -> Self {
        let mut allocations = Allocations::new();
        let globals = Scope::new_global();
        allocations.scope(&globals);
        let mut interpreter = Interpreter {
            globals,
            sink,
            limits,
            steps: 0,
            call_depth: 0,
            output_len: 0,
            completion: Value::Undefined,
            allocations,
        };
        interpreter.install_globals();
        interpreter
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Run a whole program and return its result value.
    ///
    /// The result is the operand of a top-level `return` if one executes,
    /// otherwise the value of the last expression statement evaluated at the
    /// top level (`undefined` when there was none).
    ///
    /// Each call gets a fresh top-level scope. Globals created by sloppy
    /// assignment stay visible to later calls on the same interpreter.
    pub fn run(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        let globals = Rc::clone(&self.globals);
        let scope = self.new_scope(&globals, true);
        self.completion = Value::Undefined;
        self.steps = 0;
        self.call_depth = 0;
        self.output_len = 0;

        match self.execute_body(&program.body, &scope)? {
            ControlFlow::Return(value) => Ok(value),
            _ => Ok(std::mem::take(&mut self.completion)),
        }
    }

    /// Hoist and execute a statement list directly in `scope`
    pub(crate) fn execute_body(
        &mut self,
        body: &[Stmt],
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        self.hoist_declarations(body, scope);
        for stmt in body {
            let flow = self.execute_statement(stmt, scope)?;
            if !matches!(flow, ControlFlow::Normal) {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Function declarations are visible in their whole block, `var` names in
    /// their whole function.
    fn hoist_declarations(&self, body: &[Stmt], scope: &Rc<Scope>) {
        if Rc::ptr_eq(&scope.function_scope(), scope) {
            let mut names = Vec::new();
            collect_var_names(body, &mut names);
            for name in names {
                if !scope.has_own(&name) {
                    scope.declare(&name, Value::Undefined, true);
                }
            }
        }

        for stmt in body {
            if let Stmt::FunctionDecl(def) = stmt {
                if let Some(name) = &def.name {
                    let function = Function::Closure {
                        def: Rc::clone(def),
                        scope: Rc::clone(scope),
                    };
                    scope.declare(name, Value::Function(Rc::new(function)), true);
                }
            }
        }
    }

    /// Number of scopes, arrays and objects from this interpreter still alive
    pub fn live_allocations(&self) -> usize {
        self.allocations.live()
    }

    pub(crate) fn new_scope(&mut self, parent: &Rc<Scope>, is_function: bool) -> Rc<Scope> {
        let scope = Scope::child(parent, is_function);
        self.allocations.scope(&scope);
        scope
    }

    pub(crate) fn alloc_array(&mut self, items: Vec<Value>) -> Value {
        let value = Value::new_array(items);
        self.allocations.value(&value);
        value
    }

    pub(crate) fn alloc_object(&mut self, object: JsObject) -> Value {
        let value = Value::new_object(object);
        self.allocations.value(&value);
        value
    }

    /// Record a value allocated outside the interpreter (a thrown error object)
    pub(crate) fn adopt(&mut self, value: &Value) {
        self.allocations.value(value);
    }

    /// Record an expression statement's value when it runs at the top level
    pub(crate) fn record_completion(&mut self, value: Value) {
        if self.call_depth == 0 {
            self.completion = value;
        }
    }

    /// Count one unit of work against the step budget
    pub(crate) fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(RuntimeError::StepLimitExceeded {
                limit: self.limits.max_steps,
            });
        }
        Ok(())
    }

    /// Reject strings longer than the configured limit
    pub(crate) fn check_string_len(
        &self,
        len: usize,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if len > self.limits.max_string_len {
            return Err(RuntimeError::StringTooLong {
                limit: self.limits.max_string_len,
                location,
            });
        }
        Ok(())
    }

    pub(crate) fn check_array_len(
        &self,
        len: usize,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if len > MAX_ARRAY_LENGTH {
            return Err(RuntimeError::range_error("Invalid array length", location));
        }
        Ok(())
    }

    /// Build a string value after checking its length
    pub(crate) fn make_string(
        &self,
        text: String,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        self.check_string_len(text.len(), location)?;
        Ok(Value::from(text))
    }

    /// Send one line to the output sink
    pub(crate) fn emit_line(
        &mut self,
        line: &str,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let len = self.output_len + line.len() + 1;
        if len > self.limits.max_output_len {
            return Err(RuntimeError::OutputLimitExceeded {
                limit: self.limits.max_output_len,
                location,
            });
        }
        self.output_len = len;
        self.sink.write_line(line, location);
        Ok(())
    }

    /// Invoke any callable value
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let function = match callee {
            Value::Function(function) => Rc::clone(function),
            other => {
                return Err(RuntimeError::type_error(
                    format!("{} is not a function", other.type_of()),
                    location,
                ))
            }
        };

        self.tick()?;
        match function.as_ref() {
            Function::Closure { def, scope } => self.call_closure(def, scope, args, location),
            Function::Builtin(builtin) => self.call_builtin(*builtin, args, location),
            Function::Method { receiver, name } => {
                self.call_method(receiver, name, args, location)
            }
        }
    }

    fn call_closure(
        &mut self,
        def: &Rc<FunctionDef>,
        closure_scope: &Rc<Scope>,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.call_depth >= self.limits.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.limits.max_call_depth,
                location,
            });
        }

        let scope = self.new_scope(closure_scope, true);
        let mut args = args.into_iter();
        for param in &def.params {
            scope.declare(param, args.next().unwrap_or_default(), true);
        }

        self.call_depth += 1;
        let result = match &def.body {
            FunctionBody::Block(body) => self.execute_body(body, &scope).map(|flow| match flow {
                ControlFlow::Return(value) => value,
                _ => Value::Undefined,
            }),
            FunctionBody::Expression(expr) => self.evaluate(expr, &scope),
        };
        self.call_depth -= 1;

        result
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        self.completion = Value::Undefined;
        self.allocations.release();
    }
}

/// Names declared with `var` anywhere in `body`, not descending into functions
fn collect_var_names(body: &[Stmt], names: &mut Vec<String>) {
    for stmt in body {
        collect_var_names_in(stmt, names);
    }
}

fn collect_var_names_in(stmt: &Stmt, names: &mut Vec<String>) {
    match stmt {
        Stmt::VarDecl {
            kind: DeclKind::Var,
            declarations,
            ..
        } => {
            for (name, _) in declarations {
                names.push(name.clone());
            }
        }
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect_var_names_in(then_branch, names);
            if let Some(else_branch) = else_branch {
                collect_var_names_in(else_branch, names);
            }
        }
        Stmt::While { body, .. } | Stmt::DoWhile { body, .. } => {
            collect_var_names_in(body, names)
        }
        Stmt::For { init, body, .. } => {
            if let Some(init) = init {
                collect_var_names_in(init, names);
            }
            collect_var_names_in(body, names);
        }
        Stmt::ForEach {
            kind, name, body, ..
        } => {
            if *kind == Some(DeclKind::Var) {
                names.push(name.clone());
            }
            collect_var_names_in(body, names);
        }
        Stmt::Try {
            block,
            catch_block,
            finally_block,
            ..
        } => {
            collect_var_names(block, names);
            if let Some(catch_block) = catch_block {
                collect_var_names(catch_block, names);
            }
            if let Some(finally_block) = finally_block {
                collect_var_names(finally_block, names);
            }
        }
        Stmt::Block(body, _) => collect_var_names(body, names),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Transcript;
    use crate::parser::parser::parse_source;

    fn run_source(source: &str, limits: Limits) -> (Result<Value, RuntimeError>, Transcript) {
        let program = parse_source(source).expect("test source should parse");
        let mut transcript = Transcript::new();
        let result = Interpreter::new(&mut transcript, limits).run(&program);
        (result, transcript)
    }

    fn run_ok(source: &str) -> (Value, String) {
        let (result, transcript) = run_source(source, Limits::default());
        (result.expect("run should succeed"), transcript.into_string())
    }

    #[test]
    fn test_completion_value_of_last_expression() {
        let (value, output) = run_ok("let x = 2;\nx * 21;");
        assert_eq!(value.to_js_string(), "42");
        assert_eq!(output, "");
    }

    #[test]
    fn test_top_level_return_wins() {
        let (value, _) = run_ok("return 'early';\n'late';");
        assert_eq!(value.to_js_string(), "early");
    }

    #[test]
    fn test_expression_inside_function_is_not_completion() {
        let (value, _) = run_ok("function f() { 99; }\nf();");
        assert!(matches!(value, Value::Undefined));
    }

    #[test]
    fn test_var_and_function_hoisting() {
        let (value, output) = run_ok("console.log(typeof x, f());\nvar x = 1;\nfunction f() { return 'ok'; }");
        assert_eq!(output, "undefined ok\n");
        assert!(matches!(value, Value::Undefined));
    }

    #[test]
    fn test_step_limit() {
        let limits = Limits {
            max_steps: 1_000,
            ..Limits::default()
        };
        let (result, _) = run_source("while (true) {}", limits);
        assert!(matches!(
            result,
            Err(RuntimeError::StepLimitExceeded { limit: 1_000 })
        ));
    }

    #[test]
    fn test_call_depth_limit_is_not_catchable() {
        let limits = Limits {
            max_call_depth: 50,
            ..Limits::default()
        };
        let source = "function f(n) { return f(n + 1); }\ntry { f(0); } catch (e) { 'caught'; }";
        let (result, _) = run_source(source, limits);
        assert!(matches!(
            result,
            Err(RuntimeError::CallDepthExceeded { limit: 50, .. })
        ));
    }

    #[test]
    fn test_string_limit() {
        let limits = Limits {
            max_string_len: 64,
            ..Limits::default()
        };
        let (result, _) = run_source("let s = 'ab';\nwhile (true) { s = s + s; }", limits);
        assert!(matches!(
            result,
            Err(RuntimeError::StringTooLong { limit: 64, .. })
        ));
    }

    #[test]
    fn test_output_limit() {
        let limits = Limits {
            max_output_len: 10,
            ..Limits::default()
        };
        let (result, transcript) =
            run_source("for (let i = 0; i < 100; i++) console.log(i);", limits);
        assert!(matches!(
            result,
            Err(RuntimeError::OutputLimitExceeded { limit: 10, .. })
        ));
        assert_eq!(transcript.as_str(), "0\n1\n2\n3\n4\n");
    }

    #[test]
    fn test_sinks_are_independent() {
        let program = parse_source("console.log('one')").unwrap();
        let mut first = Transcript::new();
        let mut second = Transcript::new();
        Interpreter::new(&mut first, Limits::default())
            .run(&program)
            .unwrap();
        Interpreter::new(&mut second, Limits::default())
            .run(&program)
            .unwrap();

        assert_eq!(first.as_str(), "one\n");
        assert_eq!(second.as_str(), "one\n");
    }

    #[test]
    fn test_self_referencing_object_freed_with_interpreter() {
        let program =
            parse_source("function f() { let o = {}; o.self = o; return o; }\nf()").unwrap();
        let mut transcript = Transcript::new();
        let value = Interpreter::new(&mut transcript, Limits::default())
            .run(&program)
            .unwrap();

        let weak = match &value {
            Value::Object(object) => {
                assert!(object.borrow().is_empty());
                Rc::downgrade(object)
            }
            other => panic!("expected an object, got {:?}", other),
        };
        drop(value);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_closure_scope_cycle_freed_with_interpreter() {
        let source = "function make() { let x = 1; function inner() { return x; } return inner; }\nmake()";
        let program = parse_source(source).unwrap();
        let mut transcript = Transcript::new();
        let value = Interpreter::new(&mut transcript, Limits::default())
            .run(&program)
            .unwrap();

        let weak = match &value {
            Value::Function(function) => Rc::downgrade(function),
            other => panic!("expected a function, got {:?}", other),
        };
        drop(value);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_cycles_inside_calls_are_tracked() {
        let program = parse_source(
            "function f() { let o = {}; o.self = o; let a = []; a.push(a); }\n\
             for (let i = 0; i < 100; i++) f();",
        )
        .unwrap();
        let mut transcript = Transcript::new();
        let mut interpreter = Interpreter::new(&mut transcript, Limits::default());
        let baseline = interpreter.live_allocations();
        interpreter.run(&program).unwrap();
        // 100 objects and 100 arrays are kept alive only by their own cycles
        assert!(interpreter.live_allocations() >= baseline + 200);
    }

    #[test]
    fn test_run_twice_keeps_builtins() {
        let program = parse_source("console.log(Math.max(1, 2))").unwrap();
        let mut transcript = Transcript::new();
        {
            let mut interpreter = Interpreter::new(&mut transcript, Limits::default());
            interpreter.run(&program).unwrap();
            interpreter.run(&program).unwrap();
        }
        assert_eq!(transcript.as_str(), "2\n2\n");
    }
}
