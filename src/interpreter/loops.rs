//! Loop statement execution (`while`, `do-while`, `for`, `for...of`, `for...in`).
//!
//! Adds `impl Interpreter` methods for the loop forms of the language. Every
//! iteration ticks the step budget, so `while (true) {}` ends with a
//! step-limit error instead of hanging the UI.
//!
//! `break` and `continue` are consumed here; `return` is handed back to the
//! caller through [`LoopBodyResult::Exit`].

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::Scope;
use crate::memory::value::Value;
use crate::parser::ast::*;
use std::rc::Rc;

/// How one execution of a loop body ended
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`
    Continue,
    /// `break` was encountered
    Break,
    /// `return` was encountered; the flow must propagate to the caller
    Exit(ControlFlow),
}

impl Interpreter<'_> {
    /// Executes one iteration of `body`
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &Stmt,
        scope: &Rc<Scope>,
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.tick()?;
        Ok(match self.execute_statement(body, scope)? {
            ControlFlow::Normal | ControlFlow::Continue => LoopBodyResult::Continue,
            ControlFlow::Break => LoopBodyResult::Break,
            flow @ ControlFlow::Return(_) => LoopBodyResult::Exit(flow),
        })
    }

    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &Stmt,
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        while self.evaluate(condition, scope)?.truthy() {
            match self.execute_loop_body(body, scope)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
        }
        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_do_while(
        &mut self,
        body: &Stmt,
        condition: &Expr,
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        loop {
            match self.execute_loop_body(body, scope)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
            if !self.evaluate(condition, scope)?.truthy() {
                break;
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes `for (init; condition; update) body`.
    ///
    /// `let` bindings from `init` are copied into a fresh scope for every
    /// iteration, so closures created in the body keep that iteration's values.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        let loop_scope = self.new_scope(scope, false);
        if let Some(init) = init {
            self.execute_statement(init, &loop_scope)?;
        }

        let per_iteration = per_iteration_names(init);
        let mut iteration_scope = self.next_iteration_scope(&loop_scope, &loop_scope, &per_iteration);

        loop {
            if let Some(condition) = condition {
                if !self.evaluate(condition, &iteration_scope)?.truthy() {
                    break;
                }
            }
            match self.execute_loop_body(body, &iteration_scope)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
            iteration_scope = self.next_iteration_scope(&loop_scope, &iteration_scope, &per_iteration);
            if let Some(update) = update {
                self.evaluate(update, &iteration_scope)?;
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// A new scope under `loop_scope` holding copies of `names` as seen from `previous`
    fn next_iteration_scope(
        &mut self,
        loop_scope: &Rc<Scope>,
        previous: &Rc<Scope>,
        names: &[String],
    ) -> Rc<Scope> {
        if names.is_empty() {
            return Rc::clone(loop_scope);
        }
        let next = self.new_scope(loop_scope, false);
        for name in names {
            next.declare(name, previous.lookup(name).unwrap_or_default(), true);
        }
        next
    }

    /// Executes `for (x of iterable)` and `for (k in object)`.
    ///
    /// The sequence is snapshotted before the first iteration; each iteration
    /// binds the loop variable in a fresh scope.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn execute_for_each(
        &mut self,
        kind: Option<DeclKind>,
        name: &str,
        iter_kind: IterKind,
        iterable: &Expr,
        body: &Stmt,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<ControlFlow, RuntimeError> {
        let collection = self.evaluate(iterable, scope)?;
        let items = match iter_kind {
            IterKind::Of => self.iteration_values(&collection, location)?,
            IterKind::In => self
                .property_keys(&collection)
                .into_iter()
                .map(Value::from)
                .collect(),
        };

        for item in items {
            let iteration_scope = self.new_scope(scope, false);
            match kind {
                Some(kind) => {
                    self.declare_binding(kind, name, item, true, &iteration_scope, location)?
                }
                None => self.assign_variable(name, item, scope, location)?,
            }
            match self.execute_loop_body(body, &iteration_scope)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// The values `for...of` walks over
    fn iteration_values(
        &self,
        collection: &Value,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        match collection {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::from(c.to_string())).collect()),
            other => Err(RuntimeError::type_error(
                format!("{} is not iterable", other.to_js_string()),
                location,
            )),
        }
    }
}

/// Names a `for` header declares with `let`
fn per_iteration_names(init: Option<&Stmt>) -> Vec<String> {
    match init {
        Some(Stmt::VarDecl {
            kind: DeclKind::Let,
            declarations,
            ..
        }) => declarations.iter().map(|(name, _)| name.clone()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::console::Transcript;
    use crate::interpreter::engine::{Interpreter, Limits};
    use crate::parser::parser::parse_source;

    fn eval(source: &str) -> String {
        let program = parse_source(source).unwrap();
        let mut transcript = Transcript::new();
        let result = Interpreter::new(&mut transcript, Limits::default())
            .run(&program)
            .unwrap()
            .to_js_string();
        result
    }

    #[test]
    fn test_for_let_binding_is_per_iteration() {
        let source = "let fns = [];\n\
                      for (let i = 0; i < 3; i++) fns.push(() => i);\n\
                      fns.map(f => f()).join()";
        assert_eq!(eval(source), "0,1,2");
    }

    #[test]
    fn test_for_body_updates_carry_to_next_iteration() {
        let source = "let seen = [];\n\
                      for (let i = 0; i < 10; i++) { seen.push(i); i += 2; }\n\
                      seen.join()";
        assert_eq!(eval(source), "0,3,6,9");
    }

    #[test]
    fn test_for_var_binding_is_shared() {
        let source = "let fns = [];\n\
                      for (var i = 0; i < 3; i++) fns.push(() => i);\n\
                      fns.map(f => f()).join()";
        assert_eq!(eval(source), "3,3,3");
    }

    #[test]
    fn test_break_continue_and_for_of() {
        let source = "let total = 0;\n\
                      for (const n of [1, 2, 3, 4, 5]) {\n\
                        if (n === 2) continue;\n\
                        if (n === 5) break;\n\
                        total += n;\n\
                      }\n\
                      total";
        assert_eq!(eval(source), "8");
    }
}
