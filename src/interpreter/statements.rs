//! Statement execution implementation
//!
//! This module handles the execution of every statement type:
//!
//! - `let` / `const` / `var` declarations
//! - `if` / `else` and plain blocks
//! - Expression statements (which feed the run's completion value)
//! - `return`, `break`, `continue` and `throw`
//!
//! Loops live in [`super::loops`], `try` in [`super::jumps`].
//!
//! # Implementation
//!
//! All statement execution methods are `pub(crate)` methods on the
//! [`Interpreter`] struct. Each returns the [`ControlFlow`] the statement ended
//! with so enclosing loops and functions can react.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::Scope;
use crate::memory::value::{ErrorKind, Value};
use crate::parser::ast::*;
use std::rc::Rc;

impl Interpreter<'_> {
    pub(crate) fn execute_statement(
        &mut self,
        stmt: &Stmt,
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        self.tick()?;

        match stmt {
            Stmt::VarDecl {
                kind,
                declarations,
                location,
            } => {
                for (name, init) in declarations {
                    self.execute_var_decl(*kind, name, init.as_ref(), scope, *location)?;
                }
                Ok(ControlFlow::Normal)
            }

            // Already bound when the enclosing block was entered
            Stmt::FunctionDecl(_) => Ok(ControlFlow::Normal),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate(condition, scope)?.truthy() {
                    self.execute_statement(then_branch, scope)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(else_branch, scope)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            Stmt::While {
                condition, body, ..
            } => self.execute_while(condition, body, scope),

            Stmt::DoWhile {
                body, condition, ..
            } => self.execute_do_while(body, condition, scope),

            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => self.execute_for(
                init.as_deref(),
                condition.as_ref(),
                update.as_ref(),
                body,
                scope,
            ),

            Stmt::ForEach {
                kind,
                name,
                iter_kind,
                iterable,
                body,
                location,
            } => self.execute_for_each(*kind, name, *iter_kind, iterable, body, scope, *location),

            Stmt::Break(_) => Ok(ControlFlow::Break),
            Stmt::Continue(_) => Ok(ControlFlow::Continue),

            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.evaluate(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(ControlFlow::Return(value))
            }

            Stmt::Throw { expr, location } => {
                let value = self.evaluate(expr, scope)?;
                Err(RuntimeError::Thrown {
                    value,
                    location: *location,
                })
            }

            Stmt::Try {
                block,
                catch_param,
                catch_block,
                finally_block,
                ..
            } => self.execute_try(
                block,
                catch_param.as_deref(),
                catch_block.as_deref(),
                finally_block.as_deref(),
                scope,
            ),

            Stmt::Block(body, _) => self.execute_block(body, scope),

            Stmt::Expression(expr, _) => {
                let value = self.evaluate(expr, scope)?;
                self.record_completion(value);
                Ok(ControlFlow::Normal)
            }

            Stmt::Empty(_) => Ok(ControlFlow::Normal),
        }
    }

    /// Execute `body` in a fresh block scope nested in `scope`
    pub(crate) fn execute_block(
        &mut self,
        body: &[Stmt],
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        let block_scope = self.new_scope(scope, false);
        self.execute_body(body, &block_scope)
    }

    pub(crate) fn execute_var_decl(
        &mut self,
        kind: DeclKind,
        name: &str,
        init: Option<&Expr>,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = match init {
            Some(expr) => self.evaluate(expr, scope)?,
            None => Value::Undefined,
        };
        self.declare_binding(kind, name, value, init.is_some(), scope, location)
    }

    /// Bind `name` the way a declaration of `kind` does
    pub(crate) fn declare_binding(
        &mut self,
        kind: DeclKind,
        name: &str,
        value: Value,
        initialized: bool,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match kind {
            DeclKind::Var => {
                let function_scope = scope.function_scope();
                // `var x;` leaves an existing value alone
                if initialized || !function_scope.has_own(name) {
                    function_scope.declare(name, value, true);
                }
            }
            DeclKind::Let | DeclKind::Const => {
                if scope.has_own(name) {
                    return Err(RuntimeError::throw(
                        ErrorKind::SyntaxError,
                        format!("Identifier '{}' has already been declared", name),
                        location,
                    ));
                }
                scope.declare(name, value, kind == DeclKind::Let);
            }
        }
        Ok(())
    }
}
