use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::Scope;
use crate::parser::ast::Stmt;
use std::rc::Rc;

impl Interpreter<'_> {
    /// `try { } catch (e) { } finally { }`
    ///
    /// Only thrown script values reach `catch`. Sandbox limit errors unwind
    /// straight through, skipping `finally` as well.
    pub(crate) fn execute_try(
        &mut self,
        block: &[Stmt],
        catch_param: Option<&str>,
        catch_block: Option<&[Stmt]>,
        finally_block: Option<&[Stmt]>,
        scope: &Rc<Scope>,
    ) -> Result<ControlFlow, RuntimeError> {
        let mut outcome = self.execute_block(block, scope);

        let thrown = match &outcome {
            Err(RuntimeError::Thrown { value, .. }) => Some(value.clone()),
            _ => None,
        };
        if let (Some(value), Some(catch_block)) = (thrown, catch_block) {
            // Builtin errors are created outside the interpreter
            self.adopt(&value);
            let catch_scope = self.new_scope(scope, false);
            if let Some(param) = catch_param {
                catch_scope.declare(param, value, true);
            }
            outcome = self.execute_body(catch_block, &catch_scope);
        }

        if matches!(&outcome, Err(err) if !err.is_catchable()) {
            return outcome;
        }

        if let Some(finally_block) = finally_block {
            // A `return`/`break` (or a throw) in `finally` overrides the outcome
            match self.execute_block(finally_block, scope)? {
                ControlFlow::Normal => {}
                flow => return Ok(flow),
            }
        }

        outcome
    }
}
