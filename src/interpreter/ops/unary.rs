use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::Scope;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation, UnOp, UpdateOp};
use std::rc::Rc;

impl Interpreter<'_> {
    pub(crate) fn evaluate_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        scope: &Rc<Scope>,
        _location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // `typeof undeclared` is "undefined", not a ReferenceError
        if let (UnOp::TypeOf, Expr::Identifier(name, _)) = (op, operand) {
            let value = scope.lookup(name).unwrap_or_default();
            return Ok(Value::from(value.type_of()));
        }

        let value = self.evaluate(operand, scope)?;
        Ok(match op {
            UnOp::Neg => Value::Number(-value.to_number()),
            UnOp::Plus => Value::Number(value.to_number()),
            UnOp::Not => Value::Bool(!value.truthy()),
            UnOp::TypeOf => Value::from(value.type_of()),
        })
    }

    /// `++x`, `x++`, `--x`, `x--`
    pub(crate) fn evaluate_update(
        &mut self,
        op: UpdateOp,
        prefix: bool,
        target: &Expr,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(target, scope)?;
        let old = self.read_place(&place, scope, location)?.to_number();
        let new = match op {
            UpdateOp::Inc => old + 1.0,
            UpdateOp::Dec => old - 1.0,
        };
        self.write_place(&place, Value::Number(new), scope, location)?;
        Ok(Value::Number(if prefix { new } else { old }))
    }
}
