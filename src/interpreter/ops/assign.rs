use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::{AssignError, Scope};
use crate::memory::value::{ErrorKind, Value};
use crate::parser::ast::{BinOp, Expr, SourceLocation};
use std::rc::Rc;

/// A resolved assignment target. Object and key are evaluated once, before
/// the right-hand side.
pub(crate) enum Place {
    Variable(String),
    Property { object: Value, key: String },
}

impl Interpreter<'_> {
    /// `target = value` and the compound forms (`+=`, `-=`, ...)
    pub(crate) fn evaluate_assign(
        &mut self,
        op: Option<BinOp>,
        target: &Expr,
        value: &Expr,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(target, scope)?;
        let value = match op {
            None => self.evaluate(value, scope)?,
            Some(op) => {
                let current = self.read_place(&place, scope, location)?;
                let rhs = self.evaluate(value, scope)?;
                self.binary_op(op, &current, &rhs, location)?
            }
        };
        self.write_place(&place, value.clone(), scope, location)?;
        Ok(value)
    }

    pub(crate) fn resolve_place(
        &mut self,
        target: &Expr,
        scope: &Rc<Scope>,
    ) -> Result<Place, RuntimeError> {
        match target {
            Expr::Identifier(name, _) => Ok(Place::Variable(name.clone())),
            Expr::Member {
                object, property, ..
            } => Ok(Place::Property {
                object: self.evaluate(object, scope)?,
                key: property.clone(),
            }),
            Expr::Index { object, index, .. } => {
                let object = self.evaluate(object, scope)?;
                let index = self.evaluate(index, scope)?;
                Ok(Place::Property {
                    object,
                    key: Self::property_key(&index),
                })
            }
            other => Err(RuntimeError::throw(
                ErrorKind::SyntaxError,
                "Invalid left-hand side in assignment",
                other.location(),
            )),
        }
    }

    pub(crate) fn read_place(
        &mut self,
        place: &Place,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match place {
            Place::Variable(name) => scope.lookup(name).ok_or_else(|| {
                RuntimeError::reference_error(format!("{} is not defined", name), location)
            }),
            Place::Property { object, key } => self.get_property(object, key, location),
        }
    }

    pub(crate) fn write_place(
        &mut self,
        place: &Place,
        value: Value,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match place {
            Place::Variable(name) => self.assign_variable(name, value, scope, location),
            Place::Property { object, key } => self.set_property(object, key, value, location),
        }
    }

    /// Assign to the nearest binding; an undeclared name becomes a global
    pub(crate) fn assign_variable(
        &mut self,
        name: &str,
        value: Value,
        scope: &Rc<Scope>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match scope.assign(name, value.clone()) {
            Ok(()) => Ok(()),
            Err(AssignError::NotDefined) => {
                self.globals.declare(name, value, true);
                Ok(())
            }
            Err(AssignError::Constant) => Err(RuntimeError::type_error(
                "Assignment to constant variable.",
                location,
            )),
        }
    }
}
