//! Expression evaluation implementation
//!
//! This module handles evaluation of every expression type, including:
//!
//! - Literals (numbers, strings, template strings, arrays, objects)
//! - Identifiers and function expressions (closures capture the current scope)
//! - Short-circuiting `&&`, `||` and `??`, and the conditional operator
//! - Calls and `new`
//!
//! Operator semantics live under [`super::ops`].

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::Scope;
use crate::memory::value::{Function, JsObject, ObjectClass, Value};
use crate::parser::ast::*;
use std::rc::Rc;

impl Interpreter<'_> {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate(&mut self, expr: &Expr, scope: &Rc<Scope>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(n, _) => Ok(Value::Number(*n)),
            Expr::Str(s, _) => Ok(Value::Str(Rc::clone(s))),
            Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            Expr::Null(_) => Ok(Value::Null),
            Expr::Undefined(_) => Ok(Value::Undefined),

            Expr::Template(parts, location) => {
                let mut text = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Text(s) => text.push_str(s),
                        TemplatePart::Expr(expr) => {
                            let value = self.evaluate(expr, scope)?;
                            text.push_str(&value.to_js_string());
                        }
                    }
                    self.check_string_len(text.len(), *location)?;
                }
                Ok(Value::from(text))
            }

            Expr::Identifier(name, location) => scope.lookup(name).ok_or_else(|| {
                RuntimeError::reference_error(format!("{} is not defined", name), *location)
            }),

            Expr::Array(elements, location) => {
                self.check_array_len(elements.len(), *location)?;
                let items = elements
                    .iter()
                    .map(|element| self.evaluate(element, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.alloc_array(items))
            }

            Expr::Object(properties, _) => {
                let mut object = JsObject::new(ObjectClass::Plain);
                for (key, value_expr) in properties {
                    let value = self.evaluate(value_expr, scope)?;
                    object.set(key, value);
                }
                Ok(self.alloc_object(object))
            }

            Expr::Function(def) => {
                // A named function expression can call itself by name
                let closure_scope = match &def.name {
                    Some(_) => self.new_scope(scope, false),
                    None => Rc::clone(scope),
                };
                let function = Value::Function(Rc::new(Function::Closure {
                    def: Rc::clone(def),
                    scope: Rc::clone(&closure_scope),
                }));
                if let Some(name) = &def.name {
                    closure_scope.declare(name, function.clone(), false);
                }
                Ok(function)
            }

            Expr::Unary {
                op,
                operand,
                location,
            } => self.evaluate_unary(*op, operand, scope, *location),

            Expr::Update {
                op,
                prefix,
                target,
                location,
            } => self.evaluate_update(*op, *prefix, target, scope, *location),

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate(left, scope)?;
                let right = self.evaluate(right, scope)?;
                self.binary_op(*op, &left, &right, *location)
            }

            Expr::Logical {
                op, left, right, ..
            } => {
                let left = self.evaluate(left, scope)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.truthy(),
                    LogicalOp::Or => left.truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right, scope)
                }
            }

            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                if self.evaluate(condition, scope)?.truthy() {
                    self.evaluate(then_expr, scope)
                } else {
                    self.evaluate(else_expr, scope)
                }
            }

            Expr::Assign {
                op,
                target,
                value,
                location,
            } => self.evaluate_assign(*op, target, value, scope, *location),

            Expr::Member {
                object,
                property,
                location,
            } => {
                let object = self.evaluate(object, scope)?;
                self.get_property(&object, property, *location)
            }

            Expr::Index {
                object,
                index,
                location,
            } => {
                let object = self.evaluate(object, scope)?;
                let index = self.evaluate(index, scope)?;
                let key = Self::property_key(&index);
                self.get_property(&object, &key, *location)
            }

            Expr::Call {
                callee,
                args,
                location,
            } => {
                let function = self.evaluate(callee, scope)?;
                if !matches!(function, Value::Function(_)) {
                    return Err(RuntimeError::type_error(
                        format!("{} is not a function", callee.describe()),
                        *location,
                    ));
                }
                let args = self.evaluate_args(args, scope)?;
                self.call_value(&function, args, *location)
            }

            Expr::New {
                callee,
                args,
                location,
            } => {
                let constructor = self.evaluate(callee, scope)?;
                let args = self.evaluate_args(args, scope)?;
                match &constructor {
                    Value::Function(function) => match function.as_ref() {
                        Function::Builtin(builtin) if builtin.is_constructor() => {
                            self.call_value(&constructor, args, *location)
                        }
                        _ => Err(RuntimeError::type_error(
                            format!("{} is not a constructor", callee.describe()),
                            *location,
                        )),
                    },
                    _ => Err(RuntimeError::type_error(
                        format!("{} is not a constructor", callee.describe()),
                        *location,
                    )),
                }
            }
        }
    }

    fn evaluate_args(&mut self, args: &[Expr], scope: &Rc<Scope>) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.evaluate(arg, scope)).collect()
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
    fn test_arithmetic_and_precedence() {
        assert_eq!(eval("1 + 2 * 3"), "7");
        assert_eq!(eval("2 ** 3 ** 2"), "512");
        assert_eq!(eval("(1 + 2) * 3"), "9");
        assert_eq!(eval("7 % 3"), "1");
        assert_eq!(eval("-7 % 3"), "-1");
        assert_eq!(eval("1 / 0"), "Infinity");
    }

    #[test]
    fn test_string_concatenation_and_coercion() {
        assert_eq!(eval("'a' + 1 + 2"), "a12");
        assert_eq!(eval("1 + 2 + 'a'"), "3a");
        assert_eq!(eval("'5' * '2'"), "10");
        assert_eq!(eval("[1, 2] + ''"), "1,2");
        assert_eq!(eval("'b' > 'a'"), "true");
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        assert_eq!(eval("0 || 'fallback'"), "fallback");
        assert_eq!(eval("0 ?? 'unused'"), "0");
        assert_eq!(eval("null ?? 'default'"), "default");
        assert_eq!(eval("let hit = false; false && (hit = true); hit"), "false");
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(eval("const n = 3; `n = ${n}, twice ${n * 2}`"), "n = 3, twice 6");
    }

    #[test]
    fn test_closures_capture_scope() {
        let source = "function counter() { let c = 0; return () => ++c; }\n\
                      const next = counter(); next(); next(); next()";
        assert_eq!(eval(source), "3");
    }

    #[test]
    fn test_named_function_expression_sees_its_name() {
        assert_eq!(eval("var f = function g() { return typeof g; }; f()"), "function");
        let source = "const fact = function f(n) { return n <= 1 ? 1 : n * f(n - 1); };\nfact(5)";
        assert_eq!(eval(source), "120");
        // The name does not leak into the enclosing scope
        assert_eq!(eval("const h = function inner() {}; typeof inner"), "undefined");
    }

    #[test]
    fn test_typeof_undeclared_is_undefined() {
        assert_eq!(eval("typeof nothingHere"), "undefined");
        assert_eq!(eval("typeof (() => 1)"), "function");
        assert_eq!(eval("typeof null"), "object");
    }

    #[test]
    fn test_calling_non_function_is_type_error() {
        let program = parse_source("const x = 1; x()").unwrap();
        let mut transcript = Transcript::new();
        let err = Interpreter::new(&mut transcript, Limits::default())
            .run(&program)
            .unwrap_err();
        assert!(err.to_string().contains("TypeError: x is not a function"));
    }
}
