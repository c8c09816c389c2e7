//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every runtime value a
//! script can observe, together with the conversions the language applies
//! implicitly (`ToBoolean`, `ToNumber`, `ToString`) and both equality relations.
//!
//! # Value Types
//!
//! - Primitives: [`Value::Undefined`], [`Value::Null`], [`Value::Bool`],
//!   [`Value::Number`] (IEEE-754 double), [`Value::Str`]
//! - References: [`Value::Array`], [`Value::Object`], [`Value::Function`]
//!
//! Reference values are shared (`Rc`) and interior-mutable (`RefCell`), so
//! `a.reverse()` is visible through every alias of `a`.

use crate::interpreter::builtins::Builtin;
use crate::memory::scope::Scope;
use crate::parser::ast::FunctionDef;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<JsObject>>;

/// Runtime values in the interpreter
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(Rc<Function>),
}

/// Built-in error constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
        }
    }
}

/// Distinguishes plain objects from error instances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    Plain,
    Error(ErrorKind),
}

/// An insertion-ordered property map
#[derive(Debug, Clone)]
pub struct JsObject {
    pub class: ObjectClass,
    index: FxHashMap<Rc<str>, usize>,
    entries: Vec<(Rc<str>, Value)>,
}

impl JsObject {
    pub fn new(class: ObjectClass) -> Self {
        JsObject {
            class,
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }

    /// Build an error instance carrying `message`
    pub fn error(kind: ErrorKind, message: &str) -> Self {
        let mut object = JsObject::new(ObjectClass::Error(kind));
        object.set("message", Value::from(message));
        object
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                let key: Rc<str> = Rc::from(key);
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn entries(&self) -> &[(Rc<str>, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every property, breaking cycles that run through this object
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    /// `name` of an error instance, as seen by `err.name`
    pub fn error_name(&self) -> Option<&'static str> {
        match self.class {
            ObjectClass::Error(kind) => Some(kind.name()),
            ObjectClass::Plain => None,
        }
    }
}

/// Callable values
pub enum Function {
    /// A user-defined function closing over its defining scope
    Closure { def: Rc<FunctionDef>, scope: Rc<Scope> },
    /// A sandbox builtin (`console.log`, `Math.max`, `Error`, ...)
    Builtin(Builtin),
    /// A string or array method bound to its receiver (`s.split`)
    Method { receiver: Value, name: Rc<str> },
}

impl Function {
    pub fn name(&self) -> String {
        match self {
            Function::Closure { def, .. } => def.name.clone().unwrap_or_default(),
            Function::Builtin(builtin) => builtin.name().to_string(),
            Function::Method { name, .. } => name.to_string(),
        }
    }
}

// Closures capture scopes that may (indirectly) contain the closure itself,
// so only the name is printed.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    pub fn new_array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn new_object(object: JsObject) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// The `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) | Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// `ToBoolean`
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// `ToNumber`
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// `ToString`
    pub fn to_js_string(&self) -> String {
        let mut seen = Vec::new();
        self.stringify_into(&mut seen)
    }

    fn stringify_into(&self, seen: &mut Vec<*const RefCell<Vec<Value>>>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(items) => {
                // Cyclic arrays render their repeated occurrence as ""
                let ptr = Rc::as_ptr(items);
                if seen.contains(&ptr) {
                    return String::new();
                }
                seen.push(ptr);
                let joined = items
                    .borrow()
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.stringify_into(seen)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                seen.pop();
                joined
            }
            Value::Object(object) => {
                let object = object.borrow();
                match object.error_name() {
                    Some(name) => {
                        let message = object
                            .get("message")
                            .map(Value::to_js_string)
                            .unwrap_or_default();
                        if message.is_empty() {
                            name.to_string()
                        } else {
                            format!("{}: {}", name, message)
                        }
                    }
                    None => "[object Object]".to_string(),
                }
            }
            Value::Function(function) => match function.as_ref() {
                Function::Closure { def, .. } => def.source.to_string(),
                other => format!("function {}() {{ [native code] }}", other.name()),
            },
        }
    }

    /// Strict equality (`===`)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Loose equality (`==`)
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::Str(_))
            | (Value::Str(_), Value::Number(_))
            | (Value::Bool(_), _)
            | (_, Value::Bool(_)) => {
                if matches!(self, Value::Bool(_)) || matches!(other, Value::Bool(_)) {
                    Value::Number(self.to_number()).loose_equals(&Value::Number(other.to_number()))
                } else {
                    self.to_number() == other.to_number()
                }
            }
            (Value::Array(_), Value::Str(_) | Value::Number(_)) => {
                Value::from(self.to_js_string()).loose_equals(other)
            }
            (Value::Str(_) | Value::Number(_), Value::Array(_)) => {
                self.loose_equals(&Value::from(other.to_js_string()))
            }
            _ => self.strict_equals(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

/// Format a number the way `String(n)` does
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0 as well
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    // Exponential form: Rust gives "1e21" / "1.5e-7", JS wants "1e+21" / "1.5e-7"
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// `ToNumber` applied to a string
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let radix_digits = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .iter()
        .find_map(|(prefix, radix)| unsigned.strip_prefix(prefix).map(|d| (d, *radix)));
    if let Some((digits, radix)) = radix_digits {
        // Signed hex strings are NaN in JS
        if negative || trimmed.starts_with('+') {
            return f64::NAN;
        }
        return u64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    let magnitude = if unsigned == "Infinity" {
        f64::INFINITY
    } else if unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        unsigned.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.5), "-3.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 12 "), 12.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("-2.5"), -2.5);
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("-0x10").is_nan());
    }

    #[test]
    fn test_array_to_string_skips_nullish_and_cycles() {
        let array = Value::new_array(vec![Value::Number(1.0), Value::Null, Value::from("x")]);
        assert_eq!(array.to_js_string(), "1,,x");

        if let Value::Array(items) = &array {
            items.borrow_mut().push(array.clone());
        }
        assert_eq!(array.to_js_string(), "1,,x,");
    }

    #[test]
    fn test_error_object_to_string() {
        let err = Value::new_object(JsObject::error(ErrorKind::TypeError, "boom"));
        assert_eq!(err.to_js_string(), "TypeError: boom");

        let bare = Value::new_object(JsObject::error(ErrorKind::Error, ""));
        assert_eq!(bare.to_js_string(), "Error");

        let plain = Value::new_object(JsObject::new(ObjectClass::Plain));
        assert_eq!(plain.to_js_string(), "[object Object]");
    }

    #[test]
    fn test_equality() {
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        assert!(Value::from("1").loose_equals(&Value::Number(1.0)));
        assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let mut object = JsObject::new(ObjectClass::Plain);
        object.set("b", Value::Number(1.0));
        object.set("a", Value::Number(2.0));
        object.set("b", Value::Number(3.0));

        let keys: Vec<&str> = object.entries().iter().map(|(k, _)| &**k).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(object.get("b").map(Value::to_number), Some(3.0));
    }
}
