use crate::interpreter::constants::{ARRAY_METHODS, NUMBER_METHODS, STRING_METHODS};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Function, Value};
use crate::parser::ast::SourceLocation;
use std::rc::Rc;

impl Interpreter<'_> {
    /// Read `object[key]`
    pub(crate) fn get_property(
        &self,
        object: &Value,
        key: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let value = match object {
            Value::Undefined | Value::Null => {
                return Err(RuntimeError::type_error(
                    format!(
                        "Cannot read properties of {} (reading '{}')",
                        object.to_js_string(),
                        key
                    ),
                    location,
                ))
            }

            Value::Str(s) => {
                if key == "length" {
                    Value::Number(s.chars().count() as f64)
                } else if let Some(index) = array_index(key) {
                    s.chars()
                        .nth(index)
                        .map(|c| Value::from(c.to_string()))
                        .unwrap_or_default()
                } else if STRING_METHODS.contains(&key) {
                    bound_method(object, key)
                } else {
                    Value::Undefined
                }
            }

            Value::Array(items) => {
                if key == "length" {
                    Value::Number(items.borrow().len() as f64)
                } else if let Some(index) = array_index(key) {
                    items.borrow().get(index).cloned().unwrap_or_default()
                } else if ARRAY_METHODS.contains(&key) {
                    bound_method(object, key)
                } else {
                    Value::Undefined
                }
            }

            Value::Object(properties) => {
                let properties = properties.borrow();
                match (properties.get(key), properties.error_name()) {
                    (Some(value), _) => value.clone(),
                    (None, Some(name)) if key == "name" => Value::from(name),
                    _ => Value::Undefined,
                }
            }

            Value::Function(function) => match (key, function.as_ref()) {
                ("name", function) => Value::from(function.name()),
                ("length", Function::Closure { def, .. }) => Value::Number(def.params.len() as f64),
                _ => Value::Undefined,
            },

            Value::Number(_) if NUMBER_METHODS.contains(&key) => bound_method(object, key),
            Value::Bool(_) if key == "toString" => bound_method(object, key),
            Value::Number(_) | Value::Bool(_) => Value::Undefined,
        };
        Ok(value)
    }

    /// Write `object[key] = value`
    pub(crate) fn set_property(
        &mut self,
        object: &Value,
        key: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match object {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(
                format!(
                    "Cannot set properties of {} (setting '{}')",
                    object.to_js_string(),
                    key
                ),
                location,
            )),

            Value::Array(items) => {
                if key == "length" {
                    let len = value.to_number();
                    if len < 0.0 || len.fract() != 0.0 || !len.is_finite() {
                        return Err(RuntimeError::range_error("Invalid array length", location));
                    }
                    self.check_array_len(len as usize, location)?;
                    items.borrow_mut().resize(len as usize, Value::Undefined);
                } else if let Some(index) = array_index(key) {
                    self.check_array_len(index + 1, location)?;
                    let mut items = items.borrow_mut();
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                }
                // Named properties on arrays are not kept
                Ok(())
            }

            Value::Object(properties) => {
                properties.borrow_mut().set(key, value);
                Ok(())
            }

            // Primitives and functions silently drop the write
            _ => Ok(()),
        }
    }

    /// Convert a computed member key (`obj[key]`) to its property name
    pub(crate) fn property_key(key: &Value) -> String {
        key.to_js_string()
    }

    /// Enumerable keys in iteration order, as `for...in` and `Object.keys` see them
    pub(crate) fn property_keys(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Object(properties) => properties
                .borrow()
                .entries()
                .iter()
                .map(|(key, _)| key.to_string())
                .collect(),
            Value::Array(items) => (0..items.borrow().len()).map(|i| i.to_string()).collect(),
            Value::Str(s) => (0..s.chars().count()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Parse a canonical array index ("0", "17"; not "01" or "-1")
pub(crate) fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

fn bound_method(receiver: &Value, name: &str) -> Value {
    Value::Function(Rc::new(Function::Method {
        receiver: receiver.clone(),
        name: Rc::from(name),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("42"), Some(42));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("1.5"), None);
        assert_eq!(array_index("length"), None);
    }
}
