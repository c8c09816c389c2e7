use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, SourceLocation};
use std::cmp::Ordering;

impl Interpreter<'_> {
    /// Apply a (non-short-circuiting) binary operator to two evaluated operands
    pub(crate) fn binary_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        Ok(match op {
            BinOp::Add => return self.add_values(left, right, location),
            BinOp::Sub => Value::Number(left.to_number() - right.to_number()),
            BinOp::Mul => Value::Number(left.to_number() * right.to_number()),
            BinOp::Div => Value::Number(left.to_number() / right.to_number()),
            // f64 `%` truncates like JS: the sign follows the dividend
            BinOp::Mod => Value::Number(left.to_number() % right.to_number()),
            BinOp::Pow => Value::Number(js_pow(left.to_number(), right.to_number())),
            BinOp::Eq => Value::Bool(left.loose_equals(right)),
            BinOp::Ne => Value::Bool(!left.loose_equals(right)),
            BinOp::StrictEq => Value::Bool(left.strict_equals(right)),
            BinOp::StrictNe => Value::Bool(!left.strict_equals(right)),
            BinOp::Lt => Value::Bool(compare_values(left, right) == Some(Ordering::Less)),
            BinOp::Gt => Value::Bool(compare_values(left, right) == Some(Ordering::Greater)),
            BinOp::Le => Value::Bool(matches!(
                compare_values(left, right),
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinOp::Ge => Value::Bool(matches!(
                compare_values(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            )),
        })
    }

    /// `+`: string concatenation when either side is (or converts to) a string
    fn add_values(
        &self,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let concatenates = |value: &Value| {
            matches!(
                value,
                Value::Str(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
            )
        };

        if concatenates(left) || concatenates(right) {
            let left = left.to_js_string();
            let right = right.to_js_string();
            self.check_string_len(left.len() + right.len(), location)?;
            let mut text = String::with_capacity(left.len() + right.len());
            text.push_str(&left);
            text.push_str(&right);
            return Ok(Value::from(text));
        }

        Ok(Value::Number(left.to_number() + right.to_number()))
    }
}

/// Relational comparison: strings compare lexicographically, everything
/// else numerically. `None` means "unordered" (a NaN was involved).
pub(crate) fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    let as_string = |value: &Value| match value {
        Value::Str(s) => Some(s.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_js_string()),
        _ => None,
    };

    if let (Some(a), Some(b)) = (as_string(left), as_string(right)) {
        return Some(a.cmp(&b));
    }
    left.to_number().partial_cmp(&right.to_number())
}

/// `**` with the cases where JS and `powf` disagree
pub(crate) fn js_pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values() {
        assert_eq!(
            compare_values(&Value::from("10"), &Value::from("9")),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::from("10"), &Value::Number(9.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&Value::Number(f64::NAN), &Value::Number(1.0)),
            None
        );
    }

    #[test]
    fn test_js_pow_edge_cases() {
        assert_eq!(js_pow(2.0, 10.0), 1024.0);
        assert_eq!(js_pow(f64::NAN, 0.0), 1.0);
        assert!(js_pow(1.0, f64::INFINITY).is_nan());
    }
}
