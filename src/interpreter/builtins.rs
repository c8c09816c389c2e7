//! Built-in function implementations
//!
//! This module provides the sandbox's global library. It is the only
//! capability scripts get: there is no filesystem, network, process or timer
//! access.
//!
//! # Supported Built-ins
//!
//! - `console.log(...)`: appends one line to the run's output sink
//! - `console.info/warn/error(...)`: forwarded to the host log, never captured
//! - `Math.*`: `abs floor ceil round trunc sign sqrt pow min max`, `PI`, `E`
//! - Conversions: `String`, `Number`, `Boolean`, `parseInt`, `parseFloat`, `isNaN`
//! - `Array.isArray`, `Object.keys/values/entries`, `JSON.stringify`
//! - Error constructors: `Error`, `TypeError`, `RangeError`, `ReferenceError`,
//!   `SyntaxError` (with or without `new`)
//!
//! # Implementation Notes
//!
//! - All built-ins are methods on the [`Interpreter`] struct
//! - Builtins are plain values in the global scope, so scripts can shadow them
//! - String and array methods live in [`super::methods`]

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::binary::js_pow;
use crate::memory::value::{format_number, ErrorKind, Function, JsObject, ObjectClass, Value};
use crate::parser::ast::SourceLocation;
use std::rc::Rc;

/// Native functions exposed to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    ConsoleLog,
    ConsoleInfo,
    ConsoleWarn,
    ConsoleError,
    MathAbs,
    MathFloor,
    MathCeil,
    MathRound,
    MathTrunc,
    MathSign,
    MathSqrt,
    MathPow,
    MathMin,
    MathMax,
    StringFn,
    NumberFn,
    BooleanFn,
    ParseInt,
    ParseFloat,
    IsNaN,
    ArrayIsArray,
    ObjectKeys,
    ObjectValues,
    ObjectEntries,
    JsonStringify,
    ErrorCtor(ErrorKind),
}

impl Builtin {
    /// The function's `name` property
    pub fn name(self) -> &'static str {
        match self {
            Builtin::ConsoleLog => "log",
            Builtin::ConsoleInfo => "info",
            Builtin::ConsoleWarn => "warn",
            Builtin::ConsoleError => "error",
            Builtin::MathAbs => "abs",
            Builtin::MathFloor => "floor",
            Builtin::MathCeil => "ceil",
            Builtin::MathRound => "round",
            Builtin::MathTrunc => "trunc",
            Builtin::MathSign => "sign",
            Builtin::MathSqrt => "sqrt",
            Builtin::MathPow => "pow",
            Builtin::MathMin => "min",
            Builtin::MathMax => "max",
            Builtin::StringFn => "String",
            Builtin::NumberFn => "Number",
            Builtin::BooleanFn => "Boolean",
            Builtin::ParseInt => "parseInt",
            Builtin::ParseFloat => "parseFloat",
            Builtin::IsNaN => "isNaN",
            Builtin::ArrayIsArray => "isArray",
            Builtin::ObjectKeys => "keys",
            Builtin::ObjectValues => "values",
            Builtin::ObjectEntries => "entries",
            Builtin::JsonStringify => "stringify",
            Builtin::ErrorCtor(kind) => kind.name(),
        }
    }

    /// Whether `new` may be applied
    pub fn is_constructor(self) -> bool {
        matches!(self, Builtin::ErrorCtor(_))
    }
}

fn builtin_value(builtin: Builtin) -> Value {
    Value::Function(Rc::new(Function::Builtin(builtin)))
}

fn namespace(members: &[(&str, Value)]) -> Value {
    let mut object = JsObject::new(ObjectClass::Plain);
    for (name, value) in members {
        object.set(name, value.clone());
    }
    Value::new_object(object)
}

impl Interpreter<'_> {
    /// Populate the global scope
    pub(crate) fn install_globals(&mut self) {
        let globals = Rc::clone(&self.globals);
        let console = namespace(&[
            ("log", builtin_value(Builtin::ConsoleLog)),
            ("info", builtin_value(Builtin::ConsoleInfo)),
            ("warn", builtin_value(Builtin::ConsoleWarn)),
            ("error", builtin_value(Builtin::ConsoleError)),
        ]);
        let math = namespace(&[
            ("abs", builtin_value(Builtin::MathAbs)),
            ("floor", builtin_value(Builtin::MathFloor)),
            ("ceil", builtin_value(Builtin::MathCeil)),
            ("round", builtin_value(Builtin::MathRound)),
            ("trunc", builtin_value(Builtin::MathTrunc)),
            ("sign", builtin_value(Builtin::MathSign)),
            ("sqrt", builtin_value(Builtin::MathSqrt)),
            ("pow", builtin_value(Builtin::MathPow)),
            ("min", builtin_value(Builtin::MathMin)),
            ("max", builtin_value(Builtin::MathMax)),
            ("PI", Value::Number(std::f64::consts::PI)),
            ("E", Value::Number(std::f64::consts::E)),
        ]);
        let array = namespace(&[("isArray", builtin_value(Builtin::ArrayIsArray))]);
        let object = namespace(&[
            ("keys", builtin_value(Builtin::ObjectKeys)),
            ("values", builtin_value(Builtin::ObjectValues)),
            ("entries", builtin_value(Builtin::ObjectEntries)),
        ]);
        let json = namespace(&[("stringify", builtin_value(Builtin::JsonStringify))]);

        let globals_table = [
            ("console", console),
            ("Math", math),
            ("Array", array),
            ("Object", object),
            ("JSON", json),
            ("String", builtin_value(Builtin::StringFn)),
            ("Number", builtin_value(Builtin::NumberFn)),
            ("Boolean", builtin_value(Builtin::BooleanFn)),
            ("parseInt", builtin_value(Builtin::ParseInt)),
            ("parseFloat", builtin_value(Builtin::ParseFloat)),
            ("isNaN", builtin_value(Builtin::IsNaN)),
            ("NaN", Value::Number(f64::NAN)),
            ("Infinity", Value::Number(f64::INFINITY)),
        ];
        for (name, value) in globals_table {
            self.allocations.value(&value);
            globals.declare(name, value, true);
        }

        for kind in [
            ErrorKind::Error,
            ErrorKind::TypeError,
            ErrorKind::RangeError,
            ErrorKind::ReferenceError,
            ErrorKind::SyntaxError,
        ] {
            globals.declare(kind.name(), builtin_value(Builtin::ErrorCtor(kind)), true);
        }
    }

    pub(crate) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        let num = |i: usize| arg(i).to_number();

        let result = match builtin {
            Builtin::ConsoleLog => {
                let line = join_console_args(&args);
                self.check_string_len(line.len(), location)?;
                self.emit_line(&line, location)?;
                Value::Undefined
            }
            Builtin::ConsoleInfo => {
                log::info!(target: "script", "{}", join_console_args(&args));
                Value::Undefined
            }
            Builtin::ConsoleWarn => {
                log::warn!(target: "script", "{}", join_console_args(&args));
                Value::Undefined
            }
            Builtin::ConsoleError => {
                log::error!(target: "script", "{}", join_console_args(&args));
                Value::Undefined
            }

            Builtin::MathAbs => Value::Number(num(0).abs()),
            Builtin::MathFloor => Value::Number(num(0).floor()),
            Builtin::MathCeil => Value::Number(num(0).ceil()),
            Builtin::MathRound => Value::Number(js_round(num(0))),
            Builtin::MathTrunc => Value::Number(num(0).trunc()),
            Builtin::MathSign => {
                let n = num(0);
                Value::Number(if n.is_nan() || n == 0.0 { n } else { n.signum() })
            }
            Builtin::MathSqrt => Value::Number(num(0).sqrt()),
            Builtin::MathPow => Value::Number(js_pow(num(0), num(1))),
            Builtin::MathMin => Value::Number(fold_numbers(&args, f64::INFINITY, f64::min)),
            Builtin::MathMax => Value::Number(fold_numbers(&args, f64::NEG_INFINITY, f64::max)),

            Builtin::StringFn => match args.first() {
                Some(value) => Value::from(value.to_js_string()),
                None => Value::from(""),
            },
            Builtin::NumberFn => match args.first() {
                Some(value) => Value::Number(value.to_number()),
                None => Value::Number(0.0),
            },
            Builtin::BooleanFn => Value::Bool(arg(0).truthy()),
            Builtin::ParseInt => {
                let radix = match arg(1) {
                    Value::Undefined => None,
                    radix => Some(radix.to_number()),
                };
                Value::Number(parse_int(&arg(0).to_js_string(), radix))
            }
            Builtin::ParseFloat => Value::Number(parse_float(&arg(0).to_js_string())),
            Builtin::IsNaN => Value::Bool(num(0).is_nan()),

            Builtin::ArrayIsArray => Value::Bool(matches!(arg(0), Value::Array(_))),
            Builtin::ObjectKeys | Builtin::ObjectValues | Builtin::ObjectEntries => {
                let target = arg(0);
                if target.is_nullish() {
                    return Err(RuntimeError::type_error(
                        "Cannot convert undefined or null to object",
                        location,
                    ));
                }
                let keys = self.property_keys(&target);
                let mut items = Vec::with_capacity(keys.len());
                for key in keys {
                    let item = match builtin {
                        Builtin::ObjectKeys => Value::from(key),
                        Builtin::ObjectValues => self.get_property(&target, &key, location)?,
                        _ => {
                            let value = self.get_property(&target, &key, location)?;
                            self.alloc_array(vec![Value::from(key), value])
                        }
                    };
                    items.push(item);
                }
                self.alloc_array(items)
            }
            Builtin::JsonStringify => {
                let indent = json_indent(&arg(2));
                let mut stack = Vec::new();
                match self.json_serialize(&arg(0), &indent, "", &mut stack, location)? {
                    Some(text) => self.make_string(text, location)?,
                    None => Value::Undefined,
                }
            }

            Builtin::ErrorCtor(kind) => {
                let message = match arg(0) {
                    Value::Undefined => String::new(),
                    value => value.to_js_string(),
                };
                self.alloc_object(JsObject::error(kind, &message))
            }
        };
        Ok(result)
    }

    /// Serialize `value` as JSON. `None` stands for "no JSON representation"
    /// (undefined and functions), which arrays print as `null` and objects skip.
    fn json_serialize(
        &self,
        value: &Value,
        indent: &str,
        current: &str,
        stack: &mut Vec<*const ()>,
        location: SourceLocation,
    ) -> Result<Option<String>, RuntimeError> {
        let text = match value {
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) if n.is_finite() => format_number(*n),
            Value::Number(_) => "null".to_string(),
            Value::Str(s) => json_quote(s),

            Value::Array(items) => {
                let ptr = Rc::as_ptr(items) as *const ();
                self.enter_json_container(ptr, stack, location)?;
                let inner = format!("{}{}", current, indent);
                let items = items.borrow().clone();
                let mut parts = Vec::with_capacity(items.len());
                for item in &items {
                    let part = self.json_serialize(item, indent, &inner, stack, location)?;
                    parts.push(part.unwrap_or_else(|| "null".to_string()));
                }
                stack.pop();
                json_wrap('[', ']', &parts, indent, current)
            }

            Value::Object(object) => {
                let ptr = Rc::as_ptr(object) as *const ();
                self.enter_json_container(ptr, stack, location)?;
                let inner = format!("{}{}", current, indent);
                let (class, entries) = {
                    let object = object.borrow();
                    (object.class, object.entries().to_vec())
                };
                let separator = if indent.is_empty() { ":" } else { ": " };
                let mut parts = Vec::with_capacity(entries.len());
                for (key, item) in &entries {
                    // An error's message is not an enumerable property
                    if matches!(class, ObjectClass::Error(_)) && &**key == "message" {
                        continue;
                    }
                    if let Some(part) = self.json_serialize(item, indent, &inner, stack, location)? {
                        parts.push(format!("{}{}{}", json_quote(key), separator, part));
                    }
                }
                stack.pop();
                json_wrap('{', '}', &parts, indent, current)
            }
        };
        self.check_string_len(text.len(), location)?;
        Ok(Some(text))
    }

    fn enter_json_container(
        &self,
        ptr: *const (),
        stack: &mut Vec<*const ()>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if stack.contains(&ptr) {
            return Err(RuntimeError::type_error(
                "Converting circular structure to JSON",
                location,
            ));
        }
        stack.push(ptr);
        Ok(())
    }
}

/// `console.log` joins its arguments with spaces; null and undefined print as
/// nothing, like `Array.prototype.join`.
fn join_console_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| {
            if arg.is_nullish() {
                String::new()
            } else {
                arg.to_js_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_numbers(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for arg in args {
        let n = arg.to_number();
        if n.is_nan() {
            return f64::NAN;
        }
        acc = pick(acc, n);
    }
    acc
}

/// `Math.round`: halves round toward +Infinity
fn js_round(n: f64) -> f64 {
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

pub(crate) fn parse_int(text: &str, radix: Option<f64>) -> f64 {
    let text = text.trim_start();
    let (negative, mut digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let mut radix = match radix {
        Some(r) if r.is_finite() && r.trunc() != 0.0 => r.trunc() as i64,
        _ => 0,
    };
    if radix == 0 || radix == 16 {
        if let Some(rest) = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            digits = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }
    if !(2..=36).contains(&radix) {
        return f64::NAN;
    }

    let radix = radix as u32;
    let mut value: Option<f64> = None;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = Some(value.unwrap_or(0.0) * f64::from(radix) + f64::from(d)),
            None => break,
        }
    }

    match value {
        Some(v) if negative => -v,
        Some(v) => v,
        None => f64::NAN,
    }
}

pub(crate) fn parse_float(text: &str) -> f64 {
    let text = text.trim_start();
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    if body.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = body.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    body[..end]
        .parse::<f64>()
        .map(|v| sign * v)
        .unwrap_or(f64::NAN)
}

fn json_indent(space: &Value) -> String {
    match space {
        Value::Number(n) if *n >= 1.0 => " ".repeat(n.min(10.0) as usize),
        Value::Str(s) => s.chars().take(10).collect(),
        _ => String::new(),
    }
}

fn json_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn json_wrap(open: char, close: char, parts: &[String], indent: &str, current: &str) -> String {
    if parts.is_empty() {
        return format!("{}{}", open, close);
    }
    if indent.is_empty() {
        return format!("{}{}{}", open, parts.join(","), close);
    }
    let inner = format!("{}{}", current, indent);
    let separator = format!(",\n{}", inner);
    format!(
        "{}\n{}{}\n{}{}",
        open,
        inner,
        parts.join(&separator),
        current,
        close
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Transcript;
    use crate::interpreter::engine::Limits;
    use crate::parser::parser::parse_source;

    fn run(source: &str) -> (String, String) {
        let program = parse_source(source).unwrap();
        let mut transcript = Transcript::new();
        let value = Interpreter::new(&mut transcript, Limits::default())
            .run(&program)
            .unwrap()
            .to_js_string();
        (value, transcript.into_string())
    }

    #[test]
    fn test_console_log_joins_arguments() {
        let (_, output) = run("console.log('a', 1, true, [1, 2], null, undefined, 'z')");
        assert_eq!(output, "a 1 true 1,2   z\n");
    }

    #[test]
    fn test_console_warn_is_not_captured() {
        let (_, output) = run("console.warn('careful'); console.error('bad'); console.info('fyi')");
        assert_eq!(output, "");
    }

    #[test]
    fn test_math_functions() {
        assert_eq!(run("Math.max(3, 9, 2)").0, "9");
        assert_eq!(run("Math.min()").0, "Infinity");
        assert_eq!(run("Math.round(2.5)").0, "3");
        assert_eq!(run("Math.round(-2.5)").0, "-2");
        assert_eq!(run("Math.sign(-4)").0, "-1");
        assert_eq!(run("Math.floor(Math.PI * 100)").0, "314");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(parse_int("  42px", None), 42.0);
        assert_eq!(parse_int("0x1f", None), 31.0);
        assert_eq!(parse_int("101", Some(2.0)), 5.0);
        assert_eq!(parse_int("-7.9", None), -7.0);
        assert!(parse_int("px", None).is_nan());
        assert_eq!(parse_float("3.14abc"), 3.14);
        assert_eq!(parse_float("1e3x"), 1000.0);
        assert_eq!(parse_float("2e"), 2.0);
        assert!(parse_float(".").is_nan());
        assert_eq!(run("String(null) + Number('12') + Boolean('')").0, "null12false");
    }

    #[test]
    fn test_object_helpers() {
        let (value, _) = run("const o = { b: 1, a: 2 }; Object.keys(o).join('|') + ';' + Object.entries(o).join('|')");
        assert_eq!(value, "b|a;b,1|a,2");
    }

    #[test]
    fn test_json_stringify() {
        assert_eq!(
            run("JSON.stringify({ a: [1, 'x', null, undefined], b: { c: true }, f: () => 1 })").0,
            r#"{"a":[1,"x",null,null],"b":{"c":true}}"#
        );
        assert_eq!(run("JSON.stringify([1, [2]], null, 2)").0, "[\n  1,\n  [\n    2\n  ]\n]");
        assert_eq!(run("JSON.stringify('a\"b')").0, r#""a\"b""#);
        assert_eq!(run("typeof JSON.stringify(undefined)").0, "undefined");
    }

    #[test]
    fn test_json_stringify_cycle_throws() {
        let (value, _) = run(
            "const a = []; a.push(a);\n\
             try { JSON.stringify(a); } catch (e) { e.name + ': ' + e.message; }",
        );
        assert_eq!(value, "TypeError: Converting circular structure to JSON");
    }

    #[test]
    fn test_error_constructors() {
        let (value, _) = run("const e = new RangeError('too big'); [e.name, e.message, String(e)].join('|')");
        assert_eq!(value, "RangeError|too big|RangeError: too big");
        assert_eq!(run("Error('plain').message").0, "plain");
    }
}
