//! String, array and number methods
//!
//! `"abc".slice` evaluates to a [`Function::Method`](crate::memory::value::Function)
//! bound to its receiver; calling it lands in [`Interpreter::call_method`].
//!
//! Strings are indexed by `char`. Array callbacks receive `(item, index, array)`
//! and see elements added or removed while iterating, up to the length the
//! array had when the method was called.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{format_number, ArrayRef, Value};
use crate::parser::ast::SourceLocation;
use std::cmp::Ordering;
use std::rc::Rc;

impl Interpreter<'_> {
    pub(crate) fn call_method(
        &mut self,
        receiver: &Value,
        name: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match receiver {
            Value::Str(s) => self.call_string_method(s, name, &args, location),
            Value::Array(items) => self.call_array_method(receiver, items, name, args, location),
            Value::Number(n) => call_number_method(*n, name, &args, location),
            Value::Bool(b) => Ok(Value::from(b.to_string())),
            _ => Err(RuntimeError::type_error(
                format!("{} is not a function", name),
                location,
            )),
        }
    }

    fn call_string_method(
        &mut self,
        s: &Rc<str>,
        name: &str,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        let chars: Vec<char> = s.chars().collect();
        let len = chars.len();
        let substring = |start: usize, end: usize| -> Value {
            if start >= end {
                Value::from("")
            } else {
                Value::from(chars[start..end].iter().collect::<String>())
            }
        };

        let result = match name {
            "at" => match absolute_index(&arg(0), len) {
                Some(i) => Value::from(chars[i].to_string()),
                None => Value::Undefined,
            },
            "charAt" => {
                let i = integer_arg(&arg(0));
                if i >= 0.0 && (i as usize) < len {
                    Value::from(chars[i as usize].to_string())
                } else {
                    Value::from("")
                }
            }
            "charCodeAt" => {
                let i = integer_arg(&arg(0));
                if i >= 0.0 && (i as usize) < len {
                    // First UTF-16 code unit, as for astral chars it is the high surrogate
                    let mut units = [0u16; 2];
                    let unit = chars[i as usize].encode_utf16(&mut units)[0];
                    Value::Number(f64::from(unit))
                } else {
                    Value::Number(f64::NAN)
                }
            }
            "concat" => {
                let mut text = s.to_string();
                for value in args {
                    text.push_str(&value.to_js_string());
                    self.check_string_len(text.len(), location)?;
                }
                Value::from(text)
            }
            "endsWith" => Value::Bool(s.ends_with(&*arg(0).to_js_string())),
            "startsWith" => {
                let start = clamp_index(&arg(1), len, 0);
                let rest: String = chars[start..].iter().collect();
                Value::Bool(rest.starts_with(&*arg(0).to_js_string()))
            }
            "includes" => Value::Bool(s.contains(&*arg(0).to_js_string())),
            "indexOf" => {
                let needle = arg(0).to_js_string();
                let from = clamp_index(&arg(1), len, 0);
                let byte_from = char_to_byte(s, from);
                match s[byte_from..].find(&needle) {
                    Some(pos) => Value::Number(s[..byte_from + pos].chars().count() as f64),
                    None => Value::Number(-1.0),
                }
            }
            "lastIndexOf" => {
                let needle = arg(0).to_js_string();
                match s.rfind(&needle) {
                    Some(pos) => Value::Number(s[..pos].chars().count() as f64),
                    None => Value::Number(-1.0),
                }
            }
            "padEnd" | "padStart" => {
                let target = integer_arg(&arg(0));
                let fill = match arg(1) {
                    Value::Undefined => " ".to_string(),
                    value => value.to_js_string(),
                };
                if target <= len as f64 || fill.is_empty() {
                    Value::Str(Rc::clone(s))
                } else {
                    // Every char takes at least one byte, so this bounds the result before building it
                    if target > self.limits.max_string_len as f64 {
                        return Err(RuntimeError::StringTooLong {
                            limit: self.limits.max_string_len,
                            location,
                        });
                    }
                    let missing = target as usize - len;
                    let padding: String = fill.chars().cycle().take(missing).collect();
                    self.check_string_len(s.len() + padding.len(), location)?;
                    if name == "padEnd" {
                        Value::from(format!("{}{}", s, padding))
                    } else {
                        Value::from(format!("{}{}", padding, s))
                    }
                }
            }
            "repeat" => {
                let count = integer_arg(&arg(0));
                if count < 0.0 || count.is_infinite() {
                    return Err(RuntimeError::range_error(
                        format!("Invalid count value: {}", format_number(count)),
                        location,
                    ));
                }
                let count = count as usize;
                self.check_string_len(s.len().saturating_mul(count), location)?;
                Value::from(s.repeat(count))
            }
            "replace" | "replaceAll" => {
                let pattern = arg(0).to_js_string();
                let replacement = arg(1);
                let mut text = String::new();
                let mut rest: &str = s;
                let mut replaced_any = false;
                while let Some(pos) = rest.find(&pattern) {
                    if replaced_any && name == "replace" {
                        break;
                    }
                    text.push_str(&rest[..pos]);
                    let piece = match &replacement {
                        Value::Function(_) => self
                            .call_value(&replacement, vec![Value::from(pattern.as_str())], location)?
                            .to_js_string(),
                        other => expand_replacement(
                            &other.to_js_string(),
                            &pattern,
                            &s[..s.len() - rest.len() + pos],
                            &rest[pos + pattern.len()..],
                        ),
                    };
                    text.push_str(&piece);
                    self.check_string_len(text.len(), location)?;
                    replaced_any = true;

                    let advance = pos + pattern.len();
                    if pattern.is_empty() {
                        // An empty pattern matches between every character
                        match rest[advance..].chars().next() {
                            Some(c) => {
                                text.push(c);
                                rest = &rest[advance + c.len_utf8()..];
                            }
                            None => {
                                rest = "";
                                break;
                            }
                        }
                    } else {
                        rest = &rest[advance..];
                    }
                }
                text.push_str(rest);
                self.make_string(text, location)?
            }
            "slice" => {
                let start = clamp_index(&arg(0), len, 0);
                let end = clamp_index(&arg(1), len, len);
                substring(start, end)
            }
            "substring" => {
                let clamp = |value: &Value, default: usize| match value {
                    Value::Undefined => default,
                    value => {
                        let n = integer_arg(value);
                        n.max(0.0).min(len as f64) as usize
                    }
                };
                let (a, b) = (clamp(&arg(0), 0), clamp(&arg(1), len));
                substring(a.min(b), a.max(b))
            }
            "split" => {
                let limit = match arg(1) {
                    Value::Undefined => usize::MAX,
                    value => value.to_number().max(0.0) as usize,
                };
                let parts: Vec<Value> = match arg(0) {
                    Value::Undefined => vec![Value::Str(Rc::clone(s))],
                    separator => {
                        let separator = separator.to_js_string();
                        if separator.is_empty() {
                            chars.iter().map(|c| Value::from(c.to_string())).collect()
                        } else {
                            s.split(separator.as_str()).map(Value::from).collect()
                        }
                    }
                };
                self.alloc_array(parts.into_iter().take(limit).collect())
            }
            "toLowerCase" => Value::from(s.to_lowercase()),
            "toUpperCase" => Value::from(s.to_uppercase()),
            "toString" => Value::Str(Rc::clone(s)),
            "trim" => Value::from(s.trim()),
            "trimEnd" => Value::from(s.trim_end()),
            "trimStart" => Value::from(s.trim_start()),
            _ => {
                return Err(RuntimeError::type_error(
                    format!("\"{}\".{} is not a function", s, name),
                    location,
                ))
            }
        };
        Ok(result)
    }

    fn call_array_method(
        &mut self,
        receiver: &Value,
        items: &ArrayRef,
        name: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        let len = items.borrow().len();

        let result = match name {
            "at" => match absolute_index(&arg(0), len) {
                Some(i) => items.borrow()[i].clone(),
                None => Value::Undefined,
            },
            "concat" => {
                let mut combined = items.borrow().clone();
                for value in &args {
                    match value {
                        Value::Array(other) => combined.extend(other.borrow().iter().cloned()),
                        other => combined.push(other.clone()),
                    }
                    self.check_array_len(combined.len(), location)?;
                }
                self.alloc_array(combined)
            }
            "every" | "some" | "find" | "findIndex" | "filter" | "forEach" | "map" => {
                self.iterate_array(receiver, items, name, &arg(0), location)?
            }
            "includes" => {
                let needle = arg(0);
                let found = items.borrow().iter().any(|item| same_value_zero(item, &needle));
                Value::Bool(found)
            }
            "indexOf" => {
                let needle = arg(0);
                let from = clamp_index(&arg(1), len, 0);
                let position = items
                    .borrow()
                    .iter()
                    .skip(from)
                    .position(|item| item.strict_equals(&needle));
                Value::Number(position.map_or(-1.0, |p| (p + from) as f64))
            }
            "join" | "toString" => {
                let separator = match arg(0) {
                    Value::Undefined => ",".to_string(),
                    value if name == "join" => value.to_js_string(),
                    _ => ",".to_string(),
                };
                let text = items
                    .borrow()
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.to_js_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(&separator);
                self.make_string(text, location)?
            }
            "pop" => items.borrow_mut().pop().unwrap_or_default(),
            "push" => {
                self.check_array_len(len + args.len(), location)?;
                let mut items = items.borrow_mut();
                items.extend(args);
                Value::Number(items.len() as f64)
            }
            "reduce" => self.reduce_array(receiver, items, &args, location)?,
            "reverse" => {
                items.borrow_mut().reverse();
                receiver.clone()
            }
            "shift" => {
                let mut items = items.borrow_mut();
                if items.is_empty() {
                    Value::Undefined
                } else {
                    items.remove(0)
                }
            }
            "slice" => {
                let start = clamp_index(&arg(0), len, 0);
                let end = clamp_index(&arg(1), len, len);
                let slice = if start < end {
                    items.borrow()[start..end].to_vec()
                } else {
                    Vec::new()
                };
                self.alloc_array(slice)
            }
            "sort" => {
                let comparator = match arg(0) {
                    Value::Undefined => None,
                    f @ Value::Function(_) => Some(f),
                    _ => {
                        return Err(RuntimeError::type_error(
                            "The comparison function must be either a function or undefined",
                            location,
                        ))
                    }
                };
                let snapshot = items.borrow().clone();
                let sorted = self.sort_values(snapshot, comparator.as_ref(), location)?;
                *items.borrow_mut() = sorted;
                receiver.clone()
            }
            "unshift" => {
                self.check_array_len(len + args.len(), location)?;
                let mut items = items.borrow_mut();
                items.splice(0..0, args);
                Value::Number(items.len() as f64)
            }
            _ => {
                return Err(RuntimeError::type_error(
                    format!("array.{} is not a function", name),
                    location,
                ))
            }
        };
        Ok(result)
    }

    /// The callback-driven array methods
    fn iterate_array(
        &mut self,
        receiver: &Value,
        items: &ArrayRef,
        name: &str,
        callback: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if !matches!(callback, Value::Function(_)) {
            return Err(RuntimeError::type_error(
                format!("{} is not a function", callback.to_js_string()),
                location,
            ));
        }

        let len = items.borrow().len();
        let mut mapped = Vec::new();
        for index in 0..len {
            // The callback may shrink the array
            let item = match items.borrow().get(index) {
                Some(item) => item.clone(),
                None => break,
            };
            let args = vec![item.clone(), Value::Number(index as f64), receiver.clone()];
            let result = self.call_value(callback, args, location)?;

            match name {
                "every" if !result.truthy() => return Ok(Value::Bool(false)),
                "some" if result.truthy() => return Ok(Value::Bool(true)),
                "find" if result.truthy() => return Ok(item),
                "findIndex" if result.truthy() => return Ok(Value::Number(index as f64)),
                "filter" if result.truthy() => mapped.push(item),
                "map" => mapped.push(result),
                _ => {}
            }
        }

        Ok(match name {
            "every" => Value::Bool(true),
            "some" => Value::Bool(false),
            "findIndex" => Value::Number(-1.0),
            "filter" | "map" => self.alloc_array(mapped),
            _ => Value::Undefined,
        })
    }

    fn reduce_array(
        &mut self,
        receiver: &Value,
        items: &ArrayRef,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let callback = args.first().cloned().unwrap_or_default();
        if !matches!(callback, Value::Function(_)) {
            return Err(RuntimeError::type_error(
                format!("{} is not a function", callback.to_js_string()),
                location,
            ));
        }

        let len = items.borrow().len();
        let (mut accumulator, start) = match args.get(1) {
            Some(initial) => (initial.clone(), 0),
            None => match items.borrow().first() {
                Some(first) => (first.clone(), 1),
                None => {
                    return Err(RuntimeError::type_error(
                        "Reduce of empty array with no initial value",
                        location,
                    ))
                }
            },
        };

        for index in start..len {
            let item = match items.borrow().get(index) {
                Some(item) => item.clone(),
                None => break,
            };
            let args = vec![
                accumulator,
                item,
                Value::Number(index as f64),
                receiver.clone(),
            ];
            accumulator = self.call_value(&callback, args, location)?;
        }
        Ok(accumulator)
    }

    /// Stable merge sort; the comparator may fail, so `slice::sort_by` is out
    fn sort_values(
        &mut self,
        mut items: Vec<Value>,
        comparator: Option<&Value>,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        if items.len() <= 1 {
            return Ok(items);
        }
        let right = items.split_off(items.len() / 2);
        let left = self.sort_values(items, comparator, location)?;
        let right = self.sort_values(right, comparator, location)?;

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();
        loop {
            let take_right = match (left.peek(), right.peek()) {
                (Some(a), Some(b)) => {
                    self.sort_order(a, b, comparator, location)? == Ordering::Greater
                }
                (Some(_), None) => false,
                (None, Some(_)) => true,
                (None, None) => break,
            };
            let next = if take_right { right.next() } else { left.next() };
            merged.extend(next);
        }
        Ok(merged)
    }

    fn sort_order(
        &mut self,
        a: &Value,
        b: &Value,
        comparator: Option<&Value>,
        location: SourceLocation,
    ) -> Result<Ordering, RuntimeError> {
        // undefined always sorts last
        match (a, b) {
            (Value::Undefined, Value::Undefined) => return Ok(Ordering::Equal),
            (Value::Undefined, _) => return Ok(Ordering::Greater),
            (_, Value::Undefined) => return Ok(Ordering::Less),
            _ => {}
        }

        match comparator {
            Some(compare) => {
                let n = self
                    .call_value(compare, vec![a.clone(), b.clone()], location)?
                    .to_number();
                Ok(n.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
            }
            None => Ok(a.to_js_string().cmp(&b.to_js_string())),
        }
    }
}

fn call_number_method(
    n: f64,
    name: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let arg = args.first().cloned().unwrap_or_default();
    match name {
        "toFixed" => {
            let digits = integer_arg(&arg);
            if !(0.0..=100.0).contains(&digits) {
                return Err(RuntimeError::range_error(
                    "toFixed() digits argument must be between 0 and 100",
                    location,
                ));
            }
            if !n.is_finite() || n.abs() >= 1e21 {
                return Ok(Value::from(format_number(n)));
            }
            let n = if n == 0.0 { 0.0 } else { n };
            Ok(Value::from(format!("{:.*}", digits as usize, n)))
        }
        _ => {
            let radix = match arg {
                Value::Undefined => 10.0,
                value => integer_arg(&value),
            };
            if !(2.0..=36.0).contains(&radix) {
                return Err(RuntimeError::range_error(
                    "toString() radix must be between 2 and 36",
                    location,
                ));
            }
            Ok(Value::from(number_to_radix(n, radix as u32)))
        }
    }
}

/// `Number.prototype.toString(radix)`
fn number_to_radix(n: f64, radix: u32) -> String {
    if radix == 10 || !n.is_finite() {
        return format_number(n);
    }

    let negative = n < 0.0;
    let n = n.abs();
    let mut int_part = n.trunc();
    let mut fraction = n - int_part;

    let mut digits = Vec::new();
    loop {
        let digit = (int_part % f64::from(radix)) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        int_part = (int_part / f64::from(radix)).trunc();
        if int_part < 1.0 {
            break;
        }
    }
    let mut text: String = digits.iter().rev().collect();

    if fraction > 0.0 {
        text.push('.');
        for _ in 0..20 {
            fraction *= f64::from(radix);
            let digit = fraction.trunc() as u32;
            text.push(std::char::from_digit(digit, radix).unwrap_or('0'));
            fraction -= fraction.trunc();
            if fraction == 0.0 {
                break;
            }
        }
    }

    if negative {
        format!("-{}", text)
    } else {
        text
    }
}

/// `ToIntegerOrInfinity`
/// Expand `$$`, `$&`, `` $` `` and `$'` in a replacement string. Other `$`
/// sequences are kept as written; a string pattern has no capture groups.
fn expand_replacement(template: &str, matched: &str, before: &str, after: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => out.push('$'),
            Some('&') => out.push_str(matched),
            Some('`') => out.push_str(before),
            Some('\'') => out.push_str(after),
            _ => {
                out.push('$');
                continue;
            }
        }
        chars.next();
    }
    out
}

fn integer_arg(value: &Value) -> f64 {
    let n = value.to_number();
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Resolve a relative index (negative counts from the end) clamped to `0..=len`
fn clamp_index(value: &Value, len: usize, default: usize) -> usize {
    if matches!(value, Value::Undefined) {
        return default;
    }
    let n = integer_arg(value);
    if n < 0.0 {
        (len as f64 + n).max(0.0) as usize
    } else {
        n.min(len as f64) as usize
    }
}

/// Index for `at()`: negative counts from the end, out of range is `None`
fn absolute_index(value: &Value, len: usize) -> Option<usize> {
    let n = integer_arg(value);
    let index = if n < 0.0 { len as f64 + n } else { n };
    if index >= 0.0 && index < len as f64 {
        Some(index as usize)
    } else {
        None
    }
}

fn char_to_byte(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(byte, _)| byte)
}

/// Equality used by `includes`: like `===` but NaN matches NaN
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

#[cfg(test)]
mod tests {
    use crate::console::Transcript;
    use crate::interpreter::engine::{Interpreter, Limits};
    use crate::interpreter::errors::RuntimeError;
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
    fn test_reverse_string_idiom() {
        assert_eq!(eval("'hello'.split('').reverse().join('')"), "olleh");
    }

    #[test]
    fn test_string_methods() {
        assert_eq!(eval("'Hello'.charAt(1)"), "e");
        assert_eq!(eval("'Hello'.indexOf('l')"), "2");
        assert_eq!(eval("'Hello'.lastIndexOf('l')"), "3");
        assert_eq!(eval("'Hello'.slice(-3)"), "llo");
        assert_eq!(eval("'Hello'.substring(4, 1)"), "ell");
        assert_eq!(eval("'  pad '.trim().toUpperCase()"), "PAD");
        assert_eq!(eval("'ab'.repeat(3)"), "ababab");
        assert_eq!(eval("'5'.padStart(3, '0')"), "005");
        assert_eq!(eval("'a-b-c'.replace('-', '+')"), "a+b-c");
        assert_eq!(eval("'a-b-c'.replaceAll('-', '+')"), "a+b+c");
        assert_eq!(eval("'a,b,,c'.split(',').length"), "4");
        assert_eq!(eval("'héllo'.length"), "5");
    }

    #[test]
    fn test_array_mutators_share_the_array() {
        let source = "const a = [1, 2];\nconst b = a;\nb.push(3, 4);\na.shift();\na.unshift(0);\na.join('-')";
        assert_eq!(eval(source), "0-2-3-4");
    }

    #[test]
    fn test_array_higher_order_methods() {
        assert_eq!(eval("[1, 2, 3].map(x => x * 2).join()"), "2,4,6");
        assert_eq!(eval("[1, 2, 3, 4].filter(x => x % 2 === 0).join()"), "2,4");
        assert_eq!(eval("[1, 2, 3].reduce((sum, x) => sum + x, 10)"), "16");
        assert_eq!(eval("[1, 2, 3].reduce((sum, x) => sum + x)"), "6");
        assert_eq!(eval("[5, 12, 8].find(x => x > 6)"), "12");
        assert_eq!(eval("[5, 12, 8].findIndex(x => x > 100)"), "-1");
        assert_eq!(eval("[1, 2].some(x => x > 1) && [1, 2].every(x => x > 0)"), "true");
        assert_eq!(eval("let s = 0; [1, 2, 3].forEach((x, i) => { s += x * i; }); s"), "8");
    }

    #[test]
    fn test_reduce_empty_array_throws() {
        let source = "try { [].reduce((a, b) => a + b); } catch (e) { e.message; }";
        assert_eq!(eval(source), "Reduce of empty array with no initial value");
    }

    #[test]
    fn test_sort() {
        assert_eq!(eval("[10, 9, 1, 100].sort().join()"), "1,10,100,9");
        assert_eq!(eval("[10, 9, 1, 100].sort((a, b) => a - b).join()"), "1,9,10,100");
        assert_eq!(eval("[3, undefined, 1].sort().length"), "3");
    }

    #[test]
    fn test_includes_and_index_of() {
        assert_eq!(eval("[NaN].includes(NaN)"), "true");
        assert_eq!(eval("[NaN].indexOf(NaN)"), "-1");
        assert_eq!(eval("[1, 2, 1].indexOf(1, 1)"), "2");
    }

    #[test]
    fn test_number_methods() {
        assert_eq!(eval("(3.14159).toFixed(2)"), "3.14");
        assert_eq!(eval("(255).toString(16)"), "ff");
        assert_eq!(eval("(-5).toString(2)"), "-101");
        assert_eq!(eval("true.toString()"), "true");
    }

    fn run_with(source: &str, limits: Limits) -> Result<String, RuntimeError> {
        let program = parse_source(source).unwrap();
        let mut transcript = Transcript::new();
        let mut interpreter = Interpreter::new(&mut transcript, limits);
        let value = interpreter.run(&program)?;
        Ok(value.to_js_string())
    }

    #[test]
    fn test_padding_is_bounded_before_building() {
        let err = run_with("'a'.padStart(Infinity)", Limits::default()).unwrap_err();
        assert!(matches!(err, RuntimeError::StringTooLong { .. }));

        let small = Limits {
            max_string_len: 64,
            ..Limits::default()
        };
        let err = run_with("'a'.padEnd(4e8, 'xy')", small).unwrap_err();
        assert!(matches!(err, RuntimeError::StringTooLong { limit: 64, .. }));

        assert_eq!(eval("'7'.padStart(3, '0') + '|' + 'ab'.padEnd(5, 'xy')"), "007|abxyx");
    }

    #[test]
    fn test_char_code_at_returns_utf16_units() {
        assert_eq!(eval("'A'.charCodeAt(0)"), "65");
        assert_eq!(eval("'é'.charCodeAt(0)"), "233");
        assert_eq!(eval("'😀'.charCodeAt(0)"), "55357");
    }

    #[test]
    fn test_replacement_patterns() {
        assert_eq!(eval("'aXbX'.replace('X', '$&$&')"), "aXXbX");
        assert_eq!(eval("'aXbX'.replaceAll('X', '[$`]')"), "a[a]b[aXb]");
        assert_eq!(eval("'abc'.replace('b', \"$'\")"), "acc");
        assert_eq!(eval("'abc'.replace('b', '$$')"), "a$c");
        assert_eq!(eval("'abc'.replace('b', '$1')"), "a$1c");
    }
}
