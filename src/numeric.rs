use std::cmp::Ordering;

use crate::{
    conversions::float_to_int,
    diagnostics::{HythonError, Result},
    iter::not_iterable,
    stdlib::{Arity, Builtins, CallContext, args::expect_int, native},
    types::Number,
    value::Value,
};

pub(crate) fn install(builtins: &mut Builtins) {
    builtins.define(native("abs", Arity::Exact(1), math_abs));
    builtins.define(native("min", Arity::AtLeast(1), math_min));
    builtins.define(native("max", Arity::AtLeast(1), math_max));
    builtins.define(native("sum", Arity::Between(1, 2), math_sum));
    builtins.define(native("pow", Arity::Exact(2), math_pow));
    builtins.define(native("sqrt", Arity::Exact(1), math_sqrt));
    builtins.define(native("round", Arity::Between(1, 2), math_round));
}

fn expect_number(value: &Value, name: &str) -> Result<Number> {
    Number::of(value).ok_or_else(|| {
        HythonError::type_mismatch(format!(
            "{name}() expected a number but found '{}'",
            value.type_name()
        ))
    })
}

fn overflow(name: &str) -> HythonError {
    HythonError::value_error(format!("{name}() result does not fit in a 64-bit integer"))
}

/// Addition over the numeric tower: two integers stay integral, anything
/// involving a float widens.
pub(crate) fn add_numbers(left: Number, right: Number) -> Result<Value> {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => a
            .checked_add(b)
            .map(Value::int)
            .ok_or_else(|| HythonError::value_error("integer addition overflowed")),
        (a, b) => Ok(Value::float(a.as_f64() + b.as_f64())),
    }
}

fn math_abs(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    match expect_number(&args[0], "abs")? {
        Number::Int(n) => n.checked_abs().map(Value::int).ok_or_else(|| overflow("abs")),
        Number::Float(f) => Ok(Value::float(f.abs())),
    }
}

fn math_min(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    extremum(args, "min", Ordering::Less)
}

fn math_max(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    extremum(args, "max", Ordering::Greater)
}

/// Keeps the first element for which no later element compares strictly
/// `wanted` against it, so ties go to the first seen.
fn extremum(args: &[Value], name: &str, wanted: Ordering) -> Result<Value> {
    let candidates: Vec<Value> = if let [single] = args {
        if !single.is_iterable() {
            return Err(not_iterable(single));
        }
        single.iter()?.collect()
    } else {
        args.to_vec()
    };
    let mut iter = candidates.into_iter();
    let mut best = iter
        .next()
        .ok_or_else(|| HythonError::value_error(format!("{name}() arg is an empty sequence")))?;
    for candidate in iter {
        if candidate.compare(&best)? == wanted {
            best = candidate;
        }
    }
    Ok(best)
}

fn math_sum(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let source = &args[0];
    if !source.is_iterable() {
        return Err(not_iterable(source));
    }
    let mut total = match args.get(1) {
        Some(start) => {
            expect_number(start, "sum")?;
            start.clone()
        }
        None => Value::int(0),
    };
    for item in source.iter()? {
        let (Some(acc), Some(next)) = (Number::of(&total), Number::of(&item)) else {
            return Err(HythonError::type_mismatch(format!(
                "unsupported operand type(s) for +: '{}' and '{}'",
                total.type_name(),
                item.type_name()
            )));
        };
        total = add_numbers(acc, next)?;
    }
    Ok(total)
}

fn math_pow(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let base = expect_number(&args[0], "pow")?;
    let exponent = expect_number(&args[1], "pow")?;
    match (base, exponent) {
        (Number::Int(b), Number::Int(e)) if e >= 0 => int_pow(b, e).map(Value::int),
        (b, e) => {
            let (b, e) = (b.as_f64(), e.as_f64());
            if b == 0.0 && e < 0.0 {
                return Err(HythonError::value_error(
                    "0.0 cannot be raised to a negative power",
                ));
            }
            let result = b.powf(e);
            if result.is_nan() && !b.is_nan() && !e.is_nan() {
                return Err(HythonError::value_error("math domain error"));
            }
            Ok(Value::float(result))
        }
    }
}

fn int_pow(base: i64, exponent: i64) -> Result<i64> {
    match base {
        0 | 1 => return Ok(if exponent == 0 { 1 } else { base }),
        -1 => return Ok(if exponent % 2 == 0 { 1 } else { -1 }),
        _ => {}
    }
    u32::try_from(exponent)
        .ok()
        .and_then(|e| base.checked_pow(e))
        .ok_or_else(|| overflow("pow"))
}

fn math_sqrt(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let number = expect_number(&args[0], "sqrt")?.as_f64();
    if number < 0.0 {
        return Err(HythonError::value_error("math domain error: sqrt of a negative number"));
    }
    Ok(Value::float(number.sqrt()))
}

fn math_round(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let number = expect_number(&args[0], "round")?;
    let ndigits = match args.get(1) {
        Some(value) if !value.is_none() => Some(expect_int(value, "round")?),
        _ => None,
    };
    match (number, ndigits) {
        (Number::Int(n), None) => Ok(Value::int(n)),
        (Number::Int(n), Some(digits)) => round_int(n, digits).map(Value::int),
        (Number::Float(f), None) => float_to_int(f.round_ties_even()).map(Value::int),
        (Number::Float(f), Some(digits)) => Ok(Value::float(round_float(f, digits))),
    }
}

/// Half-to-even rounding of an integer to `digits` decimal places; only
/// negative `digits` change the value.
fn round_int(value: i64, digits: i64) -> Result<i64> {
    if digits >= 0 {
        return Ok(value);
    }
    if digits < -19 {
        return Ok(0);
    }
    let unit = 10_i128.pow((-digits) as u32);
    let value = i128::from(value);
    let quotient = value.div_euclid(unit);
    let remainder = value.rem_euclid(unit);
    let rounded = match (2 * remainder).cmp(&unit) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal if quotient % 2 == 0 => quotient,
        Ordering::Equal => quotient + 1,
    };
    i64::try_from(rounded * unit).map_err(|_| overflow("round"))
}

/// Half-to-even rounding applied to the exact decimal value of `value`, so
/// `2.675` (stored just below the half-way point) rounds down.
fn round_float(value: f64, digits: i64) -> f64 {
    if !value.is_finite() || value == 0.0 || digits > 323 {
        return value;
    }
    if digits < -308 {
        return 0.0_f64.copysign(value);
    }
    // Every finite double has at most 1074 fractional decimal digits.
    let exact = format!("{:.1074}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let decimal: Vec<u8> = whole.bytes().chain(fraction.bytes()).map(|b| b - b'0').collect();
    let keep = whole.len() as i64 + digits;
    if keep < 0 {
        return 0.0_f64.copysign(value);
    }
    let (kept, dropped) = decimal.split_at((keep as usize).min(decimal.len()));
    let round_up = match dropped.split_first() {
        Some((&first, _)) if first > 5 => true,
        Some((5, rest)) => {
            rest.iter().any(|&d| d != 0) || kept.last().is_some_and(|&d| d % 2 == 1)
        }
        _ => false,
    };
    let mut kept = kept.to_vec();
    if round_up {
        increment_decimal(&mut kept);
    }
    let mut text: String = kept.iter().map(|&d| char::from(b'0' + d)).collect();
    if text.is_empty() {
        text.push('0');
    }
    // `text` holds the result scaled by 10^digits.
    let rounded: f64 = format!("{text}e{}", -digits).parse().unwrap_or(value.abs());
    rounded.copysign(value)
}

fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, 1);
}
