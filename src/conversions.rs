use crate::{
    diagnostics::{HythonError, Result},
    stdlib::{Arity, Builtins, CallContext, args::expect_int, native},
    value::{Value, ValueKind},
};

pub(crate) fn install(builtins: &mut Builtins) {
    builtins.define(native("str", Arity::Between(0, 1), convert_str));
    builtins.define(native("int", Arity::Exact(1), convert_int));
    builtins.define(native("float", Arity::Exact(1), convert_float));
    builtins.define(native("bool", Arity::Between(0, 1), convert_bool));
    builtins.define(native("chr", Arity::Exact(1), convert_chr));
    builtins.define(native("ord", Arity::Exact(1), convert_ord));
}

fn convert_str(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(value) => Ok(Value::string(value.to_string())),
        None => Ok(Value::string("")),
    }
}

fn convert_int(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    match value.kind() {
        ValueKind::Int(n) => Ok(Value::int(*n)),
        ValueKind::Bool(b) => Ok(Value::int(i64::from(*b))),
        ValueKind::Float(f) => float_to_int(*f).map(Value::int),
        ValueKind::String(s) => parse_int(s).map(Value::int),
        _ => Err(HythonError::type_mismatch(format!(
            "int() argument must be a string or a number, not '{}'",
            value.type_name()
        ))),
    }
}

/// Truncates toward zero.
pub(crate) fn float_to_int(value: f64) -> Result<i64> {
    if value.is_nan() {
        return Err(HythonError::value_error(
            "cannot convert float NaN to integer",
        ));
    }
    if value.is_infinite() {
        return Err(HythonError::value_error(
            "cannot convert float infinity to integer",
        ));
    }
    let truncated = value.trunc();
    if truncated < -9.223_372_036_854_776e18 || truncated >= 9.223_372_036_854_776e18 {
        return Err(HythonError::value_error(format!(
            "float {} does not fit in a 64-bit integer",
            crate::format::format_float(value)
        )));
    }
    Ok(truncated as i64)
}

fn parse_int(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(HythonError::format_error(format!(
            "invalid literal for int() with base 10: {}",
            Value::string(text).repr()
        )));
    }
    trimmed.parse::<i64>().map_err(|_| {
        HythonError::value_error(format!(
            "integer literal {} does not fit in a 64-bit integer",
            Value::string(trimmed).repr()
        ))
    })
}

fn convert_float(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    match value.kind() {
        ValueKind::Float(f) => Ok(Value::float(*f)),
        ValueKind::Int(n) => Ok(Value::float(*n as f64)),
        ValueKind::Bool(b) => Ok(Value::float(if *b { 1.0 } else { 0.0 })),
        ValueKind::String(s) => parse_float(s).map(Value::float),
        _ => Err(HythonError::type_mismatch(format!(
            "float() argument must be a string or a number, not '{}'",
            value.type_name()
        ))),
    }
}

fn parse_float(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    trimmed.parse::<f64>().map_err(|_| {
        HythonError::format_error(format!(
            "could not convert string to float: {}",
            Value::string(text).repr()
        ))
    })
}

fn convert_bool(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    Ok(Value::bool(args.first().is_some_and(Value::is_truthy)))
}

fn convert_chr(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let code = expect_int(&args[0], "chr")?;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(Value::string)
        .ok_or_else(|| {
            HythonError::value_error(format!("chr() arg not in range(0x110000): {code}"))
        })
}

fn convert_ord(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    let text = value.as_str().ok_or_else(|| {
        HythonError::type_mismatch(format!(
            "ord() expected string of length 1, but {} found",
            value.type_name()
        ))
    })?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Value::int(i64::from(u32::from(ch)))),
        _ => Err(HythonError::value_error(format!(
            "ord() expected a character, but string of length {} found",
            text.chars().count()
        ))),
    }
}
