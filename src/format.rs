use std::{
    fmt::{self, Write},
    rc::Rc,
};

use crate::value::{Value, ValueKind};

/// `str()` rendering: strings appear bare, everything else as `repr`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::String(s) => f.write_str(s),
            _ => write_repr(self, f, &mut Vec::new()),
        }
    }
}

impl Value {
    /// Rendering used for container elements and by the console: strings are
    /// quoted.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_repr(self, &mut out, &mut Vec::new());
        out
    }
}

/// Containers currently being written, so a list that holds itself renders
/// as `[...]` instead of recursing.
type Active = Vec<*const ValueKind>;

fn write_repr(value: &Value, out: &mut impl Write, active: &mut Active) -> fmt::Result {
    match value.kind() {
        ValueKind::None => out.write_str("None"),
        ValueKind::Bool(true) => out.write_str("True"),
        ValueKind::Bool(false) => out.write_str("False"),
        ValueKind::Int(n) => write!(out, "{n}"),
        ValueKind::Float(x) => out.write_str(&format_float(*x)),
        ValueKind::String(s) => write_quoted(s, out),
        ValueKind::List(items) => {
            let ptr = Rc::as_ptr(&value.0);
            if active.contains(&ptr) {
                return out.write_str("[...]");
            }
            active.push(ptr);
            out.write_char('[')?;
            write_items(&items.borrow(), out, active)?;
            active.pop();
            out.write_char(']')
        }
        ValueKind::Tuple(items) => {
            out.write_char('(')?;
            write_items(items, out, active)?;
            if items.len() == 1 {
                out.write_char(',')?;
            }
            out.write_char(')')
        }
        ValueKind::Dict(entries) => {
            let ptr = Rc::as_ptr(&value.0);
            if active.contains(&ptr) {
                return out.write_str("{...}");
            }
            active.push(ptr);
            out.write_char('{')?;
            for (idx, (key, value)) in entries.borrow().iter().enumerate() {
                if idx > 0 {
                    out.write_str(", ")?;
                }
                write_repr(key, out, active)?;
                out.write_str(": ")?;
                write_repr(value, out, active)?;
            }
            active.pop();
            out.write_char('}')
        }
        ValueKind::Range(range) => {
            if range.step == 1 {
                write!(out, "range({}, {})", range.start, range.stop)
            } else {
                write!(out, "range({}, {}, {})", range.start, range.stop, range.step)
            }
        }
        ValueKind::Reversed(_) => out.write_str("<reversed object>"),
        ValueKind::Enumerate(_) => out.write_str("<enumerate object>"),
        ValueKind::Zip(_) => out.write_str("<zip object>"),
    }
}

fn write_items(items: &[Value], out: &mut impl Write, active: &mut Active) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.write_str(", ")?;
        }
        write_repr(item, out, active)?;
    }
    Ok(())
}

fn write_quoted(text: &str, out: &mut impl Write) -> fmt::Result {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    out.write_char(quote)?;
    for ch in text.chars() {
        match ch {
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c == quote => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            c if c.is_control() => write!(out, "\\x{:02x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}

/// Shortest round-trippable decimal, laid out with fixed notation for
/// exponents in `-4..16` and scientific notation otherwise.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0".into() } else { "0.0".into() };
    }

    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() > int_len {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            } else {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', int_len - digits.len()));
                out.push_str(".0");
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exponent - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exponent.abs());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Dict;

    #[test]
    fn floats_use_fixed_notation_in_the_middle_range() {
        assert_eq!(format_float(3.14), "3.14");
        assert_eq!(format_float(16.0), "16.0");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn floats_switch_to_exponents_at_the_edges() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1e-5), "1e-05");
        assert_eq!(format_float(1.5e-7), "1.5e-07");
        assert_eq!(format_float(123456789012345680.0), "1.2345678901234568e+17");
        assert_eq!(format_float(-1e100), "-1e+100");
    }

    #[test]
    fn special_floats() {
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(-0.0), "-0.0");
    }

    #[test]
    fn nested_strings_are_quoted() {
        let list = Value::list(vec![Value::string("a"), Value::int(1), Value::none()]);
        assert_eq!(list.to_string(), "['a', 1, None]");
        assert_eq!(Value::string("it's").repr(), "\"it's\"");
        assert_eq!(Value::string("line\n").repr(), "'line\\n'");
        assert_eq!(Value::string("plain").to_string(), "plain");
    }

    #[test]
    fn tuples_and_dicts() {
        let single = Value::tuple(vec![Value::int(1)]);
        assert_eq!(single.to_string(), "(1,)");
        let pair = Value::pair(Value::int(0), Value::string("apple"));
        assert_eq!(pair.to_string(), "(0, 'apple')");

        let mut entries = Dict::new();
        entries
            .insert(Value::string("name"), Value::string("Alice"))
            .unwrap();
        entries.insert(Value::string("age"), Value::int(25)).unwrap();
        assert_eq!(
            Value::dict(entries).to_string(),
            "{'name': 'Alice', 'age': 25}"
        );
    }

    #[test]
    fn booleans_and_none() {
        assert_eq!(Value::bool(true).to_string(), "True");
        assert_eq!(Value::bool(false).to_string(), "False");
        assert_eq!(Value::none().to_string(), "None");
    }
}
