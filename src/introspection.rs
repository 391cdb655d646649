use crate::{
    diagnostics::{HythonError, Result},
    stdlib::{Arity, Builtins, CallContext, native},
    value::{Value, ValueKind},
};

pub(crate) fn install(builtins: &mut Builtins) {
    builtins.define(native("type", Arity::Exact(1), introspect_type));
    builtins.define(native("isinstance", Arity::Exact(2), introspect_isinstance));
}

fn introspect_type(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    Ok(Value::string(args[0].type_name()))
}

fn introspect_isinstance(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    let names = match args[1].kind() {
        ValueKind::String(_) => vec![args[1].clone()],
        ValueKind::List(_) | ValueKind::Tuple(_) => args[1].to_vec().unwrap_or_default(),
        _ => {
            return Err(HythonError::type_mismatch(format!(
                "isinstance() arg 2 must be a type name or a list of type names, not '{}'",
                args[1].type_name()
            )));
        }
    };
    for name in &names {
        let name = name.as_str().ok_or_else(|| {
            HythonError::type_mismatch(format!(
                "isinstance() type names must be str, not '{}'",
                name.type_name()
            ))
        })?;
        if is_instance(value, name) {
            return Ok(Value::bool(true));
        }
    }
    Ok(Value::bool(false))
}

/// `bool` counts as a subtype of `int`; nothing else is widened.
pub fn is_instance(value: &Value, type_name: &str) -> bool {
    value.type_name() == type_name
        || (type_name == "int" && matches!(value.kind(), ValueKind::Bool(_)))
}
