//! The builtin dispatch table: the single entry point a host evaluator uses
//! to call into the core.

use std::{
    io::{self, Write},
    sync::OnceLock,
};

use indexmap::IndexMap;

use crate::{
    collections, conversions,
    diagnostics::{HythonError, Result},
    introspection, numeric,
    value::Value,
};

/// Accepted argument counts for a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }

    fn describe(self) -> String {
        match self {
            Arity::Exact(1) => "exactly 1 argument".into(),
            Arity::Exact(n) => format!("exactly {n} arguments"),
            Arity::Between(min, max) => format!("between {min} and {max} arguments"),
            Arity::AtLeast(1) => "at least 1 argument".into(),
            Arity::AtLeast(min) => format!("at least {min} arguments"),
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Between(min, max) => write!(f, "{min}..{max}"),
            Arity::AtLeast(min) => write!(f, "{min}.."),
        }
    }
}

/// Per-call state handed to a builtin. `print` is the only builtin that
/// touches it.
pub struct CallContext<'a> {
    pub out: &'a mut dyn Write,
}

pub type Callback = fn(&mut CallContext<'_>, &[Value]) -> Result<Value>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub callback: Callback,
}

impl NativeFunction {
    pub fn call(&self, ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(HythonError::arity(format!(
                "{}() takes {} but {} were given",
                self.name,
                self.arity.describe(),
                args.len()
            )));
        }
        (self.callback)(ctx, args)
    }
}

#[derive(Clone, Default)]
pub struct Builtins {
    table: IndexMap<&'static str, NativeFunction>,
}

impl Builtins {
    pub fn new() -> Self {
        let mut builtins = Self::default();
        builtins.define(native("print", Arity::AtLeast(0), io_print));
        conversions::install(&mut builtins);
        collections::install(&mut builtins);
        numeric::install(&mut builtins);
        introspection::install(&mut builtins);
        builtins
    }

    pub(crate) fn define(&mut self, function: NativeFunction) {
        self.table.insert(function.name, function);
    }

    pub fn lookup(&self, name: &str) -> Option<&NativeFunction> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Builtin names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    pub fn functions(&self) -> impl Iterator<Item = &NativeFunction> {
        self.table.values()
    }

    /// Calls `name` with already-evaluated arguments. `print` writes to `out`.
    pub fn invoke(&self, name: &str, args: &[Value], out: &mut dyn Write) -> Result<Value> {
        tracing::trace!(builtin = name, argc = args.len(), "invoking builtin");
        let function = self
            .lookup(name)
            .ok_or_else(|| HythonError::name_error(format!("name '{name}' is not defined")))?;
        let mut ctx = CallContext { out };
        function.call(&mut ctx, args).inspect_err(|err| {
            tracing::debug!(builtin = name, error = %err, "builtin failed");
        })
    }
}

/// Shared table built on first use.
pub fn builtins() -> &'static Builtins {
    static BUILTINS: OnceLock<Builtins> = OnceLock::new();
    BUILTINS.get_or_init(Builtins::new)
}

/// Convenience entry point over the shared table.
pub fn invoke(name: &str, args: &[Value], out: &mut dyn Write) -> Result<Value> {
    builtins().invoke(name, args, out)
}

/// Like [`invoke`], with `print` going to standard output.
pub fn invoke_stdout(name: &str, args: &[Value]) -> Result<Value> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    invoke(name, args, &mut lock)
}

pub(crate) fn native(name: &'static str, arity: Arity, callback: Callback) -> NativeFunction {
    NativeFunction {
        name,
        arity,
        callback,
    }
}

fn io_print(ctx: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    // Render the whole line first so a failure never leaves a partial write.
    let mut line = String::new();
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            line.push(' ');
        }
        line.push_str(&arg.to_string());
    }
    line.push('\n');
    ctx.out.write_all(line.as_bytes())?;
    ctx.out.flush()?;
    Ok(Value::none())
}

/// Argument helpers shared by the builtin modules.
pub(crate) mod args {
    use crate::{
        diagnostics::{HythonError, Result},
        value::Value,
    };

    pub(crate) fn expect_int(value: &Value, name: &str) -> Result<i64> {
        value.as_int().ok_or_else(|| {
            HythonError::type_mismatch(format!(
                "{name}() expected int but found '{}'",
                value.type_name()
            ))
        })
    }

    pub(crate) fn expect_iterable<'a>(value: &'a Value, name: &str) -> Result<&'a Value> {
        if value.is_iterable() {
            Ok(value)
        } else {
            Err(HythonError::type_mismatch(format!(
                "{name}() expected an iterable but found '{}'",
                value.type_name()
            )))
        }
    }
}
