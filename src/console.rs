//! Evaluates console call expressions against the builtin table.

use std::io::{self, Write};

use crate::{
    ast::{Expr, ExprKind, Literal},
    diagnostics::{Diagnostic, DiagnosticKind, HythonError, Result},
    parser,
    stdlib::{self, Builtins},
    value::{Dict, Value},
};

pub struct Console<W: Write = io::Stdout> {
    builtins: &'static Builtins,
    out: W,
}

impl Console<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Console<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Console<W> {
    /// A console whose `print` output goes to `out`.
    pub fn with_output(out: W) -> Self {
        Self {
            builtins: stdlib::builtins(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn builtins(&self) -> &Builtins {
        self.builtins
    }

    /// Parses and evaluates a single call expression.
    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        let expr = parser::parse_expression(source)?;
        self.evaluate(&expr)
    }

    /// Evaluates every non-blank line of `source` in order, stopping at the
    /// first failure. The failing line number is attached as a note.
    pub fn run_source(&mut self, source: &str) -> Result<usize> {
        let mut executed = 0;
        for (number, line) in source.lines().enumerate() {
            if parser::is_blank(line) {
                continue;
            }
            self.eval_source(line).map_err(|err| match err {
                HythonError::Diagnostic(diag) => {
                    HythonError::from(diag.with_note(format!("at line {}", number + 1)))
                }
                other => other,
            })?;
            executed += 1;
        }
        tracing::debug!(lines = executed, "script finished");
        Ok(executed)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(match literal {
                Literal::Int(n) => Value::int(*n),
                Literal::Float(f) => Value::float(*f),
                Literal::Bool(b) => Value::bool(*b),
                Literal::String(s) => Value::string(s.clone()),
                Literal::None => Value::none(),
            }),
            ExprKind::Name(name) => {
                let message = if self.builtins.contains(name) {
                    format!("builtin `{name}` must be called")
                } else {
                    format!("name '{name}' is not defined")
                };
                Err(Diagnostic::new(DiagnosticKind::Name, message)
                    .with_span(expr.span)
                    .into())
            }
            ExprKind::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.builtins
                    .invoke(callee, &args, &mut self.out)
                    .map_err(|err| match err {
                        HythonError::Diagnostic(diag) if diag.span.is_none() => {
                            HythonError::from(diag.with_span(expr.span))
                        }
                        other => other,
                    })
            }
            ExprKind::ListLiteral(items) => Ok(Value::list(self.evaluate_all(items)?)),
            ExprKind::TupleLiteral(items) => Ok(Value::tuple(self.evaluate_all(items)?)),
            ExprKind::DictLiteral(entries) => {
                let mut dict = Dict::new();
                for (key, value) in entries {
                    let key = self.evaluate(key)?;
                    let value = self.evaluate(value)?;
                    dict.insert(key, value)?;
                }
                Ok(Value::dict(dict))
            }
            ExprKind::Group(inner) => self.evaluate(inner),
        }
    }

    fn evaluate_all(&mut self, items: &[Expr]) -> Result<Vec<Value>> {
        items.iter().map(|item| self.evaluate(item)).collect()
    }
}
