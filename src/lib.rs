//! Dynamic value model and builtin function library for the Hython
//! scripting runtime.
//!
//! A host evaluator hands [`stdlib::invoke`] a builtin name and evaluated
//! [`Value`]s and gets a value or a [`HythonError`] back. The [`console`]
//! module drives the same table from call expressions for the `hython`
//! binary.

pub mod ast;
pub mod collections;
pub mod console;
pub mod conversions;
pub mod diagnostics;
pub mod format;
pub mod introspection;
pub mod iter;
pub mod lexer;
pub mod numeric;
pub mod ops;
pub mod parser;
pub mod repl;
pub mod stdlib;
pub mod types;
pub mod value;

pub use console::Console;
pub use diagnostics::{Diagnostic, DiagnosticKind, HythonError, SourceSpan};
pub use iter::SeqIter;
pub use repl::Repl;
pub use stdlib::{Builtins, invoke};
pub use value::{Dict, Value, ValueKind};
