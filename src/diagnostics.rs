use std::fmt;

use thiserror::Error;

/// Represents a byte span within a console input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Classification of a failure raised by a builtin or by the console reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unknown builtin or unbound name.
    Name,
    /// Wrong number of arguments.
    Arity,
    /// Operand variant unsupported by the operation.
    TypeMismatch,
    /// Operand variant accepted but value out of domain.
    Value,
    /// Malformed text handed to a numeric conversion.
    Format,
    Lexer,
    Parser,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Name => "NameError",
            DiagnosticKind::Arity => "ArityError",
            DiagnosticKind::TypeMismatch => "TypeMismatch",
            DiagnosticKind::Value => "ValueError",
            DiagnosticKind::Format => "FormatError",
            DiagnosticKind::Lexer => "LexError",
            DiagnosticKind::Parser => "ParseError",
        };
        f.write_str(label)
    }
}

/// Rich diagnostic information surfaced to the host.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({}..{})", span.start, span.end)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the Hython core.
#[derive(Debug, Error)]
pub enum HythonError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HythonError {
    pub fn name_error(message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticKind::Name, message).into()
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticKind::Arity, message).into()
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticKind::TypeMismatch, message).into()
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticKind::Value, message).into()
    }

    pub fn format_error(message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticKind::Format, message).into()
    }

    /// Kind of the underlying diagnostic; `None` for I/O failures.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        match self {
            HythonError::Diagnostic(diag) => Some(diag.kind),
            HythonError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HythonError>;
