use crate::diagnostics::SourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    None,
}

/// A console call expression: literals, container displays and builtin
/// calls. There are no variables, operators or statements.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    /// A bare name; only meaningful as the callee of a call.
    Name(String),
    Call { callee: String, args: Vec<Expr> },
    ListLiteral(Vec<Expr>),
    DictLiteral(Vec<(Expr, Expr)>),
    TupleLiteral(Vec<Expr>),
    Group(Box<Expr>),
}
