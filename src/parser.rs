use crate::{
    ast::{Expr, ExprKind, Literal},
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    lexer::{Keyword, Lexer, Token, TokenKind},
};

/// Parses one call expression spanning the whole input.
pub fn parse_expression(source: &str) -> Result<Expr, Diagnostic> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expression()?;
    if !parser.is_at_end() {
        let token = parser.advance();
        return Err(parser.error(&token, "unexpected token after expression"));
    }
    Ok(expr)
}

/// True when the input holds nothing but whitespace and comments.
pub fn is_blank(source: &str) -> bool {
    Lexer::new(source)
        .tokenize()
        .map(|tokens| tokens.len() == 1)
        .unwrap_or(false)
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        if self.matches(TokenKind::Minus) {
            let minus = self.previous().clone();
            return self.parse_signed(minus, true);
        }
        if self.matches(TokenKind::Plus) {
            let plus = self.previous().clone();
            return self.parse_signed(plus, false);
        }
        self.parse_call()
    }

    /// Unary sign; only applies to numeric literals.
    fn parse_signed(&mut self, sign: Token, negate: bool) -> Result<Expr, Diagnostic> {
        if self.check(TokenKind::Number) {
            // Parse with the sign attached so `-9223372036854775808` fits.
            let number = self.advance();
            return Ok(Expr {
                span: SourceSpan::new(sign.span.start, number.span.end),
                kind: ExprKind::Literal(number_literal(&number, negate)?),
            });
        }
        let operand = self.parse_expression()?;
        let span = SourceSpan::new(sign.span.start, operand.span.end);
        let literal = match operand.kind {
            ExprKind::Literal(Literal::Int(n)) if negate => n.checked_neg().map(Literal::Int),
            ExprKind::Literal(Literal::Float(f)) if negate => Some(Literal::Float(-f)),
            ExprKind::Literal(literal @ (Literal::Int(_) | Literal::Float(_))) => Some(literal),
            _ => None,
        };
        match literal {
            Some(literal) => Ok(Expr {
                span,
                kind: ExprKind::Literal(literal),
            }),
            None => Err(Diagnostic::new(
                DiagnosticKind::Parser,
                "a sign can only prefix a number literal",
            )
            .with_span(span)),
        }
    }

    fn parse_call(&mut self) -> Result<Expr, Diagnostic> {
        let expr = self.parse_primary()?;
        let ExprKind::Name(callee) = &expr.kind else {
            return Ok(expr);
        };
        if !self.matches(TokenKind::LParen) {
            return Ok(expr);
        }
        let callee = callee.clone();
        let args = self.parse_items(TokenKind::RParen)?;
        let paren = self.consume(TokenKind::RParen, "expected `)` after arguments")?;
        Ok(Expr {
            span: SourceSpan::new(expr.span.start, paren.span.end),
            kind: ExprKind::Call { callee, args },
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error_eof("unexpected end of expression"));
        };
        match &token.kind {
            TokenKind::Keyword(keyword) => {
                self.advance();
                let literal = match keyword {
                    Keyword::True => Literal::Bool(true),
                    Keyword::False => Literal::Bool(false),
                    Keyword::None => Literal::None,
                };
                Ok(Expr {
                    span: token.span,
                    kind: ExprKind::Literal(literal),
                })
            }
            TokenKind::Number => {
                self.advance();
                let literal = number_literal(&token, false)?;
                Ok(Expr {
                    span: token.span,
                    kind: ExprKind::Literal(literal),
                })
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr {
                    span: token.span,
                    kind: ExprKind::Literal(Literal::String(token.lexeme.clone())),
                })
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr {
                    span: token.span,
                    kind: ExprKind::Name(token.lexeme.clone()),
                })
            }
            TokenKind::LParen => {
                self.advance();
                if self.matches(TokenKind::RParen) {
                    return Ok(Expr {
                        span: SourceSpan::new(token.span.start, self.previous().span.end),
                        kind: ExprKind::TupleLiteral(Vec::new()),
                    });
                }
                let first = self.parse_expression()?;
                if self.matches(TokenKind::Comma) {
                    let mut elems = vec![first];
                    elems.extend(self.parse_items(TokenKind::RParen)?);
                    let rparen = self.consume(TokenKind::RParen, "expected `)` after tuple")?;
                    Ok(Expr {
                        span: SourceSpan::new(token.span.start, rparen.span.end),
                        kind: ExprKind::TupleLiteral(elems),
                    })
                } else {
                    let rparen =
                        self.consume(TokenKind::RParen, "expected `)` after expression")?;
                    Ok(Expr {
                        span: SourceSpan::new(token.span.start, rparen.span.end),
                        kind: ExprKind::Group(Box::new(first)),
                    })
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_items(TokenKind::RBracket)?;
                let rbracket =
                    self.consume(TokenKind::RBracket, "expected `]` after list literal")?;
                Ok(Expr {
                    span: SourceSpan::new(token.span.start, rbracket.span.end),
                    kind: ExprKind::ListLiteral(elements),
                })
            }
            TokenKind::LBrace => self.parse_dict(),
            _ => Err(self.error(&token, "unexpected token in expression")),
        }
    }

    /// Comma-separated expressions up to (not including) `terminator`; a
    /// trailing comma is allowed.
    fn parse_items(&mut self, terminator: TokenKind) -> Result<Vec<Expr>, Diagnostic> {
        let mut items = Vec::new();
        while !self.check(terminator.clone()) && !self.is_at_end() {
            items.push(self.parse_expression()?);
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn parse_dict(&mut self) -> Result<Expr, Diagnostic> {
        let lbrace = self.advance();
        let mut entries = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let key = self.parse_expression()?;
            self.consume(TokenKind::Colon, "expected `:` in dict literal")?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        let rbrace = self.consume(TokenKind::RBrace, "expected `}` after dict literal")?;
        Ok(Expr {
            span: SourceSpan::new(lbrace.span.start, rbrace.span.end),
            kind: ExprKind::DictLiteral(entries),
        })
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self
                .peek()
                .map(|tok| self.error(tok, message))
                .unwrap_or_else(|| self.error_eof(message)))
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Eof) | None)
    }

    fn error(&self, token: &Token, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Parser, message.to_string()).with_span(token.span)
    }

    fn error_eof(&self, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Parser, message.to_string())
    }
}

fn number_literal(token: &Token, negate: bool) -> Result<Literal, Diagnostic> {
    let mut text = token.lexeme.replace('_', "");
    if negate {
        text.insert(0, '-');
    }
    let parsed = if text.contains(['.', 'e', 'E']) {
        text.parse().ok().map(Literal::Float)
    } else {
        text.parse().ok().map(Literal::Int)
    };
    parsed.ok_or_else(|| {
        Diagnostic::new(
            DiagnosticKind::Parser,
            format!("invalid number literal `{}`", token.lexeme),
        )
        .with_span(token.span)
    })
}
