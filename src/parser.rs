use std::mem;

use tracing::debug;

use crate::{
    ast::{BinOp, Expr, Literal, Predicate, Token},
    env::SchemaEnv,
    error::{Error, Result},
    lexer::Lexer,
    schema::SqlTable,
    typecheck::type_check,
};

/// Lowest precedence level; every binary operator binds at least this tightly.
const MIN_PRECEDENCE: u8 = 1;

/// Deepest expression tree the parser will build. Every later pass walks the
/// tree recursively.
pub const MAX_DEPTH: usize = 256;

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_pos: usize,
    parameters: usize,
    /// Open parentheses and existential bodies.
    nesting: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let (current_pos, current_token) = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            current_pos,
            parameters: 0,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<()> {
        let (pos, token) = self.lexer.next_token()?;
        self.current_pos = pos;
        self.current_token = token;
        Ok(())
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        Error::Syntax {
            pos: self.current_pos,
            expected: expected.into(),
            found: self.current_token.to_string(),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if mem::discriminant(&self.current_token) != mem::discriminant(&expected) {
            return Err(self.unexpected(expected.to_string()));
        }
        self.advance()
    }

    /// Fail once a node would sit deeper than [`MAX_DEPTH`].
    fn check_depth(&self, pos: usize, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::Syntax {
                pos,
                expected: format!("nesting depth at most {MAX_DEPTH}"),
                found: format!("depth {depth}"),
            });
        }
        Ok(())
    }

    /// Parse a parenthesized body, `(` already consumed.
    fn parse_nested(&mut self, pos: usize) -> Result<(Expr, usize)> {
        self.check_depth(pos, self.nesting + 1)?;
        self.nesting += 1;
        let inner = self.climb(MIN_PRECEDENCE);
        self.nesting -= 1;
        let (inner, depth) = inner?;
        self.expect(Token::RParen)?;
        self.check_depth(pos, depth + 1)?;
        Ok((inner, depth + 1))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Largest placeholder index seen so far.
    pub fn parameters(&self) -> usize {
        self.parameters
    }

    /// Parse primary expressions: literals, placeholders, attributes,
    /// existentials and parenthesized expressions, with their tree depth.
    fn parse_primary(&mut self) -> Result<(Expr, usize)> {
        let pos = self.current_pos;
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok((Expr::Literal(Literal::String(s)), 1))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok((Expr::Literal(Literal::Integer(n)), 1))
            }
            Token::Placeholder(n) => {
                if n == 0 {
                    return Err(Error::Syntax {
                        pos,
                        expected: "placeholder index of at least 1".to_string(),
                        found: "$0".to_string(),
                    });
                }
                self.parameters = self.parameters.max(n);
                self.advance()?;
                Ok((Expr::Placeholder(n), 1))
            }
            Token::LParen => {
                self.advance()?;
                let (inner, depth) = self.parse_nested(pos)?;
                Ok((Expr::Paren(Box::new(inner)), depth))
            }
            Token::Ident(name) => {
                self.advance()?;

                // name(...) -> existential over the sub-object list `name`
                if self.check(&Token::LParen) {
                    let open = self.current_pos;
                    self.advance()?;
                    let (body, depth) = self.parse_nested(open)?;
                    Ok((
                        Expr::Exists {
                            name,
                            body: Box::new(body),
                        },
                        depth,
                    ))
                } else {
                    Ok((Expr::Attr(name), 1))
                }
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("expression"))
            }
        }
    }

    /// Parse a primary followed by any number of `.field` selectors.
    fn parse_selector(&mut self) -> Result<(Expr, usize)> {
        let (mut expr, mut depth) = self.parse_primary()?;

        while self.check(&Token::Dot) {
            let pos = self.current_pos;
            self.advance()?; // consume '.'

            let field = match &self.current_token {
                Token::Ident(name) => name.clone(),
                _ => return Err(self.unexpected("field name after '.'")),
            };
            depth += 1;
            self.check_depth(pos, depth)?;
            self.advance()?;

            expr = Expr::Selector {
                object: Box::new(expr),
                field,
            };
        }
        Ok((expr, depth))
    }

    fn binary_op(&self) -> Option<BinOp> {
        match self.current_token {
            Token::Or => Some(BinOp::Or),
            Token::And => Some(BinOp::And),
            Token::Eq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        }
    }

    /// Precedence climbing: consume operators binding at least `min_precedence`.
    /// All operators are left-associative.
    pub fn parse_expression(&mut self, min_precedence: u8) -> Result<Expr> {
        self.climb(min_precedence).map(|(expr, _)| expr)
    }

    fn climb(&mut self, min_precedence: u8) -> Result<(Expr, usize)> {
        let (mut left, mut depth) = self.parse_selector()?;

        while let Some(op) = self.binary_op() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let pos = self.current_pos;
            self.advance()?;
            let (right, right_depth) = self.climb(precedence + 1)?;
            depth = depth.max(right_depth) + 1;
            self.check_depth(pos, depth)?;
            left = Expr::binary(op, left, right);
        }
        Ok((left, depth))
    }

    /// Parse the whole input. Empty input yields `None`.
    pub fn parse(&mut self) -> Result<Option<Expr>> {
        if self.check(&Token::Eof) {
            return Ok(None);
        }
        let (expr, _) = self.climb(MIN_PRECEDENCE)?;
        self.expect(Token::Eof)?;
        Ok(Some(expr))
    }
}

fn build(text: &str, table: Option<&SqlTable>) -> Result<Predicate> {
    let mut parser = Parser::new(Lexer::new(text))?;
    let Some(expr) = parser.parse()? else {
        return Ok(Predicate::everything());
    };

    let selector_types = type_check(&expr, table.map(|t| t as &dyn SchemaEnv))?;
    let predicate = Predicate {
        expr: Some(expr),
        selector_types,
        parameters: parser.parameters(),
    };
    debug!(
        predicate = %predicate,
        parameters = predicate.parameters,
        "parsed predicate"
    );
    Ok(predicate)
}

/// Parse and type-check a predicate without a schema.
///
/// Attributes are untyped, so only structural type errors are caught here;
/// the SQL compiler re-checks against its table.
///
/// # Examples
///
/// ```
/// use ledger_query::parse;
///
/// let p = parse("asset_alias = 'gold' AND amount > $1").unwrap();
/// assert_eq!(p.parameters, 1);
/// assert_eq!(p.render(), "asset_alias = 'gold' AND amount > $1");
/// ```
pub fn parse(text: &str) -> Result<Predicate> {
    build(text, None)
}

/// Parse and type-check a predicate against a declared table, rejecting
/// unknown attributes and foreign keys up front.
pub fn parse_for_table(text: &str, table: &SqlTable) -> Result<Predicate> {
    build(text, Some(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str) -> Expr {
        Parser::new(Lexer::new(text))
            .unwrap()
            .parse()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        match expr("a = 1 AND b = 2 OR c = 3 AND d = 4") {
            Expr::Binary {
                op: BinOp::Or,
                left,
                right,
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::And, .. }));
                assert!(matches!(*right, Expr::Binary { op: BinOp::And, .. }));
            }
            other => panic!("expected OR at the root, got {other:?}"),
        }
    }

    #[test]
    fn test_left_associative() {
        match expr("a AND b AND c") {
            Expr::Binary { left, right, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::And, .. }));
                assert_eq!(*right, Expr::Attr("c".to_string()));
            }
            other => panic!("expected AND, got {other:?}"),
        }
    }

    #[test]
    fn test_parameters_track_highest_index() {
        let mut parser = Parser::new(Lexer::new("a = $3 OR b = $1")).unwrap();
        parser.parse().unwrap();
        assert_eq!(parser.parameters(), 3);
    }

    #[test]
    fn test_depth_limit_is_inclusive() {
        let ok = format!("{}a{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert!(Parser::new(Lexer::new(&ok)).unwrap().parse().is_ok());

        let deep = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        let err = Parser::new(Lexer::new(&deep)).unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn test_zero_placeholder_rejected() {
        let mut parser = Parser::new(Lexer::new("a = $0")).unwrap();
        let err = parser.parse().unwrap_err();
        assert_eq!(err.position(), Some(4));
    }
}
