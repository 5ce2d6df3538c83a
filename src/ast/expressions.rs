use std::fmt;

use crate::ast::BinOp;

/// Literal value written directly in a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// `'text'`
    String(String),
    /// `42`, `0x2a`
    Integer(i64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{s}'"),
            Literal::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// Abstract Syntax Tree node representing a parsed predicate.
///
/// Nodes are immutable once built. [`Expr::render`] produces the canonical
/// text form, which is what predicates are compared and persisted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// String or integer literal
    ///
    /// # Example
    /// ```text
    /// 'gold'
    /// 100
    /// ```
    Literal(Literal),

    /// Top-level attribute of the environment
    ///
    /// # Example
    /// ```text
    /// asset_alias
    /// ```
    Attr(String),

    /// Field access on an object-typed expression
    ///
    /// Chains are left-associative: `a.b.c` is `Selector(Selector(a, b), c)`.
    Selector { object: Box<Expr>, field: String },

    /// Explicit grouping, kept so rendering reproduces the input
    Paren(Box<Expr>),

    /// Binary operation (logical or comparison)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Existential quantifier over a list of sub-objects
    ///
    /// True iff some element of `name` satisfies `body`.
    ///
    /// # Example
    /// ```text
    /// inputs(asset_alias = 'gold' AND amount > 10)
    /// ```
    Exists { name: String, body: Box<Expr> },

    /// Externally supplied value (`$1`, `$2`, ...)
    Placeholder(usize),
}

impl Expr {
    /// Canonical text form. Parsing the result yields an identical tree.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub(crate) fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren(inner) = expr {
            expr = inner;
        }
        expr
    }

    /// Highest placeholder index used anywhere in the tree.
    pub fn max_placeholder(&self) -> usize {
        match self {
            Expr::Placeholder(n) => *n,
            Expr::Literal(_) | Expr::Attr(_) => 0,
            Expr::Selector { object, .. } => object.max_placeholder(),
            Expr::Paren(inner) => inner.max_placeholder(),
            Expr::Binary { left, right, .. } => {
                left.max_placeholder().max(right.max_placeholder())
            }
            Expr::Exists { body, .. } => body.max_placeholder(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Attr(name) => f.write_str(name),
            Expr::Selector { object, field } => write!(f, "{object}.{field}"),
            Expr::Paren(inner) => write!(f, "({inner})"),
            Expr::Binary { op, left, right } => write!(f, "{left} {op} {right}"),
            Expr::Exists { name, body } => write!(f, "{name}({body})"),
            Expr::Placeholder(n) => write!(f, "${n}"),
        }
    }
}
