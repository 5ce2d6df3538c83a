use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Logical
    /// Logical OR (`OR`)
    Or,
    /// Logical AND (`AND`)
    And,

    // Comparison
    /// Equal (`=`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

/// Precedence table, lowest binding first. Fixed for the life of the program.
const PRECEDENCE: [(BinOp, u8); 8] = [
    (BinOp::Or, 1),
    (BinOp::And, 2),
    (BinOp::Equal, 3),
    (BinOp::NotEqual, 3),
    (BinOp::LessThan, 3),
    (BinOp::LessEqual, 3),
    (BinOp::GreaterThan, 3),
    (BinOp::GreaterEqual, 3),
];

impl BinOp {
    /// Binding strength: `OR` 1, `AND` 2, comparisons 3.
    pub fn precedence(self) -> u8 {
        PRECEDENCE
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, p)| *p)
            .unwrap_or(0)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::Or | BinOp::And)
    }

    /// `<`, `<=`, `>`, `>=`
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinOp::LessThan | BinOp::LessEqual | BinOp::GreaterThan | BinOp::GreaterEqual
        )
    }

    pub fn is_comparison(self) -> bool {
        !self.is_logical()
    }

    /// Surface syntax, also used when rendering.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "OR",
            BinOp::And => "AND",
            BinOp::Equal => "=",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
        }
    }

    /// SQL spelling.
    pub fn sql(self) -> &'static str {
        match self {
            BinOp::NotEqual => "<>",
            other => other.symbol(),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
