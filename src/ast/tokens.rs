use std::fmt;

/// Lexical tokens produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// End of input. Returned forever once the input is exhausted.
    Eof,

    /// Attribute, field or existential name
    ///
    /// ASCII letter or underscore, then letters, digits or underscores.
    ///
    /// # Examples
    /// ```text
    /// asset_id
    /// inputs
    /// _x1
    /// ```
    Ident(String),

    /// `AND` (keywords match case-insensitively)
    And,

    /// `OR`
    Or,

    /// Single-quoted string, quotes stripped. No escapes exist.
    ///
    /// # Examples
    /// ```text
    /// 'gold'
    /// 'a b c'
    /// ```
    String(String),

    /// Decimal or `0x` hexadecimal integer, normalized to its value
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 125
    /// 0xff
    /// ```
    Integer(i64),

    /// `$` followed by a decimal index
    ///
    /// # Examples
    /// ```text
    /// $1
    /// $12
    /// ```
    Placeholder(usize),

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `.`
    Dot,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl Token {
    /// Source-level text of the token. Integers print as decimal.
    pub fn literal(&self) -> String {
        match self {
            Token::Eof => String::new(),
            Token::Ident(name) => name.clone(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::String(s) => format!("'{s}'"),
            Token::Integer(n) => n.to_string(),
            Token::Placeholder(n) => format!("${n}"),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Dot => ".".to_string(),
            Token::Eq => "=".to_string(),
            Token::NotEq => "!=".to_string(),
            Token::Lt => "<".to_string(),
            Token::LtEq => "<=".to_string(),
            Token::Gt => ">".to_string(),
            Token::GtEq => ">=".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Ident(name) => write!(f, "identifier '{name}'"),
            Token::String(s) => write!(f, "string '{s}'"),
            Token::Integer(n) => write!(f, "integer {n}"),
            Token::Placeholder(n) => write!(f, "placeholder ${n}"),
            other => write!(f, "'{}'", other.literal()),
        }
    }
}
