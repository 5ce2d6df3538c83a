//! Errors produced while scanning, parsing, checking and compiling predicates.

/// Every failure the crate reports.
///
/// Lexical and syntax errors carry the byte offset into the predicate text
/// where the problem was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A malformed token.
    #[error("lexical error at offset {pos}: {message}")]
    Lex {
        /// Byte offset of the offending input.
        pos: usize,
        /// Explanation.
        message: String,
    },

    /// A well-formed token in the wrong place.
    #[error("syntax error at offset {pos}: expected {expected}, got {found}")]
    Syntax {
        /// Byte offset of the offending token.
        pos: usize,
        /// What the parser was looking for.
        expected: String,
        /// What it found instead.
        found: String,
    },

    /// A well-formed but ill-typed predicate.
    #[error("type error: {message}")]
    Type {
        /// Explanation.
        message: String,
    },

    /// The SQL backend could not compile the predicate.
    #[error("sql compile error: {message}")]
    Compile {
        /// Explanation.
        message: String,
    },

    /// The predicate uses an operator shape the JSONB matcher cannot reduce.
    #[error("unsupported by the containment matcher: {message}")]
    Unsupported {
        /// Explanation.
        message: String,
    },

    /// Direct evaluation hit a shape the placeholder set cannot express.
    #[error("evaluation error: {message}")]
    Eval {
        /// Explanation.
        message: String,
    },

    /// An invalid `sum_by` field.
    #[error("aggregate error: {message}")]
    Aggregate {
        /// Explanation.
        message: String,
    },
}

impl Error {
    pub(crate) fn lex(pos: usize, message: impl Into<String>) -> Self {
        Error::Lex {
            pos,
            message: message.into(),
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        Error::Type {
            message: message.into(),
        }
    }

    pub(crate) fn compile(message: impl Into<String>) -> Self {
        Error::Compile {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported {
            message: message.into(),
        }
    }

    /// Byte offset for lexical and syntax errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Lex { pos, .. } | Error::Syntax { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
