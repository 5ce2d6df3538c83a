//! CLI support for ledger-query
//!
//! Provides programmatic access to the `lq` commands for embedding in other
//! tools.

mod check;
mod compile;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use compile::{SqlOptions, execute_shapes, execute_sql};
pub use convert::{parse_input, parse_values, set_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Lexing, parsing, type checking, compilation or evaluation failed
    #[error(transparent)]
    Query(#[from] crate::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Input must be a JSON object")]
    InputNotObject,

    #[error("--values must be a JSON array")]
    ValuesNotArray,

    #[error("Unknown table: '{0}'\nKnown tables: {tables}", tables = crate::schema::LEDGER_TABLES.join(", "))]
    UnknownTable(String),

    #[error("Unknown category: '{0}'\nRun 'lq docs' to see available categories.")]
    UnknownCategory(String),
}
