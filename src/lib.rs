//! Predicate language for filtering ledger transactions, outputs, accounts
//! and assets.
//!
//! A predicate is parsed once into a [`Predicate`] and then handed to one of
//! three backends: direct evaluation ([`evaluate`]), SQL compilation
//! ([`compile`]) or containment shapes ([`matching_shapes`]).

pub mod aggregate;
pub mod ast;
pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod jsonb;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod registry;
pub mod schema;
pub mod set;
pub mod sql;
pub mod typecheck;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use aggregate::{Balance, SumBy, sum_by};
pub use ast::{BinOp, Expr, Literal, Predicate, Token};
pub use config::Config;
pub use env::{Environment, MapEnv, SchemaEnv};
pub use error::{Error, Result};
pub use evaluator::{Evaluator, eval, evaluate, evaluate_with, matches};
pub use jsonb::{contains, matching_shapes, predicate_shapes};
pub use lexer::Lexer;
pub use parser::{Parser, parse, parse_for_table};
pub use registry::{FilterId, FilterRegistry};
pub use schema::{ForeignKey, SqlColumn, SqlTable, SqlType};
pub use set::Set;
pub use sql::{SqlExpr, compile, compile_with_offset};
pub use typecheck::{Type, type_check};
pub use value::Value;
