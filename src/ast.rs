//! # Predicate Language - Abstract Syntax Tree
//!
//! This module defines the syntax tree for the ledger predicate language, the
//! boolean filter language used to select transactions, unspent outputs,
//! accounts and assets.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the scanner
//! - **[expressions]** - Expression nodes (literals, attributes, selectors, operators)
//! - **[operators]** - Binary operators and their precedence
//! - **[predicate]** - A parsed and type-checked predicate with its arity
//!
//! ## Quick Start
//!
//! ```text
//! asset_alias = 'gold' AND amount > $1
//! ```
//!
//! Matches outputs of the `gold` asset whose amount exceeds the first bound value.
//!
//! ## Core Concepts
//!
//! ### Attributes and selectors
//!
//! A bare name reads a top-level attribute. A dotted chain reads into a JSON
//! object, for example tags or reference data:
//!
//! ```text
//! account_tags.type = 'checking'
//! reference_data.invoice.id = 'inv-1'
//! ```
//!
//! ### Existential quantifiers
//!
//! `name(body)` holds when at least one element of the sub-object list `name`
//! satisfies `body`:
//!
//! ```text
//! inputs(account_alias = 'alice') AND outputs(account_alias = 'bob')
//! ```
//!
//! ### Placeholders
//!
//! `$1`, `$2`, ... stand for values supplied separately from the predicate
//! text. The largest index used is the predicate's arity.
//!
//! ### Precedence
//!
//! `OR` binds loosest, then `AND`, then the comparisons `=`, `!=`, `<`, `<=`,
//! `>`, `>=`. So `a = 1 AND b = 2 OR c = 3` groups as `(a = 1 AND b = 2) OR c = 3`.
pub mod expressions;
pub mod operators;
pub mod predicate;
pub mod tokens;

pub use expressions::{Expr, Literal};
pub use operators::BinOp;
pub use predicate::Predicate;
pub use tokens::Token;
