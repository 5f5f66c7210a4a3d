//! # Sift Filter Language - Abstract Syntax Tree
//!
//! This module defines the tokens and syntax tree of the sift filter
//! language, a small expression language for deciding whether a record of
//! named, typed fields matches a condition.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, field references, operations)
//! - **[operators]** - Binary operators (comparison, arithmetic, logical)
//!
//! ## Quick Start
//!
//! ```text
//! (date >= "2018-08-01" and date < "2018-09-01") or (cat = "grocery" and amt > 75.0)
//! ```
//!
//! ## Core Concepts
//!
//! ### Values
//!
//! Every expression evaluates to a number or a string. Comparisons and
//! `and`/`or` produce the numbers `1` (true) and `0` (false); there is no
//! separate boolean type.
//!
//! ### Precedence
//!
//! From loosest to tightest: `and`/`or` (equal precedence, left to right),
//! comparisons (`=`, `<>`, `<`, `<=`, `>`, `>=`, `=~`), `+`/`-`, `*`/`/`,
//! then literals, fields and parenthesized groups.
//!
//! ## Examples
//!
//! ```text
//! body =~ "todo"
//! cat <> ""
//! debit + credit > 4.5
//! "ab" * 3 = "ababab"
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::BinOp;
pub use tokens::{Token, TokenKind};
