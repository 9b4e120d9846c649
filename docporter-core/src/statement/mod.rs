//! Native-statement parsing and execution.
//!
//! Supports one line of the restricted shell form
//! `db.<collection>.<method>(<args>)` — the subset of the document-database
//! shell syntax that maps onto a single driver call. Parsing never executes
//! anything: a statement either parses completely or fails with a
//! [`crate::DocPorterError::StatementParse`] error.
//!
//! # Module Structure
//! - `parser`: statement shape matching and top-level argument splitting
//! - `executor`: method dispatch against a database handle and result
//!   shaping

mod executor;
mod parser;

pub use executor::{
    FIND_LIMIT, StatementOutcome, TabularResult, execute_parsed, execute_statement, render_plain,
};
pub use parser::{Method, ParsedStatement, parse_statement, split_args};
