//! Core engine for docporter.
//!
//! This crate provides the pieces behind the `docporter` CLI: a schema
//! unifier that projects a set of heterogeneous MongoDB documents onto a
//! single relational column set, a SQL script generator for the MsSql and
//! MySql dialects, and a mini-interpreter for native statements of the
//! `db.<collection>.<method>(<args>)` form.
//!
//! # Architecture
//! - `schema`: value-kind classification, type unification, column analysis
//! - `sql`: dialect rules and CREATE/INSERT script emission
//! - `statement`: native-statement parsing and execution
//! - `source`: MongoDB connection management and enumeration
//!
//! The transforms in `schema` and `sql` are pure and synchronous; only the
//! `source` and `statement` modules talk to a live server. No shared mutable
//! state exists across invocations, so every entry point is reentrant.

pub mod error;
pub mod logging;
pub mod schema;
pub mod source;
pub mod sql;
pub mod statement;

// Re-export commonly used types
pub use error::{DocPorterError, Result};
pub use logging::init_logging;
pub use schema::{ColumnDescriptor, FieldType, SchemaAnalyzer, SkipFields};
pub use source::MongoSource;
pub use sql::{SqlDialect, generate_script};
pub use statement::{
    ParsedStatement, StatementOutcome, TabularResult, execute_statement, parse_statement,
};
