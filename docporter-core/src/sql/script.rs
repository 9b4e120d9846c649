//! CREATE TABLE / INSERT script emission.

use super::SqlDialect;
use crate::error::{DocPorterError, Result};
use crate::schema::{ColumnDescriptor, SchemaAnalyzer, SkipFields};
use bson::{Bson, Document};
use std::io::Write;

/// Analyzes `documents` and writes a full export script to `out`.
///
/// The script consists of a drop-if-exists guard, a CREATE TABLE statement
/// with a synthetic auto-increment `id` primary key followed by the inferred
/// columns in first-seen order, and one INSERT statement per document. An
/// empty document set produces no output at all.
pub fn generate_script<W: Write>(
    out: &mut W,
    dialect: SqlDialect,
    table: &str,
    documents: &[Document],
    skip_fields: &SkipFields,
) -> Result<()> {
    if documents.is_empty() {
        return Ok(());
    }

    let columns = SchemaAnalyzer::analyze_all(documents, skip_fields.clone());
    write_script(out, dialect, table, documents, &columns)
}

/// Writes the export script for an already-analyzed column set.
///
/// Documents are rendered against `columns` exactly: a field missing from a
/// document becomes SQL `NULL`, and fields outside the column set are
/// ignored. Statements are emitted as independent strings, one INSERT per
/// document.
pub fn write_script<W: Write>(
    out: &mut W,
    dialect: SqlDialect,
    table: &str,
    documents: &[Document],
    columns: &[ColumnDescriptor],
) -> Result<()> {
    let table_ident = dialect.quote_ident(table);

    // drop-if-exists guard
    writeln!(out, "-- drop existing table").map_err(write_error)?;
    match dialect {
        SqlDialect::MsSql => {
            writeln!(out, "IF OBJECT_ID('{}', 'U') IS NOT NULL", table).map_err(write_error)?;
            writeln!(out, "    DROP TABLE {};", table_ident).map_err(write_error)?;
        }
        SqlDialect::MySql => {
            writeln!(out, "DROP TABLE IF EXISTS {};", table_ident).map_err(write_error)?;
        }
    }
    writeln!(out).map_err(write_error)?;

    // table definition, synthetic id column first
    writeln!(out, "-- create table").map_err(write_error)?;
    writeln!(out, "CREATE TABLE {} (", table_ident).map_err(write_error)?;

    let mut column_defs = vec![format!("    {}", dialect.id_column_def())];
    for column in columns {
        column_defs.push(format!(
            "    {} {}",
            dialect.quote_ident(&column.name),
            dialect.column_type(column.field_type)
        ));
    }
    writeln!(out, "{}", column_defs.join(",\n")).map_err(write_error)?;

    match dialect {
        SqlDialect::MsSql => writeln!(out, ");").map_err(write_error)?,
        SqlDialect::MySql => writeln!(
            out,
            ") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;"
        )
        .map_err(write_error)?,
    }
    writeln!(out).map_err(write_error)?;

    if documents.is_empty() {
        return Ok(());
    }

    // one INSERT per document, no multi-row merging
    writeln!(out, "-- insert data").map_err(write_error)?;
    let column_list = columns
        .iter()
        .map(|c| dialect.quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");

    for doc in documents {
        let values = columns
            .iter()
            .map(|c| dialect.literal(doc.get(&c.name).unwrap_or(&Bson::Null)))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "INSERT INTO {} ({}) VALUES ({});",
            table_ident, column_list, values
        )
        .map_err(write_error)?;
    }

    Ok(())
}

fn write_error(source: std::io::Error) -> DocPorterError {
    DocPorterError::io_failed("Failed to write SQL script", source)
}
