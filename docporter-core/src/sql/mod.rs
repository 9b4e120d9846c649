//! SQL dialect rules and script generation.
//!
//! A [`SqlDialect`] owns everything that differs between target databases:
//! identifier quoting, column type names, string escaping, and literal
//! rendering. [`generate_script`] combines the schema analyzer with the
//! dialect rules to emit a DROP / CREATE TABLE / INSERT script for a
//! document set.

mod script;

pub use script::{generate_script, write_script};

use crate::schema::FieldType;
use bson::Bson;

/// Target SQL flavor for generated scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    /// Microsoft SQL Server
    MsSql,
    /// MySQL / MariaDB
    MySql,
}

impl SqlDialect {
    /// Short lowercase name, used in default output file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::MsSql => "mssql",
            Self::MySql => "mysql",
        }
    }

    /// SQL column type for an inferred value kind.
    ///
    /// Anything without a native SQL representation (strings, object ids,
    /// arrays, nested documents, nulls) lands in the dialect's unbounded
    /// text type.
    pub fn column_type(self, field_type: FieldType) -> &'static str {
        match (self, field_type) {
            (_, FieldType::Int32) => "INT",
            (_, FieldType::Int64) => "BIGINT",
            (Self::MsSql, FieldType::Double) => "FLOAT",
            (Self::MySql, FieldType::Double) => "DOUBLE",
            (Self::MsSql, FieldType::Boolean) => "BIT",
            (Self::MySql, FieldType::Boolean) => "BOOLEAN",
            (Self::MsSql, FieldType::DateTime) => "DATETIME2",
            (Self::MySql, FieldType::DateTime) => "DATETIME",
            (Self::MsSql, _) => "NVARCHAR(MAX)",
            (Self::MySql, _) => "TEXT",
        }
    }

    /// Quotes a table or column identifier.
    ///
    /// MySQL backtick-quotes identifiers; SQL Server leaves them bare.
    pub fn quote_ident(self, name: &str) -> String {
        match self {
            Self::MsSql => name.to_string(),
            Self::MySql => format!("`{}`", name),
        }
    }

    /// Column definition for the synthetic auto-increment primary key.
    pub fn id_column_def(self) -> &'static str {
        match self {
            Self::MsSql => "id INT IDENTITY(1,1) PRIMARY KEY",
            Self::MySql => "`id` INT AUTO_INCREMENT PRIMARY KEY",
        }
    }

    /// Escapes a string for inclusion in a quoted SQL literal.
    ///
    /// SQL Server doubles single quotes; MySQL backslash-escapes
    /// backslash, quote, CR, and LF.
    pub fn escape_string(self, s: &str) -> String {
        match self {
            Self::MsSql => s.replace('\'', "''"),
            Self::MySql => s
                .replace('\\', "\\\\")
                .replace('\'', "\\'")
                .replace('\r', "\\r")
                .replace('\n', "\\n"),
        }
    }

    /// Renders a BSON value as a SQL literal.
    ///
    /// Numerics render unquoted, booleans as 1/0, datetimes as a quoted
    /// `yyyy-MM-dd HH:mm:ss` literal in UTC, and everything else as a
    /// quoted, escaped string (SQL Server literals take the `N` prefix).
    pub fn literal(self, value: &Bson) -> String {
        match value {
            Bson::Null => "NULL".to_string(),
            Bson::Int32(i) => i.to_string(),
            Bson::Int64(i) => i.to_string(),
            Bson::Double(d) => d.to_string(),
            Bson::Boolean(b) => (if *b { "1" } else { "0" }).to_string(),
            Bson::DateTime(dt) => {
                format!("'{}'", dt.to_chrono().format("%Y-%m-%d %H:%M:%S"))
            }
            Bson::ObjectId(oid) => self.string_literal(&oid.to_hex()),
            Bson::String(s) => self.string_literal(s),
            other => self.string_literal(&other.to_string()),
        }
    }

    fn string_literal(self, s: &str) -> String {
        match self {
            Self::MsSql => format!("N'{}'", self.escape_string(s)),
            Self::MySql => format!("'{}'", self.escape_string(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};
    use chrono::TimeZone;

    #[test]
    fn test_column_type_mapping() {
        assert_eq!(SqlDialect::MsSql.column_type(FieldType::Int32), "INT");
        assert_eq!(SqlDialect::MySql.column_type(FieldType::Int64), "BIGINT");
        assert_eq!(SqlDialect::MsSql.column_type(FieldType::Double), "FLOAT");
        assert_eq!(SqlDialect::MySql.column_type(FieldType::Double), "DOUBLE");
        assert_eq!(SqlDialect::MsSql.column_type(FieldType::Boolean), "BIT");
        assert_eq!(SqlDialect::MySql.column_type(FieldType::Boolean), "BOOLEAN");
        assert_eq!(
            SqlDialect::MsSql.column_type(FieldType::DateTime),
            "DATETIME2"
        );
        assert_eq!(
            SqlDialect::MySql.column_type(FieldType::DateTime),
            "DATETIME"
        );
        assert_eq!(
            SqlDialect::MsSql.column_type(FieldType::String),
            "NVARCHAR(MAX)"
        );
        assert_eq!(SqlDialect::MySql.column_type(FieldType::Array), "TEXT");
        assert_eq!(SqlDialect::MySql.column_type(FieldType::Document), "TEXT");
        assert_eq!(SqlDialect::MsSql.column_type(FieldType::Null), "NVARCHAR(MAX)");
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(SqlDialect::MsSql.quote_ident("users"), "users");
        assert_eq!(SqlDialect::MySql.quote_ident("users"), "`users`");
    }

    #[test]
    fn test_mssql_escape_round_trip() {
        let original = "it's a 'test'";
        let escaped = SqlDialect::MsSql.escape_string(original);
        assert_eq!(escaped, "it''s a ''test''");
        // reversing the doubled quotes reconstructs the original
        assert_eq!(escaped.replace("''", "'"), original);
    }

    #[test]
    fn test_mysql_escape_round_trip() {
        let original = "a\\b'c\rd\ne";
        let escaped = SqlDialect::MySql.escape_string(original);
        assert_eq!(escaped, "a\\\\b\\'c\\rd\\ne");

        let reversed = escaped
            .replace("\\n", "\n")
            .replace("\\r", "\r")
            .replace("\\'", "'")
            .replace("\\\\", "\\");
        assert_eq!(reversed, original);
    }

    #[test]
    fn test_numeric_literals_are_unquoted() {
        assert_eq!(SqlDialect::MySql.literal(&Bson::Int32(42)), "42");
        assert_eq!(SqlDialect::MsSql.literal(&Bson::Int64(-7)), "-7");
        assert_eq!(SqlDialect::MySql.literal(&Bson::Double(2.5)), "2.5");
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(SqlDialect::MsSql.literal(&Bson::Boolean(true)), "1");
        assert_eq!(SqlDialect::MySql.literal(&Bson::Boolean(false)), "0");
    }

    #[test]
    fn test_null_literal() {
        assert_eq!(SqlDialect::MsSql.literal(&Bson::Null), "NULL");
    }

    #[test]
    fn test_datetime_literal_is_utc_seconds() {
        let when = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
        let value = Bson::DateTime(bson::DateTime::from_chrono(when));
        assert_eq!(
            SqlDialect::MySql.literal(&value),
            "'2024-05-01 12:30:45'"
        );
        assert_eq!(
            SqlDialect::MsSql.literal(&value),
            "'2024-05-01 12:30:45'"
        );
    }

    #[test]
    fn test_string_literals_are_dialect_escaped() {
        let value = Bson::String("o'clock".to_string());
        assert_eq!(SqlDialect::MsSql.literal(&value), "N'o''clock'");
        assert_eq!(SqlDialect::MySql.literal(&value), "'o\\'clock'");
    }

    #[test]
    fn test_object_id_literal_is_quoted_hex() {
        let oid = ObjectId::new();
        let rendered = SqlDialect::MySql.literal(&Bson::ObjectId(oid));
        assert_eq!(rendered, format!("'{}'", oid.to_hex()));
    }

    #[test]
    fn test_container_literal_is_quoted_text() {
        let value = Bson::Document(doc! { "a": 1 });
        let rendered = SqlDialect::MySql.literal(&value);
        assert!(rendered.starts_with('\''));
        assert!(rendered.ends_with('\''));
        assert!(rendered.contains("\"a\""));
    }
}
