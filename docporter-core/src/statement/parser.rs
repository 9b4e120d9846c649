//! Statement shape matching and argument splitting.

use crate::error::{DocPorterError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `db.<collection>.<method>(<args>)`, greedy to the last close-paren.
static STATEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^db\.(\w+)\.(\w+)\((.*)\)$").expect("statement pattern"));

/// The fixed set of recognized statement methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `find(filter?)` — up to [`super::FIND_LIMIT`] matching documents
    Find,
    /// `deleteone(filter?)` — delete the first match
    DeleteOne,
    /// `deletemany(filter?)` — delete every match
    DeleteMany,
    /// `updateone(filter, update)` — update the first match
    UpdateOne,
    /// `updatemany(filter, update)` — update every match
    UpdateMany,
    /// `insertone(document)` — insert a single document
    InsertOne,
    /// `insertmany([documents])` — insert an array of documents
    InsertMany,
    /// `aggregate([stages])` — run an aggregation pipeline
    Aggregate,
}

impl Method {
    /// Looks up a method by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "find" => Some(Self::Find),
            "deleteone" => Some(Self::DeleteOne),
            "deletemany" => Some(Self::DeleteMany),
            "updateone" => Some(Self::UpdateOne),
            "updatemany" => Some(Self::UpdateMany),
            "insertone" => Some(Self::InsertOne),
            "insertmany" => Some(Self::InsertMany),
            "aggregate" => Some(Self::Aggregate),
            _ => None,
        }
    }

    /// Canonical lowercase method name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::DeleteOne => "deleteone",
            Self::DeleteMany => "deletemany",
            Self::UpdateOne => "updateone",
            Self::UpdateMany => "updatemany",
            Self::InsertOne => "insertone",
            Self::InsertMany => "insertmany",
            Self::Aggregate => "aggregate",
        }
    }
}

/// A successfully parsed native statement.
///
/// Holds the target collection name, the recognized method, and the raw
/// argument text between the outer parentheses (not yet split or parsed as
/// JSON). Consumed immediately by the executor; not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    /// Target collection name
    pub collection: String,
    /// Recognized statement method
    pub method: Method,
    /// Raw argument text between the outer parentheses
    pub raw_args: String,
}

/// Parses one line of the `db.<collection>.<method>(<args>)` form.
///
/// The whole (trimmed) input must match the shape; a missing `db.` prefix
/// or unbalanced trailing paren is a parse error, never a partial result.
/// A well-formed statement naming a method outside the recognized set
/// reports [`DocPorterError::UnsupportedMethod`] instead.
pub fn parse_statement(input: &str) -> Result<ParsedStatement> {
    let input = input.trim();
    let captures = STATEMENT_RE.captures(input).ok_or_else(|| {
        DocPorterError::statement_parse("only the db.collection.method(args) form is supported")
    })?;

    let method_name = &captures[2];
    let method = Method::from_name(method_name)
        .ok_or_else(|| DocPorterError::unsupported_method(method_name))?;

    Ok(ParsedStatement {
        collection: captures[1].to_string(),
        method,
        raw_args: captures[3].to_string(),
    })
}

/// Splits raw argument text on top-level commas.
///
/// Commas nested inside `{}`/`[]` pairs are not split points, and neither
/// are commas (or brackets) inside double-quoted JSON string literals —
/// the splitter tracks quote state and backslash escapes, so
/// `{"note": "a, b"}` stays one argument. Each piece is trimmed of
/// surrounding whitespace.
pub fn split_args(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth: u32 = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth = depth.saturating_add(1),
            '}' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(raw[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < raw.len() {
        parts.push(raw[start..].trim().to_string());
    }
    parts
}
