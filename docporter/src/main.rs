//! MongoDB collection export and native-statement tool.
//!
//! Exports MongoDB collections as SQL scripts (SQL Server or MySQL
//! dialect), executes one-line native statements of the
//! `db.<collection>.<method>(<args>)` form, and enumerates databases,
//! collections, and indexes.

use clap::{Args, Parser, Subcommand, ValueEnum};
use docporter_core::{
    MongoSource, Result, SkipFields, SqlDialect, StatementOutcome, TabularResult,
    error::redact_database_url, execute_statement, generate_script, init_logging,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "docporter")]
#[command(about = "MongoDB collection export and native-statement tool")]
#[command(version)]
#[command(long_about = "
docporter - MongoDB collection export and native-statement tool

Exports whole collections as relational SQL scripts by inferring a unified
column set from the documents, and runs one-line native statements against
a live database.

EXAMPLES:
  docporter export --database-url mongodb://localhost/shop --collection orders --dialect mysql
  docporter exec --database-url mongodb://localhost/shop 'db.orders.find({\"qty\":{\"$gt\":3}})'
  docporter list --database-url mongodb://localhost
  docporter test --database-url mongodb://localhost
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Export a collection as a SQL script
    Export(ExportArgs),
    /// Execute one native statement (db.collection.method(args))
    Exec(ExecArgs),
    /// List databases, collections, or indexes
    List(ListArgs),
    /// Test the database connection
    Test(TestArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// MongoDB connection string (credentials are sanitized in logs)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Database name (defaults to the one in the connection URL)
    #[arg(long)]
    database: Option<String>,

    /// Collection to export
    #[arg(long)]
    collection: String,

    /// Target SQL dialect
    #[arg(long, value_enum)]
    dialect: DialectArg,

    /// Output file path (defaults to <collection>_<dialect>.sql)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional field names to exclude from the export
    #[arg(long = "skip-field", value_delimiter = ',')]
    skip_fields: Vec<String>,

    /// Export every field, dropping the built-in exclusion list
    #[arg(long)]
    no_default_skip_fields: bool,

    /// Cap the number of exported documents
    #[arg(long)]
    limit: Option<i64>,
}

#[derive(Args)]
struct ExecArgs {
    /// MongoDB connection string (credentials are sanitized in logs)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Database name (defaults to the one in the connection URL)
    #[arg(long)]
    database: Option<String>,

    /// Native statement to execute, e.g. db.users.find({})
    statement: String,
}

#[derive(Args)]
struct ListArgs {
    /// MongoDB connection string (credentials are sanitized in logs)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// List collections of this database instead of databases
    #[arg(long)]
    database: Option<String>,

    /// List indexes of this collection (requires --database)
    #[arg(long, requires = "database")]
    collection: Option<String>,

    /// Include system databases (admin, config, local)
    #[arg(long)]
    include_system: bool,
}

#[derive(Args)]
struct TestArgs {
    /// MongoDB connection string to test
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

/// Target SQL dialect CLI value.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    /// Microsoft SQL Server
    Mssql,
    /// MySQL / MariaDB
    Mysql,
}

impl From<DialectArg> for SqlDialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Mssql => Self::MsSql,
            DialectArg::Mysql => Self::MySql,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    match cli.command {
        Command::Export(args) => export(args).await,
        Command::Exec(args) => exec(args).await,
        Command::List(args) => list(args).await,
        Command::Test(args) => test_connection(args).await,
    }
}

/// Exports a collection as a SQL script file.
async fn export(args: ExportArgs) -> Result<()> {
    let dialect = SqlDialect::from(args.dialect);

    info!("Target: {}", redact_database_url(&args.database_url));

    let source = MongoSource::connect(&args.database_url).await?;
    let database = source.database_name(args.database.as_deref())?;

    let mut skip_fields = if args.no_default_skip_fields {
        SkipFields::none()
    } else {
        SkipFields::default()
    };
    for field in &args.skip_fields {
        skip_fields.insert(field.as_str());
    }

    let documents = source
        .fetch_documents(&database, &args.collection, args.limit)
        .await?;

    if documents.is_empty() {
        info!(
            "Collection '{}.{}' is empty; writing an empty script",
            database, args.collection
        );
    }

    let mut script = Vec::new();
    generate_script(&mut script, dialect, &args.collection, &documents, &skip_fields)?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_{}.sql", args.collection, dialect.name())));

    tokio::fs::write(&output, &script).await.map_err(|e| {
        docporter_core::DocPorterError::io_failed(
            format!("Failed to write to {}", output.display()),
            e,
        )
    })?;

    info!("✓ Export completed");
    println!(
        "Exported {} documents from {}.{} to {}",
        documents.len(),
        database,
        args.collection,
        output.display()
    );

    Ok(())
}

/// Executes one native statement and prints the outcome.
async fn exec(args: ExecArgs) -> Result<()> {
    let source = MongoSource::connect(&args.database_url).await?;
    let database = source.database(args.database.as_deref())?;

    match execute_statement(&database, &args.statement).await {
        Ok(outcome) => {
            print_outcome(&outcome);
            Ok(())
        }
        Err(e) => {
            // user error: report and exit nonzero
            eprintln!("Execution failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Prints a statement outcome in a shell-friendly form.
fn print_outcome(outcome: &StatementOutcome) {
    match outcome {
        StatementOutcome::Documents(table) => {
            if table.is_empty() {
                println!("no records");
            } else {
                print!("{}", format_table(table));
                println!("{} records", table.rows.len());
            }
        }
        StatementOutcome::Deleted { count } => {
            println!("delete completed, deleted: {}", count);
        }
        StatementOutcome::Updated { matched, modified } => {
            println!("update completed, matched: {}, modified: {}", matched, modified);
        }
        StatementOutcome::Inserted { count } => {
            println!("insert completed, inserted: {}", count);
        }
    }
}

/// Renders a tabular result as an aligned text table.
fn format_table(table: &TabularResult) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(String::len).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.len());
            }
        }
    }

    let mut out = String::new();
    let render_row = |cells: &[String], widths: &[usize]| -> String {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, w)| format!("{:<w$}", cell))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    out.push_str(&render_row(&table.columns, &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in &table.rows {
        out.push_str(&render_row(row, &widths));
        out.push('\n');
    }
    out
}

/// Lists databases, collections of a database, or indexes of a collection.
async fn list(args: ListArgs) -> Result<()> {
    let source = MongoSource::connect(&args.database_url).await?;

    match (&args.database, &args.collection) {
        (Some(database), Some(collection)) => {
            let indexes = source.list_indexes(database, collection).await?;
            for index in indexes {
                let keys = index
                    .keys
                    .iter()
                    .map(|k| match k.direction {
                        Some(docporter_core::source::IndexDirection::Descending) => {
                            format!("{} desc", k.field)
                        }
                        _ => k.field.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let unique = if index.unique { " (unique)" } else { "" };
                println!("{}: {}{}", index.name, keys, unique);
            }
        }
        (Some(database), None) => {
            let collections = source.list_collections(database).await?;
            for entry in collections {
                println!("{} [{}]", entry.name, entry.kind);
            }
        }
        (None, _) => {
            let databases = source.list_databases(args.include_system).await?;
            for entry in databases {
                match entry.size_bytes {
                    Some(size) => println!("{} ({} bytes)", entry.name, size),
                    None => println!("{}", entry.name),
                }
            }
        }
    }

    Ok(())
}

/// Tests the database connection without doing anything else.
async fn test_connection(args: TestArgs) -> Result<()> {
    info!("Testing connection to {}", redact_database_url(&args.database_url));

    let source = MongoSource::connect(&args.database_url).await?;
    source.test_connection().await?;

    println!("Connection successful");
    Ok(())
}
