//! restmodel — compile and run JSON request documents
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a select
//! restmodel compile user select '{"where": {"age": {"opt": "$gte", "val": 18}}, "limit": [0, 10]}'
//!
//! # Parameterized, with a value for a $bind placeholder
//! restmodel compile user select '{"where": {"id": {"opt": "$bind", "val": "uid"}}}' --bind uid=7
//!
//! # Execute against the configured database
//! restmodel exec user update '{"values": {"visits": "$incr.1"}, "where": {"id": 7}}'
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use restmodel::prelude::*;
use serde_json::{Map, Value as Json};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "restmodel")]
#[command(version)]
#[command(about = "Compile JSON request documents into SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    restmodel compile user select '{\"keys\": [\"id\", \"name\"]}'
    restmodel compile user delete '{\"id\": {\"opt\": \"$in\", \"val\": [1, 2]}}' --inline
    restmodel exec user insert '[{\"name\": \"a\"}, {\"name\": \"b\"}]'")]
struct Cli {
    /// Config file (defaults to $RESTMODEL_CONFIG or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Target SQL dialect, overrides the configured one
    #[arg(short, long, global = true)]
    dialect: Option<Dialect>,

    /// Database connection URL
    #[arg(long, global = true, env = "RESTMODEL_DATABASE_URL")]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Request {
    /// Table name
    table: String,

    /// select, insert, update or delete
    action: Action,

    /// Request body as JSON
    #[arg(default_value = "null")]
    body: String,

    /// Value for a named placeholder, as name=value (value parsed as JSON when possible)
    #[arg(short, long = "bind", value_parser = parse_binding)]
    bindings: Vec<(String, Json)>,

    /// Rows cached from earlier statements, `{table: record | [record, ...]}`
    #[arg(long)]
    rows: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a request and print the SQL
    Compile {
        #[command(flatten)]
        request: Request,

        /// Write values into the SQL text instead of binding them
        #[arg(long)]
        inline: bool,
    },
    /// Compile a request and execute it
    Exec {
        #[command(flatten)]
        request: Request,
    },
    /// List the configured tables
    Tables,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    if let Some(url) = &cli.database_url {
        config.database.url = Some(url.clone());
    }
    if let Some(dialect) = cli.dialect {
        config.database.dialect = Some(dialect);
    }
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Compile { request, inline } => compile_request(&config, &request, inline),
        Commands::Exec { request } => {
            let runtime = tokio::runtime::Runtime::new().context("starting runtime")?;
            runtime.block_on(exec_request(&config, &request))
        }
        Commands::Tables => show_tables(&config),
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("restmodel=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_binding(s: &str) -> Result<(String, Json), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{}`", s))?;
    if name.is_empty() {
        return Err(format!("empty binding name in `{}`", s));
    }
    // Bare words are strings
    let value = serde_json::from_str(value).unwrap_or_else(|_| Json::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Compile the request, resolving row references first.
fn prepare(config: &Config, request: &Request) -> Result<(Compiled, Bindings)> {
    let registry = config.registry()?;
    let table = registry.table(&request.table)?;

    let mut body: Json = serde_json::from_str(&request.body).context("request body is not valid JSON")?;
    if let Some(rows) = &request.rows {
        let rows: Json = serde_json::from_str(rows).context("--rows is not valid JSON")?;
        body = inject(&body, &RowCache::from_json(&rows));
    }

    let compiled = compile(table, &config.access(&request.table), request.action, &body)?;
    let bindings: Map<String, Json> = request.bindings.iter().cloned().collect();
    Ok((compiled, bindings_from_json(&bindings)))
}

fn compile_request(config: &Config, request: &Request, inline: bool) -> Result<()> {
    let dialect = config.dialect();
    let generator = dialect.generator();
    let (compiled, bindings) = prepare(config, request)?;

    for stmt in compiled.into_statements_for(dialect) {
        if inline {
            println!("{}", stmt.to_sql_with_dialect(dialect).white());
            continue;
        }
        let bound = stmt.to_bound(dialect, &bindings)?;
        println!("{}", bound.sql.white());
        if !bound.params.is_empty() {
            println!("{}", "Params:".cyan());
            for (i, param) in bound.params.iter().enumerate() {
                println!("  {} = {}", generator.placeholder(i + 1), param.to_json().to_string().yellow());
            }
        }
    }
    Ok(())
}

async fn exec_request(config: &Config, request: &Request) -> Result<()> {
    let (compiled, bindings) = prepare(config, request)?;
    if config.database.url.is_none() {
        bail!("no database URL. Use --database-url or set RESTMODEL_DATABASE_URL");
    }

    let db = Database::connect_with(&config.database).await?;
    let result = db.run(&compiled, &bindings).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn show_tables(config: &Config) -> Result<()> {
    let registry = config.registry()?;
    if registry.is_empty() {
        println!("{}", "(no tables configured)".dimmed());
        return Ok(());
    }
    for table in registry.tables() {
        println!("{}", table.name.cyan().bold());
        for column in &table.columns {
            let kind = column.col_type.as_deref().unwrap_or("");
            println!("  {} {}", column.name, kind.dimmed());
        }
    }
    Ok(())
}
