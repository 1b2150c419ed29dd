mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    describe::{DescArgs, FieldsArgs, ShowArgs},
    mutate::MutateArgs,
    query::QueryArgs,
};
use sfbulk::{Action, SfBulkError, core::ClientError};
use sfctl::settings::{Backend, Settings};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "sfctl",
    about = "Query and bulk-maintain CRM records with CSV files"
)]
struct Cli {
    /// Echo every row while mutating and report errors with their full chain
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (sfbulk.toml in the working directory if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Client variant, overriding the configured backend
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one line per field of an object type
    Desc(DescArgs),
    /// Print the fields of an object type as JSON
    Fields(FieldsArgs),
    /// Run a query
    Query(QueryArgs),
    /// List remote object types
    Show(ShowArgs),
    /// Create one record per CSV row
    Create(MutateArgs),
    /// Update records by Id, one per CSV row
    Update(MutateArgs),
    /// Delete records by Id, one per CSV row
    Delete(MutateArgs),
}

/// Shared state handed to every command.
pub struct Context {
    pub settings: Settings,
    pub verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match run(cli) {
        Err(err) if !verbose => {
            eprintln!("{}", one_line(&err));
            std::process::exit(1);
        }
        result => result,
    }
}

fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    init_tracing(&settings.log_level, cli.verbose);

    let ctx = Context {
        settings,
        verbose: cli.verbose,
    };
    match cli.command {
        Commands::Desc(args) => args.run(&ctx),
        Commands::Fields(args) => args.run(&ctx),
        Commands::Query(args) => args.run(&ctx),
        Commands::Show(args) => args.run(&ctx),
        Commands::Create(args) => args.run(&ctx, Action::Create),
        Commands::Update(args) => args.run(&ctx, Action::Update),
        Commands::Delete(args) => args.run(&ctx, Action::Delete),
    }
}

/// `RUST_LOG` wins; otherwise the configured level, raised to `debug` by `-v`.
fn init_tracing(log_level: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// `Kind: message` for library errors, the plain message otherwise.
fn one_line(err: &anyhow::Error) -> String {
    if let Some(err) = err.downcast_ref::<SfBulkError>() {
        format!("{}: {err}", err.kind())
    } else if let Some(err) = err.downcast_ref::<ClientError>() {
        format!("RemoteError: {err}")
    } else {
        format!("Error: {err:#}")
    }
}
