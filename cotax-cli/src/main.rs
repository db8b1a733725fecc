use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cotax_cli::app::{self, InlineInputs, RequestSource};
use cotax_cli::config::CliConfig;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Corporate tax calculator.
///
/// Reads company forms from the configured store, computes corporate and
/// local income tax, and prints the resulting tax return record as JSON.
#[derive(Debug, Parser)]
#[command(name = "cotax", version, about)]
struct Cli {
    /// Configuration file (defaults to ./cotax.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store connection string.
    /// For SQLite this is a file path (e.g. `cotax.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate the tax for a request file or for the saved company.
    Calculate {
        /// JSON request with `company`, `inputs` and `adjustments`.
        #[arg(long, conflicts_with_all = ["revenue", "book_income"])]
        request: Option<PathBuf>,

        /// Revenue in won (commas allowed).
        #[arg(long, required_unless_present = "request")]
        revenue: Option<String>,

        /// Net income per the financial statements.
        #[arg(long, required_unless_present = "request")]
        book_income: Option<String>,

        #[arg(long, default_value = "0")]
        expenses: String,

        /// Catalog adjustment as CODE=AMOUNT; repeatable.
        #[arg(long = "adjustment", value_name = "CODE=AMOUNT")]
        adjustments: Vec<String>,

        /// CSV file replacing some or all built-in rate schedules.
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Store the results and the tax return record.
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Show reference limits for adjustment items.
    Limits {
        #[arg(long)]
        revenue: String,

        #[arg(long)]
        total_salary: Option<String>,

        #[arg(long)]
        taxable_income: Option<String>,
    },

    /// Write every input form to a JSON bundle.
    Export {
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore input forms from a JSON bundle.
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List tax classification codes.
    Codes {
        /// Also list adjustment codes.
        #[arg(long, default_value_t = false)]
        adjustments: bool,
    },

    /// Validate and print the rate schedules in effect.
    Rates {
        /// CSV file replacing some or all built-in rate schedules.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set, else the configured level.
/// * Writes to stderr so JSON on stdout stays clean.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?.with_overrides(cli.backend, cli.db);
    init_tracing(&config.log.level);

    match cli.command {
        Command::Calculate {
            request,
            revenue,
            book_income,
            expenses,
            adjustments,
            rates,
            save,
        } => {
            let tables = app::rate_tables(rates.as_deref())?;
            let source = match request {
                Some(path) => RequestSource::File(path),
                None => RequestSource::Inline(InlineInputs {
                    revenue: revenue.unwrap_or_default(),
                    book_income: book_income.unwrap_or_default(),
                    expenses,
                    adjustments,
                }),
            };

            let outcome =
                app::run_calculate(&config.database, source, &tables, Utc::now(), save).await?;
            info!(
                category = %outcome.results.category,
                total_tax = %outcome.tax_return.tax.total_tax,
                "calculation complete"
            );
            println!("{}", serde_json::to_string_pretty(&outcome.tax_return)?);
        }
        Command::Limits {
            revenue,
            total_salary,
            taxable_income,
        } => {
            let limits = app::limits(&revenue, total_salary.as_deref(), taxable_income.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&limits)?);
        }
        Command::Export { output } => {
            let store = app::open_store(&config.database).await?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create: {}", path.display()))?;
                    app::export(store.as_ref(), file, Utc::now()).await?;
                    info!(path = %path.display(), "export complete");
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    app::export(store.as_ref(), &mut stdout, Utc::now()).await?;
                    writeln!(stdout)?;
                }
            }
        }
        Command::Import { input } => {
            let store = app::open_store(&config.database).await?;
            app::import(store.as_ref(), &input).await?;
        }
        Command::Codes { adjustments } => app::write_codes(io::stdout().lock(), adjustments)?,
        Command::Rates { file } => {
            let tables = app::rate_tables(file.as_deref())?;
            let mut stdout = io::stdout().lock();
            app::write_rates(&mut stdout, &tables)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
