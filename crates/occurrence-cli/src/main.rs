//! `occur` CLI — validate, normalize, expand and label recurrence tokens.
//!
//! ## Usage
//!
//! ```sh
//! # Check tokens against the grammar
//! occur validate WEEKLY_MONDAY MONTHLY_DAY_32
//!
//! # Add a token to a set and print the canonical result
//! occur normalize --action add --token MONTHLY_DAY_5 WEEKLY_MONDAY 2024-01-01
//!
//! # Expand a to-do (stdin → stdout)
//! echo '{"startsOn":"2026-02-01","endsOn":"2026-02-28","occurrences":["WEEKLY_MONDAY"]}' | occur expand
//!
//! # Calendar-grid expansion from a file
//! occur expand --mode days -i todo.json
//!
//! # Which to-dos fall on a date
//! occur on 2026-02-02 -i todos.json
//!
//! # Labels, and the next occurrence after a date
//! occur label MONTHLY_DAY_15 WEEKLY_FRIDAY
//! occur next --from 2026-02-10 -i todo.json
//!
//! # Expansion policy from a JSON file, overridden by flags
//! occur --config options.json --horizon-days 90 expand -i todo.json
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=occurrence_engine=trace`).

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use occurrence_engine::{
    expand, is_valid_occurrence, next_occurrence_with, parse_date, repeats_labels,
    todos_by_date_with, transmogrify_occurrences, Action, ExpandOptions, ExpansionMode, OpenEnd,
    RecurringItem,
};
use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "occur", version, about = "Recurrence tokens for to-do items")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with expansion options (`open_end`, `horizon_days`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Days to expand past the start when an item has no end date
    #[arg(long, global = true)]
    horizon_days: Option<u32>,

    /// Treat a missing end date as the start date
    #[arg(long, global = true)]
    anchor_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check tokens against the occurrence grammar
    Validate {
        #[arg(required = true)]
        tokens: Vec<String>,
        /// Exit with an error if any token is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Add, remove or vet tokens and print the canonical set
    Normalize {
        /// add, remove or vet
        #[arg(short, long, default_value = "vet")]
        action: Action,
        /// Token to add or remove
        #[arg(short, long)]
        token: Option<String>,
        /// The current set
        tokens: Vec<String>,
    },
    /// Expand a to-do into a JSON array of dates
    Expand {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// range (date lists) or days (calendar highlighting)
        #[arg(short, long, default_value = "range")]
        mode: ExpansionMode,
    },
    /// Print the to-dos from a JSON array that occur on a date
    On {
        date: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print one human-readable label per line
    Label { tokens: Vec<String> },
    /// Print the next occurrence of a to-do, if any
    Next {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// First date to consider (defaults to today)
        #[arg(long)]
        from: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let options = load_options(&cli)?;
    debug!(?options, "expansion options");

    match cli.command {
        Commands::Validate { tokens, strict } => {
            let mut invalid = 0;
            for token in &tokens {
                let verdict = if is_valid_occurrence(token) {
                    "valid"
                } else {
                    invalid += 1;
                    "invalid"
                };
                println!("{}\t{}", token, verdict);
            }
            if strict && invalid > 0 {
                anyhow::bail!("{} of {} tokens are invalid", invalid, tokens.len());
            }
        }
        Commands::Normalize {
            action,
            token,
            tokens,
        } => {
            for canonical in transmogrify_occurrences(&tokens, action, token.as_deref()) {
                println!("{}", canonical);
            }
        }
        Commands::Expand { input, mode } => {
            let item = read_item(input.as_ref())?;
            let schedule = item.schedule().context("Failed to parse to-do dates")?;
            let dates: Vec<String> = expand(&schedule, mode, &options)
                .into_iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect();
            println!("{}", serde_json::to_string(&dates)?);
        }
        Commands::On { date, input } => {
            parse_date(&date).with_context(|| format!("Invalid query date: {}", date))?;
            let json = read_input(input.as_ref())?;
            let todos = parse_todos(&json)?;
            let matches: Vec<&Value> = todos_by_date_with(&todos, &date, &options)
                .into_iter()
                .map(|todo| &todo.raw)
                .collect();
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        Commands::Label { tokens } => {
            for label in repeats_labels(&tokens) {
                println!("{}", label);
            }
        }
        Commands::Next { input, from } => {
            let item = read_item(input.as_ref())?;
            let from: NaiveDate = match from {
                Some(raw) => {
                    parse_date(&raw).with_context(|| format!("Invalid --from date: {}", raw))?
                }
                None => Local::now().date_naive(),
            };
            if let Some(date) = next_occurrence_with(&item, from, &options) {
                println!("{}", date.format("%Y-%m-%d"));
            }
        }
    }

    Ok(())
}

/// Logs to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// `--config` file first, then flag overrides.
fn load_options(cli: &Cli) -> Result<ExpandOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid config JSON: {}", path.display()))?
        }
        None => ExpandOptions::default(),
    };
    if let Some(days) = cli.horizon_days {
        options = options.with_horizon_days(days);
    }
    if cli.anchor_only {
        options.open_end = OpenEnd::AnchorOnly;
    }
    options.validate().context("Invalid expansion options")?;
    Ok(options)
}

/// A to-do read from JSON, kept whole so it can be printed back.
struct Todo {
    raw: Value,
    item: RecurringItem,
}

impl AsRef<RecurringItem> for Todo {
    fn as_ref(&self) -> &RecurringItem {
        &self.item
    }
}

fn parse_todos(json: &str) -> Result<Vec<Todo>> {
    let values: Vec<Value> =
        serde_json::from_str(json).context("Expected a JSON array of to-dos")?;
    let mut todos = Vec::with_capacity(values.len());
    for (index, raw) in values.into_iter().enumerate() {
        match serde_json::from_value::<RecurringItem>(raw.clone()) {
            Ok(item) => todos.push(Todo { raw, item }),
            Err(err) => warn!(index, %err, "skipping to-do without recurrence fields"),
        }
    }
    Ok(todos)
}

fn read_item(path: Option<&PathBuf>) -> Result<RecurringItem> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Expected a to-do JSON object with startsOn")
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
