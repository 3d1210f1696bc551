use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use ledger_rs::{
    AggregationScope, LedgerConfig, LedgerFilter, LedgerPage, Mutation, UserID,
    logging::setup_logging,
    models::{NEW_DATE_FORMAT, PasswordHash, TransactionForm, TransactionID},
    pagination::{PageRequest, PaginationIndicator},
    stores::sqlite::create_ledger,
};

/// Query and edit a personal income and expense ledger stored in SQLite.
///
/// Results are printed to stdout as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The number of transactions per page when `query` is not given `--per-page`.
    #[arg(long, default_value_t = 10)]
    page_size: u64,

    /// Which transactions the totals and chart data are computed over.
    #[arg(long, value_enum, default_value_t = AggregationScope::Page)]
    scope: AggregationScope,

    /// Also append debug logs to this file.
    #[arg(long)]
    debug_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database tables if they do not exist.
    Init,
    /// Register a new user.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// The already hashed password to store for the user.
        #[arg(long)]
        password_hash: String,
    },
    /// Record a new transaction, with the date as YYYY-MM-DD.
    Add {
        #[arg(long)]
        user: i64,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Show a page of a user's transactions with totals.
    Query {
        #[arg(long)]
        user: i64,
        /// Only include transactions on or after this date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        start: Option<Date>,
        /// Only include transactions on or before this date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        end: Option<Date>,
        /// Only include transactions whose category contains this text.
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        per_page: Option<String>,
    },
    /// Edit a transaction, with the date as DD-MM-YYYY.
    Edit {
        #[arg(long)]
        id: TransactionID,
        /// The user making the change.
        #[arg(long)]
        user: i64,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Delete a transaction.
    Delete {
        #[arg(long)]
        id: TransactionID,
        /// The user making the change.
        #[arg(long)]
        user: i64,
    },
}

#[derive(clap::Args, Debug)]
struct FormArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    amount: String,
    /// Either Income or Expense.
    #[arg(long = "type")]
    transaction_type: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long)]
    date: String,
}

impl From<FormArgs> for TransactionForm {
    fn from(args: FormArgs) -> Self {
        TransactionForm {
            title: args.title,
            amount: args.amount,
            transaction_type: args.transaction_type,
            category: args.category,
            date: args.date,
        }
    }
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, NEW_DATE_FORMAT).map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(args.debug_log.as_deref())?;

    let config = LedgerConfig::default()
        .with_page_size(args.page_size)
        .with_aggregation_scope(args.scope);
    let connection = Connection::open(&args.db_path)?;
    let mut ledger = create_ledger(connection, config)?;

    let output = match args.command {
        Command::Init => {
            tracing::info!("initialized database at {:#?}", args.db_path);
            return Ok(());
        }
        Command::Register {
            username,
            email,
            password_hash,
        } => serde_json::to_string_pretty(&ledger.register_user(
            &username,
            &email,
            PasswordHash::new_unchecked(&password_hash),
        )?)?,
        Command::Add { user, fields } => serde_json::to_string_pretty(
            &ledger.add_transaction(UserID::new(user), &fields.into())?,
        )?,
        Command::Query {
            user,
            start,
            end,
            category,
            page,
            per_page,
        } => {
            let filter = LedgerFilter {
                start_date: start,
                end_date: end,
                category,
            };
            let page_request = PageRequest::from_params(
                page.as_deref(),
                per_page.as_deref(),
                &ledger.config().pagination,
            );
            let page = ledger.query(UserID::new(user), &filter, page_request)?;

            serde_json::to_string_pretty(&QueryOutput {
                pagination: page.pagination_indicators(ledger.config().pagination.max_pages),
                page,
            })?
        }
        Command::Edit { id, user, fields } => serde_json::to_string_pretty(
            &ledger.apply_mutation(id, UserID::new(user), Mutation::Edit(fields.into()))?,
        )?,
        Command::Delete { id, user } => serde_json::to_string_pretty(
            &ledger.apply_mutation(id, UserID::new(user), Mutation::Delete)?,
        )?,
    };

    println!("{output}");

    Ok(())
}

#[derive(Serialize)]
struct QueryOutput {
    #[serde(flatten)]
    page: LedgerPage,
    pagination: Vec<PaginationIndicator>,
}
