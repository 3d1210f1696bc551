use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use ledger_rs::{
    LedgerConfig, Transaction, TransactionType, models::PasswordHash,
    stores::sqlite::create_ledger,
};

/// A utility for creating a test database for the ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of days of transactions to generate, ending today.
    #[arg(long, default_value_t = 60)]
    days: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let mut ledger = create_ledger(conn, LedgerConfig::default())?;

    println!("Creating test user...");
    let user = ledger.register_user(
        "test",
        "test@example.com",
        PasswordHash::new_unchecked("test"),
    )?;

    println!("Creating transactions for the last {} days...", args.days);
    let today = OffsetDateTime::now_utc().date();
    let expenses = [
        ("Groceries", "Supermarket", 84.30),
        ("Transport", "Bus fare", 4.20),
        ("Dining", "Lunch", 17.50),
        ("Utilities", "Power bill", 121.95),
    ];

    for day in 0..args.days.max(0) {
        let date = today - Duration::days(day);

        if day % 14 == 0 {
            ledger.record_transaction(
                Transaction::build(user.id, "Salary", 2400.0, TransactionType::Income, date)
                    .category("Salary"),
            )?;
        }

        let (category, title, amount) = expenses[day as usize % expenses.len()];
        ledger.record_transaction(
            Transaction::build(user.id, title, amount, TransactionType::Expense, date)
                .category(category),
        )?;
    }

    println!("Success!");

    Ok(())
}
