use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use ledger_rs::{NewTransaction, TransactionType, create_transaction, initialize_db};

/// A utility for creating a test database for the ledger_rs web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (year, month, day, description, category, type, amount)
type SampleTransaction = (i32, Month, u8, &'static str, &'static str, TransactionType, f64);

const SAMPLE_TRANSACTIONS: [SampleTransaction; 10] = [
    (2024, Month::January, 1, "Salary", "Job", TransactionType::Income, 3000.0),
    (2024, Month::January, 3, "Rent", "Housing", TransactionType::Expense, 1200.0),
    (2024, Month::January, 9, "Groceries", "Food", TransactionType::Expense, 164.35),
    (2024, Month::February, 1, "Salary", "Job", TransactionType::Income, 3000.0),
    (2024, Month::February, 3, "Rent", "Housing", TransactionType::Expense, 1200.0),
    (2024, Month::February, 14, "Dinner out", "Food", TransactionType::Expense, 87.5),
    (2024, Month::March, 1, "Salary", "Job", TransactionType::Income, 3000.0),
    (2024, Month::March, 5, "Groceries", "Food", TransactionType::Expense, 150.0),
    (2024, Month::March, 20, "Sold old bike", "Other", TransactionType::Income, 250.0),
    (2023, Month::December, 24, "Gifts", "Other", TransactionType::Expense, 320.0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating {} test transactions...", SAMPLE_TRANSACTIONS.len());

    for (year, month, day, description, category, transaction_type, amount) in SAMPLE_TRANSACTIONS
    {
        create_transaction(
            NewTransaction {
                date: Date::from_calendar_date(year, month, day)?,
                description: description.to_owned(),
                category: category.to_owned(),
                transaction_type,
                amount,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
