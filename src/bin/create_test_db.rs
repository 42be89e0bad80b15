use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use tallybook::{
    Transaction, TransactionType, count_transactions, create_account, create_category,
    create_transaction, initialize_db,
};

/// A utility for creating a demo database for the Tallybook server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to create, ending today.
    #[arg(long, default_value_t = 60)]
    days: u16,
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

    initialize_db(&conn)?;

    println!("Creating accounts and categories...");
    let everyday = create_account("Everyday", 1250.0, None, &conn)?;
    let savings = create_account("Savings", 8000.0, None, &conn)?;
    let groceries = create_category("Groceries", &conn)?;
    let eating_out = create_category("Eating Out", &conn)?;
    let wages = create_category("Wages", &conn)?;

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();

    for day in 0..args.days {
        let date = today - Duration::days(i64::from(day));
        let date = date.to_string();

        if day % 14 == 0 {
            create_transaction(
                Transaction::build(TransactionType::Income, 2400.0, &date)
                    .description(Some("Pay"))
                    .account_id(Some(everyday.id))
                    .category_id(Some(wages.id)),
                &conn,
            )?;
            create_transaction(
                Transaction::build(TransactionType::Transfer, 500.0, &date)
                    .description(Some("To savings"))
                    .account_id(Some(savings.id)),
                &conn,
            )?;
        }

        if day % 3 == 0 {
            create_transaction(
                Transaction::build(
                    TransactionType::Expense,
                    45.0 + f64::from(day % 7) * 12.5,
                    &format!("{date}T18:30"),
                )
                .description(Some("Supermarket"))
                .account_id(Some(everyday.id))
                .category_id(Some(groceries.id)),
                &conn,
            )?;
        }

        if day % 5 == 0 {
            create_transaction(
                Transaction::build(TransactionType::Expense, 6.5, &format!("{date}T08:15"))
                    .description(Some("Coffee"))
                    .account_id(Some(everyday.id))
                    .category_id(Some(eating_out.id)),
                &conn,
            )?;
        }

        if day == 10 {
            create_transaction(
                Transaction::build(TransactionType::DebtGive, 50.0, &date)
                    .description(Some("Lent to a friend"))
                    .account_id(Some(everyday.id)),
                &conn,
            )?;
        }
    }

    println!("Created {} transactions.", count_transactions(&conn)?);
    println!("Success!");

    Ok(())
}
