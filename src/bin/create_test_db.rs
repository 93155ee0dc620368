use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use centavo::{
    PasswordHash, Transaction, TransactionType, ValidatedPassword, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the centavo web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
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

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test@example.com", password_hash, &conn)?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let samples: [(&str, &str, i64, TransactionType, Option<&str>, Option<&str>); 6] = [
        ("Salário", "5000.00", 20, TransactionType::Revenue, None, None),
        (
            "Aluguel",
            "1200.00",
            18,
            TransactionType::FixedExpense,
            Some("Housing"),
            Some("Bank transfer"),
        ),
        (
            "Internet",
            "89.90",
            15,
            TransactionType::FixedExpense,
            Some("Utilities"),
            Some("Credit card"),
        ),
        (
            "Mercado",
            "450.75",
            10,
            TransactionType::VariableExpense,
            Some("Groceries"),
            Some("Credit card"),
        ),
        (
            "Restaurante",
            "120.00",
            4,
            TransactionType::VariableExpense,
            Some("Eating out"),
            Some("Pix"),
        ),
        ("Freelance", "800.00", 2, TransactionType::Revenue, None, Some("Pix")),
    ];

    for (description, amount, days_ago, transaction_type, category, payment_method) in samples {
        let amount: Decimal = amount.parse()?;
        let date = today - Duration::days(days_ago);

        create_transaction(
            Transaction::build(description, amount, date, transaction_type)
                .category(category.map(str::to_owned))
                .payment_method(payment_method.map(str::to_owned)),
            user.id,
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
