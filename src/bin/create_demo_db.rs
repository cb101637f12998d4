use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use tabungan_rs::{
    LedgerPolicy, NewAccount, NewTransaction, TransactionDecision, TransactionDirection,
    create_transaction, decide_transaction, initialize_db, open_account,
};

/// A utility for creating a demo database for the REST API server of tabungan_rs.
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

    let policy = LedgerPolicy::default();

    println!("Creating demo accounts...");

    let first_account = open_account(
        &NewAccount {
            student_id: 1,
            student_name: "Ahmad Fauzi".to_owned(),
        },
        &conn,
    )?;

    let deposit = create_transaction(
        first_account.id,
        NewTransaction {
            direction: TransactionDirection::Income,
            amount: 150_000,
            description: "Initial deposit from parents".to_owned(),
            proof_ref: None,
        },
        &policy,
        &conn,
    )?;
    decide_transaction(deposit.id, TransactionDecision::Approve, "demo-admin", &conn)?;

    let withdrawal = create_transaction(
        first_account.id,
        NewTransaction {
            direction: TransactionDirection::Expense,
            amount: 25_000,
            description: "School supplies".to_owned(),
            proof_ref: None,
        },
        &policy,
        &conn,
    )?;
    decide_transaction(
        withdrawal.id,
        TransactionDecision::Approve,
        "demo-admin",
        &conn,
    )?;

    // Left pending so the approval queue has something to show.
    create_transaction(
        first_account.id,
        NewTransaction {
            direction: TransactionDirection::Income,
            amount: 50_000,
            description: "Pocket money transfer".to_owned(),
            proof_ref: Some("https://example.com/receipts/123.jpg".to_owned()),
        },
        &policy,
        &conn,
    )?;

    let second_account = open_account(
        &NewAccount {
            student_id: 2,
            student_name: "Siti Rahma".to_owned(),
        },
        &conn,
    )?;

    let rejected = create_transaction(
        second_account.id,
        NewTransaction {
            direction: TransactionDirection::Expense,
            amount: 75_000,
            description: "Canteen top-up".to_owned(),
            proof_ref: None,
        },
        &policy,
        &conn,
    )?;
    decide_transaction(rejected.id, TransactionDecision::Reject, "demo-admin", &conn)?;

    println!("Success!");

    Ok(())
}
