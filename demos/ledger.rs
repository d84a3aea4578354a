//! Expense ledger example.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use worker_throttle::{Ledger, LedgerError};

fn main() -> Result<(), LedgerError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(LevelFilter::DEBUG)
        .init();

    let mut ledger = Ledger::new();
    let account = ledger.open("household", 5000)?;

    account.add_expense(500, "food")?;
    account.add_expense(1200, "rent")?;
    account.add_expense(300, "food")?;
    println!("balance after expenses: {}", account.balance());

    match account.add_expense(6000, "holiday") {
        Err(err) => println!("rejected: {err} ({})", err.kind()),
        Ok(balance) => println!("unexpected: balance {balance}"),
    }

    for (category, total) in account.totals_by_category() {
        println!("{category:>6}: {total}");
    }
    Ok(())
}
