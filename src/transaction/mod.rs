//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its SQLite mapping
//! - The ledger filters, queries and summary
//! - The ledger page and the JSON endpoints for managing transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod filter;
mod ledger_page;
mod payload;
mod summary;
mod update_endpoint;
mod view;

pub use self::core::{
    NewTransaction, Transaction, TransactionType, create_transaction, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use ledger_page::{get_ledger_page, get_transactions_endpoint};
pub use update_endpoint::update_transaction_endpoint;

#[cfg(test)]
pub use self::core::get_transaction;
