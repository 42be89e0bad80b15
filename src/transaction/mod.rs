//! Transactions: the money moving in and out of accounts.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and querying transactions
//! - The transactions page, and the JSON endpoints for creating transactions
//!   and reading them filtered, grouped and totalled

mod core;
mod create_endpoint;
mod query;
mod transactions_page;
mod view;
mod view_endpoint;

pub use core::{
    CategorySnapshot, Transaction, TransactionBuilder, TransactionType, count_transactions,
    create_transaction, create_transaction_table, get_all_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use transactions_page::get_transactions_page;
pub use view::{summary_cards, transaction_view_content};
pub use view_endpoint::get_transaction_view_endpoint;
