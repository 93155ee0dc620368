//! Transaction management for the application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The filtered retrieval query used by the transactions page
//! - View handlers for transaction-related web pages

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
pub(crate) mod filter;
mod form;
mod new_transaction_page;
mod transactions_page;

pub use core::{
    MIN_DESCRIPTION_LENGTH, Transaction, TransactionBuilder, TransactionId, TransactionType,
    create_transaction, create_transaction_table, get_transaction, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use filter::{TransactionFilter, list_transactions};
pub use new_transaction_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;
