//! Accounts hold money and are where transactions are recorded against.

mod account_page;
mod accounts_page;
mod core;
mod create_endpoint;

pub use account_page::get_account_page;
pub use accounts_page::get_accounts_page;
pub use core::{
    Account, create_account, create_account_table, get_account, get_all_accounts,
    get_total_account_balance,
};
pub use create_endpoint::create_account_endpoint;
