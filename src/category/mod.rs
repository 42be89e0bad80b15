//! Categories label what transactions were for, e.g. 'Groceries'.

mod core;
mod create_endpoint;

pub use core::{Category, create_category, create_category_table, get_all_categories};
pub use create_endpoint::create_category_endpoint;
