use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::AccountId};

/// The currency used when an account is created without one.
pub const DEFAULT_CURRENCY: &str = "NZD";

/// The amount of money available for a bank account or credit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The name of the account, unique across all accounts.
    pub name: String,
    /// The balance as last recorded.
    pub balance: f64,
    /// The ISO 4217 code of the account's currency, e.g. "NZD".
    pub currency: String,
}

pub fn create_account_table(connection: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            balance REAL NOT NULL,
            currency TEXT NOT NULL DEFAULT 'NZD'
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = row.get(2)?;
    let currency = row.get(3)?;

    Ok(Account {
        id,
        name,
        balance,
        currency,
    })
}

/// Create an account.
///
/// `currency` falls back to [DEFAULT_CURRENCY] when `None` or blank, and is
/// stored in upper case.
///
/// # Errors
/// Returns:
/// - [Error::EmptyName] if `name` is empty or only whitespace,
/// - [Error::DuplicateAccountName] if an account with `name` already exists,
/// - [Error::SqlError] for any other SQL error.
pub fn create_account(
    name: &str,
    balance: f64,
    currency: Option<&str>,
    connection: &Connection,
) -> Result<Account, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let currency = currency
        .map(str::trim)
        .filter(|currency| !currency.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_uppercase();

    connection
        .prepare(
            "INSERT INTO account (name, balance, currency) VALUES (?1, ?2, ?3)
             RETURNING id, name, balance, currency",
        )?
        .query_row((name, balance, currency), map_row_to_account)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountName(name.to_owned()),
            error => error.into(),
        })
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an account, or
/// [Error::SqlError] for any other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare("SELECT id, name, balance, currency FROM account WHERE id = :id")?
        .query_one(&[(":id", &id)], map_row_to_account)?;

    Ok(account)
}

/// Get every account ordered by name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance, currency FROM account ORDER BY name ASC")?
        .query_map([], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::SqlError))
        .collect()
}

/// Get the total balance across all accounts.
///
/// # Arguments
/// * `connection` - Database connection reference
///
/// # Errors
/// Returns [Error] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub fn get_total_account_balance(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT COALESCE(SUM(balance), 0) FROM account")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}



#[cfg(test)]
mod get_total_account_balance_tests {
    use rusqlite::Connection;

    use super::{create_account, create_account_table, get_total_account_balance};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_account_table(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_sum_of_all_accounts() {
        let conn = get_test_connection();
        create_account("Account 1", 100.50, None, &conn).unwrap();
        create_account("Account 2", 250.75, None, &conn).unwrap();
        create_account("Account 3", -50.25, None, &conn).unwrap();

        let result = get_total_account_balance(&conn).unwrap();

        assert_eq!(result, 301.0);
    }

    #[test]
    fn returns_zero_for_no_accounts() {
        let conn = get_test_connection();

        let result = get_total_account_balance(&conn).unwrap();

        assert_eq!(result, 0.0);
    }

    #[test]
    fn handles_negative_balances() {
        let conn = get_test_connection();
        create_account("Account 1", -200.0, None, &conn).unwrap();
        create_account("Account 2", 100.0, None, &conn).unwrap();

        let result = get_total_account_balance(&conn).unwrap();

        assert_eq!(result, -100.0);
    }
}
