//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    aggregation::is_valid_transaction_date,
    database_id::{AccountId, CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// What kind of money movement a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
    /// Money moved between two of the user's accounts.
    Transfer,
    /// Money lent to someone else.
    DebtGive,
    /// Money borrowed from someone else.
    DebtTake,
    /// A repayment of a debt in either direction.
    DebtRepay,
}

impl TransactionType {
    /// Every transaction type in display order.
    pub const ALL: [Self; 6] = [
        Self::Income,
        Self::Expense,
        Self::Transfer,
        Self::DebtGive,
        Self::DebtTake,
        Self::DebtRepay,
    ];

    /// The name used in the database, query strings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::DebtGive => "debt_give",
            Self::DebtTake => "debt_take",
            Self::DebtRepay => "debt_repay",
        }
    }

    /// A human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Transfer => "Transfer",
            Self::DebtGive => "Lent",
            Self::DebtTake => "Borrowed",
            Self::DebtRepay => "Debt repayment",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidTransactionType(s.to_owned()))
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// The parts of a category that are copied onto a transaction when it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    /// The display name of the category.
    pub name: String,
}

/// A movement of money: an income, an expense, a transfer or a debt.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// What kind of transaction this is.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The size of the transaction in major currency units.
    ///
    /// A missing amount is treated as zero.
    #[serde(default)]
    pub amount: f64,
    /// An ISO-8601 date or date-time.
    ///
    /// Dates are interpreted in the server's local timezone. Records created
    /// outside this application may hold dates that do not parse.
    pub date: String,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
    /// The account the money moved in or out of.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// The category the transaction belongs to.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// The category's name at the time the transaction was read.
    #[serde(default)]
    pub category: Option<CategorySnapshot>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionType, amount: f64, date: &str) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            date: date.to_owned(),
            description: None,
            account_id: None,
            category_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to `None`. Pass the builder to
/// [create_transaction] to store it.
///
/// # Examples
///
/// ```ignore
/// use crate::transaction::{Transaction, TransactionType, create_transaction};
///
/// let transaction = create_transaction(
///     Transaction::build(TransactionType::Expense, 45.99, "2025-01-15")
///         .description(Some("Coffee shop purchase"))
///         .account_id(Some(1)),
///     &connection,
/// )
/// .unwrap();
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBuilder {
    /// What kind of transaction this is.
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// The size of the transaction in major currency units.
    ///
    /// Amounts are magnitudes. Whether money came in or went out is decided
    /// by `kind`, so negative amounts are rejected.
    #[serde(default)]
    pub amount: f64,

    /// When the transaction happened, as an ISO-8601 date or date-time.
    ///
    /// # Examples
    /// - `"2025-01-15"`
    /// - `"2025-01-15T08:30"`
    /// - `"2025-01-14T19:30:00Z"`
    pub date: String,

    /// A human-readable description of the transaction.
    #[serde(default)]
    pub description: Option<String>,

    /// The account the money moved in or out of.
    #[serde(default)]
    pub account_id: Option<AccountId>,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_owned);
        self
    }

    /// Set the account id for the transaction.
    pub fn account_id(mut self, account_id: Option<AccountId>) -> Self {
        self.account_id = account_id;
        self
    }

    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str = "SELECT \"transaction\".id, transaction_type, amount, date, \
    description, account_id, category_id, category.name \
    FROM \"transaction\" \
    LEFT JOIN category ON \"transaction\".category_id = category.id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative or not a number,
/// - [Error::InvalidDate] if the date is not an ISO-8601 date or date-time,
/// - [Error::InvalidAccount] if the account ID does not refer to an account,
/// - [Error::InvalidCategory] if the category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.amount.is_nan() || builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    let date = builder.date.trim();
    // Only the format is checked here, the timezone is applied when reading.
    if !is_valid_transaction_date(date) {
        return Err(Error::InvalidDate(date.to_owned()));
    }

    if let Some(account_id) = builder.account_id
        && !row_exists("account", account_id, connection)?
    {
        return Err(Error::InvalidAccount(account_id));
    }

    if let Some(category_id) = builder.category_id
        && !row_exists("category", category_id, connection)?
    {
        return Err(Error::InvalidCategory(category_id));
    }

    let description = builder
        .description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty());

    let id: TransactionId = connection
        .prepare(
            "INSERT INTO \"transaction\" (transaction_type, amount, date, description, account_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id",
        )?
        .query_row(
            (
                builder.kind,
                builder.amount,
                date,
                description,
                builder.account_id,
                builder.category_id,
            ),
            |row| row.get(0),
        )?;

    get_transaction(id, connection)
}

fn row_exists(table: &str, id: i64, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE \"transaction\".id = :id"))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get every transaction, newest first, with the category name attached.
///
/// Transactions on the same date are ordered by descending ID so the most
/// recently recorded comes first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} ORDER BY \"transaction\".date DESC, \"transaction\".id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// The account and category tables must already exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_type TEXT NOT NULL,
                amount REAL NOT NULL DEFAULT 0,
                date TEXT NOT NULL,
                description TEXT,
                account_id INTEGER,
                category_id INTEGER,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE SET NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns selected by [get_transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let description = row.get(4)?;
    let account_id = row.get(5)?;
    let category_id = row.get(6)?;
    let category = row
        .get::<usize, Option<String>>(7)?
        .map(|name| CategorySnapshot { name });

    Ok(Transaction {
        id,
        kind,
        amount,
        date,
        description,
        account_id,
        category_id,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use std::str::FromStr;

    use crate::Error;

    use super::TransactionType;

    #[test]
    fn parses_every_name() {
        for kind in TransactionType::ALL {
            assert_eq!(TransactionType::from_str(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            TransactionType::from_str("refund"),
            Err(Error::InvalidTransactionType("refund".to_owned()))
        );
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&TransactionType::DebtRepay).unwrap();

        assert_eq!(json, "\"debt_repay\"");
    }
}

#[cfg(test)]
mod serde_tests {
    use super::{Transaction, TransactionType};

    #[test]
    fn missing_amount_deserializes_as_zero() {
        let transaction: Transaction =
            serde_json::from_str(r#"{"id": 1, "type": "expense", "date": "2024-01-02"}"#)
                .unwrap();

        assert_eq!(transaction.amount, 0.0);
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.account_id, None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let transaction = Transaction {
            id: 7,
            kind: TransactionType::Income,
            amount: 10.0,
            date: "2024-01-02".to_owned(),
            description: None,
            account_id: Some(3),
            category_id: None,
            category: None,
        };

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["type"], "income");
        assert_eq!(json["accountId"], 3);
        assert!(json["categoryId"].is_null());
    }
}
