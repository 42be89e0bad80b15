//! The category model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId};

/// A category for expenses and income, e.g., 'Groceries', 'Eating Out', 'Wages'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The id of the category.
    pub id: CategoryId,

    /// The name of the category.
    pub name: String,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Category.
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    Ok(Category { id, name })
}

/// Create a category with the given `name`.
///
/// Leading and trailing whitespace is removed from the name.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyName] if `name` is empty or only whitespace,
/// - [Error::DuplicateCategoryName] if a category with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(name: &str, connection: &Connection) -> Result<Category, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    connection
        .prepare("INSERT INTO category (name) VALUES (?1) RETURNING id, name")?
        .query_row([name], map_category_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_owned()),
            error => error.into(),
        })
}

/// Get every category ordered by name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC")?
        .query_map([], map_category_row)?
        .map(|category_result| category_result.map_err(Error::SqlError))
        .collect()
}
