//! Tallybook is a web app for keeping track of accounts, categories and the
//! transactions between them.
//!
//! This library provides the HTML pages and a small JSON API. The
//! [aggregation] module holds the logic that filters transactions, groups
//! them by day and totals them, which every transaction listing shares.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod account;
pub mod aggregation;
mod alert;
mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod loadable;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{Account, create_account};
pub use app_state::AppState;
pub use category::{Category, create_category};
pub use database_id::{AccountId, CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use loadable::Loadable;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    CategorySnapshot, Transaction, TransactionBuilder, TransactionType, count_transactions,
    create_transaction,
};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// An empty string was used as the name of an account or category.
    #[error("name cannot be empty")]
    EmptyName,

    /// A transaction was given a negative amount.
    ///
    /// Amounts are magnitudes, the transaction type says which way the money
    /// moved.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    NegativeAmount(f64),

    /// A transaction date that is not an ISO-8601 date or date-time.
    #[error("\"{0}\" is not a valid date, use YYYY-MM-DD or an ISO-8601 date-time")]
    InvalidDate(String),

    /// The account ID used to create a transaction did not match an account.
    #[error("the account ID {0} does not refer to a valid account")]
    InvalidAccount(AccountId),

    /// The category ID used to create a transaction did not match a category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// A string that is not one of the transaction type names.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// A JSON request body that could not be read.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A query string that could not be read.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

/// The body of a JSON error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateAccountName(_) | Error::DuplicateCategoryName(_) => {
                StatusCode::CONFLICT
            }
            Error::EmptyName
            | Error::NegativeAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidAccount(_)
            | Error::InvalidCategory(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Error::NotFound => "not_found",
            Error::SqlError(_) => "database_error",
            Error::DatabaseLockError => "database_unavailable",
            Error::InvalidTimezoneError(_) => "invalid_timezone",
            Error::DuplicateAccountName(_) => "duplicate_account_name",
            Error::DuplicateCategoryName(_) => "duplicate_category_name",
            Error::EmptyName => "empty_name",
            Error::NegativeAmount(_) => "negative_amount",
            Error::InvalidDate(_) => "invalid_date",
            Error::InvalidAccount(_) => "invalid_account",
            Error::InvalidCategory(_) => "invalid_category",
            Error::InvalidTransactionType(_) => "invalid_transaction_type",
            Error::InvalidRequestBody(_) => "invalid_request_body",
            Error::InvalidQuery(_) => "invalid_query",
        }
    }

    /// Render the error as a JSON body with a matching status code.
    ///
    /// Server-side failures are logged and replaced with a generic message.
    fn into_json_response(self) -> Response {
        let status_code = self.status_code();
        let message = if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (
            status_code,
            Json(ErrorBody {
                code: self.code(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use crate::Error;

    async fn json_body(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_json_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = json_body(Error::NegativeAmount(-1.5)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "negative_amount");
        assert_eq!(
            body["message"],
            "-1.5 is not a valid amount, amounts must be zero or more"
        );
    }

    #[tokio::test]
    async fn duplicates_are_conflicts() {
        let (status, body) = json_body(Error::DuplicateCategoryName("Rent".to_owned())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "duplicate_category_name");
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let (status, body) = json_body(Error::InvalidTimezoneError("Mars/Base".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "invalid_timezone");
        assert!(!body["message"].as_str().unwrap().contains("Mars"));
    }

    #[tokio::test]
    async fn not_found_renders_html_page() {
        use axum::response::IntoResponse;

        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
