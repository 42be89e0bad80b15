//! Defines the JSON endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error};

use super::{TransactionBuilder, create_transaction};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created` and the stored transaction, or a JSON error
/// describing why the transaction was rejected.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    body: Result<Json<TransactionBuilder>, JsonRejection>,
) -> Response {
    let Json(builder) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected transaction body: {rejection}");
            return Error::InvalidRequestBody(rejection.body_text()).into_json_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_json_response()
        }
    }
}
