//! Defines the JSON endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error};

use super::create_account;

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountBody {
    /// The account name.
    pub name: String,
    /// The starting balance. Defaults to zero.
    #[serde(default)]
    pub balance: f64,
    /// An ISO 4217 currency code. Defaults to NZD.
    #[serde(default)]
    pub currency: Option<String>,
}

/// A route handler for creating a new account.
///
/// Responds with `201 Created` and the stored account.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    body: Result<Json<AccountBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected account body: {rejection}");
            return Error::InvalidRequestBody(rejection.body_text()).into_json_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_account(
        &body.name,
        body.balance,
        body.currency.as_deref(),
        &connection,
    ) {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(error) => {
            tracing::error!("Could not create account with {body:?}: {error}");
            error.into_json_response()
        }
    }
}
