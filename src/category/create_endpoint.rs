//! Defines the JSON endpoint for creating a new category.
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

use super::create_category;

/// The state needed to create a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
}

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected category body: {rejection}");
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

    match create_category(&body.name, &connection) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => {
            tracing::error!("could not create category {:?}: {error}", body.name);
            error.into_json_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::AppState;

    use super::create_category_endpoint;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();
        let app = Router::new()
            .route("/api/categories", post(create_category_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn creates_category() {
        let server = get_test_server();

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": " Groceries " }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({ "id": 1, "name": "Groceries" }));
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let server = get_test_server();
        server
            .post("/api/categories")
            .json(&json!({ "name": "Groceries" }))
            .await;

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Groceries" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["code"], "duplicate_category_name");
    }

    #[tokio::test]
    async fn missing_name_is_bad_request() {
        let server = get_test_server();

        let response = server.post("/api/categories").json(&json!({})).await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["code"], "invalid_request_body");
    }
}
