//! Application router configuration for the pages and the JSON API.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{create_account_endpoint, get_account_page, get_accounts_page},
    category::create_category_endpoint,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, get_transaction_view_endpoint, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::ACCOUNT_VIEW, get(get_account_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTION_VIEW_API,
            get(get_transaction_view_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(endpoints::ACCOUNTS_API, post(create_account_endpoint))
        .route(endpoints::CATEGORIES_API, post(create_category_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn unknown_route_is_404_page() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn error_page_is_500() {
        let server = get_test_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn pages_render() {
        let server = get_test_server();

        for page in [endpoints::TRANSACTIONS_VIEW, endpoints::ACCOUNTS_VIEW] {
            server.get(page).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn htmx_list_request_returns_fragment() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_header("hx-request", "true")
            .add_header("hx-target", "transactions-content")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(!text.contains("<html"));
        assert!(text.contains("No transactions match these filters."));
    }

    #[tokio::test]
    async fn created_records_appear_in_view() {
        let server = get_test_server();

        let account: Value = server
            .post(endpoints::ACCOUNTS_API)
            .json(&json!({ "name": "Everyday", "balance": 10.0 }))
            .await
            .json();
        let category: Value = server
            .post(endpoints::CATEGORIES_API)
            .json(&json!({ "name": "Coffee" }))
            .await
            .json();
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "type": "expense",
                "amount": 4.5,
                "date": "2024-06-01",
                "description": "Flat white",
                "accountId": account["id"],
                "categoryId": category["id"],
            }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({ "type": "income", "amount": 100.0, "date": "2024-06-02" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::TRANSACTION_VIEW_API)
            .add_query_param("search", "COFFEE")
            .add_query_param("account_id", 1)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["groups"][0]["dateKey"], "2024-06-01");
        assert_eq!(
            body["groups"][0]["transactions"][0]["description"],
            "Flat white"
        );
        assert_eq!(body["summary"]["totalExpenses"], 4.5);
        assert_eq!(body["summary"]["totalIncome"], 0.0);
    }

    #[tokio::test]
    async fn account_page_for_missing_account_is_404() {
        let server = get_test_server();

        server.get("/accounts/99").await.assert_status_not_found();
    }
}
