//! The JSON endpoint for filtered, grouped and totalled transactions.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Query, QueryRejection};

use crate::{Error, aggregation::aggregate_transactions, timezone::local_clock};

use super::{
    get_all_transactions, query::TransactionsQuery, transactions_page::TransactionsViewState,
};

/// Return the transactions matching the query string as day groups with a
/// summary.
///
/// Takes the same query parameters as the transactions page.
pub async fn get_transaction_view_endpoint(
    State(state): State<TransactionsViewState>,
    query: Result<Query<TransactionsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("rejected transaction view query: {rejection}");
            return Error::InvalidQuery(rejection.body_text()).into_json_response();
        }
    };

    let clock = match local_clock(&state.local_timezone) {
        Ok(clock) => clock,
        Err(error) => return error.into_json_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    let transactions = match get_all_transactions(&connection) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("could not get transactions: {error}");
            return error.into_json_response();
        }
    };

    let filters = query.to_filter_params(&clock);
    let view = aggregate_transactions(&transactions, &filters, query.group_by_date(), &clock);

    Json(view).into_response()
}
