//! Displays accounts, their balances and this month's totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{DateRangeSpec, FilterParams, Summary, aggregate_transactions},
    alert::error_alert,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    loadable::Loadable,
    navigation::NavBar,
    timezone::local_clock,
    transaction::{get_all_transactions, summary_cards},
};

use super::{Account, get_all_accounts, get_total_account_balance};

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the list of accounts with a summary of this month's transactions.
pub async fn get_accounts_page(State(state): State<AccountState>) -> Result<Response, Error> {
    let clock = local_clock(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = Loadable::from_result(get_all_accounts(&connection), "accounts");
    let total_balance =
        Loadable::from_result(get_total_account_balance(&connection), "the total balance");
    let this_month = FilterParams {
        date_range: DateRangeSpec::ThisMonth,
        ..Default::default()
    };
    let summary = Loadable::from_result(get_all_transactions(&connection), "transactions").map(
        |transactions| aggregate_transactions(&transactions, &this_month, false, &clock).summary,
    );

    Ok(accounts_view(accounts.as_ref().zip(total_balance), summary).into_response())
}

fn accounts_table(accounts: &[Account], total_balance: f64) -> Markup {
    let table_row = |account: &Account| {
        let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-account-id=(account.id)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(account_url) class=(LINK_STYLE) { (account.name) }
                }

                td class=(TABLE_CELL_STYLE) { (account.currency) }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(account.balance))
                }
            }
        )
    };

    html!(
        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Currency" }
                    th scope="col" class="px-6 py-3 text-right" { "Balance" }
                }
            }

            tbody
            {
                @for account in accounts {
                    (table_row(account))
                }

                @if accounts.is_empty() {
                    tr
                    {
                        td
                            colspan="3"
                            data-empty-state="true"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No accounts found."
                        }
                    }
                }
            }

            tfoot
            {
                tr class="font-semibold text-gray-900 dark:text-white"
                {
                    th scope="row" colspan="2" class=(TABLE_CELL_STYLE) { "Total" }
                    td class="px-6 py-4 text-right tabular-nums" data-total-balance="true"
                    {
                        (format_currency(total_balance))
                    }
                }
            }
        }
    )
}

fn accounts_view(accounts: Loadable<(&Vec<Account>, f64)>, summary: Loadable<Summary>) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-col gap-6 w-full lg:max-w-5xl"
            {
                section class="space-y-4"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    @match accounts {
                        Loadable::Loading => {}
                        Loadable::Failed(message) => {
                            (error_alert(&message, "Try reloading the page."))
                        }
                        Loadable::Ready((accounts, total_balance)) => {
                            div class="w-full overflow-x-auto dark:bg-gray-800"
                            {
                                (accounts_table(accounts, total_balance))
                            }
                        }
                    }
                }

                section class="space-y-4" id="this-month"
                {
                    h2 class="text-lg font-semibold" { "This month" }

                    @match summary {
                        Loadable::Loading => {}
                        Loadable::Failed(message) => {
                            (error_alert(&message, "Try reloading the page."))
                        }
                        Loadable::Ready(summary) => {
                            (summary_cards(&summary))
                        }
                    }
                }
            }
        }
    );

    base("Accounts", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        account::create_account,
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document, select_texts},
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{AccountState, get_accounts_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    async fn get_page(conn: Connection) -> Response {
        let state = AccountState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        get_accounts_page(State(state)).await.unwrap()
    }

    #[tokio::test]
    async fn lists_accounts_with_total() {
        let conn = get_test_connection();
        create_account("Savings", 250.5, None, &conn).unwrap();
        create_account("Everyday", 100.0, Some("aud"), &conn).unwrap();

        let response = get_page(conn).await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(
            select_texts(&document, "[data-account-id] th"),
            ["Everyday", "Savings"]
        );
        assert_eq!(
            select_texts(&document, "[data-account-id] td"),
            ["AUD", "$100.00", "NZD", "$250.50"]
        );
        assert_eq!(select_texts(&document, "[data-total-balance]"), ["$350.50"]);

        let links: Vec<&str> = document
            .select(&Selector::parse("[data-account-id] a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(links, ["/accounts/2", "/accounts/1"]);
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let response = get_page(get_test_connection()).await;

        let document = parse_html_document(response).await;
        assert_eq!(
            select_texts(&document, "[data-empty-state]"),
            ["No accounts found."]
        );
        assert_eq!(select_texts(&document, "[data-total-balance]"), ["$0.00"]);
    }

    #[tokio::test]
    async fn summarises_this_month() {
        let conn = get_test_connection();
        let today = OffsetDateTime::now_utc().date().to_string();
        create_transaction(
            Transaction::build(TransactionType::Income, 100.0, &today),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionType::Expense, 30.0, &today),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionType::Expense, 999.0, "2000-01-01"),
            &conn,
        )
        .unwrap();

        let response = get_page(conn).await;

        let document = parse_html_document(response).await;
        assert_eq!(
            select_texts(&document, "#this-month [data-summary-card] p:last-child"),
            ["$100.00", "$30.00", "$70.00"]
        );
    }

    #[tokio::test]
    async fn failed_accounts_keep_summary() {
        let conn = get_test_connection();
        conn.execute("DROP TABLE account", []).unwrap();

        let response = get_page(conn).await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_eq!(
            select_texts(&document, "[role=alert] p:first-child"),
            ["Could not load accounts."]
        );
        assert_eq!(
            select_texts(&document, "#this-month [data-summary-card] p:last-child"),
            ["$0.00", "$0.00", "$0.00"]
        );
    }
}
