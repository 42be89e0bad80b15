//! Defines the route handler for the page that displays filtered transactions.
//!
//! A full page request renders the filter form and a placeholder. The
//! placeholder then asks for the summary and table with an htmx request,
//! which is also how the filter form refreshes the list.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::Uri,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxTarget;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    aggregation::{RangePreset, aggregate_transactions},
    alert::error_alert,
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_placeholder,
    },
    loadable::Loadable,
    navigation::NavBar,
    timezone::local_clock,
};

use super::{
    TransactionType, get_all_transactions, query::TransactionsQuery,
    view::transaction_view_content,
};

/// The ID of the element that holds the summary and table.
const CONTENT_ID: &str = "transactions-content";
const EMPTY_MESSAGE: &str = "No transactions match these filters.";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the transactions page, or just its list when htmx targets the list.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    HxTarget(target): HxTarget,
    uri: Uri,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let clock = local_clock(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    if target.as_deref() == Some(CONTENT_ID) {
        let transactions = Loadable::from_result(get_all_transactions(&connection), "transactions");
        let filters = query.to_filter_params(&clock);
        let view = transactions.as_ref().map(|transactions| {
            aggregate_transactions(transactions, &filters, query.group_by_date(), &clock)
        });

        return Ok(transaction_view_content(view.as_ref(), EMPTY_MESSAGE).into_response());
    }

    let accounts = Loadable::from_result(get_all_accounts(&connection), "accounts");
    let categories = Loadable::from_result(get_all_categories(&connection), "categories");

    Ok(transactions_view(&query, &uri, &accounts, &categories).into_response())
}

fn transactions_view(
    query: &TransactionsQuery,
    uri: &Uri,
    accounts: &Loadable<Vec<Account>>,
    categories: &Loadable<Vec<Category>>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-col gap-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }
                }

                (filter_form(query, accounts, categories))

                section
                    id=(CONTENT_ID)
                    hx-get=(uri)
                    hx-trigger="load"
                    hx-swap="innerHTML"
                    class="w-full"
                {
                    (loading_placeholder("Loading transactions..."))
                }
            }
        }
    };

    base("Transactions", &content)
}

fn labelled(label: &str, name: &str, control: Markup) -> Markup {
    html! {
        div class="flex flex-col min-w-40"
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            (control)
        }
    }
}

fn id_select<T>(
    name: &str,
    options: &Loadable<Vec<T>>,
    selected: &[i64],
    to_option: impl Fn(&T) -> (i64, &str),
) -> Markup {
    match options {
        Loadable::Loading => html! {},
        Loadable::Failed(message) => error_alert(message, "This filter is unavailable."),
        Loadable::Ready(options) => html! {
            select id=(name) name=(name) multiple class=(FORM_TEXT_INPUT_STYLE)
            {
                @for (id, label) in options.iter().map(&to_option) {
                    option value=(id) selected[selected.contains(&id)] { (label) }
                }
            }
        },
    }
}

fn filter_form(
    query: &TransactionsQuery,
    accounts: &Loadable<Vec<Account>>,
    categories: &Loadable<Vec<Category>>,
) -> Markup {
    let range_preset = query.range_preset();
    let group_by_date = query.group_by_date();

    html! {
        form
            id="transaction-filters"
            action=(endpoints::TRANSACTIONS_VIEW)
            method="get"
            hx-get=(endpoints::TRANSACTIONS_VIEW)
            hx-target={ "#" (CONTENT_ID) }
            hx-swap="innerHTML"
            hx-push-url="true"
            hx-trigger="change, submit"
            class="flex flex-wrap items-end gap-4 w-full p-4 rounded bg-white dark:bg-gray-800"
        {
            (labelled("Type", "type", html! {
                select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[query.transaction_type.is_none()] { "All types" }
                    @for kind in TransactionType::ALL {
                        option value=(kind.as_str()) selected[query.transaction_type == Some(kind)]
                        {
                            (kind.label())
                        }
                    }
                }
            }))

            (labelled("Date range", "range", html! {
                select id="range" name="range" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for preset in RangePreset::ALL {
                        option value=(preset.as_query_value()) selected[preset == range_preset]
                        {
                            (preset.label())
                        }
                    }
                }
            }))

            (labelled("From", "start_date", html! {
                input
                    type="date"
                    id="start_date"
                    name="start_date"
                    value=[query.start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }))

            (labelled("To", "end_date", html! {
                input
                    type="date"
                    id="end_date"
                    name="end_date"
                    value=[query.end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }))

            (labelled("Accounts", "account_id", id_select(
                "account_id",
                accounts,
                &query.account_id,
                |account| (account.id, account.name.as_str()),
            )))

            (labelled("Categories", "category_id", id_select(
                "category_id",
                categories,
                &query.category_id,
                |category| (category.id, category.name.as_str()),
            )))

            (labelled("Min amount", "min_amount", html! {
                input
                    type="number"
                    id="min_amount"
                    name="min_amount"
                    min="0"
                    step="0.01"
                    value=[query.min_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }))

            (labelled("Max amount", "max_amount", html! {
                input
                    type="number"
                    id="max_amount"
                    name="max_amount"
                    min="0"
                    step="0.01"
                    value=[query.max_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }))

            (labelled("Search", "search", html! {
                input
                    type="search"
                    id="search"
                    name="search"
                    placeholder="Description or category"
                    value=[query.search.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }))

            (labelled("Show", "group_by_date", html! {
                select id="group_by_date" name="group_by_date" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="true" selected[group_by_date] { "By day" }
                    option value="false" selected[!group_by_date] { "As one list" }
                }
            }))

            div class="flex items-center gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}
