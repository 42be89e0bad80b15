//! Displays a single account and its transactions for a chosen range.

use std::collections::BTreeSet;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    aggregation::{FilterParams, RangePreset, TransactionView, aggregate_transactions},
    database_id::AccountId,
    endpoints::{self, format_endpoint},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency, link},
    loadable::Loadable,
    navigation::NavBar,
    timezone::local_clock,
    transaction::{get_all_transactions, transaction_view_content},
};

use super::{Account, accounts_page::AccountState, get_account};

/// The ranges offered on the account page.
const RANGE_OPTIONS: [RangePreset; 6] = [
    RangePreset::Today,
    RangePreset::Yesterday,
    RangePreset::ThisWeek,
    RangePreset::ThisMonth,
    RangePreset::LastMonth,
    RangePreset::All,
];

#[derive(Debug, Default, Deserialize)]
pub struct AccountPageQuery {
    /// Defaults to this month. Custom ranges are shown as all time.
    #[serde(default)]
    pub range: Option<RangePreset>,
}

/// Render an account with the transactions in the selected range.
pub async fn get_account_page(
    State(state): State<AccountState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<AccountPageQuery>,
) -> Result<Response, Error> {
    let clock = local_clock(&state.local_timezone)?;
    let range = match query.range.unwrap_or(RangePreset::ThisMonth) {
        RangePreset::Custom => RangePreset::All,
        range => range,
    };
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get account {account_id}: {error}"))?;
    let transactions = Loadable::from_result(get_all_transactions(&connection), "transactions");

    let filters = FilterParams {
        date_range: range.to_spec(None, None),
        account_ids: BTreeSet::from([account_id]),
        ..Default::default()
    };
    let view = transactions
        .as_ref()
        .map(|transactions| aggregate_transactions(transactions, &filters, true, &clock));

    Ok(account_view(&account, range, view.as_ref()).into_response())
}

fn range_links(account_id: AccountId, active: RangePreset) -> Markup {
    let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account_id);

    html! {
        nav class="flex flex-wrap items-center gap-2 text-sm" aria-label="Date range"
        {
            @for preset in RANGE_OPTIONS {
                @if preset == active {
                    span
                        class="inline-flex items-center px-2 py-1 rounded bg-gray-200
                            dark:bg-gray-700 text-gray-900 dark:text-white"
                        aria-current="true"
                    {
                        (preset.label())
                    }
                } @else {
                    a
                        href={ (account_url) "?range=" (preset.as_query_value()) }
                        class="inline-flex items-center px-2 py-1 rounded text-blue-600 hover:underline"
                    {
                        (preset.label())
                    }
                }
            }
        }
    }
}

fn account_view(
    account: &Account,
    range: RangePreset,
    view: Loadable<&TransactionView>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let transactions_url = format!(
        "{}?account_id={}",
        endpoints::TRANSACTIONS_VIEW,
        account.id
    );

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-col gap-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (account.name) }
                        p class="text-gray-500 dark:text-gray-400" data-account-balance="true"
                        {
                            (format_currency(account.balance)) " " (account.currency)
                        }
                    }

                    a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "All accounts" }
                }

                (range_links(account.id, range))

                (transaction_view_content(view, "No transactions in this range."))

                p class="text-sm"
                {
                    (link(&transactions_url, "Filter this account's transactions"))
                }
            }
        }
    };

    base(&account.name, &content)
}
