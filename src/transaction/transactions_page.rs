//! Defines the route handler for the page that displays transactions as a table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error, endpoints,
    html::{
        AMOUNT_EXPENSE_STYLE, AMOUNT_REVENUE_STYLE, BUTTON_DELETE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TYPE_BADGE_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    transaction::{
        core::{Transaction, TransactionType},
        filter::{TransactionFilter, list_transactions},
    },
    user::UserID,
};

/// The date format used by HTML date inputs, e.g. "2025-10-05".
const DATE_INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The raw filter values from the page's query string.
///
/// Every field is optional text so that an empty form submission round-trips
/// cleanly; [FilterQuery::into_filter] normalizes the values. The filter set
/// lives entirely in the URL: changing a filter issues a new GET request and
/// the response replaces the whole page, so a stale in-flight response can
/// never be merged into fresher state.
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct FilterQuery {
    /// Keep transactions dated on or after this date.
    #[serde(default)]
    pub date_from: Option<String>,
    /// Keep transactions dated on or before this date.
    #[serde(default)]
    pub date_to: Option<String>,
    /// Keep transactions whose description contains this text.
    #[serde(default)]
    pub description: Option<String>,
    /// Keep transactions of exactly this type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
}

impl FilterQuery {
    /// Normalize the raw query values into a [TransactionFilter].
    ///
    /// Empty fields place no restriction; so do values that do not parse
    /// (an unparseable date or type can only come from a hand-edited URL).
    pub fn into_filter(self) -> TransactionFilter {
        TransactionFilter {
            date_from: self.date_from.as_deref().and_then(parse_date_input),
            date_to: self.date_to.as_deref().and_then(parse_date_input),
            description: self.description.filter(|value| !value.is_empty()),
            transaction_type: self
                .transaction_type
                .as_deref()
                .and_then(|value| value.parse::<TransactionType>().ok()),
        }
    }
}

fn parse_date_input(value: &str) -> Option<Date> {
    Date::parse(value, DATE_INPUT_FORMAT).ok()
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an overview of the user's transactions with the active filters.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = query.into_filter();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = list_transactions(Some(user_id), &filter, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&filter, &transactions).into_response())
}

fn transactions_view(filter: &TransactionFilter, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h2 class="text-2xl font-bold" { "Transactions" }

                    a
                        href=(endpoints::NEW_TRANSACTION_VIEW)
                        class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                            hover:dark:bg-blue-700 text-white rounded"
                    {
                        "Add Transaction"
                    }
                }

                (filter_form(filter))

                (transactions_table(transactions))
            }
        }
    );

    base("Transactions", &[], &content)
}

fn filter_form(filter: &TransactionFilter) -> Markup {
    let date_from = filter.date_from.map(|date| date.to_string());
    let date_to = filter.date_to.map(|date| date.to_string());

    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex flex-col md:flex-row items-end gap-4 p-4 mb-4 border
                border-gray-200 dark:border-gray-700 rounded-md"
        {
            div
            {
                label for="date_from" class=(FORM_LABEL_STYLE) { "From" }

                input
                    type="date"
                    name="date_from"
                    id="date_from"
                    value=[date_from.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date_to" class=(FORM_LABEL_STYLE) { "To" }

                input
                    type="date"
                    name="date_to"
                    id="date_to"
                    value=[date_to.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grow"
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="Filter by description..."
                    value=[filter.description.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[filter.transaction_type.is_none()]
                    {
                        "All types"
                    }

                    @for transaction_type in TransactionType::ALL {
                        option
                            value=(transaction_type.as_str())
                            selected[filter.transaction_type == Some(transaction_type)]
                        {
                            (transaction_type.label())
                        }
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                    hover:dark:bg-blue-700 text-white rounded"
            {
                "Apply"
            }

            a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE)
            {
                "Clear filters"
            }
        }
    )
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td
                                colspan="6"
                                data-empty-state="true"
                                class="px-6 py-8 text-center"
                            {
                                "No transactions found."
                            }
                        }
                    }

                    @for transaction in transactions {
                        (transaction_table_row(transaction))
                    }
                }
            }
        }
    )
}

fn transaction_table_row(transaction: &Transaction) -> Markup {
    let amount_style = if transaction.transaction_type == TransactionType::Revenue {
        AMOUNT_REVENUE_STYLE
    } else {
        AMOUNT_EXPENSE_STYLE
    };
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
            {
                (transaction.description)
            }

            td class={(TABLE_CELL_STYLE) " " (amount_style)}
            {
                (format_currency(transaction.amount))
            }

            td class=(TABLE_CELL_STYLE) { (transaction.date) }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(TYPE_BADGE_STYLE) { (transaction.transaction_type.label()) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                @match transaction.category.as_deref() {
                    Some(category) => { (category) }
                    None => { span class="text-gray-400" { "—" } }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (link(&edit_url, "Edit"))

                    button
                        hx-delete=(delete_url)
                        hx-confirm="Delete this transaction? This cannot be undone."
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}
