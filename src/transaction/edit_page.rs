//! Defines the route handler for the page for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    transaction::{
        core::{Transaction, TransactionId, get_transaction},
        form::{TransactionFormDefaults, transaction_form_fields},
    },
    user::UserID,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for looking up the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing one of the user's transactions.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(edit_transaction_view(&transaction).into_response())
}

fn edit_transaction_view(transaction: &Transaction) -> maud::Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        description: Some(&transaction.description),
        amount: Some(transaction.amount),
        date: transaction.date,
        transaction_type: Some(transaction.transaction_type),
        category: transaction.category.as_deref(),
        payment_method: transaction.payment_method.as_deref(),
    });
    let update_url = endpoints::format_endpoint(endpoints::UPDATE_TRANSACTION, transaction.id);

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                h2 class="text-xl font-bold mb-1" { "Edit Transaction" }

                p class="text-sm text-gray-500 dark:text-gray-400 mb-4"
                {
                    "Recorded " (transaction.created_at)
                }

                form
                    hx-put=(update_url)
                    hx-target-error="#alert-container"
                    hx-indicator="#indicator"
                    class="space-y-4"
                {
                    (form_fields)

                    button
                        type="submit" id="submit-button" tabindex="0"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        span class="inline htmx-indicator" id="indicator"
                        {
                            (loading_spinner())
                        }
                        "Save Changes"
                    }
                }
            }
        }
    );

    base("Edit Transaction", &[], &content)
}
