//! Defines the route handler for the page for creating a transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::form::{TransactionFormDefaults, transaction_form_fields},
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    Ok(new_transaction_view(today).into_response())
}

fn new_transaction_view(today: Date) -> maud::Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults::empty(today));

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                h2 class="text-xl font-bold mb-4" { "New Transaction" }

                form
                    hx-post=(endpoints::TRANSACTIONS_API)
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
                        "Save Transaction"
                    }
                }
            }
        }
    );

    base("New Transaction", &[], &content)
}
