//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard shows the current calendar month: summary cards, the
//! expenses-by-category breakdown, and a daily revenue/expense chart.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{Transaction, TransactionFilter, list_transactions},
    user::UserID,
};

use super::{
    aggregation::{daily_series, expenses_by_category, month_bounds, summarize},
    cards::summary_cards,
    charts::{DashboardChart, charts_script, daily_summary_chart},
    tables::category_breakdown_table,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the month-to-date overview of the user's transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let (month_start, month_end) = month_bounds(today);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    // The dashboard reuses the filtered retrieval query restricted to the
    // current month; aggregation consumes the returned snapshot.
    let filter = TransactionFilter {
        date_from: Some(month_start),
        date_to: Some(month_end),
        ..Default::default()
    };
    let transactions = list_transactions(Some(user_id), &filter, &connection)
        .inspect_err(|error| {
            tracing::error!("could not get transactions for the current month: {error}")
        })?;

    Ok(dashboard_view(&transactions, month_start, month_end).into_response())
}

fn current_local_date(local_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {}", local_timezone);
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

fn dashboard_view(transactions: &[Transaction], month_start: Date, month_end: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let summary = summarize(transactions);
    let breakdown = expenses_by_category(transactions);
    let series = daily_series(transactions, month_start, month_end);

    let chart = DashboardChart {
        id: "daily-summary-chart",
        options: daily_summary_chart(&series).to_string(),
    };

    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h2 class="text-2xl font-bold mb-6" { "This Month" }

                (summary_cards(&summary))

                @if transactions.is_empty() {
                    p class="mb-6"
                    {
                        "Nothing recorded this month yet. Start by " (new_transaction_link) "."
                    }
                }

                section id="charts" class="w-full mx-auto mb-6"
                {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }

                (category_breakdown_table(&breakdown))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(std::slice::from_ref(&chart)),
    ];

    base("Dashboard", &scripts, &content)
}
