//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    transaction::core::{Transaction, TransactionType, create_transaction},
    user::UserID,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction. Always positive.
    pub amount: Decimal,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Whether the transaction is revenue or one of the expense variants.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category of the transaction.
    #[serde(default)]
    pub category: Option<String>,
    /// How the transaction was paid.
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl TransactionForm {
    /// Convert the form data into a builder ready for the database layer.
    pub fn into_builder(self) -> crate::transaction::core::TransactionBuilder {
        Transaction::build(
            &self.description,
            self.amount,
            self.date,
            self.transaction_type,
        )
        .category(self.category)
        .payment_method(self.payment_method)
    }
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> impl IntoResponse {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(form.into_builder(), user_id, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{TransactionType, filter::{TransactionFilter, list_transactions}},
        user::{UserID, create_user},
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(
            "test@example.com",
            crate::PasswordHash::new_unchecked("hash"),
            &conn,
        )
        .unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn form_parses_from_urlencoded_body() {
        let body = "description=Sal%C3%A1rio&amount=5000.00&date=2025-10-01\
            &type=revenue&category=&payment_method=Pix";

        let form: TransactionForm = serde_html_form::from_str(body).unwrap();

        assert_eq!(form.description, "Salário");
        assert_eq!(form.amount, dec("5000.00"));
        assert_eq!(form.date, date!(2025 - 10 - 01));
        assert_eq!(form.transaction_type, TransactionType::Revenue);
        assert_eq!(form.category, Some("".to_owned()));
        assert_eq!(form.payment_method, Some("Pix".to_owned()));
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let form = TransactionForm {
            description: "test transaction".to_string(),
            amount: dec("12.30"),
            date: date!(2025 - 10 - 05),
            transaction_type: TransactionType::VariableExpense,
            category: Some("Misc".to_owned()),
            payment_method: None,
        };

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(UserID::new(1)),
            Form(form),
        )
        .await
        .into_response();

        assert_redirects_to_transactions_view(&response);

        let connection = state.db_connection.lock().unwrap();
        let transactions = list_transactions(
            Some(UserID::new(1)),
            &TransactionFilter::none(),
            &connection,
        )
        .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, dec("12.30"));
        assert_eq!(transactions[0].description, "test transaction");
        assert_eq!(transactions[0].category, Some("Misc".to_owned()));
    }

    #[tokio::test]
    async fn rejects_short_description_before_store() {
        let state = get_test_state();

        let form = TransactionForm {
            description: "a".to_string(),
            amount: dec("12.30"),
            date: date!(2025 - 10 - 05),
            transaction_type: TransactionType::VariableExpense,
            category: None,
            payment_method: None,
        };

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(UserID::new(1)),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let transactions = list_transactions(
            Some(UserID::new(1)),
            &TransactionFilter::none(),
            &connection,
        )
        .unwrap();
        assert!(
            transactions.is_empty(),
            "invalid input must never reach the store"
        );
    }

    #[track_caller]
    fn assert_redirects_to_transactions_view(response: &axum::response::Response) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/transactions",
            "got redirect to {location:?}, want redirect to /transactions"
        );
    }
}
