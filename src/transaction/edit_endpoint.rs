//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    transaction::{
        core::{TransactionId, update_transaction},
        create_endpoint::TransactionForm,
    },
    user::UserID,
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the mutable fields of a transaction,
/// redirects to the transactions view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> impl IntoResponse {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_transaction(transaction_id, form.into_builder(), user_id, &connection)
    {
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

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{
            Transaction, TransactionType, core::get_transaction, create_endpoint::TransactionForm,
            create_transaction,
        },
        user::{UserID, create_user},
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn get_test_state() -> EditTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(
            "test@example.com",
            crate::PasswordHash::new_unchecked("hash"),
            &conn,
        )
        .unwrap();

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn edits_transaction_and_redirects() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    "Aluguel",
                    dec("1200.00"),
                    date!(2025 - 10 - 01),
                    TransactionType::FixedExpense,
                ),
                UserID::new(1),
                &connection,
            )
            .unwrap();
        }

        let form = TransactionForm {
            description: "Aluguel + condomínio".to_owned(),
            amount: dec("1350.00"),
            date: date!(2025 - 10 - 02),
            transaction_type: TransactionType::FixedExpense,
            category: Some("Housing".to_owned()),
            payment_method: None,
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(UserID::new(1)),
            Path(1),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(HX_REDIRECT).unwrap(), "/transactions");

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(1, UserID::new(1), &connection).unwrap();
        assert_eq!(updated.description, "Aluguel + condomínio");
        assert_eq!(updated.amount, dec("1350.00"));
    }

    #[tokio::test]
    async fn returns_not_found_for_missing_transaction() {
        let state = get_test_state();

        let form = TransactionForm {
            description: "Aluguel".to_owned(),
            amount: dec("1200.00"),
            date: date!(2025 - 10 - 01),
            transaction_type: TransactionType::FixedExpense,
            category: None,
            payment_method: None,
        };

        let response = edit_transaction_endpoint(
            State(state),
            Extension(UserID::new(1)),
            Path(42),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_invalid_amount_without_touching_row() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    "Aluguel",
                    dec("1200.00"),
                    date!(2025 - 10 - 01),
                    TransactionType::FixedExpense,
                ),
                UserID::new(1),
                &connection,
            )
            .unwrap();
        }

        let form = TransactionForm {
            description: "Aluguel".to_owned(),
            amount: dec("0"),
            date: date!(2025 - 10 - 01),
            transaction_type: TransactionType::FixedExpense,
            category: None,
            payment_method: None,
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(UserID::new(1)),
            Path(1),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let unchanged = get_transaction(1, UserID::new(1), &connection).unwrap();
        assert_eq!(unchanged.amount, dec("1200.00"));
    }
}
