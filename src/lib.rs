//! Centavo is a web app for recording income and expenses and keeping an eye
//! on where the current month's money went.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod password;
mod routing;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionType, create_transaction};
pub use user::{User, UserID, create_user, get_user_by_email, set_user_password};

use crate::{
    alert::error_alert,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
    transaction::MIN_DESCRIPTION_LENGTH,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The specified email already belongs to a registered user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A transaction description was shorter than the minimum length.
    ///
    /// This is checked before any database call so that invalid input never
    /// reaches the store.
    #[error("the description must be at least {MIN_DESCRIPTION_LENGTH} characters long")]
    DescriptionTooShort,

    /// A transaction amount was zero or negative.
    ///
    /// Amounts are always positive; whether money came in or went out is
    /// carried by the transaction type, never by the sign of the amount.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(Decimal),

    /// A stored transaction type string did not match any known variant.
    ///
    /// Rows with an unrecognized type are rejected rather than silently
    /// counted as neither revenue nor expense.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            // Row mapping boxes application errors (e.g. an unrecognized
            // transaction type) so they can be unwrapped here.
            rusqlite::Error::FromSqlConversionFailure(index, sql_type, source) => {
                match source.downcast::<Error>() {
                    Ok(error) => *error,
                    Err(source) => {
                        tracing::error!("could not convert column {index}: {source}");
                        Error::SqlError(rusqlite::Error::FromSqlConversionFailure(
                            index, sql_type, source,
                        ))
                    }
                }
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::DescriptionTooShort => (
                StatusCode::BAD_REQUEST,
                error_alert(
                    "Invalid description",
                    &format!(
                        "The description must be at least {MIN_DESCRIPTION_LENGTH} characters long."
                    ),
                ),
            )
                .into_response(),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                error_alert(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount. Enter an amount greater than zero."),
                ),
            )
                .into_response(),
            Error::InvalidTransactionType(type_string) => (
                StatusCode::BAD_REQUEST,
                error_alert(
                    "Invalid transaction type",
                    &format!("\"{type_string}\" is not a valid transaction type."),
                ),
            )
                .into_response(),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                error_alert(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            )
                .into_response(),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                error_alert(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_alert(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
                    .into_response()
            }
        }
    }
}
