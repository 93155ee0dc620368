//! The registration page for creating an account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::cookie::set_auth_cookie,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner,
        log_in_register,
    },
    user::create_user,
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

/// Holds the user's input and any per-field error messages for re-rendering
/// the registration form.
#[derive(Default)]
struct RegistrationFormState<'a> {
    email: &'a str,
    email_error: Option<&'a str>,
    password_error: Option<&'a str>,
    confirm_password_error: Option<&'a str>,
}

fn registration_form(state: &RegistrationFormState) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    type="email"
                    name="email"
                    id="email"
                    placeholder="you@example.com"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    value=(state.email);

                @if let Some(error_message) = state.email_error
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    minlength=(PASSWORD_INPUT_MIN_LENGTH);

                @if let Some(error_message) = state.password_error
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            div
            {
                label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirm Password" }

                input
                    type="password"
                    name="confirm_password"
                    id="confirm-password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    minlength=(PASSWORD_INPUT_MIN_LENGTH);

                @if let Some(error_message) = state.confirm_password_error
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form(&RegistrationFormState::default());
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The email address the user will sign in with.
    pub email: String,
    /// The raw password entered by the user.
    pub password: String,
    /// The password entered a second time, which must match `password`.
    pub confirm_password: String,
}

/// Handler for creating a new user account.
///
/// On success the auth cookie is set and the client is redirected to the
/// dashboard. Otherwise the registration form is re-rendered with an error
/// message next to the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.confirm_password {
        return form_error_response(RegistrationFormState {
            email: &form.email,
            confirm_password_error: Some("The passwords do not match."),
            ..Default::default()
        });
    }

    let validated_password = match ValidatedPassword::new(&form.password) {
        Ok(validated_password) => validated_password,
        Err(Error::TooWeak(feedback)) => {
            return form_error_response(RegistrationFormState {
                email: &form.email,
                password_error: Some(&format!("This password is too easy to guess. {feedback}")),
                ..Default::default()
            });
        }
        Err(error) => {
            tracing::error!("Unhandled error while validating password: {error}");
            return error.into_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("Could not hash password: {error}");
            return error.into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = match create_user(&form.email, password_hash, &connection) {
        Ok(user) => user,
        Err(Error::DuplicateEmail) => {
            return form_error_response(RegistrationFormState {
                email: &form.email,
                email_error: Some("This email address is already registered."),
                ..Default::default()
            });
        }
        Err(error) => {
            tracing::error!("Could not create user: {error}");
            return error.into_response();
        }
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                (),
            )
                .into_response()
        }
    }
}

fn form_error_response(state: RegistrationFormState) -> Response {
    (StatusCode::OK, registration_form(&state)).into_response()
}
