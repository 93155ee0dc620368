//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The rest of the auth module handles the lower level cookie logic.

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
    AppState, Error,
    auth::cookie::{invalidate_auth_cookie, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner,
        log_in_register,
    },
    user::{User, get_user_by_email},
};

const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
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
                    value=(email);
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
                    required;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            div class="flex items-center gap-2"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember-me"
                    class="w-4 h-4 rounded-sm border-gray-300";

                label for="remember-me" class=(FORM_LABEL_STYLE) { "Remember me" }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? "

                a
                    href=(endpoints::REGISTER_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Register here"
                }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let content = log_in_register("Sign in to your account", &log_in_form("", None));

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for a log-in request.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The email address the user signs in with.
    pub email: String,
    /// The raw password entered by the user.
    pub password: String,
    /// Present when the user ticked the "remember me" checkbox.
    pub remember_me: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is redirected to the dashboard page.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user: User = match get_user_by_email(&user_data.email, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_error_response(&user_data.email, INVALID_CREDENTIALS_ERROR_MSG);
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_error_response(
                &user_data.email,
                "An internal error occurred. Please try again later.",
            );
        }
    };

    let is_password_valid = match user.password_hash.verify(&user_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_error_response(
                &user_data.email,
                "An internal error occurred. Please try again later.",
            );
        }
    };

    if !is_password_valid {
        return log_in_error_response(&user_data.email, INVALID_CREDENTIALS_ERROR_MSG);
    }

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
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
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

fn log_in_error_response(email: &str, error_message: &str) -> Response {
    (StatusCode::OK, log_in_form(email, Some(error_message))).into_response()
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use sha2::{Digest, Sha512};

    use crate::{
        PasswordHash, ValidatedPassword,
        auth::{COOKIE_USER_ID, DEFAULT_COOKIE_DURATION},
        db::initialize,
        endpoints,
        user::create_user,
    };

    use super::{LogInData, LogInState, get_log_in_page, post_log_in};

    /// Use the minimum cost during tests to keep them fast.
    const TEST_COST: u32 = 4;
    const TEST_EMAIL: &str = "test@example.com";
    const TEST_PASSWORD: &str = "averygoodpassword1";

    fn get_test_state() -> LogInState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let password_hash = PasswordHash::new(
            ValidatedPassword::new_unchecked(TEST_PASSWORD),
            TEST_COST,
        )
        .unwrap();
        create_user(TEST_EMAIL, password_hash, &conn).unwrap();

        LogInState {
            cookie_key: Key::from(&Sha512::digest("foobar")),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn get_jar(state: &LogInState) -> PrivateCookieJar {
        PrivateCookieJar::new(state.cookie_key.clone())
    }

    #[tokio::test]
    async fn log_in_page_contains_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));

        let form_selector = Selector::parse("form").unwrap();
        let form = html.select(&form_selector).next().expect("No form found");
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::LOG_IN_API),
            "log-in form should post to the log-in API"
        );
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = get_test_state();
        let jar = get_jar(&state);

        let response = post_log_in(
            State(state),
            jar,
            Form(LogInData {
                email: TEST_EMAIL.to_owned(),
                password: TEST_PASSWORD.to_owned(),
                remember_me: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );

        let set_cookie_headers: Vec<_> = response
            .headers()
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .collect();
        assert!(
            set_cookie_headers
                .iter()
                .any(|header| header.to_str().unwrap().starts_with(COOKIE_USER_ID)),
            "expected a set-cookie header for the auth cookie, got {set_cookie_headers:?}"
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let state = get_test_state();
        let jar = get_jar(&state);

        let response = post_log_in(
            State(state),
            jar,
            Form(LogInData {
                email: TEST_EMAIL.to_owned(),
                password: "wrongpassword".to_owned(),
                remember_me: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(
            text.contains("Incorrect email or password."),
            "expected error message in response, got {text}"
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let state = get_test_state();
        let jar = get_jar(&state);

        let response = post_log_in(
            State(state),
            jar,
            Form(LogInData {
                email: "nobody@example.com".to_owned(),
                password: TEST_PASSWORD.to_owned(),
                remember_me: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(
            text.contains("Incorrect email or password."),
            "expected error message in response, got {text}"
        );
    }
}
