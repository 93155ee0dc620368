//! Cookie-based authentication for the application.
//!
//! This module contains:
//! - Private cookie creation, validation and invalidation
//! - Middleware that guards routes and injects the authenticated user's ID
//! - Route handlers for the log-in, registration and log-out flows

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod register;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use register::{get_register_page, register_user};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_USER_ID};
