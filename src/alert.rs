//! Alert partials for displaying error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element via the HTMX
//! response-targets extension, so endpoints can return them for any
//! non-2xx status code.

use maud::{Markup, html};

/// Renders an error alert with a bold message and explanatory details.
pub fn error_alert(message: &str, details: &str) -> Markup {
    html!(
        div
            class="block p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50
                dark:bg-gray-800 dark:text-red-400 border border-red-300
                dark:border-red-800 shadow-lg"
            role="alert"
        {
            span class="font-bold" { (message) }

            @if !details.is_empty() {
                p { (details) }
            }
        }
    )
}
