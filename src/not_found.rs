use axum::{http::StatusCode, response::Response};
use maud::Markup;

use crate::html::error_view;

fn not_found_view() -> Markup {
    error_view(
        "Not Found",
        "404",
        "Sorry, this page does not exist.",
        "Check the URL or head back to the dashboard.",
    )
}

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    use axum::response::IntoResponse;

    (StatusCode::NOT_FOUND, not_found_view()).into_response()
}
