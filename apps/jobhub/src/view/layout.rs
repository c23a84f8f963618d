use askama::Template;
use axum::http::StatusCode;

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    reason: &'a str,
    message: &'a str,
}

/// The blocking message shown when an action is rejected.
pub fn render_error_page(status: StatusCode, message: &str) -> askama::Result<String> {
    ErrorTemplate {
        reason: status.canonical_reason().unwrap_or("Error"),
        message,
    }
    .render()
}
