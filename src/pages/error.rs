use axum::http::StatusCode;
use axum::response::Html;

use super::{document, escape};

pub fn render(status: StatusCode, title: &str, message: &str) -> Html<String> {
    let body = format!(
        "<main>\n<h1>{title}</h1>\n<p>{message}</p>\n<p class=\"status\">{code}</p>\n\
         <p><a href=\"/dashboard\">Back to dashboard</a></p>\n</main>",
        title = escape(title),
        message = escape(message),
        code = status.as_u16(),
    );
    Html(document(title, &body))
}
