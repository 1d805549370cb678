//! Server-rendered HTML.
//!
//! Pages are plain `format!` templates. Every value that originates outside
//! this module (query strings, API responses) must pass through [`escape`].

pub mod audit_logs;
pub mod error;
pub mod landing;
pub mod login;
pub mod services;

use chrono::{DateTime, Utc};

use crate::models::PaginationMeta;

/// Placeholder for absent optional values.
pub const EMPTY: &str = "-";

const STYLES: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1d1d1f;background:#f5f5f7}\
header{display:flex;align-items:center;justify-content:space-between;padding:12px 24px;background:#fff;border-bottom:1px solid #e5e5ea}\
nav a{margin-right:16px;color:#0066cc;text-decoration:none}\
main{max-width:1100px;margin:24px auto;padding:0 24px}\
table{width:100%;border-collapse:collapse;background:#fff}\
th,td{text-align:left;padding:8px 12px;border-bottom:1px solid #e5e5ea}\
.banner{padding:12px 16px;border-radius:8px;margin-bottom:16px}\
.banner.error{background:#fdecea;color:#b3261e}\
.banner.success{background:#e8f5e9;color:#1b5e20}\
.empty{padding:32px;text-align:center;color:#6e6e73}\
code{font-family:ui-monospace,monospace}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped value, or the hyphen placeholder when absent or blank.
pub fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => escape(v),
        _ => EMPTY.to_string(),
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Full HTML document. `body` must already be escaped.
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} · Auth9</title>\n<style>{STYLES}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Dashboard chrome: navigation plus sign-out form around `content`.
pub fn dashboard(title: &str, active: &str, content: &str) -> String {
    let link = |href: &str, label: &str| {
        let current = if href == active { " aria-current=\"page\"" } else { "" };
        format!("<a href=\"{href}\"{current}>{label}</a>")
    };
    let body = format!(
        "<header>\n<nav>{services}{audit}</nav>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n\
         </header>\n<main>\n<h1>{title}</h1>\n{content}\n</main>",
        services = link("/dashboard/services", "Services"),
        audit = link("/dashboard/audit-logs", "Audit Logs"),
        title = escape(title),
    );
    document(title, &body)
}

pub fn banner(kind: &str, message: &str) -> String {
    format!("<div class=\"banner {kind}\" role=\"status\">{}</div>", escape(message))
}

/// "Page X of Y" with previous/next links that appear only when there is a
/// page to go to. `base` is the path the `?page=` parameter is appended to.
pub fn pagination(base: &str, meta: &PaginationMeta) -> String {
    if meta.total_pages <= 0 {
        return String::new();
    }
    let mut out = String::from("<nav class=\"pagination\">");
    if meta.has_previous() {
        out.push_str(&format!("<a href=\"{base}?page={}\" rel=\"prev\">Previous</a> ", meta.page - 1));
    }
    out.push_str(&format!("<span>Page {} of {}</span>", meta.page, meta.total_pages));
    if meta.has_next() {
        out.push_str(&format!(" <a href=\"{base}?page={}\" rel=\"next\">Next</a>", meta.page + 1));
    }
    out.push_str("</nav>");
    out
}
