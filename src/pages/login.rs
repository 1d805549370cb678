use super::{banner, document};
use crate::errors::LoginError;

/// Sign-in page. `error` is the raw `?error=` code, if any.
pub fn render(error: Option<&str>) -> String {
    let notice = match error {
        Some(code) => {
            let message = LoginError::from_code(code)
                .map(|e| e.message())
                .unwrap_or("Sign-in failed. Please try again.");
            banner("error", message)
        }
        None => String::new(),
    };

    let body = format!(
        "<main>\n\
         <h1>Sign in to Auth9</h1>\n\
         {notice}\n\
         <form method=\"post\" action=\"/login\">\n\
         <button type=\"submit\">Continue with Auth9</button>\n\
         </form>\n\
         </main>"
    );
    document("Sign in", &body)
}
