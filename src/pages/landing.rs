use super::document;

/// Marketing page at `/`.
pub fn render(signed_in: bool) -> String {
    let cta = if signed_in {
        "<a class=\"button\" href=\"/dashboard\">Go to dashboard</a>"
    } else {
        "<form method=\"post\" action=\"/login\"><button type=\"submit\">Sign in</button></form>"
    };

    let body = format!(
        "<main>\n\
         <h1>Auth9</h1>\n\
         <p>Identity and access management for every service you run.</p>\n\
         <ul>\n\
         <li>Single sign-on with OpenID Connect for your applications</li>\n\
         <li>Tenants, roles and permissions managed from one console</li>\n\
         <li>A complete audit trail of administrative changes</li>\n\
         </ul>\n\
         {cta}\n\
         </main>"
    );
    document("Identity and access management", &body)
}
