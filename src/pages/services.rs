use super::{banner, dashboard, escape, format_timestamp, or_placeholder, pagination, EMPTY};
use crate::models::{Client, Paginated, Service};

pub const LIST_PATH: &str = "/dashboard/services";

/// One-time message shown above the service detail.
#[derive(Debug, Clone)]
pub enum Notice {
    /// A client secret the API will not return again.
    NewSecret {
        client_id: String,
        client_secret: String,
    },
    Error(String),
}

pub fn render_list(services: &Paginated<Service>) -> String {
    let content = if services.data.is_empty() {
        "<p class=\"empty\">No services registered</p>".to_string()
    } else {
        let rows: String = services
            .data
            .iter()
            .map(|s| {
                format!(
                    "<tr><td><a href=\"{LIST_PATH}/{href}\">{name}</a></td><td>{base_url}</td>\
                     <td>{status}</td><td>{updated}</td></tr>\n",
                    href = urlencoding::encode(&s.id),
                    name = escape(&s.name),
                    base_url = or_placeholder(s.base_url.as_deref()),
                    status = s.status.as_str(),
                    updated = format_timestamp(&s.updated_at),
                )
            })
            .collect();
        format!(
            "<table>\n<thead><tr><th>Name</th><th>Base URL</th><th>Status</th><th>Updated</th></tr></thead>\n\
             <tbody>\n{rows}</tbody>\n</table>\n{nav}",
            nav = pagination(LIST_PATH, &services.pagination),
        )
    };
    dashboard("Services", LIST_PATH, &content)
}

pub fn render_detail(service: &Service, clients: &[Client], notice: Option<&Notice>) -> String {
    let notice_html = match notice {
        Some(Notice::NewSecret {
            client_id,
            client_secret,
        }) => format!(
            "<div class=\"banner success\" role=\"status\">\
             <p>Copy this secret now. It will not be shown again.</p>\
             <p>Client ID: <code>{}</code></p><p>Client secret: <code>{}</code></p></div>",
            escape(client_id),
            escape(client_secret),
        ),
        Some(Notice::Error(message)) => banner("error", message),
        None => String::new(),
    };

    let redirect_uris = if service.redirect_uris.is_empty() {
        EMPTY.to_string()
    } else {
        service
            .redirect_uris
            .iter()
            .map(|u| format!("<code>{}</code>", escape(u)))
            .collect::<Vec<_>>()
            .join("<br>")
    };

    let details = format!(
        "<dl>\n<dt>Base URL</dt><dd>{base_url}</dd>\n<dt>Status</dt><dd>{status}</dd>\n\
         <dt>Redirect URIs</dt><dd>{redirect_uris}</dd>\n\
         <dt>Created</dt><dd>{created}</dd>\n<dt>Updated</dt><dd>{updated}</dd>\n</dl>",
        base_url = or_placeholder(service.base_url.as_deref()),
        status = service.status.as_str(),
        created = format_timestamp(&service.created_at),
        updated = format_timestamp(&service.updated_at),
    );

    let clients_html = if clients.is_empty() {
        "<p class=\"empty\">No clients yet</p>".to_string()
    } else {
        let rows: String = clients.iter().map(client_row).collect();
        format!(
            "<table>\n<thead><tr><th>Name</th><th>Client ID</th><th>Created</th><th></th></tr></thead>\n\
             <tbody>\n{rows}</tbody>\n</table>"
        )
    };

    let create_form = "<form method=\"post\">\
         <input type=\"hidden\" name=\"intent\" value=\"create_client\">\
         <input type=\"text\" name=\"name\" placeholder=\"Client name\">\
         <button type=\"submit\">Create client</button></form>";

    let content = format!(
        "{notice_html}\n{details}\n<h2>Clients</h2>\n{create_form}\n{clients_html}"
    );
    // Services stays highlighted while viewing one of them.
    dashboard(&service.name, LIST_PATH, &content)
}

fn client_row(client: &Client) -> String {
    let client_id = escape(&client.client_id);
    format!(
        "<tr><td>{name}</td><td><code>{client_id}</code></td><td>{created}</td><td>\
         <form method=\"post\"><input type=\"hidden\" name=\"intent\" value=\"regenerate_secret\">\
         <input type=\"hidden\" name=\"client_id\" value=\"{client_id}\">\
         <button type=\"submit\">Regenerate secret</button></form>\
         <form method=\"post\"><input type=\"hidden\" name=\"intent\" value=\"delete_client\">\
         <input type=\"hidden\" name=\"client_id\" value=\"{client_id}\">\
         <button type=\"submit\">Delete</button></form></td></tr>\n",
        name = or_placeholder(client.name.as_deref()),
        created = format_timestamp(&client.created_at),
    )
}
