use super::{dashboard, escape, format_timestamp, or_placeholder, pagination};
use crate::models::{AuditLogEntry, Paginated};

pub const PATH: &str = "/dashboard/audit-logs";

pub fn render(logs: &Paginated<AuditLogEntry>) -> String {
    let content = if logs.data.is_empty() {
        "<p class=\"empty\">No audit logs found</p>".to_string()
    } else {
        let rows: String = logs.data.iter().map(row).collect();
        format!(
            "<table>\n<thead><tr><th>Action</th><th>Resource</th><th>Resource ID</th>\
             <th>Actor</th><th>Time</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>\n{nav}",
            nav = pagination(PATH, &logs.pagination),
        )
    };

    let summary = format!(
        "<p class=\"summary\">{} event{} recorded</p>",
        logs.pagination.total,
        if logs.pagination.total == 1 { "" } else { "s" }
    );

    dashboard("Audit Logs", PATH, &format!("{summary}\n{content}"))
}

fn row(entry: &AuditLogEntry) -> String {
    format!(
        "<tr data-id=\"{id}\"><td><code>{action}</code></td><td>{resource_type}</td>\
         <td>{resource_id}</td><td>{actor}</td><td><time datetime=\"{iso}\">{when}</time></td></tr>\n",
        id = entry.id,
        action = escape(&entry.action),
        resource_type = escape(&entry.resource_type),
        resource_id = or_placeholder(entry.resource_id.as_deref()),
        actor = or_placeholder(entry.actor_label()),
        iso = entry.created_at.to_rfc3339(),
        when = format_timestamp(&entry.created_at),
    )
}
