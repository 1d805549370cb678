use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `GET /api/v1/audit-logs`.
///
/// The listing endpoint joins actor details, so `actor_email` and
/// `actor_display_name` are present when the actor still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub action: String,
    pub resource_type: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub actor_email: Option<String>,
    #[serde(default)]
    pub actor_display_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Best human label for the actor: email, then id.
    pub fn actor_label(&self) -> Option<&str> {
        self.actor_email
            .as_deref()
            .or(self.actor_id.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Query accepted by the audit log listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditLogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}
