//! Audit trail for security-relevant actions (logins, roda creation and closure).
//!
//! Events are emitted on the `audit` tracing target so they can be routed
//! separately from application logs.
//!
//! ```ignore
//! AuditEvent::new(Some(user.organizer_id), "roda.close", Some(format!("roda:{id}")), AuditOutcome::Success)
//!     .with_request_headers(&headers)
//!     .with_details(json!({ "brackets": 2 }))
//!     .log();
//! ```

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
    Denied,
}

#[derive(Debug, Serialize)]
pub struct AuditEvent {
    pub organizer_id: Option<Uuid>,
    /// Dotted action name, e.g. `organizer.login`
    pub action: String,
    /// `kind:id`, e.g. `roda:0192...`
    pub resource: Option<String>,
    pub outcome: AuditOutcome,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        organizer_id: Option<Uuid>,
        action: impl Into<String>,
        resource: Option<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            organizer_id,
            action: action.into(),
            resource,
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    pub fn with_request_headers(mut self, headers: &HeaderMap) -> Self {
        self.ip_address = extract_ip_from_headers(headers);
        self.user_agent = extract_user_agent(headers);
        self
    }

    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    pub fn log(self) {
        tracing::info!(
            target: "audit",
            organizer_id = self.organizer_id.map(|id| id.to_string()),
            action = %self.action,
            resource = self.resource,
            outcome = ?self.outcome,
            ip = self.ip_address,
            user_agent = self.user_agent,
            details = ?self.details,
            "{}",
            serde_json::to_string(&self).unwrap_or_else(|_| "unserializable audit event".to_string())
        );
    }
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
