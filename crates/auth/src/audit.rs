//! Bounded, in-memory security audit log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use learnhub_core::UserId;

use crate::{AuthzError, Permission, Role, evaluate::has_permission};

/// Maximum number of events kept; older events are dropped first.
pub const SECURITY_LOG_CAPACITY: usize = 100;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventKind {
    UserLogin,
    UserLogout,
    RoleChanged,
    AccessDenied,
    SecurityError,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Info,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: SecurityEventKind,
    pub description: String,
    pub severity: Severity,
    pub user_id: Option<UserId>,
    pub user_email: Option<String>,
    /// Client address, when the host knows it.
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl SecurityEvent {
    pub fn new(
        event_type: SecurityEventKind,
        description: impl Into<String>,
        severity: Severity,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: occurred_at,
            event_type,
            description: description.into(),
            severity,
            user_id: None,
            user_email: None,
            ip_address: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId, email: Option<String>) -> Self {
        self.user_id = Some(user_id);
        self.user_email = email;
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}

/// Newest-first log of security events, capped at [`SECURITY_LOG_CAPACITY`].
#[derive(Debug, Clone, Default)]
pub struct SecurityLog {
    events: VecDeque<SecurityEvent>,
}

impl SecurityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and mirror it to `tracing`.
    pub fn record(&mut self, event: SecurityEvent) {
        let user_id = event.user_id.as_ref().map(UserId::as_str).unwrap_or("-");
        match event.severity {
            Severity::Info => tracing::info!(
                kind = ?event.event_type,
                user_id,
                "security: {}",
                event.description
            ),
            Severity::Medium | Severity::High => tracing::warn!(
                kind = ?event.event_type,
                severity = ?event.severity,
                user_id,
                "security: {}",
                event.description
            ),
        }

        self.events.push_front(event);
        self.events.truncate(SECURITY_LOG_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn latest(&self) -> Option<&SecurityEvent> {
        self.events.front()
    }

    /// Events for the audit view, newest first.
    ///
    /// Only roles holding `SECURITY_ACCESS` may read the log.
    pub fn view(
        &self,
        role: impl Into<Option<Role>>,
    ) -> Result<impl Iterator<Item = &SecurityEvent>, AuthzError> {
        let role = role.into();
        if role.is_none() {
            return Err(AuthzError::Unauthenticated);
        }
        if !has_permission(role, Permission::SecurityAccess) {
            return Err(AuthzError::forbidden(Permission::SecurityAccess));
        }
        Ok(self.events.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: usize) -> SecurityEvent {
        SecurityEvent::new(
            SecurityEventKind::UserLogin,
            format!("login {n}"),
            Severity::Info,
            Utc::now(),
        )
    }

    #[test]
    fn keeps_newest_hundred() {
        let mut log = SecurityLog::new();
        for n in 0..150 {
            log.record(event(n));
        }
        assert_eq!(log.len(), SECURITY_LOG_CAPACITY);
        assert_eq!(log.latest().unwrap().description, "login 149");

        let oldest = log.view(Role::Admin).unwrap().last().unwrap();
        assert_eq!(oldest.description, "login 50");
    }

    #[test]
    fn view_requires_security_access() {
        let mut log = SecurityLog::new();
        log.record(event(1));

        assert_eq!(log.view(Role::SuperAdmin).unwrap().count(), 1);
        assert_eq!(
            log.view(Role::Instructor).err(),
            Some(AuthzError::forbidden(Permission::SecurityAccess))
        );
        assert_eq!(log.view(None::<Role>).err(), Some(AuthzError::Unauthenticated));
    }

    #[test]
    fn events_serialize_with_wire_names() {
        let user: UserId = "uid-1".parse().unwrap();
        let ev = SecurityEvent::new(
            SecurityEventKind::AccessDenied,
            "denied",
            Severity::High,
            Utc::now(),
        )
        .with_user(user, Some("ada@example.com".to_string()));

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["eventType"], "ACCESS_DENIED");
        assert_eq!(json["severity"], "HIGH");
        assert_eq!(json["userEmail"], "ada@example.com");
    }

    #[test]
    fn decodes_stored_entries_with_client_address() {
        let stored = serde_json::json!({
            "timestamp": "2024-03-01T09:30:00Z",
            "eventType": "USER_LOGIN",
            "description": "User logged in",
            "severity": "INFO",
            "userId": "uid-7",
            "userEmail": "sam@example.com",
            "ipAddress": "127.0.0.1"
        });
        let ev: SecurityEvent = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(ev.ip_address.as_deref(), Some("127.0.0.1"));
        assert_eq!(serde_json::to_value(&ev).unwrap(), stored);

        let mut without = stored;
        without.as_object_mut().unwrap().remove("ipAddress");
        let ev: SecurityEvent = serde_json::from_value(without).unwrap();
        assert_eq!(ev.ip_address, None);
    }

    #[test]
    fn client_address_is_attached_by_the_host() {
        let ev = SecurityEvent::new(
            SecurityEventKind::UserLogout,
            "bye",
            Severity::Info,
            Utc::now(),
        )
        .with_ip_address("10.0.0.4");
        assert_eq!(serde_json::to_value(&ev).unwrap()["ipAddress"], "10.0.0.4");
    }
}
