//! Caller-owned security session.
//!
//! The shell owns one [`SecuritySession`] for the signed-in principal and feeds
//! it the role delivered by the profile subscription. Every check re-runs the
//! pure evaluator with the current role; nothing is cached.

use chrono::Utc;

use learnhub_core::UserId;

use crate::audit::{SecurityEvent, SecurityEventKind, SecurityLog, Severity};
use crate::evaluate;
use crate::{AccessDecision, AccessRequirement, Permission, PermissionSet, Principal, Role};

#[derive(Debug, Clone, Default)]
pub struct SecuritySession {
    principal: Option<Principal>,
    log: SecurityLog,
}

impl SecuritySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.principal.as_ref().and_then(|p| p.role)
    }

    pub fn log(&self) -> &SecurityLog {
        &self.log
    }

    /// Auth state reports a signed-in user. The role arrives separately.
    pub fn sign_in(&mut self, user_id: UserId, email: Option<String>) {
        let description = format!(
            "User {} logged in",
            email.as_deref().unwrap_or(user_id.as_str())
        );
        let principal = Principal::new(user_id, email);
        self.record(
            SecurityEventKind::UserLogin,
            description,
            Severity::Info,
            Some(&principal),
        );
        self.principal = Some(principal);
    }

    /// Auth state reports no user.
    pub fn sign_out(&mut self) {
        let previous = self.principal.take();
        self.record(
            SecurityEventKind::UserLogout,
            "User logged out",
            Severity::Info,
            previous.as_ref(),
        );
    }

    /// Profile subscription delivered a (possibly new) role tag.
    ///
    /// Unknown tags clear the role and are logged; they never fail.
    pub fn apply_profile_update(&mut self, raw_role: Option<&str>) {
        let Some(principal) = self.principal.as_mut() else {
            tracing::debug!("profile update without a signed-in principal ignored");
            return;
        };

        let resolved = Role::resolve(raw_role);
        let previous = principal.role;
        principal.role = resolved;
        let principal = principal.clone();

        if let (Some(tag), None) = (raw_role, resolved) {
            self.record(
                SecurityEventKind::SecurityError,
                format!("Unrecognised role '{tag}' on profile; access withdrawn"),
                Severity::Medium,
                Some(&principal),
            );
        } else if previous != resolved {
            let from = previous.map_or("none", Role::as_str);
            let to = resolved.map_or("none", Role::as_str);
            self.record(
                SecurityEventKind::RoleChanged,
                format!("Role changed from {from} to {to}"),
                Severity::Info,
                Some(&principal),
            );
        }
    }

    pub fn permissions(&self) -> PermissionSet {
        evaluate::permissions_for(self.role())
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        evaluate::has_permission(self.role(), permission)
    }

    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        evaluate::has_any(self.role(), permissions)
    }

    pub fn has_all(&self, permissions: &[Permission]) -> bool {
        evaluate::has_all(self.role(), permissions)
    }

    /// Evaluate a view requirement; denials are recorded in the audit log.
    pub fn check(&mut self, requirement: &AccessRequirement) -> AccessDecision {
        let decision = requirement.evaluate(self.role());
        if let AccessDecision::Denied { missing } = &decision {
            let principal = self.principal.clone();
            self.record(
                SecurityEventKind::AccessDenied,
                format!("Access denied; missing [{missing}]"),
                Severity::High,
                principal.as_ref(),
            );
        }
        decision
    }

    fn record(
        &mut self,
        kind: SecurityEventKind,
        description: impl Into<String>,
        severity: Severity,
        principal: Option<&Principal>,
    ) {
        let mut event = SecurityEvent::new(kind, description, severity, Utc::now());
        if let Some(p) = principal {
            event = event.with_user(p.user_id.clone(), p.email.clone());
        }
        self.log.record(event);
    }
}
