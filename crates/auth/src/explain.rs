//! Authorization explanations and the RBAC registry shown in the admin console.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::evaluate::{permissions_for, role_permissions};
use crate::{Permission, PermissionSet, Role};

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why is this page hidden from me?" without changing the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: Permission,

    /// Whether the authorization was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Role the decision was made for and what it grants.
    pub role_state: RoleState,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleState {
    pub role: Option<Role>,
    pub effective_permissions: PermissionSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NoRole,
    MissingPermission,
}

/// Roles whose table contains `permission`, in [`Role::ALL`] order.
pub fn roles_granting(permission: Permission) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| role_permissions(*role).contains(permission))
        .collect()
}

/// Explain why `role` is (or is not) granted `required`.
pub fn explain_authorization(
    role: impl Into<Option<Role>>,
    required: Permission,
) -> AuthorizationExplanation {
    let role = role.into();
    let effective = permissions_for(role);
    let role_state = RoleState {
        role,
        effective_permissions: effective,
    };

    let Some(current) = role else {
        return AuthorizationExplanation {
            required_permission: required,
            granted: false,
            reason: "No role is assigned to the current principal".to_string(),
            role_state,
            denial_reason: Some(DenialReason {
                kind: DenialKind::NoRole,
                message: "Nobody is signed in, or the profile has no recognised role".to_string(),
                suggestions: vec![
                    "Sign in before opening this page".to_string(),
                    format!(
                        "Check that the profile's role is one of: {}",
                        Role::ALL.map(Role::as_str).join(", ")
                    ),
                ],
            }),
        };
    };

    if effective.contains(required) {
        return AuthorizationExplanation {
            required_permission: required,
            granted: true,
            reason: format!("Role '{current}' grants '{required}'"),
            role_state,
            denial_reason: None,
        };
    }

    let granting = roles_granting(required);
    let mut suggestions = Vec::new();
    if granting.is_empty() {
        suggestions.push(format!("No role grants '{required}'; the role table must change"));
    } else {
        let names: Vec<&str> = granting.iter().map(|r| r.as_str()).collect();
        suggestions.push(format!(
            "Ask an administrator to assign one of these roles: {}",
            names.join(", ")
        ));
    }

    AuthorizationExplanation {
        required_permission: required,
        granted: false,
        reason: format!(
            "Role '{current}' does not grant '{required}'. Current permissions: [{effective}]"
        ),
        role_state,
        denial_reason: Some(DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("Missing required permission: '{required}'"),
            suggestions,
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub name: &'static str,
    pub permissions: PermissionSet,
    pub description: &'static str,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub granted_to: Vec<Role>,
}

/// Registry of all roles and permissions.
///
/// Backs the role picker in user management and the permission reference.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: BTreeMap<&'static str, RoleDefinition>,
    pub permissions: BTreeMap<&'static str, PermissionDefinition>,
}

impl RbacRegistry {
    pub fn build() -> Self {
        let roles = Role::ALL
            .into_iter()
            .map(|role| {
                (
                    role.as_str(),
                    RoleDefinition {
                        name: role.as_str(),
                        permissions: role_permissions(role),
                        description: role.description(),
                    },
                )
            })
            .collect();

        let permissions = Permission::ALL
            .into_iter()
            .map(|permission| {
                (
                    permission.as_str(),
                    PermissionDefinition {
                        name: permission.as_str(),
                        description: permission.description(),
                        category: permission.category(),
                        granted_to: roles_granting(permission),
                    },
                )
            })
            .collect();

        Self { roles, permissions }
    }

    /// Look up a role by tag; the legacy senior admin spelling is accepted.
    pub fn role(&self, tag: &str) -> Option<&RoleDefinition> {
        let role: Role = tag.parse().ok()?;
        self.roles.get(role.as_str())
    }

    pub fn permission(&self, tag: &str) -> Option<&PermissionDefinition> {
        self.permissions.get(tag)
    }
}
