use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluate::permissions_for;
use crate::{Permission, PermissionSet, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated: no role for the current principal")]
    Unauthenticated,

    #[error("forbidden: missing permission(s) [{missing}]")]
    Forbidden { missing: PermissionSet },
}

impl AuthzError {
    pub fn forbidden(permission: Permission) -> Self {
        Self::Forbidden {
            missing: PermissionSet::of(&[permission]),
        }
    }
}

/// Authorize a single permission for the given role.
///
/// - No IO
/// - No panics
/// - Absent role is reported as `Unauthenticated`, a missing grant as `Forbidden`
pub fn authorize(role: impl Into<Option<Role>>, required: Permission) -> Result<(), AuthzError> {
    let Some(role) = role.into() else {
        return Err(AuthzError::Unauthenticated);
    };

    if permissions_for(role).contains(required) {
        Ok(())
    } else {
        Err(AuthzError::forbidden(required))
    }
}

/// How a list of required permissions is combined.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequireMode {
    /// Every listed permission must be granted.
    #[default]
    All,
    /// At least one listed permission must be granted.
    Any,
}

/// Permissions a protected view needs before it may render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub mode: RequireMode,
}

/// Outcome of evaluating an [`AccessRequirement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    /// `missing` holds the required permissions the role does not hold.
    Denied { missing: PermissionSet },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

impl AccessRequirement {
    pub fn all_of(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            mode: RequireMode::All,
        }
    }

    pub fn any_of(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            mode: RequireMode::Any,
        }
    }

    /// No permissions required; grants every caller, including anonymous ones.
    pub fn none() -> Self {
        Self::default()
    }

    /// Gate in front of every admin console page.
    pub fn admin_console() -> Self {
        Self::all_of([Permission::ViewDashboard])
    }

    pub fn evaluate(&self, role: impl Into<Option<Role>>) -> AccessDecision {
        let granted = permissions_for(role);
        let allowed = match self.mode {
            RequireMode::All => self.permissions.iter().all(|p| granted.contains(*p)),
            RequireMode::Any => self.permissions.iter().any(|p| granted.contains(*p)),
        };

        if allowed {
            AccessDecision::Granted
        } else {
            let required: PermissionSet = self.permissions.iter().copied().collect();
            AccessDecision::Denied {
                missing: required.difference(granted),
            }
        }
    }

    /// `?`-friendly form of [`AccessRequirement::evaluate`].
    pub fn require(&self, role: impl Into<Option<Role>>) -> Result<(), AuthzError> {
        let role = role.into();
        match self.evaluate(role) {
            AccessDecision::Granted => Ok(()),
            AccessDecision::Denied { .. } if role.is_none() => Err(AuthzError::Unauthenticated),
            AccessDecision::Denied { missing } => Err(AuthzError::Forbidden { missing }),
        }
    }
}

/// View-side authorization contract.
///
/// Implement this on pages (or admin console tabs) that require permissions.
/// The shell should check it before rendering and redirect on denial.
pub trait ProtectedView {
    fn required_permissions(&self) -> &[Permission];

    fn require_mode(&self) -> RequireMode {
        RequireMode::All
    }
}

/// Evaluate a [`ProtectedView`]'s declared requirement for `role`.
pub fn authorize_view<V>(role: impl Into<Option<Role>>, view: &V) -> AccessDecision
where
    V: ProtectedView + ?Sized,
{
    AccessRequirement {
        permissions: view.required_permissions().to_vec(),
        mode: view.require_mode(),
    }
    .evaluate(role)
}
