//! `learnhub-auth`: role-based access control for LearnHub.
//!
//! This crate is intentionally decoupled from the auth provider and the
//! document store: the role is handed in by the caller, never fetched.

pub mod audit;
pub mod authorize;
pub mod evaluate;
pub mod explain;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod session;

pub use audit::{SecurityEvent, SecurityEventKind, SecurityLog, Severity};
pub use authorize::{
    AccessDecision, AccessRequirement, AuthzError, ProtectedView, RequireMode, authorize,
    authorize_view,
};
pub use evaluate::{has_all, has_any, has_permission, permissions_for, role_permissions};
pub use explain::{AuthorizationExplanation, RbacRegistry, explain_authorization};
pub use permissions::{Permission, PermissionSet, UnknownPermission};
pub use principal::{AdminRecord, Principal};
pub use roles::{Role, UnknownRole};
pub use session::SecuritySession;
