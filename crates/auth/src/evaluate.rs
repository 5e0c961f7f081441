//! Role → permission evaluation.
//!
//! - No IO
//! - No panics
//! - No state: the caller owns the current role and passes it in
//!
//! Every function accepts anything convertible into `Option<Role>`; `None`
//! stands for "no signed-in principal" and yields no access.

use crate::{Permission, PermissionSet, Role};

const STUDENT: PermissionSet = PermissionSet::of(&[
    Permission::ViewDashboard,
    Permission::BrowseCourses,
    Permission::EnrollCourses,
    Permission::ViewProgress,
    Permission::AccessContent,
    Permission::ViewCertificates,
]);

const INSTRUCTOR: PermissionSet = PermissionSet::of(&[
    Permission::ViewDashboard,
    Permission::ManageCourses,
    Permission::ViewEnrollments,
    Permission::ManageContent,
    Permission::ViewAnalytics,
    Permission::IssueCertificates,
]);

// Shared by `admin` and both spellings of `super-admin`.
const ADMINISTRATOR: PermissionSet = PermissionSet::of(&[
    Permission::ViewDashboard,
    Permission::ManageUsers,
    Permission::ManageCourses,
    Permission::ManageEnrollments,
    Permission::ViewAnalytics,
    Permission::ManageCertificates,
    Permission::SystemConfig,
    Permission::SecurityAccess,
]);

/// Static permission table for a known role.
pub const fn role_permissions(role: Role) -> PermissionSet {
    match role {
        Role::Student => STUDENT,
        Role::Instructor => INSTRUCTOR,
        Role::Admin | Role::SuperAdmin => ADMINISTRATOR,
    }
}

/// Permissions granted to `role`; empty when no role is present.
pub fn permissions_for(role: impl Into<Option<Role>>) -> PermissionSet {
    role.into().map_or(PermissionSet::EMPTY, role_permissions)
}

pub fn has_permission(role: impl Into<Option<Role>>, permission: Permission) -> bool {
    permissions_for(role).contains(permission)
}

/// True if at least one of `permissions` is granted. False for an empty list.
pub fn has_any(role: impl Into<Option<Role>>, permissions: &[Permission]) -> bool {
    let granted = permissions_for(role);
    permissions.iter().any(|p| granted.contains(*p))
}

/// True if every one of `permissions` is granted. True for an empty list.
pub fn has_all(role: impl Into<Option<Role>>, permissions: &[Permission]) -> bool {
    let granted = permissions_for(role);
    permissions.iter().all(|p| granted.contains(*p))
}
