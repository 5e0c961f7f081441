//! Permission vocabulary and permission sets.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An atomic capability used to gate a view or an action.
///
/// The vocabulary is closed: a misspelled permission is a compile error rather
/// than a silent "no access" at runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Permission {
    ViewDashboard,
    ManageUsers,
    ManageCourses,
    ViewEnrollments,
    ManageContent,
    ViewAnalytics,
    IssueCertificates,
    ManageCertificates,
    ManageEnrollments,
    SystemConfig,
    SecurityAccess,
    BrowseCourses,
    EnrollCourses,
    ViewProgress,
    AccessContent,
    ViewCertificates,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 16] = [
        Permission::ViewDashboard,
        Permission::ManageUsers,
        Permission::ManageCourses,
        Permission::ViewEnrollments,
        Permission::ManageContent,
        Permission::ViewAnalytics,
        Permission::IssueCertificates,
        Permission::ManageCertificates,
        Permission::ManageEnrollments,
        Permission::SystemConfig,
        Permission::SecurityAccess,
        Permission::BrowseCourses,
        Permission::EnrollCourses,
        Permission::ViewProgress,
        Permission::AccessContent,
        Permission::ViewCertificates,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "VIEW_DASHBOARD",
            Permission::ManageUsers => "MANAGE_USERS",
            Permission::ManageCourses => "MANAGE_COURSES",
            Permission::ViewEnrollments => "VIEW_ENROLLMENTS",
            Permission::ManageContent => "MANAGE_CONTENT",
            Permission::ViewAnalytics => "VIEW_ANALYTICS",
            Permission::IssueCertificates => "ISSUE_CERTIFICATES",
            Permission::ManageCertificates => "MANAGE_CERTIFICATES",
            Permission::ManageEnrollments => "MANAGE_ENROLLMENTS",
            Permission::SystemConfig => "SYSTEM_CONFIG",
            Permission::SecurityAccess => "SECURITY_ACCESS",
            Permission::BrowseCourses => "BROWSE_COURSES",
            Permission::EnrollCourses => "ENROLL_COURSES",
            Permission::ViewProgress => "VIEW_PROGRESS",
            Permission::AccessContent => "ACCESS_CONTENT",
            Permission::ViewCertificates => "VIEW_CERTIFICATES",
        }
    }

    /// Area of the application the permission belongs to (for audit/display).
    pub const fn category(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "dashboard",
            Permission::ManageUsers => "users",
            Permission::ManageCourses | Permission::BrowseCourses => "courses",
            Permission::ViewEnrollments
            | Permission::ManageEnrollments
            | Permission::EnrollCourses => "enrollments",
            Permission::ManageContent | Permission::AccessContent => "content",
            Permission::ViewAnalytics => "analytics",
            Permission::IssueCertificates
            | Permission::ManageCertificates
            | Permission::ViewCertificates => "certificates",
            Permission::SystemConfig | Permission::SecurityAccess => "system",
            Permission::ViewProgress => "learning",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "Open the dashboard for the current role",
            Permission::ManageUsers => "Edit user profiles and change roles",
            Permission::ManageCourses => "Create, edit and delete courses",
            Permission::ViewEnrollments => "See who is enrolled in a course",
            Permission::ManageContent => "Edit course modules and materials",
            Permission::ViewAnalytics => "Open the analytics dashboard",
            Permission::IssueCertificates => "Issue certificates to students",
            Permission::ManageCertificates => "Issue and revoke any certificate",
            Permission::ManageEnrollments => "Create and remove enrollments",
            Permission::SystemConfig => "Change system configuration",
            Permission::SecurityAccess => "Read the security audit log",
            Permission::BrowseCourses => "Browse the course catalog",
            Permission::EnrollCourses => "Enroll in a course",
            Permission::ViewProgress => "Track personal course progress",
            Permission::AccessContent => "Open the modules of enrolled courses",
            Permission::ViewCertificates => "See earned certificates",
        }
    }

    const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// Immutable set of permissions.
///
/// Backed by a bitmask over the closed [`Permission`] enum so role tables can be
/// built in `const` context. Iteration follows declaration order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Permission>", from = "Vec<Permission>")]
pub struct PermissionSet(u32);

impl PermissionSet {
    pub const EMPTY: PermissionSet = PermissionSet(0);

    pub const fn of(permissions: &[Permission]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < permissions.len() {
            bits |= permissions[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    pub const fn union(self, other: PermissionSet) -> Self {
        Self(self.0 | other.0)
    }

    /// Permissions in `self` that are not in `other`.
    pub const fn difference(self, other: PermissionSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0 |= permission.bit();
    }

    pub fn iter(self) -> Iter {
        Iter { set: self, next: 0 }
    }
}

impl core::fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, permission) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(permission.as_str())?;
        }
        Ok(())
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = PermissionSet::EMPTY;
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(value: Vec<Permission>) -> Self {
        value.into_iter().collect()
    }
}

impl From<PermissionSet> for Vec<Permission> {
    fn from(value: PermissionSet) -> Self {
        value.iter().collect()
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`PermissionSet`].
#[derive(Debug, Clone)]
pub struct Iter {
    set: PermissionSet,
    next: usize,
}

impl Iterator for Iter {
    type Item = Permission;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&permission) = Permission::ALL.get(self.next) {
            self.next += 1;
            if self.set.contains(permission) {
                return Some(permission);
            }
        }
        None
    }
}
