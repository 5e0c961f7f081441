use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a signed-in principal.
///
/// The senior admin role appears in stored profiles under two spellings,
/// `super-admin` and the legacy `superAdmin`. Both parse to
/// [`Role::SuperAdmin`]; there is no separate variant for the alias.
/// Tags are case-sensitive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "instructor")]
    Instructor,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super-admin", alias = "superAdmin")]
    SuperAdmin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Instructor, Role::Admin, Role::SuperAdmin];

    /// Legacy spelling of [`Role::SuperAdmin`] still present in stored profiles.
    pub const LEGACY_SUPER_ADMIN: &'static str = "superAdmin";

    /// Canonical tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Role::Student => "Learner who browses, enrolls in and follows courses",
            Role::Instructor => "Teaches courses, edits their content and issues certificates",
            Role::Admin => "Administrator of users, courses, enrollments and certificates",
            Role::SuperAdmin => "Senior administrator (same grants as admin)",
        }
    }

    /// Resolve a role tag read from a profile document.
    ///
    /// Absent and unknown tags both resolve to `None`, which every access check
    /// treats as "no access".
    pub fn resolve(raw: Option<&str>) -> Option<Role> {
        raw.and_then(|tag| tag.parse().ok())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            "super-admin" | Role::LEGACY_SUPER_ADMIN => Ok(Role::SuperAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
