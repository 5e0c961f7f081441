//! Typed views of the documents the dashboards read.
//!
//! Field names follow the stored documents (camelCase). Unknown fields are
//! ignored; optional fields may be missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use learnhub_auth::Role;
use learnhub_core::{CertificateId, CourseId, EnrollmentId, Entity, UserId};

pub(crate) const ACTIVE: &str = "active";
const PENDING: &str = "pending";
pub(crate) const REVOKED: &str = "revoked";

/// `users/{uid}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Raw role tag as stored; see [`UserRecord::role`].
    pub role: Option<String>,
    pub status: Option<String>,
}

impl UserRecord {
    pub fn role(&self) -> Option<Role> {
        Role::resolve(self.role.as_deref())
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE)
    }
}

/// One module of a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseModule {
    pub title: String,
    pub content: Option<String>,
}

/// `courses/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    pub instructor: Option<String>,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

/// `enrollments/{id}`
///
/// Older enrollments store the learner under `studentId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub id: EnrollmentId,
    #[serde(alias = "studentId")]
    pub user_id: UserId,
    pub course_id: CourseId,
    pub status: Option<String>,
    /// Percentage, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub completed_modules: Vec<usize>,
}

impl EnrollmentRecord {
    pub fn new(id: EnrollmentId, user_id: UserId, course_id: CourseId) -> Self {
        Self {
            id,
            user_id,
            course_id,
            status: Some(ACTIVE.to_string()),
            progress: 0,
            completed_modules: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some(PENDING)
    }

    /// Enrollments without a status predate the field and count as active.
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_deref(), None | Some(ACTIVE))
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= 100
    }
}

/// `certificates/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub id: CertificateId,
    /// Human-facing certificate number (`CERT-...`).
    pub certificate_id: Option<String>,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub course_id: Option<CourseId>,
    pub course_title: Option<String>,
    /// Dates as entered on the issuing form (`YYYY-MM-DD`).
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl CertificateRecord {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE)
    }

    pub fn is_revoked(&self) -> bool {
        self.status.as_deref() == Some(REVOKED)
    }
}

impl Entity for UserRecord {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for CourseRecord {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for EnrollmentRecord {
    type Id = EnrollmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for CertificateRecord {
    type Id = CertificateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
