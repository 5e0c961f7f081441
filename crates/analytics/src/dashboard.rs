//! Admin and learner dashboard statistics.

use serde::Serialize;

use learnhub_auth::{AuthzError, Permission, Role, authorize};
use learnhub_core::UserId;

use crate::progress::percent;
use crate::records::{CertificateRecord, CourseRecord, EnrollmentRecord, UserRecord};

/// Counters shown on the admin overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_instructors: usize,
    pub total_admins: usize,
    pub total_courses: usize,
    pub total_certificates: usize,
    pub active_certificates: usize,
    pub active_enrollments: usize,
    pub pending_enrollments: usize,
}

impl DashboardStats {
    pub fn compute(
        users: &[UserRecord],
        courses: &[CourseRecord],
        certificates: &[CertificateRecord],
        enrollments: &[EnrollmentRecord],
    ) -> Self {
        let mut stats = Self {
            total_users: users.len(),
            total_courses: courses.len(),
            total_certificates: certificates.len(),
            ..Self::default()
        };

        for user in users {
            if user.is_active() {
                stats.active_users += 1;
            }
            match user.role() {
                Some(Role::Instructor) => stats.total_instructors += 1,
                Some(role) if role.is_admin() => stats.total_admins += 1,
                _ => {}
            }
        }

        stats.active_certificates = certificates.iter().filter(|c| c.is_active()).count();
        for enrollment in enrollments {
            if enrollment.is_pending() {
                stats.pending_enrollments += 1;
            } else if enrollment.is_active() {
                stats.active_enrollments += 1;
            }
        }

        stats
    }

    /// Same as [`DashboardStats::compute`], for callers holding `VIEW_ANALYTICS`.
    pub fn compute_for(
        role: Option<Role>,
        users: &[UserRecord],
        courses: &[CourseRecord],
        certificates: &[CertificateRecord],
        enrollments: &[EnrollmentRecord],
    ) -> Result<Self, AuthzError> {
        authorize(role, Permission::ViewAnalytics)?;
        let stats = Self::compute(users, courses, certificates, enrollments);
        tracing::debug!(?stats, "dashboard stats computed");
        Ok(stats)
    }

    pub fn active_user_percent(&self) -> u8 {
        percent(self.active_users, self.total_users)
    }
}

/// Progress overview on a learner's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerSummary {
    pub enrolled: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub average_progress: u8,
}

impl LearnerSummary {
    pub fn from_enrollments<'a, I>(enrollments: I) -> Self
    where
        I: IntoIterator<Item = &'a EnrollmentRecord>,
    {
        let mut summary = Self::default();
        let mut progress_total: usize = 0;

        for enrollment in enrollments {
            summary.enrolled += 1;
            progress_total += usize::from(enrollment.progress.min(100));
            match enrollment.progress {
                0 => summary.not_started += 1,
                p if p >= 100 => summary.completed += 1,
                _ => summary.in_progress += 1,
            }
        }

        summary.average_progress = percent(progress_total, summary.enrolled * 100);
        summary
    }

    /// Summary restricted to one learner's enrollments.
    pub fn for_user(enrollments: &[EnrollmentRecord], user_id: &UserId) -> Self {
        Self::from_enrollments(enrollments.iter().filter(|e| &e.user_id == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: Option<&str>, status: Option<&str>) -> UserRecord {
        UserRecord {
            id: id.parse().unwrap(),
            email: None,
            display_name: None,
            role: role.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    fn enrollment(id: &str, user: &str, progress: u8, status: Option<&str>) -> EnrollmentRecord {
        let mut e = EnrollmentRecord::new(
            id.parse().unwrap(),
            user.parse().unwrap(),
            "c1".parse().unwrap(),
        );
        e.progress = progress;
        e.status = status.map(str::to_string);
        e
    }

    fn certificate(id: &str, status: &str) -> CertificateRecord {
        CertificateRecord {
            id: id.parse().unwrap(),
            certificate_id: None,
            student_name: None,
            student_email: None,
            course_id: None,
            course_title: None,
            issue_date: None,
            expiration_date: None,
            issued_at: None,
            status: Some(status.to_string()),
            verified: false,
            verified_at: None,
            revoked_at: None,
        }
    }

    #[test]
    fn admin_overview_counts() {
        let users = vec![
            user("u1", Some("student"), Some("active")),
            user("u2", Some("instructor"), Some("active")),
            user("u3", Some("superAdmin"), None),
            user("u4", Some("admin"), Some("suspended")),
            user("u5", Some("Instructor"), Some("active")),
        ];
        let certificates = vec![certificate("k1", "active"), certificate("k2", "revoked")];
        let enrollments = vec![
            enrollment("e1", "u1", 10, Some("active")),
            enrollment("e2", "u1", 0, Some("pending")),
            enrollment("e3", "u1", 0, None),
        ];

        let stats = DashboardStats::compute(&users, &[], &certificates, &enrollments);
        assert_eq!(stats.total_users, 5);
        assert_eq!(stats.active_users, 3);
        // "Instructor" is not a recognised tag.
        assert_eq!(stats.total_instructors, 1);
        assert_eq!(stats.total_admins, 2);
        assert_eq!(stats.total_certificates, 2);
        assert_eq!(stats.active_certificates, 1);
        assert_eq!(stats.active_enrollments, 2);
        assert_eq!(stats.pending_enrollments, 1);
        assert_eq!(stats.active_user_percent(), 60);
    }

    #[test]
    fn empty_snapshots_give_zeroes() {
        let stats = DashboardStats::compute(&[], &[], &[], &[]);
        assert_eq!(stats, DashboardStats::default());
        assert_eq!(stats.active_user_percent(), 0);
    }

    #[test]
    fn stats_require_analytics_permission() {
        assert!(DashboardStats::compute_for(Some(Role::Instructor), &[], &[], &[], &[]).is_ok());
        assert_eq!(
            DashboardStats::compute_for(Some(Role::Student), &[], &[], &[], &[]),
            Err(AuthzError::forbidden(Permission::ViewAnalytics))
        );
        assert_eq!(
            DashboardStats::compute_for(None, &[], &[], &[], &[]),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn learner_summary_buckets() {
        let enrollments = vec![
            enrollment("e1", "u1", 100, None),
            enrollment("e2", "u1", 40, None),
            enrollment("e3", "u1", 0, None),
            enrollment("e4", "u2", 100, None),
        ];

        let summary = LearnerSummary::for_user(&enrollments, &"u1".parse().unwrap());
        assert_eq!(summary.enrolled, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.not_started, 1);
        assert_eq!(summary.average_progress, 47);

        let nothing = std::iter::empty::<&EnrollmentRecord>();
        assert_eq!(LearnerSummary::from_enrollments(nothing), LearnerSummary::default());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(json["totalUsers"], 0);
        assert_eq!(json["pendingEnrollments"], 0);
    }
}
