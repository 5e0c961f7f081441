//! Certificate issuance, verification and revocation.
//!
//! Issuing and verifying is open to anyone holding `ISSUE_CERTIFICATES` or
//! `MANAGE_CERTIFICATES`; revoking needs `MANAGE_CERTIFICATES`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use learnhub_auth::{AccessRequirement, AuthzError, Permission, Role, authorize};
use learnhub_core::{CertificateId, CourseId, DomainError, find_by_id};

use crate::records::{ACTIVE, CertificateRecord, CourseRecord, REVOKED};

/// Title recorded when the course is missing from the snapshot.
pub const UNKNOWN_COURSE_TITLE: &str = "Unknown Course";

const NUMBER_PREFIX: &str = "CERT";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertificateError {
    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Fields of the issuing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub student_name: String,
    pub student_email: String,
    pub course_id: CourseId,
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
}

fn issuing_requirement() -> AccessRequirement {
    AccessRequirement::any_of([Permission::IssueCertificates, Permission::ManageCertificates])
}

/// `CERT-<unix millis>-<9 upper-case base-36 characters>`.
pub fn certificate_number(issued_at: DateTime<Utc>, entropy: u64) -> String {
    let mut n = entropy % 36u64.pow(SUFFIX_LEN as u32);
    let mut suffix = [b'0'; SUFFIX_LEN];
    for slot in suffix.iter_mut().rev() {
        *slot = BASE36[(n % 36) as usize];
        n /= 36;
    }
    let suffix: String = suffix.iter().map(|&b| char::from(b)).collect();
    format!("{NUMBER_PREFIX}-{}-{suffix}", issued_at.timestamp_millis())
}

/// Issue an active, verified certificate for `request`.
///
/// The course title is copied from `courses`; a course missing from the
/// snapshot is recorded as [`UNKNOWN_COURSE_TITLE`].
pub fn issue_certificate(
    role: impl Into<Option<Role>>,
    request: CertificateRequest,
    courses: &[CourseRecord],
    issued_at: DateTime<Utc>,
) -> Result<CertificateRecord, CertificateError> {
    issuing_requirement().require(role)?;

    let student_name = request.student_name.trim();
    let student_email = request.student_email.trim();
    if student_name.is_empty() {
        return Err(DomainError::validation("student name is required").into());
    }
    if student_email.is_empty() {
        return Err(DomainError::validation("student email is required").into());
    }

    let course_title = find_by_id(courses, &request.course_id)
        .map(|course| course.title.clone())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_COURSE_TITLE.to_string());

    // Low 62 bits of a v7 id are random.
    let entropy = (Uuid::now_v7().as_u128() & ((1u128 << 62) - 1)) as u64;
    let number = certificate_number(issued_at, entropy);

    tracing::info!(
        certificate = %number,
        course_id = %request.course_id,
        "certificate issued"
    );

    Ok(CertificateRecord {
        id: CertificateId::generate(),
        certificate_id: Some(number),
        student_name: Some(student_name.to_string()),
        student_email: Some(student_email.to_string()),
        course_id: Some(request.course_id),
        course_title: Some(course_title),
        issue_date: request.issue_date,
        expiration_date: request.expiration_date.filter(|d| !d.trim().is_empty()),
        issued_at: Some(issued_at),
        status: Some(ACTIVE.to_string()),
        verified: true,
        verified_at: None,
        revoked_at: None,
    })
}

/// Mark `certificate` as verified.
///
/// Returns `Ok(false)` when it already was. Revoked certificates cannot be
/// verified.
pub fn verify(
    role: impl Into<Option<Role>>,
    certificate: &mut CertificateRecord,
    at: DateTime<Utc>,
) -> Result<bool, CertificateError> {
    issuing_requirement().require(role)?;

    if certificate.is_revoked() {
        return Err(DomainError::conflict(format!(
            "certificate {} is revoked",
            certificate.id
        ))
        .into());
    }
    if certificate.verified {
        return Ok(false);
    }

    certificate.verified = true;
    certificate.verified_at = Some(at);
    tracing::info!(certificate_id = %certificate.id, "certificate verified");
    Ok(true)
}

/// Revoke `certificate`.
///
/// Returns `Ok(false)` when it was already revoked; the original revocation
/// time is kept.
pub fn revoke(
    role: impl Into<Option<Role>>,
    certificate: &mut CertificateRecord,
    at: DateTime<Utc>,
) -> Result<bool, CertificateError> {
    authorize(role, Permission::ManageCertificates)?;

    if certificate.is_revoked() {
        return Ok(false);
    }

    certificate.status = Some(REVOKED.to_string());
    certificate.revoked_at = Some(at);
    tracing::warn!(certificate_id = %certificate.id, "certificate revoked");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CourseModule;
    use chrono::TimeZone;
    use learnhub_auth::PermissionSet;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn courses() -> Vec<CourseRecord> {
        vec![CourseRecord {
            id: "c1".parse().unwrap(),
            title: "Rust Basics".to_string(),
            instructor: None,
            modules: vec![CourseModule::default()],
        }]
    }

    fn request(course: &str) -> CertificateRequest {
        CertificateRequest {
            student_name: " Sam Lee ".to_string(),
            student_email: "sam@example.com".to_string(),
            course_id: course.parse().unwrap(),
            issue_date: Some("2024-05-01".to_string()),
            expiration_date: Some(String::new()),
        }
    }

    #[test]
    fn number_has_millis_and_base36_suffix() {
        let number = certificate_number(at(), 0);
        assert_eq!(number, format!("CERT-{}-000000000", at().timestamp_millis()));

        assert!(certificate_number(at(), 35).ends_with("-00000000Z"));
        assert!(certificate_number(at(), 36).ends_with("-000000010"));

        let suffix = certificate_number(at(), u64::MAX);
        let suffix = suffix.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
    }

    #[test]
    fn instructor_issues_active_certificate() {
        let cert = issue_certificate(Role::Instructor, request("c1"), &courses(), at()).unwrap();

        assert!(cert.is_active());
        assert!(cert.verified);
        assert_eq!(cert.student_name.as_deref(), Some("Sam Lee"));
        assert_eq!(cert.course_title.as_deref(), Some("Rust Basics"));
        assert_eq!(cert.expiration_date, None);
        assert_eq!(cert.issued_at, Some(at()));
        let prefix = format!("CERT-{}-", at().timestamp_millis());
        assert!(cert.certificate_id.unwrap().starts_with(&prefix));
    }

    #[test]
    fn missing_course_gets_placeholder_title() {
        let cert = issue_certificate(Role::Admin, request("gone"), &courses(), at()).unwrap();
        assert_eq!(cert.course_title.as_deref(), Some(UNKNOWN_COURSE_TITLE));
    }

    #[test]
    fn students_cannot_issue() {
        let err = issue_certificate(Role::Student, request("c1"), &courses(), at()).unwrap_err();
        assert_eq!(
            err,
            CertificateError::Unauthorized(AuthzError::Forbidden {
                missing: PermissionSet::of(&[
                    Permission::IssueCertificates,
                    Permission::ManageCertificates,
                ]),
            })
        );

        let err = issue_certificate(None::<Role>, request("c1"), &courses(), at()).unwrap_err();
        assert_eq!(err, CertificateError::Unauthorized(AuthzError::Unauthenticated));
    }

    #[test]
    fn blank_student_is_rejected() {
        let mut req = request("c1");
        req.student_email = "  ".to_string();
        let err = issue_certificate(Role::Admin, req, &courses(), at()).unwrap_err();
        assert!(matches!(err, CertificateError::Invalid(DomainError::Validation(_))));
    }

    #[test]
    fn only_managers_revoke() {
        let mut cert = issue_certificate(Role::Admin, request("c1"), &courses(), at()).unwrap();

        assert_eq!(
            revoke(Role::Instructor, &mut cert, at()),
            Err(CertificateError::from(AuthzError::forbidden(
                Permission::ManageCertificates
            )))
        );
        assert!(cert.is_active());

        assert_eq!(revoke(Role::SuperAdmin, &mut cert, at()), Ok(true));
        assert!(cert.is_revoked());
        assert_eq!(cert.revoked_at, Some(at()));

        let later = at() + chrono::Duration::hours(1);
        assert_eq!(revoke(Role::Admin, &mut cert, later), Ok(false));
        assert_eq!(cert.revoked_at, Some(at()));
    }

    #[test]
    fn verification_is_idempotent_and_refused_once_revoked() {
        let mut cert = issue_certificate(Role::Admin, request("c1"), &courses(), at()).unwrap();
        cert.verified = false;

        assert_eq!(verify(Role::Instructor, &mut cert, at()), Ok(true));
        assert_eq!(cert.verified_at, Some(at()));
        assert_eq!(verify(Role::Instructor, &mut cert, at()), Ok(false));

        revoke(Role::Admin, &mut cert, at()).unwrap();
        assert!(matches!(
            verify(Role::Admin, &mut cert, at()),
            Err(CertificateError::Invalid(DomainError::Conflict(_)))
        ));
    }

    #[test]
    fn issued_certificate_serializes_with_stored_names() {
        let cert = issue_certificate(Role::Admin, request("c1"), &courses(), at()).unwrap();
        let json = serde_json::to_value(&cert).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["courseTitle"], "Rust Basics");
        assert_eq!(json["issuedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(json["verified"], true);
    }
}
