//! `learnhub-analytics`: statistics and certificate bookkeeping over document-store records.
//!
//! Everything here works on in-memory snapshots; the snapshots
//! themselves come from the shell's collection listeners.

pub mod certificates;
pub mod dashboard;
pub mod progress;
pub mod records;

pub use certificates::{
    CertificateError, CertificateRequest, certificate_number, issue_certificate, revoke, verify,
};
pub use dashboard::{DashboardStats, LearnerSummary};
pub use progress::{complete_module, ensure_not_enrolled, module_progress, percent};
pub use records::{CertificateRecord, CourseModule, CourseRecord, EnrollmentRecord, UserRecord};
